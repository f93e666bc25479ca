mod codec;
mod error;
mod mixer;

pub use codec::{decode, encode, SampleFormat};
pub use error::DspError;
pub use mixer::Mixer;
