mod error;
mod observer;
mod propagation;
mod tle;
mod types;

pub use error::PredictError;
pub use observer::ObserverLocation;
pub use propagation::OrbitTrack;
pub use tle::{lookup, TleRecord};
pub use types::DopplerSample;
