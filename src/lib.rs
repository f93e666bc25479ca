//! Frequency correction for streamed IQ data: constant carrier shifts or
//! live Doppler cancellation for satellite downlinks.

pub mod dsp;
pub mod predict;
pub mod schedule;
pub mod stream;
