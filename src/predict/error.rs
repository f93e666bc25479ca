use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("satellite {name:?} not found in {file}")]
    SatelliteNotFound { name: String, file: String },
    #[error("invalid TLE for {name:?}: {message}")]
    InvalidTle { name: String, message: String },
    #[error("propagation error: {0}")]
    Propagation(String),
}
