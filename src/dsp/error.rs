use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DspError {
    #[error(
        "{len} byte block is not a multiple of the {stride} byte sample stride \
         ({leftover} bytes left over)"
    )]
    FormatMismatch {
        len: usize,
        stride: usize,
        leftover: usize,
    },
}
