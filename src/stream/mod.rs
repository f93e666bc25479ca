use std::io::{ErrorKind, Read, Write};

use log::warn;
use thiserror::Error;

use crate::dsp::{self, DspError, Mixer, SampleFormat};
use crate::predict::PredictError;
use crate::schedule::FrequencySchedule;

/// Bytes pulled from the input per iteration.
pub const BLOCK_SIZE: usize = 8192;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("stream I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Dsp(#[from] DspError),
    #[error(transparent)]
    Predict(#[from] PredictError),
}

/// Drive the filter until the input reports end-of-stream. Returns the
/// number of samples processed.
pub fn run<R: Read, W: Write>(
    input: R,
    output: W,
    format: SampleFormat,
    schedule: &mut FrequencySchedule,
    mixer: &mut Mixer,
) -> Result<u64, StreamError> {
    run_with_stop(input, output, format, schedule, mixer, || false)
}

/// Same as [`run`] but polls `stop` before each read, so a library host
/// can end the stream cooperatively.
pub fn run_with_stop<R: Read, W: Write>(
    mut input: R,
    mut output: W,
    format: SampleFormat,
    schedule: &mut FrequencySchedule,
    mixer: &mut Mixer,
    stop: impl Fn() -> bool,
) -> Result<u64, StreamError> {
    let stride = format.bytes_per_sample();
    let mut block = [0u8; BLOCK_SIZE];

    while !stop() {
        let filled = fill_block(&mut input, &mut block)?;
        if filled == 0 {
            break;
        }

        // A trailing partial sample is dropped, not read past.
        let whole = filled - filled % stride;
        if whole < filled {
            warn!(
                "{}",
                DspError::FormatMismatch {
                    len: filled,
                    stride,
                    leftover: filled - whole,
                }
            );
        }

        let shift_hz = schedule.current_shift_hz(mixer.samples_rotated())?;
        let mut samples = dsp::decode(&block[..whole], format)?;
        mixer.rotate(&mut samples, shift_hz);

        // Flush every block so a piped consumer sees minimal latency.
        output.write_all(&dsp::encode(&samples))?;
        output.flush()?;

        if filled < BLOCK_SIZE {
            break;
        }
    }

    Ok(mixer.samples_rotated())
}

/// Read until the block is full or the input is exhausted. A short fill
/// marks the tail of the stream.
fn fill_block<R: Read>(input: &mut R, block: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < block.len() {
        match input.read(&mut block[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
