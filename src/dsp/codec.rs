use clap::ValueEnum;
use num_complex::Complex32;

use super::error::DspError;

/// Wire layout of one IQ pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SampleFormat {
    /// Interleaved signed 16-bit little-endian integers
    #[value(name = "i16")]
    I16,
    /// Interleaved 32-bit little-endian floats
    #[value(name = "f32")]
    F32,
}

impl SampleFormat {
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::I16 => 4,
            SampleFormat::F32 => 8,
        }
    }
}

/// Decode a block of raw bytes into unit-scale complex samples.
///
/// The block must contain whole samples only; callers that may see a
/// trailing partial sample trim it off first and report the leftover.
pub fn decode(bytes: &[u8], format: SampleFormat) -> Result<Vec<Complex32>, DspError> {
    let stride = format.bytes_per_sample();
    if bytes.len() % stride != 0 {
        return Err(DspError::FormatMismatch {
            len: bytes.len(),
            stride,
            leftover: bytes.len() % stride,
        });
    }

    let mut samples = Vec::with_capacity(bytes.len() / stride);
    match format {
        SampleFormat::I16 => {
            for pair in bytes.chunks_exact(4) {
                let i = i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0;
                let q = i16::from_le_bytes([pair[2], pair[3]]) as f32 / 32768.0;
                samples.push(Complex32::new(i, q));
            }
        }
        SampleFormat::F32 => {
            for pair in bytes.chunks_exact(8) {
                let i = f32::from_le_bytes([pair[0], pair[1], pair[2], pair[3]]);
                let q = f32::from_le_bytes([pair[4], pair[5], pair[6], pair[7]]);
                samples.push(Complex32::new(i, q));
            }
        }
    }
    Ok(samples)
}

/// Encode complex samples as interleaved signed 16-bit little-endian IQ.
///
/// Output is 16-bit regardless of the input format: the reference tool
/// always narrows the mixer product before it leaves the process.
pub fn encode(samples: &[Complex32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 4);
    for sample in samples {
        bytes.extend_from_slice(&quantize(sample.re).to_le_bytes());
        bytes.extend_from_slice(&quantize(sample.im).to_le_bytes());
    }
    bytes
}

fn quantize(value: f32) -> i16 {
    (value.clamp(-1.0, 1.0) * 32767.0).round() as i16
}
