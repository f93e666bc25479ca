use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use log::{info, warn};

use crate::predict::DopplerSample;

/// Sink for tracking snapshots: file-backed when the operator asked for
/// an event log, otherwise the lines go to the status log.
pub struct EventLog {
    sink: Option<Box<dyn Write + Send>>,
}

impl EventLog {
    /// Emit snapshots through the status log only.
    pub fn live() -> Self {
        Self { sink: None }
    }

    /// Append snapshots to a file.
    pub fn to_file(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            sink: Some(Box::new(BufWriter::new(file))),
        })
    }

    pub fn to_writer(writer: Box<dyn Write + Send>) -> Self {
        Self { sink: Some(writer) }
    }

    /// Record one snapshot. A failed write is reported and swallowed so
    /// telemetry trouble never stops the mixing path.
    pub fn record(&mut self, sample: &DopplerSample, carrier_hz: f64, doppler_hz: f64) {
        let observation = format!(
            "{} jd {:.5} az {:.2} el {:.2} range {:.0} km rate {:.3} km/s",
            sample.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            julian_day(&sample.timestamp),
            sample.azimuth_deg,
            sample.elevation_deg,
            sample.range_km,
            sample.range_rate_km_s,
        );
        let correction = format!(
            "carrier {:.6} MHz doppler {:.2} Hz",
            carrier_hz / 1_000_000.0,
            doppler_hz,
        );

        match &mut self.sink {
            Some(writer) => {
                let result = writeln!(writer, "{observation}\n{correction}")
                    .and_then(|_| writer.flush());
                if let Err(e) = result {
                    warn!("event log write failed: {e}");
                }
            }
            None => {
                info!("{observation}");
                info!("{correction}");
            }
        }
    }
}

/// Fractional days since the julian epoch.
pub fn julian_day(at: &DateTime<Utc>) -> f64 {
    at.timestamp_micros() as f64 / 86_400e6 + 2_440_587.5
}
