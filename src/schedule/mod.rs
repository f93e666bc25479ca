mod telemetry;

pub use telemetry::EventLog;

use chrono::{DateTime, Duration, Utc};

use crate::predict::{OrbitTrack, PredictError};

pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Snapshot cadence when "now" is the wall clock.
const LIVE_REPORT_SECONDS: i64 = 1;
/// Snapshot cadence when time is derived from the sample count.
const SIMULATED_REPORT_SECONDS: i64 = 5;

/// Where "now" comes from when the correction frequency is evaluated.
#[derive(Debug, Clone, Copy)]
pub enum Timebase {
    /// Wall clock at the moment of the query.
    Live,
    /// Fixed start instant advanced by the cumulative sample count.
    Simulated { start: DateTime<Utc> },
}

impl Timebase {
    pub fn at(&self, elapsed_samples: u64, samplerate: u32) -> DateTime<Utc> {
        match self {
            Timebase::Live => Utc::now(),
            Timebase::Simulated { start } => {
                let micros = (elapsed_samples as i128 * 1_000_000 / samplerate as i128) as i64;
                *start + Duration::microseconds(micros)
            }
        }
    }

    fn report_interval(&self) -> Duration {
        match self {
            Timebase::Live => Duration::seconds(LIVE_REPORT_SECONDS),
            Timebase::Simulated { .. } => Duration::seconds(SIMULATED_REPORT_SECONDS),
        }
    }
}

/// First-order Doppler correction for a received carrier. An approaching
/// satellite (negative range rate) shifts the carrier up, so the
/// correction is positive.
pub fn doppler_shift_hz(range_rate_km_s: f64, carrier_hz: f64) -> f64 {
    -(range_rate_km_s * 1000.0 / SPEED_OF_LIGHT_M_S) * carrier_hz
}

enum Correction {
    Constant {
        shift_hz: f64,
    },
    Doppler {
        track: OrbitTrack,
        carrier_hz: f64,
        offset_hz: f64,
    },
}

/// Decides, once per block, what the correction frequency currently is.
///
/// In Doppler mode it also emits periodic tracking snapshots through the
/// [`EventLog`]; the cadence follows the timebase, not the block size.
pub struct FrequencySchedule {
    correction: Correction,
    timebase: Timebase,
    samplerate: u32,
    events: EventLog,
    last_report: Option<DateTime<Utc>>,
}

impl FrequencySchedule {
    pub fn constant(shift_hz: f64, samplerate: u32) -> Self {
        Self {
            correction: Correction::Constant { shift_hz },
            timebase: Timebase::Live,
            samplerate,
            events: EventLog::live(),
            last_report: None,
        }
    }

    pub fn doppler(
        track: OrbitTrack,
        carrier_hz: f64,
        offset_hz: f64,
        timebase: Timebase,
        samplerate: u32,
        events: EventLog,
    ) -> Self {
        Self {
            correction: Correction::Doppler {
                track,
                carrier_hz,
                offset_hz,
            },
            timebase,
            samplerate,
            events,
            last_report: None,
        }
    }

    /// Correction frequency for the block starting at `elapsed_samples`.
    ///
    /// Queried once per block, before mixing; the result is held for the
    /// whole block.
    pub fn current_shift_hz(&mut self, elapsed_samples: u64) -> Result<f64, PredictError> {
        match &self.correction {
            Correction::Constant { shift_hz } => Ok(*shift_hz),
            Correction::Doppler {
                track,
                carrier_hz,
                offset_hz,
            } => {
                let now = self.timebase.at(elapsed_samples, self.samplerate);
                let sample = track.observe(now)?;
                let doppler_hz = doppler_shift_hz(sample.range_rate_km_s, *carrier_hz);

                let due = match self.last_report {
                    None => true,
                    Some(previous) => {
                        sample.timestamp - previous >= self.timebase.report_interval()
                    }
                };
                if due {
                    self.last_report = Some(sample.timestamp);
                    self.events.record(&sample, *carrier_hz, doppler_hz);
                }

                Ok(doppler_hz + offset_hz)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn zero_range_rate_means_zero_shift() {
        assert_eq!(doppler_shift_hz(0.0, 437_505_000.0), 0.0);
    }

    #[test]
    fn known_range_rate_gives_exact_shift() {
        let shift = doppler_shift_hz(-7.0, 437_505_000.0);
        let expected = -(-7.0 * 1000.0 / 299_792_458.0) * 437_505_000.0;
        assert_eq!(shift, expected);
        assert!(shift > 0.0, "approaching satellite must shift up");

        let receding = doppler_shift_hz(3.2, 145_800_000.0);
        assert!(receding < 0.0);
    }

    #[test]
    fn simulated_timebase_advances_with_sample_count() {
        let start = Utc.with_ymd_and_hms(2015, 6, 1, 12, 0, 0).unwrap();
        let timebase = Timebase::Simulated { start };

        assert_eq!(timebase.at(0, 1_024_000), start);
        assert_eq!(
            timebase.at(1_024_000, 1_024_000),
            start + Duration::seconds(1)
        );
        assert_eq!(
            timebase.at(512_000, 1_024_000),
            start + Duration::milliseconds(500)
        );
    }

    #[test]
    fn constant_schedule_is_flat() {
        let mut schedule = FrequencySchedule::constant(-2500.0, 48_000);
        assert_eq!(schedule.current_shift_hz(0).unwrap(), -2500.0);
        assert_eq!(schedule.current_shift_hz(1_000_000).unwrap(), -2500.0);
    }
}
