use chrono::{DateTime, Utc};

/// One look at the satellite from the observer at a given instant.
#[derive(Debug, Clone)]
pub struct DopplerSample {
    pub timestamp: DateTime<Utc>,
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub range_km: f64,
    pub range_rate_km_s: f64,
}
