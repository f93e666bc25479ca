use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use super::error::PredictError;
use super::observer::{ObserverLocation, EARTH_ROTATION_RAD_S};
use super::tle::TleRecord;
use super::types::DopplerSample;

/// SGP4 propagation bound to one satellite and one observer.
pub struct OrbitTrack {
    observer: ObserverLocation,
    elements: Elements,
    constants: Constants,
}

impl OrbitTrack {
    pub fn new(record: &TleRecord, observer: ObserverLocation) -> Result<Self, PredictError> {
        let elements = Elements::from_tle(
            Some(record.name.clone()),
            record.line1.as_bytes(),
            record.line2.as_bytes(),
        )
        .map_err(|e| PredictError::InvalidTle {
            name: record.name.clone(),
            message: e.to_string(),
        })?;

        let constants =
            Constants::from_elements(&elements).map_err(|e| PredictError::InvalidTle {
                name: record.name.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            observer,
            elements,
            constants,
        })
    }

    pub fn name(&self) -> &str {
        self.elements.object_name.as_deref().unwrap_or("unknown")
    }

    /// Topocentric look angles and range rate at `timestamp`.
    pub fn observe(&self, timestamp: DateTime<Utc>) -> Result<DopplerSample, PredictError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&timestamp.naive_utc())
            .map_err(|e| PredictError::Propagation(e.to_string()))?;

        let prediction = self
            .constants
            .propagate(minutes)
            .map_err(|e| PredictError::Propagation(e.to_string()))?;

        let sidereal = sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(
            &timestamp.naive_utc(),
        ));

        let sat_ecef = teme_to_ecef_position(prediction.position, sidereal);
        let sat_vel_ecef = teme_to_ecef_velocity(prediction.position, prediction.velocity, sidereal);

        let obs_ecef = self.observer.position_ecef_km();
        let obs_vel = self.observer.velocity_ecef_km_s();

        let dr = [
            sat_ecef[0] - obs_ecef[0],
            sat_ecef[1] - obs_ecef[1],
            sat_ecef[2] - obs_ecef[2],
        ];
        let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();

        let enu = ecef_to_enu(dr, self.observer.lat_rad(), self.observer.lon_rad());
        let azimuth_deg = enu.0.atan2(enu.1).to_degrees().rem_euclid(360.0);
        let elevation_deg = if range_km > 0.0 {
            (enu.2 / range_km).asin().to_degrees()
        } else {
            0.0
        };

        let los_unit = if range_km > 0.0 {
            [dr[0] / range_km, dr[1] / range_km, dr[2] / range_km]
        } else {
            [0.0, 0.0, 0.0]
        };
        let rel_vel = [
            sat_vel_ecef[0] - obs_vel[0],
            sat_vel_ecef[1] - obs_vel[1],
            sat_vel_ecef[2] - obs_vel[2],
        ];
        let range_rate_km_s =
            rel_vel[0] * los_unit[0] + rel_vel[1] * los_unit[1] + rel_vel[2] * los_unit[2];

        Ok(DopplerSample {
            timestamp,
            azimuth_deg,
            elevation_deg,
            range_km,
            range_rate_km_s,
        })
    }
}

fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

fn teme_to_ecef_velocity(pos_teme: [f64; 3], vel_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    let pos = teme_to_ecef_position(pos_teme, gmst);
    let rotated = [
        vel_teme[0] * cos_gmst + vel_teme[1] * sin_gmst,
        -vel_teme[0] * sin_gmst + vel_teme[1] * cos_gmst,
        vel_teme[2],
    ];
    let rotation = [
        -EARTH_ROTATION_RAD_S * pos[1],
        EARTH_ROTATION_RAD_S * pos[0],
        0.0,
    ];
    [
        rotated[0] - rotation[0],
        rotated[1] - rotation[1],
        rotated[2] - rotation[2],
    ]
}

fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enu_axes_at_the_equator_prime_meridian() {
        // At lat 0, lon 0: ECEF +Y is east, +Z is north, +X is up.
        let (e, n, u) = ecef_to_enu([0.0, 1.0, 0.0], 0.0, 0.0);
        assert!((e - 1.0).abs() < 1e-12 && n.abs() < 1e-12 && u.abs() < 1e-12);

        let (e, n, u) = ecef_to_enu([0.0, 0.0, 1.0], 0.0, 0.0);
        assert!(e.abs() < 1e-12 && (n - 1.0).abs() < 1e-12 && u.abs() < 1e-12);

        let (e, n, u) = ecef_to_enu([1.0, 0.0, 0.0], 0.0, 0.0);
        assert!(e.abs() < 1e-12 && n.abs() < 1e-12 && (u - 1.0).abs() < 1e-12);
    }

    #[test]
    fn teme_rotation_preserves_vector_length() {
        let pos = [4000.0, -3000.0, 5000.0];
        let rotated = teme_to_ecef_position(pos, 1.234);
        let before = (pos[0] * pos[0] + pos[1] * pos[1] + pos[2] * pos[2]).sqrt();
        let after =
            (rotated[0] * rotated[0] + rotated[1] * rotated[1] + rotated[2] * rotated[2]).sqrt();
        assert!((before - after).abs() < 1e-9);
    }
}
