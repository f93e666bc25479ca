pub const EARTH_ROTATION_RAD_S: f64 = 7.292_115e-5;

/// Geodetic observer position, WGS-84 degrees and meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverLocation {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

impl ObserverLocation {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        }
    }

    /// Parse a `lat,lon,alt` triple (degrees, degrees, meters).
    pub fn parse(s: &str) -> Result<Self, String> {
        let parts: Vec<_> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err("expected lat,lon,alt, for example 58.64560,23.15163,7.8".to_string());
        }
        let lat: f64 = parts[0]
            .parse()
            .map_err(|_| format!("invalid latitude {:?}", parts[0]))?;
        let lon: f64 = parts[1]
            .parse()
            .map_err(|_| format!("invalid longitude {:?}", parts[1]))?;
        let alt: f64 = parts[2]
            .parse()
            .map_err(|_| format!("invalid altitude {:?}", parts[2]))?;
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!("latitude {lat} outside -90..90"));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(format!("longitude {lon} outside -180..180"));
        }
        Ok(Self::new(lat, lon, alt))
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        // WGS-84 constants
        let a = 6378.137;
        let e2 = 0.00669437999014;
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let sin_lon = lon.sin();
        let cos_lon = lon.cos();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let alt_km = self.altitude_m / 1000.0;
        let x = (n + alt_km) * cos_lat * cos_lon;
        let y = (n + alt_km) * cos_lat * sin_lon;
        let z = (n * (1.0 - e2) + alt_km) * sin_lat;
        [x, y, z]
    }

    pub fn velocity_ecef_km_s(&self) -> [f64; 3] {
        let pos = self.position_ecef_km();
        [
            -EARTH_ROTATION_RAD_S * pos[1],
            EARTH_ROTATION_RAD_S * pos[0],
            0.0,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equator_position_lies_on_the_x_axis() {
        let pos = ObserverLocation::new(0.0, 0.0, 0.0).position_ecef_km();
        assert!((pos[0] - 6378.137).abs() < 1e-6);
        assert!(pos[1].abs() < 1e-9);
        assert!(pos[2].abs() < 1e-9);
    }

    #[test]
    fn parse_accepts_triple_and_rejects_junk() {
        let loc = ObserverLocation::parse("58.64560, 23.15163, 7.8").unwrap();
        assert!((loc.latitude_deg - 58.6456).abs() < 1e-9);
        assert!((loc.longitude_deg - 23.15163).abs() < 1e-9);
        assert!((loc.altitude_m - 7.8).abs() < 1e-9);

        assert!(ObserverLocation::parse("58.6,23.1").is_err());
        assert!(ObserverLocation::parse("91.0,0.0,0.0").is_err());
        assert!(ObserverLocation::parse("a,b,c").is_err());
    }
}
