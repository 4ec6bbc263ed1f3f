//! Geographic coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0_f64;

/// A point on the Earth's surface, in degrees.
///
/// Either device-reported or typed in by the user. Construct through
/// [`Location::new`] to reject NaN, infinities and out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees, `-90..=90`.
    pub lat: f64,
    /// Longitude in degrees, `-180..=180`.
    pub lon: f64,
}

impl Location {
    /// Creates a location, returning `None` for coordinates that are not
    /// finite or fall outside the valid latitude/longitude ranges.
    #[inline]
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0_f64..=90.0_f64).contains(&lat)
            && (-180.0_f64..=180.0_f64).contains(&lon);
        valid.then_some(Self { lat, lon })
    }

    /// Returns `true` if both coordinates are finite and in range.
    ///
    /// Values deserialized from storage bypass [`Location::new`], so
    /// readers check this before trusting a cached location.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        Self::new(self.lat, self.lon).is_some()
    }

    /// Great-circle distance to `other` in kilometers (haversine).
    ///
    /// ```text
    /// a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlon/2)
    /// d = 2·R·atan2(√a, √(1−a))
    /// ```
    #[inline]
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let half_dlat = (other.lat - self.lat).to_radians() / 2.0_f64;
        let half_dlon = (other.lon - self.lon).to_radians() / 2.0_f64;

        let a = half_dlat.sin().powi(2) + lat1.cos() * lat2.cos() * half_dlon.sin().powi(2);
        // Rounding can push `a` a hair outside [0, 1] for antipodal points.
        let a_clamped = a.clamp(0.0_f64, 1.0_f64);
        2.0_f64 * EARTH_RADIUS_KM * a_clamped.sqrt().atan2((1.0_f64 - a_clamped).sqrt())
    }
}

impl core::fmt::Display for Location {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(lat: f64, lon: f64) -> Location {
        Location::new(lat, lon).unwrap()
    }

    #[test]
    fn rejects_invalid_coordinates() {
        assert!(Location::new(f64::NAN, 0.0).is_none());
        assert!(Location::new(0.0, f64::INFINITY).is_none());
        assert!(Location::new(90.5, 0.0).is_none());
        assert!(Location::new(0.0, -180.5).is_none());
        assert!(Location::new(-90.0, 180.0).is_some());
    }

    #[test]
    fn same_point_is_zero_distance() {
        let origin = loc(0.0, 0.0);
        assert!(origin.distance_km(&origin).abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (loc(19.076, 72.8777), loc(28.6139, 77.209)),
            (loc(-33.8688, 151.2093), loc(51.5074, -0.1278)),
            (loc(0.0, 179.9), loc(0.0, -179.9)),
            (loc(89.0, 10.0), loc(-89.0, -170.0)),
        ];
        for (a, b) in pairs {
            let ab = a.distance_km(&b);
            let ba = b.distance_km(&a);
            assert!((ab - ba).abs() < 1e-9, "{ab} != {ba}");
        }
    }

    #[test]
    fn mumbai_to_delhi_is_about_1150_km() {
        let mumbai = loc(19.076, 72.8777);
        let delhi = loc(28.6139, 77.209);
        let d = mumbai.distance_km(&delhi);
        assert!((1140.0..1160.0).contains(&d), "got {d}");
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = loc(10.0, 10.0).distance_km(&loc(11.0, 10.0));
        assert!((111.0..111.4).contains(&d), "got {d}");
    }

    #[test]
    fn antipodes_are_half_circumference() {
        let d = loc(0.0, 0.0).distance_km(&loc(0.0, 180.0));
        let half = core::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((d - half).abs() < 1e-6);
    }

    #[test]
    fn deserialized_location_validity() {
        let ok: Location = serde_json::from_str(r#"{"lat": 12.5, "lon": 77.0}"#).unwrap();
        assert!(ok.is_valid());
        let bad: Location = serde_json::from_str(r#"{"lat": 123.0, "lon": 77.0}"#).unwrap();
        assert!(!bad.is_valid());
    }
}
