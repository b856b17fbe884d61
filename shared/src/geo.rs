use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

/// A validated geographic position in degrees.
///
/// Fields are private so a point can only be built through [`GeoPoint::new`]
/// (or deserialized, which runs the same checks).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPoint")]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawPoint {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawPoint> for GeoPoint {
    type Error = CoordinateError;

    fn try_from(raw: RawPoint) -> Result<Self, Self::Error> {
        GeoPoint::new(raw.lat, raw.lng)
    }
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::Latitude(lat));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateError::Longitude(lng));
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

/// Great-circle distance in meters between two points (haversine).
pub fn distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lng - a.lng).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();

    // Rounding can push `h` a hair past 1.0 for antipodal points.
    let h = (sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon).clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Sum of the legs between consecutive points.
pub fn path_distance(path: &[GeoPoint]) -> f64 {
    path.windows(2).map(|w| distance(w[0], w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).expect("valid point")
    }

    #[test]
    fn test_distance_same_point() {
        let p = point(28.6139, 77.2090);
        assert_eq!(distance(p, p), 0.0);
    }

    #[test]
    fn test_distance_symmetry() {
        let a = point(45.0, 5.0);
        let b = point(46.0, 6.0);
        assert_eq!(distance(a, b), distance(b, a));
    }

    #[test]
    fn test_distance_delhi_fixture() {
        let d = distance(point(28.6139, 77.2090), point(28.6239, 77.2190));
        assert!((d - 1414.0).abs() < 1414.0 * 0.05, "got {d} m");
    }

    #[test]
    fn test_distance_across_antimeridian() {
        let west = point(0.0, 179.9995);
        let east = point(0.0, -179.9995);
        let d = distance(west, east);
        // 0.001 degree of longitude at the equator.
        assert!((d - 111.19).abs() < 0.5, "got {d} m");
    }

    #[test]
    fn test_distance_antipodal_is_half_circumference() {
        let d = distance(point(0.0, 0.0), point(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_M).abs() < 1.0);
    }

    #[test]
    fn test_l_shape_sums_both_legs() {
        let path = [point(0.0, 0.0), point(0.0, 1.0), point(1.0, 1.0)];

        // Each leg is exactly one degree along a great circle through the equator / a meridian.
        let one_degree = EARTH_RADIUS_M * 1.0_f64.to_radians();
        let leg1 = distance(path[0], path[1]);
        let leg2 = distance(path[1], path[2]);
        assert!((leg1 - one_degree).abs() < 1e-6);
        assert!((leg2 - one_degree).abs() < 1e-6);
        assert!((path_distance(&path) - (leg1 + leg2)).abs() < 1e-9);
    }

    #[test]
    fn test_path_distance_short_paths() {
        assert_eq!(path_distance(&[]), 0.0);
        assert_eq!(path_distance(&[point(45.0, 5.0)]), 0.0);
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert_eq!(GeoPoint::new(90.5, 0.0), Err(CoordinateError::Latitude(90.5)));
        assert_eq!(GeoPoint::new(0.0, -181.0), Err(CoordinateError::Longitude(-181.0)));
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
        assert!(GeoPoint::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: GeoPoint = serde_json::from_str(r#"{"lat":28.6,"lng":77.2}"#).unwrap();
        assert_eq!(ok, point(28.6, 77.2));
        assert!(serde_json::from_str::<GeoPoint>(r#"{"lat":128.6,"lng":77.2}"#).is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn valid_point() -> impl Strategy<Value = GeoPoint> {
            (-90.0..=90.0, -180.0..=180.0).prop_map(|(lat, lng)| point(lat, lng))
        }

        proptest! {
            #[test]
            fn prop_distance_non_negative(a in valid_point(), b in valid_point()) {
                prop_assert!(distance(a, b) >= 0.0);
            }

            #[test]
            fn prop_distance_symmetric(a in valid_point(), b in valid_point()) {
                prop_assert!((distance(a, b) - distance(b, a)).abs() < 1e-6);
            }

            #[test]
            fn prop_distance_same_point_is_zero(p in valid_point()) {
                prop_assert_eq!(distance(p, p), 0.0);
            }

            #[test]
            fn prop_distance_bounded_by_half_circumference(a in valid_point(), b in valid_point()) {
                let max_distance = std::f64::consts::PI * EARTH_RADIUS_M;
                prop_assert!(distance(a, b) <= max_distance + 1.0);
            }

            #[test]
            fn prop_path_distance_grows_when_appending(
                path in prop::collection::vec(valid_point(), 1..10),
                next in valid_point()
            ) {
                let before = path_distance(&path);
                let mut extended = path.clone();
                extended.push(next);
                prop_assert!(path_distance(&extended) >= before);
            }
        }
    }
}
