//! Great-circle distance and proximity queries.
//!
//! Earth is treated as a sphere of radius 6371 km. The error against the
//! WGS84 ellipsoid is well under 0.5% at the scale of Japan, which is fine
//! for picking the closest weather station.
//!
//! The directory is small (about 1,300 stations), so both queries are a
//! linear scan with no spatial index.

use std::cmp::Ordering;

use crate::domain::GeoPoint;

use super::record::StationRecord;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometres.
///
/// ```
/// use jma_server::domain::GeoPoint;
/// use jma_server::stations::haversine_km;
///
/// let tokyo = GeoPoint::new(35.6917, 139.75).unwrap();
/// let osaka = GeoPoint::new(34.6817, 135.5183).unwrap();
/// let d = haversine_km(tokyo, osaka);
/// assert!((d - 400.0).abs() < 10.0);
/// ```
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.lon() - a.lon()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    // Rounding can push h a hair above 1 for antipodal points.
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Order by distance, then by ascending station code.
fn by_distance_then_code(a: &(&StationRecord, f64), b: &(&StationRecord, f64)) -> Ordering {
    a.1.total_cmp(&b.1).then_with(|| a.0.code.cmp(&b.0.code))
}

/// The station closest to `origin`, with its distance.
///
/// Equal distances resolve to the lower station code. Returns `None` only
/// when `candidates` is empty.
pub fn nearest<'a>(
    origin: GeoPoint,
    candidates: impl IntoIterator<Item = &'a StationRecord>,
) -> Option<(&'a StationRecord, f64)> {
    candidates
        .into_iter()
        .map(|s| (s, haversine_km(origin, s.location)))
        .min_by(by_distance_then_code)
}

/// All stations within `radius_km` of `origin` (inclusive), closest first.
///
/// Equal distances are ordered by ascending station code.
pub fn within_radius<'a>(
    origin: GeoPoint,
    candidates: impl IntoIterator<Item = &'a StationRecord>,
    radius_km: f64,
) -> Vec<(&'a StationRecord, f64)> {
    let mut hits: Vec<_> = candidates
        .into_iter()
        .map(|s| (s, haversine_km(origin, s.location)))
        .filter(|(_, d)| *d <= radius_km)
        .collect();

    hits.sort_by(by_distance_then_code);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Prefecture, StationCode, StationType};
    use crate::stations::StationName;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn station(code: &str, lat: f64, lon: f64) -> StationRecord {
        let code = StationCode::parse(code).unwrap();
        StationRecord {
            code,
            name: StationName {
                ja: code.to_string(),
                kana: String::new(),
                en: String::new(),
            },
            station_type: StationType::C,
            location: point(lat, lon),
            altitude_m: None,
            elements: None,
            prefecture: Prefecture::for_station(code).unwrap(),
        }
    }

    #[test]
    fn zero_distance_to_self() {
        let p = point(35.6917, 139.75);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn tokyo_to_osaka_reference_distance() {
        // Observatory to observatory, about 400.6 km on the sphere.
        let tokyo = point(35.6917, 139.75);
        let osaka = point(34.6817, 135.5183);
        let d = haversine_km(tokyo, osaka);
        assert!((d - 400.6).abs() / 400.6 < 0.005, "got {d}");
    }

    #[test]
    fn one_degree_of_latitude() {
        // 2 * pi * 6371 / 360
        let d = haversine_km(point(0.0, 0.0), point(1.0, 0.0));
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn antipodal_points_are_half_circumference() {
        let d = haversine_km(point(0.0, 0.0), point(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn nearest_picks_closest() {
        let stations = [
            station("44132", 35.6917, 139.75),
            station("62078", 34.6817, 135.5183),
            station("14163", 43.06, 141.3283),
        ];

        let (s, d) = nearest(point(34.7, 135.5), &stations).unwrap();
        assert_eq!(s.code.as_str(), "62078");
        assert!(d < 5.0);
    }

    #[test]
    fn nearest_of_nothing_is_none() {
        let stations: [StationRecord; 0] = [];
        assert!(nearest(point(0.0, 0.0), &stations).is_none());
    }

    #[test]
    fn nearest_tie_breaks_on_code() {
        // Same coordinates, listed out of code order.
        let stations = [
            station("44136", 35.7, 139.7),
            station("44132", 35.7, 139.7),
        ];

        let (s, _) = nearest(point(35.7, 139.7), &stations).unwrap();
        assert_eq!(s.code.as_str(), "44132");
    }

    #[test]
    fn within_radius_sorted_and_filtered() {
        let stations = [
            station("44132", 35.6917, 139.75),
            station("44166", 35.5533, 139.78),
            station("44136", 35.735, 139.6717),
            station("62078", 34.6817, 135.5183),
        ];

        let hits = within_radius(point(35.6812, 139.7671), &stations, 30.0);
        let codes: Vec<_> = hits.iter().map(|(s, _)| s.code.as_str()).collect();
        assert_eq!(codes, vec!["44132", "44136", "44166"]);

        let distances: Vec<_> = hits.iter().map(|(_, d)| *d).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn within_radius_tie_breaks_on_code() {
        let stations = [
            station("44200", 36.0, 140.0),
            station("44100", 36.0, 140.0),
        ];

        let hits = within_radius(point(36.0, 140.0), &stations, 1.0);
        let codes: Vec<_> = hits.iter().map(|(s, _)| s.code.as_str()).collect();
        assert_eq!(codes, vec!["44100", "44200"]);
    }

    #[test]
    fn within_radius_can_be_empty() {
        let stations = [station("44132", 35.6917, 139.75)];
        assert!(within_radius(point(0.0, 0.0), &stations, 10.0).is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_point() -> impl Strategy<Value = GeoPoint> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| GeoPoint::new(lat, lon).unwrap())
    }

    proptest! {
        /// distance(A, B) == distance(B, A)
        #[test]
        fn symmetric(a in any_point(), b in any_point()) {
            let ab = haversine_km(a, b);
            let ba = haversine_km(b, a);
            prop_assert!((ab - ba).abs() <= 1e-9 * ab.max(1.0));
        }

        /// Distances are non-negative and bounded by half the circumference
        #[test]
        fn bounded(a in any_point(), b in any_point()) {
            let d = haversine_km(a, b);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
        }

        /// Triangle inequality holds on the sphere
        #[test]
        fn triangle_inequality(a in any_point(), b in any_point(), c in any_point()) {
            let ab = haversine_km(a, b);
            let bc = haversine_km(b, c);
            let ac = haversine_km(a, c);
            prop_assert!(ac <= ab + bc + 1e-3);
        }
    }
}
