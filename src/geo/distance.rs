use super::point::GeoPoint;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers, haversine on a
/// spherical Earth model.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let central_angle = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * central_angle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_exactly_zero() {
        let p = GeoPoint::new(37.5, 127.0);
        assert_eq!(distance_km(p, p), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint::new(37.5, 127.0);
        let b = GeoPoint::new(35.1, 129.0);
        assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-12);
    }

    #[test]
    fn one_degree_of_latitude_at_the_equator() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        let d = distance_km(a, b);
        let expected = 111.19;
        assert!((d - expected).abs() / expected < 0.005, "got {d}");
    }

    #[test]
    fn hundredth_of_a_degree_of_latitude() {
        let a = GeoPoint::new(37.5, 127.0);
        let b = GeoPoint::new(37.51, 127.0);
        assert!((distance_km(a, b) - 1.112).abs() < 1e-3);
    }

    #[test]
    fn longitude_arc_shrinks_with_latitude() {
        let equator = distance_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
        let north = distance_km(GeoPoint::new(60.0, 0.0), GeoPoint::new(60.0, 1.0));
        assert!(north < equator / 1.9);
    }
}
