/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometers, using the
/// haversine formula. NaN inputs propagate; callers validate coordinates.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_same_point() {
        assert_eq!(distance_km(48.8566, 2.3522, 48.8566, 2.3522), 0.0);
    }

    #[test]
    fn paris_to_london() {
        // Notre-Dame to Big Ben, roughly 340 km.
        let d = distance_km(48.8530, 2.3499, 51.5007, -0.1246);
        assert!((d - 340.7).abs() < 2.0, "got {d}");
    }

    #[test]
    fn symmetric() {
        let ab = distance_km(40.7128, -74.0060, 34.0522, -118.2437);
        let ba = distance_km(34.0522, -118.2437, 40.7128, -74.0060);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn nan_propagates() {
        assert!(distance_km(f64::NAN, 0.0, 0.0, 0.0).is_nan());
    }
}
