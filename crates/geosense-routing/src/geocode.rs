//! Built-in place lookup used until the backend exposes geocoding.

use crate::model::GeoPoint;

/// India Gate, New Delhi
pub const DEFAULT_LOCATION: GeoPoint = GeoPoint {
    lat: 28.6139,
    lon: 77.2090,
};

const KNOWN_PLACES: &[(&str, GeoPoint)] = &[
    ("india gate", DEFAULT_LOCATION),
    (
        "mumbai",
        GeoPoint {
            lat: 19.0760,
            lon: 72.8777,
        },
    ),
    (
        "connaught place",
        GeoPoint {
            lat: 28.6304,
            lon: 77.2177,
        },
    ),
    (
        "noida",
        GeoPoint {
            lat: 28.5355,
            lon: 77.3910,
        },
    ),
];

/// Resolve a place name, falling back to [`DEFAULT_LOCATION`].
pub fn geocode(name: &str) -> GeoPoint {
    let normalized = name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();

    KNOWN_PLACES
        .iter()
        .find(|(place, _)| *place == normalized)
        .map(|(_, point)| *point)
        .unwrap_or_else(|| {
            tracing::debug!(place = %name, "Unknown place, using default location");
            DEFAULT_LOCATION
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_place_is_case_and_space_insensitive() {
        let point = geocode("  Connaught   PLACE ");
        assert_eq!(point.lat, 28.6304);
        assert_eq!(point.lon, 77.2177);
    }

    #[test]
    fn test_unknown_place_defaults() {
        assert_eq!(geocode("Atlantis"), DEFAULT_LOCATION);
        assert_eq!(geocode(""), DEFAULT_LOCATION);
    }
}
