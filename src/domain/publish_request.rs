use crate::domain::{Coordinate, GeoLocation};
use std::time::Duration;

/// Parameters of a publishing session.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PublishRequest {
    pub location: GeoLocation,
    pub refresh_interval: Duration,
}

impl PublishRequest {
    pub fn new(location: GeoLocation, refresh_interval: Duration) -> Self {
        PublishRequest { location, refresh_interval }
    }

    /// Builds a request from raw form fields.
    ///
    /// Coordinates that are missing or don't parse become `0.0`. The refresh interval falls back to
    /// `default_refresh_interval` when it is missing, unparseable or zero.
    pub fn from_fields(
        latitude: Option<&str>,
        longitude: Option<&str>,
        altitude: Option<&str>,
        refresh_interval_ms: Option<&str>,
        default_refresh_interval: Duration,
    ) -> Self {
        let refresh_interval = refresh_interval_ms
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(default_refresh_interval);

        let location = GeoLocation {
            latitude: parse_or_zero(latitude),
            longitude: parse_or_zero(longitude),
            altitude: parse_or_zero(altitude),
        };
        PublishRequest::new(location, refresh_interval)
    }

    pub fn from_coordinate(coordinate: &Coordinate, refresh_interval_ms: Option<&str>, default_refresh_interval: Duration) -> Self {
        PublishRequest::from_fields(
            Some(&coordinate.latitude),
            Some(&coordinate.longitude),
            Some(&coordinate.altitude),
            refresh_interval_ms,
            default_refresh_interval,
        )
    }
}

fn parse_or_zero(value: Option<&str>) -> f64 {
    value.and_then(|value| value.trim().parse::<f64>().ok()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(2000);

    #[test]
    fn parses_all_fields() {
        let request = PublishRequest::from_fields(Some("37.4219"), Some("-122.0841"), Some("12"), Some("500"), DEFAULT_REFRESH_INTERVAL);

        assert_eq!(
            request,
            PublishRequest {
                location: GeoLocation {
                    latitude: 37.4219,
                    longitude: -122.0841,
                    altitude: 12.0,
                },
                refresh_interval: Duration::from_millis(500),
            }
        );
    }

    #[rstest]
    #[case::missing(None)]
    #[case::empty(Some(""))]
    #[case::not_a_number(Some("fast"))]
    #[case::negative(Some("-100"))]
    #[case::zero(Some("0"))]
    fn falls_back_to_the_default_refresh_interval(#[case] refresh_interval_ms: Option<&str>) {
        let request = PublishRequest::from_fields(Some("1.0"), Some("2.0"), None, refresh_interval_ms, DEFAULT_REFRESH_INTERVAL);
        assert_eq!(request.refresh_interval, Duration::from_millis(2000));
    }

    #[test]
    fn unparseable_coordinates_become_zero() {
        let request = PublishRequest::from_fields(Some("north"), None, Some(""), None, DEFAULT_REFRESH_INTERVAL);
        assert_eq!(request.location, GeoLocation::default());
    }

    #[test]
    fn converts_an_extracted_coordinate() {
        let coordinate = Coordinate::new("12.9", "77.6", None::<String>);
        let request = PublishRequest::from_coordinate(&coordinate, Some("1000"), DEFAULT_REFRESH_INTERVAL);

        assert_eq!(request.location.latitude, 12.9);
        assert_eq!(request.location.longitude, 77.6);
        assert_eq!(request.location.altitude, 0.0);
        assert_eq!(request.refresh_interval, Duration::from_secs(1));
    }
}
