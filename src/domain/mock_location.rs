use crate::domain::GeoLocation;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// A single sample written to the platform's test provider.
#[derive(Clone, PartialEq, Debug)]
pub struct MockLocation {
    pub provider: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub accuracy: f32, // In meters
    pub time: DateTime<Utc>,
    pub elapsed_realtime: Duration,
}

impl MockLocation {
    pub fn new(provider: &str, location: GeoLocation, accuracy: f32, elapsed_realtime: Duration) -> Self {
        MockLocation {
            provider: provider.to_string(),
            latitude: location.latitude,
            longitude: location.longitude,
            altitude: location.altitude,
            accuracy,
            time: Utc::now(),
            elapsed_realtime,
        }
    }

    #[cfg(test)]
    pub fn geo_location(&self) -> GeoLocation {
        GeoLocation {
            latitude: self.latitude,
            longitude: self.longitude,
            altitude: self.altitude,
        }
    }
}
