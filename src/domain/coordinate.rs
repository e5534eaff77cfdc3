use std::fmt::{Display, Formatter};

pub const DEFAULT_ALTITUDE: &str = "0.0";

/// A location as extracted from user input.
///
/// The fields keep the numeric literals exactly as they appeared in the source text, conversion to
/// floating point happens when a [`PublishRequest`](crate::domain::PublishRequest) is built.
#[derive(Clone, PartialEq, Debug)]
pub struct Coordinate {
    pub latitude: String,
    pub longitude: String,
    pub altitude: String,
}

impl Coordinate {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>, altitude: Option<impl Into<String>>) -> Self {
        Coordinate {
            latitude: latitude.into(),
            longitude: longitude.into(),
            altitude: altitude.map(Into::into).unwrap_or_else(|| DEFAULT_ALTITUDE.to_string()),
        }
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.latitude, self.longitude, self.altitude)
    }
}
