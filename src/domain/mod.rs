mod coordinate;
mod geo_location;
mod mock_location;
mod publish_request;

pub use coordinate::Coordinate;
pub use geo_location::GeoLocation;
pub use mock_location::MockLocation;
pub use publish_request::PublishRequest;
