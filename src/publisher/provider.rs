use crate::domain::MockLocation;
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

/// The platform's test location channel.
///
/// Mirrors the lifecycle of a mock provider: it is registered, enabled, fed samples and finally
/// removed again. Registering an already registered provider must succeed.
#[async_trait]
pub trait LocationProvider: Debug + Send + Sync {
    fn name(&self) -> &str;

    async fn add_test_provider(&self) -> Result<(), ProviderError>;

    async fn set_test_provider_enabled(&self, enabled: bool) -> Result<(), ProviderError>;

    async fn set_test_provider_location(&self, location: &MockLocation) -> Result<(), ProviderError>;

    async fn remove_test_provider(&self) -> Result<(), ProviderError>;
}

#[derive(Error, Clone, PartialEq, Debug)]
pub enum ProviderError {
    #[error("not allowed to mock locations: {0}")]
    PermissionDenied(String),
    #[error("unknown test provider '{0}'")]
    UnknownProvider(String),
    #[error("platform error: {0}")]
    Platform(String),
}
