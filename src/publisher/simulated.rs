use crate::domain::MockLocation;
use crate::publisher::{LocationProvider, ProviderError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

/// An in-memory test provider.
///
/// Keeps track of its registration state and every sample written to it. Writes are denied while
/// mocking locations is not allowed, like a device where this app is not selected as the mock
/// location app.
#[derive(Debug)]
pub struct SimulatedLocationProvider {
    name: String,
    mock_location_allowed: AtomicBool,
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    registered: bool,
    enabled: bool,
    locations: Vec<MockLocation>,
}

impl SimulatedLocationProvider {
    pub fn new(name: &str, mock_location_allowed: bool) -> Self {
        SimulatedLocationProvider {
            name: name.to_string(),
            mock_location_allowed: AtomicBool::new(mock_location_allowed),
            state: Mutex::new(State::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_allowed(&self) -> Result<(), ProviderError> {
        if self.mock_location_allowed.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ProviderError::PermissionDenied("this app is not the selected mock location app".to_string()))
        }
    }
}

#[cfg(test)]
impl SimulatedLocationProvider {
    pub fn set_mock_location_allowed(&self, allowed: bool) {
        self.mock_location_allowed.store(allowed, Ordering::SeqCst);
    }

    pub fn is_registered(&self) -> bool {
        self.state().registered
    }

    pub fn is_enabled(&self) -> bool {
        self.state().enabled
    }

    pub fn locations(&self) -> Vec<MockLocation> {
        self.state().locations.clone()
    }

    pub fn last_location(&self) -> Option<MockLocation> {
        self.state().locations.last().cloned()
    }
}

#[async_trait]
impl LocationProvider for SimulatedLocationProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn add_test_provider(&self) -> Result<(), ProviderError> {
        self.check_allowed()?;
        self.state().registered = true;
        debug!(provider = self.name, "Registered test provider");
        Ok(())
    }

    async fn set_test_provider_enabled(&self, enabled: bool) -> Result<(), ProviderError> {
        self.check_allowed()?;
        let mut state = self.state();
        if !state.registered {
            return Err(ProviderError::UnknownProvider(self.name.clone()));
        }
        state.enabled = enabled;
        Ok(())
    }

    async fn set_test_provider_location(&self, location: &MockLocation) -> Result<(), ProviderError> {
        self.check_allowed()?;
        let mut state = self.state();
        if !state.registered || location.provider != self.name {
            return Err(ProviderError::UnknownProvider(location.provider.clone()));
        }
        trace!(provider = self.name, ?location, "Set test provider location");
        state.locations.push(location.clone());
        Ok(())
    }

    async fn remove_test_provider(&self) -> Result<(), ProviderError> {
        let mut state = self.state();
        if !state.registered {
            return Err(ProviderError::UnknownProvider(self.name.clone()));
        }
        debug!(provider = self.name, enabled = state.enabled, samples = state.locations.len(), "Removing test provider");
        state.registered = false;
        state.enabled = false;
        Ok(())
    }
}
