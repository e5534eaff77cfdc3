mod emulator;
mod listener;
mod provider;
mod publisher;
mod simulated;

pub use emulator::EmulatorLocationProvider;
pub use listener::PublisherListener;
pub use provider::{LocationProvider, ProviderError};
pub use publisher::{MockLocationPublisher, PublishError, PublisherStatus};
pub use simulated::SimulatedLocationProvider;

use crate::app_config::{AppConfig, Backend};
use std::sync::Arc;

pub fn new_provider(config: &AppConfig) -> Arc<dyn LocationProvider> {
    let name = config.publisher().provider_name();
    match config.platform().backend() {
        Backend::Simulated => Arc::new(SimulatedLocationProvider::new(name, config.platform().mock_location_allowed())),
        Backend::Emulator => Arc::new(EmulatorLocationProvider::new(
            name,
            config.platform().adb_path(),
            config.platform().device_serial().map(str::to_string),
        )),
    }
}
