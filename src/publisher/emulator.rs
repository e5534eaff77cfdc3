use crate::domain::MockLocation;
use crate::publisher::{LocationProvider, ProviderError};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument, trace};

/// Feeds samples to an Android emulator through its console (`adb emu geo fix`).
///
/// The emulator has no notion of registering a test provider, so registration, enabling and
/// removal always succeed.
#[derive(Debug)]
pub struct EmulatorLocationProvider {
    name: String,
    adb_path: String,
    device_serial: Option<String>,
}

impl EmulatorLocationProvider {
    pub fn new(name: &str, adb_path: &str, device_serial: Option<String>) -> Self {
        EmulatorLocationProvider {
            name: name.to_string(),
            adb_path: adb_path.to_string(),
            device_serial,
        }
    }

    fn geo_fix_args(&self, location: &MockLocation) -> Vec<String> {
        let mut args = Vec::with_capacity(8);
        if let Some(serial) = &self.device_serial {
            args.push("-s".to_string());
            args.push(serial.clone());
        }
        // Longitude goes first
        args.extend(["emu", "geo", "fix"].map(str::to_string));
        args.push(location.longitude.to_string());
        args.push(location.latitude.to_string());
        args.push(location.altitude.to_string());
        args
    }
}

#[async_trait]
impl LocationProvider for EmulatorLocationProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn add_test_provider(&self) -> Result<(), ProviderError> {
        debug!(provider = self.name, "Emulator console needs no test provider registration");
        Ok(())
    }

    async fn set_test_provider_enabled(&self, _enabled: bool) -> Result<(), ProviderError> {
        Ok(())
    }

    #[instrument(skip_all)]
    async fn set_test_provider_location(&self, location: &MockLocation) -> Result<(), ProviderError> {
        let args = self.geo_fix_args(location);
        trace!(adb = self.adb_path, ?args, "Sending geo fix to the emulator");

        let output = Command::new(&self.adb_path)
            .args(&args)
            .output()
            .await
            .map_err(|e| ProviderError::Platform(format!("could not run '{}': {}", self.adb_path, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProviderError::Platform(format!("adb exited with {}: {}", output.status, stderr.trim())));
        }

        // The console answers "KO: <reason>" when it refuses a command, e.g. when authentication is required
        let stdout = String::from_utf8_lossy(&output.stdout);
        if let Some(reason) = stdout.lines().find(|line| line.starts_with("KO")) {
            return Err(ProviderError::PermissionDenied(reason.to_string()));
        }

        Ok(())
    }

    async fn remove_test_provider(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
