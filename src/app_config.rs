use config::{Config, ConfigError};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    publisher: Publisher,
    resolver: Resolver,
    platform: Platform,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::with_prefix("MOCKLOCATION").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }
}

#[derive(Debug, Deserialize)]
pub struct Publisher {
    refresh_interval_ms: u64,
    accuracy_m: f32,
    provider_name: String,
}

impl Publisher {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn accuracy_m(&self) -> f32 {
        self.accuracy_m
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }
}

#[derive(Debug, Deserialize)]
pub struct Resolver {
    map_url_prefix: String,
    short_link_prefixes: Vec<String>,
    max_redirects: usize,
    #[serde(with = "humantime_serde")]
    request_timeout: Duration,
}

impl Resolver {
    pub fn map_url_prefix(&self) -> &str {
        &self.map_url_prefix
    }

    pub fn short_link_prefixes(&self) -> &[String] {
        &self.short_link_prefixes
    }

    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    Simulated,
    Emulator,
}

#[derive(Debug, Deserialize)]
pub struct Platform {
    backend: Backend,
    adb_path: String,
    device_serial: Option<String>,
    #[serde(default = "default_mock_location_allowed")]
    mock_location_allowed: bool,
}

fn default_mock_location_allowed() -> bool {
    true
}

impl Platform {
    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn adb_path(&self) -> &str {
        &self.adb_path
    }

    pub fn device_serial(&self) -> Option<&str> {
        self.device_serial.as_deref()
    }

    pub fn mock_location_allowed(&self) -> bool {
        self.mock_location_allowed
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                publisher: Publisher {
                    refresh_interval_ms: 2000,
                    accuracy_m: 1.0,
                    provider_name: "gps".to_string(),
                },
                resolver: Resolver {
                    map_url_prefix: "https://www.google.com/maps/".to_string(),
                    short_link_prefixes: vec!["https://maps.app.goo.gl/".to_string(), "https://goo.gl/maps/".to_string()],
                    max_redirects: 5,
                    request_timeout: Duration::from_secs(5),
                },
                platform: Platform {
                    backend: Backend::Simulated,
                    adb_path: "adb".to_string(),
                    device_serial: None,
                    mock_location_allowed: true,
                },
            },
        }
    }

    pub fn short_link_prefix(mut self, prefix: String) -> Self {
        self.config.resolver.short_link_prefixes.push(prefix);
        self
    }

    pub fn max_redirects(mut self, max_redirects: usize) -> Self {
        self.config.resolver.max_redirects = max_redirects;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_a_complete_configuration() {
        let toml = r#"
            [publisher]
            refresh_interval_ms = 500
            accuracy_m = 3.5
            provider_name = "network"

            [resolver]
            map_url_prefix = "https://www.google.com/maps/"
            short_link_prefixes = ["https://maps.app.goo.gl/"]
            max_redirects = 3
            request_timeout = "2s"

            [platform]
            backend = "emulator"
            adb_path = "/opt/android/adb"
            device_serial = "emulator-5554"
        "#;

        let config: AppConfig = Config::builder()
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.publisher().refresh_interval(), Duration::from_millis(500));
        assert_eq!(config.publisher().accuracy_m(), 3.5);
        assert_eq!(config.publisher().provider_name(), "network");
        assert_eq!(config.resolver().short_link_prefixes(), ["https://maps.app.goo.gl/".to_string()]);
        assert_eq!(config.resolver().max_redirects(), 3);
        assert_eq!(config.resolver().request_timeout(), Duration::from_secs(2));
        assert_eq!(config.platform().backend(), Backend::Emulator);
        assert_eq!(config.platform().device_serial(), Some("emulator-5554"));
        assert!(config.platform().mock_location_allowed());
    }

    #[test]
    fn fails_for_an_unknown_backend() {
        let toml = r#"
            [publisher]
            refresh_interval_ms = 500
            accuracy_m = 1.0
            provider_name = "gps"

            [resolver]
            map_url_prefix = "https://www.google.com/maps/"
            short_link_prefixes = []
            max_redirects = 5
            request_timeout = "10s"

            [platform]
            backend = "satellite"
            adb_path = "adb"
        "#;

        let result = Config::builder()
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize::<AppConfig>();

        assert!(result.is_err());
    }
}
