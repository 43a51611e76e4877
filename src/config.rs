//! Configuration for the PadLink daemon
//!
//! Loads configuration from a TOML file. Only startup parameters live here:
//! the service port, the virtual device's identity metadata, and the log
//! level. Receive-loop timing and failure thresholds are protocol constants
//! and are not configurable.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub device: DeviceConfig,
    pub logging: LoggingConfig,
}

/// Network configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// UDP service port for inbound controller datagrams.
    /// The socket always binds the wildcard address.
    pub port: u16,
}

/// Virtual device configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceConfig {
    /// Sink backend: `log` (reference backend) or `mock` (dry run)
    pub backend: String,
    /// Controller body color (0xRRGGBB)
    pub body_color: u32,
    /// Button color (0xRRGGBB)
    pub button_color: u32,
    /// Left grip color (0xRRGGBB)
    pub left_grip_color: u32,
    /// Right grip color (0xRRGGBB)
    pub right_grip_color: u32,
    /// Reported battery charge level (0-4)
    pub battery_level: u8,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level filter used when RUST_LOG is unset (trace, debug, info, warn, error)
    pub level: String,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Default configuration mirroring the wired pro controller identity
    pub fn defaults() -> Self {
        Self {
            network: NetworkConfig { port: 8080 },
            device: DeviceConfig {
                backend: "log".to_string(),
                body_color: 0x3995C6,
                button_color: 0x202020,
                left_grip_color: 0x3995C6,
                right_grip_color: 0x3995C6,
                battery_level: 4,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::defaults();
        assert_eq!(config.network.port, 8080);
        assert_eq!(config.device.backend, "log");
        assert_eq!(config.device.body_color, 0x3995C6);
        assert_eq!(config.device.button_color, 0x202020);
        assert_eq!(config.device.battery_level, 4);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_toml_serialization() {
        let config = Config::defaults();
        let toml_string = toml::to_string_pretty(&config).unwrap();

        // Should contain all sections
        assert!(toml_string.contains("[network]"));
        assert!(toml_string.contains("[device]"));
        assert!(toml_string.contains("[logging]"));

        // Should contain key values
        assert!(toml_string.contains("port = 8080"));
        assert!(toml_string.contains("backend = \"log\""));
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_content = r#"
[network]
port = 9090

[device]
backend = "mock"
body_color = 0x3995C6
button_color = 0x202020
left_grip_color = 0x3995C6
right_grip_color = 0x3995C6
battery_level = 3

[logging]
level = "debug"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.network.port, 9090);
        assert_eq!(config.device.backend, "mock");
        assert_eq!(config.device.body_color, 0x3995C6);
        assert_eq!(config.device.battery_level, 3);
        assert_eq!(config.logging.level, "debug");
    }
}
