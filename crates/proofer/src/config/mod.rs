use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::proofing::VendorId;

const DEFAULT_VENDOR_TIMEOUT_MS: u64 = 5_000;

/// Deployment stage. Production refuses vendors that never reach a real service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProoferEnvironment {
    Development,
    Test,
    Production,
}

impl ProoferEnvironment {
    pub fn allows(self, vendor: VendorId) -> bool {
        !(self == Self::Production && vendor == VendorId::Mock)
    }
}

impl FromStr for ProoferEnvironment {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Development),
            "test" | "ci" => Ok(Self::Test),
            "prod" | "production" => Ok(Self::Production),
            _ => Err(ConfigError::InvalidEnvironment {
                value: value.to_string(),
            }),
        }
    }
}

/// Top-level configuration, loaded once and handed to agents and backends explicitly.
#[derive(Debug, Clone)]
pub struct ProoferConfig {
    pub environment: ProoferEnvironment,
    pub vendor: VendorConfig,
    pub telemetry: TelemetryConfig,
}

impl ProoferConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = env::var("PROOFER_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .parse::<ProoferEnvironment>()?;

        let raw_vendor = env::var("PROOFER_VENDOR").unwrap_or_else(|_| "aamva".to_string());
        let vendor = raw_vendor
            .parse::<VendorId>()
            .map_err(|_| ConfigError::InvalidVendor { value: raw_vendor })?;
        if !environment.allows(vendor) {
            return Err(ConfigError::VendorNotAllowed {
                vendor,
                environment,
            });
        }

        let timeout_ms = env::var("PROOFER_VENDOR_TIMEOUT_MS")
            .unwrap_or_else(|_| DEFAULT_VENDOR_TIMEOUT_MS.to_string())
            .parse::<u64>()
            .ok()
            .filter(|ms| *ms > 0)
            .ok_or(ConfigError::InvalidTimeout)?;

        let log_level = env::var("PROOFER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            vendor: VendorConfig {
                vendor,
                timeout: Duration::from_millis(timeout_ms),
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Which vendor agents dispatch to, and how long a vendor check may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorConfig {
    pub vendor: VendorId,
    pub timeout: Duration,
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            vendor: VendorId::Aamva,
            timeout: Duration::from_millis(DEFAULT_VENDOR_TIMEOUT_MS),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidEnvironment {
        value: String,
    },
    InvalidVendor {
        value: String,
    },
    VendorNotAllowed {
        vendor: VendorId,
        environment: ProoferEnvironment,
    },
    InvalidTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidEnvironment { value } => {
                write!(f, "PROOFER_ENV '{}' is not development, test or production", value)
            }
            ConfigError::VendorNotAllowed {
                vendor,
                environment,
            } => write!(f, "vendor '{vendor}' cannot be used in {environment:?}"),
            ConfigError::InvalidVendor { value } => {
                write!(f, "PROOFER_VENDOR '{}' is not a known vendor", value)
            }
            ConfigError::InvalidTimeout => {
                write!(f, "PROOFER_VENDOR_TIMEOUT_MS must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("PROOFER_ENV");
        env::remove_var("PROOFER_VENDOR");
        env::remove_var("PROOFER_VENDOR_TIMEOUT_MS");
        env::remove_var("PROOFER_LOG_LEVEL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = ProoferConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, ProoferEnvironment::Development);
        assert_eq!(config.vendor, VendorConfig::default());
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn load_reads_vendor_and_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("PROOFER_ENV", "ci");
        env::set_var("PROOFER_VENDOR", "Mock");
        env::set_var("PROOFER_VENDOR_TIMEOUT_MS", "750");
        let config = ProoferConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, ProoferEnvironment::Test);
        assert_eq!(config.vendor.vendor, VendorId::Mock);
        assert_eq!(config.vendor.timeout, Duration::from_millis(750));
    }

    #[test]
    fn production_refuses_mock_vendor() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("PROOFER_ENV", "production");
        env::set_var("PROOFER_VENDOR", "mock");
        let result = ProoferConfig::load();
        env::set_var("PROOFER_VENDOR", "aamva");
        let aamva = ProoferConfig::load().expect("aamva allowed in production");
        reset_env();

        match result {
            Err(ConfigError::VendorNotAllowed {
                vendor: VendorId::Mock,
                environment: ProoferEnvironment::Production,
            }) => {}
            other => panic!("expected mock to be refused, got {other:?}"),
        }
        assert_eq!(aamva.environment, ProoferEnvironment::Production);
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("PROOFER_ENV", "staging-ish");
        let result = ProoferConfig::load();
        reset_env();

        match result {
            Err(ConfigError::InvalidEnvironment { value }) => assert_eq!(value, "staging-ish"),
            other => panic!("expected invalid environment, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_vendor_and_zero_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("PROOFER_VENDOR", "unknown_vendor");
        match ProoferConfig::load() {
            Err(ConfigError::InvalidVendor { value }) => assert_eq!(value, "unknown_vendor"),
            other => panic!("expected invalid vendor, got {other:?}"),
        }

        reset_env();
        env::set_var("PROOFER_VENDOR_TIMEOUT_MS", "0");
        assert!(matches!(
            ProoferConfig::load(),
            Err(ConfigError::InvalidTimeout)
        ));
        reset_env();
    }
}
