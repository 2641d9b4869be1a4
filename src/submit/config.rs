use std::time::Duration;

use serde::Deserialize;

use crate::core::FacturaError;

/// Placeholder address of the not-yet-existing backend service.
pub const DEFAULT_ENDPOINT_URL: &str = "URL_DEL_SERVICIO_JAVA/grabarfactura";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_URL: &str = "FACTURA_ENDPOINT_URL";
const ENV_TIMEOUT: &str = "FACTURA_ENDPOINT_TIMEOUT_SECS";

/// Where and how to submit invoices.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Absolute URL receiving the invoice as a JSON POST.
    pub url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENDPOINT_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl EndpointConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Read `FACTURA_ENDPOINT_URL` and `FACTURA_ENDPOINT_TIMEOUT_SECS`,
    /// falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self, FacturaError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`EndpointConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, FacturaError> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_URL).filter(|u| !u.trim().is_empty()) {
            config.url = url.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_TIMEOUT) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                FacturaError::Config(format!(
                    "{ENV_TIMEOUT} must be a whole number of seconds, got '{raw}'"
                ))
            })?;
            if secs == 0 {
                return Err(FacturaError::Config(format!(
                    "{ENV_TIMEOUT} must be greater than zero"
                )));
            }
            config.timeout_secs = secs;
        }

        Ok(config)
    }
}
