use std::env;
use std::fs;
use std::str::FromStr;

use serde::Deserialize;
use tracing::warn;

use crate::error::{Error, Result};

/// Environment variable naming an alternative config file path.
pub const CONFIG_ENV: &str = "B1_SUPPLIERS_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "b1-suppliers.toml";

/// Which login strategy performs the legacy-TLS handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// In-process reqwest client with the TLS floor pinned.
    #[default]
    Direct,
    /// External curl process; its raw output is parsed for the cookies.
    Curl,
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" => Ok(Strategy::Direct),
            "curl" => Ok(Strategy::Curl),
            other => Err(Error::Config(format!("unknown login strategy '{other}'"))),
        }
    }
}

/// Service Layer endpoint and credentials, loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the Service Layer, e.g. `https://host:50000/b1s/v1`.
    pub service_layer_url: String,
    pub company_db: String,
    pub username: String,
    pub password: String,
    /// Cipher suite the server insists on, e.g. `AES256-SHA`. Only the
    /// curl strategy can actually pin it.
    pub cipher: String,
    #[serde(default)]
    pub strategy: Strategy,
    /// Name or path of the external HTTP helper (curl strategy only).
    #[serde(default = "default_helper")]
    pub helper: String,
    /// Ceiling on the helper call, passed as curl's `--max-time`.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_helper() -> String {
    "curl".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Config {
    /// Read the config file (`B1_SUPPLIERS_CONFIG` or `./b1-suppliers.toml`)
    /// and apply environment-variable overrides on top.
    pub fn load() -> Result<Self> {
        let path = env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let text = fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("cannot read {path}: {e}")))?;
        let mut config = Self::from_toml(&text)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.normalize();
        Ok(config)
    }

    // Endpoint paths are joined with a leading slash, so the base must not
    // end with one.
    fn normalize(&mut self) {
        while self.service_layer_url.ends_with('/') {
            self.service_layer_url.pop();
        }
    }

    fn apply_env_overrides(&mut self) {
        override_from_env(&mut self.service_layer_url, "SAP_SERVICE_LAYER_URL");
        override_from_env(&mut self.company_db, "SAP_COMPANY_DB");
        override_from_env(&mut self.username, "SAP_USERNAME");
        override_from_env(&mut self.password, "SAP_PASSWORD");
        override_from_env(&mut self.cipher, "SAP_CIPHER");
        if let Ok(value) = env::var("SAP_LOGIN_STRATEGY") {
            match value.parse() {
                Ok(strategy) => self.strategy = strategy,
                Err(e) => warn!(%value, error = %e, "ignoring SAP_LOGIN_STRATEGY"),
            }
        }
        self.normalize();
    }
}

fn override_from_env(field: &mut String, name: &str) {
    if let Ok(value) = env::var(name) {
        *field = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        service_layer_url = "https://sap.example.com:50000/b1s/v1"
        company_db = "TESTDB"
        username = "manager"
        password = "pw"
        cipher = "AES256-SHA"
    "#;

    #[test]
    fn minimal_config_gets_defaults() {
        let config = Config::from_toml(MINIMAL).unwrap();
        assert_eq!(config.strategy, Strategy::Direct);
        assert_eq!(config.helper, "curl");
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let text = MINIMAL.replace("/b1s/v1", "/b1s/v1/");
        let config = Config::from_toml(&text).unwrap();
        assert_eq!(
            config.service_layer_url,
            "https://sap.example.com:50000/b1s/v1"
        );
    }

    #[test]
    fn curl_strategy_is_selectable() {
        let text = format!("{MINIMAL}\nstrategy = \"curl\"\nhelper = \"/opt/curl/bin/curl\"");
        let config = Config::from_toml(&text).unwrap();
        assert_eq!(config.strategy, Strategy::Curl);
        assert_eq!(config.helper, "/opt/curl/bin/curl");
    }

    #[test]
    fn unknown_strategy_is_a_config_error() {
        assert!(matches!(
            "https".parse::<Strategy>(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn missing_field_is_a_config_error() {
        let text = MINIMAL.replace("password", "passwort");
        assert!(matches!(Config::from_toml(&text), Err(Error::Config(_))));
    }
}
