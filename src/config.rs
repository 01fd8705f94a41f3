//! Run configuration and logging setup.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::log::LevelFilter;

use crate::error::Result;

/// Configuration loaded once at startup from `config.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Horde API credential. Required to generate anything; a run without
    /// one logs an error and exits before doing work.
    pub ai_horde_api_key: Option<String>,

    /// Client-Agent string sent with every Horde request.
    #[serde(default = "default_client_agent")]
    pub client_agent: String,

    /// Prefix for absolute asset URLs in the HTML report and JSON index.
    #[serde(default)]
    pub cdn_url_prefix: String,
}

fn default_client_agent() -> String {
    format!("horde-previews:{}:(unset)", env!("CARGO_PKG_VERSION"))
}

impl RunConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// The credential, treating an empty string the same as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.ai_horde_api_key.as_deref().filter(|k| !k.is_empty())
    }
}

/// Initialize console logging at `Info`, quieting the transport stack.
pub fn setup_logging() -> std::result::Result<(), Box<std::io::Error>> {
    simple_logger::SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .with_module_level("tracing", LevelFilter::Warn)
        .with_module_level("rustls", LevelFilter::Warn)
        .with_module_level("hyper_util", LevelFilter::Warn)
        .with_module_level("reqwest", LevelFilter::Warn)
        .init()
        .map_err(|err| {
            eprintln!("Failed to initialize logger: {}", err);
            Box::new(std::io::Error::other(err))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let file = write_temp(
            r#"{
                "ai_horde_api_key": "0000000000",
                "client_agent": "horde-previews:0.1.0:(ci)",
                "cdn_url_prefix": "https://cdn.example/previews"
            }"#,
        );
        let config = RunConfig::load(file.path()).unwrap();
        assert_eq!(config.api_key(), Some("0000000000"));
        assert_eq!(config.client_agent, "horde-previews:0.1.0:(ci)");
        assert_eq!(config.cdn_url_prefix, "https://cdn.example/previews");
    }

    #[test]
    fn test_missing_key_is_none() {
        let file = write_temp(r#"{"cdn_url_prefix": "https://cdn.example"}"#);
        let config = RunConfig::load(file.path()).unwrap();
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_empty_key_treated_as_absent() {
        let file = write_temp(r#"{"ai_horde_api_key": ""}"#);
        let config = RunConfig::load(file.path()).unwrap();
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_client_agent_defaulted() {
        let file = write_temp(r#"{"ai_horde_api_key": "k"}"#);
        let config = RunConfig::load(file.path()).unwrap();
        assert!(config.client_agent.starts_with("horde-previews:"));
    }

    #[test]
    fn test_unreadable_config_is_error() {
        assert!(RunConfig::load("/nonexistent/config.json").is_err());
    }
}
