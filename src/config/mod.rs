// Configuration module entry point
// Loads layered configuration and holds the runtime state built from it

mod state;
mod types;

use std::net::SocketAddr;
use std::time::Duration;

pub use state::AppState;
pub use types::{Config, LoggingConfig};

use crate::translations::DEFAULT_FETCH_TIMEOUT;

/// Environment variable prefix, e.g. `TRANSLATIONS_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "TRANSLATIONS";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8125)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "frontend-translations")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("fetch.timeout_secs", 10)?
            .set_default("storage.enabled", true)?
            .set_default("storage.path", ".storage")?
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject entry base URLs that are not absolute http(s) URLs
    fn validate(&self) -> Result<(), config::ConfigError> {
        let Some(entry) = &self.entry else {
            return Ok(());
        };

        for (key, value) in [
            ("entry.base_url", &entry.base_url),
            ("entry.options.base_url", &entry.options.base_url),
        ] {
            if let Some(url) = value {
                validate_url(url).map_err(|e| {
                    config::ConfigError::Message(format!("Invalid {key} '{url}': {e}"))
                })?;
            }
        }
        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Download timeout; `0` selects the default
    pub const fn fetch_timeout(&self) -> Duration {
        match self.fetch.timeout_secs {
            0 => DEFAULT_FETCH_TIMEOUT,
            secs => Duration::from_secs(secs),
        }
    }
}

/// Check that `url` is an absolute http or https URL
pub fn validate_url(url: &str) -> Result<(), String> {
    let parsed = reqwest::Url::parse(url).map_err(|e| e.to_string())?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(()),
        "http" | "https" => Err("missing host".to_string()),
        other => Err(format!("unsupported scheme '{other}'")),
    }
}

/// Default configuration with storage placed in `storage_dir`
#[cfg(test)]
pub(crate) fn test_config(storage_dir: &std::path::Path) -> Config {
    let mut cfg = Config::load_from(&storage_dir.join("no-config").to_string_lossy()).unwrap();
    cfg.storage.path = storage_dir.to_string_lossy().into_owned();
    cfg
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(dir: &tempfile::TempDir, content: &str) -> String {
        let path = dir.path().join("config.toml");
        fs::write(&path, content).unwrap();
        dir.path().join("config").to_string_lossy().into_owned()
    }

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent").to_string_lossy()).unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8125);
        assert_eq!(cfg.fetch_timeout(), Duration::from_secs(10));
        assert!(cfg.storage.enabled);
        assert_eq!(cfg.storage.path, ".storage");
        assert!(cfg.entry.is_none());
        assert_eq!(cfg.host, types::HostUrlsConfig::default());
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8125);
    }

    #[test]
    fn test_file_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
[server]
port = 9100

[fetch]
timeout_secs = 3

[entry]
base_url = "http://ha.local:8123/"

[entry.options]
base_url = "https://translations.example.com"

[host]
internal_url = "http://10.0.0.2:8123"
"#,
        );

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.fetch_timeout(), Duration::from_secs(3));
        let entry = cfg.entry.unwrap();
        assert_eq!(entry.base_url.as_deref(), Some("http://ha.local:8123/"));
        assert_eq!(
            entry.options.base_url.as_deref(),
            Some("https://translations.example.com")
        );
        assert_eq!(cfg.host.internal_url.as_deref(), Some("http://10.0.0.2:8123"));
        assert_eq!(cfg.host.external_url, None);
    }

    #[test]
    fn test_invalid_entry_url_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[entry]\nbase_url = \"ftp://files.local\"\n");
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("entry.base_url"));
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("http://homeassistant.local:8123").is_ok());
        assert!(validate_url("https://example.com/").is_ok());
        assert!(validate_url("homeassistant.local").is_err());
        assert!(validate_url("file:///etc/passwd").is_err());
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[fetch]\ntimeout_secs = 0\n");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.fetch_timeout(), DEFAULT_FETCH_TIMEOUT);
    }
}
