// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub fetch: FetchConfig,
    pub storage: StorageConfig,
    /// The single configured instance; absent means "not configured yet"
    #[serde(default)]
    pub entry: Option<EntryConfig>,
    /// URLs the platform itself is reachable on
    #[serde(default)]
    pub host: HostUrlsConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub level: String,
    pub access_log: bool,
    /// Log file path (optional, stderr if not set)
    #[serde(default)]
    pub log_file: Option<String>,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Sent as `User-Agent` on downloads
    pub server_name: String,
    pub max_body_size: u64,
}

/// Translation download configuration
#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    pub timeout_secs: u64,
}

/// Metadata storage configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub enabled: bool,
    /// Directory holding the storage file
    pub path: String,
}

/// Config entry: `base_url` as created, `options` as changed later
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct EntryConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub options: EntryOptions,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct EntryOptions {
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Platform URLs, used when the entry does not name a base URL
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct HostUrlsConfig {
    #[serde(default)]
    pub internal_url: Option<String>,
    #[serde(default)]
    pub external_url: Option<String>,
}
