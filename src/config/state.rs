// Application state module
// Everything a running instance holds: config, stored metadata, the HTTP client and base URLs

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use super::types::{Config, EntryConfig};
use crate::error::{SetupError, StorageError};
use crate::logger;
use crate::storage::{StoreOutcome, TranslationStore};
use crate::translations::{
    normalize_optional, resolve_base_url, BaseUrlSources, MetadataMap, TranslationFetcher,
    TranslationResult,
};

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: TranslationStore,
    pub fetcher: TranslationFetcher,
    entry: RwLock<EntryConfig>,
    runtime_base_url: RwLock<Option<String>>,
    /// Connection and `[API]` request lines, from `logging.access_log`
    pub access_log: bool,
    ready: AtomicBool,
}

impl AppState {
    /// Set up the instance: load stored metadata and build the HTTP client
    pub fn setup(config: &Config) -> Result<Self, SetupError> {
        let store = TranslationStore::open(Path::new(&config.storage.path), config.storage.enabled)?;
        let fetcher = TranslationFetcher::new(config.fetch_timeout(), &config.http.server_name)?;

        let mut entry = config.entry.clone().unwrap_or_default();
        entry.base_url = normalize_optional(entry.base_url.as_deref());
        entry.options.base_url = normalize_optional(entry.options.base_url.as_deref());

        // Options override what the entry was created with
        let runtime = entry
            .options
            .base_url
            .clone()
            .or_else(|| entry.base_url.clone());

        Ok(Self {
            config: config.clone(),
            store,
            fetcher,
            entry: RwLock::new(entry),
            runtime_base_url: RwLock::new(runtime),
            access_log: config.logging.access_log,
            ready: AtomicBool::new(true),
        })
    }

    /// Collect every base URL source in its current state
    pub async fn base_url_sources(&self) -> BaseUrlSources {
        let entry = self.entry.read().await;
        BaseUrlSources {
            entry_data: entry.base_url.clone(),
            entry_options: entry.options.base_url.clone(),
            runtime: self.runtime_base_url.read().await.clone(),
            internal_url: self.config.host.internal_url.clone(),
            external_url: self.config.host.external_url.clone(),
        }
    }

    pub async fn base_url(&self) -> String {
        resolve_base_url(&self.base_url_sources().await)
    }

    /// Fetch the translation file for `language`
    pub async fn get_translation(&self, language: &str) -> TranslationResult {
        let metadata = self.store.metadata().await;
        let base_url = self.base_url().await;
        self.fetcher
            .fetch_translation(language, &metadata, &base_url)
            .await
    }

    /// Store metadata pushed by the frontend unless its hashes are unchanged
    pub async fn store_metadata(&self, metadata: MetadataMap) -> Result<StoreOutcome, StorageError> {
        let outcome = self
            .store
            .store_if_changed(metadata, epoch_seconds_now())
            .await?;

        match outcome {
            StoreOutcome::Saved { languages } => logger::log_info(&format!(
                "Translation metadata updated with {languages} languages"
            )),
            StoreOutcome::Unchanged => {
                logger::log_debug("Translation metadata unchanged, skipping update");
            }
        }
        Ok(outcome)
    }

    /// Apply an options update; returns the base URL now in effect
    pub async fn update_options(&self, base_url: Option<&str>) -> String {
        let normalized = normalize_optional(base_url);
        logger::log_debug(&format!("Options updated: base_url={normalized:?}"));

        {
            let mut entry = self.entry.write().await;
            entry.options.base_url.clone_from(&normalized);
        }
        if let Some(url) = normalized {
            *self.runtime_base_url.write().await = Some(url);
        }

        self.base_url().await
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }

    /// Stop serving; in-memory data goes away with the state
    pub fn unload(&self) {
        self.ready.store(false, Ordering::Relaxed);
        logger::log_info("Frontend translations unloaded");
    }
}

/// Current time as fractional seconds since the Unix epoch
#[allow(clippy::cast_precision_loss)]
fn epoch_seconds_now() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
