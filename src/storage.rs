// Translation metadata persistence module
// Keeps the stored metadata in memory and mirrors every change to a versioned JSON file

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::logger;
use crate::translations::{has_metadata_changed, MetadataMap, StoredTranslations};

/// Key the data is stored under, also the file name
pub const STORAGE_KEY: &str = "frontend_translations.storage";
/// Newest envelope version this build reads and the one it writes
pub const STORAGE_VERSION: u32 = 1;
pub const STORAGE_MINOR_VERSION: u32 = 1;

/// On-disk layout: the data wrapped with its key and format version
#[derive(Debug, Serialize, Deserialize)]
struct StoreEnvelope {
    version: u32,
    #[serde(default = "default_minor_version")]
    minor_version: u32,
    key: String,
    data: StoredTranslations,
}

#[allow(clippy::missing_const_for_fn)]
fn default_minor_version() -> u32 {
    1
}

/// Result of offering new metadata to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// Metadata replaced and written out
    Saved { languages: usize },
    /// Hashes identical to what is stored, nothing written
    Unchanged,
}

/// Metadata store manager
pub struct TranslationStore {
    /// Path to the storage file
    path: PathBuf,
    /// Current data (cached in memory)
    data: RwLock<StoredTranslations>,
    /// Whether writes reach the disk
    enabled: bool,
}

impl TranslationStore {
    /// Open the store in `dir`, loading whatever was saved before
    pub fn open(dir: &Path, enabled: bool) -> Result<Self, StorageError> {
        let path = dir.join(STORAGE_KEY);

        let data = if enabled {
            Self::load(&path)?.unwrap_or_default()
        } else {
            StoredTranslations::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
            enabled,
        })
    }

    /// Read the storage file; a missing file is not an error
    fn load(path: &Path) -> Result<Option<StoredTranslations>, StorageError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        let envelope: StoreEnvelope = serde_json::from_str(&content)?;

        if envelope.version > STORAGE_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: envelope.version,
                supported: STORAGE_VERSION,
            });
        }

        logger::log_info(&format!(
            "Loaded metadata for {} languages from {}",
            envelope.data.metadata.len(),
            path.display()
        ));
        Ok(Some(envelope.data))
    }

    /// Write `data` next to the target and rename it into place
    fn save(&self, data: &StoredTranslations) -> Result<(), StorageError> {
        if !self.enabled {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let envelope = StoreEnvelope {
            version: STORAGE_VERSION,
            minor_version: STORAGE_MINOR_VERSION,
            key: STORAGE_KEY.to_string(),
            data: data.clone(),
        };
        let content = serde_json::to_string_pretty(&envelope)?;

        let tmp_path = self.path.with_extension("storage.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    /// Get a copy of the stored data
    pub async fn snapshot(&self) -> StoredTranslations {
        self.data.read().await.clone()
    }

    /// Get a copy of the stored metadata
    pub async fn metadata(&self) -> MetadataMap {
        self.data.read().await.metadata.clone()
    }

    /// Replace the metadata if any language or hash differs.
    ///
    /// The file is written before the in-memory copy is swapped, so a failed
    /// write leaves both untouched.
    pub async fn store_if_changed(
        &self,
        metadata: MetadataMap,
        now: f64,
    ) -> Result<StoreOutcome, StorageError> {
        let mut data = self.data.write().await;

        if !has_metadata_changed(&data.metadata, &metadata) {
            return Ok(StoreOutcome::Unchanged);
        }

        let updated = StoredTranslations {
            metadata,
            last_update: now,
        };
        self.save(&updated)?;

        let languages = updated.metadata.len();
        *data = updated;
        Ok(StoreOutcome::Saved { languages })
    }

    #[allow(clippy::missing_const_for_fn)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translations::LanguageMetadata;

    fn metadata(hash: &str) -> MetadataMap {
        let mut map = MetadataMap::new();
        map.insert("en".to_string(), LanguageMetadata::new("English", false, "e1"));
        map.insert("he".to_string(), LanguageMetadata::new("עברית", true, hash));
        map
    }

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranslationStore::open(dir.path(), true).unwrap();
        let data = store.snapshot().await;
        assert!(data.metadata.is_empty());
        assert!(data.last_update.abs() < f64::EPSILON);
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranslationStore::open(dir.path(), true).unwrap();

        let outcome = store.store_if_changed(metadata("h1"), 1_700_000_000.5).await.unwrap();
        assert_eq!(outcome, StoreOutcome::Saved { languages: 2 });

        let reopened = TranslationStore::open(dir.path(), true).unwrap();
        let data = reopened.snapshot().await;
        assert_eq!(data.metadata, metadata("h1"));
        assert!((data.last_update - 1_700_000_000.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_envelope_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranslationStore::open(dir.path(), true).unwrap();
        store.store_if_changed(metadata("h1"), 42.0).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["version"], 1);
        assert_eq!(raw["key"], STORAGE_KEY);
        assert_eq!(raw["data"]["metadata"]["he"]["isRTL"], true);
        assert_eq!(raw["data"]["metadata"]["he"]["nativeName"], "עברית");
        assert_eq!(raw["data"]["last_update"], 42.0);
    }

    #[tokio::test]
    async fn test_unchanged_skips_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranslationStore::open(dir.path(), true).unwrap();
        store.store_if_changed(metadata("h1"), 10.0).await.unwrap();

        fs::remove_file(store.path()).unwrap();

        let outcome = store.store_if_changed(metadata("h1"), 20.0).await.unwrap();
        assert_eq!(outcome, StoreOutcome::Unchanged);
        assert!(!store.path().exists(), "unchanged metadata must not be written");
        assert!((store.snapshot().await.last_update - 10.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_changed_hash_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranslationStore::open(dir.path(), true).unwrap();
        store.store_if_changed(metadata("h1"), 10.0).await.unwrap();

        let outcome = store.store_if_changed(metadata("h2"), 20.0).await.unwrap();
        assert_eq!(outcome, StoreOutcome::Saved { languages: 2 });

        let reopened = TranslationStore::open(dir.path(), true).unwrap();
        let he = &reopened.metadata().await["he"];
        assert_eq!(he.hash_text().as_deref(), Some("h2"));
    }

    #[tokio::test]
    async fn test_newer_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(STORAGE_KEY),
            r#"{"version": 2, "key": "frontend_translations.storage", "data": {"metadata": {}, "last_update": 0}}"#,
        )
        .unwrap();

        let err = TranslationStore::open(dir.path(), true).err().unwrap();
        assert!(matches!(
            err,
            StorageError::UnsupportedVersion { found: 2, supported: 1 }
        ));
    }

    #[tokio::test]
    async fn test_corrupt_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(STORAGE_KEY), "{").unwrap();
        assert!(matches!(
            TranslationStore::open(dir.path(), true),
            Err(StorageError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_disabled_store_keeps_memory_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranslationStore::open(dir.path(), false).unwrap();
        let outcome = store.store_if_changed(metadata("h1"), 5.0).await.unwrap();
        assert_eq!(outcome, StoreOutcome::Saved { languages: 2 });
        assert!(!store.path().exists());
        assert_eq!(store.metadata().await.len(), 2);
        assert!(!store.is_enabled());
    }

    #[tokio::test]
    async fn test_write_failure_leaves_memory_untouched() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the storage directory should be makes create_dir_all fail
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "").unwrap();

        let store = TranslationStore::open(&blocker.join("nested"), true).unwrap();
        let result = store.store_if_changed(metadata("h1"), 5.0).await;
        assert!(matches!(result, Err(StorageError::Io(_))));
        assert!(store.metadata().await.is_empty());
    }
}
