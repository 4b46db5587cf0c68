//! Translations module
//!
//! Everything the service knows about translation files:
//! - where to download them from (`base_url`)
//! - what is available per language (`metadata`)
//! - how a single file is fetched (`fetch`)

pub mod base_url;
pub mod fetch;
pub mod metadata;

#[cfg(test)]
pub(crate) mod test_server;

pub use base_url::{normalize_optional, resolve_base_url, BaseUrlSources};
pub use fetch::{TranslationFetcher, TranslationResult, DEFAULT_FETCH_TIMEOUT};
pub use metadata::{has_metadata_changed, LanguageMetadata, MetadataMap, StoredTranslations};
