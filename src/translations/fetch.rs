// Translation fetch module
// Downloads a language's translation file and maps every failure to a result value

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::metadata::{LanguageMetadata, MetadataMap};
use crate::error::FetchError;
use crate::logger;

/// Default time allowed for one translation download
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of a translation lookup
///
/// Failures are carried in `error` with `success == false`;
/// only the populated fields are serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(rename = "nativeName", skip_serializing_if = "Option::is_none")]
    pub native_name: Option<String>,
    #[serde(rename = "isRTL", skip_serializing_if = "Option::is_none")]
    pub is_rtl: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranslationResult {
    fn found(language: &str, entry: &LanguageMetadata, hash: &str, data: Value) -> Self {
        Self {
            success: true,
            language: Some(language.to_string()),
            native_name: Some(entry.native_name_or(language)),
            is_rtl: Some(entry.is_rtl()),
            hash: Some(hash.to_string()),
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(err: &FetchError) -> Self {
        Self {
            success: false,
            language: None,
            native_name: None,
            is_rtl: None,
            hash: None,
            data: None,
            error: Some(err.to_string()),
        }
    }
}

/// Build the download URL of a translation file
pub fn translation_url(base_url: &str, language: &str, hash: &str) -> String {
    format!("{base_url}/static/translations/{language}-{hash}.json")
}

/// HTTP client wrapper used for every translation download
pub struct TranslationFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl TranslationFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client, timeout })
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch the translation for `language` using the stored metadata.
    ///
    /// Never fails: lookup, transport, status and decode problems all come
    /// back as a result with `success == false`.
    pub async fn fetch_translation(
        &self,
        language: &str,
        metadata: &MetadataMap,
        base_url: &str,
    ) -> TranslationResult {
        match self.try_fetch(language, metadata, base_url).await {
            Ok(result) => result,
            Err(err) => {
                match &err {
                    FetchError::Timeout(_) | FetchError::Transport(_) => {
                        logger::log_error(&format!("Error fetching translation: {err}"));
                    }
                    FetchError::InvalidJson => {
                        logger::log_error(&format!("JSON decode error for {language}"));
                    }
                    _ => {}
                }
                TranslationResult::failure(&err)
            }
        }
    }

    async fn try_fetch(
        &self,
        language: &str,
        metadata: &MetadataMap,
        base_url: &str,
    ) -> Result<TranslationResult, FetchError> {
        let entry = metadata
            .get(language)
            .ok_or_else(|| FetchError::LanguageNotFound(language.to_string()))?;

        let hash = entry
            .fetchable_hash()
            .ok_or_else(|| FetchError::MissingHash(language.to_string()))?;

        let url = translation_url(base_url, language, &hash);
        let data = self.get_json(&url).await?;

        Ok(TranslationResult::found(language, entry, &hash, data))
    }

    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let request = async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?;

            let status = response.status();
            if status != reqwest::StatusCode::OK {
                return Err(FetchError::Status(status.as_u16()));
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?;

            serde_json::from_slice(&body).map_err(|_| FetchError::InvalidJson)
        };

        tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translations::test_server;

    fn metadata() -> MetadataMap {
        let mut map = MetadataMap::new();
        map.insert("de".to_string(), LanguageMetadata::new("Deutsch", false, "abc123"));
        map.insert("ar".to_string(), LanguageMetadata::new("العربية", true, "missing"));
        map.insert("fr".to_string(), LanguageMetadata::new("Français", false, "broken"));
        map.insert("es".to_string(), LanguageMetadata::new("Español", false, "slow"));
        map.insert("nl".to_string(), LanguageMetadata::new("Nederlands", false, ""));
        map.insert("it".to_string(), LanguageMetadata::default());
        map
    }

    fn fetcher(timeout: Duration) -> TranslationFetcher {
        TranslationFetcher::new(timeout, "frontend-translations-test").unwrap()
    }

    #[test]
    fn test_translation_url() {
        assert_eq!(
            translation_url("http://ha.local:8123", "pt-BR", "9f8e"),
            "http://ha.local:8123/static/translations/pt-BR-9f8e.json"
        );
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let base = test_server::spawn().await;
        let result = fetcher(DEFAULT_FETCH_TIMEOUT)
            .fetch_translation("de", &metadata(), &base)
            .await;

        assert!(result.success, "unexpected failure: {:?}", result.error);
        assert_eq!(result.language.as_deref(), Some("de"));
        assert_eq!(result.native_name.as_deref(), Some("Deutsch"));
        assert_eq!(result.is_rtl, Some(false));
        assert_eq!(result.hash.as_deref(), Some("abc123"));
        assert_eq!(result.data.unwrap()["ui"]["common"]["yes"], "Ja");
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_unknown_language() {
        let result = fetcher(DEFAULT_FETCH_TIMEOUT)
            .fetch_translation("xx", &metadata(), "http://127.0.0.1:9")
            .await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Language xx not found"));
    }

    #[tokio::test]
    async fn test_empty_metadata() {
        let result = fetcher(DEFAULT_FETCH_TIMEOUT)
            .fetch_translation("de", &MetadataMap::new(), "http://127.0.0.1:9")
            .await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Language de not found"));
    }

    #[tokio::test]
    async fn test_missing_or_empty_hash() {
        let f = fetcher(DEFAULT_FETCH_TIMEOUT);
        let meta = metadata();

        let result = f.fetch_translation("it", &meta, "http://127.0.0.1:9").await;
        assert_eq!(result.error.as_deref(), Some("No hash for it"));

        let result = f.fetch_translation("nl", &meta, "http://127.0.0.1:9").await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("No hash for nl"));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let base = test_server::spawn().await;
        let result = fetcher(DEFAULT_FETCH_TIMEOUT)
            .fetch_translation("ar", &metadata(), &base)
            .await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("HTTP error 404"));
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let base = test_server::spawn().await;
        let result = fetcher(DEFAULT_FETCH_TIMEOUT)
            .fetch_translation("fr", &metadata(), &base)
            .await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Invalid JSON response"));
    }

    #[tokio::test]
    async fn test_timeout() {
        let base = test_server::spawn().await;
        let result = fetcher(Duration::from_millis(200))
            .fetch_translation("es", &metadata(), &base)
            .await;
        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("Request timed out after 200ms")
        );
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let base = test_server::unreachable().await;
        let result = fetcher(DEFAULT_FETCH_TIMEOUT)
            .fetch_translation("de", &metadata(), &base)
            .await;
        assert!(!result.success);
        assert!(!result.error.unwrap_or_default().is_empty());
    }

    #[test]
    fn test_failure_serializes_only_error() {
        let result = TranslationResult::failure(&FetchError::Status(500));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "HTTP error 500"}));
    }
}
