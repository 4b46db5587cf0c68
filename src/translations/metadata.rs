// Translation metadata module
// Per-language records pushed by the frontend and the change check guarding writes

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Metadata for every known language, keyed by language code
pub type MetadataMap = BTreeMap<String, LanguageMetadata>;

/// Metadata for a single language
///
/// The known fields are kept as raw JSON so a payload with an odd display
/// value (`"isRTL": 0`) is still stored; accessors coerce on read. Fields the
/// frontend sends beyond the known ones are kept in `extra` so they survive a
/// store/load cycle untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageMetadata {
    #[serde(rename = "nativeName", default, skip_serializing_if = "Option::is_none")]
    pub native_name: Option<Value>,
    #[serde(rename = "isRTL", default, skip_serializing_if = "Option::is_none")]
    pub is_rtl: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Language entry as reported by `get_all_metadata`, defaults filled in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageSummary {
    #[serde(rename = "nativeName")]
    pub native_name: String,
    #[serde(rename = "isRTL")]
    pub is_rtl: bool,
    pub hash: String,
}

impl LanguageMetadata {
    #[cfg(test)]
    pub fn new(native_name: &str, is_rtl: bool, hash: &str) -> Self {
        Self {
            native_name: Some(Value::from(native_name)),
            is_rtl: Some(Value::Bool(is_rtl)),
            hash: Some(Value::from(hash)),
            extra: Map::new(),
        }
    }

    /// Hash as text; numbers are rendered, other JSON types count as missing
    pub fn hash_text(&self) -> Option<String> {
        scalar_text(self.hash.as_ref()?)
    }

    /// Hash usable in a download URL; empty hashes count as missing
    pub fn fetchable_hash(&self) -> Option<String> {
        self.hash_text().filter(|h| !h.is_empty())
    }

    pub fn native_name_or(&self, language: &str) -> String {
        self.native_name
            .as_ref()
            .and_then(scalar_text)
            .unwrap_or_else(|| language.to_string())
    }

    /// Right-to-left flag; non-boolean values follow JSON truthiness
    pub fn is_rtl(&self) -> bool {
        match &self.is_rtl {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::Object(o)) => !o.is_empty(),
        }
    }

    pub fn summary(&self, language: &str) -> LanguageSummary {
        LanguageSummary {
            native_name: self.native_name_or(language),
            is_rtl: self.is_rtl(),
            hash: self.hash_text().unwrap_or_default(),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Persisted record: the metadata plus the time it was last replaced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredTranslations {
    #[serde(default)]
    pub metadata: MetadataMap,
    /// Seconds since the Unix epoch, fractional
    #[serde(default)]
    pub last_update: f64,
}

/// Check whether incoming metadata differs from what is stored.
///
/// Only the set of languages and their hashes count; a renamed language
/// or a flipped RTL flag with an identical hash is not a change.
pub fn has_metadata_changed(old: &MetadataMap, new: &MetadataMap) -> bool {
    if old.is_empty() && !new.is_empty() {
        return true;
    }

    if old.len() != new.len() {
        return true;
    }

    new.iter().any(|(lang, data)| match old.get(lang) {
        None => true,
        Some(current) => current.hash != data.hash,
    })
}
