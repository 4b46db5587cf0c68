// API types module
// Request and response shapes of the service call and the command channel

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::translations::metadata::LanguageSummary;
use crate::translations::MetadataMap;

pub const GET_ALL_METADATA: &str = "frontend_translations/get_all_metadata";
pub const GET_LANGUAGE: &str = "frontend_translations/get_language";
pub const STORE_METADATA: &str = "frontend_translations/store_metadata";
pub const UPDATE_OPTIONS: &str = "frontend_translations/update_options";

/// Every command type this service answers
pub const COMMAND_TYPES: [&str; 4] = [GET_ALL_METADATA, GET_LANGUAGE, STORE_METADATA, UPDATE_OPTIONS];

/// Body of the `get_translation` service call
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetTranslationCall {
    #[serde(deserialize_with = "string_or_number")]
    pub language: String,
}

/// Accept a string, or a number rendered as one
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string, got {other}"
        ))),
    }
}

/// A command, selected by its `type` field; `id` is read separately
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    #[serde(rename = "frontend_translations/get_all_metadata")]
    GetAllMetadata,
    #[serde(rename = "frontend_translations/get_language")]
    GetLanguage { language: String },
    /// Internal: the frontend pushes the metadata it knows about
    #[serde(rename = "frontend_translations/store_metadata")]
    StoreMetadata { metadata: MetadataMap },
    #[serde(rename = "frontend_translations/update_options")]
    UpdateOptions {
        #[serde(default)]
        base_url: Option<String>,
    },
}

/// Reply sent for every command
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

impl CommandResponse {
    pub fn result(id: u64, result: Value) -> Self {
        Self {
            id,
            kind: "result",
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: u64, code: &'static str, message: String) -> Self {
        Self {
            id,
            kind: "result",
            success: false,
            result: None,
            error: Some(ErrorDetail { code, message }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AllMetadataResult {
    pub languages: BTreeMap<String, LanguageSummary>,
}

#[derive(Debug, Serialize)]
pub struct StoreMetadataResult {
    pub success: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unchanged: bool,
}

#[derive(Debug, Serialize)]
pub struct UpdateOptionsResult {
    pub success: bool,
    pub base_url: String,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub languages: usize,
    pub last_update: f64,
}
