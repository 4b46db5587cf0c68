// Service call and command handlers module

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::convert::Infallible;
use std::sync::Arc;

use super::response::{bad_request, json_response, payload_too_large, text_response};
use super::types::{
    AllMetadataResult, Command, CommandResponse, GetTranslationCall, ReadinessResponse,
    StoreMetadataResult, UpdateOptionsResult, COMMAND_TYPES,
};
use crate::config::AppState;
use crate::error::CommandError;
use crate::logger;
use crate::storage::StoreOutcome;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// `[API]` line, written only when `logging.access_log` is on
pub fn log_request(state: &AppState, method: &str, path: &str, status: u16) {
    if state.access_log {
        logger::log_api_request(method, path, status);
    }
}

/// Collect a request body, refusing anything larger than `limit` bytes
async fn read_body<B>(req: Request<B>, limit: u64) -> Result<Bytes, Response<Full<Bytes>>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let max = usize::try_from(limit).unwrap_or(usize::MAX);
    match Limited::new(req.into_body(), max).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => Err(payload_too_large(limit)),
        Err(e) => Err(bad_request(&format!("Failed to read request body: {e}"))),
    }
}

/// `get_translation` service call
pub async fn handle_get_translation<B>(
    req: Request<B>,
    state: Arc<AppState>,
    path: &str,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let body = match read_body(req, state.config.http.max_body_size).await {
        Ok(body) => body,
        Err(resp) => {
            log_request(&state, "POST", path, resp.status().as_u16());
            return Ok(resp);
        }
    };

    let call: GetTranslationCall = match serde_json::from_slice(&body) {
        Ok(call) => call,
        Err(e) => {
            log_request(&state, "POST", path, 400);
            return Ok(bad_request(&format!("Invalid service data: {e}")));
        }
    };

    let result = state.get_translation(&call.language).await;

    log_request(&state, "POST", path, 200);
    json_response(StatusCode::OK, &result)
}

/// Command channel: one command in, one result envelope out
pub async fn handle_command<B>(
    req: Request<B>,
    state: Arc<AppState>,
    path: &str,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let body = match read_body(req, state.config.http.max_body_size).await {
        Ok(body) => body,
        Err(resp) => {
            log_request(&state, "POST", path, resp.status().as_u16());
            return Ok(resp);
        }
    };

    let response = dispatch_command(&body, &state).await;
    log_request(&state, "POST", path, 200);
    json_response(StatusCode::OK, &response)
}

/// Parse a command message and run it
pub async fn dispatch_command(body: &[u8], state: &AppState) -> CommandResponse {
    let message: Value = match serde_json::from_slice(body) {
        Ok(message) => message,
        Err(e) => {
            return CommandResponse::error(0, "invalid_format", format!("Invalid JSON: {e}"));
        }
    };

    let Some(id) = message.get("id").and_then(Value::as_u64) else {
        return CommandResponse::error(
            0,
            "invalid_format",
            "Message is missing a non-negative integer 'id'".to_string(),
        );
    };
    let command_type = message
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    match run_command(message, &command_type, state).await {
        Ok(result) => {
            logger::log_command(id, &command_type, true);
            CommandResponse::result(id, result)
        }
        Err(err) => {
            if matches!(err, CommandError::Storage(_) | CommandError::Encode(_)) {
                logger::log_error(&format!("Error in {command_type}: {err}"));
            }
            logger::log_command(id, &command_type, false);
            CommandResponse::error(id, err.code(), err.to_string())
        }
    }
}

async fn run_command(
    message: Value,
    command_type: &str,
    state: &AppState,
) -> Result<Value, CommandError> {
    if command_type.is_empty() {
        return Err(CommandError::InvalidFormat(
            "Message is missing a 'type'".to_string(),
        ));
    }
    if !COMMAND_TYPES.contains(&command_type) {
        return Err(CommandError::UnknownCommand(command_type.to_string()));
    }

    let command: Command = serde_json::from_value(message)
        .map_err(|e| CommandError::InvalidFormat(format!("Invalid {command_type} message: {e}")))?;

    match command {
        Command::GetAllMetadata => {
            let metadata = state.store.metadata().await;
            to_result(&AllMetadataResult {
                languages: metadata
                    .iter()
                    .map(|(lang, data)| (lang.clone(), data.summary(lang)))
                    .collect(),
            })
        }
        Command::GetLanguage { language } => to_result(&state.get_translation(&language).await),
        Command::StoreMetadata { metadata } => {
            let outcome = state.store_metadata(metadata).await?;
            to_result(&StoreMetadataResult {
                success: true,
                unchanged: outcome == StoreOutcome::Unchanged,
            })
        }
        Command::UpdateOptions { base_url } => {
            let base_url = state.update_options(base_url.as_deref()).await;
            to_result(&UpdateOptionsResult {
                success: true,
                base_url,
            })
        }
    }
}

fn to_result<T: Serialize>(value: &T) -> Result<Value, CommandError> {
    Ok(serde_json::to_value(value)?)
}

/// Liveness probe
pub fn handle_liveness() -> Response<Full<Bytes>> {
    text_response(StatusCode::OK, "ok")
}

/// Readiness probe: ready once stored metadata has been loaded
pub async fn handle_readiness(state: &AppState) -> Result<Response<Full<Bytes>>, Infallible> {
    if !state.is_ready() {
        return Ok(text_response(StatusCode::SERVICE_UNAVAILABLE, "unloaded"));
    }

    let data = state.store.snapshot().await;
    json_response(
        StatusCode::OK,
        &ReadinessResponse {
            status: "ready",
            languages: data.metadata.len(),
            last_update: data.last_update,
        },
    )
}
