// API response utility functions module

use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::convert::Infallible;

/// Build JSON response
#[allow(clippy::unnecessary_wraps)]
pub fn json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let json = match serde_json::to_string(body) {
        Ok(j) => j,
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            return Ok(Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header("Content-Type", "application/json")
                .body(Full::new(Bytes::from(
                    r#"{"code":"unknown_error","message":"Internal server error"}"#,
                )))
                .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Error")))));
        }
    };

    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build response: {e}"));
            Response::new(Full::new(Bytes::from("Error")))
        }))
}

/// Plain text response, used by the health probes
pub fn text_response(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .header("Cache-Control", "no-cache")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from(body))))
}

/// 404 Not Found response
pub fn not_found() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(r#"{"code":"not_found","message":"Not Found","available_endpoints":["POST /api/services/frontend_translations/get_translation","POST /api/command","GET /healthz","GET /readyz"]}"#)))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Not Found"))))
}

/// 405 Method Not Allowed response
pub fn method_not_allowed() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "application/json")
        .header("Allow", "POST")
        .body(Full::new(Bytes::from(
            r#"{"code":"method_not_allowed","message":"Method Not Allowed"}"#,
        )))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Method Not Allowed"))))
}

/// 400 Bad Request response
pub fn bad_request(message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "code": "invalid_format",
        "message": message
    });
    Response::builder()
        .status(StatusCode::BAD_REQUEST)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Bad Request"))))
}

/// 413 Payload Too Large response
pub fn payload_too_large(limit: u64) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "code": "payload_too_large",
        "message": format!("Request body exceeds {limit} bytes")
    });
    Response::builder()
        .status(StatusCode::PAYLOAD_TOO_LARGE)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Payload Too Large"))))
}
