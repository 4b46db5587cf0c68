// API module entry
// HTTP transport for the translation service call and the command channel

mod handlers;
mod response;
mod types;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

use crate::config::AppState;

use response::{method_not_allowed, not_found};

pub const SERVICE_PATH: &str = "/api/services/frontend_translations/get_translation";
pub const COMMAND_PATH: &str = "/api/command";
pub const LIVENESS_PATH: &str = "/healthz";
pub const READINESS_PATH: &str = "/readyz";

/// API route handler
///
/// Dispatches to handler functions based on request path and method
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    match (method, path.as_str()) {
        (Method::GET, LIVENESS_PATH) => Ok(handlers::handle_liveness()),
        (Method::GET, READINESS_PATH) => handlers::handle_readiness(&state).await,
        (Method::POST, SERVICE_PATH) => handlers::handle_get_translation(req, state, &path).await,
        (Method::POST, COMMAND_PATH) => handlers::handle_command(req, state, &path).await,
        (method, SERVICE_PATH | COMMAND_PATH) => {
            handlers::log_request(&state, method.as_str(), &path, 405);
            Ok(method_not_allowed())
        }
        (method, _) => {
            handlers::log_request(&state, method.as_str(), &path, 404);
            Ok(not_found())
        }
    }
}
