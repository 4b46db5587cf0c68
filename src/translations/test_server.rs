// Local translation file server for tests

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::time::Duration;
use tokio::net::TcpListener;

async fn canned(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let (status, body) = match req.uri().path() {
        "/static/translations/de-abc123.json" => {
            (StatusCode::OK, r#"{"ui":{"common":{"yes":"Ja","no":"Nein"}}}"#)
        }
        "/static/translations/he-d4e5.json" => (StatusCode::OK, r#"{"ui":{"common":{"yes":"כן"}}}"#),
        "/static/translations/fr-broken.json" => (StatusCode::OK, "{not json"),
        "/static/translations/es-slow.json" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            (StatusCode::OK, "{}")
        }
        _ => (StatusCode::NOT_FOUND, "404: Not Found"),
    };

    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap())
}

/// Start a server with canned translation files, returns its base URL
pub async fn spawn() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service_fn(canned))
                    .await;
            });
        }
    });

    format!("http://{addr}")
}

/// Base URL of a port nothing listens on
pub async fn unreachable() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
