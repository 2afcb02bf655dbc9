//! Minimal request-id example: `/info` gets an id, `/excluded` does not.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example simple
//!
//! Try:
//!   curl -i http://localhost:8000/info
//!   curl -i -H 'x-request-id: abc123' http://localhost:8000/info
//!   curl -i http://localhost:8000/excluded

use std::convert::Infallible;

use bytes::Bytes;
use http::{Request, Response, StatusCode};
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::service::service_fn;
use tsu_request_id::{Config, Server, logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    logging::init("info")?;

    let app = Config::new()
        .with_excluded_paths(["/excluded"])
        .with_incoming_header("x-request-id")
        .with_outgoing_header("x-request-id")
        .layer()?
        .layer(service_fn(route));

    Server::bind("127.0.0.1:8000").await?.serve(app).await?;
    Ok(())
}

async fn route(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let body: &'static [u8] = match req.uri().path() {
        "/info" => br#"{"message":"info"}"#,
        "/excluded" => br#"{"message":"excluded"}"#,
        _ => return Ok(status(StatusCode::NOT_FOUND)),
    };
    tracing::info!(path = %req.uri().path(), "handled");

    let mut res = Response::new(Full::new(Bytes::from_static(body)));
    res.headers_mut()
        .insert(http::header::CONTENT_TYPE, http::HeaderValue::from_static("application/json"));
    Ok(res)
}

fn status(code: StatusCode) -> Response<Full<Bytes>> {
    let mut res = Response::new(Full::new(Bytes::new()));
    *res.status_mut() = code;
    res
}
