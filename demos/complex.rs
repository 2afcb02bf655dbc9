//! Request-id example with every option set, loaded from a TOML file and
//! `REQUEST_ID_*` environment variables, with a hex generator set in code.
//!
//! Run with:
//!   cargo run --example complex -- demos/request-id.toml
//!   REQUEST_ID_PREFIX=other- cargo run --example complex
//!
//! Try:
//!   curl -i http://localhost:8000/info        # x-request-id: my-special-prefix-<32 hex>
//!   curl -i http://localhost:8000/excluded    # no x-request-id
//!   curl -i -H 'x-request-id: abc123' http://localhost:8000/headers

use std::convert::Infallible;

use bytes::Bytes;
use http::{Request, Response, StatusCode};
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::service::service_fn;
use tsu_request_id::{Config, IdGenerator, Server, context, header, logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    logging::init("info,tsu_request_id=debug")?;

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/request-id.toml".to_owned());
    let config = Config::load(&path)?;

    tracing::info!(config_path = %path, ?config, "starting");

    let app = config
        .with_generator(IdGenerator::simple())
        .layer()?
        .layer(service_fn(route));

    Server::bind("127.0.0.1:8000").await?.serve(app).await?;
    Ok(())
}

async fn route(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let body = match req.uri().path() {
        "/info" => info().await,
        "/excluded" => br#"{"message":"excluded"}"#.to_vec(),
        "/headers" => echo_headers(req.headers()),
        _ => {
            let mut res = Response::new(Full::new(Bytes::new()));
            *res.status_mut() = StatusCode::NOT_FOUND;
            return Ok(res);
        }
    };

    let mut res = Response::new(Full::new(Bytes::from(body)));
    res.headers_mut()
        .insert(http::header::CONTENT_TYPE, http::HeaderValue::from_static("application/json"));
    Ok(res)
}

// Deep in the call stack, no request in sight: the id is still there.
async fn info() -> Vec<u8> {
    tokio::task::yield_now().await;
    let id = context::get("");
    tracing::info!("building info response");
    format!(r#"{{"message":"info","request_id":"{id}"}}"#).into_bytes()
}

// What the application received, repeated headers already joined.
fn echo_headers(headers: &http::HeaderMap) -> Vec<u8> {
    let fields: Vec<String> = header::collect_headers(headers)
        .into_iter()
        .map(|(name, value)| format!("{name:?}:{value:?}"))
        .collect();
    format!("{{{}}}", fields.join(",")).into_bytes()
}
