//! # tsu-request-id
//!
//! Request-id middleware for hyper services. One id per request, visible
//! everywhere the request goes, echoed on the way out. Nothing more.
//!
//! ## The contract
//!
//! For every inbound request the middleware:
//!
//! - **Propagates** the id from the incoming header (`request-id` by default)
//!   when the client sent one, verbatim.
//! - **Generates** `prefix + generator()` otherwise (random UUIDv4 by default).
//! - **Exposes** it to everything the handler calls through [`context`],
//!   a task-local that follows the request across `.await` points, stays
//!   set while the response body streams, and never leaks into a concurrent
//!   request.
//! - **Echoes** it by appending the outgoing header to the response, once,
//!   when the handler's response is ready.
//!
//! What it does not do: tracing spans across services, persistence, retries.
//! Excluded paths (health checks, metrics scrapes), WebSocket upgrades and
//! `CONNECT` tunnels pass through untouched.
//!
//! Misconfiguration fails at startup: header names must match
//! `^[A-Za-z0-9][A-Za-z0-9\-_]*$` and excluded paths must be valid regular
//! expressions, or [`Config::layer`] returns an [`Error`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::convert::Infallible;
//!
//! use bytes::Bytes;
//! use http_body_util::Full;
//! use hyper::service::service_fn;
//! use tsu_request_id::{Config, IdGenerator, Server, context};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tsu_request_id::Error> {
//!     let layer = Config::new()
//!         .with_excluded_paths(["^/healthz$"])
//!         .with_incoming_header("x-request-id")
//!         .with_outgoing_header("x-request-id")
//!         .with_prefix("api-")
//!         .with_generator(IdGenerator::simple())
//!         .layer()?;
//!
//!     let app = layer.layer(service_fn(info));
//!     Server::bind("0.0.0.0:3000").await?.serve(app).await
//! }
//!
//! async fn info(_req: http::Request<hyper::body::Incoming>)
//!     -> Result<http::Response<Full<Bytes>>, Infallible>
//! {
//!     tracing::info!(request_id = %context::get(""), "info requested");
//!     Ok(http::Response::new(Full::new(Bytes::from_static(b"info"))))
//! }
//! ```

mod config;
mod error;
mod exclude;
mod generator;
mod server;

pub mod context;
pub mod header;
pub mod logging;
pub mod middleware;

pub use config::{Config, DEFAULT_HEADER_NAME, ENV_PREFIX};
pub use error::{Error, INVALID_HEADER_NAME_DESCRIPTION};
pub use exclude::ExcludedPaths;
pub use generator::IdGenerator;
pub use middleware::{RequestId, RequestIdBody, RequestIdLayer, RequestIdService};
pub use server::Server;
