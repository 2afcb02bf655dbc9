//! Middleware layer.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: structured tracing, metrics, request-id injection,
//! and authentication-header inspection.
//!
//! Middleware here wraps any [`hyper::service::Service`] and is itself one,
//! so it composes with `service_fn`, with other wrappers, and with
//! [`Server::serve`](crate::Server::serve) alike:
//!
//! ```rust,no_run
//! use std::convert::Infallible;
//!
//! use bytes::Bytes;
//! use http_body_util::Full;
//! use hyper::service::service_fn;
//! use tsu_request_id::{Config, Server, context};
//!
//! # async fn run() -> Result<(), tsu_request_id::Error> {
//! let app = service_fn(|_req: http::Request<hyper::body::Incoming>| async {
//!     let id = context::get("");
//!     Ok::<_, Infallible>(http::Response::new(Full::new(Bytes::from(id))))
//! });
//!
//! let app = Config::new().with_excluded_paths(["^/healthz$"]).layer()?.layer(app);
//! Server::bind("0.0.0.0:3000").await?.serve(app).await
//! # }
//! ```

use std::future::Future;
use std::pin::Pin;

mod body;
mod request_id;

pub use body::RequestIdBody;
pub use request_id::{RequestId, RequestIdLayer, RequestIdService};

/// A heap-allocated, type-erased future.
///
/// `Pin<Box<…>>` lets the runtime poll the future in place; `Send + 'static`
/// lets tokio move it across worker threads.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;
