//! Request-id middleware.
//!
//! For every plain request/response exchange whose path is not excluded:
//!
//! 1. The id is read from the incoming header (all values joined with
//!    `", "`), or generated as `prefix + generator()` when that header is
//!    absent or empty.
//! 2. The wrapped service runs with the id in [`context`](crate::context),
//!    in a `request` span, and in the request's extensions as [`RequestId`].
//!    Inbound headers are left alone.
//! 3. Once the wrapped service yields its response (status and headers
//!    final, body not yet sent) the id is appended under the outgoing header.
//!    The body is wrapped so it still sees the id while it streams.
//!
//! WebSocket handshakes, `CONNECT` tunnels, and excluded paths are forwarded
//! untouched. Errors from the wrapped service propagate unchanged and leave
//! nothing to decorate.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use http::{HeaderMap, HeaderName, Method, Request, Response, header};
use hyper::service::Service;
use tracing::{Instrument, debug, info_span, warn};

use crate::config::Config;
use crate::context;
use crate::error::Error;
use crate::exclude::ExcludedPaths;
use crate::generator::IdGenerator;
use crate::header as headers;
use crate::middleware::{BoxFuture, RequestIdBody};

/// The id resolved for a request, available from its extensions.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated, immutable middleware settings. Built once, shared by every
/// request through an `Arc`.
#[derive(Debug)]
struct Settings {
    excluded: ExcludedPaths,
    incoming: String,
    // `None` only when validation was skipped and the name is not a legal
    // HTTP field name.
    outgoing: Option<HeaderName>,
    prefix: String,
    generator: IdGenerator,
}

impl Settings {
    /// Propagated value when present and non-empty, fresh id otherwise.
    fn resolve(&self, inbound: &HeaderMap) -> String {
        match headers::joined_value(inbound, &self.incoming) {
            Some(id) if !id.is_empty() => {
                debug!(request_id = %id, header = %self.incoming, "request id propagated");
                id
            }
            _ => {
                let id = format!("{}{}", self.prefix, self.generator.generate());
                debug!(request_id = %id, "request id generated");
                id
            }
        }
    }

    fn decorate<B>(&self, res: &mut Response<B>, id: &str) {
        let Some(name) = &self.outgoing else {
            return;
        };
        match headers::encode_value(id) {
            Ok(value) => {
                res.headers_mut().append(name.clone(), value);
            }
            Err(_) => {
                warn!(request_id = %id, header = %name, "request id is not a valid header value, response left undecorated");
            }
        }
    }
}

/// Builds [`RequestIdService`]s from one validated [`Config`].
///
/// Cheap to clone; every clone shares the same settings.
#[derive(Clone, Debug)]
pub struct RequestIdLayer {
    settings: Arc<Settings>,
}

impl RequestIdLayer {
    /// Validates `config`. Prefer [`Config::layer`].
    pub fn new(config: Config) -> Result<Self, Error> {
        if !config.skip_validate_header_name {
            headers::validate(&config.incoming_request_id_header)?;
            headers::validate(&config.outgoing_request_id_header)?;
        }

        let excluded = ExcludedPaths::new(&config.excluded_paths)?;

        let outgoing = match HeaderName::from_bytes(config.outgoing_request_id_header.as_bytes()) {
            Ok(name) => Some(name),
            Err(_) => {
                warn!(
                    header = %config.outgoing_request_id_header,
                    "outgoing request id header is not a legal HTTP header name, responses will not carry it",
                );
                None
            }
        };

        Ok(Self {
            settings: Arc::new(Settings {
                excluded,
                incoming: config.incoming_request_id_header,
                outgoing,
                prefix: config.prefix,
                generator: config.generator,
            }),
        })
    }

    /// Wraps `inner`.
    pub fn layer<S>(&self, inner: S) -> RequestIdService<S> {
        RequestIdService { inner, settings: Arc::clone(&self.settings) }
    }
}

/// A [`Service`] that assigns a request id around `S`.
#[derive(Clone, Debug)]
pub struct RequestIdService<S> {
    inner: S,
    settings: Arc<Settings>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestIdService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
    S::Error: 'static,
    ResBody: Send + 'static,
{
    type Response = Response<RequestIdBody<ResBody>>;
    type Error = S::Error;
    type Future = BoxFuture<Result<Self::Response, S::Error>>;

    fn call(&self, mut req: Request<ReqBody>) -> Self::Future {
        if !is_plain_exchange(&req) {
            debug!(method = %req.method(), "not a plain request/response exchange, passing through");
            return passthrough(self.inner.call(req));
        }

        if self.settings.excluded.is_excluded(req.uri().path()) {
            debug!(path = %req.uri().path(), "path excluded, passing through");
            return passthrough(self.inner.call(req));
        }

        let id = self.settings.resolve(req.headers());
        req.extensions_mut().insert(RequestId(id.clone()));

        let span = info_span!(
            "request",
            method = %req.method(),
            path = %req.uri().path(),
            request_id = %id,
        );

        // Work done inside `call` itself already sees the id.
        let fut = context::sync_scope(id.clone(), || span.in_scope(|| self.inner.call(req)));

        let settings = Arc::clone(&self.settings);
        let resolved = id.clone();
        let decorated = async move {
            let mut res = fut.await?;
            settings.decorate(&mut res, &resolved);
            Ok(res.map(|body| RequestIdBody::scoped(body, resolved)))
        };

        Box::pin(context::scope(id, decorated).instrument(span))
    }
}

fn passthrough<F, B, E>(fut: F) -> BoxFuture<Result<Response<RequestIdBody<B>>, E>>
where
    F: Future<Output = Result<Response<B>, E>> + Send + 'static,
    B: 'static,
    E: 'static,
{
    Box::pin(async move { Ok(fut.await?.map(RequestIdBody::passthrough)) })
}

// WebSocket handshakes and tunnels are not request/response exchanges.
// Any other `Upgrade` (h2c, TLS) is answered as a normal request.
fn is_plain_exchange<B>(req: &Request<B>) -> bool {
    req.method() != Method::CONNECT && !is_websocket_upgrade(req.headers())
}

fn is_websocket_upgrade(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::UPGRADE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|token| token.trim().eq_ignore_ascii_case("websocket"))
}
