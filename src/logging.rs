//! Logging bridge.
//!
//! [`RequestIdFormat`] puts the current request id on every log record,
//! read from [`context`](crate::context) at the moment the record is
//! written. Outside a request the configured default (empty by default) is
//! used, so the bridge never fails.
//!
//! ```rust,no_run
//! use tsu_request_id::logging::RequestIdFormat;
//!
//! tracing_subscriber::fmt()
//!     .event_format(RequestIdFormat::new().with_field("rid").with_default("-"))
//!     .init();
//! ```

use std::fmt;

use tracing::{Event, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::{self, Format, Full, Writer};
use tracing_subscriber::fmt::time::SystemTime;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::context::{self, REQUEST_ID_CTX_KEY};

/// Event formatter that prefixes records with `<field>=<request id>` and
/// delegates the rest to `E`.
#[derive(Clone, Debug)]
pub struct RequestIdFormat<E = Format<Full, SystemTime>> {
    inner: E,
    field: String,
    default: String,
}

impl RequestIdFormat {
    /// Wraps the default `tracing-subscriber` format.
    pub fn new() -> Self {
        Self::wrap(format::format())
    }
}

impl Default for RequestIdFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> RequestIdFormat<E> {
    pub fn wrap(inner: E) -> Self {
        Self {
            inner,
            field: REQUEST_ID_CTX_KEY.to_owned(),
            default: String::new(),
        }
    }

    /// Field name the id is written under. Defaults to `request_id`.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Value written outside a request. Defaults to the empty string.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }
}

impl<S, N, E> FormatEvent<S, N> for RequestIdFormat<E>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    E: FormatEvent<S, N>,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let id = context::get(&self.default);
        write!(writer, "{}={} ", self.field, id)?;
        self.inner.format_event(ctx, writer, event)
    }
}

/// Installs a global fmt subscriber with the bridge.
///
/// The filter comes from `RUST_LOG`, falling back to `default_filter`.
pub fn init(default_filter: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(RequestIdFormat::new())
        .try_init()
}
