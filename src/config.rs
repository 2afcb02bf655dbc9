//! Middleware configuration and loading.
//!
//! Build a [`Config`] in code, or load one with [`Config::load`], then turn
//! it into a [`RequestIdLayer`] with [`Config::layer`]. All validation
//! happens there: a layer that exists is a layer that is correctly configured.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::generator::IdGenerator;
use crate::middleware::RequestIdLayer;

/// Header name used for both directions unless overridden.
pub const DEFAULT_HEADER_NAME: &str = "request-id";

/// Prefix for environment overrides in [`Config::load`].
pub const ENV_PREFIX: &str = "REQUEST_ID_";

/// Request-id middleware options.
///
/// | field | default |
/// |---|---|
/// | `excluded_paths` | none |
/// | `incoming_request_id_header` | `request-id` |
/// | `outgoing_request_id_header` | `request-id` |
/// | `prefix` | empty |
/// | `skip_validate_header_name` | `false` |
/// | `generator` | random UUIDv4, hyphenated |
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Regular expressions; a request whose path matches any of them is
    /// passed through untouched.
    pub excluded_paths: Vec<String>,

    /// Header read for propagation.
    pub incoming_request_id_header: String,

    /// Header appended to the response.
    pub outgoing_request_id_header: String,

    /// Prepended to generated ids. Propagated ids are used verbatim.
    pub prefix: String,

    pub skip_validate_header_name: bool,

    #[serde(skip)]
    pub generator: IdGenerator,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            excluded_paths: Vec::new(),
            incoming_request_id_header: DEFAULT_HEADER_NAME.to_owned(),
            outgoing_request_id_header: DEFAULT_HEADER_NAME.to_owned(),
            prefix: String::new(),
            skip_validate_header_name: false,
            generator: IdGenerator::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads options from, lowest to highest priority: defaults, the TOML
    /// file at `path` (skipped if missing), `REQUEST_ID_*` environment
    /// variables.
    ///
    /// The generator is not loadable; set it with [`Config::with_generator`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        Ok(config)
    }

    pub fn with_excluded_paths<I, P>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.excluded_paths = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_incoming_header(mut self, name: impl Into<String>) -> Self {
        self.incoming_request_id_header = name.into();
        self
    }

    pub fn with_outgoing_header(mut self, name: impl Into<String>) -> Self {
        self.outgoing_request_id_header = name.into();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_skip_validate_header_name(mut self, skip: bool) -> Self {
        self.skip_validate_header_name = skip;
        self
    }

    pub fn with_generator(mut self, generator: IdGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Validates the options and builds the middleware layer.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidHeaderName`] if either header name breaks the
    ///   header-name grammar (unless `skip_validate_header_name`).
    /// - [`Error::InvalidExcludedPath`] if a pattern does not compile.
    pub fn layer(self) -> Result<RequestIdLayer, Error> {
        RequestIdLayer::new(self)
    }
}
