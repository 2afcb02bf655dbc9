//! Unified error type.

/// Human-readable description carried by [`Error::InvalidHeaderName`].
pub const INVALID_HEADER_NAME_DESCRIPTION: &str =
    "Invalid header name provided. Please ensure that the header name is correct and try again.";

/// The error type returned by the crate's fallible operations.
///
/// Almost everything here is a construction-time failure: a misconfigured
/// middleware must never be installed. The request path itself never
/// produces an `Error`; it degrades by skipping header injection instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configured header name does not match `^[A-Za-z0-9][A-Za-z0-9\-_]*$`.
    #[error("{name} - {}", INVALID_HEADER_NAME_DESCRIPTION)]
    InvalidHeaderName { name: String },

    /// An excluded-path pattern is not a valid regular expression.
    #[error("invalid excluded path pattern `{pattern}`: {source}")]
    InvalidExcludedPath {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The strict context accessor was used outside any request scope.
    #[error("request id accessed outside of a request scope")]
    ContextUnset,

    #[error("config: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The offending header name, for [`Error::InvalidHeaderName`].
    pub fn header_name(&self) -> Option<&str> {
        match self {
            Self::InvalidHeaderName { name } => Some(name),
            _ => None,
        }
    }
}

impl From<figment::Error> for Error {
    fn from(e: figment::Error) -> Self {
        Self::Config(Box::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_header_name_keeps_the_name() {
        let err = Error::InvalidHeaderName { name: "x-request-id".to_owned() };
        assert_eq!(err.header_name(), Some("x-request-id"));
        assert_eq!(
            err.to_string(),
            format!("x-request-id - {INVALID_HEADER_NAME_DESCRIPTION}"),
        );
    }

    #[test]
    fn other_variants_have_no_header_name() {
        assert_eq!(Error::ContextUnset.header_name(), None);
    }
}
