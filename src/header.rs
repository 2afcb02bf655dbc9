//! Header-name validation and inbound header lookup.
//!
//! Configured header names must match the grammar
//! `^[A-Za-z0-9][A-Za-z0-9\-_]*$`. Inbound lookup is case-insensitive and
//! joins repeated headers with `", "` in the order they arrived.

use http::{HeaderMap, HeaderValue};
use http::header::InvalidHeaderValue;

use crate::error::Error;

/// Checks `name` against the header-name grammar.
///
/// ```rust
/// use tsu_request_id::header;
///
/// assert!(header::validate("x-request-id").is_ok());
/// assert!(header::validate("#-request-id").is_err());
/// ```
pub fn validate(name: &str) -> Result<(), Error> {
    let mut bytes = name.bytes();
    let valid = match bytes.next() {
        Some(first) => {
            first.is_ascii_alphanumeric()
                && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidHeaderName { name: name.to_owned() })
    }
}

/// Returns every value sent under `name`, joined with `", "`.
///
/// `name` is compared case-insensitively. `None` when the header is absent.
pub fn joined_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let mut joined: Option<String> = None;
    for (key, value) in headers {
        if !key.as_str().eq_ignore_ascii_case(name) {
            continue;
        }
        let value = latin1(value.as_bytes());
        joined = Some(match joined {
            Some(prev) => prev + ", " + &value,
            None => value,
        });
    }
    joined
}

/// Flattens `headers` into `(name, value)` pairs, one per distinct name.
///
/// Names are lower-cased and listed in first-seen order; repeated names are
/// joined with `", "` in arrival order.
pub fn collect_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = Vec::with_capacity(headers.keys_len());
    for key in headers.keys() {
        let values: Vec<String> = headers
            .get_all(key)
            .iter()
            .map(|v| latin1(v.as_bytes()))
            .collect();
        out.push((key.as_str().to_owned(), values.join(", ")));
    }
    out
}

/// Encodes `value` for the wire, inverting the latin-1 decoding of
/// [`joined_value`] so propagated ids go back out byte for byte.
///
/// Values with code points above U+00FF are sent as UTF-8.
pub fn encode_value(value: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let latin1: Option<Vec<u8>> = value.chars().map(|c| u8::try_from(c).ok()).collect();
    match latin1 {
        Some(bytes) => HeaderValue::from_bytes(&bytes),
        None => HeaderValue::from_str(value),
    }
}

// Header values are opaque octets; every byte maps to one code point.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
