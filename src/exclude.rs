//! Path exclusion.
//!
//! A request bypasses the middleware when any configured pattern matches
//! anywhere in its path. Patterns are unanchored regular expressions; add
//! `^` / `$` to pin them to the whole path.

use regex::Regex;

use crate::error::Error;

/// Compiled exclusion patterns. Empty means nothing is excluded.
#[derive(Clone, Debug, Default)]
pub struct ExcludedPaths {
    patterns: Vec<Regex>,
}

impl ExcludedPaths {
    /// Compiles every pattern, failing on the first invalid one.
    pub fn new<I, P>(patterns: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(p).map_err(|source| Error::InvalidExcludedPath {
                    pattern: p.to_owned(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(path))
    }
}
