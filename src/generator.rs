//! Identifier generation.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// Produces a fresh request id on demand.
///
/// Cloning is cheap (one `Arc`), and the wrapped function is called
/// concurrently from every in-flight request, so it must not rely on
/// unsynchronised shared state.
///
/// ```rust
/// use tsu_request_id::IdGenerator;
///
/// let ids = IdGenerator::new(|| format!("job-{}", 7));
/// assert_eq!(ids.generate(), "job-7");
/// ```
#[derive(Clone)]
pub struct IdGenerator(Arc<dyn Fn() -> String + Send + Sync + 'static>);

impl IdGenerator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Random version-4 UUID, hyphenated: `8-4-4-4-12` lowercase hex. The default.
    pub fn uuid_v4() -> Self {
        Self::new(|| Uuid::new_v4().hyphenated().to_string())
    }

    /// Random version-4 UUID as 32 hex digits, no hyphens.
    pub fn simple() -> Self {
        Self::new(|| Uuid::new_v4().simple().to_string())
    }

    /// Time-ordered version-7 UUID, hyphenated. Sorts by creation time.
    pub fn uuid_v7() -> Self {
        Self::new(|| Uuid::now_v7().hyphenated().to_string())
    }

    pub fn generate(&self) -> String {
        (self.0)()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::uuid_v4()
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdGenerator(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_hyphenated_v4() {
        let id = IdGenerator::default().generate();
        assert_eq!(id.len(), 36);
        assert_eq!(Uuid::parse_str(&id).unwrap().get_version_num(), 4);
    }

    #[test]
    fn simple_has_no_hyphens() {
        let id = IdGenerator::simple().generate();
        assert_eq!(id.len(), 32);
        assert!(!id.contains('-'));
        assert_eq!(Uuid::parse_str(&id).unwrap().get_version_num(), 4);
    }

    #[test]
    fn v7_carries_its_version() {
        let id = IdGenerator::uuid_v7().generate();
        assert_eq!(Uuid::parse_str(&id).unwrap().get_version_num(), 7);
    }

    #[test]
    fn ids_are_unique() {
        let ids = IdGenerator::default();
        assert_ne!(ids.generate(), ids.generate());
    }

    #[test]
    fn shared_across_threads() {
        let ids = IdGenerator::default();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = ids.clone();
                std::thread::spawn(move || ids.generate())
            })
            .collect();
        let mut out: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        out.sort();
        out.dedup();
        assert_eq!(out.len(), 4);
    }
}
