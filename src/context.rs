//! Ambient per-request id.
//!
//! The id lives in a tokio task-local, so it follows the request's future
//! across every `.await` and is never visible to another request, whether
//! requests run on separate worker threads or interleave on one.
//!
//! ```rust
//! use tsu_request_id::context;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! assert_eq!(context::get("-"), "-");
//!
//! context::scope("abc123".to_owned(), async {
//!     assert_eq!(context::get(""), "abc123");
//! }).await;
//! # }
//! ```

use std::cell::RefCell;
use std::future::Future;

use tokio::task::futures::TaskLocalFuture;

use crate::error::Error;

/// Field name under which the id is exposed to log records.
pub const REQUEST_ID_CTX_KEY: &str = "request_id";

tokio::task_local! {
    static REQUEST_ID: RefCell<String>;
}

/// Runs `fut` with `id` as the current request id.
///
/// The value disappears when `fut` completes or is dropped.
pub fn scope<F: Future>(id: String, fut: F) -> TaskLocalFuture<RefCell<String>, F> {
    REQUEST_ID.scope(RefCell::new(id), fut)
}

/// Runs `f` synchronously with `id` as the current request id.
pub fn sync_scope<F, R>(id: String, f: F) -> R
where
    F: FnOnce() -> R,
{
    REQUEST_ID.sync_scope(RefCell::new(id), f)
}

/// Replaces the id of the current scope.
pub fn set(id: impl Into<String>) -> Result<(), Error> {
    let id = id.into();
    REQUEST_ID
        .try_with(|cell| *cell.borrow_mut() = id)
        .map_err(|_| Error::ContextUnset)
}

/// The current request id, or `default` outside a request scope.
pub fn get(default: &str) -> String {
    try_get().unwrap_or_else(|_| default.to_owned())
}

/// The current request id, failing with [`Error::ContextUnset`] outside a
/// request scope.
pub fn try_get() -> Result<String, Error> {
    REQUEST_ID
        .try_with(|cell| cell.borrow().clone())
        .map_err(|_| Error::ContextUnset)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn unset_outside_scope() {
        assert_eq!(get("fallback"), "fallback");
        assert!(matches!(try_get(), Err(Error::ContextUnset)));
        assert!(matches!(set("x"), Err(Error::ContextUnset)));
    }

    #[test]
    fn sync_scope_is_visible_inside_only() {
        let seen = sync_scope("sync-1".to_owned(), || get(""));
        assert_eq!(seen, "sync-1");
        assert!(try_get().is_err());
    }

    #[tokio::test]
    async fn survives_suspension_points() {
        scope("abc".to_owned(), async {
            tokio::task::yield_now().await;
            tokio::time::sleep(Duration::from_millis(1)).await;
            assert_eq!(try_get().unwrap(), "abc");
        })
        .await;
        assert!(try_get().is_err());
    }

    #[tokio::test]
    async fn set_overwrites_within_scope() {
        scope("first".to_owned(), async {
            set("second").unwrap();
            tokio::task::yield_now().await;
            assert_eq!(get(""), "second");
        })
        .await;
    }

    #[tokio::test]
    async fn nested_scope_shadows_outer() {
        scope("outer".to_owned(), async {
            scope("inner".to_owned(), async {
                assert_eq!(get(""), "inner");
            })
            .await;
            assert_eq!(get(""), "outer");
        })
        .await;
    }

    #[tokio::test(flavor = "current_thread")]
    async fn interleaved_requests_are_isolated() {
        async fn request(id: &'static str) -> Vec<String> {
            let mut seen = Vec::new();
            for _ in 0..5 {
                seen.push(get(""));
                tokio::task::yield_now().await;
            }
            seen.push(id.to_owned());
            seen
        }

        let (a, b) = tokio::join!(
            scope("req-a".to_owned(), request("req-a")),
            scope("req-b".to_owned(), request("req-b")),
        );
        assert!(a.iter().all(|v| v == "req-a"));
        assert!(b.iter().all(|v| v == "req-b"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn parallel_requests_are_isolated() {
        let tasks: Vec<_> = (0..32)
            .map(|i| {
                let id = format!("req-{i}");
                tokio::spawn(scope(id.clone(), async move {
                    tokio::task::yield_now().await;
                    (id, get(""))
                }))
            })
            .collect();

        for task in tasks {
            let (expected, seen) = task.await.unwrap();
            assert_eq!(expected, seen);
        }
    }
}
