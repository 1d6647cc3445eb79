//! Caller-owned log handle.
//!
//! The engine never installs a global subscriber. A caller may hand it a
//! `tracing::Dispatch`; every event the engine emits, including those from
//! rayon worker threads, is then routed through that dispatch.

use tracing::Dispatch;

/// Run `f` with `log` as the thread's default dispatch, if one is given.
pub(crate) fn scoped<R>(log: Option<&Dispatch>, f: impl FnOnce() -> R) -> R {
    match log {
        Some(dispatch) => tracing::dispatcher::with_default(dispatch, f),
        None => f(),
    }
}
