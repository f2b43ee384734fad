//! Ambient per-request identity.
//!
//! A snapshot is established once at the edge of a request and observed by
//! arbitrarily deep call chains — across suspension points — without
//! threading it through every signature and without shared mutable
//! globals. The carrier is task-local storage: each request's
//! continuations resolve their own snapshot under any interleaving.

use std::future::Future;
use ulid::Ulid;

///
/// RequestSnapshot
///
/// Immutable identity/correlation bundle for one request. The request id
/// is a ULID (millisecond timestamp plus random suffix): unique enough
/// for log correlation, never a basis for authorization.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestSnapshot {
    pub session_id: Option<String>,
    /// Lookup key for the acting user; never an owning reference.
    pub user: Option<String>,
    pub request_id: Ulid,
}

impl RequestSnapshot {
    fn new(session_id: Option<String>, user: Option<String>) -> Self {
        Self {
            session_id,
            user,
            request_id: Ulid::new(),
        }
    }
}

tokio::task_local! {
    static CURRENT: RequestSnapshot;
}

/// Run `body` under a fresh snapshot.
///
/// Everything invoked transitively within `body`, including after
/// suspension, observes that snapshot via [`current`]. Scopes nest; the
/// innermost wins for its own subtree.
pub async fn run<F>(session_id: Option<String>, user: Option<String>, body: F) -> F::Output
where
    F: Future,
{
    CURRENT
        .scope(RequestSnapshot::new(session_id, user), body)
        .await
}

/// Snapshot of the active request; `None` outside any [`run`] scope.
#[must_use]
pub fn current() -> Option<RequestSnapshot> {
    CURRENT.try_with(Clone::clone).ok()
}
