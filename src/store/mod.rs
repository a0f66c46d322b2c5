//! Store Layer
//!
//! Optimistic sync services. Each service owns its in-memory state and a
//! handle to the document backend: a mutation is applied locally first,
//! then confirmed remotely, and rolled back to the prior snapshot if the
//! remote write fails. Observable state is always either the fully
//! applied or the fully reverted version, never something in between.

mod log_store;
mod session;
mod todo_store;


pub use log_store::LogStore;
pub use session::{AuthChannel, AuthState, Session, UserProfile};
pub use todo_store::TodoStore;

use crate::domain::{DomainError, DomainResult};

/// Result of an optimistic mutation against the remote store.
///
/// `Err` from a mutation means it was rejected before any state was
/// touched; this type only describes mutations that were applied
/// locally.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// Local change kept; remote write confirmed.
    Applied,
    /// Remote write failed; local state was rolled back to the
    /// pre-mutation snapshot.
    Reverted(DomainError),
}

impl MutationOutcome {
    pub fn was_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied)
    }
}

/// Per-user collection path for daily logs.
pub(crate) fn logs_collection(uid: &str) -> String {
    format!("users/{}/dailyLogs", uid)
}

/// Per-user collection path for todos.
pub(crate) fn todos_collection(uid: &str) -> String {
    format!("users/{}/todos", uid)
}

/// Shared guard for services that need an attached user session.
pub(crate) fn require_attached(collection: &Option<String>) -> DomainResult<String> {
    collection
        .clone()
        .ok_or_else(|| DomainError::Conflict("no active user session".into()))
}
