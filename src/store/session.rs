//! Session Wiring
//!
//! Reacts to authentication state changes: sign-in provisions the user
//! profile document and loads both stores, sign-out resets them. Also
//! bridges the stores to the export/import snapshot format.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::watch;

use crate::backend::{DocumentStore, WriteOp};
use crate::domain::{DomainError, DomainResult};
use crate::progression::{calculate_progression, xp_for_minutes, Progression};
use crate::stats::{studied_days, total_minutes, StudiedDays};
use crate::transfer::Snapshot;

use super::{LogStore, MutationOutcome, TodoStore};

/// Collection holding one profile document per user.
const USERS_COLLECTION: &str = "users";

/// Identity of a signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserProfile {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: None,
            email: None,
        }
    }
}

/// Authentication state reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    SignedOut,
    SignedIn(UserProfile),
}

/// Watchable channel of authentication state changes.
///
/// The backend's auth listener pushes states in; any number of
/// observers can watch for the latest one.
pub struct AuthChannel {
    tx: watch::Sender<AuthState>,
}

impl AuthChannel {
    pub fn new() -> Self {
        Self {
            tx: watch::channel(AuthState::SignedOut).0,
        }
    }

    pub fn set(&self, state: AuthState) {
        // Observers may come and go; an unobserved change is fine.
        let _ = self.tx.send(state);
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }
}

impl Default for AuthChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// One user's working session over both stores
pub struct Session {
    backend: Arc<dyn DocumentStore>,
    pub logs: LogStore,
    pub todos: TodoStore,
    user: Option<UserProfile>,
}

impl Session {
    pub fn new(backend: Arc<dyn DocumentStore>) -> Self {
        Self {
            logs: LogStore::new(Arc::clone(&backend)),
            todos: TodoStore::new(Arc::clone(&backend)),
            backend,
            user: None,
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Apply an authentication state change.
    pub async fn apply_auth(&mut self, state: AuthState) -> DomainResult<()> {
        match state {
            AuthState::SignedIn(profile) => {
                self.ensure_profile_document(&profile).await?;
                self.logs.attach(&profile.uid).await?;
                self.todos.attach(&profile.uid).await?;
                log::info!("session started for {}", profile.uid);
                self.user = Some(profile);
            }
            AuthState::SignedOut => {
                if let Some(profile) = self.user.take() {
                    log::info!("session ended for {}", profile.uid);
                }
                self.logs.reset();
                self.todos.reset();
            }
        }
        Ok(())
    }

    /// Create the user's profile document on first sign-in.
    async fn ensure_profile_document(&self, profile: &UserProfile) -> DomainResult<()> {
        if self
            .backend
            .get(USERS_COLLECTION, &profile.uid)
            .await?
            .is_some()
        {
            return Ok(());
        }
        let fields = json!({
            "displayName": profile.display_name,
            "email": profile.email,
            "createdAt": Utc::now().to_rfc3339(),
            "settings": { "theme": "dark" },
        });
        self.backend.write(USERS_COLLECTION, &profile.uid, fields).await
    }

    /// Current snapshot of both stores in the export format.
    pub fn export_snapshot(&self) -> Snapshot {
        Snapshot::from_state(self.logs.logs(), self.todos.todos())
    }

    /// Replace both stores from a validated snapshot, in one atomic
    /// batch across both collections. Local state rolls back on failure.
    pub async fn import_snapshot(&mut self, snapshot: Snapshot) -> DomainResult<MutationOutcome> {
        let logs_collection = self
            .logs
            .collection()
            .ok_or_else(|| DomainError::Conflict("no active user session".into()))?
            .to_string();
        let todos_collection = self
            .todos
            .collection()
            .ok_or_else(|| DomainError::Conflict("no active user session".into()))?
            .to_string();

        let logs = snapshot.to_logs()?;
        let todos = snapshot.todos;

        let mut writes: Vec<WriteOp> = self
            .logs
            .replacement_writes(&logs_collection, &logs)
            .await?;
        writes.extend(
            self.todos
                .replacement_writes(&todos_collection, &todos)
                .await?,
        );

        let prior_logs = self.logs.local_replace(logs);
        let prior_todos = self.todos.local_replace(todos);

        let result = self.backend.batch_commit(writes).await;
        match result {
            Ok(()) => Ok(MutationOutcome::Applied),
            Err(err) => {
                log::warn!("import failed, rolling back: {}", err);
                self.logs.local_replace(prior_logs);
                self.todos.local_replace(prior_todos);
                Ok(MutationOutcome::Reverted(err))
            }
        }
    }

    /// Studied-day view of the fetched logs.
    pub fn studied_days(&self) -> StudiedDays {
        studied_days(self.logs.logs())
    }

    /// Progression derived from all studied minutes.
    pub fn progression(&self) -> Progression {
        let minutes = total_minutes(&self.studied_days());
        calculate_progression(xp_for_minutes(minutes))
    }
}
