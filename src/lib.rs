//! Focus Ledger Core
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - progression: Rank table and XP progression calculator
//! - stats: Pure calculators over studied-day data (streaks, heatmap, reports)
//! - backend: Document-store abstraction and implementations
//! - store: Optimistic sync services and session wiring
//!
//! The crate is the headless core of a study-session tracker. All state
//! mutation goes through the `store` services: a change is applied to the
//! in-memory state first, confirmed against the remote document store, and
//! rolled back to the prior snapshot if the remote write fails.

pub mod backend;
pub mod config;
pub mod domain;
pub mod progression;
pub mod stats;
pub mod store;
pub mod timer;
pub mod transfer;

pub use domain::{DailyLog, DomainError, DomainResult, Subtask, Todo, TodoPriority, TodoStatus};
pub use progression::{calculate_progression, Progression};
pub use store::{LogStore, MutationOutcome, Session, TodoStore};
