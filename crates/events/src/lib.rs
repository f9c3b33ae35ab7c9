//! Momentum event bus and notification infrastructure.
//!
//! Building blocks for the application-wide event system:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`AppEvent`] — the canonical domain event envelope.
//! - [`EventPersistence`] — background service that durably writes every
//!   event to the `audit_logs` table.
//! - [`ReminderScheduler`] — periodic processor for due scheduled
//!   notifications, honoring quiet hours and do-not-disturb.

pub mod bus;
pub mod persistence;
pub mod scheduler;

pub use bus::{AppEvent, EventBus};
pub use persistence::EventPersistence;
pub use scheduler::ReminderScheduler;
