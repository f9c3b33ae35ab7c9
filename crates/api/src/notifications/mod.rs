//! Event-driven notification routing.

mod router;

pub use router::NotificationRouter;
