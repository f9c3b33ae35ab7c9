//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod audit;
pub mod board;
pub mod collaboration;
pub mod mood;
pub mod notification;
pub mod preferences;
pub mod routine;
pub mod session;
pub mod task;
pub mod user;
