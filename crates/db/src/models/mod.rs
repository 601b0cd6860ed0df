//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches, where the
//!   entity can be edited

pub mod activity;
pub mod activity_log;
pub mod campaign;
pub mod feedback;
pub mod lead;
pub mod metrics;
pub mod user;
