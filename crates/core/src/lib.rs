//! Domain rules for the lead CRM.
//!
//! Everything in this crate is pure: enums and their wire/database spellings,
//! boundary validation, role and ownership checks, and the metrics math that
//! turns lead and campaign rows into reports. The `db` and `api` crates pass
//! data in; nothing here touches the database.

#[macro_use]
mod macros;

pub mod access;
pub mod activity;
pub mod campaign;
pub mod error;
pub mod feedback;
pub mod lead;
pub mod metrics;
pub mod platform;
pub mod roles;
pub mod types;
