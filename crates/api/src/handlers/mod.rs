pub mod activity;
pub mod activity_log;
pub mod admin;
pub mod assignment;
pub mod auth;
pub mod campaigns;
pub mod feedback;
pub mod leads;
pub mod metrics;
pub mod users;
