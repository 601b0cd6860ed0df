//! Repository layer: one zero-sized struct per table, async methods taking a
//! `&PgPool` (or an executor when they must join a caller's transaction).

pub mod activity_log_repo;
pub mod campaign_repo;
pub mod daily_activity_repo;
pub mod feedback_repo;
pub mod lead_repo;
pub mod metrics_repo;
pub mod user_repo;

pub use activity_log_repo::ActivityLogRepo;
pub use campaign_repo::CampaignRepo;
pub use daily_activity_repo::DailyActivityRepo;
pub use feedback_repo::FeedbackRepo;
pub use lead_repo::LeadRepo;
pub use metrics_repo::MetricsRepo;
pub use user_repo::UserRepo;
