//! Lost-lead feedback model and DTOs.

use leadflow_core::feedback::FeedbackType;
use leadflow_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `lead_feedback` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Feedback {
    pub id: DbId,
    pub lead_id: DbId,
    pub sales_id: DbId,
    #[sqlx(try_from = "String")]
    pub feedback_type: FeedbackType,
    pub reason_text: String,
    pub follow_up_required: bool,
    pub follow_up_date: Option<Date>,
    pub submitted_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFeedback {
    pub feedback_type: FeedbackType,
    pub reason_text: String,
    #[serde(default)]
    pub follow_up_required: bool,
    pub follow_up_date: Option<Date>,
}
