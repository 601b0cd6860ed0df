//! Role and ownership checks for every lead and campaign operation.
//!
//! | Operation                   | admin | marketing                 | sales               |
//! |-----------------------------|-------|---------------------------|---------------------|
//! | create campaign             | yes   | yes                       | no                  |
//! | manage campaign             | yes   | own campaigns             | no                  |
//! | assign lead                 | yes   | leads of own campaigns    | no                  |
//! | update lead / feedback      | yes   | no                        | leads assigned to them |
//! | view lead                   | yes   | leads of own campaigns    | leads assigned to them |
//! | metrics scope               | all   | own campaigns             | own leads           |
//! | file daily activity         | yes   | no                        | yes                 |

use crate::error::CoreError;
use crate::roles::{ActorContext, Role, UserStatus};
use crate::types::DbId;

/// Only `active` accounts may log in or act with a previously issued token.
pub fn ensure_active_account(status: UserStatus) -> Result<(), CoreError> {
    if status != UserStatus::Active {
        return Err(CoreError::Forbidden(format!("Account is {status}")));
    }
    Ok(())
}

/// Only admin and marketing may create campaigns or see the assignee picker.
pub fn ensure_staff(actor: &ActorContext) -> Result<(), CoreError> {
    if actor.is_admin() || actor.is_marketing() {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Admin or marketing role required".to_string(),
        ))
    }
}

/// Campaign mutations are limited to admins and the marketing author.
pub fn ensure_campaign_owner(actor: &ActorContext, created_by: DbId) -> Result<(), CoreError> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Marketing if created_by == actor.user_id => Ok(()),
        Role::Marketing => Err(CoreError::Forbidden(
            "You can only manage campaigns you created".to_string(),
        )),
        Role::Sales => Err(CoreError::Forbidden(
            "Sales users cannot manage campaigns".to_string(),
        )),
    }
}

/// Whether the actor may read a campaign.
///
/// `has_assigned_leads` tells whether the campaign owns a lead assigned to
/// the actor; only consulted for sales users.
pub fn can_view_campaign(
    actor: &ActorContext,
    created_by: DbId,
    assigned_to: Option<DbId>,
    has_assigned_leads: bool,
) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Marketing => {
            created_by == actor.user_id || assigned_to == Some(actor.user_id)
        }
        Role::Sales => has_assigned_leads,
    }
}

/// Assignment rights: admins always, marketing only for leads whose campaign
/// they authored. `campaign_owner` is the `created_by` of the lead's
/// campaign, or `None` for a campaign-less lead.
pub fn ensure_can_assign(
    actor: &ActorContext,
    campaign_owner: Option<DbId>,
) -> Result<(), CoreError> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Marketing if campaign_owner == Some(actor.user_id) => Ok(()),
        Role::Marketing => Err(CoreError::Forbidden(
            "You can only assign leads from campaigns you created".to_string(),
        )),
        Role::Sales => Err(CoreError::Forbidden(
            "Sales users cannot assign leads".to_string(),
        )),
    }
}

/// Working a lead (status updates, feedback) is limited to admins and the
/// sales agent the lead is assigned to.
pub fn ensure_can_work_lead(
    actor: &ActorContext,
    assigned_to: Option<DbId>,
) -> Result<(), CoreError> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Sales if assigned_to == Some(actor.user_id) => Ok(()),
        Role::Sales => Err(CoreError::Forbidden(
            "This lead is not assigned to you".to_string(),
        )),
        Role::Marketing => Err(CoreError::Forbidden(
            "Only the assigned sales agent or an admin can update a lead".to_string(),
        )),
    }
}

pub fn can_view_lead(
    actor: &ActorContext,
    assigned_to: Option<DbId>,
    campaign_owner: Option<DbId>,
) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Marketing => campaign_owner == Some(actor.user_id),
        Role::Sales => assigned_to == Some(actor.user_id),
    }
}

/// Daily activity is filed by sales agents; admins may file their own too.
pub fn ensure_can_report_activity(actor: &ActorContext) -> Result<(), CoreError> {
    if actor.is_marketing() {
        return Err(CoreError::Forbidden(
            "Marketing users do not file daily activity".to_string(),
        ));
    }
    Ok(())
}

/// Only active sales users can receive leads.
pub fn ensure_valid_assignee(role: Role, status: UserStatus) -> Result<(), CoreError> {
    if role != Role::Sales {
        return Err(CoreError::Validation(
            "Leads can only be assigned to sales users".to_string(),
        ));
    }
    if status != UserStatus::Active {
        return Err(CoreError::Validation(format!(
            "Cannot assign leads to a {status} user"
        )));
    }
    Ok(())
}

/// Row-level visibility derived from the actor's role, used for list and
/// metrics queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordScope {
    /// No filter.
    All,
    /// Leads and campaigns belonging to campaigns created by this user.
    CampaignOwner(DbId),
    /// Leads assigned to this user (and their campaigns).
    Assignee(DbId),
}

impl RecordScope {
    pub fn for_actor(actor: &ActorContext) -> Self {
        match actor.role {
            Role::Admin => RecordScope::All,
            Role::Marketing => RecordScope::CampaignOwner(actor.user_id),
            Role::Sales => RecordScope::Assignee(actor.user_id),
        }
    }

    /// `created_by` filter to bind, if any.
    pub fn campaign_owner(self) -> Option<DbId> {
        match self {
            RecordScope::CampaignOwner(id) => Some(id),
            _ => None,
        }
    }

    /// `assigned_to` filter to bind, if any.
    pub fn assignee(self) -> Option<DbId> {
        match self {
            RecordScope::Assignee(id) => Some(id),
            _ => None,
        }
    }
}
