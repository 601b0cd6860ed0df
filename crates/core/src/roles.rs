//! User roles, account statuses and the per-request actor context.
//!
//! These spellings must match the CHECK constraints in
//! `20250101000001_create_users.sql`.

use crate::types::DbId;

define_text_enum! {
    /// What a user is allowed to do.
    Role("role") {
        Admin = "admin",
        Marketing = "marketing",
        Sales = "sales",
    }
}

define_text_enum! {
    /// Account status. Only `active` users may log in or receive leads.
    UserStatus("user status") {
        Active = "active",
        Inactive = "inactive",
        Pending = "pending",
    }
}

/// The authenticated identity every core operation runs on behalf of.
///
/// Built by the API layer from a validated access token and passed
/// explicitly into each rule check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorContext {
    pub user_id: DbId,
    pub role: Role,
}

impl ActorContext {
    pub fn new(user_id: DbId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_marketing(&self) -> bool {
        self.role == Role::Marketing
    }

    pub fn is_sales(&self) -> bool {
        self.role == Role::Sales
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_its_spelling() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), *role);
        }
    }

    #[test]
    fn unknown_role_rejected() {
        let err = "owner".parse::<Role>().unwrap_err();
        assert!(err.to_string().contains("Invalid role 'owner'"));
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Marketing).unwrap(), "\"marketing\"");
        let status: UserStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(status, UserStatus::Pending);
    }

    #[test]
    fn actor_role_predicates() {
        let admin = ActorContext::new(1, Role::Admin);
        let sales = ActorContext::new(2, Role::Sales);
        assert!(admin.is_admin() && !admin.is_sales());
        assert!(sales.is_sales() && !sales.is_marketing());
    }
}
