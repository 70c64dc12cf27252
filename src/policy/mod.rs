//! Role-based access policy.
//!
//! A single pure predicate decides every (role, action) pair so the rules are
//! testable without the HTTP layer. `authorize` is the request-time entry
//! point: it re-reads the caller's profile row, so a role change takes effect
//! on the very next request.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::profiles::ProfileRepository;
use crate::error::ApiError;

pub const ROLES: [&str; 3] = ["admin", "researcher", "viewer"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Researcher,
    Viewer,
}

impl Role {
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "admin" => Some(Role::Admin),
            "researcher" => Some(Role::Researcher),
            "viewer" => Some(Role::Viewer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Researcher => "researcher",
            Role::Viewer => "viewer",
        }
    }
}

/// Every operation a caller can request past authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListUsers,
    GetUser,
    CreateUser,
    UpdateUser,
    DeleteUser,
    ListProfiles,
    GetProfile,
    UpdateRole,
    ReadOwnProfile,
    Logout,
    ReadSensorData,
    UploadSensorData,
}

/// The role gate: admins may mutate users and reassign roles; every other
/// action requires only an authenticated caller.
pub fn allow(role: Role, action: Action) -> bool {
    match action {
        Action::CreateUser | Action::UpdateUser | Action::DeleteUser | Action::UpdateRole => {
            role == Role::Admin
        }
        Action::ListUsers
        | Action::GetUser
        | Action::ListProfiles
        | Action::GetProfile
        | Action::ReadOwnProfile
        | Action::Logout
        | Action::ReadSensorData
        | Action::UploadSensorData => true,
    }
}

/// Load the caller's current role from their profile and apply the gate.
///
/// Returns the role on success so handlers can reuse it without a second
/// lookup. Denial is a 403; a missing profile is treated as a denial too,
/// since the caller has no role to claim.
pub async fn authorize(pool: &PgPool, user_id: Uuid, action: Action) -> Result<Role, ApiError> {
    let profile = ProfileRepository::new(pool.clone())
        .find_by_user(user_id)
        .await?
        .ok_or_else(|| ApiError::forbidden("No profile associated with this account"))?;

    let role = Role::parse(&profile.role)
        .ok_or_else(|| ApiError::forbidden("Account has an unrecognized role"))?;

    if !allow(role, action) {
        return Err(ApiError::forbidden(
            "You do not have permission to perform this action",
        ));
    }

    Ok(role)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ACTIONS: [Action; 12] = [
        Action::ListUsers,
        Action::GetUser,
        Action::CreateUser,
        Action::UpdateUser,
        Action::DeleteUser,
        Action::ListProfiles,
        Action::GetProfile,
        Action::UpdateRole,
        Action::ReadOwnProfile,
        Action::Logout,
        Action::ReadSensorData,
        Action::UploadSensorData,
    ];

    fn admin_only(action: Action) -> bool {
        matches!(
            action,
            Action::CreateUser | Action::UpdateUser | Action::DeleteUser | Action::UpdateRole
        )
    }

    #[test]
    fn admin_is_allowed_everything() {
        for action in ALL_ACTIONS {
            assert!(allow(Role::Admin, action), "admin denied {:?}", action);
        }
    }

    #[test]
    fn researcher_and_viewer_are_denied_exactly_the_admin_actions() {
        for role in [Role::Researcher, Role::Viewer] {
            for action in ALL_ACTIONS {
                assert_eq!(
                    allow(role, action),
                    !admin_only(action),
                    "{:?} / {:?}",
                    role,
                    action
                );
            }
        }
    }

    #[test]
    fn viewer_cannot_update_roles() {
        assert!(!allow(Role::Viewer, Action::UpdateRole));
    }

    #[test]
    fn role_parsing_round_trips() {
        for name in ROLES {
            let role = Role::parse(name).unwrap();
            assert_eq!(role.as_str(), name);
        }
        assert!(Role::parse("superuser").is_none());
        assert!(Role::parse("Admin").is_none());
    }
}
