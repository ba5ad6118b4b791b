//! Authorization policy for privileged operations
//!
//! Verification says who the caller is; this module decides what they
//! may do. The policy loads the caller's stored role and compares it
//! against the role a capability requires, so routes can demand "any
//! authenticated user" or "privileged user" independently.

use crate::db::UsersDb;
use crate::error::AppError;
use crate::identity::VerifiedIdentity;
use crate::models::Role;

/// Privileged things a handler can ask the policy about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ManageUsers,
    ManageAnnouncements,
    ManageReports,
}

impl Capability {
    pub fn required_role(&self) -> Role {
        match self {
            Capability::ManageUsers
            | Capability::ManageAnnouncements
            | Capability::ManageReports => Role::Admin,
        }
    }
}

pub struct AuthPolicy {
    users: UsersDb,
}

impl AuthPolicy {
    pub fn new(users: UsersDb) -> Self {
        Self { users }
    }

    /// Allow or deny the capability for this identity. Denies when the
    /// directory has no record for the caller or its role falls short.
    pub async fn authorize(
        &self,
        identity: &VerifiedIdentity,
        capability: Capability,
    ) -> Result<(), AppError> {
        let user = self
            .users
            .find_by_uid(&identity.uid)
            .await?
            .ok_or_else(|| AppError::Forbidden("no directory record for caller".to_string()))?;

        if user.role == capability.required_role() {
            Ok(())
        } else {
            tracing::debug!(uid = %identity.uid, capability = ?capability, "capability denied");
            Err(AppError::Forbidden(
                "administrator role required".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_capability_requires_admin() {
        assert_eq!(Capability::ManageUsers.required_role(), Role::Admin);
        assert_eq!(Capability::ManageAnnouncements.required_role(), Role::Admin);
        assert_eq!(Capability::ManageReports.required_role(), Role::Admin);
    }
}
