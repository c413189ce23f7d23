//! # UserService
//!
//! Profile reads and owner-only writes.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    CallerIdentity, DomainError, IdentityVerifier, ProfileChanges, Result, UserProfile,
    UserRepository,
};
use tracing::{info, warn};

pub struct UserService {
    users: Arc<dyn UserRepository>,
    identities: Arc<dyn IdentityVerifier>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, identities: Arc<dyn IdentityVerifier>) -> Self {
        Self { users, identities }
    }

    /// Stored profile, or a placeholder built from the identity provider's
    /// record when the user never created one.
    pub async fn get_profile(&self, id: &str) -> Result<UserProfile> {
        if let Some(profile) = self.users.get_profile(id).await? {
            return Ok(profile);
        }
        self.identities
            .lookup_user(id)
            .await?
            .map(|identity| UserProfile::placeholder(&identity))
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    /// Writes the caller's profile, replacing any previous one.
    pub async fn create_profile(
        &self,
        caller: &CallerIdentity,
        bio: Option<String>,
    ) -> Result<UserProfile> {
        let profile = UserProfile {
            id: caller.id.clone(),
            display_name: caller.author_name(),
            email: caller.email.clone(),
            bio: bio.unwrap_or_default(),
            created_at: Some(Utc::now()),
        };
        let stored = self.users.set_profile(profile).await?;
        info!(user_id = %stored.id, "profile saved");
        Ok(stored)
    }

    pub async fn update_profile(
        &self,
        caller: &CallerIdentity,
        id: &str,
        changes: ProfileChanges,
    ) -> Result<UserProfile> {
        if caller.id != id {
            warn!(user_id = %caller.id, target = id, "refused foreign profile update");
            return Err(DomainError::forbidden(
                "User not authorized to edit this profile.",
            ));
        }
        if let Some(name) = &changes.display_name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("Display name cannot be empty."));
            }
        }

        self.users
            .update_profile(id, changes)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }
}
