//! Profile management
//!
//! Owns the sign-in seed/refresh path and all self-service profile edits.
//! Every write goes through the store's merge update, so a partial edit can
//! never wipe fields the caller did not send.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    Feedback, ProfilePatch, PublicProfile, SkillEditRequest, SkillKind, UpdateProfileRequest,
    UserProfile,
};
use crate::store::Store;

/// Profile service
pub struct ProfileService {
    store: Arc<dyn Store>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Fetch the acting user's own profile.
    pub async fn get_own_profile(&self, user_id: Uuid) -> ApiResult<UserProfile> {
        self.store
            .get_profile(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Profile {} not found", user_id)))
    }

    /// Fetch another user's public projection.
    ///
    /// Private and banned profiles read as absent to everyone but their
    /// owner.
    pub async fn get_public_profile(
        &self,
        acting_user: Option<Uuid>,
        id: Uuid,
    ) -> ApiResult<PublicProfile> {
        let profile = self
            .store
            .get_profile(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Profile {} not found", id)))?;

        let is_owner = acting_user == Some(profile.id);
        if !is_owner && (!profile.is_public || profile.is_banned) {
            return Err(ApiError::NotFound(format!("Profile {} not found", id)));
        }
        Ok(PublicProfile::from(profile))
    }

    /// Merge-update the basic profile fields.
    pub async fn update_profile(
        &self,
        acting_user: Uuid,
        request: UpdateProfileRequest,
    ) -> ApiResult<UserProfile> {
        request.validate()?;

        let name = match request.name {
            Some(name) => {
                let trimmed = name.trim().to_string();
                if trimmed.is_empty() {
                    return Err(ApiError::InvalidRequest(
                        "Name must not be empty".to_string(),
                    ));
                }
                Some(trimmed)
            }
            None => None,
        };

        let patch = ProfilePatch {
            name,
            location: request.location.map(|l| l.trim().to_string()),
            is_public: request.is_public,
            ..Default::default()
        };
        self.store.update_profile(acting_user, patch).await
    }

    /// Add a skill to one of the two lists.
    ///
    /// Duplicates are detected case-insensitively; adding an existing skill
    /// is a no-op that still returns the current profile.
    pub async fn add_skill(
        &self,
        acting_user: Uuid,
        request: SkillEditRequest,
    ) -> ApiResult<UserProfile> {
        request.validate()?;
        let skill = request.skill.trim().to_string();
        if skill.is_empty() {
            return Err(ApiError::InvalidRequest(
                "Skill must not be empty".to_string(),
            ));
        }

        let profile = self.get_own_profile(acting_user).await?;
        let list = match request.kind {
            SkillKind::Offered => &profile.skills_offered,
            SkillKind::Wanted => &profile.skills_wanted,
        };
        if list.iter().any(|s| s.eq_ignore_ascii_case(&skill)) {
            return Ok(profile);
        }

        let mut updated = list.clone();
        updated.push(skill);
        self.write_skill_list(acting_user, request.kind, updated)
            .await
    }

    /// Remove a skill from one of the two lists. Removing a skill that is
    /// not present leaves the list unchanged.
    pub async fn remove_skill(
        &self,
        acting_user: Uuid,
        kind: SkillKind,
        skill: &str,
    ) -> ApiResult<UserProfile> {
        let profile = self.get_own_profile(acting_user).await?;
        let list = match kind {
            SkillKind::Offered => &profile.skills_offered,
            SkillKind::Wanted => &profile.skills_wanted,
        };
        let updated: Vec<String> = list.iter().filter(|s| *s != skill).cloned().collect();
        if updated.len() == list.len() {
            return Ok(profile);
        }
        self.write_skill_list(acting_user, kind, updated).await
    }

    /// Replace the availability set, deduplicated with order preserved.
    pub async fn set_availability(
        &self,
        acting_user: Uuid,
        availability: Vec<crate::models::Availability>,
    ) -> ApiResult<UserProfile> {
        let mut slots = Vec::new();
        for slot in availability {
            if !slots.contains(&slot) {
                slots.push(slot);
            }
        }
        let patch = ProfilePatch {
            availability: Some(slots),
            ..Default::default()
        };
        self.store.update_profile(acting_user, patch).await
    }

    /// Feedback received by a user, newest first.
    pub async fn feedback_for(&self, user_id: Uuid) -> ApiResult<Vec<Feedback>> {
        self.store.list_feedback_for_user(user_id).await
    }

    /// Seed a profile on first sign-in, or refresh identity fields on a
    /// returning user.
    ///
    /// A returning user's chosen display name wins over the provider's;
    /// email, photo and `last_login` are refreshed on every sign-in.
    pub async fn ensure_profile(
        &self,
        id: Uuid,
        name: String,
        email: Option<String>,
        photo_url: Option<String>,
    ) -> ApiResult<UserProfile> {
        match self.store.get_profile(id).await? {
            Some(existing) => {
                let patch = ProfilePatch {
                    name: if existing.name.trim().is_empty() {
                        Some(name)
                    } else {
                        None
                    },
                    email,
                    photo_url,
                    last_login: Some(Utc::now()),
                    ..Default::default()
                };
                self.store.update_profile(id, patch).await
            }
            None => {
                let profile = UserProfile::seed(id, name, email, photo_url);
                let profile = self.store.create_profile(profile).await?;
                tracing::info!(user_id = %profile.id, "Seeded new user profile");
                Ok(profile)
            }
        }
    }

    async fn write_skill_list(
        &self,
        user_id: Uuid,
        kind: SkillKind,
        skills: Vec<String>,
    ) -> ApiResult<UserProfile> {
        let patch = match kind {
            SkillKind::Offered => ProfilePatch {
                skills_offered: Some(skills),
                ..Default::default()
            },
            SkillKind::Wanted => ProfilePatch {
                skills_wanted: Some(skills),
                ..Default::default()
            },
        };
        self.store.update_profile(user_id, patch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> (ProfileService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (ProfileService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn add_skill_deduplicates_case_insensitively() {
        let (service, _) = service();
        let profile = service
            .ensure_profile(Uuid::new_v4(), "Ann".to_string(), None, None)
            .await
            .unwrap();

        let edit = |skill: &str| SkillEditRequest {
            kind: SkillKind::Offered,
            skill: skill.to_string(),
        };
        service.add_skill(profile.id, edit("Guitar")).await.unwrap();
        let after = service.add_skill(profile.id, edit("guitar")).await.unwrap();

        assert_eq!(after.skills_offered, vec!["Guitar".to_string()]);
    }

    #[tokio::test]
    async fn private_profile_reads_as_absent_to_others() {
        let (service, _) = service();
        let owner = service
            .ensure_profile(Uuid::new_v4(), "Ann".to_string(), None, None)
            .await
            .unwrap();
        service
            .update_profile(
                owner.id,
                UpdateProfileRequest {
                    name: None,
                    location: None,
                    is_public: Some(false),
                },
            )
            .await
            .unwrap();

        let err = service
            .get_public_profile(Some(Uuid::new_v4()), owner.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        // The owner still sees their own profile
        assert!(service
            .get_public_profile(Some(owner.id), owner.id)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn returning_sign_in_keeps_chosen_name() {
        let (service, _) = service();
        let id = Uuid::new_v4();
        service
            .ensure_profile(id, "Provider Name".to_string(), None, None)
            .await
            .unwrap();
        service
            .update_profile(
                id,
                UpdateProfileRequest {
                    name: Some("Chosen Name".to_string()),
                    location: None,
                    is_public: None,
                },
            )
            .await
            .unwrap();

        let refreshed = service
            .ensure_profile(
                id,
                "Provider Name".to_string(),
                Some("ann@example.com".to_string()),
                None,
            )
            .await
            .unwrap();

        assert_eq!(refreshed.name, "Chosen Name");
        assert_eq!(refreshed.email.as_deref(), Some("ann@example.com"));
    }
}
