//! In-memory store implementation
//!
//! Backs the integration tests and local development without a database.
//! All collections live behind a single async RwLock map each; operations
//! mirror the Postgres implementation's semantics exactly, including merge
//! writes and the compare-and-swap transition guard.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{Announcement, Feedback, ProfilePatch, SwapRequest, SwapStatus, UserProfile};

use super::{AnnouncementStore, FeedbackStore, ProfileStore, SwapStore};

/// In-memory store over plain hash maps
#[derive(Clone, Default)]
pub struct MemoryStore {
    profiles: Arc<RwLock<HashMap<Uuid, UserProfile>>>,
    swaps: Arc<RwLock<HashMap<Uuid, SwapRequest>>>,
    feedback: Arc<RwLock<Vec<Feedback>>>,
    announcements: Arc<RwLock<HashMap<Uuid, Announcement>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant or revoke the admin flag directly on the stored record.
    ///
    /// There is deliberately no API surface for this; it stands in for the
    /// operator flipping the flag in the database.
    pub async fn set_admin(&self, id: Uuid, is_admin: bool) -> ApiResult<()> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound(format!("Profile {} not found", id)))?;
        profile.is_admin = is_admin;
        profile.updated_at = Utc::now();
        Ok(())
    }
}

fn apply_patch(profile: &mut UserProfile, patch: ProfilePatch) {
    if let Some(name) = patch.name {
        profile.name = name;
    }
    if let Some(email) = patch.email {
        profile.email = Some(email);
    }
    if let Some(photo_url) = patch.photo_url {
        profile.photo_url = Some(photo_url);
    }
    if let Some(location) = patch.location {
        profile.location = Some(location);
    }
    if let Some(skills) = patch.skills_offered {
        profile.skills_offered = skills;
    }
    if let Some(skills) = patch.skills_wanted {
        profile.skills_wanted = skills;
    }
    if let Some(availability) = patch.availability {
        profile.availability = availability;
    }
    if let Some(is_public) = patch.is_public {
        profile.is_public = is_public;
    }
    if let Some(last_login) = patch.last_login {
        // last_login is monotonic non-decreasing
        if last_login > profile.last_login {
            profile.last_login = last_login;
        }
    }
    profile.updated_at = Utc::now();
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self, id: Uuid) -> ApiResult<Option<UserProfile>> {
        Ok(self.profiles.read().await.get(&id).cloned())
    }

    async fn create_profile(&self, profile: UserProfile) -> ApiResult<UserProfile> {
        let mut profiles = self.profiles.write().await;
        if profiles.contains_key(&profile.id) {
            return Err(ApiError::Conflict(format!(
                "Profile {} already exists",
                profile.id
            )));
        }
        profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn update_profile(&self, id: Uuid, patch: ProfilePatch) -> ApiResult<UserProfile> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound(format!("Profile {} not found", id)))?;
        apply_patch(profile, patch);
        Ok(profile.clone())
    }

    async fn list_public_profiles(&self, excluding: Option<Uuid>) -> ApiResult<Vec<UserProfile>> {
        let profiles = self.profiles.read().await;
        let mut public: Vec<UserProfile> = profiles
            .values()
            .filter(|p| p.is_public && !p.is_banned && Some(p.id) != excluding)
            .cloned()
            .collect();
        // Stable fetch order: by name, id as tiebreaker
        public.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(public)
    }

    async fn get_profiles_by_ids(&self, ids: &[Uuid]) -> ApiResult<Vec<UserProfile>> {
        let profiles = self.profiles.read().await;
        Ok(ids.iter().filter_map(|id| profiles.get(id).cloned()).collect())
    }

    async fn list_all_profiles(&self) -> ApiResult<Vec<UserProfile>> {
        let profiles = self.profiles.read().await;
        let mut all: Vec<UserProfile> = profiles.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn set_banned(&self, id: Uuid, banned: bool) -> ApiResult<()> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound(format!("Profile {} not found", id)))?;
        if profile.is_banned != banned {
            profile.is_banned = banned;
            profile.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[async_trait]
impl SwapStore for MemoryStore {
    async fn insert_swap(&self, swap: SwapRequest) -> ApiResult<SwapRequest> {
        self.swaps.write().await.insert(swap.id, swap.clone());
        Ok(swap)
    }

    async fn get_swap(&self, id: Uuid) -> ApiResult<Option<SwapRequest>> {
        Ok(self.swaps.read().await.get(&id).cloned())
    }

    async fn update_swap_status(
        &self,
        id: Uuid,
        expected_status: SwapStatus,
        expected_updated_at: DateTime<Utc>,
        new_status: SwapStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> ApiResult<Option<SwapRequest>> {
        let mut swaps = self.swaps.write().await;
        let swap = swaps
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound(format!("Swap request {} not found", id)))?;

        if swap.status != expected_status || swap.updated_at != expected_updated_at {
            return Ok(None);
        }

        swap.status = new_status;
        if completed_at.is_some() {
            swap.completed_at = completed_at;
        }
        swap.updated_at = Utc::now();
        Ok(Some(swap.clone()))
    }

    async fn list_incoming(&self, user_id: Uuid) -> ApiResult<Vec<SwapRequest>> {
        let swaps = self.swaps.read().await;
        let mut incoming: Vec<SwapRequest> = swaps
            .values()
            .filter(|s| s.to_user_id == user_id)
            .cloned()
            .collect();
        incoming.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(incoming)
    }

    async fn list_outgoing(&self, user_id: Uuid) -> ApiResult<Vec<SwapRequest>> {
        let swaps = self.swaps.read().await;
        let mut outgoing: Vec<SwapRequest> = swaps
            .values()
            .filter(|s| s.from_user_id == user_id)
            .cloned()
            .collect();
        outgoing.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(outgoing)
    }

    async fn list_all_swaps(&self) -> ApiResult<Vec<SwapRequest>> {
        let swaps = self.swaps.read().await;
        let mut all: Vec<SwapRequest> = swaps.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }
}

#[async_trait]
impl FeedbackStore for MemoryStore {
    async fn insert_feedback(&self, feedback: Feedback) -> ApiResult<Feedback> {
        self.feedback.write().await.push(feedback.clone());
        Ok(feedback)
    }

    async fn list_feedback_for_user(&self, user_id: Uuid) -> ApiResult<Vec<Feedback>> {
        let feedback = self.feedback.read().await;
        let mut received: Vec<Feedback> = feedback
            .iter()
            .filter(|f| f.to_user_id == user_id)
            .cloned()
            .collect();
        received.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(received)
    }
}

#[async_trait]
impl AnnouncementStore for MemoryStore {
    async fn insert_announcement(&self, announcement: Announcement) -> ApiResult<Announcement> {
        self.announcements
            .write()
            .await
            .insert(announcement.id, announcement.clone());
        Ok(announcement)
    }

    async fn delete_announcement(&self, id: Uuid) -> ApiResult<bool> {
        Ok(self.announcements.write().await.remove(&id).is_some())
    }

    async fn list_announcements(&self) -> ApiResult<Vec<Announcement>> {
        let announcements = self.announcements.read().await;
        let mut all: Vec<Announcement> = announcements.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }
}
