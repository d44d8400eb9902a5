//! Abstract store contract for the SkillSwap collections
//!
//! Every service talks to the backend through these traits; the concrete
//! implementation is either PostgreSQL (production) or the in-memory store
//! (tests, local development). The traits hold no authoritative copy of any
//! record beyond the lifetime of a single call, and they specify no retry
//! behavior: a failed backend call surfaces as `StoreUnavailable`.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::models::{Announcement, Feedback, ProfilePatch, SwapRequest, SwapStatus, UserProfile};

/// Read/write contract for the `users` collection
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, id: Uuid) -> ApiResult<Option<UserProfile>>;

    /// Insert the seed record written on first sign-in.
    async fn create_profile(&self, profile: UserProfile) -> ApiResult<UserProfile>;

    /// Merge write: fields absent from the patch are preserved. Bumps
    /// `updated_at` and returns the updated record.
    async fn update_profile(&self, id: Uuid, patch: ProfilePatch) -> ApiResult<UserProfile>;

    /// Public, non-banned profiles in stable name order, excluding the
    /// caller's own id when given.
    async fn list_public_profiles(&self, excluding: Option<Uuid>) -> ApiResult<Vec<UserProfile>>;

    /// Batched lookup for display joins; one call per distinct id set.
    async fn get_profiles_by_ids(&self, ids: &[Uuid]) -> ApiResult<Vec<UserProfile>>;

    /// Every profile, for admin views.
    async fn list_all_profiles(&self) -> ApiResult<Vec<UserProfile>>;

    /// Idempotent ban flag write.
    async fn set_banned(&self, id: Uuid, banned: bool) -> ApiResult<()>;
}

/// Read/write contract for the `swap_requests` collection
#[async_trait]
pub trait SwapStore: Send + Sync {
    async fn insert_swap(&self, swap: SwapRequest) -> ApiResult<SwapRequest>;

    async fn get_swap(&self, id: Uuid) -> ApiResult<Option<SwapRequest>>;

    /// Commit a status transition guarded by a compare-and-swap on
    /// (status, updated_at). Returns `None` when the guard does not match,
    /// i.e. a concurrent transition won the race. `completed_at` is only
    /// written when `Some`.
    async fn update_swap_status(
        &self,
        id: Uuid,
        expected_status: SwapStatus,
        expected_updated_at: DateTime<Utc>,
        new_status: SwapStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> ApiResult<Option<SwapRequest>>;

    /// Requests addressed to `user_id`.
    async fn list_incoming(&self, user_id: Uuid) -> ApiResult<Vec<SwapRequest>>;

    /// Requests sent by `user_id`.
    async fn list_outgoing(&self, user_id: Uuid) -> ApiResult<Vec<SwapRequest>>;

    /// Every swap request, for admin views.
    async fn list_all_swaps(&self) -> ApiResult<Vec<SwapRequest>>;
}

/// Append-only contract for the `feedback` collection
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn insert_feedback(&self, feedback: Feedback) -> ApiResult<Feedback>;

    /// Feedback received by a user, newest first.
    async fn list_feedback_for_user(&self, user_id: Uuid) -> ApiResult<Vec<Feedback>>;
}

/// Contract for the `announcements` collection
#[async_trait]
pub trait AnnouncementStore: Send + Sync {
    async fn insert_announcement(&self, announcement: Announcement) -> ApiResult<Announcement>;

    /// Returns whether a record was actually deleted. Deleting an absent
    /// announcement is not an error.
    async fn delete_announcement(&self, id: Uuid) -> ApiResult<bool>;

    /// All announcements, newest first.
    async fn list_announcements(&self) -> ApiResult<Vec<Announcement>>;
}

/// The full store surface the application is wired against
pub trait Store: ProfileStore + SwapStore + FeedbackStore + AnnouncementStore {}

impl<T: ProfileStore + SwapStore + FeedbackStore + AnnouncementStore> Store for T {}
