//! PostgreSQL store implementation
//!
//! Row structs stay private to this module; the mappers below are the single
//! place where stored rows are normalized into the canonical domain models
//! (availability labels validated, unknown status rejected).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    Announcement, Availability, Feedback, ProfilePatch, SwapRequest, SwapStatus, UserProfile,
};

use super::{AnnouncementStore, FeedbackStore, ProfileStore, SwapStore};

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    name: String,
    email: Option<String>,
    photo_url: Option<String>,
    location: Option<String>,
    skills_offered: Vec<String>,
    skills_wanted: Vec<String>,
    availability: Vec<String>,
    is_public: bool,
    is_banned: bool,
    is_admin: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_login: DateTime<Utc>,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        UserProfile {
            id: row.id,
            name: row.name,
            email: row.email,
            photo_url: row.photo_url,
            location: row.location,
            skills_offered: row.skills_offered,
            skills_wanted: row.skills_wanted,
            // Unknown labels written by older clients are dropped here
            availability: row
                .availability
                .iter()
                .filter_map(|s| Availability::parse(s))
                .collect(),
            is_public: row.is_public,
            is_banned: row.is_banned,
            is_admin: row.is_admin,
            created_at: row.created_at,
            updated_at: row.updated_at,
            last_login: row.last_login,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SwapRow {
    id: Uuid,
    from_user_id: Uuid,
    to_user_id: Uuid,
    skills_offered: Vec<String>,
    skills_requested: Vec<String>,
    message: Option<String>,
    status: String,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SwapRow> for SwapRequest {
    type Error = ApiError;

    fn try_from(row: SwapRow) -> Result<Self, Self::Error> {
        let status = SwapStatus::parse(&row.status).ok_or_else(|| {
            ApiError::StoreUnavailable(format!(
                "Swap request {} has unknown status '{}'",
                row.id, row.status
            ))
        })?;
        Ok(SwapRequest {
            id: row.id,
            from_user_id: row.from_user_id,
            to_user_id: row.to_user_id,
            skills_offered: row.skills_offered,
            skills_requested: row.skills_requested,
            message: row.message,
            status,
            completed_at: row.completed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn availability_labels(availability: &[Availability]) -> Vec<String> {
    availability.iter().map(|a| a.as_str().to_string()).collect()
}

fn map_swaps(rows: Vec<SwapRow>) -> ApiResult<Vec<SwapRequest>> {
    rows.into_iter().map(SwapRequest::try_from).collect()
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn get_profile(&self, id: Uuid) -> ApiResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, ProfileRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(UserProfile::from))
    }

    async fn create_profile(&self, profile: UserProfile) -> ApiResult<UserProfile> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO users (
                id, name, email, photo_url, location, skills_offered, skills_wanted,
                availability, is_public, is_banned, is_admin,
                created_at, updated_at, last_login
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(profile.id)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(&profile.photo_url)
        .bind(&profile.location)
        .bind(&profile.skills_offered)
        .bind(&profile.skills_wanted)
        .bind(availability_labels(&profile.availability))
        .bind(profile.is_public)
        .bind(profile.is_banned)
        .bind(profile.is_admin)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .bind(profile.last_login)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_profile(&self, id: Uuid, patch: ProfilePatch) -> ApiResult<UserProfile> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                photo_url = COALESCE($4, photo_url),
                location = COALESCE($5, location),
                skills_offered = COALESCE($6, skills_offered),
                skills_wanted = COALESCE($7, skills_wanted),
                availability = COALESCE($8, availability),
                is_public = COALESCE($9, is_public),
                last_login = GREATEST(last_login, COALESCE($10, last_login)),
                updated_at = $11
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.email)
        .bind(&patch.photo_url)
        .bind(&patch.location)
        .bind(&patch.skills_offered)
        .bind(&patch.skills_wanted)
        .bind(patch.availability.as_deref().map(availability_labels))
        .bind(patch.is_public)
        .bind(patch.last_login)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Profile {} not found", id)))?;

        Ok(row.into())
    }

    async fn list_public_profiles(&self, excluding: Option<Uuid>) -> ApiResult<Vec<UserProfile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT * FROM users
            WHERE is_public = TRUE AND is_banned = FALSE AND ($1::uuid IS NULL OR id != $1)
            ORDER BY name, id
            "#,
        )
        .bind(excluding)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UserProfile::from).collect())
    }

    async fn get_profiles_by_ids(&self, ids: &[Uuid]) -> ApiResult<Vec<UserProfile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ProfileRow>("SELECT * FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(UserProfile::from).collect())
    }

    async fn list_all_profiles(&self) -> ApiResult<Vec<UserProfile>> {
        let rows = sqlx::query_as::<_, ProfileRow>("SELECT * FROM users ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(UserProfile::from).collect())
    }

    async fn set_banned(&self, id: Uuid, banned: bool) -> ApiResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_banned = $2,
                updated_at = CASE WHEN is_banned != $2 THEN $3 ELSE updated_at END
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(banned)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("Profile {} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl SwapStore for PgStore {
    async fn insert_swap(&self, swap: SwapRequest) -> ApiResult<SwapRequest> {
        let row = sqlx::query_as::<_, SwapRow>(
            r#"
            INSERT INTO swap_requests (
                id, from_user_id, to_user_id, skills_offered, skills_requested,
                message, status, completed_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(swap.id)
        .bind(swap.from_user_id)
        .bind(swap.to_user_id)
        .bind(&swap.skills_offered)
        .bind(&swap.skills_requested)
        .bind(&swap.message)
        .bind(swap.status.as_str())
        .bind(swap.completed_at)
        .bind(swap.created_at)
        .bind(swap.updated_at)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn get_swap(&self, id: Uuid) -> ApiResult<Option<SwapRequest>> {
        let row = sqlx::query_as::<_, SwapRow>("SELECT * FROM swap_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(SwapRequest::try_from).transpose()
    }

    async fn update_swap_status(
        &self,
        id: Uuid,
        expected_status: SwapStatus,
        expected_updated_at: DateTime<Utc>,
        new_status: SwapStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> ApiResult<Option<SwapRequest>> {
        let row = sqlx::query_as::<_, SwapRow>(
            r#"
            UPDATE swap_requests
            SET status = $4, completed_at = COALESCE($5, completed_at), updated_at = $6
            WHERE id = $1 AND status = $2 AND updated_at = $3
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(expected_status.as_str())
        .bind(expected_updated_at)
        .bind(new_status.as_str())
        .bind(completed_at)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.map(SwapRequest::try_from).transpose()
    }

    async fn list_incoming(&self, user_id: Uuid) -> ApiResult<Vec<SwapRequest>> {
        let rows = sqlx::query_as::<_, SwapRow>(
            "SELECT * FROM swap_requests WHERE to_user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        map_swaps(rows)
    }

    async fn list_outgoing(&self, user_id: Uuid) -> ApiResult<Vec<SwapRequest>> {
        let rows = sqlx::query_as::<_, SwapRow>(
            "SELECT * FROM swap_requests WHERE from_user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        map_swaps(rows)
    }

    async fn list_all_swaps(&self) -> ApiResult<Vec<SwapRequest>> {
        let rows =
            sqlx::query_as::<_, SwapRow>("SELECT * FROM swap_requests ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        map_swaps(rows)
    }
}

#[async_trait]
impl FeedbackStore for PgStore {
    async fn insert_feedback(&self, feedback: Feedback) -> ApiResult<Feedback> {
        sqlx::query(
            r#"
            INSERT INTO feedback (
                id, swap_id, from_user_id, to_user_id, rating, comment, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(feedback.id)
        .bind(feedback.swap_id)
        .bind(feedback.from_user_id)
        .bind(feedback.to_user_id)
        .bind(feedback.rating)
        .bind(&feedback.comment)
        .bind(feedback.created_at)
        .execute(&self.pool)
        .await?;

        Ok(feedback)
    }

    async fn list_feedback_for_user(&self, user_id: Uuid) -> ApiResult<Vec<Feedback>> {
        let feedback = sqlx::query_as::<_, FeedbackRow>(
            "SELECT * FROM feedback WHERE to_user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(feedback.into_iter().map(Feedback::from).collect())
    }
}

#[derive(sqlx::FromRow)]
struct FeedbackRow {
    id: Uuid,
    swap_id: Uuid,
    from_user_id: Uuid,
    to_user_id: Uuid,
    rating: i32,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<FeedbackRow> for Feedback {
    fn from(row: FeedbackRow) -> Self {
        Feedback {
            id: row.id,
            swap_id: row.swap_id,
            from_user_id: row.from_user_id,
            to_user_id: row.to_user_id,
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl AnnouncementStore for PgStore {
    async fn insert_announcement(&self, announcement: Announcement) -> ApiResult<Announcement> {
        sqlx::query(
            r#"
            INSERT INTO announcements (id, title, message, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(announcement.id)
        .bind(&announcement.title)
        .bind(&announcement.message)
        .bind(announcement.created_by)
        .bind(announcement.created_at)
        .execute(&self.pool)
        .await?;

        Ok(announcement)
    }

    async fn delete_announcement(&self, id: Uuid) -> ApiResult<bool> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_announcements(&self) -> ApiResult<Vec<Announcement>> {
        let rows = sqlx::query_as::<_, AnnouncementRow>(
            "SELECT * FROM announcements ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Announcement::from).collect())
    }
}

#[derive(sqlx::FromRow)]
struct AnnouncementRow {
    id: Uuid,
    title: String,
    message: String,
    created_by: Uuid,
    created_at: DateTime<Utc>,
}

impl From<AnnouncementRow> for Announcement {
    fn from(row: AnnouncementRow) -> Self {
        Announcement {
            id: row.id,
            title: row.title,
            message: row.message,
            created_by: row.created_by,
            created_at: row.created_at,
        }
    }
}
