//! Data models for the SkillSwap backend

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

/// Availability slots a user can advertise on their profile
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Availability {
    Weekends,
    Evenings,
    Weekdays,
    Mornings,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Weekends => "Weekends",
            Availability::Evenings => "Evenings",
            Availability::Weekdays => "Weekdays",
            Availability::Mornings => "Mornings",
        }
    }

    /// Parse a stored slot label. Unknown labels are rejected so bad rows
    /// surface at the store boundary instead of deep inside a filter.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Weekends" => Some(Availability::Weekends),
            "Evenings" => Some(Availability::Evenings),
            "Weekdays" => Some(Availability::Weekdays),
            "Mornings" => Some(Availability::Mornings),
            _ => None,
        }
    }
}

/// User profile model
///
/// The canonical profile record. Default-filling for missing fields happens
/// once, in the store row mappers, so every service sees the same shape.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub location: Option<String>,
    pub skills_offered: Vec<String>,
    pub skills_wanted: Vec<String>,
    pub availability: Vec<Availability>,
    pub is_public: bool,
    pub is_banned: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
}

impl UserProfile {
    /// Seed profile written on first successful sign-in.
    ///
    /// Admin rights are never granted here; they have to be set explicitly
    /// on the stored record.
    pub fn seed(id: Uuid, name: String, email: Option<String>, photo_url: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            email,
            photo_url,
            location: None,
            skills_offered: Vec::new(),
            skills_wanted: Vec::new(),
            availability: Vec::new(),
            is_public: true,
            is_banned: false,
            is_admin: false,
            created_at: now,
            updated_at: now,
            last_login: now,
        }
    }
}

/// Partial profile update with merge semantics: `None` fields are preserved
/// by the store, `Some` fields overwrite.
#[derive(Debug, Default, Clone)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub location: Option<String>,
    pub skills_offered: Option<Vec<String>>,
    pub skills_wanted: Option<Vec<String>>,
    pub availability: Option<Vec<Availability>>,
    pub is_public: Option<bool>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Public projection of a profile, as returned by search and profile views
#[derive(Debug, Serialize, Clone)]
pub struct PublicProfile {
    pub id: Uuid,
    pub name: String,
    pub photo_url: Option<String>,
    pub location: Option<String>,
    pub skills_offered: Vec<String>,
    pub skills_wanted: Vec<String>,
    pub availability: Vec<Availability>,
}

impl From<UserProfile> for PublicProfile {
    fn from(p: UserProfile) -> Self {
        Self {
            id: p.id,
            name: p.name,
            photo_url: p.photo_url,
            location: p.location,
            skills_offered: p.skills_offered,
            skills_wanted: p.skills_wanted,
            availability: p.availability,
        }
    }
}

/// Swap request status
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl SwapStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapStatus::Pending => "pending",
            SwapStatus::Accepted => "accepted",
            SwapStatus::Rejected => "rejected",
            SwapStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(SwapStatus::Pending),
            "accepted" => Some(SwapStatus::Accepted),
            "rejected" => Some(SwapStatus::Rejected),
            "cancelled" => Some(SwapStatus::Cancelled),
            _ => None,
        }
    }

    /// Pending is the only status with outgoing accept/reject/cancel edges.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SwapStatus::Pending)
    }
}

/// Actions on a swap request, one per state-machine edge
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SwapAction {
    Accept,
    Reject,
    Cancel,
    MarkComplete,
}

impl SwapAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapAction::Accept => "accept",
            SwapAction::Reject => "reject",
            SwapAction::Cancel => "cancel",
            SwapAction::MarkComplete => "mark_complete",
        }
    }
}

/// Swap request model
///
/// The skill lists are snapshots taken at creation time; later profile
/// edits must not change them.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SwapRequest {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub skills_offered: Vec<String>,
    pub skills_requested: Vec<String>,
    pub message: Option<String>,
    pub status: SwapStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Display snapshot of the counterpart profile joined onto a swap listing
#[derive(Debug, Serialize, Clone)]
pub struct CounterpartDisplay {
    pub id: Uuid,
    pub name: String,
    pub photo_url: Option<String>,
}

/// A swap request joined with the counterpart's display fields
#[derive(Debug, Serialize)]
pub struct SwapWithCounterpart {
    #[serde(flatten)]
    pub swap: SwapRequest,
    pub counterpart: Option<CounterpartDisplay>,
}

/// Feedback record, immutable once created
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Feedback {
    pub id: Uuid,
    pub swap_id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Admin-authored announcement
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

// ===== Request DTOs =====

/// Request DTO for creating a swap request
#[derive(Debug, Deserialize)]
pub struct CreateSwapRequest {
    pub to_user_id: Uuid,
    pub skills_offered: Vec<String>,
    pub skills_requested: Vec<String>,
    pub message: Option<String>,
}

/// Request DTO for profile edits (merge, not replace)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub location: Option<String>,
    pub is_public: Option<bool>,
}

/// Which of the two skill lists a skill edit targets
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    Offered,
    Wanted,
}

/// Request DTO for adding or removing a skill
#[derive(Debug, Deserialize, Validate)]
pub struct SkillEditRequest {
    pub kind: SkillKind,
    #[validate(length(min = 1, max = 60))]
    pub skill: String,
}

/// Request DTO for replacing the availability set
#[derive(Debug, Deserialize)]
pub struct SetAvailabilityRequest {
    pub availability: Vec<Availability>,
}

/// Request DTO for submitting feedback on a swap
#[derive(Debug, Deserialize)]
pub struct SubmitFeedbackRequest {
    pub swap_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
}

/// Request DTO for creating an announcement
#[derive(Debug, Deserialize)]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub message: String,
}

/// Query parameters for profile search
#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    /// Free-text term matched against name, skills and location
    pub q: Option<String>,
    /// Comma-separated availability labels, OR-combined
    pub availability: Option<String>,
}

// ===== Export projections =====

/// Flattened user row for the admin export
#[derive(Debug, Serialize)]
pub struct UserExportRow {
    pub name: String,
    pub email: String,
    pub location: String,
    pub skills_offered: String,
    pub skills_wanted: String,
    pub is_banned: bool,
    pub created_at: String,
}

/// Flattened swap row for the admin export
#[derive(Debug, Serialize)]
pub struct SwapExportRow {
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub status: SwapStatus,
    pub created_at: String,
}

/// Full tabular snapshot returned by the export endpoint
#[derive(Debug, Serialize)]
pub struct ExportSnapshot {
    pub users: Vec<UserExportRow>,
    pub swaps: Vec<SwapExportRow>,
}

// ===== Generic response wrappers =====

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}
