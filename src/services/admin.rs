//! Admin moderation operations
//!
//! Ban/unban, announcement management and the flattened export snapshot.
//! Authorization (the admin flag) is enforced by the extractor layer before
//! any of these run; the acting admin id only flows in here for attribution
//! and logging.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    Announcement, CreateAnnouncementRequest, ExportSnapshot, SwapExportRow, SwapRequest,
    UserExportRow, UserProfile,
};
use crate::store::Store;

/// Admin service
pub struct AdminService {
    store: Arc<dyn Store>,
}

impl AdminService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Ban a user. Banning an already-banned user is a no-op success.
    pub async fn ban_user(&self, acting_admin: Uuid, user_id: Uuid) -> ApiResult<()> {
        self.store.set_banned(user_id, true).await?;
        tracing::info!(admin = %acting_admin, user = %user_id, "User banned");
        Ok(())
    }

    /// Lift a ban. Unbanning a user who is not banned is a no-op success.
    pub async fn unban_user(&self, acting_admin: Uuid, user_id: Uuid) -> ApiResult<()> {
        self.store.set_banned(user_id, false).await?;
        tracing::info!(admin = %acting_admin, user = %user_id, "User unbanned");
        Ok(())
    }

    pub async fn list_users(&self) -> ApiResult<Vec<UserProfile>> {
        self.store.list_all_profiles().await
    }

    pub async fn list_swaps(&self) -> ApiResult<Vec<SwapRequest>> {
        self.store.list_all_swaps().await
    }

    /// Publish an announcement. Title and message must be non-empty after
    /// trimming.
    pub async fn create_announcement(
        &self,
        acting_admin: Uuid,
        request: CreateAnnouncementRequest,
    ) -> ApiResult<Announcement> {
        let title = request.title.trim().to_string();
        let message = request.message.trim().to_string();
        if title.is_empty() || message.is_empty() {
            return Err(ApiError::InvalidRequest(
                "Announcement title and message must not be empty".to_string(),
            ));
        }

        let announcement = Announcement {
            id: Uuid::new_v4(),
            title,
            message,
            created_by: acting_admin,
            created_at: Utc::now(),
        };
        self.store.insert_announcement(announcement).await
    }

    /// Delete an announcement. Deleting one that is already gone is treated
    /// as success, so a repeated delete from a stale admin view does not
    /// error.
    pub async fn delete_announcement(&self, acting_admin: Uuid, id: Uuid) -> ApiResult<()> {
        let deleted = self.store.delete_announcement(id).await?;
        if deleted {
            tracing::info!(admin = %acting_admin, announcement = %id, "Announcement deleted");
        } else {
            tracing::debug!(announcement = %id, "Delete of absent announcement ignored");
        }
        Ok(())
    }

    pub async fn list_announcements(&self) -> ApiResult<Vec<Announcement>> {
        self.store.list_announcements().await
    }

    /// Build the flattened export snapshot of users and swap requests.
    /// Pure read; nothing is mutated.
    pub async fn export_snapshot(&self) -> ApiResult<ExportSnapshot> {
        let users = self
            .store
            .list_all_profiles()
            .await?
            .into_iter()
            .map(|p| UserExportRow {
                name: p.name,
                email: p.email.unwrap_or_default(),
                location: p.location.unwrap_or_default(),
                skills_offered: p.skills_offered.join("; "),
                skills_wanted: p.skills_wanted.join("; "),
                is_banned: p.is_banned,
                created_at: p.created_at.to_rfc3339(),
            })
            .collect();

        let swaps = self
            .store
            .list_all_swaps()
            .await?
            .into_iter()
            .map(|s| SwapExportRow {
                from_user_id: s.from_user_id,
                to_user_id: s.to_user_id,
                status: s.status,
                created_at: s.created_at.to_rfc3339(),
            })
            .collect();

        Ok(ExportSnapshot { users, swaps })
    }
}

/// Render the user half of an export snapshot as CSV.
pub fn users_csv(rows: &[UserExportRow]) -> String {
    let mut out = String::from("name,email,location,skills_offered,skills_wanted,is_banned,created_at\n");
    for row in rows {
        let fields = [
            row.name.as_str(),
            row.email.as_str(),
            row.location.as_str(),
            row.skills_offered.as_str(),
            row.skills_wanted.as_str(),
            if row.is_banned { "true" } else { "false" },
            row.created_at.as_str(),
        ];
        out.push_str(&csv_line(&fields));
    }
    out
}

/// Render the swap half of an export snapshot as CSV.
pub fn swaps_csv(rows: &[SwapExportRow]) -> String {
    let mut out = String::from("from_user_id,to_user_id,status,created_at\n");
    for row in rows {
        let from = row.from_user_id.to_string();
        let to = row.to_user_id.to_string();
        let fields = [
            from.as_str(),
            to.as_str(),
            row.status.as_str(),
            row.created_at.as_str(),
        ];
        out.push_str(&csv_line(&fields));
    }
    out
}

fn csv_line(fields: &[&str]) -> String {
    let mut line = fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

/// Quote a field when it contains a delimiter, quote or newline; embedded
/// quotes are doubled per RFC 4180.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
