//! Swap request engine - lifecycle state machine for skill swaps
//!
//! States: pending, accepted, rejected, cancelled. Pending is the only state
//! with outgoing accept/reject/cancel edges; mark-complete is the one edge
//! out of accepted and leaves the status unchanged, setting `completed_at`.
//! All validation happens before any store write; the write itself is
//! guarded by a compare-and-swap so simultaneous transitions from the two
//! parties cannot both land.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    CounterpartDisplay, CreateSwapRequest, SwapAction, SwapRequest, SwapStatus,
    SwapWithCounterpart,
};
use crate::store::Store;

/// Swap request service
pub struct SwapService {
    store: Arc<dyn Store>,
}

impl SwapService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create a new swap request from `acting_user` to the request's target.
    ///
    /// The skill lists are snapshotted onto the request; later edits to
    /// either profile do not touch them.
    pub async fn create_request(
        &self,
        acting_user: Uuid,
        request: CreateSwapRequest,
    ) -> ApiResult<SwapRequest> {
        if request.to_user_id == acting_user {
            return Err(ApiError::InvalidRequest(
                "Cannot request a swap with yourself".to_string(),
            ));
        }

        let skills_offered = clean_skill_list(&request.skills_offered);
        let skills_requested = clean_skill_list(&request.skills_requested);
        if skills_offered.is_empty() || skills_requested.is_empty() {
            return Err(ApiError::InvalidRequest(
                "Both skill lists must contain at least one skill".to_string(),
            ));
        }

        let recipient = self
            .store
            .get_profile(request.to_user_id)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!("User {} not found", request.to_user_id))
            })?;
        if recipient.is_banned {
            return Err(ApiError::NotFound(format!(
                "User {} not found",
                request.to_user_id
            )));
        }

        let now = Utc::now();
        let swap = SwapRequest {
            id: Uuid::new_v4(),
            from_user_id: acting_user,
            to_user_id: request.to_user_id,
            skills_offered,
            skills_requested,
            message: request.message.map(|m| m.trim().to_string()).filter(|m| !m.is_empty()),
            status: SwapStatus::Pending,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };

        let swap = self.store.insert_swap(swap).await?;
        tracing::info!(
            swap_id = %swap.id,
            from = %swap.from_user_id,
            to = %swap.to_user_id,
            "Swap request created"
        );
        Ok(swap)
    }

    /// Apply a state-machine action to a swap request on behalf of
    /// `acting_user`.
    ///
    /// Authorization is checked first (`Forbidden`), then the current status
    /// (`InvalidTransition`); a transition that loses the compare-and-swap
    /// race surfaces as `Conflict`.
    pub async fn transition(
        &self,
        request_id: Uuid,
        action: SwapAction,
        acting_user: Uuid,
    ) -> ApiResult<SwapRequest> {
        let swap = self
            .store
            .get_swap(request_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Swap request {} not found", request_id)))?;

        // Who may perform the action
        let authorized = match action {
            SwapAction::Accept | SwapAction::Reject => acting_user == swap.to_user_id,
            SwapAction::Cancel => acting_user == swap.from_user_id,
            SwapAction::MarkComplete => {
                acting_user == swap.from_user_id || acting_user == swap.to_user_id
            }
        };
        if !authorized {
            return Err(ApiError::Forbidden(format!(
                "User {} may not {} this swap request",
                acting_user,
                action.as_str()
            )));
        }

        // Whether the current status has an outgoing edge for the action
        let (new_status, completed_at) = match action {
            SwapAction::Accept | SwapAction::Reject | SwapAction::Cancel => {
                if swap.status != SwapStatus::Pending {
                    return Err(ApiError::InvalidTransition(format!(
                        "Cannot {} a swap request in status '{}'",
                        action.as_str(),
                        swap.status.as_str()
                    )));
                }
                let target = match action {
                    SwapAction::Accept => SwapStatus::Accepted,
                    SwapAction::Reject => SwapStatus::Rejected,
                    _ => SwapStatus::Cancelled,
                };
                (target, None)
            }
            SwapAction::MarkComplete => {
                if swap.status != SwapStatus::Accepted {
                    return Err(ApiError::InvalidTransition(format!(
                        "Cannot mark a swap request complete in status '{}'",
                        swap.status.as_str()
                    )));
                }
                if swap.completed_at.is_some() {
                    return Err(ApiError::InvalidTransition(
                        "Swap request is already completed".to_string(),
                    ));
                }
                (SwapStatus::Accepted, Some(Utc::now()))
            }
        };

        let updated = self
            .store
            .update_swap_status(
                swap.id,
                swap.status,
                swap.updated_at,
                new_status,
                completed_at,
            )
            .await?
            .ok_or_else(|| {
                ApiError::Conflict(
                    "Swap request was modified concurrently; reload and retry".to_string(),
                )
            })?;

        tracing::info!(
            swap_id = %updated.id,
            action = %action.as_str(),
            status = %updated.status.as_str(),
            "Swap request transitioned"
        );
        Ok(updated)
    }

    /// Requests addressed to `user_id`, each joined with the sender's
    /// display fields.
    pub async fn list_incoming(&self, user_id: Uuid) -> ApiResult<Vec<SwapWithCounterpart>> {
        let swaps = self.store.list_incoming(user_id).await?;
        self.join_counterparts(swaps, |s| s.from_user_id).await
    }

    /// Requests sent by `user_id`, each joined with the recipient's display
    /// fields.
    pub async fn list_outgoing(&self, user_id: Uuid) -> ApiResult<Vec<SwapWithCounterpart>> {
        let swaps = self.store.list_outgoing(user_id).await?;
        self.join_counterparts(swaps, |s| s.to_user_id).await
    }

    /// Join counterpart display data with a single batched profile lookup,
    /// never one query per row.
    async fn join_counterparts(
        &self,
        swaps: Vec<SwapRequest>,
        counterpart_id: impl Fn(&SwapRequest) -> Uuid,
    ) -> ApiResult<Vec<SwapWithCounterpart>> {
        let mut ids: Vec<Uuid> = swaps.iter().map(&counterpart_id).collect();
        ids.sort();
        ids.dedup();

        let profiles = self.store.get_profiles_by_ids(&ids).await?;
        let display: HashMap<Uuid, CounterpartDisplay> = profiles
            .into_iter()
            .map(|p| {
                (
                    p.id,
                    CounterpartDisplay {
                        id: p.id,
                        name: p.name,
                        photo_url: p.photo_url,
                    },
                )
            })
            .collect();

        Ok(swaps
            .into_iter()
            .map(|swap| {
                let counterpart = display.get(&counterpart_id(&swap)).cloned();
                SwapWithCounterpart { swap, counterpart }
            })
            .collect())
    }
}

/// Trim entries and drop empty ones; order is preserved.
fn clean_skill_list(skills: &[String]) -> Vec<String> {
    skills
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
