//! Feedback recording
//!
//! Feedback records are append-only; nothing in the system ever mutates one
//! after creation, and submitting feedback never touches the swap request it
//! refers to.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{Feedback, SubmitFeedbackRequest};
use crate::store::Store;

/// Feedback service
pub struct FeedbackService {
    store: Arc<dyn Store>,
}

impl FeedbackService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Record feedback from `acting_user` on a swap they took part in.
    ///
    /// A rating of 0 is the "not yet rated" sentinel used by callers and is
    /// rejected before anything reaches the store; ratings outside [1,5]
    /// are an `InvalidRating`. The recipient is always the other party of
    /// the swap, never caller-supplied.
    pub async fn submit(
        &self,
        acting_user: Uuid,
        request: SubmitFeedbackRequest,
    ) -> ApiResult<Feedback> {
        if request.rating == 0 {
            return Err(ApiError::InvalidRequest(
                "Rating has not been set".to_string(),
            ));
        }
        if !(1..=5).contains(&request.rating) {
            return Err(ApiError::InvalidRating(format!(
                "Rating must be between 1 and 5, got {}",
                request.rating
            )));
        }

        let swap = self
            .store
            .get_swap(request.swap_id)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!("Swap request {} not found", request.swap_id))
            })?;

        let to_user_id = if acting_user == swap.from_user_id {
            swap.to_user_id
        } else if acting_user == swap.to_user_id {
            swap.from_user_id
        } else {
            return Err(ApiError::Forbidden(format!(
                "User {} is not a party to swap request {}",
                acting_user, swap.id
            )));
        };

        let feedback = Feedback {
            id: Uuid::new_v4(),
            swap_id: swap.id,
            from_user_id: acting_user,
            to_user_id,
            rating: request.rating,
            comment: request
                .comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            created_at: Utc::now(),
        };

        let feedback = self.store.insert_feedback(feedback).await?;
        tracing::info!(
            feedback_id = %feedback.id,
            swap_id = %feedback.swap_id,
            rating = feedback.rating,
            "Feedback recorded"
        );
        Ok(feedback)
    }
}
