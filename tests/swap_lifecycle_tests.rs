//! Swap request lifecycle tests against the in-memory store

use std::sync::Arc;

use uuid::Uuid;

use skillswap_backend::error::ApiError;
use skillswap_backend::models::{
    CreateSwapRequest, SkillEditRequest, SkillKind, SwapAction, SwapStatus, UserProfile,
};
use skillswap_backend::services::{ProfileService, SwapService};
use skillswap_backend::store::{MemoryStore, ProfileStore};

struct Fixture {
    swaps: SwapService,
    profiles: ProfileService,
    ann: UserProfile,
    ben: UserProfile,
}

async fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let ann = store
        .create_profile(UserProfile::seed(
            Uuid::new_v4(),
            "Ann".to_string(),
            None,
            None,
        ))
        .await
        .unwrap();
    let ben = store
        .create_profile(UserProfile::seed(
            Uuid::new_v4(),
            "Ben".to_string(),
            None,
            None,
        ))
        .await
        .unwrap();

    Fixture {
        swaps: SwapService::new(store.clone()),
        profiles: ProfileService::new(store),
        ann,
        ben,
    }
}

fn request_to(to_user_id: Uuid) -> CreateSwapRequest {
    CreateSwapRequest {
        to_user_id,
        skills_offered: vec!["Guitar".to_string()],
        skills_requested: vec!["Cooking".to_string()],
        message: Some("Trade lessons?".to_string()),
    }
}

#[tokio::test]
async fn full_lifecycle_accept_then_complete() {
    let f = fixture().await;

    let swap = f
        .swaps
        .create_request(f.ann.id, request_to(f.ben.id))
        .await
        .unwrap();
    assert_eq!(swap.status, SwapStatus::Pending);
    assert!(swap.completed_at.is_none());

    let accepted = f
        .swaps
        .transition(swap.id, SwapAction::Accept, f.ben.id)
        .await
        .unwrap();
    assert_eq!(accepted.status, SwapStatus::Accepted);

    let completed = f
        .swaps
        .transition(swap.id, SwapAction::MarkComplete, f.ann.id)
        .await
        .unwrap();
    assert_eq!(completed.status, SwapStatus::Accepted);
    assert!(completed.completed_at.is_some());

    // A second completion has no edge to follow
    let err = f
        .swaps
        .transition(swap.id, SwapAction::MarkComplete, f.ben.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidTransition(_)));
}

#[tokio::test]
async fn only_the_recipient_may_accept_or_reject() {
    let f = fixture().await;
    let swap = f
        .swaps
        .create_request(f.ann.id, request_to(f.ben.id))
        .await
        .unwrap();

    let err = f
        .swaps
        .transition(swap.id, SwapAction::Accept, f.ann.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    let err = f
        .swaps
        .transition(swap.id, SwapAction::Reject, f.ann.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
}

#[tokio::test]
async fn only_the_sender_may_cancel() {
    let f = fixture().await;
    let swap = f
        .swaps
        .create_request(f.ann.id, request_to(f.ben.id))
        .await
        .unwrap();

    let err = f
        .swaps
        .transition(swap.id, SwapAction::Cancel, f.ben.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    let cancelled = f
        .swaps
        .transition(swap.id, SwapAction::Cancel, f.ann.id)
        .await
        .unwrap();
    assert_eq!(cancelled.status, SwapStatus::Cancelled);
}

#[tokio::test]
async fn terminal_states_have_no_outgoing_edges() {
    let f = fixture().await;
    let swap = f
        .swaps
        .create_request(f.ann.id, request_to(f.ben.id))
        .await
        .unwrap();
    f.swaps
        .transition(swap.id, SwapAction::Reject, f.ben.id)
        .await
        .unwrap();

    for (action, actor) in [
        (SwapAction::Accept, f.ben.id),
        (SwapAction::Cancel, f.ann.id),
        (SwapAction::MarkComplete, f.ann.id),
    ] {
        let err = f
            .swaps
            .transition(swap.id, action, actor)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidTransition(_)));
    }
}

#[tokio::test]
async fn authorization_is_checked_before_status() {
    let f = fixture().await;
    let swap = f
        .swaps
        .create_request(f.ann.id, request_to(f.ben.id))
        .await
        .unwrap();
    f.swaps
        .transition(swap.id, SwapAction::Accept, f.ben.id)
        .await
        .unwrap();

    // A third party cancelling an accepted swap fails on authorization,
    // not on the status check
    let err = f
        .swaps
        .transition(swap.id, SwapAction::Cancel, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
}

#[tokio::test]
async fn skill_snapshot_survives_profile_edits() {
    let f = fixture().await;
    f.profiles
        .add_skill(
            f.ann.id,
            SkillEditRequest {
                kind: SkillKind::Offered,
                skill: "Guitar".to_string(),
            },
        )
        .await
        .unwrap();

    let swap = f
        .swaps
        .create_request(f.ann.id, request_to(f.ben.id))
        .await
        .unwrap();

    f.profiles
        .remove_skill(f.ann.id, SkillKind::Offered, "Guitar")
        .await
        .unwrap();

    let outgoing = f.swaps.list_outgoing(f.ann.id).await.unwrap();
    assert_eq!(outgoing[0].swap.id, swap.id);
    assert_eq!(outgoing[0].swap.skills_offered, vec!["Guitar".to_string()]);
}

#[tokio::test]
async fn invalid_creations_are_rejected() {
    let f = fixture().await;

    let err = f
        .swaps
        .create_request(f.ann.id, request_to(f.ann.id))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidRequest(_)));

    let err = f
        .swaps
        .create_request(
            f.ann.id,
            CreateSwapRequest {
                to_user_id: f.ben.id,
                skills_offered: vec!["  ".to_string()],
                skills_requested: vec!["Cooking".to_string()],
                message: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidRequest(_)));

    let err = f
        .swaps
        .create_request(f.ann.id, request_to(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn listings_join_the_counterpart_display_fields() {
    let f = fixture().await;
    f.swaps
        .create_request(f.ann.id, request_to(f.ben.id))
        .await
        .unwrap();

    let incoming = f.swaps.list_incoming(f.ben.id).await.unwrap();
    assert_eq!(incoming.len(), 1);
    let counterpart = incoming[0].counterpart.as_ref().unwrap();
    assert_eq!(counterpart.id, f.ann.id);
    assert_eq!(counterpart.name, "Ann");

    let outgoing = f.swaps.list_outgoing(f.ann.id).await.unwrap();
    assert_eq!(outgoing[0].counterpart.as_ref().unwrap().name, "Ben");

    assert!(f.swaps.list_incoming(f.ann.id).await.unwrap().is_empty());
}
