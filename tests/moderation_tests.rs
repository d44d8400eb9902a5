//! Admin moderation and feedback tests against the in-memory store

use std::sync::Arc;

use uuid::Uuid;

use skillswap_backend::error::ApiError;
use skillswap_backend::models::{
    CreateAnnouncementRequest, CreateSwapRequest, SubmitFeedbackRequest, SwapAction, UserProfile,
};
use skillswap_backend::services::{AdminService, FeedbackService, ProfileService, SwapService};
use skillswap_backend::store::{MemoryStore, ProfileStore};

async fn seed_user(store: &MemoryStore, name: &str) -> UserProfile {
    store
        .create_profile(UserProfile::seed(
            Uuid::new_v4(),
            name.to_string(),
            None,
            None,
        ))
        .await
        .unwrap()
}

#[tokio::test]
async fn banned_profile_disappears_from_public_view() {
    let store = Arc::new(MemoryStore::new());
    let ann = seed_user(&store, "Ann").await;
    let admin_id = Uuid::new_v4();

    let profiles = ProfileService::new(store.clone());
    let admin = AdminService::new(store.clone());

    assert!(profiles.get_public_profile(None, ann.id).await.is_ok());

    admin.ban_user(admin_id, ann.id).await.unwrap();
    let err = profiles
        .get_public_profile(None, ann.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    admin.unban_user(admin_id, ann.id).await.unwrap();
    assert!(profiles.get_public_profile(None, ann.id).await.is_ok());
}

#[tokio::test]
async fn announcement_round_trip_with_idempotent_delete() {
    let store = Arc::new(MemoryStore::new());
    let admin = AdminService::new(store);
    let admin_id = Uuid::new_v4();

    let created = admin
        .create_announcement(
            admin_id,
            CreateAnnouncementRequest {
                title: "  Maintenance window  ".to_string(),
                message: "Saturday 02:00 UTC".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(created.title, "Maintenance window");
    assert_eq!(created.created_by, admin_id);

    let listed = admin.list_announcements().await.unwrap();
    assert_eq!(listed.len(), 1);

    admin.delete_announcement(admin_id, created.id).await.unwrap();
    admin.delete_announcement(admin_id, created.id).await.unwrap();
    assert!(admin.list_announcements().await.unwrap().is_empty());
}

#[tokio::test]
async fn blank_title_or_message_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let admin = AdminService::new(store);

    for (title, message) in [("", "Body"), ("Title", "   "), ("  ", "")] {
        let err = admin
            .create_announcement(
                Uuid::new_v4(),
                CreateAnnouncementRequest {
                    title: title.to_string(),
                    message: message.to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }
}

#[tokio::test]
async fn export_snapshot_flattens_users_and_swaps() {
    let store = Arc::new(MemoryStore::new());
    let ann = seed_user(&store, "Ann").await;
    let ben = seed_user(&store, "Ben").await;

    let profiles = ProfileService::new(store.clone());
    profiles
        .add_skill(
            ann.id,
            skillswap_backend::models::SkillEditRequest {
                kind: skillswap_backend::models::SkillKind::Offered,
                skill: "Guitar".to_string(),
            },
        )
        .await
        .unwrap();
    profiles
        .add_skill(
            ann.id,
            skillswap_backend::models::SkillEditRequest {
                kind: skillswap_backend::models::SkillKind::Offered,
                skill: "Bass".to_string(),
            },
        )
        .await
        .unwrap();

    let swaps = SwapService::new(store.clone());
    swaps
        .create_request(
            ann.id,
            CreateSwapRequest {
                to_user_id: ben.id,
                skills_offered: vec!["Guitar".to_string()],
                skills_requested: vec!["Cooking".to_string()],
                message: None,
            },
        )
        .await
        .unwrap();

    let admin = AdminService::new(store);
    let snapshot = admin.export_snapshot().await.unwrap();

    assert_eq!(snapshot.users.len(), 2);
    let ann_row = snapshot.users.iter().find(|u| u.name == "Ann").unwrap();
    assert_eq!(ann_row.skills_offered, "Guitar; Bass");

    assert_eq!(snapshot.swaps.len(), 1);
    assert_eq!(snapshot.swaps[0].from_user_id, ann.id);
    assert_eq!(snapshot.swaps[0].to_user_id, ben.id);
}

#[tokio::test]
async fn feedback_validation_and_exact_rating() {
    let store = Arc::new(MemoryStore::new());
    let ann = seed_user(&store, "Ann").await;
    let ben = seed_user(&store, "Ben").await;

    let swaps = SwapService::new(store.clone());
    let swap = swaps
        .create_request(
            ann.id,
            CreateSwapRequest {
                to_user_id: ben.id,
                skills_offered: vec!["Guitar".to_string()],
                skills_requested: vec!["Cooking".to_string()],
                message: None,
            },
        )
        .await
        .unwrap();
    swaps
        .transition(swap.id, SwapAction::Accept, ben.id)
        .await
        .unwrap();

    let feedback = FeedbackService::new(store);

    let err = feedback
        .submit(
            ann.id,
            SubmitFeedbackRequest {
                swap_id: swap.id,
                rating: 0,
                comment: Some(String::new()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidRequest(_)));

    let err = feedback
        .submit(
            ann.id,
            SubmitFeedbackRequest {
                swap_id: swap.id,
                rating: 6,
                comment: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidRating(_)));

    let record = feedback
        .submit(
            ann.id,
            SubmitFeedbackRequest {
                swap_id: swap.id,
                rating: 5,
                comment: Some("Great!".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(record.rating, 5);
    assert_eq!(record.to_user_id, ben.id);
    assert_eq!(record.comment.as_deref(), Some("Great!"));
}
