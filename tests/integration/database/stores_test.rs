//! PostgreSQL-backed auth, message and social stores
//!
//! Each test returns early when `TEST_DATABASE_URL` is unset. They share one
//! database, so they run serially and use unique user names.

use std::time::{SystemTime, UNIX_EPOCH};

use assert_matches::assert_matches;
use axum::http::{Method, StatusCode};
use instaspace::backend::auth::users::mark_verified;
use instaspace::backend::messaging::{MessageStore, PgMessageStore, StoreError};
use instaspace::backend::routes::create_router;
use instaspace::backend::server::{build_state, AppState};
use instaspace::backend::social::{PgSocialStore, SocialError, SocialStore};
use instaspace::shared::config::AppConfig;
use pretty_assertions::assert_eq;
use serde_json::json;
use serial_test::serial;

use crate::common::*;

async fn database_state() -> Option<AppState> {
    let url = test_database_url()?;
    let config = AppConfig::builder()
        .jwt_secret(TEST_SECRET)
        .database_url(url)
        .build()
        .unwrap();
    let state = build_state(config).await;
    assert!(state.db_pool.is_some(), "TEST_DATABASE_URL is set but unreachable");
    Some(state)
}

fn unique_name(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}_{}", prefix, nanos % 1_000_000_000_000)
}

#[tokio::test]
#[serial]
async fn test_unconfirmed_user_cannot_use_protected_routes() {
    let Some(state) = database_state().await else {
        return;
    };
    let pool = state.db_pool.clone().unwrap();
    let app = create_router(state);

    let username = unique_name("pending");
    let email = format!("{}@example.com", username);
    let (status, body) = call(
        &app,
        request(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({"username": username, "email": email, "password": "password123"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body.get("token").is_none());
    assert_eq!(body["user"]["verified"], false);
    let user_id = body["user"]["id"].as_i64().unwrap();

    // A well-formed access token is not enough before confirmation
    let token = access_token(user_id);
    let conversation = json!({"user1_id": user_id, "user2_id": user_id + 1});
    let (status, body) = call(
        &app,
        request(Method::POST, "/api/conversations", Some(&token), Some(conversation.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Email not confirmed");

    let (status, _) = call(
        &app,
        request(
            Method::POST,
            "/api/auth/resend-confirmation",
            None,
            Some(json!({"email": email})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert!(mark_verified(&pool, &email).await.unwrap());
    let (status, _) = call(
        &app,
        request(Method::POST, "/api/conversations", Some(&token), Some(conversation)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(
        &app,
        request(
            Method::POST,
            "/api/auth/resend-confirmation",
            None,
            Some(json!({"email": email})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already confirmed");
}

#[tokio::test]
#[serial]
async fn test_append_to_missing_conversation_writes_nothing() {
    let Some(state) = database_state().await else {
        return;
    };
    let store = PgMessageStore::new(state.db_pool.clone().unwrap());

    assert_matches!(
        store.append(i64::MAX, 1, "nobody home").await,
        Err(StoreError::ConversationNotFound(id)) if id == i64::MAX
    );

    let conversation_id = store.get_or_create_conversation(900_001, 900_002).await.unwrap();
    let first = store.append(conversation_id, 900_001, "one").await.unwrap();
    let second = store.append(conversation_id, 900_002, "two").await.unwrap();
    assert!(second > first);

    let messages = store.list_by_conversation(conversation_id).await.unwrap();
    let ids: Vec<_> = messages.iter().map(|m| m.id).collect();
    assert!(ids.ends_with(&[first, second]));
}

#[tokio::test]
#[serial]
async fn test_social_store_round() {
    let Some(state) = database_state().await else {
        return;
    };
    let store = PgSocialStore::new(state.db_pool.clone().unwrap());

    let photo = store.create_photo(1, "https://cdn.example.com/p.jpg", "").await.unwrap();
    assert_matches!(
        store.create_comment(2, i64::MAX, "lost").await,
        Err(SocialError::PhotoNotFound(_))
    );

    let comment = store.create_comment(2, photo, "nice").await.unwrap();
    assert_matches!(
        store.update_comment(comment, 3, "mine now").await,
        Err(SocialError::CommentNotFound(_))
    );
    store.update_comment(comment, 2, "very nice").await.unwrap();
    let comments = store.list_comments(photo).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].content, "very nice");
    assert!(comments[0].updated_at.is_some());

    store.add_like(photo, 2).await.unwrap();
    assert_matches!(store.add_like(photo, 2).await, Err(SocialError::AlreadyLiked));
    store.add_like(photo, 3).await.unwrap();
    assert_eq!(store.get_photo(photo).await.unwrap().likes_count, 2);

    store.remove_like(photo, 2).await.unwrap();
    assert_matches!(store.remove_like(photo, 2).await, Err(SocialError::LikeNotFound));
    assert_eq!(store.list_likes(photo).await.unwrap(), vec![3]);
    assert_eq!(store.get_photo(photo).await.unwrap().likes_count, 1);
}
