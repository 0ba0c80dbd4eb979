//! Photo, comment and like routes driven through the router

use axum::{
    http::{Method, StatusCode},
    Router,
};
use instaspace::backend::routes::create_router;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::*;

fn app() -> Router {
    let (state, _) = test_state(1);
    create_router(state)
}

/// Register a photo as `owner` and return its id
async fn photo(app: &Router, owner: i64) -> i64 {
    let (status, body) = call(
        app,
        request(
            Method::POST,
            "/api/photos",
            Some(&access_token(owner)),
            Some(json!({"url": "https://cdn.example.com/p/1.jpg", "description": "sunset"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_social_routes_require_token() {
    let app = app();
    for (method, uri) in [
        (Method::POST, "/api/photos"),
        (Method::GET, "/api/photos/1/comments"),
        (Method::POST, "/api/photos/1/likes"),
        (Method::DELETE, "/api/comments/1"),
    ] {
        let (status, _) = call(&app, request(method, uri, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_photo_is_registered_by_url() {
    let app = app();
    let id = photo(&app, 1).await;

    let uri = format!("/api/photos/{}", id);
    let (status, body) = call(&app, request(Method::GET, &uri, Some(&access_token(2)), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], 1);
    assert_eq!(body["url"], "https://cdn.example.com/p/1.jpg");
    assert_eq!(body["description"], "sunset");
    assert_eq!(body["likes_count"], 0);

    let (status, _) = call(
        &app,
        request(Method::GET, "/api/photos/404", Some(&access_token(2)), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_photo_input() {
    let app = app();
    let token = access_token(1);

    let (status, body) = call(
        &app,
        request(Method::POST, "/api/photos", Some(&token), Some(json!({"url": " "}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (status, body) = call(&app, request(Method::GET, "/api/photos/0/likes", Some(&token), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid photo ID");
}

#[tokio::test]
async fn test_comment_lifecycle() {
    let app = app();
    let photo_id = photo(&app, 1).await;
    let author = access_token(2);
    let stranger = access_token(3);

    let (status, created) = call(
        &app,
        request(
            Method::POST,
            "/api/comments",
            Some(&author),
            Some(json!({"photo_id": photo_id, "content": "great shot"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let comment_id = created["id"].as_i64().unwrap();

    let comments_uri = format!("/api/photos/{}/comments", photo_id);
    let (status, listed) = call(&app, request(Method::GET, &comments_uri, Some(&stranger), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["id"].as_i64(), Some(comment_id));
    assert_eq!(listed[0]["user_id"], 2);
    assert_eq!(listed[0]["content"], "great shot");
    assert!(listed[0]["updated_at"].is_null());

    // Someone else's comment looks missing
    let comment_uri = format!("/api/comments/{}", comment_id);
    let edit = json!({"content": "spam"});
    let (status, _) = call(
        &app,
        request(Method::PUT, &comment_uri, Some(&stranger), Some(edit)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, request(Method::DELETE, &comment_uri, Some(&stranger), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(
        &app,
        request(
            Method::PUT,
            &comment_uri,
            Some(&author),
            Some(json!({"content": "great shot!"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listed) = call(&app, request(Method::GET, &comments_uri, Some(&author), None)).await;
    assert_eq!(listed[0]["content"], "great shot!");
    assert!(!listed[0]["updated_at"].is_null());

    let (status, _) = call(&app, request(Method::DELETE, &comment_uri, Some(&author), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listed) = call(&app, request(Method::GET, &comments_uri, Some(&author), None)).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_comment_on_unknown_photo() {
    let app = app();
    let (status, body) = call(
        &app,
        request(
            Method::POST,
            "/api/comments",
            Some(&access_token(2)),
            Some(json!({"photo_id": 77, "content": "hello?"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Photo not found: 77");
}

#[tokio::test]
async fn test_likes_are_counted_once_per_user() {
    let app = app();
    let photo_id = photo(&app, 1).await;
    let likes_uri = format!("/api/photos/{}/likes", photo_id);
    let photo_uri = format!("/api/photos/{}", photo_id);

    let (status, _) = call(&app, request(Method::POST, &likes_uri, Some(&access_token(2)), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(&app, request(Method::POST, &likes_uri, Some(&access_token(2)), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Photo already liked");

    let (status, _) = call(&app, request(Method::POST, &likes_uri, Some(&access_token(3)), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, likes) = call(&app, request(Method::GET, &likes_uri, Some(&access_token(1)), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(likes, json!({"user_ids": [2, 3], "likes_count": 2}));

    let (_, body) = call(&app, request(Method::GET, &photo_uri, Some(&access_token(1)), None)).await;
    assert_eq!(body["likes_count"], 2);

    let (status, _) = call(&app, request(Method::DELETE, &likes_uri, Some(&access_token(2)), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, request(Method::DELETE, &likes_uri, Some(&access_token(2)), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, likes) = call(&app, request(Method::GET, &likes_uri, Some(&access_token(1)), None)).await;
    assert_eq!(likes, json!({"user_ids": [3], "likes_count": 1}));
}
