/**
 * API Routes Configuration
 *
 * Public:
 * - `POST /api/auth/signup`
 * - `GET  /api/auth/confirm`
 * - `POST /api/auth/resend-confirmation`
 * - `POST /api/auth/login`
 *
 * Behind `auth_middleware`:
 * - `GET    /api/auth/me`
 * - `POST   /api/conversations`
 * - `GET    /api/conversations/{conversation_id}/messages`
 * - `POST   /api/messages`
 * - `DELETE /api/messages/{message_id}`
 * - `POST   /api/photos`
 * - `GET    /api/photos/{photo_id}`
 * - `GET    /api/photos/{photo_id}/comments`
 * - `GET | POST | DELETE /api/photos/{photo_id}/likes`
 * - `POST   /api/comments`
 * - `PUT | DELETE /api/comments/{comment_id}`
 */

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::backend::auth::{confirm, get_me, login, resend_confirmation, signup};
use crate::backend::messaging::handlers::{
    create_conversation, delete_message, get_messages, send_message,
};
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;
use crate::backend::social::handlers::{
    add_like, create_comment, create_photo, delete_comment, get_comments, get_likes, get_photo,
    remove_like, update_comment,
};

pub fn configure_api_routes(router: Router<AppState>, app_state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/api/auth/me", get(get_me))
        .route("/api/conversations", post(create_conversation))
        .route(
            "/api/conversations/{conversation_id}/messages",
            get(get_messages),
        )
        .route("/api/messages", post(send_message))
        .route("/api/messages/{message_id}", delete(delete_message))
        .route("/api/photos", post(create_photo))
        .route("/api/photos/{photo_id}", get(get_photo))
        .route("/api/photos/{photo_id}/comments", get(get_comments))
        .route(
            "/api/photos/{photo_id}/likes",
            get(get_likes).post(add_like).delete(remove_like),
        )
        .route("/api/comments", post(create_comment))
        .route(
            "/api/comments/{comment_id}",
            put(update_comment).delete(delete_comment),
        )
        .route_layer(middleware::from_fn_with_state(app_state, auth_middleware));

    router
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/confirm", get(confirm))
        .route("/api/auth/resend-confirmation", post(resend_confirmation))
        .route("/api/auth/login", post(login))
        .merge(protected)
}
