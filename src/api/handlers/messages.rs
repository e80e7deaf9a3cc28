//! Message handlers, nested under `/api/users/{userId}/messages`.
//!
//! Every route acts on behalf of `{userId}`, which must be the caller.

use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::MESSAGE_TAG;
use crate::api::dto::{
    CreateMessageRequest, ErrorResponse, MessageListQuery, MessageResponse, PagedResponse,
};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

pub fn message_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_messages, create_message))
        .routes(routes!(get_message, delete_message))
        .routes(routes!(get_thread))
        .routes(routes!(mark_read))
}

/// GET /api/users/{userId}/messages - Inbox, outbox or unread messages
#[utoipa::path(
    get,
    path = "/",
    tag = MESSAGE_TAG,
    params(("userId" = i32, Path, description = "Must be the caller"), MessageListQuery),
    responses(
        (status = 200, description = "One page of messages, newest first", body = PagedResponse<MessageResponse>),
        (status = 401, description = "Not the caller", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn list_messages(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(user_id): Path<i32>,
    query: Result<Query<MessageListQuery>, QueryRejection>,
) -> AppResult<PagedResponse<MessageResponse>> {
    auth_user.ensure_is(user_id)?;
    let Query(query) = query?;

    let page = state
        .services
        .messages
        .list(user_id, query.container(), query.page())
        .await?;
    Ok(PagedResponse::from_list(page, MessageResponse::from))
}

/// GET /api/users/{userId}/messages/{id}
#[utoipa::path(
    get,
    path = "/{id}",
    tag = MESSAGE_TAG,
    params(
        ("userId" = i32, Path, description = "Must be the caller"),
        ("id" = i32, Path, description = "Message id")
    ),
    responses(
        (status = 200, description = "The message", body = MessageResponse),
        (status = 404, description = "No such message", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn get_message(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((user_id, message_id)): Path<(i32, i32)>,
) -> AppResult<Json<MessageResponse>> {
    auth_user.ensure_is(user_id)?;
    let view = state.services.messages.get_message(user_id, message_id).await?;
    Ok(Json(view.into()))
}

/// GET /api/users/{userId}/messages/thread/{recipientId} - Conversation, oldest first
#[utoipa::path(
    get,
    path = "/thread/{recipientId}",
    tag = MESSAGE_TAG,
    params(
        ("userId" = i32, Path, description = "Must be the caller"),
        ("recipientId" = i32, Path, description = "The other member")
    ),
    responses(
        (status = 200, description = "The conversation", body = Vec<MessageResponse>),
        (status = 401, description = "Not the caller", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn get_thread(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((user_id, recipient_id)): Path<(i32, i32)>,
) -> AppResult<Json<Vec<MessageResponse>>> {
    auth_user.ensure_is(user_id)?;
    let thread = state.services.messages.thread(user_id, recipient_id).await?;
    Ok(Json(thread.into_iter().map(MessageResponse::from).collect()))
}

/// POST /api/users/{userId}/messages - Send a message
#[utoipa::path(
    post,
    path = "/",
    tag = MESSAGE_TAG,
    params(("userId" = i32, Path, description = "Must be the caller")),
    request_body = CreateMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = MessageResponse),
        (status = 400, description = "Unknown recipient", body = ErrorResponse),
        (status = 401, description = "Not the caller", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn create_message(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(user_id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<CreateMessageRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    auth_user.ensure_is(user_id)?;
    let view = state
        .services
        .messages
        .send(user_id, payload.recipient_id, payload.content)
        .await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

/// POST /api/users/{userId}/messages/{id} - Delete on the caller's side
#[utoipa::path(
    post,
    path = "/{id}",
    tag = MESSAGE_TAG,
    params(
        ("userId" = i32, Path, description = "Must be the caller"),
        ("id" = i32, Path, description = "Message id")
    ),
    responses(
        (status = 204, description = "Message deleted for the caller"),
        (status = 404, description = "No such message", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn delete_message(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((user_id, message_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    auth_user.ensure_is(user_id)?;
    state.services.messages.delete(user_id, message_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/users/{userId}/messages/{id}/read
#[utoipa::path(
    post,
    path = "/{id}/read",
    tag = MESSAGE_TAG,
    params(
        ("userId" = i32, Path, description = "Must be the recipient"),
        ("id" = i32, Path, description = "Message id")
    ),
    responses(
        (status = 204, description = "Marked read"),
        (status = 401, description = "Caller is not the recipient", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn mark_read(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((user_id, message_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    auth_user.ensure_is(user_id)?;
    state.services.messages.mark_read(user_id, message_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
