//! Member listing, profiles and likes.

use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::USER_TAG;
use crate::api::dto::{
    ErrorResponse, PagedResponse, UpdateUserRequest, UserDetail, UserListQuery, UserSummary,
};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Routes (all authenticated):
/// - GET /
/// - GET /{userId}
/// - PUT /{userId}
/// - POST /{userId}/like/{recipientId}
pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_users))
        .routes(routes!(get_user, update_user))
        .routes(routes!(like_user))
}

/// GET /api/users - Search members
///
/// Paged; totals are also sent in the `Pagination` header.
#[utoipa::path(
    get,
    path = "/",
    tag = USER_TAG,
    params(UserListQuery),
    responses(
        (status = 200, description = "One page of members", body = PagedResponse<UserSummary>),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn list_users(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    query: Result<Query<UserListQuery>, QueryRejection>,
) -> AppResult<PagedResponse<UserSummary>> {
    let Query(query) = query?;
    let cards = state
        .services
        .users
        .search(query.filter(auth_user.user_id), query.page())
        .await?;

    Ok(PagedResponse::from_list(cards, UserSummary::from))
}

/// GET /api/users/{userId} - Full profile with photos
#[utoipa::path(
    get,
    path = "/{userId}",
    tag = USER_TAG,
    params(("userId" = i32, Path, description = "Member id")),
    responses(
        (status = 200, description = "The profile", body = UserDetail),
        (status = 404, description = "No such member", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> AppResult<Json<UserDetail>> {
    let profile = state.services.users.get_profile(user_id).await?;
    Ok(Json(profile.into()))
}

/// PUT /api/users/{userId} - Edit one's own profile
#[utoipa::path(
    put,
    path = "/{userId}",
    tag = USER_TAG,
    params(("userId" = i32, Path, description = "Must be the caller")),
    request_body = UpdateUserRequest,
    responses(
        (status = 204, description = "Profile updated"),
        (status = 401, description = "Not the caller's profile", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn update_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(user_id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<StatusCode> {
    auth_user.ensure_is(user_id)?;
    state
        .services
        .users
        .update_profile(user_id, payload.into())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/users/{userId}/like/{recipientId} - Like another member
#[utoipa::path(
    post,
    path = "/{userId}/like/{recipientId}",
    tag = USER_TAG,
    params(
        ("userId" = i32, Path, description = "Must be the caller"),
        ("recipientId" = i32, Path, description = "Member being liked")
    ),
    responses(
        (status = 200, description = "Like recorded"),
        (status = 400, description = "Already liked, or liking oneself", body = ErrorResponse),
        (status = 401, description = "Not the caller", body = ErrorResponse),
        (status = 404, description = "No such recipient", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn like_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((user_id, recipient_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    auth_user.ensure_is(user_id)?;
    state.services.users.like(user_id, recipient_id).await?;
    Ok(StatusCode::OK)
}
