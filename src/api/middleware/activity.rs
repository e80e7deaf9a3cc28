//! Records when members were last seen.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::AuthUser;
use crate::state::AppState;

/// Stamps the caller's `last_active` once the handler has produced its
/// response. Must run inside [`super::auth_middleware`].
///
/// Failing to record activity never fails the request.
pub async fn activity_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let caller = request.extensions().get::<AuthUser>().map(|user| user.user_id);
    let response = next.run(request).await;

    if let Some(user_id) = caller
        && let Err(e) = state.services.users.record_activity(user_id).await
    {
        tracing::warn!(user_id, error = %e, "Failed to record member activity");
    }

    response
}
