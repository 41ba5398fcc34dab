//! Author profile handler.

use actix_web::{HttpResponse, web};

use basecamp_core::domain::Address;
use basecamp_core::services::AuthorActivity;
use basecamp_shared::ApiResponse;
use basecamp_shared::dto::ProfileResponse;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/profile/{address}
///
/// Registration is looked up on chain; a failed lookup reports the author as
/// unregistered instead of failing the page.
pub async fn profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let address =
        Address::parse(&path.into_inner()).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let posts = state.board.posts().load().await?;
    let activity = AuthorActivity::summarize(&posts, &address);

    let registered = match state.badge_service().is_registered(&address).await {
        Ok(registered) => registered,
        Err(e) => {
            tracing::warn!(
                address = %address.abbreviate(),
                error = %e,
                "Registration lookup failed"
            );
            false
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ProfileResponse {
        display_name: address.abbreviate(),
        activity,
        registered,
    })))
}
