//! Voting handler.

use actix_web::{HttpResponse, web};

use basecamp_core::domain::PostId;
use basecamp_shared::ApiResponse;
use basecamp_shared::dto::{VoteRequest, VoteResponse};

use crate::middleware::error::AppResult;
use crate::middleware::session::Session;
use crate::state::AppState;

/// POST /api/posts/{id}/vote
///
/// Repeating the current vote retracts it; the opposite vote switches.
pub async fn cast_vote(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<PostId>,
    body: web::Json<VoteRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .votes(Some(&session))
        .vote(path.into_inner(), body.vote)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(VoteResponse::from(&post))))
}
