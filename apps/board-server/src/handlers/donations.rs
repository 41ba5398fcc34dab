//! Donation handler.

use actix_web::{HttpResponse, web};

use basecamp_core::BoardError;
use basecamp_core::domain::PostId;
use basecamp_core::services::DEFAULT_DONATION_AMOUNT;
use basecamp_shared::ApiResponse;
use basecamp_shared::dto::DonateRequest;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts/{id}/donate
///
/// Responds once the transfer is confirmed.
pub async fn donate(
    state: web::Data<AppState>,
    path: web::Path<PostId>,
    body: web::Json<DonateRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state
        .board
        .posts()
        .find(id)
        .await?
        .ok_or(BoardError::PostNotFound { id })?;

    let amount = body
        .amount
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(DEFAULT_DONATION_AMOUNT);

    let receipt = state.donations().donate(&post, amount).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        receipt,
        format!("Sent {} ETH", amount),
    )))
}
