//! Board browsing and publishing handlers.

use actix_web::{HttpResponse, web};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use basecamp_core::domain::{Address, CATEGORIES, Post, PostId};
use basecamp_core::services::{
    AttachmentUpload, BadgeOutcome, BoardQuery, Facet, PostDraft, SortKey,
};
use basecamp_shared::ApiResponse;
use basecamp_shared::dto::{
    CreatePostRequest, CreatePostResponse, FacetsResponse, PostListParams, PostPageResponse,
    PostView,
};

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::session::{OptionalSession, Session};
use crate::state::AppState;

/// GET /api/posts?q=&category=&tag=&sort=&page=
pub async fn list_posts(
    state: web::Data<AppState>,
    session: OptionalSession,
    params: web::Query<PostListParams>,
) -> AppResult<HttpResponse> {
    let query = build_query(params.into_inner())?;
    let votes = state.votes(session.0.as_ref());
    let page = state.board.browse(&votes, &query).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostPageResponse::from(page))))
}

/// GET /api/posts/facets
pub async fn facets(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let facets = state.board.facets().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(FacetsResponse::from(facets))))
}

/// GET /api/posts/{id}
///
/// Opening a post counts one view per session.
pub async fn get_post(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let mut post = state.views(&session).open(id).await?;
    post.user_vote = state.votes(Some(&session)).current_vote(id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostView::from(post))))
}

/// POST /api/posts
///
/// Publishes the post, then runs the first-post badge flow. A badge failure
/// is reported in the response and never undoes the post.
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let draft = build_draft(body.into_inner())?;

    let mut posts = state.composer().submit(draft).await?;
    if posts.is_empty() {
        return Err(AppError::Internal("published post missing from collection".into()));
    }
    let post = posts.swap_remove(0);

    let badge = match badge_recipient(&post) {
        Ok(author) => state.badge_service().reward_first_post(&author).await,
        Err(reason) => {
            tracing::warn!(post_id = post.id, reason = %reason, "Badge skipped");
            BadgeOutcome::Failed { reason }
        }
    };

    Ok(HttpResponse::Created().json(ApiResponse::ok(CreatePostResponse {
        post: PostView::from(post),
        badge,
    })))
}

/// GET /api/categories
pub async fn categories() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(CATEGORIES))
}

/// The badge goes to the address recorded on the post, not whoever is
/// connected once the publish has finished.
fn badge_recipient(post: &Post) -> Result<Address, String> {
    let raw = post
        .author_address
        .as_deref()
        .ok_or_else(|| "post has no author address".to_string())?;
    Address::parse(raw).map_err(|e| e.to_string())
}

fn build_query(params: PostListParams) -> AppResult<BoardQuery> {
    let sort = match params.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw.parse::<SortKey>().map_err(AppError::BadRequest)?,
        None => SortKey::default(),
    };

    let query = BoardQuery::new()
        .with_search(params.q.unwrap_or_default())
        .with_category(Facet::parse(params.category.as_deref().unwrap_or_default()))
        .with_tag(Facet::parse(params.tag.as_deref().unwrap_or_default()))
        .with_sort(sort)
        .with_page(params.page.unwrap_or(1));

    Ok(query)
}

fn build_draft(request: CreatePostRequest) -> AppResult<PostDraft> {
    let mut draft = PostDraft {
        title: request.title,
        content: request.content,
        category: request.category,
        donation_address: request.donation_address,
        ..Default::default()
    };

    for tag in &request.tags {
        draft.add_tag(tag);
    }

    for payload in request.attachments {
        let bytes = STANDARD.decode(payload.base64.trim()).map_err(|e| {
            AppError::BadRequest(format!("Attachment {} is not valid base64: {}", payload.name, e))
        })?;
        draft.attachments.push(AttachmentUpload {
            name: payload.name,
            mime: payload.mime,
            bytes,
        });
    }

    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_rejects_unknown_sort() {
        let params = PostListParams {
            sort: Some("random".into()),
            ..Default::default()
        };
        assert!(matches!(build_query(params), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_build_query_defaults() {
        let query = build_query(PostListParams::default()).unwrap();
        assert_eq!(query, BoardQuery::new());
    }

    #[test]
    fn test_badge_recipient_comes_from_post() {
        let mut post = basecamp_core::domain::seed::seed_posts().remove(0);
        post.author_address = Some("0x00000000000000000000000000000000000000AA".into());
        assert_eq!(
            badge_recipient(&post).unwrap(),
            Address::parse("0x00000000000000000000000000000000000000aa").unwrap()
        );

        post.author_address = None;
        assert!(badge_recipient(&post).is_err());

        post.author_address = Some("not-an-address".into());
        assert!(badge_recipient(&post).is_err());
    }

    #[test]
    fn test_build_draft_decodes_attachments() {
        let request = CreatePostRequest {
            title: "t".into(),
            content: "c".into(),
            category: "build".into(),
            tags: vec![" base ".into(), "base".into()],
            attachments: vec![basecamp_shared::dto::AttachmentPayload {
                name: "a.txt".into(),
                mime: "text/plain".into(),
                base64: STANDARD.encode(b"hello"),
            }],
            ..Default::default()
        };

        let draft = build_draft(request).unwrap();
        assert_eq!(draft.tags, vec!["base".to_string()]);
        assert_eq!(draft.attachments[0].bytes, b"hello");
    }
}
