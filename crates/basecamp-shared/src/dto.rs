//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

use basecamp_core::domain::{Post, Vote, find_category};
use basecamp_core::services::{AuthorActivity, BadgeOutcome, Facets, PostPage};

/// Query string of `GET /api/posts`.
///
/// Every field is optional; `"all"` and empty values mean "no filter".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostListParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub sort: Option<String>,
    pub page: Option<usize>,
}

/// A post as seen by one viewer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub user_vote: Option<Vote>,
    pub read_time_minutes: usize,
    /// Display label when the category is one of the composer's values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_label: Option<&'static str>,
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        let read_time_minutes = basecamp_core::domain::content::read_time_minutes(&post.content);
        let category_label = post
            .category
            .as_deref()
            .and_then(find_category)
            .map(|c| c.label);
        Self {
            user_vote: post.user_vote,
            read_time_minutes,
            category_label,
            post,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPageResponse {
    pub items: Vec<PostView>,
    pub total_matches: usize,
    pub page: usize,
    pub total_pages: usize,
}

impl From<PostPage> for PostPageResponse {
    fn from(page: PostPage) -> Self {
        Self {
            items: page.items.into_iter().map(PostView::from).collect(),
            total_matches: page.total_matches,
            page: page.page,
            total_pages: page.total_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRequest {
    pub vote: Vote,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub likes: u64,
    pub dislikes: u64,
    pub user_vote: Option<Vote>,
}

impl From<&Post> for VoteResponse {
    fn from(post: &Post) -> Self {
        Self {
            likes: post.likes,
            dislikes: post.dislikes,
            user_vote: post.user_vote,
        }
    }
}

/// An uploaded file, base64-encoded in the request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub mime: String,
    pub base64: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub donation_address: Option<String>,
    #[serde(default)]
    pub attachments: Vec<AttachmentPayload>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePostResponse {
    pub post: PostView,
    pub badge: BadgeOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonateRequest {
    /// Ether amount as typed by the donor, e.g. `"0.01"`.
    pub amount: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub activity: AuthorActivity,
    pub display_name: String,
    pub registered: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FacetsResponse {
    pub tags: Vec<String>,
    pub categories: Vec<String>,
}

impl From<Facets> for FacetsResponse {
    fn from(facets: Facets) -> Self {
        Self {
            tags: facets.tags,
            categories: facets.categories,
        }
    }
}
