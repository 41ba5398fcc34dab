//! Post Composer - validates author input and publishes a new post.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use futures::future::try_join_all;

use super::post_store::PostStore;
use crate::domain::content::insert_image_reference;
use crate::domain::{Address, Attachment, AttachmentKind, DATE_FORMAT, Post, PostId};
use crate::error::{BoardError, BoardResult};
use crate::ports::WalletClient;

/// A file picked by the author, not yet encoded.
#[derive(Debug, Clone)]
pub struct AttachmentUpload {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl AttachmentUpload {
    pub fn kind(&self) -> AttachmentKind {
        AttachmentKind::from_mime(&self.mime)
    }
}

/// Author input for a new post.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    /// Donation target; defaults to the author's address.
    pub donation_address: Option<String>,
    pub attachments: Vec<AttachmentUpload>,
}

impl PostDraft {
    /// Add a tag. Blank input and duplicates are ignored.
    pub fn add_tag(&mut self, input: &str) -> bool {
        let tag = input.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    /// Attach an image and reference it in the content at `cursor`.
    pub fn insert_image(&mut self, cursor: usize, upload: AttachmentUpload) {
        let url = data_url(&upload.mime, &upload.bytes);
        self.content = insert_image_reference(&self.content, cursor, &upload.name, &url);
        self.attachments.push(upload);
    }

    /// Check required fields. Reports every missing field at once.
    pub fn validate(&self) -> BoardResult<()> {
        let missing: Vec<&str> = [
            ("title", &self.title),
            ("content", &self.content),
            ("category", &self.category),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(BoardError::Validation(format!(
                "required fields are empty: {}",
                missing.join(", ")
            )))
        }
    }

    fn normalized_tags(&self) -> Vec<String> {
        let mut normalized = PostDraft::default();
        for tag in &self.tags {
            normalized.add_tag(tag);
        }
        normalized.tags
    }
}

/// `data:<mime>;base64,<payload>`
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    let mime = if mime.trim().is_empty() {
        "application/octet-stream"
    } else {
        mime.trim()
    };
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Encode one attachment off the async executor.
pub async fn encode_attachment(
    post_id: PostId,
    index: usize,
    upload: AttachmentUpload,
) -> BoardResult<Attachment> {
    if upload.name.trim().is_empty() {
        return Err(BoardError::Validation("attachment name is empty".into()));
    }

    let kind = upload.kind();
    let size = upload.bytes.len() as u64;
    let name = upload.name.clone();
    let data = tokio::task::spawn_blocking(move || data_url(&upload.mime, &upload.bytes))
        .await
        .map_err(|e| BoardError::Serialization(format!("attachment encoding failed: {}", e)))?;

    Ok(Attachment {
        id: format!("{}-{}", post_id, index),
        name,
        kind,
        data,
        size: Some(size),
    })
}

pub struct PostComposer {
    posts: Arc<PostStore>,
    wallet: Arc<dyn WalletClient>,
}

impl PostComposer {
    pub fn new(posts: Arc<PostStore>, wallet: Arc<dyn WalletClient>) -> Self {
        Self { posts, wallet }
    }

    /// Validate, encode attachments, and prepend the post to the collection.
    ///
    /// Returns the updated collection; the new post is its first element.
    /// Nothing is written when validation or encoding fails.
    pub async fn submit(&self, draft: PostDraft) -> BoardResult<Vec<Post>> {
        draft.validate()?;

        let author = self
            .wallet
            .current_address()
            .await
            .ok_or(BoardError::MissingIdentity)?;

        let donation = match draft
            .donation_address
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(raw) => Address::parse(raw).map_err(|e| BoardError::Validation(e.to_string()))?,
            None => author.clone(),
        };

        let now = Utc::now();
        let id = now.timestamp_millis();
        let tags = draft.normalized_tags();

        let files = try_join_all(
            draft
                .attachments
                .into_iter()
                .enumerate()
                .map(|(index, upload)| encode_attachment(id, index, upload)),
        )
        .await?;

        let post = Post {
            id,
            title: draft.title.trim().to_string(),
            author: author.abbreviate(),
            date: now.date_naive().format(DATE_FORMAT).to_string(),
            category: Some(draft.category.trim().to_string()),
            tags,
            author_address: Some(author.to_string()),
            donation_address: Some(donation.to_string()),
            contract_address: None,
            content: draft.content,
            likes: 0,
            dislikes: 0,
            comments: 0,
            views: 0,
            files,
            user_vote: None,
        };

        let posts = self.posts.prepend(post).await?;
        if let Some(published) = posts.first() {
            tracing::info!(post_id = published.id, author = %author.abbreviate(), "Post published");
        }
        Ok(posts)
    }
}
