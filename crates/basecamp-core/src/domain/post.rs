use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Address, Vote};

/// Post identifier. User posts use their creation time in milliseconds.
pub type PostId = i64;

/// Format of `Post::date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Post entity - a single board entry with its engagement counters.
///
/// Field names follow the persisted `board_posts` layout (camelCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub author: String,
    /// ISO calendar date (`YYYY-MM-DD`).
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donation_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub dislikes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub files: Vec<Attachment>,
    /// The current viewer's vote, joined from `post_{id}_vote` on load.
    #[serde(skip)]
    pub user_vote: Option<Vote>,
}

impl Post {
    /// Where donations for this post go: `donationAddress`, else `contractAddress`.
    ///
    /// Blank or malformed values are treated as absent.
    pub fn donation_target(&self) -> Option<Address> {
        [&self.donation_address, &self.contract_address]
            .into_iter()
            .flatten()
            .find_map(|raw| Address::parse(raw).ok())
    }

    /// Net score used by the `popular` ordering.
    pub fn score(&self) -> i64 {
        self.likes as i64 - self.dislikes as i64
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Kind of an attached file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    File,
}

impl AttachmentKind {
    pub fn from_mime(mime: &str) -> Self {
        if mime.trim().to_ascii_lowercase().starts_with("image/") {
            AttachmentKind::Image
        } else {
            AttachmentKind::File
        }
    }
}

/// A file embedded in a post. `data` is a base64 data URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}
