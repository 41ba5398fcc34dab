use serde::Serialize;

use crate::domain::{Address, Post};

/// An author's board activity, as shown on the profile dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorActivity {
    pub address: Address,
    pub posts: usize,
    pub likes: u64,
    pub dislikes: u64,
    pub views: u64,
    pub comments: u64,
    pub latest_post_date: Option<String>,
}

impl AuthorActivity {
    pub fn summarize(posts: &[Post], address: &Address) -> Self {
        let authored: Vec<&Post> = posts
            .iter()
            .filter(|p| {
                p.author_address
                    .as_deref()
                    .and_then(|raw| Address::parse(raw).ok())
                    .is_some_and(|a| &a == address)
            })
            .collect();

        Self {
            address: address.clone(),
            posts: authored.len(),
            likes: authored.iter().map(|p| p.likes).sum(),
            dislikes: authored.iter().map(|p| p.dislikes).sum(),
            views: authored.iter().map(|p| p.views).sum(),
            comments: authored.iter().map(|p| p.comments).sum(),
            latest_post_date: authored
                .iter()
                .filter_map(|p| p.parsed_date())
                .max()
                .map(|d| d.format(crate::domain::DATE_FORMAT).to_string()),
        }
    }

    pub fn has_posted(&self) -> bool {
        self.posts > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed::seed_posts;
    use crate::services::testing::address;

    #[test]
    fn test_summarize_matches_address_case_insensitively() {
        let mut posts = seed_posts();
        posts[0].author_address = Some("0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA".into());
        posts[2].author_address = Some(address('a').to_string());

        let activity = AuthorActivity::summarize(&posts, &address('a'));
        assert_eq!(activity.posts, 2);
        assert_eq!(activity.likes, 156 + 31);
        assert_eq!(activity.views, 1234 + 189);
        assert_eq!(activity.latest_post_date.as_deref(), Some("2025-01-20"));
    }

    #[test]
    fn test_no_posts() {
        let activity = AuthorActivity::summarize(&seed_posts(), &address('f'));
        assert!(!activity.has_posted());
        assert_eq!(activity.latest_post_date, None);
    }
}
