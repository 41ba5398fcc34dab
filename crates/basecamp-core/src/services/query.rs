//! Filter/Sort Engine - pure transformation from posts and a query to a page.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::Post;

/// Default number of posts per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Display ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Latest,
    Popular,
    Views,
    Comments,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(SortKey::Latest),
            "popular" => Ok(SortKey::Popular),
            "views" => Ok(SortKey::Views),
            "comments" => Ok(SortKey::Comments),
            other => Err(format!("unknown sort key {:?}", other)),
        }
    }
}

/// Category or tag selection; `"all"` passes everything through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Facet {
    #[default]
    All,
    Only(String),
}

impl Facet {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "all" => Facet::All,
            other => Facet::Only(other.to_string()),
        }
    }

    fn admits(&self, value: Option<&str>) -> bool {
        match self {
            Facet::All => true,
            Facet::Only(wanted) => value == Some(wanted.as_str()),
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facet::All => f.write_str("all"),
            Facet::Only(value) => f.write_str(value),
        }
    }
}

/// Board query. Changing search, a facet, or the sort key resets the page to 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardQuery {
    search: String,
    category: Facet,
    tag: Facet,
    sort: SortKey,
    page: usize,
}

impl Default for BoardQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: Facet::All,
            tag: Facet::All,
            sort: SortKey::Latest,
            page: 1,
        }
    }
}

impl BoardQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self.page = 1;
        self
    }

    pub fn with_category(mut self, category: Facet) -> Self {
        self.category = category;
        self.page = 1;
        self
    }

    pub fn with_tag(mut self, tag: Facet) -> Self {
        self.tag = tag;
        self.page = 1;
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self.page = 1;
        self
    }

    /// Request a page; out-of-range values are clamped when the query runs.
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn category(&self) -> &Facet {
        &self.category
    }

    pub fn tag(&self) -> &Facet {
        &self.tag
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Whether a post passes search, category, and tag filters.
    pub fn matches(&self, post: &Post) -> bool {
        self.matches_search(post)
            && self.category.admits(post.category.as_deref())
            && match &self.tag {
                Facet::All => true,
                Facet::Only(tag) => post.has_tag(tag),
            }
    }

    fn matches_search(&self, post: &Post) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        let contains = |field: &str| field.to_lowercase().contains(&needle);
        contains(post.title.as_str())
            || contains(post.author.as_str())
            || post.tags.iter().any(|t| contains(t.as_str()))
            || contains(post.content.as_str())
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub items: Vec<Post>,
    pub total_matches: usize,
    pub page: usize,
    pub total_pages: usize,
}

/// Filter, sort, and paginate `posts`.
///
/// `total_pages` is at least 1, so the returned page is always in `1..=total_pages`.
pub fn run_query(posts: &[Post], query: &BoardQuery, page_size: usize) -> PostPage {
    let page_size = page_size.max(1);

    let mut matched: Vec<&Post> = posts.iter().filter(|p| query.matches(p)).collect();
    sort_posts(&mut matched, query.sort);

    let total_matches = matched.len();
    let total_pages = total_matches.div_ceil(page_size).max(1);
    let page = query.page.clamp(1, total_pages);

    let items = matched
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .cloned()
        .collect();

    PostPage {
        items,
        total_matches,
        page,
        total_pages,
    }
}

/// Stable descending sort by `key`.
pub fn sort_posts(posts: &mut [&Post], key: SortKey) {
    match key {
        SortKey::Latest => posts.sort_by(|a, b| compare_dates_desc(a, b)),
        SortKey::Popular => posts.sort_by(|a, b| b.score().cmp(&a.score())),
        SortKey::Views => posts.sort_by(|a, b| b.views.cmp(&a.views)),
        SortKey::Comments => posts.sort_by(|a, b| b.comments.cmp(&a.comments)),
    }
}

// Newest first; posts with unparseable dates go last.
fn compare_dates_desc(a: &Post, b: &Post) -> Ordering {
    match (a.parsed_date(), b.parsed_date()) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Every tag in use, de-duplicated and sorted.
pub fn all_tags(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .flat_map(|p| p.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Every category in use, de-duplicated and sorted.
pub fn all_categories(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .filter_map(|p| p.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
