//! Data loaders for the site's pages.
//!
//! # Design
//! A page fans out independent requests with `tokio::join!` and waits for all
//! of them to settle. Each section degrades on its own: a failed fetch has
//! already been logged by `ContentApi`, and here it only costs that section
//! its content. Loaders therefore return plain values, never errors.

use serde::Serialize;
use tracing::warn;

use crate::api::ContentApi;
use crate::error::Result;
use crate::query::{PageRequest, CARD_RELATIONS};
use crate::transport::Transport;
use crate::types::{Article, Category, PageResult};

pub const HOME_FEATURED_LIMIT: i64 = 3;
pub const HOME_RECENT_LIMIT: i64 = 6;
/// Posts per page on the blog index and category pages.
pub const INDEX_PAGE_SIZE: u32 = 12;
/// How many slugs are pre-rendered at build time.
pub const STATIC_PATHS_LIMIT: i64 = 100;

/// Falls back to an empty section when a fetch failed.
fn or_empty<R: Default>(section: &str, result: Result<R>) -> R {
    result.unwrap_or_else(|err| {
        warn!("Rendering {} section empty: {}", section, err);
        R::default()
    })
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HomePage {
    pub featured: Vec<Article>,
    pub recent: Vec<Article>,
    pub categories: Vec<Category>,
}

/// Featured posts, the newest posts and the category list, fetched
/// concurrently.
pub async fn load_home<T: Transport>(api: &ContentApi<T>) -> HomePage {
    let recent_page = PageRequest::new(1, HOME_RECENT_LIMIT);
    let (featured, recent, categories) = tokio::join!(
        api.get_featured_blogs(HOME_FEATURED_LIMIT),
        api.get_blogs(recent_page, &CARD_RELATIONS),
        api.get_categories(),
    );

    HomePage {
        featured: or_empty("featured", featured),
        recent: or_empty("recent", recent.map(|page| page.items)),
        categories: or_empty("categories", categories),
    }
}

/// Which listing the blog index shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum IndexFilter {
    All,
    Category(String),
    Search(String),
}

impl IndexFilter {
    /// A search term wins over a category; blank values are ignored.
    pub fn from_params(category: Option<&str>, search: Option<&str>) -> Self {
        let non_blank = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);
        if let Some(text) = non_blank(search) {
            IndexFilter::Search(text)
        } else if let Some(slug) = non_blank(category) {
            IndexFilter::Category(slug)
        } else {
            IndexFilter::All
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogIndexPage {
    pub filter: IndexFilter,
    pub posts: PageResult<Article>,
    pub categories: Vec<Category>,
}

/// The `/blog` listing: one page of posts (all, by category, or search hits)
/// plus the category filter bar.
///
/// `page` is the raw route parameter; anything that is not a positive
/// integer means page 1.
pub async fn load_blog_index<T: Transport>(
    api: &ContentApi<T>,
    page: Option<&str>,
    category: Option<&str>,
    search: Option<&str>,
) -> BlogIndexPage {
    let filter = IndexFilter::from_params(category, search);
    let page = PageRequest::parse_with_default_size(page, None, INDEX_PAGE_SIZE);

    let posts = async {
        match &filter {
            IndexFilter::Search(text) => api.search_blogs(text, page).await,
            IndexFilter::Category(slug) => api.get_blogs_by_category(slug, page).await,
            IndexFilter::All => api.get_blogs(page, &CARD_RELATIONS).await,
        }
    };
    let (posts, categories) = tokio::join!(posts, api.get_categories());

    BlogIndexPage {
        posts: or_empty("posts", posts),
        categories: or_empty("categories", categories),
        filter,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryPage {
    /// `None` renders the not-found view.
    pub category: Option<Category>,
    pub posts: PageResult<Article>,
}

/// A category heading plus one page of its posts.
pub async fn load_category<T: Transport>(
    api: &ContentApi<T>,
    slug: &str,
    page: Option<&str>,
) -> CategoryPage {
    let page = PageRequest::parse_with_default_size(page, None, INDEX_PAGE_SIZE);
    let (category, posts) = tokio::join!(
        api.get_category_by_slug(slug),
        api.get_blogs_by_category(slug, page),
    );

    CategoryPage {
        category: or_empty("category", category),
        posts: or_empty("posts", posts),
    }
}

/// A single post. Both "no such slug" and a failed fetch render as not found.
pub async fn load_post<T: Transport>(api: &ContentApi<T>, slug: &str) -> Option<Article> {
    or_empty("post", api.get_blog_by_slug(slug).await)
}

/// Slugs of the newest posts, for pre-rendering detail pages.
pub async fn load_static_paths<T: Transport>(api: &ContentApi<T>) -> Vec<String> {
    let page = PageRequest::new(1, STATIC_PATHS_LIMIT);
    let posts = or_empty("static paths", api.get_blogs(page, &[]).await);
    posts.items.into_iter().map(|post| post.slug).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::StubTransport;
    use crate::config::ContentConfig;

    const RECENT: &str = r#"{"data":[
        {"id":2,"attributes":{"title":"Second","slug":"second","published_at":"2024-02-02T00:00:00.000Z"}},
        {"id":1,"attributes":{"title":"First","slug":"first","published_at":"2024-01-01T00:00:00.000Z"}}
    ],"meta":{"pagination":{"page":1,"pageSize":6,"pageCount":1,"total":2}}}"#;

    const CATEGORIES: &str = r#"{"data":[{"id":1,"attributes":{"name":"Tech","slug":"tech"}}],"meta":{}}"#;

    fn api(transport: StubTransport) -> ContentApi<StubTransport> {
        ContentApi::with_transport(ContentConfig::new("http://cms.test"), transport)
    }

    #[tokio::test]
    async fn home_degrades_failed_featured_section_only() {
        let transport = StubTransport::default()
            .respond("filters[is_featured]", 500, "boom")
            .respond("/api/blogs", 200, RECENT)
            .respond("/api/categories", 200, CATEGORIES);
        let home = load_home(&api(transport.clone())).await;

        assert!(home.featured.is_empty());
        let slugs: Vec<&str> = home.recent.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["second", "first"]);
        assert_eq!(home.categories.len(), 1);
        assert_eq!(transport.seen().len(), 3);
    }

    #[tokio::test]
    async fn home_survives_unreachable_service() {
        let transport = StubTransport::default().refuse("/api/");
        let home = load_home(&api(transport)).await;
        assert!(home.featured.is_empty());
        assert!(home.recent.is_empty());
        assert!(home.categories.is_empty());
    }

    #[tokio::test]
    async fn index_prefers_search_over_category() {
        let transport = StubTransport::default()
            .respond("/api/blogs", 200, RECENT)
            .respond("/api/categories", 200, CATEGORIES);
        let page = load_blog_index(&api(transport.clone()), Some("2"), Some("tech"), Some("rust")).await;

        assert_eq!(page.filter, IndexFilter::Search("rust".into()));
        let blog_url = transport
            .seen()
            .into_iter()
            .find(|u| u.contains("/api/blogs"))
            .unwrap();
        assert!(blog_url.contains("[title][$containsi]=rust"));
        assert!(blog_url.contains("pagination[page]=2&pagination[pageSize]=12"));
        assert!(!blog_url.contains("filters[category]"));
    }

    #[tokio::test]
    async fn index_with_bad_page_uses_page_one() {
        let transport = StubTransport::default()
            .respond("/api/blogs", 200, RECENT)
            .respond("/api/categories", 200, CATEGORIES);
        let page = load_blog_index(&api(transport.clone()), Some("zero"), Some("tech"), Some("  ")).await;

        assert_eq!(page.filter, IndexFilter::Category("tech".into()));
        assert_eq!(page.posts.items.len(), 2);
        let blog_url = transport
            .seen()
            .into_iter()
            .find(|u| u.contains("/api/blogs"))
            .unwrap();
        assert!(blog_url.contains("filters[category][slug][$eq]=tech"));
        assert!(blog_url.contains("pagination[page]=1&"));
    }

    #[tokio::test]
    async fn index_keeps_posts_when_categories_fail() {
        let transport = StubTransport::default()
            .respond("/api/blogs", 200, RECENT)
            .respond("/api/categories", 503, "");
        let page = load_blog_index(&api(transport), None, None, None).await;
        assert_eq!(page.filter, IndexFilter::All);
        assert_eq!(page.posts.items.len(), 2);
        assert!(page.categories.is_empty());
    }

    #[tokio::test]
    async fn category_page_with_unknown_slug() {
        let empty = r#"{"data":[],"meta":{}}"#;
        let transport = StubTransport::default()
            .respond("/api/categories", 200, empty)
            .respond("/api/blogs", 200, empty);
        let page = load_category(&api(transport), "nope", None).await;
        assert!(page.category.is_none());
        assert!(page.posts.is_empty());
    }

    #[tokio::test]
    async fn post_fetch_failure_renders_not_found() {
        let transport = StubTransport::default().respond("/api/blogs", 500, "boom");
        assert!(load_post(&api(transport), "hello-world").await.is_none());
    }

    #[tokio::test]
    async fn static_paths_lists_slugs() {
        let transport = StubTransport::default().respond("pagination[pageSize]=100", 200, RECENT);
        let paths = load_static_paths(&api(transport.clone())).await;
        assert_eq!(paths, vec!["second".to_string(), "first".to_string()]);
        assert!(!transport.seen()[0].contains("populate"));
    }
}
