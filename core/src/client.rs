//! Stateless request builder and response parser for the content API.
//!
//! # Design
//! `ContentClient` holds only the configured origin and a `MediaResolver`
//! and carries no mutable state between calls. Each query shape has a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. Network I/O lives in `ContentApi`, which
//! drives a `Transport` between the two halves.

use serde::Deserialize;

use crate::config::ContentConfig;
use crate::error::{ContentError, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::media::MediaResolver;
use crate::normalize;
use crate::query::{BlogQuery, CategoryQuery, ContentQuery, PageRequest, Populate, TagsQuery};
use crate::types::{Article, Category, PageResult, Tag};

/// Builds content API requests and normalizes their responses without
/// touching the network.
#[derive(Debug, Clone)]
pub struct ContentClient {
    config: ContentConfig,
    media: MediaResolver,
}

impl ContentClient {
    pub fn new(config: ContentConfig) -> Self {
        let media = MediaResolver::new(config.base_url());
        Self { config, media }
    }

    pub fn config(&self) -> &ContentConfig {
        &self.config
    }

    pub fn media(&self) -> &MediaResolver {
        &self.media
    }

    /// Request for any query shape.
    pub fn build<Q: ContentQuery>(&self, query: &Q) -> HttpRequest {
        let mut url = format!("{}/{}", self.config.api_root(), query.collection());
        let qs = query.query_string();
        if !qs.is_empty() {
            url.push('?');
            url.push_str(&qs);
        }
        HttpRequest::get(url)
    }

    pub fn build_blogs(&self, page: PageRequest, populate: &[Populate]) -> HttpRequest {
        self.build(&BlogQuery::list(page, populate))
    }

    pub fn build_featured_blogs(&self, limit: i64) -> HttpRequest {
        self.build(&BlogQuery::featured(limit))
    }

    pub fn build_blog_by_slug(&self, slug: &str) -> HttpRequest {
        self.build(&BlogQuery::by_slug(slug))
    }

    pub fn build_blogs_by_category(&self, category: &str, page: PageRequest) -> HttpRequest {
        self.build(&BlogQuery::by_category(category, page))
    }

    pub fn build_search_blogs(&self, text: &str, page: PageRequest) -> HttpRequest {
        self.build(&BlogQuery::search(text, page))
    }

    pub fn build_categories(&self) -> HttpRequest {
        self.build(&CategoryQuery::All)
    }

    pub fn build_category_by_slug(&self, slug: &str) -> HttpRequest {
        self.build(&CategoryQuery::BySlug(slug.to_string()))
    }

    pub fn build_tags(&self) -> HttpRequest {
        self.build(&TagsQuery)
    }

    /// A page of posts from any list-shaped blog query.
    pub fn parse_article_page(&self, response: HttpResponse) -> Result<PageResult<Article>> {
        check_status(&response)?;
        normalize::article_page(&response.body, &self.media)
    }

    /// First post of a slug lookup, `None` when nothing matched.
    pub fn parse_article(&self, response: HttpResponse) -> Result<Option<Article>> {
        check_status(&response)?;
        normalize::first_article(&response.body, &self.media)
    }

    pub fn parse_categories(&self, response: HttpResponse) -> Result<PageResult<Category>> {
        check_status(&response)?;
        normalize::category_page(&response.body)
    }

    /// First category of a slug lookup, `None` when nothing matched.
    pub fn parse_category(&self, response: HttpResponse) -> Result<Option<Category>> {
        check_status(&response)?;
        normalize::first_category(&response.body)
    }

    pub fn parse_tags(&self, response: HttpResponse) -> Result<PageResult<Tag>> {
        check_status(&response)?;
        normalize::tag_page(&response.body)
    }
}

/// Error body returned by the CMS alongside non-2xx statuses.
#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// Map non-2xx status codes to `ContentError::Api`.
fn check_status(response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    Err(ContentError::api(response.status, error_message(response)))
}

/// The CMS error message when the body carries one, else the raw body, else
/// a generic description of the status.
fn error_message(response: &HttpResponse) -> String {
    if let Ok(ErrorBody {
        error: ErrorDetail { message: Some(msg) },
    }) = serde_json::from_str::<ErrorBody>(&response.body)
    {
        if !msg.is_empty() {
            return msg;
        }
    }
    let body = response.body.trim();
    if body.is_empty() {
        format!("unexpected status {}", response.status)
    } else {
        body.to_string()
    }
}
