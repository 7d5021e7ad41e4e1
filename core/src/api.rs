//! Async façade that fetches and normalizes content in one call.
//!
//! # Design
//! `ContentApi` pairs the I/O-free `ContentClient` with a `Transport`. Every
//! method builds a request, awaits the transport, and parses the response.
//! Failures are logged once here, where they are detected, and returned to
//! the caller unchanged; nothing is swallowed or retried.

use tracing::{debug, error};

use crate::client::ContentClient;
use crate::config::ContentConfig;
use crate::error::Result;
use crate::http::{HttpRequest, HttpResponse};
use crate::query::{PageRequest, Populate};
use crate::transport::{Transport, UreqTransport};
use crate::types::{Article, Category, PageResult, Tag};

/// Content fetcher over a pluggable transport.
#[derive(Debug, Clone)]
pub struct ContentApi<T = UreqTransport> {
    client: ContentClient,
    transport: T,
}

impl ContentApi<UreqTransport> {
    pub fn new(config: ContentConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> ContentApi<T> {
    pub fn with_transport(config: ContentConfig, transport: T) -> Self {
        Self {
            client: ContentClient::new(config),
            transport,
        }
    }

    pub fn client(&self) -> &ContentClient {
        &self.client
    }

    async fn fetch<R>(
        &self,
        what: &str,
        request: HttpRequest,
        parse: impl FnOnce(&ContentClient, HttpResponse) -> Result<R>,
    ) -> Result<R> {
        debug!("GET {}", request.url);
        let result = match self.transport.execute(request).await {
            Ok(response) => parse(&self.client, response),
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            error!("Error fetching {}: {}", what, err);
        }
        result
    }

    /// Posts newest first, one page at a time.
    pub async fn get_blogs(
        &self,
        page: PageRequest,
        populate: &[Populate],
    ) -> Result<PageResult<Article>> {
        let request = self.client.build_blogs(page, populate);
        self.fetch("blogs", request, ContentClient::parse_article_page)
            .await
    }

    /// The newest `limit` posts flagged as featured.
    pub async fn get_featured_blogs(&self, limit: i64) -> Result<Vec<Article>> {
        let request = self.client.build_featured_blogs(limit);
        let page = self
            .fetch("featured blogs", request, ContentClient::parse_article_page)
            .await?;
        Ok(page.items)
    }

    /// A single post with every relation populated, `None` when no post has
    /// this slug.
    pub async fn get_blog_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        if slug.trim().is_empty() {
            return Ok(None);
        }
        let request = self.client.build_blog_by_slug(slug);
        self.fetch("blog by slug", request, ContentClient::parse_article)
            .await
    }

    pub async fn get_blogs_by_category(
        &self,
        category: &str,
        page: PageRequest,
    ) -> Result<PageResult<Article>> {
        let request = self.client.build_blogs_by_category(category, page);
        self.fetch("blogs by category", request, ContentClient::parse_article_page)
            .await
    }

    /// Case-insensitive substring search over title, excerpt and body.
    pub async fn search_blogs(&self, text: &str, page: PageRequest) -> Result<PageResult<Article>> {
        let request = self.client.build_search_blogs(text, page);
        self.fetch("search results", request, ContentClient::parse_article_page)
            .await
    }

    pub async fn get_categories(&self) -> Result<Vec<Category>> {
        let request = self.client.build_categories();
        let page = self
            .fetch("categories", request, ContentClient::parse_categories)
            .await?;
        Ok(page.items)
    }

    pub async fn get_category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        if slug.trim().is_empty() {
            return Ok(None);
        }
        let request = self.client.build_category_by_slug(slug);
        self.fetch("category by slug", request, ContentClient::parse_category)
            .await
    }

    pub async fn get_tags(&self) -> Result<Vec<Tag>> {
        let request = self.client.build_tags();
        let page = self.fetch("tags", request, ContentClient::parse_tags).await?;
        Ok(page.items)
    }
}
