//! View models handed to the presentation layer.
//!
//! # Design
//! These are the flat, fully-typed records produced by the normalizer. The
//! CMS's relation wrapping never leaks past this boundary: a relation that
//! was not populated is `None` or an empty `Vec`, and every image URL is
//! already absolute.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::markdown::render_markdown;

/// An uploaded asset with an absolute URL.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Media {
    pub id: Option<u64>,
    pub url: String,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub color: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Tag {
    pub id: u64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Author {
    pub id: u64,
    pub username: String,
}

/// A blog post with its relations flattened.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Article {
    pub id: u64,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    /// Markdown source.
    pub body: String,
    pub published_at: Option<DateTime<Utc>>,
    /// Estimated reading time in minutes.
    pub reading_time: Option<u32>,
    pub is_featured: bool,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub category: Option<Category>,
    pub tags: Vec<Tag>,
    pub author: Option<Author>,
    pub image: Option<Media>,
    pub gallery: Vec<Media>,
}

impl Article {
    /// Body rendered to sanitized HTML.
    pub fn body_html(&self) -> String {
        render_markdown(&self.body)
    }

    /// Title for the document head: the SEO title when set, else the post title.
    pub fn page_title(&self) -> &str {
        self.meta_title.as_deref().unwrap_or(&self.title)
    }

    /// Description for the document head: SEO description, then excerpt.
    pub fn page_description(&self) -> Option<&str> {
        self.meta_description.as_deref().or(self.excerpt.as_deref())
    }
}

/// Pagination metadata for a list result. `page` is 1-based.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
    pub total: u64,
}

impl Pagination {
    /// Make the metadata consistent with the number of items actually returned.
    ///
    /// Keeps `total >= items`, derives a page count when the service reported
    /// none, and clamps `page` into `[1, page_count]`.
    pub fn reconcile(mut self, items: usize) -> Self {
        let items = items as u64;
        if self.total < items {
            self.total = items;
        }
        if self.page_size == 0 {
            self.page_size = u32::try_from(items).unwrap_or(u32::MAX);
        }
        if self.page_count == 0 && self.total > 0 && self.page_size > 0 {
            let pages = self.total.div_ceil(u64::from(self.page_size));
            self.page_count = u32::try_from(pages).unwrap_or(u32::MAX);
        }
        self.page = if self.page_count > 0 {
            self.page.clamp(1, self.page_count)
        } else {
            self.page.max(1)
        };
        self
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }
}

/// One page of a collection plus its pagination metadata.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> PageResult<T> {
    /// An empty first page, used when a section degrades after a failed fetch.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::default().reconcile(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for PageResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}
