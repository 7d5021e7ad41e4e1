//! Content query client for a headless-CMS-backed blog.
//!
//! # Overview
//! Turns page-level intents ("page 2 of posts in category X", "the post with
//! slug Y") into requests against the CMS REST API, and normalizes its
//! loosely-shaped JSON envelopes into flat, typed view models.
//!
//! # Design
//! - `ContentClient` is I/O-free: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse`.
//! - `ContentApi` drives a `Transport` between the two halves and logs each
//!   failure once before returning it.
//! - The `pages` loaders fan out concurrent fetches and degrade each page
//!   section independently.
//! - Configuration is an explicit `ContentConfig` passed at construction.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod markdown;
pub mod media;
pub mod normalize;
pub mod pages;
pub mod query;
pub mod transport;
pub mod types;

pub use api::ContentApi;
pub use client::ContentClient;
pub use config::{ContentConfig, DEFAULT_BASE_URL};
pub use error::{ContentError, Result};
pub use http::{HttpRequest, HttpResponse};
pub use media::{MediaRef, MediaResolver};
pub use query::{BlogQuery, CategoryQuery, ContentQuery, PageRequest, Populate, TagsQuery};
pub use transport::{Transport, UreqTransport};
pub use types::{Article, Author, Category, Media, PageResult, Pagination, Tag};
