//! Response normalization.
//!
//! # Design
//! The CMS wraps everything: collections in `{data, meta}`, entities in
//! `{id, attributes}`, relations in `{data: entity | [entity] | null}`. The
//! raw serde shapes below mirror that wrapping and nothing else; the `into_*`
//! functions flatten one level of relation nesting, resolve every image
//! through `MediaResolver`, and emit the view models from `types`. A
//! relation that was not populated, or came back `null`, becomes `None` or
//! an empty `Vec`.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::Result;
use crate::media::{MediaList, MediaRef, MediaResolver};
use crate::types::{Article, Author, Category, Media, PageResult, Pagination, Tag};

/// `{ "id": ..., "attributes": { ... } }`
#[derive(Debug, Clone, Deserialize)]
pub struct Entity<A> {
    pub id: u64,
    pub attributes: A,
}

/// `{ "data": ... }` around a populated relation.
#[derive(Debug, Clone, Deserialize)]
pub struct Relation<T> {
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ListEnvelope<A> {
    data: Option<Vec<Entity<A>>>,
    #[serde(default)]
    meta: Meta,
}

#[derive(Debug, Default, Deserialize)]
struct Meta {
    #[serde(default)]
    pagination: Option<WirePagination>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePagination {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    page_size: u32,
    #[serde(default)]
    page_count: u32,
    #[serde(default)]
    total: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BlogAttributes {
    #[serde(default)]
    title: String,
    slug: String,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
    /// The CMS's own publication stamp, used when the custom field is unset.
    #[serde(default, rename = "publishedAt")]
    published_at_builtin: Option<DateTime<Utc>>,
    #[serde(default)]
    reading_time: Option<u32>,
    #[serde(default)]
    is_featured: Option<bool>,
    #[serde(default)]
    meta_title: Option<String>,
    #[serde(default)]
    meta_description: Option<String>,
    #[serde(default)]
    featured_image: Option<MediaRef>,
    #[serde(default)]
    gallery: Option<MediaList>,
    #[serde(default)]
    category: Option<Relation<Entity<CategoryAttributes>>>,
    #[serde(default)]
    tags: Option<Relation<Vec<Entity<TagAttributes>>>>,
    #[serde(default)]
    author: Option<Relation<Entity<AuthorAttributes>>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryAttributes {
    #[serde(default)]
    name: String,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagAttributes {
    #[serde(default)]
    name: String,
    #[serde(default)]
    slug: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthorAttributes {
    #[serde(default)]
    username: String,
}

/// Decode a collection envelope and map each entity.
fn parse_list<A, T>(body: &str, map: impl Fn(Entity<A>) -> T) -> Result<PageResult<T>>
where
    A: DeserializeOwned,
{
    let envelope: ListEnvelope<A> = serde_json::from_str(body)?;
    let items: Vec<T> = envelope.data.unwrap_or_default().into_iter().map(map).collect();
    let pagination = envelope
        .meta
        .pagination
        .map(|p| Pagination {
            page: p.page,
            page_size: p.page_size,
            page_count: p.page_count,
            total: p.total,
        })
        .unwrap_or_default()
        .reconcile(items.len());
    Ok(PageResult { items, pagination })
}

pub(crate) fn article_page(body: &str, media: &MediaResolver) -> Result<PageResult<Article>> {
    parse_list(body, |entity: Entity<BlogAttributes>| into_article(entity, media))
}

pub(crate) fn first_article(body: &str, media: &MediaResolver) -> Result<Option<Article>> {
    Ok(article_page(body, media)?.items.into_iter().next())
}

pub(crate) fn category_page(body: &str) -> Result<PageResult<Category>> {
    parse_list(body, into_category)
}

pub(crate) fn first_category(body: &str) -> Result<Option<Category>> {
    Ok(category_page(body)?.items.into_iter().next())
}

pub(crate) fn tag_page(body: &str) -> Result<PageResult<Tag>> {
    parse_list(body, into_tag)
}

fn into_article(entity: Entity<BlogAttributes>, media: &MediaResolver) -> Article {
    let Entity { id, attributes: a } = entity;

    let gallery: Vec<Media> = a
        .gallery
        .map(MediaList::into_items)
        .unwrap_or_default()
        .iter()
        .filter_map(|m| media.resolve(Some(m)))
        .collect();

    Article {
        id,
        title: a.title,
        slug: a.slug,
        excerpt: a.excerpt.filter(|e| !e.is_empty()),
        body: a.content.unwrap_or_default(),
        published_at: a.published_at.or(a.published_at_builtin),
        reading_time: a.reading_time,
        is_featured: a.is_featured.unwrap_or(false),
        meta_title: a.meta_title.filter(|t| !t.is_empty()),
        meta_description: a.meta_description.filter(|d| !d.is_empty()),
        category: a.category.and_then(|r| r.data).map(into_category),
        tags: a
            .tags
            .and_then(|r| r.data)
            .unwrap_or_default()
            .into_iter()
            .map(into_tag)
            .collect(),
        author: a.author.and_then(|r| r.data).map(into_author),
        image: media.resolve(a.featured_image.as_ref()),
        gallery,
    }
}

fn into_category(entity: Entity<CategoryAttributes>) -> Category {
    let Entity { id, attributes: a } = entity;
    Category {
        id,
        name: a.name,
        slug: a.slug,
        color: a.color.filter(|c| !c.is_empty()),
        description: a.description.filter(|d| !d.is_empty()),
    }
}

fn into_tag(entity: Entity<TagAttributes>) -> Tag {
    Tag {
        id: entity.id,
        name: entity.attributes.name,
        slug: entity.attributes.slug,
    }
}

fn into_author(entity: Entity<AuthorAttributes>) -> Author {
    Author {
        id: entity.id,
        username: entity.attributes.username,
    }
}
