//! Media URL resolution.
//!
//! # Design
//! The CMS reports uploads either with an absolute URL (external storage such
//! as a CDN) or with a path relative to its own origin (local uploads). It
//! also nests the media object differently depending on how it was
//! populated. `MediaRef` accepts every observed shape and `MediaResolver`
//! turns any of them into an absolute URL, or `None` when nothing usable is
//! present.

use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::normalize::{Entity, Relation};
use crate::types::Media;

/// Fields of an uploaded file that the client cares about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaAttributes {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "alternativeText")]
    pub alternative_text: Option<String>,
}

/// A media object as it appears directly on an entity.
#[derive(Debug, Clone, Deserialize)]
pub struct FlatMedia {
    #[serde(default)]
    pub id: Option<u64>,
    pub url: String,
    #[serde(default, rename = "alternativeText")]
    pub alternative_text: Option<String>,
}

/// Every wire shape a media field can take.
///
/// Variant order matters: serde tries them top to bottom, and `Wrapped`
/// accepts any object, so it must stay after the shapes with required keys.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MediaRef {
    /// `{ "id": 1, "attributes": { "url": ... } }`
    Entity(Entity<MediaAttributes>),
    /// `{ "url": ..., "alternativeText": ... }`
    Flat(FlatMedia),
    /// `{ "data": { "id": 1, "attributes": { ... } } }` or `{ "data": null }`
    Wrapped(Relation<Entity<MediaAttributes>>),
    /// Anything else, treated as absent.
    Unrecognized(IgnoredAny),
}

/// Every wire shape a multi-media field can take.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MediaList {
    /// `[ {...}, {...} ]`
    Flat(Vec<MediaRef>),
    /// `{ "data": [ {...}, {...} ] }` or `{ "data": null }`
    Wrapped(Relation<Vec<MediaRef>>),
    /// Anything else, treated as empty.
    Unrecognized(IgnoredAny),
}

impl MediaList {
    pub fn into_items(self) -> Vec<MediaRef> {
        match self {
            MediaList::Flat(items) => items,
            MediaList::Wrapped(relation) => relation.data.unwrap_or_default(),
            MediaList::Unrecognized(_) => Vec::new(),
        }
    }
}

impl MediaRef {
    fn parts(&self) -> Option<(Option<u64>, &str, Option<&str>)> {
        let (id, url, alt) = match self {
            MediaRef::Entity(entity) => (
                Some(entity.id),
                entity.attributes.url.as_deref()?,
                entity.attributes.alternative_text.as_deref(),
            ),
            MediaRef::Flat(flat) => (flat.id, flat.url.as_str(), flat.alternative_text.as_deref()),
            MediaRef::Wrapped(relation) => {
                let entity = relation.data.as_ref()?;
                (
                    Some(entity.id),
                    entity.attributes.url.as_deref()?,
                    entity.attributes.alternative_text.as_deref(),
                )
            }
            MediaRef::Unrecognized(_) => return None,
        };
        if url.trim().is_empty() {
            return None;
        }
        Some((id, url, alt))
    }
}

/// Turns stored media references into absolute URLs.
#[derive(Debug, Clone)]
pub struct MediaResolver {
    origin: String,
}

impl MediaResolver {
    pub fn new(origin: &str) -> Self {
        Self {
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    /// Absolute URLs pass through; relative ones are prefixed with the origin.
    pub fn absolute_url(&self, url: &str) -> String {
        if is_absolute(url) {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{url}", self.origin)
        } else {
            format!("{}/{url}", self.origin)
        }
    }

    /// Absolute URL of a possibly-absent media reference.
    pub fn resolve_url(&self, media: Option<&MediaRef>) -> Option<String> {
        let (_, url, _) = media?.parts()?;
        Some(self.absolute_url(url))
    }

    /// Full media view model of a possibly-absent media reference.
    pub fn resolve(&self, media: Option<&MediaRef>) -> Option<Media> {
        let (id, url, alt) = media?.parts()?;
        Some(Media {
            id,
            url: self.absolute_url(url),
            alt: alt.filter(|a| !a.is_empty()).map(str::to_string),
        })
    }
}

/// `scheme://...` or protocol-relative `//host/...`.
fn is_absolute(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }
    match url.split_once("://") {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}
