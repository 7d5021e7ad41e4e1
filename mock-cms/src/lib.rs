//! In-memory stand-in for the headless CMS REST API.
//!
//! Serves `/api/blogs`, `/api/categories` and `/api/tags` with the CMS's
//! bracketed `filters`/`pagination`/`sort`/`populate` parameters and its
//! `{data, meta}` envelope. Relations are only inlined when requested
//! through `populate`.

pub mod store;

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub use store::{seed, Store};

/// Page size used when a request names none.
pub const DEFAULT_PAGE_SIZE: usize = 25;
/// Larger page sizes are capped to this.
pub const MAX_PAGE_SIZE: usize = 100;

/// Fixture content, shared read-only between handlers.
pub type Db = Arc<Store>;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    /// When set, every collection answers with this status and an error body.
    pub fail_status: Option<StatusCode>,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            db: Arc::new(store),
            fail_status: None,
        }
    }

    pub fn failing(status: StatusCode) -> Self {
        Self {
            db: Arc::new(Store::default()),
            fail_status: Some(status),
        }
    }
}

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;
type Params = Query<Vec<(String, String)>>;

pub fn app() -> Router {
    app_with(AppState::new(seed()))
}

pub fn app_with(state: AppState) -> Router {
    Router::new()
        .route("/api/blogs", get(list_blogs))
        .route("/api/categories", get(list_categories))
        .route("/api/tags", get(list_tags))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, AppState::new(seed())).await
}

pub async fn run_with(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(state)).await
}

fn error_response(status: StatusCode, name: &str, message: &str) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({
            "data": null,
            "error": { "status": status.as_u16(), "name": name, "message": message, "details": {} }
        })),
    )
}

fn check_failure(state: &AppState) -> Result<(), (StatusCode, Json<Value>)> {
    match state.fail_status {
        Some(status) => Err(error_response(
            status,
            "InjectedError",
            status.canonical_reason().unwrap_or("Injected failure"),
        )),
        None => Ok(()),
    }
}

/// `filters[$or][0][title][$containsi]` -> `["filters", "$or", "0", "title", "$containsi"]`
fn key_path(key: &str) -> Vec<&str> {
    key.split(['[', ']']).filter(|s| !s.is_empty()).collect()
}

fn invalid_key(key: &str) -> (StatusCode, Json<Value>) {
    error_response(StatusCode::BAD_REQUEST, "ValidationError", &format!("Invalid key {key}"))
}

/// Pagination, sort and populate parameters shared by every collection.
#[derive(Debug, Default)]
struct ListParams {
    page: Option<usize>,
    page_size: Option<usize>,
    sort: Option<String>,
    populate: Vec<String>,
}

impl ListParams {
    /// Consume a common parameter; `false` means the caller must handle it.
    fn take(&mut self, path: &[&str], value: &str) -> Result<bool, (StatusCode, Json<Value>)> {
        match path {
            ["pagination", "page"] => self.page = Some(parse_positive(value)?),
            ["pagination", "pageSize"] => self.page_size = Some(parse_positive(value)?),
            ["sort"] => self.sort = Some(value.to_string()),
            ["populate"] => {
                self.populate = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn populate(&self) -> Vec<&str> {
        self.populate.iter().map(String::as_str).collect()
    }

    /// Slice one page out of `items` and wrap it in the envelope.
    fn envelope(&self, items: Vec<Value>) -> ApiResult {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
        let offset = page.saturating_sub(1).checked_mul(page_size).ok_or_else(|| {
            error_response(
                StatusCode::BAD_REQUEST,
                "ValidationError",
                &format!("Invalid pagination value {page}"),
            )
        })?;
        let total = items.len();
        let page_count = total.div_ceil(page_size);
        let data: Vec<Value> = items.into_iter().skip(offset).take(page_size).collect();
        Ok(Json(json!({
            "data": data,
            "meta": {
                "pagination": {
                    "page": page,
                    "pageSize": page_size,
                    "pageCount": page_count,
                    "total": total,
                }
            }
        })))
    }
}

fn parse_positive(value: &str) -> Result<usize, (StatusCode, Json<Value>)> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(error_response(
            StatusCode::BAD_REQUEST,
            "ValidationError",
            &format!("Invalid pagination value {value}"),
        )),
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

async fn list_blogs(State(state): State<AppState>, Query(params): Params) -> ApiResult {
    check_failure(&state)?;

    let mut list = ListParams::default();
    let mut featured: Option<bool> = None;
    let mut slug: Option<String> = None;
    let mut category: Option<String> = None;
    let mut any_of: Vec<(String, String)> = Vec::new();

    for (key, value) in &params {
        let path = key_path(key);
        if list.take(&path, value)? {
            continue;
        }
        match path.as_slice() {
            ["filters", "is_featured", "$eq"] => featured = Some(value == "true"),
            ["filters", "slug", "$eq"] => slug = Some(value.clone()),
            ["filters", "category", "slug", "$eq"] => category = Some(value.clone()),
            ["filters", "$or", _, field @ ("title" | "excerpt" | "content"), "$containsi"] => {
                any_of.push((field.to_string(), value.clone()))
            }
            _ => return Err(invalid_key(key)),
        }
    }

    let content = &state.db;
    let mut blogs: Vec<_> = content
        .blogs
        .iter()
        .filter(|b| featured.is_none_or(|f| b.is_featured == f))
        .filter(|b| slug.as_deref().is_none_or(|s| b.slug == s))
        .filter(|b| {
            category.as_deref().is_none_or(|s| {
                b.category
                    .and_then(|id| content.category(id))
                    .is_some_and(|c| c.slug == s)
            })
        })
        .filter(|b| {
            any_of.is_empty()
                || any_of.iter().any(|(field, needle)| match field.as_str() {
                    "title" => contains_ci(&b.title, needle),
                    "excerpt" => b.excerpt.as_deref().is_some_and(|e| contains_ci(e, needle)),
                    _ => contains_ci(&b.content, needle),
                })
        })
        .collect();

    match list.sort.as_deref() {
        None => {}
        // Stable: equal timestamps keep insertion order.
        Some("published_at:desc") => blogs.sort_by(|a, b| b.published_at.cmp(&a.published_at)),
        Some("published_at:asc") => blogs.sort_by(|a, b| a.published_at.cmp(&b.published_at)),
        Some(other) => return Err(invalid_key(&format!("sort={other}"))),
    }

    let populate = list.populate();
    let items = blogs.into_iter().map(|b| content.blog_entity(b, &populate)).collect();
    list.envelope(items)
}

async fn list_categories(State(state): State<AppState>, Query(params): Params) -> ApiResult {
    check_failure(&state)?;

    let mut list = ListParams::default();
    let mut slug: Option<String> = None;
    for (key, value) in &params {
        let path = key_path(key);
        if list.take(&path, value)? {
            continue;
        }
        match path.as_slice() {
            ["filters", "slug", "$eq"] => slug = Some(value.clone()),
            _ => return Err(invalid_key(key)),
        }
    }

    let content = &state.db;
    let mut categories: Vec<_> = content
        .categories
        .iter()
        .filter(|c| slug.as_deref().is_none_or(|s| c.slug == s))
        .collect();
    if list.sort.as_deref() == Some("name:asc") {
        categories.sort_by(|a, b| a.name.cmp(&b.name));
    }

    let items = categories.into_iter().map(store::category_entity).collect();
    list.envelope(items)
}

async fn list_tags(State(state): State<AppState>, Query(params): Params) -> ApiResult {
    check_failure(&state)?;

    let mut list = ListParams::default();
    for (key, value) in &params {
        if !list.take(&key_path(key), value)? {
            return Err(invalid_key(key));
        }
    }

    let content = &state.db;
    let mut tags: Vec<_> = content.tags.iter().collect();
    if list.sort.as_deref() == Some("name:asc") {
        tags.sort_by(|a, b| a.name.cmp(&b.name));
    }

    let items = tags.into_iter().map(store::tag_entity).collect();
    list.envelope(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_path_splits_brackets() {
        assert_eq!(
            key_path("filters[$or][0][title][$containsi]"),
            vec!["filters", "$or", "0", "title", "$containsi"]
        );
        assert_eq!(key_path("sort"), vec!["sort"]);
    }

    #[test]
    fn envelope_paginates() {
        let list = ListParams {
            page: Some(2),
            page_size: Some(2),
            ..Default::default()
        };
        let Json(body) = list.envelope((1..=5).map(|i| json!(i)).collect()).unwrap();
        assert_eq!(body["data"], json!([3, 4]));
        assert_eq!(body["meta"]["pagination"]["pageCount"], 3);
        assert_eq!(body["meta"]["pagination"]["total"], 5);
    }

    #[test]
    fn envelope_caps_page_size() {
        let list = ListParams {
            page_size: Some(500),
            ..Default::default()
        };
        let Json(body) = list.envelope(Vec::new()).unwrap();
        assert_eq!(body["meta"]["pagination"]["pageSize"], 100);
        assert_eq!(body["meta"]["pagination"]["pageCount"], 0);
    }

    #[test]
    fn envelope_rejects_offset_overflow() {
        let list = ListParams {
            page: Some(usize::MAX),
            page_size: Some(MAX_PAGE_SIZE),
            ..Default::default()
        };
        let (status, Json(body)) = list.envelope(Vec::new()).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["name"], "ValidationError");
    }

    #[test]
    fn populate_inlines_only_requested_relations() {
        let store = seed();
        let entity = store.blog_entity(&store.blogs[0], &["category"]);
        let attrs = &entity["attributes"];
        assert_eq!(attrs["category"]["data"]["attributes"]["slug"], "tech");
        assert!(attrs.get("author").is_none());
        assert!(attrs.get("featured_image").is_none());
    }

    #[test]
    fn missing_relation_is_null_data() {
        let store = seed();
        let uncategorized = store.blogs.iter().find(|b| b.slug == "uncategorized-notes").unwrap();
        let entity = store.blog_entity(uncategorized, &["category", "author"]);
        assert!(entity["attributes"]["category"]["data"].is_null());
        assert!(entity["attributes"]["author"]["data"].is_null());
    }
}
