//! Query construction for the content API.
//!
//! # Design
//! Every page-level intent maps to one query value that knows its collection
//! and its ordered parameter list. Building a query never fails: bad page
//! numbers fall back to defaults and a blank search becomes a plain listing.
//! Encoding is a pure function of the parameter list, so the same query
//! always produces the same bytes.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_FEATURED_LIMIT: u32 = 3;

const SORT_PUBLISHED_DESC: &str = "published_at:desc";
const SORT_NAME_ASC: &str = "name:asc";

/// Characters escaped in keys and values. Brackets, `$`, `:` and `,` stay
/// literal so filter keys read the way the CMS documents them.
const QUERY_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'+')
    .add(b'/')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// A 1-based page number and a page size, both guaranteed positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Non-positive values fall back to page 1 and [`DEFAULT_PAGE_SIZE`].
    pub fn new(page: i64, page_size: i64) -> Self {
        Self::with_default_size(page, page_size, DEFAULT_PAGE_SIZE)
    }

    pub fn with_default_size(page: i64, page_size: i64, default_size: u32) -> Self {
        Self {
            page: positive_or(page, DEFAULT_PAGE),
            page_size: positive_or(page_size, default_size),
        }
    }

    /// Build from raw route parameters. Missing, non-numeric or non-positive
    /// values fall back to their defaults.
    pub fn parse(page: Option<&str>, page_size: Option<&str>) -> Self {
        Self::parse_with_default_size(page, page_size, DEFAULT_PAGE_SIZE)
    }

    pub fn parse_with_default_size(
        page: Option<&str>,
        page_size: Option<&str>,
        default_size: u32,
    ) -> Self {
        Self {
            page: parse_positive_or(page, DEFAULT_PAGE),
            page_size: parse_positive_or(page_size, default_size),
        }
    }

    fn push_params(&self, params: &mut Vec<(String, String)>) {
        params.push(param("pagination[page]", self.page));
        params.push(param("pagination[pageSize]", self.page_size));
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn positive_or(value: i64, default: u32) -> u32 {
    if value < 1 {
        default
    } else {
        u32::try_from(value).unwrap_or(u32::MAX)
    }
}

fn parse_positive_or(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .map_or(default, |v| positive_or(v, default))
}

/// Relations the CMS can be asked to inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Populate {
    FeaturedImage,
    Gallery,
    Category,
    Tags,
    Author,
}

impl Populate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Populate::FeaturedImage => "featured_image",
            Populate::Gallery => "gallery",
            Populate::Category => "category",
            Populate::Tags => "tags",
            Populate::Author => "author",
        }
    }
}

/// Relations shown on a post card.
pub const CARD_RELATIONS: [Populate; 3] = [Populate::FeaturedImage, Populate::Category, Populate::Author];

/// Relations shown on a post detail page.
pub const DETAIL_RELATIONS: [Populate; 5] = [
    Populate::FeaturedImage,
    Populate::Gallery,
    Populate::Category,
    Populate::Tags,
    Populate::Author,
];

/// A request against one content collection.
pub trait ContentQuery {
    /// Collection path segment under the API root.
    fn collection(&self) -> &'static str;

    /// Ordered, unencoded query parameters.
    fn params(&self) -> Vec<(String, String)>;

    /// Encoded query string without the leading `?`.
    fn query_string(&self) -> String {
        encode_query(&self.params())
    }
}

/// Queries against the blog post collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlogQuery {
    List { page: PageRequest, populate: Vec<Populate> },
    Featured { limit: u32 },
    BySlug { slug: String },
    ByCategory { category: String, page: PageRequest },
    Search { text: String, page: PageRequest },
}

impl BlogQuery {
    pub fn list(page: PageRequest, populate: &[Populate]) -> Self {
        BlogQuery::List {
            page,
            populate: populate.to_vec(),
        }
    }

    /// Non-positive limits fall back to [`DEFAULT_FEATURED_LIMIT`].
    pub fn featured(limit: i64) -> Self {
        BlogQuery::Featured {
            limit: positive_or(limit, DEFAULT_FEATURED_LIMIT),
        }
    }

    pub fn by_slug(slug: &str) -> Self {
        BlogQuery::BySlug {
            slug: slug.trim().to_string(),
        }
    }

    pub fn by_category(category: &str, page: PageRequest) -> Self {
        BlogQuery::ByCategory {
            category: category.trim().to_string(),
            page,
        }
    }

    /// A blank search is a plain listing of post cards.
    pub fn search(text: &str, page: PageRequest) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return BlogQuery::list(page, &CARD_RELATIONS);
        }
        BlogQuery::Search {
            text: text.to_string(),
            page,
        }
    }
}

impl ContentQuery for BlogQuery {
    fn collection(&self) -> &'static str {
        "blogs"
    }

    fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        match self {
            BlogQuery::List { page, populate } => {
                page.push_params(&mut params);
                params.push(param("sort", SORT_PUBLISHED_DESC));
                if !populate.is_empty() {
                    params.push(populate_param(populate));
                }
            }
            BlogQuery::Featured { limit } => {
                params.push(param("filters[is_featured][$eq]", "true"));
                params.push(param("pagination[pageSize]", limit));
                params.push(param("sort", SORT_PUBLISHED_DESC));
                params.push(populate_param(&CARD_RELATIONS));
            }
            BlogQuery::BySlug { slug } => {
                params.push(param("filters[slug][$eq]", slug));
                params.push(populate_param(&DETAIL_RELATIONS));
            }
            BlogQuery::ByCategory { category, page } => {
                params.push(param("filters[category][slug][$eq]", category));
                page.push_params(&mut params);
                params.push(param("sort", SORT_PUBLISHED_DESC));
                params.push(populate_param(&CARD_RELATIONS));
            }
            BlogQuery::Search { text, page } => {
                for (i, field) in ["title", "excerpt", "content"].iter().enumerate() {
                    params.push(param(&format!("filters[$or][{i}][{field}][$containsi]"), text));
                }
                page.push_params(&mut params);
                params.push(param("sort", SORT_PUBLISHED_DESC));
                params.push(populate_param(&CARD_RELATIONS));
            }
        }
        params
    }
}

/// Queries against the category collection, sorted by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryQuery {
    All,
    BySlug(String),
}

impl ContentQuery for CategoryQuery {
    fn collection(&self) -> &'static str {
        "categories"
    }

    fn params(&self) -> Vec<(String, String)> {
        match self {
            CategoryQuery::All => vec![param("sort", SORT_NAME_ASC)],
            CategoryQuery::BySlug(slug) => vec![param("filters[slug][$eq]", slug.trim())],
        }
    }
}

/// All tags, sorted by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagsQuery;

impl ContentQuery for TagsQuery {
    fn collection(&self) -> &'static str {
        "tags"
    }

    fn params(&self) -> Vec<(String, String)> {
        vec![param("sort", SORT_NAME_ASC)]
    }
}

fn param(key: &str, value: impl ToString) -> (String, String) {
    (key.to_string(), value.to_string())
}

fn populate_param(relations: &[Populate]) -> (String, String) {
    let joined = relations.iter().map(Populate::as_str).collect::<Vec<_>>().join(",");
    param("populate", joined)
}

/// Percent-encode parameters into `k=v&k=v` form.
pub fn encode_query(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, QUERY_ENCODE_SET),
                utf8_percent_encode(v, QUERY_ENCODE_SET)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn page_request_keeps_valid_values() {
        assert_eq!(PageRequest::new(3, 25), PageRequest { page: 3, page_size: 25 });
    }

    #[test]
    fn page_request_normalizes_non_positive_values() {
        assert_eq!(PageRequest::new(0, 0), PageRequest::default());
        assert_eq!(PageRequest::new(-4, -1), PageRequest::default());
        assert_eq!(PageRequest::with_default_size(0, 0, 12).page_size, 12);
    }

    #[test]
    fn page_request_parse_normalizes_garbage() {
        assert_eq!(PageRequest::parse(Some("abc"), Some("")), PageRequest::default());
        assert_eq!(PageRequest::parse(None, None), PageRequest::default());
        assert_eq!(
            PageRequest::parse(Some(" 2 "), Some("5")),
            PageRequest { page: 2, page_size: 5 }
        );
        assert_eq!(PageRequest::parse(Some("1.5"), Some("-3")), PageRequest::default());
    }

    #[test]
    fn list_query_without_populate() {
        let q = BlogQuery::list(PageRequest::new(1, 100), &[]);
        assert_eq!(
            q.query_string(),
            "pagination[page]=1&pagination[pageSize]=100&sort=published_at:desc"
        );
    }

    #[test]
    fn list_query_with_populate() {
        let q = BlogQuery::list(PageRequest::new(2, 6), &CARD_RELATIONS);
        assert_eq!(
            q.query_string(),
            "pagination[page]=2&pagination[pageSize]=6&sort=published_at:desc&populate=featured_image,category,author"
        );
    }

    #[test]
    fn featured_query_defaults_limit() {
        let q = BlogQuery::featured(0);
        assert_eq!(q, BlogQuery::Featured { limit: 3 });
        let params = q.params();
        assert_eq!(get(&params, "filters[is_featured][$eq]"), Some("true"));
        assert_eq!(get(&params, "pagination[pageSize]"), Some("3"));
        assert_eq!(get(&params, "populate"), Some("featured_image,category,author"));
    }

    #[test]
    fn by_slug_query_populates_everything() {
        let q = BlogQuery::by_slug("hello-world");
        assert_eq!(
            q.query_string(),
            "filters[slug][$eq]=hello-world&populate=featured_image,gallery,category,tags,author"
        );
    }

    #[test]
    fn by_category_query_matches_inputs() {
        let q = BlogQuery::by_category("tech", PageRequest::new(4, 12));
        let params = q.params();
        assert_eq!(get(&params, "filters[category][slug][$eq]"), Some("tech"));
        assert_eq!(get(&params, "pagination[page]"), Some("4"));
        assert_eq!(get(&params, "pagination[pageSize]"), Some("12"));
        assert_eq!(get(&params, "sort"), Some("published_at:desc"));
    }

    #[test]
    fn by_category_page_zero_becomes_one() {
        let q = BlogQuery::by_category("tech", PageRequest::new(0, 10));
        assert_eq!(get(&q.params(), "pagination[page]"), Some("1"));
    }

    #[test]
    fn search_query_ors_three_fields() {
        let q = BlogQuery::search("rust & wasm", PageRequest::default());
        assert_eq!(
            q.query_string(),
            "filters[$or][0][title][$containsi]=rust%20%26%20wasm\
             &filters[$or][1][excerpt][$containsi]=rust%20%26%20wasm\
             &filters[$or][2][content][$containsi]=rust%20%26%20wasm\
             &pagination[page]=1&pagination[pageSize]=10&sort=published_at:desc\
             &populate=featured_image,category,author"
        );
    }

    #[test]
    fn search_encoding_is_idempotent() {
        let a = BlogQuery::search("C++ / café?", PageRequest::new(2, 5)).query_string();
        let b = BlogQuery::search("C++ / café?", PageRequest::new(2, 5)).query_string();
        assert_eq!(a, b);
        assert!(a.contains("C%2B%2B%20%2F%20caf%C3%A9%3F"));
    }

    #[test]
    fn blank_search_becomes_listing() {
        let q = BlogQuery::search("   ", PageRequest::default());
        assert!(matches!(q, BlogQuery::List { .. }));
    }

    #[test]
    fn category_and_tag_queries_sort_by_name() {
        assert_eq!(CategoryQuery::All.query_string(), "sort=name:asc");
        assert_eq!(CategoryQuery::All.collection(), "categories");
        assert_eq!(
            CategoryQuery::BySlug("tech".into()).query_string(),
            "filters[slug][$eq]=tech"
        );
        assert_eq!(TagsQuery.query_string(), "sort=name:asc");
        assert_eq!(TagsQuery.collection(), "tags");
    }
}
