//! Plain-text rendering of the page view models.

use std::fmt::Write;

use blog_core::pages::{BlogIndexPage, CategoryPage, HomePage, IndexFilter};
use blog_core::{Article, Category, Pagination, Tag};

/// `March 1, 2024`, or an empty string for unpublished posts.
fn date(article: &Article) -> String {
    article
        .published_at
        .map(|t| t.format("%B %-d, %Y").to_string())
        .unwrap_or_default()
}

/// One line per post: title, slug, category and date.
pub fn card(article: &Article) -> String {
    let mut line = format!("{} ({})", article.title, article.slug);
    if let Some(category) = &article.category {
        let _ = write!(line, " [{}]", category.name);
    }
    let published = date(article);
    if !published.is_empty() {
        let _ = write!(line, " {published}");
    }
    line
}

fn cards(out: &mut String, heading: &str, posts: &[Article]) {
    let _ = writeln!(out, "{heading}");
    if posts.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for post in posts {
        let _ = writeln!(out, "  {}", card(post));
    }
}

fn pager(out: &mut String, pagination: &Pagination) {
    let _ = write!(out, "page {} of {}", pagination.page, pagination.page_count.max(1));
    let _ = write!(out, " ({} posts)", pagination.total);
    if pagination.has_previous() {
        let _ = write!(out, " <prev");
    }
    if pagination.has_next() {
        let _ = write!(out, " next>");
    }
    out.push('\n');
}

pub fn home(page: &HomePage) -> String {
    let mut out = String::new();
    cards(&mut out, "Featured", &page.featured);
    cards(&mut out, "Recent", &page.recent);
    out.push_str(&categories(&page.categories));
    out
}

pub fn index(page: &BlogIndexPage) -> String {
    let heading = match &page.filter {
        IndexFilter::All => "All posts".to_string(),
        IndexFilter::Category(slug) => format!("Posts in {slug}"),
        IndexFilter::Search(text) => format!("Search results for \"{text}\""),
    };
    let mut out = String::new();
    cards(&mut out, &heading, &page.posts.items);
    pager(&mut out, &page.posts.pagination);
    out
}

pub fn category(page: &CategoryPage) -> String {
    let mut out = String::new();
    match &page.category {
        Some(c) => {
            let _ = writeln!(out, "{}", c.name);
            if let Some(description) = &c.description {
                let _ = writeln!(out, "{description}");
            }
        }
        None => {
            let _ = writeln!(out, "Category not found");
            return out;
        }
    }
    cards(&mut out, "Posts", &page.posts.items);
    pager(&mut out, &page.posts.pagination);
    out
}

/// Header block followed by the rendered HTML body.
pub fn post(article: &Article) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", article.page_title());
    if let Some(description) = article.page_description() {
        let _ = writeln!(out, "{description}");
    }

    let mut byline = Vec::new();
    if let Some(author) = &article.author {
        byline.push(format!("by {}", author.username));
    }
    let published = date(article);
    if !published.is_empty() {
        byline.push(published);
    }
    if let Some(minutes) = article.reading_time {
        byline.push(format!("{minutes} min read"));
    }
    if !byline.is_empty() {
        let _ = writeln!(out, "{}", byline.join(" · "));
    }
    if let Some(category) = &article.category {
        let _ = writeln!(out, "category: {}", category.name);
    }
    if !article.tags.is_empty() {
        let names: Vec<&str> = article.tags.iter().map(|t| t.name.as_str()).collect();
        let _ = writeln!(out, "tags: {}", names.join(", "));
    }
    if let Some(image) = &article.image {
        let _ = writeln!(out, "image: {}", image.url);
    }
    for media in &article.gallery {
        let _ = writeln!(out, "gallery: {}", media.url);
    }
    out.push('\n');
    out.push_str(&article.body_html());
    out
}

pub fn categories(categories: &[Category]) -> String {
    let mut out = String::from("Categories\n");
    for c in categories {
        let _ = write!(out, "  {} ({})", c.name, c.slug);
        if let Some(color) = &c.color {
            let _ = write!(out, " {color}");
        }
        out.push('\n');
    }
    out
}

pub fn tags(tags: &[Tag]) -> String {
    tags.iter().map(|t| format!("{} ({})\n", t.name, t.slug)).collect()
}

pub fn paths(slugs: &[String]) -> String {
    slugs.iter().map(|s| format!("/blog/{s}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::{Author, Media, PageResult};
    use chrono::{TimeZone, Utc};

    fn article() -> Article {
        Article {
            id: 1,
            title: "Hello World".into(),
            slug: "hello-world".into(),
            excerpt: Some("The first post.".into()),
            body: "Some *text*.".into(),
            published_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()),
            reading_time: Some(3),
            is_featured: true,
            meta_title: None,
            meta_description: None,
            category: Some(Category {
                id: 1,
                name: "Tech".into(),
                slug: "tech".into(),
                color: Some("#3b82f6".into()),
                description: None,
            }),
            tags: vec![Tag {
                id: 1,
                name: "Rust".into(),
                slug: "rust".into(),
            }],
            author: Some(Author {
                id: 1,
                username: "editor".into(),
            }),
            image: Some(Media {
                id: Some(10),
                url: "http://localhost:1337/uploads/hello.png".into(),
                alt: None,
            }),
            gallery: Vec::new(),
        }
    }

    #[test]
    fn card_shows_category_and_date() {
        assert_eq!(card(&article()), "Hello World (hello-world) [Tech] March 1, 2024");
    }

    #[test]
    fn card_without_optional_fields() {
        let mut a = article();
        a.category = None;
        a.published_at = None;
        assert_eq!(card(&a), "Hello World (hello-world)");
    }

    #[test]
    fn post_renders_header_and_html() {
        let out = post(&article());
        assert!(out.starts_with("Hello World\nThe first post.\n"));
        assert!(out.contains("by editor · March 1, 2024 · 3 min read"));
        assert!(out.contains("tags: Rust"));
        assert!(out.contains("image: http://localhost:1337/uploads/hello.png"));
        assert!(out.contains("<em>text</em>"));
    }

    #[test]
    fn index_heading_follows_filter() {
        let page = BlogIndexPage {
            filter: IndexFilter::Search("rust".into()),
            posts: PageResult::empty(),
            categories: Vec::new(),
        };
        let out = index(&page);
        assert!(out.starts_with("Search results for \"rust\"\n  (none)\n"));
        assert!(out.contains("page 1 of 1 (0 posts)"));
    }

    #[test]
    fn missing_category_is_not_found() {
        let page = CategoryPage {
            category: None,
            posts: PageResult::empty(),
        };
        assert_eq!(category(&page), "Category not found\n");
    }

    #[test]
    fn paths_are_blog_routes() {
        assert_eq!(paths(&["a".into(), "b".into()]), "/blog/a\n/blog/b\n");
    }
}
