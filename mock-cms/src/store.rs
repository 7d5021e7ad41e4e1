use serde_json::{json, Map, Value};

#[derive(Clone, Debug)]
pub struct MediaRecord {
    pub id: u64,
    pub url: String,
    pub alternative_text: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AuthorRecord {
    pub id: u64,
    pub username: String,
}

#[derive(Clone, Debug)]
pub struct CategoryRecord {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub color: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug)]
pub struct TagRecord {
    pub id: u64,
    pub name: String,
    pub slug: String,
}

#[derive(Clone, Debug)]
pub struct BlogRecord {
    pub id: u64,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    /// RFC 3339, compared lexically when sorting.
    pub published_at: String,
    pub reading_time: Option<u32>,
    pub is_featured: bool,
    pub featured_image: Option<MediaRecord>,
    pub gallery: Vec<MediaRecord>,
    pub category: Option<u64>,
    pub tags: Vec<u64>,
    pub author: Option<AuthorRecord>,
}

/// In-memory content, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct Store {
    pub blogs: Vec<BlogRecord>,
    pub categories: Vec<CategoryRecord>,
    pub tags: Vec<TagRecord>,
}

impl Store {
    pub fn category(&self, id: u64) -> Option<&CategoryRecord> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn tag(&self, id: u64) -> Option<&TagRecord> {
        self.tags.iter().find(|t| t.id == id)
    }

    /// `{id, attributes}` for a post, with only the requested relations inlined.
    pub fn blog_entity(&self, blog: &BlogRecord, populate: &[&str]) -> Value {
        let mut attrs = Map::new();
        attrs.insert("title".into(), json!(blog.title));
        attrs.insert("slug".into(), json!(blog.slug));
        attrs.insert("excerpt".into(), json!(blog.excerpt));
        attrs.insert("content".into(), json!(blog.content));
        attrs.insert("published_at".into(), json!(blog.published_at));
        attrs.insert("reading_time".into(), json!(blog.reading_time));
        attrs.insert("is_featured".into(), json!(blog.is_featured));

        for relation in populate {
            let value = match *relation {
                "featured_image" => relation_one(blog.featured_image.as_ref().map(media_entity)),
                "gallery" => relation_many(blog.gallery.iter().map(media_entity).collect()),
                "category" => relation_one(
                    blog.category
                        .and_then(|id| self.category(id))
                        .map(category_entity),
                ),
                "tags" => relation_many(
                    blog.tags
                        .iter()
                        .filter_map(|id| self.tag(*id))
                        .map(tag_entity)
                        .collect(),
                ),
                "author" => relation_one(blog.author.as_ref().map(|a| {
                    json!({ "id": a.id, "attributes": { "username": a.username } })
                })),
                _ => continue,
            };
            attrs.insert((*relation).to_string(), value);
        }

        json!({ "id": blog.id, "attributes": Value::Object(attrs) })
    }
}

fn relation_one(entity: Option<Value>) -> Value {
    json!({ "data": entity })
}

fn relation_many(entities: Vec<Value>) -> Value {
    json!({ "data": entities })
}

fn media_entity(media: &MediaRecord) -> Value {
    json!({
        "id": media.id,
        "attributes": {
            "url": media.url,
            "alternativeText": media.alternative_text,
        }
    })
}

pub fn category_entity(category: &CategoryRecord) -> Value {
    json!({
        "id": category.id,
        "attributes": {
            "name": category.name,
            "slug": category.slug,
            "color": category.color,
            "description": category.description,
        }
    })
}

pub fn tag_entity(tag: &TagRecord) -> Value {
    json!({ "id": tag.id, "attributes": { "name": tag.name, "slug": tag.slug } })
}

/// Fixture content used by `app()` and the integration tests.
///
/// Two posts share a timestamp so tie ordering can be checked.
pub fn seed() -> Store {
    let editor = AuthorRecord {
        id: 1,
        username: "editor".to_string(),
    };
    let media = |id: u64, url: &str, alt: Option<&str>| MediaRecord {
        id,
        url: url.to_string(),
        alternative_text: alt.map(str::to_string),
    };

    Store {
        categories: vec![
            CategoryRecord {
                id: 1,
                name: "Tech".to_string(),
                slug: "tech".to_string(),
                color: Some("#3b82f6".to_string()),
                description: Some("Engineering notes".to_string()),
            },
            CategoryRecord {
                id: 2,
                name: "Design".to_string(),
                slug: "design".to_string(),
                color: Some("#ec4899".to_string()),
                description: None,
            },
        ],
        tags: vec![
            TagRecord {
                id: 1,
                name: "Rust".to_string(),
                slug: "rust".to_string(),
            },
            TagRecord {
                id: 2,
                name: "Web".to_string(),
                slug: "web".to_string(),
            },
        ],
        blogs: vec![
            BlogRecord {
                id: 1,
                title: "Hello World".to_string(),
                slug: "hello-world".to_string(),
                excerpt: Some("The first post on the blog.".to_string()),
                content: "# Hello\n\nWelcome to the **weekly** blog.".to_string(),
                published_at: "2024-03-01T09:00:00.000Z".to_string(),
                reading_time: Some(3),
                is_featured: true,
                featured_image: Some(media(10, "/uploads/hello.png", Some("Hello cover"))),
                gallery: vec![
                    media(11, "/uploads/gallery-1.png", None),
                    media(12, "https://res.cloudinary.com/demo/image/upload/gallery-2.png", None),
                ],
                category: Some(1),
                tags: vec![1],
                author: Some(editor.clone()),
            },
            BlogRecord {
                id: 2,
                title: "Designing for Readers".to_string(),
                slug: "designing-for-readers".to_string(),
                excerpt: Some("Typography choices that help.".to_string()),
                content: "Line length matters.".to_string(),
                published_at: "2024-02-15T09:00:00.000Z".to_string(),
                reading_time: Some(5),
                is_featured: true,
                featured_image: Some(media(
                    20,
                    "https://res.cloudinary.com/demo/image/upload/readers.jpg",
                    None,
                )),
                gallery: Vec::new(),
                category: Some(2),
                tags: vec![2],
                author: Some(editor.clone()),
            },
            BlogRecord {
                id: 3,
                title: "Async Rust in Practice".to_string(),
                slug: "async-rust-in-practice".to_string(),
                excerpt: None,
                content: "Spawning blocking work onto Tokio's pool.".to_string(),
                published_at: "2024-02-01T09:00:00.000Z".to_string(),
                reading_time: Some(8),
                is_featured: false,
                featured_image: None,
                gallery: Vec::new(),
                category: Some(1),
                tags: vec![1, 2],
                author: Some(editor),
            },
            BlogRecord {
                id: 4,
                title: "Uncategorized Notes".to_string(),
                slug: "uncategorized-notes".to_string(),
                excerpt: Some("Loose ends.".to_string()),
                content: "Nothing to see here.".to_string(),
                published_at: "2024-01-10T09:00:00.000Z".to_string(),
                reading_time: None,
                is_featured: false,
                featured_image: None,
                gallery: Vec::new(),
                category: None,
                tags: Vec::new(),
                author: None,
            },
            BlogRecord {
                id: 5,
                title: "Weekly Roundup".to_string(),
                slug: "weekly-roundup".to_string(),
                excerpt: Some("Links from the week.".to_string()),
                content: "A few links about rust and the web.".to_string(),
                published_at: "2024-01-10T09:00:00.000Z".to_string(),
                reading_time: Some(2),
                is_featured: false,
                featured_image: None,
                gallery: Vec::new(),
                category: Some(1),
                tags: Vec::new(),
                author: None,
            },
        ],
    }
}
