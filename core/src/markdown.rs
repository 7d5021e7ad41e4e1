//! Markdown rendering for post bodies.

use pulldown_cmark::{html, Options, Parser};

/// Render CMS markdown to sanitized HTML.
///
/// GFM extensions are enabled. The output goes through ammonia, so raw HTML
/// embedded in a post cannot inject scripts into the page. Task-list
/// checkboxes are the one `<input>` shape allowed through.
pub fn render_markdown(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM;
    let parser = Parser::new_ext(markdown, options);

    let mut unsafe_html = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut unsafe_html, parser);
    let mut sanitizer = ammonia::Builder::default();
    sanitizer
        .add_tags(&["input"])
        .add_tag_attributes("input", &["type", "checked", "disabled"])
        .attribute_filter(|element, attribute, value| match (element, attribute) {
            ("input", "type") if value != "checkbox" => None,
            _ => Some(value.into()),
        });
    sanitizer.clean(&unsafe_html).to_string()
}
