//! Markdown to Confluence storage format conversion.
//!
//! Standard markdown is rendered to XHTML with `pulldown-cmark`. Local images
//! become attachment image macros, referencing the attachment by file name:
//!
//! ```text
//! ![Flow](img/flow.png)
//! ```
//!
//! renders as
//!
//! ```text
//! <ac:image ac:align="center" ac:layout="center" ac:alt="Flow"><ri:attachment ri:filename="flow.png" /></ac:image>
//! ```

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};

/// Parser options for page bodies.
fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Render markdown to Confluence storage format.
pub fn render_storage(markdown: &str) -> String {
    let events = AttachmentImages::new(Parser::new_ext(markdown, parser_options()));
    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, events);
    output
}

/// Whether an image source points outside the page folder.
fn is_remote(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://")
}

/// Last path component of an image source.
fn attachment_name(src: &str) -> &str {
    src.rsplit(['/', '\\']).next().unwrap_or(src)
}

/// Escape text for use inside an XML attribute.
fn escape_attr(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn image_macro(filename: &str, alt: &str) -> String {
    format!(
        r#"<ac:image ac:align="center" ac:layout="center" ac:alt="{}"><ri:attachment ri:filename="{}" /></ac:image>"#,
        escape_attr(alt),
        escape_attr(filename)
    )
}

/// Event adapter that replaces local images with attachment macros.
///
/// Alt text arrives as events between the image start and end tags, so it is
/// collected while an image is pending and emitted with the end tag.
struct AttachmentImages<'a, I> {
    inner: I,
    pending: Option<(CowStr<'a>, String)>,
}

impl<'a, I> AttachmentImages<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    fn new(inner: I) -> Self {
        Self {
            inner,
            pending: None,
        }
    }
}

impl<'a, I> Iterator for AttachmentImages<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let event = self.inner.next()?;
            let Some((_, alt)) = self.pending.as_mut() else {
                match event {
                    Event::Start(Tag::Image { dest_url, .. }) if !is_remote(&dest_url) => {
                        self.pending = Some((dest_url, String::new()));
                        continue;
                    }
                    event => return Some(event),
                }
            };
            match event {
                Event::End(TagEnd::Image) => {
                    let (src, alt) = self.pending.take()?;
                    let html = image_macro(attachment_name(&src), &alt);
                    return Some(Event::InlineHtml(html.into()));
                }
                Event::Text(text) | Event::Code(text) => alt.push_str(&text),
                // Nested markup inside alt text contributes nothing
                _ => {}
            }
        }
    }
}
