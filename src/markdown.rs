//! Converts Markdown to HTML with [`pulldown_cmark`].

use pulldown_cmark::{html, Options, Parser};

/// Converts `markdown` to HTML, appending the result to `out`. Fenced code
/// blocks are CommonMark; footnotes, strikethrough, tables and task lists are
/// enabled on top of it.
pub fn push_html(out: &mut String, markdown: &str) {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    html::push_html(out, Parser::new_ext(markdown, options));
}

/// Converts `markdown` to a new HTML string.
pub fn to_html(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    push_html(&mut out, markdown);
    out
}
