// ABOUTME: Markdown rendering for the big-deck application
// ABOUTME: Wraps comrak behind a small trait so the generator can swap renderers

use comrak::{markdown_to_html, ComrakOptions};

/// Turns a block of markdown into an HTML fragment.
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> String;
}

/// GitHub-flavoured markdown via comrak, with raw HTML allowed.
pub struct ComrakRenderer {
    options: ComrakOptions,
}

impl ComrakRenderer {
    pub fn new() -> Self {
        let mut options = ComrakOptions::default();
        options.extension.table = true;
        options.extension.strikethrough = true;
        options.extension.tasklist = true;
        options.extension.autolink = true;
        options.extension.header_ids = Some(String::new());
        options.render.unsafe_ = true; // Allow raw HTML
        Self { options }
    }
}

impl Default for ComrakRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer for ComrakRenderer {
    fn render(&self, markdown: &str) -> String {
        markdown_to_html(markdown, &self.options).trim().to_string()
    }
}
