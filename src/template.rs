// ABOUTME: HTML document assembly for the big-deck application
// ABOUTME: Stitches title, stylesheets, scripts and slide fragments into one page

use crate::assets::Theme;

/// Everything that goes into the final page, in output order.
#[derive(Debug, Clone, Default)]
pub struct Document<'a> {
    pub title: &'a str,
    pub theme: Theme,
    /// Raw CSS, each wrapped in its own `<style>` element
    pub styles: Vec<&'a str>,
    /// Tags appended to `<head>` after the styles
    pub head_tags: Vec<String>,
    /// Rendered slide `<div>`s
    pub slides: Vec<String>,
    /// Tags appended to `<body>` after the slides
    pub body_tags: Vec<String>,
}

/// Render the complete HTML document.
pub fn assemble_document(doc: &Document<'_>) -> String {
    let mut html = String::from("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("  <meta charset=\"utf-8\">\n");
    html.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=0\" />\n");
    html.push_str(&format!("  <title>{}</title>\n", escape_html(doc.title)));

    for css in &doc.styles {
        html.push_str("  <style>\n");
        html.push_str(css);
        html.push_str("\n  </style>\n");
    }

    for tag in &doc.head_tags {
        html.push_str("  ");
        html.push_str(tag);
        html.push('\n');
    }

    html.push_str(&format!("</head>\n<body class=\"{}\">\n", doc.theme.as_str()));

    for slide in &doc.slides {
        html.push_str(slide);
        html.push('\n');
    }

    for tag in &doc.body_tags {
        html.push_str(tag);
        html.push('\n');
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Escape text for use inside HTML elements and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_layout() {
        let doc = Document {
            title: "Talk <1>",
            theme: Theme::Light,
            styles: vec!["body { color: red; }"],
            head_tags: vec!["<script>BIG_ASPECT_RATIO = 2;</script>".to_string()],
            slides: vec!["<div>one</div>".to_string(), "<div>two</div>".to_string()],
            body_tags: vec!["<script>reload()</script>".to_string()],
        };
        let html = assemble_document(&doc);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Talk &lt;1&gt;</title>"));
        assert!(html.contains("<style>\nbody { color: red; }\n  </style>"));
        assert!(html.contains("<body class=\"light\">"));
        assert!(html.find("<div>one</div>").unwrap() < html.find("<div>two</div>").unwrap());
        assert!(html.find("BIG_ASPECT_RATIO").unwrap() < html.find("</head>").unwrap());
        assert!(html.find("reload()").unwrap() > html.find("<div>two</div>").unwrap());
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }
}
