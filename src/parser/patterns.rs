// ABOUTME: Compiled regular expressions used by the slide parser
// ABOUTME: Built once per process and handed to parsers by reference

use once_cell::sync::Lazy;
use regex::Regex;

static SHARED: Lazy<Patterns> = Lazy::new(Patterns::new);

/// The immutable set of patterns that recognise annotations in a document.
#[derive(Debug, Clone)]
pub struct Patterns {
    /// `<!-- presentation ... -->` at the very start of the document
    pub presentation_frontmatter: Regex,
    /// `<!-- slide ... -->` anywhere in a slide
    pub slide_frontmatter: Regex,
    /// Any HTML comment
    pub html_comment: Regex,
    /// `[.key: value]` on its own line
    pub directive: Regex,
    /// `key: value` line of the top-of-file config block
    pub global_config_line: Regex,
    /// `^ note` line
    pub line_note: Regex,
    /// `![modifiers](path)` image reference
    pub image: Regex,
}

impl Patterns {
    /// Compile the pattern set.
    ///
    /// All patterns are literals, so compilation cannot fail at runtime.
    pub fn new() -> Self {
        Self {
            presentation_frontmatter: compile(r"(?s)\A\s*<!--\s*presentation\s+(.*?)\s*-->"),
            slide_frontmatter: compile(r"(?s)<!--\s*slide\s+(.*?)\s*-->"),
            html_comment: compile(r"(?s)<!--(.*?)-->"),
            directive: compile(r"(?m)^[ \t]*\[\.([\w-]+):[ \t]*([^\]\n]+)\][ \t]*$"),
            global_config_line: compile(r"^([\w-]+):\s*(.+?)\s*$"),
            line_note: compile(r"(?m)^\^(.*)$"),
            image: compile(r"!\[([^\]]*)\]\(([^)]+)\)"),
        }
    }

    /// Process-wide instance, compiled on first use.
    pub fn shared() -> &'static Patterns {
        &SHARED
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Self::new()
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern must compile")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_pattern_requires_whole_line() {
        let patterns = Patterns::shared();
        assert!(patterns.directive.is_match("[.layout: 50-50]"));
        assert!(patterns.directive.is_match("  [.time-to-next: 5]  "));
        assert!(!patterns.directive.is_match("text [.layout: 50-50]"));
        assert!(!patterns.directive.is_match("[.layout]"));
    }

    #[test]
    fn test_presentation_frontmatter_anchored_at_start() {
        let patterns = Patterns::shared();
        assert!(patterns
            .presentation_frontmatter
            .is_match("\n<!-- presentation\ntitle: x\n-->"));
        assert!(!patterns
            .presentation_frontmatter
            .is_match("# Slide\n<!-- presentation\ntitle: x\n-->"));
    }

    #[test]
    fn test_slide_frontmatter_needs_word_boundary() {
        let patterns = Patterns::shared();
        assert!(patterns.slide_frontmatter.is_match("<!-- slide\nlayout: 50-50\n-->"));
        assert!(!patterns.slide_frontmatter.is_match("<!-- slides are fun -->"));
    }
}
