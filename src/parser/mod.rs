// ABOUTME: Markdown-to-slides parser for the big-deck application
// ABOUTME: Orchestrates presentation extraction, splitting and per-slide assembly

pub mod extract;
pub mod patterns;
pub mod presentation;
pub mod slide;
pub mod split;

pub use extract::{MetadataWarning, WarningSource};
pub use patterns::Patterns;
pub use slide::{
    DisplaySettings, PresentationMetadata, Slide, SlideMetadata, ZeroTimeToNext,
};

use crate::errors::{DeckError, Result};
use log::{debug, info, warn};
use std::fs;
use std::path::Path;

/// Where a parser is in its single pass over a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    Empty,
    Splitting,
    Complete,
    Failed,
}

/// A fully parsed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    pub presentation: PresentationMetadata,
    pub slides: Vec<Slide>,
    /// Metadata blocks that were skipped because they did not parse
    pub warnings: Vec<MetadataWarning>,
}

/// Parses one Markdown document into slides.
///
/// A parser handles exactly one document; start a new one for the next.
#[derive(Debug)]
pub struct Parser<'p> {
    patterns: &'p Patterns,
    state: ParseState,
    slides: Vec<Slide>,
    presentation: PresentationMetadata,
    warnings: Vec<MetadataWarning>,
}

impl Parser<'static> {
    /// Create a parser using the process-wide pattern set.
    pub fn new() -> Self {
        Self::with_patterns(Patterns::shared())
    }
}

impl Default for Parser<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'p> Parser<'p> {
    pub fn with_patterns(patterns: &'p Patterns) -> Self {
        Self {
            patterns,
            state: ParseState::Empty,
            slides: Vec::new(),
            presentation: PresentationMetadata::default(),
            warnings: Vec::new(),
        }
    }

    /// Read and parse a markdown file.
    pub fn parse_file(&mut self, path: &Path) -> Result<()> {
        info!("Parsing markdown file: {:?}", path);

        if !path.exists() {
            self.state = ParseState::Failed;
            return Err(DeckError::PathNotFoundError(path.to_path_buf()));
        }

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.state = ParseState::Failed;
                return Err(DeckError::FileReadError(e));
            }
        };

        self.parse_str(&String::from_utf8_lossy(&bytes))
    }

    /// Parse markdown content from a string.
    pub fn parse_str(&mut self, content: &str) -> Result<()> {
        if self.state != ParseState::Empty {
            return Err(DeckError::ParserReused);
        }

        // Presentation-level configuration comes off before splitting
        let extraction = presentation::extract_presentation_config(self.patterns, content);
        self.presentation = extraction.metadata;
        if let Some(warning) = extraction.warning {
            self.record_warning(warning);
        }

        self.state = ParseState::Splitting;
        let blocks = split::split_slides(&extraction.content);
        debug!("Split document into {} raw blocks", blocks.len());

        for (index, block) in blocks.iter().enumerate() {
            let (slide, warnings) = extract::assemble_slide(self.patterns, block).finish();
            for mut warning in warnings {
                warning.block = Some(index + 1);
                self.record_warning(warning);
            }

            match slide {
                Some(slide) => self.slides.push(slide),
                None => debug!("Dropping block {} with no content", index + 1),
            }
        }

        if self.slides.is_empty() {
            self.state = ParseState::Failed;
            return Err(DeckError::NoSlidesError);
        }

        self.state = ParseState::Complete;
        info!("Parsed {} slides", self.slides.len());
        Ok(())
    }

    fn record_warning(&mut self, warning: MetadataWarning) {
        warn!("Warning: {}", warning);
        self.warnings.push(warning);
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn presentation_metadata(&self) -> &PresentationMetadata {
        &self.presentation
    }

    pub fn warnings(&self) -> &[MetadataWarning] {
        &self.warnings
    }

    /// Hand over the parsed document.
    pub fn into_deck(self) -> Deck {
        Deck {
            presentation: self.presentation,
            slides: self.slides,
            warnings: self.warnings,
        }
    }
}

/// Parse a document held in memory.
pub fn parse_document(content: &str) -> Result<Deck> {
    let mut parser = Parser::new();
    parser.parse_str(content)?;
    Ok(parser.into_deck())
}

/// Parse a markdown file from disk.
pub fn parse_markdown_file(path: &Path) -> Result<Deck> {
    let mut parser = Parser::new();
    parser.parse_file(path)?;
    Ok(parser.into_deck())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_new_parser_is_empty() {
        let parser = Parser::new();
        assert_eq!(parser.state(), ParseState::Empty);
        assert!(parser.slides().is_empty());
    }

    #[test]
    fn test_parse_two_slides() {
        let deck = parse_document("# A\n\nbody\n\n---\n\n# B").unwrap();
        assert_eq!(deck.slides.len(), 2);
        assert_eq!(deck.slides[0].content, "# A\n\nbody");
        assert_eq!(deck.slides[1].content, "# B");
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(matches!(parse_document(""), Err(DeckError::NoSlidesError)));
        assert!(matches!(
            parse_document("  \n\n---\n\n"),
            Err(DeckError::NoSlidesError)
        ));
    }

    #[test]
    fn test_failed_state_after_no_slides() {
        let mut parser = Parser::new();
        assert!(parser.parse_str("<!-- only a note -->").is_err());
        assert_eq!(parser.state(), ParseState::Failed);
    }

    #[test]
    fn test_parser_cannot_be_reused() {
        let mut parser = Parser::new();
        parser.parse_str("# One").unwrap();
        assert_eq!(parser.state(), ParseState::Complete);
        assert!(matches!(
            parser.parse_str("# Two"),
            Err(DeckError::ParserReused)
        ));
        assert_eq!(parser.slides().len(), 1);
    }

    #[test]
    fn test_inline_directive_scenario() {
        let deck = parse_document("[.layout: 50-50]\n# Title").unwrap();
        assert_eq!(deck.slides.len(), 1);
        assert_eq!(deck.slides[0].metadata.layout.as_deref(), Some("50-50"));
        assert_eq!(deck.slides[0].content, "# Title");
    }

    #[test]
    fn test_malformed_frontmatter_keeps_content() {
        let deck = parse_document("<!-- slide\nlayout: [unclosed\n-->\n# Title").unwrap();
        assert_eq!(deck.slides[0].content, "# Title");
        assert_eq!(deck.slides[0].metadata.layout, None);
        assert_eq!(deck.warnings.len(), 1);
        assert_eq!(deck.warnings[0].block, Some(1));
    }

    #[test]
    fn test_annotation_only_slide_is_dropped() {
        let deck = parse_document("# A\n---\n[.layout: 50-50]\n^ lonely note\n---\n# C").unwrap();
        assert_eq!(deck.slides.len(), 2);
        assert_eq!(deck.slides[1].content, "# C");
        assert_eq!(deck.slides[1].notes, "");
        assert!(deck.slides[1].metadata.is_empty());
    }

    #[test]
    fn test_presentation_metadata_and_slides() {
        let deck = parse_document(
            "<!-- presentation\ntitle: My Presentation\ntime-to-next: 5\n-->\n\n# First\n\n---\n\n# Second",
        )
        .unwrap();
        assert_eq!(deck.presentation.title, "My Presentation");
        assert_eq!(deck.presentation.time_to_next, 5);
        assert_eq!(deck.slides.len(), 2);
        assert_eq!(
            deck.slides[0]
                .metadata
                .effective_time_to_next(&deck.presentation, ZeroTimeToNext::Inherit),
            Some(5)
        );
    }

    #[test]
    fn test_parse_is_deterministic() {
        let input = "footer: Demo\n\n# A\n<!-- note -->\n---\n[.autoscale: true]\n# B\n^ aside";
        assert_eq!(parse_document(input).unwrap(), parse_document(input).unwrap());
    }

    #[test]
    fn test_parse_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(b"# From disk\n\n---\n\n# Second")
            .expect("Failed to write to temp file");

        let deck = parse_markdown_file(file.path()).unwrap();
        assert_eq!(deck.slides.len(), 2);
        assert_eq!(deck.slides[0].content, "# From disk");
    }

    #[test]
    fn test_parse_file_replaces_invalid_utf8() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(b"# A\xff\n---\n# B")
            .expect("Failed to write to temp file");

        let deck = parse_markdown_file(file.path()).unwrap();
        assert_eq!(deck.slides.len(), 2);
        assert_eq!(deck.slides[0].content, "# A\u{FFFD}");
        assert_eq!(deck.slides[1].content, "# B");
    }

    #[test]
    fn test_parse_missing_file() {
        let mut parser = Parser::new();
        let result = parser.parse_file(Path::new("/definitely/not/here.md"));
        assert!(matches!(result, Err(DeckError::PathNotFoundError(_))));
        assert_eq!(parser.state(), ParseState::Failed);
    }
}
