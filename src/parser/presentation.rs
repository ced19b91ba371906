// ABOUTME: Presentation-level metadata extraction for the big-deck parser
// ABOUTME: Reads either a presentation comment block or a DeckSet key/value header

use crate::parser::extract::{parse_yaml, synthesize_yaml, MetadataWarning, WarningSource};
use crate::parser::patterns::Patterns;
use crate::parser::slide::PresentationMetadata;
use crate::parser::split::is_delimiter_line;

/// Result of presentation-level extraction.
#[derive(Debug, Clone, Default)]
pub struct PresentationExtraction {
    /// Document text with the configuration removed
    pub content: String,
    pub metadata: PresentationMetadata,
    pub warning: Option<MetadataWarning>,
}

/// Pull document-wide configuration out of the raw document.
///
/// A leading `<!-- presentation ... -->` block takes precedence; only when it
/// is absent is the DeckSet `key: value` header considered.
pub fn extract_presentation_config(patterns: &Patterns, content: &str) -> PresentationExtraction {
    if let Some(extraction) = extract_presentation_frontmatter(patterns, content) {
        return extraction;
    }
    extract_global_config(patterns, content)
}

fn extract_presentation_frontmatter(
    patterns: &Patterns,
    content: &str,
) -> Option<PresentationExtraction> {
    let caps = patterns.presentation_frontmatter.captures(content)?;
    let (metadata, warning) = match parse_yaml::<PresentationMetadata>(&caps[1]) {
        Ok(metadata) => (metadata, None),
        Err(message) => (
            PresentationMetadata::default(),
            Some(MetadataWarning::new(
                WarningSource::PresentationFrontmatter,
                message,
            )),
        ),
    };

    Some(PresentationExtraction {
        content: patterns
            .presentation_frontmatter
            .replace(content, "")
            .into_owned(),
        metadata,
        warning,
    })
}

fn extract_global_config(patterns: &Patterns, content: &str) -> PresentationExtraction {
    let lines: Vec<&str> = content.lines().collect();
    let mut pairs = Vec::new();

    // Consecutive key: value lines from the very first line
    for line in &lines {
        if line.trim().is_empty() || is_delimiter_line(line) {
            break;
        }
        match patterns.global_config_line.captures(line.trim()) {
            Some(caps) => pairs.push((caps[1].to_string(), caps[2].to_string())),
            None => break,
        }
    }

    if pairs.is_empty() {
        return PresentationExtraction {
            content: content.to_string(),
            ..Default::default()
        };
    }

    let (metadata, warning) = match parse_yaml::<PresentationMetadata>(&synthesize_yaml(&pairs)) {
        Ok(metadata) => (metadata, None),
        Err(message) => (
            PresentationMetadata::default(),
            Some(MetadataWarning::new(WarningSource::GlobalConfig, message)),
        ),
    };

    PresentationExtraction {
        content: lines[pairs.len()..].join("\n"),
        metadata,
        warning,
    }
}
