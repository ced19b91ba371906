// ABOUTME: Per-slide directive extractors for the big-deck parser
// ABOUTME: Strips frontmatter, directives, image modifiers and notes from slide text

use crate::parser::patterns::Patterns;
use crate::parser::slide::{Slide, SlideMetadata};
use regex::Captures;
use serde::de::DeserializeOwned;
use std::fmt;

/// Layout used when an image is pushed to one side of the slide.
pub const SIDE_IMAGE_LAYOUT: &str = "50-50";

/// Where a recoverable metadata problem was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSource {
    PresentationFrontmatter,
    GlobalConfig,
    SlideFrontmatter,
    Directives,
}

impl fmt::Display for WarningSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WarningSource::PresentationFrontmatter => "presentation metadata",
            WarningSource::GlobalConfig => "global config",
            WarningSource::SlideFrontmatter => "slide metadata",
            WarningSource::Directives => "slide directives",
        };
        f.write_str(name)
    }
}

/// A metadata block that could not be parsed. Parsing carries on without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataWarning {
    pub source: WarningSource,
    /// 1-based index of the raw block, for per-slide sources
    pub block: Option<usize>,
    pub message: String,
}

impl MetadataWarning {
    pub fn new(source: WarningSource, message: impl Into<String>) -> Self {
        Self {
            source,
            block: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for MetadataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.block {
            Some(block) => write!(
                f,
                "failed to parse {} in block {}: {}",
                self.source, block, self.message
            ),
            None => write!(f, "failed to parse {}: {}", self.source, self.message),
        }
    }
}

/// A slide being assembled from one raw block.
#[derive(Debug, Clone, Default)]
pub struct SlideDraft {
    pub content: String,
    pub metadata: SlideMetadata,
    pub notes: String,
    pub warnings: Vec<MetadataWarning>,
}

impl SlideDraft {
    pub fn new(block: &str) -> Self {
        Self {
            content: block.to_string(),
            ..Default::default()
        }
    }

    /// Append notes, newline-separated from whatever is already there.
    fn append_notes(&mut self, notes: Vec<String>) {
        if notes.is_empty() {
            return;
        }
        if !self.notes.is_empty() {
            self.notes.push('\n');
        }
        self.notes.push_str(&notes.join("\n"));
    }

    /// Freeze the draft. Returns `None` when nothing but annotations was left.
    pub fn finish(self) -> (Option<Slide>, Vec<MetadataWarning>) {
        let content = self.content.trim().to_string();
        let slide = if content.is_empty() {
            None
        } else {
            Some(Slide {
                metadata: self.metadata,
                content,
                notes: self.notes,
            })
        };
        (slide, self.warnings)
    }
}

/// One step of the slide pipeline.
pub type Extractor = fn(&Patterns, SlideDraft) -> SlideDraft;

/// The extractors, in the order they must run.
pub const PIPELINE: [Extractor; 5] = [
    extract_frontmatter,
    extract_directives,
    process_image_modifiers,
    extract_comment_notes,
    extract_line_notes,
];

/// Run the whole pipeline over one raw block.
pub fn assemble_slide(patterns: &Patterns, block: &str) -> SlideDraft {
    PIPELINE
        .iter()
        .fold(SlideDraft::new(block), |draft, extract| extract(patterns, draft))
}

/// Parse `<!-- slide ... -->` YAML into the slide metadata.
///
/// The first such comment is parsed. Every one of them is removed, even when
/// its YAML is malformed.
pub fn extract_frontmatter(patterns: &Patterns, mut draft: SlideDraft) -> SlideDraft {
    let yaml = match patterns.slide_frontmatter.captures(&draft.content) {
        Some(caps) => caps[1].to_string(),
        None => return draft,
    };

    match parse_yaml::<SlideMetadata>(&yaml) {
        Ok(metadata) => draft.metadata.merge(metadata),
        Err(message) => draft
            .warnings
            .push(MetadataWarning::new(WarningSource::SlideFrontmatter, message)),
    }

    let extra = patterns.slide_frontmatter.find_iter(&draft.content).count() - 1;
    if extra > 0 {
        draft.warnings.push(MetadataWarning::new(
            WarningSource::SlideFrontmatter,
            format!("ignored {} additional slide frontmatter block(s)", extra),
        ));
    }

    draft.content = patterns
        .slide_frontmatter
        .replace_all(&draft.content, "")
        .into_owned();
    draft
}

/// Merge `[.key: value]` lines into the slide metadata.
///
/// Later keys overwrite earlier ones; every directive line is removed.
pub fn extract_directives(patterns: &Patterns, mut draft: SlideDraft) -> SlideDraft {
    let pairs: Vec<(String, String)> = patterns
        .directive
        .captures_iter(&draft.content)
        .map(|caps| (caps[1].trim().to_string(), caps[2].trim().to_string()))
        .collect();

    if pairs.is_empty() {
        return draft;
    }

    match parse_yaml::<SlideMetadata>(&synthesize_yaml(&pairs)) {
        Ok(metadata) => draft.metadata.merge(metadata),
        Err(message) => draft
            .warnings
            .push(MetadataWarning::new(WarningSource::Directives, message)),
    }

    draft.content = patterns.directive.replace_all(&draft.content, "").into_owned();
    draft
}

/// Handle DeckSet image modifiers such as `![left fit](img.png)`.
///
/// A `left` or `right` modifier picks a two-column layout unless a layout was
/// already chosen. Modifier text is always stripped from the alt text.
pub fn process_image_modifiers(patterns: &Patterns, mut draft: SlideDraft) -> SlideDraft {
    if !patterns.image.is_match(&draft.content) {
        return draft;
    }

    let wants_side_layout = patterns.image.captures_iter(&draft.content).any(|caps| {
        let modifiers = caps[1].to_lowercase();
        modifiers.contains("left") || modifiers.contains("right")
    });

    if wants_side_layout && draft.metadata.layout.is_none() {
        draft.metadata.layout = Some(SIDE_IMAGE_LAYOUT.to_string());
    }

    draft.content = patterns
        .image
        .replace_all(&draft.content, |caps: &Captures| format!("![]({})", &caps[2]))
        .into_owned();
    draft
}

/// Turn every remaining HTML comment into a speaker note.
pub fn extract_comment_notes(patterns: &Patterns, mut draft: SlideDraft) -> SlideDraft {
    let notes = collect_notes(patterns.html_comment.captures_iter(&draft.content));
    draft.append_notes(notes);
    draft.content = patterns
        .html_comment
        .replace_all(&draft.content, "")
        .into_owned();
    draft
}

/// Turn every `^ text` line into a speaker note.
pub fn extract_line_notes(patterns: &Patterns, mut draft: SlideDraft) -> SlideDraft {
    let notes = collect_notes(patterns.line_note.captures_iter(&draft.content));
    draft.append_notes(notes);
    draft.content = patterns.line_note.replace_all(&draft.content, "").into_owned();
    draft
}

fn collect_notes<'t>(captures: impl Iterator<Item = Captures<'t>>) -> Vec<String> {
    captures
        .map(|caps| caps[1].trim().to_string())
        .filter(|note| !note.is_empty())
        .collect()
}

/// Deserialize a YAML snippet, mapping failures to a warning message.
///
/// Blank snippets yield the type's default.
pub(crate) fn parse_yaml<T: DeserializeOwned + Default>(yaml: &str) -> Result<T, String> {
    if yaml.trim().is_empty() {
        return Ok(T::default());
    }
    serde_yaml::from_str(yaml).map_err(|e| e.to_string())
}

/// Build a flat YAML mapping from `key: value` pairs.
///
/// Duplicate keys keep their first position and their last value. Values
/// that YAML would not read back as a plain scalar are single-quoted.
pub(crate) fn synthesize_yaml(pairs: &[(String, String)]) -> String {
    let mut entries: Vec<(&str, &str)> = Vec::with_capacity(pairs.len());
    for (key, value) in pairs {
        match entries.iter_mut().find(|(k, _)| *k == key.as_str()) {
            Some(entry) => entry.1 = value.as_str(),
            None => entries.push((key.as_str(), value.as_str())),
        }
    }

    let mut yaml = String::new();
    for (key, value) in entries {
        yaml.push_str(key);
        yaml.push_str(": ");
        yaml.push_str(&yaml_scalar(value));
        yaml.push('\n');
    }
    yaml
}

fn yaml_scalar(value: &str) -> String {
    match serde_yaml::from_str::<serde_yaml::Value>(value) {
        Ok(serde_yaml::Value::Bool(_)) | Ok(serde_yaml::Value::Number(_)) => value.to_string(),
        Ok(serde_yaml::Value::String(s)) if s == value => value.to_string(),
        _ => format!("'{}'", value.replace('\'', "''")),
    }
}
