// ABOUTME: Data model for parsed slides and presentation metadata
// ABOUTME: Handles per-slide overrides and inheritance from presentation defaults

use crate::errors::{DeckError, Result};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Per-slide configuration from frontmatter and inline directives.
///
/// Every field is optional so that "not set" can fall back to the
/// presentation-level value while "explicitly false" stays false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SlideMetadata {
    /// Named layout ("50-50", "grid-3x2", ...) or a raw CSS grid template
    pub layout: Option<String>,
    pub class: Option<String>,
    pub body_style: Option<String>,
    pub body_class: Option<String>,
    /// Auto-advance time in seconds
    pub time_to_next: Option<u32>,
    #[serde(deserialize_with = "flag")]
    pub autoscale: Option<bool>,
    #[serde(deserialize_with = "flag")]
    pub build_lists: Option<bool>,
    #[serde(rename = "slidenumbers", alias = "slide-numbers", deserialize_with = "flag")]
    pub slide_numbers: Option<bool>,
    pub footer: Option<String>,
    #[serde(deserialize_with = "flag")]
    pub hide_footer: Option<bool>,
    #[serde(alias = "transition")]
    pub slide_transition: Option<String>,
    pub background_color: Option<String>,
}

impl SlideMetadata {
    /// Overlay every field that is set in `other` onto `self`.
    pub fn merge(&mut self, other: SlideMetadata) {
        fn overlay<T>(target: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *target = value;
            }
        }

        overlay(&mut self.layout, other.layout);
        overlay(&mut self.class, other.class);
        overlay(&mut self.body_style, other.body_style);
        overlay(&mut self.body_class, other.body_class);
        overlay(&mut self.time_to_next, other.time_to_next);
        overlay(&mut self.autoscale, other.autoscale);
        overlay(&mut self.build_lists, other.build_lists);
        overlay(&mut self.slide_numbers, other.slide_numbers);
        overlay(&mut self.footer, other.footer);
        overlay(&mut self.hide_footer, other.hide_footer);
        overlay(&mut self.slide_transition, other.slide_transition);
        overlay(&mut self.background_color, other.background_color);
    }

    /// True when no field has been set.
    pub fn is_empty(&self) -> bool {
        *self == SlideMetadata::default()
    }

    /// Auto-advance seconds after applying presentation defaults.
    ///
    /// Returns `None` when the slide should not advance on its own.
    pub fn effective_time_to_next(
        &self,
        presentation: &PresentationMetadata,
        zero: ZeroTimeToNext,
    ) -> Option<u32> {
        let inherited = Some(presentation.time_to_next).filter(|&secs| secs > 0);
        match self.time_to_next {
            Some(secs) if secs > 0 => Some(secs),
            Some(_) => match zero {
                ZeroTimeToNext::Inherit => inherited,
                ZeroTimeToNext::Disable => None,
            },
            None => inherited,
        }
    }

    /// Resolve the display flags against the presentation defaults.
    pub fn resolve_display(&self, presentation: &PresentationMetadata) -> DisplaySettings {
        let non_empty = |s: &str| Some(s.to_string()).filter(|s| !s.is_empty());

        let footer = if self.hide_footer.unwrap_or(false) {
            None
        } else {
            self.footer
                .clone()
                .or_else(|| non_empty(presentation.footer.as_str()))
                .filter(|f| !f.is_empty())
        };

        DisplaySettings {
            autoscale: self.autoscale.unwrap_or(presentation.autoscale),
            build_lists: self.build_lists.unwrap_or(presentation.build_lists),
            slide_numbers: self.slide_numbers.unwrap_or(presentation.slide_numbers),
            footer,
            transition: self
                .slide_transition
                .clone()
                .or_else(|| non_empty(presentation.slide_transition.as_str())),
            background_color: self
                .background_color
                .clone()
                .or_else(|| non_empty(presentation.background_color.as_str())),
        }
    }
}

/// Document-wide defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PresentationMetadata {
    pub title: String,
    /// Default auto-advance time in seconds, 0 for none
    pub time_to_next: u32,
    #[serde(deserialize_with = "flag_or_false")]
    pub autoscale: bool,
    #[serde(deserialize_with = "flag_or_false")]
    pub build_lists: bool,
    #[serde(
        rename = "slidenumbers",
        alias = "slide-numbers",
        deserialize_with = "flag_or_false"
    )]
    pub slide_numbers: bool,
    pub footer: String,
    #[serde(alias = "transition")]
    pub slide_transition: String,
    pub background_color: String,
}

/// Boolean field that also takes the YAML 1.1 words `yes`/`no`/`on`/`off`.
fn flag<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Word(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Bool(value)) => Ok(Some(value)),
        Some(Raw::Word(word)) => match word.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "on" => Ok(Some(true)),
            "false" | "no" | "n" | "off" => Ok(Some(false)),
            _ => Err(de::Error::custom(format!(
                "invalid boolean '{}', expected true/false, yes/no or on/off",
                word
            ))),
        },
    }
}

fn flag_or_false<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    flag(deserializer).map(Option::unwrap_or_default)
}

/// Display flags of one slide after inheritance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplaySettings {
    pub autoscale: bool,
    pub build_lists: bool,
    pub slide_numbers: bool,
    pub footer: Option<String>,
    pub transition: Option<String>,
    pub background_color: Option<String>,
}

/// What an explicit `time-to-next: 0` on a slide means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ZeroTimeToNext {
    /// Treat zero as unset and use the presentation default
    #[default]
    Inherit,
    /// Zero turns auto-advance off for that slide
    Disable,
}

impl ZeroTimeToNext {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZeroTimeToNext::Inherit => "inherit",
            ZeroTimeToNext::Disable => "disable",
        }
    }
}

impl FromStr for ZeroTimeToNext {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "inherit" => Ok(ZeroTimeToNext::Inherit),
            "disable" | "off" => Ok(ZeroTimeToNext::Disable),
            other => Err(DeckError::ConfigError(format!(
                "Unknown zero time-to-next policy '{}'. Use 'inherit' or 'disable'",
                other
            ))),
        }
    }
}

impl fmt::Display for ZeroTimeToNext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single slide of the presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slide {
    pub metadata: SlideMetadata,
    /// Markdown body with all annotations removed
    pub content: String,
    /// Speaker notes, one per line in extraction order
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn presentation_with_time(secs: u32) -> PresentationMetadata {
        PresentationMetadata {
            time_to_next: secs,
            ..Default::default()
        }
    }

    #[test]
    fn test_unset_time_inherits_presentation_default() {
        let metadata = SlideMetadata::default();
        let presentation = presentation_with_time(5);
        assert_eq!(
            metadata.effective_time_to_next(&presentation, ZeroTimeToNext::Inherit),
            Some(5)
        );
    }

    #[test]
    fn test_own_time_wins() {
        let metadata = SlideMetadata {
            time_to_next: Some(12),
            ..Default::default()
        };
        let presentation = presentation_with_time(5);
        assert_eq!(
            metadata.effective_time_to_next(&presentation, ZeroTimeToNext::Inherit),
            Some(12)
        );
    }

    #[test]
    fn test_explicit_zero_follows_policy() {
        let metadata = SlideMetadata {
            time_to_next: Some(0),
            ..Default::default()
        };
        let presentation = presentation_with_time(5);
        assert_eq!(
            metadata.effective_time_to_next(&presentation, ZeroTimeToNext::Inherit),
            Some(5)
        );
        assert_eq!(
            metadata.effective_time_to_next(&presentation, ZeroTimeToNext::Disable),
            None
        );
    }

    #[test]
    fn test_no_time_anywhere() {
        let metadata = SlideMetadata::default();
        let presentation = PresentationMetadata::default();
        assert_eq!(
            metadata.effective_time_to_next(&presentation, ZeroTimeToNext::Inherit),
            None
        );
    }

    #[test]
    fn test_merge_only_overwrites_set_fields() {
        let mut base = SlideMetadata {
            layout: Some("50-50".to_string()),
            class: Some("intro".to_string()),
            ..Default::default()
        };
        base.merge(SlideMetadata {
            layout: Some("grid-3x2".to_string()),
            autoscale: Some(false),
            ..Default::default()
        });

        assert_eq!(base.layout.as_deref(), Some("grid-3x2"));
        assert_eq!(base.class.as_deref(), Some("intro"));
        assert_eq!(base.autoscale, Some(false));
    }

    #[test]
    fn test_explicit_false_overrides_presentation_true() {
        let presentation = PresentationMetadata {
            slide_numbers: true,
            autoscale: true,
            footer: "Acme Corp".to_string(),
            ..Default::default()
        };
        let metadata = SlideMetadata {
            slide_numbers: Some(false),
            ..Default::default()
        };

        let display = metadata.resolve_display(&presentation);
        assert!(!display.slide_numbers);
        assert!(display.autoscale);
        assert_eq!(display.footer.as_deref(), Some("Acme Corp"));
    }

    #[test]
    fn test_hide_footer_suppresses_inherited_footer() {
        let presentation = PresentationMetadata {
            footer: "Acme Corp".to_string(),
            ..Default::default()
        };
        let metadata = SlideMetadata {
            hide_footer: Some(true),
            ..Default::default()
        };
        assert_eq!(metadata.resolve_display(&presentation).footer, None);
    }

    #[test]
    fn test_yaml_keys_are_kebab_case() {
        let metadata: SlideMetadata = serde_yaml::from_str(
            "layout: 50-50\nbody-class: dark\ntime-to-next: 7\nslidenumbers: true\ntransition: fade\n",
        )
        .unwrap();
        assert_eq!(metadata.layout.as_deref(), Some("50-50"));
        assert_eq!(metadata.body_class.as_deref(), Some("dark"));
        assert_eq!(metadata.time_to_next, Some(7));
        assert_eq!(metadata.slide_numbers, Some(true));
        assert_eq!(metadata.slide_transition.as_deref(), Some("fade"));
    }

    #[test]
    fn test_boolean_fields_accept_yaml_1_1_words() {
        let metadata: SlideMetadata =
            serde_yaml::from_str("autoscale: yes\nbuild-lists: off\nhide-footer: On\n").unwrap();
        assert_eq!(metadata.autoscale, Some(true));
        assert_eq!(metadata.build_lists, Some(false));
        assert_eq!(metadata.hide_footer, Some(true));
        assert_eq!(metadata.slide_numbers, None);

        let presentation: PresentationMetadata =
            serde_yaml::from_str("slidenumbers: no\nautoscale: on\n").unwrap();
        assert!(!presentation.slide_numbers);
        assert!(presentation.autoscale);
        assert!(!presentation.build_lists);
    }

    #[test]
    fn test_boolean_fields_reject_other_words() {
        let result = serde_yaml::from_str::<SlideMetadata>("autoscale: maybe\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_policy_from_str() {
        assert_eq!(
            "inherit".parse::<ZeroTimeToNext>().unwrap(),
            ZeroTimeToNext::Inherit
        );
        assert_eq!(
            "Disable".parse::<ZeroTimeToNext>().unwrap(),
            ZeroTimeToNext::Disable
        );
        assert!("sometimes".parse::<ZeroTimeToNext>().is_err());
    }
}
