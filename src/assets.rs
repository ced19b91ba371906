// ABOUTME: Embedded big.js assets and theme selection for the big-deck application
// ABOUTME: Ships the runtime script, base stylesheet and theme stylesheets in the binary

use crate::errors::{DeckError, Result};
use std::fmt;
use std::str::FromStr;

pub const BIG_JS: &str = include_str!("../assets/big.js");
pub const BIG_CSS: &str = include_str!("../assets/big.css");
pub const HIGHLIGHT_JS: &str = include_str!("../assets/shiki-init.js");

const DARK_CSS: &str = include_str!("../assets/themes/dark.css");
const LIGHT_CSS: &str = include_str!("../assets/themes/light.css");
const WHITE_CSS: &str = include_str!("../assets/themes/white.css");

/// Colour theme of the deck. The name doubles as the body class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
    White,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Dark, Theme::Light, Theme::White];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::White => "white",
        }
    }

    pub fn css(&self) -> &'static str {
        match self {
            Theme::Dark => DARK_CSS,
            Theme::Light => LIGHT_CSS,
            Theme::White => WHITE_CSS,
        }
    }
}

impl FromStr for Theme {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| DeckError::InvalidTheme(s.to_string()))
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Slide aspect ratio handed to big.js.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AspectRatio {
    Ratio(f64),
    /// Let slides fill the window
    Disabled,
}

impl AspectRatio {
    /// big.js's built-in ratio
    pub const DEFAULT: f64 = 1.6;

    /// Script that overrides big.js's ratio, if one is needed.
    pub fn script(&self) -> Option<String> {
        match self {
            AspectRatio::Ratio(ratio) if *ratio == Self::DEFAULT => None,
            AspectRatio::Ratio(ratio) => {
                Some(format!("<script>BIG_ASPECT_RATIO = {};</script>", ratio))
            }
            AspectRatio::Disabled => Some("<script>BIG_ASPECT_RATIO = false;</script>".to_string()),
        }
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        AspectRatio::Ratio(Self::DEFAULT)
    }
}

impl FromStr for AspectRatio {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "" => Ok(AspectRatio::default()),
            "false" | "none" => Ok(AspectRatio::Disabled),
            _ => match trimmed.parse::<f64>() {
                Ok(ratio) if ratio.is_finite() && ratio > 0.0 => Ok(AspectRatio::Ratio(ratio)),
                _ => Err(DeckError::InvalidAspectRatio(s.to_string())),
            },
        }
    }
}
