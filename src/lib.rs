// ABOUTME: Library module for the big-deck program.
// ABOUTME: Contains the markdown slide parser, the big.js HTML generator and serve mode.

// Reexport modules
pub mod assets;
pub mod config;
pub mod errors;
pub mod html;
pub mod images;
pub mod markdown;
pub mod parser;
pub mod resources;
pub mod template;
pub mod utils;
pub mod watch;

// Reexport common types and functions
pub use assets::{AspectRatio, Theme};
pub use config::Config;
pub use errors::{DeckError, Result};
pub use html::{generate_html, write_html_to_file, Generator, GeneratorOptions, ImageMode};
pub use parser::{parse_document, parse_markdown_file, Deck, Parser, Slide, ZeroTimeToNext};
pub use resources::ResourceFile;
pub use watch::{serve_markdown, ServeConfig};
