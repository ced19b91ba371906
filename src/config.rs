// ABOUTME: Configuration module for the big-deck application
// ABOUTME: Provides configuration settings and environment variable handling

use crate::assets::{AspectRatio, Theme};
use crate::html::{GeneratorOptions, ImageMode};
use crate::parser::ZeroTimeToNext;
use crate::resources::ResourceFile;
use crate::watch::ServeConfig;
use log::warn;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Global configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub aspect_ratio: AspectRatio,
    pub title: Option<String>,
    pub port: u16,
    pub poll_interval_ms: u64,
    pub zero_time_to_next: ZeroTimeToNext,
    pub embed_resources: bool,
    pub highlight: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            aspect_ratio: AspectRatio::default(),
            title: None,
            port: 8080,
            poll_interval_ms: 1000, // 1 second
            zero_time_to_next: ZeroTimeToNext::Inherit,
            embed_resources: true,
            highlight: false,
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Values that do not parse are reported and replaced by the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            theme: env_parsed("BIG_THEME").unwrap_or(defaults.theme),
            aspect_ratio: env_parsed("BIG_ASPECT_RATIO").unwrap_or(defaults.aspect_ratio),
            title: env::var("BIG_TITLE").ok().filter(|t| !t.trim().is_empty()),
            port: env_parsed("BIG_PORT").unwrap_or(defaults.port),
            poll_interval_ms: env_parsed("BIG_POLL_INTERVAL_MS").unwrap_or(defaults.poll_interval_ms),
            zero_time_to_next: env_parsed("BIG_ZERO_TIME_TO_NEXT")
                .unwrap_or(defaults.zero_time_to_next),
            embed_resources: env::var("BIG_EMBED_RESOURCES")
                .ok()
                .map(|s| s.to_lowercase() != "false")
                .unwrap_or(defaults.embed_resources),
            highlight: env::var("BIG_HIGHLIGHT")
                .ok()
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(defaults.highlight),
        }
    }

    /// Get generator options for this config.
    pub fn get_generator_options(
        &self,
        image_mode: ImageMode,
        css_files: Vec<ResourceFile>,
        js_files: Vec<ResourceFile>,
    ) -> GeneratorOptions {
        GeneratorOptions {
            theme: self.theme,
            title: self.title.clone(),
            aspect_ratio: self.aspect_ratio,
            base_path: None,
            image_mode,
            css_files,
            js_files,
            embed_resources: self.embed_resources,
            highlight: self.highlight,
            zero_time_to_next: self.zero_time_to_next,
            auto_reload_script: None,
        }
    }

    /// Get a serve configuration with defaults from this config
    pub fn get_serve_config(
        &self,
        markdown_path: PathBuf,
        watch: bool,
        css_files: Vec<ResourceFile>,
        js_files: Vec<ResourceFile>,
    ) -> ServeConfig {
        ServeConfig {
            markdown_path,
            port: self.port,
            watch,
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            generator: self.get_generator_options(ImageMode::Proxy, css_files, js_files),
        }
    }
}

fn env_parsed<T>(name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(name).ok()?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring {}={:?}: {}", name, raw, e);
            None
        }
    }
}

/// Split a comma separated list of resources.
pub fn parse_resource_list(list: &[String]) -> Vec<ResourceFile> {
    list.iter()
        .map(|path| path.trim())
        .filter(|path| !path.is_empty())
        .map(ResourceFile::new)
        .collect()
}
