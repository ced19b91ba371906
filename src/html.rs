// ABOUTME: HTML generation module for the big-deck application
// ABOUTME: Renders parsed slides into big.js slide divs and a complete page

use crate::assets::{self, AspectRatio, Theme};
use crate::errors::{DeckError, Result};
use crate::images;
use crate::markdown::{ComrakRenderer, MarkdownRenderer};
use crate::parser::{self, Deck, PresentationMetadata, Slide, ZeroTimeToNext};
use crate::resources::{ResourceFile, ResourceKind};
use crate::template::{self, escape_html, Document};
use crate::utils;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// What happens to `<img>` sources in rendered slides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageMode {
    /// Embed local images as data URIs for a single-file deck
    #[default]
    Inline,
    /// Leave local images as links and route remote ones through the proxy
    Proxy,
    /// Leave every source untouched
    Keep,
}

/// Options for turning a parsed deck into HTML
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    pub theme: Theme,
    /// Overrides every other title source
    pub title: Option<String>,
    pub aspect_ratio: AspectRatio,
    /// Directory that relative image paths are resolved against
    pub base_path: Option<PathBuf>,
    pub image_mode: ImageMode,
    pub css_files: Vec<ResourceFile>,
    pub js_files: Vec<ResourceFile>,
    pub embed_resources: bool,
    /// Add the syntax highlighting module script
    pub highlight: bool,
    pub zero_time_to_next: ZeroTimeToNext,
    pub auto_reload_script: Option<String>,
}

/// Renders decks to HTML.
pub struct Generator<R = ComrakRenderer> {
    options: GeneratorOptions,
    renderer: R,
}

impl Generator<ComrakRenderer> {
    pub fn new(options: GeneratorOptions) -> Self {
        Self::with_renderer(options, ComrakRenderer::new())
    }
}

impl<R: MarkdownRenderer> Generator<R> {
    pub fn with_renderer(options: GeneratorOptions, renderer: R) -> Self {
        Self { options, renderer }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Build the complete HTML page for a deck.
    pub fn generate(&self, deck: &Deck) -> String {
        let title = resolve_title(self.options.title.as_deref(), &deck.presentation, &deck.slides);

        let slides = deck
            .slides
            .iter()
            .enumerate()
            .map(|(index, slide)| self.render_slide(index, slide, &deck.presentation))
            .collect();

        // The aspect ratio must be set before big.js runs
        let mut head_tags = Vec::new();
        for css in &self.options.css_files {
            match css.tag(ResourceKind::Css, self.options.embed_resources) {
                Ok(tag) => head_tags.push(tag),
                Err(e) => warn!("Warning: Failed to include CSS resource {}: {}", css.path, e),
            }
        }
        if let Some(script) = self.options.aspect_ratio.script() {
            head_tags.push(script);
        }
        head_tags.push(format!("<script>\n{}\n  </script>", assets::BIG_JS));
        if self.options.highlight {
            head_tags.push(format!(
                "<script type=\"module\">\n{}\n  </script>",
                assets::HIGHLIGHT_JS
            ));
        }

        let mut body_tags = Vec::new();
        for js in &self.options.js_files {
            match js.tag(ResourceKind::Js, self.options.embed_resources) {
                Ok(tag) => body_tags.push(tag),
                Err(e) => warn!(
                    "Warning: Failed to include JavaScript resource {}: {}",
                    js.path, e
                ),
            }
        }
        if let Some(script) = &self.options.auto_reload_script {
            body_tags.push(script.clone());
        }

        template::assemble_document(&Document {
            title: &title,
            theme: self.options.theme,
            styles: vec![assets::BIG_CSS, self.options.theme.css()],
            head_tags,
            slides,
            body_tags,
        })
    }

    /// Render one slide as a big.js `<div>`.
    pub fn render_slide(
        &self,
        index: usize,
        slide: &Slide,
        presentation: &PresentationMetadata,
    ) -> String {
        let metadata = &slide.metadata;
        let display = metadata.resolve_display(presentation);
        let mut html = String::from("  <div");

        if let Some(class) = &metadata.class {
            push_attr(&mut html, "class", class);
        }

        if let Some(secs) =
            metadata.effective_time_to_next(presentation, self.options.zero_time_to_next)
        {
            push_attr(&mut html, "data-time-to-next", &secs.to_string());
        }

        let mut body_style = metadata.body_style.clone().unwrap_or_default();
        if let Some(color) = &display.background_color {
            if !body_style.is_empty() && !body_style.trim_end().ends_with(';') {
                body_style.push(';');
            }
            if !body_style.is_empty() {
                body_style.push(' ');
            }
            body_style.push_str(&format!("background-color: {};", color));
        }
        if !body_style.is_empty() {
            push_attr(&mut html, "data-body-style", &body_style);
        }

        if let Some(body_class) = &metadata.body_class {
            push_attr(&mut html, "data-body-class", body_class);
        }
        if display.autoscale {
            push_attr(&mut html, "data-autoscale", "true");
        }
        if display.build_lists {
            push_attr(&mut html, "data-build-lists", "true");
        }
        if let Some(transition) = &display.transition {
            push_attr(&mut html, "data-transition", transition);
        }
        if display.slide_numbers {
            push_attr(&mut html, "data-slide-number", &(index + 1).to_string());
        }
        if let Some(footer) = &display.footer {
            push_attr(&mut html, "data-footer", footer);
        }

        html.push('>');

        match &metadata.layout {
            Some(layout) => html.push_str(&self.render_layout(layout, &slide.content)),
            None => html.push_str(&self.markdown_to_html(&slide.content)),
        }

        if !slide.notes.is_empty() {
            html.push_str(&format!("\n    <notes>{}</notes>", escape_html(&slide.notes)));
        }

        html.push_str("\n  </div>");
        html
    }

    /// Render a slide whose blocks sit in a CSS grid.
    fn render_layout(&self, layout: &str, content: &str) -> String {
        let mut html = format!(
            "\n    <div class=\"layout\" style=\"{}\">",
            escape_html(&layout_to_grid_style(layout))
        );

        for part in split_content_for_layout(content) {
            html.push_str("\n      ");
            html.push_str(&self.markdown_to_html(part));
        }

        html.push_str("\n    </div>");
        html
    }

    fn markdown_to_html(&self, markdown: &str) -> String {
        let html = self.renderer.render(markdown);
        match (self.options.image_mode, &self.options.base_path) {
            (ImageMode::Inline, Some(base_path)) => images::inline_local_images(&html, base_path),
            (ImageMode::Proxy, _) => images::proxy_remote_images(&html),
            _ => html,
        }
    }
}

fn push_attr(html: &mut String, name: &str, value: &str) {
    html.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
}

/// CSS grid rules for a named layout. Unknown names are used verbatim.
pub fn layout_to_grid_style(layout: &str) -> String {
    let style = match layout {
        "50-50" => "grid-template-columns: 50% 50%;",
        "75-25" => "grid-template-columns: 75% 25%;",
        "25-75" => "grid-template-columns: 25% 75%;",
        "50-50-rows" => "grid-template-rows: 50% 50%;",
        "75-25-rows" => "grid-template-rows: 75% 25%;",
        "25-75-rows" => "grid-template-rows: 25% 75%;",
        "grid-3x2" => "grid-template-columns: repeat(3, 1fr); grid-template-rows: repeat(2, 1fr);",
        "grid-2x3" => "grid-template-columns: repeat(2, 1fr); grid-template-rows: repeat(3, 1fr);",
        custom => custom,
    };
    style.to_string()
}

/// Split slide content into grid cells on blank lines.
pub fn split_content_for_layout(content: &str) -> Vec<&str> {
    content
        .split("\n\n")
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// First level-one heading in a markdown block.
pub fn extract_title(markdown: &str) -> Option<&str> {
    markdown
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("# "))
        .map(str::trim)
        .filter(|title| !title.is_empty())
}

/// Pick the page title: explicit option, presentation metadata, first heading.
pub fn resolve_title(
    explicit: Option<&str>,
    presentation: &PresentationMetadata,
    slides: &[Slide],
) -> String {
    explicit
        .filter(|t| !t.trim().is_empty())
        .or_else(|| Some(presentation.title.as_str()).filter(|t| !t.trim().is_empty()))
        .or_else(|| slides.first().and_then(|slide| extract_title(&slide.content)))
        .unwrap_or("Presentation")
        .to_string()
}

/// Parse a markdown file and render it to a complete HTML page
pub fn generate_html(markdown_path: &Path, options: &GeneratorOptions) -> Result<String> {
    info!("Generating HTML from markdown: {:?}", markdown_path);

    let deck = parser::parse_markdown_file(markdown_path)?;

    // Relative image paths resolve against the markdown file's directory
    let mut options = options.clone();
    if options.base_path.is_none() {
        options.base_path = Some(utils::get_absolute_path(utils::parent_dir(markdown_path))?);
    }

    Ok(Generator::new(options).generate(&deck))
}

/// Utility function to write HTML content to a file
pub fn write_html_to_file(html_content: &str, output_path: &Path) -> Result<()> {
    info!("Writing HTML to file: {:?}", output_path);

    utils::ensure_parent_directory_exists(output_path)?;

    fs::write(output_path, html_content).map_err(DeckError::FileReadError)?;

    Ok(())
}
