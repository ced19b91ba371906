// ABOUTME: Main entry point for the big-deck program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use anyhow::Context;
use big_deck::config::{parse_resource_list, Config};
use big_deck::{AspectRatio, ImageMode, Theme, ZeroTimeToNext};
use clap::Parser;
use log::info;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Turn a markdown file into a big.js presentation", long_about = None)]
struct Cli {
    /// Path to the markdown file
    input: PathBuf,

    /// Path to output HTML file (defaults to stdout)
    #[arg(short, long, conflicts_with = "serve")]
    output: Option<PathBuf>,

    /// Theme to use: dark, light or white
    #[arg(long)]
    theme: Option<Theme>,

    /// Slide aspect ratio, or 'false' to fill the window
    #[arg(long)]
    aspect_ratio: Option<AspectRatio>,

    /// Page title (defaults to metadata or the first heading)
    #[arg(long)]
    title: Option<String>,

    /// Serve the presentation over HTTP instead of writing a file
    #[arg(long)]
    serve: bool,

    /// Port for serve mode
    #[arg(long)]
    port: Option<u16>,

    /// Regenerate and reload the browser when the markdown changes
    #[arg(long, requires = "serve")]
    watch: bool,

    /// CSS files to include (local paths or URLs)
    #[arg(long, value_delimiter = ',')]
    css: Vec<String>,

    /// JavaScript files to include (local paths or URLs)
    #[arg(long, value_delimiter = ',')]
    js: Vec<String>,

    /// Mode for CSS/JS: 'embed' to embed content or 'link' to reference
    #[arg(long, value_parser = ["embed", "link"])]
    mode: Option<String>,

    /// Add syntax highlighting for code blocks
    #[arg(long)]
    highlight: bool,

    /// How an explicit `time-to-next: 0` is treated: inherit or disable
    #[arg(long)]
    zero_time_to_next: Option<ZeroTimeToNext>,
}

impl Cli {
    /// Environment configuration with command line flags applied on top.
    fn config(&self) -> Config {
        let mut config = Config::from_env();
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Some(aspect_ratio) = self.aspect_ratio {
            config.aspect_ratio = aspect_ratio;
        }
        if self.title.is_some() {
            config.title = self.title.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(mode) = &self.mode {
            config.embed_resources = mode == "embed";
        }
        if self.highlight {
            config.highlight = true;
        }
        if let Some(policy) = self.zero_time_to_next {
            config.zero_time_to_next = policy;
        }
        config
    }
}

fn run(cli: &Cli) -> big_deck::Result<()> {
    let config = cli.config();
    let css_files = parse_resource_list(&cli.css);
    let js_files = parse_resource_list(&cli.js);

    if cli.serve {
        let serve_config = config.get_serve_config(cli.input.clone(), cli.watch, css_files, js_files);
        return big_deck::serve_markdown(serve_config);
    }

    let options = config.get_generator_options(ImageMode::Inline, css_files, js_files);
    let html_content = big_deck::generate_html(&cli.input, &options)?;

    match &cli.output {
        Some(output) => {
            big_deck::write_html_to_file(&html_content, output)?;
            info!("HTML generated successfully: {:?}", output);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(html_content.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write HTML to stdout")?;
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
