use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_command(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_big-deck"))
        .args(args)
        .env("RUST_LOG", "error")
        .env_remove("BIG_THEME")
        .env_remove("BIG_ASPECT_RATIO")
        .env_remove("BIG_TITLE")
        .env_remove("BIG_ZERO_TIME_TO_NEXT")
        .env_remove("BIG_EMBED_RESOURCES")
        .output()
        .expect("Failed to execute command")
}

fn write_markdown(dir: &TempDir, content: &str) -> String {
    let markdown_path = dir.path().join("talk.md");
    fs::write(&markdown_path, content).expect("Failed to write markdown file");
    markdown_path.to_str().unwrap().to_string()
}

#[test]
fn test_generate_html_command() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let markdown_path = write_markdown(&temp_dir, "# Test Slide\n\nThis is a test slide.");

    let css_path = temp_dir.path().join("test.css");
    fs::write(&css_path, "body { font-family: Arial; }").expect("Failed to write CSS file");

    let output_path = temp_dir.path().join("out").join("output.html");

    let output = run_command(&[
        &markdown_path,
        "-o",
        output_path.to_str().unwrap(),
        "--css",
        css_path.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(output_path.exists(), "Output file was not created");

    let html_content = fs::read_to_string(&output_path).expect("Failed to read output file");
    assert!(
        html_content.contains("Test Slide</h1>"),
        "Missing markdown content"
    );
    assert!(
        html_content.contains("<style>body { font-family: Arial; }</style>"),
        "Missing CSS"
    );
}

#[test]
fn test_html_written_to_stdout_by_default() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let markdown_path = write_markdown(&temp_dir, "# One\n\n---\n\n# Two");

    let output = run_command(&[&markdown_path, "--theme", "white", "--title", "My Talk"]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("<!DOCTYPE html>"));
    assert!(stdout.contains("<title>My Talk</title>"));
    assert!(stdout.contains("<body class=\"white\">"));
    assert!(stdout.contains("One</h1>"));
    assert!(stdout.contains("Two</h1>"));
}

#[test]
fn test_link_mode_and_aspect_ratio() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let markdown_path = write_markdown(&temp_dir, "# Test Slide");

    let output = run_command(&[
        &markdown_path,
        "--mode",
        "link",
        "--css",
        "theme/a.css,https://example.com/b.css",
        "--aspect-ratio",
        "false",
    ]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(r#"<link rel="stylesheet" href="theme/a.css">"#));
    assert!(stdout.contains(r#"<link rel="stylesheet" href="https://example.com/b.css">"#));
    assert!(stdout.contains("<script>BIG_ASPECT_RATIO = false;</script>"));
}

#[test]
fn test_zero_time_to_next_flag() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let markdown_path = write_markdown(
        &temp_dir,
        "<!-- presentation\ntime-to-next: 7\n-->\n# One\n\n---\n\n[.time-to-next: 0]\n# Two",
    );

    let inherit = run_command(&[&markdown_path]);
    assert!(inherit.status.success(), "Command failed: {:?}", inherit);
    let stdout = String::from_utf8_lossy(&inherit.stdout);
    assert_eq!(stdout.matches("data-time-to-next=\"7\"").count(), 2);

    let disable = run_command(&[&markdown_path, "--zero-time-to-next", "disable"]);
    assert!(disable.status.success(), "Command failed: {:?}", disable);
    let stdout = String::from_utf8_lossy(&disable.stdout);
    assert_eq!(stdout.matches("data-time-to-next=\"7\"").count(), 1);
}

#[test]
fn test_empty_input_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let markdown_path = write_markdown(&temp_dir, "\n---\n\n---\n");

    let output = run_command(&[&markdown_path]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error: No slides found in input"));
}

#[test]
fn test_missing_input_fails() {
    let output = run_command(&["/no/such/talk.md"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Path not found"));
}

#[test]
fn test_invalid_theme_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let markdown_path = write_markdown(&temp_dir, "# Test Slide");

    let output = run_command(&[&markdown_path, "--theme", "neon"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid theme 'neon'"));
}

#[test]
fn test_watch_requires_serve() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let markdown_path = write_markdown(&temp_dir, "# Test Slide");

    let output = run_command(&[&markdown_path, "--watch"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
