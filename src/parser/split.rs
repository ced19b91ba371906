// ABOUTME: Slide splitter for the big-deck parser
// ABOUTME: Cuts a document into raw slide blocks on standalone dash lines

/// Check whether a line is a slide delimiter.
///
/// After trimming, the line must hold only dashes and spaces, with at
/// least three dashes.
pub fn is_delimiter_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.len() < 3 {
        return false;
    }

    if !trimmed.chars().all(|c| c == '-' || c == ' ') {
        return false;
    }

    trimmed.chars().filter(|&c| c == '-').count() >= 3
}

/// Split a document into raw slide blocks.
///
/// Blocks that are blank after trimming are dropped, wherever they occur.
/// Each kept block has its lines joined with `\n`.
pub fn split_slides(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();

    for line in content.lines() {
        if is_delimiter_line(line) {
            push_block(&mut blocks, std::mem::take(&mut current));
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }

    // Last slide has no trailing delimiter
    push_block(&mut blocks, current);

    blocks
}

fn push_block(blocks: &mut Vec<String>, block: String) {
    if !block.trim().is_empty() {
        blocks.push(block);
    }
}
