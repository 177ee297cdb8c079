//! Overlay text layout: paragraph-aware word wrapping, vertical block
//! placement and escaping for ffmpeg's `drawtext` expression syntax.
//! Horizontal centering is left to the tool (`x=(w-text_w)/2`), which
//! knows its own font metrics.

use std::path::Path;

use crate::model::TextConfig;

/// Vertical anchor as a fraction of canvas height. Intentionally below
/// true center so the upper frame stays visually uncluttered.
const VERTICAL_ANCHOR: f64 = 0.60;

/// Split `text` into lines of at most `max_chars` characters, respecting
/// word boundaries within each embedded paragraph. A single token longer
/// than `max_chars` is hard-broken into `max_chars`-sized chunks that
/// then flow like ordinary words, so no characters are lost. If wrapping
/// yields nothing (empty input) the trimmed original text becomes the
/// single fallback line.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }
        wrap_paragraph(paragraph, max_chars, &mut lines);
    }
    if lines.is_empty() {
        lines.push(text.trim().to_string());
    }
    lines
}

fn wrap_paragraph(paragraph: &str, max_chars: usize, out: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in paragraph.split_whitespace() {
        for piece in split_long_token(word, max_chars) {
            let piece_len = piece.chars().count();
            if current.is_empty() {
                current = piece;
                current_len = piece_len;
            } else if current_len + 1 + piece_len <= max_chars {
                current.push(' ');
                current.push_str(&piece);
                current_len += 1 + piece_len;
            } else {
                out.push(std::mem::take(&mut current));
                current = piece;
                current_len = piece_len;
            }
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
}

fn split_long_token(word: &str, max_chars: usize) -> Vec<String> {
    if word.chars().count() <= max_chars {
        return vec![word.to_string()];
    }
    word.chars()
        .collect::<Vec<_>>()
        .chunks(max_chars)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Escape a line for embedding inside `drawtext=text='...'`. Backslash is
/// doubled first; escaping it last would re-escape the backslashes the
/// quote and colon substitutions introduce.
pub fn escape_drawtext(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace(':', "\\:")
}

/// Normalize a font file path for a `fontfile=` argument: forward
/// slashes, and colons (Windows drive letters) escaped.
pub fn font_file_arg(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/").replace(':', "\\:")
}

/// Wrapped lines plus their vertical placement on the canvas.
pub struct TextBlock {
    pub lines: Vec<String>,
    pub line_height: u32,
    top: i32,
}

impl TextBlock {
    pub fn line_y(&self, index: usize) -> i32 {
        self.top + index as i32 * self.line_height as i32
    }
}

/// Wrap `cfg.text` and center the resulting block on the vertical anchor:
/// `line_height = font_size + line_spacing`, block top =
/// `anchor - block_height / 2`.
pub fn layout_block(cfg: &TextConfig, canvas_height: u32) -> TextBlock {
    let lines = wrap_text(&cfg.text, cfg.max_chars);
    let line_height = cfg.font_size + cfg.line_spacing;
    let block_height = line_height * lines.len() as u32;
    let anchor = (f64::from(canvas_height) * VERTICAL_ANCHOR) as i32;
    let top = anchor - block_height as i32 / 2;
    TextBlock {
        lines,
        line_height,
        top,
    }
}
