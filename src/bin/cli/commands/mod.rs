pub mod analyze;
pub mod archive;
pub mod schedule;
pub mod sessions;

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
}

/// Wrap `text` in `code` when colors are on
pub fn paint(text: &str, code: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", code, text, Color::RESET)
    } else {
        text.to_string()
    }
}
