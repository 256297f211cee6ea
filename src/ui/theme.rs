use std::str::FromStr;

use ratatui::style::Color;

use crate::config::Config;

pub const BORDER_COLOR: Color = Color::Gray;

/// Resolved colours for one render pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub base: Color,
    pub pass: Color,
    pub miss: Color,
    pub fail: Color,
    pub highlight_row: Color,
    pub cursor: Color,
    pub border: Color,
}

impl Palette {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base: parse_color(&config.base_color),
            pass: parse_color(&config.pass_color),
            miss: parse_color(&config.miss_color),
            fail: parse_color(&config.fail_color),
            highlight_row: parse_color(&config.highlight_row_color),
            cursor: parse_color(&config.cursor_color),
            border: BORDER_COLOR,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

fn is_hex(value: &str) -> bool {
    matches!(value.len(), 3 | 6) && value.chars().all(|c| c.is_ascii_hexdigit())
}

fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix('#')
        .or_else(|| value.strip_prefix("0x"))
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

/// Accepts a named colour or 3/6 digit hex (`#`, `0x` or bare). Hex comes
/// back as lowercase `#...`.
pub fn normalize_color(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let hex = strip_hex_prefix(trimmed);
    if is_hex(hex) {
        return Some(format!("#{}", hex.to_ascii_lowercase()));
    }
    if hex.len() != trimmed.len() {
        return None;
    }
    let name = trimmed.to_ascii_lowercase();
    Color::from_str(&name).ok().map(|_| name)
}

pub fn parse_color(token: &str) -> Color {
    let hex = token.trim_start_matches('#');
    if token.starts_with('#') && is_hex(hex) {
        let expanded: String = if hex.len() == 3 {
            hex.chars().flat_map(|c| [c, c]).collect()
        } else {
            hex.to_string()
        };
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&expanded[0..2], 16),
            u8::from_str_radix(&expanded[2..4], 16),
            u8::from_str_radix(&expanded[4..6], 16),
        ) {
            return Color::Rgb(r, g, b);
        }
    }
    Color::from_str(token).unwrap_or(Color::White)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_hex_forms() {
        assert_eq!(normalize_color("#ABC").as_deref(), Some("#abc"));
        assert_eq!(normalize_color("0xA0B1C2").as_deref(), Some("#a0b1c2"));
        assert_eq!(normalize_color("ff0000").as_deref(), Some("#ff0000"));
        assert_eq!(normalize_color("#abcd"), None);
        assert_eq!(normalize_color("#xyz"), None);
    }

    #[test]
    fn test_normalize_named_colors() {
        assert_eq!(normalize_color(" Yellow ").as_deref(), Some("yellow"));
        assert_eq!(normalize_color("gray").as_deref(), Some("gray"));
        assert_eq!(normalize_color("chartreuse-ish"), None);
        assert_eq!(normalize_color("   "), None);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#ff0000"), Color::Rgb(255, 0, 0));
        assert_eq!(parse_color("#0f0"), Color::Rgb(0, 255, 0));
        assert_eq!(parse_color("red"), Color::Red);
        assert_eq!(parse_color("gray"), Color::Gray);
        assert_eq!(parse_color("nonsense"), Color::White);
    }

    #[test]
    fn test_default_palette() {
        let palette = Palette::default();
        assert_eq!(palette.base, Color::Gray);
        assert_eq!(palette.miss, Color::Yellow);
        assert_eq!(palette.fail, Color::Red);
        assert_eq!(palette.pass, Color::White);
    }
}
