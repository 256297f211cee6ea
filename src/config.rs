use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use toml::{Table, Value};

use crate::ui::theme;

pub const MIN_ROW_CHAR: usize = 20;
pub const MAX_ROW_CHAR: usize = 60;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CharCase {
    Lower,
    Upper,
    #[default]
    Default,
}

impl CharCase {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "lower" => Some(CharCase::Lower),
            "upper" => Some(CharCase::Upper),
            "default" => Some(CharCase::Default),
            _ => None,
        }
    }

    pub fn apply(self, text: &str) -> String {
        match self {
            CharCase::Lower => text.to_lowercase(),
            CharCase::Upper => text.to_uppercase(),
            CharCase::Default => text.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" => Some(TextAlign::Left),
            "center" => Some(TextAlign::Center),
            "right" => Some(TextAlign::Right),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorStyle {
    Line,
    Block,
    Outline,
    #[default]
    Underline,
}

impl CursorStyle {
    /// Unknown names fall back to `Underline`.
    pub fn parse_or_default(value: &str) -> Self {
        match value {
            "line" => CursorStyle::Line,
            "block" => CursorStyle::Block,
            "outline" => CursorStyle::Outline,
            _ => CursorStyle::Underline,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub max_row_char: usize,
    pub base_color: String,
    pub pass_color: String,
    pub miss_color: String,
    pub fail_color: String,
    pub highlight_row_color: String,
    pub cursor_color: String,
    pub allow_delete: bool,
    pub char_case: CharCase,
    pub case_sensitive: bool,
    pub text_align: TextAlign,
    pub highlight_row: bool,
    pub cursor: CursorStyle,
    pub display_tooltips: bool,
    pub display_pause_tooltip: bool,
    pub commands_per_screen: usize,
    pub shuffle_deck: bool,
    pub stats_file: PathBuf,
}

fn default_stats_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("typk")
        .join("typk_stats.csv")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_row_char: 40,
            base_color: "gray".to_string(),
            pass_color: "white".to_string(),
            miss_color: "yellow".to_string(),
            fail_color: "red".to_string(),
            highlight_row_color: "white".to_string(),
            cursor_color: "white".to_string(),
            allow_delete: true,
            char_case: CharCase::Default,
            case_sensitive: true,
            text_align: TextAlign::Left,
            highlight_row: true,
            cursor: CursorStyle::Underline,
            display_tooltips: true,
            display_pause_tooltip: true,
            commands_per_screen: 3,
            shuffle_deck: false,
            stats_file: default_stats_file(),
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typk")
            .join("config.toml")
    }

    /// Loads `path`, or defaults when it does not exist. Read and syntax
    /// errors are returned so the caller can report them and fall back.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: Table = toml::from_str(content)?;
        Ok(Self::from_table(&table))
    }

    /// Field-by-field normalisation: anything missing, mistyped or out of
    /// range keeps its default.
    pub fn from_table(table: &Table) -> Self {
        let mut config = Config::default();

        if let Some(width) = table.get("max_row_char").and_then(number) {
            config.max_row_char = clamp_row_char(width);
        }

        for (key, slot) in [
            ("base_color", &mut config.base_color),
            ("pass_color", &mut config.pass_color),
            ("miss_color", &mut config.miss_color),
            ("fail_color", &mut config.fail_color),
            ("highlight_row_color", &mut config.highlight_row_color),
            ("cursor_color", &mut config.cursor_color),
        ] {
            if let Some(color) = table
                .get(key)
                .and_then(Value::as_str)
                .and_then(theme::normalize_color)
            {
                *slot = color;
            }
        }

        for (key, slot) in [
            ("allow_delete", &mut config.allow_delete),
            ("case_sensitive", &mut config.case_sensitive),
            ("highlight_row", &mut config.highlight_row),
            ("display_tooltips", &mut config.display_tooltips),
            ("display_pause_tooltip", &mut config.display_pause_tooltip),
            ("shuffle_deck", &mut config.shuffle_deck),
        ] {
            if let Some(flag) = table.get(key).and_then(Value::as_bool) {
                *slot = flag;
            }
        }

        if let Some(case) = table
            .get("char_case")
            .and_then(Value::as_str)
            .and_then(CharCase::parse)
        {
            config.char_case = case;
        }
        if let Some(align) = table
            .get("text_align")
            .and_then(Value::as_str)
            .and_then(TextAlign::parse)
        {
            config.text_align = align;
        }
        if let Some(cursor) = table.get("cursor").and_then(Value::as_str) {
            config.cursor = CursorStyle::parse_or_default(cursor);
        }
        if let Some(count) = table.get("commands_per_screen").and_then(number) {
            if count >= 1.0 {
                config.commands_per_screen = count.round() as usize;
            }
        }
        if let Some(path) = table.get("stats_file").and_then(Value::as_str) {
            if !path.trim().is_empty() {
                config.stats_file = PathBuf::from(path.trim());
            }
        }

        config
    }

    pub fn set_max_row_char(&mut self, width: usize) {
        self.max_row_char = width.clamp(MIN_ROW_CHAR, MAX_ROW_CHAR);
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Float(f) if f.is_finite() => Some(*f),
        _ => None,
    }
}

fn clamp_row_char(width: f64) -> usize {
    width
        .round()
        .clamp(MIN_ROW_CHAR as f64, MAX_ROW_CHAR as f64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_max_row_char_clamped_and_rounded() {
        assert_eq!(Config::from_toml_str("max_row_char = 5").unwrap().max_row_char, 20);
        assert_eq!(Config::from_toml_str("max_row_char = 99").unwrap().max_row_char, 60);
        assert_eq!(Config::from_toml_str("max_row_char = 33.6").unwrap().max_row_char, 34);
        assert_eq!(
            Config::from_toml_str("max_row_char = \"wide\"").unwrap().max_row_char,
            40
        );
    }

    #[test]
    fn test_recognised_values_applied() {
        let toml_str = r##"
allow_delete = false
char_case = "upper"
case_sensitive = false
text_align = "center"
highlight_row = false
cursor = "block"
fail_color = "#F0A"
pass_color = "0x00FF00"
commands_per_screen = 5
shuffle_deck = true
stats_file = "/tmp/typk.csv"
"##;
        let config = Config::from_toml_str(toml_str).unwrap();
        assert!(!config.allow_delete);
        assert_eq!(config.char_case, CharCase::Upper);
        assert!(!config.case_sensitive);
        assert_eq!(config.text_align, TextAlign::Center);
        assert!(!config.highlight_row);
        assert_eq!(config.cursor, CursorStyle::Block);
        assert_eq!(config.fail_color, "#f0a");
        assert_eq!(config.pass_color, "#00ff00");
        assert_eq!(config.commands_per_screen, 5);
        assert!(config.shuffle_deck);
        assert_eq!(config.stats_file, PathBuf::from("/tmp/typk.csv"));
    }

    #[test]
    fn test_invalid_values_fall_back_silently() {
        let toml_str = r#"
allow_delete = "no"
char_case = "title"
text_align = "justify"
base_color = "not-a-colour"
commands_per_screen = 0
"#;
        let config = Config::from_toml_str(toml_str).unwrap();
        let defaults = Config::default();
        assert_eq!(config.allow_delete, defaults.allow_delete);
        assert_eq!(config.char_case, defaults.char_case);
        assert_eq!(config.text_align, defaults.text_align);
        assert_eq!(config.base_color, defaults.base_color);
        assert_eq!(config.commands_per_screen, defaults.commands_per_screen);
    }

    #[test]
    fn test_unknown_cursor_is_underline() {
        let config = Config::from_toml_str("cursor = \"beam\"").unwrap();
        assert_eq!(config.cursor, CursorStyle::Underline);
    }

    #[test]
    fn test_syntax_error_is_reported() {
        assert!(Config::from_toml_str("max_row_char = ").is_err());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_row_char = 25\nnamed_color = 1\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.max_row_char, 25);
    }

    #[test]
    fn test_char_case_apply() {
        assert_eq!(CharCase::Lower.apply("AbC"), "abc");
        assert_eq!(CharCase::Upper.apply("AbC"), "ABC");
        assert_eq!(CharCase::Default.apply("AbC"), "AbC");
    }

    #[test]
    fn test_set_max_row_char_clamps() {
        let mut config = Config::default();
        config.set_max_row_char(200);
        assert_eq!(config.max_row_char, MAX_ROW_CHAR);
        config.set_max_row_char(1);
        assert_eq!(config.max_row_char, MIN_ROW_CHAR);
    }
}
