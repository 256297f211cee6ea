use ratatui::style::{Modifier, Style};

use crate::config::{Config, CursorStyle};
use crate::ui::theme::Palette;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharClass {
    Untyped,
    /// Untyped character on the row holding the cursor.
    Highlighted,
    Pass,
    Miss,
    Fail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharStyle {
    pub class: CharClass,
    pub cursor: Option<CursorStyle>,
    pub style: Style,
}

/// The configuration slice that affects character styling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StyleOptions {
    pub palette: Palette,
    pub highlight_row: bool,
    pub cursor: CursorStyle,
}

impl StyleOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            palette: Palette::from_config(config),
            highlight_row: config.highlight_row,
            cursor: config.cursor,
        }
    }

    /// Style for padding cells on a content row.
    pub fn padding_style(&self, is_current_row: bool) -> Style {
        if self.highlight_row && is_current_row {
            Style::default()
                .fg(self.palette.highlight_row)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.palette.base)
        }
    }
}

fn classify(index: usize, cursor: usize, attempts: &[u32], successes: &[bool]) -> CharClass {
    let tries = attempts.get(index).copied().unwrap_or(0);
    if index >= cursor || tries == 0 {
        return CharClass::Untyped;
    }
    match (successes.get(index).copied().unwrap_or(false), tries) {
        (true, 1) => CharClass::Pass,
        (true, _) => CharClass::Miss,
        (false, _) => CharClass::Fail,
    }
}

/// Pure mapping from a character's typing history to its visual style.
pub fn resolve_style(
    index: usize,
    cursor: usize,
    attempts: &[u32],
    successes: &[bool],
    options: &StyleOptions,
    is_current_row: bool,
) -> CharStyle {
    let palette = &options.palette;
    let mut class = classify(index, cursor, attempts, successes);

    let mut style = match class {
        CharClass::Pass => Style::default()
            .fg(palette.pass)
            .add_modifier(Modifier::BOLD),
        CharClass::Miss => Style::default().fg(palette.miss),
        CharClass::Fail => Style::default().fg(palette.fail),
        CharClass::Untyped | CharClass::Highlighted => Style::default()
            .fg(palette.base)
            .add_modifier(Modifier::DIM),
    };

    if class == CharClass::Untyped && options.highlight_row && is_current_row {
        class = CharClass::Highlighted;
        style = Style::default()
            .fg(palette.highlight_row)
            .add_modifier(Modifier::BOLD);
    }

    let cursor_style = (index == cursor).then_some(options.cursor);
    if let Some(kind) = cursor_style {
        style = apply_cursor(style, kind, options);
    }

    CharStyle {
        class,
        cursor: cursor_style,
        style,
    }
}

fn apply_cursor(style: Style, kind: CursorStyle, options: &StyleOptions) -> Style {
    let color = options.palette.cursor;
    match kind {
        CursorStyle::Block => style.bg(color),
        CursorStyle::Outline => style.fg(color).add_modifier(Modifier::REVERSED),
        CursorStyle::Line | CursorStyle::Underline => {
            style.fg(color).add_modifier(Modifier::UNDERLINED)
        }
    }
}
