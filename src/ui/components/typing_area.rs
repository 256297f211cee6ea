use crate::session::segment::Segment;
use crate::session::style::{StyleOptions, resolve_style};
use crate::session::wrap::Cell;
use crate::ui::layout::LineBuilder;

/// On-screen glyph for a target character. Newlines and tabs keep a single
/// cell so wrapped rows stay one cell per character.
pub fn display_char(ch: char) -> char {
    match ch {
        '\n' => '\u{21b5}', // ↵
        '\t' => '\u{2192}', // →
        other => other,
    }
}

/// Appends the styled cells of one wrapped row of `segment`.
pub fn push_row_cells(
    line: &mut LineBuilder,
    row: &[Cell],
    segment: &Segment,
    options: &StyleOptions,
    is_current_row: bool,
) {
    for cell in row {
        let resolved = resolve_style(
            cell.index,
            segment.cursor,
            &segment.attempts,
            &segment.successes,
            options,
            is_current_row,
        );
        line.push_char(display_char(cell.ch), resolved.style);
    }
}
