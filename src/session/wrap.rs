//! Word-aware wrapping of a character stream into fixed-width rows.
//!
//! Every cell keeps the index it had in the unwrapped stream so styling can
//! look up attempts and successes for the segment being typed.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub index: usize,
}

pub type Row = Vec<Cell>;

pub fn is_wrap_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\n' | '\t')
}

struct RowBuilder {
    rows: Vec<Row>,
    current: Row,
    max_width: usize,
}

impl RowBuilder {
    fn close_current(&mut self) {
        let row = std::mem::take(&mut self.current);
        self.rows.push(row);
    }

    fn hard_split(&mut self, run: &[Cell]) {
        for chunk in run.chunks(self.max_width) {
            self.rows.push(chunk.to_vec());
        }
    }

    fn push_run(&mut self, run: &[Cell]) {
        // Whitespace opening an empty row rides on the previous row when it
        // fits there.
        if self.current.is_empty() && is_wrap_whitespace(run[0].ch) {
            if let Some(previous) = self.rows.last_mut() {
                if previous.len() + run.len() <= self.max_width {
                    previous.extend_from_slice(run);
                    return;
                }
            }
        }

        if !self.current.is_empty() && self.current.len() + run.len() > self.max_width {
            self.close_current();
        }

        if run.len() > self.max_width {
            self.hard_split(run);
            return;
        }

        self.current.extend_from_slice(run);
    }

    fn finish(mut self) -> Vec<Row> {
        if !self.current.is_empty() {
            self.close_current();
        }
        if self.rows.is_empty() {
            self.rows.push(Vec::new());
        }
        self.rows
    }
}

/// Wraps `chars` into rows no wider than `max_width`, except that a single
/// whitespace or word run longer than `max_width` is hard-split into
/// `max_width`-sized rows. Empty input yields one empty row.
pub fn wrap(chars: &[char], max_width: usize) -> Vec<Row> {
    let mut builder = RowBuilder {
        rows: Vec::new(),
        current: Vec::new(),
        max_width: max_width.max(1),
    };

    let cells: Vec<Cell> = chars
        .iter()
        .enumerate()
        .map(|(index, &ch)| Cell { ch, index })
        .collect();

    for run in cells.chunk_by(|a, b| is_wrap_whitespace(a.ch) == is_wrap_whitespace(b.ch)) {
        builder.push_run(run);
    }

    builder.finish()
}

/// Row holding `cursor`; past-the-end cursors land on the last row.
pub fn find_row_index(rows: &[Row], cursor: usize) -> usize {
    rows.iter()
        .position(|row| match (row.first(), row.last()) {
            (Some(first), Some(last)) => (first.index..=last.index).contains(&cursor),
            _ => false,
        })
        .unwrap_or(rows.len().saturating_sub(1))
}
