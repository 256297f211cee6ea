//! Builds each screen as a list of styled terminal rows.
//!
//! Typing screens draw a bordered box `max_row_char + 2 * PADDING_X` cells
//! wide, centered in the viewport, with optional hint rows above it and a
//! pause hint below it. Adjacent cells with the same style share one span.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::config::{Config, TextAlign};
use crate::session::deck::{CardPhase, CommandCard};
use crate::session::segment::Segment;
use crate::session::stats::SessionStats;
use crate::session::style::StyleOptions;
use crate::session::wrap::{Row, find_row_index, wrap};
use crate::ui::components::stats_box::{center_text, pause_stats_lines, stats_box_lines};
use crate::ui::components::typing_area::{display_char, push_row_cells};

pub const PADDING_X: usize = 4;
pub const PADDING_Y: usize = 1;
pub const TITLE: &str = "TYPK - CLI";
pub const PAUSE_HINT: &str = "[Hit ESC to pause]";
pub const DECK_PAUSE_HINT: &str = "[ESC = pause]";
pub const NEXT_COMMAND_HINT: &str = "Hit ENTER for next command";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub const FALLBACK: Viewport = Viewport {
        width: 80,
        height: 24,
    };

    /// A zero dimension means the host could not report its size.
    pub fn new(width: u16, height: u16) -> Self {
        if width == 0 || height == 0 {
            Self::FALLBACK
        } else {
            Self { width, height }
        }
    }

    pub fn from_rect(area: Rect) -> Self {
        Self::new(area.width, area.height)
    }

    fn width(&self) -> usize {
        self.width as usize
    }

    fn height(&self) -> usize {
        self.height as usize
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Accumulates spans for one row, merging runs that share a style.
#[derive(Debug, Default)]
pub struct LineBuilder {
    spans: Vec<Span<'static>>,
    width: usize,
}

impl LineBuilder {
    pub fn push(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        self.width += text.chars().count();
        if let Some(last) = self.spans.last_mut() {
            if last.style == style {
                last.content.to_mut().push_str(text);
                return;
            }
        }
        self.spans.push(Span::styled(text.to_string(), style));
    }

    pub fn push_char(&mut self, ch: char, style: Style) {
        let mut buf = [0u8; 4];
        self.push(ch.encode_utf8(&mut buf), style);
    }

    pub fn push_spaces(&mut self, count: usize, style: Style) {
        self.push(&" ".repeat(count), style);
    }

    pub fn pad_to(&mut self, width: usize) {
        let missing = width.saturating_sub(self.width);
        self.push_spaces(missing, Style::default());
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn build(self) -> Line<'static> {
        Line::from(self.spans)
    }
}

/// Leftover width of a row split as (left, right) per the alignment.
pub fn align_row(len: usize, width: usize, align: TextAlign) -> (usize, usize) {
    let remaining = width.saturating_sub(len);
    match align {
        TextAlign::Left => (0, remaining),
        TextAlign::Right => (remaining, 0),
        TextAlign::Center => {
            let left = remaining / 2;
            (left, remaining - left)
        }
    }
}

/// The card list shown while practising a command deck. `cards[0]` is the
/// card being typed.
#[derive(Clone, Copy, Debug)]
pub struct DeckView<'a> {
    pub cards: &'a [CommandCard],
    pub phase: CardPhase,
    pub active: &'a Segment,
    pub completed_command: Option<&'a Segment>,
    pub show_next_hint: bool,
}

pub struct LayoutBuilder<'a> {
    config: &'a Config,
    options: StyleOptions,
    viewport: Viewport,
}

impl<'a> LayoutBuilder<'a> {
    pub fn new(config: &'a Config, viewport: Viewport) -> Self {
        Self {
            config,
            options: StyleOptions::from_config(config),
            viewport,
        }
    }

    fn row_width(&self) -> usize {
        self.config.max_row_char.max(1)
    }

    fn inner_width(&self) -> usize {
        self.row_width() + PADDING_X * 2
    }

    fn box_width(&self) -> usize {
        self.inner_width() + 2
    }

    fn horizontal_pad(&self, box_width: usize) -> usize {
        self.viewport.width().saturating_sub(box_width) / 2
    }

    fn border_style(&self) -> Style {
        Style::default().fg(self.options.palette.border)
    }

    fn base_style(&self) -> Style {
        Style::default().fg(self.options.palette.base)
    }

    fn hint_style(&self) -> Style {
        Style::default()
            .fg(self.options.palette.highlight_row)
            .add_modifier(Modifier::BOLD)
    }

    fn blank(&self) -> Line<'static> {
        Line::from(" ".repeat(self.viewport.width()))
    }

    /// Opens a boxed row: outer pad and left border.
    fn open_row(&self, pad: usize) -> LineBuilder {
        let mut line = LineBuilder::default();
        line.push_spaces(pad, Style::default());
        line.push("|", self.border_style());
        line
    }

    fn close_row(&self, mut line: LineBuilder, pad: usize) -> Line<'static> {
        line.push("|", self.border_style());
        line.push_spaces(pad, Style::default());
        line.pad_to(self.viewport.width());
        line.build()
    }

    fn border_row(&self, pad: usize, inner: usize, fill: char) -> Line<'static> {
        let mut line = self.open_row(pad);
        line.push(&fill.to_string().repeat(inner), Style::default());
        self.close_row(line, pad)
    }

    fn title_row(&self, pad: usize, inner: usize) -> Line<'static> {
        let mut line = self.open_row(pad);
        line.push(&center_text(TITLE, inner), Style::default());
        self.close_row(line, pad)
    }

    fn padding_row(&self, pad: usize, inner: usize) -> Line<'static> {
        let mut line = self.open_row(pad);
        line.push_spaces(inner, self.options.padding_style(false));
        self.close_row(line, pad)
    }

    /// One wrapped row of a segment being typed (or already typed).
    fn typed_row(
        &self,
        pad: usize,
        row: &Row,
        segment: &Segment,
        is_current_row: bool,
    ) -> Line<'static> {
        let width = self.row_width();
        let row = &row[..row.len().min(width)];
        let fill = self.options.padding_style(is_current_row);
        let (left, right) = align_row(row.len(), width, self.config.text_align);

        let mut line = self.open_row(pad);
        line.push_spaces(PADDING_X + left, fill);
        push_row_cells(&mut line, row, segment, &self.options, is_current_row);
        line.push_spaces(right + PADDING_X, fill);
        self.close_row(line, pad)
    }

    fn static_row(&self, pad: usize, row: &Row, style: Style) -> Line<'static> {
        let width = self.row_width();
        let text: String = row.iter().take(width).map(|c| display_char(c.ch)).collect();
        let len = text.chars().count();
        let fill = self.options.padding_style(false);
        let (left, right) = align_row(len, width, self.config.text_align);

        let mut line = self.open_row(pad);
        line.push_spaces(PADDING_X + left, fill);
        line.push(&text, style);
        line.push_spaces(right + PADDING_X, fill);
        self.close_row(line, pad)
    }

    fn typed_rows(
        &self,
        out: &mut Vec<Line<'static>>,
        pad: usize,
        segment: &Segment,
        active: bool,
    ) {
        let rows = wrap(&segment.chars, self.row_width());
        let current = active
            .then(|| find_row_index(&rows, segment.cursor))
            .filter(|_| self.config.highlight_row);
        for (index, row) in rows.iter().enumerate() {
            out.push(self.typed_row(pad, row, segment, current == Some(index)));
        }
    }

    fn static_rows(&self, out: &mut Vec<Line<'static>>, pad: usize, text: &str, style: Style) {
        let chars: Vec<char> = text.chars().collect();
        for row in wrap(&chars, self.row_width()) {
            out.push(self.static_row(pad, &row, style));
        }
    }

    /// A hint row centered over the box, clipped to its width.
    fn hint_row(&self, pad: usize, text: &str) -> Line<'static> {
        let box_width = self.box_width();
        let clipped: String = text.chars().take(box_width).collect();
        let len = clipped.chars().count();
        let left = (box_width - len) / 2;

        let mut line = LineBuilder::default();
        line.push_spaces(pad + left, Style::default());
        line.push(&clipped, self.hint_style());
        line.pad_to(self.viewport.width());
        line.build()
    }

    fn pause_hint_rows(&self, out: &mut Vec<Line<'static>>, pad: usize, text: &str) {
        out.push(self.blank());
        let mut line = LineBuilder::default();
        line.push_spaces(pad, Style::default());
        line.push(text, self.base_style().add_modifier(Modifier::DIM));
        line.pad_to(self.viewport.width());
        out.push(line.build());
    }

    /// Wraps the boxed body with title, borders, hints and vertical centering.
    fn framed(
        &self,
        hints: &[&str],
        body: Vec<Line<'static>>,
        pause_hint: &str,
    ) -> Vec<Line<'static>> {
        let inner = self.inner_width();
        let pad = self.horizontal_pad(self.box_width());
        let show_pause_hint = self.config.display_pause_tooltip;

        let box_height = body.len()
            + 4
            + PADDING_Y * 2
            + hints.len()
            + if show_pause_hint { 2 } else { 0 };
        let remaining = self.viewport.height().saturating_sub(box_height);
        let top = remaining / 2;
        let bottom = remaining - top;

        let mut out = Vec::with_capacity(box_height + remaining);
        out.extend((0..top).map(|_| self.blank()));
        out.extend(hints.iter().map(|hint| self.hint_row(pad, hint)));
        out.push(self.border_row(pad, inner, '-'));
        out.push(self.title_row(pad, inner));
        out.push(self.border_row(pad, inner, '-'));
        out.extend((0..PADDING_Y).map(|_| self.padding_row(pad, inner)));
        out.extend(body);
        out.extend((0..PADDING_Y).map(|_| self.padding_row(pad, inner)));
        out.push(self.border_row(pad, inner, '_'));
        if show_pause_hint {
            self.pause_hint_rows(&mut out, pad, pause_hint);
        }
        out.extend((0..bottom).map(|_| self.blank()));
        out
    }

    /// Plain or fetched text. `hints` are the action lines shown above the
    /// box while awaiting the next fetch.
    pub fn typing_screen(&self, segment: &Segment, hints: &[&str]) -> Vec<Line<'static>> {
        let pad = self.horizontal_pad(self.box_width());
        let mut body = Vec::new();
        self.typed_rows(&mut body, pad, segment, true);
        self.framed(hints, body, PAUSE_HINT)
    }

    pub fn deck_screen(&self, view: &DeckView<'_>) -> Vec<Line<'static>> {
        let pad = self.horizontal_pad(self.box_width());
        let base = self.base_style();
        let mut body = Vec::new();

        for (position, card) in view.cards.iter().enumerate() {
            let is_active = position == 0;

            match (is_active, view.phase, view.completed_command) {
                (true, CardPhase::Command, _) => {
                    self.typed_rows(&mut body, pad, view.active, true);
                }
                (true, CardPhase::Description, Some(done)) => {
                    self.typed_rows(&mut body, pad, done, false);
                }
                _ => self.static_rows(&mut body, pad, &card.command, base),
            }

            if is_active && view.phase == CardPhase::Description {
                self.typed_rows(&mut body, pad, view.active, true);
            } else {
                self.static_rows(&mut body, pad, &card.description, base);
            }

            if position + 1 < view.cards.len() {
                self.static_rows(&mut body, pad, "", base);
            }
        }

        if view.show_next_hint {
            self.static_rows(&mut body, pad, "", base);
            self.static_rows(&mut body, pad, NEXT_COMMAND_HINT, self.hint_style());
        }

        self.framed(&[], body, DECK_PAUSE_HINT)
    }

    /// Dialog sized to its content, with live counters.
    pub fn pause_screen(&self, stats: &SessionStats) -> Vec<Line<'static>> {
        let mut content: Vec<String> = ["PAUSED", " ", "ENTER = resume", "    Q = quit", ""]
            .iter()
            .map(|s| s.to_string())
            .collect();
        content.extend(pause_stats_lines(stats));

        let content_width = content
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(1)
            .max(1);
        let inner = content_width + PADDING_X * 2;
        let pad = self.horizontal_pad(inner + 2);
        let box_height = content.len() + 2 + PADDING_Y * 2;
        let remaining = self.viewport.height().saturating_sub(box_height);
        let top = remaining / 2;
        let bottom = remaining - top;

        let fill = self.options.padding_style(false);
        let mut out = Vec::with_capacity(self.viewport.height().max(box_height));
        out.extend((0..top).map(|_| self.blank()));
        out.push(self.border_row(pad, inner, '-'));
        out.extend((0..PADDING_Y).map(|_| self.padding_row(pad, inner)));
        for text in &content {
            let clipped: String = text.chars().take(content_width).collect();
            let mut line = self.open_row(pad);
            line.push_spaces(PADDING_X, fill);
            line.push(&clipped, self.base_style());
            line.push_spaces(content_width - clipped.chars().count() + PADDING_X, fill);
            out.push(self.close_row(line, pad));
        }
        out.extend((0..PADDING_Y).map(|_| self.padding_row(pad, inner)));
        out.push(self.border_row(pad, inner, '-'));
        out.extend((0..bottom).map(|_| self.blank()));
        out
    }

    /// Results box, action list and an optional status line.
    pub fn stats_screen(&self, stats: &SessionStats, status: Option<&str>) -> Vec<Line<'static>> {
        let mut text = stats_box_lines(stats);
        text.push(String::new());
        text.extend(
            [
                "ACTIONS (press key to execute)",
                " R = Retry",
                " S = Save",
                " Q = Quit",
            ]
            .iter()
            .map(|s| s.to_string()),
        );
        if let Some(status) = status {
            text.push(String::new());
            text.push(status.to_string());
        }
        self.centered_block(&text)
    }

    /// Ready and Loading notices.
    pub fn message_screen(&self, message: &str) -> Vec<Line<'static>> {
        self.centered_block(&[message.to_string()])
    }

    /// Left-aligned block of text placed in the middle of the viewport.
    fn centered_block(&self, text: &[String]) -> Vec<Line<'static>> {
        let width = text.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let pad = self.viewport.width().saturating_sub(width) / 2;
        let top = self.viewport.height().saturating_sub(text.len()) / 2;

        let mut out: Vec<Line<'static>> = (0..top).map(|_| self.blank()).collect();
        for row in text {
            let mut line = LineBuilder::default();
            line.push_spaces(pad, Style::default());
            line.push(row, self.base_style());
            out.push(line.build());
        }
        out
    }
}
