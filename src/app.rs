use std::mem;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use ratatui::text::Line;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::session::clock::{Clock, SessionTimer, SystemClock};
use crate::session::deck::{CardStep, CommandCard, DeckProgress};
use crate::session::input::{self, KeyClass};
use crate::session::segment::Segment;
use crate::session::stats::SessionStats;
use crate::source::fetch::{FetchError, TextFetcher};
use crate::source::text::{flatten_whitespace, prepare_text};
use crate::source::{SourceMode, TextSource};
use crate::store::csv_log::StatsLog;
use crate::ui::layout::{DeckView, LayoutBuilder, Viewport};

pub const READY_TEXT: &str = "Hit RETURN to start...";
pub const LOADING_TEXT: &str = "Fetching...";
pub const FETCH_HINTS: [&str; 2] = ["ESC = Exit to stats", "ENTER = Fetch another"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Ready,
    Loading,
    Typing,
    Paused,
    Stats,
}

type FetchResult = Result<String, FetchError>;

/// Owns one practice run and turns keystrokes and fetch results into
/// screen transitions.
pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub segment: Segment,
    pub stats: SessionStats,
    pub status_line: Option<String>,
    pub should_quit: bool,
    /// A finished segment is waiting for an explicit "next" action.
    pub awaiting_next: bool,
    pub deck: Option<DeckProgress>,
    /// The command half of the current card once it has been typed.
    pub completed_command: Option<Segment>,
    source: TextSource,
    timer: SessionTimer,
    clock: Box<dyn Clock>,
    fetch_rx: Option<Receiver<FetchResult>>,
    stats_log: StatsLog,
}

impl App {
    pub fn new(config: Config, source: TextSource) -> Self {
        Self::with_clock(config, source, Box::new(SystemClock))
    }

    pub fn with_clock(config: Config, source: TextSource, clock: Box<dyn Clock>) -> Self {
        let deck = match &source {
            TextSource::Deck(cards) if config.shuffle_deck => Some(DeckProgress::shuffled(
                typable_cards(cards),
                &mut SmallRng::from_entropy(),
            )),
            TextSource::Deck(cards) => Some(DeckProgress::new(typable_cards(cards))),
            _ => None,
        };
        let stats_log = StatsLog::new(config.stats_file.clone());

        Self {
            screen: AppScreen::Ready,
            config,
            segment: Segment::default(),
            stats: SessionStats::initial(),
            status_line: None,
            should_quit: false,
            awaiting_next: false,
            deck,
            completed_command: None,
            source,
            timer: SessionTimer::default(),
            clock,
            fetch_rx: None,
            stats_log,
        }
    }

    pub fn mode(&self) -> SourceMode {
        self.source.mode()
    }

    pub fn is_fetching(&self) -> bool {
        self.fetch_rx.is_some()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        match self.screen {
            AppScreen::Ready => {
                if key.code == KeyCode::Enter {
                    self.start_session();
                }
            }
            AppScreen::Loading => {}
            AppScreen::Typing => self.handle_typing_key(key),
            AppScreen::Paused => match key.code {
                KeyCode::Enter => self.resume(),
                KeyCode::Char(ch) if ch.eq_ignore_ascii_case(&'q') => self.quit(),
                _ => {}
            },
            AppScreen::Stats => match key.code {
                KeyCode::Char(ch) => match ch.to_ascii_lowercase() {
                    'r' => self.retry(),
                    's' => self.save_stats(),
                    'q' => self.quit(),
                    _ => {}
                },
                _ => {}
            },
        }
    }

    fn quit(&mut self) {
        debug!(screen = ?self.screen, "quit requested");
        self.should_quit = true;
    }

    pub fn start_session(&mut self) {
        self.stats = SessionStats::initial();
        self.status_line = None;
        self.awaiting_next = false;
        self.completed_command = None;
        self.timer = SessionTimer::start(self.clock.now());
        info!(mode = ?self.mode(), "session started");

        match &self.source {
            TextSource::Plain(text) => {
                let text = prepare_text(text, self.config.char_case);
                if text.is_empty() {
                    warn!("nothing to type");
                    self.segment = Segment::default();
                    self.complete_session();
                    return;
                }
                self.segment = Segment::from_text(&text);
                self.screen = AppScreen::Typing;
            }
            TextSource::Deck(_) => {
                if let Some(deck) = self.deck.as_mut() {
                    deck.rewind();
                    self.segment = Segment::from_text(&deck.active_text());
                }
                self.screen = AppScreen::Typing;
            }
            TextSource::Fetch(fetcher) => {
                let fetcher = Arc::clone(fetcher);
                self.begin_fetch(fetcher);
            }
        }
    }

    /// Starts the one outstanding fetch on a worker thread. Time spent
    /// loading does not count as typing time.
    fn begin_fetch(&mut self, fetcher: Arc<dyn TextFetcher>) {
        if self.fetch_rx.is_some() {
            return;
        }
        info!(source = %fetcher.describe(), "fetching text");

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(fetcher.fetch());
        });

        self.fetch_rx = Some(rx);
        self.awaiting_next = false;
        self.timer.pause(self.clock.now());
        self.screen = AppScreen::Loading;
    }

    fn refetch(&mut self) {
        if let TextSource::Fetch(fetcher) = &self.source {
            let fetcher = Arc::clone(fetcher);
            self.begin_fetch(fetcher);
        }
    }

    /// Applies a finished fetch, if any. Returns true when one was applied.
    pub fn poll_fetch(&mut self) -> bool {
        let Some(rx) = &self.fetch_rx else {
            return false;
        };
        match rx.try_recv() {
            Ok(result) => self.finish_fetch(result),
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                self.finish_fetch(Err(FetchError::Transport("fetch worker stopped".to_string())))
            }
        }
        true
    }

    /// Blocks up to `timeout` for the outstanding fetch.
    pub fn wait_for_fetch(&mut self, timeout: Duration) -> bool {
        let Some(rx) = &self.fetch_rx else {
            return false;
        };
        match rx.recv_timeout(timeout) {
            Ok(result) => self.finish_fetch(result),
            Err(RecvTimeoutError::Timeout) => return false,
            Err(RecvTimeoutError::Disconnected) => {
                self.finish_fetch(Err(FetchError::Transport("fetch worker stopped".to_string())))
            }
        }
        true
    }

    pub fn finish_fetch(&mut self, result: FetchResult) {
        self.fetch_rx = None;
        self.timer.resume(self.clock.now());

        let prepared = result.and_then(|text| {
            let text = prepare_text(&text, self.config.char_case);
            if text.is_empty() {
                Err(FetchError::Empty)
            } else {
                Ok(text)
            }
        });

        match prepared {
            Ok(text) => {
                debug!(chars = text.chars().count(), "fetched text ready");
                self.segment = Segment::from_text(&text);
                self.awaiting_next = false;
                self.screen = AppScreen::Typing;
            }
            Err(err) => {
                warn!(error = %err, "fetch failed");
                self.complete_session();
                self.status_line = Some(format!("Fetch failed: {err}"));
            }
        }
    }

    fn handle_typing_key(&mut self, key: KeyEvent) {
        if self.awaiting_next {
            match (self.mode(), key.code) {
                (SourceMode::FetchedText, KeyCode::Enter) => self.refetch(),
                (SourceMode::FetchedText, KeyCode::Esc) => self.complete_session(),
                (SourceMode::CommandDeck, KeyCode::Enter) => self.advance_card(),
                _ => {}
            }
            return;
        }

        if key.code == KeyCode::Esc {
            self.pause();
            return;
        }

        if self.segment.is_complete() {
            return;
        }

        match input::classify(&key) {
            KeyClass::Delete => {
                self.stats.record_delete();
                if self.config.allow_delete {
                    self.segment.step_back();
                }
            }
            KeyClass::Char(ch) => {
                let case_sensitive = self.config.case_sensitive;
                let attempt = self
                    .segment
                    .type_char(|expected| input::matches_expected(ch, expected, case_sensitive));
                if let Some(attempt) = attempt {
                    self.stats.record_character(attempt.matched, attempt.attempt);
                    if attempt.completed {
                        self.complete_segment();
                    }
                }
            }
            KeyClass::Other => self.stats.record_non_character(),
        }
    }

    fn complete_segment(&mut self) {
        match self.mode() {
            SourceMode::PlainText => self.complete_session(),
            SourceMode::FetchedText => {
                debug!("fetched segment complete");
                self.awaiting_next = true;
            }
            SourceMode::CommandDeck => {
                let Some(deck) = self.deck.as_mut() else {
                    self.complete_session();
                    return;
                };
                match deck.complete_active() {
                    CardStep::Description(text) => {
                        let done = mem::replace(&mut self.segment, Segment::from_text(&text));
                        self.completed_command = Some(done);
                    }
                    CardStep::AwaitNext => {
                        debug!(card = deck.index(), "card complete");
                        self.awaiting_next = true;
                    }
                    CardStep::Finished => self.complete_session(),
                }
            }
        }
    }

    fn advance_card(&mut self) {
        let next = self.deck.as_mut().and_then(DeckProgress::advance);
        match next {
            Some(command) => {
                self.segment = Segment::from_text(&command);
                self.completed_command = None;
                self.awaiting_next = false;
            }
            None => self.complete_session(),
        }
    }

    fn pause(&mut self) {
        self.timer.pause(self.clock.now());
        self.screen = AppScreen::Paused;
        debug!("paused");
    }

    fn resume(&mut self) {
        self.timer.resume(self.clock.now());
        self.screen = AppScreen::Typing;
        debug!(paused_ms = self.timer.paused_total().as_millis() as u64, "resumed");
    }

    fn complete_session(&mut self) {
        let duration_ms = self.timer.elapsed_ms(self.clock.now());
        self.stats = self.stats.finalize(duration_ms);
        self.awaiting_next = false;
        self.screen = AppScreen::Stats;
        info!(
            duration_ms,
            pass = self.stats.pass,
            miss = self.stats.miss,
            fail = self.stats.fail,
            "session complete"
        );
    }

    fn retry(&mut self) {
        self.status_line = None;
        self.screen = AppScreen::Ready;
    }

    fn save_stats(&mut self) {
        match self.stats_log.append(&self.stats) {
            Ok(path) => {
                info!(path = %path.display(), "stats saved");
                self.status_line = Some(format!("Saved to {}", path.display()));
            }
            Err(err) => {
                warn!(error = %err, "saving stats failed");
                self.status_line = Some(format!("Save failed: {err:#}"));
            }
        }
    }

    /// Counters with the duration measured up to now.
    pub fn live_stats(&self) -> SessionStats {
        self.stats.finalize(self.timer.elapsed_ms(self.clock.now()))
    }

    pub fn render_lines(&self, viewport: Viewport) -> Vec<Line<'static>> {
        let layout = LayoutBuilder::new(&self.config, viewport);
        match self.screen {
            AppScreen::Ready => layout.message_screen(READY_TEXT),
            AppScreen::Loading => layout.message_screen(LOADING_TEXT),
            AppScreen::Typing => match &self.deck {
                Some(deck) => layout.deck_screen(&DeckView {
                    cards: deck.visible(self.config.commands_per_screen),
                    phase: deck.phase(),
                    active: &self.segment,
                    completed_command: self.completed_command.as_ref(),
                    show_next_hint: self.config.display_tooltips && self.awaiting_next,
                }),
                None => {
                    let hints: &[&str] =
                        if self.mode() == SourceMode::FetchedText && self.awaiting_next {
                            &FETCH_HINTS
                        } else {
                            &[]
                        };
                    layout.typing_screen(&self.segment, hints)
                }
            },
            AppScreen::Paused => layout.pause_screen(&self.live_stats()),
            AppScreen::Stats => layout.stats_screen(&self.stats, self.status_line.as_deref()),
        }
    }
}

/// Card text with line breaks and tabs flattened so every character has a
/// key that types it.
fn typable_cards(cards: &[CommandCard]) -> Vec<CommandCard> {
    cards
        .iter()
        .map(|card| CommandCard {
            id: card.id,
            command: flatten_whitespace(&card.command),
            description: flatten_whitespace(&card.description),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Instant;

    use super::*;

    #[derive(Clone)]
    struct TestClock(Rc<Cell<Instant>>);

    impl Clock for TestClock {
        fn now(&self) -> Instant {
            self.0.get()
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn plain_app(text: &str) -> (App, Rc<Cell<Instant>>) {
        let now = Rc::new(Cell::new(Instant::now()));
        let app = App::with_clock(
            Config::default(),
            TextSource::Plain(text.to_string()),
            Box::new(TestClock(now.clone())),
        );
        (app, now)
    }

    #[test]
    fn test_ready_accepts_only_enter() {
        let (mut app, _) = plain_app("ab");
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, AppScreen::Ready);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, AppScreen::Typing);
        assert_eq!(app.segment.text(), "ab");
    }

    #[test]
    fn test_other_keys_only_count() {
        let (mut app, _) = plain_app("ab");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        app.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
        assert_eq!(app.segment.cursor, 0);
        assert_eq!(app.stats.non_character_keys, 4);
        assert_eq!(app.stats.total_keys, 4);
        assert_eq!(app.stats.character_keys, 0);
    }

    #[test]
    fn test_delete_moves_cursor_when_allowed() {
        let (mut app, _) = plain_app("abc");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "x");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.segment.cursor, 0);
        type_str(&mut app, "a");
        assert_eq!(app.stats.miss, 1);
        assert_eq!(app.stats.fail, 1);
        assert_eq!(app.stats.delete_keys, 1);
        assert_eq!(app.stats.total_keys, 3);
    }

    #[test]
    fn test_case_insensitive_matching() {
        let (mut app, _) = plain_app("Ab");
        app.config.case_sensitive = false;
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "aB");
        assert_eq!(app.screen, AppScreen::Stats);
        assert_eq!(app.stats.pass, 2);
    }

    #[test]
    fn test_char_case_applied_to_plain_text() {
        let (mut app, _) = plain_app("Hello");
        app.config.char_case = crate::config::CharCase::Upper;
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.segment.text(), "HELLO");
    }

    #[test]
    fn test_blank_plain_text_goes_straight_to_stats() {
        let (mut app, _) = plain_app("  \n\t ");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, AppScreen::Stats);
        assert!(app.segment.is_empty());
        assert_eq!(app.stats.duration_ms, 0);

        type_str(&mut app, "abc");
        assert_eq!(app.stats.total_keys, 0);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.screen, AppScreen::Ready);
    }

    #[test]
    fn test_paused_ignores_other_keys() {
        let (mut app, _) = plain_app("abc");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, AppScreen::Paused);
        type_str(&mut app, "ab");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, AppScreen::Paused);
        assert_eq!(app.stats.total_keys, 0);
        press(&mut app, KeyCode::Char('Q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_anywhere() {
        let (mut app, _) = plain_app("abc");
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_retry_returns_to_ready_and_resets() {
        let (mut app, now) = plain_app("a");
        press(&mut app, KeyCode::Enter);
        now.set(now.get() + Duration::from_secs(3));
        type_str(&mut app, "a");
        assert_eq!(app.stats.duration_ms, 3000);

        press(&mut app, KeyCode::Char('R'));
        assert_eq!(app.screen, AppScreen::Ready);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.stats, SessionStats::initial());
        assert_eq!(app.segment.cursor, 0);
    }

    #[test]
    fn test_live_stats_exclude_current_pause() {
        let (mut app, now) = plain_app("abc");
        press(&mut app, KeyCode::Enter);
        now.set(now.get() + Duration::from_secs(2));
        press(&mut app, KeyCode::Esc);
        now.set(now.get() + Duration::from_secs(10));
        assert_eq!(app.live_stats().duration_ms, 2000);
    }

    #[test]
    fn test_render_each_screen() {
        let (mut app, _) = plain_app("ab");
        let viewport = Viewport::FALLBACK;
        let has = |lines: &[Line<'_>], needle: &str| {
            lines
                .iter()
                .any(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>().contains(needle))
        };

        assert!(has(&app.render_lines(viewport), READY_TEXT));
        press(&mut app, KeyCode::Enter);
        assert!(has(&app.render_lines(viewport), "TYPK - CLI"));
        press(&mut app, KeyCode::Esc);
        assert!(has(&app.render_lines(viewport), "PAUSED"));
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "ab");
        assert!(has(&app.render_lines(viewport), "ACTIONS (press key to execute)"));
    }
}
