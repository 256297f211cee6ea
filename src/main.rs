use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use crossterm::event::KeyEventKind;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::Paragraph;
use tracing::{debug, error, info, warn};

use typk::app::App;
use typk::config::Config;
use typk::event::{AppEvent, EventHandler};
use typk::logging;
use typk::source::deck_loader::{
    bundled_deck_names, is_deck_path, load_bundled_deck, load_deck_file,
};
use typk::source::fetch::HttpFetcher;
use typk::source::text::{LOREM_TEXT, load_text_file};
use typk::source::{LoadError, TextSource};
use typk::ui::layout::Viewport;

#[derive(Parser)]
#[command(name = "typk", version, about = "Terminal typing practice")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start a practice session
    Run(RunArgs),
    /// List the bundled command decks
    Decks,
}

#[derive(Args)]
struct RunArgs {
    #[arg(
        short,
        long,
        conflicts_with_all = ["deck", "fetch"],
        help = "Text file to type; .json files are command decks"
    )]
    file: Option<PathBuf>,

    #[arg(short, long, conflicts_with = "fetch", help = "Bundled command deck (see `typk decks`)")]
    deck: Option<String>,

    #[arg(long, value_name = "URL", help = "Fetch text to type from a URL")]
    fetch: Option<String>,

    #[arg(short, long, help = "Config file (default: <config dir>/typk/config.toml)")]
    config: Option<PathBuf>,

    #[arg(long, help = "Shuffle command deck order")]
    shuffle: bool,

    #[arg(long, value_name = "N", help = "Characters per row (20-60)")]
    max_row_char: Option<usize>,

    #[arg(long, help = "Disable backspace")]
    no_delete: bool,

    #[arg(long, value_name = "PATH", help = "CSV file that saved results are appended to")]
    stats_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Decks => {
            for name in bundled_deck_names() {
                println!("{name}");
            }
            Ok(())
        }
        Command::Run(args) => run(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    if let Err(err) = logging::init() {
        eprintln!("typk: logging disabled: {err:#}");
    }

    let config = load_config(&args);
    let source = build_source(&args)
        .inspect_err(|err| error!(error = %err, "failed to load content"))?;
    info!(source = ?source, "content loaded");

    let mut app = App::new(config, source);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        error!(error = %err, "terminal loop failed");
    }
    result
}

/// Bad settings never stop a session: report once and use defaults.
fn load_config(args: &RunArgs) -> Config {
    let path = args.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load_from(&path).unwrap_or_else(|err| {
        warn!(error = %err, "using default settings");
        eprintln!("typk: {err:#}; using default settings");
        Config::default()
    });

    if let Some(width) = args.max_row_char {
        config.set_max_row_char(width);
    }
    if args.no_delete {
        config.allow_delete = false;
    }
    if args.shuffle {
        config.shuffle_deck = true;
    }
    if let Some(path) = &args.stats_file {
        config.stats_file = path.clone();
    }
    config
}

fn build_source(args: &RunArgs) -> Result<TextSource, LoadError> {
    if let Some(path) = &args.file {
        if is_deck_path(path) {
            return Ok(TextSource::Deck(load_deck_file(path)?));
        }
        return Ok(TextSource::Plain(load_text_file(path)?));
    }
    if let Some(name) = &args.deck {
        return Ok(TextSource::Deck(load_bundled_deck(name)?));
    }
    if let Some(url) = &args.fetch {
        return Ok(TextSource::Fetch(Arc::new(HttpFetcher::new(url.clone()))));
    }
    Ok(TextSource::Plain(LOREM_TEXT.to_string()))
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            let lines = app.render_lines(Viewport::from_rect(area));
            frame.render_widget(Paragraph::new(lines), area);
        })?;

        match events.next()? {
            // Only presses count; releases and repeats would inflate the stats.
            AppEvent::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
            AppEvent::Key(_) => {}
            AppEvent::Tick => {
                app.poll_fetch();
            }
            AppEvent::Resize(width, height) => debug!(width, height, "terminal resized"),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
