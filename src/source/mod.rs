//! Where the text to type comes from.

pub mod deck_loader;
pub mod fetch;
pub mod text;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::session::deck::CommandCard;
use fetch::TextFetcher;

/// Content errors are fatal: they are reported before any session starts.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse command deck {name}: {source}")]
    DeckJson {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Command deck {name}: {message}")]
    InvalidDeck { name: String, message: String },

    #[error("Unknown bundled deck '{0}' (try `typk decks`)")]
    UnknownDeck(String),

    #[error("{0} contains no text to type")]
    EmptyText(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceMode {
    PlainText,
    CommandDeck,
    FetchedText,
}

/// Content handed to the session controller once, at startup.
#[derive(Clone)]
pub enum TextSource {
    Plain(String),
    Deck(Vec<CommandCard>),
    Fetch(Arc<dyn TextFetcher>),
}

impl TextSource {
    pub fn mode(&self) -> SourceMode {
        match self {
            TextSource::Plain(_) => SourceMode::PlainText,
            TextSource::Deck(_) => SourceMode::CommandDeck,
            TextSource::Fetch(_) => SourceMode::FetchedText,
        }
    }
}

impl fmt::Debug for TextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextSource::Plain(text) => write!(f, "Plain({} chars)", text.chars().count()),
            TextSource::Deck(cards) => write!(f, "Deck({} cards)", cards.len()),
            TextSource::Fetch(fetcher) => write!(f, "Fetch({})", fetcher.describe()),
        }
    }
}
