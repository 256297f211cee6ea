use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandCard {
    pub id: i64,
    pub command: String,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardPhase {
    Command,
    Description,
}

/// What finishing the active half of a card leads to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CardStep {
    /// Type the description of the same card next.
    Description(String),
    /// Card done; wait for an explicit advance.
    AwaitNext,
    /// Last card done.
    Finished,
}

/// Ordered cards plus the position of the one being typed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckProgress {
    cards: Vec<CommandCard>,
    index: usize,
    phase: CardPhase,
}

impl DeckProgress {
    pub fn new(cards: Vec<CommandCard>) -> Self {
        Self {
            cards,
            index: 0,
            phase: CardPhase::Command,
        }
    }

    /// Order is fixed for the session once shuffled.
    pub fn shuffled<R: Rng + ?Sized>(mut cards: Vec<CommandCard>, rng: &mut R) -> Self {
        cards.shuffle(rng);
        Self::new(cards)
    }

    pub fn cards(&self) -> &[CommandCard] {
        &self.cards
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn phase(&self) -> CardPhase {
        self.phase
    }

    pub fn current(&self) -> Option<&CommandCard> {
        self.cards.get(self.index)
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.cards.len()
    }

    /// Cards shown on screen, starting from the current one.
    pub fn visible(&self, per_screen: usize) -> &[CommandCard] {
        let start = self.index.min(self.cards.len());
        let end = (start + per_screen.max(1)).min(self.cards.len());
        &self.cards[start..end]
    }

    pub fn rewind(&mut self) {
        self.index = 0;
        self.phase = CardPhase::Command;
    }

    /// Text for the active half of the current card.
    pub fn active_text(&self) -> String {
        match (self.current(), self.phase) {
            (Some(card), CardPhase::Command) => card.command.clone(),
            (Some(card), CardPhase::Description) => card.description.clone(),
            (None, _) => String::new(),
        }
    }

    pub fn complete_active(&mut self) -> CardStep {
        match self.phase {
            CardPhase::Command => {
                self.phase = CardPhase::Description;
                CardStep::Description(self.active_text())
            }
            CardPhase::Description if self.is_last() => CardStep::Finished,
            CardPhase::Description => CardStep::AwaitNext,
        }
    }

    /// Moves to the next card's command; `None` when there is no next card.
    pub fn advance(&mut self) -> Option<String> {
        if self.is_last() {
            return None;
        }
        self.index += 1;
        self.phase = CardPhase::Command;
        Some(self.active_text())
    }
}
