pub mod clock;
pub mod deck;
pub mod input;
pub mod segment;
pub mod stats;
pub mod style;
pub mod wrap;
