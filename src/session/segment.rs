/// Outcome of one character keystroke applied to a segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attempt {
    pub matched: bool,
    /// 1-based attempt count at the typed position.
    pub attempt: u32,
    pub completed: bool,
}

/// The stretch of text currently being typed.
///
/// `attempts` and `successes` always have the same length as `chars`, and a
/// position with no attempts is never marked successful.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Segment {
    pub chars: Vec<char>,
    pub cursor: usize,
    pub attempts: Vec<u32>,
    pub successes: Vec<bool>,
}

impl Segment {
    pub fn new(chars: Vec<char>) -> Self {
        let len = chars.len();
        Self {
            chars,
            cursor: 0,
            attempts: vec![0; len],
            successes: vec![false; len],
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(text.chars().collect())
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.chars.len()
    }

    pub fn expected(&self) -> Option<char> {
        self.chars.get(self.cursor).copied()
    }

    /// Records a keystroke at the cursor and advances it. Returns `None` once
    /// the segment is complete.
    pub fn type_char(&mut self, matched: impl FnOnce(char) -> bool) -> Option<Attempt> {
        let expected = self.expected()?;
        let pos = self.cursor;
        let matched = matched(expected);

        self.attempts[pos] += 1;
        self.successes[pos] = matched;
        self.cursor += 1;

        Some(Attempt {
            matched,
            attempt: self.attempts[pos],
            completed: self.is_complete(),
        })
    }

    pub fn step_back(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }
}
