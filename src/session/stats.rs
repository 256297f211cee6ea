use serde::{Deserialize, Serialize};

/// Keystroke counters for one session.
///
/// `delete_keys` is tracked apart from `non_character_keys`, so
/// `total_keys == character_keys + non_character_keys + delete_keys`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub duration_ms: u64,
    pub pass: u64,
    pub miss: u64,
    pub fail: u64,
    pub character_keys: u64,
    pub non_character_keys: u64,
    pub delete_keys: u64,
    pub total_keys: u64,
}

impl SessionStats {
    pub fn initial() -> Self {
        Self::default()
    }

    /// `attempt` is the 1-based attempt number at the typed position.
    pub fn record_character(&mut self, matched: bool, attempt: u32) {
        self.character_keys += 1;
        self.total_keys += 1;
        match (matched, attempt) {
            (true, 1) => self.pass += 1,
            (true, _) => self.miss += 1,
            (false, _) => self.fail += 1,
        }
    }

    pub fn record_non_character(&mut self) {
        self.non_character_keys += 1;
        self.total_keys += 1;
    }

    pub fn record_delete(&mut self) {
        self.delete_keys += 1;
        self.total_keys += 1;
    }

    /// Snapshot with the elapsed active time filled in.
    pub fn finalize(&self, duration_ms: u64) -> Self {
        Self {
            duration_ms,
            ..*self
        }
    }

    fn minutes(&self) -> f64 {
        self.duration_ms as f64 / 60_000.0
    }

    fn per_minute(&self, count: u64) -> f64 {
        let minutes = self.minutes();
        if minutes <= 0.0 {
            return 0.0;
        }
        count as f64 / minutes
    }

    pub fn wpm(&self) -> f64 {
        self.per_minute(self.character_keys) / 5.0
    }

    /// WPM counting only first-try-correct characters.
    pub fn actual_wpm(&self) -> f64 {
        self.per_minute(self.pass) / 5.0
    }

    pub fn cpm(&self) -> f64 {
        self.per_minute(self.character_keys)
    }

    pub fn actual_cpm(&self) -> f64 {
        self.per_minute(self.pass)
    }

    /// Fraction in `[0, 1]`; corrected characters count as accurate.
    pub fn accuracy(&self) -> f64 {
        let total = self.pass + self.miss + self.fail;
        if total == 0 {
            return 0.0;
        }
        (self.pass + self.miss) as f64 / total as f64
    }
}

/// `mm:ss`, truncating partial seconds.
pub fn format_duration(duration_ms: u64) -> String {
    let total_secs = duration_ms / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

pub fn format_rate(value: f64) -> String {
    format!("{:03}", value.round().max(0.0) as u64)
}

pub fn format_count(value: u64) -> String {
    format!("{value:->3}")
}

pub fn format_dual_rate(value: f64, actual: f64) -> String {
    format!("{}/{}", format_rate(value), format_rate(actual))
}

pub fn format_percent(value: f64) -> String {
    format!("{}%", (value * 100.0).round() as u64)
}
