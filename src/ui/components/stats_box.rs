use crate::session::stats::{
    SessionStats, format_count, format_dual_rate, format_duration, format_percent, format_rate,
};

/// Inner width of the results box.
pub const STATS_WIDTH: usize = 26;
const LABEL_WIDTH: usize = 11;

/// Centers `text` in `width` columns, clipping when it is too long.
pub fn center_text(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.chars().take(width).collect();
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

fn rule() -> String {
    format!("| {} |", "-".repeat(STATS_WIDTH))
}

fn header(title: &str) -> String {
    format!("| {} |", center_text(title, STATS_WIDTH))
}

/// Label left, value right; values too wide keep their rightmost columns.
fn stat(label: &str, value: &str) -> String {
    let value_width = STATS_WIDTH - LABEL_WIDTH;
    let len = value.chars().count();
    let clipped: String = value.chars().skip(len.saturating_sub(value_width)).collect();
    format!("| {label:<LABEL_WIDTH$}{clipped:>value_width$} |")
}

pub fn stats_box_lines(stats: &SessionStats) -> Vec<String> {
    vec![
        rule(),
        header("STATS"),
        rule(),
        stat("WPM", &format_dual_rate(stats.wpm(), stats.actual_wpm())),
        stat("CPM", &format_dual_rate(stats.cpm(), stats.actual_cpm())),
        stat("ACC", &format_percent(stats.accuracy())),
        stat("TIME", &format_duration(stats.duration_ms)),
        rule(),
        header("RESULTS"),
        rule(),
        stat("PASS", &stats.pass.to_string()),
        stat("MISS", &stats.miss.to_string()),
        stat("FAIL", &stats.fail.to_string()),
        rule(),
        header("CHAR COUNT"),
        rule(),
        stat("CHAR", &stats.character_keys.to_string()),
        stat("NON-CHAR", &stats.non_character_keys.to_string()),
        stat("DELETE", &stats.delete_keys.to_string()),
        rule(),
        stat("TOTAL", &stats.total_keys.to_string()),
        rule(),
    ]
}

/// Compact counters shown on the pause overlay.
pub fn pause_stats_lines(stats: &SessionStats) -> Vec<String> {
    vec![
        format!("P: {}", format_count(stats.pass)),
        format!("M: {}", format_count(stats.miss)),
        format!("F: {}", format_count(stats.fail)),
        format!("WPM: {}", format_rate(stats.wpm())),
        format!("CPM: {}", format_rate(stats.cpm())),
    ]
}
