//! Text fragments shown next to the charts.

use crate::config::{DisplayOptions, Percentage};

pub const TITLE: &str = "Poll Results";
pub const EMPTY_STATE_MESSAGE: &str = "No votes yet";
/// Between the vote count and the percentage of a combined label.
pub const SEPARATOR: &str = " · ";

/// "vote" for exactly one, "votes" otherwise (including zero).
pub fn votes_word(count: u64) -> &'static str {
    if count == 1 {
        "vote"
    } else {
        "votes"
    }
}

pub fn vote_count_label(count: u64) -> String {
    format!("{} {}", count, votes_word(count))
}

pub fn percentage_label(pct: &Percentage) -> String {
    format!("{}%", pct)
}

/// `<votes> vote(s) · <percentage>%`, with either part dropped when hidden.
///
/// Returns `None` when both parts are hidden.
pub fn combined_label(votes: u64, pct: &Percentage, display: &DisplayOptions) -> Option<String> {
    match (display.show_vote_count, display.show_percentage) {
        (true, true) => Some(format!(
            "{}{}{}",
            vote_count_label(votes),
            SEPARATOR,
            percentage_label(pct)
        )),
        (true, false) => Some(vote_count_label(votes)),
        (false, true) => Some(percentage_label(pct)),
        (false, false) => None,
    }
}

/// The total shown in the middle of a circular chart.
pub fn center_label(total_votes: u64) -> String {
    vote_count_label(total_votes)
}

/// The total shown under a linear chart.
pub fn total_votes_caption(total_votes: u64) -> String {
    format!("Total votes: {}", total_votes)
}
