//! Attributed-comment line parsing.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{Comment, UserRef};

/// Matches "Name: remark" on the first colon only. The prefix may contain
/// arbitrary punctuation, so "Note" before a colon is still read as a user
/// name. That heuristic boundary is part of the contract.
fn comment_shape() -> &'static Regex {
    static COMMENT_SHAPE: OnceLock<Regex> = OnceLock::new();
    COMMENT_SHAPE
        .get_or_init(|| Regex::new(r"^([^:]+):\s*(.+)$").expect("Invalid comment regex"))
}

/// Whether a line has the "Name: remark" shape at all.
///
/// Used by the instruction disambiguator to route misplaced remarks out of
/// preparation steps.
pub fn looks_like_comment(line: &str) -> bool {
    comment_shape().is_match(line)
}

/// Parse one trimmed, non-empty line into a comment.
///
/// Unattributed lines are credited to `default_author`, an editorial policy
/// carried in configuration rather than hard-coded here.
pub fn parse_line(line: &str, default_author: &str) -> Comment {
    if let Some(caps) = comment_shape().captures(line) {
        return Comment {
            user: Some(UserRef::Name(caps[1].trim().to_string())),
            text: caps[2].trim().to_string(),
        };
    }

    Comment {
        user: Some(UserRef::Name(default_author.to_string())),
        text: line.trim().to_string(),
    }
}
