//! Splits an instructions block into duration, steps and misplaced comments.

use crate::models::Comment;
use crate::parsing::comment;

/// Time-unit words recognized by the duration sniff. German corpus
/// constants; changing them (or the length cutoff) changes which first
/// lines are claimed as durations, so they are kept exactly as observed.
const DURATION_TOKENS: [&str; 4] = ["minute", "stunde", "std", "min"];

/// A first line longer than this is prose, not a duration phrase.
const DURATION_MAX_CHARS: usize = 40;

/// Outcome of disambiguating one instructions block.
#[derive(Debug, Default, PartialEq)]
pub struct InstructionBlock {
    pub duration: Option<String>,
    pub steps: Vec<String>,
    pub comments: Vec<Comment>,
}

fn is_duration_phrase(line: &str) -> bool {
    let lowered = line.to_lowercase();
    DURATION_TOKENS.iter().any(|token| lowered.contains(token))
        && line.chars().count() <= DURATION_MAX_CHARS
}

/// Split the raw multi-line content of one instructions block.
///
/// The duration sniff examines only the first line and never re-triggers.
/// Remaining lines become steps, except lines shaped like "Name: remark":
/// recipe authors sometimes leave reader remarks between the preparation
/// steps, and those are reclassified as comments here rather than in a
/// separate document pass.
pub fn split_block(text: &str, default_author: &str) -> InstructionBlock {
    split_inner(text, default_author, true)
}

/// Classify a continuation of an instructions block whose first line has
/// already been seen. Same routing, no duration sniff.
pub fn continue_block(text: &str, default_author: &str) -> InstructionBlock {
    split_inner(text, default_author, false)
}

fn split_inner(text: &str, default_author: &str, sniff_duration: bool) -> InstructionBlock {
    let mut lines: Vec<&str> = text.trim().split('\n').collect();

    let mut block = InstructionBlock::default();
    if sniff_duration
        && let Some(first) = lines.first()
        && is_duration_phrase(first)
    {
        block.duration = Some(first.to_string());
        lines.remove(0);
    }

    for line in lines.into_iter().filter(|line| !line.is_empty()) {
        if comment::looks_like_comment(line) {
            block.comments.push(comment::parse_line(line, default_author));
        } else {
            block.steps.push(line.to_string());
        }
    }

    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRef;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const AUTHOR: &str = "Christine";

    #[test]
    fn test_short_first_line_with_time_unit_becomes_duration() {
        let block = split_block("30 Minuten\nTeig kneten\nBacken", AUTHOR);
        assert_eq!(block.duration.as_deref(), Some("30 Minuten"));
        assert_eq!(block.steps, vec!["Teig kneten", "Backen"]);
    }

    #[test]
    fn test_long_first_line_is_not_a_duration() {
        // Contains "stunde" but exceeds the length cutoff.
        let first = "Diese Zubereitung dauert ungefähr eine Stunde und ist aufwendig";
        let block = split_block(&format!("{first}\nRühren"), AUTHOR);
        assert_eq!(block.duration, None);
        assert_eq!(block.steps, vec![first, "Rühren"]);
    }

    #[test]
    fn test_first_line_without_time_unit_stays_a_step() {
        let block = split_block("Teig kneten\nBacken", AUTHOR);
        assert_eq!(block.duration, None);
        assert_eq!(block.steps, vec!["Teig kneten", "Backen"]);
    }

    #[test]
    fn test_duration_sniff_never_retriggers_on_later_lines() {
        let block = split_block("Teig kneten\n30 Minuten ruhen lassen", AUTHOR);
        assert_eq!(block.duration, None);
        assert_eq!(block.steps, vec!["Teig kneten", "30 Minuten ruhen lassen"]);
    }

    #[test]
    fn test_comment_shaped_lines_are_reclassified() {
        let block = split_block(
            "Mix well\nChristine: This turned out great\nServe hot",
            AUTHOR,
        );
        assert_eq!(block.steps, vec!["Mix well", "Serve hot"]);
        assert_eq!(block.comments.len(), 1);
        assert_eq!(
            block.comments[0].user,
            Some(UserRef::Name("Christine".to_string()))
        );
        assert_eq!(block.comments[0].text, "This turned out great");
    }

    #[rstest]
    #[case("ca. 45 min")]
    #[case("1 Std backen")]
    #[case("zwei Stunden")]
    fn test_duration_token_variants(#[case] first: &str) {
        let block = split_block(&format!("{first}\nRühren"), AUTHOR);
        assert_eq!(block.duration.as_deref(), Some(first));
    }

    #[test]
    fn test_length_cutoff_counts_characters_not_bytes() {
        // 40 characters on the nose, with umlauts pushing the byte length
        // past the cutoff.
        let first = "ungefähr fünfundvierzig Minuten Backzeit";
        assert_eq!(first.chars().count(), 40);
        let block = split_block(&format!("{first}\nRühren"), AUTHOR);
        assert_eq!(block.duration.as_deref(), Some(first));
    }

    #[test]
    fn test_continue_block_never_claims_a_duration() {
        let block = continue_block("2 Stunden\nRuhen lassen", AUTHOR);
        assert_eq!(block.duration, None);
        assert_eq!(block.steps, vec!["2 Stunden", "Ruhen lassen"]);
    }

    #[test]
    fn test_blank_lines_are_dropped_from_steps() {
        let block = split_block("Kneten\n\nBacken", AUTHOR);
        assert_eq!(block.steps, vec!["Kneten", "Backen"]);
    }

    #[test]
    fn test_empty_block_produces_nothing() {
        let block = split_block("", AUTHOR);
        assert_eq!(block, InstructionBlock::default());
    }
}
