//! Splits an ingredients block into titled and untitled sections.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::IngredientSection;

/// A section header is a line fully wrapped in emphasis, e.g. `*Für die
/// Sauce:*` or `_Teig_`. Mixed delimiters are accepted.
fn section_header() -> &'static Regex {
    static SECTION_HEADER: OnceLock<Regex> = OnceLock::new();
    SECTION_HEADER
        .get_or_init(|| Regex::new(r"^[*_](.+?)[*_]$").expect("Invalid section header regex"))
}

fn strip_trailing_colon(title: &str) -> &str {
    let title = title.trim_end();
    title.strip_suffix(':').unwrap_or(title)
}

/// Split the raw multi-line content of one ingredients block.
///
/// Items keep their encounter order, a header closes the running section
/// (dropped when it collected no items) and opens a new titled one. The
/// result is never empty: content-free input yields a single untitled
/// placeholder section for callers to prune.
pub fn split_sections(text: &str) -> Vec<IngredientSection> {
    let mut sections = Vec::new();
    let mut current = IngredientSection::untitled();

    for line in text.trim().split('\n').filter(|line| !line.is_empty()) {
        if let Some(caps) = section_header().captures(line) {
            if !current.items.is_empty() {
                sections.push(current);
            }
            current = IngredientSection::titled(strip_trailing_colon(&caps[1]));
        } else if !line.trim().is_empty() {
            current.items.push(line.to_string());
        }
    }

    if !current.items.is_empty() {
        sections.push(current);
    }

    if sections.is_empty() {
        return vec![IngredientSection::untitled()];
    }
    sections
}
