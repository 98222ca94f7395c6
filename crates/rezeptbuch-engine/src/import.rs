//! Google-Form CSV import: maps exported form rows onto recipes.
//!
//! The CSV dialect here is the one Google Forms emits: comma-separated,
//! fields optionally double-quoted, quotes escaped by doubling. Column
//! headers are matched by substring against German and English synonyms so
//! renamed form questions keep importing.

use std::sync::OnceLock;

use chrono::{NaiveDateTime, SecondsFormat, TimeZone, Utc};
use regex::Regex;
use thiserror::Error;

use crate::models::{FormResponse, IngredientSection, Recipe, UserRef};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("CSV file must have at least a header row and one data row")]
    MissingRows,
}

/// Category for rows whose form left the category question blank.
pub const FALLBACK_CATEGORY: &str = "Sonstiges";

/// In the CSV ingredient dialect a section header is a plain line ending in
/// a colon, e.g. "Für die Sauce:". Form answers carry no markdown emphasis.
fn plain_section_header() -> &'static Regex {
    static PLAIN_HEADER: OnceLock<Regex> = OnceLock::new();
    PLAIN_HEADER
        .get_or_init(|| Regex::new(r"(?i)^[A-ZÄÖÜ][^:]*:$").expect("Invalid plain header regex"))
}

/// Split one CSV record into fields, honoring quoting.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);

    fields
}

fn assign_field(response: &mut FormResponse, header: &str, value: &str) {
    let header = header.to_lowercase();
    let value = value.to_string();

    if header.contains("timestamp") || header.contains("zeitstempel") {
        response.timestamp = value;
    } else if header.contains("titel") || header.contains("title") || header.contains("name") {
        response.title = value;
    } else if header.contains("kategorie") || header.contains("category") {
        response.category = value;
    } else if header.contains("ersteller")
        || header.contains("creator")
        || header.contains("author")
    {
        response.creator = value;
    } else if header.contains("portionen") || header.contains("servings") {
        response.servings = Some(value);
    } else if header.contains("dauer") || header.contains("duration") || header.contains("zeit") {
        response.duration = Some(value);
    } else if header.contains("zutat") || header.contains("ingredient") {
        response.ingredients = value;
    } else if header.contains("zubereitung")
        || header.contains("anleitung")
        || header.contains("instruction")
    {
        response.instructions = value;
    } else if header.contains("tipp") || header.contains("tip") {
        response.tips = Some(value);
    } else if header.contains("info") || header.contains("hinweis") {
        response.info = Some(value);
    }
}

/// Parse a form export into mapped rows. Rows missing any of the three
/// essential fields are skipped, not errors.
pub fn parse_form_csv(content: &str) -> Result<Vec<FormResponse>, ImportError> {
    let mut lines = content.lines().filter(|line| !line.trim().is_empty());

    let header_line = lines.next().ok_or(ImportError::MissingRows)?;
    let headers: Vec<String> = parse_csv_line(header_line)
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut responses = Vec::new();
    for line in lines {
        let values = parse_csv_line(line);
        let mut response = FormResponse::default();
        for (index, header) in headers.iter().enumerate() {
            let value = values.get(index).map(String::as_str).unwrap_or("");
            assign_field(&mut response, header, value);
        }
        if response.is_complete() {
            responses.push(response);
        }
    }

    if responses.is_empty() && content.lines().filter(|l| !l.trim().is_empty()).count() < 2 {
        return Err(ImportError::MissingRows);
    }

    Ok(responses)
}

/// Derive a stable slug id from a recipe title, transliterating umlauts the
/// way permalinks in the published collection expect.
pub fn generate_id(title: &str) -> String {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let non_alnum =
        NON_ALNUM.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("Invalid slug regex"));

    let lowered = title
        .to_lowercase()
        .replace('ä', "ae")
        .replace('ö', "oe")
        .replace('ü', "ue")
        .replace('ß', "ss");

    non_alnum
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

fn parse_multiline_field(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a form ingredients answer into sections, using the plain-text
/// header dialect. Mirrors the guarantee of the markdown splitter: never
/// empty, a placeholder untitled section when the answer held nothing.
pub fn parse_ingredient_field(text: &str) -> Vec<IngredientSection> {
    let mut sections = Vec::new();
    let mut current = IngredientSection::untitled();

    for line in text.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        if plain_section_header().is_match(line) && !line.starts_with(|c: char| c.is_ascii_digit())
        {
            if !current.items.is_empty() {
                sections.push(current);
            }
            let title = line.strip_suffix(':').unwrap_or(line).trim();
            current = IngredientSection::titled(title);
        } else {
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

/// Google-Form timestamps arrive as "MM/DD/YYYY HH:MM:SS"; anything else
/// falls back to the import time.
fn parse_form_timestamp(timestamp: &str) -> String {
    NaiveDateTime::parse_from_str(timestamp.trim(), "%m/%d/%Y %H:%M:%S")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or_else(|_| Utc::now())
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Convert one mapped form row into a recipe record.
pub fn convert_to_recipe(response: &FormResponse) -> Recipe {
    let creator = Some(response.creator.trim())
        .filter(|c| !c.is_empty())
        .map(|c| UserRef::Name(c.to_string()));

    let optional = |field: &Option<String>| {
        field
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let tips = parse_multiline_field(response.tips.as_deref().unwrap_or(""));
    let info = parse_multiline_field(response.info.as_deref().unwrap_or(""));

    Recipe {
        id: generate_id(&response.title),
        title: response.title.trim().to_string(),
        category: Some(response.category.trim())
            .filter(|c| !c.is_empty())
            .unwrap_or(FALLBACK_CATEGORY)
            .to_string(),
        duration: optional(&response.duration),
        servings: optional(&response.servings),
        creator,
        created_at: Some(parse_form_timestamp(&response.timestamp)),
        ingredients: parse_ingredient_field(&response.ingredients),
        instructions: parse_multiline_field(&response.instructions),
        tips: (!tips.is_empty()).then_some(tips),
        info: (!info.is_empty()).then_some(info),
        comments: None,
    }
}
