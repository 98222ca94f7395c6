//! The batch build: walks a corpus directory and produces one merged,
//! normalized collection.
//!
//! Markdown files run through the recipe-stream parser; JSON files are
//! pre-structured and only normalized. Order across source files follows
//! the sorted scan; order within a file is parse order.

use std::collections::HashMap;
use std::path::Path;

use crate::io::{self, IoError};
use crate::models::{Recipe, RecipeCollection, Registry, UserRef};
use crate::normalize;
use crate::parsing::{ParseOptions, parse_markdown};

/// Options for one corpus build.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub parse: ParseOptions,
    /// Source file name → creator credited for every recipe parsed from it.
    /// Matched case-insensitively, since the corpus files come from
    /// case-preserving but inconsistently-cased exports.
    pub creator_overrides: HashMap<String, String>,
}

fn creator_for<'a>(overrides: &'a HashMap<String, String>, file_name: &str) -> Option<&'a str> {
    let file_name = file_name.to_lowercase();
    overrides
        .iter()
        .find(|(name, _)| name.to_lowercase() == file_name)
        .map(|(_, creator)| creator.as_str())
}

/// Build the merged collection from every recognized source file under
/// `corpus_root`.
pub fn build_collection(
    corpus_root: &Path,
    registry: &Registry,
    options: &BuildOptions,
) -> Result<RecipeCollection, IoError> {
    let files = io::scan_corpus(corpus_root)?;
    log::info!("found {} recipe files to process", files.len());

    let mut all_recipes: Vec<Recipe> = Vec::new();

    for file in &files {
        let file_name = file.file_name().unwrap_or(file.as_str());
        let extension = file.extension().unwrap_or_default();

        let mut recipes = match extension {
            "md" => {
                let markdown = io::read_source(file, corpus_root)?;
                parse_markdown(&markdown, &options.parse)
            }
            "json" => io::load_recipe_file(&file.to_path(corpus_root))?,
            _ => continue,
        };

        normalize::prune_recipes(&mut recipes);

        if let Some(creator) = creator_for(&options.creator_overrides, file_name) {
            for recipe in &mut recipes {
                recipe.creator = Some(UserRef::Name(creator.to_string()));
            }
        }

        log::info!("parsed {} recipes from {file}", recipes.len());
        all_recipes.extend(recipes);
    }

    normalize::normalize_recipes(&mut all_recipes, registry);
    Ok(normalize::merge_collection(all_recipes))
}
