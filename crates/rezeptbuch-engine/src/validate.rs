//! Post-build validation of an emitted collection.
//!
//! Everything reported here is a warning: structural absence and duplicate
//! identities are data-quality issues in the hand-authored sources, surfaced
//! for the editor rather than blocking the build.

use std::collections::BTreeSet;

use crate::models::{Recipe, RecipeCollection};

/// Warnings for one recipe, labeled by its position in the collection.
pub fn validate_recipe(recipe: &Recipe, index: usize) -> Vec<String> {
    let mut warnings = Vec::new();

    if recipe.id.is_empty() {
        warnings.push(format!("Recipe at index {index}: Missing id"));
    }
    if recipe.title.trim().is_empty() {
        warnings.push(format!("Recipe at index {index}: Missing or empty title"));
    }
    if recipe.category.trim().is_empty() {
        warnings.push(format!(
            "Recipe at index {index} ({}): Missing or empty category",
            recipe.title
        ));
    }
    if recipe.ingredients.is_empty() {
        warnings.push(format!(
            "Recipe at index {index} ({}): Missing ingredients",
            recipe.title
        ));
    }
    if recipe.instructions.is_empty() {
        warnings.push(format!(
            "Recipe at index {index} ({}): Missing instructions",
            recipe.title
        ));
    }

    warnings
}

/// Warnings for the whole collection, including the duplicate-identity
/// checks that no earlier layer enforces.
pub fn validate_collection(collection: &RecipeCollection) -> Vec<String> {
    let mut warnings = Vec::new();

    if collection.version.is_empty() {
        warnings.push("Collection: Missing version".to_string());
    }
    if collection.total_recipes != collection.recipes.len() {
        warnings.push(format!(
            "Collection: totalRecipes ({}) doesn't match actual count ({})",
            collection.total_recipes,
            collection.recipes.len()
        ));
    }

    for (index, recipe) in collection.recipes.iter().enumerate() {
        warnings.extend(validate_recipe(recipe, index));
    }

    let duplicate_ids = duplicates(collection.recipes.iter().map(|r| r.id.as_str()));
    if !duplicate_ids.is_empty() {
        warnings.push(format!(
            "Collection: Duplicate recipe IDs found: {}",
            duplicate_ids.join(", ")
        ));
    }

    let duplicate_titles = duplicates(collection.recipes.iter().map(|r| r.title.as_str()));
    if !duplicate_titles.is_empty() {
        warnings.push(format!(
            "Collection: Duplicate recipe titles found: {}",
            duplicate_titles.join(", ")
        ));
    }

    warnings
}

/// Values seen more than once, each reported once, in first-seen order.
fn duplicates<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut reported = BTreeSet::new();
    let mut result = Vec::new();
    for value in values {
        if !seen.insert(value) && reported.insert(value) {
            result.push(value.to_string());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{COLLECTION_VERSION, IngredientSection};
    use pretty_assertions::assert_eq;

    fn recipe(id: &str, title: &str) -> Recipe {
        Recipe {
            id: id.to_string(),
            title: title.to_string(),
            category: "Sonstiges".to_string(),
            duration: None,
            servings: None,
            creator: None,
            created_at: None,
            ingredients: vec![IngredientSection {
                title: None,
                items: vec!["Salz".to_string()],
            }],
            instructions: vec!["Würzen".to_string()],
            tips: None,
            info: None,
            comments: None,
        }
    }

    fn collection(recipes: Vec<Recipe>) -> RecipeCollection {
        RecipeCollection {
            version: COLLECTION_VERSION.to_string(),
            total_recipes: recipes.len(),
            categories: vec!["Sonstiges".to_string()],
            recipes,
            generated_at: "2024-03-15T14:30:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_clean_collection_has_no_warnings() {
        let collection = collection(vec![recipe("recipe-1", "Brot"), recipe("recipe-2", "Suppe")]);
        assert_eq!(validate_collection(&collection), Vec::<String>::new());
    }

    #[test]
    fn test_colliding_ids_yield_exactly_one_warning() {
        // Two source files each started their counter at recipe-1.
        let collection = collection(vec![
            recipe("recipe-1", "Brot"),
            recipe("recipe-2", "Suppe"),
            recipe("recipe-1", "Kuchen"),
        ]);
        let warnings = validate_collection(&collection);
        let id_warnings: Vec<_> = warnings
            .iter()
            .filter(|w| w.contains("Duplicate recipe IDs"))
            .collect();
        assert_eq!(id_warnings.len(), 1);
        assert!(id_warnings[0].contains("recipe-1"));
    }

    #[test]
    fn test_triplicate_id_is_still_reported_once() {
        let collection = collection(vec![
            recipe("recipe-1", "Brot"),
            recipe("recipe-1", "Suppe"),
            recipe("recipe-1", "Kuchen"),
        ]);
        let warnings = validate_collection(&collection);
        assert_eq!(
            warnings,
            vec!["Collection: Duplicate recipe IDs found: recipe-1".to_string()]
        );
    }

    #[test]
    fn test_duplicate_titles_are_reported() {
        let collection = collection(vec![recipe("recipe-1", "Brot"), recipe("recipe-2", "Brot")]);
        let warnings = validate_collection(&collection);
        assert_eq!(
            warnings,
            vec!["Collection: Duplicate recipe titles found: Brot".to_string()]
        );
    }

    #[test]
    fn test_structural_absence_is_warned_not_fatal() {
        let mut incomplete = recipe("recipe-1", "Brot");
        incomplete.ingredients.clear();
        incomplete.instructions.clear();
        let warnings = validate_collection(&collection(vec![incomplete]));
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("Missing ingredients"));
        assert!(warnings[1].contains("Missing instructions"));
    }

    #[test]
    fn test_total_recipes_mismatch_is_warned() {
        let mut broken = collection(vec![recipe("recipe-1", "Brot")]);
        broken.total_recipes = 5;
        let warnings = validate_collection(&broken);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("totalRecipes (5)"));
    }
}
