//! Post-parse normalization and collection assembly.
//!
//! Two in-place rewrites run before aggregation: emptiness pruning (so the
//! serialized form omits empty optional lists instead of emitting `[]`) and
//! user-reference resolution against the registry. Both are idempotent.
//! Duplicate ids or titles across merged sources are left alone here;
//! validation reports them, since silent deduplication would lose data the
//! editor may want to fix by hand.

use std::collections::BTreeSet;

use chrono::{SecondsFormat, Utc};

use crate::models::{
    COLLECTION_VERSION, IngredientSection, Recipe, RecipeCollection, Registry, UserRef,
};

/// Replace empty optional list fields with `None` so their keys disappear
/// from the serialized recipe.
pub fn prune_empty_fields(recipe: &mut Recipe) {
    for field in [&mut recipe.tips, &mut recipe.info] {
        if field.as_ref().is_some_and(Vec::is_empty) {
            *field = None;
        }
    }
    if recipe.comments.as_ref().is_some_and(Vec::is_empty) {
        recipe.comments = None;
    }
}

pub fn prune_recipes(recipes: &mut [Recipe]) {
    for recipe in recipes {
        prune_empty_fields(recipe);
    }
}

/// Resolve the creator and every comment author to full user records.
/// A registry miss yields a name-only record, so this never fails and every
/// recipe stays emittable.
pub fn resolve_user_refs(recipe: &mut Recipe, registry: &Registry) {
    if let Some(creator) = recipe.creator.take() {
        recipe.creator = Some(UserRef::Full(registry.resolve(&creator)));
    }
    if let Some(comments) = &mut recipe.comments {
        for comment in comments {
            if let Some(user) = comment.user.take() {
                comment.user = Some(UserRef::Full(registry.resolve(&user)));
            }
        }
    }
}

/// The full normalization pass: prune, then resolve.
pub fn normalize_recipes(recipes: &mut [Recipe], registry: &Registry) {
    for recipe in recipes.iter_mut() {
        prune_empty_fields(recipe);
        resolve_user_refs(recipe, registry);
    }
}

/// Aggregate normalized recipes into the output collection.
///
/// Recipes keep their given order (intra-file order is the state machine's
/// insertion order; order across files is whatever the caller processed).
pub fn merge_collection(recipes: Vec<Recipe>) -> RecipeCollection {
    let categories: BTreeSet<String> = recipes.iter().map(|r| r.category.clone()).collect();

    RecipeCollection {
        version: COLLECTION_VERSION.to_string(),
        total_recipes: recipes.len(),
        categories: categories.into_iter().collect(),
        recipes,
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// Merge runs of consecutive untitled ingredient sections into one, for
/// display. Titled sections and non-adjacent untitled sections are kept
/// apart; the stored collection is not rewritten.
pub fn merge_untitled_sections(sections: &[IngredientSection]) -> Vec<IngredientSection> {
    let mut merged: Vec<IngredientSection> = Vec::new();
    for section in sections {
        match merged.last_mut() {
            Some(last) if last.title.is_none() && section.title.is_none() => {
                last.items.extend(section.items.iter().cloned());
            }
            _ => merged.push(section.clone()),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Comment, User};
    use pretty_assertions::assert_eq;

    fn recipe_with_empty_lists() -> Recipe {
        Recipe {
            id: "recipe-1".to_string(),
            title: "Brot".to_string(),
            category: "Backen".to_string(),
            duration: None,
            servings: None,
            creator: Some(UserRef::Name("Christine".to_string())),
            created_at: None,
            ingredients: vec![],
            instructions: vec![],
            tips: Some(vec![]),
            info: Some(vec!["Hält 3 Tage".to_string()]),
            comments: Some(vec![Comment {
                user: Some(UserRef::Name("Thomas".to_string())),
                text: "Gerne wieder".to_string(),
            }]),
        }
    }

    fn registry() -> Registry {
        Registry::from_users([User {
            name: "Christine".to_string(),
            photo: Some("users/christine.jpg".to_string()),
        }])
    }

    #[test]
    fn test_prune_removes_only_empty_lists() {
        let mut recipe = recipe_with_empty_lists();
        prune_empty_fields(&mut recipe);
        assert_eq!(recipe.tips, None);
        assert_eq!(recipe.info, Some(vec!["Hält 3 Tage".to_string()]));
        assert!(recipe.comments.is_some());
    }

    #[test]
    fn test_resolve_replaces_names_with_records() {
        let mut recipe = recipe_with_empty_lists();
        resolve_user_refs(&mut recipe, &registry());

        let creator = recipe.creator.as_ref().unwrap();
        assert!(
            matches!(creator, UserRef::Full(user) if user.photo.as_deref() == Some("users/christine.jpg"))
        );

        // Registry miss synthesizes a name-only record.
        let comments = recipe.comments.as_ref().unwrap();
        assert!(
            matches!(&comments[0].user, Some(UserRef::Full(user)) if *user == User::name_only("Thomas"))
        );
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let mut once = vec![recipe_with_empty_lists()];
        normalize_recipes(&mut once, &registry());

        let mut twice = once.clone();
        normalize_recipes(&mut twice, &registry());

        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_collection_derives_sorted_categories() {
        let mut dessert = recipe_with_empty_lists();
        dessert.category = "Desserts".to_string();
        let mut soup = recipe_with_empty_lists();
        soup.category = "Suppen".to_string();
        soup.id = "recipe-2".to_string();
        let mut second_dessert = recipe_with_empty_lists();
        second_dessert.category = "Desserts".to_string();
        second_dessert.id = "recipe-3".to_string();

        let collection = merge_collection(vec![soup, dessert, second_dessert]);
        assert_eq!(collection.total_recipes, 3);
        assert_eq!(collection.categories, vec!["Desserts", "Suppen"]);
        assert_eq!(collection.version, COLLECTION_VERSION);
        // Input order is preserved, not re-sorted by category.
        assert_eq!(collection.recipes[0].category, "Suppen");
    }

    #[test]
    fn test_merge_untitled_sections_collapses_consecutive_runs_only() {
        let sections = vec![
            IngredientSection {
                title: None,
                items: vec!["Mehl".to_string()],
            },
            IngredientSection {
                title: None,
                items: vec!["Wasser".to_string()],
            },
            IngredientSection {
                title: Some("Belag".to_string()),
                items: vec!["Tomaten".to_string()],
            },
            IngredientSection {
                title: None,
                items: vec!["Salz".to_string()],
            },
        ];

        let merged = merge_untitled_sections(&sections);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].items, vec!["Mehl", "Wasser"]);
        assert_eq!(merged[1].title.as_deref(), Some("Belag"));
        assert_eq!(merged[2].items, vec!["Salz"]);
    }

    #[test]
    fn test_duplicates_survive_merging() {
        let one = recipe_with_empty_lists();
        let two = recipe_with_empty_lists();
        let collection = merge_collection(vec![one, two]);
        // Same id twice: merging must not silently deduplicate.
        assert_eq!(collection.total_recipes, 2);
    }
}
