use serde::{Deserialize, Serialize};

use crate::models::user::UserRef;

/// Version stamped into every emitted collection.
pub const COLLECTION_VERSION: &str = "1.0.0";

/// Category assigned to recipes that appear before any top-level heading.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// A reader remark attached to a recipe, optionally attributed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRef>,
    pub text: String,
}

/// A titled or untitled grouping of ingredient lines within a recipe.
///
/// e.g. "Für die Sauce" / "Für die Rollen"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub items: Vec<String>,
}

impl IngredientSection {
    pub fn untitled() -> Self {
        Self {
            title: None,
            items: Vec::new(),
        }
    }

    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            items: Vec::new(),
        }
    }
}

/// A single normalized recipe.
///
/// Optional list fields (`tips`, `info`, `comments`) are omitted from the
/// serialized form entirely when empty; the normalizer replaces empty
/// vectors with `None` before a collection is written. `ingredients` and
/// `instructions` default to empty on load so that structurally incomplete
/// source records still deserialize and can be reported by validation
/// instead of failing the whole build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Free text like "4 Personen" or "2-3 Portionen", never validated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<UserRef>,
    /// ISO-8601, set for externally-imported recipes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientSection>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
}

/// The merged output document consumed by the browsing front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeCollection {
    pub version: String,
    pub total_recipes: usize,
    pub categories: Vec<String>,
    pub recipes: Vec<Recipe>,
    pub generated_at: String,
}
