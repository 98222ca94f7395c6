pub mod form;
pub mod recipe;
pub mod user;

pub use form::FormResponse;
pub use recipe::{
    COLLECTION_VERSION, Comment, DEFAULT_CATEGORY, IngredientSection, Recipe, RecipeCollection,
};
pub use user::{Registry, User, UserRef};
