/// One row of a Google-Form export, already mapped from CSV columns onto
/// named fields.
///
/// Only `title`, `ingredients` and `instructions` are required for a row to
/// be importable; everything else is carried through opportunistically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormResponse {
    pub timestamp: String,
    pub title: String,
    pub category: String,
    pub creator: String,
    pub servings: Option<String>,
    pub duration: Option<String>,
    pub ingredients: String,
    pub instructions: String,
    pub tips: Option<String>,
    pub info: Option<String>,
}

impl FormResponse {
    /// A row is importable once the three essential fields are present.
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.ingredients.is_empty() && !self.instructions.is_empty()
    }
}
