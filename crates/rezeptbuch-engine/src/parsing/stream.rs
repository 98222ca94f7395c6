//! The recipe-stream state machine: walks the flat token sequence and
//! assembles recipe records.
//!
//! One forward pass, no lookahead. Heading levels drive the transitions:
//! level 1 names the category inherited by following recipes and level 2
//! starts a recipe, while level 3 selects which section of the current
//! recipe the following content belongs to. Malformed or unexpected token
//! shapes are ignored: the corpus is hand-authored prose, and strict
//! failure would make the parser unusable on it.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{Comment, DEFAULT_CATEGORY, IngredientSection, Recipe};
use crate::parsing::tokens::Token;
use crate::parsing::{comment, ingredients, instructions};

/// Options steering the editorial heuristics of a parse pass.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Author credited for comment lines without a "Name:" prefix.
    pub default_comment_author: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            default_comment_author: "Christine".to_string(),
        }
    }
}

/// Section heading prefixes in the corpus language, checked in order.
/// "Zubereitungszeit" is covered by the "Zubereitung" prefix.
const SECTION_KEYWORDS: [(&str, Section); 5] = [
    ("Zutaten", Section::Ingredients),
    ("Zubereitung", Section::Instructions),
    ("Kommentar", Section::Comments),
    ("Tipp", Section::Tips),
    ("Info", Section::Info),
];

/// Extracts servings from a "Zutaten (für X)" heading suffix.
fn servings_pattern() -> &'static Regex {
    static SERVINGS: OnceLock<Regex> = OnceLock::new();
    SERVINGS.get_or_init(|| Regex::new(r"\(für (.+?)\)").expect("Invalid servings regex"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Ingredients,
    Instructions,
    Comments,
    Tips,
    Info,
}

/// Which recognized heading is currently open. Levels beyond 3 never set
/// this, so their text falls through to the active section like any other
/// content line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    Category,
    Recipe,
    Section,
}

/// Accumulates one in-progress recipe; becomes an immutable [`Recipe`] only
/// at emission. Builders without a title are discarded, never emitted.
#[derive(Debug)]
struct RecipeBuilder {
    id: String,
    category: String,
    title: Option<String>,
    servings: Option<String>,
    duration: Option<String>,
    ingredients: Vec<IngredientSection>,
    instructions: Vec<String>,
    tips: Vec<String>,
    info: Vec<String>,
    comments: Vec<Comment>,
    /// Whether the duration sniff has had its one shot for this recipe.
    instructions_started: bool,
}

impl RecipeBuilder {
    fn new(id: String, category: String) -> Self {
        Self {
            id,
            category,
            title: None,
            servings: None,
            duration: None,
            ingredients: Vec::new(),
            instructions: Vec::new(),
            tips: Vec::new(),
            info: Vec::new(),
            comments: Vec::new(),
            instructions_started: false,
        }
    }

    fn finish(self) -> Option<Recipe> {
        let title = self.title?;
        Some(Recipe {
            id: self.id,
            title,
            category: self.category,
            duration: self.duration,
            servings: self.servings,
            creator: None,
            created_at: None,
            ingredients: self.ingredients,
            instructions: self.instructions,
            tips: Some(self.tips),
            info: Some(self.info),
            comments: Some(self.comments),
        })
    }
}

/// The state machine itself. Feed tokens with [`RecipeStream::push`], then
/// take the emitted recipes with [`RecipeStream::finish`].
pub struct RecipeStream<'a> {
    options: &'a ParseOptions,
    heading: Option<Heading>,
    section: Section,
    category: Option<String>,
    builder: Option<RecipeBuilder>,
    next_id: u32,
    recipes: Vec<Recipe>,
}

impl<'a> RecipeStream<'a> {
    pub fn new(options: &'a ParseOptions) -> Self {
        Self {
            options,
            heading: None,
            section: Section::None,
            category: None,
            builder: None,
            next_id: 0,
            recipes: Vec::new(),
        }
    }

    pub fn push(&mut self, token: &Token) {
        match token {
            Token::HeadingOpen { level: 1 } => {
                self.heading = Some(Heading::Category);
            }
            Token::HeadingOpen { level: 2 } => {
                self.emit_pending();
                self.next_id += 1;
                self.builder = Some(RecipeBuilder::new(
                    format!("recipe-{}", self.next_id),
                    self.category
                        .clone()
                        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
                ));
                self.heading = Some(Heading::Recipe);
                self.section = Section::None;
            }
            Token::HeadingOpen { level: 3 } => {
                self.heading = Some(Heading::Section);
                self.section = Section::None;
            }
            Token::HeadingClose { level: 1..=3 } => {
                self.heading = None;
            }
            Token::Inline { content } if !content.is_empty() => {
                self.inline(content);
            }
            // Unknown token kinds and deeper headings are a no-op.
            _ => {}
        }
    }

    /// End of stream: the in-progress recipe is emitted like any level-2
    /// heading would have done.
    pub fn finish(mut self) -> Vec<Recipe> {
        self.emit_pending();
        self.recipes
    }

    fn emit_pending(&mut self) {
        if let Some(builder) = self.builder.take()
            && let Some(recipe) = builder.finish()
        {
            self.recipes.push(recipe);
        }
    }

    fn inline(&mut self, content: &str) {
        // Inline content directly inside a heading is the heading's own
        // text, never section body.
        match self.heading {
            Some(Heading::Category) => {
                self.category = Some(content.to_string());
                return;
            }
            Some(Heading::Recipe) => {
                if let Some(builder) = &mut self.builder {
                    builder.title = Some(content.to_string());
                }
                return;
            }
            Some(Heading::Section) => {
                self.enter_section(content);
                return;
            }
            None => {}
        }

        let Some(builder) = &mut self.builder else {
            // Content before the first recipe heading has nowhere to go.
            return;
        };

        let author = &self.options.default_comment_author;
        match self.section {
            Section::Ingredients => {
                // Sections that collected no items are dropped at close and
                // never persisted.
                builder.ingredients.extend(
                    ingredients::split_sections(content)
                        .into_iter()
                        .filter(|section| !section.items.is_empty()),
                );
            }
            Section::Instructions => {
                let block = if builder.instructions_started {
                    instructions::continue_block(content, author)
                } else {
                    instructions::split_block(content, author)
                };
                builder.instructions_started = true;
                if let Some(duration) = block.duration {
                    builder.duration.get_or_insert(duration);
                }
                builder.instructions.extend(block.steps);
                builder.comments.extend(block.comments);
            }
            Section::Comments => {
                builder.comments.extend(
                    nonblank_lines(content).map(|line| comment::parse_line(line, author)),
                );
            }
            Section::Tips => {
                builder.tips.extend(nonblank_lines(content).map(str::to_string));
            }
            Section::Info => {
                builder.info.extend(nonblank_lines(content).map(str::to_string));
            }
            Section::None => {}
        }
    }

    /// A level-3 heading selects the active section by keyword prefix.
    /// Unrecognized headings leave it at `None`, so their content is
    /// swallowed rather than bleeding into the previous section.
    fn enter_section(&mut self, heading_text: &str) {
        self.section = SECTION_KEYWORDS
            .iter()
            .find(|(keyword, _)| heading_text.starts_with(keyword))
            .map(|(_, section)| *section)
            .unwrap_or(Section::None);

        if self.section == Section::Ingredients
            && let Some(builder) = &mut self.builder
            && let Some(caps) = servings_pattern().captures(heading_text)
        {
            builder.servings = Some(caps[1].to_string());
        }
    }
}

fn nonblank_lines(content: &str) -> impl Iterator<Item = &str> {
    content.trim().split('\n').filter(|line| !line.is_empty())
}

/// Parse one markdown document into its recipes.
///
/// Ids are allocated sequentially per pass; collection-wide uniqueness is
/// checked by validation after merging, not here.
pub fn parse_markdown(source: &str, options: &ParseOptions) -> Vec<Recipe> {
    let mut stream = RecipeStream::new(options);
    for token in crate::parsing::tokens::tokenize(source) {
        stream.push(&token);
    }
    stream.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRef;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Vec<Recipe> {
        parse_markdown(source, &ParseOptions::default())
    }

    #[test]
    fn test_recipe_needs_title_and_level_2_heading() {
        let recipes = parse("## Käsespätzle\n\n### Zutaten\n\n400g Spätzle");
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].title, "Käsespätzle");
        assert_eq!(recipes[0].id, "recipe-1");
    }

    #[test]
    fn test_category_inherited_until_superseded() {
        let md = "# Desserts\n\n## Mousse\n\n### Zutaten\n\nSchokolade\n\n\
                  ## Tiramisu\n\n### Zutaten\n\nMascarpone\n\n\
                  ## Pudding\n\n### Zutaten\n\nMilch";
        let recipes = parse(md);
        assert_eq!(recipes.len(), 3);
        for recipe in &recipes {
            assert_eq!(recipe.category, "Desserts");
        }
    }

    #[test]
    fn test_later_category_heading_supersedes() {
        let md = "# Desserts\n\n## Mousse\n\n### Zutaten\n\nSchokolade\n\n\
                  # Suppen\n\n## Kürbissuppe\n\n### Zutaten\n\nKürbis";
        let recipes = parse(md);
        assert_eq!(recipes[0].category, "Desserts");
        assert_eq!(recipes[1].category, "Suppen");
    }

    #[test]
    fn test_recipe_before_any_category_gets_default() {
        let recipes = parse("## Brot\n\n### Zutaten\n\nMehl");
        assert_eq!(recipes[0].category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_ids_are_sequential_within_a_pass() {
        let md = "## Eins\n\n### Zutaten\n\nSalz\n\n## Zwei\n\n### Zutaten\n\nPfeffer";
        let recipes = parse(md);
        assert_eq!(recipes[0].id, "recipe-1");
        assert_eq!(recipes[1].id, "recipe-2");
    }

    #[test]
    fn test_servings_extracted_from_ingredients_heading() {
        let recipes = parse("## Rouladen\n\n### Zutaten (für 4 Portionen)\n\nRindfleisch");
        assert_eq!(recipes[0].servings.as_deref(), Some("4 Portionen"));
    }

    #[test]
    fn test_sectioned_ingredients_flow_into_recipe() {
        let md = "## Rouladen\n\n### Zutaten\n\n*Für die Sauce:*\n200g Sahne\n1 EL Senf";
        let recipes = parse(md);
        assert_eq!(recipes[0].ingredients.len(), 1);
        assert_eq!(
            recipes[0].ingredients[0].title.as_deref(),
            Some("Für die Sauce")
        );
        assert_eq!(recipes[0].ingredients[0].items, vec!["200g Sahne", "1 EL Senf"]);
    }

    #[test]
    fn test_duration_and_comment_pulled_out_of_instructions() {
        let md = "## Gulasch\n\n### Zubereitung\n\n\
                  30 Minuten\nAnbraten\nChristine: Lieber Rind nehmen\nSchmoren";
        let recipes = parse(md);
        assert_eq!(recipes[0].duration.as_deref(), Some("30 Minuten"));
        assert_eq!(recipes[0].instructions, vec!["Anbraten", "Schmoren"]);
        let comments = recipes[0].comments.as_ref().unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text, "Lieber Rind nehmen");
    }

    #[test]
    fn test_zubereitungszeit_heading_is_instructions_too() {
        let recipes = parse("## Gulasch\n\n### Zubereitungszeit\n\n2 Stunden\nIm Ofen garen");
        assert_eq!(recipes[0].duration.as_deref(), Some("2 Stunden"));
        assert_eq!(recipes[0].instructions, vec!["Im Ofen garen"]);
    }

    #[test]
    fn test_comment_section_lines_are_attributed() {
        let md = "## Gulasch\n\n### Kommentare\n\nThomas: Sehr lecker\nOhne Namen";
        let recipes = parse(md);
        let comments = recipes[0].comments.as_ref().unwrap();
        assert_eq!(comments[0].user, Some(UserRef::Name("Thomas".to_string())));
        assert_eq!(
            comments[1].user,
            Some(UserRef::Name("Christine".to_string()))
        );
    }

    #[test]
    fn test_tips_and_info_collect_lines() {
        let md = "## Gulasch\n\n### Tipp\n\nVortags kochen\n\n### Info\n\nFriert gut ein";
        let recipes = parse(md);
        assert_eq!(recipes[0].tips.as_ref().unwrap(), &vec!["Vortags kochen"]);
        assert_eq!(recipes[0].info.as_ref().unwrap(), &vec!["Friert gut ein"]);
    }

    #[test]
    fn test_unrecognized_section_heading_swallows_content() {
        let md = "## Gulasch\n\n### Zutaten\n\nRind\n\n### Weinempfehlung\n\nSpätburgunder";
        let recipes = parse(md);
        // "Spätburgunder" must not bleed into the ingredients.
        assert_eq!(recipes[0].ingredients.len(), 1);
        assert_eq!(recipes[0].ingredients[0].items, vec!["Rind"]);
        assert!(recipes[0].instructions.is_empty());
    }

    #[test]
    fn test_heading_without_title_text_is_discarded() {
        let recipes = parse("##\n\n### Zutaten\n\nSalz");
        assert!(recipes.is_empty());
    }

    #[test]
    fn test_content_before_first_recipe_is_ignored() {
        let recipes = parse("Ein Vorwort.\n\n## Brot\n\n### Zutaten\n\nMehl");
        assert_eq!(recipes.len(), 1);
        assert!(recipes[0].instructions.is_empty());
    }

    #[test]
    fn test_multiple_ingredient_paragraphs_become_separate_sections() {
        let md = "## Brot\n\n### Zutaten\n\nMehl\nWasser\n\nHefe";
        let recipes = parse(md);
        // Two paragraphs, two untitled sections; display merging is the
        // normalizer's concern.
        assert_eq!(recipes[0].ingredients.len(), 2);
        assert_eq!(recipes[0].ingredients[0].items, vec!["Mehl", "Wasser"]);
        assert_eq!(recipes[0].ingredients[1].items, vec!["Hefe"]);
    }

    #[test]
    fn test_duration_sniffed_on_first_instruction_paragraph_only() {
        let md = "## Brot\n\n### Zubereitung\n\n30 Minuten\nKneten\n\n2 Stunden\nRuhen";
        let recipes = parse(md);
        assert_eq!(recipes[0].duration.as_deref(), Some("30 Minuten"));
        // The later duration-looking line stays a step.
        assert_eq!(recipes[0].instructions, vec!["Kneten", "2 Stunden", "Ruhen"]);
    }

    #[test]
    fn test_empty_list_fields_are_present_before_normalization() {
        let recipes = parse("## Brot\n\n### Zutaten\n\nMehl");
        // The builder always emits the containers; pruning them is the
        // normalizer's job.
        assert_eq!(recipes[0].tips, Some(vec![]));
        assert_eq!(recipes[0].info, Some(vec![]));
        assert_eq!(recipes[0].comments, Some(vec![]));
    }
}
