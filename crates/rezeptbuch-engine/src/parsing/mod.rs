//! Markdown-to-recipe parsing.
//!
//! `tokens` adapts pulldown-cmark events to the flat stream `stream` walks;
//! `comment`, `ingredients` and `instructions` handle the line-level
//! heuristics for their sections.

pub mod comment;
pub mod ingredients;
pub mod instructions;
pub mod stream;
pub mod tokens;

pub use instructions::InstructionBlock;
pub use stream::{ParseOptions, RecipeStream, parse_markdown};
pub use tokens::{Token, tokenize};
