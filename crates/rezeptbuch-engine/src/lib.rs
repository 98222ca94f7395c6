pub mod corpus;
pub mod import;
pub mod io;
pub mod models;
pub mod normalize;
pub mod parsing;
pub mod validate;

// Re-export key types for easier usage
pub use corpus::{BuildOptions, build_collection};
pub use io::*;
pub use models::{form::*, recipe::*, user::*};
pub use parsing::{ParseOptions, Token, parse_markdown, tokenize};
