//! Adapter from pulldown-cmark events to the flat token stream the recipe
//! state machine consumes.
//!
//! The state machine expects the token shape common to flat markdown
//! tokenizers: a heading emits an open marker, its text as a following
//! inline token, then a close marker; each paragraph or list item collapses
//! into a single inline token whose content keeps source line breaks as
//! `\n`. Emphasis delimiters are re-emitted into the inline content because
//! downstream parsing matches on them (ingredient section headers are
//! recognized by being fully emphasis-wrapped).

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// One unit of a flattened markdown parse.
///
/// A closed variant set: anything the recipe grammar gives no meaning to
/// arrives as `Other` and is ignored by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    HeadingOpen { level: u8 },
    HeadingClose { level: u8 },
    Inline { content: String },
    Other,
}

impl Token {
    pub fn inline(content: impl Into<String>) -> Self {
        Token::Inline {
            content: content.into(),
        }
    }
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Flatten a markdown source into the token stream.
///
/// Code blocks and raw HTML surface as `Other` tokens; their content never
/// reaches the inline stream, matching how flat tokenizers type them.
pub fn tokenize(source: &str) -> Vec<Token> {
    let parser = Parser::new_ext(source, Options::empty());

    let mut tokens = Vec::new();
    let mut run = String::new();
    // Depth of nested code blocks; text inside them is not inline content.
    let mut code_depth = 0u32;

    let flush = |run: &mut String, tokens: &mut Vec<Token>| {
        if !run.is_empty() {
            tokens.push(Token::Inline {
                content: std::mem::take(run),
            });
        }
    };

    for event in parser {
        if code_depth > 0 {
            match event {
                Event::Start(Tag::CodeBlock(_)) => code_depth += 1,
                Event::End(TagEnd::CodeBlock) => code_depth -= 1,
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                flush(&mut run, &mut tokens);
                tokens.push(Token::HeadingOpen {
                    level: heading_level_to_u8(level),
                });
            }
            Event::End(TagEnd::Heading(level)) => {
                flush(&mut run, &mut tokens);
                tokens.push(Token::HeadingClose {
                    level: heading_level_to_u8(level),
                });
            }
            Event::End(TagEnd::Paragraph | TagEnd::Item) => {
                flush(&mut run, &mut tokens);
            }
            Event::Start(Tag::CodeBlock(_)) => {
                flush(&mut run, &mut tokens);
                tokens.push(Token::Other);
                code_depth = 1;
            }
            Event::Start(Tag::Emphasis) | Event::End(TagEnd::Emphasis) => {
                run.push('*');
            }
            Event::Start(Tag::Strong) | Event::End(TagEnd::Strong) => {
                run.push_str("**");
            }
            Event::Text(text) => run.push_str(&text),
            Event::Code(code) => {
                // Inline code keeps its backticks, like raw source content.
                run.push('`');
                run.push_str(&code);
                run.push('`');
            }
            Event::SoftBreak | Event::HardBreak => run.push('\n'),
            Event::Rule => {
                flush(&mut run, &mut tokens);
                tokens.push(Token::Other);
            }
            Event::InlineHtml(html) => run.push_str(&html),
            Event::Html(_) => {
                flush(&mut run, &mut tokens);
                tokens.push(Token::Other);
            }
            // Remaining container structure (lists, block quotes, links)
            // contributes no content of its own.
            _ => {}
        }
    }
    flush(&mut run, &mut tokens);

    tokens
}
