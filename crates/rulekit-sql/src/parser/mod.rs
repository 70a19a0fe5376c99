//! SQL WHERE expression parser
//!
//! Text is tokenized by [`Lexer`] and turned into a [`crate::ast::SqlNode`]
//! by the recursive-descent [`Parser`].

pub mod lexer;
pub mod parse;
pub mod token;

pub use lexer::{LexError, LexResult, Lexer};
pub use parse::{ParseResult, Parser, SyntaxError};
pub use token::{Keyword, Token, TokenKind};
