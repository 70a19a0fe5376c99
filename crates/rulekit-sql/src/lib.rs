//! SQL WHERE grammar for rulekit
//!
//! Rule text such as `age >= 18 AND country = 'US'` is tokenized, parsed
//! into a [`SqlNode`] tree and compiled to a [`rulekit_core::Predicate`].
//! [`SqlFrontend`] bundles the pipeline behind [`rulekit_core::DslFrontend`].

pub mod ast;
pub mod compiler;
pub mod config;
pub mod error;
pub mod frontend;
pub mod parser;
pub mod serializer;
pub mod validator;

pub use ast::{ComparisonOp, LogicalOp, SqlNode};
pub use compiler::{like_to_regex, CompileError, Compiler};
pub use config::SqlDslConfig;
pub use error::{Result, SqlError};
pub use frontend::SqlFrontend;
pub use parser::{LexError, Lexer, Parser, SyntaxError, Token, TokenKind};
pub use serializer::{regex_to_like, SerializeError, Serializer};
pub use validator::Validator;

pub use rulekit_core::DslFrontend;
