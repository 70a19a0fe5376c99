use crate::compiler::CompileError;
use crate::parser::{LexError, SyntaxError};
use crate::serializer::SerializeError;
use thiserror::Error;

/// Any failure raised by the SQL front end
#[derive(Error, Debug)]
pub enum SqlError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),

    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Serialize error: {0}")]
    Serialize(#[from] SerializeError),
}

impl SqlError {
    /// Character offset of the problem in the rule text, when known
    pub fn position(&self) -> Option<usize> {
        match self {
            SqlError::Lex(e) => Some(e.position()),
            SqlError::Syntax(e) => Some(e.position()),
            SqlError::Compile(_) | SqlError::Serialize(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SqlError>;
