//! Recursive-descent parser for SQL WHERE expressions
//!
//! ```text
//! expr       := or_expr
//! or_expr    := and_expr ("OR" and_expr)*
//! and_expr   := not_expr ("AND" not_expr)*
//! not_expr   := "NOT" not_expr | comparison
//! comparison := "(" expr ")" [suffix]
//!             | primary suffix
//! suffix     := "IS" ["NOT"] "NULL"
//!             | "BETWEEN" primary "AND" primary
//!             | ["NOT"] "IN" "(" literal ("," literal)* ")"
//!             | ["NOT"] "LIKE" string
//!             | comp_op primary
//! primary    := "(" expr ")" | number | string | TRUE | FALSE | NULL | identifier
//! ```

use super::lexer::Lexer;
use super::token::{Keyword, Token, TokenKind};
use crate::ast::SqlNode;
use crate::config::SqlDslConfig;
use crate::error::SqlError;
use rulekit_core::Value;
use thiserror::Error;

/// Syntax error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("Unexpected token at position {position}: expected {expected}, got {got}")]
    UnexpectedToken {
        expected: String,
        got: String,
        position: usize,
    },

    #[error("Unexpected end of input at position {position}: expected {expected}")]
    UnexpectedEof { expected: String, position: usize },

    #[error("Unexpected trailing input at position {position}: {got}")]
    TrailingInput { got: String, position: usize },

    #[error("Expression nested deeper than {max_depth} levels at position {position}")]
    NestingTooDeep { max_depth: usize, position: usize },
}

impl SyntaxError {
    pub fn position(&self) -> usize {
        match self {
            SyntaxError::UnexpectedToken { position, .. }
            | SyntaxError::UnexpectedEof { position, .. }
            | SyntaxError::TrailingInput { position, .. }
            | SyntaxError::NestingTooDeep { position, .. } => *position,
        }
    }
}

pub type ParseResult<T> = Result<T, SyntaxError>;

/// Parser for SQL WHERE expressions
///
/// Owns its lexer and token cursor; both are reset by every call to
/// [`Parser::parse`].
#[derive(Debug)]
pub struct Parser {
    lexer: Lexer,
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
    max_depth: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(&SqlDslConfig::default())
    }
}

impl Parser {
    /// Create a new parser
    pub fn new(config: &SqlDslConfig) -> Self {
        Self {
            lexer: Lexer::new(),
            tokens: Vec::new(),
            position: 0,
            depth: 0,
            max_depth: config.max_depth,
        }
    }

    /// Parse rule text into an expression tree
    pub fn parse(&mut self, source: &str) -> Result<SqlNode, SqlError> {
        self.tokens = self.lexer.tokenize(source)?;
        self.position = 0;
        self.depth = 0;

        let expr = self.parse_expression()?;

        if !self.is_at_end() {
            let token = self.current();
            return Err(SyntaxError::TrailingInput {
                got: token.kind.to_string(),
                position: token.position,
            }
            .into());
        }

        Ok(expr)
    }

    fn parse_expression(&mut self) -> ParseResult<SqlNode> {
        self.parse_logical_or()
    }

    fn parse_logical_or(&mut self) -> ParseResult<SqlNode> {
        let mut left = self.parse_logical_and()?;

        let mut folds = 0;
        while self.check_keyword(Keyword::Or) {
            let position = self.current().position;
            self.advance();
            self.enter(position)?;
            folds += 1;
            let right = self.parse_logical_and()?;
            left = SqlNode::or(vec![left, right]);
        }
        self.depth -= folds;

        Ok(left)
    }

    fn parse_logical_and(&mut self) -> ParseResult<SqlNode> {
        let mut left = self.parse_logical_not()?;

        let mut folds = 0;
        while self.check_keyword(Keyword::And) {
            let position = self.current().position;
            self.advance();
            self.enter(position)?;
            folds += 1;
            let right = self.parse_logical_not()?;
            left = SqlNode::and(vec![left, right]);
        }
        self.depth -= folds;

        Ok(left)
    }

    fn parse_logical_not(&mut self) -> ParseResult<SqlNode> {
        // NOT IN / NOT LIKE belong to a comparison suffix, not to this rule
        if self.check_keyword(Keyword::Not) && !self.peek_is_negatable() {
            let position = self.current().position;
            self.advance();
            self.enter(position)?;
            let operand = self.parse_logical_not()?;
            self.leave();
            return Ok(SqlNode::not(operand));
        }

        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> ParseResult<SqlNode> {
        if self.check_token(&TokenKind::LParen) {
            let group = self.parse_group()?;
            if !self.starts_suffix() {
                return Ok(group);
            }
            return self.parse_suffix(group);
        }

        let left = self.parse_primary()?;
        self.parse_suffix(left)
    }

    /// Check if the current token begins the operator part of a comparison
    fn starts_suffix(&self) -> bool {
        match self.current().kind {
            TokenKind::Operator(_) => true,
            TokenKind::Keyword(Keyword::Is | Keyword::Between | Keyword::In | Keyword::Like) => true,
            TokenKind::Keyword(Keyword::Not) => self.peek_is_negatable(),
            _ => false,
        }
    }

    /// Parse the operator part of a comparison whose left side is `left`
    fn parse_suffix(&mut self, left: SqlNode) -> ParseResult<SqlNode> {
        let kind = self.current().kind.clone();

        match kind {
            TokenKind::Operator(op) => {
                self.advance();
                let right = self.parse_primary()?;
                Ok(SqlNode::comparison(left, op, right))
            }

            TokenKind::Keyword(Keyword::Is) => {
                self.advance();
                let negated = self.check_keyword(Keyword::Not);
                if negated {
                    self.advance();
                }
                self.expect_keyword(Keyword::Null)?;
                Ok(SqlNode::is_null(left, negated))
            }

            TokenKind::Keyword(Keyword::Between) => {
                self.advance();
                let min = self.parse_primary()?;
                self.expect_keyword(Keyword::And)?;
                let max = self.parse_primary()?;
                Ok(SqlNode::between(left, min, max))
            }

            TokenKind::Keyword(Keyword::Not) if self.peek_is_negatable() => {
                self.advance();
                self.parse_in_or_like(left, true)
            }

            TokenKind::Keyword(Keyword::In | Keyword::Like) => self.parse_in_or_like(left, false),

            _ => Err(self.unexpected("comparison operator")),
        }
    }

    fn parse_in_or_like(&mut self, left: SqlNode, negated: bool) -> ParseResult<SqlNode> {
        if self.check_keyword(Keyword::Like) {
            self.advance();
            let pattern = self.expect_string()?;
            return Ok(SqlNode::like(left, pattern, negated));
        }

        self.expect_keyword(Keyword::In)?;
        self.expect_token(TokenKind::LParen)?;

        let mut values = vec![self.parse_literal()?];
        while self.check_token(&TokenKind::Comma) {
            self.advance();
            values.push(self.parse_literal()?);
        }

        self.expect_token(TokenKind::RParen)?;
        Ok(SqlNode::in_list(left, values, negated))
    }

    fn parse_group(&mut self) -> ParseResult<SqlNode> {
        let position = self.current().position;
        self.expect_token(TokenKind::LParen)?;
        self.enter(position)?;
        let expr = self.parse_expression()?;
        self.expect_token(TokenKind::RParen)?;
        self.leave();
        Ok(expr)
    }

    fn parse_primary(&mut self) -> ParseResult<SqlNode> {
        match self.current().kind.clone() {
            TokenKind::Identifier(path) => {
                self.advance();
                Ok(SqlNode::Field(path))
            }
            TokenKind::LParen => self.parse_group(),
            kind if kind.is_literal() => Ok(SqlNode::Literal(self.parse_literal()?)),
            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_literal(&mut self) -> ParseResult<Value> {
        let value = match &self.current().kind {
            TokenKind::Int(n) => Value::Int(*n),
            TokenKind::Number(n) => Value::Number(*n),
            TokenKind::String(s) => Value::Text(s.clone()),
            TokenKind::Keyword(Keyword::True) => Value::Bool(true),
            TokenKind::Keyword(Keyword::False) => Value::Bool(false),
            TokenKind::Keyword(Keyword::Null) => Value::Null,
            _ => return Err(self.unexpected("literal")),
        };
        self.advance();
        Ok(value)
    }

    // Helper methods

    fn current(&self) -> &Token {
        // The lexer always terminates the stream with Eof and `advance`
        // never moves past it.
        &self.tokens[self.position]
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position + 1)
    }

    /// Check if the token after the current one is IN or LIKE
    fn peek_is_negatable(&self) -> bool {
        self.peek().is_some_and(|t| {
            t.kind.is_keyword(Keyword::In) || t.kind.is_keyword(Keyword::Like)
        })
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.position += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    fn check_token(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current().kind.is_keyword(keyword)
    }

    fn enter(&mut self, position: usize) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(SyntaxError::NestingTooDeep {
                max_depth: self.max_depth,
                position,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        let token = self.current();
        if self.is_at_end() {
            SyntaxError::UnexpectedEof {
                expected: expected.to_string(),
                position: token.position,
            }
        } else {
            SyntaxError::UnexpectedToken {
                expected: expected.to_string(),
                got: token.kind.to_string(),
                position: token.position,
            }
        }
    }

    fn expect_token(&mut self, expected: TokenKind) -> ParseResult<()> {
        if self.check_token(&expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", expected)))
        }
    }

    fn expect_keyword(&mut self, expected: Keyword) -> ParseResult<()> {
        if self.check_keyword(expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(expected.as_str()))
        }
    }

    fn expect_string(&mut self) -> ParseResult<String> {
        match &self.current().kind {
            TokenKind::String(s) => {
                let result = s.clone();
                self.advance();
                Ok(result)
            }
            _ => Err(self.unexpected("string literal")),
        }
    }
}
