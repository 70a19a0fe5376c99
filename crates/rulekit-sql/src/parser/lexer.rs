//! Lexer for the SQL WHERE grammar
//!
//! The lexer turns rule text into a token stream terminated by a single
//! `Eof` token. Positions are character offsets into the source.

use super::token::{Keyword, Token, TokenKind};
use crate::ast::ComparisonOp;
use thiserror::Error;

/// Lexical error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("Unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    #[error("Unterminated string literal starting at position {position}")]
    UnterminatedString { position: usize },

    #[error("Invalid number literal '{text}' at position {position}")]
    InvalidNumber { text: String, position: usize },
}

impl LexError {
    pub fn position(&self) -> usize {
        match self {
            LexError::UnexpectedCharacter { position, .. }
            | LexError::UnterminatedString { position }
            | LexError::InvalidNumber { position, .. } => *position,
        }
    }
}

pub type LexResult<T> = Result<T, LexError>;

/// Lexer for tokenizing rule text
///
/// Cursor state lives on the instance and is reset at the start of every
/// [`Lexer::tokenize`] call, so one lexer must not be shared between
/// concurrent callers.
#[derive(Debug, Default)]
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    /// Create a new lexer
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize all input
    pub fn tokenize(&mut self, source: &str) -> LexResult<Vec<Token>> {
        self.input = source.chars().collect();
        self.position = 0;

        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        tracing::trace!(count = tokens.len(), "tokenized rule source");
        Ok(tokens)
    }

    fn next_token(&mut self) -> LexResult<Token> {
        self.skip_whitespace();

        let start = self.position;
        let Some(ch) = self.current_char() else {
            return Ok(Token::new(TokenKind::Eof, start));
        };

        if ch == '\'' {
            return self.lex_string();
        }

        if ch.is_ascii_digit() || (ch == '-' && self.peek_char().is_some_and(|c| c.is_ascii_digit()))
        {
            return self.lex_number();
        }

        if ch.is_ascii_alphabetic() || ch == '_' {
            return Ok(self.lex_identifier_or_keyword());
        }

        self.lex_operator_or_punctuation()
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.current_char()?;
        self.position += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(|c| (c as u32) <= 32) {
            self.position += 1;
        }
    }

    fn lex_string(&mut self) -> LexResult<Token> {
        let start = self.position;
        self.advance(); // Skip opening quote

        let mut value = String::new();
        while let Some(ch) = self.advance() {
            if ch != '\'' {
                value.push(ch);
                continue;
            }

            // '' inside a string is an escaped quote
            if self.current_char() == Some('\'') {
                self.advance();
                value.push('\'');
            } else {
                return Ok(Token::new(TokenKind::String(value), start));
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    fn lex_number(&mut self) -> LexResult<Token> {
        let start = self.position;
        let mut text = String::new();

        if self.current_char() == Some('-') {
            text.push('-');
            self.advance();
        }

        self.take_digits(&mut text);

        let mut is_float = false;
        if self.current_char() == Some('.') && self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            text.push('.');
            self.advance();
            self.take_digits(&mut text);
        }

        let kind = if is_float {
            text.parse::<f64>().ok().map(TokenKind::Number)
        } else {
            text.parse::<i64>().ok().map(TokenKind::Int)
        };

        kind.map(|kind| Token::new(kind, start))
            .ok_or(LexError::InvalidNumber { text, position: start })
    }

    fn take_digits(&mut self, text: &mut String) {
        while let Some(ch) = self.current_char().filter(char::is_ascii_digit) {
            text.push(ch);
            self.position += 1;
        }
    }

    fn lex_identifier_or_keyword(&mut self) -> Token {
        let start = self.position;
        let mut ident = String::new();

        while let Some(ch) = self
            .current_char()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '.')
        {
            ident.push(ch);
            self.position += 1;
        }

        let kind = match Keyword::from_upper(&ident.to_ascii_uppercase()) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier(ident),
        };

        Token::new(kind, start)
    }

    fn lex_operator_or_punctuation(&mut self) -> LexResult<Token> {
        let start = self.position;
        let Some(ch) = self.advance() else {
            return Ok(Token::new(TokenKind::Eof, start));
        };

        // Try to match two-character operators
        if let Some(next_ch) = self.current_char() {
            let op = match (ch, next_ch) {
                ('!', '=') => Some(ComparisonOp::NotEq),
                ('<', '>') => Some(ComparisonOp::LtGt),
                ('<', '=') => Some(ComparisonOp::LtEq),
                ('>', '=') => Some(ComparisonOp::GtEq),
                _ => None,
            };

            if let Some(op) = op {
                self.advance();
                return Ok(Token::new(TokenKind::Operator(op), start));
            }
        }

        // Match single-character operators and punctuation
        let kind = match ch {
            '=' => TokenKind::Operator(ComparisonOp::Eq),
            '<' => TokenKind::Operator(ComparisonOp::Lt),
            '>' => TokenKind::Operator(ComparisonOp::Gt),
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            _ => return Err(LexError::UnexpectedCharacter { ch, position: start }),
        };

        Ok(Token::new(kind, start))
    }
}
