//! Lossless T-SQL tokenizer.
//!
//! Every character of the input ends up in exactly one token, trivia
//! included, so rules can scan the stream for whitespace and comments.

use crate::error::{ParseError, Result};
use crate::token::{Token, TokenKind};

const TWO_CHAR_OPERATORS: &[&str] = &[
    "<=", ">=", "<>", "!=", "!<", "!>", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "::",
];

/// A lexer that tokenizes T-SQL input.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    line: u32,
    column: u32,
    /// Byte position, line and column of the current token's start.
    start: usize,
    start_line: u32,
    start_column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
            start: 0,
            start_line: 1,
            start_column: 1,
        }
    }

    /// Tokenizes the whole input.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        tracing::trace!(tokens = tokens.len(), "Tokenized script");
        Ok(tokens)
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(
            kind,
            &self.input[self.start..self.pos],
            self.start,
            self.start_line,
            self.start_column,
        )
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        self.start = self.pos;
        self.start_line = self.line;
        self.start_column = self.column;

        let Some(c) = self.peek() else {
            return Ok(None);
        };

        let kind = match c {
            c if c.is_whitespace() => {
                while self.peek().is_some_and(char::is_whitespace) {
                    self.advance();
                }
                TokenKind::Whitespace
            }
            '-' if self.peek_next() == Some('-') => {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                TokenKind::LineComment
            }
            '/' if self.peek_next() == Some('*') => self.scan_block_comment()?,
            'N' | 'n' if self.peek_next() == Some('\'') => {
                self.advance();
                self.scan_string()?
            }
            '\'' => self.scan_string()?,
            '[' => self.scan_quoted_identifier(']')?,
            '"' => self.scan_quoted_identifier('"')?,
            '@' => {
                self.advance();
                while self.peek().is_some_and(is_identifier_part) {
                    self.advance();
                }
                TokenKind::Variable
            }
            c if c.is_alphabetic() || c == '_' || c == '#' => {
                while self.peek().is_some_and(is_identifier_part) {
                    self.advance();
                }
                TokenKind::Identifier
            }
            c if c.is_ascii_digit() => self.scan_number(),
            ',' => self.single(TokenKind::Comma),
            '.' => self.single(TokenKind::Dot),
            ';' => self.single(TokenKind::Semicolon),
            '(' => self.single(TokenKind::LeftParen),
            ')' => self.single(TokenKind::RightParen),
            _ => {
                let two_char = self
                    .peek_next()
                    .map(|next| format!("{c}{next}"))
                    .is_some_and(|pair| TWO_CHAR_OPERATORS.contains(&pair.as_str()));
                self.advance();
                if two_char {
                    self.advance();
                }
                TokenKind::Operator
            }
        };

        Ok(Some(self.make_token(kind)))
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// Block comments nest in T-SQL.
    fn scan_block_comment(&mut self) -> Result<TokenKind> {
        self.advance(); // /
        self.advance(); // *
        let mut depth = 1usize;
        while depth > 0 {
            match self.advance() {
                Some('/') if self.peek() == Some('*') => {
                    self.advance();
                    depth += 1;
                }
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    depth -= 1;
                }
                Some(_) => {}
                None => {
                    return Err(ParseError::UnterminatedComment {
                        line: self.start_line,
                        column: self.start_column,
                    })
                }
            }
        }
        Ok(TokenKind::BlockComment)
    }

    /// Scans a string literal; the current character is the opening quote.
    fn scan_string(&mut self) -> Result<TokenKind> {
        self.advance(); // opening quote
        loop {
            match self.advance() {
                Some('\'') if self.peek() == Some('\'') => {
                    self.advance();
                }
                Some('\'') => return Ok(TokenKind::StringLiteral),
                Some(_) => {}
                None => {
                    return Err(ParseError::UnterminatedString {
                        line: self.start_line,
                        column: self.start_column,
                    })
                }
            }
        }
    }

    /// Scans `[name]` or `"name"`; a doubled closing quote is an escape.
    fn scan_quoted_identifier(&mut self, close: char) -> Result<TokenKind> {
        self.advance(); // opening quote
        loop {
            match self.advance() {
                Some(c) if c == close && self.peek() == Some(close) => {
                    self.advance();
                }
                Some(c) if c == close => return Ok(TokenKind::QuotedIdentifier),
                Some(_) => {}
                None => {
                    return Err(ParseError::UnterminatedIdentifier {
                        line: self.start_line,
                        column: self.start_column,
                    })
                }
            }
        }
    }

    fn scan_number(&mut self) -> TokenKind {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        if self.peek().is_some_and(|c| c == 'e' || c == 'E')
            && self
                .peek_next()
                .is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-')
        {
            self.advance();
            if self.peek().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        TokenKind::Number
    }
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '#' | '$' | '@')
}

/// Tokenizes `input` into a lossless token stream.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Lexer::new(input).tokenize()
}
