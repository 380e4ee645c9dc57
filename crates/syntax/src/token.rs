//! Lexical tokens of a T-SQL script.

/// Token categories produced by the lexer.
///
/// Keywords are not distinguished from identifiers; callers compare
/// token text with [`Token::is_keyword`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Spaces, tabs and line breaks
    Whitespace,
    /// `-- ...` up to (not including) the line break
    LineComment,
    /// `/* ... */`, possibly nested
    BlockComment,
    /// Bare word, including keywords and `#temp` names
    Identifier,
    /// `[name]` or `"name"`
    QuotedIdentifier,
    /// `@name` or `@@name`
    Variable,
    /// `'text'` or `N'text'`
    StringLiteral,
    Number,
    Comma,
    Dot,
    Semicolon,
    LeftParen,
    RightParen,
    /// Any other punctuation (`=`, `<>`, `+`, `*`, ...)
    Operator,
}

/// A token with its source text and position.
///
/// `line` and `column` are 1-based; a tab counts as a single column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Byte offset in the source
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize, line: u32, column: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
            line,
            column,
        }
    }

    /// Whitespace and comments.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }

    /// Returns true if this is a bare word equal to `keyword`, ignoring ASCII case.
    #[must_use]
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text.eq_ignore_ascii_case(keyword)
    }

    /// Returns true if this bare word is one of `keywords`, ignoring ASCII case.
    #[must_use]
    pub fn is_any_keyword(&self, keywords: &[&str]) -> bool {
        self.kind == TokenKind::Identifier
            && keywords.iter().any(|k| self.text.eq_ignore_ascii_case(k))
    }

    /// Identifier value with `[]`/`""` quoting removed and escapes resolved.
    #[must_use]
    pub fn identifier_value(&self) -> String {
        if self.kind != TokenKind::QuotedIdentifier || self.text.len() < 2 {
            return self.text.clone();
        }
        let inner = &self.text[1..self.text.len() - 1];
        if self.text.starts_with('[') {
            inner.replace("]]", "]")
        } else {
            inner.replace("\"\"", "\"")
        }
    }

    /// Number of characters before the first content character of a string
    /// literal (`1` for `'..'`, `2` for `N'..'`).
    #[must_use]
    pub fn string_prefix_len(&self) -> usize {
        if self.text.starts_with(|c| c == 'N' || c == 'n') {
            2
        } else {
            1
        }
    }

    /// Content of a string literal with the quotes removed and `''` unescaped.
    #[must_use]
    pub fn string_value(&self) -> Option<String> {
        if self.kind != TokenKind::StringLiteral {
            return None;
        }
        let prefix = self.string_prefix_len();
        let inner = self.text.get(prefix..self.text.len().saturating_sub(1))?;
        Some(inner.replace("''", "'"))
    }
}
