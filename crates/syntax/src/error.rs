use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors raised while turning script text into a token stream.
///
/// The parser itself is lenient and never fails; only unterminated
/// lexical constructs are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unterminated string literal starting at {line}:{column}")]
    UnterminatedString { line: u32, column: u32 },

    #[error("Unterminated block comment starting at {line}:{column}")]
    UnterminatedComment { line: u32, column: u32 },

    #[error("Unterminated quoted identifier starting at {line}:{column}")]
    UnterminatedIdentifier { line: u32, column: u32 },
}
