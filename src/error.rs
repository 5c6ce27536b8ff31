//! Error types and position tracking for INI processing
//!
//! Tokenizer failures carry the source position where they were detected.
//! Everything a caller can observe is folded into [`IniError`].

use std::fmt;
use thiserror::Error;

/// Represents a position in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Byte offset from start of input (0-based)
    pub offset: usize,
}

impl Position {
    /// Creates a new position at the start of input
    pub fn new() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Main error type for INI operations
#[derive(Debug, Error)]
pub enum IniError {
    /// A strict accessor named a section that does not exist
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    /// The section exists but the option does not
    #[error("Option not found: {0}")]
    OptionNotFound(String),

    /// Failed type conversion or an illegal structural operation
    #[error("Value error: {0}")]
    Value(String),

    /// Lexical analysis error
    #[error("Tokenizer error: {0}")]
    Tokenize(#[from] TokenizeError),

    /// A section header was repeated while duplicates are rejected
    #[error("Duplicate section '{name}' at {position}")]
    DuplicateSection { name: String, position: Position },

    /// I/O error from the file collaborator
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serde deserialization error
    #[error("Deserialize error: {0}")]
    Deserialize(String),
}

impl IniError {
    /// Shorthand for a [`IniError::Value`] error
    pub fn value(message: impl Into<String>) -> Self {
        IniError::Value(message.into())
    }
}

impl serde::de::Error for IniError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        IniError::Deserialize(msg.to_string())
    }
}

/// Lexical analysis errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// Quoted string not closed before end of input
    #[error("Unterminated string at {position}")]
    UnterminatedString { position: Position },

    /// Section header not closed before a newline or end of input
    #[error("Unterminated section at {position}")]
    UnterminatedSection { position: Position },

    /// Character outside the bare-string set, in strict mode
    #[error("Syntax error at {position}: {message}")]
    Syntax { position: Position, message: String },
}

impl TokenizeError {
    /// Position at which the error was detected
    pub fn position(&self) -> Position {
        match self {
            TokenizeError::UnterminatedString { position }
            | TokenizeError::UnterminatedSection { position }
            | TokenizeError::Syntax { position, .. } => *position,
        }
    }

    /// Line on which the error was detected (1-based)
    pub fn line(&self) -> usize {
        self.position().line
    }
}

/// Result alias used throughout the crate
pub type Result<T, E = IniError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_display() {
        let pos = Position {
            line: 4,
            column: 9,
            offset: 31,
        };
        assert_eq!(pos.to_string(), "4:9");
        assert_eq!(Position::default(), Position::new());
    }

    #[test]
    fn test_error_messages() {
        let err = TokenizeError::UnterminatedSection {
            position: Position {
                line: 3,
                column: 1,
                offset: 20,
            },
        };
        assert_eq!(err.to_string(), "Unterminated section at 3:1");
        assert_eq!(err.line(), 3);

        let err: IniError = err.into();
        assert!(err.to_string().starts_with("Tokenizer error: "));

        assert_eq!(
            IniError::SectionNotFound("db".to_string()).to_string(),
            "Section not found: db"
        );
        assert_eq!(
            IniError::value("Cannot add default section.").to_string(),
            "Value error: Cannot add default section."
        );
    }

    #[test]
    fn test_serde_custom_error() {
        let err = <IniError as serde::de::Error>::custom("missing field `port`");
        assert!(matches!(err, IniError::Deserialize(ref m) if m.contains("port")));
    }
}
