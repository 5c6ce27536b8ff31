//! INI lexical analyzer
//!
//! This module converts INI text into a finite stream of tokens. The
//! tokenizer makes a single forward pass with one character of lookahead
//! and never backtracks.

use crate::error::{Position, TokenizeError};
use std::borrow::Cow;
use tracing::trace;

/// Bitfield flags for character classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterFlags(u8);

impl CharacterFlags {
    /// Inline whitespace (space, tab, carriage return)
    pub const WHITESPACE: Self = Self(1 << 0);
    /// Line feed, which is a token of its own
    pub const NEWLINE: Self = Self(1 << 1);
    /// Characters allowed inside a bare string
    pub const BARE: Self = Self(1 << 2);
    /// Characters that open a comment
    pub const COMMENT_START: Self = Self(1 << 3);
    /// Characters that need an escape inside a quoted string
    pub const ESCAPE: Self = Self(1 << 4);

    /// Creates empty flags
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Checks if any of the given flags are set
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Returns the union of two flag sets
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Character lookup table for O(1) ASCII classification
#[derive(Debug, Clone)]
pub struct CharacterTable([CharacterFlags; 128]);

impl CharacterTable {
    /// Creates a new character table with compile-time initialization
    pub const fn new() -> Self {
        let mut table = [CharacterFlags::empty(); 128];
        let mut i = 0;

        while i < 128 {
            let ch = i as u8;
            let mut flags = CharacterFlags::empty();

            match ch {
                b' ' | b'\t' | b'\r' => flags = flags.union(CharacterFlags::WHITESPACE),
                b'\n' => flags = flags.union(CharacterFlags::NEWLINE),
                _ => {}
            }

            match ch {
                b'a'..=b'z'
                | b'A'..=b'Z'
                | b'0'..=b'9'
                | b'_'
                | b'-'
                | b'.'
                | b'+'
                | b'!'
                | b'*'
                | b'/'
                | b'\\' => flags = flags.union(CharacterFlags::BARE),
                _ => {}
            }

            match ch {
                b'#' | b';' => flags = flags.union(CharacterFlags::COMMENT_START),
                _ => {}
            }

            match ch {
                b'\\' | b'"' | b'\n' | b'\r' | b'\t' => {
                    flags = flags.union(CharacterFlags::ESCAPE);
                }
                _ => {}
            }

            table[i] = flags;
            i += 1;
        }

        Self(table)
    }

    /// Returns the flags for an ASCII byte
    #[inline(always)]
    pub const fn get_flags(&self, ch: u8) -> CharacterFlags {
        if ch < 128 {
            self.0[ch as usize]
        } else {
            CharacterFlags::empty()
        }
    }

    /// Tests if a character has any of the given flags
    ///
    /// Non-ASCII letters and digits count as bare characters and non-ASCII
    /// whitespace counts as inline whitespace.
    #[inline(always)]
    pub fn test_char(&self, ch: char, flags: CharacterFlags) -> bool {
        if ch.is_ascii() {
            self.get_flags(ch as u8).intersects(flags)
        } else if ch.is_alphanumeric() {
            flags.intersects(CharacterFlags::BARE)
        } else if ch.is_whitespace() {
            flags.intersects(CharacterFlags::WHITESPACE)
        } else {
            false
        }
    }

    /// Checks if a character may appear in a bare string
    #[inline(always)]
    pub fn is_bare_char(&self, ch: char) -> bool {
        self.test_char(ch, CharacterFlags::BARE)
    }

    /// Checks if a character is inline whitespace
    #[inline(always)]
    pub fn is_inline_whitespace(&self, ch: char) -> bool {
        self.test_char(ch, CharacterFlags::WHITESPACE)
    }

    /// Checks if a character opens a comment
    #[inline(always)]
    pub fn is_comment_start(&self, ch: char) -> bool {
        self.test_char(ch, CharacterFlags::COMMENT_START)
    }

    /// Checks if a character needs escaping in a quoted string
    #[inline(always)]
    pub fn needs_escape(&self, ch: char) -> bool {
        self.test_char(ch, CharacterFlags::ESCAPE)
    }
}

impl Default for CharacterTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Global character table instance
pub static CHARACTER_TABLE: CharacterTable = CharacterTable::new();

/// Configuration options for the tokenizer
#[derive(Debug, Clone)]
pub struct LexerConfig {
    /// Reject characters outside the bare-string set with a syntax error.
    /// When false such a character ends the current token and the rest of
    /// its line is skipped, up to a newline or comment marker.
    pub strict_characters: bool,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            strict_characters: true,
        }
    }
}

/// How a string token was written in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    /// Unquoted run of bare characters, trimmed at the edges
    Bare,
    /// Double-quoted string with escape sequences resolved
    Quoted,
}

/// INI token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// `[name]` header, brackets removed
    Section(Cow<'a, str>),
    /// `=`
    Equals,
    /// `:`
    Colon,
    /// Bare or quoted string
    String {
        value: Cow<'a, str>,
        format: StringFormat,
    },
    /// Comment text including its `#` or `;` marker
    Comment(Cow<'a, str>),
    Newline,
    Eof,
}

impl<'a> Token<'a> {
    /// Returns true for `=` and `:`
    pub fn is_assignment(&self) -> bool {
        matches!(self, Token::Equals | Token::Colon)
    }

    /// Shorthand for a bare string token
    pub fn bare(value: &'a str) -> Self {
        Token::String {
            value: Cow::Borrowed(value),
            format: StringFormat::Bare,
        }
    }

    /// Shorthand for a quoted string token
    pub fn quoted(value: impl Into<Cow<'a, str>>) -> Self {
        Token::String {
            value: value.into(),
            format: StringFormat::Quoted,
        }
    }
}

/// INI tokenizer
///
/// Produces tokens lazily through [`Tokenizer::next_token`] or the
/// [`Iterator`] impl. The iterator ends after yielding [`Token::Eof`] or the
/// first error; it cannot be restarted.
#[derive(Clone)]
pub struct Tokenizer<'a> {
    /// Input text being tokenized
    input: &'a str,
    /// Current byte position in input
    position: usize,
    /// Current line number (1-based)
    line: usize,
    /// Current column number (1-based)
    column: usize,
    /// Tokenizer configuration
    config: LexerConfig,
    /// Cached current character
    current_char: Option<char>,
    /// Start position of the last produced token
    last_token_start: Position,
    /// Set once Eof or an error has been produced
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    /// Creates a new tokenizer with default configuration
    pub fn new(input: &'a str) -> Self {
        Self::with_config(input, LexerConfig::default())
    }

    /// Creates a new tokenizer with custom configuration
    pub fn with_config(input: &'a str, config: LexerConfig) -> Self {
        Self {
            input,
            position: 0,
            line: 1,
            column: 1,
            config,
            current_char: input.chars().next(),
            last_token_start: Position::new(),
            finished: false,
        }
    }

    /// Returns the current position in the input
    #[inline(always)]
    pub fn current_position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            offset: self.position,
        }
    }

    /// Returns the start position of the last produced token
    pub fn last_token_start(&self) -> Position {
        self.last_token_start
    }

    /// Returns the current line (1-based)
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the underlying source text
    pub fn source(&self) -> &'a str {
        self.input
    }

    /// Advances to the next character and returns the one consumed
    #[inline(always)]
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.current_char?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else if ch != '\r' {
            self.column += 1;
        }
        self.position += ch.len_utf8();
        self.current_char = self.input[self.position..].chars().next();
        Some(ch)
    }

    /// Skips inline whitespace, stopping at newlines
    pub fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char {
            if CHARACTER_TABLE.is_inline_whitespace(ch) {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Tokenizes the whole input, including the trailing [`Token::Eof`]
    pub fn tokenize(mut self) -> Result<Vec<Token<'a>>, TokenizeError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Returns the next token from the input
    pub fn next_token(&mut self) -> Result<Token<'a>, TokenizeError> {
        loop {
            self.skip_whitespace();
            self.last_token_start = self.current_position();

            let Some(ch) = self.current_char else {
                return Ok(Token::Eof);
            };

            let token = match ch {
                '\n' => {
                    self.advance();
                    Token::Newline
                }
                '[' => self.lex_section()?,
                '=' => {
                    self.advance();
                    Token::Equals
                }
                ':' => {
                    self.advance();
                    Token::Colon
                }
                '"' => self.lex_quoted_string()?,
                _ if CHARACTER_TABLE.is_comment_start(ch) => self.lex_comment(),
                _ if CHARACTER_TABLE.is_bare_char(ch) => self.lex_bare_string(),
                _ if self.config.strict_characters => {
                    return Err(TokenizeError::Syntax {
                        position: self.current_position(),
                        message: format!("Unexpected character: {}", ch),
                    });
                }
                _ => {
                    trace!(character = %ch, line = self.line, "dropping rest of line");
                    self.skip_unsupported();
                    continue;
                }
            };

            return Ok(token);
        }
    }

    /// Skips from an unsupported character up to the next newline or comment
    fn skip_unsupported(&mut self) {
        while let Some(ch) = self.current_char {
            if ch == '\n' || CHARACTER_TABLE.is_comment_start(ch) {
                break;
            }
            self.advance();
        }
    }

    /// Lexes `[name]`; the header must close on the line it opened
    fn lex_section(&mut self) -> Result<Token<'a>, TokenizeError> {
        let open = self.current_position();
        self.advance();
        let start = self.position;

        while let Some(ch) = self.current_char {
            match ch {
                ']' => {
                    let name = self.input[start..self.position].trim();
                    self.advance();
                    return Ok(Token::Section(Cow::Borrowed(name)));
                }
                '\n' => break,
                _ => {
                    self.advance();
                }
            }
        }

        Err(TokenizeError::UnterminatedSection { position: open })
    }

    /// Lexes a double-quoted string, resolving `\n \t \r \" \\`
    ///
    /// Unknown escapes pass through without the backslash.
    fn lex_quoted_string(&mut self) -> Result<Token<'a>, TokenizeError> {
        let open = self.current_position();
        self.advance();
        let start = self.position;

        // Borrow the slice until the first escape forces a copy
        let mut owned: Option<String> = None;

        while let Some(ch) = self.current_char {
            match ch {
                '"' => {
                    let value = match owned {
                        Some(s) => Cow::Owned(s),
                        None => Cow::Borrowed(&self.input[start..self.position]),
                    };
                    self.advance();
                    return Ok(Token::quoted(value));
                }
                '\\' => {
                    let buffer = owned
                        .get_or_insert_with(|| self.input[start..self.position].to_string());
                    self.advance();
                    match self.advance() {
                        Some('n') => buffer.push('\n'),
                        Some('t') => buffer.push('\t'),
                        Some('r') => buffer.push('\r'),
                        Some(other) => buffer.push(other),
                        None => break,
                    }
                }
                _ => {
                    if let Some(buffer) = owned.as_mut() {
                        buffer.push(ch);
                    }
                    self.advance();
                }
            }
        }

        Err(TokenizeError::UnterminatedString { position: open })
    }

    /// Lexes a comment up to (not including) the end of the line
    fn lex_comment(&mut self) -> Token<'a> {
        let start = self.position;
        while let Some(ch) = self.current_char {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
        Token::Comment(Cow::Borrowed(self.input[start..self.position].trim()))
    }

    /// Lexes a run of bare characters and internal whitespace
    fn lex_bare_string(&mut self) -> Token<'a> {
        let start = self.position;
        while let Some(ch) = self.current_char {
            if CHARACTER_TABLE.is_bare_char(ch) || CHARACTER_TABLE.is_inline_whitespace(ch) {
                self.advance();
            } else {
                break;
            }
        }
        Token::bare(self.input[start..self.position].trim())
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, TokenizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        if matches!(result, Ok(Token::Eof) | Err(_)) {
            self.finished = true;
        }
        Some(result)
    }
}
