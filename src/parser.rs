//! INI parser for converting tokens into a configuration model
//!
//! The parser consumes the token stream exactly once, left to right, with a
//! single token of lookahead. It never rejects a file for semantic reasons:
//! a missing value becomes an empty string and stray assignment tokens are
//! skipped. The only failures are the tokenizer's, plus repeated section
//! headers when [`DuplicateSectionBehavior::Error`] is selected.

use crate::comments::CommentStore;
use crate::config::Config;
use crate::error::{IniError, Position, Result};
use crate::lexer::{StringFormat, Token, Tokenizer};
use crate::options::{DuplicateSectionBehavior, ParserOptions};
use crate::value::Value;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::collections::HashSet;
use tracing::debug;

/// The result of a successful read
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub config: Config,
    pub comments: CommentStore,
}

/// Comment lines waiting for the section or option they belong to
type CommentBuffer = SmallVec<[String; 4]>;

/// Builds the model while tokens arrive, owning all attachment decisions
struct DocumentBuilder<'o> {
    options: &'o ParserOptions,
    config: Config,
    comments: CommentStore,
    pending: CommentBuffer,
    current_section: String,
    seen_section: bool,
    seen_option: bool,
    declared: HashSet<String>,
}

impl<'o> DocumentBuilder<'o> {
    fn new(options: &'o ParserOptions) -> Self {
        Self {
            options,
            config: Config::new(options.default_section.clone()),
            comments: CommentStore::new(),
            pending: CommentBuffer::new(),
            current_section: options.default_section.clone(),
            seen_section: false,
            seen_option: false,
            declared: HashSet::new(),
        }
    }

    fn comment(&mut self, text: Cow<'_, str>) {
        if self.options.preserve_comments {
            self.pending.push(text.into_owned());
        }
    }

    fn section(&mut self, name: Cow<'_, str>, position: Position) -> Result<()> {
        let name = name.into_owned();

        if self.options.duplicate_sections == DuplicateSectionBehavior::Error
            && !self.declared.insert(name.clone())
        {
            return Err(IniError::DuplicateSection { name, position });
        }

        if !self.pending.is_empty() {
            if self.seen_section {
                // A reopened header adds to what the first one collected
                self.comments
                    .extend_section_comments(&name, self.pending.drain(..));
            } else {
                for comment in self.pending.drain(..) {
                    self.comments.add_header_comment(comment);
                }
            }
        }

        self.seen_section = true;
        self.config.ensure_section(&name);
        self.current_section = name;
        Ok(())
    }

    /// Attaches buffered comments to `option`, which is about to be assigned
    fn option_start(&mut self, option: &str) {
        if !self.pending.is_empty() {
            self.comments
                .set_option_comments(&self.current_section, option, self.pending.drain(..));
        }
    }

    fn assign(&mut self, option: String, value: Value) {
        self.seen_option = true;
        self.config
            .ensure_section(&self.current_section)
            .insert(option, value);
    }

    fn inline_comment(&mut self, option: &str, text: Cow<'_, str>) {
        if self.options.preserve_comments {
            self.comments
                .set_inline_comment(&self.current_section, option, text);
        }
    }

    fn finish(mut self) -> ParsedDocument {
        // Trailing comments only survive in a file that has nothing else
        if !self.seen_section && !self.seen_option {
            for comment in self.pending.drain(..) {
                self.comments.add_header_comment(comment);
            }
        }
        ParsedDocument {
            config: self.config,
            comments: self.comments,
        }
    }
}

/// INI parser that consumes tokens and builds a [`ParsedDocument`]
pub struct IniParser<'a, 'o> {
    tokenizer: Tokenizer<'a>,
    options: &'o ParserOptions,
    current_token: Token<'a>,
    current_token_start: Position,
}

impl<'a, 'o> IniParser<'a, 'o> {
    /// Creates a parser over `input`
    ///
    /// Fails if the very first token cannot be produced.
    pub fn new(input: &'a str, options: &'o ParserOptions) -> Result<Self> {
        let mut tokenizer = Tokenizer::with_config(input, options.lexer.clone());
        let current_token = tokenizer.next_token()?;
        let current_token_start = tokenizer.last_token_start();
        Ok(Self {
            tokenizer,
            options,
            current_token,
            current_token_start,
        })
    }

    /// Takes the current token and loads the next one
    fn bump(&mut self) -> Result<Token<'a>> {
        let next = if self.current_token == Token::Eof {
            Token::Eof
        } else {
            self.tokenizer.next_token()?
        };
        self.current_token_start = self.tokenizer.last_token_start();
        Ok(std::mem::replace(&mut self.current_token, next))
    }

    /// Parses the whole input into a fresh model
    pub fn parse_document(mut self) -> Result<ParsedDocument> {
        let mut builder = DocumentBuilder::new(self.options);

        loop {
            match self.current_token {
                Token::Eof => break,
                Token::Comment(_) => {
                    if let Token::Comment(text) = self.bump()? {
                        builder.comment(text);
                    }
                }
                Token::Section(_) => {
                    let position = self.current_token_start;
                    if let Token::Section(name) = self.bump()? {
                        builder.section(name, position)?;
                    }
                }
                Token::String { .. } => {
                    if let Token::String { value, .. } = self.bump()? {
                        self.parse_option(&mut builder, value.into_owned())?;
                    }
                }
                // Blank lines and stray separators carry no content
                Token::Newline | Token::Equals | Token::Colon => {
                    self.bump()?;
                }
            }
        }

        let document = builder.finish();
        debug!(
            sections = document.config.len(),
            "parsed INI document"
        );
        Ok(document)
    }

    /// Parses the rest of an option line after its name
    fn parse_option(&mut self, builder: &mut DocumentBuilder<'_>, option: String) -> Result<()> {
        builder.option_start(&option);

        let value = if self.current_token.is_assignment() {
            self.bump()?;
            if matches!(self.current_token, Token::String { .. }) {
                match self.bump()? {
                    Token::String { value, format } => value_from_token(value, format),
                    _ => Value::String(String::new()),
                }
            } else {
                Value::String(String::new())
            }
        } else {
            // Bare presence
            Value::String(String::new())
        };

        if matches!(self.current_token, Token::Comment(_)) {
            if let Token::Comment(text) = self.bump()? {
                builder.inline_comment(&option, text);
            }
        }

        builder.assign(option, value);
        Ok(())
    }
}

/// Quoted text is taken verbatim; bare text goes through inference
fn value_from_token(text: Cow<'_, str>, format: StringFormat) -> Value {
    match format {
        StringFormat::Quoted => Value::String(text.into_owned()),
        StringFormat::Bare => Value::infer(text.trim()),
    }
}

/// Parses `input` into a fresh model using `options`
pub fn parse(input: &str, options: &ParserOptions) -> Result<ParsedDocument> {
    IniParser::new(input, options)?.parse_document()
}
