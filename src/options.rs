//! Construction-time options for reading and writing INI text

use crate::lexer::LexerConfig;
use crate::value::BooleanFormat;

/// The character separating option names from values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssignmentCharacter {
    /// `option = value`
    #[default]
    Equals,
    /// `option: value`
    Colon,
}

impl AssignmentCharacter {
    pub fn as_char(self) -> char {
        match self {
            AssignmentCharacter::Equals => '=',
            AssignmentCharacter::Colon => ':',
        }
    }

    /// Spaces before the character when none are configured
    fn default_leading(self) -> usize {
        match self {
            AssignmentCharacter::Equals => 1,
            AssignmentCharacter::Colon => 0,
        }
    }
}

/// Behavior when a section header appears more than once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateSectionBehavior {
    /// Keep filling the section first declared under that name
    #[default]
    Merge,
    /// Fail the read with [`IniError::DuplicateSection`](crate::IniError::DuplicateSection)
    Error,
}

/// Options for a [`ConfigParser`](crate::ConfigParser)
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Name of the implicit section
    pub default_section: String,
    /// Character written between option and value
    pub assignment_character: AssignmentCharacter,
    /// Spaces before the assignment character, `None` for the smart default
    pub leading_spaces: Option<usize>,
    /// Spaces after the assignment character, `None` for the smart default
    pub trailing_spaces: Option<usize>,
    /// Keep comments when reading and replay them when writing
    pub preserve_comments: bool,
    /// Spelling of booleans on output
    pub boolean_format: BooleanFormat,
    /// Look up missing options in the default section
    pub default_fallback: bool,
    /// What to do with a repeated section header
    pub duplicate_sections: DuplicateSectionBehavior,
    /// Tokenizer configuration
    pub lexer: LexerConfig,
}

impl ParserOptions {
    /// Creates options with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_section(mut self, name: impl Into<String>) -> Self {
        self.default_section = name.into();
        self
    }

    pub fn with_assignment_character(mut self, character: AssignmentCharacter) -> Self {
        self.assignment_character = character;
        self
    }

    pub fn with_leading_spaces(mut self, spaces: usize) -> Self {
        self.leading_spaces = Some(spaces);
        self
    }

    pub fn with_trailing_spaces(mut self, spaces: usize) -> Self {
        self.trailing_spaces = Some(spaces);
        self
    }

    pub fn with_preserve_comments(mut self, preserve: bool) -> Self {
        self.preserve_comments = preserve;
        self
    }

    pub fn with_boolean_format(
        mut self,
        true_value: impl Into<String>,
        false_value: impl Into<String>,
    ) -> Self {
        self.boolean_format = BooleanFormat::new(true_value, false_value);
        self
    }

    pub fn with_default_fallback(mut self, fallback: bool) -> Self {
        self.default_fallback = fallback;
        self
    }

    pub fn with_duplicate_sections(mut self, behavior: DuplicateSectionBehavior) -> Self {
        self.duplicate_sections = behavior;
        self
    }

    pub fn with_lexer_config(mut self, config: LexerConfig) -> Self {
        self.lexer = config;
        self
    }

    /// Sets whether unsupported characters are a syntax error
    pub fn with_strict_characters(mut self, strict: bool) -> Self {
        self.lexer.strict_characters = strict;
        self
    }

    /// Effective spaces before the assignment character
    ///
    /// An unset side borrows the other side's explicit value before
    /// falling back to the per-character default.
    pub fn resolved_leading_spaces(&self) -> usize {
        self.leading_spaces
            .or(self.trailing_spaces)
            .unwrap_or_else(|| self.assignment_character.default_leading())
    }

    /// Effective spaces after the assignment character
    pub fn resolved_trailing_spaces(&self) -> usize {
        self.trailing_spaces.or(self.leading_spaces).unwrap_or(1)
    }

    /// The full separator written between option and value
    pub fn assignment(&self) -> String {
        format!(
            "{}{}{}",
            " ".repeat(self.resolved_leading_spaces()),
            self.assignment_character.as_char(),
            " ".repeat(self.resolved_trailing_spaces())
        )
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            default_section: "DEFAULT".to_string(),
            assignment_character: AssignmentCharacter::Equals,
            leading_spaces: None,
            trailing_spaces: None,
            preserve_comments: false,
            boolean_format: BooleanFormat::default(),
            default_fallback: true,
            duplicate_sections: DuplicateSectionBehavior::Merge,
            lexer: LexerConfig::default(),
        }
    }
}
