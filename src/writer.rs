//! INI serialization
//!
//! [`Writer`] renders a [`Config`] and, when comment preservation is on, its
//! [`CommentStore`] back into text:
//!
//! - Header comments first, followed by a blank line; comments above the
//!   first written section are part of this block
//! - The default section, only when it holds options
//! - Every other section in insertion order, one blank line apart
//!
//! Strings are left bare when the tokenizer would read them back unchanged
//! and quoted otherwise, so a document written here parses to the same model.

use crate::comments::CommentStore;
use crate::config::{Config, Section};
use crate::lexer::CHARACTER_TABLE;
use crate::options::ParserOptions;
use crate::value::{BooleanFormat, Value};

/// The INI serializer
pub struct Writer<'o> {
    output: String,
    options: &'o ParserOptions,
    assignment: String,
}

impl<'o> Writer<'o> {
    pub fn new(options: &'o ParserOptions) -> Self {
        Writer {
            output: String::with_capacity(256),
            options,
            assignment: options.assignment(),
        }
    }

    /// Returns the rendered text without leading or trailing blank lines
    pub fn into_inner(self) -> String {
        self.output.trim_matches('\n').to_string()
    }

    /// Renders the whole document
    ///
    /// `comments` is ignored unless the options preserve comments. Comments
    /// above the first written section belong to the header block.
    pub fn write_document(&mut self, config: &Config, comments: &CommentStore) {
        let comments = self.options.preserve_comments.then_some(comments);
        let mut blocks = config
            .iter()
            .filter(|(name, section)| !(config.is_default(name) && section.is_empty()))
            .peekable();

        if let Some(comments) = comments {
            let first = blocks
                .peek()
                .map(|(name, _)| comments.section_comments(name))
                .unwrap_or_default();
            let headers = comments.header_comments();
            for line in headers.iter().chain(first) {
                self.write_line(line);
            }
            if !headers.is_empty() || !first.is_empty() {
                self.output.push('\n');
            }
        }

        if let Some((name, section)) = blocks.next() {
            self.write_section(name, section, comments);
            self.output.push('\n');
        }
        for (name, section) in blocks {
            if let Some(comments) = comments {
                for line in comments.section_comments(name) {
                    self.write_line(line);
                }
            }
            self.write_section(name, section, comments);
            self.output.push('\n');
        }
    }

    /// Writes the header line and options of one section
    fn write_section(&mut self, name: &str, section: &Section, comments: Option<&CommentStore>) {
        self.output.push('[');
        self.output.push_str(name);
        self.output.push_str("]\n");

        for (option, value) in section {
            if let Some(comments) = comments {
                for line in comments.option_comments(name, option) {
                    self.write_line(line);
                }
            }
            let inline = comments.and_then(|c| c.inline_comment(name, option));
            self.write_option(option, value, inline);
        }
    }

    fn write_option(&mut self, option: &str, value: &Value, inline: Option<&str>) {
        write_name(&mut self.output, option);

        let rendered = render_value(value, &self.options.boolean_format);
        if rendered.is_empty() {
            self.output.push_str(self.assignment.trim_end());
        } else {
            self.output.push_str(&self.assignment);
            self.output.push_str(&rendered);
        }

        if let Some(comment) = inline {
            self.output.push(' ');
            self.output.push_str(comment);
        }
        self.output.push('\n');
    }

    fn write_line(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

/// Renders `value` as it appears after the assignment character
pub fn render_value(value: &Value, format: &BooleanFormat) -> String {
    match value {
        Value::String(s) if needs_quotes(s) => quote(s),
        other => other.render(format),
    }
}

/// Returns true when `s` would not read back as the same string if left bare
#[inline]
pub fn needs_quotes(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    if s.trim() != s {
        return true;
    }
    if s
        .chars()
        .any(|ch| !(CHARACTER_TABLE.is_bare_char(ch) || ch == ' ' || ch == '\t'))
    {
        return true;
    }
    !matches!(Value::infer(s), Value::String(_))
}

fn write_name(output: &mut String, name: &str) {
    // Names never go through inference, only the character check applies
    if name.is_empty()
        || name.trim() != name
        || name.chars().any(|ch| !(CHARACTER_TABLE.is_bare_char(ch) || ch == ' '))
    {
        output.push_str(&quote(name));
    } else {
        output.push_str(name);
    }
}

fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for ch in s.chars() {
        if CHARACTER_TABLE.needs_escape(ch) {
            quoted.push('\\');
            quoted.push(match ch {
                '\n' => 'n',
                '\r' => 'r',
                '\t' => 't',
                other => other,
            });
        } else {
            quoted.push(ch);
        }
    }
    quoted.push('"');
    quoted
}

/// Renders `config` with `options`
pub fn to_string(config: &Config, comments: &CommentStore, options: &ParserOptions) -> String {
    let mut writer = Writer::new(options);
    writer.write_document(config, comments);
    writer.into_inner()
}
