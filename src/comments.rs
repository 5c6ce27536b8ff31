//! Comment side-table
//!
//! Comments live outside the value model, keyed by section and option
//! name. Turning comment preservation off never touches the data path.

use std::collections::HashMap;

/// Where a group of comment lines is attached
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CommentKey {
    /// Lines directly above a `[section]` header
    Section(String),
    /// Lines directly above an option
    Option { section: String, option: String },
    /// Trailing comment on an option's line
    Inline { section: String, option: String },
}

impl CommentKey {
    fn section_name(&self) -> &str {
        match self {
            CommentKey::Section(section)
            | CommentKey::Option { section, .. }
            | CommentKey::Inline { section, .. } => section,
        }
    }
}

/// Comments collected while reading, replayed while writing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentStore {
    headers: Vec<String>,
    entries: HashMap<CommentKey, Vec<String>>,
}

impl CommentStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a file-level comment line
    pub fn add_header_comment(&mut self, comment: impl Into<String>) {
        self.headers.push(comment.into());
    }

    /// Replaces the comment lines above `[section]`
    pub fn set_section_comments<I, S>(&mut self, section: &str, comments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(
            CommentKey::Section(section.to_string()),
            comments.into_iter().map(Into::into).collect(),
        );
    }

    /// Appends lines to the comments above `[section]`
    pub fn extend_section_comments<I, S>(&mut self, section: &str, comments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = self
            .entries
            .entry(CommentKey::Section(section.to_string()))
            .or_default();
        lines.extend(comments.into_iter().map(Into::into));
        if lines.is_empty() {
            self.entries
                .remove(&CommentKey::Section(section.to_string()));
        }
    }

    /// Replaces the comment lines above `option` in `section`
    pub fn set_option_comments<I, S>(&mut self, section: &str, option: &str, comments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(
            CommentKey::Option {
                section: section.to_string(),
                option: option.to_string(),
            },
            comments.into_iter().map(Into::into).collect(),
        );
    }

    /// Sets the trailing comment on the line of `option` in `section`
    pub fn set_inline_comment(&mut self, section: &str, option: &str, comment: impl Into<String>) {
        self.set(
            CommentKey::Inline {
                section: section.to_string(),
                option: option.to_string(),
            },
            vec![comment.into()],
        );
    }

    fn set(&mut self, key: CommentKey, lines: Vec<String>) {
        if lines.is_empty() {
            self.entries.remove(&key);
        } else {
            self.entries.insert(key, lines);
        }
    }

    /// File-level comments, in source order
    pub fn header_comments(&self) -> &[String] {
        &self.headers
    }

    /// Comment lines above `[section]`
    pub fn section_comments(&self, section: &str) -> &[String] {
        self.lines(&CommentKey::Section(section.to_string()))
    }

    /// Comment lines above `option` in `section`
    pub fn option_comments(&self, section: &str, option: &str) -> &[String] {
        self.lines(&CommentKey::Option {
            section: section.to_string(),
            option: option.to_string(),
        })
    }

    /// Trailing comment on the line of `option` in `section`
    pub fn inline_comment(&self, section: &str, option: &str) -> Option<&str> {
        self.entries
            .get(&CommentKey::Inline {
                section: section.to_string(),
                option: option.to_string(),
            })
            .and_then(|lines| lines.first())
            .map(String::as_str)
    }

    fn lines(&self, key: &CommentKey) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Drops every comment attached to `section` or its options
    pub fn remove_section(&mut self, section: &str) {
        self.entries.retain(|key, _| key.section_name() != section);
    }

    /// Drops the comments attached to one option
    pub fn remove_option(&mut self, section: &str, option: &str) {
        self.entries.retain(|key, _| match key {
            CommentKey::Option {
                section: s,
                option: o,
            }
            | CommentKey::Inline {
                section: s,
                option: o,
            } => !(s == section && o == option),
            CommentKey::Section(_) => true,
        });
    }

    /// Returns true when no comment of any kind is stored
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.entries.is_empty()
    }

    /// Removes every comment
    pub fn clear(&mut self) {
        self.headers.clear();
        self.entries.clear();
    }
}
