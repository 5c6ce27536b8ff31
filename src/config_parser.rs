//! The main entry point for reading, querying and writing INI documents

use crate::comments::CommentStore;
use crate::config::{Config, check_section_name};
use crate::deserializer;
use crate::error::{IniError, Result};
use crate::fs;
use crate::options::ParserOptions;
use crate::parser;
use crate::section::{SectionView, SectionViewMut};
use crate::value::{FromValue, Value};
use crate::writer;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// An INI document together with the options that read and write it
///
/// The default section always exists. A [`read`](Self::read) replaces the
/// whole model only after the input has parsed without error.
#[derive(Debug, Clone)]
pub struct ConfigParser {
    config: Config,
    comments: CommentStore,
    options: ParserOptions,
}

impl ConfigParser {
    /// Creates an empty parser with default options
    pub fn new() -> Self {
        Self::with_options(ParserOptions::default())
    }

    /// Creates an empty parser
    pub fn with_options(options: ParserOptions) -> Self {
        Self {
            config: Config::new(options.default_section.clone()),
            comments: CommentStore::new(),
            options,
        }
    }

    /// Creates a parser and reads `input` into it
    pub fn from_input(input: &str, options: ParserOptions) -> Result<Self> {
        let mut parser = Self::with_options(options);
        parser.read(input)?;
        Ok(parser)
    }

    /// Creates a parser and reads the file at `path` into it
    pub fn from_file(path: impl AsRef<Path>, options: ParserOptions) -> Result<Self> {
        let mut parser = Self::with_options(options);
        parser.read_file(path)?;
        Ok(parser)
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// The underlying ordered model
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn comments(&self) -> &CommentStore {
        &self.comments
    }

    pub fn comments_mut(&mut self) -> &mut CommentStore {
        &mut self.comments
    }

    /// Replaces the model with the contents of `input`
    ///
    /// On error the previous model is left untouched.
    pub fn read(&mut self, input: &str) -> Result<()> {
        let document = parser::parse(input, &self.options)?;
        self.config = document.config;
        self.comments = document.comments;
        Ok(())
    }

    /// Replaces the model with the contents of the file at `path`
    pub fn read_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let text = fs::read_to_string(path.as_ref())?;
        self.read(&text)
    }

    /// Renders the model as INI text
    pub fn write(&self) -> String {
        writer::to_string(&self.config, &self.comments, &self.options)
    }

    /// Writes the model to `path`, replacing the file atomically
    ///
    /// The file ends with a newline unless the document is empty.
    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut text = self.write();
        if !text.is_empty() {
            text.push('\n');
        }
        fs::write_atomic(path.as_ref(), &text)
    }

    /// Section names in insertion order, default section first
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.config.section_names()
    }

    /// Views of every section in insertion order
    pub fn sections(&self) -> impl Iterator<Item = SectionView<'_>> {
        self.config
            .section_names()
            .map(move |name| SectionView::new(self, name))
    }

    pub fn section(&self, name: &str) -> Option<SectionView<'_>> {
        self.config
            .section_entry(name)
            .map(|(name, _)| SectionView::new(self, name))
    }

    pub fn section_mut(&mut self, name: &str) -> Option<SectionViewMut<'_>> {
        if self.config.has_section(name) {
            Some(SectionViewMut::new(self, name.to_string()))
        } else {
            None
        }
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.config.has_section(name)
    }

    /// Adds an empty section at the end
    ///
    /// Fails with [`IniError::Value`] for the default section or an
    /// existing name.
    pub fn add_section(&mut self, name: &str) -> Result<()> {
        self.config.add_section(name)?;
        debug!(section = name, "added section");
        Ok(())
    }

    /// Removes a section and its comments
    ///
    /// Returns whether the section existed. Fails with [`IniError::Value`]
    /// for the default section.
    pub fn remove_section(&mut self, name: &str) -> Result<bool> {
        let removed = self.config.remove_section(name)?.is_some();
        if removed {
            self.comments.remove_section(name);
            debug!(section = name, "removed section");
        }
        Ok(removed)
    }

    /// `(option, value)` pairs of a section, without fallback
    pub fn items(&self, section: &str) -> Result<impl Iterator<Item = (&str, &Value)>> {
        let values = self
            .config
            .section(section)
            .ok_or_else(|| IniError::SectionNotFound(section.to_string()))?;
        Ok(values.iter().map(|(k, v)| (k.as_str(), v)))
    }

    fn lookup(&self, section: &str, option: &str) -> Result<&Value> {
        let values = self
            .config
            .section(section)
            .ok_or_else(|| IniError::SectionNotFound(section.to_string()))?;

        if let Some(value) = values.get(option) {
            return Ok(value);
        }
        if self.options.default_fallback {
            if let Some(value) = self.config.get(self.config.default_section(), option) {
                return Ok(value);
            }
        }
        Err(IniError::OptionNotFound(option.to_string()))
    }

    /// Looks up a raw value
    ///
    /// A missing option falls back to the default section when
    /// `default_fallback` is on. A missing section yields `None`.
    pub fn value(&self, section: &str, option: &str) -> Option<&Value> {
        self.lookup(section, option).ok()
    }

    /// Sets a value, creating the section if needed
    ///
    /// Creating a section fails with [`IniError::Value`] when its name could
    /// not be written back as a header.
    pub fn set_value(
        &mut self,
        section: &str,
        option: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        if !self.config.has_section(section) {
            check_section_name(section)?;
        }
        self.insert(section, option, value.into());
        Ok(())
    }

    /// Inserts into a section known to be present or valid
    pub(crate) fn insert(&mut self, section: &str, option: &str, value: Value) {
        self.config
            .ensure_section(section)
            .insert(option.to_string(), value);
    }

    /// Removes an option and its comments, returning the old value
    pub fn remove_option(&mut self, section: &str, option: &str) -> Result<Option<Value>> {
        let values = self
            .config
            .section_mut(section)
            .ok_or_else(|| IniError::SectionNotFound(section.to_string()))?;
        let removed = values.shift_remove(option);
        if removed.is_some() {
            self.comments.remove_option(section, option);
        }
        Ok(removed)
    }

    /// Looks up a value and converts it to `T`
    ///
    /// Fails with [`IniError::SectionNotFound`], [`IniError::OptionNotFound`]
    /// or the conversion's [`IniError::Value`].
    pub fn get<T: FromValue>(&self, section: &str, option: &str) -> Result<T> {
        T::from_value(self.lookup(section, option)?)
    }

    /// Like [`get`](Self::get), but any failure yields `default`
    pub fn get_or<T: FromValue>(&self, section: &str, option: &str, default: T) -> T {
        self.get(section, option).unwrap_or(default)
    }

    /// Looks up an option in the default section
    pub fn get_global<T: FromValue>(&self, option: &str) -> Result<T> {
        self.get(self.config.default_section(), option)
    }

    pub fn get_global_or<T: FromValue>(&self, option: &str, default: T) -> T {
        self.get_global(option).unwrap_or(default)
    }

    pub fn get_string(&self, section: &str, option: &str) -> Result<String> {
        self.get(section, option)
    }

    pub fn get_int(&self, section: &str, option: &str) -> Result<i64> {
        self.get(section, option)
    }

    pub fn get_float(&self, section: &str, option: &str) -> Result<f64> {
        self.get(section, option)
    }

    pub fn get_bool(&self, section: &str, option: &str) -> Result<bool> {
        self.get(section, option)
    }

    /// Sets a value in an existing section
    pub fn set(&mut self, section: &str, option: &str, value: impl Into<Value>) -> Result<()> {
        let values = self
            .config
            .section_mut(section)
            .ok_or_else(|| IniError::SectionNotFound(section.to_string()))?;
        values.insert(option.to_string(), value.into());
        Ok(())
    }

    /// Sets a value in the default section
    pub fn set_global(&mut self, option: &str, value: impl Into<Value>) {
        let default = self.config.default_section().to_string();
        self.insert(&default, option, value.into());
    }

    /// Deserializes the current model into `T`
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        deserializer::from_config(self.config.clone())
    }
}

impl Default for ConfigParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ConfigParser {
    type Err = IniError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_input(s, ParserOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TokenizeError;

    #[test]
    fn test_new_has_only_default_section() {
        let parser = ConfigParser::new();
        assert_eq!(parser.section_names().collect::<Vec<_>>(), ["DEFAULT"]);
        assert!(parser.has_section("DEFAULT"));
    }

    #[test]
    fn test_default_section_is_protected() {
        let mut parser = ConfigParser::new();
        assert!(matches!(parser.add_section("DEFAULT"), Err(IniError::Value(_))));
        assert!(matches!(
            parser.remove_section("DEFAULT"),
            Err(IniError::Value(_))
        ));
        parser.add_section("extra").unwrap();
        assert!(parser.remove_section("extra").unwrap());
        assert!(!parser.remove_section("extra").unwrap());
    }

    #[test]
    fn test_strict_and_lenient_getters() {
        let parser: ConfigParser = "[net]\nport = 7790\nname = edge\n".parse().unwrap();
        assert_eq!(parser.get_int("net", "port").unwrap(), 7790);
        assert_eq!(parser.get::<u16>("net", "port").unwrap(), 7790);
        assert_eq!(parser.get_string("net", "port").unwrap(), "7790");
        assert!(matches!(
            parser.get_int("missing", "port"),
            Err(IniError::SectionNotFound(ref s)) if s == "missing"
        ));
        assert!(matches!(
            parser.get_int("net", "timeout"),
            Err(IniError::OptionNotFound(ref s)) if s == "timeout"
        ));
        assert!(matches!(parser.get_int("net", "name"), Err(IniError::Value(_))));
        assert_eq!(parser.get_or("net", "timeout", 30i64), 30);
        assert_eq!(parser.get_or("net", "name", 0i64), 0);
        assert!(parser.get_or("nope", "x", true));
    }

    #[test]
    fn test_default_fallback_flag() {
        let input = "timeout = 5\n[net]\nport = 1\n";
        let parser: ConfigParser = input.parse().unwrap();
        assert_eq!(parser.get_int("net", "timeout").unwrap(), 5);
        assert_eq!(parser.value("net", "timeout"), Some(&Value::Int(5)));
        assert_eq!(parser.value("nowhere", "timeout"), None);

        let strict =
            ConfigParser::from_input(input, ParserOptions::new().with_default_fallback(false))
                .unwrap();
        assert!(matches!(
            strict.get_int("net", "timeout"),
            Err(IniError::OptionNotFound(_))
        ));
        assert_eq!(strict.get_global::<i64>("timeout").unwrap(), 5);
    }

    #[test]
    fn test_set_requires_section_set_value_creates_it() {
        let mut parser = ConfigParser::new();
        assert!(matches!(
            parser.set("db", "host", "x"),
            Err(IniError::SectionNotFound(_))
        ));
        parser.set_value("db", "host", "x").unwrap();
        parser.set("db", "port", 5432).unwrap();
        assert_eq!(parser.get_int("db", "port").unwrap(), 5432);
        assert_eq!(parser.section_names().collect::<Vec<_>>(), ["DEFAULT", "db"]);
    }

    #[test]
    fn test_unwritable_section_names_are_rejected() {
        let mut parser = ConfigParser::new();
        for name in ["a]b", "x\ny", " padded "] {
            assert!(matches!(parser.add_section(name), Err(IniError::Value(_))));
            assert!(matches!(parser.set_value(name, "k", 1), Err(IniError::Value(_))));
            assert!(matches!(parser.set(name, "k", 1), Err(IniError::SectionNotFound(_))));
        }
        assert_eq!(parser.section_names().collect::<Vec<_>>(), ["DEFAULT"]);

        parser.add_section("a [b").unwrap();
        parser.set("a [b", "k", 1).unwrap();
        let reread: ConfigParser = parser.write().parse().unwrap();
        assert_eq!(reread.config(), parser.config());
    }

    #[test]
    fn test_set_global_then_write() {
        let mut parser = ConfigParser::new();
        parser.set_global("ServerAliveInterval", 45);
        assert_eq!(parser.write(), "[DEFAULT]\nServerAliveInterval = 45");
        assert_eq!(parser.get_global_or("Missing", 7i64), 7);
    }

    #[test]
    fn test_failed_read_keeps_previous_model() {
        let mut parser: ConfigParser = "[a]\nx = 1\n".parse().unwrap();
        let err = parser.read("[b]\ny = \"open").unwrap_err();
        assert!(matches!(
            err,
            IniError::Tokenize(TokenizeError::UnterminatedString { .. })
        ));
        assert_eq!(parser.get_int("a", "x").unwrap(), 1);
        assert!(!parser.has_section("b"));
    }

    #[test]
    fn test_read_replaces_everything() {
        let mut parser: ConfigParser = "[a]\nx = 1\n".parse().unwrap();
        parser.read("[b]\ny = 2\n").unwrap();
        assert!(!parser.has_section("a"));
        assert_eq!(parser.section_names().collect::<Vec<_>>(), ["DEFAULT", "b"]);
    }

    #[test]
    fn test_items_and_remove_option() {
        let options = ParserOptions::new().with_preserve_comments(true);
        let mut parser =
            ConfigParser::from_input("[s]\n# about a\na = 1\nb = 2 # bee\n", options).unwrap();
        let items: Vec<_> = parser.items("s").unwrap().collect();
        assert_eq!(items, [("a", &Value::Int(1)), ("b", &Value::Int(2))]);
        assert!(matches!(parser.items("zzz"), Err(IniError::SectionNotFound(_))));

        assert_eq!(parser.remove_option("s", "a").unwrap(), Some(Value::Int(1)));
        assert!(parser.comments().option_comments("s", "a").is_empty());
        assert_eq!(parser.write(), "[s]\nb = 2 # bee");
    }

    #[test]
    fn test_sections_iterates_views_in_order() {
        let parser: ConfigParser = "[one]\na = 1\n[two]\n".parse().unwrap();
        let names: Vec<_> = parser.sections().map(|s| s.name()).collect();
        assert_eq!(names, ["DEFAULT", "one", "two"]);
        assert!(parser.section("three").is_none());
    }
}
