//! Accessors scoped to one section
//!
//! A view stores the owning [`ConfigParser`] by reference plus the section
//! name, and looks the section up again on every call. Nothing inside the
//! model is cached, so a view never sees stale state.

use crate::config::Section;
use crate::config_parser::ConfigParser;
use crate::error::Result;
use crate::value::{FromValue, Value};

/// Read-only view of one section
#[derive(Debug, Clone, Copy)]
pub struct SectionView<'a> {
    parser: &'a ConfigParser,
    name: &'a str,
}

impl<'a> SectionView<'a> {
    pub(crate) fn new(parser: &'a ConfigParser, name: &'a str) -> Self {
        Self { parser, name }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    fn resolve(&self) -> Option<&'a Section> {
        self.parser.config().section(self.name)
    }

    /// Looks up `option`, falling back to the default section when enabled
    pub fn get(&self, option: &str) -> Option<&'a Value> {
        self.parser.value(self.name, option)
    }

    /// Looks up `option` and converts it to `T`
    pub fn get_as<T: FromValue>(&self, option: &str) -> Result<T> {
        self.parser.get(self.name, option)
    }

    /// Returns true if the section itself defines `option`
    pub fn contains(&self, option: &str) -> bool {
        self.resolve().is_some_and(|s| s.contains_key(option))
    }

    /// Option names in insertion order
    pub fn options(self) -> impl Iterator<Item = &'a str> {
        self.resolve()
            .into_iter()
            .flat_map(|section| section.keys().map(String::as_str))
    }

    /// `(option, value)` pairs in insertion order
    pub fn iter(self) -> impl Iterator<Item = (&'a str, &'a Value)> {
        self.resolve()
            .into_iter()
            .flat_map(|section| section.iter().map(|(k, v)| (k.as_str(), v)))
    }

    pub fn len(&self) -> usize {
        self.resolve().map_or(0, Section::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read-write view of one section
///
/// Writes go straight into the owning parser.
#[derive(Debug)]
pub struct SectionViewMut<'a> {
    parser: &'a mut ConfigParser,
    name: String,
}

impl<'a> SectionViewMut<'a> {
    pub(crate) fn new(parser: &'a mut ConfigParser, name: String) -> Self {
        Self { parser, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Borrows the view read-only
    pub fn as_view(&self) -> SectionView<'_> {
        SectionView::new(&*self.parser, &self.name)
    }

    pub fn get(&self, option: &str) -> Option<&Value> {
        self.parser.value(&self.name, option)
    }

    pub fn get_as<T: FromValue>(&self, option: &str) -> Result<T> {
        self.parser.get(&self.name, option)
    }

    /// Sets `option`, appending it if new
    pub fn set(&mut self, option: &str, value: impl Into<Value>) {
        self.parser.insert(&self.name, option, value.into());
    }

    /// Removes `option` from this section, returning its value
    pub fn remove(&mut self, option: &str) -> Option<Value> {
        self.parser.remove_option(&self.name, option).ok().flatten()
    }

    pub fn options(&self) -> impl Iterator<Item = &str> {
        self.as_view().options()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.as_view().iter()
    }

    pub fn len(&self) -> usize {
        self.as_view().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use crate::ConfigParser;
    use crate::value::Value;

    fn parser() -> ConfigParser {
        "shared = base\n[app]\nname = demo\nworkers = 4\n".parse().unwrap()
    }

    #[test]
    fn test_view_reads_through() {
        let parser = parser();
        let app = parser.section("app").unwrap();
        assert_eq!(app.name(), "app");
        assert_eq!(app.get("name"), Some(&Value::from("demo")));
        assert_eq!(app.get_as::<u8>("workers").unwrap(), 4);
        assert_eq!(app.options().collect::<Vec<_>>(), ["name", "workers"]);
        assert_eq!(app.len(), 2);
    }

    #[test]
    fn test_view_get_uses_default_fallback() {
        let parser = parser();
        let app = parser.section("app").unwrap();
        assert_eq!(app.get("shared"), Some(&Value::from("base")));
        assert!(!app.contains("shared"));
    }

    #[test]
    fn test_mutable_view_writes_through() {
        let mut parser = parser();
        {
            let mut app = parser.section_mut("app").unwrap();
            app.set("workers", 8);
            app.set("mode", "fast");
            assert_eq!(app.remove("name"), Some(Value::from("demo")));
            assert_eq!(app.remove("name"), None);
        }
        assert_eq!(parser.get_int("app", "workers").unwrap(), 8);
        let names: Vec<_> = parser.section("app").unwrap().options().collect();
        assert_eq!(names, ["workers", "mode"]);
    }
}
