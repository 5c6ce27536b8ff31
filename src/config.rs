//! Ordered configuration model
//!
//! A [`Config`] maps section names to [`Section`]s and always contains its
//! default section. Both levels preserve insertion order.

use crate::error::{IniError, Result};
use crate::value::Value;
use indexmap::IndexMap;

/// Option name to value, in insertion order
pub type Section = IndexMap<String, Value>;

/// Section name to section, in insertion order
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    default_section: String,
    sections: IndexMap<String, Section>,
}

impl Config {
    /// Creates a config holding only an empty default section
    pub fn new(default_section: impl Into<String>) -> Self {
        let default_section = default_section.into();
        let mut sections = IndexMap::new();
        sections.insert(default_section.clone(), Section::new());
        Self {
            default_section,
            sections,
        }
    }

    /// Name of the default section
    pub fn default_section(&self) -> &str {
        &self.default_section
    }

    /// Returns true if `name` is the default section
    pub fn is_default(&self, name: &str) -> bool {
        self.default_section == name
    }

    /// Section names in insertion order, default section included
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Iterates over `(name, section)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(name, section)| (name.as_str(), section))
    }

    /// Number of sections, default section included
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Always false; the default section is never removed
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Returns the stored name together with the section
    pub fn section_entry(&self, name: &str) -> Option<(&str, &Section)> {
        self.sections
            .get_key_value(name)
            .map(|(name, section)| (name.as_str(), section))
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.get_mut(name)
    }

    /// Returns the section, creating it at the end if absent
    pub fn ensure_section(&mut self, name: &str) -> &mut Section {
        if !self.sections.contains_key(name) {
            self.sections.insert(name.to_string(), Section::new());
        }
        // Present by construction
        &mut self.sections[name]
    }

    /// Adds an empty section
    ///
    /// Fails for the default section, for a name that already exists and
    /// for a name that cannot be written as a header.
    pub fn add_section(&mut self, name: &str) -> Result<()> {
        check_section_name(name)?;
        if self.is_default(name) {
            return Err(IniError::value("Cannot add default section."));
        }
        if self.sections.contains_key(name) {
            return Err(IniError::value(format!("Section {} already exists.", name)));
        }
        self.sections.insert(name.to_string(), Section::new());
        Ok(())
    }

    /// Removes a section, keeping the order of the others
    ///
    /// Removing a missing section is not an error and returns `None`.
    pub fn remove_section(&mut self, name: &str) -> Result<Option<Section>> {
        if self.is_default(name) {
            return Err(IniError::value("Cannot remove default section."));
        }
        Ok(self.sections.shift_remove(name))
    }

    /// Raw lookup without any fallback
    pub fn get(&self, section: &str, option: &str) -> Option<&Value> {
        self.sections.get(section)?.get(option)
    }

    /// Consumes the config, yielding its sections in order
    pub fn into_sections(self) -> IndexMap<String, Section> {
        self.sections
    }
}

/// Rejects names that would not read back from a `[name]` header line
pub fn check_section_name(name: &str) -> Result<()> {
    if name.trim() != name || name.contains([']', '\n', '\r']) {
        return Err(IniError::value(format!("Invalid section name {:?}.", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_default_section() {
        let config = Config::new("DEFAULT");
        assert_eq!(config.len(), 1);
        assert!(config.has_section("DEFAULT"));
        assert!(config.section("DEFAULT").unwrap().is_empty());
        assert_eq!(config.default_section(), "DEFAULT");
    }

    #[test]
    fn test_add_section_rules() {
        let mut config = Config::new("DEFAULT");
        config.add_section("db").unwrap();
        assert!(matches!(
            config.add_section("db"),
            Err(IniError::Value(ref m)) if m == "Section db already exists."
        ));
        assert!(matches!(
            config.add_section("DEFAULT"),
            Err(IniError::Value(ref m)) if m == "Cannot add default section."
        ));
    }

    #[test]
    fn test_add_section_rejects_unwritable_names() {
        let mut config = Config::new("DEFAULT");
        for name in ["a]b", "x\ny", "cr\rname", " padded ", "trail\t"] {
            assert!(
                matches!(
                    config.add_section(name),
                    Err(IniError::Value(ref m)) if m.starts_with("Invalid section name")
                ),
                "accepted {:?}",
                name
            );
        }
        config.add_section("a [b c").unwrap();
        assert_eq!(config.section_names().collect::<Vec<_>>(), ["DEFAULT", "a [b c"]);
        assert!(check_section_name("").is_ok());
    }

    #[test]
    fn test_remove_section_keeps_order() {
        let mut config = Config::new("DEFAULT");
        for name in ["a", "b", "c"] {
            config.add_section(name).unwrap();
        }
        assert!(config.remove_section("b").unwrap().is_some());
        assert!(config.remove_section("missing").unwrap().is_none());
        assert_eq!(
            config.section_names().collect::<Vec<_>>(),
            ["DEFAULT", "a", "c"]
        );
        assert!(config.remove_section("DEFAULT").is_err());
    }

    #[test]
    fn test_ensure_section_appends() {
        let mut config = Config::new("main");
        config.ensure_section("x").insert("k".to_string(), Value::Int(1));
        config.ensure_section("x").insert("j".to_string(), Value::Int(2));
        assert_eq!(config.get("x", "k"), Some(&Value::Int(1)));
        assert_eq!(config.section("x").unwrap().len(), 2);
        assert_eq!(config.section_names().collect::<Vec<_>>(), ["main", "x"]);
    }
}
