//! Serde deserializer implementation for INI
//!
//! A document deserializes as a map of section name to section, and each
//! section as a map of option name to value. Scalars go through the value
//! coercion table, so `port = "8080"` fills a `u16` and `debug = yes` fills
//! a `bool`.

use crate::config::{Config, Section};
use crate::error::IniError;
use crate::options::ParserOptions;
use crate::parser;
use crate::value::Value;
use serde::de::{self, DeserializeOwned, DeserializeSeed, IntoDeserializer, Visitor};

/// INI deserializer that implements serde::Deserializer
pub struct IniDeserializer {
    config: Config,
}

impl IniDeserializer {
    /// Parses `input` with default options
    pub fn parse(input: &str) -> Result<Self, IniError> {
        Self::parse_with_options(input, &ParserOptions::default())
    }

    /// Parses `input` with `options`
    pub fn parse_with_options(input: &str, options: &ParserOptions) -> Result<Self, IniError> {
        let document = parser::parse(input, options)?;
        Ok(Self::new(document.config))
    }

    /// Wraps an already parsed config
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl<'de> de::Deserializer<'de> for IniDeserializer {
    type Error = IniError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(ConfigMapAccess::new(self.config))
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

/// Map access over the sections of a document
struct ConfigMapAccess {
    sections: indexmap::map::IntoIter<String, Section>,
    current_section: Option<Section>,
}

impl ConfigMapAccess {
    fn new(config: Config) -> Self {
        Self {
            sections: config.into_sections().into_iter(),
            current_section: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for ConfigMapAccess {
    type Error = IniError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        match self.sections.next() {
            Some((name, section)) => {
                self.current_section = Some(section);
                seed.deserialize(ValueDeserializer::new(Value::String(name)))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        match self.current_section.take() {
            Some(section) => seed.deserialize(SectionDeserializer::new(section)),
            None => Err(IniError::Deserialize(
                "No section available for map entry".to_string(),
            )),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.sections.len())
    }
}

/// Deserializer for one section
struct SectionDeserializer {
    section: Section,
}

impl SectionDeserializer {
    fn new(section: Section) -> Self {
        Self { section }
    }
}

impl<'de> de::Deserializer<'de> for SectionDeserializer {
    type Error = IniError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(SectionMapAccess::new(self.section))
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

/// Map access over the options of a section
struct SectionMapAccess {
    options: indexmap::map::IntoIter<String, Value>,
    current_value: Option<Value>,
}

impl SectionMapAccess {
    fn new(section: Section) -> Self {
        Self {
            options: section.into_iter(),
            current_value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for SectionMapAccess {
    type Error = IniError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        match self.options.next() {
            Some((key, value)) => {
                self.current_value = Some(value);
                seed.deserialize(ValueDeserializer::new(Value::String(key)))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        match self.current_value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(IniError::Deserialize(
                "No value available for map entry".to_string(),
            )),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.options.len())
    }
}

/// Deserializer for individual INI values
///
/// Typed requests convert the value instead of demanding an exact variant.
struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    fn new(value: Value) -> Self {
        Self { value }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = IniError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_string(s),
            Value::Int(i) => visitor.visit_i64(i),
            Value::Float(f) => visitor.visit_f64(f),
            Value::Bool(b) => visitor.visit_bool(b),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_bool(self.value.to_bool()?)
    }

    fn deserialize_i8<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_i64(visitor)
    }

    fn deserialize_i16<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_i64(visitor)
    }

    fn deserialize_i32<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_i64(visitor)
    }

    fn deserialize_i64<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        // The visitor range-checks narrower targets
        visitor.visit_i64(self.value.to_int()?)
    }

    fn deserialize_u8<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_i64(visitor)
    }

    fn deserialize_u16<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_i64(visitor)
    }

    fn deserialize_u32<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_i64(visitor)
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_i64(visitor)
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_f64(visitor)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_f64(self.value.to_float()?)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_string(s),
            other => visitor.visit_string(other.to_string()),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        // Only unit variants can be spelled in a single INI value
        let variant: String = self.value.to_string();
        visitor.visit_enum(variant.into_deserializer())
    }

    serde::forward_to_deserialize_any! {
        i128 u128 bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

/// Convenience function to deserialize INI text into a Rust type
pub fn from_str<T>(s: &str) -> Result<T, IniError>
where
    T: DeserializeOwned,
{
    T::deserialize(IniDeserializer::parse(s)?)
}

/// Convenience function to deserialize INI text with custom parser options
pub fn from_str_with_options<T>(s: &str, options: &ParserOptions) -> Result<T, IniError>
where
    T: DeserializeOwned,
{
    T::deserialize(IniDeserializer::parse_with_options(s, options)?)
}

/// Deserializes an already parsed config
pub fn from_config<T>(config: Config) -> Result<T, IniError>
where
    T: DeserializeOwned,
{
    T::deserialize(IniDeserializer::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Server {
        host: String,
        port: u16,
        debug: bool,
        ratio: f32,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Document {
        server: Server,
    }

    #[test]
    fn test_struct_of_sections() {
        let input = "[server]\nhost = example.org\nport = 8080\ndebug = yes\nratio = 0.5\n";
        let doc: Document = from_str(input).unwrap();
        assert_eq!(
            doc.server,
            Server {
                host: "example.org".to_string(),
                port: 8080,
                debug: true,
                ratio: 0.5,
            }
        );
    }

    #[test]
    fn test_quoted_values_are_coerced() {
        let input = "[server]\nhost = \"42\"\nport = \"8080\"\ndebug = \"off\"\nratio = 2\n";
        let doc: Document = from_str(input).unwrap();
        assert_eq!(doc.server.host, "42");
        assert_eq!(doc.server.port, 8080);
        assert!(!doc.server.debug);
        assert_eq!(doc.server.ratio, 2.0);
    }

    #[test]
    fn test_out_of_range_integer_is_rejected() {
        let input = "[server]\nhost = h\nport = 70000\ndebug = no\nratio = 1.0\n";
        assert!(from_str::<Document>(input).is_err());
    }

    #[test]
    fn test_unconvertible_value_reports_value_error() {
        let input = "[server]\nhost = h\nport = eighty\ndebug = no\nratio = 1.0\n";
        let err = from_str::<Document>(input).unwrap_err();
        assert!(matches!(err, IniError::Value(ref m) if m == "Cannot convert to Int: eighty"));
    }

    #[test]
    fn test_missing_section_is_deserialize_error() {
        let err = from_str::<Document>("[other]\nx = 1\n").unwrap_err();
        assert!(matches!(err, IniError::Deserialize(ref m) if m.contains("server")));
    }

    #[test]
    fn test_into_maps() {
        let input = "name = app\n[paths]\nroot = /srv\n";
        let doc: HashMap<String, HashMap<String, String>> = from_str(input).unwrap();
        assert_eq!(doc["DEFAULT"]["name"], "app");
        assert_eq!(doc["paths"]["root"], "/srv");
    }

    #[test]
    fn test_optional_fields_and_enums() {
        #[derive(Debug, Deserialize, PartialEq)]
        #[serde(rename_all = "lowercase")]
        enum Level {
            Info,
            Debug,
        }

        #[derive(Debug, Deserialize)]
        struct Logging {
            level: Level,
            file: Option<String>,
            #[serde(default)]
            rotate: Option<u32>,
        }

        #[derive(Debug, Deserialize)]
        struct Root {
            logging: Logging,
        }

        let root: Root = from_str("[logging]\nlevel = debug\nfile = app.log\n").unwrap();
        assert_eq!(root.logging.level, Level::Debug);
        assert_eq!(root.logging.file.as_deref(), Some("app.log"));
        assert_eq!(root.logging.rotate, None);
    }
}
