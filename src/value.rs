//! Typed INI values
//!
//! [`Value`] is a closed sum over the four scalar kinds an INI value can
//! take. Raw text from a file is classified with [`Value::infer`]; explicit
//! conversions between kinds follow a fixed coercion table and fail with
//! [`IniError::Value`] when text does not parse or a magnitude does not fit.

use crate::error::{IniError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Keywords accepted as `true` when inferring a value from text
const INFER_TRUE: [&str; 3] = ["true", "yes", "on"];
/// Keywords accepted as `false` when inferring a value from text
const INFER_FALSE: [&str; 3] = ["false", "no", "off"];

/// Keywords accepted by an explicit string to bool conversion
const CONVERT_TRUE: [&str; 4] = ["true", "yes", "1", "on"];
const CONVERT_FALSE: [&str; 4] = ["false", "no", "0", "off"];

/// INI value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// Textual spelling of booleans used when rendering values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanFormat {
    pub true_value: String,
    pub false_value: String,
}

impl BooleanFormat {
    pub fn new(true_value: impl Into<String>, false_value: impl Into<String>) -> Self {
        Self {
            true_value: true_value.into(),
            false_value: false_value.into(),
        }
    }

    /// Returns the spelling for `value`
    pub fn render(&self, value: bool) -> &str {
        if value {
            &self.true_value
        } else {
            &self.false_value
        }
    }
}

impl Default for BooleanFormat {
    fn default() -> Self {
        Self::new("True", "False")
    }
}

fn matches_keyword(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.eq_ignore_ascii_case(k))
}

impl Value {
    /// Classifies raw text: integer, then float, then boolean keyword,
    /// falling back to a string
    pub fn infer(text: &str) -> Self {
        if let Ok(i) = text.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = text.parse::<f64>() {
            return Value::Float(f);
        }
        if matches_keyword(text, &INFER_TRUE) {
            return Value::Bool(true);
        }
        if matches_keyword(text, &INFER_FALSE) {
            return Value::Bool(false);
        }
        Value::String(text.to_string())
    }

    /// Returns a reference to the string if this is a String variant
    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    /// Returns the integer if this is an Int variant
    pub fn as_int(&self) -> Option<i64> {
        if let Value::Int(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    /// Returns the float if this is a Float variant
    pub fn as_float(&self) -> Option<f64> {
        if let Value::Float(f) = self {
            Some(*f)
        } else {
            None
        }
    }

    /// Returns the boolean if this is a Bool variant
    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Bool(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    /// Converts to an integer
    ///
    /// Floats are truncated toward zero and must be finite and within the
    /// `i64` range. Booleans map to 1/0. Strings must parse as an integer.
    pub fn to_int(&self) -> Result<i64> {
        match self {
            Value::Int(i) => Ok(*i),
            Value::Bool(b) => Ok(i64::from(*b)),
            Value::Float(f) => {
                if !f.is_finite() {
                    return Err(IniError::value(format!(
                        "Cannot convert non-finite Float {} to Int",
                        f
                    )));
                }
                // i64::MAX as f64 rounds up to 2^63, which is already out of range
                if *f < i64::MIN as f64 || *f >= i64::MAX as f64 {
                    return Err(IniError::value(format!(
                        "Cannot convert Float {} to Int: out of range",
                        f
                    )));
                }
                Ok(f.trunc() as i64)
            }
            Value::String(s) => s
                .parse::<i64>()
                .map_err(|_| IniError::value(format!("Cannot convert to Int: {}", s))),
        }
    }

    /// Converts to a float
    pub fn to_float(&self) -> Result<f64> {
        match self {
            Value::Float(f) => Ok(*f),
            Value::Int(i) => Ok(*i as f64),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::String(s) => s
                .parse::<f64>()
                .map_err(|_| IniError::value(format!("Cannot convert to Float: {}", s))),
        }
    }

    /// Converts to a boolean
    ///
    /// Numbers are true when greater than zero. Strings must match one of
    /// `true/yes/1/on` or `false/no/0/off`, ignoring case.
    pub fn to_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            Value::Int(i) => Ok(*i > 0),
            Value::Float(f) => Ok(*f > 0.0),
            Value::String(s) => {
                if matches_keyword(s, &CONVERT_TRUE) {
                    Ok(true)
                } else if matches_keyword(s, &CONVERT_FALSE) {
                    Ok(false)
                } else {
                    Err(IniError::value(format!("Cannot convert to Bool: {}", s)))
                }
            }
        }
    }

    /// Renders the value as text, spelling booleans with `format`
    pub fn render(&self, format: &BooleanFormat) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Int(i) => i.to_string(),
            // Debug keeps the fractional part, so the text infers back to a float
            Value::Float(f) => format!("{:?}", f),
            Value::Bool(b) => format.render(*b).to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&BooleanFormat::default()))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

/// Types that can be extracted from a [`Value`]
///
/// Implemented for the value kinds themselves and for the common integer
/// widths, which are range-checked after conversion to `i64`.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.to_string())
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self> {
        value.to_int()
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self> {
        value.to_float()
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self> {
        value.to_float().map(|f| f as f32)
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self> {
        value.to_bool()
    }
}

macro_rules! impl_from_value_for_int {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Result<Self> {
                    let i = value.to_int()?;
                    <$ty>::try_from(i).map_err(|_| {
                        IniError::value(format!(
                            "Value {} out of range for {}",
                            i,
                            stringify!($ty)
                        ))
                    })
                }
            }
        )*
    };
}

impl_from_value_for_int!(i8, i16, i32, u8, u16, u32, u64, usize);
