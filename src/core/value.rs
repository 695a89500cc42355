//! Typed property values

use crate::{Error, error, CheapString};
use std::fmt;

/// Declared type of a property
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PropertyType {
    Boolean,
    Int,
    String,
    /// `auto`, `inherit`, an empty string or a number followed by a CSS unit
    CssSize,
    /// One of the listed keys
    Enum(&'static [&'static str]),
}

/// A parsed property value
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    String(CheapString),
    Null,
}

const CSS_UNITS: &[&str] = &[
    "px", "em", "rem", "%", "vw", "vh", "vmin", "vmax", "ex", "ch", "cm", "mm", "in", "pt", "pc",
];

fn is_css_size(text: &str) -> bool {
    if matches!(text, "" | "auto" | "inherit") {
        return true;
    }

    // "em" is a suffix of "rem", so every unit has to be tried
    let with_unit = CSS_UNITS.iter().any(|unit| match text.strip_suffix(unit) {
        Some(number) => !number.is_empty() && number.parse::<f64>().is_ok(),
        None => false,
    });

    // unitless zero
    with_unit || text == "0"
}

impl PropertyValue {
    /// Parses the textual (XML attribute) form of a value
    pub fn parse(text: &str, ty: PropertyType) -> Result<Self, Error> {
        use PropertyType::*;

        match ty {
            Boolean => match text {
                "true" => Ok(Self::Bool(true)),
                "false" => Ok(Self::Bool(false)),
                _ => Err(error!(Metadata, "Couldn't parse {:?} as a boolean", text)),
            },
            Int => match text.parse() {
                Ok(num) => Ok(Self::Int(num)),
                Err(e) => Err(error!(Metadata, "Couldn't parse {:?} as an integer: {}", text, e)),
            },
            String => Ok(Self::String(CheapString::copy(text))),
            CssSize => match is_css_size(text) {
                true => Ok(Self::String(CheapString::copy(text))),
                false => Err(error!(Metadata, "Couldn't parse {:?} as a CSS size", text)),
            },
            Enum(keys) => match keys.contains(&text) {
                true => Ok(Self::String(CheapString::copy(text))),
                false => Err(error!(Metadata, "{:?} is not one of {:?}", text, keys)),
            },
        }
    }

    /// Checks that this value may be stored in a property of type `ty`
    pub fn check(&self, ty: PropertyType) -> Result<(), Error> {
        use PropertyType::*;

        match (self, ty) {
            (Self::Null, _) => Ok(()),
            (Self::Bool(_), Boolean) => Ok(()),
            (Self::Int(_), Int) => Ok(()),
            (Self::String(_), String) => Ok(()),
            (Self::String(s), CssSize | Enum(_)) => Self::parse(s, ty).map(|_| ()),
            (value, ty) => Err(error!(Metadata, "{:?} is not a valid {:?} value", value, ty)),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&'static str> for PropertyValue {
    fn from(s: &'static str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<CheapString> for PropertyValue {
    fn from(s: CheapString) -> Self {
        Self::String(s)
    }
}

/// Renders the XML attribute form; `Null` renders as an empty string
impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "{}", s),
            Self::Null => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_sizes() {
        for ok in ["", "auto", "inherit", "0", "100px", "50%", "1.5rem", "-2em"] {
            assert!(PropertyValue::parse(ok, PropertyType::CssSize).is_ok(), "{:?}", ok);
        }

        for bad in ["px", "100", "wide", "10 px"] {
            let err = PropertyValue::parse(bad, PropertyType::CssSize).unwrap_err();
            assert_eq!(err.kind, crate::ErrorKind::Metadata, "{:?}", bad);
        }
    }

    #[test]
    fn booleans_are_strict() {
        assert_eq!(PropertyValue::parse("true", PropertyType::Boolean).unwrap(), PropertyValue::Bool(true));
        assert!(PropertyValue::parse("True", PropertyType::Boolean).is_err());
        assert!(PropertyValue::parse("1", PropertyType::Boolean).is_err());
    }

    #[test]
    fn enums_and_checks() {
        const LEVELS: PropertyType = PropertyType::Enum(&["Auto", "H1", "H2"]);
        assert!(PropertyValue::parse("H2", LEVELS).is_ok());
        assert!(PropertyValue::parse("H9", LEVELS).is_err());
        assert!(PropertyValue::from("H1").check(LEVELS).is_ok());
        assert!(PropertyValue::Bool(true).check(PropertyType::String).is_err());
        assert!(PropertyValue::Null.check(PropertyType::Int).is_ok());
    }
}
