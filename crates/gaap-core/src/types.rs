//! Shared types used across the taxonomy lookup workspace.

use crate::error::GaapError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::OnceLock;

/// Newtype for taxonomy element names with validation.
///
/// Element names are case-sensitive identifiers such as
/// `AccumulatedOtherComprehensiveIncomeLossNetOfTax`: an ASCII letter followed
/// by letters, digits or underscores.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct ElementName(String);

impl ElementName {
    /// Create a new `ElementName` from a string.
    ///
    /// # Errors
    /// Returns error if the name is empty or contains characters outside
    /// `[A-Za-z0-9_]`.
    pub fn new(name: impl Into<String>) -> Result<Self, GaapError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(name: &str) -> Result<(), GaapError> {
        static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = NAME_REGEX
            .get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("valid regex"));

        if name.is_empty() {
            return Err(GaapError::Validation(
                "invalid element name: cannot be empty".to_string(),
            ));
        }

        if regex.is_match(name) {
            Ok(())
        } else {
            Err(GaapError::Validation(format!(
                "invalid element name: must be alphanumeric starting with a letter, got '{name}'"
            )))
        }
    }
}

impl TryFrom<String> for ElementName {
    type Error = GaapError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl fmt::Display for ElementName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ElementName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets maps keyed by `ElementName` be queried with a plain `&str`.
impl Borrow<str> for ElementName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_element_name_valid() {
        let valid_names = vec![
            "AccumulatedOtherComprehensiveIncomeLossNetOfTax",
            "Assets",
            "IncomeTaxExpenseBenefit",
            "Revenue2024",
            "dei_Like_Name",
        ];

        for name in valid_names {
            let element = ElementName::new(name).expect("valid element name");
            assert_eq!(element.as_str(), name);
        }
    }

    #[test]
    fn test_element_name_invalid() {
        let invalid_names = vec![
            "",
            "1Assets",
            "us-gaap:Assets",
            "Assets Current",
            "_Assets",
        ];

        for name in invalid_names {
            assert!(ElementName::new(name).is_err(), "{name} should be rejected");
        }
    }

    #[test]
    fn test_element_name_is_case_sensitive() {
        let upper = ElementName::new("Assets").expect("valid element name");
        let lower = ElementName::new("assets").expect("valid element name");
        assert_ne!(upper, lower);
    }

    #[test]
    fn test_element_name_borrow_lookup() {
        let mut map = HashMap::new();
        map.insert(ElementName::new("Assets").expect("valid element name"), 1);

        assert_eq!(map.get("Assets"), Some(&1));
        assert_eq!(map.get("assets"), None);
    }

    #[test]
    fn test_element_name_serialization() {
        let name = ElementName::new("Liabilities").expect("valid element name");
        let json = serde_json::to_string(&name).expect("serialize element name");
        assert_eq!(json, "\"Liabilities\"");

        let parsed: ElementName = serde_json::from_str(&json).expect("deserialize element name");
        assert_eq!(parsed, name);
    }

    #[test]
    fn test_element_name_deserialization_validates() {
        assert!(serde_json::from_str::<ElementName>("\"us-gaap:Assets\"").is_err());
        assert!(serde_json::from_str::<ElementName>("\"\"").is_err());
    }
}
