//! Table name - an identifier that is safe to interpolate into SQL
//!
//! Only ASCII letters, digits and underscores are accepted.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::validation::ValidationReason;

/// Validated table identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    /// Validate and wrap a table name
    pub fn parse(s: &str) -> Result<Self, ValidationReason> {
        if is_safe_identifier(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(ValidationReason::InvalidIdentifier {
                identifier: s.to_string(),
            })
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Check that an identifier is non-empty and made only of `[A-Za-z0-9_]`
pub fn is_safe_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for TableName {
    type Err = ValidationReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TableName::parse(s)
    }
}

impl Serialize for TableName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}
