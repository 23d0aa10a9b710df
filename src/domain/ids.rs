//! Domain identifier types with validation
//!
//! Resource and dataset names end up as table, schema and directory names in
//! every destination, so they are restricted to a portable identifier subset:
//! lowercase ASCII letters, digits and underscores, not starting with a digit,
//! at most 63 characters (the PostgreSQL identifier limit).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MAX_IDENTIFIER_LEN: usize = 63;

fn validate_identifier(kind: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{kind} cannot be empty"));
    }

    if value.len() > MAX_IDENTIFIER_LEN {
        return Err(format!(
            "{kind} '{value}' is longer than {MAX_IDENTIFIER_LEN} characters"
        ));
    }

    if value.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(format!("{kind} '{value}' cannot start with a digit"));
    }

    if !value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(format!(
            "{kind} '{value}' may only contain lowercase letters, digits and underscores"
        ));
    }

    Ok(())
}

/// Name of a resource, which is also the name of its destination table
///
/// # Examples
///
/// ```
/// use shoploader::domain::ids::ResourceName;
/// use std::str::FromStr;
///
/// let name = ResourceName::from_str("raw_orders").unwrap();
/// assert_eq!(name.as_str(), "raw_orders");
/// assert!(ResourceName::from_str("Raw Orders").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceName(String);

impl ResourceName {
    /// Creates a new ResourceName, validating the identifier rules
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        validate_identifier("Resource name", &name)?;
        Ok(Self(name))
    }

    /// Built-in names known to satisfy the identifier rules
    pub(crate) fn builtin(name: &'static str) -> Self {
        debug_assert!(validate_identifier("ResourceName", name).is_ok());
        Self(name.to_string())
    }

    /// Returns the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ResourceName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ResourceName> for String {
    fn from(name: ResourceName) -> Self {
        name.0
    }
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Name of the destination dataset (BigQuery dataset, PostgreSQL schema,
/// filesystem directory)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DatasetName(String);

impl DatasetName {
    /// Creates a new DatasetName, validating the identifier rules
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        validate_identifier("Dataset name", &name)?;
        Ok(Self(name))
    }

    /// Built-in names known to satisfy the identifier rules
    pub(crate) fn builtin(name: &'static str) -> Self {
        debug_assert!(validate_identifier("DatasetName", name).is_ok());
        Self(name.to_string())
    }

    /// Returns the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DatasetName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DatasetName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DatasetName> for String {
    fn from(name: DatasetName) -> Self {
        name.0
    }
}

impl AsRef<str> for DatasetName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier shared by every row written during one pipeline run
///
/// Formatted as `<unix seconds>.<microseconds>` of the run start, so load ids
/// sort chronologically as plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoadId(String);

impl LoadId {
    /// Build the load id for a run started at `started_at`
    pub fn from_timestamp(started_at: DateTime<Utc>) -> Self {
        Self(format!(
            "{}.{:06}",
            started_at.timestamp(),
            started_at.timestamp_subsec_micros()
        ))
    }

    /// Returns the load id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for LoadId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
