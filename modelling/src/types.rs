//! Common type definitions shared by the API and database layers.
//!
//! # ID Types
//!
//! All entity IDs are serial integers wrapped in type aliases:
//!
//! - [`UserId`], [`ModelId`], [`ParameterId`], [`ValueId`]
//! - [`TranslationId`], [`ConstraintId`]
//!
//! # Enumerations
//!
//! - [`ValueType`]: how the values of a parameter are interpreted
//! - [`ConstraintType`]: the relation a constraint expresses
//! - [`Locale`]: the language a request resolves translations in

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

// Type aliases for IDs
pub type UserId = i32;
pub type ModelId = i32;
pub type ParameterId = i32;
pub type ValueId = i32;
pub type TranslationId = i32;
pub type ConstraintId = i32;

/// How the enumerated values of a parameter are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum ValueType {
    /// Every value must parse as a 64-bit integer
    IntSet = 0,
    /// Values are arbitrary strings
    StringSet = 1,
}

impl ValueType {
    /// Check that `value` is a legal member of a set of this type.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            ValueType::IntSet => value.trim().parse::<i64>().is_ok(),
            ValueType::StringSet => true,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::IntSet => write!(f, "int_set"),
            ValueType::StringSet => write!(f, "string_set"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum ConstraintType {
    /// Selecting the source value rules out the target value
    Excludes = 0,
    /// Selecting the source value requires the target value
    Requires = 1,
}

/// The language translations are resolved in for a single request.
///
/// Locales are opaque tags (`en`, `fr`, `de-CH`, ...) matched verbatim against the
/// `language` column of the translation tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Build a locale from a raw tag, rejecting blank input.
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.is_empty() { None } else { Some(Self(tag.to_string())) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
