use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// A typed value for one column of a partial update.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    NullableText(Option<String>),
    Id(Option<i64>),
    Date(Option<NaiveDate>),
    Flag(bool),
}

/// One `column = value` pair. Column names only ever come from the
/// setter tables in the model modules, never from request input.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: &'static str,
    pub value: FieldValue,
}

impl Assignment {
    pub fn new(column: &'static str, value: FieldValue) -> Self {
        Assignment { column, value }
    }
}

/// Sparse update for a single table.
pub trait Patch {
    const TABLE: &'static str;

    /// Checks the supplied fields and yields the column assignments.
    /// Unsupplied fields produce no assignment.
    fn into_assignments(self) -> Result<Vec<Assignment>, crate::error::AppError>;
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Trims and rejects blank strings for required text columns.
pub fn required_text(field: &str, value: &str) -> Result<String, crate::error::AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(crate::error::AppError::validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Rejects an explicit `null` on a column that cannot be cleared.
pub fn non_null<T>(field: &str, value: Option<T>) -> Result<T, crate::error::AppError> {
    value.ok_or_else(|| crate::error::AppError::validation(format!("{} cannot be null", field)))
}

/// Trims optional text; blank collapses to `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
