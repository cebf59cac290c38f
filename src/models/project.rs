use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;
use super::patch::{deserialize_some, non_null, optional_text, required_text, Assignment, FieldValue, Patch};

pub const DEFAULT_STATUS: &str = "Planning";
pub const DEFAULT_PRIORITY: &str = "Medium";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub owner_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectFilter {
    pub status: Option<String>,
    pub owner_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDeletion {
    pub id: i64,
    pub tasks_deleted: u64,
    pub assignments_removed: u64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub owner_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInsert {
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub owner_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub fn check_schedule(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), AppError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => {
            Err(AppError::validation("end_date must not be before start_date"))
        }
        _ => Ok(()),
    }
}

impl NewProject {
    pub fn validate(self) -> Result<ProjectInsert, AppError> {
        check_schedule(self.start_date, self.end_date)?;
        Ok(ProjectInsert {
            name: required_text("name", &self.name)?,
            description: optional_text(self.description),
            status: match self.status {
                Some(status) => required_text("status", &status)?,
                None => DEFAULT_STATUS.to_string(),
            },
            priority: match self.priority {
                Some(priority) => required_text("priority", &priority)?,
                None => DEFAULT_PRIORITY.to_string(),
            },
            owner_id: self.owner_id,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectPatch {
    #[serde(default, deserialize_with = "deserialize_some")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub status: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub priority: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub owner_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub end_date: Option<Option<NaiveDate>>,
}

impl ProjectPatch {
    /// Schedule as it will look once applied on top of `current`.
    pub fn merged_schedule(&self, current: &Project) -> (Option<NaiveDate>, Option<NaiveDate>) {
        (
            self.start_date.unwrap_or(current.start_date),
            self.end_date.unwrap_or(current.end_date),
        )
    }
}

impl Patch for ProjectPatch {
    const TABLE: &'static str = "projects";

    fn into_assignments(self) -> Result<Vec<Assignment>, AppError> {
        let mut set = Vec::new();
        if let Some(name) = self.name {
            let name = non_null("name", name)?;
            set.push(Assignment::new("name", FieldValue::Text(required_text("name", &name)?)));
        }
        if let Some(description) = self.description {
            set.push(Assignment::new(
                "description",
                FieldValue::NullableText(optional_text(description)),
            ));
        }
        if let Some(status) = self.status {
            let status = non_null("status", status)?;
            set.push(Assignment::new("status", FieldValue::Text(required_text("status", &status)?)));
        }
        if let Some(priority) = self.priority {
            let priority = non_null("priority", priority)?;
            set.push(Assignment::new(
                "priority",
                FieldValue::Text(required_text("priority", &priority)?),
            ));
        }
        if let Some(owner_id) = self.owner_id {
            set.push(Assignment::new("owner_id", FieldValue::Id(owner_id)));
        }
        if let Some(start_date) = self.start_date {
            set.push(Assignment::new("start_date", FieldValue::Date(start_date)));
        }
        if let Some(end_date) = self.end_date {
            set.push(Assignment::new("end_date", FieldValue::Date(end_date)));
        }
        Ok(set)
    }
}
