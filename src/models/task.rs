use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;
use super::patch::{deserialize_some, non_null, optional_text, required_text, Assignment, FieldValue, Patch};

pub const DEFAULT_STATUS: &str = "Todo";
pub const DEFAULT_PRIORITY: &str = "Medium";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub due_date: Option<NaiveDate>,
    pub project_id: Option<i64>,
    pub assignee_id: Option<i64>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Task joined with the names of its project and assignee.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TaskDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub task: Task,
    pub project_name: Option<String>,
    pub assignee_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskFilter {
    pub project_id: Option<i64>,
    pub assignee_id: Option<i64>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDeletion {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub project_id: Option<i64>,
    pub assignee_id: Option<i64>,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskInsert {
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub due_date: Option<NaiveDate>,
    pub project_id: Option<i64>,
    pub assignee_id: Option<i64>,
    pub completed: bool,
}

impl NewTask {
    pub fn validate(self) -> Result<TaskInsert, AppError> {
        let title = match self.title {
            Some(title) => required_text("title", &title)?,
            None => return Err(AppError::validation("title is required")),
        };
        Ok(TaskInsert {
            title,
            description: optional_text(self.description),
            status: match self.status {
                Some(status) => required_text("status", &status)?,
                None => DEFAULT_STATUS.to_string(),
            },
            priority: match self.priority {
                Some(priority) => required_text("priority", &priority)?,
                None => DEFAULT_PRIORITY.to_string(),
            },
            due_date: self.due_date,
            project_id: self.project_id,
            assignee_id: self.assignee_id,
            completed: self.completed.unwrap_or(false),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskPatch {
    #[serde(default, deserialize_with = "deserialize_some")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub status: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub priority: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub project_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub assignee_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub completed: Option<Option<bool>>,
}

impl Patch for TaskPatch {
    const TABLE: &'static str = "tasks";

    fn into_assignments(self) -> Result<Vec<Assignment>, AppError> {
        let mut set = Vec::new();
        if let Some(title) = self.title {
            let title = non_null("title", title)?;
            set.push(Assignment::new("title", FieldValue::Text(required_text("title", &title)?)));
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
        if let Some(due_date) = self.due_date {
            set.push(Assignment::new("due_date", FieldValue::Date(due_date)));
        }
        if let Some(project_id) = self.project_id {
            set.push(Assignment::new("project_id", FieldValue::Id(project_id)));
        }
        if let Some(assignee_id) = self.assignee_id {
            set.push(Assignment::new("assignee_id", FieldValue::Id(assignee_id)));
        }
        if let Some(completed) = self.completed {
            let completed = non_null("completed", completed)?;
            set.push(Assignment::new("completed", FieldValue::Flag(completed)));
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_title_is_a_validation_error() {
        let task: NewTask = serde_json::from_str(r#"{"project_id": 1}"#).unwrap();
        assert!(matches!(task.validate(), Err(AppError::Validation(m)) if m == "title is required"));
    }

    #[test]
    fn defaults_match_a_fresh_task() {
        let task: NewTask = serde_json::from_str(
            r#"{"title": "Design Homepage", "project_id": 1, "assignee_id": 1}"#,
        )
        .unwrap();
        let insert = task.validate().unwrap();
        assert_eq!(insert.status, "Todo");
        assert_eq!(insert.priority, "Medium");
        assert!(!insert.completed);
    }

    #[test]
    fn null_on_required_fields_is_rejected() {
        for body in [r#"{"title": null}"#, r#"{"status": null}"#, r#"{"completed": null}"#] {
            let patch: TaskPatch = serde_json::from_str(body).unwrap();
            assert!(matches!(patch.into_assignments(), Err(AppError::Validation(_))), "{}", body);
        }
    }

    #[test]
    fn blank_status_in_patch_is_rejected() {
        let patch: TaskPatch = serde_json::from_str(r#"{"status": "  "}"#).unwrap();
        assert!(patch.into_assignments().is_err());
    }

    #[test]
    fn patch_keeps_field_order_of_setter_table() {
        let patch: TaskPatch =
            serde_json::from_str(r#"{"completed": true, "assignee_id": null}"#).unwrap();
        let columns: Vec<&str> = patch
            .into_assignments()
            .unwrap()
            .iter()
            .map(|a| a.column)
            .collect();
        assert_eq!(columns, vec!["assignee_id", "completed"]);
    }
}
