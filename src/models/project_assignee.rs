use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;
use super::assignee::Assignee;
use super::patch::required_text;
use super::project::Project;

pub const DEFAULT_PROJECT_ROLE: &str = "Member";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProjectAssignee {
    pub project_id: i64,
    pub assignee_id: i64,
    pub role: String,
    pub assigned_at: DateTime<Utc>,
}

/// An assignee as seen from one of their projects.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProjectMember {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub assignee: Assignee,
    pub project_role: String,
    pub assigned_at: DateTime<Utc>,
}

/// A project as seen from one of its assignees.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AssigneeProject {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub project: Project,
    pub project_role: String,
    pub assigned_at: DateTime<Utc>,
}

pub fn project_role(role: Option<String>) -> Result<String, AppError> {
    match role {
        Some(role) => required_text("role", &role),
        None => Ok(DEFAULT_PROJECT_ROLE.to_string()),
    }
}
