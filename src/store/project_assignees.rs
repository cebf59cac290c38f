use chrono::Utc;

use crate::error::AppError;
use crate::models::project_assignee::{project_role, AssigneeProject, ProjectAssignee, ProjectMember};

use super::Store;

impl Store {
    /// Adds `assignee_id` to the project's members. A repeated pair is a conflict.
    pub async fn assign_to_project(
        &self,
        project_id: i64,
        assignee_id: i64,
        role: Option<String>,
    ) -> Result<ProjectAssignee, AppError> {
        let role = project_role(role)?;
        self.ensure_exists("projects", "Project", project_id).await?;
        self.ensure_exists("assignees", "Assignee", assignee_id).await?;

        let assigned_at = Utc::now();
        sqlx::query(
            "INSERT INTO project_assignees (project_id, assignee_id, role, assigned_at) VALUES (?, ?, ?, ?)",
        )
        .bind(project_id)
        .bind(assignee_id)
        .bind(&role)
        .bind(assigned_at)
        .execute(&self.pool)
        .await?;

        Ok(ProjectAssignee {
            project_id,
            assignee_id,
            role,
            assigned_at,
        })
    }

    pub async fn unassign_from_project(&self, project_id: i64, assignee_id: i64) -> Result<(), AppError> {
        self.ensure_exists("projects", "Project", project_id).await?;
        self.ensure_exists("assignees", "Assignee", assignee_id).await?;

        let deleted = sqlx::query("DELETE FROM project_assignees WHERE project_id = ? AND assignee_id = ?")
            .bind(project_id)
            .bind(assignee_id)
            .execute(&self.pool)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("Assignee is not assigned to this project".into()));
        }
        Ok(())
    }

    pub async fn project_members(&self, project_id: i64) -> Result<Vec<ProjectMember>, AppError> {
        self.ensure_exists("projects", "Project", project_id).await?;
        Ok(sqlx::query_as::<_, ProjectMember>(
            "SELECT a.*, pa.role AS project_role, pa.assigned_at
             FROM project_assignees pa
             JOIN assignees a ON a.id = pa.assignee_id
             WHERE pa.project_id = ?
             ORDER BY pa.assigned_at DESC, a.id DESC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn assignee_projects(&self, assignee_id: i64) -> Result<Vec<AssigneeProject>, AppError> {
        self.ensure_exists("assignees", "Assignee", assignee_id).await?;
        Ok(sqlx::query_as::<_, AssigneeProject>(
            "SELECT p.*, pa.role AS project_role, pa.assigned_at
             FROM project_assignees pa
             JOIN projects p ON p.id = pa.project_id
             WHERE pa.assignee_id = ?
             ORDER BY pa.assigned_at DESC, p.id DESC",
        )
        .bind(assignee_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
