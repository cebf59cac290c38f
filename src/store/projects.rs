use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};

use crate::error::AppError;
use crate::models::patch::Patch;
use crate::models::project::{
    check_schedule, NewProject, Project, ProjectDeletion, ProjectFilter, ProjectPatch,
};

use super::{next_timestamp, Store};

impl Store {
    pub async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>, AppError> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM projects WHERE 1 = 1");
        if let Some(status) = &filter.status {
            query.push(" AND status = ").push_bind(status.clone());
        }
        if let Some(owner_id) = filter.owner_id {
            query.push(" AND owner_id = ").push_bind(owner_id);
        }
        query.push(" ORDER BY created_at DESC, id DESC");
        Ok(query.build_query_as::<Project>().fetch_all(&self.pool).await?)
    }

    pub async fn get_project(&self, id: i64) -> Result<Project, AppError> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Project"))
    }

    pub async fn create_project(&self, input: NewProject) -> Result<Project, AppError> {
        let input = input.validate()?;
        self.ensure_reference("assignees", "owner_id", input.owner_id).await?;

        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO projects (name, description, status, priority, owner_id, start_date, end_date, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.status)
        .bind(&input.priority)
        .bind(input.owner_id)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        self.get_project(result.last_insert_rowid()).await
    }

    pub async fn update_project(&self, id: i64, patch: ProjectPatch) -> Result<Project, AppError> {
        let current = self.get_project(id).await?;
        let (start, end) = patch.merged_schedule(&current);
        check_schedule(start, end)?;
        if let Some(owner_id) = patch.owner_id {
            self.ensure_reference("assignees", "owner_id", owner_id).await?;
        }

        let assignments = patch.into_assignments()?;
        if assignments.is_empty() {
            return Err(AppError::validation("No fields to update"));
        }
        let affected = self
            .apply_patch(ProjectPatch::TABLE, id, assignments, next_timestamp(current.updated_at))
            .await?;
        if affected == 0 {
            return Err(AppError::not_found("Project"));
        }
        self.get_project(id).await
    }

    /// Tasks and memberships of the project are removed with it.
    pub async fn delete_project(&self, id: i64) -> Result<ProjectDeletion, AppError> {
        let mut tx = self.pool.begin().await?;

        let tasks_deleted: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE project_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        let assignments_removed: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM project_assignees WHERE project_id = ?")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        let deleted = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(AppError::not_found("Project"));
        }
        tx.commit().await?;

        Ok(ProjectDeletion {
            id,
            tasks_deleted: tasks_deleted as u64,
            assignments_removed: assignments_removed as u64,
        })
    }
}
