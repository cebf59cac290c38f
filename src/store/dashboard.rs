use chrono::Utc;

use crate::error::AppError;
use crate::models::dashboard::{Dashboard, DashboardStats, StatusCount};
use crate::models::task::TaskDetail;

use super::tasks::TASK_DETAIL_SELECT;
use super::Store;

const RECENT_TASKS: i64 = 5;

impl Store {
    async fn count(&self, sql: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(sql).fetch_one(&self.pool).await
    }

    async fn status_counts(&self, table: &str) -> Result<Vec<StatusCount>, sqlx::Error> {
        let sql = format!(
            "SELECT status, COUNT(*) AS count FROM {} GROUP BY status ORDER BY status",
            table
        );
        sqlx::query_as::<_, StatusCount>(&sql).fetch_all(&self.pool).await
    }

    /// Total and completed task counts from one snapshot.
    async fn task_totals(&self) -> Result<(i64, i64), sqlx::Error> {
        sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(completed), 0) FROM tasks")
            .fetch_one(&self.pool)
            .await
    }

    async fn overdue_tasks(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks WHERE completed = 0 AND due_date IS NOT NULL AND due_date < ?",
        )
        .bind(Utc::now().date_naive())
        .fetch_one(&self.pool)
        .await
    }

    /// Aggregate counts, gathered with concurrent queries.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, AppError> {
        let (
            total_projects,
            (total_tasks, completed_tasks),
            total_assignees,
            overdue_tasks,
            tasks_by_status,
            projects_by_status,
        ) = tokio::try_join!(
            self.count("SELECT COUNT(*) FROM projects"),
            self.task_totals(),
            self.count("SELECT COUNT(*) FROM assignees"),
            self.overdue_tasks(),
            self.status_counts("tasks"),
            self.status_counts("projects"),
        )?;

        Ok(DashboardStats {
            total_projects,
            total_tasks,
            total_assignees,
            completed_tasks,
            pending_tasks: total_tasks - completed_tasks,
            overdue_tasks,
            tasks_by_status,
            projects_by_status,
        })
    }

    pub async fn dashboard(&self) -> Result<Dashboard, AppError> {
        let sql = format!("{} ORDER BY t.created_at DESC, t.id DESC LIMIT ?", TASK_DETAIL_SELECT);
        let recent = sqlx::query_as::<_, TaskDetail>(&sql)
            .bind(RECENT_TASKS)
            .fetch_all(&self.pool);
        let (stats, recent_tasks) = tokio::try_join!(self.dashboard_stats(), async {
            recent.await.map_err(AppError::from)
        })?;
        Ok(Dashboard { stats, recent_tasks })
    }
}
