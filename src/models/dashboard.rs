use serde::Serialize;
use sqlx::FromRow;

use super::task::TaskDetail;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_projects: i64,
    pub total_tasks: i64,
    pub total_assignees: i64,
    pub completed_tasks: i64,
    pub pending_tasks: i64,
    pub overdue_tasks: i64,
    pub tasks_by_status: Vec<StatusCount>,
    pub projects_by_status: Vec<StatusCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    #[serde(flatten)]
    pub stats: DashboardStats,
    pub recent_tasks: Vec<TaskDetail>,
}
