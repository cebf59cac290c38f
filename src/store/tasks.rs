use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};

use crate::error::AppError;
use crate::models::patch::Patch;
use crate::models::task::{NewTask, Task, TaskDeletion, TaskDetail, TaskFilter, TaskPatch};

use super::{next_timestamp, Store};

pub(crate) const TASK_DETAIL_SELECT: &str = "SELECT t.*, p.name AS project_name, a.name AS assignee_name
     FROM tasks t
     LEFT JOIN projects p ON p.id = t.project_id
     LEFT JOIN assignees a ON a.id = t.assignee_id";

impl Store {
    pub async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, AppError> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM tasks WHERE 1 = 1");
        if let Some(project_id) = filter.project_id {
            query.push(" AND project_id = ").push_bind(project_id);
        }
        if let Some(assignee_id) = filter.assignee_id {
            query.push(" AND assignee_id = ").push_bind(assignee_id);
        }
        if let Some(status) = &filter.status {
            query.push(" AND status = ").push_bind(status.clone());
        }
        if let Some(priority) = &filter.priority {
            query.push(" AND priority = ").push_bind(priority.clone());
        }
        if let Some(completed) = filter.completed {
            query.push(" AND completed = ").push_bind(completed);
        }
        query.push(" ORDER BY created_at DESC, id DESC");
        Ok(query.build_query_as::<Task>().fetch_all(&self.pool).await?)
    }

    pub async fn get_task(&self, id: i64) -> Result<Task, AppError> {
        sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Task"))
    }

    pub async fn create_task(&self, input: NewTask) -> Result<Task, AppError> {
        let input = input.validate()?;
        self.ensure_reference("projects", "project_id", input.project_id).await?;
        self.ensure_reference("assignees", "assignee_id", input.assignee_id).await?;

        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO tasks (title, description, status, priority, due_date, project_id, assignee_id, completed, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.status)
        .bind(&input.priority)
        .bind(input.due_date)
        .bind(input.project_id)
        .bind(input.assignee_id)
        .bind(input.completed)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        self.get_task(result.last_insert_rowid()).await
    }

    pub async fn update_task(&self, id: i64, patch: TaskPatch) -> Result<Task, AppError> {
        let current = self.get_task(id).await?;
        if let Some(project_id) = patch.project_id {
            self.ensure_reference("projects", "project_id", project_id).await?;
        }
        if let Some(assignee_id) = patch.assignee_id {
            self.ensure_reference("assignees", "assignee_id", assignee_id).await?;
        }

        let assignments = patch.into_assignments()?;
        if assignments.is_empty() {
            return Err(AppError::validation("No fields to update"));
        }
        let affected = self
            .apply_patch(TaskPatch::TABLE, id, assignments, next_timestamp(current.updated_at))
            .await?;
        if affected == 0 {
            return Err(AppError::not_found("Task"));
        }
        self.get_task(id).await
    }

    pub async fn delete_task(&self, id: i64) -> Result<TaskDeletion, AppError> {
        let deleted = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(AppError::not_found("Task"));
        }
        Ok(TaskDeletion { id })
    }

    pub async fn tasks_for_project(&self, project_id: i64) -> Result<Vec<TaskDetail>, AppError> {
        self.ensure_exists("projects", "Project", project_id).await?;
        let sql = format!(
            "{} WHERE t.project_id = ? ORDER BY t.created_at DESC, t.id DESC",
            TASK_DETAIL_SELECT
        );
        Ok(sqlx::query_as::<_, TaskDetail>(&sql)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn tasks_for_assignee(&self, assignee_id: i64) -> Result<Vec<TaskDetail>, AppError> {
        self.ensure_exists("assignees", "Assignee", assignee_id).await?;
        let sql = format!(
            "{} WHERE t.assignee_id = ? ORDER BY t.created_at DESC, t.id DESC",
            TASK_DETAIL_SELECT
        );
        Ok(sqlx::query_as::<_, TaskDetail>(&sql)
            .bind(assignee_id)
            .fetch_all(&self.pool)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::{new_assignee, new_project, new_task};
    use chrono::NaiveDate;

    #[actix_web::test]
    async fn create_fills_defaults_and_round_trips() {
        let store = Store::in_memory().await.unwrap();
        let project = store.create_project(new_project("Website")).await.unwrap();
        let ann = store.create_assignee(new_assignee("Ann", "ann@example.com")).await.unwrap();

        let task = store
            .create_task(new_task("Design Homepage", Some(project.id), Some(ann.id)))
            .await
            .unwrap();
        assert_eq!(task.title, "Design Homepage");
        assert_eq!(task.status, "Todo");
        assert_eq!(task.priority, "Medium");
        assert_eq!(task.project_id, Some(project.id));
        assert_eq!(task.assignee_id, Some(ann.id));
        assert!(!task.completed);

        assert_eq!(store.get_task(task.id).await.unwrap(), task);
    }

    #[actix_web::test]
    async fn missing_title_creates_nothing() {
        let store = Store::in_memory().await.unwrap();
        let input = NewTask {
            title: None,
            ..new_task("", None, None)
        };
        assert!(matches!(store.create_task(input).await, Err(AppError::Validation(_))));
        assert!(store.list_tasks(&TaskFilter::default()).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn dangling_references_are_rejected() {
        let store = Store::in_memory().await.unwrap();
        let err = store.create_task(new_task("Orphan", Some(5), None)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "project_id 5 does not exist"));
    }

    #[actix_web::test]
    async fn partial_update_touches_only_supplied_fields() {
        let store = Store::in_memory().await.unwrap();
        let project = store.create_project(new_project("Website")).await.unwrap();
        let original = store
            .create_task(NewTask {
                description: Some("Hero and nav".into()),
                due_date: NaiveDate::from_ymd_opt(2024, 6, 30),
                ..new_task("Design Homepage", Some(project.id), None)
            })
            .await
            .unwrap();

        let patch: TaskPatch = serde_json::from_str(r#"{"status": "In Progress"}"#).unwrap();
        let updated = store.update_task(original.id, patch).await.unwrap();

        assert_eq!(updated.status, "In Progress");
        assert_eq!(updated.title, original.title);
        assert_eq!(updated.description, original.description);
        assert_eq!(updated.priority, original.priority);
        assert_eq!(updated.due_date, original.due_date);
        assert_eq!(updated.project_id, original.project_id);
        assert_eq!(updated.completed, original.completed);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at > original.updated_at);

        let again: TaskPatch = serde_json::from_str(r#"{"completed": true}"#).unwrap();
        let again = store.update_task(original.id, again).await.unwrap();
        assert!(again.completed);
        assert_eq!(again.status, "In Progress");
        assert!(again.updated_at > updated.updated_at);
    }

    #[actix_web::test]
    async fn explicit_null_clears_description() {
        let store = Store::in_memory().await.unwrap();
        let task = store
            .create_task(NewTask {
                description: Some("temp".into()),
                ..new_task("Cleanup", None, None)
            })
            .await
            .unwrap();

        let patch: TaskPatch = serde_json::from_str(r#"{"description": null}"#).unwrap();
        let updated = store.update_task(task.id, patch).await.unwrap();
        assert_eq!(updated.description, None);
    }

    #[actix_web::test]
    async fn null_on_required_field_leaves_row_unchanged() {
        let store = Store::in_memory().await.unwrap();
        let task = store.create_task(new_task("Keep", None, None)).await.unwrap();

        let patch: TaskPatch =
            serde_json::from_str(r#"{"title": null, "status": "Done"}"#).unwrap();
        assert!(matches!(
            store.update_task(task.id, patch).await,
            Err(AppError::Validation(m)) if m == "title cannot be null"
        ));
        assert_eq!(store.get_task(task.id).await.unwrap(), task);
    }

    #[actix_web::test]
    async fn store_foreign_key_violation_becomes_validation() {
        let store = Store::in_memory().await.unwrap();
        let now = Utc::now();
        let err = sqlx::query(
            "INSERT INTO tasks (title, project_id, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind("Dangling")
        .bind(404_i64)
        .bind(now)
        .bind(now)
        .execute(&store.pool)
        .await
        .unwrap_err();

        assert!(matches!(
            AppError::from(err),
            AppError::Validation(m) if m == "Referenced record does not exist"
        ));
        assert!(store.list_tasks(&TaskFilter::default()).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn update_errors() {
        let store = Store::in_memory().await.unwrap();
        assert!(matches!(
            store.update_task(1, TaskPatch { completed: Some(Some(true)), ..Default::default() }).await,
            Err(AppError::NotFound(_))
        ));

        let task = store.create_task(new_task("Cleanup", None, None)).await.unwrap();
        assert!(matches!(
            store.update_task(task.id, TaskPatch::default()).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            store
                .update_task(task.id, TaskPatch { assignee_id: Some(Some(9)), ..Default::default() })
                .await,
            Err(AppError::Validation(_))
        ));
    }

    #[actix_web::test]
    async fn list_filters_combine() {
        let store = Store::in_memory().await.unwrap();
        let project = store.create_project(new_project("Website")).await.unwrap();
        store.create_task(new_task("One", Some(project.id), None)).await.unwrap();
        let done = store
            .create_task(NewTask {
                completed: Some(true),
                ..new_task("Two", Some(project.id), None)
            })
            .await
            .unwrap();
        store.create_task(new_task("Three", None, None)).await.unwrap();

        let filter = TaskFilter {
            project_id: Some(project.id),
            completed: Some(true),
            ..Default::default()
        };
        let tasks = store.list_tasks(&filter).await.unwrap();
        assert_eq!(tasks, vec![done]);
    }

    #[actix_web::test]
    async fn relationship_queries_join_names() {
        let store = Store::in_memory().await.unwrap();
        let project = store.create_project(new_project("Website")).await.unwrap();
        let ann = store.create_assignee(new_assignee("Ann", "ann@example.com")).await.unwrap();
        store.create_task(new_task("Hero", Some(project.id), Some(ann.id))).await.unwrap();
        store.create_task(new_task("Footer", Some(project.id), None)).await.unwrap();

        let tasks = store.tasks_for_project(project.id).await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].task.title, "Footer");
        assert_eq!(tasks[0].assignee_name, None);
        assert_eq!(tasks[1].project_name.as_deref(), Some("Website"));
        assert_eq!(tasks[1].assignee_name.as_deref(), Some("Ann"));

        let for_ann = store.tasks_for_assignee(ann.id).await.unwrap();
        assert_eq!(for_ann.len(), 1);

        assert!(matches!(store.tasks_for_project(404).await, Err(AppError::NotFound(_))));
        assert!(matches!(store.tasks_for_assignee(404).await, Err(AppError::NotFound(_))));
    }

    #[actix_web::test]
    async fn delete_twice_is_not_found() {
        let store = Store::in_memory().await.unwrap();
        let task = store.create_task(new_task("Once", None, None)).await.unwrap();
        assert_eq!(store.delete_task(task.id).await.unwrap(), TaskDeletion { id: task.id });
        assert!(matches!(store.delete_task(task.id).await, Err(AppError::NotFound(_))));
    }
}
