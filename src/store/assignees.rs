use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};

use crate::error::AppError;
use crate::models::assignee::{Assignee, AssigneeDeletion, AssigneeFilter, AssigneePatch, NewAssignee};
use crate::models::patch::Patch;

use super::{next_timestamp, Store};

impl Store {
    pub async fn list_assignees(&self, filter: &AssigneeFilter) -> Result<Vec<Assignee>, AppError> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM assignees WHERE 1 = 1");
        if let Some(role) = &filter.role {
            query.push(" AND role = ").push_bind(role.clone());
        }
        query.push(" ORDER BY created_at DESC, id DESC");
        Ok(query.build_query_as::<Assignee>().fetch_all(&self.pool).await?)
    }

    pub async fn get_assignee(&self, id: i64) -> Result<Assignee, AppError> {
        sqlx::query_as::<_, Assignee>("SELECT * FROM assignees WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Assignee"))
    }

    pub async fn create_assignee(&self, input: NewAssignee) -> Result<Assignee, AppError> {
        let input = input.validate()?;
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO assignees (name, email, role, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.role)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        self.get_assignee(result.last_insert_rowid()).await
    }

    pub async fn update_assignee(&self, id: i64, patch: AssigneePatch) -> Result<Assignee, AppError> {
        let current = self.get_assignee(id).await?;
        let assignments = patch.into_assignments()?;
        if assignments.is_empty() {
            return Err(AppError::validation("No fields to update"));
        }
        let affected = self
            .apply_patch(AssigneePatch::TABLE, id, assignments, next_timestamp(current.updated_at))
            .await?;
        if affected == 0 {
            return Err(AppError::not_found("Assignee"));
        }
        self.get_assignee(id).await
    }

    /// Tasks and owned projects are unassigned; memberships are removed.
    pub async fn delete_assignee(&self, id: i64) -> Result<AssigneeDeletion, AppError> {
        let mut tx = self.pool.begin().await?;

        let tasks_unassigned: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE assignee_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        let projects_unowned: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE owner_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        let assignments_removed: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM project_assignees WHERE assignee_id = ?")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        let deleted = sqlx::query("DELETE FROM assignees WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(AppError::not_found("Assignee"));
        }
        tx.commit().await?;

        Ok(AssigneeDeletion {
            id,
            tasks_unassigned: tasks_unassigned as u64,
            projects_unowned: projects_unowned as u64,
            assignments_removed: assignments_removed as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::{new_assignee, new_task};

    #[actix_web::test]
    async fn create_then_get_returns_same_record() {
        let store = Store::in_memory().await.unwrap();
        let created = store
            .create_assignee(new_assignee("Grace Hopper", "grace@example.com"))
            .await
            .unwrap();
        assert_eq!(created.name, "Grace Hopper");
        assert_eq!(created.email, "grace@example.com");
        assert_eq!(created.role, "Member");
        assert_eq!(created.created_at, created.updated_at);

        let fetched = store.get_assignee(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[actix_web::test]
    async fn duplicate_email_is_a_conflict_and_inserts_nothing() {
        let store = Store::in_memory().await.unwrap();
        store
            .create_assignee(new_assignee("Grace", "grace@example.com"))
            .await
            .unwrap();

        let err = store
            .create_assignee(new_assignee("Other Grace", "GRACE@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let all = store.list_assignees(&AssigneeFilter::default()).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[actix_web::test]
    async fn update_to_taken_email_is_a_conflict() {
        let store = Store::in_memory().await.unwrap();
        store.create_assignee(new_assignee("Ann", "ann@example.com")).await.unwrap();
        let bob = store.create_assignee(new_assignee("Bob", "bob@example.com")).await.unwrap();

        let patch = AssigneePatch {
            email: Some(Some("ann@example.com".into())),
            ..Default::default()
        };
        assert!(matches!(
            store.update_assignee(bob.id, patch).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[actix_web::test]
    async fn list_filters_by_role_newest_first() {
        let store = Store::in_memory().await.unwrap();
        let first = store.create_assignee(new_assignee("Ann", "ann@example.com")).await.unwrap();
        let second = store.create_assignee(new_assignee("Bob", "bob@example.com")).await.unwrap();
        store
            .create_assignee(NewAssignee {
                role: Some("Lead".into()),
                ..new_assignee("Cy", "cy@example.com")
            })
            .await
            .unwrap();

        let members = store
            .list_assignees(&AssigneeFilter { role: Some("Member".into()) })
            .await
            .unwrap();
        let ids: Vec<i64> = members.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[actix_web::test]
    async fn delete_unassigns_tasks() {
        let store = Store::in_memory().await.unwrap();
        let ann = store.create_assignee(new_assignee("Ann", "ann@example.com")).await.unwrap();
        let task = store
            .create_task(new_task("Write docs", None, Some(ann.id)))
            .await
            .unwrap();

        let report = store.delete_assignee(ann.id).await.unwrap();
        assert_eq!(report.tasks_unassigned, 1);

        let task = store.get_task(task.id).await.unwrap();
        assert_eq!(task.assignee_id, None);
        assert!(matches!(store.get_assignee(ann.id).await, Err(AppError::NotFound(_))));
    }

    #[actix_web::test]
    async fn delete_missing_assignee_is_not_found() {
        let store = Store::in_memory().await.unwrap();
        assert!(matches!(store.delete_assignee(42).await, Err(AppError::NotFound(_))));
    }
}
