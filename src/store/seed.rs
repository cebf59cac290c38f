use chrono::{Duration, Utc};
use log::info;

use crate::error::AppError;

use super::Store;

impl Store {
    /// Inserts sample data when all tables are empty. Everything is written in
    /// one transaction. Returns whether anything was written.
    pub async fn seed(&self) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let existing: i64 = sqlx::query_scalar(
            "SELECT (SELECT COUNT(*) FROM assignees) + (SELECT COUNT(*) FROM projects)
                  + (SELECT COUNT(*) FROM tasks) + (SELECT COUNT(*) FROM project_assignees)",
        )
        .fetch_one(&mut *tx)
        .await?;
        if existing > 0 {
            info!("Store already has data, skipping seed");
            return Ok(false);
        }

        let now = Utc::now();
        let today = now.date_naive();

        let mut people = Vec::new();
        for (name, email, role) in [
            ("Alice Johnson", "alice@example.com", "Project Manager"),
            ("Bob Smith", "bob@example.com", "Developer"),
            ("Carol Davis", "carol@example.com", "Designer"),
        ] {
            let result = sqlx::query(
                "INSERT INTO assignees (name, email, role, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(name)
            .bind(email)
            .bind(role)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;
            people.push(result.last_insert_rowid());
        }

        let mut projects = Vec::new();
        for (name, description, status, priority, start_in, end_in) in [
            ("Website Redesign", "Refresh the public website", "Active", "High", 0, Some(60)),
            ("Mobile App", "First release of the companion app", "Planning", "Medium", 30, None),
        ] {
            let result = sqlx::query(
                "INSERT INTO projects (name, description, status, priority, owner_id, start_date, end_date, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(name)
            .bind(description)
            .bind(status)
            .bind(priority)
            .bind(people[0])
            .bind(today + Duration::days(start_in))
            .bind(end_in.map(|days| today + Duration::days(days)))
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;
            projects.push(result.last_insert_rowid());
        }
        let (website, mobile) = (projects[0], projects[1]);

        for (project_id, assignee_id, role) in [
            (website, people[1], "Developer"),
            (website, people[2], "Designer"),
            (mobile, people[1], "Member"),
        ] {
            sqlx::query(
                "INSERT INTO project_assignees (project_id, assignee_id, role, assigned_at) VALUES (?, ?, ?, ?)",
            )
            .bind(project_id)
            .bind(assignee_id)
            .bind(role)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        for (title, project_id, assignee_id, priority, due_in_days) in [
            ("Design Homepage", website, people[2], "High", 7),
            ("Implement Navigation", website, people[1], "Medium", 14),
            ("Set Up CI", mobile, people[1], "Low", 45),
        ] {
            sqlx::query(
                "INSERT INTO tasks (title, status, priority, due_date, project_id, assignee_id, completed, created_at, updated_at)
                 VALUES (?, 'Todo', ?, ?, ?, ?, 0, ?, ?)",
            )
            .bind(title)
            .bind(priority)
            .bind(today + Duration::days(due_in_days))
            .bind(project_id)
            .bind(assignee_id)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!("Seeded sample assignees, projects and tasks");
        Ok(true)
    }
}
