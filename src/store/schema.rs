use log::info;

use super::Store;

// Delete policy: removing a project cascades to its tasks and memberships;
// removing an assignee unassigns their tasks, clears project ownership and
// drops their memberships.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS assignees (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL COLLATE NOCASE UNIQUE,
        role TEXT NOT NULL DEFAULT 'Member',
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS projects (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT,
        status TEXT NOT NULL DEFAULT 'Planning',
        priority TEXT NOT NULL DEFAULT 'Medium',
        owner_id INTEGER REFERENCES assignees(id) ON DELETE SET NULL,
        start_date TEXT,
        end_date TEXT,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT,
        status TEXT NOT NULL DEFAULT 'Todo',
        priority TEXT NOT NULL DEFAULT 'Medium',
        due_date TEXT,
        project_id INTEGER REFERENCES projects(id) ON DELETE CASCADE,
        assignee_id INTEGER REFERENCES assignees(id) ON DELETE SET NULL,
        completed BOOLEAN NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS project_assignees (
        project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        assignee_id INTEGER NOT NULL REFERENCES assignees(id) ON DELETE CASCADE,
        role TEXT NOT NULL DEFAULT 'Member',
        assigned_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        UNIQUE (project_id, assignee_id)
    )",
    "CREATE INDEX IF NOT EXISTS idx_tasks_project_id ON tasks(project_id)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_assignee_id ON tasks(assignee_id)",
    "CREATE INDEX IF NOT EXISTS idx_projects_owner_id ON projects(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_project_assignees_assignee_id ON project_assignees(assignee_id)",
];

impl Store {
    /// Idempotent: safe to run on every startup.
    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for statement in SCHEMA {
            sqlx::query(*statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        info!("Schema ready ({} statements)", SCHEMA.len());
        Ok(())
    }
}
