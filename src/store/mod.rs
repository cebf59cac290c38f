// src/store/mod.rs

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite};

use crate::config::Config;
use crate::error::AppError;
use crate::models::patch::{Assignment, FieldValue};

pub mod schema;
pub mod seed;
pub mod assignees;
pub mod projects;
pub mod tasks;
pub mod project_assignees;
pub mod dashboard;
#[cfg(test)]
pub mod test_support;

/// Handle to the relational store. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub async fn connect(config: &Config) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        // Each connection to an in-memory database sees its own empty copy.
        let pool = if is_memory_url(&config.database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<std::time::Duration>)
                .max_lifetime(None::<std::time::Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        }
        .connect_with(options)
        .await?;
        info!("Connected to {}", config.database_url);
        Ok(Store { pool })
    }

    /// Single-connection in-memory store with the schema applied.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<std::time::Duration>)
            .max_lifetime(None::<std::time::Duration>)
            .connect_with(options)
            .await?;
        let store = Store { pool };
        store.init_schema().await?;
        Ok(store)
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Store connection closed");
    }

    async fn exists(&self, table: &'static str, id: i64) -> Result<bool, AppError> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE id = ?", table);
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn ensure_exists(&self, table: &'static str, entity: &str, id: i64) -> Result<(), AppError> {
        if self.exists(table, id).await? {
            Ok(())
        } else {
            Err(AppError::not_found(entity))
        }
    }

    /// Referenced ids supplied in a request body must point at real rows.
    async fn ensure_reference(&self, table: &'static str, field: &str, id: Option<i64>) -> Result<(), AppError> {
        match id {
            Some(id) if !self.exists(table, id).await? => Err(AppError::validation(format!(
                "{} {} does not exist",
                field, id
            ))),
            _ => Ok(()),
        }
    }

    /// Runs `UPDATE <table> SET ... WHERE id = ?` for the given assignments,
    /// always refreshing `updated_at`.
    async fn apply_patch(
        &self,
        table: &'static str,
        id: i64,
        assignments: Vec<Assignment>,
        updated_at: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE ");
        query.push(table).push(" SET ");
        let mut fields = query.separated(", ");
        for Assignment { column, value } in assignments {
            fields.push(column).push_unseparated(" = ");
            match value {
                FieldValue::Text(v) => fields.push_bind_unseparated(v),
                FieldValue::NullableText(v) => fields.push_bind_unseparated(v),
                FieldValue::Id(v) => fields.push_bind_unseparated(v),
                FieldValue::Date(v) => fields.push_bind_unseparated(v),
                FieldValue::Flag(v) => fields.push_bind_unseparated(v),
            };
        }
        fields.push("updated_at = ").push_bind_unseparated(updated_at);
        query.push(" WHERE id = ").push_bind(id);

        let result = query.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Next `updated_at`, strictly after `previous` even if the clock has not advanced.
pub fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_timestamp_is_strictly_later() {
        let future = Utc::now() + Duration::hours(1);
        assert!(next_timestamp(future) > future);

        let past = Utc::now() - Duration::hours(1);
        assert!(next_timestamp(past) > past);
    }

    #[test]
    fn memory_urls_are_recognized() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite://tracker?mode=memory&cache=shared"));
        assert!(!is_memory_url("sqlite://project_tracker.db"));
    }

    #[actix_web::test]
    async fn memory_url_keeps_schema_across_pooled_queries() {
        let config = Config {
            database_url: "sqlite::memory:".into(),
            server_address: "127.0.0.1:0".into(),
            max_connections: 4,
            init_schema: true,
            seed: false,
        };
        let store = Store::connect(&config).await.unwrap();
        store.init_schema().await.unwrap();

        let stats = store.dashboard_stats().await.unwrap();
        assert_eq!(stats.total_tasks, 0);
        store.close().await;
    }

    #[actix_web::test]
    async fn exists_reports_missing_rows() {
        let store = Store::in_memory().await.unwrap();
        assert!(!store.exists("tasks", 1).await.unwrap());
        assert!(matches!(
            store.ensure_exists("projects", "Project", 7).await,
            Err(AppError::NotFound(m)) if m == "Project not found"
        ));
        assert!(matches!(
            store.ensure_reference("assignees", "assignee_id", Some(3)).await,
            Err(AppError::Validation(_))
        ));
        assert!(store.ensure_reference("assignees", "assignee_id", None).await.is_ok());
    }
}
