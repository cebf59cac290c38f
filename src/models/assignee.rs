use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;
use super::patch::{deserialize_some, non_null, required_text, Assignment, FieldValue, Patch};

pub const DEFAULT_ROLE: &str = "Member";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Assignee {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AssigneeFilter {
    pub role: Option<String>,
}

/// What deleting an assignee did to dependent rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssigneeDeletion {
    pub id: i64,
    pub tasks_unassigned: u64,
    pub projects_unowned: u64,
    pub assignments_removed: u64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAssignee {
    pub name: String,
    pub email: String,
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssigneePatch {
    #[serde(default, deserialize_with = "deserialize_some")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub role: Option<Option<String>>,
}

pub fn validate_name(name: &str) -> Result<String, AppError> {
    let name = required_text("name", name)?;
    if name.chars().count() < 2 {
        return Err(AppError::validation("name must be at least 2 characters"));
    }
    Ok(name)
}

pub fn validate_email(email: &str) -> Result<String, AppError> {
    let email = required_text("email", email)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(email)
        }
        _ => Err(AppError::validation("email must be a valid address")),
    }
}

/// Validated insert values.
#[derive(Debug, Clone, PartialEq)]
pub struct AssigneeInsert {
    pub name: String,
    pub email: String,
    pub role: String,
}

impl NewAssignee {
    pub fn validate(self) -> Result<AssigneeInsert, AppError> {
        Ok(AssigneeInsert {
            name: validate_name(&self.name)?,
            email: validate_email(&self.email)?,
            role: match self.role {
                Some(role) => required_text("role", &role)?,
                None => DEFAULT_ROLE.to_string(),
            },
        })
    }
}

impl Patch for AssigneePatch {
    const TABLE: &'static str = "assignees";

    fn into_assignments(self) -> Result<Vec<Assignment>, AppError> {
        let mut set = Vec::new();
        if let Some(name) = self.name {
            let name = non_null("name", name)?;
            set.push(Assignment::new("name", FieldValue::Text(validate_name(&name)?)));
        }
        if let Some(email) = self.email {
            let email = non_null("email", email)?;
            set.push(Assignment::new("email", FieldValue::Text(validate_email(&email)?)));
        }
        if let Some(role) = self.role {
            let role = non_null("role", role)?;
            set.push(Assignment::new("role", FieldValue::Text(required_text("role", &role)?)));
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_defaults_to_member() {
        let insert = NewAssignee {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role: None,
        }
        .validate()
        .unwrap();
        assert_eq!(insert.role, DEFAULT_ROLE);
    }

    #[test]
    fn short_names_and_bad_emails_are_rejected() {
        assert!(validate_name(" A ").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("a@").is_err());
        assert!(validate_email("a@b@c").is_err());
        assert_eq!(validate_email(" a@b.io ").unwrap(), "a@b.io");
    }

    #[test]
    fn patch_only_emits_supplied_fields() {
        let patch: AssigneePatch = serde_json::from_str(r#"{"role": "Lead"}"#).unwrap();
        let set = patch.into_assignments().unwrap();
        assert_eq!(set, vec![Assignment::new("role", FieldValue::Text("Lead".into()))]);
    }

    #[test]
    fn null_email_is_rejected() {
        let patch: AssigneePatch = serde_json::from_str(r#"{"email": null}"#).unwrap();
        assert!(matches!(
            patch.into_assignments(),
            Err(AppError::Validation(m)) if m == "email cannot be null"
        ));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<AssigneePatch>(r#"{"nickname": "x"}"#).is_err());
    }
}
