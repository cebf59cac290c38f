use serde::Deserialize;

// Add a member to a project
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddMemberRequest {
    pub assignee_id: i64,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MemberPath {
    pub id: i64,
    pub assignee_id: i64,
}
