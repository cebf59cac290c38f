use serde::Deserialize;

// Add an assignee to a project, from the assignee's side
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinProjectRequest {
    pub project_id: i64,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectMembershipPath {
    pub id: i64,
    pub project_id: i64,
}
