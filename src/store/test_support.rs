use crate::models::assignee::NewAssignee;
use crate::models::project::NewProject;
use crate::models::task::NewTask;

pub fn new_assignee(name: &str, email: &str) -> NewAssignee {
    NewAssignee {
        name: name.into(),
        email: email.into(),
        role: None,
    }
}

pub fn new_project(name: &str) -> NewProject {
    NewProject {
        name: name.into(),
        description: None,
        status: None,
        priority: None,
        owner_id: None,
        start_date: None,
        end_date: None,
    }
}

pub fn new_task(title: &str, project_id: Option<i64>, assignee_id: Option<i64>) -> NewTask {
    NewTask {
        title: Some(title.into()),
        description: None,
        status: None,
        priority: None,
        due_date: None,
        project_id,
        assignee_id,
        completed: None,
    }
}
