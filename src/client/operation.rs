use std::fmt::Display;

use reqwest::{Method, StatusCode};

/// Header carrying the session token on authenticated calls.
pub const AUTH_HEADER: &str = "X-API-AUTH-TOKEN";

const TASKS_PATH: &str = "/api/v1/rzd/tasks";
const TASK_BY_ID_PATH: &str = "/api/v1/rzd/tasks/{task_id}";

/// One backend endpoint the client knows how to call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    ListTasks,
    CreateTask,
    DeleteAllTasksForUser,
    DeleteTaskByIdForUser,
    Login,
    Me,
    Signup,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::ListTasks,
        Operation::CreateTask,
        Operation::DeleteAllTasksForUser,
        Operation::DeleteTaskByIdForUser,
        Operation::Login,
        Operation::Me,
        Operation::Signup,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::ListTasks => "listTasks",
            Operation::CreateTask => "createTask",
            Operation::DeleteAllTasksForUser => "deleteAllTasksForUser",
            Operation::DeleteTaskByIdForUser => "deleteTaskByIdForUser",
            Operation::Login => "login",
            Operation::Me => "me",
            Operation::Signup => "signup",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Operation::ListTasks | Operation::Me => Method::GET,
            Operation::CreateTask | Operation::Login | Operation::Signup => Method::POST,
            Operation::DeleteAllTasksForUser | Operation::DeleteTaskByIdForUser => Method::DELETE,
        }
    }

    pub fn path_template(self) -> &'static str {
        match self {
            Operation::ListTasks | Operation::CreateTask | Operation::DeleteAllTasksForUser => {
                TASKS_PATH
            }
            Operation::DeleteTaskByIdForUser => TASK_BY_ID_PATH,
            Operation::Login => "/api/v1/users/login",
            Operation::Me => "/api/v1/users/me",
            Operation::Signup => "/api/v1/users/signup",
        }
    }

    /// Fills `{task_id}` with a single percent-encoded path segment. Templates
    /// without placeholders come back unchanged.
    pub fn path(self, task_id: Option<&str>) -> String {
        let template = self.path_template();
        match task_id {
            Some(id) => template.replace("{task_id}", &urlencoding::encode(id)),
            None => template.to_string(),
        }
    }

    pub fn requires_token(self) -> bool {
        !matches!(self, Operation::Login | Operation::Signup)
    }

    /// Status labels this endpoint documents.
    pub fn declared_errors(self) -> &'static [(u16, &'static str)] {
        match self {
            Operation::ListTasks | Operation::DeleteAllTasksForUser => {
                &[(401, "Unauthorized"), (500, "INTERNAL_SERVER_ERROR")]
            }
            Operation::CreateTask => &[
                (400, "Data is not valid"),
                (401, "Unauthorized"),
                (500, "INTERNAL_SERVER_ERROR"),
            ],
            Operation::DeleteTaskByIdForUser => &[
                (401, "Unauthorized"),
                (404, "Task not found for user"),
                (500, "INTERNAL_SERVER_ERROR"),
            ],
            Operation::Login | Operation::Signup => &[(400, "Data is not valid")],
            Operation::Me => &[(401, "Unauthorized"), (500, "Internal server error")],
        }
    }

    /// Label for a failed response. The endpoint's own table wins; otherwise the
    /// shared table, otherwise "Generic Error".
    pub fn error_label(self, status: StatusCode) -> &'static str {
        let code = status.as_u16();
        self.declared_errors()
            .iter()
            .find(|(declared, _)| *declared == code)
            .map(|(_, label)| *label)
            .or_else(|| common_label(code))
            .unwrap_or("Generic Error")
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn common_label(code: u16) -> Option<&'static str> {
    Some(match code {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => return None,
    })
}
