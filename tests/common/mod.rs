#![allow(dead_code)]

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use url::Url;
use uuid::Uuid;

/// A request as the fake backend saw it.
#[derive(Clone, Debug, PartialEq)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub token: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct Inner {
    requests: Vec<Recorded>,
    users: HashMap<String, (String, Value)>,
    tokens: HashMap<String, String>,
    tasks: Vec<Value>,
    next_task: usize,
    failures: HashMap<(Method, String), StatusCode>,
}

/// In-process stand-in for the metools backend, following its routes, its
/// `{"status", "data"}` envelope and its error bodies.
#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Arc<Mutex<Inner>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user directly; returns the profile the backend will report.
    pub fn with_user(self, username: &str, email: &str, password: &str) -> Self {
        let profile = json!({
            "id": Uuid::new_v4(),
            "username": username,
            "email": email,
        });
        self.inner
            .lock()
            .unwrap()
            .users
            .insert(username.to_string(), (password.to_string(), profile));
        self
    }

    /// Issues a token for `username` without going through login.
    pub fn token_for(&self, username: &str) -> String {
        let token = format!("token-{}", username);
        self.inner
            .lock()
            .unwrap()
            .tokens
            .insert(token.clone(), username.to_string());
        token
    }

    /// Answers every request to `method path` with `status` from now on.
    pub fn fail(&self, method: Method, path: &str, status: StatusCode) {
        self.inner
            .lock()
            .unwrap()
            .failures
            .insert((method, path.to_string()), status);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn task_count(&self) -> usize {
        self.inner.lock().unwrap().tasks.len()
    }

    pub async fn spawn(&self) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(handle).with_state(self.clone());

        tokio::spawn(async move {
            axum::Server::from_tcp(listener)
                .unwrap()
                .serve(app.into_make_service())
                .await
                .unwrap();
        });

        Url::parse(&format!("http://{}/", addr)).unwrap()
    }
}

fn error(status: StatusCode, kind: &str, message: &str) -> Response {
    (status, Json(json!({"status": kind, "error": message}))).into_response()
}

fn success(data: Value) -> Response {
    (StatusCode::OK, Json(json!({"status": "success", "data": data}))).into_response()
}

fn unauthorized() -> Response {
    error(StatusCode::UNAUTHORIZED, "unauthorized", "Unauthorized")
}

fn invalid_data() -> Response {
    error(StatusCode::BAD_REQUEST, "invalid_data", "Invalid input data")
}

async fn handle(
    State(backend): State<FakeBackend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    let token = header("x-api-auth-token");
    let body: Option<Value> = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(&body).ok()
    };
    let recorded = Recorded {
        method,
        path: uri.path().to_string(),
        token,
        content_type: header("content-type"),
        body,
    };
    backend.respond(recorded)
}

impl FakeBackend {
    fn respond(&self, recorded: Recorded) -> Response {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(recorded.clone());
        route(&mut inner, recorded)
    }
}

fn route(inner: &mut Inner, request: Recorded) -> Response {
    let Recorded {
        method,
        path,
        token,
        body,
        ..
    } = request;

    if let Some(status) = inner.failures.get(&(method.clone(), path.clone())) {
        return error(*status, "forced", "forced failure");
    }

    let user = token
        .as_ref()
        .and_then(|token| inner.tokens.get(token))
        .and_then(|username| inner.users.get(username))
        .map(|(_, profile)| profile.clone());
    let field = |name: &str| {
        body.as_ref()
            .and_then(|body| body.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    match (method, path.as_str()) {
        (Method::POST, "/api/v1/users/signup") => {
            let (Some(username), Some(email), Some(password), Some(repeat)) = (
                field("username"),
                field("email"),
                field("password"),
                field("repeat_password"),
            ) else {
                return invalid_data();
            };
            if password.len() < 8 || password != repeat || !email.contains('@') {
                return invalid_data();
            }
            let profile = json!({"id": Uuid::new_v4(), "username": username, "email": email});
            inner
                .users
                .insert(username, (password, profile.clone()));
            success(profile)
        }
        (Method::POST, "/api/v1/users/login") => {
            let (Some(username), Some(password)) = (field("username"), field("password")) else {
                return invalid_data();
            };
            if password.len() < 8 {
                return invalid_data();
            }
            match inner.users.get(&username) {
                Some((expected, _)) if *expected == password => {
                    let token = format!("token-{}", username);
                    inner.tokens.insert(token.clone(), username);
                    success(json!(token))
                }
                _ => error(
                    StatusCode::UNAUTHORIZED,
                    "invalid_credentials",
                    "Invalid credentials",
                ),
            }
        }
        (Method::GET, "/api/v1/users/me") => match user {
            Some(profile) => success(profile),
            None => unauthorized(),
        },
        (method, "/api/v1/rzd/tasks") => {
            let Some(profile) = user else {
                return unauthorized();
            };
            let user_id = profile["id"].as_str().unwrap_or_default().to_string();
            match method {
                Method::GET => {
                    let tasks: Vec<Value> = inner
                        .tasks
                        .iter()
                        .filter(|task| task["user_id"] == user_id.as_str())
                        .cloned()
                        .collect();
                    success(json!(tasks))
                }
                Method::POST => {
                    let Some(type_) = field("type_") else {
                        return invalid_data();
                    };
                    inner.next_task += 1;
                    let task = json!({
                        "id": format!("rzd_tasks:{}", inner.next_task),
                        "created_at": Utc::now(),
                        "type_": type_,
                        "data": body.as_ref().and_then(|b| b.get("data")).cloned().unwrap_or(json!({})),
                        "user_id": user_id,
                    });
                    inner.tasks.push(task.clone());
                    success(task)
                }
                Method::DELETE => {
                    let before = inner.tasks.len();
                    inner.tasks.retain(|task| task["user_id"] != user_id.as_str());
                    success(json!((before - inner.tasks.len()).to_string()))
                }
                _ => error(StatusCode::METHOD_NOT_ALLOWED, "error", "Method not allowed"),
            }
        }
        (Method::DELETE, path) if path.starts_with("/api/v1/rzd/tasks/") => {
            let Some(profile) = user else {
                return unauthorized();
            };
            let user_id = profile["id"].as_str().unwrap_or_default().to_string();
            let raw_id = &path["/api/v1/rzd/tasks/".len()..];
            let task_id = urlencoding::decode(raw_id)
                .map(|id| id.into_owned())
                .unwrap_or_default();
            let before = inner.tasks.len();
            inner
                .tasks
                .retain(|task| !(task["id"] == task_id.as_str() && task["user_id"] == user_id.as_str()));
            if inner.tasks.len() == before {
                return error(StatusCode::NOT_FOUND, "not_found", "Task not found");
            }
            success(json!("deleted"))
        }
        _ => error(StatusCode::NOT_FOUND, "not_found", "Not found"),
    }
}
