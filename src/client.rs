use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::models::{Envelope, LoginData, LoginToken, NewTask, SignupData, Task, User};
use crate::operations::Configurator;

mod error;
mod operation;

pub use error::ApiError;
pub use operation::{Operation, AUTH_HEADER};

/// Typed binding of the backend's REST surface. Every method issues exactly
/// one request and unwraps the `data` field of the response envelope.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: Url) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url)
    }

    pub fn with_http_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub fn from_config<C: Configurator + ?Sized>(config: &C) -> Self {
        Self::new(config.base_url().clone())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[instrument(level = "info", skip(self, token))]
    pub async fn list_tasks(&self, token: &str) -> Result<Vec<Task>, ApiError> {
        let op = Operation::ListTasks;
        let req = self.request(op, None, Some(token))?;
        self.dispatch(op, req).await
    }

    #[instrument(level = "info", skip(self, token), fields(task_type = %task.type_))]
    pub async fn create_task(&self, token: &str, task: &NewTask) -> Result<Task, ApiError> {
        let op = Operation::CreateTask;
        let req = self.request(op, None, Some(token))?.json(task);
        self.dispatch(op, req).await
    }

    #[instrument(level = "info", skip(self, token))]
    pub async fn delete_all_tasks_for_user(&self, token: &str) -> Result<String, ApiError> {
        let op = Operation::DeleteAllTasksForUser;
        let req = self.request(op, None, Some(token))?;
        self.dispatch(op, req).await
    }

    #[instrument(level = "info", skip(self, token))]
    pub async fn delete_task_by_id_for_user(
        &self,
        token: &str,
        task_id: &str,
    ) -> Result<String, ApiError> {
        let op = Operation::DeleteTaskByIdForUser;
        let req = self.request(op, Some(task_id), Some(token))?;
        self.dispatch(op, req).await
    }

    /// Exchanges credentials for a session token.
    #[instrument(level = "info", skip(self, data), fields(username = %data.username))]
    pub async fn login(&self, data: &LoginData) -> Result<String, ApiError> {
        let op = Operation::Login;
        let req = self.request(op, None, None)?.json(data);
        let token: LoginToken = self.dispatch(op, req).await?;
        Ok(token.into())
    }

    #[instrument(level = "info", skip(self, token))]
    pub async fn me(&self, token: &str) -> Result<User, ApiError> {
        let op = Operation::Me;
        let req = self.request(op, None, Some(token))?;
        self.dispatch(op, req).await
    }

    #[instrument(level = "info", skip(self, data), fields(username = %data.username))]
    pub async fn signup(&self, data: &SignupData) -> Result<User, ApiError> {
        let op = Operation::Signup;
        let req = self.request(op, None, None)?.json(data);
        self.dispatch(op, req).await
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        // Concatenate rather than `Url::join` so a base with a path prefix
        // (e.g. `https://host/backend/`) keeps it.
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}{}", base, path))?)
    }

    fn request(
        &self,
        op: Operation,
        task_id: Option<&str>,
        token: Option<&str>,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.url(&op.path(task_id))?;
        let mut req = self
            .http
            .request(op.method(), url)
            .header(ACCEPT, "application/json");

        if op.requires_token() {
            let token = token.ok_or(ApiError::MissingToken(op))?;
            let mut value = HeaderValue::from_str(token).map_err(|_| ApiError::InvalidToken)?;
            value.set_sensitive(true);
            req = req.header(AUTH_HEADER, value);
        }

        Ok(req)
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        op: Operation,
        req: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = req.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let label = op.error_label(status);
            tracing::warn!(operation = %op, status = status.as_u16(), label, "request rejected");
            return Err(ApiError::Status {
                operation: op,
                status,
                label,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let envelope: Envelope<T> = serde_json::from_slice(&body).map_err(|source| {
            tracing::error!(operation = %op, error = %source, "failed to decode response");
            ApiError::Decode {
                operation: op,
                source,
            }
        })?;
        tracing::debug!(operation = %op, status = %envelope.status, "request succeeded");

        Ok(envelope.data)
    }
}
