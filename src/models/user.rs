use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 512;

/// Profile returned by `me` and `signup`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LoginData {
    pub username: String,
    pub password: String,
}

impl LoginData {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SignupData {
    pub username: String,
    pub email: String,
    pub password: String,
    pub repeat_password: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignupProblem {
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("password must be between 8 and 512 characters")]
    PasswordLength,
    #[error("passwords do not match")]
    PasswordMismatch,
}

impl SignupData {
    /// Mirrors the checks the backend runs before it answers "Data is not valid".
    /// Nothing here is sent over the wire; callers decide whether to bail.
    pub fn problems(&self) -> Vec<SignupProblem> {
        let mut problems = Vec::new();

        let email_ok = self
            .email
            .split_once('@')
            .map(|(local, domain)| !local.is_empty() && !domain.is_empty() && !domain.contains('@'))
            .unwrap_or(false);
        if !email_ok {
            problems.push(SignupProblem::InvalidEmail);
        }

        let len = self.password.chars().count();
        if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
            problems.push(SignupProblem::PasswordLength);
        }

        if self.password != self.repeat_password {
            problems.push(SignupProblem::PasswordMismatch);
        }

        problems
    }
}

/// Login's `data` field. Current backends send the bare token; older builds
/// wrap it in an object.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(untagged)]
pub(crate) enum LoginToken {
    Bare(String),
    Wrapped { token: String },
}

impl From<LoginToken> for String {
    fn from(token: LoginToken) -> Self {
        match token {
            LoginToken::Bare(token) | LoginToken::Wrapped { token } => token,
        }
    }
}
