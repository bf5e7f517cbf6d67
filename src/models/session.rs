use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Identity of the logged-in user. All fields are empty when logged out.
#[derive(Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub username: String,
    pub email: String,
    pub token: String,
}

impl SessionState {
    pub fn is_logged_in(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn token(&self) -> Option<&str> {
        Some(self.token.as_str()).filter(|token| !token.is_empty())
    }
}

impl Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("token", &self.token().map(|_| "<redacted>"))
            .finish()
    }
}
