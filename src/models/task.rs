use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task as stored by the backend under the `rzd` domain.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub type_: String,
    pub data: serde_json::Value,
    pub user_id: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub type_: String,
    #[serde(default)]
    pub data: HashMap<String, String>,
}

impl NewTask {
    pub fn new(type_: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            data: HashMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}
