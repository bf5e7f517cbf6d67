mod session;
mod task;
mod user;
use serde::{Deserialize, Serialize};

pub use session::*;
pub use task::*;
pub use user::*;

/// The `{"status": ..., "data": ...}` wrapper every success body arrives in.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Envelope<T> {
    pub status: String,
    pub data: T,
}

/// Error body the backend attaches to non-2xx responses.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub status: String,
    pub error: String,
}
