mod client;
mod models;
mod operations;
mod session;

pub use client::{ApiClient, ApiError, Operation, AUTH_HEADER};
pub use models::{
    ErrorBody, LoginData, NewTask, SessionState, SignupData, SignupProblem, Task, User,
};
pub use operations::{Configurator, SessionStorage, SessionStorageError};
pub use session::{Session, SessionError};

pub mod services {
    pub mod configurators {
        pub use crate::operations::configurator::env::{EnvConfigurator as Env, DEFAULT_BASE_URL};
        pub use crate::operations::configurator::StaticConfigurator as Static;
    }

    pub mod storage {
        pub mod session {
            pub use crate::operations::session_storage::file::FileSessionStorage as File;
            pub use crate::operations::session_storage::in_memory::InMemorySessionStorage as InMemory;
        }
    }
}
