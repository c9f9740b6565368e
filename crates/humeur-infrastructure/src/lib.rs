//! Infrastructure layer for the humeur client: path resolution, session token
//! persistence and configuration loading.

pub mod config_storage;
pub mod paths;
pub mod session_storage;

pub use config_storage::{ClientConfig, ConfigStorage, API_URL_ENV, DEFAULT_API_BASE_URL};
pub use paths::HumeurPaths;
pub use session_storage::SessionStorage;
