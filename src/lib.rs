pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod session;
pub mod store;

pub use models::{Todo, TodoData, TodoError, DEFAULT_CATEGORY};
pub use store::{StorePolicy, TodoStore};
