//! `PostgreSQL` adapters for task and member persistence.

mod directory;
mod models;
mod schema;
mod store;

pub use directory::PostgresMemberDirectory;
pub use store::{PostgresTaskStore, TaskPgPool};
