mod pg_pool;
pub mod repositories;
pub mod vector_store;

pub use pg_pool::{create_pool, run_migrations};
