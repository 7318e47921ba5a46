//! `PostgreSQL` adapter for category persistence.

mod models;
mod repository;

pub use repository::PostgresCategoryRepository;
