//! In-memory adapter for category persistence.

mod category;

pub use category::InMemoryCategoryRepository;
