//! Taskboard: task and category management core.
//!
//! This crate provides the ownership rules, filtered and paginated task
//! listing, completion tracking and category assignment behind a task
//! management application. Request routing, authentication and
//! notification delivery live outside the crate; task creation is announced
//! through an event port.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence and events
//! - **Adapters**: `PostgreSQL` and in-memory implementations of the ports
//!
//! # Modules
//!
//! - [`task`]: Task listing, creation, update, completion and deletion
//! - [`category`]: Owner-scoped categories and task counts
//! - [`store`]: Shared in-memory store backing the in-memory adapters
//! - [`config`]: Database configuration and connection pooling

pub mod category;
pub mod config;
pub mod pagination;
pub mod schema;
pub mod store;
pub mod task;
pub mod user;
