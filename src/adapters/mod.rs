//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `cache` - Parameter cache backends and the invalidating repository wrapper
//! - `http` - Axum handlers, routes and wire-format DTOs
//! - `postgres` - Repository implementations backed by PostgreSQL
//! - `storage` - Local filesystem storage for uploaded media

pub mod cache;
pub mod http;
pub mod postgres;
pub mod storage;

pub use cache::{InMemoryParameterCache, InvalidatingParameterRepository, RedisParameterCache};
pub use postgres::{
    PostgresMachineRepository, PostgresParameterRepository, PostgresVideoRepository,
};
pub use storage::LocalFileStorage;
