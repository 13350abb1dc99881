//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresParameterRepository` - Parameter rows with atomic upsert-by-key
//! - `PostgresMachineRepository` - Machines with branch/charge/category relations
//! - `PostgresVideoRepository` - Coach video rows

mod machine_repository;
mod parameter_repository;
mod video_repository;

pub use machine_repository::PostgresMachineRepository;
pub use parameter_repository::PostgresParameterRepository;
pub use video_repository::PostgresVideoRepository;
