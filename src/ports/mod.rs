//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ParameterRepository` - Durable storage of configuration parameters
//! - `ParameterCache` - TTL'd cache of decoded parameter values
//! - `MachineRepository` - Machines with branch/charge/category relations
//! - `VideoRepository` - Coach videos
//! - `FileStorage` - Uploaded file persistence

mod file_storage;
mod machine_repository;
mod parameter_cache;
mod parameter_repository;
mod video_repository;

pub use file_storage::{extension_of, FileStorage, StorageArea, StorageError, StoredFile};
pub use machine_repository::MachineRepository;
pub use parameter_cache::{CacheEntry, CacheError, CacheKey, ParameterCache};
pub use parameter_repository::ParameterRepository;
pub use video_repository::VideoRepository;
