//! Parameter cache adapters.
//!
//! Implementations of the ParameterCache port for different backends,
//! plus the repository wrapper that ties invalidation to every write.
//!
//! ## Available Adapters
//!
//! - `InMemoryParameterCache` - process-local, for testing and single-server
//! - `RedisParameterCache` - Redis-backed, shared across instances
//! - `InvalidatingParameterRepository` - repository decorator clearing
//!   affected cache entries after each successful mutation
//!
//! ## Usage
//!
//! ```ignore
//! use fitadmin::adapters::cache::{
//!     InMemoryParameterCache, InvalidatingParameterRepository,
//! };
//!
//! let cache = Arc::new(InMemoryParameterCache::new());
//! let repository = InvalidatingParameterRepository::new(postgres_repo, cache.clone());
//! ```

mod in_memory;
mod invalidating;
mod redis;

pub use in_memory::InMemoryParameterCache;
pub use invalidating::InvalidatingParameterRepository;
pub use redis::RedisParameterCache;
