//! Application layer - service objects orchestrating domain operations
//! across ports.

mod parameter_store;

pub use parameter_store::{BulkParameter, ParameterStore};
