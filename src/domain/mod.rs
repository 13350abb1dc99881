//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (timestamps, errors)
//! - `parameter` - Typed site-configuration parameters and their codec
//! - `machine` - Gym equipment with branch/charge/category associations
//! - `video` - Coach training videos

pub mod foundation;
pub mod machine;
pub mod parameter;
pub mod video;
