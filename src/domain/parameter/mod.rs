//! Parameter domain - typed site-configuration key/value entries.
//!
//! A `Parameter` is a named, typed configuration value with an optional
//! group tag. The stored form is always text; the [`codec`] module
//! converts between the stored string and the logical value implied by
//! the parameter's [`ParameterType`].

pub mod codec;
mod model;
mod value;

pub use model::{NewParameter, Parameter, ParameterPatch, ParameterType};
pub use value::ParameterValue;
