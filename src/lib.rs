//! Fitadmin - Gym Management Administrative Backend
//!
//! This crate exposes the REST API used by the admin panel of a gym
//! management platform: equipment ("machines") with their branch, charge
//! and category associations, coach training videos, image uploads, and a
//! typed key/value parameter store backing the public site configuration.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
