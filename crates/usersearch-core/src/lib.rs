//! Shared models, request context and settings for the usersearch workspace.

pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod model;
