//! HTTP surface of the user search service.

pub mod app;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod service_handler;
