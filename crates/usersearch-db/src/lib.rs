//! Record store adapters: the `RecordStore` seam, a PostgreSQL implementation
//! on diesel-async and an in-process memory implementation.

pub mod db;
pub mod error;
pub mod model;
