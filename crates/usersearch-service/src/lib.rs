//! Dual-write coordinator and query/pagination service over the record store
//! and the text index.

pub mod error;
pub mod search;
