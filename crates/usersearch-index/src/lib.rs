//! Text index adapter: the `TextIndex` seam, record projection, filter
//! expressions, cursor codec and an embedded tantivy implementation.

pub mod error;
pub mod index;
