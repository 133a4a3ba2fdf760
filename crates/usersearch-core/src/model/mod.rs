//! Domain models shared by the store, index and service layers.

pub mod cursor;
pub mod document;
pub mod query;
pub mod record;

pub use cursor::SearchCursor;
pub use document::IndexDocument;
pub use query::{FilterField, ResponseMode, SortDirection, SortField};
pub use record::{RecordId, UserRecord};
