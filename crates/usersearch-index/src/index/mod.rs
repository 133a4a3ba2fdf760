use std::future::Future;

use futures::future::BoxFuture;
use usersearch_core::context::RequestContext;
use usersearch_core::error::CoreError;
use usersearch_core::model::{IndexDocument, SearchCursor, SortDirection, SortField};

use crate::error::{IndexError, IndexResult};

pub mod cursor;
pub mod filter;
pub mod map;
pub mod tantivy_index;

pub use filter::{FilterClause, FilterExpression};
pub use map::build_index_document;
pub use tantivy_index::TantivyUserIndex;

/// ## Summary
/// A filtered, sorted page request against the index.
#[derive(Debug, Clone)]
pub struct IndexQuery {
    pub filter: FilterExpression,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub page_size: usize,
    /// Resume point from a previous page; `None` starts from the beginning.
    pub cursor: Option<SearchCursor>,
}

impl IndexQuery {
    #[must_use]
    pub fn new(filter: FilterExpression, page_size: usize) -> Self {
        Self {
            filter,
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
            page_size,
            cursor: None,
        }
    }

    #[must_use]
    pub fn sorted_by(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort_field = field;
        self.sort_direction = direction;
        self
    }

    #[must_use]
    pub fn after(mut self, cursor: Option<SearchCursor>) -> Self {
        self.cursor = cursor;
        self
    }

    /// Fingerprint binding issued cursors to this filter and sort.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        cursor::fingerprint(&self.filter, self.sort_field, self.sort_direction)
    }
}

/// One matching document.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    pub id: String,
    pub document: IndexDocument,
}

/// ## Summary
/// Hits in sort order plus the cursor for the following page.
///
/// `next_cursor` is the exhaustion sentinel when no further hits exist.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPage {
    pub hits: Vec<IndexHit>,
    pub next_cursor: SearchCursor,
}

/// ## Summary
/// Upsert and query access to the derived text index.
///
/// Documents are keyed by the stringified record identifier. Implementations
/// must honour the request context before touching the backend.
pub trait TextIndex: Send + Sync {
    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;

    /// Upserts `document` under `id`, replacing any document with the same id.
    /// The document is searchable once the call returns.
    fn put<'a>(
        &'a self,
        ctx: &'a RequestContext,
        id: &'a str,
        document: &'a IndexDocument,
    ) -> BoxFuture<'a, IndexResult<()>>;

    /// Upserts every document under its own `id` and commits once. Either the
    /// whole batch becomes searchable or none of it does.
    fn put_many<'a>(
        &'a self,
        ctx: &'a RequestContext,
        documents: &'a [IndexDocument],
    ) -> BoxFuture<'a, IndexResult<()>>;

    /// Runs `query`, returning at most `page_size` hits ordered by the sort
    /// field and direction.
    fn query<'a>(
        &'a self,
        ctx: &'a RequestContext,
        query: &'a IndexQuery,
    ) -> BoxFuture<'a, IndexResult<QueryPage>>;

    /// Number of live documents.
    fn count<'a>(&'a self, ctx: &'a RequestContext) -> BoxFuture<'a, IndexResult<u64>>;
}

/// ## Summary
/// Runs an index operation under the request's cancellation flag and deadline.
///
/// ## Errors
/// Returns `CoreError::Cancelled`/`DeadlineExceeded` wrapped in `IndexError`,
/// or the operation's own error.
pub(crate) async fn bounded<T, F>(ctx: &RequestContext, operation: F) -> IndexResult<T>
where
    F: Future<Output = IndexResult<T>>,
{
    ctx.check()?;
    match ctx.remaining() {
        Some(left) => tokio::time::timeout(left, operation)
            .await
            .map_err(|_elapsed| IndexError::CoreError(CoreError::DeadlineExceeded))?,
        None => operation.await,
    }
}
