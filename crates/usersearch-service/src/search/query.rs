//! Read path: filtered, sorted, cursor-paginated search.

use serde::Serialize;
use usersearch_core::context::RequestContext;
use usersearch_core::model::{
    FilterField, IndexDocument, RecordId, ResponseMode, SearchCursor, UserRecord,
};
use usersearch_index::error::IndexError;
use usersearch_index::index::{FilterExpression, IndexHit, IndexQuery};

use super::SearchService;
use crate::error::{ServiceError, ServiceResult};

/// ## Summary
/// Raw filter input of a search request.
///
/// Values are exact-match predicates; blank values are ignored. An optional
/// textual expression adds further predicates.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    values: Vec<(FilterField, String)>,
    expression: Option<String>,
}

impl SearchFilters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.values.push((field, value.into()));
        self
    }

    #[must_use]
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }
}

/// Page content, depending on the configured response mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchUsers {
    Records(Vec<UserRecord>),
    Documents(Vec<IndexDocument>),
}

impl SearchUsers {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Records(records) => records.len(),
            Self::Documents(documents) => documents.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn mode(&self) -> ResponseMode {
        match self {
            Self::Records(_) => ResponseMode::Records,
            Self::Documents(_) => ResponseMode::Index,
        }
    }
}

/// ## Summary
/// One page of search results and the cursor for the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub users: SearchUsers,
    /// Empty when the result set is exhausted.
    pub cursor: SearchCursor,
    /// Hits whose record could not be resolved from the store.
    pub missing: usize,
}

impl SearchService {
    /// ## Summary
    /// Builds the conjunctive filter for a request.
    ///
    /// Blank values are skipped. Values for fields not enabled in
    /// `search.filter_fields` are ignored, matching unknown query parameters.
    ///
    /// ## Errors
    /// Returns `IndexError::QueryInvalid` if the textual expression does not
    /// parse or names a field that is not enabled.
    pub fn build_filter(&self, filters: &SearchFilters) -> ServiceResult<FilterExpression> {
        let mut expression = FilterExpression::match_all();

        for (field, value) in &filters.values {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            if !self.settings.filter_enabled(*field) {
                tracing::debug!(field = %field, "Ignoring disabled filter field");
                continue;
            }
            expression.push(*field, value);
        }

        if let Some(text) = &filters.expression {
            let parsed = FilterExpression::parse(text)?;
            if let Some(clause) = parsed
                .clauses()
                .iter()
                .find(|clause| !self.settings.filter_enabled(clause.field))
            {
                return Err(IndexError::QueryInvalid(format!(
                    "filtering on {} is not enabled",
                    clause.field
                ))
                .into());
            }
            expression.extend(parsed);
        }

        Ok(expression)
    }

    /// ## Summary
    /// Runs a filtered search and returns one page in index order.
    ///
    /// No predicates means every document matches. Page size and sort come
    /// from settings. In records mode the hits are resolved from the store;
    /// hits the store cannot resolve are dropped and counted in `missing`.
    ///
    /// ## Errors
    /// Returns `IndexError::QueryInvalid` (wrapped) for bad filters or
    /// cursors, or the index/store error that stopped the request.
    #[tracing::instrument(skip_all, fields(request_id = %ctx.request_id()))]
    pub async fn search(
        &self,
        ctx: &RequestContext,
        filters: &SearchFilters,
        cursor: Option<SearchCursor>,
    ) -> ServiceResult<SearchPage> {
        let filter = self.build_filter(filters)?;
        tracing::debug!(filter = %filter, "Searching");

        let query = IndexQuery::new(filter, self.settings.page_size)
            .sorted_by(self.settings.sort_field, self.settings.sort_direction)
            .after(cursor);
        let page = self.index.query(ctx, &query).await?;

        let (users, missing) = match self.settings.response_mode {
            ResponseMode::Index => (
                SearchUsers::Documents(page.hits.into_iter().map(|hit| hit.document).collect()),
                0,
            ),
            ResponseMode::Records => {
                let (records, missing) = self.resolve_records(ctx, &page.hits).await?;
                (SearchUsers::Records(records), missing)
            }
        };

        tracing::debug!(
            users = users.len(),
            missing,
            exhausted = page.next_cursor.is_exhausted(),
            "Search completed"
        );
        Ok(SearchPage {
            users,
            cursor: page.next_cursor,
            missing,
        })
    }

    /// Fetches the records behind `hits`, keeping hit order.
    async fn resolve_records(
        &self,
        ctx: &RequestContext,
        hits: &[IndexHit],
    ) -> ServiceResult<(Vec<UserRecord>, usize)> {
        let mut missing = 0;
        let mut ids = Vec::with_capacity(hits.len());
        for hit in hits {
            match hit.id.parse::<RecordId>() {
                Ok(id) => ids.push(id),
                Err(e) => {
                    tracing::warn!(document_id = %hit.id, error = %e, "Index hit has no record id");
                    missing += 1;
                }
            }
        }

        let slots = self.store.get_many(ctx, &ids).await?;
        let mut records = Vec::with_capacity(slots.len());
        for (id, slot) in ids.iter().zip(slots) {
            match slot {
                Some(record) => records.push(record),
                None => {
                    tracing::warn!(record_id = %id, "Index hit without a stored record");
                    missing += 1;
                }
            }
        }
        Ok((records, missing))
    }

    /// ## Summary
    /// Looks up a single record by id.
    ///
    /// ## Errors
    /// Returns `ServiceError::NotFound` if no record has this id, or the store
    /// error.
    #[tracing::instrument(skip(self, ctx), fields(request_id = %ctx.request_id()))]
    pub async fn get_record(&self, ctx: &RequestContext, id: RecordId) -> ServiceResult<UserRecord> {
        self.store
            .get(ctx, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("record {id}")))
    }
}
