//! Embedded tantivy implementation of [`TextIndex`].

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::BoxFuture;
use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::fastfield::FastValue;
use tantivy::query::{AllQuery, BooleanQuery, EmptyQuery, Occur, PhraseQuery, Query, TermQuery};
use tantivy::schema::{
    FAST, Field, IndexRecordOption, STORED, STRING, Schema, TEXT, TextFieldIndexing, TextOptions,
    Value,
};
use tantivy::tokenizer::{LowerCaser, TextAnalyzer, TokenStream, WhitespaceTokenizer};
use tantivy::{
    DocAddress, Index, IndexReader, IndexWriter, Order, ReloadPolicy, Searcher, TantivyDocument,
    Term,
};
use tracing::Instrument;
use usersearch_core::context::RequestContext;
use usersearch_core::model::{FilterField, IndexDocument, SearchCursor, SortDirection, SortField};

use crate::error::{IndexError, IndexResult};
use crate::index::filter::{FilterClause, FilterExpression};
use crate::index::map::strip_html_tags;
use crate::index::{IndexHit, IndexQuery, QueryPage, TextIndex, bounded, cursor};

/// Tokenizer keeping each whitespace-separated address as one lowercase token.
const MAIL_TOKENIZER: &str = "usersearch_mail";

const FIELD_VISITS: &str = "visits";
const FIELD_BIRTHDAY: &str = "birthday";
const FIELD_LAST_VISIT: &str = "last_visit";

#[derive(Debug, Clone, Copy)]
struct UserFields {
    id: Field,
    name: Field,
    comment: Field,
    mail: Field,
    user_id: Field,
    field1: Field,
    field2: Field,
    visits: Field,
    birthday: Field,
    last_visit: Field,
    /// Serialized `IndexDocument`, the only stored payload.
    document: Field,
}

impl UserFields {
    fn for_filter(&self, field: FilterField) -> Field {
        match field {
            FilterField::Mail => self.mail,
            FilterField::UserId => self.user_id,
            FilterField::Name => self.name,
            FilterField::Field1 => self.field1,
            FilterField::Field2 => self.field2,
        }
    }
}

fn build_schema() -> (Schema, UserFields) {
    let mut builder = Schema::builder();

    let id = builder.add_text_field("id", STRING | STORED);
    let name = builder.add_text_field("name", TEXT);
    // Tag-stripped text; the raw markup lives in the stored document.
    let comment = builder.add_text_field("comment", TEXT);
    let mail_options = TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer(MAIL_TOKENIZER)
            .set_index_option(IndexRecordOption::WithFreqsAndPositions),
    );
    let mail = builder.add_text_field("mail", mail_options);
    let user_id = builder.add_text_field("user_id", STRING);
    let field1 = builder.add_text_field("field1", STRING);
    let field2 = builder.add_text_field("field2", STRING);
    let visits = builder.add_f64_field(FIELD_VISITS, FAST);
    let birthday = builder.add_i64_field(FIELD_BIRTHDAY, FAST);
    let last_visit = builder.add_i64_field(FIELD_LAST_VISIT, FAST);
    let document = builder.add_text_field("document", STORED);

    let fields = UserFields {
        id,
        name,
        comment,
        mail,
        user_id,
        field1,
        field2,
        visits,
        birthday,
        last_visit,
        document,
    };
    (builder.build(), fields)
}

fn build_mail_tokenizer() -> TextAnalyzer {
    TextAnalyzer::builder(WhitespaceTokenizer::default())
        .filter(LowerCaser)
        .build()
}

struct Shared {
    index: Index,
    fields: UserFields,
    reader: IndexReader,
    writer: Mutex<IndexWriter>,
}

/// ## Summary
/// Tantivy-backed user index, on disk or in RAM.
///
/// Reads are concurrent; writes are serialized on the writer mutex. All
/// tantivy calls run on the blocking thread pool.
#[derive(Clone)]
pub struct TantivyUserIndex {
    shared: Arc<Shared>,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for TantivyUserIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivyUserIndex")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl TantivyUserIndex {
    /// ## Summary
    /// Creates an index that lives only in memory.
    ///
    /// ## Errors
    /// Returns `IndexError::Unavailable` if the writer cannot be created.
    pub fn in_memory(writer_heap_bytes: usize) -> IndexResult<Self> {
        let (schema, fields) = build_schema();
        let index = Index::create_in_ram(schema);
        Self::from_index(index, fields, writer_heap_bytes, None)
    }

    /// ## Summary
    /// Opens the index stored in `path`, creating the directory and an empty
    /// index when missing.
    ///
    /// ## Errors
    /// Returns an error if the directory cannot be created, is locked by
    /// another writer or holds an index with a different schema.
    pub fn open_or_create(path: &Path, writer_heap_bytes: usize) -> IndexResult<Self> {
        std::fs::create_dir_all(path).map_err(|e| {
            IndexError::Unavailable(format!("cannot create {}: {e}", path.display()))
        })?;
        let (schema, fields) = build_schema();
        let directory = MmapDirectory::open(path)
            .map_err(|e| IndexError::Unavailable(format!("cannot open {}: {e}", path.display())))?;
        let index = Index::open_or_create(directory, schema)?;
        Self::from_index(index, fields, writer_heap_bytes, Some(path.to_path_buf()))
    }

    fn from_index(
        index: Index,
        fields: UserFields,
        writer_heap_bytes: usize,
        path: Option<PathBuf>,
    ) -> IndexResult<Self> {
        index
            .tokenizers()
            .register(MAIL_TOKENIZER, build_mail_tokenizer());

        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        let writer = index.writer(writer_heap_bytes)?;

        tracing::debug!(
            path = ?path,
            docs = reader.searcher().num_docs(),
            "Opened tantivy user index"
        );

        Ok(Self {
            shared: Arc::new(Shared {
                index,
                fields,
                reader,
                writer: Mutex::new(writer),
            }),
            path,
        })
    }

    /// Runs `work` on the blocking pool under the request's deadline.
    async fn run_blocking<T, F>(&self, ctx: &RequestContext, work: F) -> IndexResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Shared, &RequestContext) -> IndexResult<T> + Send + 'static,
    {
        let shared = Arc::clone(&self.shared);
        let task_ctx = ctx.clone();
        bounded(ctx, async move {
            tokio::task::spawn_blocking(move || work(&shared, &task_ctx)).await?
        })
        .await
    }
}

impl Shared {
    fn lock_writer(&self) -> IndexResult<MutexGuard<'_, IndexWriter>> {
        self.writer
            .lock()
            .map_err(|_poisoned| IndexError::Unavailable("index writer lock poisoned".to_string()))
    }

    fn to_tantivy_doc(&self, document: &IndexDocument) -> IndexResult<TantivyDocument> {
        if document.id.is_empty() {
            return Err(IndexError::Rejected("document id is empty".to_string()));
        }
        if !document.visits.is_finite() {
            return Err(IndexError::Rejected(format!(
                "document {}: visits must be finite",
                document.id
            )));
        }
        let stored = serde_json::to_string(document)
            .map_err(|e| IndexError::Rejected(format!("document {}: {e}", document.id)))?;

        let f = &self.fields;
        let mut doc = TantivyDocument::new();
        doc.add_text(f.id, &document.id);
        doc.add_text(f.name, &document.name);
        doc.add_text(f.comment, strip_html_tags(&document.comment));
        doc.add_text(f.mail, &document.mail);
        doc.add_text(f.user_id, &document.user_id);
        doc.add_text(f.field1, &document.field1);
        doc.add_text(f.field2, &document.field2);
        doc.add_f64(f.visits, document.visits);
        doc.add_i64(f.birthday, document.birthday.timestamp_micros());
        doc.add_i64(f.last_visit, document.last_visit.timestamp_micros());
        doc.add_text(f.document, stored);
        Ok(doc)
    }

    /// ## Summary
    /// Stages delete+add for every document, then commits once.
    ///
    /// ## Errors
    /// Any failure rolls the writer back to the last commit, so nothing from
    /// this batch becomes visible.
    fn upsert_batch(&self, ctx: &RequestContext, documents: &[IndexDocument]) -> IndexResult<()> {
        // Conversion errors surface before anything is staged.
        let converted = documents
            .iter()
            .map(|document| {
                self.to_tantivy_doc(document)
                    .map(|doc| (document.id.as_str(), doc))
            })
            .collect::<IndexResult<Vec<_>>>()?;

        let mut writer = self.lock_writer()?;
        ctx.check()?;

        if let Err(e) = self.stage_and_commit(&mut writer, ctx, converted) {
            if let Err(rollback) = writer.rollback() {
                tracing::error!(error = %rollback, "Failed to roll back index writer");
            }
            return Err(e);
        }
        drop(writer);

        self.reader.reload()?;
        Ok(())
    }

    fn stage_and_commit(
        &self,
        writer: &mut IndexWriter,
        ctx: &RequestContext,
        converted: Vec<(&str, TantivyDocument)>,
    ) -> IndexResult<()> {
        for (id, doc) in converted {
            writer.delete_term(Term::from_field_text(self.fields.id, id));
            writer.add_document(doc)?;
        }
        ctx.check()?;
        writer.commit()?;
        Ok(())
    }

    fn analyze(&self, field: Field, value: &str) -> IndexResult<Vec<Term>> {
        let mut analyzer = self.index.tokenizer_for_field(field)?;
        let mut stream = analyzer.token_stream(value);
        let mut terms = Vec::new();
        while stream.advance() {
            terms.push(Term::from_field_text(field, &stream.token().text));
        }
        Ok(terms)
    }

    /// Exact-match predicate: a single term, or a phrase for tokenized text.
    fn clause_query(&self, clause: &FilterClause) -> IndexResult<Box<dyn Query>> {
        let field = self.fields.for_filter(clause.field);
        let mut terms = self.analyze(field, &clause.value)?;
        let query: Box<dyn Query> = match terms.len() {
            0 => Box::new(EmptyQuery),
            1 => match terms.pop() {
                Some(term) => Box::new(TermQuery::new(term, IndexRecordOption::Basic)),
                None => Box::new(EmptyQuery),
            },
            _ => Box::new(PhraseQuery::new(terms)),
        };
        Ok(query)
    }

    fn build_query(&self, filter: &FilterExpression) -> IndexResult<Box<dyn Query>> {
        if filter.is_match_all() {
            return Ok(Box::new(AllQuery));
        }
        let clauses = filter
            .clauses()
            .iter()
            .map(|clause| Ok((Occur::Must, self.clause_query(clause)?)))
            .collect::<IndexResult<Vec<_>>>()?;
        Ok(Box::new(BooleanQuery::new(clauses)))
    }

    fn search(&self, ctx: &RequestContext, request: &IndexQuery) -> IndexResult<QueryPage> {
        if request.page_size == 0 {
            return Err(IndexError::QueryInvalid(
                "page size must be positive".to_string(),
            ));
        }
        let fingerprint = request.fingerprint();
        let offset = match &request.cursor {
            Some(token) => cursor::decode(token, &fingerprint)?.unwrap_or(0),
            None => 0,
        };

        let query = self.build_query(&request.filter)?;
        ctx.check()?;

        let searcher = self.reader.searcher();
        let total = usize::try_from(searcher.num_docs()).unwrap_or(usize::MAX);
        if offset >= total {
            return Ok(QueryPage {
                hits: Vec::new(),
                next_cursor: SearchCursor::exhausted(),
            });
        }
        // Collector buffers are sized by offset + limit, so both stay within the index.
        // One extra hit tells whether another page exists.
        let limit = request.page_size.min(total - offset).saturating_add(1);
        let order = match request.sort_direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };
        let mut addresses = match request.sort_field {
            SortField::Birthday => {
                collect_sorted::<i64>(&searcher, &*query, FIELD_BIRTHDAY, order, limit, offset)?
            }
            SortField::LastVisit => {
                collect_sorted::<i64>(&searcher, &*query, FIELD_LAST_VISIT, order, limit, offset)?
            }
            SortField::Visits => {
                collect_sorted::<f64>(&searcher, &*query, FIELD_VISITS, order, limit, offset)?
            }
        };

        let has_more = addresses.len() > request.page_size;
        addresses.truncate(request.page_size);

        let hits = addresses
            .into_iter()
            .map(|address| self.load_hit(&searcher, address))
            .collect::<IndexResult<Vec<_>>>()?;

        let next_cursor = if has_more {
            cursor::encode(offset.saturating_add(request.page_size), &fingerprint)
        } else {
            SearchCursor::exhausted()
        };

        Ok(QueryPage { hits, next_cursor })
    }

    fn load_hit(&self, searcher: &Searcher, address: DocAddress) -> IndexResult<IndexHit> {
        let doc: TantivyDocument = searcher.doc(address)?;
        let stored = doc
            .get_first(self.fields.document)
            .and_then(|value| value.as_str())
            .ok_or_else(|| IndexError::Unavailable("stored document missing".to_string()))?;
        let document: IndexDocument = serde_json::from_str(stored)
            .map_err(|e| IndexError::Unavailable(format!("stored document unreadable: {e}")))?;
        Ok(IndexHit {
            id: document.id.clone(),
            document,
        })
    }
}

fn collect_sorted<T: FastValue>(
    searcher: &Searcher,
    query: &dyn Query,
    fast_field: &str,
    order: Order,
    limit: usize,
    offset: usize,
) -> IndexResult<Vec<DocAddress>> {
    let collector = TopDocs::with_limit(limit)
        .and_offset(offset)
        .order_by_fast_field::<T>(fast_field, order);
    let top = searcher.search(query, &collector)?;
    Ok(top.into_iter().map(|(_value, address)| address).collect())
}

impl TextIndex for TantivyUserIndex {
    fn backend_name(&self) -> &'static str {
        "tantivy"
    }

    fn put<'a>(
        &'a self,
        ctx: &'a RequestContext,
        id: &'a str,
        document: &'a IndexDocument,
    ) -> BoxFuture<'a, IndexResult<()>> {
        let mut document = document.clone();
        document.id = id.to_string();
        let span = tracing::debug_span!("index_put", request_id = %ctx.request_id(), id);
        Box::pin(
            async move {
                self.run_blocking(ctx, move |shared, ctx| {
                    shared.upsert_batch(ctx, std::slice::from_ref(&document))
                })
                .await
            }
            .instrument(span),
        )
    }

    fn put_many<'a>(
        &'a self,
        ctx: &'a RequestContext,
        documents: &'a [IndexDocument],
    ) -> BoxFuture<'a, IndexResult<()>> {
        let documents = documents.to_vec();
        let span = tracing::debug_span!(
            "index_put_many",
            request_id = %ctx.request_id(),
            batch = documents.len()
        );
        Box::pin(
            async move {
                if documents.is_empty() {
                    return Ok(());
                }
                self.run_blocking(ctx, move |shared, ctx| shared.upsert_batch(ctx, &documents))
                    .await
            }
            .instrument(span),
        )
    }

    fn query<'a>(
        &'a self,
        ctx: &'a RequestContext,
        query: &'a IndexQuery,
    ) -> BoxFuture<'a, IndexResult<QueryPage>> {
        let request = query.clone();
        let span = tracing::debug_span!(
            "index_query",
            request_id = %ctx.request_id(),
            filter = %query.filter,
            page_size = query.page_size
        );
        Box::pin(
            async move {
                let page = self
                    .run_blocking(ctx, move |shared, ctx| shared.search(ctx, &request))
                    .await?;
                tracing::debug!(
                    hits = page.hits.len(),
                    exhausted = page.next_cursor.is_exhausted(),
                    "Index query completed"
                );
                Ok(page)
            }
            .instrument(span),
        )
    }

    fn count<'a>(&'a self, ctx: &'a RequestContext) -> BoxFuture<'a, IndexResult<u64>> {
        Box::pin(async move {
            self.run_blocking(ctx, |shared, _ctx| Ok(shared.reader.searcher().num_docs()))
                .await
        })
    }
}
