//! In-process record store used by tests and single-node demos.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures::future::BoxFuture;
use usersearch_core::context::RequestContext;
use usersearch_core::model::{RecordId, UserRecord};

use crate::db::RecordStore;
use crate::error::DbResult;

#[derive(Debug)]
struct Inner {
    next_id: i64,
    records: BTreeMap<RecordId, UserRecord>,
}

/// ## Summary
/// Record store holding records in a map behind a lock.
///
/// Identifiers are assigned from a monotonically increasing counter starting
/// at 1. Nothing survives a restart.
#[derive(Debug)]
pub struct MemoryRecordStore {
    inner: RwLock<Inner>,
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                records: BTreeMap::new(),
            }),
        }
    }

    /// Reads the lock and recovers from poisoning.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                self.inner.clear_poison();
                poisoned.into_inner()
            }
        }
    }

    /// Writes the lock and recovers from poisoning.
    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                self.inner.clear_poison();
                poisoned.into_inner()
            }
        }
    }
}

impl RecordStore for MemoryRecordStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn create<'a>(
        &'a self,
        ctx: &'a RequestContext,
        record: &'a UserRecord,
    ) -> BoxFuture<'a, DbResult<RecordId>> {
        Box::pin(async move {
            ctx.check()?;
            let mut inner = self.write();
            let id = RecordId::new(inner.next_id);
            inner.next_id += 1;
            inner.records.insert(id, record.clone().with_id(id));
            Ok(id)
        })
    }

    fn get_many<'a>(
        &'a self,
        ctx: &'a RequestContext,
        ids: &'a [RecordId],
    ) -> BoxFuture<'a, DbResult<Vec<Option<UserRecord>>>> {
        Box::pin(async move {
            ctx.check()?;
            let inner = self.read();
            Ok(ids.iter().map(|id| inner.records.get(id).cloned()).collect())
        })
    }

    fn count<'a>(&'a self, ctx: &'a RequestContext) -> BoxFuture<'a, DbResult<u64>> {
        Box::pin(async move {
            ctx.check()?;
            Ok(self.read().records.len() as u64)
        })
    }
}
