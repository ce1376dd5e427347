//! Ordered, most-recent-first record history kept under a single key.
//!
//! Shared by the transaction and payment collection stores. Records are
//! upserted by id: a record whose id is already present replaces the stored
//! one at the same index, a new id is inserted at the head.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{load_or_default, remove_or_log, save_or_log};
use crate::kv::KeyValueStore;

/// A stored record with a stable identifier.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    fn record_id(&self) -> &str;
}

/// Where an upsert put the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// New id, inserted at index 0.
    Inserted,
    /// Existing id, replaced at this index.
    Replaced(usize),
}

pub(crate) fn upsert<T: Record>(records: &mut Vec<T>, record: T) -> Placement {
    match records
        .iter()
        .position(|existing| existing.record_id() == record.record_id())
    {
        Some(index) => {
            records[index] = record;
            Placement::Replaced(index)
        }
        None => {
            records.insert(0, record);
            Placement::Inserted
        }
    }
}

pub(crate) struct RecordLog<T> {
    kv: Arc<dyn KeyValueStore>,
    key: &'static str,
    /// Held across each load-merge-write so two saves in a row cannot interleave.
    write_lock: Mutex<()>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> RecordLog<T> {
    pub fn new(kv: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self {
            kv,
            key,
            write_lock: Mutex::new(()),
            _record: PhantomData,
        }
    }

    pub async fn load(&self) -> Vec<T> {
        load_or_default(self.kv.as_ref(), self.key).await
    }

    pub async fn save(&self, record: T) -> Placement {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await;
        let id = record.record_id().to_owned();
        let placement = upsert(&mut records, record);
        save_or_log(self.kv.as_ref(), self.key, &records).await;
        tracing::debug!(key = self.key, %id, ?placement, "record saved");
        placement
    }

    pub async fn find(&self, id: &str) -> Option<T> {
        self.load()
            .await
            .into_iter()
            .find(|record| record.record_id() == id)
    }

    /// Applies `change` to the record with `id` in place and persists it if
    /// `change` reports a modification. Returns the record as stored afterwards
    /// together with that flag, or `None` when no record has that id. An error
    /// from `change` aborts the update without writing.
    pub async fn update<F, E>(&self, id: &str, change: F) -> Result<Option<(T, bool)>, E>
    where
        F: FnOnce(&mut T) -> Result<bool, E>,
    {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await;
        let Some(index) = records.iter().position(|record| record.record_id() == id) else {
            return Ok(None);
        };
        let changed = change(&mut records[index])?;
        if changed {
            save_or_log(self.kv.as_ref(), self.key, &records).await;
            tracing::debug!(key = self.key, id, index, "record updated");
        }
        Ok(Some((records.swap_remove(index), changed)))
    }

    pub async fn clear(&self) {
        let _guard = self.write_lock.lock().await;
        remove_or_log(self.kv.as_ref(), self.key).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        body: String,
    }

    impl Record for Note {
        fn record_id(&self) -> &str {
            &self.id
        }
    }

    fn note(id: &str, body: &str) -> Note {
        Note {
            id: id.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_upsert_new_goes_to_head() {
        let mut records = vec![note("a", "1")];
        assert_eq!(upsert(&mut records, note("b", "2")), Placement::Inserted);
        assert_eq!(records, vec![note("b", "2"), note("a", "1")]);
    }

    #[test]
    fn test_upsert_existing_keeps_index() {
        let mut records = vec![note("c", "3"), note("b", "2"), note("a", "1")];
        assert_eq!(
            upsert(&mut records, note("b", "changed")),
            Placement::Replaced(1)
        );
        assert_eq!(
            records,
            vec![note("c", "3"), note("b", "changed"), note("a", "1")]
        );
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let mut records = vec![note("b", "2"), note("a", "1")];
        upsert(&mut records, note("a", "1"));
        let once = records.clone();
        upsert(&mut records, note("a", "1"));
        assert_eq!(records, once);
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let log: RecordLog<Note> = RecordLog::new(Arc::new(MemoryStore::new()), "notes");
        log.save(note("a", "1")).await;
        assert_eq!(log.update("missing", |_| Ok::<_, ()>(true)).await, Ok(None));
    }

    #[tokio::test]
    async fn test_update_in_place() {
        let log: RecordLog<Note> = RecordLog::new(Arc::new(MemoryStore::new()), "notes");
        log.save(note("a", "1")).await;
        log.save(note("b", "2")).await;

        let updated = log
            .update("a", |n| {
                n.body = "edited".to_string();
                Ok::<_, ()>(true)
            })
            .await;
        assert_eq!(updated, Ok(Some((note("a", "edited"), true))));
        assert_eq!(log.load().await, vec![note("b", "2"), note("a", "edited")]);
    }

    #[tokio::test]
    async fn test_failed_update_writes_nothing() {
        let log: RecordLog<Note> = RecordLog::new(Arc::new(MemoryStore::new()), "notes");
        log.save(note("a", "1")).await;

        let result = log
            .update("a", |n| {
                n.body = "half-done".to_string();
                Err("rejected")
            })
            .await;
        assert_eq!(result, Err("rejected"));
        assert_eq!(log.load().await, vec![note("a", "1")]);
    }

    #[tokio::test]
    async fn test_concurrent_identical_saves() {
        let log: Arc<RecordLog<Note>> =
            Arc::new(RecordLog::new(Arc::new(MemoryStore::new()), "notes"));
        log.save(note("a", "1")).await;

        let first = tokio::spawn({
            let log = log.clone();
            async move { log.save(note("b", "2")).await }
        });
        let second = tokio::spawn({
            let log = log.clone();
            async move { log.save(note("b", "2")).await }
        });
        first.await.unwrap();
        second.await.unwrap();

        assert_eq!(log.load().await, vec![note("b", "2"), note("a", "1")]);
    }
}
