use crate::errors::StorageError;
use crate::models::{StoredRecord, Topic};
use crate::storage::KeyValueStore;
use chrono::{Local, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{error, info, warn};

pub const RECORD_KEY: &str = "dailysChecked";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRecord {
    pub as_of: NaiveDate,
    pub completed: BTreeSet<String>,
}

impl CompletionRecord {
    pub fn empty(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            completed: BTreeSet::new(),
        }
    }

    fn to_stored(&self) -> StoredRecord {
        StoredRecord {
            date: date_key(self.as_of),
            games: self
                .completed
                .iter()
                .map(|id| (id.clone(), true))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    /// Returns `None` for anything that is not a well-formed record.
    fn from_stored(raw: &str) -> Option<Self> {
        let stored: StoredRecord = serde_json::from_str(raw).ok()?;
        let as_of = parse_date_key(&stored.date)?;
        let completed = stored
            .games
            .into_iter()
            .filter_map(|(id, done)| done.then_some(id))
            .collect();
        Some(Self { as_of, completed })
    }
}

/// Completion flags for one calendar day. A stale record is reset and
/// persisted before it is read.
pub struct CompletionStore<S> {
    storage: S,
    record: CompletionRecord,
}

impl<S: KeyValueStore> CompletionStore<S> {
    pub async fn load(storage: S) -> Self {
        Self::load_at(storage, today()).await
    }

    /// Never fails: a missing, unreadable or malformed record becomes a fresh
    /// empty record for `today`.
    pub async fn load_at(storage: S, today: NaiveDate) -> Self {
        let existing = match storage.get(RECORD_KEY).await {
            Ok(Some(raw)) => {
                let parsed = CompletionRecord::from_stored(&raw);
                if parsed.is_none() {
                    warn!("discarding malformed completion record");
                }
                parsed
            }
            Ok(None) => None,
            Err(err) => {
                warn!("failed to read completion record: {err}");
                None
            }
        };

        let mut store = Self {
            storage,
            record: CompletionRecord::empty(today),
        };

        match existing {
            Some(record) if record.as_of == today => store.record = record,
            Some(record) => {
                info!(stale = %record.as_of, %today, "resetting completions for new day");
                store.persist_or_log().await;
            }
            None => {}
        }

        store
    }

    pub fn record(&self) -> &CompletionRecord {
        &self.record
    }

    pub fn as_of(&self) -> NaiveDate {
        self.record.as_of
    }

    /// Applies the daily reset to a live store. Returns true when a reset
    /// happened.
    pub async fn roll_over(&mut self, today: NaiveDate) -> bool {
        if self.record.as_of == today {
            return false;
        }
        info!(stale = %self.record.as_of, %today, "resetting completions for new day");
        self.record = CompletionRecord::empty(today);
        self.persist_or_log().await;
        true
    }

    pub fn is_complete(&self, item_id: &str) -> bool {
        self.record.completed.contains(item_id)
    }

    /// True iff every item of the unfiltered topic is complete.
    pub fn is_topic_complete(&self, topic: &Topic) -> bool {
        topic.items.iter().all(|item| self.is_complete(&item.id))
    }

    pub fn completed_count(&self, topic: &Topic) -> usize {
        topic
            .items
            .iter()
            .filter(|item| self.is_complete(&item.id))
            .count()
    }

    pub async fn toggle(&mut self, item_id: &str) -> Result<bool, StorageError> {
        self.toggle_at(item_id, today()).await
    }

    /// Flips `item_id` and writes the whole record through. A failed write
    /// reverts the flip.
    pub async fn toggle_at(&mut self, item_id: &str, today: NaiveDate) -> Result<bool, StorageError> {
        self.roll_over(today).await;

        let now_complete = if self.record.completed.remove(item_id) {
            false
        } else {
            self.record.completed.insert(item_id.to_string());
            true
        };

        if let Err(err) = self.persist().await {
            if now_complete {
                self.record.completed.remove(item_id);
            } else {
                self.record.completed.insert(item_id.to_string());
            }
            return Err(err);
        }

        Ok(now_complete)
    }

    async fn persist(&self) -> Result<(), StorageError> {
        let payload = serde_json::to_string(&self.record.to_stored())?;
        self.storage.set(RECORD_KEY, &payload).await
    }

    async fn persist_or_log(&self) {
        if let Err(err) = self.persist().await {
            error!("failed to persist completion record: {err}");
        }
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date_key(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
