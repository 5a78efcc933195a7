use std::collections::HashSet;

use anyhow::{Context, Result};

use crate::db::KeyValueStore;
use crate::models::WatchedEntry;

pub(crate) const WATCHED_KEY: &str = "watched";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AddOutcome {
    Added,
    AlreadyWatched,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct WatchedSummary {
    pub(crate) count: usize,
    pub(crate) avg_imdb_rating: f64,
    pub(crate) avg_user_rating: f64,
    pub(crate) avg_runtime: f64,
}

pub(crate) struct WatchedStore<S> {
    storage: S,
    entries: Vec<WatchedEntry>,
}

impl<S: KeyValueStore> WatchedStore<S> {
    pub(crate) fn hydrate(storage: S) -> Self {
        let entries = match storage.read(WATCHED_KEY) {
            Ok(Some(raw)) => parse_watched(&raw),
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::error!(error = %err, "failed to read watched list, starting empty");
                Vec::new()
            }
        };
        tracing::debug!(count = entries.len(), "watched list hydrated");
        Self { storage, entries }
    }

    pub(crate) fn all(&self) -> &[WatchedEntry] {
        &self.entries
    }

    pub(crate) fn get(&self, id: &str) -> Option<&WatchedEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Appends `entry` unless its id is already on the list. The full list is
    /// written before the in-memory copy changes.
    pub(crate) fn add(&mut self, entry: WatchedEntry) -> Result<AddOutcome> {
        if self.contains(&entry.id) {
            return Ok(AddOutcome::AlreadyWatched);
        }
        let mut next = self.entries.clone();
        next.push(entry);
        self.persist(&next)?;
        self.entries = next;
        Ok(AddOutcome::Added)
    }

    pub(crate) fn remove(&mut self, id: &str) -> Result<bool> {
        if !self.contains(id) {
            return Ok(false);
        }
        let next: Vec<WatchedEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.id != id)
            .cloned()
            .collect();
        self.persist(&next)?;
        self.entries = next;
        Ok(true)
    }

    pub(crate) fn summary(&self) -> WatchedSummary {
        WatchedSummary {
            count: self.entries.len(),
            avg_imdb_rating: mean(self.entries.iter().filter_map(|entry| entry.imdb_rating)),
            avg_user_rating: mean(
                self.entries
                    .iter()
                    .map(|entry| f64::from(entry.user_rating)),
            ),
            avg_runtime: mean(
                self.entries
                    .iter()
                    .filter_map(|entry| entry.runtime_minutes.map(f64::from)),
            ),
        }
    }

    pub(crate) fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self, entries: &[WatchedEntry]) -> Result<()> {
        let raw = serde_json::to_string(entries).context("failed to encode watched list")?;
        self.storage
            .write(WATCHED_KEY, &raw)
            .context("failed to persist watched list")
    }
}

fn parse_watched(raw: &str) -> Vec<WatchedEntry> {
    let entries: Vec<WatchedEntry> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(error = %err, "stored watched list is not valid json, starting empty");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let before = entries.len();
    let entries: Vec<WatchedEntry> = entries
        .into_iter()
        .filter(|entry| seen.insert(entry.id.clone()))
        .collect();
    if entries.len() != before {
        tracing::warn!(
            dropped = before - entries.len(),
            "stored watched list had duplicate ids"
        );
    }
    entries
}

/// Arithmetic mean; `NaN` when there is nothing to average.
pub(crate) fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0_u32), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / f64::from(count)
    }
}

pub(crate) fn format_average(value: f64) -> String {
    format!("{value:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn entry(id: &str, imdb: Option<f64>, runtime: Option<u32>, user: u8) -> WatchedEntry {
        WatchedEntry {
            id: id.to_string(),
            title: format!("Movie {id}"),
            year: "2000".to_string(),
            poster_url: "N/A".to_string(),
            imdb_rating: imdb,
            runtime_minutes: runtime,
            user_rating: user,
        }
    }

    fn stored(store: &WatchedStore<MemoryStore>) -> Option<&str> {
        store.storage().values.get(WATCHED_KEY).map(String::as_str)
    }

    #[test]
    fn hydrate_reads_entries_in_stored_order() {
        let mut storage = MemoryStore::default();
        let raw = serde_json::to_string(&vec![
            entry("tt2", Some(7.0), Some(100), 6),
            entry("tt1", Some(8.0), Some(120), 9),
        ])
        .expect("encode");
        storage.values.insert(WATCHED_KEY.to_string(), raw);

        let store = WatchedStore::hydrate(storage);
        let ids: Vec<&str> = store.all().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["tt2", "tt1"]);
    }

    #[test]
    fn hydrate_treats_corrupt_storage_as_empty() {
        let mut storage = MemoryStore::default();
        storage
            .values
            .insert(WATCHED_KEY.to_string(), "{not json".to_string());

        let store = WatchedStore::hydrate(storage);
        assert!(store.all().is_empty());
        assert_eq!(store.storage().writes, 0);
    }

    #[test]
    fn hydrate_drops_duplicate_ids_keeping_the_first() {
        let mut storage = MemoryStore::default();
        let raw = serde_json::to_string(&vec![
            entry("tt1", Some(7.0), Some(100), 6),
            entry("tt1", Some(7.0), Some(100), 2),
        ])
        .expect("encode");
        storage.values.insert(WATCHED_KEY.to_string(), raw);

        let store = WatchedStore::hydrate(storage);
        assert_eq!(store.all().len(), 1);
        assert_eq!(store.get("tt1").map(|e| e.user_rating), Some(6));
    }

    #[test]
    fn add_then_remove_restores_prior_content_and_storage() {
        let mut store = WatchedStore::hydrate(MemoryStore::default());
        store
            .add(entry("tt1", Some(8.0), Some(120), 9))
            .expect("seed");
        let before_entries = store.all().to_vec();
        let before_raw = stored(&store).map(str::to_string);

        assert_eq!(
            store
                .add(entry("tt2", Some(6.5), Some(95), 5))
                .expect("add"),
            AddOutcome::Added
        );
        let after_add: Vec<WatchedEntry> =
            serde_json::from_str(stored(&store).expect("persisted after add")).expect("decode");
        assert_eq!(after_add, store.all());
        assert_eq!(after_add.len(), 2);

        assert!(store.remove("tt2").expect("remove"));
        assert_eq!(store.all(), before_entries.as_slice());
        assert_eq!(stored(&store).map(str::to_string), before_raw);
        assert_eq!(store.storage().writes, 3);
    }

    #[test]
    fn duplicate_add_is_refused_without_writing() {
        let mut store = WatchedStore::hydrate(MemoryStore::default());
        store.add(entry("tt1", None, None, 4)).expect("first add");

        let outcome = store.add(entry("tt1", None, None, 8)).expect("second add");
        assert_eq!(outcome, AddOutcome::AlreadyWatched);
        assert_eq!(store.all().len(), 1);
        assert_eq!(store.get("tt1").map(|e| e.user_rating), Some(4));
        assert_eq!(store.storage().writes, 1);
    }

    #[test]
    fn failed_write_leaves_list_untouched() {
        let mut store = WatchedStore::hydrate(MemoryStore::default());
        store.add(entry("tt1", None, None, 4)).expect("first add");
        store.storage.fail_writes = true;

        assert!(store.add(entry("tt2", None, None, 5)).is_err());
        assert!(store.remove("tt1").is_err());
        let ids: Vec<&str> = store.all().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["tt1"]);
    }

    #[test]
    fn removing_unknown_id_is_a_no_op() {
        let mut store = WatchedStore::hydrate(MemoryStore::default());
        assert!(!store.remove("tt404").expect("remove"));
        assert_eq!(store.storage().writes, 0);
    }

    #[test]
    fn summary_of_empty_list_is_nan_not_a_panic() {
        let store = WatchedStore::hydrate(MemoryStore::default());
        let summary = store.summary();
        assert_eq!(summary.count, 0);
        assert!(summary.avg_imdb_rating.is_nan());
        assert!(summary.avg_user_rating.is_nan());
        assert!(summary.avg_runtime.is_nan());
        assert_eq!(format_average(summary.avg_runtime), "NaN");
    }

    #[test]
    fn summary_averages_only_known_values() {
        let mut store = WatchedStore::hydrate(MemoryStore::default());
        store.add(entry("tt1", Some(8.0), Some(120), 9)).expect("add");
        store.add(entry("tt2", Some(7.0), None, 6)).expect("add");
        store.add(entry("tt3", None, Some(90), 3)).expect("add");

        let summary = store.summary();
        assert_eq!(summary.count, 3);
        assert_eq!(format_average(summary.avg_imdb_rating), "7.5");
        assert_eq!(format_average(summary.avg_user_rating), "6.0");
        assert_eq!(format_average(summary.avg_runtime), "105.0");
    }
}
