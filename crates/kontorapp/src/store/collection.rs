use super::backend::StorageBackend;
use crate::error::{KontorError, Result};
use crate::record::{InsertOrder, Patch, Record, SoftDelete};
use chrono::Utc;
use log::warn;
use std::marker::PhantomData;

/// One named collection of records persisted as a single JSON array.
///
/// The key and insertion policy are bound at construction; every operation
/// takes the backend explicitly so one backend can serve several collections
/// (the purchase-receiving flow touches two).
///
/// All mutations are load-all → transform → save-all against the full blob.
pub struct Collection<T> {
    key: &'static str,
    order: InsertOrder,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Collection<T> {
    pub const fn new(key: &'static str, order: InsertOrder) -> Self {
        Self {
            key,
            order,
            _record: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Seed the collection if, and only if, nothing is stored yet.
    /// Idempotent: existing data is never overwritten.
    pub fn initialize<B: StorageBackend>(&self, backend: &B, seed: &[T]) -> Result<()> {
        if backend.read(self.key)?.is_none() {
            self.save_all(backend, seed)?;
        }
        Ok(())
    }

    /// Load every record. Fail-open: an absent key, a read failure, or a
    /// malformed blob all yield an empty vector. The failure is logged and
    /// never propagated; the next save overwrites the bad blob.
    pub fn load_all<B: StorageBackend>(&self, backend: &B) -> Vec<T> {
        let raw = match backend.read(self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!("failed to read collection {}: {}", self.key, err);
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(err) => {
                warn!("discarding malformed collection {}: {}", self.key, err);
                Vec::new()
            }
        }
    }

    /// The only write primitive. Serializes the full sequence and replaces
    /// the stored blob.
    pub fn save_all<B: StorageBackend>(&self, backend: &B, records: &[T]) -> Result<()> {
        let payload = serde_json::to_string_pretty(records)?;
        backend.write(self.key, &payload)
    }

    pub fn find_by_id<B: StorageBackend>(&self, backend: &B, id: &str) -> Option<T> {
        self.load_all(backend).into_iter().find(|r| r.id() == id)
    }

    /// `find_by_id` that reports the miss as a typed error.
    pub fn get<B: StorageBackend>(&self, backend: &B, id: &str) -> Result<T> {
        self.find_by_id(backend, id)
            .ok_or_else(|| KontorError::not_found(self.key, id))
    }

    /// Insert a new record: checks declared unique keys against the
    /// collection, stamps both timestamps, prepends or appends per policy,
    /// persists, and returns the stored record.
    pub fn create<B: StorageBackend>(&self, backend: &B, mut record: T) -> Result<T> {
        let mut records = self.load_all(backend);
        check_unique(&records, &record, None)?;

        record.stamp_created(Utc::now());
        match self.order {
            InsertOrder::Prepend => records.insert(0, record.clone()),
            InsertOrder::Append => records.push(record.clone()),
        }
        self.save_all(backend, &records)?;
        Ok(record)
    }

    /// Apply a typed patch to the record with `id`. Shallow semantics:
    /// patched fields replace the current value wholesale. Unique keys are
    /// re-checked excluding the record itself, so an update that keeps its
    /// own email unchanged succeeds.
    pub fn update<B, P>(&self, backend: &B, id: &str, patch: P) -> Result<T>
    where
        B: StorageBackend,
        P: Patch<T>,
    {
        let mut records = self.load_all(backend);
        let pos = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| KontorError::not_found(self.key, id))?;

        let mut updated = records[pos].clone();
        patch.apply(&mut updated);
        check_unique(&records, &updated, Some(id))?;

        updated.stamp_updated(Utc::now());
        records[pos] = updated.clone();
        self.save_all(backend, &records)?;
        Ok(updated)
    }

    /// Load, mutate in place, bump `updated_at`, persist. The primitive
    /// behind domain operations like stock adjustment and status toggles.
    pub fn modify<B, F>(&self, backend: &B, id: &str, mutate: F) -> Result<T>
    where
        B: StorageBackend,
        F: FnOnce(&mut T),
    {
        let mut records = self.load_all(backend);
        let pos = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| KontorError::not_found(self.key, id))?;

        mutate(&mut records[pos]);
        records[pos].stamp_updated(Utc::now());
        let updated = records[pos].clone();
        self.save_all(backend, &records)?;
        Ok(updated)
    }

    pub fn soft_delete<B: StorageBackend>(&self, backend: &B, id: &str) -> Result<T>
    where
        T: SoftDelete,
    {
        let now = Utc::now();
        self.modify(backend, id, |record| record.mark_deleted(now))
    }

    pub fn restore<B: StorageBackend>(&self, backend: &B, id: &str) -> Result<T>
    where
        T: SoftDelete,
    {
        self.modify(backend, id, |record| record.mark_restored())
    }

    /// Excise the record from the collection. Returns `true` unconditionally
    /// once the filtered collection is persisted — an absent id is not a
    /// distinct outcome, so a repeated call is safe and changes nothing.
    pub fn permanent_delete<B: StorageBackend>(&self, backend: &B, id: &str) -> Result<bool> {
        let mut records = self.load_all(backend);
        records.retain(|r| r.id() != id);
        self.save_all(backend, &records)?;
        Ok(true)
    }

    /// Case-insensitive substring match over each record's declared
    /// searchable fields; a record matches if any field matches. An empty or
    /// whitespace-only query returns the full collection.
    pub fn search<B: StorageBackend>(&self, backend: &B, query: &str) -> Vec<T> {
        let records = self.load_all(backend);
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return records;
        }
        records
            .into_iter()
            .filter(|r| {
                r.search_text()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn len<B: StorageBackend>(&self, backend: &B) -> usize {
        self.load_all(backend).len()
    }

    pub fn is_empty<B: StorageBackend>(&self, backend: &B) -> bool {
        self.len(backend) == 0
    }
}

fn check_unique<T: Record>(records: &[T], candidate: &T, exclude_id: Option<&str>) -> Result<()> {
    let keys = candidate.unique_keys();
    if keys.is_empty() {
        return Ok(());
    }
    for existing in records {
        if exclude_id == Some(existing.id()) {
            continue;
        }
        for key in &keys {
            if existing
                .unique_keys()
                .iter()
                .any(|other| other.field == key.field && other.value == key.value)
            {
                return Err(KontorError::duplicate(key.field, key.value.clone()));
            }
        }
    }
    Ok(())
}
