//! # Record Machinery
//!
//! Every persisted entity implements [`Record`]: a stable string id assigned
//! at creation, `created_at`/`updated_at` timestamps, and two declared sets
//! the generic store consults — unique keys and searchable text fields.
//!
//! Soft-deletable domains additionally implement [`SoftDelete`]. The stored
//! data uses two encodings for the same lifecycle concept (a `status` enum
//! for users/sellers/suppliers/inventory, an `isActive`+`isDeleted` boolean
//! pair for products); the trait is the single internal representation, and
//! each record maps it onto whichever fields its JSON carries.
//!
//! Updates go through [`Patch`]: an Option-fielded struct applied shallowly.
//! Nested sub-records (addresses, bank accounts, store settings) are replaced
//! wholesale, never deep-merged.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A uniqueness constraint value for one record field.
///
/// Values are normalized at declaration time, so collision checks are a
/// plain equality test. String fields that the domain compares
/// case-insensitively (emails) normalize through [`UniqueKey::folded`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueKey {
    pub field: &'static str,
    pub value: String,
}

impl UniqueKey {
    /// Exact-match uniqueness (SKUs, seller ids).
    pub fn exact(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    /// Case-insensitive uniqueness (emails).
    pub fn folded(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_lowercase(),
        }
    }
}

/// Where newly created records land in the collection.
///
/// Products prepend (admin lists show newest first); every other domain
/// appends in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOrder {
    Prepend,
    Append,
}

/// One persisted entity.
pub trait Record: Clone + Serialize + DeserializeOwned {
    fn id(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;

    /// Set both timestamps at creation.
    fn stamp_created(&mut self, at: DateTime<Utc>);

    /// Bump `updated_at` on mutation.
    fn stamp_updated(&mut self, at: DateTime<Utc>);

    /// Fields that must not collide with another record in the collection.
    fn unique_keys(&self) -> Vec<UniqueKey> {
        Vec::new()
    }

    /// Field values substring search runs against.
    fn search_text(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Reversible deletion. `restore` returns the record to the active state
/// regardless of the state it held before deletion.
pub trait SoftDelete {
    fn is_deleted(&self) -> bool;

    fn mark_deleted(&mut self, at: DateTime<Utc>);

    fn mark_restored(&mut self);
}

/// A typed partial update. Fields left `None` keep their current value;
/// fields set replace the target's value wholesale.
pub trait Patch<T> {
    fn apply(self, target: &mut T);
}
