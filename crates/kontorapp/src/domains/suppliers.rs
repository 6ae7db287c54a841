//! Supplier directory for the warehouse domain, stored under
//! `warehouse_suppliers`. Email is unique (case-insensitive).

use crate::error::{KontorError, Result};
use crate::record::{InsertOrder, Patch, Record, SoftDelete, UniqueKey};
use crate::store::{stats, Collection, StorageBackend};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const SUPPLIERS_KEY: &str = "warehouse_suppliers";

const SUPPLIERS: Collection<Supplier> = Collection::new(SUPPLIERS_KEY, InsertOrder::Append);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplierStatus {
    Active,
    Inactive,
    Deleted,
}

impl SupplierStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupplierStatus::Active => "active",
            SupplierStatus::Inactive => "inactive",
            SupplierStatus::Deleted => "deleted",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub business_type: String,
    pub tax_id: String,
    pub payment_terms: String,
    pub rating: f64,
    pub status: SupplierStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewSupplier {
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub business_type: String,
    pub tax_id: String,
    pub payment_terms: String,
}

#[derive(Debug, Clone, Default)]
pub struct SupplierPatch {
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub business_type: Option<String>,
    pub tax_id: Option<String>,
    pub payment_terms: Option<String>,
    pub rating: Option<f64>,
    pub notes: Option<String>,
}

impl Patch<Supplier> for SupplierPatch {
    fn apply(self, target: &mut Supplier) {
        if let Some(v) = self.name {
            target.name = v;
        }
        if let Some(v) = self.contact_person {
            target.contact_person = v;
        }
        if let Some(v) = self.email {
            target.email = v;
        }
        if let Some(v) = self.phone {
            target.phone = v;
        }
        if let Some(v) = self.address {
            target.address = v;
        }
        if let Some(v) = self.business_type {
            target.business_type = v;
        }
        if let Some(v) = self.tax_id {
            target.tax_id = v;
        }
        if let Some(v) = self.payment_terms {
            target.payment_terms = v;
        }
        if let Some(v) = self.rating {
            target.rating = v;
        }
        if let Some(v) = self.notes {
            target.notes = v;
        }
    }
}

impl Record for Supplier {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn stamp_created(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
        self.updated_at = at;
    }

    fn stamp_updated(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::folded("email", &self.email)]
    }

    fn search_text(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.contact_person.clone(),
            self.email.clone(),
            self.phone.clone(),
        ]
    }
}

impl SoftDelete for Supplier {
    fn is_deleted(&self) -> bool {
        self.status == SupplierStatus::Deleted
    }

    fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.status = SupplierStatus::Deleted;
        self.deleted_at = Some(at);
    }

    fn mark_restored(&mut self) {
        self.status = SupplierStatus::Active;
        self.deleted_at = None;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SupplierStats {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_business_type: BTreeMap<String, usize>,
}

pub struct SuppliersService<'a, B> {
    backend: &'a B,
}

impl<'a, B: StorageBackend> SuppliersService<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    pub fn initialize(&self, seed: &[Supplier]) -> Result<()> {
        SUPPLIERS.initialize(self.backend, seed)
    }

    pub fn create(&self, input: NewSupplier) -> Result<Supplier> {
        if input.name.trim().is_empty() {
            return Err(KontorError::Validation("name must not be empty".into()));
        }
        if input.email.trim().is_empty() {
            return Err(KontorError::Validation("email must not be empty".into()));
        }

        let now = Utc::now();
        let supplier = Supplier {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            contact_person: input.contact_person,
            email: input.email,
            phone: input.phone,
            address: input.address,
            business_type: input.business_type,
            tax_id: input.tax_id,
            payment_terms: input.payment_terms,
            rating: 0.0,
            status: SupplierStatus::Active,
            notes: String::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        SUPPLIERS.create(self.backend, supplier)
    }

    pub fn get(&self, id: &str) -> Result<Supplier> {
        SUPPLIERS.get(self.backend, id)
    }

    pub fn update(&self, id: &str, patch: SupplierPatch) -> Result<Supplier> {
        SUPPLIERS.update(self.backend, id, patch)
    }

    pub fn delete(&self, id: &str) -> Result<Supplier> {
        SUPPLIERS.soft_delete(self.backend, id)
    }

    pub fn restore(&self, id: &str) -> Result<Supplier> {
        SUPPLIERS.restore(self.backend, id)
    }

    pub fn purge(&self, id: &str) -> Result<bool> {
        SUPPLIERS.permanent_delete(self.backend, id)
    }

    pub fn toggle_active(&self, id: &str) -> Result<Supplier> {
        let current = SUPPLIERS.get(self.backend, id)?;
        if current.status == SupplierStatus::Deleted {
            return Err(KontorError::Validation(
                "cannot toggle a deleted supplier".into(),
            ));
        }
        SUPPLIERS.modify(self.backend, id, |s| {
            s.status = match s.status {
                SupplierStatus::Active => SupplierStatus::Inactive,
                _ => SupplierStatus::Active,
            };
        })
    }

    pub fn list(&self) -> Vec<Supplier> {
        SUPPLIERS.load_all(self.backend)
    }

    pub fn list_active(&self) -> Vec<Supplier> {
        SUPPLIERS
            .load_all(self.backend)
            .into_iter()
            .filter(|s| s.status == SupplierStatus::Active)
            .collect()
    }

    pub fn search(&self, query: &str) -> Vec<Supplier> {
        SUPPLIERS.search(self.backend, query)
    }

    pub fn stats(&self) -> SupplierStats {
        let suppliers = SUPPLIERS.load_all(self.backend);
        SupplierStats {
            total: suppliers.len(),
            by_status: stats::count_by(&suppliers, |s| s.status.as_str().to_string()),
            by_business_type: stats::count_by(&suppliers, |s| s.business_type.clone()),
        }
    }
}
