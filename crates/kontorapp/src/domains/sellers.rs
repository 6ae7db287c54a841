//! # Seller Administration
//!
//! Sellers are stored under `sellers` in creation order. Two uniqueness
//! constraints: `email` (case-insensitive) and `sellerId` (exact). Nested
//! sub-records (address, bank account, store settings, social media) are
//! plain nested structs replaced wholesale on update, never merged.
//!
//! Sellers flagged `isSystem` are protected: neither soft delete nor
//! permanent delete touches them.

use crate::error::{KontorError, Result};
use crate::record::{InsertOrder, Patch, Record, SoftDelete, UniqueKey};
use crate::store::{stats, Collection, StorageBackend};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const SELLERS_KEY: &str = "sellers";

const SELLERS: Collection<Seller> = Collection::new(SELLERS_KEY, InsertOrder::Append);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SellerStatus {
    Active,
    Pending,
    Suspended,
    Deleted,
}

impl SellerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SellerStatus::Active => "active",
            SellerStatus::Pending => "pending",
            SellerStatus::Suspended => "suspended",
            SellerStatus::Deleted => "deleted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Unverified,
    Pending,
    Verified,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub account_holder: String,
    pub account_number: String,
    pub bank_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swift_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    pub store_name: String,
    #[serde(default)]
    pub store_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub currency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialMedia {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub address: Address,
    pub seller_id: String,
    pub business_name: String,
    pub business_type: String,
    pub business_license: String,
    pub tax_id: String,
    pub commission_rate: f64,
    pub status: SellerStatus,
    pub verification_status: VerificationStatus,
    pub join_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub total_sales: f64,
    pub total_orders: u32,
    pub rating: f64,
    pub total_reviews: u32,
    pub bank_account: BankAccount,
    pub payment_method: String,
    pub store_settings: StoreSettings,
    pub social_media: SocialMedia,
    pub documents: Vec<String>,
    pub notes: String,
    pub tags: Vec<String>,
    pub is_system: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewSeller {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub address: Address,
    pub seller_id: String,
    pub business_name: String,
    pub business_type: String,
    pub business_license: String,
    pub tax_id: String,
    pub commission_rate: f64,
    pub bank_account: BankAccount,
    pub payment_method: String,
    pub store_settings: StoreSettings,
    pub social_media: SocialMedia,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SellerPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    /// Replaces the whole address; no field-level merge.
    pub address: Option<Address>,
    pub seller_id: Option<String>,
    pub business_name: Option<String>,
    pub business_type: Option<String>,
    pub business_license: Option<String>,
    pub tax_id: Option<String>,
    pub commission_rate: Option<f64>,
    pub bank_account: Option<BankAccount>,
    pub payment_method: Option<String>,
    pub store_settings: Option<StoreSettings>,
    pub social_media: Option<SocialMedia>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Patch<Seller> for SellerPatch {
    fn apply(self, target: &mut Seller) {
        if let Some(v) = self.first_name {
            target.first_name = v;
        }
        if let Some(v) = self.last_name {
            target.last_name = v;
        }
        if let Some(v) = self.email {
            target.email = v;
        }
        if let Some(v) = self.phone {
            target.phone = v;
        }
        if let Some(v) = self.gender {
            target.gender = v;
        }
        if let Some(v) = self.address {
            target.address = v;
        }
        if let Some(v) = self.seller_id {
            target.seller_id = v;
        }
        if let Some(v) = self.business_name {
            target.business_name = v;
        }
        if let Some(v) = self.business_type {
            target.business_type = v;
        }
        if let Some(v) = self.business_license {
            target.business_license = v;
        }
        if let Some(v) = self.tax_id {
            target.tax_id = v;
        }
        if let Some(v) = self.commission_rate {
            target.commission_rate = v;
        }
        if let Some(v) = self.bank_account {
            target.bank_account = v;
        }
        if let Some(v) = self.payment_method {
            target.payment_method = v;
        }
        if let Some(v) = self.store_settings {
            target.store_settings = v;
        }
        if let Some(v) = self.social_media {
            target.social_media = v;
        }
        if let Some(v) = self.notes {
            target.notes = v;
        }
        if let Some(v) = self.tags {
            target.tags = v;
        }
    }
}

impl Record for Seller {
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
        vec![
            UniqueKey::folded("email", &self.email),
            UniqueKey::exact("sellerId", &self.seller_id),
        ]
    }

    fn search_text(&self) -> Vec<String> {
        vec![
            self.first_name.clone(),
            self.last_name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.seller_id.clone(),
            self.business_name.clone(),
        ]
    }
}

impl SoftDelete for Seller {
    fn is_deleted(&self) -> bool {
        self.status == SellerStatus::Deleted
    }

    fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.status = SellerStatus::Deleted;
        self.deleted_at = Some(at);
    }

    fn mark_restored(&mut self) {
        self.status = SellerStatus::Active;
        self.deleted_at = None;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SellerStats {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_business_type: BTreeMap<String, usize>,
    /// Sum over active sellers.
    pub total_sales: f64,
    /// Average over active sellers, zero when there are none.
    pub avg_rating: f64,
}

pub struct SellersService<'a, B> {
    backend: &'a B,
}

impl<'a, B: StorageBackend> SellersService<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    pub fn initialize(&self, seed: &[Seller]) -> Result<()> {
        SELLERS.initialize(self.backend, seed)
    }

    pub fn create(&self, input: NewSeller) -> Result<Seller> {
        if input.email.trim().is_empty() {
            return Err(KontorError::Validation("email must not be empty".into()));
        }
        if input.seller_id.trim().is_empty() {
            return Err(KontorError::Validation(
                "seller id must not be empty".into(),
            ));
        }

        let now = Utc::now();
        let seller = Seller {
            id: Uuid::new_v4().to_string(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            date_of_birth: input.date_of_birth,
            gender: input.gender,
            address: input.address,
            seller_id: input.seller_id,
            business_name: input.business_name,
            business_type: input.business_type,
            business_license: input.business_license,
            tax_id: input.tax_id,
            commission_rate: input.commission_rate,
            status: SellerStatus::Pending,
            verification_status: VerificationStatus::Unverified,
            join_date: now,
            last_login: None,
            total_sales: 0.0,
            total_orders: 0,
            rating: 0.0,
            total_reviews: 0,
            bank_account: input.bank_account,
            payment_method: input.payment_method,
            store_settings: input.store_settings,
            social_media: input.social_media,
            documents: Vec::new(),
            notes: String::new(),
            tags: input.tags,
            is_system: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        SELLERS.create(self.backend, seller)
    }

    pub fn get(&self, id: &str) -> Result<Seller> {
        SELLERS.get(self.backend, id)
    }

    pub fn update(&self, id: &str, patch: SellerPatch) -> Result<Seller> {
        SELLERS.update(self.backend, id, patch)
    }

    pub fn delete(&self, id: &str) -> Result<Seller> {
        self.guard_system(id)?;
        SELLERS.soft_delete(self.backend, id)
    }

    pub fn restore(&self, id: &str) -> Result<Seller> {
        SELLERS.restore(self.backend, id)
    }

    pub fn purge(&self, id: &str) -> Result<bool> {
        // An absent id purges to true without a guard check, matching the
        // filter-without-check semantics of permanent deletion.
        if let Some(seller) = SELLERS.find_by_id(self.backend, id) {
            if seller.is_system {
                return Err(KontorError::Validation(
                    "system sellers cannot be deleted".into(),
                ));
            }
        }
        SELLERS.permanent_delete(self.backend, id)
    }

    pub fn activate(&self, id: &str) -> Result<Seller> {
        self.set_status(id, SellerStatus::Active)
    }

    pub fn suspend(&self, id: &str) -> Result<Seller> {
        self.set_status(id, SellerStatus::Suspended)
    }

    pub fn set_verification(&self, id: &str, status: VerificationStatus) -> Result<Seller> {
        SELLERS.modify(self.backend, id, move |s| s.verification_status = status)
    }

    /// Record a completed order against the seller's lifetime counters.
    pub fn record_sale(&self, id: &str, amount: f64) -> Result<Seller> {
        if amount < 0.0 {
            return Err(KontorError::Validation(
                "sale amount must not be negative".into(),
            ));
        }
        SELLERS.modify(self.backend, id, move |s| {
            s.total_sales += amount;
            s.total_orders += 1;
        })
    }

    pub fn list(&self) -> Vec<Seller> {
        SELLERS.load_all(self.backend)
    }

    pub fn list_by_status(&self, status: SellerStatus) -> Vec<Seller> {
        SELLERS
            .load_all(self.backend)
            .into_iter()
            .filter(|s| s.status == status)
            .collect()
    }

    pub fn list_by_business_type(&self, business_type: &str) -> Vec<Seller> {
        SELLERS
            .load_all(self.backend)
            .into_iter()
            .filter(|s| s.business_type == business_type)
            .collect()
    }

    pub fn search(&self, query: &str) -> Vec<Seller> {
        SELLERS.search(self.backend, query)
    }

    pub fn stats(&self) -> SellerStats {
        let sellers = SELLERS.load_all(self.backend);
        let active = |s: &Seller| s.status == SellerStatus::Active;
        let active_count = sellers.iter().filter(|s| active(s)).count();
        let rating_sum = stats::sum_where(&sellers, active, |s| s.rating);
        SellerStats {
            total: sellers.len(),
            by_status: stats::count_by(&sellers, |s| s.status.as_str().to_string()),
            by_business_type: stats::count_by(&sellers, |s| s.business_type.clone()),
            total_sales: stats::sum_where(&sellers, active, |s| s.total_sales),
            avg_rating: stats::average(rating_sum, active_count),
        }
    }

    fn set_status(&self, id: &str, status: SellerStatus) -> Result<Seller> {
        let current = SELLERS.get(self.backend, id)?;
        if current.status == SellerStatus::Deleted {
            return Err(KontorError::Validation(
                "deleted sellers must be restored first".into(),
            ));
        }
        SELLERS.modify(self.backend, id, move |s| s.status = status)
    }

    fn guard_system(&self, id: &str) -> Result<()> {
        let seller = SELLERS.get(self.backend, id)?;
        if seller.is_system {
            return Err(KontorError::Validation(
                "system sellers cannot be deleted".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    fn acme(email: &str, seller_id: &str) -> NewSeller {
        NewSeller {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: email.into(),
            seller_id: seller_id.into(),
            business_name: "Acme Outfitters".into(),
            business_type: "retail".into(),
            commission_rate: 12.5,
            ..Default::default()
        }
    }

    #[test]
    fn second_seller_with_same_email_fails() {
        let backend = MemBackend::new();
        let service = SellersService::new(&backend);
        service.create(acme("ada@acme.test", "SLR-001")).unwrap();

        let err = service
            .create(acme("Ada@Acme.TEST", "SLR-002"))
            .unwrap_err();
        assert!(matches!(
            err,
            KontorError::DuplicateKey { field: "email", .. }
        ));
    }

    #[test]
    fn seller_id_collision_fails_exactly() {
        let backend = MemBackend::new();
        let service = SellersService::new(&backend);
        service.create(acme("a@acme.test", "SLR-001")).unwrap();

        let err = service.create(acme("b@acme.test", "SLR-001")).unwrap_err();
        assert!(matches!(
            err,
            KontorError::DuplicateKey {
                field: "sellerId",
                ..
            }
        ));

        // Differing case is a different seller id
        service.create(acme("c@acme.test", "slr-001")).unwrap();
    }

    #[test]
    fn update_collision_with_other_seller_fails() {
        let backend = MemBackend::new();
        let service = SellersService::new(&backend);
        service.create(acme("a@acme.test", "SLR-001")).unwrap();
        let b = service.create(acme("b@acme.test", "SLR-002")).unwrap();

        let err = service
            .update(
                &b.id,
                SellerPatch {
                    email: Some("a@acme.test".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, KontorError::DuplicateKey { .. }));
    }

    #[test]
    fn nested_address_is_replaced_wholesale() {
        let backend = MemBackend::new();
        let service = SellersService::new(&backend);
        let seller = service
            .create(NewSeller {
                address: Address {
                    street: "1 Old Rd".into(),
                    city: "Bergen".into(),
                    country: "NO".into(),
                    ..Default::default()
                },
                ..acme("a@acme.test", "SLR-001")
            })
            .unwrap();

        let updated = service
            .update(
                &seller.id,
                SellerPatch {
                    address: Some(Address {
                        street: "2 New Rd".into(),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            )
            .unwrap();

        // No merge: the old city and country are gone
        assert_eq!(updated.address.street, "2 New Rd");
        assert_eq!(updated.address.city, "");
        assert_eq!(updated.address.country, "");
    }

    #[test]
    fn lifecycle_pending_active_suspended_deleted() {
        let backend = MemBackend::new();
        let service = SellersService::new(&backend);
        let seller = service.create(acme("a@acme.test", "SLR-001")).unwrap();
        assert_eq!(seller.status, SellerStatus::Pending);

        let active = service.activate(&seller.id).unwrap();
        assert_eq!(active.status, SellerStatus::Active);

        let suspended = service.suspend(&seller.id).unwrap();
        assert_eq!(suspended.status, SellerStatus::Suspended);

        let deleted = service.delete(&seller.id).unwrap();
        assert_eq!(deleted.status, SellerStatus::Deleted);

        // Status changes on a deleted seller are rejected
        assert!(service.activate(&seller.id).is_err());

        let restored = service.restore(&seller.id).unwrap();
        assert_eq!(restored.status, SellerStatus::Active);
    }

    #[test]
    fn system_sellers_refuse_deletion() {
        let backend = MemBackend::new();
        let service = SellersService::new(&backend);
        let seller = service.create(acme("a@acme.test", "SLR-001")).unwrap();

        // Seed-style records arrive through initialize; flag one directly
        let mut all = service.list();
        all[0].is_system = true;
        SELLERS.save_all(&backend, &all).unwrap();

        assert!(matches!(
            service.delete(&seller.id).unwrap_err(),
            KontorError::Validation(_)
        ));
        assert!(matches!(
            service.purge(&seller.id).unwrap_err(),
            KontorError::Validation(_)
        ));
        assert_eq!(service.list().len(), 1);
    }

    #[test]
    fn verification_and_business_type_listing() {
        let backend = MemBackend::new();
        let service = SellersService::new(&backend);
        let seller = service.create(acme("a@acme.test", "SLR-001")).unwrap();
        assert_eq!(seller.verification_status, VerificationStatus::Unverified);

        let verified = service
            .set_verification(&seller.id, VerificationStatus::Verified)
            .unwrap();
        assert_eq!(verified.verification_status, VerificationStatus::Verified);

        service
            .create(NewSeller {
                business_type: "manufacturer".into(),
                ..acme("b@acme.test", "SLR-002")
            })
            .unwrap();
        assert_eq!(service.list_by_business_type("retail").len(), 1);
        assert_eq!(service.list_by_business_type("manufacturer").len(), 1);
    }

    #[test]
    fn record_sale_accumulates_counters() {
        let backend = MemBackend::new();
        let service = SellersService::new(&backend);
        let seller = service.create(acme("a@acme.test", "SLR-001")).unwrap();

        service.record_sale(&seller.id, 120.0).unwrap();
        let after = service.record_sale(&seller.id, 80.0).unwrap();
        assert_eq!(after.total_sales, 200.0);
        assert_eq!(after.total_orders, 2);
    }

    #[test]
    fn stats_sum_active_sales_only() {
        let backend = MemBackend::new();
        let service = SellersService::new(&backend);
        let a = service.create(acme("a@acme.test", "SLR-001")).unwrap();
        let b = service.create(acme("b@acme.test", "SLR-002")).unwrap();
        service.activate(&a.id).unwrap();
        service.record_sale(&a.id, 500.0).unwrap();
        service.record_sale(&b.id, 300.0).unwrap();

        let stats = service.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.by_status.values().sum::<usize>(), stats.total);
        // b is still pending, so its sales do not count
        assert_eq!(stats.total_sales, 500.0);
    }
}
