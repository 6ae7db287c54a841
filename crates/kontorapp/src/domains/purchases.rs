//! # Purchase Orders
//!
//! Purchases are stored under `warehouse_purchases` in creation order. Their
//! ids are human-facing purchase numbers (`PO-2026-001`): the prefix comes
//! from configuration, the year from the order date, and the sequence from
//! the highest existing number for that year.
//!
//! `subtotal`/`tax`/`total` are computed from the line items at creation
//! time and are not recomputed when items are edited afterwards; a caller
//! that changes items must recompute.
//!
//! Receiving a purchase is a two-phase operation: the purchase is saved as
//! delivered first, then each line item bumps the matching inventory record
//! (`productId` matched against inventory `sku`). The phases are separate
//! saves with no rollback; a failure in between leaves the purchase
//! delivered with stock not yet bumped.

use crate::domains::inventory::{InventoryItem, INVENTORY};
use crate::error::{KontorError, Result};
use crate::record::{InsertOrder, Record};
use crate::store::{stats, Collection, StorageBackend};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const PURCHASES_KEY: &str = "warehouse_purchases";

const PURCHASES: Collection<Purchase> = Collection::new(PURCHASES_KEY, InsertOrder::Append);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Pending,
    Ordered,
    Delivered,
    Cancelled,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::Ordered => "ordered",
            PurchaseStatus::Delivered => "delivered",
            PurchaseStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    pub product_id: String,
    pub quantity: u32,
    pub unit_cost: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: String,
    pub supplier_id: String,
    pub items: Vec<PurchaseItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub status: PurchaseStatus,
    pub order_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Purchase {
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

    fn search_text(&self) -> Vec<String> {
        vec![self.id.clone(), self.supplier_id.clone(), self.notes.clone()]
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewPurchaseItem {
    pub product_id: String,
    pub quantity: u32,
    pub unit_cost: f64,
}

#[derive(Debug, Clone, Default)]
pub struct NewPurchase {
    pub supplier_id: String,
    pub items: Vec<NewPurchaseItem>,
    pub expected_date: Option<NaiveDate>,
    pub notes: String,
}

/// Pricing knobs lifted from [`crate::config::KontorConfig`].
#[derive(Debug, Clone)]
pub struct PurchaseSettings {
    pub tax_rate: f64,
    pub number_prefix: String,
}

impl Default for PurchaseSettings {
    fn default() -> Self {
        Self {
            tax_rate: 0.08,
            number_prefix: "PO".to_string(),
        }
    }
}

/// Result of receiving a purchase: the delivered purchase, the inventory
/// records that were bumped, and the line-item product ids with no matching
/// inventory sku (skipped, by design).
#[derive(Debug, Clone)]
pub struct ReceiveOutcome {
    pub purchase: Purchase,
    pub adjusted: Vec<InventoryItem>,
    pub unmatched: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseSort {
    AmountHigh,
    AmountLow,
    Newest,
    Oldest,
}

#[derive(Debug, Clone, Default)]
pub struct PurchaseFilter {
    pub supplier_id: Option<String>,
    pub status: Option<PurchaseStatus>,
    pub sort: Option<PurchaseSort>,
}

impl PurchaseFilter {
    fn matches(&self, purchase: &Purchase) -> bool {
        if let Some(supplier_id) = &self.supplier_id {
            if &purchase.supplier_id != supplier_id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if purchase.status != status {
                return false;
            }
        }
        true
    }
}

fn sort_purchases(purchases: &mut [Purchase], sort: PurchaseSort) {
    match sort {
        PurchaseSort::AmountHigh => purchases.sort_by(|a, b| b.total.total_cmp(&a.total)),
        PurchaseSort::AmountLow => purchases.sort_by(|a, b| a.total.total_cmp(&b.total)),
        PurchaseSort::Newest => purchases.sort_by(|a, b| b.order_date.cmp(&a.order_date)),
        PurchaseSort::Oldest => purchases.sort_by(|a, b| a.order_date.cmp(&b.order_date)),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseStats {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    /// Sum of order totals, cancelled orders excluded.
    pub total_amount: f64,
    pub avg_amount: f64,
}

/// Next purchase number for `year`: highest existing sequence plus one.
/// Numbers from other years or other prefixes do not participate.
pub fn next_purchase_number(existing: &[Purchase], prefix: &str, year: i32) -> String {
    let marker = format!("{}-{}-", prefix, year);
    let highest = existing
        .iter()
        .filter_map(|p| p.id.strip_prefix(&marker))
        .filter_map(|seq| seq.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("{}{:03}", marker, highest + 1)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub struct PurchasesService<'a, B> {
    backend: &'a B,
    settings: PurchaseSettings,
}

impl<'a, B: StorageBackend> PurchasesService<'a, B> {
    pub fn new(backend: &'a B, settings: PurchaseSettings) -> Self {
        Self { backend, settings }
    }

    pub fn initialize(&self, seed: &[Purchase]) -> Result<()> {
        PURCHASES.initialize(self.backend, seed)
    }

    pub fn create(&self, input: NewPurchase) -> Result<Purchase> {
        if input.supplier_id.trim().is_empty() {
            return Err(KontorError::Validation(
                "supplier id must not be empty".into(),
            ));
        }
        if input.items.is_empty() {
            return Err(KontorError::Validation(
                "a purchase needs at least one line item".into(),
            ));
        }

        let mut items = Vec::with_capacity(input.items.len());
        for item in input.items {
            if item.quantity == 0 {
                return Err(KontorError::Validation(
                    "line item quantity must be positive".into(),
                ));
            }
            if item.unit_cost < 0.0 {
                return Err(KontorError::Validation(
                    "line item unit cost must not be negative".into(),
                ));
            }
            items.push(PurchaseItem {
                total_cost: round2(item.quantity as f64 * item.unit_cost),
                product_id: item.product_id,
                quantity: item.quantity,
                unit_cost: item.unit_cost,
            });
        }

        let subtotal = round2(items.iter().map(|i| i.total_cost).sum());
        let tax = round2(subtotal * self.settings.tax_rate);
        let now = Utc::now();
        let existing = PURCHASES.load_all(self.backend);
        let purchase = Purchase {
            id: next_purchase_number(&existing, &self.settings.number_prefix, now.year()),
            supplier_id: input.supplier_id,
            items,
            subtotal,
            tax,
            total: round2(subtotal + tax),
            status: PurchaseStatus::Pending,
            order_date: now,
            expected_date: input.expected_date,
            delivered_at: None,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        };
        PURCHASES.create(self.backend, purchase)
    }

    pub fn get(&self, id: &str) -> Result<Purchase> {
        PURCHASES.get(self.backend, id)
    }

    pub fn mark_ordered(&self, id: &str) -> Result<Purchase> {
        let purchase = PURCHASES.get(self.backend, id)?;
        if purchase.status != PurchaseStatus::Pending {
            return Err(KontorError::Validation(format!(
                "only pending purchases can be ordered, {} is {}",
                id,
                purchase.status.as_str()
            )));
        }
        PURCHASES.modify(self.backend, id, |p| p.status = PurchaseStatus::Ordered)
    }

    pub fn cancel(&self, id: &str) -> Result<Purchase> {
        let purchase = PURCHASES.get(self.backend, id)?;
        if purchase.status == PurchaseStatus::Delivered {
            return Err(KontorError::Validation(
                "a delivered purchase cannot be cancelled".into(),
            ));
        }
        PURCHASES.modify(self.backend, id, |p| p.status = PurchaseStatus::Cancelled)
    }

    /// Mark the purchase delivered and bump inventory stock per line item.
    ///
    /// Phase one persists the purchase; phase two saves the inventory bumps
    /// one record at a time. There is no rollback across the phases.
    pub fn receive(&self, id: &str) -> Result<ReceiveOutcome> {
        let purchase = PURCHASES.get(self.backend, id)?;
        match purchase.status {
            PurchaseStatus::Delivered => {
                return Err(KontorError::Validation(format!(
                    "purchase {} is already delivered",
                    id
                )))
            }
            PurchaseStatus::Cancelled => {
                return Err(KontorError::Validation(format!(
                    "purchase {} is cancelled",
                    id
                )))
            }
            _ => {}
        }

        let now = Utc::now();
        let purchase = PURCHASES.modify(self.backend, id, move |p| {
            p.status = PurchaseStatus::Delivered;
            p.delivered_at = Some(now);
        })?;

        let inventory = INVENTORY.load_all(self.backend);
        let mut adjusted = Vec::new();
        let mut unmatched = Vec::new();
        for item in &purchase.items {
            let matched = inventory.iter().find(|inv| inv.sku == item.product_id);
            match matched {
                Some(inv) => {
                    let quantity = item.quantity;
                    let bumped = INVENTORY.modify(self.backend, &inv.id, move |record| {
                        record.current_stock = record.current_stock.saturating_add(quantity);
                    })?;
                    adjusted.push(bumped);
                }
                None => unmatched.push(item.product_id.clone()),
            }
        }

        Ok(ReceiveOutcome {
            purchase,
            adjusted,
            unmatched,
        })
    }

    pub fn purge(&self, id: &str) -> Result<bool> {
        PURCHASES.permanent_delete(self.backend, id)
    }

    pub fn list(&self) -> Vec<Purchase> {
        PURCHASES.load_all(self.backend)
    }

    pub fn search(&self, query: &str) -> Vec<Purchase> {
        PURCHASES.search(self.backend, query)
    }

    pub fn filter(&self, filter: &PurchaseFilter) -> Vec<Purchase> {
        let mut matched: Vec<Purchase> = PURCHASES
            .load_all(self.backend)
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect();
        if let Some(sort) = filter.sort {
            sort_purchases(&mut matched, sort);
        }
        matched
    }

    pub fn stats(&self) -> PurchaseStats {
        let purchases = PURCHASES.load_all(self.backend);
        let counted = |p: &Purchase| p.status != PurchaseStatus::Cancelled;
        let counted_n = purchases.iter().filter(|p| counted(p)).count();
        let amount = stats::sum_where(&purchases, counted, |p| p.total);
        PurchaseStats {
            total: purchases.len(),
            by_status: stats::count_by(&purchases, |p| p.status.as_str().to_string()),
            total_amount: amount,
            avg_amount: stats::average(amount, counted_n),
        }
    }
}
