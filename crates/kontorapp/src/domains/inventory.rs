//! # Inventory
//!
//! Stock records are stored under `warehouse_inventory` in creation order.
//! `sku` is unique (exact match). Stock arithmetic never goes negative:
//! subtracting more than is on hand clamps to zero.

use crate::error::{KontorError, Result};
use crate::record::{InsertOrder, Patch, Record, SoftDelete, UniqueKey};
use crate::store::{stats, Collection, StorageBackend};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const INVENTORY_KEY: &str = "warehouse_inventory";

pub(crate) const INVENTORY: Collection<InventoryItem> =
    Collection::new(INVENTORY_KEY, InsertOrder::Append);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryStatus {
    Active,
    Inactive,
    Deleted,
}

impl InventoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryStatus::Active => "active",
            InventoryStatus::Inactive => "inactive",
            InventoryStatus::Deleted => "deleted",
        }
    }
}

/// How `update_stock` interprets its quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAdjustment {
    Add,
    Subtract,
    Set,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub supplier_id: String,
    pub current_stock: u32,
    pub min_stock: u32,
    pub max_stock: u32,
    pub unit_cost: f64,
    pub location: String,
    pub status: InventoryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl InventoryItem {
    /// Stock value on hand.
    pub fn value(&self) -> f64 {
        self.current_stock as f64 * self.unit_cost
    }

    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.min_stock
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewInventoryItem {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub supplier_id: String,
    pub current_stock: u32,
    pub min_stock: u32,
    pub max_stock: u32,
    pub unit_cost: f64,
    pub location: String,
}

#[derive(Debug, Clone, Default)]
pub struct InventoryPatch {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub supplier_id: Option<String>,
    pub min_stock: Option<u32>,
    pub max_stock: Option<u32>,
    pub unit_cost: Option<f64>,
    pub location: Option<String>,
}

impl Patch<InventoryItem> for InventoryPatch {
    fn apply(self, target: &mut InventoryItem) {
        if let Some(v) = self.sku {
            target.sku = v;
        }
        if let Some(v) = self.name {
            target.name = v;
        }
        if let Some(v) = self.category {
            target.category = v;
        }
        if let Some(v) = self.supplier_id {
            target.supplier_id = v;
        }
        if let Some(v) = self.min_stock {
            target.min_stock = v;
        }
        if let Some(v) = self.max_stock {
            target.max_stock = v;
        }
        if let Some(v) = self.unit_cost {
            target.unit_cost = v;
        }
        if let Some(v) = self.location {
            target.location = v;
        }
    }
}

impl Record for InventoryItem {
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
        vec![UniqueKey::exact("sku", &self.sku)]
    }

    fn search_text(&self) -> Vec<String> {
        vec![
            self.sku.clone(),
            self.name.clone(),
            self.category.clone(),
            self.location.clone(),
        ]
    }
}

impl SoftDelete for InventoryItem {
    fn is_deleted(&self) -> bool {
        self.status == InventoryStatus::Deleted
    }

    fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.status = InventoryStatus::Deleted;
        self.deleted_at = Some(at);
    }

    fn mark_restored(&mut self) {
        self.status = InventoryStatus::Active;
        self.deleted_at = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventorySort {
    StockLow,
    StockHigh,
    /// currentStock × unitCost, descending.
    ValueHigh,
    Name,
    Newest,
}

#[derive(Debug, Clone, Default)]
pub struct InventoryFilter {
    pub category: Option<String>,
    pub supplier_id: Option<String>,
    pub status: Option<InventoryStatus>,
    pub low_stock_only: bool,
    pub sort: Option<InventorySort>,
}

impl InventoryFilter {
    fn matches(&self, item: &InventoryItem) -> bool {
        if let Some(category) = &self.category {
            if &item.category != category {
                return false;
            }
        }
        if let Some(supplier_id) = &self.supplier_id {
            if &item.supplier_id != supplier_id {
                return false;
            }
        }
        match self.status {
            Some(status) if item.status != status => return false,
            // With no explicit status filter, deleted items stay hidden
            None if item.status == InventoryStatus::Deleted => return false,
            _ => {}
        }
        if self.low_stock_only && !item.is_low_stock() {
            return false;
        }
        true
    }
}

fn sort_items(items: &mut [InventoryItem], sort: InventorySort) {
    match sort {
        InventorySort::StockLow => items.sort_by(|a, b| a.current_stock.cmp(&b.current_stock)),
        InventorySort::StockHigh => items.sort_by(|a, b| b.current_stock.cmp(&a.current_stock)),
        InventorySort::ValueHigh => items.sort_by(|a, b| b.value().total_cmp(&a.value())),
        InventorySort::Name => items.sort_by(|a, b| a.name.cmp(&b.name)),
        InventorySort::Newest => items.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryStats {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
    pub total_value: f64,
    pub low_stock: usize,
}

pub struct InventoryService<'a, B> {
    backend: &'a B,
}

impl<'a, B: StorageBackend> InventoryService<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    pub fn initialize(&self, seed: &[InventoryItem]) -> Result<()> {
        INVENTORY.initialize(self.backend, seed)
    }

    pub fn create(&self, input: NewInventoryItem) -> Result<InventoryItem> {
        if input.sku.trim().is_empty() {
            return Err(KontorError::Validation("sku must not be empty".into()));
        }
        if input.name.trim().is_empty() {
            return Err(KontorError::Validation("name must not be empty".into()));
        }

        let now = Utc::now();
        let item = InventoryItem {
            id: Uuid::new_v4().to_string(),
            sku: input.sku,
            name: input.name,
            category: input.category,
            supplier_id: input.supplier_id,
            current_stock: input.current_stock,
            min_stock: input.min_stock,
            max_stock: input.max_stock,
            unit_cost: input.unit_cost,
            location: input.location,
            status: InventoryStatus::Active,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        INVENTORY.create(self.backend, item)
    }

    pub fn get(&self, id: &str) -> Result<InventoryItem> {
        INVENTORY.get(self.backend, id)
    }

    pub fn find_by_sku(&self, sku: &str) -> Option<InventoryItem> {
        INVENTORY
            .load_all(self.backend)
            .into_iter()
            .find(|item| item.sku == sku)
    }

    pub fn update(&self, id: &str, patch: InventoryPatch) -> Result<InventoryItem> {
        INVENTORY.update(self.backend, id, patch)
    }

    pub fn delete(&self, id: &str) -> Result<InventoryItem> {
        INVENTORY.soft_delete(self.backend, id)
    }

    pub fn restore(&self, id: &str) -> Result<InventoryItem> {
        INVENTORY.restore(self.backend, id)
    }

    pub fn purge(&self, id: &str) -> Result<bool> {
        INVENTORY.permanent_delete(self.backend, id)
    }

    /// Adjust stock. Subtracting below zero clamps to zero.
    pub fn update_stock(
        &self,
        id: &str,
        quantity: u32,
        mode: StockAdjustment,
    ) -> Result<InventoryItem> {
        INVENTORY.modify(self.backend, id, move |item| {
            item.current_stock = match mode {
                StockAdjustment::Add => item.current_stock.saturating_add(quantity),
                StockAdjustment::Subtract => item.current_stock.saturating_sub(quantity),
                StockAdjustment::Set => quantity,
            };
        })
    }

    pub fn list(&self) -> Vec<InventoryItem> {
        INVENTORY.load_all(self.backend)
    }

    pub fn list_low_stock(&self) -> Vec<InventoryItem> {
        INVENTORY
            .load_all(self.backend)
            .into_iter()
            .filter(|item| item.status == InventoryStatus::Active && item.is_low_stock())
            .collect()
    }

    pub fn search(&self, query: &str) -> Vec<InventoryItem> {
        INVENTORY.search(self.backend, query)
    }

    pub fn filter(&self, filter: &InventoryFilter) -> Vec<InventoryItem> {
        let mut matched: Vec<InventoryItem> = INVENTORY
            .load_all(self.backend)
            .into_iter()
            .filter(|item| filter.matches(item))
            .collect();
        if let Some(sort) = filter.sort {
            sort_items(&mut matched, sort);
        }
        matched
    }

    pub fn stats(&self) -> InventoryStats {
        let items = INVENTORY.load_all(self.backend);
        InventoryStats {
            total: items.len(),
            by_status: stats::count_by(&items, |i| i.status.as_str().to_string()),
            by_category: stats::count_by(&items, |i| i.category.clone()),
            total_value: items.iter().map(|i| i.value()).sum(),
            low_stock: items
                .iter()
                .filter(|i| i.status == InventoryStatus::Active && i.is_low_stock())
                .count(),
        }
    }
}
