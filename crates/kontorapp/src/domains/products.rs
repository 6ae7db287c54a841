//! # Product Catalog
//!
//! Products are stored under `Kontainar-products`, newest first. The stored
//! JSON keeps the original field names (camelCase, including the
//! `isActive`/`isDeleted` boolean pair) so existing data loads unchanged.
//!
//! `salesPrice` is derived: `price * (1 - discount / 100)`, recomputed on
//! create and on every update, since a patch may touch price or discount.

use crate::error::{KontorError, Result};
use crate::record::{InsertOrder, Patch, Record, SoftDelete};
use crate::store::{stats, Collection, StorageBackend};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const PRODUCTS_KEY: &str = "Kontainar-products";

const PRODUCTS: Collection<Product> = Collection::new(PRODUCTS_KEY, InsertOrder::Prepend);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub discount: f64,
    pub sales_price: f64,
    pub category: String,
    pub subcategory: String,
    pub gender: String,
    pub brand: String,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub stock: u32,
    pub is_active: bool,
    pub is_deleted: bool,
    pub rating: f64,
    pub reviews: u32,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    #[serde(default)]
    pub specifications: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Input for creating a product. Rating and review counters start at zero;
/// the id and timestamps are assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub discount: f64,
    pub category: String,
    pub subcategory: String,
    pub gender: String,
    pub brand: String,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub stock: u32,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub specifications: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub discount: Option<f64>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub gender: Option<String>,
    pub brand: Option<String>,
    pub colors: Option<Vec<String>>,
    pub sizes: Option<Vec<String>>,
    pub stock: Option<u32>,
    pub rating: Option<f64>,
    pub reviews: Option<u32>,
    pub images: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub specifications: Option<BTreeMap<String, String>>,
}

impl Patch<Product> for ProductPatch {
    fn apply(self, target: &mut Product) {
        if let Some(v) = self.title {
            target.title = v;
        }
        if let Some(v) = self.description {
            target.description = v;
        }
        if let Some(v) = self.price {
            target.price = v;
        }
        if let Some(v) = self.discount {
            target.discount = v;
        }
        if let Some(v) = self.category {
            target.category = v;
        }
        if let Some(v) = self.subcategory {
            target.subcategory = v;
        }
        if let Some(v) = self.gender {
            target.gender = v;
        }
        if let Some(v) = self.brand {
            target.brand = v;
        }
        if let Some(v) = self.colors {
            target.colors = v;
        }
        if let Some(v) = self.sizes {
            target.sizes = v;
        }
        if let Some(v) = self.stock {
            target.stock = v;
        }
        if let Some(v) = self.rating {
            target.rating = v;
        }
        if let Some(v) = self.reviews {
            target.reviews = v;
        }
        if let Some(v) = self.images {
            target.images = v;
        }
        if let Some(v) = self.tags {
            target.tags = v;
        }
        if let Some(v) = self.specifications {
            target.specifications = v;
        }
        // Price or discount may have changed; the derived field follows.
        target.sales_price = sales_price(target.price, target.discount);
    }
}

impl Record for Product {
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
        let mut fields = vec![
            self.title.clone(),
            self.description.clone(),
            self.brand.clone(),
            self.category.clone(),
        ];
        fields.extend(self.tags.iter().cloned());
        fields
    }
}

impl SoftDelete for Product {
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.is_active = false;
        self.is_deleted = true;
        self.deleted_at = Some(at);
    }

    fn mark_restored(&mut self) {
        self.is_active = true;
        self.is_deleted = false;
        self.deleted_at = None;
    }
}

pub fn sales_price(price: f64, discount: f64) -> f64 {
    round2(price * (1.0 - discount / 100.0))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSort {
    PriceLow,
    PriceHigh,
    Rating,
    Newest,
    Oldest,
    Name,
    StockLow,
    StockHigh,
}

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub gender: Option<String>,
    pub brand: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Match if the product offers any of these colors.
    pub colors: Vec<String>,
    /// Match if the product offers any of these sizes.
    pub sizes: Vec<String>,
    /// Match if the product carries any of these tags.
    pub tags: Vec<String>,
    /// Admin views include inactive products; storefront views do not.
    pub include_inactive: bool,
    pub sort: Option<ProductSort>,
}

impl ProductFilter {
    fn matches(&self, product: &Product) -> bool {
        if product.is_deleted {
            return false;
        }
        if !self.include_inactive && !product.is_active {
            return false;
        }
        if let Some(category) = &self.category {
            if &product.category != category {
                return false;
            }
        }
        if let Some(subcategory) = &self.subcategory {
            if &product.subcategory != subcategory {
                return false;
            }
        }
        if let Some(gender) = &self.gender {
            if &product.gender != gender {
                return false;
            }
        }
        if let Some(brand) = &self.brand {
            if &product.brand != brand {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if product.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price > max {
                return false;
            }
        }
        if !self.colors.is_empty() && !intersects(&product.colors, &self.colors) {
            return false;
        }
        if !self.sizes.is_empty() && !intersects(&product.sizes, &self.sizes) {
            return false;
        }
        if !self.tags.is_empty() && !intersects(&product.tags, &self.tags) {
            return false;
        }
        true
    }
}

fn intersects(have: &[String], want: &[String]) -> bool {
    want.iter().any(|w| have.contains(w))
}

fn sort_products(products: &mut [Product], sort: ProductSort) {
    match sort {
        ProductSort::PriceLow => {
            products.sort_by(|a, b| a.price.total_cmp(&b.price));
        }
        ProductSort::PriceHigh => {
            products.sort_by(|a, b| b.price.total_cmp(&a.price));
        }
        ProductSort::Rating => {
            products.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        }
        ProductSort::Newest => {
            products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        ProductSort::Oldest => {
            products.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        }
        ProductSort::Name => {
            products.sort_by(|a, b| a.title.cmp(&b.title));
        }
        ProductSort::StockLow => {
            products.sort_by(|a, b| a.stock.cmp(&b.stock));
        }
        ProductSort::StockHigh => {
            products.sort_by(|a, b| b.stock.cmp(&a.stock));
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub deleted: usize,
    pub by_category: BTreeMap<String, usize>,
    pub total_stock: u64,
    pub avg_rating: f64,
}

pub struct ProductsService<'a, B> {
    backend: &'a B,
}

impl<'a, B: StorageBackend> ProductsService<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    pub fn initialize(&self, seed: &[Product]) -> Result<()> {
        PRODUCTS.initialize(self.backend, seed)
    }

    pub fn create(&self, input: NewProduct) -> Result<Product> {
        if input.title.trim().is_empty() {
            return Err(KontorError::Validation("title must not be empty".into()));
        }
        if input.price < 0.0 {
            return Err(KontorError::Validation("price must not be negative".into()));
        }
        if !(0.0..=100.0).contains(&input.discount) {
            return Err(KontorError::Validation(
                "discount must be between 0 and 100".into(),
            ));
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            sales_price: sales_price(input.price, input.discount),
            title: input.title,
            description: input.description,
            price: input.price,
            discount: input.discount,
            category: input.category,
            subcategory: input.subcategory,
            gender: input.gender,
            brand: input.brand,
            colors: input.colors,
            sizes: input.sizes,
            stock: input.stock,
            is_active: true,
            is_deleted: false,
            rating: 0.0,
            reviews: 0,
            images: input.images,
            tags: input.tags,
            specifications: input.specifications,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        PRODUCTS.create(self.backend, product)
    }

    pub fn get(&self, id: &str) -> Result<Product> {
        PRODUCTS.get(self.backend, id)
    }

    pub fn update(&self, id: &str, patch: ProductPatch) -> Result<Product> {
        PRODUCTS.update(self.backend, id, patch)
    }

    pub fn delete(&self, id: &str) -> Result<Product> {
        PRODUCTS.soft_delete(self.backend, id)
    }

    pub fn restore(&self, id: &str) -> Result<Product> {
        PRODUCTS.restore(self.backend, id)
    }

    pub fn purge(&self, id: &str) -> Result<bool> {
        PRODUCTS.permanent_delete(self.backend, id)
    }

    /// Flip active ⇄ inactive. Deleted products cannot be toggled; they go
    /// through `restore` first.
    pub fn toggle_active(&self, id: &str) -> Result<Product> {
        let current = PRODUCTS.get(self.backend, id)?;
        if current.is_deleted {
            return Err(KontorError::Validation(
                "cannot toggle a deleted product".into(),
            ));
        }
        PRODUCTS.modify(self.backend, id, |p| p.is_active = !p.is_active)
    }

    /// Everything, including soft-deleted records. The admin view.
    pub fn list_admin(&self) -> Vec<Product> {
        PRODUCTS.load_all(self.backend)
    }

    /// Active, non-deleted products only. The storefront view.
    pub fn list_storefront(&self) -> Vec<Product> {
        PRODUCTS
            .load_all(self.backend)
            .into_iter()
            .filter(|p| p.is_active && !p.is_deleted)
            .collect()
    }

    pub fn search(&self, query: &str) -> Vec<Product> {
        PRODUCTS.search(self.backend, query)
    }

    pub fn filter(&self, filter: &ProductFilter) -> Vec<Product> {
        let mut matched: Vec<Product> = PRODUCTS
            .load_all(self.backend)
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect();
        if let Some(sort) = filter.sort {
            sort_products(&mut matched, sort);
        }
        matched
    }

    pub fn stats(&self) -> ProductStats {
        let products = PRODUCTS.load_all(self.backend);
        let deleted = products.iter().filter(|p| p.is_deleted).count();
        let active = products
            .iter()
            .filter(|p| p.is_active && !p.is_deleted)
            .count();
        let rating_sum = stats::sum_where(
            &products,
            |p: &Product| p.is_active && !p.is_deleted,
            |p| p.rating,
        );
        ProductStats {
            total: products.len(),
            active,
            inactive: products.len() - active - deleted,
            deleted,
            by_category: stats::count_by(&products, |p| p.category.clone()),
            total_stock: products.iter().map(|p| p.stock as u64).sum(),
            avg_rating: stats::average(rating_sum, active),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    fn widget() -> NewProduct {
        NewProduct {
            title: "Widget".into(),
            price: 100.0,
            discount: 10.0,
            category: "tools".into(),
            brand: "Acme".into(),
            stock: 5,
            ..Default::default()
        }
    }

    #[test]
    fn create_derives_sales_price() {
        let backend = MemBackend::new();
        let service = ProductsService::new(&backend);

        let product = service.create(widget()).unwrap();
        assert_eq!(product.sales_price, 90.0);
        assert!(product.is_active);
        assert!(!product.is_deleted);
    }

    #[test]
    fn update_recomputes_sales_price() {
        let backend = MemBackend::new();
        let service = ProductsService::new(&backend);
        let product = service.create(widget()).unwrap();

        let updated = service
            .update(
                &product.id,
                ProductPatch {
                    discount: Some(50.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.sales_price, 50.0);

        let repriced = service
            .update(
                &product.id,
                ProductPatch {
                    price: Some(80.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(repriced.sales_price, 40.0);
    }

    #[test]
    fn delete_restore_purge_lifecycle() {
        let backend = MemBackend::new();
        let service = ProductsService::new(&backend);
        let product = service.create(widget()).unwrap();

        let deleted = service.delete(&product.id).unwrap();
        assert!(!deleted.is_active);
        assert!(deleted.is_deleted);
        assert!(deleted.deleted_at.is_some());

        let restored = service.restore(&product.id).unwrap();
        assert!(restored.is_active);
        assert!(!restored.is_deleted);
        assert!(restored.deleted_at.is_none());

        assert!(service.purge(&product.id).unwrap());
        assert!(service.list_admin().is_empty());
    }

    #[test]
    fn storefront_hides_inactive_and_deleted() {
        let backend = MemBackend::new();
        let service = ProductsService::new(&backend);
        let shown = service.create(widget()).unwrap();
        let hidden = service
            .create(NewProduct {
                title: "Hidden".into(),
                ..widget()
            })
            .unwrap();
        let gone = service
            .create(NewProduct {
                title: "Gone".into(),
                ..widget()
            })
            .unwrap();

        service.toggle_active(&hidden.id).unwrap();
        service.delete(&gone.id).unwrap();

        let storefront = service.list_storefront();
        assert_eq!(storefront.len(), 1);
        assert_eq!(storefront[0].id, shown.id);

        // Admin still sees all three
        assert_eq!(service.list_admin().len(), 3);
    }

    #[test]
    fn toggle_active_rejects_deleted_product() {
        let backend = MemBackend::new();
        let service = ProductsService::new(&backend);
        let product = service.create(widget()).unwrap();
        service.delete(&product.id).unwrap();

        let err = service.toggle_active(&product.id).unwrap_err();
        assert!(matches!(err, KontorError::Validation(_)));
    }

    #[test]
    fn newest_products_come_first() {
        let backend = MemBackend::new();
        let service = ProductsService::new(&backend);
        service.create(widget()).unwrap();
        service
            .create(NewProduct {
                title: "Newer".into(),
                ..widget()
            })
            .unwrap();

        let all = service.list_admin();
        assert_eq!(all[0].title, "Newer");
        assert_eq!(all[1].title, "Widget");
    }

    #[test]
    fn filter_by_category_price_range_and_color() {
        let backend = MemBackend::new();
        let service = ProductsService::new(&backend);
        service
            .create(NewProduct {
                title: "Cheap Red".into(),
                price: 10.0,
                discount: 0.0,
                colors: vec!["red".into()],
                ..widget()
            })
            .unwrap();
        service
            .create(NewProduct {
                title: "Pricey Blue".into(),
                price: 500.0,
                discount: 0.0,
                colors: vec!["blue".into()],
                ..widget()
            })
            .unwrap();

        let cheap = service.filter(&ProductFilter {
            category: Some("tools".into()),
            max_price: Some(100.0),
            ..Default::default()
        });
        assert_eq!(cheap.len(), 1);
        assert_eq!(cheap[0].title, "Cheap Red");

        let blue = service.filter(&ProductFilter {
            colors: vec!["blue".into()],
            ..Default::default()
        });
        assert_eq!(blue.len(), 1);
        assert_eq!(blue[0].title, "Pricey Blue");
    }

    #[test]
    fn filter_sorts_by_price() {
        let backend = MemBackend::new();
        let service = ProductsService::new(&backend);
        service
            .create(NewProduct {
                title: "Mid".into(),
                price: 50.0,
                ..widget()
            })
            .unwrap();
        service
            .create(NewProduct {
                title: "Low".into(),
                price: 5.0,
                ..widget()
            })
            .unwrap();
        service
            .create(NewProduct {
                title: "High".into(),
                price: 500.0,
                ..widget()
            })
            .unwrap();

        let sorted = service.filter(&ProductFilter {
            sort: Some(ProductSort::PriceLow),
            ..Default::default()
        });
        let titles: Vec<&str> = sorted.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Low", "Mid", "High"]);
    }

    #[test]
    fn stats_counts_reconcile_with_total() {
        let backend = MemBackend::new();
        let service = ProductsService::new(&backend);
        let a = service.create(widget()).unwrap();
        let b = service
            .create(NewProduct {
                title: "B".into(),
                ..widget()
            })
            .unwrap();
        service
            .create(NewProduct {
                title: "C".into(),
                ..widget()
            })
            .unwrap();
        service.toggle_active(&a.id).unwrap();
        service.delete(&b.id).unwrap();

        let stats = service.stats();
        assert_eq!(stats.total, service.list_admin().len());
        assert_eq!(stats.active + stats.inactive + stats.deleted, stats.total);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.inactive, 1);
        assert_eq!(stats.deleted, 1);
        assert_eq!(stats.total_stock, 15);
    }

    #[test]
    fn stats_tolerate_empty_collection() {
        let backend = MemBackend::new();
        let service = ProductsService::new(&backend);
        let stats = service.stats();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.avg_rating, 0.0);
    }

    #[test]
    fn create_rejects_out_of_range_discount() {
        let backend = MemBackend::new();
        let service = ProductsService::new(&backend);
        let err = service
            .create(NewProduct {
                discount: 120.0,
                ..widget()
            })
            .unwrap_err();
        assert!(matches!(err, KontorError::Validation(_)));
    }

    #[test]
    fn stored_json_uses_original_field_names() {
        let backend = MemBackend::new();
        let service = ProductsService::new(&backend);
        service.create(widget()).unwrap();

        let raw = backend.read(PRODUCTS_KEY).unwrap().unwrap();
        assert!(raw.contains("\"salesPrice\""));
        assert!(raw.contains("\"isActive\""));
        assert!(raw.contains("\"isDeleted\""));
        assert!(raw.contains("\"createdAt\""));
    }
}
