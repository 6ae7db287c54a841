//! # API Facade
//!
//! [`Kontor`] is a thin facade over the domain services: it owns the storage
//! backend and the configuration, and hands out one service per domain. All
//! business logic lives in `domains/*`; all raw I/O lives in `store/*`.
//!
//! Generic over `StorageBackend`:
//! - Production: `Kontor<FsBackend>` via [`Kontor::open`]
//! - Testing: `Kontor<MemBackend>` via [`Kontor::in_memory`]
//!
//! Construction has no side effects. Seeding is explicit and idempotent,
//! through the per-domain `initialize` methods.

use crate::config::KontorConfig;
use crate::domains::inventory::InventoryService;
use crate::domains::products::ProductsService;
use crate::domains::purchases::{PurchaseSettings, PurchasesService};
use crate::domains::sellers::SellersService;
use crate::domains::suppliers::SuppliersService;
use crate::domains::users::UsersService;
use crate::store::fs_backend::FsBackend;
use crate::store::mem_backend::MemBackend;
use crate::store::StorageBackend;

pub struct Kontor<B: StorageBackend> {
    backend: B,
    config: KontorConfig,
}

impl Kontor<FsBackend> {
    /// Open the store at the configured data directory.
    pub fn open(config: KontorConfig) -> Self {
        let backend = FsBackend::new(config.resolve_data_dir());
        Self { backend, config }
    }
}

impl Kontor<MemBackend> {
    pub fn in_memory() -> Self {
        Self {
            backend: MemBackend::new(),
            config: KontorConfig::default(),
        }
    }
}

impl<B: StorageBackend> Kontor<B> {
    pub fn with_backend(backend: B, config: KontorConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &KontorConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn products(&self) -> ProductsService<'_, B> {
        ProductsService::new(&self.backend)
    }

    pub fn users(&self) -> UsersService<'_, B> {
        UsersService::new(&self.backend)
    }

    pub fn sellers(&self) -> SellersService<'_, B> {
        SellersService::new(&self.backend)
    }

    pub fn suppliers(&self) -> SuppliersService<'_, B> {
        SuppliersService::new(&self.backend)
    }

    pub fn inventory(&self) -> InventoryService<'_, B> {
        InventoryService::new(&self.backend)
    }

    pub fn purchases(&self) -> PurchasesService<'_, B> {
        PurchasesService::new(
            &self.backend,
            PurchaseSettings {
                tax_rate: self.config.tax_rate,
                number_prefix: self.config.purchase_prefix.clone(),
            },
        )
    }
}
