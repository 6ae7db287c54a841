//! # kontorapp
//!
//! The back-office data layer of an e-commerce administration system:
//! product catalog, user and seller administration, and the warehouse
//! domain (suppliers, inventory, purchase orders).
//!
//! Every domain is one named collection of records persisted as a single
//! JSON array under a string key — the model the data was migrated from.
//! The recurring CRUD pattern lives once, in [`store::Collection`]; the
//! domain modules configure it and layer their rules on top (uniqueness,
//! derived prices, stock arithmetic, purchase totals).
//!
//! ```no_run
//! use kontorapp::api::Kontor;
//! use kontorapp::config::KontorConfig;
//! use kontorapp::domains::products::NewProduct;
//!
//! let kontor = Kontor::open(KontorConfig::default());
//! let product = kontor.products().create(NewProduct {
//!     title: "Widget".into(),
//!     price: 100.0,
//!     discount: 10.0,
//!     ..Default::default()
//! })?;
//! assert_eq!(product.sales_price, 90.0);
//! # Ok::<(), kontorapp::error::KontorError>(())
//! ```
//!
//! ## Write model
//!
//! Single-threaded, synchronous. Every mutation is a full
//! load → transform → save of one collection blob; the last full write
//! wins. Reads fail open: malformed data loads as empty and is logged.

pub mod api;
pub mod config;
pub mod domains;
pub mod error;
pub mod record;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use api::Kontor;
pub use config::KontorConfig;
pub use error::{KontorError, Result};
