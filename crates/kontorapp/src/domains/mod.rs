//! # Domain Layer
//!
//! One module per persisted collection. Each follows the same shape: the
//! record struct (field names byte-compatible with the stored JSON), a
//! `New*` input struct, a `*Patch` for partial updates, a typed filter with
//! its named sort orders where the domain has one, a stats struct, and a
//! service type borrowing the storage backend.
//!
//! Services hold no state beyond the backend reference; constructing one is
//! free and has no side effects. Seeding happens only through the explicit
//! `initialize` methods, which never overwrite existing data.
//!
//! - [`products`]: catalog, newest-first, derived sale price
//! - [`users`]: staff accounts and permissions
//! - [`sellers`]: marketplace sellers, dual uniqueness, system-record guard
//! - [`suppliers`]: warehouse supplier directory
//! - [`inventory`]: stock records, sku-unique, clamped arithmetic
//! - [`purchases`]: purchase orders, computed totals, two-phase receiving

pub mod inventory;
pub mod products;
pub mod purchases;
pub mod sellers;
pub mod suppliers;
pub mod users;
