//! Clap argument definitions. Parsing only; dispatch lives in
//! `commands.rs` and all business logic in the `kontorapp` library.

use clap::{Args, Parser, Subcommand, ValueEnum};
use kontorapp::domains::inventory::{InventorySort, StockAdjustment};
use kontorapp::domains::products::ProductSort;
use kontorapp::domains::purchases::{NewPurchaseItem, PurchaseSort, PurchaseStatus};
use kontorapp::domains::sellers::SellerStatus;
use kontorapp::domains::users::UserStatus;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kontor", about = "E-commerce back-office administration", version)]
pub struct Cli {
    /// Directory holding the collection files (overrides config)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Path to kontor.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Product catalog
    #[command(subcommand)]
    Products(ProductsCmd),
    /// Staff accounts
    #[command(subcommand)]
    Users(UsersCmd),
    /// Marketplace sellers
    #[command(subcommand)]
    Sellers(SellersCmd),
    /// Warehouse suppliers
    #[command(subcommand)]
    Suppliers(SuppliersCmd),
    /// Warehouse stock
    #[command(subcommand)]
    Inventory(InventoryCmd),
    /// Purchase orders
    #[command(subcommand)]
    Purchases(PurchasesCmd),
}

// ─── Products ────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum ProductsCmd {
    /// List products (storefront view by default)
    List(ProductListArgs),
    /// Show one product
    Show { id: String },
    /// Create a product
    Add(ProductAddArgs),
    /// Update fields on a product
    Update(ProductUpdateArgs),
    /// Soft-delete a product
    Rm { id: String },
    /// Restore a soft-deleted product
    Restore { id: String },
    /// Permanently remove a product
    Purge { id: String },
    /// Flip active/inactive
    Toggle { id: String },
    /// Substring search over title, description, brand, category, tags
    Search { query: String },
    /// Catalog statistics
    Stats,
}

#[derive(Args, Debug)]
pub struct ProductListArgs {
    /// Include inactive and deleted products (admin view)
    #[arg(long)]
    pub all: bool,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub gender: Option<String>,
    #[arg(long)]
    pub min_price: Option<f64>,
    #[arg(long)]
    pub max_price: Option<f64>,
    #[arg(long, value_enum)]
    pub sort: Option<ProductSortArg>,
}

#[derive(Args, Debug)]
pub struct ProductAddArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value_t = 0.0)]
    pub price: f64,
    #[arg(long, default_value_t = 0.0)]
    pub discount: f64,
    #[arg(long, default_value = "")]
    pub category: String,
    #[arg(long, default_value = "")]
    pub subcategory: String,
    #[arg(long, default_value = "")]
    pub gender: String,
    #[arg(long, default_value = "")]
    pub brand: String,
    #[arg(long, default_value_t = 0)]
    pub stock: u32,
    #[arg(long = "color")]
    pub colors: Vec<String>,
    #[arg(long = "size")]
    pub sizes: Vec<String>,
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ProductUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub price: Option<f64>,
    #[arg(long)]
    pub discount: Option<f64>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub stock: Option<u32>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ProductSortArg {
    PriceLow,
    PriceHigh,
    Rating,
    Newest,
    Oldest,
    Name,
    StockLow,
    StockHigh,
}

impl From<ProductSortArg> for ProductSort {
    fn from(arg: ProductSortArg) -> Self {
        match arg {
            ProductSortArg::PriceLow => ProductSort::PriceLow,
            ProductSortArg::PriceHigh => ProductSort::PriceHigh,
            ProductSortArg::Rating => ProductSort::Rating,
            ProductSortArg::Newest => ProductSort::Newest,
            ProductSortArg::Oldest => ProductSort::Oldest,
            ProductSortArg::Name => ProductSort::Name,
            ProductSortArg::StockLow => ProductSort::StockLow,
            ProductSortArg::StockHigh => ProductSort::StockHigh,
        }
    }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum UsersCmd {
    /// List users
    List {
        #[arg(long, value_enum)]
        status: Option<UserStatusArg>,
    },
    Show {
        id: String,
    },
    Add(UserAddArgs),
    /// Soft-delete a user
    Rm {
        id: String,
    },
    Restore {
        id: String,
    },
    Purge {
        id: String,
    },
    /// Flip active/inactive
    Toggle {
        id: String,
    },
    /// Grant a permission string
    Grant {
        id: String,
        permission: String,
    },
    /// Revoke a permission string
    Revoke {
        id: String,
        permission: String,
    },
    Search {
        query: String,
    },
    Stats,
}

#[derive(Args, Debug)]
pub struct UserAddArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long, default_value = "")]
    pub last_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "staff")]
    pub role: String,
    #[arg(long, default_value = "")]
    pub department: String,
    #[arg(long, default_value = "")]
    pub position: String,
    #[arg(long = "permission")]
    pub permissions: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum UserStatusArg {
    Active,
    Inactive,
    Deleted,
}

impl From<UserStatusArg> for UserStatus {
    fn from(arg: UserStatusArg) -> Self {
        match arg {
            UserStatusArg::Active => UserStatus::Active,
            UserStatusArg::Inactive => UserStatus::Inactive,
            UserStatusArg::Deleted => UserStatus::Deleted,
        }
    }
}

// ─── Sellers ─────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum SellersCmd {
    List {
        #[arg(long, value_enum)]
        status: Option<SellerStatusArg>,
    },
    Show {
        id: String,
    },
    Add(SellerAddArgs),
    Rm {
        id: String,
    },
    Restore {
        id: String,
    },
    Purge {
        id: String,
    },
    /// Set status to active
    Activate {
        id: String,
    },
    /// Set status to suspended
    Suspend {
        id: String,
    },
    Search {
        query: String,
    },
    Stats,
}

#[derive(Args, Debug)]
pub struct SellerAddArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long, default_value = "")]
    pub last_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    /// External seller id, unique (e.g. SLR-001)
    #[arg(long)]
    pub seller_id: String,
    #[arg(long, default_value = "")]
    pub business_name: String,
    #[arg(long, default_value = "")]
    pub business_type: String,
    #[arg(long, default_value_t = 10.0)]
    pub commission_rate: f64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SellerStatusArg {
    Active,
    Pending,
    Suspended,
    Deleted,
}

impl From<SellerStatusArg> for SellerStatus {
    fn from(arg: SellerStatusArg) -> Self {
        match arg {
            SellerStatusArg::Active => SellerStatus::Active,
            SellerStatusArg::Pending => SellerStatus::Pending,
            SellerStatusArg::Suspended => SellerStatus::Suspended,
            SellerStatusArg::Deleted => SellerStatus::Deleted,
        }
    }
}

// ─── Suppliers ───────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum SuppliersCmd {
    List {
        /// Only active suppliers
        #[arg(long)]
        active: bool,
    },
    Show {
        id: String,
    },
    Add(SupplierAddArgs),
    Rm {
        id: String,
    },
    Restore {
        id: String,
    },
    Purge {
        id: String,
    },
    Toggle {
        id: String,
    },
    Search {
        query: String,
    },
    Stats,
}

#[derive(Args, Debug)]
pub struct SupplierAddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub contact_person: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub address: String,
    #[arg(long, default_value = "")]
    pub business_type: String,
    #[arg(long, default_value = "net30")]
    pub payment_terms: String,
}

// ─── Inventory ───────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum InventoryCmd {
    List(InventoryListArgs),
    Show {
        id: String,
    },
    Add(InventoryAddArgs),
    /// Adjust stock: exactly one of --add, --subtract, --set
    Adjust(InventoryAdjustArgs),
    Rm {
        id: String,
    },
    Restore {
        id: String,
    },
    Purge {
        id: String,
    },
    Search {
        query: String,
    },
    Stats,
}

#[derive(Args, Debug)]
pub struct InventoryListArgs {
    /// Only items at or below their minimum stock
    #[arg(long)]
    pub low: bool,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub supplier: Option<String>,
    #[arg(long, value_enum)]
    pub sort: Option<InventorySortArg>,
}

#[derive(Args, Debug)]
pub struct InventoryAddArgs {
    #[arg(long)]
    pub sku: String,
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub category: String,
    #[arg(long, default_value = "")]
    pub supplier: String,
    #[arg(long, default_value_t = 0)]
    pub stock: u32,
    #[arg(long, default_value_t = 0)]
    pub min_stock: u32,
    #[arg(long, default_value_t = 0)]
    pub max_stock: u32,
    #[arg(long, default_value_t = 0.0)]
    pub unit_cost: f64,
    #[arg(long, default_value = "")]
    pub location: String,
}

#[derive(Args, Debug)]
pub struct InventoryAdjustArgs {
    pub id: String,
    #[arg(long, group = "adjustment")]
    pub add: Option<u32>,
    #[arg(long, group = "adjustment")]
    pub subtract: Option<u32>,
    #[arg(long, group = "adjustment")]
    pub set: Option<u32>,
}

impl InventoryAdjustArgs {
    pub fn adjustment(&self) -> Option<(u32, StockAdjustment)> {
        if let Some(quantity) = self.add {
            return Some((quantity, StockAdjustment::Add));
        }
        if let Some(quantity) = self.subtract {
            return Some((quantity, StockAdjustment::Subtract));
        }
        self.set.map(|quantity| (quantity, StockAdjustment::Set))
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum InventorySortArg {
    StockLow,
    StockHigh,
    ValueHigh,
    Name,
    Newest,
}

impl From<InventorySortArg> for InventorySort {
    fn from(arg: InventorySortArg) -> Self {
        match arg {
            InventorySortArg::StockLow => InventorySort::StockLow,
            InventorySortArg::StockHigh => InventorySort::StockHigh,
            InventorySortArg::ValueHigh => InventorySort::ValueHigh,
            InventorySortArg::Name => InventorySort::Name,
            InventorySortArg::Newest => InventorySort::Newest,
        }
    }
}

// ─── Purchases ───────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum PurchasesCmd {
    List(PurchaseListArgs),
    Show {
        id: String,
    },
    Add(PurchaseAddArgs),
    /// Mark a pending purchase as ordered
    Order {
        id: String,
    },
    /// Cancel a purchase
    Cancel {
        id: String,
    },
    /// Mark delivered and bump inventory stock per line item
    Receive {
        id: String,
    },
    Purge {
        id: String,
    },
    Search {
        query: String,
    },
    Stats,
}

#[derive(Args, Debug)]
pub struct PurchaseListArgs {
    #[arg(long)]
    pub supplier: Option<String>,
    #[arg(long, value_enum)]
    pub status: Option<PurchaseStatusArg>,
    #[arg(long, value_enum)]
    pub sort: Option<PurchaseSortArg>,
}

#[derive(Args, Debug)]
pub struct PurchaseAddArgs {
    #[arg(long)]
    pub supplier: String,
    /// Line item as SKU:QUANTITY:UNIT_COST (repeatable)
    #[arg(long = "item", value_parser = parse_line_item, required = true)]
    pub items: Vec<NewPurchaseItem>,
    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PurchaseStatusArg {
    Pending,
    Ordered,
    Delivered,
    Cancelled,
}

impl From<PurchaseStatusArg> for PurchaseStatus {
    fn from(arg: PurchaseStatusArg) -> Self {
        match arg {
            PurchaseStatusArg::Pending => PurchaseStatus::Pending,
            PurchaseStatusArg::Ordered => PurchaseStatus::Ordered,
            PurchaseStatusArg::Delivered => PurchaseStatus::Delivered,
            PurchaseStatusArg::Cancelled => PurchaseStatus::Cancelled,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PurchaseSortArg {
    AmountHigh,
    AmountLow,
    Newest,
    Oldest,
}

impl From<PurchaseSortArg> for PurchaseSort {
    fn from(arg: PurchaseSortArg) -> Self {
        match arg {
            PurchaseSortArg::AmountHigh => PurchaseSort::AmountHigh,
            PurchaseSortArg::AmountLow => PurchaseSort::AmountLow,
            PurchaseSortArg::Newest => PurchaseSort::Newest,
            PurchaseSortArg::Oldest => PurchaseSort::Oldest,
        }
    }
}

/// Parse `SKU:QUANTITY:UNIT_COST` into a line item.
fn parse_line_item(raw: &str) -> Result<NewPurchaseItem, String> {
    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() != 3 {
        return Err(format!(
            "expected SKU:QUANTITY:UNIT_COST, got \"{}\"",
            raw
        ));
    }
    let product_id = parts[0].trim();
    if product_id.is_empty() {
        return Err("line item SKU must not be empty".to_string());
    }
    let quantity: u32 = parts[1]
        .trim()
        .parse()
        .map_err(|_| format!("invalid quantity \"{}\"", parts[1]))?;
    let unit_cost: f64 = parts[2]
        .trim()
        .parse()
        .map_err(|_| format!("invalid unit cost \"{}\"", parts[2]))?;
    Ok(NewPurchaseItem {
        product_id: product_id.to_string(),
        quantity,
        unit_cost,
    })
}
