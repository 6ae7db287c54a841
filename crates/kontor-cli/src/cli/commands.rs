//! Command dispatch: wires parsed arguments to the library services and
//! hands the results to the renderer. No business logic lives here.

use super::args::{
    Cli, Command, InventoryCmd, ProductsCmd, PurchasesCmd, SellersCmd, SuppliersCmd, UsersCmd,
};
use super::render;
use kontorapp::domains::inventory::{InventoryFilter, NewInventoryItem};
use kontorapp::domains::products::{NewProduct, ProductFilter, ProductPatch};
use kontorapp::domains::purchases::{NewPurchase, PurchaseFilter};
use kontorapp::domains::sellers::NewSeller;
use kontorapp::domains::suppliers::NewSupplier;
use kontorapp::domains::users::NewUser;
use kontorapp::store::fs_backend::FsBackend;
use kontorapp::{Kontor, KontorConfig, KontorError, Result};

pub fn run(cli: Cli) -> Result<()> {
    let mut config = KontorConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    log::debug!("using data dir {}", config.resolve_data_dir().display());
    let kontor = Kontor::open(config);

    match cli.command {
        Command::Products(cmd) => products(&kontor, cmd),
        Command::Users(cmd) => users(&kontor, cmd),
        Command::Sellers(cmd) => sellers(&kontor, cmd),
        Command::Suppliers(cmd) => suppliers(&kontor, cmd),
        Command::Inventory(cmd) => inventory(&kontor, cmd),
        Command::Purchases(cmd) => purchases(&kontor, cmd),
    }
}

fn products(kontor: &Kontor<FsBackend>, cmd: ProductsCmd) -> Result<()> {
    let service = kontor.products();
    match cmd {
        ProductsCmd::List(args) => {
            let unfiltered = args.category.is_none()
                && args.brand.is_none()
                && args.gender.is_none()
                && args.min_price.is_none()
                && args.max_price.is_none()
                && args.sort.is_none();
            let listed = if args.all && unfiltered {
                service.list_admin()
            } else {
                service.filter(&ProductFilter {
                    category: args.category,
                    brand: args.brand,
                    gender: args.gender,
                    min_price: args.min_price,
                    max_price: args.max_price,
                    include_inactive: args.all,
                    sort: args.sort.map(Into::into),
                    ..Default::default()
                })
            };
            render::product_list(&listed);
        }
        ProductsCmd::Show { id } => render::product_detail(&service.get(&id)?),
        ProductsCmd::Add(args) => {
            let product = service.create(NewProduct {
                title: args.title,
                description: args.description,
                price: args.price,
                discount: args.discount,
                category: args.category,
                subcategory: args.subcategory,
                gender: args.gender,
                brand: args.brand,
                stock: args.stock,
                colors: args.colors,
                sizes: args.sizes,
                tags: args.tags,
                ..Default::default()
            })?;
            render::created("product", &product.id, &product.title);
        }
        ProductsCmd::Update(args) => {
            let product = service.update(
                &args.id,
                ProductPatch {
                    title: args.title,
                    description: args.description,
                    price: args.price,
                    discount: args.discount,
                    category: args.category,
                    brand: args.brand,
                    stock: args.stock,
                    ..Default::default()
                },
            )?;
            render::changed("Updated", "product", &product.id);
        }
        ProductsCmd::Rm { id } => {
            let product = service.delete(&id)?;
            render::changed("Deleted", "product", &product.id);
        }
        ProductsCmd::Restore { id } => {
            let product = service.restore(&id)?;
            render::changed("Restored", "product", &product.id);
        }
        ProductsCmd::Purge { id } => {
            service.purge(&id)?;
            render::changed("Purged", "product", &id);
        }
        ProductsCmd::Toggle { id } => {
            let product = service.toggle_active(&id)?;
            let state = if product.is_active { "active" } else { "inactive" };
            render::changed(state, "product", &product.id);
        }
        ProductsCmd::Search { query } => render::product_list(&service.search(&query)),
        ProductsCmd::Stats => render::product_stats(&service.stats()),
    }
    Ok(())
}

fn users(kontor: &Kontor<FsBackend>, cmd: UsersCmd) -> Result<()> {
    let service = kontor.users();
    match cmd {
        UsersCmd::List { status } => {
            let listed = match status {
                Some(status) => service.list_by_status(status.into()),
                None => service.list(),
            };
            render::user_list(&listed);
        }
        UsersCmd::Show { id } => render::user_detail(&service.get(&id)?),
        UsersCmd::Add(args) => {
            let user = service.create(NewUser {
                first_name: args.first_name,
                last_name: args.last_name,
                email: args.email,
                phone: args.phone,
                role: args.role,
                department: args.department,
                position: args.position,
                permissions: args.permissions,
            })?;
            render::created("user", &user.id, &user.email);
        }
        UsersCmd::Rm { id } => {
            let user = service.delete(&id)?;
            render::changed("Deleted", "user", &user.id);
        }
        UsersCmd::Restore { id } => {
            let user = service.restore(&id)?;
            render::changed("Restored", "user", &user.id);
        }
        UsersCmd::Purge { id } => {
            service.purge(&id)?;
            render::changed("Purged", "user", &id);
        }
        UsersCmd::Toggle { id } => {
            let user = service.toggle_active(&id)?;
            render::changed(user.status.as_str(), "user", &user.id);
        }
        UsersCmd::Grant { id, permission } => {
            let user = service.grant_permission(&id, &permission)?;
            render::changed("Granted", &permission, &user.id);
        }
        UsersCmd::Revoke { id, permission } => {
            let user = service.revoke_permission(&id, &permission)?;
            render::changed("Revoked", &permission, &user.id);
        }
        UsersCmd::Search { query } => render::user_list(&service.search(&query)),
        UsersCmd::Stats => render::user_stats(&service.stats()),
    }
    Ok(())
}

fn sellers(kontor: &Kontor<FsBackend>, cmd: SellersCmd) -> Result<()> {
    let service = kontor.sellers();
    match cmd {
        SellersCmd::List { status } => {
            let listed = match status {
                Some(status) => service.list_by_status(status.into()),
                None => service.list(),
            };
            render::seller_list(&listed);
        }
        SellersCmd::Show { id } => render::seller_detail(&service.get(&id)?),
        SellersCmd::Add(args) => {
            let seller = service.create(NewSeller {
                first_name: args.first_name,
                last_name: args.last_name,
                email: args.email,
                phone: args.phone,
                seller_id: args.seller_id,
                business_name: args.business_name,
                business_type: args.business_type,
                commission_rate: args.commission_rate,
                ..Default::default()
            })?;
            render::created("seller", &seller.id, &seller.seller_id);
        }
        SellersCmd::Rm { id } => {
            let seller = service.delete(&id)?;
            render::changed("Deleted", "seller", &seller.id);
        }
        SellersCmd::Restore { id } => {
            let seller = service.restore(&id)?;
            render::changed("Restored", "seller", &seller.id);
        }
        SellersCmd::Purge { id } => {
            service.purge(&id)?;
            render::changed("Purged", "seller", &id);
        }
        SellersCmd::Activate { id } => {
            let seller = service.activate(&id)?;
            render::changed("Activated", "seller", &seller.id);
        }
        SellersCmd::Suspend { id } => {
            let seller = service.suspend(&id)?;
            render::changed("Suspended", "seller", &seller.id);
        }
        SellersCmd::Search { query } => render::seller_list(&service.search(&query)),
        SellersCmd::Stats => render::seller_stats(&service.stats()),
    }
    Ok(())
}

fn suppliers(kontor: &Kontor<FsBackend>, cmd: SuppliersCmd) -> Result<()> {
    let service = kontor.suppliers();
    match cmd {
        SuppliersCmd::List { active } => {
            let listed = if active {
                service.list_active()
            } else {
                service.list()
            };
            render::supplier_list(&listed);
        }
        SuppliersCmd::Show { id } => render::supplier_detail(&service.get(&id)?),
        SuppliersCmd::Add(args) => {
            let supplier = service.create(NewSupplier {
                name: args.name,
                contact_person: args.contact_person,
                email: args.email,
                phone: args.phone,
                address: args.address,
                business_type: args.business_type,
                payment_terms: args.payment_terms,
                ..Default::default()
            })?;
            render::created("supplier", &supplier.id, &supplier.name);
        }
        SuppliersCmd::Rm { id } => {
            let supplier = service.delete(&id)?;
            render::changed("Deleted", "supplier", &supplier.id);
        }
        SuppliersCmd::Restore { id } => {
            let supplier = service.restore(&id)?;
            render::changed("Restored", "supplier", &supplier.id);
        }
        SuppliersCmd::Purge { id } => {
            service.purge(&id)?;
            render::changed("Purged", "supplier", &id);
        }
        SuppliersCmd::Toggle { id } => {
            let supplier = service.toggle_active(&id)?;
            render::changed(supplier.status.as_str(), "supplier", &supplier.id);
        }
        SuppliersCmd::Search { query } => render::supplier_list(&service.search(&query)),
        SuppliersCmd::Stats => render::supplier_stats(&service.stats()),
    }
    Ok(())
}

fn inventory(kontor: &Kontor<FsBackend>, cmd: InventoryCmd) -> Result<()> {
    let service = kontor.inventory();
    match cmd {
        InventoryCmd::List(args) => {
            let listed = service.filter(&InventoryFilter {
                category: args.category,
                supplier_id: args.supplier,
                low_stock_only: args.low,
                sort: args.sort.map(Into::into),
                ..Default::default()
            });
            render::inventory_list(&listed);
        }
        InventoryCmd::Show { id } => render::inventory_detail(&service.get(&id)?),
        InventoryCmd::Add(args) => {
            let item = service.create(NewInventoryItem {
                sku: args.sku,
                name: args.name,
                category: args.category,
                supplier_id: args.supplier,
                current_stock: args.stock,
                min_stock: args.min_stock,
                max_stock: args.max_stock,
                unit_cost: args.unit_cost,
                location: args.location,
            })?;
            render::created("inventory item", &item.id, &item.sku);
        }
        InventoryCmd::Adjust(args) => {
            let (quantity, mode) = args.adjustment().ok_or_else(|| {
                KontorError::Validation("pass one of --add, --subtract or --set".into())
            })?;
            let item = service.update_stock(&args.id, quantity, mode)?;
            println!("{} -> {}", item.sku, item.current_stock);
        }
        InventoryCmd::Rm { id } => {
            let item = service.delete(&id)?;
            render::changed("Deleted", "inventory item", &item.id);
        }
        InventoryCmd::Restore { id } => {
            let item = service.restore(&id)?;
            render::changed("Restored", "inventory item", &item.id);
        }
        InventoryCmd::Purge { id } => {
            service.purge(&id)?;
            render::changed("Purged", "inventory item", &id);
        }
        InventoryCmd::Search { query } => render::inventory_list(&service.search(&query)),
        InventoryCmd::Stats => render::inventory_stats(&service.stats()),
    }
    Ok(())
}

fn purchases(kontor: &Kontor<FsBackend>, cmd: PurchasesCmd) -> Result<()> {
    let service = kontor.purchases();
    match cmd {
        PurchasesCmd::List(args) => {
            let listed = service.filter(&PurchaseFilter {
                supplier_id: args.supplier,
                status: args.status.map(Into::into),
                sort: args.sort.map(Into::into),
            });
            render::purchase_list(&listed);
        }
        PurchasesCmd::Show { id } => render::purchase_detail(&service.get(&id)?),
        PurchasesCmd::Add(args) => {
            let purchase = service.create(NewPurchase {
                supplier_id: args.supplier,
                items: args.items,
                notes: args.notes,
                ..Default::default()
            })?;
            render::created("purchase", &purchase.id, &render::money(purchase.total));
        }
        PurchasesCmd::Order { id } => {
            let purchase = service.mark_ordered(&id)?;
            render::changed("Ordered", "purchase", &purchase.id);
        }
        PurchasesCmd::Cancel { id } => {
            let purchase = service.cancel(&id)?;
            render::changed("Cancelled", "purchase", &purchase.id);
        }
        PurchasesCmd::Receive { id } => {
            let outcome = service.receive(&id)?;
            render::purchase_received(&outcome);
        }
        PurchasesCmd::Purge { id } => {
            service.purge(&id)?;
            render::changed("Purged", "purchase", &id);
        }
        PurchasesCmd::Search { query } => render::purchase_list(&service.search(&query)),
        PurchasesCmd::Stats => render::purchase_stats(&service.stats()),
    }
    Ok(())
}
