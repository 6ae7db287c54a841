//! Terminal rendering. Layout math and row assembly happen here; the
//! command layer hands over plain records and never touches stdout itself.

use chrono::{DateTime, Utc};
use console::style;
use kontorapp::domains::inventory::{InventoryItem, InventoryStats};
use kontorapp::domains::products::{Product, ProductStats};
use kontorapp::domains::purchases::{Purchase, PurchaseStats, ReceiveOutcome};
use kontorapp::domains::sellers::{Seller, SellerStats};
use kontorapp::domains::suppliers::{Supplier, SupplierStats};
use kontorapp::domains::users::{User, UserStats};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

static AGO: Lazy<timeago::Formatter> = Lazy::new(timeago::Formatter::new);

pub fn age(at: DateTime<Utc>) -> String {
    let elapsed = (Utc::now() - at).to_std().unwrap_or_default();
    AGO.convert(elapsed)
}

pub fn money(value: f64) -> String {
    format!("{:.2}", value)
}

fn paint_status(status: &str) -> String {
    let styled = match status {
        "active" | "delivered" => style(status).green(),
        "pending" | "suspended" | "ordered" => style(status).yellow(),
        "inactive" => style(status).dim(),
        "deleted" | "cancelled" => style(status).red(),
        other => style(other),
    };
    styled.to_string()
}

fn header(text: &str) {
    println!("{}", style(text).bold());
}

fn empty(noun: &str) {
    println!("{}", style(format!("No {} found.", noun)).dim());
}

pub fn created(noun: &str, id: &str, label: &str) {
    println!(
        "{} {} {} {}",
        style("Created").green(),
        noun,
        style(id).cyan(),
        style(format!("({})", label)).dim()
    );
}

pub fn changed(verb: &str, noun: &str, id: &str) {
    println!("{} {} {}", style(verb).green(), noun, style(id).cyan());
}

fn counts(label: &str, map: &BTreeMap<String, usize>) {
    if map.is_empty() {
        return;
    }
    let parts: Vec<String> = map.iter().map(|(k, v)| format!("{} {}", k, v)).collect();
    println!("  {:<14} {}", label, parts.join(", "));
}

// ─── Products ────────────────────────────────────────────────────────────────

pub fn product_list(products: &[Product]) {
    if products.is_empty() {
        empty("products");
        return;
    }
    header(&format!(
        "{:<36}  {:<28} {:>9} {:>9}  {:<8} {}",
        "ID", "TITLE", "PRICE", "SALE", "STOCK", "STATE"
    ));
    for p in products {
        let state = if p.is_deleted {
            paint_status("deleted")
        } else if p.is_active {
            paint_status("active")
        } else {
            paint_status("inactive")
        };
        println!(
            "{:<36}  {:<28} {:>9} {:>9}  {:<8} {}",
            p.id,
            truncate(&p.title, 28),
            money(p.price),
            money(p.sales_price),
            p.stock,
            state
        );
    }
}

pub fn product_detail(p: &Product) {
    header(&p.title);
    println!("  id           {}", p.id);
    println!("  brand        {} / {}", p.brand, p.category);
    println!(
        "  price        {} (sale {}, -{}%)",
        money(p.price),
        money(p.sales_price),
        p.discount
    );
    println!("  stock        {}", p.stock);
    println!("  rating       {} ({} reviews)", p.rating, p.reviews);
    if !p.colors.is_empty() {
        println!("  colors       {}", p.colors.join(", "));
    }
    if !p.sizes.is_empty() {
        println!("  sizes        {}", p.sizes.join(", "));
    }
    if !p.tags.is_empty() {
        println!("  tags         {}", p.tags.join(", "));
    }
    println!("  updated      {}", age(p.updated_at));
}

pub fn product_stats(stats: &ProductStats) {
    header("Products");
    println!(
        "  {:<14} {} ({} active, {} inactive, {} deleted)",
        "total", stats.total, stats.active, stats.inactive, stats.deleted
    );
    counts("by category", &stats.by_category);
    println!("  {:<14} {}", "stock units", stats.total_stock);
    println!("  {:<14} {:.2}", "avg rating", stats.avg_rating);
}

// ─── Users ───────────────────────────────────────────────────────────────────

pub fn user_list(users: &[User]) {
    if users.is_empty() {
        empty("users");
        return;
    }
    header(&format!(
        "{:<36}  {:<24} {:<28} {:<12} {}",
        "ID", "NAME", "EMAIL", "ROLE", "STATUS"
    ));
    for u in users {
        println!(
            "{:<36}  {:<24} {:<28} {:<12} {}",
            u.id,
            truncate(&u.full_name(), 24),
            truncate(&u.email, 28),
            u.role,
            paint_status(u.status.as_str())
        );
    }
}

pub fn user_detail(u: &User) {
    header(&u.full_name());
    println!("  id           {}", u.id);
    println!("  email        {}", u.email);
    println!("  role         {} / {}", u.role, u.department);
    println!("  status       {}", paint_status(u.status.as_str()));
    if !u.permissions.is_empty() {
        println!("  permissions  {}", u.permissions.join(", "));
    }
    match u.last_login {
        Some(at) => println!("  last login   {}", age(at)),
        None => println!("  last login   {}", style("never").dim()),
    }
}

pub fn user_stats(stats: &UserStats) {
    header("Users");
    println!("  {:<14} {}", "total", stats.total);
    counts("by status", &stats.by_status);
    counts("by role", &stats.by_role);
    counts("by department", &stats.by_department);
}

// ─── Sellers ─────────────────────────────────────────────────────────────────

pub fn seller_list(sellers: &[Seller]) {
    if sellers.is_empty() {
        empty("sellers");
        return;
    }
    header(&format!(
        "{:<36}  {:<10} {:<24} {:>12} {:>7}  {}",
        "ID", "SELLER", "BUSINESS", "SALES", "RATING", "STATUS"
    ));
    for s in sellers {
        println!(
            "{:<36}  {:<10} {:<24} {:>12} {:>7.1}  {}",
            s.id,
            s.seller_id,
            truncate(&s.business_name, 24),
            money(s.total_sales),
            s.rating,
            paint_status(s.status.as_str())
        );
    }
}

pub fn seller_detail(s: &Seller) {
    header(&format!("{} {} ({})", s.first_name, s.last_name, s.seller_id));
    println!("  id           {}", s.id);
    println!("  email        {}", s.email);
    println!("  business     {} ({})", s.business_name, s.business_type);
    println!("  status       {}", paint_status(s.status.as_str()));
    println!("  commission   {}%", s.commission_rate);
    println!(
        "  sales        {} over {} orders",
        money(s.total_sales),
        s.total_orders
    );
    println!("  rating       {} ({} reviews)", s.rating, s.total_reviews);
    println!("  joined       {}", age(s.join_date));
}

pub fn seller_stats(stats: &SellerStats) {
    header("Sellers");
    println!("  {:<14} {}", "total", stats.total);
    counts("by status", &stats.by_status);
    counts("by type", &stats.by_business_type);
    println!("  {:<14} {}", "active sales", money(stats.total_sales));
    println!("  {:<14} {:.2}", "avg rating", stats.avg_rating);
}

// ─── Suppliers ───────────────────────────────────────────────────────────────

pub fn supplier_list(suppliers: &[Supplier]) {
    if suppliers.is_empty() {
        empty("suppliers");
        return;
    }
    header(&format!(
        "{:<36}  {:<24} {:<28} {:<12} {}",
        "ID", "NAME", "EMAIL", "TERMS", "STATUS"
    ));
    for s in suppliers {
        println!(
            "{:<36}  {:<24} {:<28} {:<12} {}",
            s.id,
            truncate(&s.name, 24),
            truncate(&s.email, 28),
            s.payment_terms,
            paint_status(s.status.as_str())
        );
    }
}

pub fn supplier_detail(s: &Supplier) {
    header(&s.name);
    println!("  id           {}", s.id);
    println!("  contact      {} <{}>", s.contact_person, s.email);
    println!("  type         {}", s.business_type);
    println!("  terms        {}", s.payment_terms);
    println!("  status       {}", paint_status(s.status.as_str()));
    println!("  rating       {:.1}", s.rating);
}

pub fn supplier_stats(stats: &SupplierStats) {
    header("Suppliers");
    println!("  {:<14} {}", "total", stats.total);
    counts("by status", &stats.by_status);
    counts("by type", &stats.by_business_type);
}

// ─── Inventory ───────────────────────────────────────────────────────────────

pub fn inventory_list(items: &[InventoryItem]) {
    if items.is_empty() {
        empty("inventory items");
        return;
    }
    header(&format!(
        "{:<36}  {:<12} {:<24} {:>7} {:>9} {:>10}  {}",
        "ID", "SKU", "NAME", "STOCK", "COST", "VALUE", "STATE"
    ));
    for i in items {
        let stock = if i.is_low_stock() {
            style(i.current_stock.to_string()).red().to_string()
        } else {
            i.current_stock.to_string()
        };
        println!(
            "{:<36}  {:<12} {:<24} {:>7} {:>9} {:>10}  {}",
            i.id,
            i.sku,
            truncate(&i.name, 24),
            stock,
            money(i.unit_cost),
            money(i.value()),
            paint_status(i.status.as_str())
        );
    }
}

pub fn inventory_detail(i: &InventoryItem) {
    header(&format!("{} ({})", i.name, i.sku));
    println!("  id           {}", i.id);
    println!("  category     {}", i.category);
    println!(
        "  stock        {} (min {}, max {})",
        i.current_stock, i.min_stock, i.max_stock
    );
    println!("  unit cost    {}", money(i.unit_cost));
    println!("  value        {}", money(i.value()));
    println!("  location     {}", i.location);
    println!("  status       {}", paint_status(i.status.as_str()));
    if i.is_low_stock() {
        println!("  {}", style("low stock").red().bold());
    }
}

pub fn inventory_stats(stats: &InventoryStats) {
    header("Inventory");
    println!("  {:<14} {}", "total items", stats.total);
    counts("by status", &stats.by_status);
    counts("by category", &stats.by_category);
    println!("  {:<14} {}", "total value", money(stats.total_value));
    println!("  {:<14} {}", "low stock", stats.low_stock);
}

// ─── Purchases ───────────────────────────────────────────────────────────────

pub fn purchase_list(purchases: &[Purchase]) {
    if purchases.is_empty() {
        empty("purchases");
        return;
    }
    header(&format!(
        "{:<14}  {:<36} {:>5} {:>12}  {:<10} {}",
        "NUMBER", "SUPPLIER", "ITEMS", "TOTAL", "STATUS", "ORDERED"
    ));
    for p in purchases {
        println!(
            "{:<14}  {:<36} {:>5} {:>12}  {:<10} {}",
            p.id,
            truncate(&p.supplier_id, 36),
            p.items.len(),
            money(p.total),
            paint_status(p.status.as_str()),
            age(p.order_date)
        );
    }
}

pub fn purchase_detail(p: &Purchase) {
    header(&p.id);
    println!("  supplier     {}", p.supplier_id);
    println!("  status       {}", paint_status(p.status.as_str()));
    println!("  ordered      {}", age(p.order_date));
    if let Some(at) = p.delivered_at {
        println!("  delivered    {}", age(at));
    }
    println!();
    header(&format!(
        "  {:<16} {:>8} {:>10} {:>12}",
        "ITEM", "QTY", "COST", "TOTAL"
    ));
    for item in &p.items {
        println!(
            "  {:<16} {:>8} {:>10} {:>12}",
            item.product_id,
            item.quantity,
            money(item.unit_cost),
            money(item.total_cost)
        );
    }
    println!();
    println!("  {:<14} {}", "subtotal", money(p.subtotal));
    println!("  {:<14} {}", "tax", money(p.tax));
    println!("  {:<14} {}", "total", money(p.total));
}

pub fn purchase_received(outcome: &ReceiveOutcome) {
    changed("Received", "purchase", &outcome.purchase.id);
    for item in &outcome.adjusted {
        println!(
            "  stock {} {} -> {}",
            item.sku,
            style("bumped").green(),
            item.current_stock
        );
    }
    for sku in &outcome.unmatched {
        println!(
            "  {} {}",
            style(sku).yellow(),
            style("has no inventory record, skipped").dim()
        );
    }
}

pub fn purchase_stats(stats: &PurchaseStats) {
    header("Purchases");
    println!("  {:<14} {}", "total", stats.total);
    counts("by status", &stats.by_status);
    println!("  {:<14} {}", "amount", money(stats.total_amount));
    println!("  {:<14} {}", "avg amount", money(stats.avg_amount));
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_strings_untouched() {
        assert_eq!(truncate("abc", 10), "abc");
    }

    #[test]
    fn truncate_long_strings_get_ellipsis() {
        let out = truncate("abcdefghij", 5);
        assert_eq!(out.chars().count(), 5);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn money_has_two_decimals() {
        assert_eq!(money(2.5), "2.50");
        assert_eq!(money(0.0), "0.00");
    }
}
