//! Integration tests for the filesystem backend: real files, reopened
//! stores, corrupt blobs, and seeding.

use kontorapp::api::Kontor;
use kontorapp::config::KontorConfig;
use kontorapp::domains::inventory::{NewInventoryItem, StockAdjustment};
use kontorapp::domains::products::NewProduct;
use kontorapp::store::fs_backend::FsBackend;
use kontorapp::store::StorageBackend;

fn open_at(dir: &std::path::Path) -> Kontor<FsBackend> {
    let config = KontorConfig {
        data_dir: Some(dir.to_path_buf()),
        ..Default::default()
    };
    Kontor::open(config)
}

#[test]
fn data_survives_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();

    let created = {
        let kontor = open_at(dir.path());
        kontor
            .products()
            .create(NewProduct {
                title: "Widget".into(),
                price: 100.0,
                discount: 10.0,
                ..Default::default()
            })
            .unwrap()
    };

    let kontor = open_at(dir.path());
    let loaded = kontor.products().get(&created.id).unwrap();
    assert_eq!(loaded.title, "Widget");
    assert_eq!(loaded.sales_price, 90.0);
    assert_eq!(loaded.created_at, created.created_at);
}

#[test]
fn collection_files_are_named_after_their_keys() {
    let dir = tempfile::tempdir().unwrap();
    let kontor = open_at(dir.path());

    kontor
        .products()
        .create(NewProduct {
            title: "Widget".into(),
            ..Default::default()
        })
        .unwrap();
    kontor
        .inventory()
        .create(NewInventoryItem {
            sku: "SKU-1".into(),
            name: "Thing".into(),
            ..Default::default()
        })
        .unwrap();

    assert!(dir.path().join("Kontainar-products.json").exists());
    assert!(dir.path().join("warehouse_inventory.json").exists());
}

#[test]
fn corrupt_blob_loads_empty_and_next_save_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let kontor = open_at(dir.path());
    kontor
        .products()
        .create(NewProduct {
            title: "Widget".into(),
            ..Default::default()
        })
        .unwrap();

    std::fs::write(dir.path().join("Kontainar-products.json"), "{broken").unwrap();

    // Fail-open: the damaged collection reads as empty
    assert!(kontor.products().list_admin().is_empty());

    // The next write replaces the bad blob
    kontor
        .products()
        .create(NewProduct {
            title: "Fresh".into(),
            ..Default::default()
        })
        .unwrap();
    let all = kontor.products().list_admin();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "Fresh");
}

#[test]
fn initialize_seeds_only_an_absent_collection() {
    let dir = tempfile::tempdir().unwrap();
    let kontor = open_at(dir.path());

    let seed = kontor
        .inventory()
        .create(NewInventoryItem {
            sku: "SEED-1".into(),
            name: "Seeded".into(),
            current_stock: 7,
            ..Default::default()
        })
        .unwrap();
    let snapshot = kontor.inventory().list();

    // Re-seeding an existing collection is a no-op
    kontor.inventory().initialize(&[]).unwrap();
    assert_eq!(kontor.inventory().list().len(), 1);

    // Seeding a fresh directory takes the records verbatim
    let fresh_dir = tempfile::tempdir().unwrap();
    let fresh = open_at(fresh_dir.path());
    fresh.inventory().initialize(&snapshot).unwrap();
    let loaded = fresh.inventory().get(&seed.id).unwrap();
    assert_eq!(loaded.sku, "SEED-1");
    assert_eq!(loaded.current_stock, 7);
}

#[test]
fn stock_adjustments_persist_to_disk() {
    let dir = tempfile::tempdir().unwrap();

    let item = {
        let kontor = open_at(dir.path());
        let item = kontor
            .inventory()
            .create(NewInventoryItem {
                sku: "SKU-1".into(),
                name: "Thing".into(),
                current_stock: 10,
                ..Default::default()
            })
            .unwrap();
        kontor
            .inventory()
            .update_stock(&item.id, 4, StockAdjustment::Subtract)
            .unwrap();
        item
    };

    let kontor = open_at(dir.path());
    assert_eq!(kontor.inventory().get(&item.id).unwrap().current_stock, 6);
}

#[test]
fn backend_lists_only_collection_keys() {
    let dir = tempfile::tempdir().unwrap();
    let kontor = open_at(dir.path());
    kontor
        .products()
        .create(NewProduct {
            title: "Widget".into(),
            ..Default::default()
        })
        .unwrap();

    std::fs::write(dir.path().join("notes.txt"), "not a collection").unwrap();

    let keys = kontor.backend().list_keys().unwrap();
    assert_eq!(keys, vec!["Kontainar-products".to_string()]);
}
