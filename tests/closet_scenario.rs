use closet::state::backup;
use closet::{ClosetError, ClosetStore, ImportItem, NewClothingItem};
use std::collections::HashMap;

fn by_id(items: Vec<closet::ClothingItem>) -> HashMap<i64, closet::ClothingItem> {
    items.into_iter().map(|item| (item.id, item)).collect()
}

#[tokio::test]
async fn test_wardrobe_lifecycle() {
    let store = ClosetStore::in_memory();

    let a = NewClothingItem::new("Red Shirt", "Top", "data:image/png;base64,blob1", "2024-03-01T09:00:00.000Z");
    let b = NewClothingItem::new("Jeans", "Bottom", "data:image/png;base64,blob2", "2024-03-02T09:00:00.000Z");

    let id_a = store.add(&a).await.unwrap();
    let id_b = store.add(&b).await.unwrap();
    assert_eq!(id_a, 1);
    assert_eq!(id_b, 2);

    assert_eq!(store.get_by_category("Top").await.unwrap(), vec![a.clone().with_id(1)]);

    store.delete(1).await.unwrap();
    let expected_b = b.clone().with_id(2);
    assert_eq!(store.get_all().await.unwrap(), vec![expected_b.clone()]);
    assert_eq!(store.export_all().await.unwrap(), vec![expected_b.clone()]);

    let boots = ImportItem {
        id: Some(5),
        name: "Boots".to_string(),
        category: "Shoes".to_string(),
        image: "data:image/png;base64,blob3".to_string(),
        date_added: "2024-03-03T09:00:00.000Z".to_string(),
    };
    store
        .import_replace(vec![ImportItem::from(expected_b.clone()), boots.clone()])
        .await
        .unwrap();

    let all = by_id(store.get_all().await.unwrap());
    assert_eq!(all.len(), 2);
    assert_eq!(all[&2], expected_b);
    assert_eq!(all[&5].name, "Boots");
    assert_eq!(all[&5].category, "Shoes");
    assert_eq!(store.get_by_category("Shoes").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_export_then_import_is_identity() {
    let store = ClosetStore::in_memory();
    for (name, category) in [("Parka", "Outerwear"), ("Loafers", "Shoes"), ("Tee", "Top")] {
        store
            .add(&NewClothingItem::now(name, category, "data:image/png;base64,AAAA"))
            .await
            .unwrap();
    }
    store.delete(2).await.unwrap();
    let before = by_id(store.get_all().await.unwrap());

    let json = backup::to_json(&store.export_all().await.unwrap()).unwrap();
    store.import_replace(backup::from_json(&json).unwrap()).await.unwrap();

    assert_eq!(by_id(store.get_all().await.unwrap()), before);
}

#[tokio::test]
async fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("closet.db");

    let id = {
        let store = ClosetStore::new(closet::ClosetConfig::with_file(&path));
        store
            .add(&NewClothingItem::new("Scarf", "Accessory", "data:,", "T"))
            .await
            .unwrap()
    };

    let store = ClosetStore::new(closet::ClosetConfig::with_file(&path));
    let items = store.get_all().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, id);

    // A fresh handle keeps counting from where the last one stopped
    store.delete(id).await.unwrap();
    let next = store
        .add(&NewClothingItem::new("Gloves", "Accessory", "data:,", "T"))
        .await
        .unwrap();
    assert!(next > id);
}

#[tokio::test]
async fn test_unopenable_store_never_reports_success() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("occupied");
    std::fs::write(&file, b"x").unwrap();
    let store = ClosetStore::new(closet::ClosetConfig::with_file(file.join("closet.db")));

    assert!(matches!(store.get_all().await, Err(ClosetError::StorageUnavailable { .. })));
    assert!(matches!(
        store.import_replace(Vec::<ImportItem>::new()).await,
        Err(ClosetError::StorageUnavailable { .. })
    ));
}
