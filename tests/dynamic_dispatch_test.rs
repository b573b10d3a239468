use checkout::domain::basket::{Basket, BasketItem};
use checkout::domain::context::Context;
use checkout::domain::ports::{BasketStoreBox, CatalogStoreBox, LockerBox};
use checkout::infrastructure::in_memory::{InMemoryBasketStore, InMemoryCatalogStore};
use checkout::infrastructure::locker::InMemoryLocker;
use checkout::infrastructure::seed::CatalogSeed;

#[tokio::test]
async fn test_ports_as_trait_objects() {
    let basket_store: BasketStoreBox = Box::new(InMemoryBasketStore::new());
    let catalog_store: CatalogStoreBox =
        Box::new(InMemoryCatalogStore::from_seed(CatalogSeed::default_catalog()).unwrap());
    let locker: LockerBox = Box::new(InMemoryLocker::default());

    // Verify Send + Sync by spawning tasks
    let catalog_handle = tokio::spawn(async move {
        let ctx = Context::new();
        let product = catalog_store.product(&ctx, "PEN").await.unwrap();
        let promotion = match &product.promotion_id {
            Some(id) => Some(catalog_store.promotion(&ctx, id).await.unwrap()),
            None => None,
        };
        let mut item = BasketItem::new(product, promotion);
        item.add_quantity(3).unwrap();
        item
    });
    let item = catalog_handle.await.unwrap();

    let basket_handle = tokio::spawn(async move {
        let ctx = Context::new();
        let mut basket = basket_store.save(&ctx, Basket::new()).await.unwrap();
        basket.save_item(item).unwrap();
        let id = basket.id.clone().unwrap();
        basket_store.save(&ctx, basket).await.unwrap();
        basket_store.get(&ctx, &id).await.unwrap()
    });

    let locker_handle = tokio::spawn(async move {
        let ctx = Context::new();
        locker.lock(&ctx, "basket-1").await.unwrap();
        let busy = locker.lock(&ctx, "basket-1").await.is_err();
        locker.unlock(&ctx, "basket-1").await.unwrap();
        busy
    });

    let basket = basket_handle.await.unwrap();
    assert_eq!(basket.get_item("PEN").unwrap().quantity, 3);
    assert_eq!(basket.total.value(), rust_decimal_macros::dec!(10));

    assert!(locker_handle.await.unwrap());
}
