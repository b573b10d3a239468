use crate::domain::basket::Basket;
use crate::domain::context::Context;
use crate::domain::ports::{BasketStore, CatalogStore};
use crate::domain::product::Product;
use crate::domain::promotion::Promotion;
use crate::error::{CheckoutError, Entity, Result};
use crate::infrastructure::seed::CatalogSeed;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A thread-safe in-memory store for baskets.
///
/// Uses `Arc<RwLock<HashMap<String, Basket>>>` so clones share the same map.
/// Every read hands out a copy; nothing changes until it is saved back.
#[derive(Default, Clone)]
pub struct InMemoryBasketStore {
    baskets: Arc<RwLock<HashMap<String, Basket>>>,
}

impl InMemoryBasketStore {
    /// Creates a new, empty in-memory basket store.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.baskets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.baskets.read().await.is_empty()
    }
}

#[async_trait]
impl BasketStore for InMemoryBasketStore {
    async fn save(&self, _ctx: &Context, mut basket: Basket) -> Result<Basket> {
        let mut baskets = self.baskets.write().await;
        let id = match &basket.id {
            Some(id) => id.clone(),
            None => {
                let id = Uuid::new_v4().to_string();
                basket.id = Some(id.clone());
                basket.created_at = Some(Utc::now());
                id
            }
        };
        baskets.insert(id, basket.clone());
        Ok(basket)
    }

    async fn get(&self, _ctx: &Context, basket_id: &str) -> Result<Basket> {
        let baskets = self.baskets.read().await;
        baskets
            .get(basket_id)
            .cloned()
            .ok_or_else(|| CheckoutError::not_found(Entity::Basket, basket_id))
    }

    async fn delete(&self, _ctx: &Context, basket_id: &str) -> Result<()> {
        let mut baskets = self.baskets.write().await;
        baskets.remove(basket_id);
        Ok(())
    }
}

/// A thread-safe in-memory product catalog.
///
/// Products and promotions sit behind separate locks so a promotion lookup
/// never waits on a product listing.
#[derive(Default, Clone)]
pub struct InMemoryCatalogStore {
    products: Arc<RwLock<HashMap<String, Product>>>,
    promotions: Arc<RwLock<HashMap<String, Promotion>>>,
}

impl InMemoryCatalogStore {
    /// Creates a new, empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from a seed, rejecting products that point at a
    /// promotion the seed does not define.
    pub fn from_seed(seed: CatalogSeed) -> Result<Self> {
        seed.validate()?;
        let promotions = seed
            .promotions
            .into_iter()
            .map(|promotion| (promotion.id.clone(), promotion))
            .collect();
        let products = seed
            .products
            .into_iter()
            .map(|product| (product.id.clone(), product))
            .collect();
        Ok(Self {
            products: Arc::new(RwLock::new(products)),
            promotions: Arc::new(RwLock::new(promotions)),
        })
    }

    pub async fn upsert_product(&self, product: Product) {
        self.products
            .write()
            .await
            .insert(product.id.clone(), product);
    }

    pub async fn upsert_promotion(&self, promotion: Promotion) {
        self.promotions
            .write()
            .await
            .insert(promotion.id.clone(), promotion);
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn product(&self, _ctx: &Context, product_id: &str) -> Result<Product> {
        let products = self.products.read().await;
        products
            .get(product_id)
            .cloned()
            .ok_or_else(|| CheckoutError::not_found(Entity::Product, product_id))
    }

    async fn products(&self, _ctx: &Context) -> Result<Vec<Product>> {
        let products = self.products.read().await;
        Ok(products.values().cloned().collect())
    }

    async fn promotion(&self, _ctx: &Context, promotion_id: &str) -> Result<Promotion> {
        let promotions = self.promotions.read().await;
        promotions
            .get(promotion_id)
            .cloned()
            .ok_or_else(|| CheckoutError::not_found(Entity::Promotion, promotion_id))
    }
}
