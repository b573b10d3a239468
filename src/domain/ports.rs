use super::basket::Basket;
use super::context::Context;
use super::product::Product;
use super::promotion::Promotion;
use crate::error::Result;
use async_trait::async_trait;
use mockall::automock;

/// Persistence for baskets. The store owns basket identity.
#[automock]
#[async_trait]
pub trait BasketStore: Send + Sync {
    /// Saves a full copy of `basket`, assigning an id and creation time when
    /// it has none yet. Returns the basket as stored.
    async fn save(&self, ctx: &Context, basket: Basket) -> Result<Basket>;
    async fn get(&self, ctx: &Context, basket_id: &str) -> Result<Basket>;
    /// Deleting a basket that does not exist succeeds.
    async fn delete(&self, ctx: &Context, basket_id: &str) -> Result<()>;
}

/// Read access to products and promotions.
#[automock]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn product(&self, ctx: &Context, product_id: &str) -> Result<Product>;
    /// Snapshot of every product, in no particular order.
    async fn products(&self, ctx: &Context) -> Result<Vec<Product>>;
    async fn promotion(&self, ctx: &Context, promotion_id: &str) -> Result<Promotion>;
}

/// Mutual exclusion on named resources.
#[automock]
#[async_trait]
pub trait Locker: Send + Sync {
    /// Fails with `ResourceLocked` once the retry budget is spent.
    async fn lock(&self, ctx: &Context, resource: &str) -> Result<()>;
    /// Unlocking a free or expired resource succeeds.
    async fn unlock(&self, ctx: &Context, resource: &str) -> Result<()>;
}

pub type BasketStoreBox = Box<dyn BasketStore>;
pub type CatalogStoreBox = Box<dyn CatalogStore>;
pub type LockerBox = Box<dyn Locker>;
