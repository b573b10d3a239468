use crate::domain::basket::{Basket, BasketItem, ItemDetail};
use crate::domain::context::Context;
use crate::domain::ports::{BasketStoreBox, CatalogStoreBox, Locker, LockerBox};
use crate::domain::product::Product;
use crate::error::{CheckoutError, Result};
use std::future::Future;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Lock key guarding one basket.
pub fn basket_lock_key(basket_id: &str) -> String {
    format!("basket-{basket_id}")
}

/// The checkout orchestrator.
///
/// Every basket-changing operation runs as lock, load, mutate, save, unlock on
/// the basket's lock key. Mutations happen on a local copy, so a failure before
/// the save leaves the stored basket untouched.
pub struct CheckoutService {
    baskets: BasketStoreBox,
    catalog: CatalogStoreBox,
    locker: Arc<dyn Locker>,
}

impl CheckoutService {
    /// Creates a new `CheckoutService`.
    ///
    /// # Arguments
    ///
    /// * `baskets` - Where baskets are persisted.
    /// * `catalog` - Product and promotion lookups.
    /// * `locker` - Per-basket mutual exclusion.
    pub fn new(baskets: BasketStoreBox, catalog: CatalogStoreBox, locker: LockerBox) -> Self {
        Self {
            baskets,
            catalog,
            locker: Arc::from(locker),
        }
    }

    #[instrument(skip_all, fields(request_id = %ctx.request_id()))]
    pub async fn basket_create(&self, ctx: &Context) -> Result<Basket> {
        let basket = self.baskets.save(ctx, Basket::new()).await?;
        info!(basket_id = basket.id.as_deref(), "basket_created");
        Ok(basket)
    }

    /// Reads without locking; a write in flight may not be visible yet.
    pub async fn basket_get(&self, ctx: &Context, basket_id: &str) -> Result<Basket> {
        self.baskets.get(ctx, basket_id).await
    }

    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id()))]
    pub async fn basket_delete(&self, ctx: &Context, basket_id: &str) -> Result<()> {
        self.with_basket_lock(ctx, basket_id, self.delete_locked(ctx, basket_id))
            .await
    }

    pub async fn basket_add_item(
        &self,
        ctx: &Context,
        basket_id: &str,
        product_id: &str,
        quantity: u32,
    ) -> Result<()> {
        self.basket_add_items(ctx, basket_id, &[ItemDetail::new(product_id, quantity)])
            .await
    }

    /// Adds every item under a single lock. Nothing is saved unless all of
    /// them resolve.
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id()))]
    pub async fn basket_add_items(
        &self,
        ctx: &Context,
        basket_id: &str,
        items: &[ItemDetail],
    ) -> Result<()> {
        self.with_basket_lock(ctx, basket_id, self.add_items_locked(ctx, basket_id, items))
            .await
    }

    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id()))]
    pub async fn basket_remove_item(
        &self,
        ctx: &Context,
        basket_id: &str,
        product_id: &str,
        quantity: u32,
    ) -> Result<()> {
        self.with_basket_lock(
            ctx,
            basket_id,
            self.remove_item_locked(ctx, basket_id, product_id, quantity),
        )
        .await
    }

    pub async fn product_list(&self, ctx: &Context) -> Result<Vec<Product>> {
        self.catalog.products(ctx).await
    }

    pub async fn product_get(&self, ctx: &Context, product_id: &str) -> Result<Product> {
        self.catalog.product(ctx, product_id).await
    }

    async fn delete_locked(&self, ctx: &Context, basket_id: &str) -> Result<()> {
        self.baskets.delete(ctx, basket_id).await?;
        info!("basket_deleted");
        Ok(())
    }

    async fn add_items_locked(
        &self,
        ctx: &Context,
        basket_id: &str,
        items: &[ItemDetail],
    ) -> Result<()> {
        let mut basket = self.baskets.get(ctx, basket_id).await?;

        for detail in items {
            let product = self.catalog.product(ctx, &detail.product_id).await?;
            // An existing line keeps the promotion it was created with.
            let mut item = match basket.get_item(&detail.product_id) {
                Some(existing) => existing.clone(),
                None => self.new_item(ctx, product).await?,
            };
            item.add_quantity(detail.quantity)?;
            basket.save_item(item)?;
        }

        self.baskets.save(ctx, basket).await?;
        let quantity: u64 = items.iter().map(|detail| u64::from(detail.quantity)).sum();
        info!(quantity, "basket_items_added");
        Ok(())
    }

    async fn remove_item_locked(
        &self,
        ctx: &Context,
        basket_id: &str,
        product_id: &str,
        quantity: u32,
    ) -> Result<()> {
        let mut basket = self.baskets.get(ctx, basket_id).await?;

        let mut item = basket.get_item(product_id).cloned().ok_or_else(|| {
            CheckoutError::ItemNotInBasket {
                product_id: product_id.to_string(),
                basket_id: basket_id.to_string(),
            }
        })?;
        item.remove_quantity(quantity)?;
        basket.save_item(item)?;

        self.baskets.save(ctx, basket).await?;
        info!(quantity, "basket_items_removed");
        Ok(())
    }

    /// A fresh line for `product`, pinned to the product's current promotion.
    async fn new_item(&self, ctx: &Context, product: Product) -> Result<BasketItem> {
        let promotion = match &product.promotion_id {
            Some(promotion_id) => Some(self.catalog.promotion(ctx, promotion_id).await?),
            None => None,
        };
        Ok(BasketItem::new(product, promotion))
    }

    /// Runs `op` while holding the basket's lock and releases it on every exit
    /// path. A lock failure is returned before `op` is ever polled.
    ///
    /// If `op` fails, its error wins over an unlock failure. If `op` panics or
    /// the returned future is dropped before completion, the lock guard
    /// releases the lock from a background task.
    async fn with_basket_lock<T, F>(&self, ctx: &Context, basket_id: &str, op: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let key = basket_lock_key(basket_id);
        self.locker.lock(ctx, &key).await?;
        let guard = BasketLockGuard {
            locker: Arc::clone(&self.locker),
            ctx: *ctx,
            key: key.clone(),
            held: true,
        };

        let result = op.await;

        match (result, guard.release().await) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(unlock_err)) => Err(unlock_err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(unlock_err)) => {
                warn!(resource = %key, error = %unlock_err, "unlock failed after error");
                Err(err)
            }
        }
    }
}

/// A held basket lock.
///
/// `release` unlocks inline. Dropping the guard while still held spawns the
/// unlock on the current runtime; without a runtime the lock TTL frees it.
struct BasketLockGuard {
    locker: Arc<dyn Locker>,
    ctx: Context,
    key: String,
    held: bool,
}

impl BasketLockGuard {
    async fn release(mut self) -> Result<()> {
        let result = self.locker.unlock(&self.ctx, &self.key).await;
        self.held = false;
        result
    }
}

impl Drop for BasketLockGuard {
    fn drop(&mut self) {
        if !self.held {
            return;
        }
        let locker = Arc::clone(&self.locker);
        let ctx = self.ctx;
        let key = std::mem::take(&mut self.key);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                warn!(resource = %key, "basket operation abandoned, releasing lock");
                handle.spawn(async move {
                    if let Err(err) = locker.unlock(&ctx, &key).await {
                        warn!(resource = %key, error = %err, "background unlock failed");
                    }
                });
            }
            Err(_) => {
                warn!(resource = %key, "no runtime to release lock, left to expire");
            }
        }
    }
}
