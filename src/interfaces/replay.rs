use crate::application::service::CheckoutService;
use crate::domain::basket::Basket;
use crate::domain::context::Context;
use crate::error::{CheckoutError, Entity, Result};
use crate::interfaces::csv::operation_reader::{Operation, OperationKind};
use std::collections::BTreeMap;
use tracing::info;

/// Drives a `CheckoutService` from a stream of operations.
///
/// Aliases stay bound after `delete`, so later rows naming a deleted basket
/// fail with `NotFound` instead of silently targeting nothing.
pub struct Replay<'a> {
    service: &'a CheckoutService,
    aliases: BTreeMap<String, String>,
}

impl<'a> Replay<'a> {
    pub fn new(service: &'a CheckoutService) -> Self {
        Self {
            service,
            aliases: BTreeMap::new(),
        }
    }

    /// Applies one operation under a fresh request context.
    pub async fn apply(&mut self, operation: &Operation) -> Result<()> {
        let ctx = Context::new();
        match operation.op {
            OperationKind::Create => {
                if self.aliases.contains_key(&operation.basket) {
                    return Err(CheckoutError::ValidationError(format!(
                        "basket alias {} is already bound",
                        operation.basket
                    )));
                }
                let basket = self.service.basket_create(&ctx).await?;
                let id = basket.id.ok_or_else(|| {
                    CheckoutError::InternalError("store returned a basket without id".into())
                })?;
                self.aliases.insert(operation.basket.clone(), id);
            }
            OperationKind::Add => {
                let (product, quantity) = item_args(operation)?;
                let id = self.resolve(&operation.basket)?;
                self.service
                    .basket_add_item(&ctx, id, product, quantity)
                    .await?;
            }
            OperationKind::Remove => {
                let (product, quantity) = item_args(operation)?;
                let id = self.resolve(&operation.basket)?;
                self.service
                    .basket_remove_item(&ctx, id, product, quantity)
                    .await?;
            }
            OperationKind::Delete => {
                let id = self.resolve(&operation.basket)?;
                self.service.basket_delete(&ctx, id).await?;
            }
            OperationKind::Get => {
                let id = self.resolve(&operation.basket)?;
                let basket = self.service.basket_get(&ctx, id).await?;
                info!(
                    alias = %operation.basket,
                    subtotal = %basket.subtotal.value(),
                    discount = %basket.discount.value(),
                    total = %basket.total.value(),
                    "basket_read"
                );
            }
        }
        Ok(())
    }

    /// Current state of every basket that still exists, keyed by alias.
    pub async fn baskets(&self) -> Result<BTreeMap<String, Basket>> {
        let ctx = Context::new();
        let mut baskets = BTreeMap::new();
        for (alias, id) in &self.aliases {
            match self.service.basket_get(&ctx, id).await {
                Ok(basket) => {
                    baskets.insert(alias.clone(), basket);
                }
                Err(CheckoutError::NotFound { .. }) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(baskets)
    }

    fn resolve(&self, alias: &str) -> Result<&str> {
        self.aliases
            .get(alias)
            .map(String::as_str)
            .ok_or_else(|| CheckoutError::not_found(Entity::Basket, alias))
    }
}

fn item_args(operation: &Operation) -> Result<(&str, u32)> {
    match (&operation.product, operation.quantity) {
        (Some(product), Some(quantity)) => Ok((product.as_str(), quantity)),
        _ => Err(CheckoutError::ValidationError(format!(
            "{:?} on {} needs a product and a quantity",
            operation.op, operation.basket
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LockerConfig;
    use crate::error::ErrorKind;
    use crate::infrastructure::in_memory::{InMemoryBasketStore, InMemoryCatalogStore};
    use crate::infrastructure::locker::InMemoryLocker;
    use crate::infrastructure::seed::CatalogSeed;
    use crate::interfaces::csv::operation_reader::OperationReader;
    use rust_decimal_macros::dec;

    fn service() -> CheckoutService {
        CheckoutService::new(
            Box::new(InMemoryBasketStore::new()),
            Box::new(InMemoryCatalogStore::from_seed(CatalogSeed::default_catalog()).unwrap()),
            Box::new(InMemoryLocker::new(LockerConfig::default())),
        )
    }

    fn op(
        kind: OperationKind,
        basket: &str,
        product: Option<&str>,
        quantity: Option<u32>,
    ) -> Operation {
        Operation {
            op: kind,
            basket: basket.to_string(),
            product: product.map(str::to_string),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_replay_from_csv() {
        let service = service();
        let mut replay = Replay::new(&service);
        let data = "op,basket,product,quantity\n\
                    create,b1\n\
                    add,b1,PEN,3\n\
                    add,b1,TSHIRT,3\n\
                    create,b2\n\
                    add,b2,MUG,1\n\
                    delete,b2\n";
        for operation in OperationReader::new(data.as_bytes()).operations() {
            replay.apply(&operation.unwrap()).await.unwrap();
        }

        let baskets = replay.baskets().await.unwrap();
        assert_eq!(baskets.len(), 1);
        let b1 = &baskets["b1"];
        assert_eq!(b1.subtotal.value(), dec!(75));
        assert_eq!(b1.discount.value(), dec!(20));
        assert_eq!(b1.total.value(), dec!(55));
    }

    #[tokio::test]
    async fn test_replay_errors() {
        let service = service();
        let mut replay = Replay::new(&service);

        let err = replay
            .apply(&op(OperationKind::Add, "ghost", Some("PEN"), Some(1)))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        replay
            .apply(&op(OperationKind::Create, "b1", None, None))
            .await
            .unwrap();
        let err = replay
            .apply(&op(OperationKind::Create, "b1", None, None))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = replay
            .apply(&op(OperationKind::Add, "b1", Some("PEN"), None))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = replay
            .apply(&op(OperationKind::Remove, "b1", Some("PEN"), Some(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::ItemNotInBasket { .. }));
    }

    #[tokio::test]
    async fn test_deleted_alias_stays_bound() {
        let service = service();
        let mut replay = Replay::new(&service);
        replay
            .apply(&op(OperationKind::Create, "b1", None, None))
            .await
            .unwrap();
        replay
            .apply(&op(OperationKind::Delete, "b1", None, None))
            .await
            .unwrap();

        let err = replay
            .apply(&op(OperationKind::Get, "b1", None, None))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(replay.baskets().await.unwrap().is_empty());
    }
}
