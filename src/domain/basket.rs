use super::money::Money;
use super::product::Product;
use super::promotion::Promotion;
use crate::error::CheckoutError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A request to put `quantity` units of a product into a basket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetail {
    #[serde(rename = "id")]
    pub product_id: String,
    pub quantity: u32,
}

impl ItemDetail {
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// One line of a basket.
///
/// Holds a snapshot of the product and the promotion resolved when the line was
/// first created, so later catalog changes never reprice an existing line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketItem {
    pub product: Product,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<Promotion>,
    pub quantity: u32,
    /// Line total before discount.
    pub total: Money,
    pub discount: Money,
}

impl BasketItem {
    pub fn new(product: Product, promotion: Option<Promotion>) -> Self {
        Self {
            product,
            promotion,
            quantity: 0,
            total: Money::ZERO,
            discount: Money::ZERO,
        }
    }

    /// Adds `quantity` units. A line can never hold more than `u32::MAX` units;
    /// going past that is a `ValidationError` and leaves the line unchanged.
    pub fn add_quantity(&mut self, quantity: u32) -> Result<(), CheckoutError> {
        let next = self.quantity.checked_add(quantity).ok_or_else(|| {
            CheckoutError::ValidationError(format!(
                "can't add {quantity} {}. item quantity: {}",
                self.product.id, self.quantity
            ))
        })?;
        self.set_quantity(next)
    }

    /// Takes `quantity` units off the line. Never removes a partial amount.
    pub fn remove_quantity(&mut self, quantity: u32) -> Result<(), CheckoutError> {
        if quantity > self.quantity {
            return Err(CheckoutError::InsufficientQuantity {
                product_id: self.product.id.clone(),
                requested: quantity,
                available: self.quantity,
            });
        }
        self.set_quantity(self.quantity - quantity)
    }

    fn set_quantity(&mut self, quantity: u32) -> Result<(), CheckoutError> {
        let total = self.product.price.times(quantity)?.round_cents();
        let discount = match &self.promotion {
            Some(promotion) => promotion.discount(self.product.price, quantity, total)?,
            None => Money::ZERO,
        };
        self.quantity = quantity;
        self.total = total;
        self.discount = discount;
        Ok(())
    }
}

/// A shopping basket.
///
/// `id` and `created_at` stay empty until the basket store saves it for the
/// first time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Basket {
    pub id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub items: HashMap<String, BasketItem>,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
}

impl Basket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_item(&self, product_id: &str) -> Option<&BasketItem> {
        self.items.get(product_id)
    }

    /// Stores `item` under its product id, dropping it once it reaches zero
    /// units, and recomputes the basket totals. If the totals no longer fit in
    /// a decimal the basket is left as it was.
    pub fn save_item(&mut self, item: BasketItem) -> Result<(), CheckoutError> {
        let product_id = item.product.id.clone();
        let previous = if item.quantity == 0 {
            self.items.remove(&product_id)
        } else {
            self.items.insert(product_id.clone(), item)
        };

        if let Err(err) = self.update_totals() {
            match previous {
                Some(previous) => {
                    self.items.insert(product_id, previous);
                }
                None => {
                    self.items.remove(&product_id);
                }
            }
            return Err(err);
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn update_totals(&mut self) -> Result<(), CheckoutError> {
        let subtotal = Money::checked_sum(self.items.values().map(|item| item.total))?;
        let discount = Money::checked_sum(self.items.values().map(|item| item.discount))?;
        let total = subtotal.checked_sub(discount)?;
        self.subtotal = subtotal.round_cents();
        self.discount = discount.round_cents();
        self.total = total.round_cents();
        Ok(())
    }
}
