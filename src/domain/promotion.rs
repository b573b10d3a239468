use super::basket::BasketItem;
use super::money::{Money, Percentage, Price};
use crate::error::CheckoutError;
use serde::{Deserialize, Serialize};

/// A quantity-triggered discount rule.
///
/// Once a line reaches `required_items` units the promotion grants
/// `free_items` units for every complete multiple of `required_items`, and
/// takes `reduction` percent off the line total. Both parts add up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: String,
    pub required_items: u32,
    #[serde(default)]
    pub free_items: u32,
    #[serde(default)]
    pub reduction: Percentage,
}

impl Promotion {
    pub fn new(
        id: impl Into<String>,
        required_items: u32,
        free_items: u32,
        reduction: Percentage,
    ) -> Self {
        Self {
            id: id.into(),
            required_items,
            free_items,
            reduction,
        }
    }

    /// Discount this promotion grants on `item`, rounded to cents.
    ///
    /// A promotion with `required_items == 0` is always active but yields no
    /// free-item bundles. Amounts too large for a decimal are a
    /// `ValidationError`.
    pub fn apply(&self, item: &BasketItem) -> Result<Money, CheckoutError> {
        self.discount(item.product.price, item.quantity, item.total)
    }

    pub(crate) fn discount(
        &self,
        unit_price: Price,
        quantity: u32,
        total: Money,
    ) -> Result<Money, CheckoutError> {
        if quantity < self.required_items {
            return Ok(Money::ZERO);
        }

        let bundles = quantity
            .checked_div(self.required_items)
            .unwrap_or_default();
        let free_units = self.free_items.checked_mul(bundles).ok_or_else(|| {
            CheckoutError::ValidationError(format!(
                "promotion {} grants more free units than a line can hold",
                self.id
            ))
        })?;
        let free_items_discount = unit_price.times(free_units)?;

        let reduction_discount = self.reduction.of(total)?;

        Ok(free_items_discount
            .checked_add(reduction_discount)?
            .round_cents())
    }
}
