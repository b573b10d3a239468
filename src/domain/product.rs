use super::money::Price;
use serde::{Deserialize, Serialize};

/// A catalog entry.
///
/// `promotion_id` only names a promotion; the promotion itself lives in the
/// catalog store and is shared by every product pointing at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub promotion_id: Option<String>,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            promotion_id: None,
        }
    }

    pub fn with_promotion(mut self, promotion_id: impl Into<String>) -> Self {
        self.promotion_id = Some(promotion_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_product_deserialization() {
        let json = r#"{"id":"PEN","name":"Lana Pen","price":5.0,"promotion_id":"BUY2GET1FREE"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, "PEN");
        assert_eq!(product.price.value(), dec!(5.0));
        assert_eq!(product.promotion_id.as_deref(), Some("BUY2GET1FREE"));
    }

    #[test]
    fn test_product_without_promotion() {
        let json = r#"{"id":"MUG","name":"Lana Coffee Mug","price":"7.50"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.promotion_id, None);
    }

    #[test]
    fn test_product_negative_price_rejected() {
        let json = r#"{"id":"MUG","name":"Lana Coffee Mug","price":"-1"}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }
}
