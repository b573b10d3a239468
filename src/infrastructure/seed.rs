use crate::domain::money::{Percentage, Price};
use crate::domain::product::Product;
use crate::domain::promotion::Promotion;
use crate::error::{CheckoutError, Result};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub const BUY_2_GET_1_FREE: &str = "BUY2GET1FREE";
pub const BUY_3_GET_25_OFF: &str = "BUY3GET25OFF";

/// Initial catalog contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub promotions: Vec<Promotion>,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl CatalogSeed {
    /// The stock catalog: pens, t-shirts and mugs.
    pub fn default_catalog() -> Self {
        Self {
            promotions: vec![
                Promotion::new(BUY_2_GET_1_FREE, 2, 1, Percentage::ZERO),
                Promotion::new(BUY_3_GET_25_OFF, 3, 0, Percentage(dec!(25))),
            ],
            products: vec![
                Product::new("PEN", "Lana Pen", Price(dec!(5.00))).with_promotion(BUY_2_GET_1_FREE),
                Product::new("TSHIRT", "Lana T-Shirt", Price(dec!(20.00)))
                    .with_promotion(BUY_3_GET_25_OFF),
                Product::new("MUG", "Lana Coffee Mug", Price(dec!(7.50))),
            ],
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let seed: Self = serde_json::from_reader(reader)?;
        seed.validate()?;
        Ok(seed)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Every promotion a product references must be part of the seed.
    pub fn validate(&self) -> Result<()> {
        let known: HashSet<&str> = self.promotions.iter().map(|p| p.id.as_str()).collect();
        for product in &self.products {
            if let Some(promotion_id) = &product.promotion_id
                && !known.contains(promotion_id.as_str())
            {
                return Err(CheckoutError::ValidationError(format!(
                    "product {} references unknown promotion {}",
                    product.id, promotion_id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_valid() {
        let seed = CatalogSeed::default_catalog();
        assert!(seed.validate().is_ok());
        assert_eq!(seed.products.len(), 3);
        assert_eq!(seed.promotions.len(), 2);
    }

    #[test]
    fn test_from_reader() {
        let json = r#"{
            "promotions": [{"id": "HALF", "required_items": 1, "reduction": 50}],
            "products": [
                {"id": "BOOK", "name": "Book", "price": "12.00", "promotion_id": "HALF"},
                {"id": "PEN", "name": "Pen", "price": 1}
            ]
        }"#;
        let seed = CatalogSeed::from_reader(json.as_bytes()).unwrap();
        assert_eq!(seed.products.len(), 2);
        assert_eq!(seed.promotions[0].free_items, 0);
        assert_eq!(seed.promotions[0].reduction.value(), dec!(50));
    }

    #[test]
    fn test_unknown_promotion_rejected() {
        let json = r#"{"products": [{"id": "BOOK", "name": "Book", "price": 1, "promotion_id": "NOPE"}]}"#;
        let err = CatalogSeed::from_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, CheckoutError::ValidationError(_)));
    }

    #[test]
    fn test_out_of_range_reduction_rejected() {
        let json = r#"{"promotions": [{"id": "BAD", "required_items": 1, "reduction": 150}]}"#;
        assert!(matches!(
            CatalogSeed::from_reader(json.as_bytes()),
            Err(CheckoutError::JsonError(_))
        ));
    }
}
