use std::fmt;
use thiserror::Error;

/// The kind of record a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Basket,
    Product,
    Promotion,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Basket => f.write_str("basket"),
            Entity::Product => f.write_str("product"),
            Entity::Promotion => f.write_str("promotion"),
        }
    }
}

/// Coarse classification of a [`CheckoutError`].
///
/// Boundary layers map these onto their own status codes (404, 409, 400, 500).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
    Internal,
}

impl ErrorKind {
    /// Only lock contention is worth retrying as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Conflict)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound => f.write_str("not_found"),
            ErrorKind::Conflict => f.write_str("conflict"),
            ErrorKind::Validation => f.write_str("validation"),
            ErrorKind::Internal => f.write_str("internal"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: String },
    #[error("the resource '{0}' is locked")]
    ResourceLocked(String),
    #[error("item {product_id} not found in basket {basket_id}")]
    ItemNotInBasket {
        product_id: String,
        basket_id: String,
    },
    #[error("can't remove {requested} {product_id}. item quantity: {available}")]
    InsufficientQuantity {
        product_id: String,
        requested: u32,
        available: u32,
    },
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Internal error: {0}")]
    InternalError(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CheckoutError {
    pub fn not_found(entity: Entity, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckoutError::NotFound { .. } => ErrorKind::NotFound,
            CheckoutError::ResourceLocked(_) => ErrorKind::Conflict,
            CheckoutError::ItemNotInBasket { .. }
            | CheckoutError::InsufficientQuantity { .. }
            | CheckoutError::ValidationError(_)
            | CheckoutError::CsvError(_)
            | CheckoutError::JsonError(_) => ErrorKind::Validation,
            CheckoutError::InternalError(_) | CheckoutError::IoError(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CheckoutError::not_found(Entity::Basket, "b-1");
        assert_eq!(err.to_string(), "basket b-1 not found");

        let err = CheckoutError::ResourceLocked("basket-b-1".to_string());
        assert_eq!(err.to_string(), "the resource 'basket-b-1' is locked");

        let err = CheckoutError::InsufficientQuantity {
            product_id: "PEN".to_string(),
            requested: 10,
            available: 1,
        };
        assert_eq!(err.to_string(), "can't remove 10 PEN. item quantity: 1");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            CheckoutError::not_found(Entity::Product, "PEN").kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            CheckoutError::ResourceLocked("x".to_string()).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            CheckoutError::ItemNotInBasket {
                product_id: "PEN".to_string(),
                basket_id: "b".to_string(),
            }
            .kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            CheckoutError::InternalError(Box::new(std::io::Error::other("disk"))).kind(),
            ErrorKind::Internal
        );
        assert!(ErrorKind::Conflict.is_retryable());
        assert!(!ErrorKind::NotFound.is_retryable());
    }
}
