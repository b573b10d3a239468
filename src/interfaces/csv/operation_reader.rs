use crate::error::{CheckoutError, Result};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Create,
    Add,
    Remove,
    Delete,
    Get,
}

/// One row of an operations file.
///
/// `basket` is an alias picked by the author of the file; `create` binds it to
/// the identifier the store generates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Operation {
    pub op: OperationKind,
    pub basket: String,
    pub product: Option<String>,
    pub quantity: Option<u32>,
}

/// Reads basket operations from a CSV source with the header
/// `op,basket,product,quantity`.
///
/// Whitespace around fields is trimmed and short rows are accepted, so
/// `create,b1` needs no trailing commas.
pub struct OperationReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OperationReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes rows; a malformed row yields an error and the
    /// iterator moves on to the next one.
    pub fn operations(self) -> impl Iterator<Item = Result<Operation>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CheckoutError::from))
    }
}
