use crate::domain::basket::Basket;
use crate::domain::product::Product;
use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// Writes final state as pretty JSON, one document per call.
pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Baskets keyed by alias.
    pub fn write_baskets(&mut self, baskets: &BTreeMap<String, Basket>) -> Result<()> {
        self.write(baskets)
    }

    /// The catalog, sorted by product id.
    pub fn write_products(&mut self, mut products: Vec<Product>) -> Result<()> {
        products.sort_by(|a, b| a.id.cmp(&b.id));
        self.write(&products)
    }

    fn write<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, value)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
