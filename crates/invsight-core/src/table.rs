//! Immutable in-memory dataset.

use std::collections::HashSet;

use crate::{ProductName, SalesRecord, SelectionError};

/// Loaded dataset rows plus the distinct product list.
///
/// The table is never mutated after construction; share it as
/// `Arc<InventoryTable>` between concurrent readers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InventoryTable {
    records: Vec<SalesRecord>,
    products: Vec<ProductName>,
}

impl InventoryTable {
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        let mut seen = HashSet::new();
        let mut products = Vec::new();
        for record in &records {
            if seen.insert(record.product.as_str()) {
                products.push(record.product.clone());
            }
        }

        Self { records, products }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct product names in first-appearance order.
    pub fn products(&self) -> &[ProductName] {
        &self.products
    }

    pub fn contains_product(&self, name: &str) -> bool {
        self.products.iter().any(|product| product.as_str() == name)
    }

    /// Resolve a caller-supplied product against the distinct product set.
    pub fn select_product(&self, name: &str) -> Result<&ProductName, SelectionError> {
        let requested = name.trim();
        self.products
            .iter()
            .find(|product| product.as_str() == requested)
            .ok_or_else(|| SelectionError {
                requested: requested.to_owned(),
                available: self.products.iter().map(|p| p.to_string()).collect(),
            })
    }
}
