//! Stock counts keyed by catalog code.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;
use tracing::warn;

use crate::model::{CatalogEntry, ProductCode};

/// Errors raised by inventory operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("invalid quantity {quantity} for product {code}")]
    InvalidQuantity { code: ProductCode, quantity: u32 },

    #[error("code {code} is already stocked as '{existing}', not '{requested}'")]
    CodeConflict {
        code: ProductCode,
        existing: String,
        requested: String,
    },

    #[error("product {0} is out of stock")]
    OutOfStock(ProductCode),
}

#[derive(Debug, Clone)]
struct Slot {
    entry: CatalogEntry,
    count: u32,
}

/// One line of an inventory snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct StockLine {
    pub entry: CatalogEntry,
    pub count: u32,
}

/// Product stock of a single machine.
///
/// Counts never go negative and entries are never removed; a product that
/// sells out stays listed with a count of zero.
#[derive(Debug, Default, Clone)]
pub struct Inventory {
    slots: BTreeMap<ProductCode, Slot>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the entry stocked under `code`, whether or not units remain.
    pub fn lookup(&self, code: &str) -> Option<&CatalogEntry> {
        self.slots.get(code).map(|slot| &slot.entry)
    }

    /// Add `quantity` units of `entry`, registering it if the code is new.
    ///
    /// An existing code keeps its original name and price. A different name
    /// is a configuration error; a different price is ignored with a warning.
    pub fn add_stock(&mut self, entry: CatalogEntry, quantity: u32) -> Result<(), InventoryError> {
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity {
                code: entry.code().to_string(),
                quantity,
            });
        }

        let Some(slot) = self.slots.get_mut(entry.code()) else {
            self.slots.insert(
                entry.code().to_string(),
                Slot {
                    entry,
                    count: quantity,
                },
            );
            return Ok(());
        };

        if slot.entry.name() != entry.name() {
            return Err(InventoryError::CodeConflict {
                code: entry.code().to_string(),
                existing: slot.entry.name().to_string(),
                requested: entry.name().to_string(),
            });
        }

        let count = slot
            .count
            .checked_add(quantity)
            .ok_or_else(|| InventoryError::InvalidQuantity {
                code: entry.code().to_string(),
                quantity,
            })?;

        if slot.entry.price() != entry.price() {
            warn!(
                code = %entry.code(),
                price = %slot.entry.price(),
                requested = %entry.price(),
                "restock price differs, keeping original price"
            );
        }
        slot.count = count;

        Ok(())
    }

    pub fn stock_count(&self, entry: &CatalogEntry) -> u32 {
        self.slots.get(entry.code()).map_or(0, |slot| slot.count)
    }

    pub fn has_stock(&self, entry: &CatalogEntry) -> bool {
        self.stock_count(entry) > 0
    }

    /// Remove exactly one unit of `entry`.
    pub fn dispense_one(&mut self, entry: &CatalogEntry) -> Result<(), InventoryError> {
        match self.slots.get_mut(entry.code()) {
            Some(slot) if slot.count > 0 => {
                slot.count -= 1;
                Ok(())
            }
            _ => Err(InventoryError::OutOfStock(entry.code().to_string())),
        }
    }

    /// Number of distinct products, including sold-out ones.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Total units across all products.
    pub fn total_items(&self) -> u64 {
        self.slots.values().map(|slot| u64::from(slot.count)).sum()
    }

    /// Stock lines ordered by code.
    pub fn snapshot(&self) -> Vec<StockLine> {
        self.slots
            .values()
            .map(|slot| StockLine {
                entry: slot.entry.clone(),
                count: slot.count,
            })
            .collect()
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Inventory(unique products={}, total items={})",
            self.len(),
            self.total_items()
        )
    }
}
