//! Core domain types for the dispensing engine.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::Amount;

/// Catalog code identifying a product slot (e.g. `A1`).
pub type ProductCode = String;

/// A sellable item: its code, display name and unit price.
///
/// Two entries are the same product when their codes match; the name and
/// price do not take part in equality or hashing.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    code: ProductCode,
    name: String,
    price: Amount,
}

impl CatalogEntry {
    pub fn new(code: impl Into<ProductCode>, name: impl Into<String>, price: Amount) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            price,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Amount {
        self.price
    }
}

impl PartialEq for CatalogEntry {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for CatalogEntry {}

impl Hash for CatalogEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.code, self.name, self.price)
    }
}

/// A command representing the possible inputs of the machine.
#[derive(Debug, Clone)]
pub enum Command {
    /// Load units of a product into the machine (administrative).
    Stock {
        code: ProductCode,
        name: String,
        price: Amount,
        quantity: u32,
    },
    /// Add money to the current balance.
    InsertMoney { amount: Amount },
    /// Buy one unit of the product stored under `code`.
    SelectProduct { code: ProductCode },
    /// Abort the transaction and refund the balance.
    Cancel,
}

impl Command {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Stock { .. } => "stock",
            Command::InsertMoney { .. } => "insert",
            Command::SelectProduct { .. } => "select",
            Command::Cancel => "cancel",
        }
    }
}

/// A completed sale: the released product and the change owed.
#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    pub entry: CatalogEntry,
    pub change: Amount,
}

/// Result of a successfully applied [`Command`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Stocked,
    /// New balance after the insertion.
    Credited(Amount),
    Sold(Sale),
    Refunded(Amount),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Stocked => write!(f, "stocked"),
            Outcome::Credited(balance) => write!(f, "balance {balance}"),
            Outcome::Sold(sale) => write!(f, "sold {} change {}", sale.entry.code(), sale.change),
            Outcome::Refunded(refund) => write!(f, "refunded {refund}"),
        }
    }
}
