//! Error types for machine operations.

use thiserror::Error;

use crate::Amount;
use crate::inventory::InventoryError;
use crate::model::ProductCode;

/// Error returned by the operations of [`Machine`](super::Machine).
///
/// Every variant except `MachineBusy` and `Fault` leaves balance and
/// inventory exactly as they were before the call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("invalid amount {0}")]
    InvalidAmount(Amount),

    #[error("machine is dispensing a product, please wait")]
    MachineBusy,

    #[error("no transaction to cancel")]
    NoActiveTransaction,

    #[error("insert money before selecting a product")]
    NoBalance,

    #[error("product {0} not found")]
    ProductNotFound(ProductCode),

    #[error("product {0} is out of stock")]
    OutOfStock(ProductCode),

    #[error("insufficient funds for product {code}: need {shortfall} more")]
    InsufficientFunds { code: ProductCode, shortfall: Amount },

    #[error("lifetime revenue cannot absorb a sale of {0}")]
    RevenueOverflow(Amount),

    #[error("stocking failed: {0}")]
    Stocking(#[from] InventoryError),

    /// Stock vanished between the check and the dispense; the machine is
    /// left out of service.
    #[error("internal fault while dispensing: {0}")]
    Fault(InventoryError),
}
