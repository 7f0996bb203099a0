//! Transaction engine of a dispensing machine.
//!
//! The machine accepts money, validates a selection against its inventory
//! and exchanges the balance for one unit of stock plus change. Every
//! operation runs to completion before the next one is accepted.
//! Also supports async stream of commands.

use std::fmt;

use tokio_stream::{Stream, StreamExt};
use tracing::{error, info};

use crate::Amount;
use crate::inventory::{Inventory, StockLine};
use crate::model::{CatalogEntry, Command, Outcome, Sale};

mod state;
pub use state::{MachineState, Operation, Transition};

mod error;
pub use error::MachineError;

/// Read-only view of a machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub name: String,
    pub balance: Amount,
    pub revenue: Amount,
    pub state: MachineState,
    pub inventory: Vec<StockLine>,
}

/// A single dispensing machine.
///
/// Owns its inventory and balance exclusively. Outside of a sale the
/// balance is zero exactly when the machine is `Idle`.
pub struct Machine {
    name: String,
    inventory: Inventory,
    balance: Amount,
    /// Sum of the prices of all products sold
    revenue: Amount,
    state: MachineState,
}

/// Public API
impl Machine {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inventory: Inventory::new(),
            balance: Amount::ZERO,
            revenue: Amount::ZERO,
            state: MachineState::Idle,
        }
    }

    /// Run the machine with the given command stream
    pub async fn run(&mut self, mut stream: impl Stream<Item = Command> + Unpin) {
        while let Some(command) = stream.next().await {
            // a rejected command should not stop the machine, the result is logged by `apply`
            let _ = self.apply(command);
        }
    }

    /// Apply a single command on top of the current machine state
    pub fn apply(&mut self, command: Command) -> Result<Outcome, MachineError> {
        let kind = command.kind();
        let result = match command {
            Command::Stock {
                code,
                name,
                price,
                quantity,
            } => self
                .add_stock(code, name, price, quantity)
                .map(|()| Outcome::Stocked),
            Command::InsertMoney { amount } => self.insert_money(amount).map(Outcome::Credited),
            Command::SelectProduct { code } => self.select_product(&code).map(Outcome::Sold),
            Command::Cancel => self.cancel().map(Outcome::Refunded),
        };
        self.log_result(kind, &result);
        result
    }

    /// Add money to the balance and return the new balance.
    pub fn insert_money(&mut self, amount: Amount) -> Result<Amount, MachineError> {
        let next = self.admit(Operation::InsertMoney)?;

        if !amount.is_positive() {
            return Err(MachineError::InvalidAmount(amount));
        }
        let balance = self
            .balance
            .checked_add(amount)
            .ok_or(MachineError::InvalidAmount(amount))?;

        self.balance = balance;
        self.state = next;
        Ok(balance)
    }

    /// Buy one unit of the product stored under `code`.
    ///
    /// - Ensure the code is known and has stock
    /// - Ensure the balance covers the price and revenue can absorb it
    /// - Dispense, move the price to revenue and hand back the rest as change
    ///
    /// Any rejection leaves balance, state and inventory untouched.
    pub fn select_product(&mut self, code: &str) -> Result<Sale, MachineError> {
        let next = self.admit(Operation::SelectProduct)?;

        let entry = self
            .inventory
            .lookup(code)
            .cloned()
            .ok_or_else(|| MachineError::ProductNotFound(code.to_string()))?;

        if !self.inventory.has_stock(&entry) {
            return Err(MachineError::OutOfStock(code.to_string()));
        }

        if self.balance < entry.price() {
            return Err(MachineError::InsufficientFunds {
                code: code.to_string(),
                shortfall: entry.price() - self.balance,
            });
        }

        let revenue = self
            .revenue
            .checked_add(entry.price())
            .ok_or(MachineError::RevenueOverflow(entry.price()))?;

        self.state = next;
        self.dispense(entry, revenue)
    }

    /// Abort the transaction and return the full balance.
    pub fn cancel(&mut self) -> Result<Amount, MachineError> {
        let next = self.admit(Operation::Cancel)?;

        let refund = self.balance;
        self.balance = Amount::ZERO;
        self.state = next;
        Ok(refund)
    }

    /// Load `quantity` units of a product. Not part of the transaction
    /// protocol, so it is accepted in any state.
    pub fn add_stock(
        &mut self,
        code: impl Into<String>,
        name: impl Into<String>,
        price: Amount,
        quantity: u32,
    ) -> Result<(), MachineError> {
        if price < Amount::ZERO {
            return Err(MachineError::InvalidAmount(price));
        }
        self.inventory
            .add_stock(CatalogEntry::new(code, name, price), quantity)?;
        Ok(())
    }

    pub fn status(&self) -> Status {
        Status {
            name: self.name.clone(),
            balance: self.balance,
            revenue: self.revenue,
            state: self.state,
            inventory: self.inventory.snapshot(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn revenue(&self) -> Amount {
        self.revenue
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }
}

/// Private API
impl Machine {
    /// Look up the transition for `operation`, mapping refusals to errors.
    fn admit(&self, operation: Operation) -> Result<MachineState, MachineError> {
        match self.state.on(operation) {
            Transition::Proceed(next) => Ok(next),
            Transition::NeedsBalance => Err(MachineError::NoBalance),
            Transition::NoTransaction => Err(MachineError::NoActiveTransaction),
            Transition::Busy => Err(MachineError::MachineBusy),
        }
    }

    /// Complete a sale of a product whose stock and price were just checked.
    /// `revenue` is the lifetime revenue including this sale.
    /// Must be called in the `Dispensing` state.
    fn dispense(&mut self, entry: CatalogEntry, revenue: Amount) -> Result<Sale, MachineError> {
        debug_assert_eq!(self.state, MachineState::Dispensing);

        if let Err(e) = self.inventory.dispense_one(&entry) {
            // stays in Dispensing, every later operation is refused
            error!(
                machine = %self.name,
                code = %entry.code(),
                balance = %self.balance,
                reason = %e,
                "stock vanished while dispensing, machine out of service"
            );
            return Err(MachineError::Fault(e));
        }

        let change = self.balance - entry.price();
        self.revenue = revenue;
        self.balance = Amount::ZERO;
        self.state = MachineState::Idle;

        Ok(Sale { entry, change })
    }

    /// Small helper to log `apply` results
    fn log_result(&self, kind: &str, result: &Result<Outcome, MachineError>) {
        match result {
            Ok(outcome) => {
                info!(
                    machine = %self.name,
                    state = %self.state,
                    balance = %self.balance,
                    outcome = %outcome,
                    "{kind} applied"
                );
            }
            Err(e) => {
                info!(
                    machine = %self.name,
                    state = %self.state,
                    balance = %self.balance,
                    reason = %e,
                    "{kind} rejected"
                );
            }
        }
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (balance: {}, revenue: {}, {}, {})",
            self.name, self.balance, self.revenue, self.inventory, self.state
        )
    }
}
