//! Machine states and the transition table.
//!
//! | State      | insert money        | select product        | cancel               |
//! |------------|---------------------|-----------------------|----------------------|
//! | Idle       | -> HasBalance       | rejected (no balance) | rejected (no tx)     |
//! | HasBalance | stays HasBalance    | sale -> Idle          | refund -> Idle       |
//! | Dispensing | busy                | busy                  | busy                 |
//!
//! A successful sale passes through `Dispensing` within a single call.

use std::fmt;

/// Operations of the transaction protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    InsertMoney,
    SelectProduct,
    Cancel,
}

/// Whether an operation may run from a given state, and where it leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The operation runs; on success the machine moves to the given state.
    Proceed(MachineState),
    /// Selecting needs money in the machine.
    NeedsBalance,
    /// Nothing to cancel.
    NoTransaction,
    /// A sale is completing.
    Busy,
}

/// The state of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MachineState {
    /// No money held.
    #[default]
    Idle,
    /// Money held, waiting for a selection or a cancel.
    HasBalance,
    /// A sale is being completed.
    Dispensing,
}

impl MachineState {
    pub fn name(self) -> &'static str {
        match self {
            MachineState::Idle => "Idle",
            MachineState::HasBalance => "HasBalance",
            MachineState::Dispensing => "Dispensing",
        }
    }

    /// Transition table lookup.
    pub fn on(self, operation: Operation) -> Transition {
        use MachineState::*;
        use Operation::*;

        match (self, operation) {
            (Idle, InsertMoney) => Transition::Proceed(HasBalance),
            (Idle, SelectProduct) => Transition::NeedsBalance,
            (Idle, Cancel) => Transition::NoTransaction,

            (HasBalance, InsertMoney) => Transition::Proceed(HasBalance),
            (HasBalance, SelectProduct) => Transition::Proceed(Dispensing),
            (HasBalance, Cancel) => Transition::Proceed(Idle),

            (Dispensing, _) => Transition::Busy,
        }
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
