pub mod amount;
pub mod csv;
pub mod engine;
pub mod inventory;
pub mod model;

pub use amount::Amount;
pub use engine::Machine;
pub use inventory::Inventory;
pub use model::{CatalogEntry, Command, Outcome, ProductCode, Sale};
