//! Domain models for the medstock system.

mod inventory;
mod medicine;
mod notification;
mod pharmacy;
mod supply;

pub use inventory::*;
pub use medicine::*;
pub use notification::*;
pub use pharmacy::*;
pub use supply::*;
