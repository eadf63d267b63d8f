//! Domain models for the inventory console

mod category;
mod inventory;
mod product;
mod supplier;
mod user;

pub use category::*;
pub use inventory::*;
pub use product::*;
pub use supplier::*;
pub use user::*;

#[cfg(test)]
pub(crate) use product::fixtures;
