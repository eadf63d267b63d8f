//! Typed wrappers over the inventory service endpoints

pub mod auth;
pub mod category;
pub mod inventory;
pub mod product;
pub mod supplier;

pub use auth::AuthService;
pub use category::CategoryService;
pub use inventory::InventoryService;
pub use product::ProductService;
pub use supplier::SupplierService;
