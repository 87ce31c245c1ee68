//! Service layer
//!
//! Storage-backed operations. Every resource operation here is scoped by
//! `(id, owner_id)`; an unowned or absent record is indistinguishable from a
//! missing one.

pub mod category;
pub mod transaction;
pub mod user;

pub use category::{CategoryRecord, CategoryService};
pub use transaction::{NewTransaction, TransactionRecord, TransactionService};
pub use user::UserService;
