//! Domain module
//!
//! Pure domain types and policy, independent of the web and storage layers.

pub mod principal;
pub mod summary;
pub mod transaction;

pub use principal::{Principal, ROLE_USER};
pub use summary::{resolve_range, Summary, SummaryRange};
pub use transaction::TransactionKind;
