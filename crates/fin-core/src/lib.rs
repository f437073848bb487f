//! fin-core
//!
//! Business rules for the finance ledger: batch lifecycle, transactions, budgets,
//! reserve goals and read-model aggregations. Depends on fin-domain.
//! No terminal I/O; persistence goes through the `FinanceStorage` trait.

pub mod batch_service;
pub mod budget_service;
pub mod category_service;
pub mod command;
pub mod error;
pub mod format;
pub mod reserve_service;
pub mod storage;
pub mod store;
pub mod summary_service;
pub mod transaction_service;
mod validate;

pub use batch_service::*;
pub use budget_service::*;
pub use category_service::*;
pub use command::*;
pub use error::{CoreError, CoreResult};
pub use reserve_service::*;
pub use storage::*;
pub use store::*;
pub use summary_service::*;
pub use transaction_service::*;
