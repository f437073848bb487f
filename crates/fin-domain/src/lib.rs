//! fin-domain
//!
//! Pure domain models (Category, Batch, Transaction, ReserveGoal, FinanceState).
//! No I/O, no storage. Only data types, core enums and the built-in seed state.

pub mod balances;
pub mod batch;
pub mod category;
pub mod common;
pub mod reserve;
pub mod seed;
pub mod state;
pub mod transaction;

pub use balances::*;
pub use batch::*;
pub use category::*;
pub use common::*;
pub use reserve::*;
pub use state::*;
pub use transaction::*;
