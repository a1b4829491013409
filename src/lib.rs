//! # expense-splitter
//!
//! Shared group expense tracking with balance aggregation and greedy debt
//! simplification.
//!
//! Given the participants of a group and the expenses they recorded, this
//! crate computes what each participant is owed or owes, and a short list
//! of payments that settles everyone up.
//!
//! ## Architecture
//!
//! - **core**: Foundational types: participants, expenses, balance sheets, groups
//! - **optimization**: Balance aggregation, debt simplification, summaries
//! - **simulation**: Random group generation for benchmarks and testing

pub mod core;
pub mod optimization;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::balance::BalanceSheet;
    pub use crate::core::expense::{Expense, ExpenseId};
    pub use crate::core::group::{Group, GroupError, GroupSnapshot, NewExpense};
    pub use crate::core::participant::ParticipantId;
    pub use crate::optimization::aggregation::compute_balances;
    pub use crate::optimization::simplification::{
        simplify_debts, simplify_debts_with, Settlement, SettlementConfig, SettlementPlan,
    };
    pub use crate::optimization::summary::{BalanceStatus, GroupSummary};
}
