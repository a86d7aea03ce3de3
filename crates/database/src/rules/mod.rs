//! Pure business rules over already-loaded rows.
//!
//! Nothing in here touches the database; callers pass `today` explicitly so
//! the derivations are deterministic.

pub mod budget;
pub mod deadline;
pub mod event;
pub mod payment;
pub mod schedule;
pub mod template;

pub use budget::{BudgetSummary, CategorySummary};
pub use payment::{AssignmentPayment, StaffCostSummary};
