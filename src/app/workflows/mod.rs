pub mod comparison;
pub mod event;

pub use comparison::{ComparisonOutcome, ComparisonWorkflow};
pub use event::{EventReport, EventWorkflow, FixedMenuSource, StageSummary};
