pub mod compare;
pub mod normalize;
pub mod parser;
pub mod session;
pub mod workflow;

pub use crate::domain::model::{Item, SessionResult, SessionStatus};
pub use crate::domain::ports::{AutomationAgent, PreferenceSource, StatusSink};
pub use crate::utils::error::Result;
