mod action;
mod error;
mod goal;
pub mod observer;
mod planner;
pub mod search;
mod state;
mod value;

pub use action::{Action, ActionLibrary, ActionSpec};
pub use error::{GoapError, Result};
pub use goal::{Goal, UnsatisfiedConditions};
pub use observer::{LoggingObserver, NoopObserver, PlanObserver, SearchEvent};
pub use planner::{Plan, PlanResult, PlanStats, PlanStatus, Planner, PlannerConfig};
pub use search::{Heuristic, SearchNode, UnsatisfiedConditionCount, ZeroHeuristic};
pub use state::{State, StateDiff};
pub use value::Value;
