//! Hooks for watching a search as it runs.
//!
//! The planner returns plain data and never prints. Anything that wants to
//! report progress (a console banner, a debugger, a test probe) implements
//! [`PlanObserver`] and is handed structured [`SearchEvent`]s.

use crate::search::SearchNode;
use crate::{Goal, PlanResult, State};

/// Something that happened during a call to
/// [`Planner::generate_plan_observed`](crate::Planner::generate_plan_observed).
#[derive(Debug)]
pub enum SearchEvent<'e> {
    /// Emitted once, before the goal is checked against the initial state.
    Started { goal: &'e Goal, state: &'e State },
    /// Emitted after the successors of `node` were generated.
    /// `successors` counts the children actually pushed to the frontier.
    NodeExpanded {
        node: &'e SearchNode<'e>,
        successors: usize,
    },
    /// Emitted once, with the value the planner is about to return.
    Finished { goal: &'e Goal, result: &'e PlanResult },
}

pub trait PlanObserver {
    fn on_event(&mut self, event: &SearchEvent<'_>);
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PlanObserver for NoopObserver {
    fn on_event(&mut self, _event: &SearchEvent<'_>) {}
}

/// Renders searches through the `log` facade.
///
/// Goal banners, plan steps and statistics go to `info`, node expansions to
/// `trace`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl PlanObserver for LoggingObserver {
    fn on_event(&mut self, event: &SearchEvent<'_>) {
        match event {
            SearchEvent::Started { goal, state } => {
                log::info!("GOAL: {} (priority {})", goal.name(), goal.priority());
                log::info!("TARGET STATE: {}", goal.target_state());
                log::info!("INITIAL STATE: {}", state);
            }
            SearchEvent::NodeExpanded { node, successors } => {
                log::trace!("Expanded {} into {} successors", node, successors);
            }
            SearchEvent::Finished { goal, result } => {
                log::info!("{}: {}", goal.name(), result.message());
                if let Some(plan) = result.plan() {
                    for (i, action_name) in plan.iter().enumerate() {
                        log::info!("  {}. {}", i + 1, action_name);
                    }
                }
                for line in result.stats().to_string().lines() {
                    log::info!("{}", line);
                }
            }
        }
    }
}

