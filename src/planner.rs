//! # Planner Module for Goal-Oriented Action Planning (GOAP)
//!
//! The planner is the central component of the engine. Given an initial
//! world state and a goal, it searches the states reachable through the
//! registered actions and returns the cheapest action sequence it finds.
//!
//! ## Overview
//!
//! 1. Start with the current world state
//! 2. Define a goal to reach
//! 3. Consider every action whose preconditions hold, in registration order
//! 4. Explore with A*, always expanding the node with the lowest `g + h`
//!
//! Every call owns its own frontier, node arena and best-cost table; nothing
//! is cached between calls, so independent planners can run on separate
//! threads without coordination.
//!
//! ## Outcomes
//!
//! Not finding a plan is a normal outcome, reported through [`PlanStatus`]:
//! the search may prove that no plan exists in the reachable space, or it may
//! stop at the iteration or depth limit without being able to tell. Only
//! internal defects surface as `Err`.
//!
//! ## Basic Usage
//!
//! ```
//! use goap_planner::{Action, ActionLibrary, Goal, PlanStatus, Planner, State};
//!
//! let mut actions = ActionLibrary::new();
//! actions.register(
//!     Action::new("pickup_key", 1.0)?
//!         .with_precondition("key_available", true)
//!         .with_effect("has_key", true),
//! )?;
//! actions.register(
//!     Action::new("open_door", 1.0)?
//!         .with_precondition("has_key", true)
//!         .with_effect("door_open", true),
//! )?;
//!
//! let planner = Planner::new(actions);
//!
//! let mut state = State::new();
//! state.set("door_open", false);
//! state.set("has_key", false);
//! state.set("key_available", true);
//!
//! let goal = Goal::new([("door_open", true)].into_iter().collect())?;
//!
//! let result = planner.generate_plan(&state, &goal)?;
//! assert_eq!(result.status(), PlanStatus::PlanFound);
//! assert_eq!(result.plan().unwrap(), ["pickup_key", "open_door"]);
//! assert_eq!(result.stats().total_cost, 2.0);
//! # Ok::<(), goap_planner::GoapError>(())
//! ```

use crate::observer::{NoopObserver, PlanObserver, SearchEvent};
use crate::search::{Frontier, Heuristic, SearchTree, UnsatisfiedConditionCount};
use crate::{ActionLibrary, ActionSpec, GoapError, Goal, Result, State};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// An ordered list of action names, from the initial state to the goal.
pub type Plan = Vec<String>;

const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Search limits for a [`Planner`].
///
/// # Examples
///
/// ```
/// use goap_planner::PlannerConfig;
///
/// let config = PlannerConfig::from_json(r#"{"max_iterations": 50, "max_depth": 8}"#)?;
/// assert_eq!(config.max_iterations, 50);
/// assert_eq!(config.max_depth, Some(8));
///
/// assert!(PlannerConfig::from_json(r#"{"max_iterations": 0}"#).is_err());
/// # Ok::<(), goap_planner::GoapError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
    /// Maximum number of nodes popped from the frontier
    pub max_iterations: usize,
    /// Nodes at this depth are not expanded; `None` means unlimited
    pub max_depth: Option<usize>,
}

impl PlannerConfig {
    pub fn new(max_iterations: usize) -> Result<Self> {
        let config = Self {
            max_iterations,
            max_depth: None,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Result<Self> {
        self.max_depth = Some(max_depth);
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(GoapError::InvalidMaxIterations(self.max_iterations));
        }
        if let Some(0) = self.max_depth {
            return Err(GoapError::InvalidMaxDepth(0));
        }
        Ok(())
    }

    /// Loads and validates a configuration; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_depth: None,
        }
    }
}

/// How a call to [`Planner::generate_plan`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStatus {
    /// The initial state already meets the goal; the plan is empty.
    GoalAlreadySatisfied,
    PlanFound,
    /// Every reachable state was explored. No plan exists.
    SearchSpaceExhausted,
    /// The search stopped with unexplored nodes left. A plan may still exist.
    IterationLimitReached { max_iterations: usize },
    /// The frontier ran dry, but only because deeper nodes were pruned.
    /// A longer plan may still exist.
    DepthLimitReached { max_depth: usize },
}

impl PlanStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, PlanStatus::GoalAlreadySatisfied | PlanStatus::PlanFound)
    }
}

/// Diagnostic counters for one search. They never influence planning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanStats {
    /// Nodes popped from the frontier, stale entries included
    pub nodes_visited: usize,
    /// Successor states generated from applicable actions
    pub nodes_expanded: usize,
    pub plan_length: usize,
    pub total_cost: f64,
    pub duration: Duration,
}

impl fmt::Display for PlanStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PLANNING STATISTICS")?;
        writeln!(f, "- Nodes visited: {}", self.nodes_visited)?;
        writeln!(f, "- Nodes expanded: {}", self.nodes_expanded)?;
        writeln!(f, "- Plan length: {}", self.plan_length)?;
        writeln!(f, "- Total cost: {:.2}", self.total_cost)?;
        write!(f, "- Execution time: {:.4} seconds", self.duration.as_secs_f64())
    }
}

/// What [`Planner::generate_plan`] returns for every normal outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanResult {
    status: PlanStatus,
    plan: Option<Plan>,
    stats: PlanStats,
}

impl PlanResult {
    pub fn status(&self) -> PlanStatus {
        self.status
    }

    /// The plan, present exactly when the status is a success.
    pub fn plan(&self) -> Option<&[String]> {
        self.plan.as_deref()
    }

    pub fn into_plan(self) -> Option<Plan> {
        self.plan
    }

    pub fn stats(&self) -> &PlanStats {
        &self.stats
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// A human-readable summary of the outcome.
    pub fn message(&self) -> String {
        match self.status {
            PlanStatus::GoalAlreadySatisfied => "Goal is already satisfied".to_string(),
            PlanStatus::PlanFound => format!(
                "Found plan with {} actions (cost: {:.1})",
                self.stats.plan_length, self.stats.total_cost
            ),
            PlanStatus::SearchSpaceExhausted => {
                "No valid plan exists: search space exhausted".to_string()
            }
            PlanStatus::IterationLimitReached { max_iterations } => format!(
                "No plan found within {} iterations; the search was cut short",
                max_iterations
            ),
            PlanStatus::DepthLimitReached { max_depth } => format!(
                "No plan found within depth {}; deeper plans were not explored",
                max_depth
            ),
        }
    }
}

/// The cheapest known way to reach a state, and the depth it was reached at.
#[derive(Debug, Clone, Copy)]
struct BestKnown {
    g: f64,
    depth: usize,
}

impl BestKnown {
    /// Whether reaching the same state at `g` and `depth` can be skipped.
    /// Under a depth limit, a cheaper record only covers paths at least as deep.
    fn covers(&self, g: f64, depth: usize, depth_limited: bool) -> bool {
        self.g <= g && (!depth_limited || self.depth <= depth)
    }

    /// Whether a node reached at `g` and `depth` was superseded after being queued.
    fn supersedes(&self, g: f64, depth: usize, depth_limited: bool) -> bool {
        self.covers(g, depth, depth_limited)
            && (self.g < g || (depth_limited && self.depth < depth))
    }
}

/// An A* planner over a fixed library of actions.
#[derive(Clone)]
pub struct Planner {
    actions: ActionLibrary,
    config: PlannerConfig,
    heuristic: Arc<dyn Heuristic>,
}

impl Planner {
    /// Creates a planner with the default limits and the unsatisfied-condition heuristic.
    pub fn new(actions: ActionLibrary) -> Self {
        Self {
            actions,
            config: PlannerConfig::default(),
            heuristic: Arc::new(UnsatisfiedConditionCount),
        }
    }

    /// Builds a planner straight from action table rows.
    pub fn from_table(specs: impl IntoIterator<Item = ActionSpec>) -> Result<Self> {
        Ok(Self::new(ActionLibrary::from_specs(specs)?))
    }

    pub fn with_config(mut self, config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn with_heuristic(mut self, heuristic: impl Heuristic + 'static) -> Self {
        self.heuristic = Arc::new(heuristic);
        self
    }

    pub fn actions(&self) -> &ActionLibrary {
        &self.actions
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Searches for the cheapest action sequence that takes `state` to `goal`.
    ///
    /// # Errors
    ///
    /// Only internal defects, such as [`GoapError::CorruptedSearchTree`].
    /// Failing to find a plan is reported through [`PlanResult::status`].
    pub fn generate_plan(&self, state: &State, goal: &Goal) -> Result<PlanResult> {
        self.generate_plan_observed(state, goal, &mut NoopObserver)
    }

    /// Like [`Planner::generate_plan`], reporting progress to `observer`.
    pub fn generate_plan_observed(
        &self,
        state: &State,
        goal: &Goal,
        observer: &mut dyn PlanObserver,
    ) -> Result<PlanResult> {
        let started = Instant::now();
        let mut stats = PlanStats::default();

        observer.on_event(&SearchEvent::Started { goal, state });
        log::debug!("Planning to achieve goal: {}", goal);

        if goal.is_satisfied(state) {
            log::debug!("Goal already satisfied");
            let result = PlanResult {
                status: PlanStatus::GoalAlreadySatisfied,
                plan: Some(Vec::new()),
                stats,
            };
            return Ok(Self::finish(started, goal, result, observer));
        }

        let root_state = Rc::new(state.clone());
        let mut tree = SearchTree::new(
            Rc::clone(&root_state),
            self.heuristic.estimate(state, goal),
        );
        let mut frontier = Frontier::new();
        let mut best: HashMap<Rc<State>, BestKnown> = HashMap::new();
        let depth_limited = self.config.max_depth.is_some();

        best.insert(root_state, BestKnown { g: 0.0, depth: 0 });
        let root = tree.root();
        frontier.push(root, tree.get(root)?.f());

        let mut iterations = 0;
        let mut depth_pruned = false;

        let goal_node = loop {
            if iterations >= self.config.max_iterations && !frontier.is_empty() {
                break None;
            }
            let Some(current_id) = frontier.pop() else {
                break None;
            };
            iterations += 1;
            stats.nodes_visited += 1;

            let current = tree.get(current_id)?;
            let superseded = best.get(current.state()).map_or(false, |known| {
                known.supersedes(current.g(), current.depth(), depth_limited)
            });
            if superseded {
                continue;
            }

            if goal.is_satisfied(current.state()) {
                break Some(current_id);
            }

            if let Some(max_depth) = self.config.max_depth {
                if current.depth() >= max_depth {
                    depth_pruned = true;
                    continue;
                }
            }

            let current_g = current.g();
            let child_depth = current.depth() + 1;
            let current_state = Rc::clone(current.shared_state());
            let mut successors = 0;

            for action in self.actions.applicable_actions(&current_state) {
                stats.nodes_expanded += 1;

                let next_state = action.apply(&current_state)?;
                let tentative_g = current_g + action.cost();
                let covered = best.get(&next_state).map_or(false, |known| {
                    known.covers(tentative_g, child_depth, depth_limited)
                });
                if covered {
                    continue;
                }

                let next_state = Rc::new(next_state);
                best.insert(
                    Rc::clone(&next_state),
                    BestKnown {
                        g: tentative_g,
                        depth: child_depth,
                    },
                );

                let h = self.heuristic.estimate(&next_state, goal);
                let child = tree.push_child(current_id, action, next_state, h)?;
                frontier.push(child, tentative_g + h);
                successors += 1;
            }

            observer.on_event(&SearchEvent::NodeExpanded {
                node: tree.get(current_id)?,
                successors,
            });
        };

        let result = match goal_node {
            Some(id) => {
                let path = tree.path(id)?;
                stats.plan_length = path.len();
                stats.total_cost = path.iter().map(|action| action.cost()).sum();
                PlanResult {
                    status: PlanStatus::PlanFound,
                    plan: Some(path.iter().map(|action| action.name().to_string()).collect()),
                    stats,
                }
            }
            None => {
                let status = if !frontier.is_empty() {
                    PlanStatus::IterationLimitReached {
                        max_iterations: self.config.max_iterations,
                    }
                } else if depth_pruned {
                    PlanStatus::DepthLimitReached {
                        max_depth: self.config.max_depth.unwrap_or_default(),
                    }
                } else {
                    PlanStatus::SearchSpaceExhausted
                };
                log::warn!(
                    "No plan found after {} iterations (max: {}, nodes created: {})",
                    iterations,
                    self.config.max_iterations,
                    tree.len()
                );
                PlanResult {
                    status,
                    plan: None,
                    stats,
                }
            }
        };

        Ok(Self::finish(started, goal, result, observer))
    }

    fn finish(
        started: Instant,
        goal: &Goal,
        mut result: PlanResult,
        observer: &mut dyn PlanObserver,
    ) -> PlanResult {
        result.stats.duration = started.elapsed();
        log::debug!("{}: {}", goal.name(), result.message());
        observer.on_event(&SearchEvent::Finished {
            goal,
            result: &result,
        });
        result
    }
}

impl fmt::Debug for Planner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Planner")
            .field("actions", &self.actions)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
