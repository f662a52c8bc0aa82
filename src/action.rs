//! # Action Module for Goal-Oriented Action Planning (GOAP)
//!
//! This module provides the transitions the planner searches over.
//!
//! ## Key Components
//!
//! * [`Action`]: a named transition with preconditions, effects and a cost
//! * [`ActionSpec`]: one row of an action table, as loaded from configuration
//! * [`ActionLibrary`]: the ordered, name-unique set of actions a planner uses
//!
//! Actions carry no parameters: each one is a single fixed pair of
//! precondition and effect states. Preconditions are matched by equality only.
//!
//! ## Basic Usage
//!
//! ```
//! use goap_planner::{Action, ActionLibrary, State};
//!
//! let pickup_key = Action::new("pickup_key", 1.0)?
//!     .with_precondition("key_available", true)
//!     .with_effect("has_key", true);
//!
//! let mut library = ActionLibrary::new();
//! library.register(pickup_key)?;
//!
//! let mut state = State::new();
//! state.set("key_available", true);
//! state.set("has_key", false);
//!
//! let applicable = library.applicable_actions(&state);
//! assert_eq!(applicable.len(), 1);
//!
//! let next = applicable[0].apply(&state)?;
//! assert!(next.satisfies(&[("has_key", true)].into_iter().collect()));
//! # Ok::<(), goap_planner::GoapError>(())
//! ```

use crate::{GoapError, Result, State, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A parameterless transition between world states.
///
/// An action is built once with [`Action::new`] and the `with_*` builders and
/// is read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    name: String,
    cost: f64,
    preconditions: State,
    effects: State,
}

impl Action {
    /// Creates an action with no preconditions and no effects.
    ///
    /// # Errors
    ///
    /// * [`GoapError::EmptyActionName`] if `name` is empty or only whitespace
    /// * [`GoapError::InvalidActionCost`] if `cost` is not a finite number above zero
    ///
    /// # Examples
    ///
    /// ```
    /// use goap_planner::{Action, GoapError};
    ///
    /// let action = Action::new("open_door", 1.0).unwrap();
    /// assert_eq!(action.name(), "open_door");
    ///
    /// assert!(matches!(Action::new("", 1.0), Err(GoapError::EmptyActionName)));
    /// assert!(matches!(Action::new("rest", -1.0), Err(GoapError::InvalidActionCost)));
    /// ```
    pub fn new(name: impl Into<String>, cost: f64) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GoapError::EmptyActionName);
        }
        if !cost.is_finite() || cost <= 0.0 {
            return Err(GoapError::InvalidActionCost);
        }

        Ok(Self {
            name,
            cost,
            preconditions: State::new(),
            effects: State::new(),
        })
    }

    pub fn with_precondition(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.preconditions.set(key, value);
        self
    }

    pub fn with_effect(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.effects.set(key, value);
        self
    }

    /// Adds every entry of `preconditions`, overriding any already set.
    pub fn with_preconditions(mut self, preconditions: &State) -> Self {
        self.preconditions.update(preconditions);
        self
    }

    /// Adds every entry of `effects`, overriding any already set.
    pub fn with_effects(mut self, effects: &State) -> Self {
        self.effects.update(effects);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn preconditions(&self) -> &State {
        &self.preconditions
    }

    pub fn effects(&self) -> &State {
        &self.effects
    }

    /// Checks if every precondition holds in `state`.
    pub fn is_applicable(&self, state: &State) -> bool {
        state.satisfies(&self.preconditions)
    }

    /// Produces the state that results from performing this action in `state`.
    ///
    /// Attributes named in the effects are overwritten; every other attribute
    /// is carried over. `state` itself is never modified.
    ///
    /// # Errors
    ///
    /// [`GoapError::PreconditionNotMet`] if the action is not applicable to `state`.
    ///
    /// # Examples
    ///
    /// ```
    /// use goap_planner::{Action, GoapError, State, Value};
    ///
    /// let open_door = Action::new("open_door", 1.0)?
    ///     .with_precondition("has_key", true)
    ///     .with_effect("door_open", true);
    ///
    /// let mut state = State::new();
    /// state.set("has_key", false);
    /// assert!(matches!(
    ///     open_door.apply(&state),
    ///     Err(GoapError::PreconditionNotMet(_))
    /// ));
    ///
    /// state.set("has_key", true);
    /// let next = open_door.apply(&state)?;
    /// assert_eq!(next.get("door_open"), Some(&Value::Bool(true)));
    /// assert_eq!(state.get("door_open"), None);
    /// # Ok::<(), GoapError>(())
    /// ```
    pub fn apply(&self, state: &State) -> Result<State> {
        if !self.is_applicable(state) {
            return Err(GoapError::PreconditionNotMet(self.name.clone()));
        }
        Ok(state.merged(&self.effects))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Action('{}', preconditions={}, effects={}, cost={})",
            self.name, self.preconditions, self.effects, self.cost
        )
    }
}

/// One row of an action table.
///
/// Deserializes from a JSON object with `name`, `preconditions`, `effects`
/// and `cost` fields, or from the compact 4-element array form
/// `["name", {preconditions}, {effects}, cost]`.
///
/// ```
/// use goap_planner::ActionSpec;
///
/// let row: ActionSpec =
///     serde_json::from_str(r#"["pickup_key", {"key_available": true}, {"has_key": true}, 1]"#)
///         .unwrap();
/// assert_eq!(row.name, "pickup_key");
/// assert_eq!(row.cost, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    pub name: String,
    #[serde(default)]
    pub preconditions: State,
    #[serde(default)]
    pub effects: State,
    pub cost: f64,
}

impl ActionSpec {
    pub fn new(
        name: impl Into<String>,
        preconditions: State,
        effects: State,
        cost: f64,
    ) -> Self {
        Self {
            name: name.into(),
            preconditions,
            effects,
            cost,
        }
    }
}

impl TryFrom<ActionSpec> for Action {
    type Error = GoapError;

    fn try_from(spec: ActionSpec) -> Result<Self> {
        let mut action = Action::new(spec.name, spec.cost)?;
        action.preconditions = spec.preconditions;
        action.effects = spec.effects;
        Ok(action)
    }
}

/// An ordered collection of actions with unique names.
///
/// Registration order is preserved and is the order in which the planner
/// tries applicable actions when expanding a node.
#[derive(Debug, Clone, Default)]
pub struct ActionLibrary {
    actions: Vec<Action>,
    index: HashMap<String, usize>,
}

impl ActionLibrary {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Builds a library from action table rows, in order.
    pub fn from_specs(specs: impl IntoIterator<Item = ActionSpec>) -> Result<Self> {
        let mut library = Self::new();
        library.add_actions(specs)?;
        Ok(library)
    }

    /// Builds a library from a JSON array of action table rows.
    ///
    /// # Examples
    ///
    /// ```
    /// use goap_planner::ActionLibrary;
    ///
    /// let library = ActionLibrary::from_json(
    ///     r#"[
    ///         ["pickup_key", {"key_available": true}, {"has_key": true}, 1],
    ///         {"name": "open_door", "preconditions": {"has_key": true},
    ///          "effects": {"door_open": true}, "cost": 1.0}
    ///     ]"#,
    /// )?;
    /// assert_eq!(library.len(), 2);
    /// assert!(library.contains("open_door"));
    /// # Ok::<(), goap_planner::GoapError>(())
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let specs: Vec<ActionSpec> = serde_json::from_str(json)?;
        Self::from_specs(specs)
    }

    /// Adds an action to the end of the library.
    ///
    /// # Errors
    ///
    /// [`GoapError::ActionAlreadyInCollection`] if an action with the same
    /// name is already registered. The library is left unchanged.
    pub fn register(&mut self, action: Action) -> Result<()> {
        if self.index.contains_key(action.name()) {
            return Err(GoapError::ActionAlreadyInCollection(action.name));
        }

        log::debug!("Registered action: {}", action.name);
        self.index.insert(action.name.clone(), self.actions.len());
        self.actions.push(action);
        Ok(())
    }

    /// Validates and registers a single action table row.
    pub fn add_action(
        &mut self,
        name: impl Into<String>,
        preconditions: State,
        effects: State,
        cost: f64,
    ) -> Result<()> {
        let action = Action::try_from(ActionSpec::new(name, preconditions, effects, cost))?;
        self.register(action)
    }

    /// Registers table rows in order, stopping at the first invalid one.
    ///
    /// Rows before the failing one stay registered.
    pub fn add_actions(&mut self, specs: impl IntoIterator<Item = ActionSpec>) -> Result<()> {
        for (i, spec) in specs.into_iter().enumerate() {
            let name = spec.name.clone();
            Action::try_from(spec)
                .and_then(|action| self.register(action))
                .map_err(|e| {
                    log::error!("Error adding action '{}' at index {}: {}", name, i, e);
                    e
                })?;
        }
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Action> {
        self.index.get(name).map(|&i| &self.actions[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the actions applicable to `state`, in registration order.
    pub fn applicable_actions(&self, state: &State) -> Vec<&Action> {
        self.actions
            .iter()
            .filter(|action| action.is_applicable(state))
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.index.clear();
        log::info!("Cleared all actions");
    }
}

impl<'a> IntoIterator for &'a ActionLibrary {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

impl fmt::Display for ActionLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActionLibrary({} actions)", self.actions.len())
    }
}
