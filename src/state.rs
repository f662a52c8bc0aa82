//! # State Module for Goal-Oriented Action Planning (GOAP)
//!
//! This module provides [`State`], the container used for world states,
//! action preconditions, action effects and goal targets.
//!
//! ## What is State in GOAP?
//!
//! In Goal-Oriented Action Planning, "state" is a snapshot of the world as a
//! set of named attributes. The planner uses states in several ways:
//!
//! - **World State**: the situation the agent is currently in
//! - **Goal State**: the attribute values the agent wants to reach
//! - **Preconditions**: attribute values an action requires
//! - **Effects**: attribute values an action assigns
//!
//! ## Identity
//!
//! Two states are equal when they hold the same attributes with equal values.
//! Entries are kept sorted by attribute name, so equality, hashing and
//! rendering never depend on insertion order. The planner relies on this to
//! recognise a state it has already reached through a different path.
//!
//! ## Basic Usage
//!
//! ```
//! use goap_planner::{State, Value};
//!
//! let mut current = State::new();
//! current.set("has_key", false);
//! current.set("location", "outside");
//!
//! let mut effects = State::new();
//! effects.set("has_key", true);
//!
//! // Producing a successor never touches the original
//! let next = current.merged(&effects);
//! assert_eq!(current.get("has_key"), Some(&Value::Bool(false)));
//! assert_eq!(next.get("has_key"), Some(&Value::Bool(true)));
//! assert_eq!(next.get("location"), Some(&Value::from("outside")));
//! ```

use crate::Value;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// Differences between two states, keyed by attribute.
///
/// Each entry holds `(self_value, other_value)`; `None` marks the side on
/// which the attribute is absent.
pub type StateDiff = BTreeMap<String, (Option<Value>, Option<Value>)>;

/// A mapping from attribute name to [`Value`].
///
/// # Examples
///
/// ```
/// use goap_planner::{State, Value};
///
/// let state: State = [("door_open", Value::from(false)), ("keys", Value::from(2))]
///     .into_iter()
///     .collect();
///
/// assert_eq!(state.get("keys"), Some(&Value::Int(2)));
/// assert_eq!(state.get("window_open"), None);
/// assert_eq!(state.get_or("window_open", &Value::Bool(false)), &Value::Bool(false));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State {
    values: BTreeMap<String, Value>,
}

impl State {
    /// Creates a new empty state.
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Sets a state value for the specified attribute, replacing any previous value.
    ///
    /// # Examples
    ///
    /// ```
    /// use goap_planner::{State, Value};
    ///
    /// let mut state = State::new();
    /// state.set("ammo", 30);
    /// state.set("ammo", 25);
    /// assert_eq!(state.get("ammo"), Some(&Value::Int(25)));
    /// ```
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Gets the value for an attribute, or `None` if it is absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Gets the value for an attribute, falling back to `default` when it is absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.values.get(key).unwrap_or(default)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(attribute, value)` pairs in attribute order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.values.iter()
    }

    pub fn keys(&self) -> btree_map::Keys<'_, String, Value> {
        self.values.keys()
    }

    /// Checks if this state meets every requirement in `required`.
    ///
    /// A requirement is met when this state holds the attribute with an equal
    /// value. A missing attribute never meets a requirement. Extra attributes
    /// in this state are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use goap_planner::State;
    ///
    /// let mut world = State::new();
    /// world.set("has_key", true);
    /// world.set("door_open", false);
    ///
    /// let mut required = State::new();
    /// required.set("has_key", true);
    /// assert!(world.satisfies(&required));
    ///
    /// required.set("has_map", true);
    /// assert!(!world.satisfies(&required));
    /// ```
    pub fn satisfies(&self, required: &State) -> bool {
        required
            .values
            .iter()
            .all(|(key, value)| self.values.get(key) == Some(value))
    }

    /// Overwrites this state with every entry of `other`, in place.
    ///
    /// Only for states the caller owns outright; the planner uses
    /// [`State::merged`] instead.
    pub fn update(&mut self, other: &State) {
        for (key, value) in other.values.iter() {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Returns a copy of this state with every entry of `overlay` applied on top.
    pub fn merged(&self, overlay: &State) -> State {
        let mut next = self.clone();
        next.update(overlay);
        next
    }

    /// Lists every attribute whose value differs between `self` and `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use goap_planner::{State, Value};
    ///
    /// let mut before = State::new();
    /// before.set("door_open", false);
    /// before.set("has_key", true);
    ///
    /// let mut after = State::new();
    /// after.set("door_open", true);
    /// after.set("has_key", true);
    /// after.set("light_on", true);
    ///
    /// let diff = before.diff(&after);
    /// assert_eq!(diff.len(), 2);
    /// assert_eq!(
    ///     diff["door_open"],
    ///     (Some(Value::Bool(false)), Some(Value::Bool(true)))
    /// );
    /// assert_eq!(diff["light_on"], (None, Some(Value::Bool(true))));
    /// ```
    pub fn diff(&self, other: &State) -> StateDiff {
        let mut diff = StateDiff::new();

        for (key, value) in self.values.iter() {
            match other.values.get(key) {
                Some(other_value) if other_value == value => {}
                other_value => {
                    diff.insert(key.clone(), (Some(value.clone()), other_value.cloned()));
                }
            }
        }

        for (key, other_value) in other.values.iter() {
            if !self.values.contains_key(key) {
                diff.insert(key.clone(), (None, Some(other_value.clone())));
            }
        }

        diff
    }
}

impl<K, V> FromIterator<(K, V)> for State
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl From<BTreeMap<String, Value>> for State {
    fn from(values: BTreeMap<String, Value>) -> Self {
        Self { values }
    }
}

impl From<State> for BTreeMap<String, Value> {
    fn from(state: State) -> Self {
        state.values
    }
}

impl<'a> IntoIterator for &'a State {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for (key, value) in &self.values {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
            first = false;
        }
        write!(f, "}}")
    }
}
