//! Goals: named, prioritized target states.

use crate::{GoapError, Result, State, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Goal attributes that do not hold yet, keyed by attribute.
///
/// Each entry is `(current_value, desired_value)`; the current value is
/// `None` when the attribute is absent from the state.
pub type UnsatisfiedConditions = BTreeMap<String, (Option<Value>, Value)>;

/// A desired set of attribute values.
///
/// Priority is informational: lower numbers are more urgent, and the search
/// itself never reads it. Callers juggling several goals can use
/// [`Goal::most_urgent`] to pick one.
///
/// # Examples
///
/// ```
/// use goap_planner::{Goal, State};
///
/// let target: State = [("door_open", true)].into_iter().collect();
/// let goal = Goal::new(target)?.with_name("OpenDoor").with_priority(2)?;
///
/// let mut world = State::new();
/// world.set("door_open", false);
/// assert!(!goal.is_satisfied(&world));
/// assert_eq!(goal.unsatisfied_count(&world), 1);
///
/// world.set("door_open", true);
/// assert!(goal.is_satisfied(&world));
/// # Ok::<(), goap_planner::GoapError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Goal {
    target_state: State,
    priority: u32,
    name: String,
}

impl Goal {
    /// Creates a goal with priority 1, named after its target state.
    ///
    /// # Errors
    ///
    /// [`GoapError::EmptyGoal`] if `target_state` has no attributes.
    pub fn new(target_state: State) -> Result<Self> {
        if target_state.is_empty() {
            return Err(GoapError::EmptyGoal);
        }

        Ok(Self {
            name: target_state.to_string(),
            target_state,
            priority: 1,
        })
    }

    /// # Errors
    ///
    /// [`GoapError::InvalidPriority`] if `priority` is 0.
    pub fn with_priority(mut self, priority: u32) -> Result<Self> {
        if priority < 1 {
            return Err(GoapError::InvalidPriority(priority));
        }
        self.priority = priority;
        Ok(self)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn target_state(&self) -> &State {
        &self.target_state
    }

    /// True when every target attribute is present in `state` with the desired value.
    pub fn is_satisfied(&self, state: &State) -> bool {
        state.satisfies(&self.target_state)
    }

    /// Lists the target attributes that `state` does not meet yet.
    ///
    /// ```
    /// use goap_planner::{Goal, State, Value};
    ///
    /// let goal = Goal::new([("door_open", true), ("light_on", true)].into_iter().collect())?;
    /// let world: State = [("door_open", false)].into_iter().collect();
    ///
    /// let missing = goal.unsatisfied_conditions(&world);
    /// assert_eq!(missing["door_open"], (Some(Value::Bool(false)), Value::Bool(true)));
    /// assert_eq!(missing["light_on"], (None, Value::Bool(true)));
    /// # Ok::<(), goap_planner::GoapError>(())
    /// ```
    pub fn unsatisfied_conditions(&self, state: &State) -> UnsatisfiedConditions {
        self.target_state
            .iter()
            .filter_map(|(key, desired)| {
                let current = state.get(key);
                if current == Some(desired) {
                    None
                } else {
                    Some((key.clone(), (current.cloned(), desired.clone())))
                }
            })
            .collect()
    }

    /// Number of target attributes not yet met; the size of
    /// [`Goal::unsatisfied_conditions`] without building it.
    pub fn unsatisfied_count(&self, state: &State) -> usize {
        self.target_state
            .iter()
            .filter(|(key, desired)| state.get(key) != Some(*desired))
            .count()
    }

    /// Picks the goal with the lowest priority number; earlier goals win ties.
    pub fn most_urgent(goals: &[Goal]) -> Option<&Goal> {
        goals
            .iter()
            .enumerate()
            .min_by_key(|(i, goal)| (goal.priority, *i))
            .map(|(_, goal)| goal)
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Goal({}, priority={})", self.name, self.priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(pairs: &[(&str, bool)]) -> State {
        pairs.iter().map(|&(k, v)| (k, v)).collect()
    }

    #[test]
    fn test_empty_goal_is_rejected() {
        assert!(matches!(Goal::new(State::new()), Err(GoapError::EmptyGoal)));
    }

    #[test]
    fn test_zero_priority_is_rejected() {
        let goal = Goal::new(target(&[("a", true)])).unwrap();
        assert!(matches!(
            goal.with_priority(0),
            Err(GoapError::InvalidPriority(0))
        ));
    }

    #[test]
    fn test_default_name_and_priority() {
        let goal = Goal::new(target(&[("door_open", true)])).unwrap();
        assert_eq!(goal.name(), "{door_open: true}");
        assert_eq!(goal.priority(), 1);
        assert_eq!(goal.to_string(), "Goal({door_open: true}, priority=1)");
    }

    #[test]
    fn test_missing_attribute_is_unsatisfied() {
        let goal = Goal::new(target(&[("door_open", true)])).unwrap();
        assert!(!goal.is_satisfied(&State::new()));
        assert_eq!(goal.unsatisfied_count(&State::new()), 1);
    }

    #[test]
    fn test_unsatisfied_conditions_only_lists_mismatches() {
        let goal = Goal::new(target(&[("a", true), ("b", true), ("c", false)])).unwrap();
        let state = target(&[("a", true), ("b", false)]);

        let missing = goal.unsatisfied_conditions(&state);
        assert_eq!(missing.len(), 2);
        assert_eq!(missing["b"], (Some(Value::Bool(false)), Value::Bool(true)));
        assert_eq!(missing["c"], (None, Value::Bool(false)));
        assert_eq!(goal.unsatisfied_count(&state), missing.len());
    }

    #[test]
    fn test_equality_covers_name_and_priority() {
        let a = Goal::new(target(&[("a", true)])).unwrap();
        let b = a.clone().with_name("other");
        let c = a.clone().with_priority(3).unwrap();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_most_urgent() {
        let low = Goal::new(target(&[("a", true)]))
            .unwrap()
            .with_priority(5)
            .unwrap();
        let first_high = Goal::new(target(&[("b", true)]))
            .unwrap()
            .with_name("first")
            .with_priority(2)
            .unwrap();
        let second_high = Goal::new(target(&[("c", true)]))
            .unwrap()
            .with_name("second")
            .with_priority(2)
            .unwrap();

        let goals = vec![low, first_high, second_high];
        assert_eq!(Goal::most_urgent(&goals).unwrap().name(), "first");
        assert!(Goal::most_urgent(&[]).is_none());
    }
}
