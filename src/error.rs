use thiserror::Error;

/// Errors raised by the planning engine.
///
/// Construction errors are reported as soon as an invalid action, goal or
/// configuration is built. Search outcomes such as "no plan" are not errors;
/// they are carried by [`PlanResult`](crate::PlanResult). The only error a
/// search itself can return is [`GoapError::CorruptedSearchTree`], which
/// signals a defect rather than a planning outcome.
///
/// # Examples
///
/// ```
/// use goap_planner::{Action, GoapError};
///
/// let err = Action::new("rest", 0.0).unwrap_err();
/// assert!(matches!(err, GoapError::InvalidActionCost));
/// assert_eq!(err.to_string(), "Action cost must be positive");
/// ```
#[derive(Error, Debug)]
pub enum GoapError {
    // Action errors
    /// An action was given an empty or whitespace-only name
    #[error("Action name must be a non-empty string")]
    EmptyActionName,

    /// An action with the same name is already registered in the library
    #[error("Action already in collection: {0}")]
    ActionAlreadyInCollection(String),

    /// An action was given a zero, negative or non-finite cost
    #[error("Action cost must be positive")]
    InvalidActionCost,

    /// An action was applied to a state that does not meet its preconditions
    #[error("Action precondition not met: {0}")]
    PreconditionNotMet(String),

    // Goal errors
    #[error("Goal target state cannot be empty")]
    EmptyGoal,

    #[error("Goal priority must be >= 1, got {0}")]
    InvalidPriority(u32),

    // Planner configuration errors
    #[error("max_iterations must be positive, got {0}")]
    InvalidMaxIterations(usize),

    #[error("max_depth must be positive, got {0}")]
    InvalidMaxDepth(usize),

    // Defects
    /// The node graph of a running search is inconsistent
    #[error("Search tree corrupted: {0}")]
    CorruptedSearchTree(String),

    // Serialization errors
    /// A wrapper around serde_json errors raised while loading tables or configs
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for planning operations.
pub type Result<T> = std::result::Result<T, GoapError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_precondition_not_met_display() {
        let err = GoapError::PreconditionNotMet("open_door".to_string());
        assert_eq!(format!("{}", err), "Action precondition not met: open_door");
    }

    #[test]
    fn test_duplicate_action_display() {
        let err = GoapError::ActionAlreadyInCollection("pickup_key".to_string());
        assert_eq!(format!("{}", err), "Action already in collection: pickup_key");
    }

    #[test]
    fn test_invalid_priority_display() {
        let err = GoapError::InvalidPriority(0);
        assert_eq!(format!("{}", err), "Goal priority must be >= 1, got 0");
    }

    #[test]
    fn test_serialization_error_has_source() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = GoapError::from(json_err);
        assert!(err.source().is_some());
        assert!(format!("{}", err).starts_with("Serialization error:"));
    }

    #[test]
    fn test_error_trait() {
        let err = GoapError::EmptyGoal;
        assert!(err.source().is_none());
    }
}
