//! Error and outcome types.

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// A collaborator that can go missing at runtime.
///
/// The scene is owned by the controller, so only the pointer side
/// (camera or viewport) can be unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    /// Pointer position / camera.
    Pointer,
}

impl std::fmt::Display for Collaborator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Collaborator::Pointer => f.write_str("pointer source"),
        }
    }
}

/// Why an input event produced no change.
///
/// None of these are failures: the editor simply does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IgnoreReason {
    #[error("pointer is over a UI surface")]
    PointerOverUi,
    #[error("no active selection")]
    NoActiveSelection,
    #[error("at least two entities must be selected")]
    TooFewSelected,
    #[error("no drag in progress")]
    NotDragging,
    #[error("{0} unavailable")]
    MissingCollaborator(Collaborator),
    #[error("session not initialized")]
    NotInitialized,
}

/// Result of feeding one event to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event was applied.
    Applied,
    /// The event was dropped without side effects on selection or drag state.
    Ignored(IgnoreReason),
}

impl EventOutcome {
    /// Check if the event was applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, EventOutcome::Applied)
    }

    /// The reason the event was ignored, if it was.
    pub fn ignored_reason(&self) -> Option<IgnoreReason> {
        match self {
            EventOutcome::Applied => None,
            EventOutcome::Ignored(reason) => Some(*reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignore_reason_messages() {
        assert_eq!(
            IgnoreReason::MissingCollaborator(Collaborator::Pointer).to_string(),
            "pointer source unavailable"
        );
        assert_eq!(IgnoreReason::NotDragging.to_string(), "no drag in progress");
    }

    #[test]
    fn test_outcome_accessors() {
        assert!(EventOutcome::Applied.is_applied());
        assert_eq!(EventOutcome::Applied.ignored_reason(), None);

        let ignored = EventOutcome::Ignored(IgnoreReason::NoActiveSelection);
        assert!(!ignored.is_applied());
        assert_eq!(ignored.ignored_reason(), Some(IgnoreReason::NoActiveSelection));
    }

    #[test]
    fn test_config_error_from_json() {
        let err: ConfigError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
