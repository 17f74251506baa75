//! Error types for the action execution pipeline.

use crate::action::InvalidActionReason;

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the rejection reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionPhaseError {
    pub phase: TransitionPhase,
    pub reason: InvalidActionReason,
}

impl TransitionPhaseError {
    pub fn new(phase: TransitionPhase, reason: InvalidActionReason) -> Self {
        Self { phase, reason }
    }
}

impl std::fmt::Display for TransitionPhaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.reason)
    }
}

impl std::error::Error for TransitionPhaseError {}

/// Error surfaced when executing an action through the engine. Carries the
/// action name, the pipeline phase, and the typed rejection reason.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{action} action failed: {inner}")]
pub struct ExecuteError {
    /// Snake_case name of the rejected action.
    pub action: &'static str,
    pub inner: TransitionPhaseError,
}

impl ExecuteError {
    pub fn new(action: &'static str, inner: TransitionPhaseError) -> Self {
        Self { action, inner }
    }

    pub fn phase(&self) -> TransitionPhase {
        self.inner.phase
    }

    pub fn reason(&self) -> &InvalidActionReason {
        &self.inner.reason
    }
}
