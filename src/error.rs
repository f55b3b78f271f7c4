use thiserror::Error;

use crate::{
    label::LabelFormatError,
    snapshot::{Collection, TransitionId},
};

/// Abstracts the errors that can abort a simulation. A rejected input is not an error,
/// it is reported through [`crate::SimulationResult`].
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum SimulationError {
    /// The snapshot is missing one of its collections, the automaton is not ready to test.
    #[error("automaton is not ready to test, the {0} collection is missing")]
    MalformedAutomaton(Collection),
    /// The label of a transition could not be parsed.
    #[error("transition `{transition}` has a malformed label: {source}")]
    LabelFormat {
        /// The offending transition.
        transition: TransitionId,
        /// What is wrong with its label.
        source: LabelFormatError,
    },
    /// A pushdown search had to cut off a run of more than the given number of
    /// consecutive empty-read moves and found no accepting path, so neither acceptance
    /// nor rejection could be established.
    #[error("search exceeded {0} consecutive empty moves without reaching a verdict")]
    DepthLimitExceeded(usize),
    /// A pushdown search entered more than the given number of configurations at one
    /// input position and was abandoned.
    #[error("search entered more than {0} configurations at one input position")]
    ConfigurationLimitExceeded(usize),
}

impl SimulationError {
    pub(crate) fn label(transition: &TransitionId, source: LabelFormatError) -> Self {
        SimulationError::LabelFormat {
            transition: transition.clone(),
            source,
        }
    }

    /// Returns the transition whose label caused the error, if any.
    pub fn offending_transition(&self) -> Option<&TransitionId> {
        match self {
            SimulationError::LabelFormat { transition, .. } => Some(transition),
            _ => None,
        }
    }
}
