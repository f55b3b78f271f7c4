use std::fmt::Display;

use tracing::debug;

use crate::error::SimulationError;

/// The outcome of testing an input string, in the shape the editor consumes.
///
/// - `{valid}` alone if the snapshot was not usable,
/// - `{valid, accepted}` if the outcome is known but no terminal state is reported,
/// - `{valid, accepted, accepted_node_label}` for an acceptance whose terminal state
///   is known, which is the case for the deterministic walk.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SimulationResult {
    valid: bool,
    accepted: Option<bool>,
    accepted_node_label: Option<String>,
}

impl SimulationResult {
    /// Normalizes the three parts. A label is only kept if `accepted` is known.
    pub fn new(valid: bool, accepted: Option<bool>, accepted_node_label: Option<String>) -> Self {
        let accepted_node_label = accepted.and(accepted_node_label);
        Self {
            valid,
            accepted,
            accepted_node_label,
        }
    }

    /// The result for a snapshot that is not structurally usable. The simulators report
    /// such snapshots as [`SimulationError::MalformedAutomaton`], use
    /// [`SimulationResult::or_invalid`] to get this shape instead.
    pub fn invalid() -> Self {
        Self::new(false, None, None)
    }

    /// Maps a [`SimulationError::MalformedAutomaton`] to [`SimulationResult::invalid`],
    /// which is how the editor displays a snapshot that is not ready to test. All other
    /// errors are passed through.
    ///
    /// ```
    /// use automata_lab::prelude::*;
    ///
    /// let snapshot = Snapshot::from_parts(None, Some(vec![]));
    /// let result = SimulationResult::or_invalid(simulate_finite("a", &snapshot));
    /// assert_eq!(result, Ok(SimulationResult::invalid()));
    /// ```
    pub fn or_invalid(
        outcome: Result<Self, SimulationError>,
    ) -> Result<Self, SimulationError> {
        match outcome {
            Err(SimulationError::MalformedAutomaton(collection)) => {
                debug!("{collection} missing, reporting an invalid automaton");
                Ok(Self::invalid())
            }
            other => other,
        }
    }

    /// A valid automaton rejected the input.
    pub fn rejected() -> Self {
        Self::new(true, Some(false), None)
    }

    /// A valid automaton accepted the input, the terminal state is not reported.
    pub fn accepted() -> Self {
        Self::new(true, Some(true), None)
    }

    /// A valid automaton accepted the input in the state labeled `label`.
    pub fn accepted_in<L: Into<String>>(label: L) -> Self {
        Self::new(true, Some(true), Some(label.into()))
    }

    /// Whether the snapshot was usable.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The verdict, `None` for an invalid snapshot.
    pub fn accepted_flag(&self) -> Option<bool> {
        self.accepted
    }

    /// Returns true if the input was accepted.
    pub fn is_accepted(&self) -> bool {
        self.accepted == Some(true)
    }

    /// The label of the state in which the input was accepted, if known.
    pub fn accepted_node_label(&self) -> Option<&str> {
        self.accepted_node_label.as_deref()
    }
}

impl Display for SimulationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.valid, self.accepted, &self.accepted_node_label) {
            (false, _, _) => write!(f, "invalid automaton"),
            (true, None, _) => write!(f, "valid automaton"),
            (true, Some(false), _) => write!(f, "rejected"),
            (true, Some(true), None) => write!(f, "accepted"),
            (true, Some(true), Some(label)) => write!(f, "accepted in {label}"),
        }
    }
}
