//! Simulation engine for finite and pushdown automata drawn as node/edge graphs.
//!
//! An editor hands the engine a [`Snapshot`], which is a point-in-time copy of the drawn
//! states and transitions, together with an input string. The engine never modifies the
//! snapshot. Every call derives its own flat transition list and answers with a
//! [`SimulationResult`].
//!
//! Labels are strings. A label may hold several alternatives separated by line breaks.
//! For finite automata each alternative is a literal word that is read character by
//! character, for pushdown automata each alternative is a `read;pop;push` triple. Two
//! interchangeable markers, `ε` and `λ` by default, denote the absence of a symbol.
//!
//! Simulating a finite automaton proceeds in three steps:
//! - [`preprocess()`] flattens the transitions so that each one reads exactly one symbol,
//!   chaining synthetic intermediate states for multi-character words,
//! - [`is_deterministic()`] checks that no state has two transitions on the same symbol and
//!   that there are no empty transitions,
//! - a deterministic automaton is walked directly, which reports the label of the state
//!   in which the input was accepted. Any other automaton is explored by a depth first
//!   search that follows empty transitions.
//!
//! Pushdown automata are always explored by a depth first search that carries a stack.
//! The stack starts out with a bottom marker (`Z` by default) and a configuration only
//! accepts if its state is final, the input is consumed and the stack is completely
//! empty.
//!
//! ```
//! use automata_lab::prelude::*;
//!
//! let snapshot = Snapshot::new(
//!     [State::new("1", "q0"), State::accepting("2", "q1")],
//!     [
//!         Transition::new("e1", "1", "1", "0"),
//!         Transition::new("e2", "1", "2", "1"),
//!         Transition::new("e3", "2", "2", "1"),
//!     ],
//! );
//! let result = simulate_finite("011", &snapshot).unwrap();
//! assert!(result.is_accepted());
//! assert_eq!(result.accepted_node_label(), Some("q1"));
//! assert!(!simulate_finite("2", &snapshot).unwrap().is_accepted());
//! ```
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use automata_lab::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        automaton::{AutomatonKind, UnknownAutomatonKind},
        config::{Config, EmptySymbols, EPSILON, LAMBDA, STACK_BOTTOM, START_STATE_ID},
        determinism::{is_deterministic, is_deterministic_with},
        error::SimulationError,
        label::{LabelFormatError, PushdownLabel, Symbol},
        preprocess::preprocess,
        result::SimulationResult,
        simulate::{Engine, FiniteSimulator, PushdownSimulator, Simulator},
        simulate_finite, simulate_pushdown,
        snapshot::{Collection, Snapshot, State, StateId, Transition, TransitionId},
    };
}

/// Type aliases for the hash based collections used throughout the crate.
pub mod math;

/// Constants for the conventional symbols and the [`config::Config`] shared by all operations.
pub mod config;

/// The read-only graph model: states, transitions and snapshots of both.
pub mod snapshot;

/// Parsing of transition labels into symbols and pushdown triples.
pub mod label;

/// Flattening of transitions with multi-symbol labels.
pub mod preprocess;
pub use preprocess::preprocess;

/// Classification of finite automata into deterministic and nondeterministic ones.
pub mod determinism;
pub use determinism::is_deterministic;

/// The kinds of automata that can be simulated.
pub mod automaton;
pub use automaton::AutomatonKind;

/// Simulators for finite and pushdown automata.
pub mod simulate;
pub use simulate::{Engine, Simulator};

/// The uniform result of a simulation.
pub mod result;
pub use result::SimulationResult;

/// Errors that abort a simulation.
pub mod error;
pub use error::SimulationError;

/// Rendering of transition tables, mostly for logging.
pub mod table;

pub use snapshot::Snapshot;

/// Tests `input` against the finite automaton in `snapshot` using the default [`config::Config`].
pub fn simulate_finite(
    input: &str,
    snapshot: &Snapshot,
) -> Result<SimulationResult, SimulationError> {
    Engine::default().finite().simulate(input, snapshot)
}

/// Tests `input` against the pushdown automaton in `snapshot` using the default [`config::Config`].
pub fn simulate_pushdown(
    input: &str,
    snapshot: &Snapshot,
) -> Result<SimulationResult, SimulationError> {
    Engine::default().pushdown().simulate(input, snapshot)
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn missing_transitions_are_reported_by_both_simulators() {
        let snapshot = Snapshot::from_parts(Some(vec![State::new("1", "q0")]), None);
        for result in [
            simulate_finite("", &snapshot),
            simulate_pushdown("", &snapshot),
        ] {
            assert_eq!(
                result,
                Err(SimulationError::MalformedAutomaton(Collection::Transitions))
            );
        }
    }

    #[test_log::test]
    fn nondeterministic_acceptance_reports_no_label() {
        let states = [
            State::new("1", "q0"),
            State::accepting("2", "left"),
            State::accepting("3", "right"),
        ];
        let to_left = Transition::new("e1", "1", "2", "a");
        let to_right = Transition::new("e2", "1", "3", "a");

        for order in [
            vec![to_left.clone(), to_right.clone()],
            vec![to_right, to_left],
        ] {
            let snapshot = Snapshot::new(states.clone(), order);
            let result = simulate_finite("a", &snapshot).unwrap();
            assert!(result.is_accepted());
            assert_eq!(result.accepted_node_label(), None);
        }
    }
}
