use std::fmt::Display;

use crate::{error::SimulationError, table};

/// Identifies a state. States drawn in the editor carry a [`StateId::Named`] identifier,
/// while the preprocessor mints [`StateId::Synthetic`] ones for the intermediate states
/// it introduces. The two kinds never collide.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateId {
    /// A state that exists in the snapshot.
    Named(String),
    /// An implicit, non-final intermediate state created while splitting a label.
    Synthetic(u32),
}

impl StateId {
    /// Returns true if the state was minted by the preprocessor.
    pub fn is_synthetic(&self) -> bool {
        matches!(self, StateId::Synthetic(_))
    }
}

impl From<&str> for StateId {
    fn from(value: &str) -> Self {
        StateId::Named(value.to_string())
    }
}

impl From<String> for StateId {
    fn from(value: String) -> Self {
        StateId::Named(value)
    }
}

impl Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateId::Named(name) => write!(f, "{name}"),
            StateId::Synthetic(n) => write!(f, "~{n}"),
        }
    }
}

/// Identifies a transition. Transitions produced by splitting a multi-symbol label
/// remember the transition they were derived from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransitionId {
    /// A transition that exists in the snapshot.
    Named(String),
    /// The `index`-th transition generated from `parent`.
    Derived {
        /// The transition whose label was split.
        parent: Box<TransitionId>,
        /// Position of the generated transition among its siblings.
        index: usize,
    },
}

impl TransitionId {
    /// Creates the id of the `index`-th transition derived from `self`.
    pub fn derive(&self, index: usize) -> Self {
        TransitionId::Derived {
            parent: Box::new(self.clone()),
            index,
        }
    }

    /// Follows the chain of parents back to the transition that was authored in the editor.
    pub fn origin(&self) -> &TransitionId {
        match self {
            TransitionId::Named(_) => self,
            TransitionId::Derived { parent, .. } => parent.origin(),
        }
    }
}

impl From<&str> for TransitionId {
    fn from(value: &str) -> Self {
        TransitionId::Named(value.to_string())
    }
}

impl From<String> for TransitionId {
    fn from(value: String) -> Self {
        TransitionId::Named(value)
    }
}

impl Display for TransitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionId::Named(name) => write!(f, "{name}"),
            TransitionId::Derived { parent, index } => write!(f, "{parent}/{index}"),
        }
    }
}

/// A state of the drawn automaton.
#[derive(Clone, Debug, PartialEq)]
pub struct State {
    /// Stable identifier.
    pub id: StateId,
    /// The label shown in the editor.
    pub label: String,
    /// Whether the state is accepting.
    pub is_final: bool,
    /// Layout coordinates, only relevant for rendering.
    pub position: Option<(f64, f64)>,
}

impl State {
    /// Creates a non-final state without layout information.
    pub fn new<I: Into<StateId>, L: Into<String>>(id: I, label: L) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            is_final: false,
            position: None,
        }
    }

    /// Creates a final state without layout information.
    pub fn accepting<I: Into<StateId>, L: Into<String>>(id: I, label: L) -> Self {
        Self::new(id, label).with_final(true)
    }

    /// Sets whether `self` is accepting.
    pub fn with_final(mut self, is_final: bool) -> Self {
        self.is_final = is_final;
        self
    }

    /// Places `self` at the given coordinates.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some((x, y));
        self
    }
}

/// A labeled edge between two states. The raw label may encode several alternatives
/// separated by line breaks.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Transition {
    /// Stable identifier.
    pub id: TransitionId,
    /// Identifier of the state the transition leaves.
    pub source: StateId,
    /// Identifier of the state the transition enters.
    pub target: StateId,
    /// The raw label, `None` if the edge was never labeled.
    pub label: Option<String>,
}

impl Transition {
    /// Creates a labeled transition.
    pub fn new<I, S, T, L>(id: I, source: S, target: T, label: L) -> Self
    where
        I: Into<TransitionId>,
        S: Into<StateId>,
        T: Into<StateId>,
        L: Into<String>,
    {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: Some(label.into()),
        }
    }

    /// Creates a transition that carries no label at all.
    pub fn unlabeled<I, S, T>(id: I, source: S, target: T) -> Self
    where
        I: Into<TransitionId>,
        S: Into<StateId>,
        T: Into<StateId>,
    {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: None,
        }
    }

    /// The label as a string slice, `None` if it is absent.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// The two collections a snapshot is made of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    /// The collection of states.
    States,
    /// The collection of transitions.
    Transitions,
}

impl Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Collection::States => write!(f, "states"),
            Collection::Transitions => write!(f, "transitions"),
        }
    }
}

/// A point-in-time copy of the editor graph. Simulations only ever read from it.
///
/// A snapshot can be missing either collection, for example when the editor has not
/// finished loading. Such a snapshot is not structurally valid and every simulation on
/// it fails with [`SimulationError::MalformedAutomaton`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    states: Option<Vec<State>>,
    transitions: Option<Vec<Transition>>,
}

impl Snapshot {
    /// Creates a structurally valid snapshot from the given states and transitions.
    pub fn new<S, T>(states: S, transitions: T) -> Self
    where
        S: IntoIterator<Item = State>,
        T: IntoIterator<Item = Transition>,
    {
        Self {
            states: Some(states.into_iter().collect()),
            transitions: Some(transitions.into_iter().collect()),
        }
    }

    /// Creates a snapshot where either collection may be missing.
    pub fn from_parts(states: Option<Vec<State>>, transitions: Option<Vec<Transition>>) -> Self {
        Self {
            states,
            transitions,
        }
    }

    /// The states, if present.
    pub fn states(&self) -> Option<&[State]> {
        self.states.as_deref()
    }

    /// The transitions, if present.
    pub fn transitions(&self) -> Option<&[Transition]> {
        self.transitions.as_deref()
    }

    /// Returns true if both collections are present.
    pub fn is_valid(&self) -> bool {
        self.states.is_some() && self.transitions.is_some()
    }

    /// Returns both collections or the error naming the first one that is missing.
    pub fn parts(&self) -> Result<(&[State], &[Transition]), SimulationError> {
        let states = self
            .states()
            .ok_or(SimulationError::MalformedAutomaton(Collection::States))?;
        let transitions = self
            .transitions()
            .ok_or(SimulationError::MalformedAutomaton(Collection::Transitions))?;
        Ok((states, transitions))
    }

    /// Renders the transitions of `self` as a table, marking final states.
    pub fn transition_table(&self) -> Result<String, SimulationError> {
        let (states, transitions) = self.parts()?;
        Ok(table::render(states, transitions))
    }
}
