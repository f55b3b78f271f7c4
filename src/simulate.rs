use crate::{
    automaton::AutomatonKind,
    config::Config,
    determinism::is_deterministic_with,
    error::SimulationError,
    label::{LabelFormatError, PushdownLabel},
    math::Map,
    preprocess::preprocess,
    result::SimulationResult,
    snapshot::{Snapshot, State, StateId, Transition},
};

mod finite;
pub use finite::FiniteSimulator;

mod pushdown;
pub use pushdown::PushdownSimulator;

/// Tests input strings against a [`Snapshot`]. Every call works on its own flattened
/// copy of the transitions, nothing is cached between calls.
pub trait Simulator {
    /// The kind of automaton `self` simulates.
    fn kind(&self) -> AutomatonKind;

    /// Decides whether `input` is accepted by the automaton drawn in `snapshot`.
    ///
    /// A rejection is a regular result. Errors are reserved for snapshots that cannot be
    /// tested at all and for searches that were cut off before reaching a verdict.
    fn simulate(&self, input: &str, snapshot: &Snapshot)
        -> Result<SimulationResult, SimulationError>;
}

/// Bundles a [`Config`] with the operations of the crate.
///
/// ```
/// use automata_lab::prelude::*;
///
/// let snapshot = Snapshot::new(
///     [State::new("1", "q0"), State::accepting("2", "q1")],
///     [Transition::new("e1", "1", "2", "a\nb")],
/// );
/// let engine = Engine::default();
/// let result = engine.simulate(AutomatonKind::Finite, "b", &snapshot).unwrap();
/// assert_eq!(result.accepted_node_label(), Some("q1"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Engine {
    config: Config,
}

impl Engine {
    /// Creates an engine with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A simulator for finite automata.
    pub fn finite(&self) -> FiniteSimulator<'_> {
        FiniteSimulator::new(&self.config)
    }

    /// A simulator for pushdown automata.
    pub fn pushdown(&self) -> PushdownSimulator<'_> {
        PushdownSimulator::new(&self.config)
    }

    /// Flattens `transitions`, see [`preprocess`]. Flattening splits labels only at line
    /// breaks and characters, so it does not depend on the configuration.
    pub fn preprocess(
        &self,
        transitions: &[Transition],
        kind: AutomatonKind,
    ) -> Result<Vec<Transition>, SimulationError> {
        preprocess(transitions, kind)
    }

    /// Composes a pushdown label from three dialog fields, filling blank fields with the
    /// configured default empty marker. See [`PushdownLabel::compose`].
    ///
    /// ```
    /// use automata_lab::prelude::*;
    ///
    /// let engine = Engine::new(Config::default().with_default_empty('ε'));
    /// assert_eq!(engine.compose_label("a", "", "AZ").unwrap(), "a;ε;AZ");
    /// ```
    pub fn compose_label(
        &self,
        read: &str,
        pop: &str,
        push: &str,
    ) -> Result<String, LabelFormatError> {
        PushdownLabel::compose(read, pop, push, self.config.default_empty())
    }

    /// Classifies flattened finite automaton transitions using the configured empty markers.
    pub fn is_deterministic(&self, transitions: &[Transition]) -> bool {
        is_deterministic_with(transitions, self.config.empty_symbols())
    }

    /// Runs the simulator that matches `kind`.
    pub fn simulate(
        &self,
        kind: AutomatonKind,
        input: &str,
        snapshot: &Snapshot,
    ) -> Result<SimulationResult, SimulationError> {
        match kind {
            AutomatonKind::Finite => self.finite().simulate(input, snapshot),
            AutomatonKind::Pushdown => self.pushdown().simulate(input, snapshot),
        }
    }
}

/// A flattened transition together with its parsed label.
pub(crate) struct Edge<L> {
    pub(crate) transition: Transition,
    pub(crate) label: L,
}

/// Lookup structure over a snapshot and its flattened transitions. Outgoing edges are
/// kept in list order, which is the order in which the searches explore them.
pub(crate) struct Table<L> {
    states: Map<StateId, State>,
    edges: Vec<Edge<L>>,
    outgoing: Map<StateId, Vec<usize>>,
}

impl<L> Table<L> {
    pub(crate) fn new<F>(
        states: &[State],
        transitions: Vec<Transition>,
        mut parse: F,
    ) -> Result<Self, SimulationError>
    where
        F: FnMut(&Transition) -> Result<L, SimulationError>,
    {
        let mut edges = Vec::with_capacity(transitions.len());
        let mut outgoing: Map<StateId, Vec<usize>> = Map::default();
        for transition in transitions {
            let label = parse(&transition)?;
            outgoing
                .entry(transition.source.clone())
                .or_default()
                .push(edges.len());
            edges.push(Edge { transition, label });
        }

        Ok(Self {
            states: states
                .iter()
                .map(|state| (state.id.clone(), state.clone()))
                .collect(),
            edges,
            outgoing,
        })
    }

    pub(crate) fn state(&self, id: &StateId) -> Option<&State> {
        self.states.get(id)
    }

    /// Synthetic states exist implicitly, named ones only if they are in the snapshot.
    pub(crate) fn contains(&self, id: &StateId) -> bool {
        id.is_synthetic() || self.states.contains_key(id)
    }

    pub(crate) fn is_final(&self, id: &StateId) -> bool {
        self.state(id).is_some_and(|state| state.is_final)
    }

    /// Edges leaving `id` in list order. Edges into unknown states never match.
    pub(crate) fn edges_from<'t>(
        &'t self,
        id: &StateId,
    ) -> impl Iterator<Item = &'t Edge<L>> + 't {
        self.outgoing
            .get(id)
            .into_iter()
            .flatten()
            .map(|&index| &self.edges[index])
            .filter(|edge| self.contains(&edge.transition.target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Symbol;

    #[test_log::test]
    fn table_skips_dangling_targets() {
        let states = [State::new("1", "q0"), State::accepting("2", "q1")];
        let transitions = vec![
            Transition::new("e1", "1", "9", "a"),
            Transition::new("e2", "1", StateId::Synthetic(0), "b"),
            Transition::new("e3", "1", "2", "c"),
        ];
        let config = Config::default();
        let table = Table::new(&states, transitions, |t| {
            Ok(Symbol::finite(t.label(), config.empty_symbols()))
        })
        .unwrap();

        let targets = table
            .edges_from(&StateId::from("1"))
            .map(|edge| edge.transition.target.to_string())
            .collect::<Vec<_>>();
        assert_eq!(targets, vec!["~0", "2"]);
        assert!(table.is_final(&StateId::from("2")));
        assert!(!table.is_final(&StateId::Synthetic(0)));
        assert_eq!(table.edges_from(&StateId::from("2")).count(), 0);
    }

    #[test_log::test]
    fn engine_dispatches_on_kind() {
        let finite = Snapshot::new(
            [State::new("1", "q0"), State::accepting("2", "q1")],
            [Transition::new("e1", "1", "2", "a")],
        );
        let pushdown = Snapshot::new(
            [State::new("1", "q0"), State::accepting("2", "q1")],
            [Transition::new("e1", "1", "2", "a;Z;λ")],
        );
        let engine = Engine::default();

        assert!(engine
            .simulate(AutomatonKind::Finite, "a", &finite)
            .unwrap()
            .is_accepted());
        assert!(engine
            .simulate(AutomatonKind::Pushdown, "a", &pushdown)
            .unwrap()
            .is_accepted());
        assert!(engine
            .simulate(AutomatonKind::Pushdown, "a", &finite)
            .is_err());
        assert_eq!(engine.finite().kind(), AutomatonKind::Finite);
        assert_eq!(engine.pushdown().kind(), AutomatonKind::Pushdown);
    }

    #[test_log::test]
    fn composed_labels_use_the_configured_marker() {
        let engine = Engine::default();
        let label = engine.compose_label("", "Z", " ").unwrap();
        assert_eq!(label, "λ;Z;λ");

        let pda = Snapshot::new(
            [State::new("1", "q0"), State::accepting("2", "q1")],
            [Transition::new("e1", "1", "2", label)],
        );
        assert!(engine.pushdown().simulate("", &pda).unwrap().is_accepted());

        let engine = Engine::new(Config::default().with_default_empty('ε'));
        assert_eq!(engine.compose_label("a", "", "").unwrap(), "a;ε;ε");
        assert_eq!(
            engine.compose_label("a;", "", ""),
            Err(LabelFormatError::ReservedCharacter("a;".to_string()))
        );
    }
}
