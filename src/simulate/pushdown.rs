use itertools::Itertools;
use tracing::{debug, trace, warn};

use super::{Simulator, Table};
use crate::{
    automaton::AutomatonKind,
    config::Config,
    error::SimulationError,
    label::PushdownLabel,
    math::Set,
    preprocess::preprocess,
    result::SimulationResult,
    snapshot::{Snapshot, StateId},
    table,
};

type PushdownTable = Table<PushdownLabel>;

/// Simulates pushdown automata by a depth first search over configurations consisting
/// of a state, a position in the input and the stack contents.
///
/// The stack initially holds the configured bottom marker. A configuration accepts if
/// its state is final, the input is consumed and the stack is completely empty, so the
/// bottom marker has to be popped by some transition.
///
/// Moves that read a symbol are bounded by the length of the input. Two limits from the
/// [`Config`] bound the rest of the search: a path may contain at most
/// [`Config::max_depth`] empty-read moves in a row, and at most
/// [`Config::max_configurations`] configurations are entered at any input position.
#[derive(Clone, Copy, Debug)]
pub struct PushdownSimulator<'c> {
    config: &'c Config,
}

impl<'c> PushdownSimulator<'c> {
    /// Creates a simulator using `config`.
    pub fn new(config: &'c Config) -> Self {
        Self { config }
    }
}

impl Simulator for PushdownSimulator<'_> {
    fn kind(&self) -> AutomatonKind {
        AutomatonKind::Pushdown
    }

    fn simulate(
        &self,
        input: &str,
        snapshot: &Snapshot,
    ) -> Result<SimulationResult, SimulationError> {
        let (states, transitions) = snapshot.parts()?;
        let flat = preprocess(transitions, AutomatonKind::Pushdown)?;
        trace!("flattened transitions\n{}", table::render(states, &flat));

        let empty = self.config.empty_symbols();
        let table = Table::new(states, flat, |t| {
            PushdownLabel::parse(t.label().unwrap_or_default(), empty)
                .map_err(|err| SimulationError::label(&t.id, err))
        })?;
        let Some(start) = table.state(self.config.start()) else {
            warn!("start state {} does not exist", self.config.start());
            return Ok(SimulationResult::rejected());
        };

        let input = input.chars().collect_vec();
        let mut search = Search {
            table: &table,
            input: &input,
            visited: Set::default(),
            entered: vec![0; input.len() + 1],
            max_depth: self.config.max_depth(),
            max_configurations: self.config.max_configurations(),
            truncated: false,
        };

        match search.run(&start.id, self.config.stack_bottom())? {
            Some(accepting) => {
                debug!("accepted in {accepting} with empty stack");
                Ok(SimulationResult::accepted())
            }
            None if search.truncated => {
                Err(SimulationError::DepthLimitExceeded(search.max_depth))
            }
            None => Ok(SimulationResult::rejected()),
        }
    }
}

/// A node of the search. `empty_run` counts the empty-read moves that led here since
/// the last symbol was read.
struct Configuration<'t> {
    state: &'t StateId,
    position: usize,
    stack: Vec<char>,
    empty_run: usize,
}

struct Search<'t> {
    table: &'t PushdownTable,
    input: &'t [char],
    visited: Set<(&'t StateId, usize, Vec<char>)>,
    /// Number of configurations entered per input position.
    entered: Vec<usize>,
    max_depth: usize,
    max_configurations: usize,
    truncated: bool,
}

impl<'t> Search<'t> {
    /// Every pending configuration owns its copy of the stack, so a branch that fails
    /// leaves no trace in the stack seen by its siblings.
    fn run(
        &mut self,
        start: &'t StateId,
        bottom: char,
    ) -> Result<Option<&'t StateId>, SimulationError> {
        let mut pending = vec![Configuration {
            state: start,
            position: 0,
            stack: vec![bottom],
            empty_run: 0,
        }];

        while let Some(configuration) = pending.pop() {
            let Configuration {
                state,
                position,
                stack,
                empty_run,
            } = configuration;
            if self.table.is_final(state) && position == self.input.len() && stack.is_empty() {
                return Ok(Some(state));
            }
            if !self.visited.insert((state, position, stack.clone())) {
                continue;
            }
            self.entered[position] += 1;
            if self.entered[position] > self.max_configurations {
                warn!(
                    "more than {} configurations at position {position}, giving up",
                    self.max_configurations
                );
                return Err(SimulationError::ConfigurationLimitExceeded(
                    self.max_configurations,
                ));
            }

            let moves = self.moves(state, position, &stack, empty_run).collect_vec();
            pending.extend(moves.into_iter().rev());
        }
        Ok(None)
    }

    /// The configurations reachable from `state` in one move, in list order.
    fn moves<'s>(
        &'s mut self,
        state: &'t StateId,
        position: usize,
        stack: &'s [char],
        empty_run: usize,
    ) -> impl Iterator<Item = Configuration<'t>> + 's {
        let table = self.table;
        let input = self.input;
        table.edges_from(state).filter_map(move |edge| {
            let label = &edge.label;
            if !label.pop.matches_top(stack.last().copied()) {
                return None;
            }
            let next = label.read.advance(input, position)?;
            let empty_run = if next == position { empty_run + 1 } else { 0 };
            if empty_run > self.max_depth {
                if !self.truncated {
                    warn!(
                        "{} empty moves in a row from {state} at position {position}",
                        self.max_depth
                    );
                }
                self.truncated = true;
                return None;
            }

            let mut next_stack = stack.to_vec();
            if !label.pop.is_empty() {
                next_stack.pop();
            }
            next_stack.extend(label.push.iter().copied());
            trace!(
                "{state} --{label}--> {} with stack {}",
                edge.transition.target,
                next_stack.iter().collect::<String>()
            );
            Some(Configuration {
                state: &edge.transition.target,
                position: next,
                stack: next_stack,
                empty_run,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        label::LabelFormatError,
        snapshot::{Collection, State, Transition, TransitionId},
        Engine,
    };

    fn run(input: &str, snapshot: &Snapshot) -> Result<SimulationResult, SimulationError> {
        Engine::default().pushdown().simulate(input, snapshot)
    }

    fn balanced_parentheses() -> Snapshot {
        Snapshot::new(
            [State::new("1", "q0"), State::accepting("2", "q1")],
            [
                Transition::new("push", "1", "1", "(;ε;("),
                Transition::new("pop", "1", "1", ");(;ε"),
                Transition::new("bottom", "1", "2", "ε;Z;ε"),
            ],
        )
    }

    #[test_log::test]
    fn balanced_parentheses_are_accepted() {
        let pda = balanced_parentheses();
        for input in ["(())", "()()", "", "(()(()))"] {
            assert_eq!(run(input, &pda), Ok(SimulationResult::accepted()), "{input}");
        }
        for input in ["(()", ")(", "())", "("] {
            assert_eq!(run(input, &pda), Ok(SimulationResult::rejected()), "{input}");
        }
    }

    #[test_log::test]
    fn alternatives_on_one_edge() {
        let pda = Snapshot::new(
            [State::new("1", "q0"), State::accepting("2", "q1")],
            [
                Transition::new("e1", "1", "1", "(;ε;(\n);(;ε"),
                Transition::new("e2", "1", "2", "λ;Z;λ"),
            ],
        );
        assert_eq!(run("(())", &pda), Ok(SimulationResult::accepted()));
        assert_eq!(run("(()", &pda), Ok(SimulationResult::rejected()));
    }

    #[test_log::test]
    fn bottom_marker_has_to_be_popped() {
        let transitions = [
            Transition::new("e1", "1", "1", "a;ε;A"),
            Transition::new("e2", "1", "2", "b;A;ε"),
            Transition::new("e3", "2", "2", "b;A;ε"),
        ];
        let states = [State::new("1", "q0"), State::accepting("2", "q1")];

        let keeps_marker = Snapshot::new(states.clone(), transitions.clone());
        assert_eq!(run("aabb", &keeps_marker), Ok(SimulationResult::rejected()));

        let mut popping = transitions.to_vec();
        popping.push(Transition::new("e4", "2", "3", "ε;Z;ε"));
        let mut with_sink = states.to_vec();
        with_sink.push(State::accepting("3", "q2"));
        let pops_marker = Snapshot::new(with_sink, popping);
        assert_eq!(run("aabb", &pops_marker), Ok(SimulationResult::accepted()));
        assert_eq!(run("aab", &pops_marker), Ok(SimulationResult::rejected()));
    }

    #[test_log::test]
    fn branches_do_not_share_the_stack() {
        let pda = Snapshot::new(
            [
                State::new("1", "q0"),
                State::new("2", "dead"),
                State::accepting("3", "q1"),
            ],
            [
                Transition::new("e1", "1", "2", "ε;ε;X"),
                Transition::new("e2", "1", "3", "a;Z;ε"),
            ],
        );
        assert_eq!(run("a", &pda), Ok(SimulationResult::accepted()));
    }

    #[test_log::test]
    fn push_order_puts_last_symbol_on_top() {
        let pda = Snapshot::new(
            [
                State::new("1", "q0"),
                State::new("2", "q1"),
                State::accepting("3", "q2"),
            ],
            [
                Transition::new("e1", "1", "2", "ε;Z;ZAB"),
                Transition::new("e2", "2", "2", "b;B;ε"),
                Transition::new("e3", "2", "2", "a;A;ε"),
                Transition::new("e4", "2", "3", "ε;Z;ε"),
            ],
        );
        assert_eq!(run("ba", &pda), Ok(SimulationResult::accepted()));
        assert_eq!(run("ab", &pda), Ok(SimulationResult::rejected()));
    }

    #[test_log::test]
    fn empty_cycles_terminate() {
        let pda = Snapshot::new(
            [State::new("1", "q0"), State::accepting("2", "q1")],
            [
                Transition::new("e1", "1", "2", "ε;ε;ε"),
                Transition::new("e2", "2", "1", "λ;λ;λ"),
            ],
        );
        assert_eq!(run("", &pda), Ok(SimulationResult::rejected()));
    }

    #[test_log::test]
    fn growing_stack_hits_depth_bound() {
        let pda = Snapshot::new(
            [State::new("1", "q0"), State::accepting("2", "q1")],
            [Transition::new("e1", "1", "1", "ε;ε;A")],
        );
        let engine = Engine::new(Config::default().with_max_depth(64));
        assert_eq!(
            engine.pushdown().simulate("", &pda),
            Err(SimulationError::DepthLimitExceeded(64))
        );
    }

    fn anbn() -> Snapshot {
        Snapshot::new(
            [
                State::new("1", "q0"),
                State::new("2", "q1"),
                State::accepting("3", "q2"),
            ],
            [
                Transition::new("e1", "1", "1", "a;ε;A"),
                Transition::new("e2", "1", "2", "b;A;ε"),
                Transition::new("e3", "2", "2", "b;A;ε"),
                Transition::new("e4", "2", "3", "ε;Z;ε"),
            ],
        )
    }

    #[test_log::test]
    fn inputs_longer_than_the_depth_bound() {
        let pda = anbn();
        for n in [600, 1500] {
            let word = format!("{}{}", "a".repeat(n), "b".repeat(n));
            assert_eq!(run(&word, &pda), Ok(SimulationResult::accepted()), "{n}");
            let word = format!("{}{}", "a".repeat(n), "b".repeat(n - 1));
            assert_eq!(run(&word, &pda), Ok(SimulationResult::rejected()), "{n}");
        }

        let engine = Engine::new(Config::default().with_max_depth(2));
        assert_eq!(
            engine.pushdown().simulate("aaaabbbb", &pda),
            Ok(SimulationResult::accepted())
        );
    }

    #[test_log::test]
    fn reading_a_symbol_resets_the_empty_run() {
        let pda = Snapshot::new(
            [
                State::new("1", "q0"),
                State::new("2", "q1"),
                State::accepting("3", "q2"),
            ],
            [
                Transition::new("e1", "1", "2", "ε;ε;ε"),
                Transition::new("e2", "2", "1", "a;ε;ε"),
                Transition::new("e3", "1", "3", "ε;Z;ε"),
            ],
        );
        let engine = Engine::new(Config::default().with_max_depth(1));
        assert_eq!(
            engine.pushdown().simulate(&"a".repeat(100), &pda),
            Ok(SimulationResult::accepted())
        );
    }

    #[test_log::test]
    fn branching_empty_pushes_hit_the_configuration_bound() {
        let pda = Snapshot::new(
            [State::new("1", "q0"), State::accepting("2", "q1")],
            [
                Transition::new("e1", "1", "1", "ε;ε;A"),
                Transition::new("e2", "1", "1", "ε;ε;B"),
            ],
        );
        assert_eq!(
            run("", &pda),
            Err(SimulationError::ConfigurationLimitExceeded(4096))
        );

        let engine = Engine::new(Config::default().with_max_configurations(100));
        assert_eq!(
            engine.pushdown().simulate("a", &pda),
            Err(SimulationError::ConfigurationLimitExceeded(100))
        );
    }

    #[test_log::test]
    fn fields_after_the_third_are_ignored() {
        let pda = Snapshot::new(
            [State::new("1", "q0"), State::accepting("2", "q1")],
            [Transition::new("e1", "1", "2", "a;Z;ε;")],
        );
        assert_eq!(run("a", &pda), Ok(SimulationResult::accepted()));
    }

    #[test_log::test]
    fn malformed_labels_abort() {
        let pda = Snapshot::new(
            [State::new("1", "q0"), State::accepting("2", "q1")],
            [
                Transition::new("e1", "1", "2", "a;Z;ε"),
                Transition::new("e2", "2", "2", "a"),
            ],
        );
        let err = run("b", &pda).unwrap_err();
        assert_eq!(
            err,
            SimulationError::LabelFormat {
                transition: TransitionId::from("e2"),
                source: LabelFormatError::FieldCount {
                    label: "a".to_string(),
                    found: 1
                }
            }
        );
        assert_eq!(err.offending_transition(), Some(&TransitionId::from("e2")));

        let derived = Snapshot::new(
            [State::new("1", "q0")],
            [Transition::new("e1", "1", "1", "a;Z;ε\nb")],
        );
        let err = run("a", &derived).unwrap_err();
        assert_eq!(
            err.offending_transition().map(TransitionId::origin),
            Some(&TransitionId::from("e1"))
        );

        let unlabeled = Snapshot::new(
            [State::new("1", "q0")],
            [Transition::unlabeled("e1", "1", "1")],
        );
        assert!(matches!(
            run("a", &unlabeled),
            Err(SimulationError::LabelFormat {
                source: LabelFormatError::Missing,
                ..
            })
        ));
    }

    #[test_log::test]
    fn malformed_snapshot() {
        let snapshot = Snapshot::from_parts(Some(vec![State::new("1", "q0")]), None);
        assert_eq!(
            run("a", &snapshot),
            Err(SimulationError::MalformedAutomaton(Collection::Transitions))
        );
    }

    #[test_log::test]
    fn configured_bottom_marker() {
        let pda = Snapshot::new(
            [State::new("1", "q0"), State::accepting("2", "q1")],
            [Transition::new("e1", "1", "2", "a;#;ε")],
        );
        assert_eq!(run("a", &pda), Ok(SimulationResult::rejected()));

        let engine = Engine::new(Config::default().with_stack_bottom('#'));
        assert_eq!(
            engine.pushdown().simulate("a", &pda),
            Ok(SimulationResult::accepted())
        );
    }
}
