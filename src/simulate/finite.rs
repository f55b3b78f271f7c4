use itertools::Itertools;
use tracing::{debug, trace, warn};

use super::{Simulator, Table};
use crate::{
    automaton::AutomatonKind,
    config::Config,
    determinism::is_deterministic_with,
    error::SimulationError,
    label::Symbol,
    math::Set,
    preprocess::preprocess,
    result::SimulationResult,
    snapshot::{Snapshot, StateId},
    table,
};

/// Labels that are not a single symbol never fire.
type FiniteTable = Table<Option<Symbol>>;

/// Simulates finite automata. Deterministic automata are walked directly, all others
/// are explored by a depth first search that follows empty transitions.
#[derive(Clone, Copy, Debug)]
pub struct FiniteSimulator<'c> {
    config: &'c Config,
}

impl<'c> FiniteSimulator<'c> {
    /// Creates a simulator using `config`.
    pub fn new(config: &'c Config) -> Self {
        Self { config }
    }
}

impl Simulator for FiniteSimulator<'_> {
    fn kind(&self) -> AutomatonKind {
        AutomatonKind::Finite
    }

    fn simulate(
        &self,
        input: &str,
        snapshot: &Snapshot,
    ) -> Result<SimulationResult, SimulationError> {
        let (states, transitions) = snapshot.parts()?;
        let flat = preprocess(transitions, AutomatonKind::Finite)?;
        let empty = self.config.empty_symbols();
        let deterministic = is_deterministic_with(&flat, empty);
        trace!("flattened transitions\n{}", table::render(states, &flat));

        let table = Table::new(states, flat, |t| Ok(Symbol::finite(t.label(), empty)))?;
        let Some(start) = table.state(self.config.start()) else {
            warn!("start state {} does not exist", self.config.start());
            return Ok(SimulationResult::rejected());
        };
        let input = input.chars().collect_vec();

        if deterministic {
            debug!("automaton is deterministic, walking {} symbols", input.len());
            Ok(walk(&table, &start.id, &input))
        } else {
            debug!("automaton is nondeterministic, searching");
            match search(&table, &start.id, &input) {
                Some(accepting) => {
                    debug!("accepted in {accepting}");
                    Ok(SimulationResult::accepted())
                }
                None => Ok(SimulationResult::rejected()),
            }
        }
    }
}

/// Follows the unique matching transition for every input symbol and stops as soon as
/// there is none.
fn walk(table: &FiniteTable, start: &StateId, input: &[char]) -> SimulationResult {
    let mut current = start;
    for (position, &symbol) in input.iter().enumerate() {
        match table
            .edges_from(current)
            .find(|edge| edge.label == Some(Symbol::Char(symbol)))
        {
            Some(edge) => {
                trace!("{current} --{symbol}--> {}", edge.transition.target);
                current = &edge.transition.target;
            }
            None => {
                debug!("stuck in {current} on {symbol} at position {position}");
                return SimulationResult::rejected();
            }
        }
    }

    match table.state(current) {
        Some(state) if state.is_final => SimulationResult::accepted_in(state.label.clone()),
        _ => SimulationResult::rejected(),
    }
}

/// Depth first search over configurations `(state, position)`, returning the first
/// accepting state in list order. A configuration that was entered before is not
/// entered again, so at most `|states| * (input.len() + 1)` configurations are
/// explored and cycles of empty transitions are cut off.
///
/// Pending configurations live on an explicit stack, pushed in reverse list order so
/// that they are entered in the same order as by a recursive search.
fn search<'t>(table: &'t FiniteTable, start: &'t StateId, input: &[char]) -> Option<&'t StateId> {
    let mut visited: Set<(&StateId, usize)> = Set::default();
    let mut pending = vec![(start, 0)];

    while let Some((state, position)) = pending.pop() {
        if position == input.len() && table.is_final(state) {
            return Some(state);
        }
        if !visited.insert((state, position)) {
            continue;
        }

        let moves = table
            .edges_from(state)
            .filter_map(|edge| {
                let next = edge.label?.advance(input, position)?;
                trace!("{state} --{}--> {}", edge.transition.id, edge.transition.target);
                Some((&edge.transition.target, next))
            })
            .collect_vec();
        pending.extend(moves.into_iter().rev());
    }
    None
}
