use tracing::{debug, trace};

use crate::{
    automaton::AutomatonKind,
    error::SimulationError,
    label::{self, LabelFormatError},
    snapshot::{StateId, Transition},
};

/// Flattens a transition list so that every entry carries exactly one primitive move,
/// a single character for finite automata and a single `read;pop;push` triple for
/// pushdown automata.
///
/// Transitions that are already primitive keep their relative order and come first.
/// The transitions generated from split labels follow, in the order in which their
/// originals appear. The input is never modified and flattening an already flat list
/// returns it unchanged.
///
/// For a finite automaton a label such as `ab` is read character by character, so the
/// generated transitions are chained through freshly minted [`StateId::Synthetic`]
/// states. Pushdown alternatives are atomic and connect source and target directly.
///
/// ```
/// use automata_lab::prelude::*;
///
/// let transitions = [Transition::new("e", "1", "2", "ab")];
/// let flat = preprocess(&transitions, AutomatonKind::Finite).unwrap();
/// assert_eq!(flat.len(), 2);
/// assert_eq!(flat[0].source, StateId::from("1"));
/// assert_eq!(flat[0].target, flat[1].source);
/// assert_eq!(flat[1].target, StateId::from("2"));
/// ```
pub fn preprocess(
    transitions: &[Transition],
    kind: AutomatonKind,
) -> Result<Vec<Transition>, SimulationError> {
    let mut synthetic = SyntheticStates::after(transitions);
    let mut flat = Vec::with_capacity(transitions.len());
    let mut generated = Vec::new();

    for transition in transitions {
        let expansion = match kind {
            AutomatonKind::Finite => expand_finite(transition, &mut synthetic),
            AutomatonKind::Pushdown => expand_pushdown(transition)?,
        };
        match expansion {
            Some(expanded) => {
                debug!(
                    "split transition {} into {} primitive transitions",
                    transition.id,
                    expanded.len()
                );
                generated.extend(expanded);
            }
            None => flat.push(transition.clone()),
        }
    }

    flat.extend(generated);
    Ok(flat)
}

/// Hands out identifiers for synthetic states that are not yet used by any transition.
struct SyntheticStates(u32);

impl SyntheticStates {
    fn after(transitions: &[Transition]) -> Self {
        let next = transitions
            .iter()
            .flat_map(|t| [&t.source, &t.target])
            .filter_map(|id| match id {
                StateId::Synthetic(n) => Some(n + 1),
                StateId::Named(_) => None,
            })
            .max()
            .unwrap_or(0);
        Self(next)
    }

    fn mint(&mut self) -> StateId {
        let id = StateId::Synthetic(self.0);
        self.0 += 1;
        id
    }
}

/// Returns `None` if the label is already primitive.
fn expand_finite(
    transition: &Transition,
    synthetic: &mut SyntheticStates,
) -> Option<Vec<Transition>> {
    let raw = transition.label();
    if label::is_primitive_finite(raw) {
        return None;
    }

    let mut expanded = Vec::new();
    for piece in label::finite_pieces(raw.unwrap_or_default()) {
        let mut previous = transition.source.clone();
        for (position, symbol) in piece.iter().enumerate() {
            let target = if position + 1 == piece.len() {
                transition.target.clone()
            } else {
                synthetic.mint()
            };
            trace!("{previous} --{symbol}--> {target}");
            expanded.push(Transition {
                id: transition.id.derive(expanded.len()),
                source: previous,
                target: target.clone(),
                label: Some(symbol.to_string()),
            });
            previous = target;
        }
    }
    Some(expanded)
}

/// Returns `None` if the label holds a single triple, fails if there is no label.
fn expand_pushdown(transition: &Transition) -> Result<Option<Vec<Transition>>, SimulationError> {
    let raw = transition
        .label()
        .ok_or_else(|| SimulationError::label(&transition.id, LabelFormatError::Missing))?;
    let pieces = label::pushdown_pieces(raw);
    match pieces.len() {
        0 => Err(SimulationError::label(
            &transition.id,
            LabelFormatError::Missing,
        )),
        1 => Ok(None),
        _ => Ok(Some(
            pieces
                .into_iter()
                .enumerate()
                .map(|(index, piece)| Transition {
                    id: transition.id.derive(index),
                    source: transition.source.clone(),
                    target: transition.target.clone(),
                    label: Some(piece.to_string()),
                })
                .collect(),
        )),
    }
}
