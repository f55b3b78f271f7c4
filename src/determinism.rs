use crate::{
    config::EmptySymbols,
    math::Set,
    snapshot::{StateId, Transition},
};

/// Decides whether a flattened finite automaton transition list is deterministic, using
/// the default empty markers. See [`is_deterministic_with`].
pub fn is_deterministic(transitions: &[Transition]) -> bool {
    is_deterministic_with(transitions, &EmptySymbols::default())
}

/// A flattened finite automaton is deterministic if no two transitions leave the same
/// state with the same label, and if no transition is an empty transition. An absent or
/// blank label counts as empty.
pub fn is_deterministic_with(transitions: &[Transition], empty: &EmptySymbols) -> bool {
    has_unique_moves(transitions) && !has_empty_moves(transitions, empty)
}

fn has_unique_moves(transitions: &[Transition]) -> bool {
    let mut seen: Set<(&StateId, Option<&str>)> = Set::default();
    transitions
        .iter()
        .all(|t| seen.insert((&t.source, t.label())))
}

fn has_empty_moves(transitions: &[Transition], empty: &EmptySymbols) -> bool {
    transitions.iter().any(|t| match t.label() {
        None | Some("") => true,
        Some(label) => empty.is_empty_label(label),
    })
}
