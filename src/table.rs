use owo_colors::OwoColorize;

use crate::{
    math::Map,
    snapshot::{State, StateId, Transition},
};

/// Renders transitions as a table with one row per transition. States are shown by
/// their label, final states in bold, and states that do not exist in `states` (such
/// as synthetic ones) are shown dimmed by their identifier.
pub fn render(states: &[State], transitions: &[Transition]) -> String {
    let by_id: Map<&StateId, &State> = states.iter().map(|state| (&state.id, state)).collect();
    let show_state = |id: &StateId| match by_id.get(id) {
        Some(state) if state.is_final => state.label.bold().to_string(),
        Some(state) => state.label.clone(),
        None => id.to_string().dimmed().to_string(),
    };

    let mut builder = tabled::builder::Builder::default();
    builder.push_record(["Transition", "From", "Label", "To"].map(String::from));
    for transition in transitions {
        builder.push_record([
            transition.id.to_string(),
            show_state(&transition.source),
            transition
                .label()
                .map(|label| label.replace('\n', " | "))
                .unwrap_or_else(|| "-".to_string()),
            show_state(&transition.target),
        ]);
    }

    builder
        .build()
        .with(tabled::settings::Style::rounded())
        .to_string()
}
