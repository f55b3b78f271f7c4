use std::{fmt::Display, str::FromStr};

use thiserror::Error;

/// Distinguishes the two kinds of automata the editor can draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum AutomatonKind {
    /// Transitions read single characters, labels are literal strings.
    #[default]
    Finite,
    /// Transitions carry `read;pop;push` triples that operate on a stack.
    Pushdown,
}

/// Returned when a string names no known [`AutomatonKind`].
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("unknown automaton kind `{0}`, expected `finite` or `pushdown`")]
pub struct UnknownAutomatonKind(String);

impl FromStr for AutomatonKind {
    type Err = UnknownAutomatonKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "finite" => Ok(AutomatonKind::Finite),
            "pushdown" => Ok(AutomatonKind::Pushdown),
            other => Err(UnknownAutomatonKind(other.to_string())),
        }
    }
}

impl Display for AutomatonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AutomatonKind::Finite => write!(f, "finite"),
            AutomatonKind::Pushdown => write!(f, "pushdown"),
        }
    }
}
