use std::fmt::Display;

use itertools::Itertools;
use thiserror::Error;

use crate::config::{EmptySymbols, EPSILON};

/// Describes why a label could not be parsed or composed.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum LabelFormatError {
    /// The transition carries no label, or only whitespace.
    #[error("label is missing")]
    Missing,
    /// A pushdown label has fewer than three fields.
    #[error("expected at least three `;`-separated fields in `{label}`, found {found}")]
    FieldCount {
        /// The offending label.
        label: String,
        /// How many fields were found.
        found: usize,
    },
    /// The read or pop field of a pushdown label is not a single symbol.
    #[error("field `{field}` of `{label}` is not a single symbol")]
    NotASymbol {
        /// The offending label.
        label: String,
        /// The field in question.
        field: String,
    },
    /// A field that is about to be composed into a label contains `;` or `\`.
    #[error("`{0}` contains a reserved character, `;` and `\\` are not allowed")]
    ReservedCharacter(String),
}

/// A primitive symbol on a transition. Both empty markers are parsed into
/// [`Symbol::Empty`], which makes them interchangeable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// A concrete character.
    Char(char),
    /// No symbol at all.
    Empty,
}

impl Symbol {
    /// Classifies a single character.
    pub fn from_char(symbol: char, empty: &EmptySymbols) -> Self {
        if empty.contains(symbol) {
            Symbol::Empty
        } else {
            Symbol::Char(symbol)
        }
    }

    /// Parses a string that must consist of exactly one character.
    pub fn parse(field: &str, empty: &EmptySymbols) -> Option<Self> {
        field
            .chars()
            .exactly_one()
            .ok()
            .map(|c| Symbol::from_char(c, empty))
    }

    /// Parses the label of a flattened finite automaton transition. An absent or
    /// empty label is an empty transition, labels longer than one character have
    /// no single symbol and yield `None`.
    pub fn finite(label: Option<&str>, empty: &EmptySymbols) -> Option<Self> {
        match label {
            None => Some(Symbol::Empty),
            Some("") => Some(Symbol::Empty),
            Some(label) => Symbol::parse(label, empty),
        }
    }

    /// Returns true for [`Symbol::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Symbol::Empty)
    }

    /// Computes the input position after reading `self` at `position`. An empty
    /// symbol reads nothing, a character must match the next input character.
    pub fn advance(&self, input: &[char], position: usize) -> Option<usize> {
        match self {
            Symbol::Empty => Some(position),
            Symbol::Char(c) if input.get(position) == Some(c) => Some(position + 1),
            Symbol::Char(_) => None,
        }
    }

    /// Checks whether `self`, used as the symbol to pop, matches the top of the stack.
    /// An empty symbol requires nothing and matches any top, even an empty stack.
    pub fn matches_top(&self, top: Option<char>) -> bool {
        match self {
            Symbol::Empty => true,
            Symbol::Char(c) => top == Some(*c),
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Char(c) => write!(f, "{c}"),
            Symbol::Empty => write!(f, "{EPSILON}"),
        }
    }
}

/// Splits a raw label into its alternatives, one per line. Each alternative is trimmed
/// and blank lines are dropped.
pub fn alternatives(label: &str) -> impl Iterator<Item = &str> {
    label.split('\n').map(str::trim).filter(|line| !line.is_empty())
}

/// Splits a finite automaton label into its alternatives, each given as the sequence
/// of characters that has to be read one after the other.
pub fn finite_pieces(label: &str) -> Vec<Vec<char>> {
    alternatives(label).map(|line| line.chars().collect()).collect()
}

/// A finite automaton label is primitive if it is absent or has at most one character.
pub fn is_primitive_finite(label: Option<&str>) -> bool {
    label.map_or(true, |label| label.chars().count() <= 1)
}

/// Splits a pushdown automaton label into its alternatives. Unlike finite labels the
/// alternatives are not split any further, each of them is one `read;pop;push` triple.
pub fn pushdown_pieces(label: &str) -> Vec<&str> {
    alternatives(label).collect()
}

/// The parsed form of a pushdown transition label `read;pop;push`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PushdownLabel {
    /// The input symbol that is read, empty if nothing is consumed.
    pub read: Symbol,
    /// The symbol that must be on top of the stack and is popped, empty if the
    /// transition does not touch the stack top.
    pub pop: Symbol,
    /// The characters that are pushed from left to right, so the last one ends on top.
    /// Empty markers in the push field are dropped.
    pub push: Vec<char>,
}

impl PushdownLabel {
    /// Parses a single `read;pop;push` triple. Fields after the third are ignored.
    ///
    /// ```
    /// use automata_lab::prelude::*;
    ///
    /// let label = PushdownLabel::parse("a;Z;AZ", &EmptySymbols::default()).unwrap();
    /// assert_eq!(label.read, Symbol::Char('a'));
    /// assert_eq!(label.pop, Symbol::Char('Z'));
    /// assert_eq!(label.push, vec!['A', 'Z']);
    /// ```
    pub fn parse(label: &str, empty: &EmptySymbols) -> Result<Self, LabelFormatError> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(LabelFormatError::Missing);
        }

        let fields = trimmed.split(';').map(str::trim).collect_vec();
        let [read, pop, push, ..] = fields.as_slice() else {
            return Err(LabelFormatError::FieldCount {
                label: trimmed.to_string(),
                found: fields.len(),
            });
        };

        let symbol = |field: &str| {
            Symbol::parse(field, empty).ok_or_else(|| LabelFormatError::NotASymbol {
                label: trimmed.to_string(),
                field: field.to_string(),
            })
        };

        Ok(Self {
            read: symbol(*read)?,
            pop: symbol(*pop)?,
            push: push.chars().filter(|c| !empty.contains(*c)).collect(),
        })
    }

    /// Composes a label from the three fields entered in the editor dialog. Every field
    /// is trimmed and blank fields are replaced with `default_empty`.
    ///
    /// ```
    /// use automata_lab::prelude::*;
    ///
    /// assert_eq!(PushdownLabel::compose(" a", "", "AZ", 'λ').unwrap(), "a;λ;AZ");
    /// assert!(PushdownLabel::compose("a;", "Z", "", 'λ').is_err());
    /// ```
    pub fn compose(
        read: &str,
        pop: &str,
        push: &str,
        default_empty: char,
    ) -> Result<String, LabelFormatError> {
        let fields = [read, pop, push]
            .into_iter()
            .map(|field| {
                let field = field.trim();
                if field.contains(';') || field.contains('\\') {
                    Err(LabelFormatError::ReservedCharacter(field.to_string()))
                } else if field.is_empty() {
                    Ok(default_empty.to_string())
                } else {
                    Ok(field.to_string())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(fields.join(";"))
    }
}

impl Display for PushdownLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.push.is_empty() {
            write!(f, "{};{};{EPSILON}", self.read, self.pop)
        } else {
            write!(
                f,
                "{};{};{}",
                self.read,
                self.pop,
                self.push.iter().collect::<String>()
            )
        }
    }
}
