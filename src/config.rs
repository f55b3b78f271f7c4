use crate::snapshot::StateId;

/// The epsilon symbol, one of the two markers for an empty transition.
pub const EPSILON: char = 'ε';
/// The lambda symbol, the other marker for an empty transition.
pub const LAMBDA: char = 'λ';
/// Identifier of the state in which every simulation starts.
pub const START_STATE_ID: &str = "1";
/// Symbol that sits at the bottom of the stack when a pushdown simulation starts.
pub const STACK_BOTTOM: char = 'Z';
/// Default bound on consecutive empty-read moves in a pushdown search.
pub const DEFAULT_MAX_DEPTH: usize = 1024;
/// Default bound on the configurations a pushdown search enters at one input position.
pub const DEFAULT_MAX_CONFIGURATIONS: usize = 4096;

/// The pair of interchangeable symbols that denote "no symbol". Either of them may
/// appear wherever an empty transition or an empty stack operation is meant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EmptySymbols {
    epsilon: char,
    lambda: char,
}

impl Default for EmptySymbols {
    fn default() -> Self {
        Self::new(EPSILON, LAMBDA)
    }
}

impl EmptySymbols {
    /// Creates a new pair of empty markers.
    pub fn new(epsilon: char, lambda: char) -> Self {
        Self { epsilon, lambda }
    }

    /// The first marker, `ε` by default.
    pub fn epsilon(&self) -> char {
        self.epsilon
    }

    /// The second marker, `λ` by default.
    pub fn lambda(&self) -> char {
        self.lambda
    }

    /// Returns true if `symbol` is one of the two markers.
    pub fn contains(&self, symbol: char) -> bool {
        symbol == self.epsilon || symbol == self.lambda
    }

    /// Returns true if the whole `label` consists of exactly one marker.
    pub fn is_empty_label(&self, label: &str) -> bool {
        let mut chars = label.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if self.contains(c))
    }
}

/// Settings shared by the preprocessor and the simulators.
///
/// ```
/// use automata_lab::prelude::*;
///
/// let config = Config::default()
///     .with_start("q0")
///     .with_stack_bottom('#')
///     .with_max_depth(64);
/// assert_eq!(config.start(), &StateId::from("q0"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    empty_symbols: EmptySymbols,
    default_empty: char,
    start: StateId,
    stack_bottom: char,
    max_depth: usize,
    max_configurations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            empty_symbols: EmptySymbols::default(),
            default_empty: LAMBDA,
            start: StateId::from(START_STATE_ID),
            stack_bottom: STACK_BOTTOM,
            max_depth: DEFAULT_MAX_DEPTH,
            max_configurations: DEFAULT_MAX_CONFIGURATIONS,
        }
    }
}

impl Config {
    /// Replaces the pair of empty markers.
    pub fn with_empty_symbols(mut self, empty_symbols: EmptySymbols) -> Self {
        self.empty_symbols = empty_symbols;
        self
    }

    /// Sets the marker that is filled in for blank fields when composing labels.
    pub fn with_default_empty(mut self, symbol: char) -> Self {
        self.default_empty = symbol;
        self
    }

    /// Sets the identifier of the start state.
    pub fn with_start<S: Into<StateId>>(mut self, start: S) -> Self {
        self.start = start.into();
        self
    }

    /// Sets the symbol that initially sits on the stack of a pushdown automaton.
    pub fn with_stack_bottom(mut self, symbol: char) -> Self {
        self.stack_bottom = symbol;
        self
    }

    /// Bounds the number of empty-read moves in a row along one pushdown search path.
    /// Moves that read a symbol are bounded by the input and reset the count.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Bounds the number of configurations a pushdown search enters at one input
    /// position before it gives up.
    pub fn with_max_configurations(mut self, max_configurations: usize) -> Self {
        self.max_configurations = max_configurations;
        self
    }

    /// The empty markers in use.
    pub fn empty_symbols(&self) -> &EmptySymbols {
        &self.empty_symbols
    }

    /// The marker used for blank fields when composing labels.
    pub fn default_empty(&self) -> char {
        self.default_empty
    }

    /// The identifier of the start state.
    pub fn start(&self) -> &StateId {
        &self.start
    }

    /// The bottom-of-stack marker.
    pub fn stack_bottom(&self) -> char {
        self.stack_bottom
    }

    /// The bound on consecutive empty-read moves.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The bound on configurations per input position.
    pub fn max_configurations(&self) -> usize {
        self.max_configurations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn empty_markers_are_interchangeable() {
        let empty = EmptySymbols::default();
        assert!(empty.contains('ε'));
        assert!(empty.contains('λ'));
        assert!(!empty.contains('e'));

        assert!(empty.is_empty_label("ε"));
        assert!(empty.is_empty_label("λ"));
        assert!(!empty.is_empty_label("εε"));
        assert!(!empty.is_empty_label(""));
    }

    #[test_log::test]
    fn custom_markers() {
        let config = Config::default().with_empty_symbols(EmptySymbols::new('_', '~'));
        assert!(config.empty_symbols().contains('~'));
        assert!(!config.empty_symbols().contains('ε'));
        assert_eq!(config.default_empty(), 'λ');
        assert_eq!(config.start(), &StateId::from("1"));
    }
}
