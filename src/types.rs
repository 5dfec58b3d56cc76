//! This module defines the core data structures and types used throughout the Turing Machine
//! simulator, including the machine definition, transitions, configurations, and error types.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// The default blank symbol used on the Turing Machine tape.
pub const DEFAULT_BLANK_SYMBOL: char = ' ';
/// A special input symbol used in program definitions to represent the blank symbol.
pub const INPUT_BLANK_SYMBOL: char = '_';
/// The maximum allowed size for a Turing Machine program in bytes.
pub const MAX_PROGRAM_SIZE: usize = 65536; // 64KB
/// The default step ceiling used by the operator.
pub const MAX_EXECUTION_STEPS: usize = 10000;

/// An element of the tape alphabet.
pub type Symbol = char;

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

/// The right-hand side of a transition rule.
///
/// The left-hand side, the `(state, symbol)` pair, is the key under which the
/// transition is stored in a [`TransitionTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The state the machine enters after applying this rule.
    pub next_state: String,
    /// The symbol written under the head.
    pub write: Symbol,
    /// The head movement performed after writing.
    pub direction: Direction,
}

impl Transition {
    pub fn new(next_state: impl Into<String>, write: Symbol, direction: Direction) -> Self {
        Self {
            next_state: next_state.into(),
            write,
            direction,
        }
    }
}

/// A deterministic transition table mapping `(state, symbol)` to a [`Transition`].
///
/// Rules are grouped by state so that a lookup can borrow the current state
/// instead of building an owned key on every step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionTable {
    rules: HashMap<String, HashMap<Symbol, Transition>>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a rule, returning the rule previously stored under the same key.
    pub fn insert(
        &mut self,
        state: impl Into<String>,
        symbol: Symbol,
        transition: Transition,
    ) -> Option<Transition> {
        self.rules
            .entry(state.into())
            .or_default()
            .insert(symbol, transition)
    }

    /// Declares a state without adding any rule for it.
    pub fn declare(&mut self, state: impl Into<String>) {
        self.rules.entry(state.into()).or_default();
    }

    /// Returns the rule for `(state, symbol)`, if any.
    pub fn get(&self, state: &str, symbol: Symbol) -> Option<&Transition> {
        self.rules.get(state).and_then(|row| row.get(&symbol))
    }

    /// Returns all rules leaving `state`.
    pub fn rules_for(&self, state: &str) -> Option<&HashMap<Symbol, Transition>> {
        self.rules.get(state)
    }

    /// Returns `true` if `state` has been declared, with or without rules.
    pub fn has_state(&self, state: &str) -> bool {
        self.rules.contains_key(state)
    }

    /// Iterates over the declared states.
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Iterates over every `(state, symbol, transition)` triple.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Symbol, &Transition)> {
        self.rules.iter().flat_map(|(state, row)| {
            row.iter()
                .map(move |(symbol, transition)| (state.as_str(), *symbol, transition))
        })
    }

    /// The number of rules in the table.
    pub fn len(&self) -> usize {
        self.rules.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: Into<String>> FromIterator<((S, Symbol), Transition)> for TransitionTable {
    fn from_iter<I: IntoIterator<Item = ((S, Symbol), Transition)>>(iter: I) -> Self {
        let mut table = TransitionTable::new();
        for ((state, symbol), transition) in iter {
            table.insert(state, symbol, transition);
        }
        table
    }
}

/// The immutable definition of a single-tape Turing Machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// The name of the Turing Machine program.
    pub name: String,
    /// All states, in order of first appearance.
    pub states: Vec<String>,
    /// The tape alphabet, including the blank symbol.
    pub alphabet: Vec<Symbol>,
    /// The blank symbol.
    pub blank: Symbol,
    /// Symbols allowed in the input handed to `reset_with_tape`.
    pub input_symbols: Vec<Symbol>,
    /// The state the machine starts in.
    pub initial_state: String,
    /// Accepting states.
    pub final_states: HashSet<String>,
    /// The transition rules.
    pub rules: TransitionTable,
    /// Input used when the machine is reset without an explicit one.
    pub tape: String,
}

impl Program {
    /// Returns `true` if `state` is an accepting state.
    pub fn is_final(&self, state: &str) -> bool {
        self.final_states.contains(state)
    }

    /// Returns `true` if `symbol` may appear in an input.
    pub fn is_input_symbol(&self, symbol: Symbol) -> bool {
        self.input_symbols.contains(&symbol)
    }

    /// Returns the default tape content.
    pub fn initial_tape(&self) -> &str {
        &self.tape
    }
}

/// A snapshot of the machine for human-readable tracing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub state: String,
    /// Visited cells left of the head.
    pub left: String,
    /// The symbol under the head.
    pub head: Symbol,
    /// Visited cells right of the head.
    pub right: String,
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "state:{} tape:{}[{}]{}",
            self.state, self.left, self.head, self.right
        )
    }
}

/// The observable outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub state: String,
    pub accepted: bool,
    /// Tape content with leading and trailing blanks removed.
    pub tape: String,
    pub steps: usize,
}

/// Represents various errors that can occur during Turing Machine operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// The operator gave up after exceeding its step ceiling. This is inconclusive:
    /// the machine probably never stops, but it has not been proven.
    #[error("Machine probably never halts: exceeded {max_steps} steps")]
    NonHalting { max_steps: usize },
    /// The input handed to the machine contains a symbol outside the input alphabet.
    #[error("Invalid input symbol {symbol:?} at position {position}")]
    InvalidInput { symbol: Symbol, position: usize },
    /// Indicates an error during the parsing of a Turing Machine program definition.
    #[error("Program parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates an error during the validation of a Turing Machine program's structure or logic.
    #[error("Program validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to file system operations, such as reading program files.
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left = Direction::Left;
        let stay = Direction::Stay;

        let left_json = serde_json::to_string(&left).unwrap();
        let stay_json = serde_json::to_string(&stay).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(stay_json, "\"Stay\"");

        let left_deserialized: Direction = serde_json::from_str(&left_json).unwrap();
        assert_eq!(left, left_deserialized);
    }

    #[test]
    fn test_transition_table_unique_keys() {
        let mut table = TransitionTable::new();

        let first = table.insert("q0", 'a', Transition::new("q1", 'b', Direction::Right));
        assert!(first.is_none());

        let replaced = table.insert("q0", 'a', Transition::new("q2", 'c', Direction::Left));
        assert_eq!(
            replaced,
            Some(Transition::new("q1", 'b', Direction::Right))
        );

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("q0", 'a').unwrap().next_state, "q2");
        assert!(table.get("q0", 'b').is_none());
        assert!(table.get("q1", 'a').is_none());
    }

    #[test]
    fn test_transition_table_declared_state() {
        let mut table = TransitionTable::new();
        table.declare("halt");

        assert!(table.has_state("halt"));
        assert!(table.is_empty());
        assert!(table.rules_for("halt").unwrap().is_empty());
    }

    #[test]
    fn test_transition_table_from_iter() {
        let table: TransitionTable = [
            (("a", '0'), Transition::new("b", '1', Direction::Right)),
            (("b", '0'), Transition::new("a", '0', Direction::Stay)),
        ]
        .into_iter()
        .collect();

        assert_eq!(table.len(), 2);
        assert_eq!(table.iter().count(), 2);
        assert_eq!(table.get("b", '0').unwrap().direction, Direction::Stay);
    }

    #[test]
    fn test_configuration_display() {
        let configuration = Configuration {
            state: "s_1".to_string(),
            left: "10".to_string(),
            head: '1',
            right: "□".to_string(),
        };

        assert_eq!(configuration.to_string(), "state:s_1 tape:10[1]□");
    }

    #[test]
    fn test_report_serialization() {
        let report = Report {
            state: "done".to_string(),
            accepted: true,
            tape: "110".to_string(),
            steps: 7,
        };

        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(
            json,
            r#"{"state":"done","accepted":true,"tape":"110","steps":7}"#
        );
    }

    #[test]
    fn test_error_display() {
        let error = TuringMachineError::NonHalting { max_steps: 100 };
        assert_eq!(
            error.to_string(),
            "Machine probably never halts: exceeded 100 steps"
        );

        let error = TuringMachineError::InvalidInput {
            symbol: 'x',
            position: 2,
        };
        assert!(error.to_string().contains("'x'"));
        assert!(error.to_string().contains("position 2"));
    }
}
