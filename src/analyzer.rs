//! This module provides functions for analyzing Turing Machine programs to detect common errors
//! and inconsistencies before execution. This includes checks for a declared initial state,
//! referenced final states, alphabet membership, and reachable states.

use crate::types::{Program, Symbol, TuringMachineError};
use std::collections::{BTreeSet, HashSet};

/// Represents various errors that can be found during the analysis of a Turing Machine program.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// Indicates that the initial state has no rules and is not a final state.
    InvalidStartState(String),
    /// Indicates that certain final states can never be entered: they are neither the
    /// initial state nor the target of any transition.
    StopStatesNotFound(Vec<String>),
    /// Indicates that transitions reference states missing from the program's state set.
    UndefinedNextStates(Vec<String>),
    /// Indicates states with rules that cannot be reached from the initial state.
    UnreachableStates(Vec<String>),
    /// Indicates that the blank symbol was declared as an input symbol.
    BlankInInput(Symbol),
    /// Indicates symbols used by the rules or the input that are missing from the tape alphabet.
    UndeclaredSymbols(Vec<Symbol>),
    /// Indicates that the default tape contains symbols outside the input symbols.
    InvalidTapeSymbols(Vec<Symbol>),
    /// Indicates structural problems with the program (no states, blank outside the alphabet, etc.).
    StructuralError(String),
}

impl From<AnalysisError> for TuringMachineError {
    /// Converts an `AnalysisError` into a `TuringMachineError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::InvalidStartState(state) => {
                TuringMachineError::ValidationError(format!("Invalid start state: {}", state))
            }
            AnalysisError::StopStatesNotFound(states) => TuringMachineError::ValidationError(
                format!("Final states are never entered: {:?}", states),
            ),
            AnalysisError::UndefinedNextStates(transitions) => TuringMachineError::ValidationError(
                format!("Transitions reference undefined states: {:?}", transitions),
            ),
            AnalysisError::UnreachableStates(states) => TuringMachineError::ValidationError(
                format!("Unreachable states detected: {:?}", states),
            ),
            AnalysisError::BlankInInput(blank) => TuringMachineError::ValidationError(format!(
                "Blank symbol {:?} cannot be an input symbol",
                blank
            )),
            AnalysisError::UndeclaredSymbols(symbols) => TuringMachineError::ValidationError(
                format!("Symbols missing from the tape alphabet: {:?}", symbols),
            ),
            AnalysisError::InvalidTapeSymbols(symbols) => {
                TuringMachineError::ValidationError(format!(
                    "Initial tape contains symbols that are not input symbols: {:?}",
                    symbols
                ))
            }
            AnalysisError::StructuralError(msg) => TuringMachineError::ValidationError(msg),
        }
    }
}

/// Analyzes a given Turing Machine `Program` for structural and logical errors.
///
/// This function orchestrates a comprehensive series of checks, performing both
/// structural validation (basic consistency) and logical analysis (reachability,
/// alphabet membership, etc.).
///
/// # Arguments
///
/// * `program` - A reference to the `Program` to be analyzed.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(TuringMachineError::ValidationError)` with the first violated rule otherwise.
pub fn analyze(program: &Program) -> Result<(), TuringMachineError> {
    let first_error = [
        check_structure,
        check_valid_start_state,
        check_valid_stop_states,
        check_undefined_next_states,
        check_blank_input,
        check_alphabet,
        check_unreachable_states,
        check_tape_symbols,
    ]
    .iter()
    .find_map(|f| f(program).err());

    match first_error {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

/// Checks basic structural requirements of the program.
///
/// This validates fundamental structural consistency like:
/// - At least one state is declared
/// - The blank symbol belongs to the tape alphabet
fn check_structure(program: &Program) -> Result<(), AnalysisError> {
    if program.states.is_empty() {
        return Err(AnalysisError::StructuralError(
            "No states defined".to_string(),
        ));
    }

    if !program.alphabet.contains(&program.blank) {
        return Err(AnalysisError::StructuralError(format!(
            "Blank symbol {:?} is not part of the tape alphabet",
            program.blank
        )));
    }

    Ok(())
}

/// Checks whether the initial state is declared in the rules or is itself a final state.
///
/// # Returns
///
/// * `Ok(())` if the initial state is defined.
/// * `Err(AnalysisError::InvalidStartState)` otherwise.
fn check_valid_start_state(program: &Program) -> Result<(), AnalysisError> {
    let initial = &program.initial_state;

    if !program.rules.has_state(initial) && !program.is_final(initial) {
        return Err(AnalysisError::InvalidStartState(initial.clone()));
    }

    Ok(())
}

/// Checks that every final state can be entered, either because it is the initial state or
/// because some transition targets it.
///
/// # Returns
///
/// * `Ok(())` if all final states are referenced.
/// * `Err(AnalysisError::StopStatesNotFound)` with the sorted list of unreferenced final states.
fn check_valid_stop_states(program: &Program) -> Result<(), AnalysisError> {
    let next_states: HashSet<&str> = program
        .rules
        .iter()
        .map(|(_, _, transition)| transition.next_state.as_str())
        .collect();

    let mut invalid: Vec<String> = program
        .final_states
        .iter()
        .filter(|state| **state != program.initial_state && !next_states.contains(state.as_str()))
        .cloned()
        .collect();

    if !invalid.is_empty() {
        // Sort the states to make it deterministic
        invalid.sort();
        return Err(AnalysisError::StopStatesNotFound(invalid));
    }

    Ok(())
}

/// Checks that all `next_state` references within transitions point to declared states.
///
/// # Returns
///
/// * `Ok(())` if all next states are declared.
/// * `Err(AnalysisError::UndefinedNextStates)` listing each offending `state[symbol] -> next`.
fn check_undefined_next_states(program: &Program) -> Result<(), AnalysisError> {
    let mut undefined_transitions: Vec<String> = program
        .rules
        .iter()
        .filter(|(_, _, transition)| !program.states.contains(&transition.next_state))
        .map(|(state, symbol, transition)| {
            format!("{}[{}] -> {}", state, symbol, transition.next_state)
        })
        .collect();

    if !undefined_transitions.is_empty() {
        undefined_transitions.sort();
        return Err(AnalysisError::UndefinedNextStates(undefined_transitions));
    }

    Ok(())
}

/// Checks that the blank symbol is not an input symbol.
fn check_blank_input(program: &Program) -> Result<(), AnalysisError> {
    if program.is_input_symbol(program.blank) {
        return Err(AnalysisError::BlankInInput(program.blank));
    }

    Ok(())
}

/// Checks that every symbol read or written by a rule, and every input symbol, belongs to
/// the tape alphabet.
///
/// # Returns
///
/// * `Ok(())` if the alphabet covers every symbol.
/// * `Err(AnalysisError::UndeclaredSymbols)` with the sorted missing symbols.
fn check_alphabet(program: &Program) -> Result<(), AnalysisError> {
    let used = program
        .rules
        .iter()
        .flat_map(|(_, read, transition)| [read, transition.write])
        .chain(program.input_symbols.iter().copied());

    let missing: BTreeSet<Symbol> = used
        .filter(|symbol| !program.alphabet.contains(symbol))
        .collect();

    if !missing.is_empty() {
        return Err(AnalysisError::UndeclaredSymbols(
            missing.into_iter().collect(),
        ));
    }

    Ok(())
}

/// Checks for unreachable states by performing a depth-first traversal starting from the
/// initial state.
///
/// Any state with rules that cannot be reached from the initial state through any sequence
/// of transitions is considered unreachable.
///
/// # Returns
///
/// * `Ok(())` if all states with rules are reachable.
/// * `Err(AnalysisError::UnreachableStates)` if unreachable states are found.
fn check_unreachable_states(program: &Program) -> Result<(), AnalysisError> {
    let mut visited = HashSet::new();
    let mut queue = vec![program.initial_state.as_str()];

    while let Some(state) = queue.pop() {
        if !visited.insert(state) {
            continue;
        }

        if let Some(transitions) = program.rules.rules_for(state) {
            for transition in transitions.values() {
                if !visited.contains(transition.next_state.as_str()) {
                    queue.push(transition.next_state.as_str());
                }
            }
        }
    }

    let mut unreachable: Vec<String> = program
        .rules
        .states()
        .filter(|state| !visited.contains(state))
        .map(String::from)
        .collect();

    if !unreachable.is_empty() {
        unreachable.sort(); // Sort for deterministic output
        return Err(AnalysisError::UnreachableStates(unreachable));
    }

    Ok(())
}

/// Checks that the default tape only holds input symbols, so that it is a valid input
/// for `reset_with_tape`.
///
/// # Returns
///
/// * `Ok(())` if every tape symbol is an input symbol.
/// * `Err(AnalysisError::InvalidTapeSymbols)` with the sorted offending symbols.
fn check_tape_symbols(program: &Program) -> Result<(), AnalysisError> {
    let invalid: BTreeSet<Symbol> = program
        .tape
        .chars()
        .filter(|symbol| !program.is_input_symbol(*symbol))
        .collect();

    if !invalid.is_empty() {
        return Err(AnalysisError::InvalidTapeSymbols(
            invalid.into_iter().collect(),
        ));
    }

    Ok(())
}
