//! This crate provides the core logic for a single-tape deterministic Turing Machine simulator.
//! It includes the unbounded tape, the machine that applies transitions, the operator that
//! runs a machine under a step ceiling, and a parser, analyzer, and loader for `.tur` programs.

pub mod analyzer;
pub mod loader;
pub mod machine;
pub mod operator;
pub mod parser;
pub mod programs;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports the `Operator` and the `Steppable` capability it drives.
pub use operator::{Operator, Steppable};
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports the built-in program registry from the programs module.
pub use programs::{BuiltinProgram, ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the types describing machines, their runs, and their errors.
pub use types::{
    Configuration, Direction, Program, Report, Symbol, Transition, TransitionTable,
    TuringMachineError, MAX_EXECUTION_STEPS, MAX_PROGRAM_SIZE,
};
