//! This module defines the `TuringMachine` struct, which simulates a single-tape deterministic
//! Turing Machine. It pairs an immutable `Program` with the mutable run state: the current
//! state, the tape, and the number of applied steps.

use tracing::{debug, trace};

use crate::operator::Steppable;
use crate::tape::Tape;
use crate::types::{Configuration, Program, Report, Symbol, Transition, TuringMachineError};

/// Represents a single-tape Turing Machine.
///
/// The definition is fixed at construction time; [`TuringMachine::reset_with_tape`] only
/// replaces the run state, so one definition can be run against many inputs.
#[derive(Debug, Clone)]
pub struct TuringMachine {
    program: Program,
    state: String,
    tape: Tape,
    step_count: usize,
}

impl TuringMachine {
    /// Creates a new `TuringMachine` from a given `Program`, loaded with the program's
    /// default tape.
    pub fn new(program: Program) -> Self {
        Self {
            state: program.initial_state.clone(),
            tape: Tape::new(program.blank, &program.tape),
            program,
            step_count: 0,
        }
    }

    /// Restarts the machine on a fresh tape holding `input`.
    ///
    /// Every character of `input` must be one of the program's input symbols. On error the
    /// run state is left untouched.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the machine was reset.
    /// * `Err(TuringMachineError::InvalidInput)` for the first out-of-alphabet symbol.
    pub fn reset_with_tape(&mut self, input: &str) -> Result<(), TuringMachineError> {
        if let Some((position, symbol)) = input
            .chars()
            .enumerate()
            .find(|(_, symbol)| !self.program.is_input_symbol(*symbol))
        {
            return Err(TuringMachineError::InvalidInput { symbol, position });
        }

        self.state = self.program.initial_state.clone();
        self.tape = Tape::new(self.program.blank, input);
        self.step_count = 0;

        debug!(program = %self.program.name, input, "machine reset");

        Ok(())
    }

    /// Restarts the machine on the program's default tape.
    pub fn reset(&mut self) {
        self.state = self.program.initial_state.clone();
        self.tape = Tape::new(self.program.blank, &self.program.tape);
        self.step_count = 0;
    }

    /// Executes a single step of the computation.
    ///
    /// Returns `false` without touching the tape or the state when no rule matches the
    /// current state and symbol. Otherwise the rule is applied in full (write, move, change
    /// state), and `false` is returned if the new state is accepting.
    pub fn step(&mut self) -> bool {
        let Some(transition) = self
            .program
            .rules
            .get(&self.state, self.tape.read_head())
        else {
            trace!(state = %self.state, symbol = %self.tape.read_head(), "no transition");
            return false;
        };

        trace!(
            state = %self.state,
            read = %self.tape.read_head(),
            write = %transition.write,
            direction = ?transition.direction,
            next = %transition.next_state,
            "step"
        );

        self.tape.write_head(transition.write);
        self.tape.move_head(transition.direction);
        self.state.clone_from(&transition.next_state);
        self.step_count += 1;

        !self.program.is_final(&self.state)
    }

    /// Returns `true` if the machine is currently in an accepting state.
    pub fn accepted(&self) -> bool {
        self.program.is_final(&self.state)
    }

    /// Returns the tape content without leading or trailing blanks.
    pub fn tape_content(&self) -> String {
        self.tape.content()
    }

    /// Returns a snapshot of the current state and the full visited tape, for tracing.
    pub fn configuration(&self) -> Configuration {
        let (left, head, right) = self.tape.split();

        Configuration {
            state: self.state.clone(),
            left,
            head,
            right,
        }
    }

    /// Summarises the current outcome.
    pub fn report(&self) -> Report {
        Report {
            state: self.state.clone(),
            accepted: self.accepted(),
            tape: self.tape_content(),
            steps: self.step_count,
        }
    }

    /// Returns the rule the next step would apply, if any.
    pub fn transition(&self) -> Option<&Transition> {
        self.program.rules.get(&self.state, self.tape.read_head())
    }

    /// Returns the current state of the Turing Machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the symbol under the head.
    pub fn symbol(&self) -> Symbol {
        self.tape.read_head()
    }

    /// Returns the number of transitions applied since the last reset.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns the blank symbol used by this Turing Machine.
    pub fn blank(&self) -> Symbol {
        self.program.blank
    }
}

impl Steppable for TuringMachine {
    fn step(&mut self) -> bool {
        TuringMachine::step(self)
    }
}
