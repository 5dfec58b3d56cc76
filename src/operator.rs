//! This module provides the `Operator`, which drives anything that can be stepped until it
//! halts or until a step ceiling is exceeded.
//!
//! The ceiling is a heuristic: exceeding it means the machine probably never halts, not that
//! it provably doesn't.

use tracing::{debug, warn};

use crate::types::{TuringMachineError, MAX_EXECUTION_STEPS};

/// A single-step capability.
pub trait Steppable {
    /// Performs one step and returns `true` while execution should continue.
    fn step(&mut self) -> bool;
}

/// Runs a [`Steppable`] under a step ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operator {
    max_steps: usize,
}

impl Default for Operator {
    fn default() -> Self {
        Self::new(MAX_EXECUTION_STEPS)
    }
}

impl Operator {
    /// Creates an operator that allows at most `max_steps` continuing steps.
    pub fn new(max_steps: usize) -> Self {
        Self { max_steps }
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Steps `machine` until it reports a halt.
    ///
    /// # Returns
    ///
    /// * `Ok(steps)` with the number of steps that reported continuation.
    /// * `Err(TuringMachineError::NonHalting)` once that number exceeds the ceiling. The
    ///   machine is not stepped any further.
    pub fn run<S>(&self, machine: &mut S) -> Result<usize, TuringMachineError>
    where
        S: Steppable + ?Sized,
    {
        self.run_inspect(machine, |_| {})
    }

    /// Same as [`Operator::run`], calling `inspect` after every continuing step that stays
    /// within the ceiling.
    pub fn run_inspect<S, F>(
        &self,
        machine: &mut S,
        mut inspect: F,
    ) -> Result<usize, TuringMachineError>
    where
        S: Steppable + ?Sized,
        F: FnMut(&S),
    {
        let mut steps = 0;

        while machine.step() {
            steps += 1;
            if steps > self.max_steps {
                warn!(max_steps = self.max_steps, "step ceiling exceeded");
                return Err(TuringMachineError::NonHalting {
                    max_steps: self.max_steps,
                });
            }
            inspect(&*machine);
        }

        debug!(steps, "machine halted");

        Ok(steps)
    }
}

/// Runs `machine` with a ceiling of `max_steps`.
pub fn run<S>(machine: &mut S, max_steps: usize) -> Result<usize, TuringMachineError>
where
    S: Steppable + ?Sized,
{
    Operator::new(max_steps).run(machine)
}
