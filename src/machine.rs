//! This module defines the `TuringMachine` struct, which executes a compiled transition table
//! against a tape. It handles the current state, head movements, and the side effects of
//! `Pause` and `Print`.

use crate::console::Console;
use crate::tape::Tape;
use crate::types::{Action, Program, Quadruplet, Side, State, Step, Symbol, TuringError};
use std::io::{BufRead, Write};
use tracing::{debug, trace};

/// A single-tape, two-symbol Turing machine running a compiled `Program`.
///
/// The machine never owns the table: it keeps a reference to the program and a cursor
/// (the current state) into it. The tape is owned and mutated in place.
pub struct TuringMachine<'p> {
    program: &'p Program,
    tape: Tape,
    state: State,
    step_count: usize,
}

impl<'p> TuringMachine<'p> {
    /// Creates a machine ready to run `program` on `tape`, starting in `state`.
    ///
    /// # Arguments
    ///
    /// * `program` - The compiled transition table.
    /// * `tape` - The initial tape, with the head already positioned.
    /// * `state` - The state to start in, usually `program.entry`.
    pub fn new(program: &'p Program, tape: Tape, state: State) -> Self {
        Self {
            program,
            tape,
            state,
            step_count: 0,
        }
    }

    /// Executes a single step.
    ///
    /// The first quadruplet matching the current state and the symbol under the head is
    /// applied, then the machine moves to its output state.
    ///
    /// # Returns
    ///
    /// * `Ok(Step::Continue)` if a quadruplet fired.
    /// * `Ok(Step::Halt)` if no quadruplet matches. This is the only normal way to stop.
    /// * `Err(TuringError::TapeBoundary)` if the head moved onto the reserved cell at either
    ///   end of the tape.
    /// * `Err(TuringError::Io)` if the console failed during `Pause` or `Print`.
    pub fn step<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
    ) -> Result<Step, TuringError> {
        let Some(quadruplet) = self.transition().copied() else {
            debug!(state = self.state, steps = self.step_count, "machine halted");
            return Ok(Step::Halt);
        };

        trace!(
            step = self.step_count,
            head = self.tape.head(),
            %quadruplet,
            "applying transition"
        );

        match quadruplet.action {
            Action::MoveLeft => self.move_head(Side::Left)?,
            Action::MoveRight => self.move_head(Side::Right)?,
            Action::Write(symbol) => {
                let head = self.tape.head();
                self.tape.write(head, symbol);
            }
            Action::Pause => console.pause()?,
            Action::Print => console.show(&self.tape)?,
        }

        self.state = quadruplet.to;
        self.step_count += 1;

        Ok(Step::Continue)
    }

    /// Runs the machine until no quadruplet matches.
    ///
    /// There is no step limit: a program that loops forever keeps the machine running.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
    ) -> Result<(), TuringError> {
        while self.step(console)? == Step::Continue {}
        Ok(())
    }

    /// Moves the head one cell. Landing outside `[1, len - 2]` is fatal; the tape is left as
    /// it was last written.
    fn move_head(&mut self, side: Side) -> Result<(), TuringError> {
        let head = self.tape.head();
        let last = self.tape.len().saturating_sub(2);

        let moved = match side {
            Side::Left => head.checked_sub(1),
            Side::Right => Some(head + 1).filter(|&h| h < self.tape.len()),
        };

        if let Some(moved) = moved {
            self.tape.set_head(moved);
        }

        match moved {
            Some(moved) if (1..=last).contains(&moved) => Ok(()),
            _ => Err(TuringError::TapeBoundary {
                side,
                tape: self.tape.display(),
            }),
        }
    }

    /// Returns the current state of the machine.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the total number of steps executed.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Consumes the machine and returns its tape.
    pub fn into_tape(self) -> Tape {
        self.tape
    }

    /// Returns the symbol currently under the head.
    pub fn symbol(&self) -> Symbol {
        self.tape.current()
    }

    /// Finds the first quadruplet, in table order, matching the current state and symbol.
    pub fn transition(&self) -> Option<&Quadruplet> {
        self.program.lookup(self.state, self.symbol())
    }

    /// Checks if the machine is halted, i.e. no quadruplet matches its configuration.
    pub fn is_halted(&self) -> bool {
        self.transition().is_none()
    }
}
