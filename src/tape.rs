//! This module defines the `Tape`: a fixed number of binary cells and the read/write head.

use crate::types::{Symbol, TuringError, TAPE_CAPACITY};
use std::fmt;

/// The machine tape.
///
/// The tape length is fixed at construction. The head always points at a cell,
/// i.e. `head < len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<Symbol>,
    head: usize,
}

impl Tape {
    /// Builds a tape of `TAPE_CAPACITY` cells with the head in the middle.
    ///
    /// See [`Tape::with_capacity`] for the layout of the numbers.
    pub fn new(n1: Option<usize>, n2: Option<usize>) -> Result<Self, TuringError> {
        Self::with_head(n1, n2, TAPE_CAPACITY / 2)
    }

    /// Builds a tape of `TAPE_CAPACITY` cells with the head at `head`.
    pub fn with_head(
        n1: Option<usize>,
        n2: Option<usize>,
        head: usize,
    ) -> Result<Self, TuringError> {
        Self::with_capacity(TAPE_CAPACITY, n1, n2, head)
    }

    /// Builds a tape loaded with up to two numbers in unary.
    ///
    /// Starting at `head`, the number `n1` is written as `n1 + 1` ones, followed by two
    /// blank cells, followed by `n2 + 1` ones. A `None` number writes nothing, but the two
    /// blank cells are still skipped.
    ///
    /// ```text
    /// with_head(Some(2), Some(3), 5)
    /// 0000011100111100000...
    ///      X
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `TuringError::TapeCapacity` if the head or a written cell lies beyond the
    /// end of the tape.
    pub fn with_capacity(
        capacity: usize,
        n1: Option<usize>,
        n2: Option<usize>,
        head: usize,
    ) -> Result<Self, TuringError> {
        if head >= capacity {
            return Err(TuringError::TapeCapacity {
                capacity,
                needed: head,
            });
        }

        let mut cells = vec![Symbol::Zero; capacity];
        let mut k = head;

        let mut fill = |k: &mut usize, n: Option<usize>| -> Result<(), TuringError> {
            let Some(n) = n else {
                return Ok(());
            };
            let end = k.saturating_add(n).saturating_add(1);
            if end > capacity {
                return Err(TuringError::TapeCapacity {
                    capacity,
                    needed: end - 1,
                });
            }
            cells[*k..end].fill(Symbol::One);
            *k = end;
            Ok(())
        };

        fill(&mut k, n1)?;
        k += 2;
        fill(&mut k, n2)?;

        Ok(Self { cells, head })
    }

    /// Returns the symbol in cell `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn read(&self, index: usize) -> Symbol {
        self.cells[index]
    }

    /// Overwrites cell `index` with `symbol`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn write(&mut self, index: usize, symbol: Symbol) {
        self.cells[index] = symbol;
    }

    /// Returns the symbol under the head.
    pub fn current(&self) -> Symbol {
        self.cells[self.head]
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub(crate) fn set_head(&mut self, head: usize) {
        debug_assert!(head < self.cells.len());
        self.head = head;
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Symbol] {
        &self.cells
    }

    /// Renders the tape as two lines: the cells, then an `X` under the head.
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            write!(f, "{cell}")?;
        }
        write!(f, "\n{:width$}X", "", width = self.head)
    }
}
