//! This module defines the core data structures shared by the compiler and the interpreter:
//! tape symbols, actions, quadruplets, compiled programs, and the error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The number of cells on the tape.
pub const TAPE_CAPACITY: usize = 70;
/// The maximum allowed size for a source program in bytes.
pub const MAX_PROGRAM_SIZE: usize = 65536; // 64KB
/// The sentinel exit state. It is the target of an `end` outside of every loop
/// and never has outgoing transitions.
pub const HALT_STATE: State = 0;
/// The state the first instruction of a program is compiled from.
pub const INITIAL_STATE: State = 1;

/// A machine state. States are allocated from a single counter during compilation.
pub type State = usize;

/// One of the two symbols a tape cell can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Zero,
    One,
}

impl Symbol {
    /// Both symbols, in the order transitions are generated.
    pub const ALL: [Symbol; 2] = [Symbol::Zero, Symbol::One];

    pub fn as_char(self) -> char {
        match self {
            Symbol::Zero => '0',
            Symbol::One => '1',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Symbol::Zero),
            '1' => Some(Symbol::One),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// What the machine does when a quadruplet fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Move the head one cell to the left.
    MoveLeft,
    /// Move the head one cell to the right.
    MoveRight,
    /// Overwrite the cell under the head.
    Write(Symbol),
    /// Wait for the operator before continuing.
    Pause,
    /// Render the tape.
    Print,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::MoveLeft => write!(f, "L"),
            Action::MoveRight => write!(f, "R"),
            Action::Write(symbol) => write!(f, "{symbol}"),
            Action::Pause => write!(f, "P"),
            Action::Print => write!(f, "I"),
        }
    }
}

/// The source construct a quadruplet was generated from. Only used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    Left,
    Right,
    One,
    Zero,
    Pause,
    Print,
    Loop,
    If,
    End,
}

impl Origin {
    pub fn tag(self) -> &'static str {
        match self {
            Origin::Left => "LFT",
            Origin::Right => "RGT",
            Origin::One => "ONE",
            Origin::Zero => "ZER",
            Origin::Pause => "PAU",
            Origin::Print => "PRT",
            Origin::Loop => "LOP",
            Origin::If => "IF",
            Origin::End => "END",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A single transition of the machine.
///
/// When the machine is in state `from` and reads `read` under the head, it performs
/// `action` and moves to state `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quadruplet {
    pub from: State,
    pub read: Symbol,
    pub action: Action,
    pub to: State,
    pub origin: Origin,
}

impl Quadruplet {
    pub fn new(from: State, read: Symbol, action: Action, to: State, origin: Origin) -> Self {
        Self {
            from,
            read,
            action,
            to,
            origin,
        }
    }

    /// Returns `true` if this quadruplet fires for the given state and symbol.
    pub fn matches(&self, state: State, symbol: Symbol) -> bool {
        self.from == state && self.read == symbol
    }
}

impl fmt::Display for Quadruplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.from, self.read, self.action, self.to, self.origin
        )
    }
}

/// A compiled transition table.
///
/// Quadruplets are only appended by the compiler; once compilation returns the table is
/// read-only. Lookups take the first match in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// The state the first instruction was compiled from.
    pub entry: State,
    quadruplets: Vec<Quadruplet>,
}

impl Program {
    pub(crate) fn new(entry: State) -> Self {
        Self {
            entry,
            quadruplets: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, quadruplet: Quadruplet) {
        self.quadruplets.push(quadruplet);
    }

    /// Returns the first quadruplet matching `(state, symbol)`, if any.
    pub fn lookup(&self, state: State, symbol: Symbol) -> Option<&Quadruplet> {
        self.quadruplets.iter().find(|q| q.matches(state, symbol))
    }

    pub fn quadruplets(&self) -> &[Quadruplet] {
        &self.quadruplets
    }

    pub fn len(&self) -> usize {
        self.quadruplets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quadruplets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Quadruplet> {
        self.quadruplets.iter()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Quadruplet;
    type IntoIter = std::slice::Iter<'a, Quadruplet>;

    fn into_iter(self) -> Self::IntoIter {
        self.quadruplets.iter()
    }
}

/// The outcome of a single interpreter step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A quadruplet fired and the machine can keep going.
    Continue,
    /// No quadruplet matches the current state and symbol.
    Halt,
}

/// The end of the tape the head ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// The expectation that was violated when compilation stopped.
///
/// Each kind carries a stable numeric code that is printed with the diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("keyword `if` expected")]
    IfExpected,
    #[error("character `(` expected")]
    OpenParenExpected,
    #[error("character `)` expected")]
    CloseParenExpected,
    #[error("character `}}` expected")]
    CloseBraceExpected,
    #[error("character `L` expected")]
    LeftExpected,
    #[error("character `R` expected")]
    RightExpected,
    #[error("keyword `end` expected")]
    EndExpected,
    #[error("character `1` expected")]
    OneExpected,
    #[error("character `0` expected")]
    ZeroExpected,
    #[error("character `P` expected")]
    PauseExpected,
    #[error("character `I` expected")]
    PrintExpected,
    #[error("end of program expected")]
    EndOfProgramExpected,
    #[error("keyword `loop` expected")]
    LoopExpected,
    #[error("instruction expected")]
    InstructionExpected,
    #[error("character `%` expected")]
    CommentExpected,
    #[error("character `0` or `1` expected")]
    BinaryLiteralExpected,
}

impl SyntaxError {
    pub fn code(self) -> u8 {
        match self {
            SyntaxError::IfExpected => 2,
            SyntaxError::OpenParenExpected => 3,
            SyntaxError::CloseParenExpected => 4,
            SyntaxError::CloseBraceExpected => 5,
            SyntaxError::LeftExpected => 7,
            SyntaxError::RightExpected => 8,
            SyntaxError::EndExpected => 9,
            SyntaxError::OneExpected => 10,
            SyntaxError::ZeroExpected => 11,
            SyntaxError::PauseExpected => 12,
            SyntaxError::PrintExpected => 13,
            SyntaxError::EndOfProgramExpected => 14,
            SyntaxError::LoopExpected => 15,
            SyntaxError::InstructionExpected => 19,
            SyntaxError::CommentExpected => 20,
            SyntaxError::BinaryLiteralExpected => 22,
        }
    }
}

/// A syntax error together with where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "syntax error {code}: {kind} at position {offset} of the source program:\n{prefix}",
    code = .kind.code()
)]
pub struct CompileError {
    pub kind: SyntaxError,
    /// Byte offset of the cursor when the error was detected.
    pub offset: usize,
    /// The source consumed before the error.
    pub prefix: String,
}

/// Represents the errors that can stop a compile-and-run session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringError {
    /// The source program is not well formed.
    #[error(transparent)]
    Syntax(#[from] CompileError),
    /// The numbers do not fit on the tape.
    #[error("values are too large for the tape: cell {needed} requested, capacity is {capacity}")]
    TapeCapacity { capacity: usize, needed: usize },
    /// The head reached the reserved cell at one end of the tape.
    #[error("the head reached the {side} end of the tape\n{tape}")]
    TapeBoundary { side: Side, tape: String },
    /// The command line does not name a program or has too many values.
    #[error("usage error: {0}")]
    Usage(String),
    /// A command-line value could not be used.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The source file could not be read.
    #[error("file error: {0}")]
    FileError(String),
    /// Console input or output failed.
    #[error("console error: {0}")]
    Io(String),
}

impl TuringError {
    /// The process exit status reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            TuringError::Usage(_) | TuringError::FileError(_) | TuringError::Io(_) => 1,
            TuringError::Syntax(_)
            | TuringError::TapeCapacity { .. }
            | TuringError::InvalidArgument(_) => 2,
            TuringError::TapeBoundary { .. } => 3,
        }
    }
}

impl From<std::io::Error> for TuringError {
    fn from(error: std::io::Error) -> Self {
        TuringError::Io(error.to_string())
    }
}
