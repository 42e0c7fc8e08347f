//! This crate compiles a small structured language into the transition table of a
//! single-tape, two-symbol Turing machine and runs that table against a bounded tape.
//! It includes modules for compiling sources, simulating their execution, inspecting the
//! generated tables, and a handful of built-in sample programs.

pub mod analyzer;
pub mod compiler;
pub mod console;
pub mod encoder;
pub mod loader;
pub mod machine;
pub mod programs;
pub mod tape;
pub mod types;

/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the compiler entry point and its state.
pub use compiler::{compile, CompilerState, Instruction};
/// Re-exports the `Console` used for `Pause` and `Print`.
pub use console::Console;
/// Re-exports the encoding functions from the encoder module.
pub use encoder::{encode, encode_json};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, Sample, PROGRAMS};
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the core types from the types module.
pub use types::{
    Action, CompileError, Origin, Program, Quadruplet, Side, State, Step, Symbol, SyntaxError,
    TuringError, HALT_STATE, INITIAL_STATE, MAX_PROGRAM_SIZE, TAPE_CAPACITY,
};
