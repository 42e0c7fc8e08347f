//! Built-in sample programs, compiled once on first use.

use crate::compiler::compile;
use crate::types::{Program, TuringError};
use std::collections::BTreeSet;
use tracing::warn;

// Default embedded programs
const PROGRAM_TEXTS: [(&str, &str); 4] = [
    ("successor", include_str!("../programs/successor.tm")),
    ("addition", include_str!("../programs/addition.tm")),
    ("erase", include_str!("../programs/erase.tm")),
    ("trace", include_str!("../programs/trace.tm")),
];

/// A named sample with its source and compiled table.
#[derive(Debug, Clone)]
pub struct Sample {
    pub name: &'static str,
    pub source: &'static str,
    pub program: Program,
}

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<Sample> = PROGRAM_TEXTS
        .iter()
        .filter_map(|&(name, source)| match compile(source) {
            Ok(program) => Some(Sample { name, source, program }),
            Err(e) => {
                warn!(name, error = %e, "failed to compile sample program");
                None
            }
        })
        .collect();
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<&'static Sample, TuringError> {
        PROGRAMS.get(index).ok_or_else(|| {
            TuringError::InvalidArgument(format!("Program index {} out of range", index))
        })
    }

    /// Get a program by its name
    pub fn get_program_by_name(name: &str) -> Result<&'static Sample, TuringError> {
        PROGRAMS
            .iter()
            .find(|sample| sample.name == name)
            .ok_or_else(|| TuringError::InvalidArgument(format!("Program '{}' not found", name)))
    }

    /// List all program names
    pub fn list_program_names() -> Vec<&'static str> {
        PROGRAMS.iter().map(|sample| sample.name).collect()
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, TuringError> {
        let sample = Self::get_program_by_index(index)?;

        let states: BTreeSet<_> = sample
            .program
            .iter()
            .flat_map(|q| [q.from, q.to])
            .collect();

        Ok(ProgramInfo {
            index,
            name: sample.name.to_string(),
            description: describe(sample.source),
            state_count: states.len(),
            quadruplet_count: sample.program.len(),
        })
    }
}

/// The text of the first comment line, without the leading `%`.
fn describe(source: &str) -> String {
    source
        .lines()
        .find_map(|line| line.trim().strip_prefix('%'))
        .map(|line| line.trim().to_string())
        .unwrap_or_default()
}

/// Summary of a built-in program.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub description: String,
    pub state_count: usize,
    pub quadruplet_count: usize,
}
