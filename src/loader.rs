//! This module provides the `ProgramLoader` struct, responsible for reading mini-language
//! sources from files and compiling them.

use crate::compiler::compile;
use crate::types::{Program, TuringError, MAX_PROGRAM_SIZE};
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of mini-language sources.
pub const SOURCE_EXTENSION: &str = "tm";

/// `ProgramLoader` is a utility struct for loading mini-language programs.
/// It provides methods to read a single source, compile it, and to compile every `.tm`
/// file within a directory.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Reads a source file as raw bytes.
    ///
    /// Every byte becomes exactly one character, so character offsets reported by the
    /// compiler are byte offsets into the file.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` with the decoded source.
    /// * `Err(TuringError::FileError)` if the file cannot be read or exceeds
    ///   `MAX_PROGRAM_SIZE`.
    pub fn load_source(path: &Path) -> Result<String, TuringError> {
        let bytes = fs::read(path).map_err(|e| {
            TuringError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        if bytes.len() > MAX_PROGRAM_SIZE {
            return Err(TuringError::FileError(format!(
                "File {} is {} bytes, the limit is {}",
                path.display(),
                bytes.len(),
                MAX_PROGRAM_SIZE
            )));
        }

        Ok(Self::decode(&bytes))
    }

    /// Maps bytes one-to-one onto characters.
    pub fn decode(bytes: &[u8]) -> String {
        bytes.iter().map(|&b| char::from(b)).collect()
    }

    /// Reads and compiles a single source file.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the file is read and compiled.
    /// * `Err(TuringError::FileError)` if the file cannot be read.
    /// * `Err(TuringError::Syntax)` if the source does not compile.
    pub fn load_program(path: &Path) -> Result<Program, TuringError> {
        let source = Self::load_source(path)?;
        Ok(compile(&source)?)
    }

    /// Compiles all `.tm` files in a directory.
    ///
    /// Directories and files with other extensions are skipped. Each entry of the result is
    /// either the path and its compiled program, or the error that stopped it.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Program), TuringError>> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(TuringError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                if path.is_dir() || path.extension().is_none_or(|ext| ext != SOURCE_EXTENSION) {
                    return None;
                }

                Some(Self::load_program(&path).map(|program| (path, program)))
            })
            .collect()
    }
}
