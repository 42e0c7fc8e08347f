//! This module renders compiled programs as text, either as a human-readable transition
//! table or as JSON.

use crate::types::{Program, TuringError};

/// Encodes a program as a transition table, one quadruplet per line.
///
/// Format: `from read action to origin`, e.g. `1 0 R 2 RGT`.
/// - read: `0` or `1`.
/// - action: `L`, `R`, `0`, `1`, `P` or `I`.
/// - origin: the construct tag (`LFT`, `RGT`, `ONE`, `ZER`, `PAU`, `PRT`, `LOP`, `IF`, `END`).
pub fn encode(program: &Program) -> String {
    program
        .iter()
        .map(|q| q.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Encodes a program as pretty-printed JSON.
pub fn encode_json(program: &Program) -> Result<String, TuringError> {
    serde_json::to_string_pretty(program)
        .map_err(|e| TuringError::Io(format!("Failed to encode program: {e}")))
}
