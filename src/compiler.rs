//! This module provides the compiler that turns mini-language source into a transition table.
//!
//! The compiler is a hand-written recursive-descent parser. Code is generated while parsing:
//! every construct is compiled from the current entry state and leaves behind a fresh exit
//! state, which becomes the entry state of the next construct in sequence.
//!
//! ```text
//! Axiom       := Program Spaces (EOF | '#')
//! Program     := ε | '}' | Instruction Spaces Program
//! Instruction := 'L' | 'R' | '1' | '0' | 'P' | 'I' | Loop | If | End | Comment
//! Loop        := 'loop' Spaces Program Spaces '}'
//! If          := 'if' Spaces '(' Spaces ('0' | '1') Spaces ')' Spaces Program Spaces '}'
//! End         := 'end'
//! Comment     := '%' [^\n]* ('\n' | EOF)
//! ```

use crate::types::{
    Action, CompileError, Origin, Program, Quadruplet, State, Symbol, SyntaxError, HALT_STATE,
};
use tracing::{debug, trace};

/// The instruction selected by one character of lookahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    MoveLeft,
    MoveRight,
    WriteOne,
    WriteZero,
    Pause,
    Print,
    Loop,
    If,
    End,
    Comment,
}

impl Instruction {
    /// Maps the first character of an instruction to its tag.
    pub fn from_lookahead(c: char) -> Option<Self> {
        match c {
            'L' => Some(Instruction::MoveLeft),
            'R' => Some(Instruction::MoveRight),
            '1' => Some(Instruction::WriteOne),
            '0' => Some(Instruction::WriteZero),
            'P' => Some(Instruction::Pause),
            'I' => Some(Instruction::Print),
            'l' => Some(Instruction::Loop),
            'i' => Some(Instruction::If),
            'e' => Some(Instruction::End),
            '%' => Some(Instruction::Comment),
            _ => None,
        }
    }
}

/// Everything the compiler mutates while walking the source.
#[derive(Debug)]
pub struct CompilerState {
    source: Vec<char>,
    cursor: usize,
    /// Exit states of the enclosing loops, innermost last. The bottom entry is the sentinel
    /// `HALT_STATE`.
    exits: Vec<State>,
    next_state: State,
    /// The state the next construct is compiled from.
    entry: State,
    program: Program,
}

impl CompilerState {
    /// Prepares a compiler for `source`.
    ///
    /// The sentinel exit state is allocated first, so it is always `HALT_STATE`; the first
    /// entry state comes right after it.
    pub fn new(source: &str) -> Self {
        let mut state = Self {
            source: source.chars().collect(),
            cursor: 0,
            exits: Vec::new(),
            next_state: 0,
            entry: 0,
            program: Program::default(),
        };

        let sentinel = state.fresh_state();
        debug_assert_eq!(sentinel, HALT_STATE);
        state.exits.push(sentinel);
        state.entry = state.fresh_state();
        state.program = Program::new(state.entry);

        state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn entry(&self) -> State {
        self.entry
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Consumes the state and returns the generated table.
    pub fn into_program(self) -> Program {
        self.program
    }

    fn fresh_state(&mut self) -> State {
        let state = self.next_state;
        self.next_state += 1;
        state
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.cursor).copied()
    }

    fn expect(&mut self, expected: char, error: SyntaxError) -> Result<(), SyntaxError> {
        if self.peek() != Some(expected) {
            return Err(error);
        }
        self.cursor += 1;
        Ok(())
    }

    /// Matches `keyword` one character at a time, leaving the cursor on the first mismatch.
    fn expect_keyword(&mut self, keyword: &str, error: SyntaxError) -> Result<(), SyntaxError> {
        for expected in keyword.chars() {
            self.expect(expected, error)?;
        }
        Ok(())
    }

    fn emit(&mut self, from: State, read: Symbol, action: Action, to: State, origin: Origin) {
        self.program.push(Quadruplet::new(from, read, action, to, origin));
    }

    /// Emits an unconditional transition from `from` to `to`. The symbol that was read is
    /// written back, so the tape is left untouched.
    fn jump(&mut self, from: State, to: State, origin: Origin) {
        for symbol in Symbol::ALL {
            self.emit(from, symbol, Action::Write(symbol), to, origin);
        }
    }

    fn error(&self, kind: SyntaxError) -> CompileError {
        CompileError {
            kind,
            offset: self.cursor,
            prefix: self.source[..self.cursor].iter().collect(),
        }
    }
}

/// Compiles mini-language source into a transition table.
///
/// # Arguments
///
/// * `source` - The program text. Each character stands for one byte of the source file.
///
/// # Returns
///
/// * `Ok(Program)` with the first instruction compiled from `INITIAL_STATE`.
/// * `Err(CompileError)` describing the first syntax error and where it was found.
pub fn compile(source: &str) -> Result<Program, CompileError> {
    let mut state = CompilerState::new(source);

    match axiom(&mut state) {
        Ok(()) => {
            debug!(
                quadruplets = state.program.len(),
                states = state.next_state,
                "compiled program"
            );
            Ok(state.into_program())
        }
        Err(kind) => Err(state.error(kind)),
    }
}

/// `Axiom := Program Spaces (EOF | '#')`
pub fn axiom(state: &mut CompilerState) -> Result<(), SyntaxError> {
    program(state)?;
    spaces(state);

    match state.peek() {
        None => Ok(()),
        Some('#') => {
            state.cursor += 1;
            Ok(())
        }
        Some(_) => Err(SyntaxError::EndOfProgramExpected),
    }
}

/// `Program := ε | '}' | Instruction Spaces Program`
///
/// Stops without consuming anything at end of input, `#`, or `}`.
pub fn program(state: &mut CompilerState) -> Result<(), SyntaxError> {
    loop {
        match state.peek() {
            None | Some('#') | Some('}') => return Ok(()),
            Some(_) => {}
        }

        instruction(state)?;
        spaces(state);
    }
}

/// Dispatches on one character of lookahead.
pub fn instruction(state: &mut CompilerState) -> Result<(), SyntaxError> {
    let Some(instruction) = state.peek().and_then(Instruction::from_lookahead) else {
        return Err(SyntaxError::InstructionExpected);
    };

    match instruction {
        Instruction::MoveLeft => atomic(
            state,
            'L',
            Action::MoveLeft,
            Origin::Left,
            SyntaxError::LeftExpected,
        ),
        Instruction::MoveRight => atomic(
            state,
            'R',
            Action::MoveRight,
            Origin::Right,
            SyntaxError::RightExpected,
        ),
        Instruction::WriteOne => atomic(
            state,
            '1',
            Action::Write(Symbol::One),
            Origin::One,
            SyntaxError::OneExpected,
        ),
        Instruction::WriteZero => atomic(
            state,
            '0',
            Action::Write(Symbol::Zero),
            Origin::Zero,
            SyntaxError::ZeroExpected,
        ),
        Instruction::Pause => atomic(
            state,
            'P',
            Action::Pause,
            Origin::Pause,
            SyntaxError::PauseExpected,
        ),
        Instruction::Print => atomic(
            state,
            'I',
            Action::Print,
            Origin::Print,
            SyntaxError::PrintExpected,
        ),
        Instruction::Loop => loop_block(state),
        Instruction::If => if_block(state),
        Instruction::End => end(state),
        Instruction::Comment => comment(state),
    }
}

/// Single-character instructions. Both symbols perform `action` and reach the same exit state.
fn atomic(
    state: &mut CompilerState,
    keyword: char,
    action: Action,
    origin: Origin,
    error: SyntaxError,
) -> Result<(), SyntaxError> {
    state.expect(keyword, error)?;

    let from = state.entry;
    let to = state.fresh_state();
    for symbol in Symbol::ALL {
        state.emit(from, symbol, action, to, origin);
    }
    state.entry = to;

    trace!(from, to, %origin, "compiled instruction");
    Ok(())
}

/// `Loop := 'loop' Spaces Program Spaces '}'`
///
/// The exit state is pushed before the body is compiled so that any `end` inside targets it.
pub fn loop_block(state: &mut CompilerState) -> Result<(), SyntaxError> {
    state.expect_keyword("loop", SyntaxError::LoopExpected)?;

    let start = state.entry;
    let exit = state.fresh_state();
    state.exits.push(exit);

    spaces(state);
    program(state)?;
    spaces(state);
    state.expect('}', SyntaxError::CloseBraceExpected)?;

    let last = state.entry;
    state.jump(last, start, Origin::Loop);
    state.entry = exit;
    state.exits.pop();

    trace!(start, exit, "compiled loop");
    Ok(())
}

/// `If := 'if' Spaces '(' Spaces ('0' | '1') Spaces ')' Spaces Program Spaces '}'`
///
/// The symbol under the head selects between the body and the shared exit state. The end
/// of the body joins the exit state on both symbols.
pub fn if_block(state: &mut CompilerState) -> Result<(), SyntaxError> {
    state.expect_keyword("if", SyntaxError::IfExpected)?;

    let test = state.entry;
    let exit = state.fresh_state();
    let body = state.fresh_state();

    spaces(state);
    state.expect('(', SyntaxError::OpenParenExpected)?;
    spaces(state);
    let literal = binary_literal(state)?;
    spaces(state);
    state.expect(')', SyntaxError::CloseParenExpected)?;

    for symbol in Symbol::ALL {
        let target = if symbol == literal { body } else { exit };
        state.emit(test, symbol, Action::Write(symbol), target, Origin::If);
    }

    spaces(state);
    state.entry = body;
    program(state)?;
    spaces(state);
    state.expect('}', SyntaxError::CloseBraceExpected)?;

    let last = state.entry;
    state.jump(last, exit, Origin::If);
    state.entry = exit;

    trace!(test, body, exit, %literal, "compiled conditional");
    Ok(())
}

/// `End := 'end'`
///
/// Jumps to the exit state of the innermost loop, or to `HALT_STATE` outside of any loop.
pub fn end(state: &mut CompilerState) -> Result<(), SyntaxError> {
    state.expect_keyword("end", SyntaxError::EndExpected)?;

    let from = state.entry;
    let next = state.fresh_state();
    let target = state.exits.last().copied().unwrap_or(HALT_STATE);
    state.jump(from, target, Origin::End);
    state.entry = next;

    trace!(from, target, "compiled end");
    Ok(())
}

/// `Comment := '%' [^\n]* ('\n' | EOF)`
pub fn comment(state: &mut CompilerState) -> Result<(), SyntaxError> {
    state.expect('%', SyntaxError::CommentExpected)?;

    while let Some(c) = state.peek() {
        state.cursor += 1;
        if c == '\n' {
            break;
        }
    }

    Ok(())
}

fn binary_literal(state: &mut CompilerState) -> Result<Symbol, SyntaxError> {
    let symbol = state
        .peek()
        .and_then(Symbol::from_char)
        .ok_or(SyntaxError::BinaryLiteralExpected)?;
    state.cursor += 1;
    Ok(symbol)
}

fn spaces(state: &mut CompilerState) {
    while matches!(state.peek(), Some(' ' | '\r' | '\n')) {
        state.cursor += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::INITIAL_STATE;

    fn compile_err(source: &str) -> CompileError {
        compile(source).unwrap_err()
    }

    fn jumps(program: &Program, from: State) -> Vec<(Symbol, State)> {
        program
            .iter()
            .filter(|q| q.from == from)
            .map(|q| (q.read, q.to))
            .collect()
    }

    #[test]
    fn test_atomic_instructions_emit_two_quadruplets() {
        let cases = [
            ("L", Action::MoveLeft, Origin::Left),
            ("R", Action::MoveRight, Origin::Right),
            ("1", Action::Write(Symbol::One), Origin::One),
            ("0", Action::Write(Symbol::Zero), Origin::Zero),
            ("P", Action::Pause, Origin::Pause),
            ("I", Action::Print, Origin::Print),
        ];

        for (source, action, origin) in cases {
            let program = compile(source).unwrap();
            let quads = program.quadruplets();

            assert_eq!(quads.len(), 2, "{source}");
            assert_eq!(quads[0].read, Symbol::Zero);
            assert_eq!(quads[1].read, Symbol::One);
            assert_eq!(quads[0].from, INITIAL_STATE);
            assert_eq!(quads[1].from, INITIAL_STATE);
            assert_eq!(quads[0].to, quads[1].to);
            assert_ne!(quads[0].to, INITIAL_STATE);
            assert!(quads.iter().all(|q| q.action == action && q.origin == origin));
        }
    }

    #[test]
    fn test_sequence_threads_entry_state() {
        let program = compile("R 1 L").unwrap();
        let quads = program.quadruplets();

        assert_eq!(quads.len(), 6);
        assert_eq!(quads[0].to, quads[2].from);
        assert_eq!(quads[2].to, quads[4].from);
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let source = "% sample\nloop\n  if (0) 1 end }\n  R\n}\nI P";
        assert_eq!(compile(source).unwrap(), compile(source).unwrap());
    }

    #[test]
    fn test_empty_program() {
        let program = compile("").unwrap();
        assert!(program.is_empty());
        assert_eq!(program.entry, INITIAL_STATE);

        assert!(compile("#").unwrap().is_empty());
    }

    #[test]
    fn test_leading_spaces_are_rejected() {
        let error = compile(" R").unwrap_err();
        assert_eq!(error.kind, SyntaxError::InstructionExpected);
        assert_eq!(error.kind.code(), 19);
        assert_eq!(error.offset, 0);

        let error = compile("\n").unwrap_err();
        assert_eq!(error.offset, 0);

        // trailing spaces are fine
        assert_eq!(compile("R \n").unwrap().len(), 2);
    }

    #[test]
    fn test_loop_with_only_end_exits_immediately() {
        let program = compile("loop end }").unwrap();

        // 1 is the loop entry, 2 its exit.
        assert_eq!(
            jumps(&program, INITIAL_STATE),
            vec![(Symbol::Zero, 2), (Symbol::One, 2)]
        );
        assert!(program
            .iter()
            .filter(|q| q.from == INITIAL_STATE)
            .all(|q| q.origin == Origin::End));

        // The repeat-back transitions leave from the unreachable state after `end`.
        let back: Vec<_> = program.iter().filter(|q| q.origin == Origin::Loop).collect();
        assert_eq!(back.len(), 2);
        assert!(back.iter().all(|q| q.to == INITIAL_STATE && q.from == 3));
    }

    #[test]
    fn test_loop_jumps_back_to_its_entry() {
        let program = compile("R loop L }").unwrap();
        // R: 1 -> 2, loop entry 2, exit 3, L: 2 -> 4, back: 4 -> 2
        assert_eq!(jumps(&program, 4), vec![(Symbol::Zero, 2), (Symbol::One, 2)]);
        for q in program.iter().filter(|q| q.origin == Origin::Loop) {
            assert_eq!(q.action, Action::Write(q.read));
        }
    }

    #[test]
    fn test_end_targets_innermost_loop() {
        let program = compile("loop loop end } end }").unwrap();
        // outer: entry 1, exit 2; inner: entry 1, exit 3
        let ends: Vec<_> = program.iter().filter(|q| q.origin == Origin::End).collect();
        assert_eq!(ends.len(), 4);
        assert_eq!(ends[0].to, 3);
        assert_eq!(ends[1].to, 3);
        assert_eq!(ends[2].to, 2);
        assert_eq!(ends[3].to, 2);
    }

    #[test]
    fn test_end_inside_if_targets_enclosing_loop() {
        let program = compile("loop if (0) end } R }").unwrap();
        // loop exit is 2; if allocates 3 (exit) and 4 (body)
        let ends: Vec<_> = program.iter().filter(|q| q.origin == Origin::End).collect();
        assert!(ends.iter().all(|q| q.from == 4 && q.to == 2));
    }

    #[test]
    fn test_end_outside_loop_targets_sentinel() {
        let program = compile("R end").unwrap();
        let ends: Vec<_> = program.iter().filter(|q| q.origin == Origin::End).collect();
        assert_eq!(ends.len(), 2);
        assert!(ends.iter().all(|q| q.to == HALT_STATE));
        assert!(program.iter().all(|q| q.from != HALT_STATE));
    }

    #[test]
    fn test_if_one_branches_and_joins() {
        let program = compile("if (1) 0 }").unwrap();
        // test 1, exit 2, body 3, write zero 3 -> 4, join 4 -> 2
        assert_eq!(
            jumps(&program, INITIAL_STATE),
            vec![(Symbol::Zero, 2), (Symbol::One, 3)]
        );
        assert_eq!(jumps(&program, 4), vec![(Symbol::Zero, 2), (Symbol::One, 2)]);
    }

    #[test]
    fn test_if_zero_branches_the_other_way() {
        let program = compile("if(0)R}").unwrap();
        assert_eq!(
            jumps(&program, INITIAL_STATE),
            vec![(Symbol::Zero, 3), (Symbol::One, 2)]
        );
    }

    #[test]
    fn test_join_never_tests_the_symbol() {
        let program = compile("if ( 1 ) R L }").unwrap();
        let joins: Vec<_> = program
            .iter()
            .filter(|q| q.origin == Origin::If && q.from != INITIAL_STATE)
            .collect();
        assert_eq!(joins.len(), 2);
        assert_eq!(joins[0].to, joins[1].to);
        assert!(joins.iter().all(|q| q.action == Action::Write(q.read)));
    }

    #[test]
    fn test_comments_generate_nothing() {
        let program = compile("% move right\nR % trailing").unwrap();
        assert_eq!(program.len(), 2);
        assert_eq!(compile("% only a comment").unwrap().len(), 0);
    }

    #[test]
    fn test_text_after_end_marker_is_ignored() {
        let program = compile("R # anything goes here").unwrap();
        assert_eq!(program.len(), 2);
    }

    #[test]
    fn test_missing_close_brace() {
        let error = compile_err("loop R");
        assert_eq!(error.kind, SyntaxError::CloseBraceExpected);
        assert_eq!(error.kind.code(), 5);
        assert_eq!(error.offset, 6);
        assert_eq!(error.prefix, "loop R");

        let error = compile_err("loop R #");
        assert_eq!(error.kind, SyntaxError::CloseBraceExpected);
        assert_eq!(error.offset, 7);
    }

    #[test]
    fn test_stray_close_brace() {
        let error = compile_err("R }");
        assert_eq!(error.kind, SyntaxError::EndOfProgramExpected);
        assert_eq!(error.offset, 2);
    }

    #[test]
    fn test_unknown_instruction() {
        let error = compile_err("R x");
        assert_eq!(error.kind, SyntaxError::InstructionExpected);
        assert_eq!(error.kind.code(), 19);
        assert_eq!(error.offset, 2);
        assert_eq!(error.prefix, "R ");
    }

    #[test]
    fn test_misspelled_keywords() {
        let error = compile_err("lop }");
        assert_eq!(error.kind, SyntaxError::LoopExpected);
        assert_eq!(error.offset, 2);

        let error = compile_err("ed");
        assert_eq!(error.kind, SyntaxError::EndExpected);
        assert_eq!(error.offset, 1);

        let error = compile_err("in (1) }");
        assert_eq!(error.kind, SyntaxError::IfExpected);
    }

    #[test]
    fn test_conditional_errors() {
        assert_eq!(compile_err("if 1) }").kind, SyntaxError::OpenParenExpected);
        assert_eq!(compile_err("if (2) }").kind, SyntaxError::BinaryLiteralExpected);
        assert_eq!(compile_err("if (1 R }").kind, SyntaxError::CloseParenExpected);
        assert_eq!(compile_err("if (1) R").kind, SyntaxError::CloseBraceExpected);
    }

    #[test]
    fn test_rules_in_isolation() {
        let mut state = CompilerState::new("loop R }");
        loop_block(&mut state).unwrap();
        assert_eq!(state.cursor(), 8);
        assert_eq!(state.entry(), 2);
        assert_eq!(state.program().len(), 4);

        let mut state = CompilerState::new("% note\nR");
        comment(&mut state).unwrap();
        assert_eq!(state.cursor(), 7);
        assert!(state.program().is_empty());

        let mut state = CompilerState::new("end");
        end(&mut state).unwrap();
        assert_eq!(state.program().quadruplets()[0].to, HALT_STATE);

        let mut state = CompilerState::new("x");
        assert_eq!(
            instruction(&mut state),
            Err(SyntaxError::InstructionExpected)
        );
    }

    #[test]
    fn test_instruction_lookahead() {
        assert_eq!(Instruction::from_lookahead('l'), Some(Instruction::Loop));
        assert_eq!(Instruction::from_lookahead('L'), Some(Instruction::MoveLeft));
        assert_eq!(Instruction::from_lookahead('%'), Some(Instruction::Comment));
        assert_eq!(Instruction::from_lookahead('}'), None);
    }
}
