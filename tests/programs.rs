use std::io::Cursor;
use turc::{
    compile, Console, ProgramManager, Symbol, Tape, TuringError, TuringMachine, TAPE_CAPACITY,
};

fn console() -> Console<Cursor<&'static str>, Vec<u8>> {
    Console::new(Cursor::new(""), Vec::new()).with_prompt(false)
}

fn run_sample(name: &str, n1: Option<usize>, n2: Option<usize>) -> (Tape, String) {
    let sample = ProgramManager::get_program_by_name(name).unwrap();
    let tape = Tape::new(n1, n2).unwrap();
    let mut machine = TuringMachine::new(&sample.program, tape, sample.program.entry);
    let mut console = console();

    machine.run(&mut console).unwrap();
    let output = String::from_utf8(console.into_output()).unwrap();
    (machine.into_tape(), output)
}

fn ones(tape: &Tape) -> Vec<usize> {
    tape.cells()
        .iter()
        .enumerate()
        .filter(|(_, &s)| s == Symbol::One)
        .map(|(i, _)| i)
        .collect()
}

#[test]
fn successor_appends_a_stroke() {
    let (tape, _) = run_sample("successor", Some(2), None);
    assert_eq!(ones(&tape), vec![35, 36, 37, 38]);
    assert_eq!(tape.head(), 38);
}

#[test]
fn addition_joins_two_numbers() {
    let (tape, _) = run_sample("addition", Some(2), Some(3));
    // 2 + 3 = 5, written as 6 strokes
    assert_eq!(ones(&tape), (35..41).collect::<Vec<_>>());
    assert_eq!(tape.head(), 41);
}

#[test]
fn addition_of_zeros() {
    let (tape, _) = run_sample("addition", Some(0), Some(0));
    assert_eq!(ones(&tape), vec![35]);
}

#[test]
fn erase_clears_the_first_number() {
    let (tape, _) = run_sample("erase", Some(3), None);
    assert!(ones(&tape).is_empty());
    assert_eq!(tape.head(), 39);
}

#[test]
fn trace_prints_every_step() {
    let (_, output) = run_sample("trace", Some(1), None);
    let lines: Vec<_> = output.lines().collect();

    assert_eq!(lines.len(), 6);
    assert!(lines.iter().step_by(2).all(|l| l.len() == TAPE_CAPACITY));
    assert_eq!(lines[1].len(), 36);
    assert_eq!(lines[5].len(), 38);
}

#[test]
fn runaway_program_hits_the_right_boundary() {
    let program = compile("loop R }").unwrap();
    let tape = Tape::new(Some(1), None).unwrap();
    let mut machine = TuringMachine::new(&program, tape, program.entry);

    let error = machine.run(&mut console()).unwrap_err();
    assert_eq!(error.exit_code(), 3);
    assert!(matches!(error, TuringError::TapeBoundary { .. }));

    // strokes are left as they were
    assert_eq!(ones(machine.tape()), vec![35, 36]);
    assert_eq!(machine.tape().head(), TAPE_CAPACITY - 1);
}

#[test]
fn runaway_program_hits_the_left_boundary() {
    let program = compile("loop 1 L }").unwrap();
    let tape = Tape::new(None, None).unwrap();
    let mut machine = TuringMachine::new(&program, tape, program.entry);

    let error = machine.run(&mut console()).unwrap_err();
    assert!(error.to_string().contains("left end"));
    assert_eq!(ones(machine.tape()), (1..=35).collect::<Vec<_>>());
}

#[test]
fn syntax_error_reports_code_and_prefix() {
    let error: TuringError = compile("R loop L").unwrap_err().into();
    assert_eq!(error.exit_code(), 2);

    let message = error.to_string();
    assert!(message.contains("syntax error 5"));
    assert!(message.contains("position 8"));
    assert!(message.ends_with("R loop L"));
}
