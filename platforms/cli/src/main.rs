use atty::Stream;
use clap::Parser;
use std::path::Path;
use std::process;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use turc::{
    analyze, encode, encode_json, AnalysisError, Console, Program, ProgramLoader,
    ProgramManager, Tape, TuringError, TuringMachine,
};

/// Compiles a mini-language program into a Turing machine and runs it.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  turc-cli programs/addition.tm 2 3
  turc-cli --sample successor 4
  turc-cli --dump programs/erase.tm 1")]
struct Cli {
    /// The source file followed by up to two numbers to load on the tape.
    /// With --sample, only the numbers. -1 leaves a number out.
    #[clap(value_name = "SOURCE [N1 [N2]]", allow_negative_numbers = true)]
    args: Vec<String>,

    /// Run a built-in sample program instead of a source file.
    #[clap(short, long)]
    sample: Option<String>,

    /// List the built-in sample programs.
    #[clap(short, long)]
    list: bool,

    /// Initial head position (defaults to the middle of the tape).
    #[clap(long)]
    head: Option<usize>,

    /// Print the transition table before running.
    #[clap(short, long)]
    dump: bool,

    /// Print the transition table as JSON and exit without running.
    #[clap(long)]
    json: bool,

    /// Do not print a prompt when the program pauses.
    #[clap(short, long)]
    quiet: bool,
}

fn main() {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(invocation_exit_code(&e));
        }
    };

    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        process::exit(e.exit_code());
    }
}

/// `--help` and `--version` succeed; any other argument error is an invalid invocation.
fn invocation_exit_code(error: &clap::Error) -> i32 {
    if error.use_stderr() {
        1
    } else {
        0
    }
}

/// Logs go to stderr. `RUST_LOG` overrides the default `warn` filter.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), TuringError> {
    if cli.list {
        for index in 0..ProgramManager::get_program_count() {
            let info = ProgramManager::get_program_info(index)?;
            println!("{:<12} {}", info.name, info.description);
        }
        return Ok(());
    }

    let (program, numbers) = load(&cli)?;
    let (n1, n2) = parse_numbers(numbers)?;

    report_analysis(&program);

    if cli.json {
        println!("{}", encode_json(&program)?);
        return Ok(());
    }

    if cli.dump {
        println!("{}", encode(&program));
    }

    let tape = match cli.head {
        Some(head) => Tape::with_head(n1, n2, head)?,
        None => Tape::new(n1, n2)?,
    };

    let mut console = Console::stdio().with_prompt(!cli.quiet && atty::is(Stream::Stdin));
    let mut machine = TuringMachine::new(&program, tape, program.entry);
    machine.run(&mut console)?;

    info!(
        steps = machine.step_count(),
        state = machine.state(),
        "program finished"
    );
    println!("{}", machine.tape());

    Ok(())
}

/// Resolves the program to run and returns it with the remaining numeric arguments.
fn load(cli: &Cli) -> Result<(Program, &[String]), TuringError> {
    if let Some(name) = &cli.sample {
        let sample = ProgramManager::get_program_by_name(name)?;
        return Ok((sample.program.clone(), cli.args.as_slice()));
    }

    let Some((source, numbers)) = cli.args.split_first() else {
        return Err(TuringError::Usage(
            "a source file or --sample is required".to_string(),
        ));
    };

    let program = ProgramLoader::load_program(Path::new(source))?;
    debug!(source = %source, quadruplets = program.len(), "loaded program");

    Ok((program, numbers))
}

/// Reads up to two tape numbers. `-1` (or a missing value) means the number is left out.
fn parse_numbers(args: &[String]) -> Result<(Option<usize>, Option<usize>), TuringError> {
    if args.len() > 2 {
        return Err(TuringError::Usage(format!(
            "at most two numbers can be loaded on the tape, got {}",
            args.len()
        )));
    }

    let mut numbers = args.iter().map(|arg| parse_number(arg));
    let n1 = numbers.next().transpose()?.flatten();
    let n2 = numbers.next().transpose()?.flatten();

    Ok((n1, n2))
}

fn parse_number(arg: &str) -> Result<Option<usize>, TuringError> {
    match arg.trim().parse::<i64>() {
        Ok(-1) => Ok(None),
        Ok(n) if n >= 0 => usize::try_from(n)
            .map(Some)
            .map_err(|_| TuringError::InvalidArgument(format!("number too large: {arg}"))),
        _ => Err(TuringError::InvalidArgument(format!(
            "expected a non-negative integer, got '{arg}'"
        ))),
    }
}

/// Unreachable states are expected after `end`; everything else is worth a warning.
fn report_analysis(program: &Program) {
    for finding in analyze(program) {
        match finding {
            AnalysisError::UnreachableStates(_) => debug!("{}", finding),
            _ => warn!("{}", finding),
        }
    }
}
