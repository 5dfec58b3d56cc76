use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tmachine::{
    Operator, Program, ProgramLoader, ProgramManager, TuringMachine, TuringMachineError,
    MAX_EXECUTION_STEPS,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  tmachine-cli --builtin 'Binary increment' --input 101 --input 111
  tmachine-cli --program programs/word-wrap.tur --input XY --debug")]
struct Cli {
    /// The Turing machine program file to execute
    #[clap(short, long, conflicts_with = "builtin")]
    program: Option<PathBuf>,

    /// The name of a built-in program to execute
    #[clap(short, long)]
    builtin: Option<String>,

    /// An input word; repeat to run several inputs against the same machine.
    /// Defaults to the program's own tape.
    #[clap(short, long)]
    input: Vec<String>,

    /// Give up after this many steps
    #[clap(short, long, default_value_t = MAX_EXECUTION_STEPS)]
    max_steps: usize,

    /// Print each configuration of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Print one JSON report per input
    #[clap(long)]
    json: bool,

    /// List the built-in programs and exit
    #[clap(short, long)]
    list: bool,
}

/// How a single input ended.
enum Outcome {
    Accepted,
    Rejected,
    NonHalting,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if cli.list {
        for name in ProgramManager::list_program_names() {
            println!("{name}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let program = load_program(&cli)?;
    info!(name = %program.name, max_steps = cli.max_steps, "running program");

    let inputs = if cli.input.is_empty() {
        vec![program.tape.clone()]
    } else {
        cli.input.clone()
    };

    let operator = Operator::new(cli.max_steps);
    let mut machine = TuringMachine::new(program);
    let mut worst = Outcome::Accepted;

    for input in &inputs {
        machine
            .reset_with_tape(input)
            .with_context(|| format!("cannot run input {input:?}"))?;

        let outcome = run_input(&cli, &operator, &mut machine)?;
        worst = match (worst, outcome) {
            (Outcome::NonHalting, _) | (_, Outcome::NonHalting) => Outcome::NonHalting,
            (Outcome::Rejected, _) | (_, Outcome::Rejected) => Outcome::Rejected,
            _ => Outcome::Accepted,
        };
    }

    Ok(match worst {
        Outcome::Accepted => ExitCode::SUCCESS,
        Outcome::Rejected => ExitCode::from(1),
        Outcome::NonHalting => ExitCode::from(2),
    })
}

fn load_program(cli: &Cli) -> anyhow::Result<Program> {
    match (&cli.program, &cli.builtin) {
        (Some(path), _) => ProgramLoader::load_program(path)
            .with_context(|| format!("cannot load {}", path.display())),
        (None, Some(name)) => Ok(ProgramManager::get_program_by_name(name)?),
        (None, None) => bail!("either --program or --builtin is required"),
    }
}

fn run_input(
    cli: &Cli,
    operator: &Operator,
    machine: &mut TuringMachine,
) -> anyhow::Result<Outcome> {
    if cli.debug {
        println!("initial: {}", machine.configuration());
    }

    let result = operator.run_inspect(&mut *machine, |machine| {
        if cli.debug {
            println!("step:    {}", machine.configuration());
        }
    });

    if cli.debug {
        println!("halted:  {}", machine.configuration());
    }

    let outcome = match result {
        Ok(_) if machine.accepted() => Outcome::Accepted,
        Ok(_) => Outcome::Rejected,
        Err(TuringMachineError::NonHalting { max_steps }) => {
            eprintln!("Machine did not halt within {max_steps} steps");
            Outcome::NonHalting
        }
        Err(e) => return Err(e.into()),
    };

    if cli.json {
        println!("{}", serde_json::to_string(&machine.report())?);
    } else if !matches!(outcome, Outcome::NonHalting) {
        let verdict = if machine.accepted() { "accepted" } else { "rejected" };
        println!("{verdict}: {}", machine.tape_content());
    }

    Ok(outcome)
}
