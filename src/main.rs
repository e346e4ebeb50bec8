use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tapeseq::io::{Reader, Writer};
use tapeseq::{Engine, EofPolicy, ExecConfig, Tape};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "tapeseq", about = "Run or render tape-machine programs")]
struct Cli {
    /// Program file. Read from stdin when neither this nor --code is given.
    source: Option<PathBuf>,

    /// Program text given inline.
    #[arg(short = 'e', long, conflicts_with = "source")]
    code: Option<String>,

    /// File the program reads its input from (stdin otherwise).
    #[arg(long)]
    input: Option<PathBuf>,

    /// Print the canonical form of the program instead of running it.
    #[arg(long)]
    render: bool,

    /// Abort after this many steps.
    #[arg(long)]
    step_limit: Option<usize>,

    /// What `,` does once input runs out.
    #[arg(long, value_enum, default_value_t = Eof::Fail)]
    eof: Eof,

    /// Print the non-zero tape cells to stderr after the run.
    #[arg(long)]
    dump_tape: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Eof {
    Fail,
    Zero,
    Unchanged,
}

impl From<Eof> for EofPolicy {
    fn from(eof: Eof) -> Self {
        match eof {
            Eof::Fail => EofPolicy::Fail,
            Eof::Zero => EofPolicy::Zero,
            Eof::Unchanged => EofPolicy::Unchanged,
        }
    }
}

fn load_source(cli: &Cli) -> std::io::Result<String> {
    if let Some(code) = &cli.code {
        return Ok(code.clone());
    }
    match &cli.source {
        Some(path) => std::fs::read_to_string(path),
        None => std::io::read_to_string(std::io::stdin().lock()),
    }
}

fn load_input(path: Option<&PathBuf>) -> std::io::Result<Box<dyn Read>> {
    match path {
        Some(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
        None => Ok(Box::new(std::io::stdin().lock())),
    }
}

fn run(cli: &Cli) -> tapeseq::Result<()> {
    let source = load_source(cli)?;
    let program = tapeseq::parse(&source)?;

    if cli.render {
        println!("{program}");
        return Ok(());
    }

    let config = ExecConfig {
        step_limit: cli.step_limit,
        on_eof: cli.eof.into(),
    };
    let engine = Engine::new(config);
    info!(
        step_limit = ?engine.config().step_limit,
        on_eof = ?engine.config().on_eof,
        "running program"
    );

    let mut tape = Tape::new();
    let mut input = Reader::new(load_input(cli.input.as_ref())?);
    let mut output = Writer::new(BufWriter::new(std::io::stdout().lock()));

    let steps = engine.run(&program, &mut tape, &mut input, &mut output)?;
    info!(steps, "program finished");

    if cli.dump_tape {
        eprintln!("cursor {}", tape.cursor());
        for (address, value) in tape.cells() {
            eprintln!("{address:>8}: {value:>3}");
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tapeseq=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        error!("{e}");
        std::process::exit(1);
    }
}
