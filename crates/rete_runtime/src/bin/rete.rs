//! Rete CLI entry point.

use std::env;
use std::process::ExitCode;

use rete_runtime::{ForwardChainer, Repl, Session};
use tracing_subscriber::EnvFilter;

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    files: Vec<String>,
    batch_mode: bool,
    show_help: bool,
    show_version: bool,
    verbose: bool,
    dump_facts: bool,
    max_derivations: Option<usize>,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-b" | "--batch" => config.batch_mode = true,
            "-v" | "--verbose" => config.verbose = true,
            "--dump-facts" => config.dump_facts = true,
            "--max-derivations" => {
                i += 1;
                if i >= args.len() {
                    return Err("--max-derivations requires a value".into());
                }
                config.max_derivations = Some(
                    args[i]
                        .parse()
                        .map_err(|_| format!("invalid --max-derivations value: {}", args[i]))?,
                );
            }
            arg if arg.starts_with('-') => {
                return Err(format!("unknown option: {arg}").into());
            }
            path => config.files.push(path.to_string()),
        }
        i += 1;
    }

    Ok(config)
}

/// Logs go to stderr. `RUST_LOG` wins unless `--verbose` is given.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("rete {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_logging(config.verbose);

    let mut chainer = ForwardChainer::new();
    if let Some(limit) = config.max_derivations {
        chainer = chainer.with_max_derivations(limit);
    }
    let mut session = Session::with_chainer(chainer);

    for file in &config.files {
        let summary = session.load_file(file)?;
        if config.batch_mode {
            println!("{file}: {summary}");
        }
    }

    if config.dump_facts {
        dump_facts(&session);
    }

    if config.batch_mode {
        return Ok(());
    }

    let mut repl = Repl::new()?.with_session(session);
    if !config.files.is_empty() {
        repl = repl.without_banner();
    }

    repl.run()?;
    Ok(())
}

fn dump_facts(session: &Session) {
    println!("\x1b[1;36m=== Working Memory ===\x1b[0m");
    for fact in session.facts() {
        println!("  {fact}");
    }
    println!("{}", session.stats());
    println!();
}

fn print_help() {
    println!(
        "\x1b[1mrete\x1b[0m - Incremental forward-chaining over fact triples

\x1b[1mUSAGE:\x1b[0m
    rete [OPTIONS] [FILES...]

\x1b[1mARGUMENTS:\x1b[0m
    [FILES...]    Rule and fact files to load before starting the REPL

\x1b[1mOPTIONS:\x1b[0m
    -h, --help               Print help information
    -V, --version            Print version information
    -b, --batch              Load files and exit (no REPL)
    -v, --verbose            Log network activity at debug level
    --max-derivations N      Fail a run that derives more than N facts
    --dump-facts             Print working memory after loading files

\x1b[1mEXAMPLES:\x1b[0m
    rete                             Start interactive REPL
    rete family.rete                 Load family.rete, then start REPL
    rete -b --dump-facts blocks.rete Load, print every fact, and exit
    RUST_LOG=trace rete -b x.rete    Trace every activation

\x1b[1mREPL COMMANDS:\x1b[0m
    :help                Show syntax and commands
    :facts               List working memory
    :rules               List rules with their numbers
    :matches N           List matches of rule N
    :stats               Show network counters
    :load PATH           Evaluate a file
    :quit                Exit (or Ctrl+D)"
    );
}
