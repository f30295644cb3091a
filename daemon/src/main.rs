//! `mqpow`: command-line front end for the MQ proof-of-work tooling.

mod config;

use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use mqpow_protocol::{write_equations, SolverJob, SolverOutput};
use mqpow_types::{pow_params, set_pow, Nbit, PowParams, CANDIDATE_BYTES};
use mqpow_utils::{format_spacing, init_logging, LogFormat};
use mqpow_work::{
    calculate_nbit, check_pow, difficulty_score, CpuSolver, EquationLayout, EquationSystem,
    FixAssignment,
};

use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "mqpow", about = "MQ proof-of-work verifier, retargeter and solver driver")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, global = true, env = "MQPOW_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "MQPOW_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "MQPOW_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Added to the nbit exponent to give the number of equations.
    #[arg(long, global = true, env = "MQPOW_EQUATIONS_OFFSET")]
    equations_offset: Option<u32>,

    /// Blocks per retarget window.
    #[arg(long, global = true, env = "MQPOW_NBIT_SAMPLE_RATE")]
    nbit_sample_rate: Option<u64>,

    /// Target block spacing in seconds.
    #[arg(long, global = true, env = "MQPOW_REFERENCE_SECONDS")]
    reference_seconds: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Check a candidate solution.
    Verify {
        #[arg(long, value_parser = parse_hex)]
        seed: ::std::vec::Vec<u8>,
        #[arg(long)]
        nbit: Nbit,
        /// The 32-byte candidate, hex encoded.
        #[arg(long, value_parser = parse_hex)]
        x: ::std::vec::Vec<u8>,
    },
    /// Print the continuous difficulty score of an nbit.
    Difficulty {
        #[arg(long)]
        nbit: Nbit,
    },
    /// Compute the next nbit from a window of block timestamps.
    Retarget {
        #[arg(long)]
        last: Nbit,
        /// Timestamp (seconds) at the start of the window.
        #[arg(long)]
        start: u64,
        /// Timestamp (seconds) at the end of the window.
        #[arg(long)]
        end: u64,
        /// Target spacing in seconds; defaults to `reference_seconds`.
        #[arg(long)]
        target: Option<f64>,
        /// Intervals in the window; defaults to `nbit_sample_rate`.
        #[arg(long)]
        window: Option<u64>,
    },
    /// Write a puzzle's equations in the solver line format.
    Export {
        #[arg(long, value_parser = parse_hex)]
        seed: ::std::vec::Vec<u8>,
        #[arg(long)]
        nbit: Nbit,
        /// Values for the top variables, e.g. "0110"; the reduced system is written.
        #[arg(long, value_parser = FixAssignment::parse)]
        fix: Option<FixAssignment>,
    },
    /// Read a solver's JSON answer, rebuild the candidate and verify it.
    Accept {
        #[arg(long, value_parser = parse_hex)]
        seed: ::std::vec::Vec<u8>,
        #[arg(long)]
        nbit: Nbit,
        /// The fix the solver's equations were exported with.
        #[arg(long, value_parser = FixAssignment::parse)]
        fix: Option<FixAssignment>,
        /// Solver output file; stdin when absent.
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Search for a solution on the CPU (small puzzles only).
    Solve {
        #[arg(long, value_parser = parse_hex)]
        seed: ::std::vec::Vec<u8>,
        #[arg(long)]
        nbit: Nbit,
        /// Variables fixed per partition; 2^k partitions run in parallel.
        #[arg(long, default_value_t = 4)]
        fix_length: usize,
    },
}

fn parse_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(s.trim_start_matches("0x"))
}

impl Cli {
    /// File config (or defaults) with flag and env overrides applied.
    fn resolve_config(&self) -> anyhow::Result<CliConfig> {
        let mut config = match &self.config {
            Some(path) => CliConfig::from_toml_file(path)?,
            None => CliConfig::default(),
        };
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Some(offset) = self.equations_offset {
            config.pow.equations_offset = offset;
        }
        if let Some(rate) = self.nbit_sample_rate {
            config.pow.nbit_sample_rate = rate;
        }
        if let Some(secs) = self.reference_seconds {
            config.pow.reference_seconds = secs;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    init_logging(config.log_format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }
    set_pow(config.pow);

    run(cli.command, &pow_params())
}

fn run(command: Command, params: &PowParams) -> anyhow::Result<ExitCode> {
    let mut stdout = io::stdout().lock();

    match command {
        Command::Verify { seed, nbit, x } => {
            Ok(report(&mut stdout, check_pow(params, &seed, nbit, &x))?)
        }

        Command::Difficulty { nbit } => {
            writeln!(stdout, "nbit:       {nbit}")?;
            writeln!(stdout, "score:      {:.4}", difficulty_score(nbit))?;
            writeln!(stdout, "equations:  {}", nbit.equations_n(params))?;
            writeln!(stdout, "variables:  {}", nbit.variables_n(params))?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Retarget {
            last,
            start,
            end,
            target,
            window,
        } => {
            let target = target.unwrap_or(params.reference_seconds as f64);
            let window = window.unwrap_or(params.nbit_sample_rate);
            let next = calculate_nbit(target, last, window, start, end);

            if window > 0 && end > start {
                let observed = (end - start) as f64 / window as f64;
                writeln!(
                    stdout,
                    "spacing:    {} (target {})",
                    format_spacing(observed),
                    format_spacing(target)
                )?;
            }
            writeln!(
                stdout,
                "score:      {:.4} -> {:.4}",
                difficulty_score(last),
                difficulty_score(next)
            )?;
            writeln!(stdout, "nbit:       {last} -> {next}")?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Export { seed, nbit, fix } => {
            let system = puzzle(&seed, nbit, params)?;
            match fix {
                Some(fix) => SolverJob::new(&system, &fix)?.write_input(&mut stdout)?,
                None => write_equations(&system, &mut stdout)?,
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Accept {
            seed,
            nbit,
            fix,
            input,
        } => {
            let system = puzzle(&seed, nbit, params)?;
            let fix = match fix {
                Some(fix) => fix,
                None => FixAssignment::from_index(0, 0)?,
            };
            let job = SolverJob::new(&system, &fix)?;

            let output = match input {
                Some(path) => {
                    let file = std::fs::File::open(&path)
                        .with_context(|| format!("opening solver output {}", path.display()))?;
                    SolverOutput::read_from(BufReader::new(file))?
                }
                None => SolverOutput::read_from(io::stdin().lock())?,
            };

            match job.accept(&output)? {
                Some(x) => {
                    writeln!(stdout, "x:          {}", hex::encode(x))?;
                    Ok(report(&mut stdout, check_pow(params, &seed, nbit, &x))?)
                }
                None => {
                    writeln!(stdout, "no solution ({} points searched)", output.count)?;
                    Ok(ExitCode::FAILURE)
                }
            }
        }

        Command::Solve {
            seed,
            nbit,
            fix_length,
        } => {
            let system = puzzle(&seed, nbit, params)?;
            tracing::info!(
                equations = system.equations_n(),
                variables = system.variables_n(),
                fix_length,
                "starting CPU search"
            );
            let solution = CpuSolver::new(fix_length).solve(&system)?;
            writeln!(stdout, "x:          {}", hex::encode(solution.candidate))?;
            writeln!(stdout, "searched:   {}", solution.searched)?;
            Ok(report(&mut stdout, check_pow(params, &seed, nbit, &solution.candidate))?)
        }
    }
}

/// Build the puzzle for `nbit`, refusing shapes no candidate can encode.
fn puzzle(seed: &[u8], nbit: Nbit, params: &PowParams) -> anyhow::Result<EquationSystem> {
    let layout = EquationLayout::for_nbit(nbit, params);
    if !layout.fits_candidate() {
        anyhow::bail!(
            "nbit {nbit} gives {} variables; candidates hold at most {}",
            layout.variables_n,
            8 * CANDIDATE_BYTES
        );
    }
    Ok(EquationSystem::from_nbit(seed, nbit, params))
}

/// Print a verification verdict; a rejection exits non-zero.
fn report<W: Write, E: std::fmt::Display>(out: &mut W, verdict: Result<(), E>) -> io::Result<ExitCode> {
    match verdict {
        Ok(()) => {
            writeln!(out, "valid")?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            writeln!(out, "invalid: {e}")?;
            Ok(ExitCode::FAILURE)
        }
    }
}
