//! Walks every `AAA00`..`ZZZ99` candidate against each stored digest and
//! reports how long the whole batch took. `fit` runs the line-fitting search
//! over the bundled point table instead.

use std::io::{self, BufWriter, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use keyspace_crack::{
    fit::parse_points, CandidateFormat, CrackConfig, FitConfig, LineSink, Result, Stopwatch,
    DEFAULT_SALT_LEN,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Subcommand)]
enum Command {
    /// Search the keyspace for every target digest (default).
    Crack {
        /// Hashcat-style mask (?u ?l ?d) replacing the AAA00 format.
        #[arg(short, long)]
        mask: Option<String>,
        /// Stored digest to search for; repeat for several. Defaults to the bundled list.
        #[arg(short, long = "target", value_name = "DIGEST")]
        targets: Vec<String>,
        /// Length of the salt prefix of each stored digest.
        #[arg(long, default_value_t = DEFAULT_SALT_LEN)]
        salt_len: usize,
        /// Only print per-target counts, not every candidate.
        #[arg(short, long)]
        quiet: bool,
    },
    /// Fit y = m*x + c to a point table by compass search.
    Fit {
        /// Starting slope.
        #[arg(short, long, allow_negative_numbers = true)]
        m: Option<f64>,
        /// Starting intercept.
        #[arg(short, long, allow_negative_numbers = true)]
        c: Option<f64>,
        #[arg(short, long)]
        step: Option<f64>,
        /// CSV of x,y lines. Defaults to the bundled table.
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Only print the final estimate.
        #[arg(short, long)]
        quiet: bool,
    },
}

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

fn print_elapsed(out: &mut impl io::Write, elapsed: Duration) -> io::Result<()> {
    writeln!(
        out,
        "Time elapsed was {}ns or {:0.9}s",
        elapsed.as_nanos(),
        elapsed.as_secs_f64()
    )
}

fn crack(
    mask: Option<String>,
    targets: Vec<String>,
    salt_len: usize,
    quiet: bool,
) -> Result<()> {
    let mut config = CrackConfig::reference()?;
    if let Some(mask) = mask {
        config.format = CandidateFormat::parse_mask(&mask)?;
    }
    if !targets.is_empty() {
        config.targets = targets;
    }
    config.salt_len = salt_len;

    let records = config.target_records()?;
    let out = BufWriter::new(io::stdout().lock());
    let mut sink = if quiet {
        LineSink::quiet(out)
    } else {
        LineSink::new(out)
    };

    let report = config.driver().run(&records, &mut sink)?;

    let mut out = sink.into_inner();
    for (record, outcome) in records.iter().zip(&report.outcomes) {
        match &outcome.first_match {
            Some(found) => writeln!(
                out,
                "{}: {} (candidate {} of {})",
                record.expected(),
                found.candidate,
                found.index,
                outcome.examined
            )?,
            None => writeln!(
                out,
                "{}: no match in {} candidates",
                record.expected(),
                outcome.examined
            )?,
        }
    }
    print_elapsed(&mut out, report.elapsed)?;
    writeln!(
        out,
        "Throughput was {:.0} candidates/s",
        report.candidates_per_second()
    )?;
    out.flush()?;

    Ok(())
}

fn fit(
    m: Option<f64>,
    c: Option<f64>,
    step: Option<f64>,
    data: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let mut config = FitConfig::reference()?;
    if let Some(m) = m {
        config.start.m = m;
    }
    if let Some(c) = c {
        config.start.c = c;
    }
    if let Some(step) = step {
        config.step = step;
    }
    if let Some(path) = data {
        config.points = parse_points(&std::fs::read_to_string(path)?)?;
    }

    let watch = Stopwatch::start();
    let outcome = config.search()?.run();
    let elapsed = watch.stop();

    info!(
        iterations = outcome.iterations,
        elapsed_ns = elapsed.as_nanos() as u64,
        "fit converged"
    );

    let mut out = BufWriter::new(io::stdout().lock());
    if !quiet {
        for step in &outcome.path {
            writeln!(
                out,
                "best m,c is {:.6},{:.6} with error {:.6} in direction {}",
                step.model.m, step.model.c, step.error, step.direction
            )?;
        }
    }
    writeln!(
        out,
        "minimum m,c is {:.6},{:.6} with error {:.6}",
        outcome.model.m, outcome.model.c, outcome.error
    )?;
    print_elapsed(&mut out, elapsed)?;
    out.flush()?;

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let result = match args.command {
        None => crack(None, Vec::new(), DEFAULT_SALT_LEN, false),
        Some(Command::Crack {
            mask,
            targets,
            salt_len,
            quiet,
        }) => crack(mask, targets, salt_len, quiet),
        Some(Command::Fit {
            m,
            c,
            step,
            data,
            quiet,
        }) => fit(m, c, step, data, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
