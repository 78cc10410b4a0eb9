#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{IsTerminal, Write};

use specimen_cli::args::CliArgs;
use specimen_cli::driver::{self, EXIT_USAGE};
use specimen_cli::reporter::Reporter;

fn main() -> Result<()> {
    // No-op unless SPECIMEN_LOG or RUST_LOG is set.
    specimen_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;

    let report = match driver::run(&args, &cwd) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(EXIT_USAGE);
        }
    };

    let reporter = Reporter::new(!args.no_color && std::io::stderr().is_terminal());
    if !report.diagnostics.is_empty() {
        eprintln!("{}", reporter.render(&report.diagnostics));
    }
    eprintln!(
        "{}",
        reporter.format_summary(report.values.len(), report.failures.len())
    );

    let output = report.render(args.pretty)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{output}").context("failed to write output")?;
    stdout.flush().context("failed to write output")?;
    drop(stdout);

    std::process::exit(report.exit_code(args.deny_warnings));
}
