use authctl::{Cli, CliError, Printer, TerminalPrompt};
use clap::Parser;
use std::io::{self, BufReader};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut prompt = TerminalPrompt::new(BufReader::new(io::stdin()), io::stderr());
    let mut printer = Printer::new(io::stdout().lock());

    match runtime.block_on(authctl::run(cli, &mut prompt, &mut printer)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            // The failed assertion marker has already been printed.
            if !matches!(report.current_context(), CliError::AssertionMismatch { .. }) {
                eprintln!("Error: {report}");
            }
            ExitCode::FAILURE
        }
    }
}
