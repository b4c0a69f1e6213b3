//! jv CLI binary

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jv_lib::cli::{Cli, CliContext, CommandRunner, style};
use jv_lib::core::{JvError, format_error_with_suggestion};

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_env("JV_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn report(err: &anyhow::Error) {
    let message = match err.downcast_ref::<JvError>() {
        Some(jv) if err.chain().count() == 1 => format_error_with_suggestion(jv),
        _ => {
            let mut msg = format!("Error: {err:#}");
            if let Some(hint) = err
                .chain()
                .find_map(|cause| cause.downcast_ref::<JvError>())
                .and_then(JvError::suggestion)
            {
                msg.push_str("\n\n💡 ");
                msg.push_str(hint);
            }
            msg
        }
    };
    eprintln!("{}", style::error(&message));
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match CliContext::new(cli.verbose, cli.quiet) {
        Ok(ctx) => cli.command.execute(&ctx).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}
