use std::process::ExitCode;

use clap::Parser;

use walkin_cli::{App, Cli, run};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    walkin_observability::init(cli.log_format.into());

    let app = match App::from_cli(&cli) {
        Ok(app) => app,
        Err(err) => {
            tracing::error!(error = %err, "failed to resolve storage locations");
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = std::io::stdout().lock();
    match run(&app, cli.command, &mut stdout).await {
        Ok(outcome) => ExitCode::from(outcome.code()),
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
