//! tfdash binary entry point.

use std::io::{self, Write};

use tfdash::cli::{self, EXIT_OK, exit_code_for, render_error};
use tfdash::commands;
use tfdash::tracing::{TracingConfig, init_tracing};

fn main() {
    let cli = cli::parse();

    let tracing_config = TracingConfig {
        format: cli.log_format,
        level: cli.level.into(),
        ..TracingConfig::default()
    };
    if let Err(err) = init_tracing(tracing_config) {
        render_error(cli::CliError::config(err.to_string()));
        std::process::exit(tfdash::EXIT_CLI);
    }

    let mut stdout = io::stdout().lock();
    let code = match commands::run(&cli, &mut stdout) {
        Ok(()) => EXIT_OK,
        Err(err) => {
            let code = exit_code_for(&err);
            render_error(err);
            code
        }
    };
    let _ = stdout.flush();
    std::process::exit(code);
}
