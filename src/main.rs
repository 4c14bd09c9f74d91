//! Transfer Bench - Main CLI Application
//!
//! Compares the upload throughput of two versions of a batch file-transfer
//! tool and prints mean and standard deviation per version.

use clap::Parser;
use std::process;
use transfer_bench::{
    app::App,
    cli::Cli,
    config::EnvManager,
    error::{AppError, ErrorReporter},
};

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(99);
    }));

    let cli = Cli::parse();

    if let Err(message) = cli.validate() {
        let error = AppError::validation(message);
        ErrorReporter::new(cli.use_colors(), false).report_error(&error);
        process::exit(error.exit_code());
    }

    if cli.env_help {
        println!("{}", EnvManager::display_env_help());
        println!("Example .env file:\n");
        println!("{}", EnvManager::create_example_env_content());
        for warning in EnvManager::validate_current_env() {
            eprintln!("{}", warning);
        }
        return;
    }

    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose || cli.debug);

    if let Err(e) = App::new(cli).run().await {
        reporter.report_error(&e);
        process::exit(e.exit_code());
    }
}
