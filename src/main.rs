mod config;
mod error;
mod forecast;
mod import;
mod models;
mod run;
mod ui;

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::Config;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = Config::load()?;
    init_tracing(&args, &config);

    match args.len() {
        1 => {
            run::print_usage();
            Ok(())
        }
        2.. => run::as_cli(&args, &config),
        _ => {
            eprintln!("Usage: spendcast [command]");
            Ok(())
        }
    }
}

// Priority: RUST_LOG > --verbose > config log_level > warn
fn init_tracing(args: &[String], config: &Config) {
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(config.log_level.as_deref().unwrap_or("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}
