use clap::Parser;
use std::process::ExitCode;

use rollcall_infrastructure::logging::{init_logger, LogSettings};
use rollcall_lib::application::config::AppConfig;
use rollcall_lib::presentation::cli::{self, Cli};
use rollcall_lib::presentation::{AppState, CommandError};

fn init_logging(config: &AppConfig, verbose: bool) {
    let mut settings = LogSettings::new(config.logging.dir.clone());
    settings.console = settings.console || verbose;

    if let Err(e) = init_logger(&settings) {
        eprintln!("⚠️  Failed to initialize file logging: {}", e);
        eprintln!("   Falling back to console logging only");

        let _ = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true)
            .try_init();
    }
}

fn print_error(err: CommandError) -> ExitCode {
    match serde_json::to_string_pretty(&err) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("{}", err),
    }
    ExitCode::FAILURE
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => return print_error(e.into()),
    };
    if let Some(db) = args.db {
        config.database.path = db;
    }

    init_logging(&config, args.verbose);
    tracing::info!("🚀 rollcall {} starting", env!("CARGO_PKG_VERSION"));

    let state = match AppState::new(config).await {
        Ok(state) => state,
        Err(e) => return print_error(e.into()),
    };

    let outcome = cli::run(args.command, &state).await;
    state.shutdown().await;

    match outcome {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => print_error(CommandError::infrastructure(e.to_string())),
        },
        Err(e) => print_error(e.into()),
    }
}
