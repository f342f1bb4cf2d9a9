use clap::Parser;
use repokeeper::{
    cli::{
        commands::{self, Completion, Session},
        Cli, Commands, StarsCommand,
    },
    config::{LoggingConfig, Settings},
    shutdown::{block_on_detached, Shutdown},
    Error, Result,
};
use std::fs::OpenOptions;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

fn main() -> ExitCode {
    // A prompt abandoned on Ctrl+C leaves a stdin read behind; the runtime
    // must not wait for it
    match block_on_detached(run_cli()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: could not start the async runtime: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run_cli() -> ExitCode {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut settings = match load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Command line wins over the environment
    if let Some(username) = cli.username.clone() {
        settings.github.username = Some(username);
    }
    if let Some(token) = cli.token.clone() {
        settings.github.token = Some(token);
    }

    init_logging(&settings.logging);
    info!("repokeeper {} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    shutdown.install_ctrl_c_handler();

    match run(cli.command, settings, shutdown).await {
        Ok(completion) => {
            info!("Finished: {:?}", completion);
            completion.exit_code()
        }
        Err(Error::Interrupted) => {
            println!("\nOperation cancelled by user.");
            info!("Cancelled by user before any change was made");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e.log_safe());
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_settings() -> Result<Settings> {
    let settings = Settings::from_env()?;
    settings.validate()?;
    Ok(settings)
}

/// Full diagnostics go to the log file; the terminal only sees warnings
fn init_logging(config: &LoggingConfig) {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file);

    let (file_layer, open_error) = match file {
        Ok(file) => {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| "info,repokeeper=debug".into()),
                );
            (Some(layer), None)
        }
        Err(e) => (None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(LevelFilter::WARN),
        )
        .init();

    if let Some(e) = open_error {
        warn!(
            "Could not open log file {}: {}",
            config.log_file.display(),
            e
        );
    }
}

async fn run(command: Commands, settings: Settings, shutdown: Shutdown) -> Result<Completion> {
    let session = Session::connect(settings, shutdown).await?;

    match command {
        Commands::List { filters, export } => commands::list(&session, &filters, export).await,
        Commands::Forks { target } => commands::forks(&session, &target).await,
        Commands::Visibility { to, target } => {
            commands::visibility(&session, to, &target).await
        }
        Commands::Stars { command } => match command {
            StarsCommand::List {
                filters,
                details,
                languages,
                export,
            } => commands::stars_list(&session, &filters, details, languages, export).await,
            StarsCommand::Unstar { filters, target } => {
                commands::stars_unstar(&session, &filters, &target).await
            }
        },
        Commands::Limits => commands::limits(&session).await,
    }
}
