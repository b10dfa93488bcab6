use std::fs::File;

use campus::backend::Store;
use campus::config::CampusConfig;
use campus::console::{Console, ConsoleError, DEFAULT_WIDTH};
use campus::screens::ScreenKind;
use campus::session::{Role, Session};
use campus::settings::{SettingsProvider, SqliteBackend};
use campus::{paths, seed};
use clap::Parser;
use simplelog::{Config, WriteLogger};

#[derive(Debug, Parser)]
#[command(name = "campus", about = "University portal administration console")]
struct Args {
    /// Role to act as: public, staff or admin
    #[arg(long, default_value = "admin")]
    role: Role,

    /// Screen to open first
    #[arg(long, default_value = "schools")]
    screen: ScreenKind,

    /// Name recorded in the log for this session
    #[arg(long, default_value = "admin")]
    user: String,

    /// Render width in columns
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,
}

/// Settings stored next to the other application data, or kept in memory
/// when no data directory is available.
async fn open_settings() -> (SettingsProvider, Option<String>) {
    let Some(path) = paths::settings_db() else {
        return (
            SettingsProvider::in_memory(),
            Some("no data directory, settings are not saved".to_string()),
        );
    };
    match SqliteBackend::new(&path).await {
        Ok(backend) => (SettingsProvider::new(backend), None),
        Err(e) => (
            SettingsProvider::in_memory(),
            Some(format!("cannot open {}: {}", path.display(), e)),
        ),
    }
}

fn init_logging(config: &CampusConfig) {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else { return };
    match File::create(&path) {
        Ok(file) => {
            if let Err(e) = WriteLogger::init(config.level_filter(), Config::default(), file) {
                eprintln!("Failed to initialize logger: {}", e);
            }
        }
        Err(e) => eprintln!("Failed to create log file {}: {}", path.display(), e),
    }
}

async fn run(args: Args) -> Result<(), ConsoleError> {
    let (settings, fallback) = open_settings().await;
    let config = CampusConfig::load(&settings).await?;
    init_logging(&config);
    if let Some(reason) = fallback {
        log::warn!("{}", reason);
    }
    // Write the defaults back so a fresh install has every key present
    config.save(&settings).await?;

    let store = Store::in_memory();
    seed::seed(&store).await?;

    let session = Session::new(args.user, args.role);
    log::info!("{} signed in as {}", session.user, session.role);

    let mut console = Console::open(store, settings, config, session, args.screen)
        .await?
        .with_width(args.width);
    console
        .run(
            tokio::io::BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        )
        .await?;

    log::info!("closed on {}", console.screen_kind());
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Args::parse()).await {
        eprintln!("Error: {}", e);
    }
}
