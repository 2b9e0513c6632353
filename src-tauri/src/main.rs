mod config;
mod credentials;
mod database;
mod handlers;
mod state;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use resolver::platforms::Platform;
use resolver::{ParsedResult, ResolutionOrigin, ResolveOutcome};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger, TerminalMode, WriteLogger,
};

use crate::config::{app_dirs, Config};
use crate::handlers::{config as config_handlers, history, resolve, utils};
use crate::state::State;

#[derive(Parser)]
#[command(name = "lsar", version, about = "Resolve live rooms into playable stream links")]
struct Cli {
    /// Print info logs to the terminal
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of the default one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a room id or room url
    Resolve {
        platform: Platform,
        input: String,
        /// Play the link at this index after resolving
        #[arg(long)]
        play: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Resolve the room of a history entry again
    Replay {
        index: usize,
        #[arg(long)]
        play: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Open the room page in the browser
    Open { platform: Platform, room_id: u64 },
    /// List supported platforms
    Platforms,
}

#[derive(Subcommand)]
enum HistoryAction {
    List,
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum ConfigAction {
    Show,
    SetCookie { cookie: String },
    SetPlayer { path: String, args: Vec<String> },
}

fn setup_logging(log_dir: &Path, verbose: bool) -> Result<(), String> {
    std::fs::create_dir_all(log_dir).map_err(|e| e.to_string())?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("lsar.log"))
        .map_err(|e| e.to_string())?;

    let log_config = ConfigBuilder::new()
        .add_filter_ignore_str("sqlx")
        .add_filter_ignore_str("hyper")
        .build();
    let term_level = if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    CombinedLogger::init(vec![
        TermLogger::new(
            term_level,
            log_config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Debug, log_config, log_file),
    ])
    .map_err(|e| e.to_string())
}

fn platform_line(platform: Platform) -> String {
    format!(
        "{:<9} {:<6} {}  {}",
        platform.as_str(),
        platform.label(),
        platform.room_base_url(),
        platform.logo()
    )
}

fn print_result(result: &ParsedResult, json: bool) -> Result<(), String> {
    if json {
        let content = serde_json::to_string_pretty(result).map_err(|e| e.to_string())?;
        println!("{}", content);
        return Ok(());
    }

    println!("{} - {}", result.anchor, result.title);
    if !result.category.is_empty() {
        println!("Category: {}", result.category);
    }
    println!("Room: {}", result.platform.room_url(result.room_id));
    for (i, link) in result.links.iter().enumerate() {
        println!("[{}] {}", i, link);
    }
    Ok(())
}

/// Reports the outcome, returning whether it carries a result.
fn report(outcome: &ResolveOutcome, json: bool) -> Result<bool, String> {
    match outcome {
        ResolveOutcome::Resolved(result) => {
            print_result(result, json)?;
            Ok(true)
        }
        ResolveOutcome::Failed(error) => {
            eprintln!("{}", error);
            Ok(false)
        }
        ResolveOutcome::ConfigurationRequired(platform) => {
            eprintln!(
                "{} requires a cookie, run `lsar config set-cookie <cookie>` first",
                platform.label()
            );
            Ok(false)
        }
        ResolveOutcome::Rejected { active } => {
            eprintln!("Another resolution is in progress: {:?}", active);
            Ok(false)
        }
    }
}

async fn finish_resolve(
    state: &State,
    outcome: ResolveOutcome,
    play: Option<usize>,
    json: bool,
) -> Result<ExitCode, String> {
    if !report(&outcome, json)? {
        return Ok(ExitCode::FAILURE);
    }
    if let Some(index) = play {
        let link = resolve::play_link(state, index).await?;
        log::info!("Playing {}", link);
    }
    Ok(ExitCode::SUCCESS)
}

async fn run(cli: Cli) -> Result<ExitCode, String> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Command::Platforms => {
            for platform in Platform::ALL {
                println!("{}", platform_line(platform));
            }
            return Ok(ExitCode::SUCCESS);
        }
        Command::Open { platform, room_id } => {
            utils::open_external(&platform.room_url(room_id))?;
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    let state = State::new(config).await?;
    match cli.command {
        Command::Resolve {
            platform,
            input,
            play,
            json,
        } => {
            let outcome =
                resolve::resolve(&state, ResolutionOrigin::SearchBar, platform, &input).await;
            finish_resolve(&state, outcome, play, json).await
        }
        Command::Replay { index, play, json } => {
            let outcome = resolve::replay(&state, index).await?;
            finish_resolve(&state, outcome, play, json).await
        }
        Command::History { action } => {
            match action {
                HistoryAction::List => {
                    for (i, record) in history::get_history(&state).await?.iter().enumerate() {
                        println!(
                            "[{}] #{} {} {} {} \"{}\" {}",
                            i,
                            record.id,
                            record.platform.label(),
                            record.room_id,
                            record.anchor,
                            record.last_title,
                            record.last_play_time.format("%Y-%m-%d %H:%M:%S")
                        );
                    }
                }
                HistoryAction::Delete { id } => history::delete_history(&state, id).await?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Config { action } => {
            match action {
                ConfigAction::Show => {
                    let config = config_handlers::get_config(&state).await;
                    let content = toml::to_string_pretty(&config).map_err(|e| e.to_string())?;
                    println!("# {}", config.config_path.display());
                    println!("{}", content);
                }
                ConfigAction::SetCookie { cookie } => {
                    config_handlers::set_bilibili_cookie(&state, &cookie).await?
                }
                ConfigAction::SetPlayer { path, args } => {
                    config_handlers::set_player(&state, &path, args).await?
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Platforms | Command::Open { .. } => Ok(ExitCode::SUCCESS),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match app_dirs() {
        Ok(dirs) => {
            if let Err(e) = setup_logging(&dirs.data_dir.join("logs"), cli.verbose) {
                eprintln!("Failed to setup logging: {}", e);
            }
        }
        Err(e) => eprintln!("Failed to setup logging: {}", e),
    }

    log::info!("Operating System: {}", std::env::consts::OS);
    log::info!("Architecture: {}", std::env::consts::ARCH);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
