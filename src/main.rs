// Stat card entry point.
//
// Startup sequence:
// 1. Parse the command line
// 2. Initialize tracing (log to file, not terminal)
// 3. Load config (copying defaults on first run)
// 4. Load the season CSV into a roster
// 5. Dispatch: viewer, list, show, export, or html

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;

use stat_card::card::{build_card, format_positions};
use stat_card::config::{self, Config};
use stat_card::export;
use stat_card::html;
use stat_card::stats::season;
use stat_card::stats::{PlayerRecord, Roster};
use stat_card::tui;

#[derive(Parser)]
#[command(name = "statcard")]
#[command(about = "Single-player baseball stat card from a season CSV export", long_about = None)]
struct Cli {
    /// Directory holding config/, data/, and logs/ (default: current directory)
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive card viewer (default)
    Tui,

    /// List every player in the season file
    List,

    /// Print one player's card
    Show {
        /// Player name ("First Last"), matched case-insensitively
        player: String,

        /// Print the card as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write one player's raw columns to <export dir>/<Name>_stats.csv
    Export {
        /// Player name ("First Last"), matched case-insensitively
        player: String,
    },

    /// Write one player's card as a self-contained HTML page
    Html {
        /// Player name ("First Last"), matched case-insensitively
        player: String,

        /// Output file (default: <export dir>/<Name>_card.html)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let base_dir = match cli.base_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to read current directory")?,
    };

    init_tracing(&base_dir)?;
    info!("statcard starting in {}", base_dir.display());

    let config = config::load_config(&base_dir).context("failed to load configuration")?;
    let roster = season::load_season(&config).with_context(|| {
        format!(
            "failed to load season data from {}",
            config.season_csv_path().display()
        )
    })?;

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => {
            let state = tui::ViewState::new(roster, &config);
            tui::run(state).await?;
        }
        Command::List => {
            for player in roster.players() {
                println!(
                    "{:>4}  {:<24} {}",
                    format!("#{}", player.number),
                    player.name,
                    format_positions(&player.positions)
                );
            }
        }
        Command::Show { player, json } => {
            let record = find_player(&roster, &player)?;
            let card = build_card(record, &config);
            if json {
                let text = serde_json::to_string_pretty(&card).context("failed to serialize card")?;
                println!("{text}");
            } else {
                print!("{card}");
            }
        }
        Command::Export { player } => {
            let record = find_player(&roster, &player)?;
            let path = export::export_player(record, &config.export_dir())?;
            println!("Exported to `{}`", path.display());
        }
        Command::Html { player, output } => {
            let record = find_player(&roster, &player)?;
            write_html(record, &config, output)?;
        }
    }

    Ok(())
}

fn find_player<'a>(roster: &'a Roster, name: &str) -> anyhow::Result<&'a PlayerRecord> {
    match roster.find(name) {
        Some(player) => Ok(player),
        None => {
            let known: Vec<&str> = roster.names().collect();
            bail!("no player named {:?} (known: {})", name, known.join(", "))
        }
    }
}

fn write_html(player: &PlayerRecord, config: &Config, output: Option<PathBuf>) -> anyhow::Result<()> {
    let path = match output {
        Some(path) => path,
        None => {
            let dir = config.export_dir();
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            dir.join(html::page_file_name(&player.name))
        }
    };

    let card = build_card(player, config);
    let page = html::render_card_page(&card, config);
    std::fs::write(&path, page).with_context(|| format!("failed to write {}", path.display()))?;

    info!("Wrote card page for {} to {}", player.name, path.display());
    println!("Wrote `{}`", path.display());
    Ok(())
}

/// Initialize the tracing subscriber writing to `<base_dir>/logs/statcard.log`.
///
/// The terminal belongs to the viewer, so nothing is logged to stdout.
fn init_tracing(base_dir: &Path) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = base_dir.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("statcard.log"))
        .context("failed to create log file")?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("stat_card=info,statcard=info,warn")),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
