mod notify;

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use tally_core::{ActivityEvent, Outcome, process_event};
use tally_store::{Settings, Store};

use notify::{Notifier, StdoutNotifier};

#[derive(Parser)]
#[command(name = "tally", about = "XP accrual and leveling engine")]
struct Cli {
    /// Settings file with quota limits and admin ids
    /// (default: <data dir>/settings.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process activity events from a JSON-lines file (stdin when omitted)
    Feed {
        /// Input file, one JSON event per line
        file: Option<PathBuf>,
    },

    /// Show one user's progression snapshot
    Stats {
        user_id: i64,
    },

    /// Show the leaderboard
    Top {
        /// Ranking metric
        #[arg(long, value_enum, default_value_t = Metric::Xp)]
        by: Metric,

        #[arg(long, default_value_t = 10)]
        limit: u32,
    },

    /// Zero a periodic aggregate for all users (run from a scheduler)
    Reset {
        #[arg(value_enum)]
        window: ResetWindow,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Metric {
    Xp,
    Coins,
}

#[derive(Clone, Copy, ValueEnum)]
enum ResetWindow {
    Week,
    Month,
}

fn data_dir() -> PathBuf {
    std::env::var("TALLY_DATA_DIR")
        .ok()
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(".tally")
        })
}

fn open_store() -> Result<Store> {
    let dir = data_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    Store::open(&dir.join("tally.db")).context("failed to open store")
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| data_dir().join("settings.toml"));
    Settings::load(&path).with_context(|| format!("failed to load {}", path.display()))
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Feed { file } => cmd_feed(&cli, file.as_deref()),
        Commands::Stats { user_id } => cmd_stats(*user_id),
        Commands::Top { by, limit } => cmd_top(*by, *limit),
        Commands::Reset { window } => cmd_reset(*window),
    }
}

fn cmd_feed(cli: &Cli, file: Option<&Path>) -> Result<()> {
    let settings = load_settings(cli)?;
    let quota = settings.quota();
    let admin_ids = settings.admin_ids();
    let store = open_store()?;
    let mut notifier = StdoutNotifier;

    let reader: Box<dyn BufRead> = match file {
        Some(path) => Box::new(BufReader::new(
            std::fs::File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let mut processed = 0u64;
    let mut granted = 0u64;
    let mut leveled = 0u64;

    for line in reader.lines() {
        let line = line.context("failed to read input")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event: ActivityEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("skipping malformed event: {e}");
                continue;
            }
        };

        let username = event.username.as_deref().unwrap_or("");
        let user = store
            .ensure_user(event.user_id, username, &admin_ids)
            .context("failed to load user")?;
        let result = process_event(&user, &event, &quota, event.at);
        store.save_user(&result.user).context("failed to save user")?;

        processed += 1;
        match &result.outcome {
            Outcome::Granted { .. } => granted += 1,
            Outcome::LeveledUp {
                new_level, reward, ..
            } => {
                granted += 1;
                leveled += 1;
                // State is already saved; a failed announcement is logged
                // and never rolled back.
                if let Err(e) = notifier.announce_level_up(&result.user, *new_level, reward) {
                    tracing::warn!(
                        "level-up announcement failed for user {}: {e}",
                        result.user.user_id
                    );
                }
            }
            Outcome::Rejected { reason } => {
                tracing::debug!("event from {} rejected: {reason:?}", event.user_id);
            }
            Outcome::QuotaExhausted => {
                tracing::debug!("event from {} hit the quota", event.user_id);
            }
        }
    }

    println!("processed {processed} events: {granted} granted, {leveled} level-ups");
    Ok(())
}

fn cmd_stats(user_id: i64) -> Result<()> {
    let store = open_store()?;
    let Some(user) = store.find_user(user_id).context("failed to load user")? else {
        println!("(unknown user {user_id})");
        return Ok(());
    };

    let name = if user.username.is_empty() {
        "-".to_string()
    } else {
        user.username.clone()
    };
    println!("user:      {} ({name})", user.user_id);
    println!("role:      {}", user.role.as_str());
    println!("level:     {}", user.level);
    println!("total_xp:  {}", user.total_xp);
    println!("day_xp:    {} [{}]", user.day_xp, user.day_key);
    println!("week_xp:   {}", user.week_xp);
    println!("month_xp:  {}", user.month_xp);
    println!("minute_xp: {} [{}]", user.minute_xp, user.minute_key);
    println!("coins:     {}", user.coins);
    println!("messages:  {}", user.message_count);
    Ok(())
}

fn cmd_top(by: Metric, limit: u32) -> Result<()> {
    let store = open_store()?;
    let users = match by {
        Metric::Xp => store.top_by_xp(limit),
        Metric::Coins => store.top_by_coins(limit),
    }
    .context("failed to query leaderboard")?;

    if users.is_empty() {
        println!("(no users)");
        return Ok(());
    }

    for (rank, user) in users.iter().enumerate() {
        let name = if user.username.is_empty() {
            user.user_id.to_string()
        } else {
            user.username.clone()
        };
        println!(
            "{:>3}. {name}  level {}  xp {}  coins {}",
            rank + 1,
            user.level,
            user.total_xp,
            user.coins
        );
    }
    Ok(())
}

fn cmd_reset(window: ResetWindow) -> Result<()> {
    let store = open_store()?;
    let (label, n) = match window {
        ResetWindow::Week => ("week_xp", store.reset_week_xp()),
        ResetWindow::Month => ("month_xp", store.reset_month_xp()),
    };
    let n = n.context("failed to reset aggregate")?;
    println!("reset {label} for {n} users");
    Ok(())
}
