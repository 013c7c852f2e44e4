use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use clap::{Parser, Subcommand};
use parking_lot::Mutex;

use handcount_cli::config::CliConfig;
use handcount_cli::logging::init_logging;
use handcount_cli::repl::{Repl, describe_signal};
use handcount_cli::replay::{self, ReplayScript};
use handcount_core::clock::driver::{ClockDriver, ClockTiming};
use handcount_core::model::settings::{MatchSettings, PlayerCount, TimeLimit};
use handcount_core::{AppInfo, Session, Signal};

/// Scorekeeper for hand-count-down card games.
#[derive(Debug, Parser)]
#[command(name = "handcount", author, version, about = "Round scoring and turn timer for card nights")]
struct Cli {
    /// Optional YAML configuration file.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Keep score interactively, one command per line on stdin.
    Play {
        /// Seat these players straight away (comma separated).
        #[arg(long, value_name = "NAMES", value_delimiter = ',')]
        players: Vec<String>,

        /// Turn time limit in seconds (30, 45, 60, 90 or 120).
        #[arg(long, value_name = "SECS")]
        time_limit: Option<u32>,
    },
    /// Score a scripted match and print the final state as JSON.
    Replay {
        /// YAML script with players and held points per round.
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Pretty-print the JSON report.
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match cli.config.as_ref() {
        Some(path) => CliConfig::from_path(path)?,
        None => CliConfig::default(),
    };

    match cli.command {
        Mode::Play {
            players,
            time_limit,
        } => {
            if !players.is_empty() {
                config.table.players = players;
            }
            if let Some(seconds) = time_limit {
                config.table.time_limit_seconds = seconds;
            }
            config.validate()?;
            let _logging_guard = init_logging(&config.logging)?;
            play(&config)
        }
        Mode::Replay { script, pretty } => {
            let _logging_guard = init_logging(&config.logging)?;
            let loaded = ReplayScript::from_path(&script)?;
            let report = replay::run(&loaded)
                .with_context(|| format!("replaying {}", script.display()))?;
            let json = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{json}");
            Ok(())
        }
    }
}

fn play(config: &CliConfig) -> anyhow::Result<()> {
    let table = &config.table;
    let mut settings = MatchSettings {
        time_limit: TimeLimit::from_seconds(table.time_limit_seconds)?,
        ..MatchSettings::default()
    };
    if !table.players.is_empty() {
        settings.player_count = PlayerCount::new(table.players.len())?;
    }

    let (tx, rx) = mpsc::channel::<Signal>();
    let mut session = Session::with_settings(settings, tx);
    if !table.players.is_empty() {
        session
            .state_mut()
            .initialize_match(&table.players)
            .context("seating configured players")?;
    }

    let printer = thread::spawn(move || {
        for signal in rx {
            println!("* {}", describe_signal(signal));
        }
    });

    println!("{} {}, type 'help' for commands", AppInfo::name(), AppInfo::version());
    let driver = ClockDriver::new(Arc::new(Mutex::new(session)), ClockTiming::default());
    let mut repl = Repl::new(driver);
    repl.run(io::stdin().lock(), io::stdout())
        .context("reading commands")?;

    // The channel closes once the session and any retiring tickers are gone.
    drop(repl);
    printer
        .join()
        .map_err(|_| anyhow::anyhow!("signal printer panicked"))?;
    Ok(())
}
