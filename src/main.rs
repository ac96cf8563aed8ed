use std::io::Read;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Local;
use clap::{Parser, Subcommand};

use constant_reminder::config::TRIGGER_WAIT_SECS;
use constant_reminder::dispatch::{Action, Dispatcher, Scheduler, Signal};
use constant_reminder::error::{AppError, AppResult};
use constant_reminder::format::{format_interval, format_last_shown};
use constant_reminder::notifier::DesktopNotifier;
use constant_reminder::run_daemon;
use constant_reminder::storage::Storage;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the reminder daemon
    Start,
    /// Add a reminder; the interval is days + hours + minutes
    Add {
        name: String,
        text: String,

        #[arg(short = 'd', long, default_value_t = 0)]
        days: i64,

        #[arg(short = 'H', long, default_value_t = 0)]
        hours: i64,

        #[arg(short = 'm', long, default_value_t = 0)]
        minutes: i64,
    },
    /// Delete a reminder by id
    Remove { id: i32 },
    /// List reminders
    List {
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },
    /// Fire a reminder's notification right now
    Trigger { id: i32 },
    /// Merge reminders from a JSON file, or stdin when no file is given
    Import { file: Option<PathBuf> },
    /// Print the raw reminder list JSON for sharing
    Export,
}

fn main() -> Result<(), AppError> {
    env_logger::init();
    let args = Args::parse();
    let mut storage = Storage::new()?;

    match args.command {
        Commands::Start => run_daemon(storage),
        Commands::Add {
            name,
            text,
            days,
            hours,
            minutes,
        } => {
            let interval_ms = days * 24 * 60 * 60 * 1000 + hours * 60 * 60 * 1000 + minutes * 60 * 1000;
            let reminder = storage.add(name, text, interval_ms)?;
            println!(
                "added {} (id {}, every {})",
                reminder.name,
                reminder.id,
                format_interval(reminder.interval_ms)
            );
            Ok(())
        }
        Commands::Remove { id } => {
            if storage.delete(id)? {
                println!("deleted {}", id);
            } else {
                eprintln!("no reminder with id {}", id);
            }
            Ok(())
        }
        Commands::List { verbose } => list(&storage, verbose),
        Commands::Trigger { id } => trigger(storage, id),
        Commands::Import { file } => {
            let payload = match file {
                Some(path) => std::fs::read_to_string(&path).map_err(|e| {
                    AppError::storage(format!("failed to read {}: {}", path.display(), e))
                })?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .map_err(|e| AppError::storage(format!("failed to read stdin: {}", e)))?;
                    buf
                }
            };
            let added = storage.import(&payload)?;
            if added.is_empty() {
                println!("no new reminders imported from input");
            } else {
                println!("imported {} new reminders", added.len());
            }
            Ok(())
        }
        Commands::Export => {
            println!("{}", storage.export()?);
            Ok(())
        }
    }
}

fn list(storage: &Storage, verbose: bool) -> AppResult<()> {
    let now = Local::now();
    for reminder in storage.load()? {
        println!("{}  {}", reminder.id, reminder.name);
        if verbose {
            println!("\t{}", reminder.text);
            println!("\tInterval: {}", format_interval(reminder.interval_ms));
            println!(
                "\tLast: {} | {} times",
                format_last_shown(reminder.last_shown_ms, now),
                reminder.total_shown_count
            );
        }
    }
    Ok(())
}

/// Scheduler stand-in for one-shot CLI invocations. Rescheduling is left to a
/// running daemon, which picks the persisted change up via its store watcher.
struct NullScheduler;

impl Scheduler for NullScheduler {
    fn schedule_repeating(&mut self, _id: i32, _first_fire_ms: i64, _interval_ms: i64) {}
    fn cancel(&mut self, _id: i32) {}
}

/// The original list view fires a reminder on demand via a long press; here
/// it is a subcommand. Shows the notification, then waits a while for the
/// user's action so a frequency adjustment still lands in the store.
fn trigger(storage: Storage, id: i32) -> AppResult<()> {
    if !storage.load()?.iter().any(|r| r.id == id) {
        eprintln!("no reminder with id {}", id);
        return Ok(());
    }

    let (signal_tx, signal_rx) = mpsc::channel();
    let notifier = DesktopNotifier::new(signal_tx);
    let storage = Arc::new(Mutex::new(storage));
    let mut dispatcher = Dispatcher::new(storage, NullScheduler, notifier);

    dispatcher.dispatch(Signal::new(id, Action::Fire))?;
    match signal_rx.recv_timeout(Duration::from_secs(TRIGGER_WAIT_SECS)) {
        Ok(signal) => dispatcher.dispatch(signal),
        Err(_) => Ok(()),
    }
}
