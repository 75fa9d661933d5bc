//! Command-line host for the birthday reminder.
//!
//! # Responsibility
//! - Edit the record store (add/remove/import) and show upcoming birthdays.
//! - Run one-off reminder checks.
//! - Host the daily scheduler as a long-running foreground daemon.

mod console;

use birthday_core::config::CONFIG_FILE_NAME;
use birthday_core::db::open_db;
use birthday_core::model::record::{parse_civil_date, DEFAULT_PRIORITY};
use birthday_core::reminder::message::priority_stars;
use birthday_core::{
    default_log_level, init_logging, AppConfig, BirthdayRecord, BirthdayService, Clock,
    DailyScheduler, FanoutNotifier, Language, LogNotifier, ReminderJob, SqliteBirthdayRepository,
    SqliteRecordSource, SystemClock, DB_FILE_NAME,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use console::ConsoleNotifier;
use log::info;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::sync::watch;

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Debug, Parser)]
#[command(name = "birthday", version, about = "Solar and lunar birthday reminders")]
struct Cli {
    /// Directory holding the record database and config.json.
    #[arg(long, global = true, default_value = ".")]
    data_dir: PathBuf,
    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Log directory; defaults to `<data-dir>/logs`.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add a birthday, replacing any record with the same name.
    Add {
        #[arg(long)]
        name: String,
        /// Civil date, YYYY-MM-DD.
        #[arg(long)]
        date: String,
        /// Recur on the lunar calendar.
        #[arg(long)]
        lunar: bool,
        #[arg(long, default_value_t = DEFAULT_PRIORITY, value_parser = clap::value_parser!(u8).range(1..=5))]
        priority: u8,
    },
    /// Delete a birthday by name.
    Remove { name: String },
    /// List birthdays with their next occurrence.
    List,
    /// Run one reminder sweep now.
    Check {
        /// Evaluate as if today were this date (YYYY-MM-DD).
        #[arg(long)]
        today: Option<String>,
        /// Print reminders without notifying.
        #[arg(long)]
        dry_run: bool,
    },
    /// Import a legacy `{ name: { date, lunar, priority } }` JSON file.
    Import { file: PathBuf },
    /// Write a default config.json if none exists.
    InitConfig,
    /// Run the daily scheduler until ctrl-c.
    Run {
        /// Ring the terminal bell with each reminder.
        #[arg(long)]
        bell: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    std::fs::create_dir_all(&cli.data_dir)?;
    let data_dir = cli.data_dir.canonicalize()?;
    let log_dir = match cli.log_dir {
        Some(dir) => std::path::absolute(dir)?,
        None => data_dir.join("logs"),
    };
    let level = cli
        .log_level
        .unwrap_or_else(|| default_log_level().to_string());
    init_logging(&level, &log_dir.to_string_lossy(), true)?;

    let config_path = data_dir.join(CONFIG_FILE_NAME);
    let db_path = data_dir.join(DB_FILE_NAME);

    match cli.command {
        Command::Add {
            name,
            date,
            lunar,
            priority,
        } => {
            let record = BirthdayRecord::parse(&name, &date, lunar, i64::from(priority))?;
            let conn = open_db(&db_path)?;
            let service = BirthdayService::new(SqliteBirthdayRepository::new(&conn));
            let verb = if service.save_birthday(&record)? {
                "updated"
            } else {
                "added"
            };
            println!("{verb} {}", record.name);
        }
        Command::Remove { name } => {
            let conn = open_db(&db_path)?;
            BirthdayService::new(SqliteBirthdayRepository::new(&conn)).remove_birthday(&name)?;
            println!("removed {}", name.trim());
        }
        Command::List => {
            let config = AppConfig::load_or_default(&config_path);
            print_upcoming(&db_path, &config, SystemClock.today())?;
        }
        Command::Check { today, dry_run } => {
            let today = match today {
                Some(value) => parse_civil_date(&value)?,
                None => SystemClock.today(),
            };
            check_once(&config_path, &db_path, today, dry_run)?;
        }
        Command::Import { file } => {
            let text = std::fs::read_to_string(&file)?;
            let conn = open_db(&db_path)?;
            let report =
                BirthdayService::new(SqliteBirthdayRepository::new(&conn)).import_legacy_json(&text)?;
            println!(
                "imported: {} created, {} replaced, {} rejected",
                report.created,
                report.replaced,
                report.rejected.len()
            );
            for (name, reason) in &report.rejected {
                println!("  rejected {name}: {reason}");
            }
        }
        Command::InitConfig => {
            if config_path.exists() {
                println!("config already exists at {}", config_path.display());
            } else {
                AppConfig::default().save(&config_path)?;
                println!("wrote {}", config_path.display());
            }
        }
        Command::Run { bell } => run_daemon(&config_path, &db_path, bell)?,
    }

    Ok(())
}

fn print_upcoming(db_path: &Path, config: &AppConfig, today: NaiveDate) -> CliResult<()> {
    let conn = open_db(db_path)?;
    let rows = BirthdayService::new(SqliteBirthdayRepository::new(&conn)).upcoming(today)?;
    if rows.is_empty() {
        println!("no birthdays recorded");
        return Ok(());
    }

    // Rows inside the furthest reminder window get a bell marker.
    let horizon = config.rules.max_offset();
    for row in rows {
        let next = match (row.next, row.days_left) {
            (Some(next), Some(days_left)) if days_left <= horizon => {
                format!("{next} (+{days_left}d) 🔔")
            }
            (Some(next), Some(days_left)) => format!("{next} (+{days_left}d)"),
            _ => "out of lunar range".to_string(),
        };
        println!(
            "{} | {} | {} | {} | {}",
            row.record.name,
            row.record.date_text(),
            calendar_tag(row.record.is_lunar, config.language),
            priority_stars(row.record.priority),
            next
        );
    }
    Ok(())
}

fn calendar_tag(is_lunar: bool, language: Language) -> &'static str {
    match (is_lunar, language) {
        (true, Language::Zh) => "🌙 农历",
        (false, Language::Zh) => "📅 公历",
        (true, Language::En) => "🌙 lunar",
        (false, Language::En) => "📅 solar",
    }
}

fn check_once(config_path: &Path, db_path: &Path, today: NaiveDate, dry_run: bool) -> CliResult<()> {
    let config = AppConfig::load_or_default(config_path);
    let notifier = FanoutNotifier::new()
        .with_channel(LogNotifier::new(config.language))
        .with_channel(ConsoleNotifier::new(config.language, false));
    let job = ReminderJob::new(SqliteRecordSource::new(db_path), notifier, config.rules);

    if dry_run {
        let events = job.preview(today)?;
        for event in &events {
            println!(
                "{} in {} day(s) on {} (priority {})",
                event.name, event.days_left, event.occurrence, event.priority
            );
        }
        println!("{} reminder(s) due on {today}", events.len());
        return Ok(());
    }

    let report = job.run(today)?;
    println!(
        "{} reminder(s) for {} record(s) on {today}",
        report.reminders, report.records
    );
    Ok(())
}

fn run_daemon(config_path: &Path, db_path: &Path, bell: bool) -> CliResult<()> {
    let config = AppConfig::load_or_default(config_path);
    let notifier = FanoutNotifier::new()
        .with_channel(LogNotifier::new(config.language))
        .with_channel(ConsoleNotifier::new(config.language, bell));
    let job = ReminderJob::new(SqliteRecordSource::new(db_path), notifier, config.rules);
    let scheduler = DailyScheduler::new(config.notify_time);
    let poll_interval = config.poll_interval;
    let notify_time = config.notify_time;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(birthday_core::run_daily_scheduler(
            scheduler,
            SystemClock,
            poll_interval,
            shutdown_rx,
            move |today| job.run(today),
        ));

        println!(
            "reminding daily at {}; press ctrl-c to stop",
            notify_time.format("%H:%M")
        );
        tokio::signal::ctrl_c().await?;
        info!("event=shutdown module=cli status=start reason=ctrl_c");
        // Receiver may already be gone if the task ended; nothing to signal then.
        let _ = shutdown_tx.send(true);
        task.await?;
        Ok::<(), Box<dyn Error>>(())
    })
}
