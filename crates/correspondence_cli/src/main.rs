//! Operator CLI for a correspondence store.
//!
//! # Responsibility
//! - Open (and bootstrap) a store from a layout root.
//! - Expose stats, counter refresh, backup and restore for manual checks.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use correspondence_core::{
    core_version, default_log_level, init_logging, CorrespondenceStore, DateRange, StoreConfig,
};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "correspondence")]
#[command(version, about = "Inspect and maintain a correspondence archive database")]
struct Cli {
    /// Layout root holding data/, backups/, reports/ and temp/
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// JSON seed file replacing the built-in defaults
    #[arg(long, global = true)]
    seed: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Directory for rolling log files (defaults to <root>/logs)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the layout, schema and seed data
    Init,

    /// Print fax/email counts for one employee
    Stats {
        employee_id: i64,

        /// Inclusive start date (YYYY-MM-DD); ignored without --to
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Inclusive end date (YYYY-MM-DD); ignored without --from
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Recompute cached counters for one employee, or all when omitted
    RefreshCounts { employee_id: Option<i64> },

    /// Copy the database file; defaults to a timestamped file in backups/
    Backup { path: Option<PathBuf> },

    /// Replace the database file with a copy of PATH
    Restore { path: PathBuf },

    /// List system settings
    Settings,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    let log_dir = cli.log_dir.clone().unwrap_or_else(|| cli.root.join("logs"));
    init_logging(level, &log_dir)?;

    let mut config = StoreConfig::new(&cli.root).map_err(|err| err.to_string())?;
    if let Some(seed) = &cli.seed {
        config = config.with_seed_file(seed).map_err(|err| err.to_string())?;
    }
    let store = CorrespondenceStore::open(config).map_err(|err| err.to_string())?;
    info!(
        "event=cli_command module=cli status=start command={:?} version={}",
        cli.command,
        core_version()
    );

    match cli.command {
        Commands::Init => {
            println!("database={}", store.database_path().display());
            Ok(())
        }
        Commands::Stats {
            employee_id,
            from,
            to,
        } => {
            if let (Some(start), Some(end)) = (from, to) {
                DateRange::new(start, end).map_err(|err| err.to_string())?;
            }
            let stats = store.get_employee_stats(employee_id, DateRange::from_bounds(from, to));
            println!(
                "employee_id={} fax_count={} email_count={} total={}",
                employee_id, stats.fax_count, stats.email_count, stats.total
            );
            Ok(())
        }
        Commands::RefreshCounts { employee_id } => {
            let updated = match employee_id {
                Some(id) => store.update_employee_counts(id),
                None => store.refresh_all_employee_counts(),
            };
            require(updated, "counter refresh failed")?;
            println!("counts refreshed");
            Ok(())
        }
        Commands::Backup { path } => {
            let target = match path {
                Some(path) => {
                    require(store.backup(&path), "backup failed")?;
                    path
                }
                None => store
                    .backup_to_dir()
                    .ok_or_else(|| "backup failed".to_string())?,
            };
            println!("backup={}", target.display());
            Ok(())
        }
        Commands::Restore { path } => {
            require(store.restore(&path), "restore failed")?;
            println!("restored from {}", path.display());
            Ok(())
        }
        Commands::Settings => {
            let settings = store
                .settings()
                .ok_or_else(|| "cannot read settings".to_string())?;
            for setting in settings {
                println!("{}={}", setting.key, setting.value.unwrap_or_default());
            }
            Ok(())
        }
    }
}

fn require(ok: bool, message: &str) -> Result<(), String> {
    if ok {
        Ok(())
    } else {
        Err(format!("{message}; see logs for details"))
    }
}
