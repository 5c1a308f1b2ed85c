//! CLI smoke and maintenance entry point.
//!
//! # Responsibility
//! - Verify `spycat_core` linkage without the HTTP server.
//! - Migrate or seed a database file and print row counts.
//! - Keep output deterministic `key=value` lines for scripting.

use clap::{Parser, Subcommand};
use log::info;
use rusqlite::Connection;
use spycat_core::db::migrations::current_user_version;
use spycat_core::{default_log_level, init_logging, open_db, seed_demo_data, MissionService};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "spycat_cli", version, about = "Spy Cat Agency maintenance tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// SQLite database file
    #[arg(long, global = true, env = "SPYCAT_DB_PATH", default_value = "spycat.sqlite3")]
    db: PathBuf,

    /// Absolute log directory; logging stays off when omitted
    #[arg(long, global = true, env = "SPYCAT_LOG_DIR")]
    log_dir: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Print core liveness check
    Ping,
    /// Print core version
    Version,
    /// Open the database and apply pending migrations
    Migrate,
    /// Replace all rows with the demo data set
    Seed,
    /// Print row counts
    Stats,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Some(log_dir) = cli.log_dir.as_deref() {
        if let Err(err) = init_logging(default_log_level(), log_dir, false) {
            eprintln!("error={err}");
            return ExitCode::FAILURE;
        }
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error={err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Ping => println!("spycat_core ping={}", spycat_core::ping()),
        Command::Version => println!("spycat_core version={}", spycat_core::core_version()),
        Command::Migrate => {
            let conn = open_db(&cli.db)?;
            println!("schema_version={}", current_user_version(&conn)?);
        }
        Command::Seed => {
            let mut conn = open_db(&cli.db)?;
            let summary = seed_demo_data(&mut conn)?;
            info!(
                "event=cli_seed module=cli status=ok db={}",
                cli.db.display()
            );
            println!(
                "seeded cats={} missions={} targets={}",
                summary.cats, summary.missions, summary.targets
            );
        }
        Command::Stats => {
            let mut conn = open_db(&cli.db)?;
            print_stats(&mut conn)?;
        }
    }
    Ok(())
}

fn print_stats(conn: &mut Connection) -> Result<(), Box<dyn std::error::Error>> {
    let cats: i64 = conn.query_row("SELECT COUNT(*) FROM spy_cats;", [], |row| row.get(0))?;
    let service = MissionService::new(conn);
    let missions = service.list_missions()?;
    let completed = missions.iter().filter(|mission| mission.is_completed).count();
    let targets: usize = missions.iter().map(|mission| mission.targets.len()).sum();
    let free = service.free_cats()?.len();

    println!("cats={cats} free_cats={free}");
    println!(
        "missions={} completed_missions={completed} targets={targets}",
        missions.len()
    );
    Ok(())
}
