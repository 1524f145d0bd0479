//! Medslot CLI - book, cancel and reschedule doctor appointments

mod logging;
mod output;
mod settings;

use anyhow::{Context, Result};
use chrono::{Days, Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::Colorize;
use medslot_core::application::{
    simulate_preemption, BookingRequest, CancelOutcome, SchedulingEngine,
};
use medslot_core::domain::{BookingId, Priority, ResourceId};
use medslot_core::port::time_provider::SystemTimeProvider;
use medslot_core::AppError;
use medslot_infra_sqlite::{
    create_pool, run_migrations, seed_default_resources, SqliteBookingRepository,
};
use settings::Settings;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "medslot")]
#[command(about = "Priority-aware doctor appointment scheduler", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (default: ./medslot.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides `database_url` from settings
    #[arg(long, global = true, env = "MEDSLOT_DATABASE_URL")]
    database_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List doctors and their working hours
    Doctors,

    /// Book an appointment
    Book {
        /// Doctor ID
        #[arg(short, long)]
        doctor: ResourceId,

        /// Patient name
        #[arg(short, long)]
        name: String,

        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Time slot (H:MM-H:MM)
        #[arg(short, long)]
        slot: String,

        /// emergency | vip | regular
        #[arg(short, long, default_value = "regular")]
        priority: Priority,
    },

    /// Cancel an appointment
    Cancel {
        /// Booking ID
        booking_id: BookingId,
    },

    /// Show active appointments in priority order
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Move an appointment to another date/slot
    Reschedule {
        /// Booking ID
        booking_id: BookingId,

        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// New time slot (H:MM-H:MM)
        #[arg(short, long)]
        slot: String,
    },

    /// Fire REGULAR, REGULAR, VIP, EMERGENCY requests at one slot concurrently
    Simulate {
        /// Doctor ID
        #[arg(short, long, default_value = "1")]
        doctor: ResourceId,

        /// Date (default: tomorrow)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Time slot (H:MM-H:MM)
        #[arg(short, long, default_value = "10:00-10:30")]
        slot: String,

        /// Delay unit between arrivals
        #[arg(long, default_value = "100")]
        stagger_ms: u64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{} Invalid configuration: {}", "✗".red(), e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(url) = cli.database_url.clone() {
        settings.database_url = url;
    }

    logging::init_logging(&settings.log_format);

    match run(cli.command, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<AppError>() {
                Some(app_err) => {
                    eprintln!("{} [{:?}] {}", "✗".red(), app_err.kind(), app_err)
                }
                None => eprintln!("{} {:#}", "✗".red(), e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, settings: &Settings) -> Result<()> {
    let engine = build_engine(settings).await?;

    match command {
        Commands::Doctors => {
            let resources = engine.list_resources().await?;
            println!("{}", output::doctors_table(&resources));
        }

        Commands::Book {
            doctor,
            name,
            date,
            slot,
            priority,
        } => {
            let id = engine
                .book(BookingRequest {
                    resource_id: doctor,
                    requester_name: name,
                    date,
                    slot,
                    priority,
                })
                .await?;

            println!(
                "{} (ID: {}, {})",
                "✓ Appointment booked".green().bold(),
                id,
                output::priority_label(priority)
            );
        }

        Commands::Cancel { booking_id } => match engine.cancel(booking_id).await? {
            CancelOutcome::Cancelled => {
                println!(
                    "{}",
                    format!("✓ Appointment {} cancelled", booking_id).green().bold()
                );
            }
            CancelOutcome::NotActive => {
                println!(
                    "{}",
                    format!("No active appointment with ID {}", booking_id).yellow()
                );
            }
        },

        Commands::List { json } => {
            let bookings = engine.list_active().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&bookings)?);
            } else if bookings.is_empty() {
                println!("{}", "No active appointments".yellow());
            } else {
                let resources = engine.list_resources().await?;
                println!("{}", "Active appointments (priority queue)".cyan().bold());
                println!("{}", output::bookings_table(&bookings, &resources));
            }
        }

        Commands::Reschedule {
            booking_id,
            date,
            slot,
        } => {
            let booking = engine.reschedule(booking_id, date, &slot).await?;
            println!(
                "{}",
                format!(
                    "✓ Appointment {} moved to {} {}",
                    booking.id, booking.date, booking.slot
                )
                .green()
                .bold()
            );
        }

        Commands::Simulate {
            doctor,
            date,
            slot,
            stagger_ms,
        } => {
            let date = match date {
                Some(date) => date,
                None => Local::now()
                    .date_naive()
                    .checked_add_days(Days::new(1))
                    .context("Date out of range")?,
            };

            println!(
                "{}",
                format!("Simulating concurrent bookings for {} {}", date, slot)
                    .cyan()
                    .bold()
            );

            let report = simulate_preemption(
                Arc::clone(&engine),
                doctor,
                date,
                &slot,
                Duration::from_millis(stagger_ms),
            )
            .await?;

            for attempt in &report.attempts {
                match &attempt.outcome {
                    Ok(id) => println!(
                        "  {} {} ({}) booked as {}",
                        "✓".green(),
                        attempt.requester_name,
                        output::priority_label(attempt.priority),
                        id
                    ),
                    Err(e) => println!(
                        "  {} {} ({}) rejected: {}",
                        "✗".red(),
                        attempt.requester_name,
                        output::priority_label(attempt.priority),
                        e
                    ),
                }
            }

            println!();
            let resources = engine.list_resources().await?;
            println!("{}", output::bookings_table(&report.active, &resources));
        }
    }

    Ok(())
}

async fn build_engine(settings: &Settings) -> Result<Arc<SchedulingEngine>> {
    let database_url = settings.resolved_database_url();

    if let Some(dir) = settings.database_dir() {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    info!(database_url = %database_url, "Opening database");
    let pool = create_pool(&database_url)
        .await
        .context("DB pool creation failed")?;
    run_migrations(&pool).await.context("Migration failed")?;
    seed_default_resources(&pool).await?;

    let repo = Arc::new(SqliteBookingRepository::new(pool));
    Ok(Arc::new(SchedulingEngine::new(
        repo,
        Arc::new(SystemTimeProvider),
        settings.engine_config(),
    )))
}
