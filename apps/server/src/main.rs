mod demo;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use eventdesk_api::{build_router, AppState};
use eventdesk_config::load as load_config;
use eventdesk_database::{load_overview, EventFilter, EventRepository, Page};
use eventdesk_runtime::{telemetry, BackendServices};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "eventdesk")]
#[command(about = "EventDesk back office (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Insert a demo event with participants, staff, budget and agenda
    SeedDemo,
    /// Print the overview of every event
    Summary,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing().context("failed to initialise tracing")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::Migrate => migrate().await,
        Commands::SeedDemo => seed_demo().await,
        Commands::Summary => summary().await,
    }
}

async fn initialise() -> anyhow::Result<(eventdesk_config::AppConfig, BackendServices)> {
    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    Ok((config, services))
}

async fn run_server() -> anyhow::Result<()> {
    info!("starting EventDesk backend");

    let (config, services) = initialise().await?;
    if !config.auth.is_enforced() {
        warn!("no api tokens configured, the HTTP API is open to every caller");
    }

    let state = AppState::new(services.db_pool.clone(), config.auth.clone(), &config.cache);
    let app = build_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(eventdesk_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    services.close().await;
    info!("backend shut down");
    Ok(())
}

async fn migrate() -> anyhow::Result<()> {
    let (config, services) = initialise().await?;

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(&services.db_pool)
        .await
        .context("failed to count applied migrations")?;

    println!("Database {} is up to date ({applied} migrations applied)", config.database.url);
    services.close().await;
    Ok(())
}

async fn seed_demo() -> anyhow::Result<()> {
    let (_, services) = initialise().await?;

    match demo::seed(&services.db_pool, Utc::now().date_naive()).await? {
        Some(report) => {
            println!("Seeded demo event {} ({})", report.event_name, report.event_id);
            println!("- {} participants", report.participants);
            println!("- {} speakers", report.speakers);
            println!("- {} sponsors", report.sponsors);
            println!("- {} staff assignments", report.assignments);
            println!("- {} budget items", report.budget_items);
            println!("- {} agenda sessions", report.sessions);
            println!("Run 'summary' to see the event overview");
        }
        None => println!("Demo event already exists, nothing to do"),
    }

    services.close().await;
    Ok(())
}

async fn summary() -> anyhow::Result<()> {
    let (_, services) = initialise().await?;
    let today = Utc::now().date_naive();

    let events = EventRepository::new(services.db_pool.clone())
        .list(&EventFilter {
            page: Page::new(Some(Page::MAX_LIMIT), None),
            ..Default::default()
        })
        .await
        .context("failed to list events")?;

    if events.is_empty() {
        println!("No events found in database");
        services.close().await;
        return Ok(());
    }

    println!("Found {} events:", events.len());
    println!(
        "{:<30} {:<10} {:<12} {:>8} {:>10} {:>14} {:>14} {:>14} {:>9}",
        "Name",
        "Status",
        "Starts",
        "People",
        "Waitlist",
        "Budget left",
        "Staff cost",
        "Overdue pay",
        "Sessions"
    );
    println!("{}", "-".repeat(130));

    for event in events {
        let overview = load_overview(&services.db_pool, event, today)
            .await
            .context("failed to load event overview")?;

        println!(
            "{:<30} {:<10} {:<12} {:>8} {:>10} {:>14} {:>14} {:>14} {:>9}",
            truncate(&overview.event.name, 30),
            overview.effective_status.to_string(),
            overview.event.start_date,
            overview.participants.total,
            overview.participants.waitlisted,
            format_cents(overview.budget.remaining_cents),
            format_cents(overview.staff_costs.total_cents),
            format_cents(overview.staff_costs.overdue_cents),
            overview.session_count
        );

        if let Some(next) = overview.upcoming_deadlines.first() {
            println!("    next deadline: {} ({}, {})", next.title, next.due_date, next.status);
        }
    }

    services.close().await;
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width - 3).collect();
    format!("{kept}...")
}

fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{sign}{}.{:02}", cents / 100, cents % 100)
}
