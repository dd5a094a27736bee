use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use org_reports::config::{self, Config};
use org_reports::db::{self, Database};
use org_reports::{render, reports};

#[derive(Parser)]
#[command(name = "orgrep")]
#[command(about = "Workforce and project financial reports")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = config::ENV_DATABASE)]
    database: Option<PathBuf>,

    /// Deadline lookback window in months
    #[arg(long, global = true, env = config::ENV_WINDOW_MONTHS)]
    months: Option<u32>,

    /// Minimum assignments (exclusive) for the high-activity report
    #[arg(long, global = true, env = config::ENV_THRESHOLD)]
    threshold: Option<u32>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the schema
    Migrate,
    /// Load the demo dataset into an empty database
    Seed,
    /// Employees with many assignments due inside the window
    HighActivity,
    /// Every assignment due inside the window
    Assignments,
    /// Performance bonuses for all employees
    Bonuses,
    /// Department salary and project budget rollup, both strategies timed
    Rollup,
    /// Run all four reports in order
    All,
}

#[derive(Debug, Clone, Copy)]
enum ReportKind {
    HighActivity,
    Assignments,
    Bonuses,
    Rollup,
}

impl ReportKind {
    const ALL: [ReportKind; 4] = [
        Self::HighActivity,
        Self::Assignments,
        Self::Bonuses,
        Self::Rollup,
    ];

    fn key(&self) -> &'static str {
        match self {
            Self::HighActivity => "high_activity",
            Self::Assignments => "assignments",
            Self::Bonuses => "bonuses",
            Self::Rollup => "rollup",
        }
    }

    fn title(&self, config: &Config) -> String {
        match self {
            Self::HighActivity => format!(
                "Employees with more than {} projects due in the last {} months or later",
                config.threshold,
                config.window.as_months()
            ),
            Self::Assignments => format!(
                "Employee assignments due in the last {} months or later",
                config.window.as_months()
            ),
            Self::Bonuses => "Performance bonuses".to_string(),
            Self::Rollup => "Department financial rollup".to_string(),
        }
    }
}

/// A finished report in both output forms.
struct Rendered {
    json: serde_json::Value,
    text: String,
}

fn rendered<T: serde::Serialize>(value: &T, text: String) -> anyhow::Result<Rendered> {
    Ok(Rendered {
        json: serde_json::to_value(value)?,
        text,
    })
}

fn run_report(kind: ReportKind, db: &Database, config: &Config) -> anyhow::Result<Rendered> {
    let as_of = reports::local_now();
    match kind {
        ReportKind::HighActivity => {
            let rows = reports::high_activity_employees(db, &config.high_activity(as_of))?;
            rendered(&rows, render::render_employees(&rows))
        }
        ReportKind::Assignments => {
            let rows = reports::employee_project_listing(db, &config.assignments(as_of))?;
            rendered(&rows, render::render_assignments(&rows))
        }
        ReportKind::Bonuses => {
            let rows = reports::calculate_bonuses(db)?;
            rendered(&rows, render::render_bonuses(&rows))
        }
        ReportKind::Rollup => {
            let comparison = reports::compare_rollup_strategies(db)?;
            rendered(&comparison, render::render_comparison(&comparison))
        }
    }
}

fn print_single(kind: ReportKind, db: &Database, config: &Config, json: bool) -> anyhow::Result<()> {
    let report = run_report(kind, db, config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report.json)?);
    } else {
        println!("{}", kind.title(config));
        print!("{}", report.text);
    }
    Ok(())
}

/// Each report runs on its own; one failing does not stop the rest.
fn print_all(db: &Database, config: &Config, json: bool) -> anyhow::Result<()> {
    let mut failures = 0;
    let mut documents = serde_json::Map::new();

    for (i, kind) in ReportKind::ALL.iter().enumerate() {
        let result = run_report(*kind, db, config);
        if let Err(e) = &result {
            tracing::error!(report = kind.key(), error = %format!("{:#}", e), "Report failed");
            failures += 1;
        }

        if json {
            let value = match result {
                Ok(report) => report.json,
                Err(e) => serde_json::json!({ "error": format!("{:#}", e) }),
            };
            documents.insert(kind.key().to_string(), value);
        } else {
            if i > 0 {
                println!();
            }
            println!("{}. {}", i + 1, kind.title(config));
            match result {
                Ok(report) => print!("{}", report.text),
                Err(e) => println!("Failed: {:#}", e),
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&documents)?);
    }

    if failures > 0 {
        anyhow::bail!("{} of {} reports failed", failures, ReportKind::ALL.len());
    }
    Ok(())
}

/// Logs go to stderr so stdout carries only report output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "org_reports=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = Config::resolve(cli.database, cli.months, cli.threshold)?;
    tracing::debug!("Using database {}", config.database_path.display());

    let db = Database::open(&config.database_path)?;
    db.migrate()?;

    match cli.command.unwrap_or(Commands::All) {
        Commands::Migrate => {
            println!("Schema is up to date: {}", config.database_path.display());
        }
        Commands::Seed => match db::seed::seed_demo_data(&db, reports::local_now())? {
            db::seed::SeedOutcome::Seeded {
                departments,
                employees,
                projects,
                assignments,
            } => println!(
                "Seeded {} departments, {} employees, {} projects, {} assignments",
                departments, employees, projects, assignments
            ),
            db::seed::SeedOutcome::AlreadyPopulated => {
                println!("Database already has data; nothing seeded")
            }
        },
        Commands::HighActivity => print_single(ReportKind::HighActivity, &db, &config, cli.json)?,
        Commands::Assignments => print_single(ReportKind::Assignments, &db, &config, cli.json)?,
        Commands::Bonuses => print_single(ReportKind::Bonuses, &db, &config, cli.json)?,
        Commands::Rollup => print_single(ReportKind::Rollup, &db, &config, cli.json)?,
        Commands::All => print_all(&db, &config, cli.json)?,
    }

    Ok(())
}
