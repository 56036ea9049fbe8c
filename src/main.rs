use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

mod advisor;
mod cumulative;
mod db;
mod history;
mod honors;
mod models;
mod pipeline;
mod probability;
mod projection;
mod report;
mod target;
mod trend;

use models::AcademicLevel;

#[derive(Parser)]
#[command(name = "grade-tracker")]
#[command(about = "IPK calculator and Cumlaude projection", long_about = None)]
struct Cli {
    /// Key the semester history is stored under
    #[arg(
        long,
        global = true,
        env = "GRADE_TRACKER_NAMESPACE",
        default_value = db::DEFAULT_NAMESPACE
    )]
    namespace: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Store a realistic sample history
    Seed,
    /// Replace the semesters with rows from a CSV file (ips,sks)
    Import {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        level: Option<String>,
    },
    /// Append a semester
    Add {
        #[arg(long)]
        ips: Option<f64>,
        #[arg(long)]
        sks: Option<f64>,
    },
    /// Update a semester in place
    Set {
        semester: usize,
        #[arg(long)]
        ips: Option<f64>,
        #[arg(long)]
        sks: Option<f64>,
    },
    /// Remove a semester and renumber the ones after it
    Remove { semester: usize },
    /// Remove the last semester
    Pop,
    /// Change the academic level (D3, S1, S2, S3)
    Level {
        level: String,
        /// Start over with a single blank semester
        #[arg(long)]
        reset: bool,
    },
    /// Recalculate IPK, trend, target and Cumlaude chance
    Analyze {
        #[arg(long)]
        json: bool,
    },
    /// Required IPS for an arbitrary target IPK
    Simulate {
        #[arg(long)]
        target: f64,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Ask the rule-based advisor a question
    Ask { question: Vec<String> },
    /// Write the stored history as JSON
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete the stored history
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let namespace = cli.namespace.as_str();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let history = db::seed(&pool, namespace).await?;
            println!(
                "Seeded {} semesters into {namespace}.",
                history.semesters.len()
            );
        }
        Commands::Import { csv, level } => {
            let level = level.as_deref().map(AcademicLevel::parse);
            let imported = db::import_csv(&pool, namespace, &csv, level).await?;
            println!("Imported {imported} semesters from {}.", csv.display());
        }
        Commands::Add { ips, sks } => {
            let mut history = db::load_history(&pool, namespace).await?.history;
            let number = history.add_semester(ips, sks);
            db::commit_history(&pool, namespace, &history).await?;
            println!("Added semester {number}.");
        }
        Commands::Set { semester, ips, sks } => {
            let mut history = db::load_history(&pool, namespace).await?.history;
            history.update_semester(semester, ips, sks)?;
            db::commit_history(&pool, namespace, &history).await?;
            println!("Updated semester {semester}.");
        }
        Commands::Remove { semester } => {
            let mut history = db::load_history(&pool, namespace).await?.history;
            history.remove_semester(semester)?;
            db::commit_history(&pool, namespace, &history).await?;
            println!(
                "Removed semester {semester}; {} semesters remain.",
                history.semester_count()
            );
        }
        Commands::Pop => {
            let mut history = db::load_history(&pool, namespace).await?.history;
            if history.pop_semester().is_none() {
                println!("No semesters to remove.");
                return Ok(());
            }
            db::commit_history(&pool, namespace, &history).await?;
            println!("Removed semester {}.", history.semester_count() + 1);
        }
        Commands::Level { level, reset } => {
            let level = AcademicLevel::parse(&level);
            if let AcademicLevel::Unrecognized(token) = &level {
                warn!(token = %token, "unrecognized academic level, using fallback thresholds");
            }
            let mut history = db::load_history(&pool, namespace).await?.history;
            history.set_level(level, reset);
            db::commit_history(&pool, namespace, &history).await?;
            println!(
                "Level set to {} ({} standard semesters).",
                history.jenjang,
                history.jenjang.standard_semesters()
            );
        }
        Commands::Analyze { json } => {
            let history = db::load_history(&pool, namespace).await?.history;
            let analysis = pipeline::analyze(&history);
            info!(
                namespace,
                semesters = history.semester_count(),
                probability = analysis.probability,
                "analysis complete"
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
                return Ok(());
            }

            println!("Total IPK: {:.2}", analysis.snapshot.current_average);
            println!(
                "Predikat: {} (Cumlaude target: {:.2})",
                analysis.classification.tier.label(),
                analysis.classification.target
            );
            println!("{}", analysis.outcome.message());
            println!("Cumlaude chance ~ {}%", analysis.probability);
            for insight in analysis.insights() {
                println!("- {insight}");
            }
            if !analysis.projection.values.is_empty() {
                let points: Vec<String> = analysis
                    .projection
                    .labels
                    .iter()
                    .zip(analysis.projection.values.iter())
                    .map(|(label, value)| format!("{label} {value:.3}"))
                    .collect();
                println!("Projection: {}", points.join(", "));
            }
        }
        Commands::Simulate { target: goal } => {
            let history = db::load_history(&pool, namespace).await?.history;
            let snapshot = cumulative::cumulative_snapshot(&history.semesters);
            let simulation = target::simulate(
                &snapshot,
                history.semester_count(),
                history.jenjang.remaining_semesters(history.semester_count()),
                goal,
            );
            println!("{}", simulation.message());
        }
        Commands::Report { out } => {
            let stored = db::load_history(&pool, namespace).await?;
            let analysis = pipeline::analyze(&stored.history);
            let report = report::build_report(
                namespace,
                &stored.history,
                &analysis,
                chrono::Utc::now(),
                stored.updated_at,
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Ask { question } => {
            let history = db::load_history(&pool, namespace).await?.history;
            let analysis = pipeline::analyze(&history);
            println!("{}", advisor::answer(&question.join(" "), &analysis));
        }
        Commands::Export { out } => {
            let history = db::load_history(&pool, namespace).await?.history;
            let json = serde_json::to_string_pretty(&history)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("History written to {}.", path.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::Reset => {
            if db::delete_history(&pool, namespace).await? {
                println!("History for {namespace} deleted.");
            } else {
                println!("Nothing stored for {namespace}.");
            }
        }
    }

    Ok(())
}
