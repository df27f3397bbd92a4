use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use opelle_migrate::config::AppConfig;
use opelle_migrate::executor::SqlExecutor;
use opelle_migrate::instructions::INSTRUCTIONS;
use opelle_migrate::schema::{self, analysis};

#[derive(Parser)]
#[command(name = "opelle-migrate")]
#[command(about = "Opelle database migration helper")]
struct Cli {
    /// Configuration file (defaults to ./opelle-migrate.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the migration as a single SQL script
    Sql,
    /// Verify statement ordering without touching the network
    Check,
    /// Submit every statement to the exec_sql RPC endpoint
    Apply,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // stdout carries program output only
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "opelle_migrate=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        None => print!("{}", INSTRUCTIONS),
        Some(Commands::Sql) => print!("{}", schema::render_script(&schema::statements())),
        Some(Commands::Check) => {
            let statements = schema::statements();
            match analysis::verify(&statements) {
                Ok(summary) => {
                    println!(
                        "{} statements, {} tables, external references: {}",
                        summary.statements,
                        summary.tables,
                        summary.external_references.join(", ")
                    );
                }
                Err(e) => {
                    error!("Schema check failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Apply) => {
            let config = AppConfig::load(cli.config.as_deref())?;
            let statements = schema::statements();
            analysis::verify(&statements)?;

            let executor = SqlExecutor::new(config.supabase_url.clone(), config.require_service_key()?);
            info!("Applying {} statements via {}", statements.len(), executor.endpoint());

            let report = executor.apply(&statements).await;
            for failure in &report.failed {
                println!("Statement {}: {}", failure.index, failure.error);
            }
            if !report.is_success() {
                error!(
                    "{} of {} statements failed",
                    report.failed.len(),
                    report.total()
                );
                std::process::exit(1);
            }
            println!("Applied {} statements", report.succeeded.len());
        }
    }

    Ok(())
}
