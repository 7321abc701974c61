mod config;
mod onboard_cmd;
mod plan_cmds;
mod render;
mod suggest_cmd;
mod topic_cmds;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use sqlx::PgPool;

use mentor_core::store::PgStore;
use mentor_db::config::DbConfig;
use mentor_db::pool;

use config::MentorConfig;

#[derive(Parser)]
#[command(name = "mentor", about = "Daily study plans drafted by an LLM and checked by rules")]
struct Cli {
    /// Database URL (overrides MENTOR_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a mentor config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = DbConfig::DEFAULT_URL)]
        db_url: String,
        /// API key for the generative service
        #[arg(long)]
        api_key: Option<String>,
        /// Model name for the generative service
        #[arg(long)]
        model: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Initialize the mentor database (requires config file or env vars)
    DbInit,
    /// Import a profile and syllabus from a TOML file
    Onboard {
        /// Path to the syllabus TOML file
        file: String,
    },
    /// Daily plans
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// List all stored plans
    History,
    /// Syllabus topics
    Topic {
        #[command(subcommand)]
        command: TopicCommands,
    },
    /// Ask for new topics in a subject
    Suggest {
        /// Subject ID to expand
        subject_id: String,
        /// Add every suggestion to the syllabus
        #[arg(long)]
        approve: bool,
    },
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Show today's plan, generating it if needed
    Today {
        /// Regenerate even if a plan exists
        #[arg(long)]
        force: bool,
    },
    /// Preview tomorrow's plan once today's is completed
    Preview,
    /// Show a stored plan (defaults to today)
    Show {
        /// Date as YYYY-MM-DD
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
pub enum TopicCommands {
    /// List topics by subject
    List,
    /// Mark a topic done
    Done {
        /// Topic ID
        id: String,
    },
    /// Toggle the hard mark on a topic
    Hard {
        /// Topic ID
        id: String,
    },
}

/// Execute the `mentor init` command: write config file.
fn cmd_init(
    db_url: &str,
    api_key: Option<String>,
    model: Option<String>,
    force: bool,
) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let has_key = api_key.is_some();
    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
        llm: config::LlmSection {
            api_key,
            model,
            base_url: None,
        },
    };

    config::save_config_to(&path, &cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {}", DbConfig::new(db_url).redacted_url());
    if has_key {
        println!("  llm.api_key = [set]");
    } else {
        println!("  llm.api_key not set; export {} before planning.", config::API_KEY_ENV);
    }
    println!();
    println!("Next: run `mentor db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `mentor db-init` command: create database and run migrations.
async fn cmd_db_init(cli_db_url: Option<&str>) -> anyhow::Result<()> {
    let resolved = MentorConfig::resolve(cli_db_url)?;

    println!("Initializing mentor database...");

    pool::ensure_database_exists(&resolved.db_config).await?;
    let db_pool = pool::create_pool(&resolved.db_config).await?;
    pool::run_migrations(&db_pool).await?;

    let counts = pool::table_counts(&db_pool).await?;
    println!("Database ready. Tables:");
    for (table, count) in &counts {
        println!("  {table}: {count} rows");
    }

    db_pool.close().await;

    println!("mentor db-init complete.");
    Ok(())
}

async fn connect(cli_db_url: Option<&str>) -> anyhow::Result<(MentorConfig, PgPool)> {
    let resolved = MentorConfig::resolve(cli_db_url)?;
    tracing::debug!(
        database = resolved.db_config.database_name().unwrap_or("?"),
        model = %resolved.llm.model,
        "configuration resolved"
    );
    let db_pool = pool::create_pool(&resolved.db_config)
        .await
        .context("failed to connect; has `mentor db-init` been run?")?;
    Ok((resolved, db_pool))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::Init {
            db_url,
            api_key,
            model,
            force,
        } => {
            cmd_init(&db_url, api_key, model, force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::Onboard { file } => {
            let (_, db_pool) = connect(cli.database_url.as_deref()).await?;
            let store = PgStore::new(db_pool.clone());
            let result = onboard_cmd::run_onboard(&store, &file).await;
            db_pool.close().await;
            result?;
        }
        Commands::Plan { command } => {
            let (resolved, db_pool) = connect(cli.database_url.as_deref()).await?;
            let store = PgStore::new(db_pool.clone());
            let result = plan_cmds::run_plan_command(command, &store, &resolved.llm, today).await;
            db_pool.close().await;
            result?;
        }
        Commands::History => {
            let (_, db_pool) = connect(cli.database_url.as_deref()).await?;
            let store = PgStore::new(db_pool.clone());
            let result = plan_cmds::cmd_history(&store).await;
            db_pool.close().await;
            result?;
        }
        Commands::Topic { command } => {
            let (_, db_pool) = connect(cli.database_url.as_deref()).await?;
            let store = PgStore::new(db_pool.clone());
            let result = topic_cmds::run_topic_command(command, &store, today).await;
            db_pool.close().await;
            result?;
        }
        Commands::Suggest {
            subject_id,
            approve,
        } => {
            let (resolved, db_pool) = connect(cli.database_url.as_deref()).await?;
            let store = PgStore::new(db_pool.clone());
            let result = suggest_cmd::run_suggest(&store, &resolved.llm, &subject_id, approve).await;
            db_pool.close().await;
            result?;
        }
    }

    Ok(())
}
