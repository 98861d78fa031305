use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ac_cli::commands::{catalog, complete, events, import, register, report, students};
use ac_cli::{Cli, Commands, Config, EventsAction, StudentsAction};
use ac_core::RawFilter;

/// Load config and open the store, ensuring the parent directory exists.
fn open_store(config_path: Option<&Path>) -> Result<(ac_db::Store, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let store = ac_db::Store::open(&config.database_path).context("failed to open database")?;
    Ok((store, config))
}

#[expect(
    clippy::too_many_lines,
    reason = "CLI command dispatch is inherently verbose"
)]
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match cli.command {
        Some(Commands::Catalog { policy, json }) => {
            catalog::run(policy, json)?;
        }
        Some(Commands::Register {
            name,
            start,
            end,
            duration,
            category,
            responsible,
            description,
        }) => {
            let (store, _config) = open_store(cli.config.as_deref())?;
            register::run(
                &store,
                register::RegisterArgs {
                    name,
                    start,
                    end,
                    duration,
                    category,
                    responsible,
                    description,
                },
            )?;
        }
        Some(Commands::Import { dir }) => {
            let (store, _config) = open_store(cli.config.as_deref())?;
            import::run(&store, &dir)?;
        }
        Some(Commands::Complete {
            student,
            activity,
            proof,
            date,
        }) => {
            let (store, _config) = open_store(cli.config.as_deref())?;
            complete::run(&store, &student, activity, proof, date.as_deref())?;
        }
        Some(Commands::Events { action }) => {
            let (store, _config) = open_store(cli.config.as_deref())?;
            match action {
                EventsAction::Search {
                    search,
                    after,
                    before,
                    location,
                    min_hours,
                    max_hours,
                    categories,
                    exclude_categories,
                    policy,
                    json,
                } => {
                    let raw = RawFilter {
                        search_term: search,
                        start_date: after,
                        end_date: before,
                        location,
                        min_hours,
                        max_hours,
                        categories,
                        exclude_categories,
                        policy,
                    };
                    events::run(&store, raw, json)?;
                }
                EventsAction::Add {
                    slug,
                    name,
                    description,
                    location,
                    start,
                    end,
                    activity_ids,
                } => {
                    events::add(
                        &store,
                        events::AddEventArgs {
                            slug,
                            name,
                            description,
                            location,
                            start,
                            end,
                            activity_ids,
                        },
                    )?;
                }
            }
        }
        Some(Commands::Report {
            student,
            policy,
            json,
        }) => {
            let (store, _config) = open_store(cli.config.as_deref())?;
            report::run(&store, &student, policy, json)?;
        }
        Some(Commands::Students { action }) => {
            let (store, _config) = open_store(cli.config.as_deref())?;
            match action {
                StudentsAction::List { json } => students::list(&store, json)?,
                StudentsAction::Add {
                    name,
                    registration,
                    email,
                    policy,
                } => students::add(&store, name, registration, email, policy)?,
            }
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
