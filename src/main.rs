// src/main.rs

//! Tenure application search CLI.
//!
//! Local entry point for counting, listing and inspecting crown-land
//! tenure applications through the public registry API.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};

use tenure_search::config::Config;
use tenure_search::error::Result;
use tenure_search::models::{CommentPeriodState, FilterSelection, PurposeGroup, StatusGroup};
use tenure_search::query::MapBounds;
use tenure_search::services::{ApplicationDetail, HttpGateway, SearchController};

/// Crown-land tenure application search
#[derive(Parser, Debug)]
#[command(name = "tenure-search", version, about = "Crown-land tenure application search")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, default_value = "tenure-search.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count applications matching the filters
    Count {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Fetch all applications matching the filters
    Search {
        #[command(flatten)]
        filters: FilterArgs,

        /// Emit records as JSON instead of summary lines
        #[arg(long)]
        json: bool,
    },

    /// Show one application with its comment period
    Show {
        /// Application record id
        id: String,
    },

    /// Validate the configuration file
    Validate,
}

/// Filter dimensions shared by the count and search commands.
#[derive(Args, Debug)]
struct FilterArgs {
    /// Crown-land file number or disposition id
    #[arg(long)]
    file: Option<String>,

    /// Earliest publish date (YYYY-MM-DD, inclusive)
    #[arg(long)]
    publish_from: Option<NaiveDate>,

    /// Latest publish date (YYYY-MM-DD, inclusive)
    #[arg(long)]
    publish_to: Option<NaiveDate>,

    /// Application status group (repeatable)
    #[arg(long = "status")]
    statuses: Vec<StatusGroup>,

    /// Purpose group (repeatable)
    #[arg(long = "purpose")]
    purposes: Vec<PurposeGroup>,

    /// Comment period state (repeatable)
    #[arg(long = "comment-period")]
    cp_states: Vec<CommentPeriodState>,

    /// Map viewport as west,south,east,north
    #[arg(long)]
    bounds: Option<MapBounds>,
}

impl FilterArgs {
    fn selection(&self) -> FilterSelection {
        FilterSelection {
            clid_dtid: self.file.clone(),
            publish_from: self.publish_from,
            publish_to: self.publish_to,
            cp_states: self.cp_states.iter().copied().collect::<BTreeSet<_>>(),
            statuses: self.statuses.iter().copied().collect::<BTreeSet<_>>(),
            purposes: self.purposes.iter().copied().collect::<BTreeSet<_>>(),
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    config.validate()?;

    let gateway = Arc::new(HttpGateway::new(&config.api)?);

    match cli.command {
        Command::Count { filters } => {
            let controller = SearchController::new(gateway, config.search.page_size);
            let selection = filters.selection();
            let total = controller
                .search()
                .count(&selection, filters.bounds.as_ref())
                .await?;
            println!("{total}");
        }

        Command::Search { filters, json } => {
            let controller = SearchController::new(gateway, config.search.page_size);
            let selection = filters.selection();

            let records = controller
                .run(&selection, filters.bounds.as_ref(), |accumulated| {
                    log::info!("{} records so far", accumulated.len());
                })
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for record in &records {
                    println!(
                        "{}  {}  {}  {}",
                        record.cl_file_display().unwrap_or_else(|| "-".repeat(7)),
                        record.status_string_long(),
                        record.purpose.as_deref().unwrap_or("-"),
                        record.applicants().as_deref().unwrap_or("-"),
                    );
                }
                log::info!("{} records", records.len());
            }
        }

        Command::Show { id } => {
            let detail = ApplicationDetail::new(gateway);
            match detail.get(&id, false, Utc::now()).await? {
                Some(app) => println!("{}", serde_json::to_string_pretty(&app)?),
                None => {
                    log::warn!("No application found with id {id}");
                    std::process::exit(1);
                }
            }
        }

        Command::Validate => {
            let loaded = Config::load(&cli.config)?;
            loaded.validate()?;
            println!("Configuration OK");
        }
    }

    Ok(())
}
