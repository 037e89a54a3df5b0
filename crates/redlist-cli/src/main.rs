//! redlist - command-line access to the IUCN Red List API
//!
//! Results are written to stdout as JSON; page progress and logs go to
//! stderr so output can be piped.

mod config;
mod error;

use std::io::Write;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use redlist_api::{options, AssessmentQuery, Parsed, Rank, RedListClient, Vocabulary};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::Config;
use crate::error::{CliError, Result};

#[derive(Parser, Debug)]
#[command(name = "redlist", version, about = "Query the IUCN Red List of Threatened Species")]
struct Cli {
    /// API key; overrides IUCN_REDLIST_KEY and the stored key
    #[arg(long, global = true)]
    key: Option<String>,

    /// Flatten arrays of records into tables
    #[arg(long, global = true)]
    flat: bool,

    #[command(subcommand)]
    command: Command,
}

/// Filters shared by every assessment-listing command
#[derive(Args, Debug, Default)]
struct Listing {
    /// Fetch only this page instead of all pages
    #[arg(long)]
    page: Option<u32>,

    /// Only assessments published in this year
    #[arg(long)]
    year: Option<u32>,

    /// Only the latest assessment of each taxon
    #[arg(long)]
    latest: bool,

    /// Assessment scope code, e.g. 1 for global
    #[arg(long)]
    scope: Option<String>,

    /// Suppress page progress dots
    #[arg(long, short)]
    quiet: bool,
}

impl Listing {
    fn to_query(&self, flatten: bool) -> AssessmentQuery {
        let mut q = AssessmentQuery::new()
            .with_quiet(self.quiet)
            .with_flatten(flatten);
        if let Some(page) = self.page {
            q = q.with_page(page);
        }
        if let Some(year) = self.year {
            q = q.with_year_published(year);
        }
        if self.latest {
            q = q.with_latest(true);
        }
        if let Some(scope) = &self.scope {
            q = q.with_scope_code(scope);
        }
        q
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Taxon and assessment summary for a species
    Species {
        genus: String,
        species: String,
        #[arg(long)]
        infra: Option<String>,
        #[arg(long)]
        subpopulation: Option<String>,
        /// Fetch the full latest assessment instead of the summary
        #[arg(long)]
        latest_assessment: bool,
    },
    /// Taxon by SIS id
    Sis { id: u64 },
    /// One or more assessments by id
    Assessment {
        #[arg(required = true)]
        ids: Vec<u64>,
        /// Print only this element of each assessment, e.g. taxon__scientific_name
        #[arg(long)]
        extract: Option<String>,
    },
    /// Assessments under a kingdom, phylum, class, order or family
    Taxa {
        rank: String,
        name: String,
        #[command(flatten)]
        listing: Listing,
    },
    /// Codes of a classification scheme, or the assessments under one code
    Codes {
        vocabulary: String,
        code: Option<String>,
        #[command(flatten)]
        listing: Listing,
    },
    /// Possibly extinct species
    Extinct {
        /// Possibly extinct in the wild instead
        #[arg(long)]
        wild: bool,
        #[command(flatten)]
        listing: Listing,
    },
    /// Current Red List version
    Version,
    /// API version
    ApiVersion,
    /// Species counts
    Count,
    /// Recommended citation
    Citation,
    /// Store an API key in the options file
    SetKey { key: String },
}

enum Output {
    Json(Value),
    Text(String),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await.and_then(print) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e, &mut std::io::stderr().lock()),
    }
}

/// Print the failure once to `out` and pick the exit status
fn report(err: &CliError, out: &mut impl Write) -> ExitCode {
    let _ = writeln!(out, "Error: {}", err);
    ExitCode::from(err.exit_code())
}

fn init_tracing() -> Result<()> {
    let env_filter = EnvFilter::from_default_env().add_directive("redlist=warn".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<Output> {
    let config = Config::from_env()?;
    let client = RedListClient::with_config(config.client_config(cli.key.as_deref()))?;
    let flatten = cli.flat;
    debug!(command = ?cli.command, "Running");

    let output = match cli.command {
        Command::Species {
            genus,
            species,
            infra,
            subpopulation,
            latest_assessment,
        } => {
            let parsed = if latest_assessment {
                client
                    .species_latest(&genus, &species, infra.as_deref(), subpopulation.as_deref(), flatten)
                    .await?
            } else {
                client
                    .species(&genus, &species, infra.as_deref(), subpopulation.as_deref(), flatten)
                    .await?
            };
            json(&parsed)?
        }
        Command::Sis { id } => json(&client.sis(id, flatten).await?)?,
        Command::Assessment { ids, extract } => {
            let assessments = client.assessment_list(&ids, flatten).await?;
            match extract {
                Some(path) => Output::Json(Value::Array(redlist_api::extract(&assessments, &path)?)),
                None => Output::Json(serde_json::to_value(&assessments)?),
            }
        }
        Command::Taxa {
            rank,
            name,
            listing,
        } => {
            let rank: Rank = rank.parse()?;
            json(&client.taxa(rank, &name, &listing.to_query(flatten)).await?)?
        }
        Command::Codes {
            vocabulary,
            code,
            listing,
        } => {
            let vocabulary: Vocabulary = vocabulary.parse()?;
            let q = listing.to_query(flatten);
            json(&client.codes(vocabulary, code.as_deref(), &q).await?)?
        }
        Command::Extinct { wild, listing } => {
            let q = listing.to_query(flatten);
            let parsed = if wild {
                client.possibly_extinct_in_the_wild(&q).await?
            } else {
                client.possibly_extinct(&q).await?
            };
            json(&parsed)?
        }
        Command::Version => Output::Text(client.red_list_version().await?),
        Command::ApiVersion => Output::Text(client.api_version().await?),
        Command::Count => Output::Json(client.species_count().await?),
        Command::Citation => Output::Text(client.citation().await?),
        Command::SetKey { key } => {
            let path = client
                .config()
                .options_path
                .clone()
                .or_else(options::default_path)
                .ok_or_else(|| {
                    CliError::Config(format!(
                        "no options file location; set {}",
                        options::OPTIONS_ENV_VAR
                    ))
                })?;
            options::store_key(&path, &key)?;
            Output::Text(format!("Key stored in {}", path.display()))
        }
    };

    Ok(output)
}

fn json(parsed: &Parsed) -> Result<Output> {
    Ok(Output::Json(serde_json::to_value(parsed)?))
}

fn print(output: Output) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    match output {
        Output::Json(value) => {
            serde_json::to_writer_pretty(&mut stdout, &value)?;
            writeln!(stdout)?;
        }
        Output::Text(text) => writeln!(stdout, "{}", text)?,
    }
    Ok(())
}
