//! Areasearch CLI - export the artists of an area as CSV and XML
//!
//! # Main Commands
//!
//! ```bash
//! areasearch search Toronto                 # artists.csv + artists.xml
//! areasearch search "New York" --limit 25   # multi-word areas need quotes
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! areasearch export response.json   # Run the pipeline on a saved search response
//! areasearch inspect artists.xml    # Print the artists of a tree document
//! areasearch name "Oslo"            # Show the name rewrite
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use areasearch::{
    parse_tree, read_raw_artists, transform_name, MusicBrainzClient, Pipeline, PipelineConfig,
    PipelineReport, SearchConfig, SearchError, StageOutcome, TableQuoting,
};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "areasearch")]
#[command(about = "Export MusicBrainz artists of an area as CSV and XML", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Quoting {
    /// `name, id, "tag1, tag2"`, no escaping
    Verbatim,
    /// Standard CSV quoting
    Rfc4180,
}

impl From<Quoting> for TableQuoting {
    fn from(quoting: Quoting) -> Self {
        match quoting {
            Quoting::Verbatim => TableQuoting::Verbatim,
            Quoting::Rfc4180 => TableQuoting::Rfc4180,
        }
    }
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Table output file
    #[arg(long, default_value = "artists.csv")]
    table: PathBuf,

    /// Tree output file
    #[arg(long, default_value = "artists.xml")]
    tree: PathBuf,

    /// Table quoting style
    #[arg(long, value_enum, default_value = "verbatim")]
    quoting: Quoting,
}

impl OutputArgs {
    fn config(&self) -> PipelineConfig {
        PipelineConfig::new(&self.table, &self.tree).with_quoting(self.quoting.into())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Search MusicBrainz for artists of an area and export them
    Search {
        /// Area name (enclose multi-word names in quotes)
        area: String,

        /// Number of artists to request
        #[arg(short, long)]
        limit: Option<u32>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Run the export pipeline on a saved search response (JSON)
    Export {
        /// Saved response body or JSON array of artists
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the artists of an exported XML document
    Inspect {
        /// XML file produced by `search` or `export`
        input: PathBuf,
    },

    /// Show the transformed form of an artist name
    Name {
        text: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Search { area, limit, output } => cmd_search(&area, limit, &output).await,
        Commands::Export { input, output } => cmd_export(&input, &output),
        Commands::Inspect { input } => cmd_inspect(&input),
        Commands::Name { text } => {
            println!("{}", transform_name(&text));
            Ok(true)
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when a stage failed after the search succeeded.
async fn cmd_search(
    area: &str,
    limit: Option<u32>,
    output: &OutputArgs,
) -> Result<bool, Box<dyn std::error::Error>> {
    if area.trim().is_empty() {
        return Err(
            "Please include a search term or enclose multiple word search terms in quotations"
                .into(),
        );
    }

    let mut search_config = SearchConfig::from_env();
    if let Some(limit) = limit {
        search_config = search_config.with_limit(limit);
    }
    let client = MusicBrainzClient::new(search_config)?;
    let pipeline = Pipeline::new(output.config());

    match pipeline.search_and_run(&client, area).await {
        Ok(report) => Ok(print_report(&report)),
        Err(SearchError::Transport { status, reason }) => {
            // Status line only, like the service reported it
            println!("{} {}", status, reason);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_export(input: &Path, output: &OutputArgs) -> Result<bool, Box<dyn std::error::Error>> {
    eprintln!("📄 Reading: {}", input.display());
    let raw = read_raw_artists(input)?;
    let report = Pipeline::new(output.config()).run(&raw);
    Ok(print_report(&report))
}

fn cmd_inspect(input: &Path) -> Result<bool, Box<dyn std::error::Error>> {
    let xml = fs::read_to_string(input)?;
    let nodes = parse_tree(&xml)?;

    eprintln!("🌳 {} artists in {}\n", nodes.len(), input.display());
    for node in &nodes {
        println!("  {} ({})", node.name(), node.id());
        if !node.tags().is_empty() {
            println!("     Tags: {}", node.tags().join(", "));
        }
    }
    Ok(true)
}

/// Print one line per stage; returns true when everything succeeded.
fn print_report(report: &PipelineReport) -> bool {
    if let StageOutcome::Failed(err) = &report.build {
        println!("Unable to build artist records: {}", err);
        return false;
    }

    match &report.table {
        StageOutcome::Succeeded(_) => println!("CSV file created"),
        StageOutcome::Failed(err) => println!("Unable to create/open CSV file: {}", err),
        StageOutcome::Skipped => {}
    }
    match &report.tree {
        StageOutcome::Succeeded(_) => println!("XML file created"),
        StageOutcome::Failed(err) => println!("Unable to create/open XML file: {}", err),
        StageOutcome::Skipped => {}
    }

    report.is_success()
}
