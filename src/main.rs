use clap::{Parser, Subcommand};
use scoregen::cli;
use scoregen::cli::commands::parse_marker_spec;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scoregen")]
#[command(about = "Linked scoring spreadsheets for scored competitions.")]
#[command(long_about = "Scoregen - Competition scoring-sheet generator

Generates one overview spreadsheet per competition plus a private scoring
spreadsheet per juror, cross-referenced with live formulas.

COMMANDS:
  validate   - Check competition definition files
  show       - Print one competition definition
  list       - List stored competition files
  simulate   - Run the whole generation pipeline in memory

EXAMPLES:
  scoregen validate competitions/Demo.json
  scoregen show competitions/Demo.json
  scoregen simulate competitions/Demo.json --marker 5:C --marker 12:B

Docs: https://github.com/royalbit/scoregen")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Validate competition definition files.

Checks every invariant a competition must hold before generation:
a non-empty name, a template sheet id, at least one juror and one
contestant, no blank names, juror weights between 0 and 100.")]
    /// Validate competition definition files
    Validate {
        /// Path to competition JSON file(s)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print one competition definition
    Show {
        /// Path to a competition JSON file
        file: PathBuf,
    },

    /// List stored competition files
    List {
        /// Competitions directory
        #[arg(short, long, default_value = "competitions")]
        dir: PathBuf,
    },

    #[command(long_about = "Run the whole generation pipeline in memory.

Seeds an in-memory backend with a synthetic 'Board' template, runs every
pipeline stage against it and prints the progress log plus a report of the
documents and sheets a real run would produce. Marker rows of the synthetic
template are set with --marker ROW:ENDCOL (repeatable).")]
    /// Run the whole generation pipeline in memory
    Simulate {
        /// Path to a competition JSON file
        file: PathBuf,

        /// Template marker rows, e.g. 5:C (repeatable)
        #[arg(short, long = "marker", value_parser = parse_marker_spec, default_values = ["5:C"])]
        markers: Vec<(u32, String)>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scoregen=warn".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Validate { files } => cli::validate(files)?,
        Commands::Show { file } => cli::show(file)?,
        Commands::List { dir } => cli::list(dir)?,
        Commands::Simulate { file, markers } => cli::simulate(file, markers).await?,
    }
    Ok(())
}
