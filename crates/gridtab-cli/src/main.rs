mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gridtab",
    version,
    about = "Extract spreadsheet tables as markdown and nested JSON"
)]
struct Cli {
    /// Log extraction decisions (header depth, skipped sheets) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract every table from an xlsx workbook
    Extract {
        /// Path to an .xlsx or .xlsm file
        input_file: PathBuf,

        /// Project tables into JSON objects (flat or nested by merged headers)
        #[arg(long)]
        json: bool,

        /// Only extract these sheets (repeatable)
        #[arg(short, long = "sheet", value_name = "NAME")]
        sheets: Vec<String>,

        /// JSON file with extraction options; flags override its values
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format: markdown (default) or json
        #[arg(short, long, default_value = "markdown")]
        output: String,

        /// Write the JSON result to a file instead of stdout
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// List the sheets of a workbook with their occupied ranges
    Sheets {
        /// Path to an .xlsx or .xlsm file
        input_file: PathBuf,
    },
    /// Decode a cell address or range reference (e.g. B2 or A1:C3)
    Address {
        /// Reference to decode
        reference: String,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "gridtab_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Extract {
            input_file,
            json,
            sheets,
            config,
            output,
            out,
        } => commands::extract::run(input_file, json, sheets, config, &output, out),
        Commands::Sheets { input_file } => commands::sheets::run(input_file),
        Commands::Address { reference } => commands::address::run(&reference),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
