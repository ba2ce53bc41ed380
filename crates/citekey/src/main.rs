//! citekey CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "citekey")]
#[command(version)]
#[command(about = "Resolve Citavi citation placeholders in DOCX files to Pandoc citation keys", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append citation keys to the placeholders of a DOCX file
    Convert {
        /// Input DOCX file
        input: PathBuf,

        /// BibTeX bibliography to resolve titles against
        #[arg(short, long)]
        bib: PathBuf,

        /// Directory for the converted XML parts
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Also write a complete DOCX with the converted parts to FILE
        #[arg(long)]
        docx: Option<PathBuf>,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the decoded placeholder payloads of a DOCX file as JSON
    Inspect {
        /// Input DOCX file
        input: PathBuf,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "citekey=info,citekey_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            bib,
            out_dir,
            docx,
            config,
        } => commands::convert::execute(commands::convert::ConvertArgs {
            input,
            bib,
            out_dir,
            docx,
            config,
        }),
        Commands::Inspect { input, config } => {
            commands::inspect::execute(commands::inspect::InspectArgs { input, config })
        }
    }
}
