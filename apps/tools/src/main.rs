use std::path::PathBuf;

use anyhow::{Context, Result};
use catalog::Catalog;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a catalog file and check its references.
    Validate { path: PathBuf },
    /// Print the built-in sample catalog.
    Sample {
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Toml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Validate { path } => {
            let catalog = Catalog::from_path(&path)
                .with_context(|| format!("catalog '{}' is invalid", path.display()))?;
            let data = catalog.data();
            println!(
                "ok: {} authors, {} categories, {} books",
                data.authors.len(),
                data.categories.len(),
                data.books.len()
            );
        }
        Command::Sample { format } => {
            let catalog = Catalog::sample();
            let rendered = match format {
                Format::Json => serde_json::to_string_pretty(catalog.data())?,
                Format::Toml => toml::to_string_pretty(catalog.data())?,
            };
            println!("{rendered}");
        }
    }

    Ok(())
}
