//! dbload command-line tool
//!
//! Reverse-engineers an SQLite database and prints the loaded model as JSON.

use clap::Parser;
use dbload_core::adapter::adapter_for_product;
use dbload_core::{DbLoadDataStore, DbLoader, LoaderConfig, MetadataSource, SqliteMetadataSource};
use std::path::PathBuf;

/// dbload command-line tool
#[derive(Parser, Debug)]
#[command(name = "dbload")]
#[command(version, about = "Reverse-engineer database metadata into a schema model")]
pub struct Args {
    /// SQLite database file to read
    #[arg(short, long)]
    pub database: PathBuf,

    /// JSON filter configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dbload=info,dbload_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => {
            tracing::info!(path = %path.display(), "reading configuration");
            LoaderConfig::from_path(path)?
        }
        None => LoaderConfig::default(),
    };
    let filters = config.compile()?;

    let source = SqliteMetadataSource::open(&args.database)?;
    let product = source.product_name()?;
    let adapter = adapter_for_product(&product);
    tracing::info!(database = %args.database.display(), product = %product, "database opened");

    let mut store = DbLoadDataStore::new();
    DbLoader::new(adapter.as_ref(), &filters)
        .with_table_types(config.table_types())
        .load(&source, &mut store)?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&store)?
    } else {
        serde_json::to_string(&store)?
    };
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args() {
        Args::command().debug_assert();

        let args = Args::parse_from(["dbload", "--database", "hr.db", "--pretty"]);
        assert_eq!(args.database, PathBuf::from("hr.db"));
        assert!(args.config.is_none());
        assert!(args.pretty);
    }

    #[test]
    fn test_database_required() {
        assert!(Args::try_parse_from(["dbload"]).is_err());
    }
}
