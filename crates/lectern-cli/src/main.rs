//! Lectern: pull quotes, verses and code snippets out of books.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::IngestArgs;

fn resolve_data_dir() -> PathBuf {
    std::env::var("LECTERN_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

fn print_help() {
    println!("Lectern: extract quotes, verses and code from books");
    println!();
    println!("Usage: lectern <command> [args]");
    println!();
    println!("Commands:");
    println!("  analyze <file>                          Analyze a PDF or text file and print items");
    println!("  ingest <file> --title T --license L     Store a book (L: public-domain, CC, copyrighted)");
    println!("         [--author A]");
    println!("  reanalyze <doc-id>                      Re-run analysis for a stored book");
    println!("  items <doc-id>                          Print stored items of a book");
    println!("  documents                               List stored books");
    println!("  help                                    Show this help message");
    println!();
    println!("Environment: LECTERN_DATA_DIR (default ./data), LECTERN_MAX_UPLOAD_BYTES, RUST_LOG");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1) else {
        print_help();
        std::process::exit(1);
    };

    let output = match command.as_str() {
        "analyze" => {
            let Some(file) = args.get(2) else {
                eprintln!("Usage: lectern analyze <file>");
                std::process::exit(1);
            };
            commands::analyze(PathBuf::from(file)).await?
        }
        "--help" | "-h" | "help" => {
            print_help();
            return Ok(());
        }
        "ingest" | "reanalyze" | "items" | "documents" => {
            let data_dir = resolve_data_dir();
            info!("Data directory: {}", data_dir.display());

            let config = Arc::new(lectern_core::LecternConfig::from_env(&data_dir)?);
            let store = Arc::new(commands::open_store(&config)?);

            match command.as_str() {
                "ingest" => {
                    let parsed = IngestArgs::parse(&args[2..])?;
                    commands::ingest(config, store, parsed).await?
                }
                "reanalyze" => {
                    let doc_id = commands::parse_doc_id(args.get(2))?;
                    commands::reanalyze(config, store, doc_id).await?
                }
                "items" => commands::items(&store, commands::parse_doc_id(args.get(2))?)?,
                _ => commands::documents(&store)?,
            }
        }
        other => {
            eprintln!("Unknown command: {}. Use 'lectern help' for usage.", other);
            std::process::exit(1);
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
