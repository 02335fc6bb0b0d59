mod cli;

use std::io::{Read, Write};
use std::path::Path;

use chrono::Utc;
use clap::Parser;
use cli::{Cli, Commands};
use tracing::info;

use docbox::config::{Config, StorageProvider};
use docbox::handlers::HandlerRegistry;
use docbox::humanize::ByteSize;
use docbox::ledger::FjallLedger;
use docbox::service::DocService;
use docbox::storage::DocStorage;

type AnyError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path.clone())?,
        None => Config::load()?,
    };

    // `config` only prints; don't touch the data directories for it
    if matches!(cli.command, Commands::Config) {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let service = build_service(&config)?;

    match cli.command {
        Commands::Config => {} // handled above
        Commands::Save(args) => {
            let bytes = read_input(&args.file)?;
            let id = service.save(&args.doc_type, bytes.into()).await?;
            println!("{id}");
        }
        Commands::Validate(args) => {
            let bytes = read_input(&args.file)?;
            match service.validate(&args.doc_type, bytes.into()).await {
                Ok(()) => println!("ok"),
                Err(e) => {
                    println!("rejected: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Load(args) => {
            let doc = service.load(&args.doc_type, &args.id).await?;
            match args.output {
                Some(path) => std::fs::write(path, &doc.bytes)?,
                None => std::io::stdout().write_all(&doc.bytes)?,
            }
        }
        Commands::Check(args) => {
            let exists = service.check(&args.doc_type, &args.id).await?;
            println!("{}", if exists { "present" } else { "absent" });
            if !exists {
                std::process::exit(1);
            }
        }
        Commands::Describe(args) => match service.describe(&args.id)? {
            Some(record) => {
                println!("id:      {}", record.storage_id);
                println!("type:    {}", record.type_key);
                println!("created: {}", record.created_at.to_rfc3339());
                println!("size:    {}", ByteSize(record.size_bytes));
            }
            None => {
                println!("no record for {}", args.id);
                std::process::exit(1);
            }
        },
        Commands::Discard(args) => {
            service.discard(&args.doc_type, &args.id).await?;
        }
        Commands::Types => {
            for key in service.registry().type_keys() {
                let handler = service.registry().get(&key)?;
                let doc_type = handler.doc_type();
                println!(
                    "{key}\t{}\t{}",
                    doc_type.extension(),
                    doc_type.mime_type()
                );
            }
        }
        Commands::Sweep(args) => {
            let cutoff = Utc::now() - chrono::Duration::hours(i64::from(args.older_than_hours));
            info!(%cutoff, "sweeping expired documents");
            let stats = service.sweep_expired(cutoff).await?;
            println!(
                "examined {}, deleted {}, failed {}",
                stats.examined, stats.deleted, stats.failed
            );
        }
        Commands::Stats => {
            let stats = service.stats()?;
            println!("documents:    {}", stats.doc_count);
            println!("stored bytes: {}", ByteSize(stats.bytes_total));
            match service.last_swept()? {
                Some(at) => println!("last sweep:   {}", at.to_rfc3339()),
                None => println!("last sweep:   never"),
            }
        }
    }

    Ok(())
}

fn build_service(config: &Config) -> Result<DocService, AnyError> {
    let registry = HandlerRegistry::from_config(config)?;

    let storage = match config.storage.provider {
        StorageProvider::Local => DocStorage::local(&config.storage.root)?,
        StorageProvider::Memory => DocStorage::in_memory(),
    };
    let ledger = FjallLedger::open(&config.ledger.path)?;

    Ok(DocService::new(registry, storage, ledger, &config.limits))
}

fn read_input(path: &Path) -> Result<Vec<u8>, std::io::Error> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read(path)
    }
}
