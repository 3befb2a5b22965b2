use clap::{Parser, Subcommand};
use solrbridge::{
    FieldSpec, FieldsAdmin, Migration, MigrationFile, Migrator, SolrClient, SolrConfig,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "solrbridge", about = "Generate and run Solr schema migrations")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, env = "SOLR_URL", default_value = solrbridge::config::DEFAULT_SOLR_URL, global = true)]
    solr_url: String,

    #[arg(long, env = "SOLR_MIGRATIONS_DIR", default_value = "./solr_migrations", global = true)]
    migrations_dir: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Write a migration that creates a core
    CreateCore { name: String },
    /// Write a migration that renames a core
    UpdateCore { old_name: String, new_name: String },
    /// Write a migration that unloads a core
    DeleteCore { name: String },
    /// Write a migration that adds fields (`--field name:type[:flags]`)
    CreateFields {
        core: String,
        #[arg(long = "field", value_name = "SPEC", required = true)]
        fields: Vec<FieldSpec>,
    },
    /// Write a migration that replaces field definitions
    UpdateFields {
        core: String,
        #[arg(long = "field", value_name = "SPEC", required = true)]
        fields: Vec<FieldSpec>,
    },
    /// Write a migration that deletes fields
    DeleteFields {
        core: String,
        #[arg(required = true)]
        fields: Vec<String>,
    },
    /// Apply migration files in the given order
    Migrate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Revert migration files, last one first
    Rollback {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the field definitions of a core as JSON
    ShowFields { core: String },
}

fn write_migration(dir: &std::path::Path, migration: Migration) -> Result<(), Box<dyn std::error::Error>> {
    let path = MigrationFile::new(migration).save(dir)?;
    println!("{}", path.display());
    tracing::info!("Migration file created: {}", path.display());
    Ok(())
}

fn client(solr_url: &str) -> Result<SolrClient, Box<dyn std::error::Error>> {
    let config = SolrConfig::from_env()?;
    let config = SolrConfig {
        base_url: SolrConfig::new(solr_url)?.base_url,
        ..config
    };
    Ok(SolrClient::new(config)?)
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let dir = cli.migrations_dir.as_path();
    match cli.command {
        Command::CreateCore { name } => write_migration(dir, Migration::CreateCore { core: name }),
        Command::UpdateCore { old_name, new_name } => write_migration(
            dir,
            Migration::RenameCore {
                from: old_name,
                to: new_name,
            },
        ),
        Command::DeleteCore { name } => write_migration(dir, Migration::DeleteCore { core: name }),
        Command::CreateFields { core, fields } => {
            write_migration(dir, Migration::CreateFields { core, fields })
        }
        Command::UpdateFields { core, fields } => {
            write_migration(dir, Migration::UpdateFields { core, fields })
        }
        Command::DeleteFields { core, fields } => {
            write_migration(dir, Migration::DeleteFields { core, fields })
        }
        Command::Migrate { files } => {
            let migrator = Migrator::new(client(&cli.solr_url)?);
            for path in &files {
                let file = MigrationFile::load(path)?;
                migrator.up(&file.migration).await?;
                println!("Migrated: {}", path.display());
            }
            Ok(())
        }
        Command::Rollback { files } => {
            let migrator = Migrator::new(client(&cli.solr_url)?);
            for path in files.iter().rev() {
                let file = MigrationFile::load(path)?;
                migrator.down(&file.migration).await?;
                println!("Rolled back: {}", path.display());
            }
            Ok(())
        }
        Command::ShowFields { core } => {
            let fields = FieldsAdmin::new(client(&cli.solr_url)?)
                .get_core_fields(&core)
                .await?;
            println!("{}", serde_json::to_string_pretty(&fields)?);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
