//! colltail-dr (Data Review) - collation data tree inspection tool
//!
//! Resolves locales against a TOML data tree and shows which tailoring,
//! valid locale, and actual locale each one ends up with.
//!
//! **Usage:**
//! ```bash
//! colltail-dr [--data <file>] [--config <file>] resolve zh_Hant de@collation=phonebook
//! colltail-dr rules zh stroke
//! colltail-dr root-rules
//! colltail-dr locales
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colltail_common::config::{DataFileResolver, TomlConfig};
use colltail_common::logging::init_tracing;
use colltail_common::Locale;
use colltail_dr::{open_builder, root_tailoring, BuildInfo, ResolutionReport};
use colltail_loader::MemoryStore;
use std::path::PathBuf;
use tracing::{debug, info};

/// Collation data review tool
#[derive(Parser, Debug)]
#[clap(name = "colltail-dr")]
#[clap(about = "Inspect how locales resolve to collation tailorings")]
struct Args {
    /// TOML data tree file (overrides COLLTAIL_DATA and the config file)
    #[clap(long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Config file to use instead of the platform default location
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Data tree name inside the data file
    #[clap(long)]
    tree: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve one or more locales (e.g. `zh_Hant`, `de@collation=phonebook`)
    Resolve {
        #[clap(required = true)]
        locales: Vec<String>,

        /// Print a JSON array instead of text
        #[clap(long)]
        json: bool,
    },
    /// Print the rule string of a collation type
    Rules { locale: String, collation_type: String },
    /// Print the root collation rules
    RootRules,
    /// List locales present in the data tree
    Locales,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let resolver = match &args.config {
        Some(path) => DataFileResolver::with_config_file(path),
        None => DataFileResolver::new(),
    };
    let config: TomlConfig = resolver.load_config();

    init_tracing(&config.logging);
    debug!("colltail-dr {}", BuildInfo::current());

    let data_file = resolver.resolve(args.data.as_deref());
    let tree = args.tree.clone().unwrap_or(config.tree);
    info!("Data tree {:?} from {}", tree, data_file.display());

    match args.command {
        Command::Resolve { locales, json } => {
            let builder = open_builder(&data_file, &tree)
                .with_context(|| format!("Failed to load {}", data_file.display()))?;
            let root = root_tailoring(&builder);

            let mut reports = Vec::with_capacity(locales.len());
            for requested in &locales {
                let locale: Locale = requested
                    .parse()
                    .with_context(|| format!("Invalid locale {:?}", requested))?;
                let resolution = builder
                    .resolve(&locale, &root)
                    .with_context(|| format!("Failed to resolve {}", locale))?;
                reports.push(ResolutionReport::new(&locale, &resolution, &root));
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for report in &reports {
                    println!("{}", report);
                }
            }
        }
        Command::Rules {
            locale,
            collation_type,
        } => {
            let builder = open_builder(&data_file, &tree)
                .with_context(|| format!("Failed to load {}", data_file.display()))?;
            let locale: Locale = locale
                .parse()
                .with_context(|| format!("Invalid locale {:?}", locale))?;
            println!("{}", builder.load_rules(&locale, &collation_type)?);
        }
        Command::RootRules => {
            let builder = open_builder(&data_file, &tree)
                .with_context(|| format!("Failed to load {}", data_file.display()))?;
            println!("{}", builder.root_rules()?);
        }
        Command::Locales => {
            let store = MemoryStore::from_toml_file(&data_file)
                .with_context(|| format!("Failed to load {}", data_file.display()))?;
            for locale in store.locales(&tree) {
                println!("{}", locale);
            }
        }
    }

    Ok(())
}
