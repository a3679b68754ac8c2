use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "beer-trainer",
    version,
    about = "Rate beers, collect tasting notes and rank your favourites"
)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Init {
        #[arg(long)]
        path: Option<PathBuf>,
        #[arg(long)]
        force: bool,
    },
    Config {
        #[arg(long)]
        print: bool,
    },
    Catalog {
        #[command(subcommand)]
        action: CatalogCommand,
    },
    /// Record a rating (good, neutral, bad) for a catalog id
    Rate {
        beer_id: String,
        rating: String,
        #[arg(default_value = "")]
        notes: String,
        /// Collect the note under this category instead of the catalog style
        #[arg(long)]
        category: Option<String>,
    },
    /// Show the highest scoring beers
    Top {
        #[arg(short = 'n', long)]
        count: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Show the notes collected for a category
    Notes { category: String },
    Status,
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    List,
    Show {
        beer_id: String,
    },
    Search {
        #[arg(default_value = "")]
        query: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    Categories,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path, force } => init_config(path, force),
        Commands::Config { print } => {
            if print {
                commands::config::print_effective(cli.config)
            } else {
                Ok(())
            }
        }
        Commands::Catalog { action } => {
            let action = match action {
                CatalogCommand::List => commands::catalog::CatalogAction::List,
                CatalogCommand::Show { beer_id } => commands::catalog::CatalogAction::Show { beer_id },
                CatalogCommand::Search {
                    query,
                    category,
                    limit,
                } => commands::catalog::CatalogAction::Search {
                    query,
                    category,
                    limit,
                },
                CatalogCommand::Categories => commands::catalog::CatalogAction::Categories,
            };
            commands::catalog::execute(cli.config, action)
        }
        Commands::Rate {
            beer_id,
            rating,
            notes,
            category,
        } => commands::rate::execute(commands::rate::RateInputs {
            config_path: cli.config,
            beer_id,
            rating,
            notes,
            category,
        }),
        Commands::Top { count, json } => commands::top::execute(cli.config, count, json),
        Commands::Notes { category } => commands::notes::execute(cli.config, &category),
        Commands::Status => commands::status::execute(cli.config),
    }
}

fn init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let paths = trainer_core::config::ConfigPaths::resolve()?;
    let config_path = path.unwrap_or(paths.config_path);
    if config_path.exists() && !force {
        return Err(anyhow::anyhow!(
            "Config already exists at {} (use --force to overwrite)",
            config_path.display()
        ));
    }
    let config = trainer_core::config::Config::default_config();
    config.save(&config_path)?;
    println!("Config written to {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_defaults_to_empty_notes() {
        let cli = Cli::try_parse_from(["beer-trainer", "rate", "b1", "good"]).unwrap();
        match cli.command {
            Commands::Rate {
                beer_id,
                rating,
                notes,
                category,
            } => {
                assert_eq!(beer_id, "b1");
                assert_eq!(rating, "good");
                assert_eq!(notes, "");
                assert!(category.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["beer-trainer", "top", "-n", "3", "--config", "bt.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("bt.toml")));
        assert!(matches!(cli.command, Commands::Top { count: Some(3), json: false }));
    }

    #[test]
    fn test_catalog_search_parses() {
        let cli = Cli::try_parse_from([
            "beer-trainer",
            "catalog",
            "search",
            "ipa",
            "--category",
            "Ale",
            "--limit",
            "3",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Catalog {
                action: CatalogCommand::Search { limit: Some(3), .. }
            }
        ));
    }
}
