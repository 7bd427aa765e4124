use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use arcana_builder::catalog::{CatalogRepository, JsonCatalogRepository, SqliteCatalogRepository};
use arcana_builder::config::{EngineConfig, DEFAULT_CONFIG_PATH};
use arcana_builder::logging;
use arcana_builder::rules::{budget_status, build_score, score_tier, validate_build, Build};

#[derive(Parser)]
#[command(name = "arcana-builder", version, about = "Build planner rules engine")]
struct Cli {
    /// Engine config (JSON). Missing file means defaults.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// JSON catalog, overrides the config.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// SQLite catalog database, overrides the config.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print catalog counts.
    Stats,
    /// Validate a build file and print its tier.
    Check { build: PathBuf },
    /// Copy the JSON catalog into the database named by --db.
    Import,
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let mut config = EngineConfig::load_or_default(&cli.config)?;
    if let Some(path) = cli.catalog {
        config.catalog_path = path;
    }
    if let Some(path) = cli.db {
        config.catalog_db = Some(path);
    }

    match cli.command {
        Command::Stats => {
            let stats = open_repository(&config)?.stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { build } => check_build(&config, &build),
        Command::Import => {
            let db = config
                .catalog_db
                .as_ref()
                .ok_or("import needs a target database (--db <path>)")?;
            let catalog = JsonCatalogRepository::new(&config.catalog_path).load_catalog()?;
            let mut repo = SqliteCatalogRepository::create(db)?;
            repo.import(&catalog)?;
            println!(
                "imported {} into {}",
                config.catalog_path.display(),
                db.display()
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn open_repository(config: &EngineConfig) -> Result<Box<dyn CatalogRepository>, Box<dyn Error>> {
    Ok(match &config.catalog_db {
        Some(db) => Box::new(SqliteCatalogRepository::open(db)?),
        None => Box::new(JsonCatalogRepository::new(&config.catalog_path)),
    })
}

fn check_build(config: &EngineConfig, path: &Path) -> Result<ExitCode, Box<dyn Error>> {
    let catalog = open_repository(config)?.load_catalog()?;
    let raw = fs::read_to_string(path)?;
    let build: Build = serde_json::from_str(&raw)?;

    let budget = budget_status(&catalog, build.card_ids().iter(), build.grasp_cap);
    println!(
        "{}: score {} tier {}, grasp {}/{}",
        build.name,
        build_score(&build),
        score_tier(&build),
        budget.total,
        budget.cap
    );

    let report = validate_build(&catalog, &build);
    if report.ok() {
        println!("valid");
        return Ok(ExitCode::SUCCESS);
    }
    for reason in report.reasons() {
        println!("  - {}", reason);
    }
    Ok(ExitCode::FAILURE)
}
