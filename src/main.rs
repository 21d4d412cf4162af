mod cli;

use clap::Parser;
use std::collections::HashSet;
use threatscore::error::ScoreError;
use threatscore::source::{self, CatalogProvider, ModelLocation};
use threatscore::types::config::{OutputFormatConfig, ScoreConfig};
use threatscore::types::model::ThreatCatalog;
use threatscore::types::scoring::Remediation;
use threatscore::{config, engine, report};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const BELOW_THRESHOLD: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn model_location(args: &cli::ModelArgs, config: &ScoreConfig) -> ModelLocation {
    match &args.local_file {
        Some(path) => ModelLocation::Local(path.clone()),
        None => ModelLocation::Remote {
            platform: args.platform.into(),
            branch: args
                .branch
                .clone()
                .unwrap_or_else(|| config.source_settings().branch),
        },
    }
}

fn remediation_for(
    cmd: &cli::ScoreCommand,
    catalog: &ThreatCatalog,
) -> Result<Remediation, ScoreError> {
    let mut names = cmd.inactive.iter().cloned().collect::<HashSet<_>>();
    if let Some(path) = &cmd.checks_file {
        names.extend(source::local::load_checks_file(path)?);
    }

    if cmd.all_inactive {
        return Ok(Remediation::AllInactive);
    }

    let mut unknown = names
        .iter()
        .filter(|name| !catalog.contains(name))
        .map(String::as_str)
        .collect::<Vec<_>>();
    if !unknown.is_empty() {
        unknown.sort_unstable();
        eprintln!(
            "warning: unknown threat names (ignored): {}",
            unknown.join(", ")
        );
    }

    Ok(Remediation::Names(names))
}

fn run() -> Result<i32, ScoreError> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let cwd = std::env::current_dir()?;
    let config = config::load_config(&cwd)?.unwrap_or_default();
    let mut provider = CatalogProvider::from_config(&config);

    match cli.command {
        cli::Commands::Score(cmd) => {
            let catalog = provider.catalog(&model_location(&cmd.model, &config))?;
            let remediation = remediation_for(&cmd, &catalog)?;
            let score_report = engine::compute_score(&catalog, &remediation);

            let output_format = match (cmd.format, config.output_format()) {
                (Some(cli::ReportFormat::Json), _) | (None, Some(OutputFormatConfig::Json)) => {
                    report::OutputFormat::Json
                }
                _ => report::OutputFormat::Text,
            };
            let rendered = report::render(&score_report, output_format)?;
            println!("{rendered}");

            match cmd.fail_under {
                Some(threshold) if score_report.overall < threshold => {
                    eprintln!(
                        "overall score {}% is below the required {}%",
                        score_report.overall, threshold
                    );
                    Ok(exit_code::BELOW_THRESHOLD)
                }
                _ => Ok(exit_code::SUCCESS),
            }
        }
        cli::Commands::Threats(cmd) => {
            let catalog = provider.catalog(&model_location(&cmd.model, &config))?;
            for metric in catalog.metrics() {
                let tags = if metric.tags.is_empty() {
                    String::new()
                } else {
                    format!("  [{}]", metric.tags.join(", "))
                };
                println!(
                    "  (sev {}, {}) {}{}",
                    metric.severity, metric.dimension, metric.name, tags
                );
            }
            Ok(exit_code::SUCCESS)
        }
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
