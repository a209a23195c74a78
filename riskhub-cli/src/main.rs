//! riskhub CLI - portfolio risk scoring and Monte Carlo scenario simulation

#![deny(warnings)]

// Global invariants enforced:
// - Deterministic output ordering
// - A fixed seed yields byte-for-byte identical output
// - Logs go to stderr, results to stdout

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use riskhub_core::config::{self, ResolvedConfig};
use riskhub_core::report::{
    render_json, render_sandbox_text, render_simulation_text, render_summary_text,
    render_trend_text,
};
use riskhub_core::{
    aggregate, generate_trend, simulate, summarize, trend_direction, Portfolio, RngSource,
    Scenario, StagedSet, TrendIndicator, TrendPoint,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter
const LOG_ENV: &str = "RISKHUB_LOG";

/// Filter used when `RISKHUB_LOG` is unset or invalid
const DEFAULT_LOG_FILTER: &str = "riskhub=warn";

static INIT_TRACING: Once = Once::new();

#[derive(Parser)]
#[command(name = "riskhub")]
#[command(about = "Portfolio risk scoring, status tiers, and Monte Carlo scenario simulation")]
#[command(version = env!("RISKHUB_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every project in a portfolio and summarize by status tier
    Score {
        /// Path to portfolio JSON file
        portfolio: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run a Monte Carlo simulation for one project and scenario
    Simulate {
        /// Path to portfolio JSON file
        portfolio: PathBuf,

        /// Project id to simulate
        #[arg(long)]
        project: String,

        /// Scenario id (budget_cut, scope_expand, resource_loss, deadline_compress, compliance_breach)
        #[arg(long)]
        scenario: String,

        /// Number of trials (overrides config file)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        iterations: Option<u64>,

        /// Seed for a reproducible run (overrides config file)
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Combine staged scenarios across projects into one impact estimate
    Sandbox {
        /// Path to portfolio JSON file
        portfolio: PathBuf,

        /// Stage a scenario against a project (repeatable)
        #[arg(long = "stage", value_name = "ID:SCENARIO")]
        stages: Vec<String>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Generate an illustrative 10-point history around a risk index
    Trend {
        /// Current risk index (0-99)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=99))]
        rix: u8,

        /// Seed for a reproducible history (overrides config file)
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate or inspect a configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without running anything
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (stock profiles + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// JSON shape of the `trend` command
#[derive(Serialize)]
struct TrendReport {
    base_rix: u8,
    points: Vec<TrendPoint>,
    indicator: Option<TrendIndicator>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            portfolio,
            format,
            config: config_path,
        } => {
            let resolved = resolve_config(config_path.as_deref())?;
            let portfolio = load_portfolio(&portfolio)?;
            let summary = summarize(&portfolio.projects, &resolved.registry);

            match format {
                OutputFormat::Text => print!("{}", render_summary_text(&summary)),
                OutputFormat::Json => println!("{}", render_json(&summary)),
            }
        }
        Commands::Simulate {
            portfolio,
            project,
            scenario,
            iterations,
            seed,
            format,
            config: config_path,
        } => {
            let resolved = resolve_config(config_path.as_deref())?;
            let portfolio = load_portfolio(&portfolio)?;
            let target = portfolio
                .find(&project)
                .with_context(|| format!("unknown project: {}", project))?;
            warn_if_unknown_scenario(&scenario);

            // CLI flags override config file values
            let iterations = match iterations {
                Some(n) => usize::try_from(n).context("--iterations is too large")?,
                None => resolved.iterations,
            };
            let seed = seed.or(resolved.simulation_seed);
            tracing::debug!(project = %project, scenario = %scenario, iterations, ?seed, "simulating");

            let result = simulate(target, &scenario, iterations, &mut rng_for(seed))?;

            match format {
                OutputFormat::Text => print!("{}", render_simulation_text(&result)),
                OutputFormat::Json => println!("{}", render_json(&result)),
            }
        }
        Commands::Sandbox {
            portfolio,
            stages,
            format,
        } => {
            let portfolio = load_portfolio(&portfolio)?;
            let staged = build_staged_set(&portfolio, &stages)?;
            let result = aggregate(staged.as_slice());

            match format {
                OutputFormat::Text => print!("{}", render_sandbox_text(&result)),
                OutputFormat::Json => println!("{}", render_json(&result)),
            }
        }
        Commands::Trend {
            rix,
            seed,
            format,
            config: config_path,
        } => {
            let resolved = resolve_config(config_path.as_deref())?;
            let seed = seed.or(resolved.trend_seed);
            let points = generate_trend(rix, &mut rng_for(seed));
            let indicator = trend_direction(&points);

            match format {
                OutputFormat::Text => print!("{}", render_trend_text(&points, indicator.as_ref())),
                OutputFormat::Json => println!(
                    "{}",
                    render_json(&TrendReport {
                        base_rix: rix,
                        points,
                        indicator,
                    })
                ),
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, path.as_deref());

                match resolved {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let resolved = resolve_config(path.as_deref())?;
                print!("{}", render_config_text(&resolved));
            }
        },
    }

    Ok(())
}

/// Initialize the tracing subscriber from `RISKHUB_LOG`
///
/// Safe to call more than once.
fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .init();
    });
}

/// Resolve configuration relative to the current directory
fn resolve_config(config_path: Option<&Path>) -> anyhow::Result<ResolvedConfig> {
    let project_root = std::env::current_dir()?;
    let resolved = config::load_and_resolve(&project_root, config_path)
        .context("failed to load configuration")?;

    if let Some(path) = &resolved.config_path {
        eprintln!("Using config: {}", path.display());
    }
    Ok(resolved)
}

fn load_portfolio(path: &Path) -> anyhow::Result<Portfolio> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }
    Portfolio::load(path)
}

/// Seeded generator when a seed is known, fresh entropy otherwise
fn rng_for(seed: Option<u64>) -> RngSource<StdRng> {
    match seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    }
}

fn warn_if_unknown_scenario(scenario: &str) {
    if Scenario::from_name(scenario).is_none() {
        tracing::warn!(scenario, "unknown scenario, using fallback baseline");
    }
}

/// Split an `ID:SCENARIO` argument
fn parse_stage(raw: &str) -> anyhow::Result<(&str, &str)> {
    let (project_id, scenario) = raw
        .split_once(':')
        .with_context(|| format!("invalid --stage '{}': expected ID:SCENARIO", raw))?;
    let (project_id, scenario) = (project_id.trim(), scenario.trim());
    if project_id.is_empty() || scenario.is_empty() {
        anyhow::bail!("invalid --stage '{}': expected ID:SCENARIO", raw);
    }
    Ok((project_id, scenario))
}

/// Stage every `--stage` pair, rejecting projects missing from the portfolio
fn build_staged_set(portfolio: &Portfolio, stages: &[String]) -> anyhow::Result<StagedSet> {
    let mut staged = StagedSet::new();
    for raw in stages {
        let (project_id, scenario) = parse_stage(raw)?;
        if portfolio.find(project_id).is_none() {
            anyhow::bail!("unknown project in --stage '{}': {}", raw, project_id);
        }
        warn_if_unknown_scenario(scenario);
        staged.stage(project_id, scenario);
    }
    Ok(staged)
}

fn render_config_text(resolved: &ResolvedConfig) -> String {
    let mut output = String::from("Configuration:\n");
    match &resolved.config_path {
        Some(p) => output.push_str(&format!("  Source: {}\n", p.display())),
        None => output.push_str("  Source: defaults (no config file found)\n"),
    }

    output.push_str("\nProfiles:\n");
    for (key, profile) in resolved.registry.iter() {
        output.push_str(&format!(
            "  {:<16} {:<24} fri {:.2}  dri {:.2}  cii {:.2}  gsi {:.2}\n",
            key, profile.label, profile.fri, profile.dri, profile.cii, profile.gsi
        ));
    }

    output.push_str("\nSimulation:\n");
    output.push_str(&format!("  iterations: {}\n", resolved.iterations));
    output.push_str(&format!("  seed: {}\n", seed_text(resolved.simulation_seed)));
    output.push_str("\nTrend:\n");
    output.push_str(&format!("  seed: {}\n", seed_text(resolved.trend_seed)));
    output
}

fn seed_text(seed: Option<u64>) -> String {
    seed.map(|v| v.to_string())
        .unwrap_or_else(|| "none (fresh entropy)".to_string())
}
