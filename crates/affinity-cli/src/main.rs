// ─────────────────────────────────────────────────────────────────────
// Affinity Kernel — Command-Line Runner
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! `affinity` binary.
//!
//! # Commands
//!
//! - `run` - Run one simulation and write the outcome as JSON
//! - `compare` - Run scenario A and B from the same seed and report
//! - `presets` - List the built-in parameter presets

#![deny(unsafe_code)]

mod report;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use affinity_core::{
    run_from_config_with_checkpoint, SharedRunStatus, SimulationOutcome, SimulationSummary,
};
use affinity_types::{ScenarioPreset, SimulationConfig, TopicScenario};

use crate::report::{format_comparison, format_presets, ScenarioColumn};

#[derive(Parser)]
#[command(name = "affinity")]
#[command(version)]
#[command(about = "Opinion/affinity network simulation", long_about = None)]
struct Cli {
    /// Default log filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one simulation and write the outcome JSON
    Run {
        #[command(flatten)]
        config: ConfigArgs,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,

        /// Write only the summary instead of the full outcome
        #[arg(long)]
        summary: bool,
    },

    /// Run scenario A and B with identical agents and compare
    Compare {
        #[command(flatten)]
        config: ConfigArgs,

        /// Emit both summaries as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List built-in presets
    Presets,
}

/// Config source plus per-field overrides, applied in that order.
#[derive(Args, Debug, Default)]
struct ConfigArgs {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start from a preset (consensus, polarization, fragmentation, echo_chambers)
    #[arg(short, long, conflicts_with = "config")]
    preset: Option<String>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Number of agents
    #[arg(short = 'n', long)]
    agents: Option<usize>,

    /// Opinion vector dimension
    #[arg(short, long)]
    dimension: Option<usize>,

    /// Number of initial clusters
    #[arg(short = 'k', long)]
    clusters: Option<usize>,

    /// Number of topics
    #[arg(long)]
    topics: Option<usize>,

    /// Topic scenario: A (standard) or B (cluster-aligned)
    #[arg(short, long)]
    scenario: Option<String>,

    /// Number of cycles
    #[arg(long)]
    cycles: Option<usize>,

    /// Connection threshold in [0, 1]
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Re-cluster every N cycles (0 = never)
    #[arg(short, long)]
    recalculate_after: Option<usize>,
}

impl ConfigArgs {
    fn resolve(&self) -> anyhow::Result<SimulationConfig> {
        let mut cfg = if let Some(path) = &self.config {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SimulationConfig::from_json(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        } else if let Some(name) = &self.preset {
            SimulationConfig::from_preset(name.parse::<ScenarioPreset>()?)
        } else {
            SimulationConfig::default()
        };

        if let Some(v) = self.seed {
            cfg.seed = v;
        }
        if let Some(v) = self.agents {
            cfg.population.agent_count = v;
        }
        if let Some(v) = self.dimension {
            cfg.population.dimension = v;
        }
        if let Some(v) = self.clusters {
            cfg.population.cluster_count = v;
        }
        if let Some(v) = self.topics {
            cfg.topics.topic_count = v;
        }
        if let Some(s) = &self.scenario {
            cfg.topics.scenario = s.parse::<TopicScenario>()?;
        }
        if let Some(v) = self.cycles {
            cfg.run.cycles = v;
        }
        if let Some(v) = self.threshold {
            cfg.run.threshold = v;
        }
        if let Some(v) = self.recalculate_after {
            cfg.run.recalculate_after = v;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            config,
            output,
            pretty,
            summary,
        } => cmd_run(&config, output, pretty, summary),
        Commands::Compare { config, json } => cmd_compare(&config, json),
        Commands::Presets => {
            print!("{}", format_presets());
            Ok(())
        }
    }
}

fn execute(cfg: &SimulationConfig) -> anyhow::Result<SimulationOutcome> {
    let status = SharedRunStatus::new();
    status.start(cfg.run.cycles);
    let outcome = run_from_config_with_checkpoint(cfg, status.checkpoint());
    status.finish(&outcome);
    let snap = status.snapshot();
    log::debug!("run finished: {:?} after {} cycle(s)", snap.phase, snap.cycle);
    Ok(outcome?)
}

fn cmd_run(
    args: &ConfigArgs,
    output: Option<PathBuf>,
    pretty: bool,
    summary_only: bool,
) -> anyhow::Result<()> {
    let cfg = args.resolve()?;
    let outcome = execute(&cfg)?;

    let json = if summary_only {
        let summary = SimulationSummary::from_result(&outcome.result, cfg.run.threshold)?;
        to_json(&summary, pretty)?
    } else {
        to_json(&outcome, pretty)?
    };
    write_output(output, &json)
}

fn cmd_compare(args: &ConfigArgs, json: bool) -> anyhow::Result<()> {
    let base = args.resolve()?;
    let scenario_b = match base.topics.scenario {
        TopicScenario::ClusterAligned { .. } => base.topics.scenario,
        TopicScenario::Standard => TopicScenario::cluster_aligned(),
    };

    let mut summaries = Vec::with_capacity(2);
    for scenario in [TopicScenario::Standard, scenario_b] {
        let mut cfg = base.clone();
        cfg.topics.scenario = scenario;
        let outcome = execute(&cfg)?;
        summaries.push((
            scenario,
            SimulationSummary::from_result(&outcome.result, cfg.run.threshold)?,
        ));
    }

    if json {
        let value = serde_json::json!({
            "seed": base.seed,
            "scenarios": summaries.iter().map(|(scenario, summary)| serde_json::json!({
                "scenario": scenario.label(),
                "summary": summary,
            })).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let columns: Vec<ScenarioColumn<'_>> = summaries
        .iter()
        .map(|(scenario, summary)| ScenarioColumn {
            label: format!("scenario {}", scenario.label()),
            summary,
        })
        .collect();
    println!(
        "seed {} | {} agents x {} dims | threshold {}",
        base.seed, summaries[0].1.agents, base.population.dimension, base.run.threshold
    );
    print!("{}", format_comparison(&columns));
    Ok(())
}

// Helper functions

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

fn write_output(output: Option<PathBuf>, content: &str) -> anyhow::Result<()> {
    if let Some(path) = output {
        std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{content}");
    }
    Ok(())
}
