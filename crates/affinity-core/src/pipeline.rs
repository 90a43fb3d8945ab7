// ─────────────────────────────────────────────────────────────────────
// Affinity Kernel — Config-Driven Pipeline
// ─────────────────────────────────────────────────────────────────────
//! Population → topics → engine, seeded from `SimulationConfig::seed`.
//!
//! The population is drawn before the topics, so two configs that differ
//! only in topic scenario share the same initial agents.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use affinity_types::{
    AffinityResult, ClusterCenter, Population, SimulationConfig, SimulationResult, Topic,
};

use crate::engine::{CycleProgress, SimulationEngine};
use crate::population::generate_population_with_spread;
use crate::rng::seeded;
use crate::topics::generate_topic_set;

/// Initial state of a run, before any cycle.
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub population: Population,
    pub topics: Vec<Topic>,
}

/// Everything a caller needs to persist or report one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutcome {
    pub config: SimulationConfig,
    pub topics: Vec<Topic>,
    pub initial_centers: Vec<ClusterCenter>,
    pub result: SimulationResult,
}

/// Validate `config` and generate the population and topics.
pub fn prepare(config: &SimulationConfig) -> AffinityResult<PreparedRun> {
    config.validate()?;
    let mut rng = seeded(config.seed);
    let pop = &config.population;
    let population = generate_population_with_spread(
        &mut rng,
        pop.agent_count,
        pop.dimension,
        pop.cluster_count,
        pop.agent_spread,
        pop.custom_vectors.as_deref(),
    )?;
    let topics = generate_topic_set(
        &mut rng,
        population.dimension(),
        config.topics.topic_count,
        config.topics.scenario,
        &population.cluster_centers,
        config.topics.custom_vectors.as_deref(),
    )?;
    Ok(PreparedRun { population, topics })
}

/// Run a configured simulation to completion.
pub fn run_from_config(config: &SimulationConfig) -> AffinityResult<SimulationOutcome> {
    run_from_config_with_checkpoint(config, |_| ControlFlow::Continue(()))
}

/// [`run_from_config`] with a cycle-boundary checkpoint.
pub fn run_from_config_with_checkpoint<F>(
    config: &SimulationConfig,
    checkpoint: F,
) -> AffinityResult<SimulationOutcome>
where
    F: FnMut(&CycleProgress<'_>) -> ControlFlow<()>,
{
    let PreparedRun { population, topics } = prepare(config)?;
    let initial_centers = population.cluster_centers.clone();
    let mut engine = SimulationEngine::with_centers(
        population.agents,
        &topics,
        population.cluster_centers,
        config.run,
        config.dynamics,
    )?;
    engine.run_with_checkpoint(checkpoint)?;
    Ok(SimulationOutcome {
        config: config.clone(),
        topics,
        initial_centers,
        result: engine.into_result()?,
    })
}
