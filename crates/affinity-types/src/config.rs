// ─────────────────────────────────────────────────────────────────────
// Affinity Kernel — Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{AffinityError, AffinityResult};
use crate::scenario::{ScenarioPreset, TopicScenario};

/// Default number of generated topics when no custom vectors are given.
pub const DEFAULT_TOPIC_COUNT: usize = 10;

/// Population generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationParams {
    /// Number of synthetic agents. Ignored when `custom_vectors` is set.
    pub agent_count: usize,
    /// Opinion-space dimension. Ignored when `custom_vectors` is set.
    pub dimension: usize,
    /// Number of initial cluster centers.
    pub cluster_count: usize,
    /// Half-width of the uniform noise around each agent's center.
    pub agent_spread: f64,
    /// Externally supplied opinion vectors, one per agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_vectors: Option<Vec<Vec<f64>>>,
}

impl Default for PopulationParams {
    fn default() -> Self {
        Self {
            agent_count: 100,
            dimension: 10,
            cluster_count: 3,
            agent_spread: 0.3,
            custom_vectors: None,
        }
    }
}

/// Topic generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicParams {
    pub scenario: TopicScenario,
    /// Number of generated topics. Ignored when `custom_vectors` is set.
    pub topic_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_vectors: Option<Vec<Vec<f64>>>,
}

impl Default for TopicParams {
    fn default() -> Self {
        Self {
            scenario: TopicScenario::Standard,
            topic_count: DEFAULT_TOPIC_COUNT,
            custom_vectors: None,
        }
    }
}

/// Cycle-loop parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunParams {
    /// Number of synchronous update cycles.
    pub cycles: usize,
    /// Similarity cutoff in [0, 1]; pairs strictly above it are linked.
    pub threshold: f64,
    /// Re-cluster every this many cycles. 0 disables re-clustering.
    pub recalculate_after: usize,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            cycles: 20,
            threshold: 0.3,
            recalculate_after: 0,
        }
    }
}

impl RunParams {
    pub fn validate(&self) -> AffinityResult<()> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(AffinityError::Validation(format!(
                "threshold must be in [0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Rates governing the coupled opinion/connection dynamics.
///
/// Linked pairs move their connection toward the current similarity by
/// `connection_rate`; unlinked pairs decay multiplicatively by
/// `decay_rate`. Each agent moves toward the mean of its linked peers by
/// `influence_rate` and toward the mean of its aligned topics by
/// `topic_pull`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicsParams {
    pub influence_rate: f64,
    pub topic_pull: f64,
    pub connection_rate: f64,
    pub decay_rate: f64,
}

impl Default for DynamicsParams {
    fn default() -> Self {
        Self {
            influence_rate: 0.05,
            topic_pull: 0.02,
            connection_rate: 0.1,
            decay_rate: 0.05,
        }
    }
}

impl DynamicsParams {
    pub fn validate(&self) -> AffinityResult<()> {
        let rates = [
            ("influence_rate", self.influence_rate),
            ("topic_pull", self.topic_pull),
            ("connection_rate", self.connection_rate),
            ("decay_rate", self.decay_rate),
        ];
        for (name, v) in rates {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(AffinityError::Validation(format!(
                    "{name} must be in [0, 1], got {v}"
                )));
            }
        }
        Ok(())
    }
}

/// Full configuration for one seeded run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub population: PopulationParams,
    pub topics: TopicParams,
    pub run: RunParams,
    pub dynamics: DynamicsParams,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population: PopulationParams::default(),
            topics: TopicParams::default(),
            run: RunParams::default(),
            dynamics: DynamicsParams::default(),
            seed: 42,
        }
    }
}

impl SimulationConfig {
    /// Parameter set for one of the archetypal scenarios.
    pub fn from_preset(preset: ScenarioPreset) -> Self {
        let base = Self::default();
        match preset {
            ScenarioPreset::Consensus => Self {
                population: PopulationParams {
                    cluster_count: 1,
                    agent_spread: 0.6,
                    ..base.population
                },
                run: RunParams {
                    cycles: 50,
                    threshold: 0.1,
                    recalculate_after: 10,
                },
                ..base
            },
            ScenarioPreset::Polarization => Self {
                population: PopulationParams {
                    cluster_count: 2,
                    ..base.population
                },
                topics: TopicParams {
                    scenario: TopicScenario::cluster_aligned(),
                    ..base.topics
                },
                run: RunParams {
                    cycles: 40,
                    threshold: 0.4,
                    recalculate_after: 0,
                },
                ..base
            },
            ScenarioPreset::Fragmentation => Self {
                population: PopulationParams {
                    cluster_count: 8,
                    agent_spread: 0.2,
                    ..base.population
                },
                run: RunParams {
                    cycles: 30,
                    threshold: 0.7,
                    recalculate_after: 0,
                },
                ..base
            },
            ScenarioPreset::EchoChambers => Self {
                population: PopulationParams {
                    cluster_count: 4,
                    ..base.population
                },
                topics: TopicParams {
                    scenario: TopicScenario::cluster_aligned(),
                    ..base.topics
                },
                run: RunParams {
                    cycles: 60,
                    threshold: 0.5,
                    recalculate_after: 5,
                },
                dynamics: DynamicsParams {
                    topic_pull: 0.05,
                    ..base.dynamics
                },
                ..base
            },
        }
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> AffinityResult<()> {
        let pop = &self.population;
        match &pop.custom_vectors {
            Some(vs) => {
                if vs.is_empty() {
                    return Err(AffinityError::Config(
                        "population.custom_vectors must not be empty".to_string(),
                    ));
                }
            }
            None => {
                if pop.agent_count == 0 {
                    return Err(AffinityError::Config(
                        "population.agent_count must be >= 1".to_string(),
                    ));
                }
                if pop.dimension == 0 {
                    return Err(AffinityError::Config(
                        "population.dimension must be >= 1".to_string(),
                    ));
                }
            }
        }
        if pop.cluster_count == 0 {
            return Err(AffinityError::Config(
                "population.cluster_count must be >= 1".to_string(),
            ));
        }
        if !pop.agent_spread.is_finite() || pop.agent_spread < 0.0 {
            return Err(AffinityError::Config(format!(
                "population.agent_spread must be >= 0, got {}",
                pop.agent_spread
            )));
        }
        match &self.topics.custom_vectors {
            Some(vs) if vs.is_empty() => {
                return Err(AffinityError::Config(
                    "topics.custom_vectors must not be empty".to_string(),
                ));
            }
            None if self.topics.topic_count == 0 => {
                return Err(AffinityError::Config(
                    "topics.topic_count must be >= 1".to_string(),
                ));
            }
            _ => {}
        }
        if let TopicScenario::ClusterAligned { jitter } = self.topics.scenario {
            if !jitter.is_finite() || jitter < 0.0 {
                return Err(AffinityError::Config(format!(
                    "topic jitter must be >= 0, got {jitter}"
                )));
            }
        }
        self.run
            .validate()
            .and_then(|_| self.dynamics.validate())
            .map_err(|e| match e {
                AffinityError::Validation(msg) => AffinityError::Config(msg),
                other => other,
            })
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> AffinityResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| AffinityError::Config(format!("JSON parse error: {e}")))
    }
}
