// ─────────────────────────────────────────────────────────────────────
// Affinity Kernel — Scenarios and Presets
// ─────────────────────────────────────────────────────────────────────
//! Closed scenario variants.
//!
//! `TopicScenario` selects how topic vectors are generated ("A" / "B").
//! `ScenarioPreset` bundles a full parameter set for one of four
//! archetypal runs; see [`crate::config::SimulationConfig::from_preset`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AffinityError;

/// Default offset amplitude for cluster-aligned topics.
pub const DEFAULT_TOPIC_JITTER: f64 = 0.1;

fn default_jitter() -> f64 {
    DEFAULT_TOPIC_JITTER
}

/// Topic generation mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopicScenario {
    /// Scenario A: topics drawn uniformly, uncorrelated with clusters.
    #[serde(alias = "A")]
    Standard,
    /// Scenario B: one topic snapped near each cluster center.
    #[serde(alias = "B")]
    ClusterAligned {
        /// Half-width of the uniform offset applied to each center.
        #[serde(default = "default_jitter")]
        jitter: f64,
    },
}

impl Default for TopicScenario {
    fn default() -> Self {
        Self::Standard
    }
}

impl TopicScenario {
    /// Scenario B with the default jitter.
    pub fn cluster_aligned() -> Self {
        Self::ClusterAligned {
            jitter: DEFAULT_TOPIC_JITTER,
        }
    }

    pub fn is_cluster_aligned(&self) -> bool {
        matches!(self, Self::ClusterAligned { .. })
    }

    /// Single-letter label ("A" or "B").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "A",
            Self::ClusterAligned { .. } => "B",
        }
    }
}

impl fmt::Display for TopicScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "A (standard)"),
            Self::ClusterAligned { jitter } => write!(f, "B (cluster-aligned, jitter {jitter})"),
        }
    }
}

impl FromStr for TopicScenario {
    type Err = AffinityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "standard" => Ok(Self::Standard),
            "b" | "cluster_aligned" | "cluster-aligned" => Ok(Self::cluster_aligned()),
            other => Err(AffinityError::Config(format!(
                "unknown topic scenario '{other}' (expected A or B)"
            ))),
        }
    }
}

/// Four archetypal parameter sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioPreset {
    /// One broad group, permissive threshold: opinions converge.
    Consensus,
    /// Two groups each pulled by its own aligned topic.
    Polarization,
    /// Strict threshold over many small groups: few links survive.
    Fragmentation,
    /// Aligned topics plus periodic re-clustering: groups close in on themselves.
    EchoChambers,
}

impl ScenarioPreset {
    pub const ALL: [ScenarioPreset; 4] = [
        Self::Consensus,
        Self::Polarization,
        Self::Fragmentation,
        Self::EchoChambers,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Consensus => "consensus",
            Self::Polarization => "polarization",
            Self::Fragmentation => "fragmentation",
            Self::EchoChambers => "echo_chambers",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Consensus => "single cluster, low threshold; opinions drift together",
            Self::Polarization => "two clusters with aligned topics; camps pull apart",
            Self::Fragmentation => "many clusters, strict threshold; sparse network",
            Self::EchoChambers => "aligned topics and periodic re-clustering; dense in-groups",
        }
    }
}

impl fmt::Display for ScenarioPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioPreset {
    type Err = AffinityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name() == key)
            .ok_or_else(|| AffinityError::Config(format!("unknown preset '{s}'")))
    }
}
