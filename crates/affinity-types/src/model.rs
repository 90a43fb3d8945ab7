// ─────────────────────────────────────────────────────────────────────
// Affinity Kernel — Data Model
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::matrix::ConnectionMatrix;

/// A centroid in opinion space (length = dimension).
pub type ClusterCenter = Vec<f64>;

/// One member of the population. Identity is its index in the agent list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Opinion vector (length = dimension).
    pub values: Vec<f64>,
    /// Index into the active cluster-center set.
    pub cluster: usize,
}

impl Agent {
    pub fn new(values: Vec<f64>, cluster: usize) -> Self {
        Self { values, cluster }
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }
}

/// A discussion anchor. Immutable after generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: usize,
    pub vector: Vec<f64>,
    pub name: String,
    /// Set only for topics snapped toward a cluster center.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_target_topic: bool,
}

/// Output of the population generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Population {
    pub agents: Vec<Agent>,
    pub cluster_centers: Vec<ClusterCenter>,
}

impl Population {
    pub fn dimension(&self) -> usize {
        self.agents.first().map_or(0, Agent::dimension)
    }
}

/// Per-cycle log entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleLog {
    /// 1-based cycle number.
    pub cycle: usize,
    /// Pairs whose similarity exceeded the threshold this cycle.
    pub linked_pairs: usize,
    /// Mean off-diagonal connection strength after the update.
    pub mean_connection: f64,
    /// Mean Euclidean length of the per-agent opinion update.
    pub mean_shift: f64,
    /// Distinct cluster ids in use after the cycle.
    pub active_clusters: usize,
    /// Whether cluster reassignment ran at the end of this cycle.
    pub recalculated: bool,
}

/// Final state of one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub agents: Vec<Agent>,
    pub connections: ConnectionMatrix,
    pub cluster_centers: Vec<ClusterCenter>,
    pub log: Vec<CycleLog>,
}

impl SimulationResult {
    /// Number of distinct cluster ids across the final agents.
    pub fn distinct_clusters(&self) -> usize {
        distinct_clusters(&self.agents)
    }
}

/// Number of distinct cluster ids used by `agents`.
pub fn distinct_clusters(agents: &[Agent]) -> usize {
    let mut ids: Vec<usize> = agents.iter().map(|a| a.cluster).collect();
    ids.sort_unstable();
    ids.dedup();
    ids.len()
}
