// ─────────────────────────────────────────────────────────────────────
// Affinity Kernel — Run Summary
// ─────────────────────────────────────────────────────────────────────
//! Aggregate network statistics for reports and scenario comparison.
//!
//! polarization = mean intra-cluster connection − mean inter-cluster
//! connection. Positive values mean clusters are tighter internally than
//! with each other; 0 when either side has no pairs.

use serde::{Deserialize, Serialize};

use affinity_types::{AffinityError, AffinityResult, SimulationResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub agents: usize,
    pub cycles: usize,
    pub threshold: f64,
    /// Unordered pairs with connection strictly above `threshold`.
    pub links: usize,
    /// `links` over the number of unordered pairs.
    pub density: f64,
    pub mean_connection: f64,
    pub max_connection: f64,
    /// Member count per cluster id (index = id).
    pub cluster_sizes: Vec<usize>,
    pub intra_cluster_mean: f64,
    pub inter_cluster_mean: f64,
    pub polarization: f64,
}

impl SimulationSummary {
    /// Fails when the agent list and the connection matrix disagree on
    /// the population size.
    pub fn from_result(result: &SimulationResult, threshold: f64) -> AffinityResult<Self> {
        let m = &result.connections;
        let n = m.len();
        if result.agents.len() != n {
            return Err(AffinityError::dimension(
                "connection matrix",
                result.agents.len(),
                n,
            ));
        }
        let pairs = n * n.saturating_sub(1) / 2;
        let links = m.link_count(threshold);

        let slots = result
            .agents
            .iter()
            .map(|a| a.cluster)
            .max()
            .map_or(0, |c| c + 1);
        let mut cluster_sizes = vec![0usize; slots];
        for a in &result.agents {
            cluster_sizes[a.cluster] += 1;
        }

        let (mut intra_sum, mut intra_n) = (0.0, 0usize);
        let (mut inter_sum, mut inter_n) = (0.0, 0usize);
        let mut max_connection = 0.0f64;
        for i in 0..n {
            for j in (i + 1)..n {
                let w = m.get(i, j);
                max_connection = max_connection.max(w);
                if result.agents[i].cluster == result.agents[j].cluster {
                    intra_sum += w;
                    intra_n += 1;
                } else {
                    inter_sum += w;
                    inter_n += 1;
                }
            }
        }
        let mean = |sum: f64, count: usize| if count == 0 { 0.0 } else { sum / count as f64 };
        let intra_cluster_mean = mean(intra_sum, intra_n);
        let inter_cluster_mean = mean(inter_sum, inter_n);
        let polarization = if intra_n == 0 || inter_n == 0 {
            0.0
        } else {
            intra_cluster_mean - inter_cluster_mean
        };

        Ok(Self {
            agents: n,
            cycles: result.log.len(),
            threshold,
            links,
            density: if pairs == 0 { 0.0 } else { links as f64 / pairs as f64 },
            mean_connection: m.mean_off_diagonal(),
            max_connection,
            cluster_sizes,
            intra_cluster_mean,
            inter_cluster_mean,
            polarization,
        })
    }

    /// Clusters with at least one member.
    pub fn active_clusters(&self) -> usize {
        self.cluster_sizes.iter().filter(|&&s| s > 0).count()
    }
}
