// ─────────────────────────────────────────────────────────────────────
// Affinity Kernel — Graph Projection
// ─────────────────────────────────────────────────────────────────────
//! Node/link view of a simulation result for visualization.
//!
//! A pair is linked when its connection is strictly above the threshold,
//! the same comparison the engine uses, so raising the threshold can only
//! remove links.

use serde::{Deserialize, Serialize};

use affinity_types::{AffinityError, AffinityResult, Agent, ConnectionMatrix};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: usize,
    pub cluster: usize,
    /// Connections strictly above the threshold.
    pub degree: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphProjection {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

/// Project agents and connections onto a node/link graph.
pub fn project_for_visualization(
    agents: &[Agent],
    connections: &ConnectionMatrix,
    threshold: f64,
) -> AffinityResult<GraphProjection> {
    let n = agents.len();
    if connections.len() != n {
        return Err(AffinityError::dimension(
            "connection matrix",
            n,
            connections.len(),
        ));
    }
    if threshold.is_nan() {
        return Err(AffinityError::Validation(
            "projection threshold must not be NaN".to_string(),
        ));
    }

    let mut degree = vec![0usize; n];
    let mut links = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let w = connections.get(i, j);
            if w > threshold {
                degree[i] += 1;
                degree[j] += 1;
                links.push(GraphLink {
                    source: i,
                    target: j,
                    weight: w,
                });
            }
        }
    }

    let nodes = agents
        .iter()
        .zip(degree)
        .enumerate()
        .map(|(id, (a, degree))| GraphNode {
            id,
            cluster: a.cluster,
            degree,
        })
        .collect();

    Ok(GraphProjection { nodes, links })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::run_simulation;
    use crate::population::generate_population;
    use crate::rng::seeded;
    use crate::topics::generate_topics;
    use affinity_types::TopicScenario;

    fn fixture() -> (Vec<Agent>, ConnectionMatrix) {
        let agents = vec![
            Agent::new(vec![1.0], 0),
            Agent::new(vec![1.0], 0),
            Agent::new(vec![1.0], 1),
            Agent::new(vec![1.0], 1),
        ];
        let mut m = ConnectionMatrix::zeros(4);
        m.set(0, 1, 0.9);
        m.set(0, 2, 0.3);
        m.set(1, 2, 0.5);
        m.set(2, 3, 0.7);
        (agents, m)
    }

    #[test]
    fn test_nodes_carry_cluster_and_degree() {
        let (agents, m) = fixture();
        let g = project_for_visualization(&agents, &m, 0.4).unwrap();
        assert_eq!(g.nodes.len(), 4);
        let degrees: Vec<usize> = g.nodes.iter().map(|n| n.degree).collect();
        assert_eq!(degrees, vec![1, 2, 2, 1]);
        assert_eq!(g.nodes[3].cluster, 1);
        assert_eq!(g.links.len(), 3);
    }

    #[test]
    fn test_strict_inequality() {
        let (agents, m) = fixture();
        let g = project_for_visualization(&agents, &m, 0.3).unwrap();
        assert!(g.links.iter().all(|l| l.weight > 0.3));
        assert_eq!(g.links.len(), 3);
        let g = project_for_visualization(&agents, &m, 0.29).unwrap();
        assert_eq!(g.links.len(), 4);
    }

    #[test]
    fn test_monotone_in_threshold() {
        let (agents, m) = fixture();
        let mut prev = usize::MAX;
        for step in 0..=20 {
            let t = step as f64 * 0.05;
            let count = project_for_visualization(&agents, &m, t).unwrap().links.len();
            assert!(count <= prev, "links increased at threshold {t}");
            assert_eq!(count, m.link_count(t));
            prev = count;
        }
    }

    #[test]
    fn test_monotone_on_simulation_result() {
        let mut rng = seeded(17);
        let pop = generate_population(&mut rng, 40, 6, 3, None).unwrap();
        let topics = generate_topics(
            &mut rng,
            6,
            TopicScenario::Standard,
            &pop.cluster_centers,
            None,
        )
        .unwrap();
        let result = run_simulation(pop.agents, &topics, 25, 0.3, 5).unwrap();

        let mut prev = usize::MAX;
        for step in 0..=100 {
            let t = step as f64 * 0.01;
            let g = project_for_visualization(&result.agents, &result.connections, t).unwrap();
            assert_eq!(g.nodes.len(), 40);
            assert!(g.links.len() <= prev, "links increased at threshold {t}");
            assert!(g.links.iter().all(|l| l.weight > t));
            prev = g.links.len();
        }
        let dense = project_for_visualization(&result.agents, &result.connections, 0.0).unwrap();
        assert!(!dense.links.is_empty());
    }

    #[test]
    fn test_degree_sum_is_twice_links() {
        let (agents, m) = fixture();
        let g = project_for_visualization(&agents, &m, 0.0).unwrap();
        let sum: usize = g.nodes.iter().map(|n| n.degree).sum();
        assert_eq!(sum, 2 * g.links.len());
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let (agents, _) = fixture();
        let m = ConnectionMatrix::zeros(3);
        assert!(project_for_visualization(&agents, &m, 0.5).is_err());
    }
}
