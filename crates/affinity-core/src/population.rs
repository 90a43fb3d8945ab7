// ─────────────────────────────────────────────────────────────────────
// Affinity Kernel — Population Generator
// ─────────────────────────────────────────────────────────────────────
//! Builds the initial agents and cluster centers.
//!
//! Centers are drawn uniformly from [-1, 1]^d. Synthetic agents are
//! assigned round-robin to centers and placed at their center plus
//! uniform noise of half-width `spread`. Supplied vectors are taken
//! verbatim and assigned to their most similar center.

use rand::Rng;

use affinity_types::error::check_vectors;
use affinity_types::{AffinityError, AffinityResult, Agent, ClusterCenter, Population};

use crate::rng::{check_amplitude, perturb, uniform_vector};
use crate::similarity::nearest_center;

/// Half-width of the agent noise used by [`generate_population`].
pub const DEFAULT_AGENT_SPREAD: f64 = 0.3;

/// Generate a population with the default agent spread.
///
/// When `custom_vectors` is `Some`, `count` and `dimension` are ignored:
/// one agent is created per vector and the dimension is the vectors'
/// common length.
pub fn generate_population<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    dimension: usize,
    cluster_count: usize,
    custom_vectors: Option<&[Vec<f64>]>,
) -> AffinityResult<Population> {
    generate_population_with_spread(
        rng,
        count,
        dimension,
        cluster_count,
        DEFAULT_AGENT_SPREAD,
        custom_vectors,
    )
}

/// [`generate_population`] with an explicit agent noise half-width.
pub fn generate_population_with_spread<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    dimension: usize,
    cluster_count: usize,
    spread: f64,
    custom_vectors: Option<&[Vec<f64>]>,
) -> AffinityResult<Population> {
    if cluster_count == 0 {
        return Err(AffinityError::Validation(
            "cluster_count must be >= 1".to_string(),
        ));
    }
    let spread = check_amplitude(spread, "agent spread")?;

    match custom_vectors {
        Some(vectors) => from_custom(rng, cluster_count, vectors),
        None => synthetic(rng, count, dimension, cluster_count, spread),
    }
}

fn random_centers<R: Rng + ?Sized>(rng: &mut R, k: usize, dimension: usize) -> Vec<ClusterCenter> {
    (0..k)
        .map(|_| uniform_vector(rng, dimension, -1.0, 1.0))
        .collect()
}

fn synthetic<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    dimension: usize,
    cluster_count: usize,
    spread: f64,
) -> AffinityResult<Population> {
    if count == 0 {
        return Err(AffinityError::Validation(
            "agent count must be >= 1".to_string(),
        ));
    }
    if dimension == 0 {
        return Err(AffinityError::Validation(
            "dimension must be >= 1".to_string(),
        ));
    }

    let cluster_centers = random_centers(rng, cluster_count, dimension);
    let agents = (0..count)
        .map(|i| {
            let cluster = i % cluster_count;
            Ok(Agent::new(perturb(rng, &cluster_centers[cluster], spread)?, cluster))
        })
        .collect::<AffinityResult<Vec<Agent>>>()?;

    log::debug!(
        "generated {count} synthetic agents (d={dimension}, k={cluster_count}, spread={spread})"
    );
    Ok(Population {
        agents,
        cluster_centers,
    })
}

fn from_custom<R: Rng + ?Sized>(
    rng: &mut R,
    cluster_count: usize,
    vectors: &[Vec<f64>],
) -> AffinityResult<Population> {
    let first = vectors.first().ok_or_else(|| {
        AffinityError::Validation("custom agent vectors must not be empty".to_string())
    })?;
    let dimension = first.len();
    if dimension == 0 {
        return Err(AffinityError::Validation(
            "custom agent vectors must have dimension >= 1".to_string(),
        ));
    }
    check_vectors(vectors.iter().map(Vec::as_slice), dimension, "custom agent")?;

    let cluster_centers = random_centers(rng, cluster_count, dimension);
    let agents = vectors
        .iter()
        .map(|v| Agent::new(v.clone(), nearest_center(v, &cluster_centers)))
        .collect();

    log::debug!(
        "loaded {} custom agents (d={dimension}, k={cluster_count})",
        vectors.len()
    );
    Ok(Population {
        agents,
        cluster_centers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;

    #[test]
    fn test_counts_and_dimensions() {
        let pop = generate_population(&mut seeded(1), 50, 7, 4, None).unwrap();
        assert_eq!(pop.agents.len(), 50);
        assert_eq!(pop.cluster_centers.len(), 4);
        assert!(pop.cluster_centers.iter().all(|c| c.len() == 7));
        assert!(pop.agents.iter().all(|a| a.values.len() == 7));
        assert!(pop.agents.iter().all(|a| a.cluster < 4));
        assert_eq!(pop.dimension(), 7);
    }

    #[test]
    fn test_round_robin_covers_every_cluster() {
        let pop = generate_population(&mut seeded(2), 9, 3, 3, None).unwrap();
        for k in 0..3 {
            assert_eq!(pop.agents.iter().filter(|a| a.cluster == k).count(), 3);
        }
    }

    #[test]
    fn test_agents_near_their_center() {
        let spread = 0.2;
        let pop = generate_population_with_spread(&mut seeded(3), 30, 5, 3, spread, None).unwrap();
        for a in &pop.agents {
            let c = &pop.cluster_centers[a.cluster];
            assert!(a
                .values
                .iter()
                .zip(c.iter())
                .all(|(x, y)| (x - y).abs() <= spread + 1e-12));
        }
    }

    #[test]
    fn test_centers_in_unit_box() {
        let pop = generate_population(&mut seeded(4), 10, 20, 5, None).unwrap();
        assert!(pop
            .cluster_centers
            .iter()
            .flatten()
            .all(|x| (-1.0..=1.0).contains(x)));
    }

    #[test]
    fn test_custom_vectors_override_count_and_dimension() {
        let custom = vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.0, 0.0, -1.0]];
        let pop = generate_population(&mut seeded(5), 0, 0, 2, Some(custom.as_slice())).unwrap();
        assert_eq!(pop.agents.len(), 3);
        for (a, v) in pop.agents.iter().zip(custom.iter()) {
            assert_eq!(&a.values, v);
            assert!(a.cluster < 2);
        }
        assert!(pop.cluster_centers.iter().all(|c| c.len() == 3));
    }

    #[test]
    fn test_custom_vectors_assigned_to_nearest_center() {
        let custom = vec![vec![0.3, -0.8], vec![-0.5, 0.1]];
        let pop = generate_population(&mut seeded(6), 0, 0, 3, Some(custom.as_slice())).unwrap();
        for a in &pop.agents {
            assert_eq!(a.cluster, nearest_center(&a.values, &pop.cluster_centers));
        }
    }

    #[test]
    fn test_custom_ragged_rejected() {
        let custom = vec![vec![1.0, 0.0], vec![1.0]];
        let err = generate_population(&mut seeded(7), 0, 0, 2, Some(custom.as_slice())).unwrap_err();
        assert!(matches!(err, AffinityError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_custom_empty_rejected() {
        let custom: Vec<Vec<f64>> = Vec::new();
        assert!(generate_population(&mut seeded(8), 10, 3, 2, Some(custom.as_slice())).is_err());
    }

    #[test]
    fn test_zero_counts_rejected() {
        assert!(generate_population(&mut seeded(9), 0, 3, 2, None).is_err());
        assert!(generate_population(&mut seeded(9), 3, 0, 2, None).is_err());
        assert!(generate_population(&mut seeded(9), 3, 3, 0, None).is_err());
    }

    #[test]
    fn test_deterministic_for_seed() {
        let a = generate_population(&mut seeded(11), 12, 4, 3, None).unwrap();
        let b = generate_population(&mut seeded(11), 12, 4, 3, None).unwrap();
        assert_eq!(a.agents, b.agents);
        assert_eq!(a.cluster_centers, b.cluster_centers);
    }
}
