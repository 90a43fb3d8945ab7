// ─────────────────────────────────────────────────────────────────────
// Affinity Kernel — Topic Generator
// ─────────────────────────────────────────────────────────────────────
//! Builds the topic vectors that act as discussion anchors.
//!
//!   Scenario A: every topic ~ U[-1, 1]^d.
//!   Scenario B: topic k = center k + U[-jitter, jitter]^d (marked as
//!               target), remaining slots filled as in A. The topic count
//!               is raised to the number of centers if needed.
//!   Supplied vectors: used verbatim; under scenario B the one most
//!               similar to each center is marked as target.

use rand::Rng;

use affinity_types::config::DEFAULT_TOPIC_COUNT;
use affinity_types::error::check_vectors;
use affinity_types::{AffinityError, AffinityResult, ClusterCenter, Topic, TopicScenario};

use crate::rng::{check_amplitude, perturb, uniform_vector};
use crate::similarity::nearest_center;

/// Generate the default number of topics (10).
pub fn generate_topics<R: Rng + ?Sized>(
    rng: &mut R,
    dimension: usize,
    scenario: TopicScenario,
    cluster_centers: &[ClusterCenter],
    custom_vectors: Option<&[Vec<f64>]>,
) -> AffinityResult<Vec<Topic>> {
    generate_topic_set(
        rng,
        dimension,
        DEFAULT_TOPIC_COUNT,
        scenario,
        cluster_centers,
        custom_vectors,
    )
}

/// Generate `count` topics (ignored when `custom_vectors` is supplied).
pub fn generate_topic_set<R: Rng + ?Sized>(
    rng: &mut R,
    dimension: usize,
    count: usize,
    scenario: TopicScenario,
    cluster_centers: &[ClusterCenter],
    custom_vectors: Option<&[Vec<f64>]>,
) -> AffinityResult<Vec<Topic>> {
    if let TopicScenario::ClusterAligned { jitter } = scenario {
        check_amplitude(jitter, "topic jitter")?;
    }
    if let Some(vectors) = custom_vectors {
        return from_custom(vectors, scenario, cluster_centers);
    }

    if dimension == 0 {
        return Err(AffinityError::Validation(
            "topic dimension must be >= 1".to_string(),
        ));
    }
    if count == 0 {
        return Err(AffinityError::Validation(
            "topic count must be >= 1".to_string(),
        ));
    }

    let mut topics = Vec::with_capacity(count.max(cluster_centers.len()));

    if let TopicScenario::ClusterAligned { jitter } = scenario {
        check_vectors(
            cluster_centers.iter().map(Vec::as_slice),
            dimension,
            "cluster center",
        )?;
        for (k, center) in cluster_centers.iter().enumerate() {
            let id = topics.len();
            topics.push(Topic {
                id,
                vector: perturb(rng, center, jitter)?,
                name: format!("Topic {} (cluster {k})", id + 1),
                is_target_topic: true,
            });
        }
    }

    while topics.len() < count {
        let id = topics.len();
        topics.push(Topic {
            id,
            vector: uniform_vector(rng, dimension, -1.0, 1.0),
            name: format!("Topic {}", id + 1),
            is_target_topic: false,
        });
    }

    log::debug!(
        "generated {} topics, scenario {}, {} targeted",
        topics.len(),
        scenario.label(),
        topics.iter().filter(|t| t.is_target_topic).count()
    );
    Ok(topics)
}

/// Supplied vectors become topics verbatim. Under scenario B the topic
/// most similar to each center is marked as that center's target.
fn from_custom(
    vectors: &[Vec<f64>],
    scenario: TopicScenario,
    cluster_centers: &[ClusterCenter],
) -> AffinityResult<Vec<Topic>> {
    let first = vectors.first().ok_or_else(|| {
        AffinityError::Validation("custom topic vectors must not be empty".to_string())
    })?;
    let dimension = first.len();
    check_vectors(vectors.iter().map(Vec::as_slice), dimension, "custom topic")?;

    let mut topics: Vec<Topic> = vectors
        .iter()
        .enumerate()
        .map(|(id, v)| Topic {
            id,
            vector: v.clone(),
            name: format!("Topic {}", id + 1),
            is_target_topic: false,
        })
        .collect();

    if scenario.is_cluster_aligned() && !cluster_centers.is_empty() {
        check_vectors(
            cluster_centers.iter().map(Vec::as_slice),
            dimension,
            "cluster center",
        )?;
        for center in cluster_centers {
            topics[nearest_center(center, vectors)].is_target_topic = true;
        }
    }
    Ok(topics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;
    use crate::similarity::cosine_similarity;

    fn centers() -> Vec<ClusterCenter> {
        vec![vec![0.9, -0.2, 0.1], vec![-0.5, 0.5, 0.7]]
    }

    #[test]
    fn test_scenario_a_default_count() {
        let topics =
            generate_topics(&mut seeded(1), 3, TopicScenario::Standard, &centers(), None).unwrap();
        assert_eq!(topics.len(), DEFAULT_TOPIC_COUNT);
        assert!(topics.iter().all(|t| t.vector.len() == 3));
        assert!(topics.iter().all(|t| !t.is_target_topic));
        assert!(topics
            .iter()
            .flat_map(|t| t.vector.iter())
            .all(|x| (-1.0..=1.0).contains(x)));
    }

    #[test]
    fn test_ids_are_sequential() {
        let topics =
            generate_topics(&mut seeded(2), 4, TopicScenario::Standard, &[], None).unwrap();
        for (i, t) in topics.iter().enumerate() {
            assert_eq!(t.id, i);
            assert_eq!(t.name, format!("Topic {}", i + 1));
        }
    }

    #[test]
    fn test_scenario_b_marks_targets() {
        let cs = centers();
        let topics = generate_topics(
            &mut seeded(3),
            3,
            TopicScenario::cluster_aligned(),
            &cs,
            None,
        )
        .unwrap();
        assert_eq!(topics.len(), DEFAULT_TOPIC_COUNT);
        let targets: Vec<&Topic> = topics.iter().filter(|t| t.is_target_topic).collect();
        assert_eq!(targets.len(), cs.len());
        for (t, c) in targets.iter().zip(cs.iter()) {
            assert!(
                cosine_similarity(&t.vector, c) > 0.8,
                "target topic should stay close to its center"
            );
        }
    }

    #[test]
    fn test_scenario_b_raises_count_to_center_count() {
        let cs: Vec<ClusterCenter> = (0..5).map(|i| vec![i as f64 + 1.0, 1.0]).collect();
        let topics = generate_topic_set(
            &mut seeded(4),
            2,
            2,
            TopicScenario::cluster_aligned(),
            &cs,
            None,
        )
        .unwrap();
        assert_eq!(topics.len(), 5);
        assert!(topics.iter().all(|t| t.is_target_topic));
    }

    #[test]
    fn test_scenario_b_without_centers() {
        let topics = generate_topics(
            &mut seeded(5),
            3,
            TopicScenario::cluster_aligned(),
            &[],
            None,
        )
        .unwrap();
        assert_eq!(topics.len(), DEFAULT_TOPIC_COUNT);
        assert!(topics.iter().all(|t| !t.is_target_topic));
    }

    #[test]
    fn test_scenario_b_center_dimension_checked() {
        let err = generate_topics(
            &mut seeded(6),
            4,
            TopicScenario::cluster_aligned(),
            &centers(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, AffinityError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_custom_vectors_used_directly() {
        let custom = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![0.0, 0.0]];
        let topics = generate_topics(
            &mut seeded(7),
            99,
            TopicScenario::Standard,
            &centers(),
            Some(custom.as_slice()),
        )
        .unwrap();
        assert_eq!(topics.len(), 3);
        for (t, v) in topics.iter().zip(custom.iter()) {
            assert_eq!(&t.vector, v);
        }
    }

    #[test]
    fn test_custom_vectors_scenario_b_marks_nearest() {
        let custom = vec![vec![0.0, 1.0, 0.0], vec![1.0, -0.1, 0.2], vec![-1.0, 0.5, 0.8]];
        let topics = generate_topics(
            &mut seeded(9),
            3,
            TopicScenario::cluster_aligned(),
            &centers(),
            Some(custom.as_slice()),
        )
        .unwrap();
        let marked: Vec<bool> = topics.iter().map(|t| t.is_target_topic).collect();
        assert_eq!(marked, vec![false, true, true]);
        assert_eq!(topics[1].vector, custom[1]);
    }

    #[test]
    fn test_custom_vectors_scenario_a_unmarked() {
        let custom = vec![vec![0.9, -0.2, 0.1]];
        let topics = generate_topics(
            &mut seeded(10),
            3,
            TopicScenario::Standard,
            &centers(),
            Some(custom.as_slice()),
        )
        .unwrap();
        assert!(!topics[0].is_target_topic);
    }

    #[test]
    fn test_invalid_jitter_rejected() {
        for jitter in [f64::NAN, f64::INFINITY, -0.5, 1e308] {
            let err = generate_topics(
                &mut seeded(11),
                2,
                TopicScenario::ClusterAligned { jitter },
                &[vec![0.5, 0.5]],
                None,
            )
            .unwrap_err();
            assert!(
                matches!(err, AffinityError::Validation(_)),
                "jitter {jitter}: {err}"
            );
        }
    }

    #[test]
    fn test_custom_vectors_scenario_b_center_dimension_checked() {
        let custom = vec![vec![1.0, 2.0]];
        let err = generate_topics(
            &mut seeded(12),
            2,
            TopicScenario::cluster_aligned(),
            &centers(),
            Some(custom.as_slice()),
        )
        .unwrap_err();
        assert!(matches!(err, AffinityError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_custom_ragged_rejected() {
        let custom = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(generate_topics(
            &mut seeded(8),
            2,
            TopicScenario::Standard,
            &[],
            Some(custom.as_slice())
        )
        .is_err());
    }
}
