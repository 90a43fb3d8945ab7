// ─────────────────────────────────────────────────────────────────────
// Affinity Kernel — Cluster Reassigner
// ─────────────────────────────────────────────────────────────────────
//! Periodic re-clustering, one k-means style pass:
//!   1. Each cluster with members moves to the mean of its members.
//!      Clusters without members are dropped and the survivors are
//!      renumbered in their original order.
//!   2. Each agent joins the surviving center with the highest cosine
//!      similarity (lowest index wins ties).
//!
//! Cost O(N · k · d). Agent opinion vectors are never modified.

use affinity_types::{AffinityError, AffinityResult, Agent, ClusterCenter};

use crate::similarity::nearest_center;

/// Per-id member means. Ids without members yield `None`.
fn member_means(agents: &[Agent], slots: usize, dimension: usize) -> Vec<Option<ClusterCenter>> {
    let mut sums = vec![vec![0.0; dimension]; slots];
    let mut counts = vec![0usize; slots];
    for a in agents {
        counts[a.cluster] += 1;
        for (s, v) in sums[a.cluster].iter_mut().zip(a.values.iter()) {
            *s += v;
        }
    }
    sums.into_iter()
        .zip(counts)
        .map(|(mut sum, count)| {
            if count == 0 {
                return None;
            }
            let inv = 1.0 / count as f64;
            sum.iter_mut().for_each(|s| *s *= inv);
            Some(sum)
        })
        .collect()
}

/// Centers derived from the agents' current assignment.
///
/// Slot `k` holds the mean of agents with `cluster == k`; ids up to the
/// largest one in use get a slot. Unused ids get a zero placeholder,
/// which the next [`recalculate_clusters`] call drops.
pub fn centroids_from_assignment(agents: &[Agent]) -> Vec<ClusterCenter> {
    let Some(dimension) = agents.first().map(Agent::dimension) else {
        return Vec::new();
    };
    let slots = agents.iter().map(|a| a.cluster).max().map_or(0, |m| m + 1);
    member_means(agents, slots, dimension)
        .into_iter()
        .map(|c| c.unwrap_or_else(|| vec![0.0; dimension]))
        .collect()
}

/// Recompute centers and reassign `agents[*].cluster`.
///
/// Returns the new center set; its length never exceeds the number of
/// distinct cluster ids in use before the call.
pub fn recalculate_clusters(
    agents: &mut [Agent],
    cluster_centers: &[ClusterCenter],
) -> AffinityResult<Vec<ClusterCenter>> {
    let Some(dimension) = agents.first().map(Agent::dimension) else {
        return Ok(Vec::new());
    };
    let slots = cluster_centers.len();
    for (idx, a) in agents.iter().enumerate() {
        if a.cluster >= slots {
            return Err(AffinityError::Validation(format!(
                "agent {idx} refers to cluster {} but only {slots} centers exist",
                a.cluster
            )));
        }
        if a.values.len() != dimension {
            return Err(AffinityError::dimension(
                format!("agent {idx}"),
                dimension,
                a.values.len(),
            ));
        }
    }

    // Step 1: centroid update, dropping empty clusters.
    let means = member_means(agents, slots, dimension);
    let dropped = means.iter().filter(|m| m.is_none()).count();
    if dropped > 0 {
        log::debug!("recalculate_clusters: dropping {dropped} empty cluster(s)");
    }
    let centers: Vec<ClusterCenter> = means.into_iter().flatten().collect();

    // Step 2: nearest-center reassignment.
    for a in agents.iter_mut() {
        a.cluster = nearest_center(&a.values, &centers);
    }

    Ok(centers)
}
