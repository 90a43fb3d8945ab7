// ─────────────────────────────────────────────────────────────────────
// Affinity Kernel — Simulation Engine
// ─────────────────────────────────────────────────────────────────────
//! Synchronous cycle loop coupling opinions and connections.
//!
//! Per cycle, from a snapshot of cycle t-1:
//!   1. s_ij = cos(v_i, v_j) for every unordered pair.
//!   2. s_ij > τ  (linked):   C_ij += η_c · (max(s_ij, 0) − C_ij)
//!      s_ij ≤ τ  (unlinked): C_ij *= (1 − δ)
//!   3. For each agent with ≥ 1 linked peer:
//!        Δv_i = η_p · mean_{j linked}(v_j − v_i)
//!             + η_t · mean_{t: cos(v_i, t) > τ}(t − v_i)
//!      With η_p = 0 an agent never leaves the convex hull of its
//!      previous position and its aligned topics.
//!   4. v_i += Δv_i for all agents at once.
//!   5. Every `recalculate_after` cycles: cluster reassignment.
//!
//! Cost O(cycles · N² · d). The value snapshot, norms and accumulators
//! are pre-allocated once; a cycle performs no heap allocation apart
//! from the log entry and optional re-clustering.

use std::ops::ControlFlow;

use affinity_types::error::check_vectors;
use affinity_types::model::distinct_clusters;
use affinity_types::{
    AffinityError, AffinityResult, Agent, ClusterCenter, ConnectionMatrix, CycleLog,
    DynamicsParams, RunParams, SimulationResult, Topic,
};

use crate::clusters::{centroids_from_assignment, recalculate_clusters};
use crate::similarity::{cosine_with_norms, norm};

/// Handed to the checkpoint callback after every completed cycle.
#[derive(Debug, Clone, Copy)]
pub struct CycleProgress<'a> {
    /// Cycles completed so far (1-based).
    pub cycle: usize,
    pub total_cycles: usize,
    pub log: &'a CycleLog,
}

impl CycleProgress<'_> {
    /// Completed fraction in [0, 1].
    pub fn fraction(&self) -> f64 {
        if self.total_cycles == 0 {
            1.0
        } else {
            self.cycle as f64 / self.total_cycles as f64
        }
    }
}

/// Owns one run: agents, connection matrix and scratch buffers.
pub struct SimulationEngine {
    run: RunParams,
    dynamics: DynamicsParams,
    n: usize,
    dim: usize,
    agents: Vec<Agent>,
    centers: Vec<ClusterCenter>,
    connections: ConnectionMatrix,
    topic_values: Vec<f64>,
    topic_norms: Vec<f64>,
    // Scratch
    values: Vec<f64>,
    norms: Vec<f64>,
    peer_sum: Vec<f64>,
    peer_count: Vec<usize>,
    topic_sum: Vec<f64>,
    delta: Vec<f64>,
    cycle: usize,
    log: Vec<CycleLog>,
}

impl SimulationEngine {
    /// Create an engine, deriving initial centers from the agents'
    /// cluster assignment.
    pub fn new(
        agents: Vec<Agent>,
        topics: &[Topic],
        run: RunParams,
        dynamics: DynamicsParams,
    ) -> AffinityResult<Self> {
        let centers = centroids_from_assignment(&agents);
        Self::with_centers(agents, topics, centers, run, dynamics)
    }

    /// Create an engine with an explicit initial center set.
    ///
    /// Every `agent.cluster` must index into `centers`.
    pub fn with_centers(
        agents: Vec<Agent>,
        topics: &[Topic],
        centers: Vec<ClusterCenter>,
        run: RunParams,
        dynamics: DynamicsParams,
    ) -> AffinityResult<Self> {
        run.validate()?;
        dynamics.validate()?;
        if agents.is_empty() {
            return Err(AffinityError::Validation(
                "agents must not be empty".to_string(),
            ));
        }
        if topics.is_empty() {
            return Err(AffinityError::Validation(
                "topics must not be empty".to_string(),
            ));
        }
        let dim = agents[0].dimension();
        if dim == 0 {
            return Err(AffinityError::Validation(
                "agent dimension must be >= 1".to_string(),
            ));
        }
        check_vectors(agents.iter().map(|a| a.values.as_slice()), dim, "agent")?;
        check_vectors(topics.iter().map(|t| t.vector.as_slice()), dim, "topic")?;
        check_vectors(centers.iter().map(Vec::as_slice), dim, "cluster center")?;
        if let Some((idx, a)) = agents
            .iter()
            .enumerate()
            .find(|(_, a)| a.cluster >= centers.len())
        {
            return Err(AffinityError::Validation(format!(
                "agent {idx} refers to cluster {} but only {} centers exist",
                a.cluster,
                centers.len()
            )));
        }

        let zero_agents = agents.iter().filter(|a| norm(&a.values) == 0.0).count();
        if zero_agents > 0 {
            log::warn!("{zero_agents} agent(s) start with a zero opinion vector");
        }

        let n = agents.len();
        let topic_values: Vec<f64> = topics.iter().flat_map(|t| t.vector.iter().copied()).collect();
        let topic_norms = topics.iter().map(|t| norm(&t.vector)).collect();

        log::debug!(
            "engine init: n={n}, d={dim}, topics={}, cycles={}, threshold={}, recalc={}",
            topics.len(),
            run.cycles,
            run.threshold,
            run.recalculate_after
        );

        Ok(Self {
            run,
            dynamics,
            n,
            dim,
            agents,
            centers,
            connections: ConnectionMatrix::zeros(n),
            topic_values,
            topic_norms,
            values: vec![0.0; n * dim],
            norms: vec![0.0; n],
            peer_sum: vec![0.0; n * dim],
            peer_count: vec![0; n],
            topic_sum: vec![0.0; dim],
            delta: vec![0.0; dim],
            cycle: 0,
            log: Vec::with_capacity(run.cycles.min(4096)),
        })
    }

    // ------------------------------------------------------------------
    // Cycle
    // ------------------------------------------------------------------

    fn snapshot(&mut self) {
        let d = self.dim;
        for (i, a) in self.agents.iter().enumerate() {
            let row = &mut self.values[i * d..(i + 1) * d];
            row.copy_from_slice(&a.values);
            self.norms[i] = norm(row);
        }
        self.peer_sum.iter_mut().for_each(|v| *v = 0.0);
        self.peer_count.iter_mut().for_each(|c| *c = 0);
    }

    /// Pairwise pass: connection update and peer accumulation.
    /// Returns the number of linked pairs.
    fn update_pairs(&mut self) -> usize {
        let (n, d) = (self.n, self.dim);
        let threshold = self.run.threshold;
        let rate = self.dynamics.connection_rate;
        let keep = 1.0 - self.dynamics.decay_rate;
        let mut linked = 0;

        for i in 0..n {
            let io = i * d;
            for j in (i + 1)..n {
                let jo = j * d;
                let sim = cosine_with_norms(
                    &self.values[io..io + d],
                    &self.values[jo..jo + d],
                    self.norms[i],
                    self.norms[j],
                );
                let c = self.connections.get(i, j);
                if sim > threshold {
                    linked += 1;
                    self.connections.set(i, j, c + rate * (sim.max(0.0) - c));
                    for k in 0..d {
                        let diff = self.values[jo + k] - self.values[io + k];
                        self.peer_sum[io + k] += diff;
                        self.peer_sum[jo + k] -= diff;
                    }
                    self.peer_count[i] += 1;
                    self.peer_count[j] += 1;
                } else {
                    self.connections.set(i, j, c * keep);
                }
            }
        }
        linked
    }

    /// Apply peer and topic influence. Returns the mean update length.
    fn update_opinions(&mut self) -> f64 {
        let d = self.dim;
        let threshold = self.run.threshold;
        let mut total_shift = 0.0;

        for i in 0..self.n {
            let count = self.peer_count[i];
            if count == 0 {
                continue;
            }
            let io = i * d;
            let prev = &self.values[io..io + d];
            let peer_scale = self.dynamics.influence_rate / count as f64;
            for k in 0..d {
                self.delta[k] = peer_scale * self.peer_sum[io + k];
            }

            self.topic_sum.iter_mut().for_each(|v| *v = 0.0);
            let mut aligned = 0usize;
            for (t_idx, &t_norm) in self.topic_norms.iter().enumerate() {
                let topic = &self.topic_values[t_idx * d..(t_idx + 1) * d];
                if cosine_with_norms(prev, topic, self.norms[i], t_norm) > threshold {
                    aligned += 1;
                    for k in 0..d {
                        self.topic_sum[k] += topic[k] - prev[k];
                    }
                }
            }
            if aligned > 0 {
                let topic_scale = self.dynamics.topic_pull / aligned as f64;
                for k in 0..d {
                    self.delta[k] += topic_scale * self.topic_sum[k];
                }
            }

            let values = &mut self.agents[i].values;
            for k in 0..d {
                values[k] = prev[k] + self.delta[k];
            }
            total_shift += norm(&self.delta);
        }
        total_shift / self.n as f64
    }

    /// Run one synchronous cycle.
    pub fn step(&mut self) -> AffinityResult<CycleLog> {
        if self.is_complete() {
            return Err(AffinityError::Validation(format!(
                "all {} cycles already completed",
                self.run.cycles
            )));
        }

        self.snapshot();
        let linked_pairs = self.update_pairs();
        let mean_shift = self.update_opinions();
        self.cycle += 1;

        let every = self.run.recalculate_after;
        let recalculated = every > 0 && self.cycle % every == 0;
        if recalculated {
            self.centers = recalculate_clusters(&mut self.agents, &self.centers)?;
            log::debug!(
                "cycle {}: re-clustered into {} center(s)",
                self.cycle,
                self.centers.len()
            );
        }

        let entry = CycleLog {
            cycle: self.cycle,
            linked_pairs,
            mean_connection: self.connections.mean_off_diagonal(),
            mean_shift,
            active_clusters: distinct_clusters(&self.agents),
            recalculated,
        };
        self.log.push(entry.clone());
        Ok(entry)
    }

    /// Run all remaining cycles.
    pub fn run(&mut self) -> AffinityResult<()> {
        self.run_with_checkpoint(|_| ControlFlow::Continue(()))
    }

    /// Run all remaining cycles, calling `checkpoint` at each cycle
    /// boundary. `ControlFlow::Break` stops the run with
    /// [`AffinityError::Cancelled`].
    pub fn run_with_checkpoint<F>(&mut self, mut checkpoint: F) -> AffinityResult<()>
    where
        F: FnMut(&CycleProgress<'_>) -> ControlFlow<()>,
    {
        while !self.is_complete() {
            let entry = self.step()?;
            let progress = CycleProgress {
                cycle: self.cycle,
                total_cycles: self.run.cycles,
                log: &entry,
            };
            if checkpoint(&progress).is_break() {
                log::info!("simulation cancelled at cycle {}", self.cycle);
                return Err(AffinityError::Cancelled {
                    completed_cycles: self.cycle,
                });
            }
        }
        log::info!(
            "simulation complete: {} agents, {} cycles, {} links above {}",
            self.n,
            self.cycle,
            self.connections.link_count(self.run.threshold),
            self.run.threshold
        );
        Ok(())
    }

    /// Consume the engine. Fails if cycles remain.
    pub fn into_result(self) -> AffinityResult<SimulationResult> {
        if !self.is_complete() {
            return Err(AffinityError::Cancelled {
                completed_cycles: self.cycle,
            });
        }
        Ok(SimulationResult {
            agents: self.agents,
            connections: self.connections,
            cluster_centers: self.centers,
            log: self.log,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.cycle >= self.run.cycles
    }

    /// Completed cycles.
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn connections(&self) -> &ConnectionMatrix {
        &self.connections
    }

    pub fn cluster_centers(&self) -> &[ClusterCenter] {
        &self.centers
    }

    pub fn log(&self) -> &[CycleLog] {
        &self.log
    }
}

/// Run a full simulation with default dynamics.
pub fn run_simulation(
    agents: Vec<Agent>,
    topics: &[Topic],
    cycles: usize,
    threshold: f64,
    recalculate_after: usize,
) -> AffinityResult<SimulationResult> {
    let run = RunParams {
        cycles,
        threshold,
        recalculate_after,
    };
    let mut engine = SimulationEngine::new(agents, topics, run, DynamicsParams::default())?;
    engine.run()?;
    engine.into_result()
}
