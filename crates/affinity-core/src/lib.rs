// ─────────────────────────────────────────────────────────────────────
// Affinity Kernel — Core Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Opinion/affinity network simulation.
//!
//! A population of vector-valued agents interacts over a fixed set of
//! topics. Each synchronous cycle couples three processes:
//!   - vector-space similarity between every pair of agents
//!   - mutual influence of linked pairs and pull of aligned topics
//!   - periodic unsupervised re-clustering
//!
//! and yields an evolving symmetric connection matrix.
//!
//! Architecture:
//!   - similarity: cosine similarity, zero-vector policy
//!   - population / topics: seeded generators
//!   - clusters: centroid update + nearest-center reassignment
//!   - engine: cycle loop with pre-allocated scratch and checkpoints
//!   - projection: node/link graph for visualization
//!   - summary / status: reporting and caller-owned run state
//!   - pipeline: config → outcome

pub mod clusters;
pub mod engine;
pub mod pipeline;
pub mod population;
pub mod projection;
pub mod rng;
pub mod similarity;
pub mod status;
pub mod summary;
pub mod topics;

pub use clusters::recalculate_clusters;
pub use engine::{run_simulation, CycleProgress, SimulationEngine};
pub use pipeline::{prepare, run_from_config, run_from_config_with_checkpoint, SimulationOutcome};
pub use population::generate_population;
pub use projection::{project_for_visualization, GraphLink, GraphNode, GraphProjection};
pub use similarity::cosine_similarity;
pub use status::{RunPhase, RunStatus, SharedRunStatus};
pub use summary::SimulationSummary;
pub use topics::generate_topics;
