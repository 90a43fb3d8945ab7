// ─────────────────────────────────────────────────────────────────────
// Affinity Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! Affinity Kernel, the opinion/affinity network simulator.

pub mod config;
pub mod error;
pub mod matrix;
pub mod model;
pub mod scenario;

pub use config::{DynamicsParams, PopulationParams, RunParams, SimulationConfig, TopicParams};
pub use error::{AffinityError, AffinityResult};
pub use matrix::ConnectionMatrix;
pub use model::{Agent, ClusterCenter, CycleLog, Population, SimulationResult, Topic};
pub use scenario::{ScenarioPreset, TopicScenario};
