//! riskhub core library - composite risk scoring and scenario simulation

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Every entry point is a pure function of its inputs
// - Randomness is only read through an injected `UniformSource`
// - No global mutable state, clocks, threads, or I/O inside the engine
// - Recoverable input problems degrade to documented defaults
// - Identical input and seed yield byte-for-byte identical output

pub mod aggregates;
pub mod config;
pub mod error;
pub mod profile;
pub mod project;
pub mod report;
pub mod risk;
pub mod rng;
pub mod sandbox;
pub mod scenario;
pub mod simulation;
pub mod trends;

pub use aggregates::{score_projects, summarize, PortfolioSummary, ProjectScore};
pub use config::ResolvedConfig;
pub use error::{EngineError, EngineResult};
pub use profile::{ProfileRegistry, RiskWeightProfile};
pub use project::{Portfolio, Project};
pub use risk::{classify, score, score_with_registry, Classification, StatusTier};
pub use rng::{FixedSequence, RngSource, UniformSource};
pub use sandbox::{aggregate, SandboxAggregator, SandboxResult, SandboxRisk, StagedScenario, StagedSet};
pub use scenario::{Scenario, ScenarioBaseline, ScenarioTable};
pub use simulation::{simulate, MonteCarloEngine, SimulationResult};
pub use trends::{generate_trend, trend_direction, TrendDirection, TrendIndicator, TrendPoint};
