pub mod analysis_export;
pub mod analyzer;
pub mod config;
pub mod error;
pub mod fake_scenario;
pub mod lane;
pub mod logging;
pub mod pitch;
pub mod scenario;
pub mod xt_grid;

pub use analyzer::{AnalysisResult, CandidatePass, PassAnalyzer, analyze_pass_scenario};
pub use config::AnalyzerConfig;
pub use error::ScenarioError;
pub use scenario::{Scenario, ScenarioBuilder, ScenarioInput, Team};
pub use xt_grid::{XtGrid, generate_xt_grid};
