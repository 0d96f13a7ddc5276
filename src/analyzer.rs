use std::borrow::Cow;
use std::cmp::Ordering;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::AnalyzerConfig;
use crate::error::ScenarioError;
use crate::lane::assess_lane;
use crate::pitch::Point;
use crate::scenario::{Scenario, ScenarioInput};
use crate::xt_grid::{DEFAULT_COLS, DEFAULT_ROWS, XtGrid, default_grid, generate_xt_grid};

pub const COLUMNS: [&str; 13] = [
    "receiver_id",
    "start_x",
    "start_y",
    "end_x",
    "end_y",
    "is_actual",
    "score",
    "completion",
    "lane_defenders",
    "xt_start",
    "xt_end",
    "length",
    "rank",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePass {
    pub receiver_id: u32,
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    pub is_actual: bool,
    pub score: f64,
    pub completion: f64,
    pub lane_defenders: usize,
    pub xt_start: f64,
    pub xt_end: f64,
    pub length: f64,
    pub rank: usize,
}

impl CandidatePass {
    pub fn start(&self) -> Point {
        Point::new(self.start_x, self.start_y)
    }

    pub fn end(&self) -> Point {
        Point::new(self.end_x, self.end_y)
    }
}

/// Pass table for one scenario. The first row is always the actual pass; the
/// rest are alternatives in descending score order. Only built by
/// `PassAnalyzer`, so it serializes but never deserializes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AnalysisResult {
    rows: Vec<CandidatePass>,
}

impl AnalysisResult {
    pub fn columns() -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn rows(&self) -> &[CandidatePass] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn actual(&self) -> &CandidatePass {
        &self.rows[0]
    }

    pub fn alternatives(&self) -> &[CandidatePass] {
        &self.rows[1..]
    }

    pub fn top_alternatives(&self, n: usize) -> &[CandidatePass] {
        let alts = self.alternatives();
        &alts[..n.min(alts.len())]
    }

    /// Actual row plus the first `n` alternatives, ranks untouched.
    pub fn with_top_alternatives(&self, n: usize) -> AnalysisResult {
        let keep = 1 + n.min(self.alternatives().len());
        AnalysisResult {
            rows: self.rows[..keep].to_vec(),
        }
    }

    pub fn missed_alternatives(&self) -> &[CandidatePass] {
        let actual = self.actual().score;
        let cut = self
            .alternatives()
            .iter()
            .take_while(|row| row.score > actual)
            .count();
        &self.alternatives()[..cut]
    }

    pub fn actual_rank(&self) -> usize {
        self.actual().rank
    }
}

#[derive(Debug, Clone)]
pub struct PassAnalyzer {
    config: AnalyzerConfig,
    grid: Cow<'static, XtGrid>,
}

impl Default for PassAnalyzer {
    fn default() -> Self {
        Self {
            config: AnalyzerConfig::default(),
            grid: Cow::Borrowed(default_grid()),
        }
    }
}

impl PassAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate().context("analyzer config")?;
        let grid = if config.xt_cols == DEFAULT_COLS && config.xt_rows == DEFAULT_ROWS {
            Cow::Borrowed(default_grid())
        } else {
            Cow::Owned(generate_xt_grid(config.xt_cols, config.xt_rows))
        };
        Ok(Self { config, grid })
    }

    pub fn with_grid(config: AnalyzerConfig, grid: XtGrid) -> Result<Self> {
        config.validate().context("analyzer config")?;
        grid.validate().context("analyzer xT grid")?;
        Ok(Self {
            config,
            grid: Cow::Owned(grid),
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn grid(&self) -> &XtGrid {
        &self.grid
    }

    pub fn analyze(&self, scenario: &Scenario) -> AnalysisResult {
        let passer = scenario.passer();
        let actual = scenario.actual_pass();
        let defenders: Vec<Point> = scenario.defenders().map(|d| d.position).collect();
        let xt_start = self.grid.value_at(passer.position);

        let mut rows = Vec::with_capacity(scenario.teammates().count());
        rows.push(self.score_pass(actual.receiver_id, actual.start, actual.end, true, xt_start, &defenders));
        for mate in scenario.teammates() {
            if mate.id == actual.receiver_id {
                continue;
            }
            rows.push(self.score_pass(mate.id, passer.position, mate.position, false, xt_start, &defenders));
        }

        rows[1..].sort_by(|a, b| by_score_desc(a, b));

        let mut order: Vec<usize> = (0..rows.len()).collect();
        order.sort_by(|&a, &b| by_score_desc(&rows[a], &rows[b]));
        for (rank, idx) in order.into_iter().enumerate() {
            rows[idx].rank = rank + 1;
        }

        let result = AnalysisResult { rows };
        info!(
            passer = scenario.passer_id(),
            receiver = actual.receiver_id,
            options = result.len(),
            actual_rank = result.actual_rank(),
            missed = result.missed_alternatives().len(),
            "pass scenario analyzed"
        );
        result
    }

    pub fn analyze_many(&self, scenarios: &[Scenario]) -> Vec<AnalysisResult> {
        scenarios.par_iter().map(|s| self.analyze(s)).collect()
    }

    fn score_pass(
        &self,
        receiver_id: u32,
        start: Point,
        end: Point,
        is_actual: bool,
        xt_start: f64,
        defenders: &[Point],
    ) -> CandidatePass {
        let lane = assess_lane(&self.config, start, end, defenders);
        let xt_end = self.grid.value_at(end);
        let p = lane.completion;
        let score = p * xt_end - (1.0 - p) * self.config.turnover_cost - xt_start;
        debug!(
            receiver_id,
            is_actual,
            completion = p,
            lane_defenders = lane.lane_defenders,
            xt_end,
            score,
            "scored candidate pass"
        );
        CandidatePass {
            receiver_id,
            start_x: start.x,
            start_y: start.y,
            end_x: end.x,
            end_y: end.y,
            is_actual,
            score,
            completion: p,
            lane_defenders: lane.lane_defenders,
            xt_start,
            xt_end,
            length: lane.length,
            rank: 0,
        }
    }
}

fn by_score_desc(a: &CandidatePass, b: &CandidatePass) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then(a.receiver_id.cmp(&b.receiver_id))
}

pub fn analyze_pass_scenario(input: ScenarioInput) -> Result<AnalysisResult, ScenarioError> {
    let scenario = Scenario::try_from(input)?;
    Ok(PassAnalyzer::default().analyze(&scenario))
}
