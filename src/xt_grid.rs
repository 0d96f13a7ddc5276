use std::f64::consts::PI;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::pitch::{GOAL_CENTER, PITCH_LENGTH, PITCH_WIDTH, Point, goal_mouth_angle};

pub const DEFAULT_COLS: usize = 16;
pub const DEFAULT_ROWS: usize = 12;

const XT_FLOOR: f64 = 0.005;
const XT_SCALE: f64 = 0.30;
const XT_PROGRESSION: f64 = 0.02;
const DISTANCE_DECAY: f64 = 18.0;

static DEFAULT_GRID: Lazy<XtGrid> = Lazy::new(|| generate_xt_grid(DEFAULT_COLS, DEFAULT_ROWS));

/// Expected-threat values over a `cols` x `rows` zoning of the pitch, stored
/// row-major with row 0 at y = 0 and column 0 at x = 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XtGrid {
    pub cols: usize,
    pub rows: usize,
    pub values: Vec<f64>,
}

impl XtGrid {
    pub fn zone_of(&self, point: Point) -> (usize, usize) {
        let col = ((point.x / PITCH_LENGTH) * self.cols as f64).floor();
        let row = ((point.y / PITCH_WIDTH) * self.rows as f64).floor();
        // Points on the far touchline/goal line belong to the last zone.
        let col = (col.max(0.0) as usize).min(self.cols - 1);
        let row = (row.max(0.0) as usize).min(self.rows - 1);
        (col, row)
    }

    pub fn value_at(&self, point: Point) -> f64 {
        let (col, row) = self.zone_of(point);
        self.values[row * self.cols + col]
    }

    pub fn zone_center(&self, col: usize, row: usize) -> Point {
        let w = PITCH_LENGTH / self.cols as f64;
        let h = PITCH_WIDTH / self.rows as f64;
        Point::new((col as f64 + 0.5) * w, (row as f64 + 0.5) * h)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cols == 0 || self.rows == 0 {
            bail!("xT grid needs at least one zone, got {}x{}", self.cols, self.rows);
        }
        if self.values.len() != self.cols * self.rows {
            bail!(
                "xT grid {}x{} expects {} values, got {}",
                self.cols,
                self.rows,
                self.cols * self.rows,
                self.values.len()
            );
        }
        if let Some(bad) = self.values.iter().find(|v| !v.is_finite() || **v < 0.0) {
            bail!("xT grid contains invalid value {bad}");
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read xT grid {}", path.display()))?;
        let grid: XtGrid = serde_json::from_str(&raw).context("parse xT grid")?;
        grid.validate()?;
        Ok(grid)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self).context("serialize xT grid")?;
        fs::write(&tmp, json).context("write xT grid")?;
        fs::rename(&tmp, path).context("swap xT grid")?;
        Ok(())
    }
}

pub fn generate_xt_grid(cols: usize, rows: usize) -> XtGrid {
    let cols = cols.max(1);
    let rows = rows.max(1);
    let mut grid = XtGrid {
        cols,
        rows,
        values: vec![0.0; cols * rows],
    };
    for row in 0..rows {
        for col in 0..cols {
            let c = grid.zone_center(col, row);
            let dist = c.distance(GOAL_CENTER);
            let angle = goal_mouth_angle(c);
            let threat = 0.65 * (-dist / DISTANCE_DECAY).exp() + 0.35 * angle / PI;
            grid.values[row * cols + col] =
                XT_FLOOR + XT_SCALE * threat + XT_PROGRESSION * c.x / PITCH_LENGTH;
        }
    }
    grid
}

pub fn default_grid() -> &'static XtGrid {
    &DEFAULT_GRID
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_positive_and_rise_toward_goal() {
        let grid = generate_xt_grid(DEFAULT_COLS, DEFAULT_ROWS);
        grid.validate().unwrap();
        let mid_row = DEFAULT_ROWS / 2;
        for col in 1..DEFAULT_COLS {
            let prev = grid.values[mid_row * DEFAULT_COLS + col - 1];
            let cur = grid.values[mid_row * DEFAULT_COLS + col];
            assert!(cur > prev, "col {col}: {cur} <= {prev}");
        }
    }

    #[test]
    fn central_zones_beat_wide_zones_near_goal() {
        let grid = default_grid();
        let central = grid.value_at(Point::new(110.0, 40.0));
        let wide = grid.value_at(Point::new(110.0, 2.0));
        assert!(central > wide);
    }

    #[test]
    fn far_edges_map_into_last_zone() {
        let grid = default_grid();
        assert_eq!(grid.zone_of(Point::new(120.0, 80.0)), (DEFAULT_COLS - 1, DEFAULT_ROWS - 1));
        assert_eq!(grid.zone_of(Point::new(0.0, 0.0)), (0, 0));
    }

    #[test]
    fn validate_rejects_mismatched_dimensions() {
        let grid = XtGrid {
            cols: 2,
            rows: 2,
            values: vec![0.1, 0.2, 0.3],
        };
        assert!(grid.validate().is_err());
        let grid = XtGrid {
            cols: 1,
            rows: 1,
            values: vec![f64::NAN],
        };
        assert!(grid.validate().is_err());
    }

    #[test]
    fn zero_dimensions_are_bumped_to_one_zone() {
        let grid = generate_xt_grid(0, 0);
        assert_eq!((grid.cols, grid.rows), (1, 1));
        assert_eq!(grid.values.len(), 1);
    }
}
