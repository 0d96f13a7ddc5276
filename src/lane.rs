use crate::config::AnalyzerConfig;
use crate::pitch::{Point, project_onto_segment};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneAssessment {
    pub completion: f64,
    pub lane_defenders: usize,
    pub length: f64,
}

// Corridor half-width grows from lane_width/2 at the passer to lane_width at the target.
pub fn interception_chance(cfg: &AnalyzerConfig, from: Point, to: Point, defender: Point) -> (f64, bool) {
    let proj = project_onto_segment(from, to, defender);
    let sigma = cfg.lane_width * (0.5 + 0.5 * proj.t);
    let z = proj.distance / sigma;
    let p = cfg.max_intercept * (-0.5 * z * z).exp();
    (p, proj.distance <= sigma)
}

pub fn assess_lane<'a>(
    cfg: &AnalyzerConfig,
    from: Point,
    to: Point,
    defenders: impl IntoIterator<Item = &'a Point>,
) -> LaneAssessment {
    let length = from.distance(to);
    let mut survive = 1.0;
    let mut lane_defenders = 0usize;
    for d in defenders {
        let (p, in_lane) = interception_chance(cfg, from, to, *d);
        survive *= 1.0 - p;
        if in_lane {
            lane_defenders += 1;
        }
    }
    let reach = (-length / cfg.range_scale).exp();
    LaneAssessment {
        completion: (survive * reach).clamp(0.0, 1.0),
        lane_defenders,
        length,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_lane_only_pays_for_distance() {
        let cfg = AnalyzerConfig::default();
        let none: [Point; 0] = [];
        let lane = assess_lane(&cfg, Point::new(60.0, 40.0), Point::new(100.0, 40.0), &none);
        assert_eq!(lane.lane_defenders, 0);
        assert!((lane.completion - (-40.0 / cfg.range_scale).exp()).abs() < 1e-12);
    }

    #[test]
    fn defender_on_the_line_is_near_max_intercept() {
        let cfg = AnalyzerConfig::default();
        let (p, in_lane) = interception_chance(&cfg, Point::new(60.0, 40.0), Point::new(80.0, 40.0), Point::new(70.0, 40.0));
        assert!((p - cfg.max_intercept).abs() < 1e-12);
        assert!(in_lane);
    }

    #[test]
    fn far_defender_barely_matters() {
        let cfg = AnalyzerConfig::default();
        let (p, in_lane) = interception_chance(&cfg, Point::new(60.0, 40.0), Point::new(80.0, 40.0), Point::new(70.0, 75.0));
        assert!(p < 1e-6);
        assert!(!in_lane);
    }

    #[test]
    fn more_defenders_never_help() {
        let cfg = AnalyzerConfig::default();
        let from = Point::new(60.0, 40.0);
        let to = Point::new(90.0, 30.0);
        let one = [Point::new(75.0, 38.0)];
        let two = [Point::new(75.0, 38.0), Point::new(82.0, 31.0)];
        let a = assess_lane(&cfg, from, to, &one);
        let b = assess_lane(&cfg, from, to, &two);
        assert!(b.completion < a.completion);
        assert_eq!(b.lane_defenders, 2);
    }
}
