use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ScenarioError;
use crate::pitch::{PITCH_LENGTH, PITCH_WIDTH, Point};
use crate::scenario::{Scenario, ScenarioBuilder};

const PASSER_ID: u32 = 1;

/// Random but plausible pass situation: 3-5 teammates around the passer and
/// 3-6 defenders. Half of the time the passer plays to the nearest teammate,
/// otherwise to a random one.
pub fn random_scenario(rng: &mut impl Rng) -> Result<Scenario, ScenarioError> {
    let passer = Point::new(rng.gen_range(20.0..100.0), rng.gen_range(10.0..70.0));
    let n_mates = rng.gen_range(3..=5u32);
    let n_defs = rng.gen_range(3..=6u32);

    let mut mates = Vec::with_capacity(n_mates as usize);
    for i in 0..n_mates {
        mates.push((PASSER_ID + 1 + i, near(rng, passer, 35.0)));
    }

    let receiver_id = if rng.gen_bool(0.5) {
        mates
            .iter()
            .min_by(|a, b| passer.distance(a.1).total_cmp(&passer.distance(b.1)))
            .map(|m| m.0)
            .unwrap_or(PASSER_ID + 1)
    } else {
        mates[rng.gen_range(0..mates.len())].0
    };

    let mut builder = ScenarioBuilder::new(PASSER_ID, receiver_id).attacker(PASSER_ID, passer.x, passer.y);
    for (id, pos) in &mates {
        builder = builder.attacker(*id, pos.x, pos.y);
    }
    let first_def = PASSER_ID + 1 + n_mates;
    for i in 0..n_defs {
        // Defenders sit a little goal-side of the passer on average.
        let anchor = Point::new((passer.x + 10.0).min(PITCH_LENGTH), passer.y);
        let pos = near(rng, anchor, 30.0);
        builder = builder.defender(first_def + i, pos.x, pos.y);
    }
    builder.build()
}

pub fn random_scenarios(n: usize, seed: u64) -> Result<Vec<Scenario>, ScenarioError> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| random_scenario(&mut rng)).collect()
}

fn near(rng: &mut impl Rng, center: Point, spread: f64) -> Point {
    let x = (center.x + rng.gen_range(-spread..spread)).clamp(0.0, PITCH_LENGTH);
    let y = (center.y + rng.gen_range(-spread..spread)).clamp(0.0, PITCH_WIDTH);
    Point::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_scenarios() {
        let a = random_scenarios(20, 7).unwrap();
        let b = random_scenarios(20, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn generated_scenarios_have_enough_players() {
        for s in random_scenarios(50, 11).unwrap() {
            assert!(s.teammates().count() >= 3);
            assert!(s.defenders().count() >= 3);
            assert!(s.players().all(|p| p.position.in_bounds()));
        }
    }
}
