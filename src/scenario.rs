use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ScenarioError;
use crate::pitch::Point;

const START_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    #[serde(alias = "Attackers", alias = "attacker", alias = "attackers")]
    Attacker,
    #[serde(alias = "Defenders", alias = "defender", alias = "defenders")]
    Defender,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub id: u32,
    pub team: Team,
    pub position: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActualPass {
    pub receiver_id: u32,
    pub start: Point,
    pub end: Point,
}

/// A validated pass situation. Only obtainable through [`Scenario::new`],
/// [`ScenarioBuilder`] or `TryFrom<ScenarioInput>`, so every instance already
/// satisfies the id and bounds rules the analyzer relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    passer_id: u32,
    players: BTreeMap<u32, Player>,
    actual_pass: ActualPass,
}

impl Scenario {
    pub fn new(
        passer_id: u32,
        players: Vec<Player>,
        actual_pass: ActualPass,
    ) -> Result<Self, ScenarioError> {
        let mut by_id = BTreeMap::new();
        for player in players {
            if by_id.insert(player.id, player).is_some() {
                return Err(ScenarioError::DuplicatePlayer(player.id));
            }
        }

        for player in by_id.values() {
            check_point(&format!("player {}", player.id), player.position)?;
        }
        check_point("actual pass start", actual_pass.start)?;
        check_point("actual pass end", actual_pass.end)?;

        let passer = by_id
            .get(&passer_id)
            .ok_or(ScenarioError::UnknownPasser(passer_id))?;
        if passer.team != Team::Attacker {
            return Err(ScenarioError::PasserNotAttacker(passer_id));
        }

        let receiver_id = actual_pass.receiver_id;
        if receiver_id == passer_id {
            return Err(ScenarioError::ReceiverIsPasser(receiver_id));
        }
        let receiver = by_id
            .get(&receiver_id)
            .ok_or(ScenarioError::UnknownReceiver(receiver_id))?;
        if receiver.team != Team::Attacker {
            return Err(ScenarioError::ReceiverNotAttacker(receiver_id));
        }

        if actual_pass.start.distance(passer.position) > START_TOLERANCE {
            return Err(ScenarioError::ActualPassStartMismatch {
                x: actual_pass.start.x,
                y: actual_pass.start.y,
            });
        }

        let teammates = by_id
            .values()
            .filter(|p| p.team == Team::Attacker && p.id != passer_id)
            .count();
        if teammates < 2 {
            return Err(ScenarioError::TooFewTeammates(teammates));
        }

        Ok(Self {
            passer_id,
            players: by_id,
            actual_pass,
        })
    }

    pub fn passer_id(&self) -> u32 {
        self.passer_id
    }

    pub fn passer(&self) -> &Player {
        // Presence is checked in `new`.
        &self.players[&self.passer_id]
    }

    pub fn actual_pass(&self) -> &ActualPass {
        &self.actual_pass
    }

    pub fn player(&self, id: u32) -> Option<&Player> {
        self.players.get(&id)
    }

    /// All players, ordered by id.
    pub fn players(&self) -> impl Iterator<Item = &Player> + '_ {
        self.players.values()
    }

    /// Attackers other than the passer, ordered by id.
    pub fn teammates(&self) -> impl Iterator<Item = &Player> + '_ {
        self.players
            .values()
            .filter(move |p| p.team == Team::Attacker && p.id != self.passer_id)
    }

    pub fn defenders(&self) -> impl Iterator<Item = &Player> + '_ {
        self.players.values().filter(|p| p.team == Team::Defender)
    }

    pub fn to_input(&self) -> ScenarioInput {
        ScenarioInput {
            passer_id: self.passer_id,
            actual_pass: ActualPassInput {
                receiver_id: self.actual_pass.receiver_id,
                start_x: self.actual_pass.start.x,
                start_y: self.actual_pass.start.y,
                end_x: self.actual_pass.end.x,
                end_y: self.actual_pass.end.y,
            },
            players: self
                .players
                .values()
                .map(|p| {
                    (
                        p.id,
                        PlayerInput {
                            team: p.team,
                            position: (p.position.x, p.position.y),
                        },
                    )
                })
                .collect(),
        }
    }
}

fn check_point(what: &str, point: Point) -> Result<(), ScenarioError> {
    if !point.is_finite() {
        return Err(ScenarioError::NonFiniteCoordinate(what.to_string()));
    }
    if !point.in_bounds() {
        return Err(ScenarioError::OutOfBounds {
            what: what.to_string(),
            x: point.x,
            y: point.y,
        });
    }
    Ok(())
}

/// Wire shape of a scenario, matching the dictionaries the dashboards build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioInput {
    pub passer_id: u32,
    pub actual_pass: ActualPassInput,
    pub players: BTreeMap<u32, PlayerInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActualPassInput {
    pub receiver_id: u32,
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInput {
    pub team: Team,
    pub position: (f64, f64),
}

impl TryFrom<ScenarioInput> for Scenario {
    type Error = ScenarioError;

    fn try_from(input: ScenarioInput) -> Result<Self, Self::Error> {
        let players = input
            .players
            .into_iter()
            .map(|(id, p)| Player {
                id,
                team: p.team,
                position: p.position.into(),
            })
            .collect();
        let actual = ActualPass {
            receiver_id: input.actual_pass.receiver_id,
            start: Point::new(input.actual_pass.start_x, input.actual_pass.start_y),
            end: Point::new(input.actual_pass.end_x, input.actual_pass.end_y),
        };
        Scenario::new(input.passer_id, players, actual)
    }
}

/// Parse the JSON wire shape and validate it in one step.
pub fn parse_scenario_json(raw: &str) -> anyhow::Result<Scenario> {
    let input: ScenarioInput = serde_json::from_str(raw)?;
    Ok(Scenario::try_from(input)?)
}

/// Builds a scenario in code. The actual pass starts at the passer and, unless
/// overridden with [`ScenarioBuilder::actual_end`], ends at the receiver.
#[derive(Debug, Clone)]
pub struct ScenarioBuilder {
    passer_id: u32,
    receiver_id: u32,
    actual_end: Option<Point>,
    players: Vec<Player>,
}

impl ScenarioBuilder {
    pub fn new(passer_id: u32, receiver_id: u32) -> Self {
        Self {
            passer_id,
            receiver_id,
            actual_end: None,
            players: Vec::new(),
        }
    }

    pub fn attacker(mut self, id: u32, x: f64, y: f64) -> Self {
        self.players.push(Player {
            id,
            team: Team::Attacker,
            position: Point::new(x, y),
        });
        self
    }

    pub fn defender(mut self, id: u32, x: f64, y: f64) -> Self {
        self.players.push(Player {
            id,
            team: Team::Defender,
            position: Point::new(x, y),
        });
        self
    }

    pub fn actual_end(mut self, end: Point) -> Self {
        self.actual_end = Some(end);
        self
    }

    pub fn build(self) -> Result<Scenario, ScenarioError> {
        let start = self
            .players
            .iter()
            .find(|p| p.id == self.passer_id)
            .map(|p| p.position)
            .ok_or(ScenarioError::UnknownPasser(self.passer_id))?;
        let end = match self.actual_end {
            Some(end) => end,
            None => self
                .players
                .iter()
                .find(|p| p.id == self.receiver_id)
                .map(|p| p.position)
                .ok_or(ScenarioError::UnknownReceiver(self.receiver_id))?,
        };
        Scenario::new(
            self.passer_id,
            self.players,
            ActualPass {
                receiver_id: self.receiver_id,
                start,
                end,
            },
        )
    }
}

/// Default slider positions of the pass-decision dashboard.
pub fn default_dashboard_scenario() -> Result<Scenario, ScenarioError> {
    ScenarioBuilder::new(1, 3)
        .attacker(1, 60.0, 40.0)
        .attacker(2, 70.0, 20.0)
        .attacker(3, 75.0, 55.0)
        .attacker(4, 80.0, 70.0)
        .attacker(5, 50.0, 60.0)
        .defender(6, 65.0, 30.0)
        .defender(7, 70.0, 50.0)
        .defender(8, 85.0, 45.0)
        .defender(9, 60.0, 60.0)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ScenarioBuilder {
        ScenarioBuilder::new(1, 2)
            .attacker(1, 60.0, 40.0)
            .attacker(2, 70.0, 20.0)
            .attacker(3, 75.0, 55.0)
            .defender(9, 65.0, 30.0)
    }

    #[test]
    fn builder_derives_actual_pass_from_positions() {
        let s = base().build().unwrap();
        assert_eq!(s.actual_pass().start, Point::new(60.0, 40.0));
        assert_eq!(s.actual_pass().end, Point::new(70.0, 20.0));
        assert_eq!(s.teammates().map(|p| p.id).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(s.defenders().count(), 1);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = base().defender(3, 10.0, 10.0).build().unwrap_err();
        assert_eq!(err, ScenarioError::DuplicatePlayer(3));
    }

    #[test]
    fn defender_cannot_pass_or_receive() {
        let err = ScenarioBuilder::new(9, 2)
            .attacker(2, 70.0, 20.0)
            .attacker(3, 75.0, 55.0)
            .defender(9, 65.0, 30.0)
            .build()
            .unwrap_err();
        assert_eq!(err, ScenarioError::PasserNotAttacker(9));

        let err = ScenarioBuilder::new(1, 9)
            .attacker(1, 60.0, 40.0)
            .attacker(2, 70.0, 20.0)
            .attacker(3, 75.0, 55.0)
            .defender(9, 65.0, 30.0)
            .build()
            .unwrap_err();
        assert_eq!(err, ScenarioError::ReceiverNotAttacker(9));
    }

    #[test]
    fn passing_to_self_is_rejected() {
        let err = ScenarioBuilder::new(1, 1)
            .attacker(1, 60.0, 40.0)
            .attacker(2, 70.0, 20.0)
            .attacker(3, 75.0, 55.0)
            .build()
            .unwrap_err();
        assert_eq!(err, ScenarioError::ReceiverIsPasser(1));
    }

    #[test]
    fn single_teammate_is_not_enough() {
        let err = ScenarioBuilder::new(1, 2)
            .attacker(1, 60.0, 40.0)
            .attacker(2, 70.0, 20.0)
            .defender(9, 65.0, 30.0)
            .build()
            .unwrap_err();
        assert_eq!(err, ScenarioError::TooFewTeammates(1));
    }

    #[test]
    fn nan_coordinates_are_rejected() {
        let err = base().defender(10, f64::NAN, 3.0).build().unwrap_err();
        assert_eq!(err, ScenarioError::NonFiniteCoordinate("player 10".to_string()));
    }

    #[test]
    fn actual_pass_must_start_at_passer() {
        let err = Scenario::new(
            1,
            vec![
                Player { id: 1, team: Team::Attacker, position: Point::new(60.0, 40.0) },
                Player { id: 2, team: Team::Attacker, position: Point::new(70.0, 20.0) },
                Player { id: 3, team: Team::Attacker, position: Point::new(75.0, 55.0) },
            ],
            ActualPass {
                receiver_id: 2,
                start: Point::new(61.0, 40.0),
                end: Point::new(70.0, 20.0),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ScenarioError::ActualPassStartMismatch { .. }));
    }

    #[test]
    fn actual_end_may_differ_from_receiver_position() {
        let s = base().actual_end(Point::new(72.0, 18.0)).build().unwrap();
        assert_eq!(s.actual_pass().end, Point::new(72.0, 18.0));
    }

    #[test]
    fn dashboard_defaults_build() {
        let s = default_dashboard_scenario().unwrap();
        assert_eq!(s.passer_id(), 1);
        assert_eq!(s.actual_pass().receiver_id, 3);
        assert_eq!(s.teammates().count(), 4);
        assert_eq!(s.defenders().count(), 4);
    }

    #[test]
    fn wire_shape_accepts_plural_team_names() {
        let raw = r#"{
            "passer_id": 1,
            "actual_pass": {"receiver_id": 2, "start_x": 60, "start_y": 40, "end_x": 70, "end_y": 20},
            "players": {
                "1": {"team": "Attackers", "position": [60, 40]},
                "2": {"team": "Attackers", "position": [70, 20]},
                "3": {"team": "Attacker", "position": [75, 55]},
                "9": {"team": "Defenders", "position": [65, 30]}
            }
        }"#;
        let s = parse_scenario_json(raw).expect("wire shape should parse");
        assert_eq!(s.player(9).map(|p| p.team), Some(Team::Defender));
        assert_eq!(s.to_input().players.len(), 4);
    }
}
