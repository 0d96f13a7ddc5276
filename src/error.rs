use crate::pitch::{PITCH_LENGTH, PITCH_WIDTH};

/// Every way a scenario can be rejected before analysis starts.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScenarioError {
    #[error("invalid scenario: passer {0} is not among the players")]
    UnknownPasser(u32),
    #[error("invalid scenario: passer {0} is not an attacker")]
    PasserNotAttacker(u32),
    #[error("invalid scenario: receiver {0} is not among the players")]
    UnknownReceiver(u32),
    #[error("invalid scenario: receiver {0} is not an attacker")]
    ReceiverNotAttacker(u32),
    #[error("invalid scenario: receiver {0} is the passer")]
    ReceiverIsPasser(u32),
    #[error("invalid scenario: passer needs at least 2 teammates, found {0}")]
    TooFewTeammates(usize),
    #[error(
        "invalid scenario: {what} ({x}, {y}) lies outside the pitch [0,{}]x[0,{}]",
        PITCH_LENGTH,
        PITCH_WIDTH
    )]
    OutOfBounds { what: String, x: f64, y: f64 },
    #[error("invalid scenario: {0} has a non-finite coordinate")]
    NonFiniteCoordinate(String),
    #[error("invalid scenario: player id {0} appears more than once")]
    DuplicatePlayer(u32),
    #[error("invalid scenario: actual pass starts at ({x}, {y}) but the passer stands elsewhere")]
    ActualPassStartMismatch { x: f64, y: f64 },
}
