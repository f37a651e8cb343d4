use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("unrecognized game state `{0}`")]
    UnknownGameState(String),
    #[error("participant id {0} is outside 1..=10")]
    ParticipantOutOfRange(u8),
}
