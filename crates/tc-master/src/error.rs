//! Controller error type.

use tc_audio::AudioError;

#[derive(Debug, thiserror::Error)]
pub enum MasterError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("patch parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("audio thread exited during setup")]
    AudioThread,

    #[error("invalid patch: {0}")]
    InvalidPatch(String),
}

pub type Result<T> = std::result::Result<T, MasterError>;
