//! Audio output trait and error types.

/// Error type for audio operations.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("device init error: {0}")]
    DeviceInit(String),
    #[error("stream create error: {0}")]
    StreamCreate(String),
    #[error("playback error: {0}")]
    Playback(String),
    #[error("no audio device available")]
    NoDevice,
}

/// A consumer of mono 16-bit samples at a fixed rate.
pub trait AudioOutput {
    fn sample_rate(&self) -> u32;

    /// Queue samples without blocking. Returns how many were accepted.
    fn write(&mut self, samples: &[i16]) -> usize;

    fn start(&mut self) -> Result<(), AudioError>;

    fn stop(&mut self) -> Result<(), AudioError>;
}
