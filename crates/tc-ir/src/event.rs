//! Control commands and timed events.

use crate::params::{EnvelopeParams, VibratoParams};

/// A control-plane call on the synthesizer.
///
/// Channels are raw numbers so that a command naming a channel that does
/// not exist still reaches the engine, which ignores it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    // === Notes ===
    /// Start a note
    NoteOn { channel: u8, note: u8, velocity: u8 },
    /// Release the channel's note
    NoteOff { channel: u8 },
    /// Release every channel
    AllNotesOff,

    // === Waveform ===
    /// Set the duty cycle (0-255) of a square or triangle channel
    SetDuty { channel: u8, duty: u8 },

    // === Modulation ===
    ConfigureVibrato { channel: u8, params: VibratoParams },
    VibratoOn { channel: u8 },
    VibratoOff { channel: u8 },
    ConfigureEnvelope { channel: u8, params: EnvelopeParams },
    EnvelopeOn { channel: u8 },
    EnvelopeOff { channel: u8 },
}

impl Command {
    /// The channel the command addresses, if it addresses one.
    pub fn channel(&self) -> Option<u8> {
        match *self {
            Command::AllNotesOff => None,
            Command::NoteOn { channel, .. }
            | Command::NoteOff { channel }
            | Command::SetDuty { channel, .. }
            | Command::ConfigureVibrato { channel, .. }
            | Command::VibratoOn { channel }
            | Command::VibratoOff { channel }
            | Command::ConfigureEnvelope { channel, .. }
            | Command::EnvelopeOn { channel }
            | Command::EnvelopeOff { channel } => Some(channel),
        }
    }
}

/// A command scheduled at a sample position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Event {
    /// Index of the generated sample the command precedes
    pub time: u64,
    /// What the event does
    pub command: Command,
}

impl Event {
    pub fn new(time: u64, command: Command) -> Self {
        Self { time, command }
    }

    /// Schedule `command` at `ms` milliseconds into the stream. Times past
    /// the end of a `u64` sample count saturate.
    pub fn at_ms(ms: u64, sample_rate: u32, command: Command) -> Self {
        Self::new(ms.saturating_mul(sample_rate as u64) / 1000, command)
    }
}
