//! JSON patch files: channel setup plus a timed list of commands.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tc_engine::EventQueue;
use tc_ir::{notes, ChannelId, Command, EnvelopeParams, Event, VibratoParams, DEFAULT_SAMPLE_RATE};

use crate::error::{MasterError, Result};

const MAX_SAMPLE_RATE: u32 = 192_000;

/// A complete playable setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Patch {
    /// Rate used for offline rendering
    pub sample_rate: u32,
    /// Total playing time
    pub length_ms: u64,
    /// Applied in order before the first sample
    pub channels: Vec<ChannelSetup>,
    pub events: Vec<TimedCommand>,
}

/// Initial configuration of one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSetup {
    pub channel: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duty: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope: Option<EnvelopeSetup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibrato: Option<VibratoSetup>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeSetup {
    pub attack: u8,
    pub decay: u8,
    pub sustain: u8,
    pub release: u8,
    #[serde(default = "enabled")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VibratoSetup {
    pub rate: u8,
    pub depth: u8,
    #[serde(default = "enabled")]
    pub enabled: bool,
}

fn enabled() -> bool {
    true
}

/// A command fired `at_ms` milliseconds into playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedCommand {
    pub at_ms: u64,
    #[serde(flatten)]
    pub command: PatchCommand,
}

/// The patch-file spelling of a control command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PatchCommand {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8 },
    AllNotesOff,
    SetDuty { channel: u8, duty: u8 },
    Vibrato { channel: u8, rate: u8, depth: u8 },
    VibratoOn { channel: u8 },
    VibratoOff { channel: u8 },
    Envelope { channel: u8, attack: u8, decay: u8, sustain: u8, release: u8 },
    EnvelopeOn { channel: u8 },
    EnvelopeOff { channel: u8 },
}

impl From<PatchCommand> for Command {
    fn from(cmd: PatchCommand) -> Self {
        match cmd {
            PatchCommand::NoteOn { channel, note, velocity } => Command::NoteOn { channel, note, velocity },
            PatchCommand::NoteOff { channel } => Command::NoteOff { channel },
            PatchCommand::AllNotesOff => Command::AllNotesOff,
            PatchCommand::SetDuty { channel, duty } => Command::SetDuty { channel, duty },
            PatchCommand::Vibrato { channel, rate, depth } => Command::ConfigureVibrato {
                channel,
                params: VibratoParams::new(rate, depth),
            },
            PatchCommand::VibratoOn { channel } => Command::VibratoOn { channel },
            PatchCommand::VibratoOff { channel } => Command::VibratoOff { channel },
            PatchCommand::Envelope { channel, attack, decay, sustain, release } => {
                Command::ConfigureEnvelope {
                    channel,
                    params: EnvelopeParams::new(attack, decay, sustain, release),
                }
            }
            PatchCommand::EnvelopeOn { channel } => Command::EnvelopeOn { channel },
            PatchCommand::EnvelopeOff { channel } => Command::EnvelopeOff { channel },
        }
    }
}

impl Default for Patch {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            length_ms: 1000,
            channels: Vec::new(),
            events: Vec::new(),
        }
    }
}

impl Patch {
    pub fn from_json(text: &str) -> Result<Self> {
        let patch: Patch = serde_json::from_str(text)?;
        patch.validate()?;
        Ok(patch)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject rates the note table cannot represent. Unknown channel numbers
    /// are allowed; the engine ignores them.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 || self.sample_rate > MAX_SAMPLE_RATE {
            return Err(MasterError::InvalidPatch(format!(
                "sample rate {} outside 1..={MAX_SAMPLE_RATE}",
                self.sample_rate
            )));
        }
        Ok(())
    }

    /// Two chords over a noise burst: envelope on the noise channel,
    /// vibrato on both squares.
    pub fn demo() -> Self {
        let sq_a = ChannelId::SquareA as u8;
        let sq_b = ChannelId::SquareB as u8;
        let tri = ChannelId::Triangle as u8;
        let noise = ChannelId::Noise as u8;
        let square_env = EnvelopeSetup { attack: 0, decay: 10, sustain: 5, release: 50, enabled: false };
        let vibrato = VibratoSetup { rate: 115, depth: 30, enabled: true };

        let at = |at_ms, command| TimedCommand { at_ms, command };
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            length_ms: 2000,
            channels: vec![
                ChannelSetup { channel: sq_a, duty: None, envelope: Some(square_env), vibrato: Some(vibrato) },
                ChannelSetup { channel: sq_b, duty: None, envelope: Some(square_env), vibrato: Some(vibrato) },
                ChannelSetup {
                    channel: noise,
                    duty: None,
                    envelope: Some(EnvelopeSetup { attack: 2, decay: 6, sustain: 0, release: 0, enabled: true }),
                    vibrato: None,
                },
            ],
            events: vec![
                at(0, PatchCommand::NoteOn { channel: sq_a, note: notes::E4, velocity: 32 }),
                at(0, PatchCommand::NoteOn { channel: sq_b, note: notes::G4, velocity: 32 }),
                at(0, PatchCommand::NoteOn { channel: tri, note: notes::C3, velocity: 92 }),
                at(0, PatchCommand::NoteOn { channel: noise, note: 100, velocity: 40 }),
                at(1000, PatchCommand::NoteOn { channel: sq_a, note: notes::A4, velocity: 32 }),
                at(1000, PatchCommand::NoteOn { channel: sq_b, note: notes::C4 + 12, velocity: 32 }),
                at(1000, PatchCommand::NoteOn { channel: tri, note: notes::A4 - 24, velocity: 92 }),
                at(1000, PatchCommand::NoteOn { channel: noise, note: 110, velocity: 40 }),
                at(1800, PatchCommand::AllNotesOff),
            ],
        }
    }

    /// Commands that put the channels into their initial state.
    pub fn setup_commands(&self) -> Vec<Command> {
        let mut commands = Vec::new();
        for setup in &self.channels {
            let channel = setup.channel;
            if let Some(duty) = setup.duty {
                commands.push(Command::SetDuty { channel, duty });
            }
            if let Some(env) = setup.envelope {
                commands.push(Command::ConfigureEnvelope {
                    channel,
                    params: EnvelopeParams::new(env.attack, env.decay, env.sustain, env.release),
                });
                commands.push(if env.enabled {
                    Command::EnvelopeOn { channel }
                } else {
                    Command::EnvelopeOff { channel }
                });
            }
            if let Some(vib) = setup.vibrato {
                commands.push(Command::ConfigureVibrato {
                    channel,
                    params: VibratoParams::new(vib.rate, vib.depth),
                });
                if !vib.enabled {
                    commands.push(Command::VibratoOff { channel });
                }
            }
        }
        commands
    }

    /// Setup followed by the timed commands, scheduled at `sample_rate`.
    pub fn event_queue(&self, sample_rate: u32) -> EventQueue {
        let setup = self.setup_commands().into_iter().map(|cmd| Event::new(0, cmd));
        let timed = self
            .events
            .iter()
            .map(|t| Event::at_ms(t.at_ms, sample_rate, t.command.into()));
        setup.chain(timed).collect()
    }

    pub fn length_samples(&self, sample_rate: u32) -> u64 {
        self.length_ms.saturating_mul(sample_rate as u64) / 1000
    }
}
