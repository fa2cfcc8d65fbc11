//! Read-only channel snapshots for diagnostics.

use core::fmt;

use tc_ir::{ChannelId, EnvelopeParams, Q16, VibratoParams};

use crate::envelope::{AdsrState, Envelope};
use crate::noise::NoiseChannel;
use crate::square::SquareChannel;
use crate::triangle::TriangleChannel;
use crate::vibrato::Vibrato;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnvelopeStatus {
    pub enabled: bool,
    pub pending: bool,
    pub state: AdsrState,
    pub params: EnvelopeParams,
    pub attack_step: Q16,
    pub decay_step: Q16,
    pub sustain_factor: Q16,
    pub release_step: Q16,
    pub factor: Q16,
}

impl From<&Envelope> for EnvelopeStatus {
    fn from(env: &Envelope) -> Self {
        Self {
            enabled: env.enabled,
            pending: env.pending,
            state: env.state(),
            params: env.params(),
            attack_step: env.attack_step(),
            decay_step: env.decay_step(),
            sustain_factor: env.sustain_factor(),
            release_step: env.release_step(),
            factor: env.factor(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VibratoStatus {
    pub enabled: bool,
    pub params: VibratoParams,
    pub rising: bool,
    pub time: Q16,
    pub half_period: Q16,
    pub full_period: Q16,
    pub delta: Q16,
    pub base_period: Q16,
}

impl From<&Vibrato> for VibratoStatus {
    fn from(vib: &Vibrato) -> Self {
        Self {
            enabled: vib.enabled,
            params: vib.params,
            rising: vib.rising,
            time: vib.time(),
            half_period: vib.half_period(),
            full_period: vib.full_period(),
            delta: vib.delta(),
            base_period: vib.base_period(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SquareStatus {
    pub channel: ChannelId,
    pub note_on: bool,
    pub note: u8,
    pub duty: u8,
    pub is_high: bool,
    pub high_level: i16,
    pub low_level: i16,
    pub rising_edge: Q16,
    pub period: Q16,
    pub time: Q16,
    pub vibrato: VibratoStatus,
    pub envelope: EnvelopeStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriangleStatus {
    pub note_on: bool,
    pub note: u8,
    pub duty: u8,
    pub amplitude: u8,
    pub is_rising: bool,
    pub current: i16,
    pub low_level: i16,
    pub up_step: i16,
    pub down_step: i16,
    pub falling_edge: Q16,
    pub period: Q16,
    pub time: Q16,
    pub vibrato_enabled: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoiseStatus {
    pub note_on: bool,
    pub note: u8,
    pub prescaler: u8,
    pub counter: u8,
    pub is_high: bool,
    pub high_level: i16,
    pub low_level: i16,
    pub envelope: EnvelopeStatus,
}

/// Snapshot of one channel, printable as a multi-line report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelStatus {
    Square(SquareStatus),
    Triangle(TriangleStatus),
    Noise(NoiseStatus),
}

impl ChannelStatus {
    pub(crate) fn square(channel: ChannelId, sq: &SquareChannel) -> Self {
        Self::Square(SquareStatus {
            channel,
            note_on: sq.note_on,
            note: sq.note,
            duty: sq.duty(),
            is_high: sq.is_high(),
            high_level: sq.high_level(),
            low_level: sq.low_level(),
            rising_edge: sq.rising_edge(),
            period: sq.period(),
            time: sq.time(),
            vibrato: (&sq.vibrato).into(),
            envelope: (&sq.envelope).into(),
        })
    }

    pub(crate) fn triangle(tri: &TriangleChannel) -> Self {
        Self::Triangle(TriangleStatus {
            note_on: tri.note_on,
            note: tri.note,
            duty: tri.duty(),
            amplitude: tri.amplitude,
            is_rising: tri.is_rising(),
            current: tri.current(),
            low_level: tri.low_level(),
            up_step: tri.up_step(),
            down_step: tri.down_step(),
            falling_edge: tri.falling_edge(),
            period: tri.period(),
            time: tri.time(),
            vibrato_enabled: tri.vibrato_enabled,
        })
    }

    pub(crate) fn noise(noise: &NoiseChannel) -> Self {
        Self::Noise(NoiseStatus {
            note_on: noise.note_on,
            note: noise.note,
            prescaler: noise.prescaler(),
            counter: noise.counter(),
            is_high: noise.is_high(),
            high_level: noise.high_level(),
            low_level: noise.low_level(),
            envelope: (&noise.envelope).into(),
        })
    }

    pub fn channel(&self) -> ChannelId {
        match self {
            ChannelStatus::Square(s) => s.channel,
            ChannelStatus::Triangle(_) => ChannelId::Triangle,
            ChannelStatus::Noise(_) => ChannelId::Noise,
        }
    }

    pub fn note_on(&self) -> bool {
        match self {
            ChannelStatus::Square(s) => s.note_on,
            ChannelStatus::Triangle(t) => t.note_on,
            ChannelStatus::Noise(n) => n.note_on,
        }
    }
}

impl fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.channel())?;
        match self {
            ChannelStatus::Square(s) => {
                writeln!(f, "\tnote on: {}\tnote: {}", s.note_on, s.note)?;
                writeln!(f, "\tduty: {}\tis high: {}", s.duty, s.is_high)?;
                writeln!(f, "\thigh level: {}\tlow level: {}", s.high_level, s.low_level)?;
                writeln!(f, "\trising edge: {}\tperiod: {}", s.rising_edge, s.period)?;
                writeln!(f, "\ttime: {}", s.time)?;
                write!(f, "{}{}", s.vibrato, s.envelope)
            }
            ChannelStatus::Triangle(t) => {
                writeln!(f, "\tnote on: {}\tnote: {}", t.note_on, t.note)?;
                writeln!(f, "\tduty: {}\tamplitude: {}", t.duty, t.amplitude)?;
                writeln!(f, "\tcurrent: {}\tlow level: {}", t.current, t.low_level)?;
                writeln!(f, "\tup step: {}\tdown step: {}", t.up_step, t.down_step)?;
                writeln!(f, "\tfalling edge: {}\tperiod: {}", t.falling_edge, t.period)?;
                writeln!(f, "\ttime: {}\trising: {}", t.time, t.is_rising)?;
                writeln!(f, "\tvibrato on: {}", t.vibrato_enabled)
            }
            ChannelStatus::Noise(n) => {
                writeln!(f, "\tnote on: {}\tnote: {}", n.note_on, n.note)?;
                writeln!(f, "\tprescaler: {}\tcounter: {}", n.prescaler, n.counter)?;
                writeln!(f, "\thigh level: {}\tlow level: {}", n.high_level, n.low_level)?;
                writeln!(f, "\tis high: {}", n.is_high)?;
                write!(f, "{}", n.envelope)
            }
        }
    }
}

impl fmt::Display for VibratoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\t[Vibrato]")?;
        writeln!(f, "\t\ton: {}\tdepth: {}", self.enabled, self.params.depth)?;
        writeln!(f, "\t\trate: {}\trising: {}", self.params.rate, self.rising)?;
        writeln!(f, "\t\thalf period: {}\tperiod: {}", self.half_period, self.full_period)?;
        writeln!(f, "\t\ttime: {}\tbase: {}", self.time, self.base_period)?;
        writeln!(f, "\t\tdelta: {}", self.delta)
    }
}

impl fmt::Display for EnvelopeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.params;
        writeln!(f, "\t[ADSR]")?;
        writeln!(f, "\t\ton: {}\tstate: {:?}", self.enabled, self.state)?;
        writeln!(f, "\t\ta: {}\td: {}\ts: {}\tr: {}", p.attack, p.decay, p.sustain, p.release)?;
        writeln!(f, "\t\tattack step: {}\tdecay step: {}", self.attack_step, self.decay_step)?;
        writeln!(f, "\t\tsustain factor: {}\trelease step: {}", self.sustain_factor, self.release_step)?;
        writeln!(f, "\t\tamplitude factor: {}", self.factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Synth;
    use tc_ir::notes;

    #[test]
    fn square_report_lists_modulators() {
        let mut synth = Synth::new(48_000);
        synth.note_on(ChannelId::SquareA, notes::A4, 100);
        let text = synth.channel_status(ChannelId::SquareA).to_string();
        assert!(text.starts_with("[square A]\n"));
        assert!(text.contains("high level: 3200\tlow level: -3200"));
        assert!(text.contains("[Vibrato]"));
        assert!(text.contains("[ADSR]"));
        assert!(text.contains("state: Off"));
    }

    #[test]
    fn snapshot_reflects_channel() {
        let mut synth = Synth::new(48_000);
        synth.note_on(ChannelId::Noise, 100, 10);
        match synth.channel_status(ChannelId::Noise) {
            ChannelStatus::Noise(n) => {
                assert!(n.note_on);
                assert_eq!(n.prescaler, 28);
                assert_eq!(n.high_level, 320);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(synth.channel_status(ChannelId::Triangle).channel(), ChannelId::Triangle);
        assert!(!synth.channel_status(ChannelId::Triangle).note_on());
    }
}
