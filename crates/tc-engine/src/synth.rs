//! The four-channel synthesizer and its control API.

use log::{debug, warn};
use tc_ir::{ChannelId, Command, EnvelopeParams, NotePeriodTable, VibratoParams};

use crate::envelope::Envelope;
use crate::noise::NoiseChannel;
use crate::random::{Lfsr, RandomSource};
use crate::ring_buffer::{SampleRing, RING_CAPACITY};
use crate::square::SquareChannel;
use crate::status::ChannelStatus;
use crate::triangle::TriangleChannel;

/// Duty of square A after initialization.
pub const SQUARE_A_DEFAULT_DUTY: u8 = 64;
/// Duty of square B after initialization.
pub const SQUARE_B_DEFAULT_DUTY: u8 = 127;
/// Duty of the triangle after initialization.
pub const TRIANGLE_DEFAULT_DUTY: u8 = 32;

/// Two squares, a triangle and a noise channel mixed into one sample ring.
///
/// Every method runs on one control thread. `tick_sample` fills the ring,
/// `pop_sample` drains it, and `tick_modulation` steps the envelopes and
/// vibratos at a much lower rate.
pub struct Synth<R: RandomSource = Lfsr> {
    table: NotePeriodTable,
    square_a: SquareChannel,
    square_b: SquareChannel,
    triangle: TriangleChannel,
    noise: NoiseChannel,
    rng: R,
    ring: SampleRing<RING_CAPACITY>,
}

impl Synth<Lfsr> {
    /// Create a silent synthesizer with the default noise source.
    pub fn new(sample_rate: u32) -> Self {
        Self::with_random(sample_rate, Lfsr::default())
    }
}

impl<R: RandomSource> Synth<R> {
    /// Create a silent synthesizer drawing noise bits from `rng`.
    pub fn with_random(sample_rate: u32, rng: R) -> Self {
        Self {
            table: NotePeriodTable::new(sample_rate),
            square_a: SquareChannel::new(SQUARE_A_DEFAULT_DUTY),
            square_b: SquareChannel::new(SQUARE_B_DEFAULT_DUTY),
            triangle: TriangleChannel::new(TRIANGLE_DEFAULT_DUTY),
            noise: NoiseChannel::new(),
            rng,
            ring: SampleRing::new(),
        }
    }

    /// Rebuild the note table and reset every channel to silence.
    pub fn initialize(&mut self, sample_rate: u32) {
        self.table = NotePeriodTable::new(sample_rate);
        self.square_a = SquareChannel::new(SQUARE_A_DEFAULT_DUTY);
        self.square_b = SquareChannel::new(SQUARE_B_DEFAULT_DUTY);
        self.triangle = TriangleChannel::new(TRIANGLE_DEFAULT_DUTY);
        self.noise = NoiseChannel::new();
        self.ring.clear();
    }

    pub fn sample_rate(&self) -> u32 {
        self.table.sample_rate()
    }

    pub fn table(&self) -> &NotePeriodTable {
        &self.table
    }

    // --- Sample generation ---

    /// Advance every oscillator one sample and sum the outputs.
    ///
    /// The sum is not clamped; velocity scaling keeps it inside `i16`.
    pub fn mix(&mut self) -> i16 {
        let acc = self.square_a.next_sample() as i32
            + self.square_b.next_sample() as i32
            + self.triangle.next_sample() as i32
            + self.noise.next_sample(&mut self.rng) as i32;
        acc as i16
    }

    /// Produce one mixed sample into the ring. The ring must not be full.
    pub fn tick_sample(&mut self) {
        let sample = self.mix();
        self.ring.push(sample);
    }

    /// Step every enabled vibrato, then every enabled envelope.
    pub fn tick_modulation(&mut self) {
        if self.square_a.vibrato.enabled {
            self.square_a.step_vibrato();
        }
        if self.square_b.vibrato.enabled {
            self.square_b.step_vibrato();
        }
        for envelope in [
            &mut self.square_a.envelope,
            &mut self.square_b.envelope,
            &mut self.noise.envelope,
        ] {
            if envelope.enabled {
                envelope.step();
            }
        }
    }

    // --- Ring access ---

    /// Take the oldest sample. The ring must not be empty.
    pub fn pop_sample(&mut self) -> i16 {
        self.ring.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    pub fn size(&self) -> usize {
        self.ring.len()
    }

    // --- Notes ---

    pub fn note_on(&mut self, channel: ChannelId, note: u8, velocity: u8) {
        match channel {
            ChannelId::SquareA => self.square_a.note_on(&self.table, note, velocity),
            ChannelId::SquareB => self.square_b.note_on(&self.table, note, velocity),
            ChannelId::Triangle => self.triangle.note_on(&self.table, note, velocity),
            ChannelId::Noise => self.noise.note_on(note, velocity),
        }
    }

    pub fn note_off(&mut self, channel: ChannelId) {
        match channel {
            ChannelId::SquareA => self.square_a.note_off(),
            ChannelId::SquareB => self.square_b.note_off(),
            ChannelId::Triangle => self.triangle.note_off(),
            ChannelId::Noise => self.noise.note_off(),
        }
    }

    pub fn all_notes_off(&mut self) {
        for channel in ChannelId::ALL {
            self.note_off(channel);
        }
    }

    // --- Configuration ---

    /// Set the duty (0-255) of a square or the triangle.
    pub fn set_duty(&mut self, channel: ChannelId, duty: u8) {
        if !channel.has_duty() {
            warn!("{channel} has no duty cycle (duty {duty})");
            return;
        }
        match self.square_mut(channel) {
            Some((square, _)) => square.set_duty(duty),
            None => self.triangle.set_duty(duty),
        }
    }

    /// Store vibrato parameters for a square and (re)start its LFO.
    pub fn configure_vibrato(&mut self, channel: ChannelId, params: VibratoParams) {
        debug!("{channel}: vibrato rate {} depth {}", params.rate, params.depth);
        match self.square_mut(channel) {
            Some((square, table)) => square.configure_vibrato(table, params),
            None => warn!(
                "vibrato not supported on {channel} (rate {}, depth {})",
                params.rate, params.depth
            ),
        }
    }

    /// Start vibrato with the last configured parameters.
    pub fn vibrato_on(&mut self, channel: ChannelId) {
        if channel == ChannelId::Triangle {
            self.triangle.vibrato_enabled = true;
            return;
        }
        match self.square_mut(channel) {
            Some((square, table)) => square.vibrato_on(table),
            None => warn!("vibrato not supported on {channel} (vibrato on)"),
        }
    }

    /// Stop vibrato. Squares return to the note's unmodulated period.
    pub fn vibrato_off(&mut self, channel: ChannelId) {
        if channel == ChannelId::Triangle {
            self.triangle.vibrato_enabled = false;
            return;
        }
        match self.square_mut(channel) {
            Some((square, table)) => square.vibrato_off(table),
            None => warn!("vibrato not supported on {channel} (vibrato off)"),
        }
    }

    pub fn configure_envelope(&mut self, channel: ChannelId, params: EnvelopeParams) {
        debug!(
            "{channel}: adsr {} {} {} {}",
            params.attack, params.decay, params.sustain, params.release
        );
        match self.envelope_mut(channel) {
            Some(envelope) => envelope.configure(params),
            None => warn!("cannot configure adsr envelope on {channel}"),
        }
    }

    pub fn envelope_on(&mut self, channel: ChannelId) {
        match self.envelope_mut(channel) {
            Some(envelope) => envelope.enabled = true,
            None => warn!("cannot activate adsr envelope on {channel}"),
        }
    }

    pub fn envelope_off(&mut self, channel: ChannelId) {
        match self.envelope_mut(channel) {
            Some(envelope) => envelope.enabled = false,
            None => warn!("cannot deactivate adsr envelope on {channel}"),
        }
    }

    /// Run a control command. Commands naming a channel that does not
    /// exist are logged and ignored.
    pub fn apply(&mut self, command: &Command) {
        let channel = match command.channel().map(ChannelId::try_from) {
            None => {
                self.all_notes_off();
                return;
            }
            Some(Ok(channel)) => channel,
            Some(Err(err)) => {
                warn!("{err}: ignoring {command:?}");
                return;
            }
        };

        match *command {
            Command::NoteOn { note, velocity, .. } => self.note_on(channel, note, velocity),
            Command::NoteOff { .. } => self.note_off(channel),
            Command::SetDuty { duty, .. } => self.set_duty(channel, duty),
            Command::ConfigureVibrato { params, .. } => self.configure_vibrato(channel, params),
            Command::VibratoOn { .. } => self.vibrato_on(channel),
            Command::VibratoOff { .. } => self.vibrato_off(channel),
            Command::ConfigureEnvelope { params, .. } => self.configure_envelope(channel, params),
            Command::EnvelopeOn { .. } => self.envelope_on(channel),
            Command::EnvelopeOff { .. } => self.envelope_off(channel),
            Command::AllNotesOff => self.all_notes_off(),
        }
    }

    // --- Inspection ---

    pub fn channel_status(&self, channel: ChannelId) -> ChannelStatus {
        match channel {
            ChannelId::SquareA => ChannelStatus::square(channel, &self.square_a),
            ChannelId::SquareB => ChannelStatus::square(channel, &self.square_b),
            ChannelId::Triangle => ChannelStatus::triangle(&self.triangle),
            ChannelId::Noise => ChannelStatus::noise(&self.noise),
        }
    }

    pub fn square(&self, channel: ChannelId) -> Option<&SquareChannel> {
        match channel {
            ChannelId::SquareA => Some(&self.square_a),
            ChannelId::SquareB => Some(&self.square_b),
            _ => None,
        }
    }

    pub fn triangle(&self) -> &TriangleChannel {
        &self.triangle
    }

    pub fn noise(&self) -> &NoiseChannel {
        &self.noise
    }

    /// A vibrato-capable square together with the note table it tunes from.
    fn square_mut(&mut self, channel: ChannelId) -> Option<(&mut SquareChannel, &NotePeriodTable)> {
        if !channel.has_vibrato() {
            return None;
        }
        let square = match channel {
            ChannelId::SquareA => &mut self.square_a,
            _ => &mut self.square_b,
        };
        Some((square, &self.table))
    }

    fn envelope_mut(&mut self, channel: ChannelId) -> Option<&mut Envelope> {
        if !channel.has_envelope() {
            return None;
        }
        Some(match channel {
            ChannelId::SquareA => &mut self.square_a.envelope,
            ChannelId::SquareB => &mut self.square_b.envelope,
            _ => &mut self.noise.envelope,
        })
    }
}
