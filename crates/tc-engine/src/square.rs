//! Pulse oscillator with duty control, envelope and vibrato.

use tc_ir::{NotePeriodTable, Q16, VibratoParams, HIGH_AMPLITUDE_FACTOR};

use crate::envelope::{scaled_level, Envelope};
use crate::vibrato::Vibrato;

/// Phase threshold for `duty` 255ths of `period`.
pub(crate) fn duty_edge(period: Q16, duty: u8) -> Q16 {
    (period / 255) * duty as u32
}

/// State of one square channel.
#[derive(Clone, Debug)]
pub struct SquareChannel {
    /// Current MIDI note
    pub note: u8,
    /// A note is held (between note on and note off)
    pub note_on: bool,
    duty: u8,
    time: Q16,
    period: Q16,
    /// Phase at which the output switches from low to high
    rising_edge: Q16,
    high_level: i16,
    low_level: i16,
    high_level_limit: i16,
    is_high: bool,
    pub envelope: Envelope,
    pub vibrato: Vibrato,
}

impl SquareChannel {
    /// A silent channel with the given duty.
    pub fn new(duty: u8) -> Self {
        Self {
            note: 0,
            note_on: false,
            duty,
            time: Q16::ZERO,
            period: Q16::ZERO,
            rising_edge: Q16::ZERO,
            high_level: 0,
            low_level: 0,
            high_level_limit: 0,
            is_high: false,
            envelope: Envelope::new(),
            vibrato: Vibrato::new(),
        }
    }

    pub fn note_on(&mut self, table: &NotePeriodTable, note: u8, velocity: u8) {
        self.note = note;
        self.is_high = false;
        self.high_level_limit = HIGH_AMPLITUDE_FACTOR * velocity as i16;
        self.time = Q16::ZERO;
        self.set_period(table.period(note));

        if self.vibrato.enabled {
            self.vibrato.configure(self.vibrato.params, self.period);
        }

        if self.envelope.enabled {
            self.high_level = 0;
            self.low_level = 0;
            self.envelope.trigger();
        } else {
            self.high_level = self.high_level_limit;
            self.low_level = -self.high_level;
        }

        self.note_on = true;
    }

    pub fn note_off(&mut self) {
        self.note_on = false;
        if self.envelope.enabled {
            self.envelope.release();
        } else {
            self.high_level = 0;
            self.low_level = 0;
        }
    }

    pub fn set_duty(&mut self, duty: u8) {
        self.duty = duty;
        self.rising_edge = duty_edge(self.period, duty);
    }

    /// Store vibrato parameters and restart the LFO around the current note.
    pub fn configure_vibrato(&mut self, table: &NotePeriodTable, params: VibratoParams) {
        self.vibrato.configure(params, table.period(self.note));
    }

    /// Start the LFO with the stored parameters around the current note.
    pub fn vibrato_on(&mut self, table: &NotePeriodTable) {
        self.configure_vibrato(table, self.vibrato.params);
    }

    /// Stop vibrato and restore the note's unmodulated pitch.
    pub fn vibrato_off(&mut self, table: &NotePeriodTable) {
        self.vibrato.enabled = false;
        self.set_period(table.period(self.note));
    }

    /// One modulation tick of the vibrato LFO.
    pub fn step_vibrato(&mut self) {
        let period = self.vibrato.step(self.period);
        self.set_period(period);
    }

    fn set_period(&mut self, period: Q16) {
        self.period = period;
        self.rising_edge = duty_edge(period, self.duty);
    }

    /// Advance one sample tick. A channel that never played holds still.
    pub fn next_sample(&mut self) -> i16 {
        if self.period == Q16::ZERO {
            return self.low_level;
        }
        self.time += Q16::ONE;

        if !self.is_high {
            if self.time >= self.rising_edge {
                self.is_high = true;
            }
            return self.low_level;
        }

        let out = self.high_level;
        if self.time >= self.period {
            // Periods under two samples can leave more than one period behind
            self.time = self.time % self.period;
            self.is_high = false;

            if let Some(factor) = self.envelope.take_pending() {
                self.high_level = scaled_level(self.high_level_limit, factor);
                self.low_level = -self.high_level;
            }
        }
        out
    }

    pub fn duty(&self) -> u8 {
        self.duty
    }

    pub fn time(&self) -> Q16 {
        self.time
    }

    pub fn period(&self) -> Q16 {
        self.period
    }

    pub fn rising_edge(&self) -> Q16 {
        self.rising_edge
    }

    pub fn high_level(&self) -> i16 {
        self.high_level
    }

    pub fn low_level(&self) -> i16 {
        self.low_level
    }

    pub fn high_level_limit(&self) -> i16 {
        self.high_level_limit
    }

    pub fn is_high(&self) -> bool {
        self.is_high
    }
}
