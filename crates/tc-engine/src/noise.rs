//! Pseudo-random noise channel gated by a note-derived prescaler.

use tc_ir::{HIGH_AMPLITUDE_FACTOR, NOTE_COUNT};

use crate::envelope::{scaled_level, Envelope};
use crate::random::RandomSource;

/// State of the noise channel.
#[derive(Clone, Debug)]
pub struct NoiseChannel {
    pub note: u8,
    pub note_on: bool,
    /// Sample ticks between random draws, minus one
    prescaler: u8,
    counter: u8,
    high_level: i16,
    low_level: i16,
    high_level_limit: i16,
    is_high: bool,
    pub envelope: Envelope,
}

impl NoiseChannel {
    pub fn new() -> Self {
        Self {
            note: 0,
            note_on: false,
            prescaler: 0,
            counter: 0,
            high_level: 0,
            low_level: 0,
            high_level_limit: 0,
            is_high: false,
            envelope: Envelope::new(),
        }
    }

    /// Higher notes reload the counter with a smaller prescaler, so the
    /// output flips more often.
    pub fn note_on(&mut self, note: u8, velocity: u8) {
        let note = note & 0x7F;
        self.note = note;
        self.prescaler = (NOTE_COUNT as u8) - note;
        self.counter = self.prescaler;
        self.high_level_limit = HIGH_AMPLITUDE_FACTOR * velocity as i16;

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

    /// Advance one sample tick, drawing a new bit when the counter expires.
    pub fn next_sample<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> i16 {
        if self.counter == 0 {
            self.counter = self.prescaler;
            self.is_high = rng.next_bit();

            if let Some(factor) = self.envelope.take_pending() {
                self.high_level = scaled_level(self.high_level_limit, factor);
                self.low_level = -self.high_level;
            }
        } else {
            self.counter -= 1;
        }

        if self.is_high {
            self.high_level
        } else {
            self.low_level
        }
    }

    pub fn prescaler(&self) -> u8 {
        self.prescaler
    }

    pub fn counter(&self) -> u8 {
        self.counter
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

impl Default for NoiseChannel {
    fn default() -> Self {
        Self::new()
    }
}
