//! MIDI note number to oscillator period lookup.
//!
//! Built once with floating point; the audio path only ever reads it.

use crate::fixed::Q16;

/// Output rate the engine is tuned for.
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Number of MIDI notes covered by the table.
pub const NOTE_COUNT: usize = 128;

const A4_NOTE: i32 = 69;
const A4_HZ: f64 = 440.0;

/// Periods in samples per cycle for every MIDI note at one sample rate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotePeriodTable {
    sample_rate: u32,
    periods: [Q16; NOTE_COUNT],
}

impl NotePeriodTable {
    /// Build the equal-tempered table referenced to A4 = 440 Hz.
    ///
    /// Note 0 is the longest period (~5871 samples at 48 kHz), so sample
    /// rates above roughly 500 kHz no longer fit the 16-bit integer part.
    pub fn new(sample_rate: u32) -> Self {
        let mut periods = [Q16::ZERO; NOTE_COUNT];
        for (note, period) in periods.iter_mut().enumerate() {
            *period = Q16::from_f64(sample_rate as f64 / note_frequency(note as u8));
        }
        Self { sample_rate, periods }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Period of `note`. Out-of-range notes are masked into 0..=127.
    pub fn period(&self, note: u8) -> Q16 {
        self.periods[(note & 0x7F) as usize]
    }
}

impl Default for NotePeriodTable {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

/// Frequency of a MIDI note in Hz.
pub fn note_frequency(note: u8) -> f64 {
    A4_HZ * libm::pow(2.0, (note as i32 - A4_NOTE) as f64 / 12.0)
}

/// MIDI note numbers used by the demo patch and tests.
pub mod notes {
    pub const C3: u8 = 48;
    pub const C4: u8 = 60;
    pub const E4: u8 = 64;
    pub const G4: u8 = 67;
    pub const A4: u8 = 69;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const ULP: f64 = 1.0 / 65536.0;

    #[test]
    fn a4_at_48k() {
        let table = NotePeriodTable::new(48_000);
        assert_abs_diff_eq!(table.period(notes::A4).to_f64(), 48_000.0 / 440.0, epsilon = ULP);
    }

    #[test]
    fn every_note_within_one_unit() {
        for rate in [8_000, 44_100, 48_000, 96_000] {
            let table = NotePeriodTable::new(rate);
            for note in 0..NOTE_COUNT as u8 {
                let expected = rate as f64 / (440.0 * libm::pow(2.0, (note as f64 - 69.0) / 12.0));
                assert_abs_diff_eq!(table.period(note).to_f64(), expected, epsilon = ULP);
            }
        }
    }

    #[test]
    fn octave_halves_period() {
        let table = NotePeriodTable::default();
        let c3 = table.period(notes::C3).to_f64();
        let c4 = table.period(notes::C4).to_f64();
        assert_abs_diff_eq!(c3 / 2.0, c4, epsilon = 2.0 * ULP);
    }

    #[test]
    fn periods_strictly_decrease() {
        let table = NotePeriodTable::default();
        for note in 1..NOTE_COUNT as u8 {
            assert!(table.period(note) < table.period(note - 1));
        }
    }

    #[test]
    fn out_of_range_note_is_masked() {
        let table = NotePeriodTable::default();
        assert_eq!(table.period(128 + 69), table.period(69));
    }
}
