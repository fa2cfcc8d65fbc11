//! Modulation parameter sets.

/// Upper bound of every envelope and vibrato-rate parameter.
pub const MAX_PARAM: u8 = 127;

/// ADSR configuration. Attack, decay and release count modulation ticks;
/// sustain is a level in 127ths of full scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnvelopeParams {
    pub attack: u8,
    pub decay: u8,
    pub sustain: u8,
    pub release: u8,
}

impl EnvelopeParams {
    pub const fn new(attack: u8, decay: u8, sustain: u8, release: u8) -> Self {
        Self { attack, decay, sustain, release }
    }

    /// Clamp every field into 0..=127.
    pub fn clamped(self) -> Self {
        Self {
            attack: self.attack.min(MAX_PARAM),
            decay: self.decay.min(MAX_PARAM),
            sustain: self.sustain.min(MAX_PARAM),
            release: self.release.min(MAX_PARAM),
        }
    }
}

/// Vibrato configuration. Higher rates give a faster LFO; depth is in cents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VibratoParams {
    pub rate: u8,
    pub depth: u8,
}

impl VibratoParams {
    pub const fn new(rate: u8, depth: u8) -> Self {
        Self { rate, depth }
    }

    /// Modulation ticks per LFO half-cycle, in 1..=128.
    pub fn steps(self) -> u32 {
        128 - self.rate.min(MAX_PARAM) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_envelope_fields() {
        let p = EnvelopeParams::new(200, 5, 128, 127).clamped();
        assert_eq!(p, EnvelopeParams::new(127, 5, 127, 127));
    }

    #[test]
    fn vibrato_steps_are_inverse_to_rate() {
        assert_eq!(VibratoParams::new(0, 0).steps(), 128);
        assert_eq!(VibratoParams::new(115, 30).steps(), 13);
        assert_eq!(VibratoParams::new(127, 0).steps(), 1);
        assert_eq!(VibratoParams::new(255, 0).steps(), 1);
    }
}
