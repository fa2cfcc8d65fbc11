//! Triangular pitch LFO applied to an oscillator period.

use tc_ir::{Q16, VibratoParams, ONE_CENT_SCALED};

/// Vibrato state for one square channel.
///
/// The LFO rises for `steps` modulation ticks, adding `delta` to the period
/// each tick, then falls for the same count. At the end of each cycle the
/// period snaps back to the base period so rounding never accumulates.
/// It does not snap to a pitch floor of `base - steps * delta`, which would
/// leave the note flat after every cycle.
///
/// An LFO that was never configured leaves the period untouched.
#[derive(Clone, Debug, Default)]
pub struct Vibrato {
    pub enabled: bool,
    pub params: VibratoParams,
    /// Currently moving the period up
    pub rising: bool,
    time: Q16,
    half_period: Q16,
    full_period: Q16,
    delta: Q16,
    base_period: Q16,
}

impl Vibrato {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the LFO around `base_period` and enable it.
    pub fn configure(&mut self, params: VibratoParams, base_period: Q16) {
        let steps = params.steps();
        let depth = Q16::from_raw(((params.depth as u64 * ONE_CENT_SCALED) >> 16) as u32);

        self.params = VibratoParams::new(params.rate.min(tc_ir::MAX_PARAM), params.depth);
        self.half_period = Q16::ONE * steps;
        self.full_period = self.half_period * 2;
        self.delta = base_period.mul(depth) / steps;
        self.base_period = base_period;
        self.rising = true;
        self.time = Q16::ZERO;
        self.enabled = true;
    }

    /// Advance one modulation tick and return the new oscillator period.
    pub fn step(&mut self, period: Q16) -> Q16 {
        if self.full_period == Q16::ZERO {
            return period;
        }
        self.time += Q16::ONE;

        if self.rising {
            if self.time >= self.half_period {
                self.rising = false;
            }
            period + self.delta
        } else if self.time >= self.full_period {
            self.time -= self.full_period;
            self.rising = true;
            self.base_period
        } else {
            period.saturating_sub(self.delta)
        }
    }

    pub fn time(&self) -> Q16 {
        self.time
    }

    pub fn half_period(&self) -> Q16 {
        self.half_period
    }

    pub fn full_period(&self) -> Q16 {
        self.full_period
    }

    /// Period change per modulation tick.
    pub fn delta(&self) -> Q16 {
        self.delta
    }

    /// Period the LFO cycle starts from and returns to.
    pub fn base_period(&self) -> Q16 {
        self.base_period
    }
}
