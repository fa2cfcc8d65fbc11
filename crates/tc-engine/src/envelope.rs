//! ADSR amplitude envelope stepped by the modulation tick.

use tc_ir::{EnvelopeParams, Q16};

/// Envelope phase. `Off` doubles as the never-triggered state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AdsrState {
    #[default]
    Off,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// Amplitude envelope owned by one oscillator.
///
/// The modulation tick moves `factor` and raises `pending`; the oscillator
/// picks the new factor up at its next phase wrap and clears the flag.
#[derive(Clone, Debug)]
pub struct Envelope {
    /// Whether note on/off drive the envelope at all
    pub enabled: bool,
    /// A new factor is waiting for the oscillator's next phase wrap
    pub pending: bool,
    state: AdsrState,
    params: EnvelopeParams,
    attack_step: Q16,
    decay_step: Q16,
    sustain_factor: Q16,
    release_step: Q16,
    /// Amplitude factor in [0, 1]
    factor: Q16,
}

impl Envelope {
    /// A disabled envelope with all-zero parameters.
    pub fn new() -> Self {
        let mut envelope = Self {
            enabled: false,
            pending: false,
            state: AdsrState::Off,
            params: EnvelopeParams::default(),
            attack_step: Q16::ZERO,
            decay_step: Q16::ZERO,
            sustain_factor: Q16::ZERO,
            release_step: Q16::ZERO,
            factor: Q16::ZERO,
        };
        envelope.configure(EnvelopeParams::default());
        envelope
    }

    /// Derive step sizes. Zero times substitute a step that completes the
    /// phase within a single modulation tick.
    pub fn configure(&mut self, params: EnvelopeParams) {
        let params = params.clamped();
        self.params = params;
        self.attack_step = step_for(params.attack, Q16::ONE);
        self.decay_step = step_for(params.decay, Q16::ONE);
        self.sustain_factor = (Q16::ONE / 127) * params.sustain as u32;
        self.release_step = step_for(params.release, Q16::ONE * 2);
    }

    /// Note on: restart from silence.
    pub fn trigger(&mut self) {
        self.factor = Q16::ZERO;
        self.state = AdsrState::Attack;
        self.pending = true;
    }

    /// Note off: jump to release from whatever phase is running.
    pub fn release(&mut self) {
        self.state = AdsrState::Release;
    }

    /// Advance one modulation tick.
    pub fn step(&mut self) {
        match self.state {
            AdsrState::Off | AdsrState::Sustain => return,
            AdsrState::Attack => {
                self.factor += self.attack_step;
                if self.factor >= Q16::ONE {
                    self.factor = Q16::ONE;
                    self.state = AdsrState::Decay;
                }
            }
            AdsrState::Decay => {
                if self.factor >= self.decay_step {
                    self.factor -= self.decay_step;
                    if self.factor <= self.sustain_factor {
                        self.enter_sustain();
                    }
                } else {
                    self.enter_sustain();
                }
            }
            AdsrState::Release => {
                if self.factor <= self.release_step {
                    self.factor = Q16::ZERO;
                    self.state = AdsrState::Off;
                } else {
                    self.factor -= self.release_step;
                }
            }
        }
        self.pending = true;
    }

    fn enter_sustain(&mut self) {
        self.factor = self.sustain_factor;
        self.state = AdsrState::Sustain;
    }

    /// Consume a pending update, returning the factor to apply.
    pub fn take_pending(&mut self) -> Option<Q16> {
        if self.pending {
            self.pending = false;
            Some(self.factor)
        } else {
            None
        }
    }

    pub fn state(&self) -> AdsrState {
        self.state
    }

    pub fn params(&self) -> EnvelopeParams {
        self.params
    }

    pub fn factor(&self) -> Q16 {
        self.factor
    }

    pub fn attack_step(&self) -> Q16 {
        self.attack_step
    }

    pub fn decay_step(&self) -> Q16 {
        self.decay_step
    }

    pub fn sustain_factor(&self) -> Q16 {
        self.sustain_factor
    }

    pub fn release_step(&self) -> Q16 {
        self.release_step
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

fn step_for(ticks: u8, instant: Q16) -> Q16 {
    if ticks == 0 {
        instant
    } else {
        Q16::ONE / ticks as u32
    }
}

/// Scale a velocity-derived level limit by an envelope factor, rounding.
pub(crate) fn scaled_level(limit: i16, factor: Q16) -> i16 {
    Q16::from_int(limit.unsigned_abs()).mul(factor).to_int() as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(a: u8, d: u8, s: u8, r: u8) -> Envelope {
        let mut env = Envelope::new();
        env.configure(EnvelopeParams::new(a, d, s, r));
        env.enabled = true;
        env
    }

    #[test]
    fn zero_times_use_instant_steps() {
        let env = configured(0, 0, 0, 0);
        assert_eq!(env.attack_step(), Q16::ONE);
        assert_eq!(env.decay_step(), Q16::ONE);
        assert_eq!(env.release_step(), Q16::from_int(2));
        assert_eq!(env.sustain_factor(), Q16::ZERO);
    }

    #[test]
    fn step_sizes_are_reciprocals() {
        let env = configured(4, 10, 127, 50);
        assert_eq!(env.attack_step(), Q16::from_raw(0x4000));
        assert_eq!(env.decay_step(), Q16::from_raw(65536 / 10));
        assert_eq!(env.release_step(), Q16::from_raw(65536 / 50));
        assert_eq!(env.sustain_factor(), Q16::from_raw((65536 / 127) * 127));
    }

    #[test]
    fn instant_attack_reaches_full_scale_in_one_tick() {
        let mut env = configured(0, 10, 5, 50);
        env.trigger();
        assert_eq!(env.state(), AdsrState::Attack);
        env.step();
        assert_eq!(env.state(), AdsrState::Decay);
        assert_eq!(env.factor(), Q16::ONE);
    }

    #[test]
    fn attack_ramps_linearly() {
        let mut env = configured(4, 10, 5, 50);
        env.trigger();
        for expected in [0x4000, 0x8000, 0xC000] {
            env.step();
            assert_eq!(env.factor(), Q16::from_raw(expected));
            assert_eq!(env.state(), AdsrState::Attack);
        }
        env.step();
        assert_eq!(env.factor(), Q16::ONE);
        assert_eq!(env.state(), AdsrState::Decay);
    }

    #[test]
    fn decay_settles_on_sustain() {
        let mut env = configured(0, 2, 64, 10);
        env.trigger();
        env.step();
        env.step();
        assert_eq!(env.state(), AdsrState::Sustain);
        assert_eq!(env.factor(), env.sustain_factor());
        env.step();
        assert_eq!(env.state(), AdsrState::Sustain);
        assert_eq!(env.factor(), env.sustain_factor());
    }

    #[test]
    fn instant_decay_to_zero_sustain() {
        let mut env = configured(0, 0, 0, 10);
        env.trigger();
        env.step();
        env.step();
        assert_eq!(env.state(), AdsrState::Sustain);
        assert_eq!(env.factor(), Q16::ZERO);
    }

    #[test]
    fn instant_release_goes_off_within_two_ticks() {
        let mut env = configured(0, 10, 100, 0);
        env.trigger();
        env.step();
        env.release();
        env.step();
        assert_eq!(env.state(), AdsrState::Off);
        assert_eq!(env.factor(), Q16::ZERO);
    }

    #[test]
    fn release_skips_remaining_attack() {
        let mut env = configured(100, 10, 100, 4);
        env.trigger();
        env.step();
        env.release();
        assert_eq!(env.state(), AdsrState::Release);
        env.step();
        assert_eq!(env.state(), AdsrState::Off);
    }

    #[test]
    fn every_transition_raises_pending_and_idle_states_do_not() {
        let mut env = configured(2, 2, 64, 2);
        assert_eq!(env.take_pending(), None);
        env.step();
        assert_eq!(env.take_pending(), None, "off does nothing");

        env.trigger();
        assert_eq!(env.take_pending(), Some(Q16::ZERO));
        env.step();
        assert_eq!(env.take_pending(), Some(Q16::HALF));
        assert_eq!(env.take_pending(), None);

        while env.state() != AdsrState::Sustain {
            env.step();
        }
        env.take_pending();
        env.step();
        assert_eq!(env.take_pending(), None, "sustain does nothing");
    }

    #[test]
    fn scaled_level_rounds() {
        assert_eq!(scaled_level(3200, Q16::ONE), 3200);
        assert_eq!(scaled_level(3200, Q16::HALF), 1600);
        assert_eq!(scaled_level(3200, Q16::ZERO), 0);
        assert_eq!(scaled_level(3, Q16::HALF), 2);
    }
}
