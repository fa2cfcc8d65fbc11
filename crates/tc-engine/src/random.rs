//! Random bit sources for the noise channel.

/// Supplies independent, uniformly distributed bits on demand.
pub trait RandomSource {
    fn next_bit(&mut self) -> bool;
}

impl<F: FnMut() -> bool> RandomSource for F {
    fn next_bit(&mut self) -> bool {
        self()
    }
}

const LFSR_SEED: u16 = 0xACE1;
/// Taps at bits 16, 14, 13 and 11 (maximal length).
const LFSR_TAPS: u16 = 0xB400;

/// 16-bit Galois LFSR. Period 65535.
#[derive(Clone, Debug)]
pub struct Lfsr {
    state: u16,
}

impl Lfsr {
    /// Seed the register. A zero seed would lock up, so it is replaced.
    pub const fn new(seed: u16) -> Self {
        Self { state: if seed == 0 { LFSR_SEED } else { seed } }
    }

    pub fn state(&self) -> u16 {
        self.state
    }
}

impl Default for Lfsr {
    fn default() -> Self {
        Self::new(LFSR_SEED)
    }
}

impl RandomSource for Lfsr {
    fn next_bit(&mut self) -> bool {
        let bit = self.state & 1;
        self.state >>= 1;
        if bit == 1 {
            self.state ^= LFSR_TAPS;
        }
        bit == 1
    }
}
