//! Fixed-capacity sample FIFO between the generation loop and the output.

/// Capacity used by the synthesizer.
pub const RING_CAPACITY: usize = 128;

/// Single-producer single-consumer ring of signed samples.
///
/// The cursors do not advance on the transition between zero and one
/// stored sample, so a lone sample sits under both cursors and no extra
/// empty/full bit is needed. Pushing into a full ring or popping an empty
/// one is a caller bug: it panics in debug builds and is unchecked in
/// release builds.
#[derive(Clone, Debug)]
pub struct SampleRing<const C: usize> {
    samples: [i16; C],
    write: usize,
    read: usize,
    len: usize,
}

impl<const C: usize> SampleRing<C> {
    pub const fn new() -> Self {
        Self { samples: [0; C], write: 0, read: 0, len: 0 }
    }

    pub fn push(&mut self, sample: i16) {
        debug_assert!(self.len < C, "push into full sample ring");
        if self.len != 0 {
            self.write = wrap::<C>(self.write + 1);
        }
        self.samples[self.write] = sample;
        self.len += 1;
    }

    pub fn pop(&mut self) -> i16 {
        debug_assert!(self.len > 0, "pop from empty sample ring");
        let sample = self.samples[self.read];
        if self.len > 1 {
            self.read = wrap::<C>(self.read + 1);
        }
        self.len = self.len.wrapping_sub(1);
        sample
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == C
    }

    pub const fn capacity(&self) -> usize {
        C
    }

    /// Drop every stored sample and rewind both cursors.
    pub fn clear(&mut self) {
        self.write = 0;
        self.read = 0;
        self.len = 0;
    }
}

impl<const C: usize> Default for SampleRing<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn wrap<const C: usize>(index: usize) -> usize {
    if index == C {
        0
    } else {
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_to_capacity() {
        let mut ring = SampleRing::<RING_CAPACITY>::new();
        assert!(ring.is_empty());
        for i in 0..RING_CAPACITY {
            assert!(!ring.is_full());
            ring.push(i as i16);
        }
        assert!(ring.is_full());
        assert_eq!(ring.len(), RING_CAPACITY);
    }

    #[test]
    fn fifo_order_and_drain() {
        let mut ring = SampleRing::<RING_CAPACITY>::new();
        for i in 0..RING_CAPACITY {
            ring.push(i as i16 - 64);
        }
        for i in 0..RING_CAPACITY {
            assert_eq!(ring.pop(), i as i16 - 64);
        }
        assert!(ring.is_empty());
    }

    #[test]
    fn single_slot_round_trip() {
        let mut ring = SampleRing::<4>::new();
        for v in [7, -7, 300, i16::MIN, i16::MAX] {
            ring.push(v);
            assert_eq!(ring.len(), 1);
            assert_eq!(ring.pop(), v);
            assert!(ring.is_empty());
        }
    }

    #[test]
    fn interleaved_wraps_preserve_order() {
        let mut ring = SampleRing::<5>::new();
        let mut next_in = 0i16;
        let mut next_out = 0i16;
        for round in 0..200 {
            let pushes = 1 + round % 5;
            for _ in 0..pushes {
                if ring.is_full() {
                    break;
                }
                ring.push(next_in);
                next_in += 1;
            }
            let pops = 1 + (round * 3) % 4;
            for _ in 0..pops {
                if ring.is_empty() {
                    break;
                }
                assert_eq!(ring.pop(), next_out);
                next_out += 1;
            }
        }
        while !ring.is_empty() {
            assert_eq!(ring.pop(), next_out);
            next_out += 1;
        }
        assert_eq!(next_in, next_out);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "push into full sample ring")]
    fn push_when_full_is_fatal_in_debug() {
        let mut ring = SampleRing::<2>::new();
        ring.push(1);
        ring.push(2);
        ring.push(3);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "pop from empty sample ring")]
    fn pop_when_empty_is_fatal_in_debug() {
        let mut ring = SampleRing::<2>::new();
        ring.pop();
    }
}
