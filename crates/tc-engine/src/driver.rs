//! The generation loop: keeps the ring topped up and fires modulation ticks.

use tc_ir::{Event, MODULATION_RATE_HZ};

use crate::event_queue::EventQueue;
use crate::random::{Lfsr, RandomSource};
use crate::synth::Synth;

/// Drives a `Synth` the way a polling main loop does.
///
/// Samples are generated only while the ring has room. Every
/// `modulation_interval` generated samples the envelopes and vibratos are
/// stepped, and scheduled events are dispatched just before the sample
/// they are timed at.
pub struct Driver<R: RandomSource = Lfsr> {
    synth: Synth<R>,
    events: EventQueue,
    modulation_interval: u32,
    modulation_counter: u32,
    generated: u64,
}

impl<R: RandomSource> Driver<R> {
    /// Modulation runs at 100 Hz of the synth's sample rate.
    pub fn new(synth: Synth<R>, events: EventQueue) -> Self {
        let modulation_interval = (synth.sample_rate() / MODULATION_RATE_HZ).max(1);
        Self { synth, events, modulation_interval, modulation_counter: 0, generated: 0 }
    }

    pub fn with_modulation_interval(mut self, samples: u32) -> Self {
        self.modulation_interval = samples.max(1);
        self
    }

    /// Queue another event. Events in the past fire before the next sample.
    pub fn schedule(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Generate until the ring is full. Returns the number of samples made.
    pub fn fill(&mut self) -> usize {
        let mut made = 0;
        while !self.synth.is_full() {
            self.generate();
            made += 1;
        }
        made
    }

    fn generate(&mut self) {
        for index in self.events.drain_until(self.generated) {
            if let Some(event) = self.events.get(index) {
                self.synth.apply(&event.command);
            }
        }

        self.synth.tick_sample();
        self.generated += 1;

        self.modulation_counter += 1;
        if self.modulation_counter >= self.modulation_interval {
            self.modulation_counter = 0;
            self.synth.tick_modulation();
        }
    }

    /// Pop the next output sample, generating more first if the ring ran dry.
    pub fn next_sample(&mut self) -> i16 {
        if self.synth.is_empty() {
            self.fill();
        }
        self.synth.pop_sample()
    }

    /// Samples generated so far (not all of them consumed yet).
    pub fn generated(&self) -> u64 {
        self.generated
    }

    pub fn modulation_interval(&self) -> u32 {
        self.modulation_interval
    }

    /// True once every scheduled event has been dispatched.
    pub fn events_done(&self) -> bool {
        self.events.is_exhausted()
    }

    pub fn synth(&self) -> &Synth<R> {
        &self.synth
    }

    pub fn synth_mut(&mut self) -> &mut Synth<R> {
        &mut self.synth
    }
}
