//! Sample generation engine for the tetrachip synthesizer.
//!
//! Two square channels, a triangle and a noise channel, each stepped once
//! per sample and mixed into a fixed-size ring that the output side drains.
//! Envelopes and vibrato run on a separate, much slower modulation tick.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod driver;
mod envelope;
mod event_queue;
mod noise;
mod random;
mod ring_buffer;
mod square;
mod status;
mod synth;
mod triangle;
mod vibrato;

pub use driver::Driver;
pub use envelope::{AdsrState, Envelope};
pub use event_queue::EventQueue;
pub use noise::NoiseChannel;
pub use random::{Lfsr, RandomSource};
pub use ring_buffer::{SampleRing, RING_CAPACITY};
pub use square::SquareChannel;
pub use status::{ChannelStatus, EnvelopeStatus, NoiseStatus, SquareStatus, TriangleStatus, VibratoStatus};
pub use synth::{Synth, SQUARE_A_DEFAULT_DUTY, SQUARE_B_DEFAULT_DUTY, TRIANGLE_DEFAULT_DUTY};
pub use triangle::TriangleChannel;
pub use vibrato::Vibrato;
