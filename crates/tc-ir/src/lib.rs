//! Core value types for the tetrachip synthesizer.
//!
//! Fixed-point arithmetic, the note period table, channel identity and the
//! control vocabulary shared by the engine and its hosts.
//!
//! Designed to be `no_std` compatible.

#![cfg_attr(not(feature = "std"), no_std)]

mod channel;
mod event;
mod fixed;
mod note_table;
mod params;

pub use channel::{ChannelId, InvalidChannel, CHANNEL_COUNT};
pub use event::{Command, Event};
pub use fixed::Q16;
pub use note_table::{note_frequency, notes, NotePeriodTable, DEFAULT_SAMPLE_RATE, NOTE_COUNT};
pub use params::{EnvelopeParams, VibratoParams, MAX_PARAM};

/// Peak square/noise level per unit of velocity.
pub const HIGH_AMPLITUDE_FACTOR: i16 = 32;

/// Trough level per unit of velocity. The triangle uses half of it.
pub const LOW_AMPLITUDE_FACTOR: i16 = -32;

/// Relative period change of one cent (`2^(1/1200) - 1`) scaled by 2^32, so
/// `depth * ONE_CENT_SCALED >> 16` is the depth ratio in 16.16 without
/// touching floating point.
pub const ONE_CENT_SCALED: u64 = 2_410_580;

/// Modulation ticks per second. One tick is the ADSR time unit (10 ms).
pub const MODULATION_RATE_HZ: u32 = 100;
