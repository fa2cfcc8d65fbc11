//! Allocation-free generation path tests.
//!
//! These tests verify that `Driver::next_sample()` does not allocate once
//! events are scheduled. They run several seconds of busy patches so that
//! envelope, vibrato and noise paths are all exercised.
//!
//! Just run `cargo test`, no feature flags needed.

use assert_no_alloc::{assert_no_alloc, AllocDisabler};

#[cfg(debug_assertions)]
#[global_allocator]
static A: AllocDisabler = AllocDisabler;

use tc_engine::{Driver, EventQueue, Synth};
use tc_ir::{notes, ChannelId, Command, EnvelopeParams, Event, VibratoParams};

const SAMPLE_RATE: u32 = 48_000;

fn at(ms: u64, command: Command) -> Event {
    Event::at_ms(ms, SAMPLE_RATE, command)
}

/// Generate `duration` samples, aborting on any heap allocation.
fn assert_generation_alloc_free(events: Vec<Event>, duration: usize) {
    let queue: EventQueue = events.into_iter().collect();
    let mut driver = Driver::new(Synth::new(SAMPLE_RATE), queue);

    assert_no_alloc(|| {
        for _ in 0..duration {
            driver.next_sample();
        }
    });
}

#[test]
fn plain_notes_alloc_free() {
    let events = vec![
        at(0, Command::NoteOn { channel: ChannelId::SquareA as u8, note: notes::E4, velocity: 100 }),
        at(0, Command::NoteOn { channel: ChannelId::Triangle as u8, note: notes::C3, velocity: 92 }),
        at(500, Command::NoteOn { channel: ChannelId::Noise as u8, note: 100, velocity: 40 }),
        at(1500, Command::AllNotesOff),
    ];
    assert_generation_alloc_free(events, SAMPLE_RATE as usize * 2);
}

#[test]
fn modulated_notes_alloc_free() {
    let sq_a = ChannelId::SquareA as u8;
    let noise = ChannelId::Noise as u8;
    let events = vec![
        at(0, Command::ConfigureEnvelope { channel: sq_a, params: EnvelopeParams::new(5, 10, 64, 20) }),
        at(0, Command::EnvelopeOn { channel: sq_a }),
        at(0, Command::ConfigureVibrato { channel: sq_a, params: VibratoParams::new(115, 30) }),
        at(0, Command::ConfigureEnvelope { channel: noise, params: EnvelopeParams::new(2, 6, 0, 0) }),
        at(0, Command::EnvelopeOn { channel: noise }),
        at(10, Command::NoteOn { channel: sq_a, note: notes::A4, velocity: 100 }),
        at(10, Command::NoteOn { channel: noise, note: 110, velocity: 40 }),
        at(800, Command::SetDuty { channel: sq_a, duty: 200 }),
        at(1200, Command::NoteOff { channel: sq_a }),
        at(1200, Command::NoteOff { channel: noise }),
        at(2000, Command::VibratoOff { channel: sq_a }),
    ];
    assert_generation_alloc_free(events, SAMPLE_RATE as usize * 3);
}

#[test]
fn unsupported_commands_alloc_free() {
    // Rejected commands only log, they must not allocate either
    let events = vec![
        at(0, Command::NoteOn { channel: 9, note: notes::A4, velocity: 100 }),
        at(0, Command::SetDuty { channel: ChannelId::Noise as u8, duty: 10 }),
        at(0, Command::EnvelopeOn { channel: ChannelId::Triangle as u8 }),
    ];
    assert_generation_alloc_free(events, SAMPLE_RATE as usize / 2);
}
