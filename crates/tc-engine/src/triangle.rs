//! Triangle oscillator built from two linear ramps.

use tc_ir::{NotePeriodTable, Q16, HIGH_AMPLITUDE_FACTOR, LOW_AMPLITUDE_FACTOR};

use crate::square::duty_edge;

/// State of the triangle channel. It has no envelope, and its vibrato
/// slot only records the on/off flag.
#[derive(Clone, Debug)]
pub struct TriangleChannel {
    pub note: u8,
    pub note_on: bool,
    /// Velocity of the current note
    pub amplitude: u8,
    /// Stored but never stepped
    pub vibrato_enabled: bool,
    duty: u8,
    time: Q16,
    period: Q16,
    /// Phase at which the ramp turns from rising to falling
    falling_edge: Q16,
    up_step: i16,
    down_step: i16,
    current: i16,
    low_level: i16,
    is_rising: bool,
}

impl TriangleChannel {
    pub fn new(duty: u8) -> Self {
        Self {
            note: 0,
            note_on: false,
            amplitude: 0,
            vibrato_enabled: false,
            duty,
            time: Q16::ZERO,
            period: Q16::ZERO,
            falling_edge: Q16::ZERO,
            up_step: 0,
            down_step: 0,
            current: 0,
            low_level: 0,
            is_rising: true,
        }
    }

    pub fn note_on(&mut self, table: &NotePeriodTable, note: u8, velocity: u8) {
        self.note = note;
        self.amplitude = velocity;
        self.is_rising = true;
        self.low_level = (LOW_AMPLITUDE_FACTOR / 2) * velocity as i16;
        self.time = Q16::ZERO;
        self.period = table.period(note);
        self.update_ramps();
        self.current = self.low_level;
        self.note_on = true;
    }

    /// Flatten the ramps. The output drifts to zero at the next wrap.
    pub fn note_off(&mut self) {
        self.note_on = false;
        self.low_level = 0;
        self.up_step = 0;
        self.down_step = 0;
    }

    pub fn set_duty(&mut self, duty: u8) {
        self.duty = duty;
        self.update_ramps();
    }

    fn update_ramps(&mut self) {
        let swing = (self.amplitude as u16) * HIGH_AMPLITUDE_FACTOR as u16;
        self.falling_edge = duty_edge(self.period, self.duty);
        self.up_step = ramp_step(swing, self.falling_edge);
        self.down_step = -ramp_step(swing, self.period.saturating_sub(self.falling_edge));
    }

    /// Advance one sample tick. A channel that never played holds still.
    pub fn next_sample(&mut self) -> i16 {
        if self.period == Q16::ZERO {
            return self.current;
        }
        self.time += Q16::ONE;

        if self.is_rising {
            self.current = self.current.saturating_add(self.up_step);
            if self.time >= self.falling_edge {
                self.is_rising = false;
            }
        } else {
            self.current = self.current.saturating_add(self.down_step);
            if self.time >= self.period {
                self.is_rising = true;
                self.current = self.low_level;
                self.time = self.time % self.period;
            }
        }

        self.current
    }

    pub fn duty(&self) -> u8 {
        self.duty
    }

    pub fn time(&self) -> Q16 {
        self.time
    }

    pub fn period(&self) -> Q16 {
        self.period
    }

    pub fn falling_edge(&self) -> Q16 {
        self.falling_edge
    }

    pub fn up_step(&self) -> i16 {
        self.up_step
    }

    pub fn down_step(&self) -> i16 {
        self.down_step
    }

    pub fn current(&self) -> i16 {
        self.current
    }

    pub fn low_level(&self) -> i16 {
        self.low_level
    }

    pub fn is_rising(&self) -> bool {
        self.is_rising
    }
}

/// Per-sample increment that covers `swing` over `span` samples.
/// A zero-length ramp gets a zero step.
fn ramp_step(swing: u16, span: Q16) -> i16 {
    match Q16::from_int(swing).checked_div(span) {
        Some(step) => (step.round().raw() >> 16).min(i16::MAX as u32) as i16,
        None => 0,
    }
}
