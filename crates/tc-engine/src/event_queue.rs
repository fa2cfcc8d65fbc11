//! Time-ordered queue of scheduled commands.

use alloc::vec::Vec;
use tc_ir::Event;

/// Events sorted by sample time.
///
/// Playback consumes events through a cursor that moves forward without
/// removing anything, so draining is allocation-free.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: Vec<Event>,
    /// Next event index to dispatch.
    cursor: usize,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new(), cursor: 0 }
    }

    /// Insert an event after any already queued for the same time.
    pub fn push(&mut self, event: Event) {
        let pos = self.events.partition_point(|e| e.time <= event.time);
        self.events.insert(pos, event);
    }

    /// Next event the cursor has not passed.
    pub fn peek(&self) -> Option<&Event> {
        self.events.get(self.cursor)
    }

    /// Advance the cursor past every event at or before `time` and return
    /// the index range it covered.
    pub fn drain_until(&mut self, time: u64) -> core::ops::Range<usize> {
        let start = self.cursor;
        while self.cursor < self.events.len() && self.events[self.cursor].time <= time {
            self.cursor += 1;
        }
        start..self.cursor
    }

    /// Get an event by index (for use with `drain_until` ranges).
    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True once the cursor has passed every event.
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.events.len()
    }

    /// Time of the last queued event.
    pub fn end_time(&self) -> Option<u64> {
        self.events.last().map(|e| e.time)
    }
}

impl FromIterator<Event> for EventQueue {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        let mut queue = Self::new();
        queue.extend(iter);
        queue
    }
}

impl Extend<Event> for EventQueue {
    fn extend<I: IntoIterator<Item = Event>>(&mut self, iter: I) {
        for event in iter {
            self.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_ir::Command;

    fn off(time: u64, channel: u8) -> Event {
        Event::new(time, Command::NoteOff { channel })
    }

    #[test]
    fn events_sorted_by_time() {
        let queue: EventQueue = [off(10, 0), off(5, 1), off(15, 2)].into_iter().collect();
        let times: Vec<u64> = (0..3).map(|i| queue.get(i).unwrap().time).collect();
        assert_eq!(times, [5, 10, 15]);
        assert_eq!(queue.end_time(), Some(15));
    }

    #[test]
    fn same_time_keeps_insertion_order() {
        let queue: EventQueue = [off(5, 0), off(5, 1), off(5, 2)].into_iter().collect();
        for i in 0..3 {
            assert_eq!(queue.get(i).unwrap().command.channel(), Some(i as u8));
        }
    }

    #[test]
    fn drain_until_returns_range() {
        let mut queue: EventQueue = [off(5, 0), off(10, 0), off(15, 0)].into_iter().collect();
        assert_eq!(queue.drain_until(12), 0..2);
        assert_eq!(queue.peek().unwrap().time, 15);
    }

    #[test]
    fn drain_until_advances_cursor() {
        let mut queue: EventQueue = [off(5, 0), off(10, 0)].into_iter().collect();
        assert_eq!(queue.drain_until(7), 0..1);
        assert_eq!(queue.drain_until(7), 1..1);
        assert_eq!(queue.drain_until(15), 1..2);
        assert!(queue.is_exhausted());
    }

    #[test]
    fn reset_cursor_allows_replay() {
        let mut queue: EventQueue = [off(1, 0)].into_iter().collect();
        assert_eq!(queue.drain_until(5).len(), 1);
        queue.reset_cursor();
        assert_eq!(queue.drain_until(5).len(), 1);
    }
}
