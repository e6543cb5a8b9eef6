//! Typewriter animation for the terminal's empty input line.

use std::time::Duration;

pub const TYPE_DELAY: Duration = Duration::from_millis(120);
pub const DELETE_DELAY: Duration = Duration::from_millis(80);
pub const HOLD_DELAY: Duration = Duration::from_millis(1500);
pub const NEXT_DELAY: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Typing,
    Pausing,
    Deleting,
}

/// Types each message out, holds it, erases it, then moves to the next one
pub struct PlaceholderCycle {
    messages: Vec<String>,
    index: usize,
    shown: usize,
    phase: CyclePhase,
    /// Time left before the next step when driven by `advance`
    pending: Duration,
}

impl PlaceholderCycle {
    pub fn new(messages: Vec<String>) -> Self {
        Self {
            messages,
            index: 0,
            shown: 0,
            phase: CyclePhase::Typing,
            pending: Duration::ZERO,
        }
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn current_len(&self) -> usize {
        self.messages
            .get(self.index)
            .map(|m| m.chars().count())
            .unwrap_or(0)
    }

    /// The visible part of the current message
    pub fn text(&self) -> &str {
        let Some(message) = self.messages.get(self.index) else {
            return "";
        };
        let end = message
            .char_indices()
            .nth(self.shown)
            .map(|(i, _)| i)
            .unwrap_or(message.len());
        &message[..end]
    }

    /// Perform one transition and return the delay until the next one
    pub fn step(&mut self) -> Duration {
        if self.messages.is_empty() {
            return HOLD_DELAY;
        }

        match self.phase {
            CyclePhase::Typing => {
                if self.shown < self.current_len() {
                    self.shown += 1;
                }
                if self.shown >= self.current_len() {
                    self.phase = CyclePhase::Pausing;
                    HOLD_DELAY
                } else {
                    TYPE_DELAY
                }
            }
            CyclePhase::Pausing => {
                self.phase = CyclePhase::Deleting;
                DELETE_DELAY
            }
            CyclePhase::Deleting => {
                if self.shown == 0 {
                    self.index = (self.index + 1) % self.messages.len();
                    self.phase = CyclePhase::Typing;
                    NEXT_DELAY
                } else {
                    self.shown -= 1;
                    DELETE_DELAY
                }
            }
        }
    }

    /// Drive the cycle from a fixed-rate tick. Returns whether the text changed.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        let before = (self.index, self.shown);
        let mut budget = elapsed;

        while budget >= self.pending {
            budget -= self.pending;
            self.pending = self.step();
        }
        self.pending -= budget;

        before != (self.index, self.shown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(messages: &[&str]) -> PlaceholderCycle {
        PlaceholderCycle::new(messages.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_types_one_char_per_step() {
        let mut cycle = cycle(&["abc"]);
        assert_eq!(cycle.text(), "");
        assert_eq!(cycle.step(), TYPE_DELAY);
        assert_eq!(cycle.text(), "a");
        assert_eq!(cycle.step(), TYPE_DELAY);
        assert_eq!(cycle.step(), HOLD_DELAY);
        assert_eq!(cycle.text(), "abc");
        assert_eq!(cycle.phase(), CyclePhase::Pausing);
    }

    #[test]
    fn test_full_cycle_moves_to_next_message() {
        let mut cycle = cycle(&["ab", "xyz"]);
        cycle.step();
        cycle.step(); // "ab", pausing
        assert_eq!(cycle.step(), DELETE_DELAY); // start deleting
        assert_eq!(cycle.step(), DELETE_DELAY);
        assert_eq!(cycle.text(), "a");
        cycle.step();
        assert_eq!(cycle.text(), "");
        assert_eq!(cycle.step(), NEXT_DELAY);
        assert_eq!(cycle.index(), 1);
        assert_eq!(cycle.phase(), CyclePhase::Typing);
        cycle.step();
        assert_eq!(cycle.text(), "x");
    }

    #[test]
    fn test_wraps_after_last_message() {
        let mut cycle = cycle(&["a", "b"]);
        for _ in 0..8 {
            cycle.step();
        }
        assert_eq!(cycle.index(), 0);
    }

    #[test]
    fn test_multibyte_text_slices_on_char_boundaries() {
        let mut cycle = cycle(&["héllo"]);
        cycle.step();
        cycle.step();
        assert_eq!(cycle.text(), "hé");
    }

    #[test]
    fn test_empty_message_list_is_inert() {
        let mut cycle = cycle(&[]);
        assert_eq!(cycle.step(), HOLD_DELAY);
        assert_eq!(cycle.text(), "");
    }

    #[test]
    fn test_advance_accumulates_ticks() {
        let mut cycle = cycle(&["abc"]);
        // First step is due immediately
        assert!(cycle.advance(Duration::ZERO));
        assert_eq!(cycle.text(), "a");

        assert!(!cycle.advance(Duration::from_millis(100)));
        assert!(cycle.advance(Duration::from_millis(20)));
        assert_eq!(cycle.text(), "ab");

        // Two typing delays at once
        cycle.advance(Duration::from_millis(240));
        assert_eq!(cycle.text(), "abc");
    }
}
