//! Rotating typewriter caption.
//!
//! A pure state machine: the host calls [`Typewriter::tick`], renders
//! [`Tick::text`] and schedules the next tick after [`Tick::delay_ms`].

use serde::{Deserialize, Serialize};

pub const DEFAULT_PERIOD_MS: f64 = 2000.0;
/// Pause after a phrase is fully deleted.
pub const NEXT_PHRASE_MS: f64 = 500.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub text: String,
    pub delay_ms: f64,
}

#[derive(Clone, Debug)]
pub struct Typewriter {
    phrases: Vec<String>,
    period_ms: f64,
    loop_num: usize,
    /// Visible prefix length, in chars.
    shown: usize,
    deleting: bool,
}

impl Typewriter {
    /// `period_ms` is the pause on a fully typed phrase; non-positive values use the default.
    pub fn new(phrases: Vec<String>, period_ms: Option<f64>) -> Self {
        Self {
            phrases,
            period_ms: period_ms
                .filter(|p| p.is_finite() && *p > 0.0)
                .unwrap_or(DEFAULT_PERIOD_MS),
            loop_num: 0,
            shown: 0,
            deleting: false,
        }
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    /// Index of the phrase currently being typed.
    pub fn phrase_index(&self) -> usize {
        if self.phrases.is_empty() {
            0
        } else {
            self.loop_num % self.phrases.len()
        }
    }

    /// Advance by one character. `random` yields values in `[0, 1)` for typing jitter.
    pub fn tick(&mut self, mut random: impl FnMut() -> f64) -> Tick {
        let Some(full) = self.phrases.get(self.phrase_index()) else {
            return Tick {
                text: String::new(),
                delay_ms: self.period_ms,
            };
        };
        let full_len = full.chars().count();

        if self.deleting {
            self.shown = self.shown.saturating_sub(1);
        } else {
            self.shown = (self.shown + 1).min(full_len);
        }
        let text: String = full.chars().take(self.shown).collect();

        let mut delay_ms = 200.0 - random() * 100.0;
        if self.deleting {
            delay_ms /= 2.0;
        }

        if !self.deleting && self.shown == full_len {
            delay_ms = self.period_ms;
            self.deleting = true;
        } else if self.deleting && self.shown == 0 {
            self.deleting = false;
            self.loop_num = self.loop_num.wrapping_add(1);
            delay_ms = NEXT_PHRASE_MS;
        }

        Tick { text, delay_ms }
    }
}
