//! User-tunable engine settings.

use crate::pacing::{PacingModel, StopWords, clamp_wpm};

pub const DEFAULT_WPM: u16 = 420;
pub const DEFAULT_PIVOT_FRACTION: f64 = 0.35;
pub const DEFAULT_MILESTONE_WORDS: u32 = 500;

/// Settings the host may change at any time; every change is read at the
/// next word advance or the next frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineSettings {
    pub wpm: u16,
    pub natural_pacing: bool,
    /// Horizontal fraction of the display width the focus character sits on.
    pub pivot_fraction: f64,
    /// Snap the focus offset instead of animating it.
    pub reduced_motion: bool,
    pub punctuation_pauses: bool,
    pub long_word_cooldown: bool,
    /// Draw the leading characters of each word with extra weight.
    pub bionic_emphasis: bool,
    /// Words between progress notifications, `0` to disable them.
    pub milestone_words: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            wpm: DEFAULT_WPM,
            natural_pacing: true,
            pivot_fraction: DEFAULT_PIVOT_FRACTION,
            reduced_motion: false,
            punctuation_pauses: true,
            long_word_cooldown: true,
            bionic_emphasis: true,
            milestone_words: DEFAULT_MILESTONE_WORDS,
        }
    }
}

impl EngineSettings {
    /// Clamps every field into its supported range.
    pub fn sanitized(mut self) -> Self {
        self.wpm = clamp_wpm(u32::from(self.wpm));
        self.pivot_fraction = clamp_pivot(self.pivot_fraction);
        self
    }

    pub fn with_wpm(mut self, wpm: u32) -> Self {
        self.wpm = clamp_wpm(wpm);
        self
    }

    pub fn pacing_model(&self, stop_words: StopWords) -> PacingModel {
        PacingModel {
            stop_words,
            punctuation_pauses: self.punctuation_pauses,
            long_word_cooldown: self.long_word_cooldown,
        }
    }
}

pub fn clamp_pivot(fraction: f64) -> f64 {
    if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        DEFAULT_PIVOT_FRACTION
    }
}
