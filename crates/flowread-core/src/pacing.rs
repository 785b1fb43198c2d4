//! Per-token display delay.
//!
//! The delay starts from the uniform `60000 / wpm` slot and is scaled by
//! independent multipliers applied in a fixed order: word length, stop word,
//! numeral, then terminal punctuation (or anticipation of it). The product is
//! rounded, floored at [`MIN_DELAY_MS`], and finally a flat cooldown is added
//! after an unusually long previous word.

use std::collections::HashSet;

use crate::tokenizer::Token;

pub const MIN_WPM: u16 = 20;
pub const MAX_WPM: u16 = 5_000;
pub const MIN_DELAY_MS: u32 = 12;

/// Function words that are read faster than content words.
pub const DEFAULT_STOP_WORDS: [&str; 15] = [
    "the", "and", "of", "for", "a", "an", "to", "in", "on", "is", "it", "that", "with", "as",
    "at",
];

const LENGTH_LOG_WEIGHT: f64 = 0.5;
const STOP_WORD_FACTOR: f64 = 0.8;
const NUMERIC_FACTOR: f64 = 1.5;
const TERMINAL_FACTOR: f64 = 2.5;
const ANTICIPATION_FACTOR: f64 = 1.3;
const TERMINAL_MARKS: [char; 3] = ['.', '?', '!'];
const COOLDOWN_AFTER_CHARS: usize = 12;
const COOLDOWN_MS: u32 = 50;

pub fn clamp_wpm(wpm: u32) -> u16 {
    wpm.clamp(MIN_WPM as u32, MAX_WPM as u32) as u16
}

/// Uniform per-word slot at `wpm`, in milliseconds.
pub fn base_delay_ms(wpm: u16) -> f64 {
    60_000.0 / f64::from(wpm.max(1))
}

/// Lowercase stop-word set. Always contains [`DEFAULT_STOP_WORDS`] unless
/// built with [`StopWords::empty`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StopWords {
    words: HashSet<String>,
}

impl Default for StopWords {
    fn default() -> Self {
        let mut stop_words = Self::empty();
        stop_words.extend(DEFAULT_STOP_WORDS);
        stop_words
    }
}

impl StopWords {
    pub fn empty() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    /// Defaults plus caller-supplied words.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stop_words = Self::default();
        stop_words.extend(extra);
        stop_words
    }

    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let word = word.as_ref().trim();
            if !word.is_empty() {
                self.words.insert(word.to_lowercase());
            }
        }
    }

    /// Case-insensitive lookup that ignores trailing punctuation.
    pub fn contains(&self, word: &str) -> bool {
        let key = word.trim_end_matches(|c: char| !c.is_alphanumeric());
        !key.is_empty() && self.words.contains(&key.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Stop words plus the optional pause gates.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PacingModel {
    pub stop_words: StopWords,
    /// Terminal-punctuation hold and the slow-in before it.
    pub punctuation_pauses: bool,
    /// Flat recovery delay after a long previous word.
    pub long_word_cooldown: bool,
}

impl Default for PacingModel {
    fn default() -> Self {
        Self::new(StopWords::default())
    }
}

impl PacingModel {
    pub fn new(stop_words: StopWords) -> Self {
        Self {
            stop_words,
            punctuation_pauses: true,
            long_word_cooldown: true,
        }
    }

    /// Delay for `tokens[index]` in milliseconds, never below
    /// [`MIN_DELAY_MS`].
    ///
    /// An index outside the stream yields the plain base delay.
    pub fn delay_ms(&self, tokens: &[Token], index: usize, wpm: u16, natural_pacing: bool) -> u32 {
        let gates = PauseGates {
            punctuation: self.punctuation_pauses,
            cooldown: self.long_word_cooldown,
        };
        compute_delay(tokens, index, wpm, natural_pacing, &self.stop_words, gates)
    }
}

/// Delay with both pause gates enabled and the given stop words.
pub fn delay_ms(
    tokens: &[Token],
    index: usize,
    wpm: u16,
    natural_pacing: bool,
    stop_words: &StopWords,
) -> u32 {
    compute_delay(
        tokens,
        index,
        wpm,
        natural_pacing,
        stop_words,
        PauseGates::default(),
    )
}

#[derive(Clone, Copy, Debug)]
struct PauseGates {
    punctuation: bool,
    cooldown: bool,
}

impl Default for PauseGates {
    fn default() -> Self {
        Self {
            punctuation: true,
            cooldown: true,
        }
    }
}

fn compute_delay(
    tokens: &[Token],
    index: usize,
    wpm: u16,
    natural_pacing: bool,
    stop_words: &StopWords,
    gates: PauseGates,
) -> u32 {
    let base = base_delay_ms(wpm);
    let Some(token) = tokens.get(index) else {
        return round_delay(base);
    };

    let text = token.text.as_str();
    let mut delay = if token.is_paragraph_break || text.trim().is_empty() {
        round_delay(base)
    } else {
        let multiplier = delay_multiplier(tokens, index, text, natural_pacing, stop_words, gates);
        round_delay(base * multiplier)
    };

    if gates.cooldown
        && index > 0
        && tokens
            .get(index - 1)
            .is_some_and(|prev| measured_len(&prev.text) > COOLDOWN_AFTER_CHARS)
    {
        delay += COOLDOWN_MS;
    }

    delay
}

fn delay_multiplier(
    tokens: &[Token],
    index: usize,
    text: &str,
    natural_pacing: bool,
    stop_words: &StopWords,
    gates: PauseGates,
) -> f64 {
    let length = measured_len(text).max(1);
    let mut multiplier = if natural_pacing && length > 1 {
        1.0 + (length as f64).log10() * LENGTH_LOG_WEIGHT
    } else {
        1.0
    };

    if stop_words.contains(text) {
        multiplier *= STOP_WORD_FACTOR;
    }

    if is_numeric_token(text) {
        multiplier *= NUMERIC_FACTOR;
    }

    if gates.punctuation {
        if text.ends_with(TERMINAL_MARKS) {
            multiplier *= TERMINAL_FACTOR;
        } else if tokens
            .get(index + 1)
            .is_some_and(|next| next.text.contains(TERMINAL_MARKS))
        {
            multiplier *= ANTICIPATION_FACTOR;
        }
    }

    multiplier
}

/// Letter/digit count, falling back to the raw character count for tokens
/// made only of symbols.
fn measured_len(text: &str) -> usize {
    let stripped = text.chars().filter(|c| c.is_alphanumeric()).count();
    if stripped > 0 {
        stripped
    } else {
        text.chars().count()
    }
}

/// Leading digit followed only by digits, commas and periods (`1,240.50`).
fn is_numeric_token(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(|c| c.is_ascii_digit())
        && chars.all(|c| c.is_ascii_digit() || c == ',' || c == '.')
}

fn round_delay(raw: f64) -> u32 {
    let rounded = raw.round();
    if rounded.is_finite() && rounded > f64::from(MIN_DELAY_MS) {
        rounded as u32
    } else {
        MIN_DELAY_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn delay(text: &str, index: usize, wpm: u16, natural: bool) -> u32 {
        delay_ms(&tokenize(text), index, wpm, natural, &StopWords::default())
    }

    #[test]
    fn plain_word_gets_base_delay() {
        assert_eq!(delay("cat", 0, 300, false), 200);
        assert_eq!(delay("cat", 0, 250, false), 240);
    }

    #[test]
    fn natural_pacing_grows_sub_linearly() {
        assert_eq!(delay("cat", 0, 300, true), 248);
        assert_eq!(delay("wonderful", 0, 300, true), 295);
        assert_eq!(delay("a", 0, 300, true), 160);
    }

    #[test]
    fn stop_words_ignore_case_and_trailing_punctuation() {
        assert_eq!(delay("the", 0, 300, false), 160);
        assert_eq!(delay("The, cat", 0, 300, false), 160);
        assert_eq!(delay("it.", 0, 300, false), 400);
    }

    #[test]
    fn caller_stop_words_extend_defaults() {
        let tokens = tokenize("Ahab the");
        let stop_words = StopWords::with_extra(["AHAB"]);
        assert_eq!(delay_ms(&tokens, 0, 300, false, &stop_words), 160);
        assert_eq!(delay_ms(&tokens, 1, 300, false, &stop_words), 160);
        assert_eq!(stop_words.len(), DEFAULT_STOP_WORDS.len() + 1);
    }

    #[test]
    fn numerals_hold_longer() {
        assert_eq!(delay("1,240.50", 0, 300, false), 300);
        assert_eq!(delay("1,240.50", 0, 300, true), 417);
        assert_eq!(delay("v1.2", 0, 300, false), 200);
    }

    #[test]
    fn terminal_punctuation_and_slow_in() {
        assert_eq!(delay("done.", 0, 300, false), 500);
        assert_eq!(delay("why?", 0, 300, false), 500);
        assert_eq!(delay("go home.", 0, 300, false), 260);
        assert_eq!(delay("go home", 0, 300, false), 200);
    }

    #[test]
    fn terminal_hold_is_at_least_two_and_a_half_times() {
        for wpm in [20u16, 100, 120, 250, 300, 400, 600, 1_000, 2_000] {
            let with = delay("two.", 0, wpm, false);
            let without = delay("two", 0, wpm, false);
            assert!(with * 2 >= without * 5, "wpm={wpm} with={with} without={without}");
        }

        // Rounding both delays costs at most 1.75 ms against the exact ratio.
        for wpm in (20u16..=5_000).step_by(37) {
            let with = f64::from(delay("wonderful.", 0, wpm, true));
            let without = f64::from(delay("wonderful", 0, wpm, true));
            assert!(with >= 2.5 * without - 1.75, "wpm={wpm}");
        }
    }

    #[test]
    fn long_previous_word_adds_cooldown() {
        assert_eq!(delay("extraordinarily cat", 1, 300, false), 250);
        assert_eq!(delay("extraordinary cat", 1, 300, false), 250);
        assert_eq!(delay("wonderfully cat", 1, 300, false), 200);
    }

    #[test]
    fn delay_never_drops_below_floor() {
        assert_eq!(delay("the", 0, MAX_WPM, false), MIN_DELAY_MS);
        assert_eq!(delay("cat", 0, MAX_WPM, false), MIN_DELAY_MS);
    }

    #[test]
    fn paragraph_break_paces_like_empty_word() {
        let tokens = tokenize("end\n\nstart.");
        assert!(tokens[1].is_paragraph_break);
        assert_eq!(delay_ms(&tokens, 1, 300, true, &StopWords::default()), 200);
    }

    #[test]
    fn gates_disable_punctuation_and_cooldown() {
        let tokens = tokenize("extraordinarily done.");
        let mut model = PacingModel::default();
        assert_eq!(model.delay_ms(&tokens, 1, 300, false), 550);
        model.punctuation_pauses = false;
        model.long_word_cooldown = false;
        assert_eq!(model.delay_ms(&tokens, 1, 300, false), 200);
    }

    #[test]
    fn out_of_range_index_uses_base_delay() {
        assert_eq!(delay("cat", 9, 300, true), 200);
    }

    #[test]
    fn wpm_is_clamped() {
        assert_eq!(clamp_wpm(0), MIN_WPM);
        assert_eq!(clamp_wpm(350), 350);
        assert_eq!(clamp_wpm(u32::MAX), MAX_WPM);
    }
}
