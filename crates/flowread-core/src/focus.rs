//! Fixation-point alignment for the single-word view.
//!
//! Each word is shifted horizontally so one designated focus character sits
//! under a fixed fraction of the display width. The shift is animated by a
//! stiff damped spring so the eye sees the pivot stay put while words of
//! different widths replace each other.

pub const DEFAULT_STIFFNESS: f64 = 1_000.0;
pub const DEFAULT_DAMPING: f64 = 50.0;
/// Longest time slice integrated in one step, in seconds.
pub const MAX_STEP_SECONDS: f64 = 0.016;
/// Offset and speed below which the spring counts as settled.
pub const REST_DELTA: f64 = 0.5;

const EMPHASIS_CHARS: usize = 3;

/// Focus character position for a word of `char_count` characters.
pub fn focus_index_for_len(char_count: usize) -> usize {
    match char_count {
        0 | 1 => 0,
        2..=5 => 1,
        6..=9 => 2,
        10..=13 => 3,
        _ => 4,
    }
}

/// Character index (not byte index) of the focus character of `word`.
pub fn focus_char_index(word: &str) -> usize {
    let char_count = word.chars().count();
    focus_index_for_len(char_count).min(char_count.saturating_sub(1))
}

/// Leading characters drawn with extra weight.
pub fn emphasis_len(word: &str) -> usize {
    word.chars().count().min(EMPHASIS_CHARS)
}

/// Horizontal advance of rendered characters, supplied by the renderer.
pub trait GlyphMeasure {
    fn advance(&self, ch: char) -> f64;
}

/// Every character has the same advance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Monospace {
    pub advance: f64,
}

impl Monospace {
    pub const fn new(advance: f64) -> Self {
        Self { advance }
    }
}

impl GlyphMeasure for Monospace {
    fn advance(&self, _ch: char) -> f64 {
        self.advance
    }
}

/// Placement of a word's focus character relative to the word's left edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusGeometry {
    pub char_index: usize,
    pub left: f64,
    pub width: f64,
    pub word_width: f64,
}

impl FocusGeometry {
    pub fn measure<M>(word: &str, measure: &M) -> Self
    where
        M: GlyphMeasure + ?Sized,
    {
        let char_index = focus_char_index(word);
        let mut left = 0.0;
        let mut width = 0.0;
        let mut cursor = 0.0;

        for (idx, ch) in word.chars().enumerate() {
            let advance = measure.advance(ch);
            if idx == char_index {
                left = cursor;
                width = advance;
            }
            cursor += advance;
        }

        Self {
            char_index,
            left,
            width,
            word_width: cursor,
        }
    }

    pub fn center(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

/// Left-edge offset that puts the focus character's center on the pivot.
pub fn focus_target(display_width: f64, pivot_fraction: f64, geometry: &FocusGeometry) -> f64 {
    display_width * pivot_fraction - geometry.center()
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FocusMotion {
    pub position: f64,
    pub velocity: f64,
}

/// One-dimensional damped spring integrated with semi-implicit Euler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusSpring {
    motion: FocusMotion,
    target: f64,
    stiffness: f64,
    damping: f64,
    reduced_motion: bool,
}

impl Default for FocusSpring {
    fn default() -> Self {
        Self::new(DEFAULT_STIFFNESS, DEFAULT_DAMPING)
    }
}

impl FocusSpring {
    pub fn new(stiffness: f64, damping: f64) -> Self {
        Self {
            motion: FocusMotion::default(),
            target: 0.0,
            stiffness,
            damping,
            reduced_motion: false,
        }
    }

    pub fn motion(&self) -> FocusMotion {
        self.motion
    }

    pub fn position(&self) -> f64 {
        self.motion.position
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Retargets without touching position or velocity, so motion continues
    /// smoothly toward the new target.
    pub fn set_target(&mut self, target: f64) {
        if target.is_finite() {
            self.target = target;
        }
        if self.reduced_motion {
            self.snap();
        }
    }

    pub fn set_reduced_motion(&mut self, enabled: bool) {
        self.reduced_motion = enabled;
        if enabled {
            self.snap();
        }
    }

    pub fn snap(&mut self) {
        self.motion = FocusMotion {
            position: self.target,
            velocity: 0.0,
        };
    }

    /// Integrates `dt_seconds`, capped at [`MAX_STEP_SECONDS`], and returns
    /// the new position.
    pub fn step(&mut self, dt_seconds: f64) -> f64 {
        if self.reduced_motion {
            self.snap();
            return self.motion.position;
        }
        if !dt_seconds.is_finite() || dt_seconds <= 0.0 {
            return self.motion.position;
        }

        let dt = dt_seconds.min(MAX_STEP_SECONDS);
        let FocusMotion { position, velocity } = self.motion;
        let force = -self.stiffness * (position - self.target) - self.damping * velocity;
        let velocity = velocity + force * dt;
        self.motion = FocusMotion {
            position: position + velocity * dt,
            velocity,
        };
        self.motion.position
    }

    pub fn is_settled(&self) -> bool {
        (self.motion.position - self.target).abs() < REST_DELTA
            && self.motion.velocity.abs() < REST_DELTA
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_index_follows_length_table() {
        let cases = [
            ("", 0),
            ("a", 0),
            ("to", 1),
            ("hello", 1),
            ("reader", 2),
            ("wonderful", 2),
            ("everything", 3),
            ("extraordinary", 3),
            ("extraordinarily", 4),
        ];
        for (word, expected) in cases {
            assert_eq!(focus_char_index(word), expected, "{word}");
        }
        assert_eq!(focus_char_index("\u{e9}t\u{e9}"), 1);
    }

    #[test]
    fn emphasis_covers_at_most_three_chars() {
        assert_eq!(emphasis_len("it"), 2);
        assert_eq!(emphasis_len("reading"), 3);
    }

    #[test]
    fn target_centers_focus_char_on_pivot() {
        let geometry = FocusGeometry::measure("hello", &Monospace::new(10.0));
        assert_eq!(geometry.char_index, 1);
        assert_eq!(geometry.left, 10.0);
        assert_eq!(geometry.word_width, 50.0);
        assert_eq!(focus_target(800.0, 0.35, &geometry), 265.0);
    }

    #[test]
    fn proportional_glyphs_shift_the_target() {
        struct Narrow;
        impl GlyphMeasure for Narrow {
            fn advance(&self, ch: char) -> f64 {
                if ch == 'i' { 4.0 } else { 10.0 }
            }
        }

        let geometry = FocusGeometry::measure("lift", &Narrow);
        assert_eq!(geometry.left, 10.0);
        assert_eq!(geometry.width, 4.0);
        assert_eq!(geometry.center(), 12.0);
    }

    // Strictly decreasing error only holds at the step cap, where the
    // discrete system is overdamped.
    #[test]
    fn spring_converges_without_ringing() {
        let mut spring = FocusSpring::default();
        spring.set_target(100.0);

        let mut errors = Vec::new();
        for _ in 0..500 {
            spring.step(MAX_STEP_SECONDS);
            errors.push((spring.position() - 100.0).abs());
        }

        for pair in errors[2..].windows(2) {
            assert!(pair[1] <= pair[0], "{pair:?}");
        }
        let first_close = errors.iter().position(|e| *e < REST_DELTA).unwrap();
        assert!(first_close < 12, "took {first_close} steps");
        assert!(spring.is_settled());
    }

    #[test]
    fn faster_frame_rates_overshoot_slightly() {
        for dt in [1.0 / 120.0, 1.0 / 240.0] {
            let mut spring = FocusSpring::default();
            spring.set_target(100.0);

            let mut overshoot: f64 = 0.0;
            let mut settled_at = None;
            for step in 0..500 {
                spring.step(dt);
                overshoot = overshoot.max(spring.position() - 100.0);
                if settled_at.is_none() && spring.is_settled() {
                    settled_at = Some(step);
                }
            }

            assert!(overshoot < 2.0, "dt={dt} overshoot={overshoot}");
            assert!(settled_at.is_some_and(|step| step < 100), "dt={dt} {settled_at:?}");
            assert!(spring.is_settled());
        }
    }

    #[test]
    fn long_frames_are_capped() {
        let mut capped = FocusSpring::default();
        let mut reference = FocusSpring::default();
        capped.set_target(50.0);
        reference.set_target(50.0);

        capped.step(0.5);
        reference.step(MAX_STEP_SECONDS);
        assert_eq!(capped.motion(), reference.motion());
    }

    #[test]
    fn retarget_keeps_momentum() {
        let mut spring = FocusSpring::default();
        spring.set_target(100.0);
        spring.step(MAX_STEP_SECONDS);
        let before = spring.motion();

        spring.set_target(-40.0);
        assert_eq!(spring.motion(), before);
        assert!(spring.motion().velocity > 0.0);
    }

    #[test]
    fn reduced_motion_snaps() {
        let mut spring = FocusSpring::default();
        spring.set_target(30.0);
        spring.step(MAX_STEP_SECONDS);

        spring.set_reduced_motion(true);
        assert_eq!(
            spring.motion(),
            FocusMotion {
                position: 30.0,
                velocity: 0.0
            }
        );

        spring.set_target(-12.0);
        assert_eq!(spring.position(), -12.0);
        assert_eq!(spring.step(MAX_STEP_SECONDS), -12.0);
    }

    #[test]
    fn invalid_input_is_ignored() {
        let mut spring = FocusSpring::default();
        spring.set_target(20.0);
        spring.set_target(f64::NAN);
        assert_eq!(spring.target(), 20.0);
        assert_eq!(spring.step(f64::INFINITY), 0.0);
        assert_eq!(spring.step(-1.0), 0.0);
    }
}
