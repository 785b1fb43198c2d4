//! Reading engine: scheduler, view synchronizer and focus spring behind a
//! single per-frame entry point.

use heapless::Vec as HeaplessVec;
use log::debug;

use crate::{
    focus::{self, FocusGeometry, FocusSpring, GlyphMeasure},
    pacing::StopWords,
    playback::{Playback, PlaybackEvent, PlaybackState, TickResult},
    settings::{EngineSettings, clamp_pivot},
    tokenizer::{PEEK_WORDS, TokenStream},
    view_sync::{ParagraphBox, ParagraphPosition, ScrollRequest, ViewSync, Viewport, WordBox},
};

/// Read-only snapshot handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame<'a> {
    /// Text of the current token; `None` only for an empty stream.
    pub word: Option<&'a str>,
    pub index: usize,
    pub is_paragraph_break: bool,
    /// Word shown before the last advance, for the trailing ghost.
    pub previous_word: Option<&'a str>,
    /// Character index of the focus character in `word`.
    pub focus_char: usize,
    /// Leading characters drawn with extra weight, `0` when emphasis is off.
    pub emphasis_len: usize,
    /// Current horizontal offset of the word's left edge.
    pub focus_offset: f64,
    pub focus_target: f64,
    pub is_playing: bool,
    pub wpm: u16,
    pub position: Option<ParagraphPosition>,
    /// `0.0` on the first token, `1.0` on the last.
    pub progress: f64,
    pub total_tokens: usize,
}

pub struct Engine<M>
where
    M: GlyphMeasure,
{
    playback: Playback,
    view: ViewSync,
    spring: FocusSpring,
    settings: EngineSettings,
    measure: M,
    display_width: f64,
    focused_index: Option<usize>,
}

impl<M> Engine<M>
where
    M: GlyphMeasure,
{
    pub fn new(
        text: &str,
        settings: EngineSettings,
        stop_words: StopWords,
        measure: M,
        display_width: f64,
    ) -> Self {
        Self::from_stream(
            TokenStream::from_text(text),
            settings,
            stop_words,
            measure,
            display_width,
        )
    }

    pub fn from_stream(
        stream: TokenStream,
        settings: EngineSettings,
        stop_words: StopWords,
        measure: M,
        display_width: f64,
    ) -> Self {
        let settings = settings.sanitized();
        let view = ViewSync::new(&stream);
        let mut playback = Playback::new(
            stream,
            settings.pacing_model(stop_words),
            u32::from(settings.wpm),
            settings.natural_pacing,
        );
        playback.set_milestone_words(settings.milestone_words);

        let mut spring = FocusSpring::default();
        spring.set_reduced_motion(settings.reduced_motion);

        let mut engine = Self {
            playback,
            view,
            spring,
            settings,
            measure,
            display_width: sanitize_width(display_width),
            focused_index: None,
        };
        engine.retarget_focus();
        debug!(
            "engine: init tokens={} paragraphs={} wpm={}",
            engine.playback.stream().len(),
            engine.playback.stream().paragraph_count(),
            engine.settings.wpm
        );
        engine
    }

    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    pub fn stream(&self) -> &TokenStream {
        self.playback.stream()
    }

    pub fn state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn view(&self) -> &ViewSync {
        &self.view
    }

    pub fn spring(&self) -> &FocusSpring {
        &self.spring
    }

    pub fn measure(&self) -> &M {
        &self.measure
    }

    pub fn display_width(&self) -> f64 {
        self.display_width
    }

    pub fn current_index(&self) -> usize {
        self.playback.current_index()
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    /// Paragraph position of an arbitrary global index, clamped into the
    /// stream.
    pub fn locate(&self, global_index: usize) -> Option<ParagraphPosition> {
        self.view.locate(global_index)
    }

    /// Index to persist so a later session can continue here.
    pub fn resume_index(&self) -> usize {
        self.playback.current_index()
    }

    /// Next displayable words after the current token.
    pub fn peek(&self) -> HeaplessVec<&str, PEEK_WORDS> {
        self.playback
            .stream()
            .peek(self.playback.current_index().saturating_add(1))
    }

    pub fn poll_event(&mut self) -> Option<PlaybackEvent> {
        self.playback.poll_event()
    }

    /// Scroll target for the paragraph view, once per index change.
    pub fn follow(&mut self) -> Option<ScrollRequest> {
        self.view.follow(self.playback.current_index())
    }

    fn retarget_focus(&mut self) {
        let index = self.playback.current_index();
        self.focused_index = Some(index);

        let Some(token) = self.playback.current_token() else {
            return;
        };
        // Breaks keep the previous word's alignment.
        if token.is_paragraph_break {
            return;
        }

        let geometry = FocusGeometry::measure(&token.text, &self.measure);
        let target = focus::focus_target(
            self.display_width,
            self.settings.pivot_fraction,
            &geometry,
        );
        self.spring.set_target(target);
    }

    fn sync_focus(&mut self) {
        if self.focused_index != Some(self.playback.current_index()) {
            self.retarget_focus();
        }
    }
}

fn sanitize_width(width: f64) -> f64 {
    if width.is_finite() { width.max(0.0) } else { 0.0 }
}

include!("control.rs");
include!("frame.rs");
