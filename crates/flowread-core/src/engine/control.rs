impl<M> Engine<M>
where
    M: GlyphMeasure,
{
    pub fn play(&mut self) -> bool {
        self.playback.play()
    }

    pub fn pause(&mut self) {
        self.playback.pause();
    }

    pub fn toggle(&mut self) {
        self.playback.toggle();
    }

    pub fn seek(&mut self, index: usize) {
        self.playback.seek(index);
        self.sync_focus();
    }

    pub fn reset(&mut self) {
        self.playback.reset();
        self.sync_focus();
    }

    /// Same as [`Self::seek`]; the index normally comes from
    /// [`Self::resume_index`] of an earlier session.
    pub fn resume_from(&mut self, index: usize) {
        debug!("engine: resume index={index}");
        self.seek(index);
    }

    /// Seeks to the word nearest the viewport center of the active paragraph.
    /// The running state is kept. Returns the new index, or `None` when no
    /// word could be anchored and playback was left alone.
    pub fn resume_from_view(
        &mut self,
        paragraphs: &[ParagraphBox],
        words: &[WordBox],
        viewport: Viewport,
    ) -> Option<usize> {
        let anchor = self.view.anchor(
            paragraphs,
            words,
            viewport,
            self.playback.current_index(),
        )?;
        self.seek(anchor);
        Some(self.playback.current_index())
    }

    /// Replaces the text. Playback stops at index 0 and view history is
    /// dropped.
    pub fn load_text(&mut self, text: &str) {
        self.load_stream(TokenStream::from_text(text));
    }

    pub fn load_stream(&mut self, stream: TokenStream) {
        self.view.rebuild(&stream);
        self.playback.load_stream(stream);
        self.retarget_focus();
        debug!("engine: text loaded tokens={}", self.playback.stream().len());
    }

    pub fn set_wpm(&mut self, wpm: u32) -> u16 {
        self.settings.wpm = self.playback.set_wpm(wpm);
        self.settings.wpm
    }

    pub fn set_natural_pacing(&mut self, enabled: bool) {
        self.settings.natural_pacing = enabled;
        self.playback.set_natural_pacing(enabled);
    }

    pub fn set_pivot_fraction(&mut self, fraction: f64) -> f64 {
        self.settings.pivot_fraction = clamp_pivot(fraction);
        self.retarget_focus();
        self.settings.pivot_fraction
    }

    pub fn set_display_width(&mut self, width: f64) {
        self.display_width = sanitize_width(width);
        self.retarget_focus();
    }

    pub fn set_bionic_emphasis(&mut self, enabled: bool) {
        self.settings.bionic_emphasis = enabled;
    }

    pub fn set_reduced_motion(&mut self, enabled: bool) {
        self.settings.reduced_motion = enabled;
        self.spring.set_reduced_motion(enabled);
    }

    /// Applies every field of `settings`; stop words are kept.
    pub fn apply_settings(&mut self, settings: EngineSettings) {
        let settings = settings.sanitized();
        let mut pacing = self.playback.pacing().clone();
        pacing.punctuation_pauses = settings.punctuation_pauses;
        pacing.long_word_cooldown = settings.long_word_cooldown;

        self.playback.set_pacing(pacing);
        self.playback.set_wpm(u32::from(settings.wpm));
        self.playback.set_natural_pacing(settings.natural_pacing);
        self.playback.set_milestone_words(settings.milestone_words);
        self.spring.set_reduced_motion(settings.reduced_motion);

        let pivot_changed = settings.pivot_fraction != self.settings.pivot_fraction;
        self.settings = settings;
        if pivot_changed {
            self.retarget_focus();
        }
        debug!(
            "engine: settings wpm={} natural={} pivot={}",
            settings.wpm, settings.natural_pacing, settings.pivot_fraction
        );
    }

    pub fn set_stop_words(&mut self, stop_words: StopWords) {
        let mut pacing = self.playback.pacing().clone();
        pacing.stop_words = stop_words;
        self.playback.set_pacing(pacing);
    }
}
