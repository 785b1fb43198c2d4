impl<M> Engine<M>
where
    M: GlyphMeasure,
{
    /// Advances playback by `dt_ms` and steps the focus spring once.
    pub fn tick(&mut self, dt_ms: f64) -> TickResult {
        let result = self.playback.tick(dt_ms);
        self.sync_focus();
        self.spring.step(dt_ms / 1_000.0);
        result
    }

    pub fn with_frame<'a, R, F>(&'a self, f: F) -> R
    where
        F: FnOnce(Frame<'a>) -> R,
    {
        let index = self.playback.current_index();
        let token = self.playback.current_token();
        let word = token.map(|token| token.text.as_str());
        let previous_word = self
            .playback
            .previous_token()
            .filter(|token| !token.is_paragraph_break)
            .map(|token| token.text.as_str());

        let total_tokens = self.playback.stream().len();
        let progress = match self.playback.stream().last_index() {
            Some(0) => 1.0,
            Some(last) => index as f64 / last as f64,
            None => 0.0,
        };

        let (focus_char, emphasis_len) = match token {
            Some(token) if !token.is_paragraph_break => (
                focus::focus_char_index(&token.text),
                if self.settings.bionic_emphasis {
                    focus::emphasis_len(&token.text)
                } else {
                    0
                },
            ),
            _ => (0, 0),
        };

        f(Frame {
            word,
            index,
            is_paragraph_break: token.is_some_and(|token| token.is_paragraph_break),
            previous_word,
            focus_char,
            emphasis_len,
            focus_offset: self.spring.position(),
            focus_target: self.spring.target(),
            is_playing: self.playback.is_playing(),
            wpm: self.playback.wpm(),
            position: self.view.locate(index),
            progress,
            total_tokens,
        })
    }
}
