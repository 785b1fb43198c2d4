impl Playback {
    /// Starts advancing from the current token with a fresh accumulator.
    ///
    /// Returns `false` when there is nothing to play.
    pub fn play(&mut self) -> bool {
        if self.stream.is_empty() {
            debug!("playback: play ignored, empty stream");
            return false;
        }
        if self.playing {
            return true;
        }

        self.playing = true;
        self.elapsed_ms = 0.0;
        self.refresh_target();
        debug!(
            "playback: play index={}/{} wpm={} target_ms={}",
            self.current_index,
            self.stream.len(),
            self.wpm,
            self.target_ms
        );
        true
    }

    /// Stops advancing and discards the time accumulated for the current
    /// token.
    pub fn pause(&mut self) {
        if !self.playing {
            return;
        }

        self.playing = false;
        self.elapsed_ms = 0.0;
        debug!("playback: pause index={}", self.current_index);
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Moves to `index`, clamped into the stream. The running state is left
    /// untouched and the new token starts with a fresh delay.
    pub fn seek(&mut self, index: usize) {
        let Some(last) = self.stream.last_index() else {
            return;
        };

        self.current_index = index.min(last);
        self.previous_index = None;
        self.elapsed_ms = 0.0;
        self.refresh_target();
        debug!(
            "playback: seek index={}/{} requested={}",
            self.current_index,
            self.stream.len(),
            index
        );
    }

    pub fn reset(&mut self) {
        self.playing = false;
        self.current_index = 0;
        self.previous_index = None;
        self.elapsed_ms = 0.0;
        self.words_read = 0;
        self.refresh_target();
        debug!("playback: reset tokens={}", self.stream.len());
    }

    /// Replaces the stream and resets playback, running or not.
    pub fn load_stream(&mut self, stream: TokenStream) {
        self.stream = stream;
        debug!(
            "playback: stream loaded tokens={} paragraphs={}",
            self.stream.len(),
            self.stream.paragraph_count()
        );
        self.reset();
    }

    pub fn load_text(&mut self, text: &str) {
        self.load_stream(TokenStream::from_text(text));
    }

    /// Sets the speed used from the next advance on; the delay of the token
    /// already on screen is kept.
    pub fn set_wpm(&mut self, wpm: u32) -> u16 {
        self.wpm = clamp_wpm(wpm);
        self.wpm
    }

    pub fn set_natural_pacing(&mut self, enabled: bool) {
        self.natural_pacing = enabled;
    }

    pub fn set_pacing(&mut self, pacing: PacingModel) {
        self.pacing = pacing;
    }

    pub fn set_milestone_words(&mut self, words: u32) {
        self.milestone_words = words;
    }
}
