impl Playback {
    /// Feeds `dt_ms` of real time into the scheduler. At most one token is
    /// advanced per call.
    pub fn tick(&mut self, dt_ms: f64) -> TickResult {
        if !self.playing {
            return TickResult::Idle;
        }

        if dt_ms.is_finite() && dt_ms > 0.0 {
            self.elapsed_ms += dt_ms;
        }
        if self.elapsed_ms < f64::from(self.target_ms) {
            return TickResult::Holding;
        }
        self.elapsed_ms = 0.0;

        let Some(last) = self.stream.last_index() else {
            self.playing = false;
            return TickResult::Idle;
        };

        if self.current_index >= last {
            self.playing = false;
            debug!("playback: end of stream index={}", self.current_index);
            self.push_event(PlaybackEvent::Finished {
                index: self.current_index,
            });
            return TickResult::Finished;
        }

        self.previous_index = Some(self.current_index);
        self.current_index += 1;
        self.refresh_target();
        self.record_word();
        TickResult::Advanced
    }

    fn refresh_target(&mut self) {
        self.target_ms = self.pacing.delay_ms(
            self.stream.tokens(),
            self.current_index,
            self.wpm,
            self.natural_pacing,
        );
    }

    fn record_word(&mut self) {
        let is_word = self
            .stream
            .get(self.current_index)
            .is_some_and(|token| !token.is_paragraph_break);
        if !is_word {
            return;
        }

        self.words_read = self.words_read.saturating_add(1);
        if self.milestone_words > 0 && self.words_read % self.milestone_words == 0 {
            debug!("playback: milestone words_read={}", self.words_read);
            self.push_event(PlaybackEvent::WordsRead {
                total: self.words_read,
            });
        }
    }

    fn push_event(&mut self, event: PlaybackEvent) {
        if self.events.is_full() {
            let _ = self.events.pop_front();
        }
        let _ = self.events.push_back(event);
    }
}
