//! Real-time playback scheduler for a token stream.
//!
//! The scheduler owns the stream and the playback position. The host feeds
//! it frame deltas through [`Playback::tick`]; while running, an accumulator
//! collects elapsed time and the stream advances one token once the current
//! token's delay has been reached. The accumulator is reset, not decremented,
//! on every advance, so a long frame costs at most one partial frame per word
//! and is never repaid by shortening the next word.

use heapless::Deque;
use log::debug;

use crate::{
    pacing::{PacingModel, clamp_wpm},
    tokenizer::{Token, TokenStream},
};

/// Capacity of the pending notification queue; the oldest entry is dropped
/// when it overflows.
pub const EVENT_QUEUE_LEN: usize = 16;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickResult {
    /// Not running.
    Idle,
    /// Running, current token still on screen.
    Holding,
    /// Moved to the next token.
    Advanced,
    /// Delay of the final token elapsed and playback stopped.
    Finished,
}

/// Notifications the host drains with [`Playback::poll_event`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlaybackEvent {
    WordsRead { total: u32 },
    Finished { index: usize },
}

/// Read-only snapshot of the playback position.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PlaybackState {
    pub current_index: usize,
    /// Index shown before the last advance; cleared by seeks and resets.
    pub previous_index: Option<usize>,
    pub is_playing: bool,
    pub wpm: u16,
}

pub struct Playback {
    stream: TokenStream,
    pacing: PacingModel,
    current_index: usize,
    previous_index: Option<usize>,
    playing: bool,
    wpm: u16,
    natural_pacing: bool,
    elapsed_ms: f64,
    target_ms: u32,
    words_read: u32,
    milestone_words: u32,
    events: Deque<PlaybackEvent, EVENT_QUEUE_LEN>,
}

impl Playback {
    pub fn new(stream: TokenStream, pacing: PacingModel, wpm: u32, natural_pacing: bool) -> Self {
        let mut playback = Self {
            stream,
            pacing,
            current_index: 0,
            previous_index: None,
            playing: false,
            wpm: clamp_wpm(wpm),
            natural_pacing,
            elapsed_ms: 0.0,
            target_ms: 0,
            words_read: 0,
            milestone_words: 0,
            events: Deque::new(),
        };
        playback.refresh_target();
        playback
    }

    pub fn stream(&self) -> &TokenStream {
        &self.stream
    }

    pub fn tokens(&self) -> &[Token] {
        self.stream.tokens()
    }

    pub fn pacing(&self) -> &PacingModel {
        &self.pacing
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            current_index: self.current_index,
            previous_index: self.previous_index,
            is_playing: self.playing,
            wpm: self.wpm,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn previous_index(&self) -> Option<usize> {
        self.previous_index
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn wpm(&self) -> u16 {
        self.wpm
    }

    pub fn natural_pacing(&self) -> bool {
        self.natural_pacing
    }

    pub fn current_token(&self) -> Option<&Token> {
        self.stream.get(self.current_index)
    }

    pub fn previous_token(&self) -> Option<&Token> {
        self.previous_index.and_then(|index| self.stream.get(index))
    }

    /// Delay the current token is being held for.
    pub fn target_delay_ms(&self) -> u32 {
        self.target_ms
    }

    /// Time accumulated toward [`Self::target_delay_ms`].
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Words displayed by advances since the last reset.
    pub fn words_read(&self) -> u32 {
        self.words_read
    }

    pub fn poll_event(&mut self) -> Option<PlaybackEvent> {
        self.events.pop_front()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}

include!("transport.rs");
include!("clock.rs");
