use std::io::{self, Write};

use flowread_core::engine::Frame;

const CLEAR_LINE: &str = "\x1b[2K";
const EMPHASIS_ON: &str = "\x1b[1m";
const FOCUS_ON: &str = "\x1b[1;31m";
const STYLE_OFF: &str = "\x1b[0m";

/// Single terminal line redrawn in place whenever the word or its column
/// changes.
pub(super) struct WordLine<W>
where
    W: Write,
{
    out: W,
    width: usize,
    drawn: Option<(usize, usize)>,
}

impl<W> WordLine<W>
where
    W: Write,
{
    pub(super) fn new(out: W, width: usize) -> Self {
        Self {
            out,
            width,
            drawn: None,
        }
    }

    pub(super) fn render(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let column = column_for(frame.focus_offset, self.width);
        let key = (frame.index, column);
        if self.drawn == Some(key) {
            return Ok(());
        }
        self.drawn = Some(key);

        write!(self.out, "\r{CLEAR_LINE}")?;
        if let Some(word) = frame.word.filter(|_| !frame.is_paragraph_break) {
            let parts = WordParts::split(word, frame.emphasis_len, frame.focus_char);
            write!(
                self.out,
                "{:column$}{EMPHASIS_ON}{}{STYLE_OFF}{}{FOCUS_ON}{}{STYLE_OFF}{}",
                "", parts.lead_emphasis, parts.lead, parts.focus, parts.tail
            )?;
        }
        self.out.flush()
    }

    pub(super) fn finish(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        self.out.flush()
    }
}

fn column_for(offset: f64, width: usize) -> usize {
    if !offset.is_finite() || offset <= 0.0 {
        return 0;
    }
    (offset.round() as usize).min(width)
}

/// Word cut around its focus character. The emphasised lead never reaches
/// past the focus character.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct WordParts<'a> {
    lead_emphasis: &'a str,
    lead: &'a str,
    focus: &'a str,
    tail: &'a str,
}

impl<'a> WordParts<'a> {
    fn split(word: &'a str, emphasis_len: usize, focus_char: usize) -> Self {
        let byte_at = |chars: usize| {
            word.char_indices()
                .nth(chars)
                .map_or(word.len(), |(byte, _)| byte)
        };

        let focus_start = byte_at(focus_char);
        let focus_end = byte_at(focus_char + 1);
        let emphasis_end = byte_at(emphasis_len.min(focus_char));

        Self {
            lead_emphasis: &word[..emphasis_end],
            lead: &word[emphasis_end..focus_start],
            focus: &word[focus_start..focus_end],
            tail: &word[focus_end..],
        }
    }
}
