//! Plain text to display-ready token stream.

use core::ops::Range;

use heapless::Vec as HeaplessVec;

/// Text carried by paragraph-break tokens.
pub const PARAGRAPH_BREAK_TEXT: &str = "\n";
/// Upper bound of words returned by [`TokenStream::peek`].
pub const PEEK_WORDS: usize = 6;

const PUNCTUATION_MARKS: [char; 6] = ['.', ',', ':', ';', '!', '?'];
const PAGE_NUMBER_MAX_CHARS: usize = 4;
const ROMAN_NUMERAL_CHARS: &str = "ivxlcdmIVXLCDM";

/// One unit of the stream: a word with its attached punctuation, or a
/// paragraph-break marker.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    pub text: String,
    pub index: usize,
    pub is_paragraph_break: bool,
    pub has_punctuation: bool,
}

impl Token {
    fn word(text: &str, index: usize) -> Self {
        Self {
            text: text.to_owned(),
            index,
            is_paragraph_break: false,
            has_punctuation: text.ends_with(PUNCTUATION_MARKS),
        }
    }

    fn paragraph_break(index: usize) -> Self {
        Self {
            text: PARAGRAPH_BREAK_TEXT.to_owned(),
            index,
            is_paragraph_break: true,
            has_punctuation: false,
        }
    }
}

/// Rewrites typographic characters to ASCII, unifies line endings, collapses
/// blank-line runs to a single blank line and drops page-number lines.
///
/// Applying it twice yields the same text as applying it once.
pub fn normalize(text: &str) -> String {
    let mut replaced = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => replaced.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' => replaced.push('"'),
            '\u{2013}' | '\u{2014}' => replaced.push('-'),
            '\u{00A0}' => replaced.push(' '),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                replaced.push('\n');
            }
            other => replaced.push(other),
        }
    }

    let mut out = String::with_capacity(replaced.len());
    let mut pending_blank = false;

    for line in replaced.split('\n') {
        if line.trim().is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }
        if is_page_number_line(line) {
            continue;
        }

        if !out.is_empty() {
            out.push('\n');
            if pending_blank {
                out.push('\n');
            }
        }
        pending_blank = false;
        out.push_str(line);
    }

    out
}

fn is_page_number_line(line: &str) -> bool {
    let trimmed = line.trim();
    let count = trimmed.chars().count();
    if count == 0 || count > PAGE_NUMBER_MAX_CHARS {
        return false;
    }

    trimmed.chars().all(|c| c.is_ascii_digit())
        || trimmed.chars().all(|c| ROMAN_NUMERAL_CHARS.contains(c))
}

/// Tokenizes the whole text.
pub fn tokenize(text: &str) -> Vec<Token> {
    tokenize_limited(text, usize::MAX)
}

/// Tokenizes until `max_tokens` tokens have been emitted.
///
/// A paragraph's break token is only included when it is reached before the
/// limit.
pub fn tokenize_limited(text: &str, max_tokens: usize) -> Vec<Token> {
    let mut tokens = Vec::new();
    if max_tokens == 0 {
        return tokens;
    }

    let normalized = normalize(text);
    for paragraph in normalized.split("\n\n") {
        let mut words = paragraph.split_whitespace().peekable();
        if words.peek().is_none() {
            continue;
        }

        for word in words {
            tokens.push(Token::word(word, tokens.len()));
            if tokens.len() >= max_tokens {
                return tokens;
            }
        }

        tokens.push(Token::paragraph_break(tokens.len()));
        if tokens.len() >= max_tokens {
            return tokens;
        }
    }

    tokens
}

/// Tokens of one text together with its paragraph offset table.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
    paragraph_offsets: Vec<usize>,
}

impl TokenStream {
    pub fn from_text(text: &str) -> Self {
        Self::from_text_limited(text, usize::MAX)
    }

    pub fn from_text_limited(text: &str, max_tokens: usize) -> Self {
        let tokens = tokenize_limited(text, max_tokens);
        let paragraph_offsets = paragraph_offsets(&tokens);
        Self {
            tokens,
            paragraph_offsets,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.tokens.len().checked_sub(1)
    }

    /// Global index of the first token of every paragraph, ascending.
    pub fn paragraph_offsets(&self) -> &[usize] {
        &self.paragraph_offsets
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraph_offsets.len()
    }

    /// Global token range covered by `paragraph`, break token included.
    pub fn paragraph_range(&self, paragraph: usize) -> Option<Range<usize>> {
        let start = *self.paragraph_offsets.get(paragraph)?;
        let end = self
            .paragraph_offsets
            .get(paragraph + 1)
            .copied()
            .unwrap_or(self.tokens.len());
        Some(start..end)
    }

    /// Number of displayable words, paragraph breaks excluded.
    pub fn word_count(&self) -> usize {
        self.tokens.iter().filter(|t| !t.is_paragraph_break).count()
    }

    /// Next displayable words from `start`, for a quick look-ahead without
    /// moving playback.
    pub fn peek(&self, start: usize) -> HeaplessVec<&str, PEEK_WORDS> {
        let mut words = HeaplessVec::new();
        for token in self.tokens.iter().skip(start) {
            if token.is_paragraph_break {
                continue;
            }
            if words.push(token.text.as_str()).is_err() {
                break;
            }
        }
        words
    }
}

fn paragraph_offsets(tokens: &[Token]) -> Vec<usize> {
    let mut offsets = Vec::new();
    if tokens.is_empty() {
        return offsets;
    }

    offsets.push(0);
    for token in tokens {
        let next = token.index + 1;
        if token.is_paragraph_break && next < tokens.len() {
            offsets.push(next);
        }
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn splits_words_and_flags_punctuation() {
        let tokens = tokenize("one two. three");
        assert_eq!(tokens.len(), 4);
        assert_eq!(texts(&tokens), ["one", "two.", "three", "\n"]);
        assert!(!tokens[0].has_punctuation);
        assert!(tokens[1].has_punctuation);
        assert!(!tokens[2].has_punctuation);
        assert!(tokens[3].is_paragraph_break);
        assert!(!tokens[3].has_punctuation);
    }

    #[test]
    fn indices_are_dense() {
        let tokens = tokenize("a b\n\n\n\nc, d;\n\ne");
        for (expected, token) in tokens.iter().enumerate() {
            assert_eq!(token.index, expected);
        }
        assert_eq!(texts(&tokens), ["a", "b", "\n", "c,", "d;", "\n", "e", "\n"]);
    }

    #[test]
    fn same_input_same_stream() {
        let text = "Call me Ishmael.\n\nSome years ago, never mind how long";
        assert_eq!(tokenize(text), tokenize(text));
        assert_eq!(tokenize_limited(text, 5), tokenize_limited(text, 5));
    }

    #[test]
    fn typographic_characters_become_ascii() {
        let normalized = normalize("\u{201C}It\u{2019}s\u{201D}\u{00A0}fine \u{2014} ok");
        assert_eq!(normalized, "\"It's\" fine - ok");
    }

    #[test]
    fn crlf_and_long_gaps_are_collapsed() {
        assert_eq!(normalize("a\r\nb\r\r\n\r\n\r\nz"), "a\nb\n\nz");
    }

    #[test]
    fn page_number_lines_are_dropped() {
        let normalized = normalize("end of page\n 42 \nxiv\nnext page\n\n12345\n\nMMMM");
        assert_eq!(normalized, "end of page\nnext page\n\n12345");
    }

    #[test]
    fn lone_roman_numeral_lines_are_dropped() {
        assert_eq!(
            normalize("chapter one\nI\nmix\nit begins"),
            "chapter one\nit begins"
        );
        assert!(tokenize("I\n\nmix").is_empty());
        assert_eq!(texts(&tokenize("Mixed")), ["Mixed", "\n"]);
    }

    #[test]
    fn normalize_is_idempotent() {
        let text = "  lead\r\n\r\n\r\n7\n\u{2018}q\u{2019}\n\n\n\ntail  \n\n";
        let once = normalize(text);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn truncation_keeps_break_only_when_reached() {
        let text = "a b\n\nc d";
        assert_eq!(texts(&tokenize_limited(text, 2)), ["a", "b"]);
        assert_eq!(texts(&tokenize_limited(text, 3)), ["a", "b", "\n"]);
        assert_eq!(texts(&tokenize_limited(text, 4)), ["a", "b", "\n", "c"]);
        assert!(tokenize_limited(text, 0).is_empty());
    }

    #[test]
    fn blank_text_has_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \n\n \r\n 3 \n").is_empty());
    }

    #[test]
    fn stream_tracks_paragraph_offsets() {
        let stream = TokenStream::from_text("a b\n\nz\n\nd e f");
        assert_eq!(stream.paragraph_offsets(), &[0, 3, 5]);
        assert_eq!(stream.paragraph_count(), 3);
        assert_eq!(stream.paragraph_range(1), Some(3..5));
        assert_eq!(stream.paragraph_range(2), Some(5..9));
        assert_eq!(stream.paragraph_range(3), None);
        assert_eq!(stream.word_count(), 6);
        assert_eq!(stream.last_index(), Some(8));
    }

    #[test]
    fn truncated_stream_keeps_partial_paragraph() {
        let stream = TokenStream::from_text_limited("a b\n\nc d", 4);
        assert_eq!(stream.paragraph_offsets(), &[0, 3]);
        assert_eq!(stream.paragraph_range(1), Some(3..4));
    }

    #[test]
    fn peek_skips_breaks_and_caps_length() {
        let stream = TokenStream::from_text("one two\n\nthree four five six seven eight");
        let peek = stream.peek(1);
        assert_eq!(peek.as_slice(), ["two", "three", "four", "five", "six", "seven"]);
        assert!(stream.peek(100).is_empty());
    }
}
