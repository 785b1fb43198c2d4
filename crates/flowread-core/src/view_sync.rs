//! Mapping between global token indices and the scrolling paragraph view.
//!
//! The renderer never exposes its layout engine here; it reports plain
//! vertical boxes for the paragraphs and words it currently shows, and every
//! query is answered from those numbers alone.

use core::ops::Range;

use log::debug;

use crate::tokenizer::TokenStream;

/// Paragraph number plus offset of a token inside that paragraph.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParagraphPosition {
    pub paragraph: usize,
    pub local_offset: usize,
}

impl ParagraphPosition {
    /// Inverse of [`locate`].
    pub fn global_index(&self, paragraph_offsets: &[usize]) -> Option<usize> {
        paragraph_offsets
            .get(self.paragraph)
            .map(|start| start + self.local_offset)
    }
}

/// Finds the last paragraph whose first token is at or before
/// `global_index`. Indices before the first paragraph clamp onto it.
///
/// The offset table does not know the stream length, so indices past the
/// last token land in the last paragraph unclamped; use [`ViewSync::locate`]
/// to clamp against the stream.
pub fn locate(global_index: usize, paragraph_offsets: &[usize]) -> Option<ParagraphPosition> {
    let first = *paragraph_offsets.first()?;
    let index = global_index.max(first);
    let paragraph = paragraph_offsets.partition_point(|&offset| offset <= index) - 1;

    Some(ParagraphPosition {
        paragraph,
        local_offset: index - paragraph_offsets[paragraph],
    })
}

/// Vertical extent of one rendered word.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WordBox {
    pub index: usize,
    pub top: f64,
    pub height: f64,
}

impl WordBox {
    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Vertical extent of one rendered paragraph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParagraphBox {
    pub paragraph: usize,
    pub top: f64,
    pub height: f64,
}

/// Visible window of the scrolling view, in the same coordinates as the
/// boxes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub top: f64,
    pub height: f64,
}

impl Viewport {
    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Share of a box of `height` starting at `top` that lies inside the
    /// viewport, `0.0..=1.0`.
    pub fn visible_fraction(&self, top: f64, height: f64) -> f64 {
        if !top.is_finite() || !height.is_finite() || height <= 0.0 {
            return 0.0;
        }

        let visible_top = top.max(self.top);
        let visible_bottom = (top + height).min(self.top + self.height);
        ((visible_bottom - visible_top) / height).clamp(0.0, 1.0)
    }
}

/// Word whose vertical center is closest to `center_y`; ties go to the lower
/// global index.
pub fn nearest_to_center<'a, I>(words: I, center_y: f64) -> Option<usize>
where
    I: IntoIterator<Item = &'a WordBox>,
{
    let mut best: Option<(f64, usize)> = None;

    for word in words {
        let distance = (word.center_y() - center_y).abs();
        if !distance.is_finite() {
            continue;
        }

        let closer = match best {
            None => true,
            Some((best_distance, best_index)) => {
                distance < best_distance || (distance == best_distance && word.index < best_index)
            }
        };
        if closer {
            best = Some((distance, word.index));
        }
    }

    best.map(|(_, index)| index)
}

/// Where the paragraph view should scroll to follow playback.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScrollRequest {
    pub index: usize,
    pub paragraph: usize,
    pub local_offset: usize,
}

/// Keeps the paragraph view and timed playback pointing at the same token.
#[derive(Clone, Debug, Default)]
pub struct ViewSync {
    paragraph_offsets: Vec<usize>,
    token_count: usize,
    last_active: Option<usize>,
    last_followed: Option<usize>,
}

impl ViewSync {
    pub fn new(stream: &TokenStream) -> Self {
        let mut sync = Self::default();
        sync.rebuild(stream);
        sync
    }

    /// Rebuilds the offset table for a new stream and forgets view history.
    pub fn rebuild(&mut self, stream: &TokenStream) {
        self.paragraph_offsets = stream.paragraph_offsets().to_vec();
        self.token_count = stream.len();
        self.last_active = None;
        self.last_followed = None;
    }

    pub fn paragraph_offsets(&self) -> &[usize] {
        &self.paragraph_offsets
    }

    pub fn last_active(&self) -> Option<usize> {
        self.last_active
    }

    /// [`locate`] with `global_index` clamped into the stream.
    pub fn locate(&self, global_index: usize) -> Option<ParagraphPosition> {
        let last = self.token_count.checked_sub(1)?;
        locate(global_index.min(last), &self.paragraph_offsets)
    }

    fn paragraph_range(&self, paragraph: usize) -> Option<Range<usize>> {
        let start = *self.paragraph_offsets.get(paragraph)?;
        let end = self
            .paragraph_offsets
            .get(paragraph + 1)
            .copied()
            .unwrap_or(self.token_count);
        Some(start..end)
    }

    /// Scroll target for `current_index`, emitted once per index change.
    pub fn follow(&mut self, current_index: usize) -> Option<ScrollRequest> {
        if self.last_followed == Some(current_index) {
            return None;
        }

        let position = self.locate(current_index)?;
        self.last_followed = Some(current_index);
        Some(ScrollRequest {
            index: current_index,
            paragraph: position.paragraph,
            local_offset: position.local_offset,
        })
    }

    /// Paragraph with the largest visible share of the viewport. Ties keep
    /// the most recently active paragraph, then the lower paragraph number.
    pub fn active_paragraph(
        &mut self,
        paragraphs: &[ParagraphBox],
        viewport: Viewport,
    ) -> Option<usize> {
        let mut best: Option<(f64, usize)> = None;

        for candidate in paragraphs {
            let fraction = viewport.visible_fraction(candidate.top, candidate.height);
            if fraction <= 0.0 {
                continue;
            }

            let replace = match best {
                None => true,
                Some((best_fraction, best_paragraph)) => {
                    fraction > best_fraction
                        || (fraction == best_fraction
                            && self.prefer_on_tie(candidate.paragraph, best_paragraph))
                }
            };
            if replace {
                best = Some((fraction, candidate.paragraph));
            }
        }

        let (_, paragraph) = best?;
        if self.last_active != Some(paragraph) {
            debug!("view-sync: active paragraph={paragraph}");
        }
        self.last_active = Some(paragraph);
        Some(paragraph)
    }

    fn prefer_on_tie(&self, candidate: usize, incumbent: usize) -> bool {
        if self.last_active == Some(incumbent) {
            return false;
        }
        self.last_active == Some(candidate) || candidate < incumbent
    }

    /// Token nearest to the viewport center inside the active paragraph,
    /// used to resume timed playback where the reader scrolled to.
    ///
    /// When no paragraph is visible, the paragraph holding `current_index`
    /// is searched instead.
    pub fn anchor(
        &mut self,
        paragraphs: &[ParagraphBox],
        words: &[WordBox],
        viewport: Viewport,
        current_index: usize,
    ) -> Option<usize> {
        let paragraph = match self.active_paragraph(paragraphs, viewport) {
            Some(paragraph) => paragraph,
            None => self.locate(current_index)?.paragraph,
        };
        let range = self.paragraph_range(paragraph)?;

        let anchor = nearest_to_center(
            words.iter().filter(|word| range.contains(&word.index)),
            viewport.center_y(),
        );
        debug!("view-sync: anchor paragraph={paragraph} index={anchor:?}");
        anchor
    }
}
