//! Turn a set of highlights into an ordered list of display segments.
//!
//! Highlights are sorted by start offset (stable, so equal starts keep their
//! input order) and walked left to right with a cursor. Plain segments fill
//! the gaps between highlights and the tail after the last one.

use crate::models::{Highlight, OverlapPolicy, Segment};
use tracing::debug;

/// Render `text` with `highlights` into segments covering the whole text.
///
/// With [`OverlapPolicy::Passthrough`] overlapping highlights are emitted
/// unchanged and the cursor jumps to each highlight's end, so overlapping
/// input can repeat characters across segments. With [`OverlapPolicy::Clip`]
/// the output is a strict partition of the text.
///
/// Highlights whose range cannot be sliced out of `text` are dropped.
pub fn render_segments(text: &str, highlights: &[Highlight], policy: OverlapPolicy) -> Vec<Segment> {
    let len = text.len();

    let mut sorted: Vec<&Highlight> = highlights
        .iter()
        .filter(|h| {
            let valid = h.is_valid_for(text);
            if !valid {
                debug!(start = h.start, end = h.end, len, "dropping out-of-range highlight");
            }
            valid
        })
        .collect();

    if sorted.is_empty() {
        return vec![Segment::plain(0, len)];
    }

    sorted.sort_by_key(|h| h.start);

    let mut segments = Vec::with_capacity(sorted.len() * 2 + 1);
    let mut last_index = 0;

    for highlight in sorted {
        let start = match policy {
            OverlapPolicy::Passthrough => highlight.start,
            OverlapPolicy::Clip => {
                let start = highlight.start.max(last_index);
                if highlight.end <= start {
                    continue;
                }
                start
            }
        };

        if start > last_index {
            segments.push(Segment::plain(last_index, start));
        }

        segments.push(Segment::highlighted(start, highlight.end, highlight));
        last_index = highlight.end;
    }

    if last_index < len {
        segments.push(Segment::plain(last_index, len));
    }

    segments
}

/// Concatenate the text of every segment, in order.
pub fn segments_text(text: &str, segments: &[Segment]) -> String {
    segments.iter().map(|s| s.text(text)).collect()
}
