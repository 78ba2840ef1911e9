//! Data structures shared by the locator, renderer and review session.

use crate::color::{ColorPolicy, Hsla};
use crate::offsets::OffsetMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

/// A snippet asserted to appear verbatim (modulo surrounding quote marks) in an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub quote: String,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Quote {
    pub fn new(quote: impl Into<String>) -> Self {
        Self {
            quote: quote.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// A resolved, renderable span of an answer.
///
/// `start` and `end` are byte offsets into the answer text and always fall on
/// `char` boundaries when produced by [`crate::highlight::generate_highlights`].
/// Report types carry copies converted with [`Highlight::to_utf16`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub color: Hsla,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

impl Highlight {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Check that the range can be sliced out of `text` without panicking.
    pub fn is_valid_for(&self, text: &str) -> bool {
        self.start <= self.end
            && self.end <= text.len()
            && text.is_char_boundary(self.start)
            && text.is_char_boundary(self.end)
    }

    /// Copy with offsets in UTF-16 code units. `None` if the range is not valid for the mapped text.
    pub fn to_utf16(&self, map: &OffsetMap) -> Option<Highlight> {
        let range = map.range_to_utf16(self.range())?;
        Some(Highlight {
            start: range.start,
            end: range.end,
            ..self.clone()
        })
    }
}

/// Styling carried by a rendered segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentKind {
    Plain,
    Highlighted {
        color: Hsla,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tooltip: Option<String>,
    },
}

/// A contiguous run of the source text produced by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    #[serde(flatten)]
    pub kind: SegmentKind,
}

impl Segment {
    pub fn plain(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            kind: SegmentKind::Plain,
        }
    }

    pub fn highlighted(start: usize, end: usize, highlight: &Highlight) -> Self {
        Self {
            start,
            end,
            kind: SegmentKind::Highlighted {
                color: highlight.color,
                tooltip: highlight.tooltip.clone(),
            },
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn is_highlighted(&self) -> bool {
        matches!(self.kind, SegmentKind::Highlighted { .. })
    }

    /// Slice this segment out of the text it was rendered from.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    fn with_range(&self, range: Range<usize>) -> Segment {
        Segment {
            start: range.start,
            end: range.end,
            kind: self.kind.clone(),
        }
    }

    pub fn to_utf16(&self, map: &OffsetMap) -> Option<Segment> {
        map.range_to_utf16(self.range()).map(|r| self.with_range(r))
    }

    pub fn to_bytes(&self, map: &OffsetMap) -> Option<Segment> {
        map.range_to_bytes(self.range()).map(|r| self.with_range(r))
    }
}

/// Which of the two compared answers a quote list belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    /// Key used for this side inside a `criteria_quotes` payload.
    pub fn label(self) -> &'static str {
        match self {
            Side::A => "Text A",
            Side::B => "Text B",
        }
    }

    /// Position of this side's answer in [`RankingTask::answers`].
    pub fn answer_index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

/// One prompt with the candidate answers under review and any helper output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingTask {
    pub prompt: String,
    pub answers: Vec<String>,
    pub criteria: Vec<String>,
    #[serde(default)]
    pub helpers: BTreeMap<String, serde_json::Value>,
}

impl RankingTask {
    /// The answer shown on `side`, or an empty string if the task has fewer answers.
    pub fn answer(&self, side: Side) -> &str {
        self.answers
            .get(side.answer_index())
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// How the renderer treats highlights that overlap an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Emit every highlight as-is; overlapping inputs repeat characters.
    #[default]
    Passthrough,
    /// Trim each highlight to start at the cursor and drop fully covered ones.
    Clip,
}

/// Highlighting parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighlightParams {
    pub color_policy: ColorPolicy,
    pub overlap_policy: OverlapPolicy,
}

// ============================================================================
// Batch output types
// ============================================================================

/// Highlights and rendered segments for one answer under one group.
///
/// Offsets here are UTF-16 code units, the unit a browser slices strings in.
/// Use [`SideHighlights::byte_segments`] to slice the answer in Rust.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideHighlights {
    pub side: Side,
    pub label: String,
    pub quote_count: usize,
    pub highlights: Vec<Highlight>,
    pub segments: Vec<Segment>,
}

impl SideHighlights {
    /// Number of quotes that could not be located in the answer.
    pub fn unmatched(&self) -> usize {
        self.quote_count.saturating_sub(self.highlights.len())
    }

    /// Segments converted back to byte offsets into `text`.
    pub fn byte_segments(&self, text: &str) -> Vec<Segment> {
        let map = OffsetMap::new(text);
        self.segments
            .iter()
            .filter_map(|s| s.to_bytes(&map))
            .collect()
    }
}

/// Both sides' highlights for a single group (criterion).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupHighlights {
    pub group: String,
    pub sides: Vec<SideHighlights>,
}

/// All groups for one task, plus the texts the ranges refer to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskHighlights {
    pub index: usize,
    pub prompt: String,
    pub answers: Vec<String>,
    pub groups: Vec<GroupHighlights>,
}

impl TaskHighlights {
    pub fn group(&self, name: &str) -> Option<&GroupHighlights> {
        self.groups.iter().find(|g| g.group == name)
    }
}

/// Highlight report for every task in a task file.
#[derive(Debug, Serialize, Deserialize)]
pub struct HighlightReport {
    pub version: String,
    pub task_name: String,
    pub parameters: HighlightParams,
    pub tasks: Vec<TaskHighlights>,
}

impl HighlightReport {
    /// Keep only the group named `group` in every task.
    pub fn retain_group(&mut self, group: &str) {
        for task in &mut self.tasks {
            task.groups.retain(|g| g.group == group);
        }
    }
}
