//! Pairwise Highlight Library
//!
//! Quote highlighting for side-by-side review of two candidate answers.
//! Analysis quotes are located verbatim in each answer, colored per criterion,
//! and rendered as ordered plain/highlighted segments.
//!
//! # Example
//!
//! ```
//! use pairwise_highlight::prelude::*;
//!
//! let answer = "She said \"hello world\" to me";
//! let quotes = vec![Quote::new("\"hello world\"").with_comment("greeting")];
//!
//! let highlights = generate_highlights(&quotes, answer, "Tone", ColorPolicy::Keyed);
//! assert_eq!(highlights[0].range(), 10..21);
//!
//! let segments = render_segments(answer, &highlights, OverlapPolicy::Passthrough);
//! assert_eq!(segments.len(), 3);
//! assert_eq!(segments[1].text(answer), "hello world");
//! ```
//!
//! # Task File Example
//!
//! ```no_run
//! use pairwise_highlight::prelude::*;
//!
//! let storage = TaskStorage::open("data/tasks");
//! let task = storage.read_task_at("tasks", 0).unwrap();
//!
//! let mut session = ReviewSession::new(task, HighlightParams::default());
//! session.select_helper("criteria_quotes");
//! for group in session.groups() {
//!     session.select_group(&group);
//!     println!("{}: {} highlights in A", group, session.highlights(Side::A).len());
//! }
//! ```

pub mod color;
pub mod helpers;
pub mod highlight;
pub mod locate;
pub mod models;
pub mod offsets;
pub mod output;
pub mod render;
pub mod session;
pub mod storage;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::color::{color_for, color_for_index, string_hash, ColorPolicy, Hsla};
    pub use crate::helpers::{
        criterion_short_name, helper_tab, parse_comparison_points, parse_quotes, CompareItem,
        CriteriaQuotes, HelperContent, HelperKind, SideQuotes, Summary, HELPER_TABS,
    };
    pub use crate::highlight::{
        criteria_quotes, generate_highlights, group_quotes, highlight_group, highlight_task,
        highlight_tasks, highlights_for_group,
    };
    pub use crate::locate::{locate_quote, strip_quote_marks, QuoteMatch};
    pub use crate::models::{
        GroupHighlights, Highlight, HighlightParams, HighlightReport, OverlapPolicy, Quote,
        RankingTask, Segment, SegmentKind, Side, SideHighlights, TaskHighlights,
    };
    pub use crate::offsets::{utf16_offset, OffsetMap};
    pub use crate::output::{
        escape_html, format_marked_text, format_quote_match, format_task_highlights,
        generate_viewer_html, print_summary, render_segments_html, write_csv, write_csv_file,
        write_json, write_json_file, write_viewer_html_file, OutputError,
    };
    pub use crate::render::{render_segments, segments_text};
    pub use crate::session::{ReviewSession, TaskInspector};
    pub use crate::storage::{StorageConfig, StorageError, TaskStorage};
}

// Re-export commonly used types at the crate root
pub use models::{Highlight, HighlightParams, OverlapPolicy, Quote, Segment, SegmentKind, Side};
