//! Resolve analysis quotes into highlights for each answer.

use crate::color::ColorPolicy;
use crate::helpers::{CriteriaQuotes, HelperContent, CRITERIA_QUOTES};
use crate::locate::locate_quote;
use crate::models::{
    GroupHighlights, Highlight, HighlightParams, Quote, RankingTask, Side, SideHighlights,
    TaskHighlights,
};
use crate::offsets::OffsetMap;
use crate::render::render_segments;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::debug;

/// Locate each quote in `text` and build a highlight for every one that is found.
///
/// Quotes that cannot be found are skipped. With [`ColorPolicy::ByIndex`] the
/// color follows the quote's position in `quotes`, counting skipped quotes too.
pub fn generate_highlights(
    quotes: &[Quote],
    text: &str,
    color_key: &str,
    policy: ColorPolicy,
) -> Vec<Highlight> {
    quotes
        .iter()
        .enumerate()
        .filter_map(|(index, quote)| {
            let Some(range) = locate_quote(text, &quote.quote).range() else {
                debug!(quote = %quote.quote, "quote not found in answer");
                return None;
            };

            Some(Highlight {
                start: range.start,
                end: range.end,
                text: text[range].to_string(),
                color: policy.pick(color_key, index),
                tooltip: quote.comment.clone().filter(|c| !c.is_empty()),
            })
        })
        .collect()
}

/// Quotes listed for `side` under `group`; empty when either is missing.
pub fn group_quotes<'a>(content: &'a CriteriaQuotes, group: &str, side: Side) -> &'a [Quote] {
    content
        .get(group)
        .and_then(|sides| sides.get(side.label()))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Highlights for one side of the answer pair under the selected group.
pub fn highlights_for_group(
    content: &CriteriaQuotes,
    group: &str,
    side: Side,
    text: &str,
    params: &HighlightParams,
) -> Vec<Highlight> {
    generate_highlights(group_quotes(content, group, side), text, group, params.color_policy)
}

/// Highlights and segments for both answers of `task` under `group`.
///
/// Ranges are computed in bytes and exported in UTF-16 code units.
pub fn highlight_group(
    task: &RankingTask,
    content: &CriteriaQuotes,
    group: &str,
    params: &HighlightParams,
) -> GroupHighlights {
    let sides = Side::BOTH
        .iter()
        .map(|&side| {
            let text = task.answer(side);
            let highlights = highlights_for_group(content, group, side, text, params);
            let segments = render_segments(text, &highlights, params.overlap_policy);
            let map = OffsetMap::new(text);
            SideHighlights {
                side,
                label: side.label().to_string(),
                quote_count: group_quotes(content, group, side).len(),
                highlights: highlights.iter().filter_map(|h| h.to_utf16(&map)).collect(),
                segments: segments.iter().filter_map(|s| s.to_utf16(&map)).collect(),
            }
        })
        .collect();

    GroupHighlights {
        group: group.to_string(),
        sides,
    }
}

/// The task's `criteria_quotes` payload, if present and well-formed.
pub fn criteria_quotes(task: &RankingTask) -> Option<CriteriaQuotes> {
    let value = task.helpers.get(CRITERIA_QUOTES)?;
    match HelperContent::from_value(CRITERIA_QUOTES, value) {
        HelperContent::CriteriaQuotes(content) => Some(content),
        _ => None,
    }
}

/// Highlight every group of a task. Tasks without quotes yield no groups.
pub fn highlight_task(task: &RankingTask, index: usize, params: &HighlightParams) -> TaskHighlights {
    let groups = criteria_quotes(task)
        .map(|content| {
            content
                .keys()
                .map(|group| highlight_group(task, &content, group, params))
                .collect()
        })
        .unwrap_or_default();

    TaskHighlights {
        index,
        prompt: task.prompt.clone(),
        answers: task.answers.clone(),
        groups,
    }
}

/// Highlight every task in parallel, preserving task order.
pub fn highlight_tasks(
    tasks: &[RankingTask],
    params: &HighlightParams,
    show_progress: bool,
) -> Vec<TaskHighlights> {
    let pb = if show_progress {
        let pb = ProgressBar::new(tasks.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} tasks ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let results: Vec<TaskHighlights> = tasks
        .par_iter()
        .enumerate()
        .map(|(index, task)| {
            let result = highlight_task(task, index, params);
            if let Some(ref pb) = pb {
                pb.inc(1);
            }
            result
        })
        .collect();

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    results
}
