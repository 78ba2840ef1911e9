//! Integration tests for pairwise-highlight.
//!
//! These tests exercise the path from a task file on disk through quote
//! location, highlight generation, rendering and output.

use pairwise_highlight::color::{color_for, ColorPolicy};
use pairwise_highlight::helpers::{parse_quotes, CRITERIA_QUOTES};
use pairwise_highlight::highlight::{generate_highlights, highlight_tasks};
use pairwise_highlight::locate::{locate_quote, QuoteMatch};
use pairwise_highlight::models::{
    Highlight, HighlightParams, HighlightReport, OverlapPolicy, Quote, RankingTask, Side,
};
use pairwise_highlight::offsets::OffsetMap;
use pairwise_highlight::output::{generate_viewer_html, write_csv, write_json};
use pairwise_highlight::render::{render_segments, segments_text};
use pairwise_highlight::session::ReviewSession;
use pairwise_highlight::storage::TaskStorage;
use serde_json::json;
use std::collections::BTreeMap;

const ANSWER_A: &str = "Photosynthesis turns light into chemical energy. \
                        Plants store that energy as glucose.";
const ANSWER_B: &str = "Leaves capture sunlight. The process is called photosynthesis, \
                        and it releases oxygen.";

/// Helper to create a task with a criteria_quotes helper attached.
fn create_task(prompt: &str) -> RankingTask {
    let mut helpers = BTreeMap::new();
    helpers.insert(
        CRITERIA_QUOTES.to_string(),
        json!({
            "Accuracy": {
                "Text A": [
                    {"quote": "\"turns light into chemical energy\"", "comment": "correct summary"},
                    {"quote": "\"Plants store that energy as starch\"", "comment": "not verbatim"}
                ],
                "Text B": [
                    {"quote": "'releases oxygen'", "comment": null}
                ]
            },
            "Clarity": {
                "Text A": [],
                "Text B": [
                    {"quote": "Leaves capture sunlight.", "comment": "simple opening"}
                ]
            }
        }),
    );
    helpers.insert("summarize".to_string(), json!({"A": "energy", "B": "oxygen"}));

    RankingTask {
        prompt: prompt.to_string(),
        answers: vec![ANSWER_A.to_string(), ANSWER_B.to_string()],
        criteria: vec![
            "**Accuracy**: is it correct?".to_string(),
            "**Clarity**: is it easy to read?".to_string(),
        ],
        helpers,
    }
}

fn hl(start: usize, end: usize) -> Highlight {
    Highlight {
        start,
        end,
        text: String::new(),
        color: color_for("test"),
        tooltip: None,
    }
}

#[test]
fn test_quote_stripping_example() {
    assert_eq!(
        locate_quote("She said \"hello world\" to me", "\"hello world\""),
        QuoteMatch::Found(10..21)
    );
    assert_eq!(&"She said \"hello world\" to me"[10..21], "hello world");
    assert_eq!(locate_quote("abc", "xyz"), QuoteMatch::NotFound);
}

#[test]
fn test_ordering_example() {
    let text = "0123456789abcdefghijklmnop";
    let segments = render_segments(text, &[hl(10, 15), hl(2, 5)], OverlapPolicy::Passthrough);
    let ranges: Vec<(usize, usize, bool)> = segments
        .iter()
        .map(|s| (s.start, s.end, s.is_highlighted()))
        .collect();
    assert_eq!(
        ranges,
        vec![
            (0, 2, false),
            (2, 5, true),
            (5, 10, false),
            (10, 15, true),
            (15, text.len(), false),
        ]
    );
}

#[test]
fn test_coverage_with_located_quotes() {
    let quotes = vec![
        Quote::new("\"Plants store\""),
        Quote::new("light"),
        Quote::new("missing entirely"),
        Quote::new("glucose."),
    ];
    let highlights = generate_highlights(&quotes, ANSWER_A, "Accuracy", ColorPolicy::Keyed);
    assert_eq!(highlights.len(), 3);

    let segments = render_segments(ANSWER_A, &highlights, OverlapPolicy::Passthrough);
    assert_eq!(segments_text(ANSWER_A, &segments), ANSWER_A);
    assert!(segments.last().unwrap().is_highlighted());
    assert!(segments.windows(2).all(|w| w[0].end == w[1].start));
}

#[test]
fn test_parsed_quotes_locate_in_answer() {
    let raw = "QUOTE: \"Leaves capture sunlight.\"\n\
               COMMENT: opens concretely\n\
               QUOTE: \"it releases oxygen\"\n\
               QUOTE: \"chlorophyll absorbs red light\"";
    let quotes = parse_quotes(raw);
    let highlights = generate_highlights(&quotes, ANSWER_B, "Clarity", ColorPolicy::ByIndex);

    assert_eq!(highlights.len(), 2);
    assert_eq!(highlights[0].start, 0);
    assert_eq!(highlights[0].tooltip.as_deref(), Some("opens concretely"));
    assert_eq!(highlights[1].text, "it releases oxygen");
}

#[test]
fn test_storage_to_report_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let storage = TaskStorage::open(dir.path());
    storage
        .write_task("biology", &[create_task("What is photosynthesis?"), create_task("Again?")])
        .unwrap();

    let tasks = storage.read_task("biology").unwrap();
    let params = HighlightParams::default();
    let results = highlight_tasks(&tasks, &params, false);

    assert_eq!(results.len(), 2);
    let accuracy = results[0].group("Accuracy").unwrap();
    let side_a = &accuracy.sides[0];
    assert_eq!(side_a.side, Side::A);
    assert_eq!(side_a.quote_count, 2);
    assert_eq!(side_a.highlights.len(), 1);
    assert_eq!(side_a.highlights[0].text, "turns light into chemical energy");
    assert_eq!(side_a.highlights[0].color, color_for("Accuracy"));

    let report = HighlightReport {
        version: "test".to_string(),
        task_name: "biology".to_string(),
        parameters: params,
        tasks: results,
    };

    let mut buf = Vec::new();
    write_json(&report, &mut buf).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(value["tasks"][0]["groups"][0]["group"], "Accuracy");

    let html = generate_viewer_html(&report);
    assert!(html.contains("Accuracy"));
    assert!(html.contains("Clarity"));
    assert!(html.contains(r#"title="correct summary""#));
}

#[test]
fn test_session_over_stored_task() {
    let dir = tempfile::tempdir().unwrap();
    let storage = TaskStorage::open(dir.path());
    storage.write_task("biology", &[create_task("p")]).unwrap();

    let task = storage.read_task_at("biology", 0).unwrap();
    let mut session = ReviewSession::new(
        task,
        HighlightParams {
            color_policy: ColorPolicy::Keyed,
            overlap_policy: OverlapPolicy::Clip,
        },
    );

    session.select_helper(CRITERIA_QUOTES).unwrap();
    assert_eq!(session.selected_group(), Some("Accuracy"));
    assert_eq!(session.highlights(Side::B)[0].text, "releases oxygen");

    session.select_group("Clarity");
    assert!(session.highlights(Side::A).is_empty());
    let segments = session.segments(Side::B);
    assert_eq!(segments[0].start, 0);
    assert!(segments[0].is_highlighted());
    assert_eq!(segments_text(ANSWER_B, &segments), ANSWER_B);
}

#[test]
fn test_deleted_helper_leaves_no_groups() {
    let dir = tempfile::tempdir().unwrap();
    let storage = TaskStorage::open(dir.path());
    storage.write_task("biology", &[create_task("p")]).unwrap();

    assert_eq!(storage.delete_helper("biology", CRITERIA_QUOTES).unwrap(), 1);

    let tasks = storage.read_task("biology").unwrap();
    let results = highlight_tasks(&tasks, &HighlightParams::default(), false);
    assert!(results[0].groups.is_empty());
    assert!(tasks[0].helpers.contains_key("summarize"));
}

#[test]
fn test_color_determinism_across_tasks() {
    let tasks = vec![create_task("one"), create_task("two")];
    let results = highlight_tasks(&tasks, &HighlightParams::default(), false);
    let first = &results[0].group("Clarity").unwrap().sides[1].highlights[0];
    let second = &results[1].group("Clarity").unwrap().sides[1].highlights[0];
    assert_eq!(first.color, second.color);
    assert_eq!(first.color.to_string(), color_for("Clarity").to_string());
}

#[test]
fn test_report_offsets_for_multibyte_answer() {
    let answer = "Le café coûte 2€ \u{1F600} très cher.";
    let mut task = create_task("Is it expensive?");
    task.answers[0] = answer.to_string();
    task.helpers.insert(
        CRITERIA_QUOTES.to_string(),
        json!({"Tone": {"Text A": [
            {"quote": "\u{201C}très cher\u{201D}", "comment": "emphatic"},
            {"quote": "café", "comment": null}
        ]}}),
    );

    let params = HighlightParams::default();
    let results = highlight_tasks(&[task], &params, false);
    let side_a = &results[0].group("Tone").unwrap().sides[0];

    let map = OffsetMap::new(answer);
    assert_eq!(side_a.segments.last().unwrap().end, map.utf16_len());
    assert_eq!(segments_text(answer, &side_a.byte_segments(answer)), answer);
    for h in &side_a.highlights {
        assert_eq!(map.slice(answer, h.range()), Some(h.text.as_str()));
    }

    let report = HighlightReport {
        version: "test".to_string(),
        task_name: "prices".to_string(),
        parameters: params,
        tasks: results,
    };

    let mut buf = Vec::new();
    write_json(&report, &mut buf).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
    let highlights = &value["tasks"][0]["groups"][0]["sides"][0]["highlights"];
    assert_eq!((&highlights[0]["start"], &highlights[0]["end"]), (&json!(20), &json!(29)));
    assert_eq!((&highlights[1]["start"], &highlights[1]["end"]), (&json!(3), &json!(7)));

    let mut buf = Vec::new();
    write_csv(&report, &mut buf).unwrap();
    let csv = String::from_utf8(buf).unwrap();
    assert!(csv.lines().any(|l| l.starts_with("0,\"Tone\",\"Text A\",20,29,")));
}
