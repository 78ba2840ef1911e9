//! Output formatting for highlight reports (JSON, CSV, marked text, HTML viewer).

use crate::locate::QuoteMatch;
use crate::models::{HighlightReport, Segment, SegmentKind, TaskHighlights};
use crate::offsets::OffsetMap;
use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write a highlight report as JSON.
pub fn write_json<W: Write>(report: &HighlightReport, writer: &mut W) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(report)?;
    writer.write_all(json.as_bytes())?;
    Ok(())
}

/// Write a highlight report as JSON to a file.
pub fn write_json_file(report: &HighlightReport, path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_json(report, &mut file)
}

/// Write one row per highlight as CSV.
pub fn write_csv<W: Write>(report: &HighlightReport, writer: &mut W) -> Result<(), OutputError> {
    writeln!(writer, "task_index,group,side,start,end,color,tooltip,text")?;

    for task in &report.tasks {
        for group in &task.groups {
            for side in &group.sides {
                for h in &side.highlights {
                    writeln!(
                        writer,
                        "{},{:?},{:?},{},{},{:?},{:?},{:?}",
                        task.index,
                        group.group,
                        side.label,
                        h.start,
                        h.end,
                        h.color.to_string(),
                        h.tooltip.as_deref().unwrap_or(""),
                        h.text,
                    )?;
                }
            }
        }
    }

    Ok(())
}

/// Write highlights as CSV to a file.
pub fn write_csv_file(report: &HighlightReport, path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_csv(report, &mut file)
}

/// One line for a located quote: `start..end<TAB>matched text`, in UTF-16 offsets.
///
/// A miss prints the `-1..-1` sentinel.
pub fn format_quote_match(text: &str, result: &QuoteMatch) -> String {
    let map = OffsetMap::new(text);
    let found = result.range().and_then(|range| {
        let units = map.range_to_utf16(range.clone())?;
        Some((units, text.get(range)?))
    });

    match found {
        Some((units, matched)) => format!("{}..{}\t{}", units.start, units.end, matched),
        None => {
            let (start, end) = QuoteMatch::NotFound.to_pair();
            format!("{}..{}\tnot found", start, end)
        }
    }
}

/// Render segments as plain text, wrapping highlighted runs in `[[` `]]`.
pub fn format_marked_text(text: &str, segments: &[Segment]) -> String {
    let mut out = String::with_capacity(text.len() + segments.len() * 4);
    for segment in segments {
        match segment.kind {
            SegmentKind::Plain => out.push_str(segment.text(text)),
            SegmentKind::Highlighted { .. } => {
                out.push_str("[[");
                out.push_str(segment.text(text));
                out.push_str("]]");
            }
        }
    }
    out
}

/// Format one task's highlights for the terminal, optionally for a single group.
pub fn format_task_highlights(task: &TaskHighlights, group: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Task {}: {}", task.index, truncate_text(&task.prompt, 80));

    if task.groups.is_empty() {
        let _ = writeln!(out, "  (no quotes)");
        return out;
    }

    for g in task
        .groups
        .iter()
        .filter(|g| group.map_or(true, |name| g.group == name))
    {
        let _ = writeln!(out, "\n== {} ==", g.group);
        for side in &g.sides {
            let answer = task
                .answers
                .get(side.side.answer_index())
                .map(String::as_str)
                .unwrap_or("");
            let _ = writeln!(
                out,
                "-- {} ({} of {} quotes located)",
                side.label,
                side.highlights.len(),
                side.quote_count
            );
            let _ = writeln!(out, "{}", format_marked_text(answer, &side.byte_segments(answer)));
            for h in side.highlights.iter().filter(|h| h.tooltip.is_some()) {
                let _ = writeln!(
                    out,
                    "   * {}: {}",
                    truncate_text(&h.text, 40),
                    h.tooltip.as_deref().unwrap_or("")
                );
            }
        }
    }

    out
}

/// Write a summary report to stdout.
pub fn print_summary(report: &HighlightReport) {
    let groups: usize = report.tasks.iter().map(|t| t.groups.len()).sum();
    let (quotes, located) = report
        .tasks
        .iter()
        .flat_map(|t| &t.groups)
        .flat_map(|g| &g.sides)
        .fold((0, 0), |(q, l), s| (q + s.quote_count, l + s.highlights.len()));

    println!("\n=== Highlight Summary ===");
    println!("Version: {}", report.version);
    println!("Task file: {}", report.task_name);
    println!();
    println!("Parameters:");
    println!("  Color policy: {:?}", report.parameters.color_policy);
    println!("  Overlap policy: {:?}", report.parameters.overlap_policy);
    println!();
    println!("Results:");
    println!("  Tasks: {}", report.tasks.len());
    println!("  Groups: {}", groups);
    println!("  Quotes: {}", quotes);
    println!("  Located: {}", located);
    if quotes > 0 {
        println!("  Located rate: {:.1}%", located as f64 / quotes as f64 * 100.0);
    }
}

/// Truncate text to a maximum length, adding ellipsis if needed.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

// ============================================================================
// HTML output
// ============================================================================

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render segments as HTML spans. Highlighted spans carry their color and tooltip.
pub fn render_segments_html(text: &str, segments: &[Segment]) -> String {
    let mut out = String::from(r#"<div class="highlighted-text-container">"#);
    for segment in segments {
        let body = escape_html(segment.text(text));
        match &segment.kind {
            SegmentKind::Plain => {
                let _ = write!(out, "<span>{}</span>", body);
            }
            SegmentKind::Highlighted { color, tooltip } => {
                let tooltip_attr = tooltip
                    .as_deref()
                    .map(|t| format!(r#" data-tooltip="{}" title="{}""#, escape_html(t), escape_html(t)))
                    .unwrap_or_default();
                let _ = write!(
                    out,
                    r#"<span class="highlighted-text" style="background-color: {}"{}>{}</span>"#,
                    color, tooltip_attr, body
                );
            }
        }
    }
    out.push_str("</div>");
    out
}

fn render_task_html(task: &TaskHighlights) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<section class="task" data-task="{idx}"><h2>Task {idx}</h2><div class="prompt">{prompt}</div>"#,
        idx = task.index,
        prompt = escape_html(&task.prompt)
    );

    if task.groups.is_empty() {
        let _ = write!(out, r#"<div class="answers">"#);
        for (i, answer) in task.answers.iter().enumerate() {
            let _ = write!(
                out,
                r#"<div class="answer"><h3>{}</h3><div class="highlighted-text-container"><span>{}</span></div></div>"#,
                answer_label(i),
                escape_html(answer)
            );
        }
        out.push_str("</div></section>");
        return out;
    }

    out.push_str(r#"<div class="criteria-buttons">"#);
    for (i, g) in task.groups.iter().enumerate() {
        let _ = write!(
            out,
            r#"<button class="{}" data-group="{}">{}</button>"#,
            if i == 0 { "active" } else { "" },
            i,
            escape_html(&g.group)
        );
    }
    out.push_str("</div>");

    for (i, g) in task.groups.iter().enumerate() {
        let _ = write!(
            out,
            r#"<div class="group answers{}" data-group="{}">"#,
            if i == 0 { " active" } else { "" },
            i
        );
        for side in &g.sides {
            let answer = task
                .answers
                .get(side.side.answer_index())
                .map(String::as_str)
                .unwrap_or("");
            let _ = write!(
                out,
                r#"<div class="answer"><h3>{} <small>{} / {} quotes</small></h3>{}</div>"#,
                escape_html(&side.label),
                side.highlights.len(),
                side.quote_count,
                render_segments_html(answer, &side.byte_segments(answer))
            );
        }
        out.push_str("</div>");
    }

    out.push_str("</section>");
    out
}

fn answer_label(index: usize) -> String {
    match index {
        0 => "Text A".to_string(),
        1 => "Text B".to_string(),
        n => format!("Text {}", n + 1),
    }
}

/// Generate a self-contained HTML page for reviewing every task in a report.
pub fn generate_viewer_html(report: &HighlightReport) -> String {
    let tasks_html: String = report.tasks.iter().map(render_task_html).collect();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Answer Review - {title}</title>
    <style>
        body {{ font-family: system-ui, sans-serif; margin: 0; background: #f9fafb; color: #111827; }}
        header {{ background: #fff; border-bottom: 1px solid #e5e7eb; padding: 12px 16px; }}
        .task {{ background: #fff; margin: 16px; padding: 16px; border-radius: 6px; border: 1px solid #e5e7eb; }}
        .prompt {{ white-space: pre-wrap; color: #374151; margin-bottom: 12px; }}
        .criteria-buttons button {{ margin: 0 4px 8px 0; padding: 4px 10px; border: 1px solid #d1d5db; border-radius: 4px; background: #f3f4f6; cursor: pointer; }}
        .criteria-buttons button.active {{ background: #dbeafe; border-color: #3b82f6; }}
        .answers {{ display: grid; grid-template-columns: 1fr 1fr; gap: 16px; }}
        .group {{ display: none; }}
        .group.active {{ display: grid; }}
        .answer h3 small {{ color: #6b7280; font-weight: normal; }}
        .highlighted-text-container {{ white-space: pre-wrap; line-height: 1.6; }}
        .highlighted-text {{ display: inline; padding: 2px 0; cursor: help; position: relative; }}
    </style>
</head>
<body>
    <header>
        <h1>{title}</h1>
        <div>{count} tasks</div>
    </header>
    {tasks}
    <script type="text/javascript">
        document.querySelectorAll('.task').forEach(function (task) {{
            task.querySelectorAll('.criteria-buttons button').forEach(function (button) {{
                button.addEventListener('click', function () {{
                    var group = button.getAttribute('data-group');
                    task.querySelectorAll('.criteria-buttons button').forEach(function (b) {{
                        b.classList.toggle('active', b === button);
                    }});
                    task.querySelectorAll('.group').forEach(function (g) {{
                        g.classList.toggle('active', g.getAttribute('data-group') === group);
                    }});
                }});
            }});
        }});
    </script>
</body>
</html>"##,
        title = escape_html(&report.task_name),
        count = report.tasks.len(),
        tasks = tasks_html,
    )
}

/// Write viewer HTML to a file.
pub fn write_viewer_html_file(report: &HighlightReport, path: &Path) -> Result<(), OutputError> {
    let html = generate_viewer_html(report);
    std::fs::write(path, html)?;
    Ok(())
}
