//! Review state for one task: which helper and group are selected, and the
//! highlights currently shown on each answer.
//!
//! Highlights are recomputed and replaced wholesale whenever the selection
//! changes; nothing is patched in place.

use crate::helpers::{CriteriaQuotes, HelperContent, HelperKind};
use crate::highlight::highlights_for_group;
use crate::models::{Highlight, HighlightParams, RankingTask, Segment, Side};
use crate::render::render_segments;
use tracing::debug;

/// Callback observing every task loaded into a session.
pub type TaskInspector = Box<dyn Fn(&RankingTask)>;

pub struct ReviewSession {
    task: RankingTask,
    params: HighlightParams,
    active_helper: Option<String>,
    selected_group: Option<String>,
    highlights_a: Vec<Highlight>,
    highlights_b: Vec<Highlight>,
    inspector: Option<TaskInspector>,
}

impl ReviewSession {
    pub fn new(task: RankingTask, params: HighlightParams) -> Self {
        Self {
            task,
            params,
            active_helper: None,
            selected_group: None,
            highlights_a: Vec::new(),
            highlights_b: Vec::new(),
            inspector: None,
        }
    }

    /// Install an inspector; it sees the current task immediately and every
    /// task loaded afterwards.
    pub fn with_inspector<F>(mut self, inspector: F) -> Self
    where
        F: Fn(&RankingTask) + 'static,
    {
        inspector(&self.task);
        self.inspector = Some(Box::new(inspector));
        self
    }

    pub fn task(&self) -> &RankingTask {
        &self.task
    }

    /// Switch to another task, clearing the selection and all highlights.
    pub fn load_task(&mut self, task: RankingTask) {
        self.task = task;
        self.active_helper = None;
        self.selected_group = None;
        self.clear_highlights();
        if let Some(inspector) = &self.inspector {
            inspector(&self.task);
        }
    }

    /// Names of the helpers available on the current task.
    pub fn helper_names(&self) -> Vec<&str> {
        self.task.helpers.keys().map(String::as_str).collect()
    }

    pub fn active_helper(&self) -> Option<&str> {
        self.active_helper.as_deref()
    }

    /// Decoded payload of the active helper.
    pub fn active_content(&self) -> Option<HelperContent> {
        let name = self.active_helper.as_deref()?;
        let value = self.task.helpers.get(name)?;
        Some(HelperContent::from_value(name, value))
    }

    /// Make `name` the active helper.
    ///
    /// For a quotes helper the first group is selected and highlighted; any
    /// other helper clears the highlights. Returns the decoded payload, or
    /// `None` if the task has no such helper.
    pub fn select_helper(&mut self, name: &str) -> Option<HelperContent> {
        let value = self.task.helpers.get(name)?;
        let content = HelperContent::from_value(name, value);

        self.active_helper = Some(name.to_string());
        self.selected_group = None;
        self.clear_highlights();

        if let Some(first) = content.as_criteria_quotes().and_then(|c| c.keys().next()) {
            let first = first.clone();
            self.select_group(&first);
        }

        Some(content)
    }

    /// Group names of the active quotes helper, in display order.
    pub fn groups(&self) -> Vec<String> {
        self.active_quotes()
            .map(|c| c.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn selected_group(&self) -> Option<&str> {
        self.selected_group.as_deref()
    }

    /// Select a group and recompute both sides' highlights.
    ///
    /// A group that does not exist, or no active quotes helper, leaves both
    /// sides without highlights.
    pub fn select_group(&mut self, group: &str) {
        self.selected_group = Some(group.to_string());

        let Some(content) = self.active_quotes() else {
            self.clear_highlights();
            return;
        };

        let highlights_a = highlights_for_group(
            &content,
            group,
            Side::A,
            self.task.answer(Side::A),
            &self.params,
        );
        let highlights_b = highlights_for_group(
            &content,
            group,
            Side::B,
            self.task.answer(Side::B),
            &self.params,
        );

        debug!(
            group,
            a = highlights_a.len(),
            b = highlights_b.len(),
            "recomputed highlights"
        );

        self.highlights_a = highlights_a;
        self.highlights_b = highlights_b;
    }

    pub fn highlights(&self, side: Side) -> &[Highlight] {
        match side {
            Side::A => &self.highlights_a,
            Side::B => &self.highlights_b,
        }
    }

    /// Render one side's answer with its current highlights.
    pub fn segments(&self, side: Side) -> Vec<Segment> {
        render_segments(
            self.task.answer(side),
            self.highlights(side),
            self.params.overlap_policy,
        )
    }

    fn active_quotes(&self) -> Option<CriteriaQuotes> {
        let name = self.active_helper.as_deref()?;
        if HelperKind::from_name(name) != HelperKind::CriteriaQuotes {
            return None;
        }
        match self.active_content()? {
            HelperContent::CriteriaQuotes(content) => Some(content),
            _ => None,
        }
    }

    fn clear_highlights(&mut self) {
        self.highlights_a = Vec::new();
        self.highlights_b = Vec::new();
    }
}
