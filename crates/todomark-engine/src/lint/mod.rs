//! Structural linter for list nesting and indentation.
//!
//! Runs a single pass over raw lines using only the list-item classification;
//! it needs neither the todo map nor todo-state detection, so hosts can
//! invoke it on demand independently of discovery.

pub mod rules;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::TodoConfig;
use crate::parsing::line::{ListItemMatch, MarkerKind, match_list_item};
use crate::parsing::position::Range;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

/// One linter finding, directly consumable by an editor diagnostics layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Extent of the offending marker.
    pub range: Range,
    pub severity: Severity,
    pub message: String,
    pub rule_id: String,
}

/// An open scope on the linter's indent stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    pub marker_col: usize,
    pub content_col: usize,
}

/// Facts available to a rule for one list-item line.
///
/// `parent` is the top of the indent stack after popping entries at or
/// beyond this line's marker column.
pub struct LintLine<'a> {
    pub row: usize,
    pub item: &'a ListItemMatch,
    pub parent: Option<Scope>,
    /// Marker kind last seen at this marker column, before this line.
    pub prior_kind_at_col: Option<MarkerKind>,
}

impl LintLine<'_> {
    /// Extent of this line's list marker.
    pub fn marker_range(&self) -> Range {
        let start = self.item.marker_col;
        let end = start + self.item.marker_text.len().saturating_sub(1);
        Range::on_row(self.row, start, end)
    }
}

/// A structural rule. Rules are independent and registrable at runtime.
pub trait LintRule {
    /// Stable identifier, used for severity overrides and diagnostics.
    fn id(&self) -> &str;
    fn default_severity(&self) -> Severity;
    /// Returns the finding for this line, if the rule fires.
    fn check(&self, line: &LintLine<'_>) -> Option<(Range, String)>;
}

/// Rule registry plus per-rule severity overrides.
pub struct Linter {
    rules: Vec<Box<dyn LintRule>>,
    severities: HashMap<String, Severity>,
}

impl Default for Linter {
    fn default() -> Self {
        Self::new()
    }
}

impl Linter {
    /// A linter with the built-in rules registered.
    pub fn new() -> Self {
        let mut linter = Self::empty();
        linter.register(Box::new(rules::InconsistentMarker));
        linter.register(Box::new(rules::IndentShallow));
        linter.register(Box::new(rules::IndentDeep));
        linter
    }

    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            severities: HashMap::new(),
        }
    }

    pub fn register(&mut self, rule: Box<dyn LintRule>) {
        self.rules.push(rule);
    }

    /// Overrides the severity reported for a rule id.
    pub fn set_severity(&mut self, rule_id: &str, severity: Severity) {
        self.severities.insert(rule_id.to_string(), severity);
    }

    fn severity_for(&self, rule: &dyn LintRule) -> Severity {
        self.severities
            .get(rule.id())
            .copied()
            .unwrap_or_else(|| rule.default_severity())
    }

    pub fn lint_text(&self, text: &str, cfg: &TodoConfig) -> Vec<Diagnostic> {
        self.lint_lines(text.lines(), cfg)
    }

    /// Single pass: an indent stack of open scopes plus the last marker kind
    /// seen per marker column for sibling-consistency checks.
    pub fn lint_lines<'a>(
        &self,
        lines: impl IntoIterator<Item = &'a str>,
        cfg: &TodoConfig,
    ) -> Vec<Diagnostic> {
        let mut stack: Vec<Scope> = Vec::new();
        let mut kind_at_col: HashMap<usize, MarkerKind> = HashMap::new();
        let mut out = Vec::new();

        for (row, line) in lines.into_iter().enumerate() {
            let Some(item) = match_list_item(line, cfg) else {
                continue;
            };
            while stack.last().is_some_and(|s| s.marker_col >= item.marker_col) {
                stack.pop();
            }

            let ctx = LintLine {
                row,
                item: &item,
                parent: stack.last().copied(),
                prior_kind_at_col: kind_at_col.get(&item.marker_col).copied(),
            };
            for rule in &self.rules {
                if let Some((range, message)) = rule.check(&ctx) {
                    out.push(Diagnostic {
                        range,
                        severity: self.severity_for(rule.as_ref()),
                        message,
                        rule_id: rule.id().to_string(),
                    });
                }
            }

            kind_at_col.insert(item.marker_col, item.kind);
            stack.push(Scope {
                marker_col: item.marker_col,
                content_col: item.content_col,
            });
        }

        out.sort_by_key(|d| d.range.start);
        out
    }
}
