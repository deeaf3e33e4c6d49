//! Built-in structural rules.

use super::{LintLine, LintRule, Severity};
use crate::parsing::line::MarkerKind;
use crate::parsing::position::Range;

pub const INCONSISTENT_MARKER: &str = "inconsistent-marker";
pub const INDENT_SHALLOW: &str = "indent-shallow";
pub const INDENT_DEEP: &str = "indent-deep";

/// CommonMark allows at most this many spaces past the parent's content
/// column before a child stops being nested.
const MAX_EXTRA_INDENT: usize = 3;

fn kind_name(kind: MarkerKind) -> &'static str {
    match kind {
        MarkerKind::Unordered => "unordered",
        MarkerKind::Ordered => "ordered",
    }
}

/// Items at the same marker column should keep one marker kind.
pub struct InconsistentMarker;

impl LintRule for InconsistentMarker {
    fn id(&self) -> &str {
        INCONSISTENT_MARKER
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn check(&self, line: &LintLine<'_>) -> Option<(Range, String)> {
        let prior = line.prior_kind_at_col?;
        if prior == line.item.kind {
            return None;
        }
        Some((
            line.marker_range(),
            format!(
                "{} marker `{}` differs from the {} marker used earlier at column {}",
                kind_name(line.item.kind),
                line.item.marker_text,
                kind_name(prior),
                line.item.marker_col,
            ),
        ))
    }
}

/// A child must start at or after its parent's content column.
pub struct IndentShallow;

impl LintRule for IndentShallow {
    fn id(&self) -> &str {
        INDENT_SHALLOW
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, line: &LintLine<'_>) -> Option<(Range, String)> {
        let parent = line.parent?;
        if line.item.marker_col >= parent.content_col {
            return None;
        }
        Some((
            line.marker_range(),
            format!(
                "list item at column {} is indented less than its parent's content column {}",
                line.item.marker_col, parent.content_col,
            ),
        ))
    }
}

/// A child more than three columns past the parent's content column is no
/// longer nested under it.
pub struct IndentDeep;

impl LintRule for IndentDeep {
    fn id(&self) -> &str {
        INDENT_DEEP
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, line: &LintLine<'_>) -> Option<(Range, String)> {
        let parent = line.parent?;
        if line.item.marker_col <= parent.content_col + MAX_EXTRA_INDENT {
            return None;
        }
        Some((
            line.marker_range(),
            format!(
                "list item at column {} is indented more than {} columns past its parent's content column {}",
                line.item.marker_col, MAX_EXTRA_INDENT, parent.content_col,
            ),
        ))
    }
}
