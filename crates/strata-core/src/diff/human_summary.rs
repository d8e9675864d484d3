//! Human-readable summary renderer for snapshot diffs.

use crate::diff::model::{DiffResult, FieldChange, SnapshotSide, TrackedValue};
use crate::model::SpecProjection;

/// Render a Markdown summary of a [`DiffResult`] for terminal output.
///
/// Informational only; the structured result is authoritative.
pub fn render_human_summary(diff: &DiffResult) -> String {
    let mut out = String::new();

    out.push_str("## Snapshot Diff\n\n");
    out.push_str(&format!(
        "**From**: {}  \n**To**: {}  \n**Cached**: {}\n\n",
        describe_side(&diff.from),
        describe_side(&diff.to),
        if diff.cached { "yes" } else { "no" },
    ));

    out.push_str(&format!(
        "| Added | Removed | Unchanged | Changed |\n\
         |---|---|---|---|\n\
         | {} | {} | {} | {} |\n\n",
        diff.summary.added, diff.summary.removed, diff.summary.unchanged, diff.summary.changed,
    ));

    if diff.added_specs.is_empty() && diff.removed_specs.is_empty() && diff.changed_specs.is_empty()
    {
        out.push_str("_No membership or field changes._\n");
        return out;
    }

    render_projection_section(&mut out, "Added Specs", &diff.added_specs);
    render_projection_section(&mut out, "Removed Specs", &diff.removed_specs);

    if !diff.changed_specs.is_empty() {
        out.push_str("### Changed Specs\n\n");
        for spec in &diff.changed_specs {
            out.push_str(&format!("- `{}` {}\n", spec.id, spec.name));
            for (path, change) in &spec.changes {
                out.push_str(&format!("  - {path}: {}\n", describe_change(change)));
            }
        }
        out.push('\n');
    }

    out
}

fn describe_side(side: &SnapshotSide) -> String {
    let name = side.label.as_deref().unwrap_or(&side.id);
    format!("{name} ({}, {} specs)", side.year, side.count)
}

fn render_projection_section(out: &mut String, title: &str, specs: &[SpecProjection]) {
    if specs.is_empty() {
        return;
    }
    out.push_str(&format!("### {title}\n\n"));
    for spec in specs {
        out.push_str(&format!("- `{}` {}", spec.id, spec.name));
        let mut details = Vec::new();
        if let Some(style) = &spec.architectural_style {
            details.push(style.clone());
        }
        if let Some(year) = spec.year_completed.or(spec.year_constructed) {
            details.push(year.to_string());
        }
        if !details.is_empty() {
            out.push_str(&format!(" ({})", details.join(", ")));
        }
        out.push('\n');
    }
    out.push('\n');
}

fn describe_change(change: &FieldChange) -> String {
    format!("{} -> {}", value_or_null(&change.from), value_or_null(&change.to))
}

fn value_or_null(value: &Option<TrackedValue>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "null".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::engine::compute_diff;
    use crate::model::{BuildingSpec, ResolvedSnapshot};

    #[test]
    fn test_identical_snapshots_render_no_changes() {
        let s = ResolvedSnapshot::new("a", 1900)
            .with_specs(vec![BuildingSpec::new("x", "Mill").unwrap()]);
        let text = render_human_summary(&compute_diff(&s, &s));
        assert!(text.contains("_No membership or field changes._"));
        assert!(text.contains("**From**: a (1900, 1 specs)"));
    }

    #[test]
    fn test_changed_field_lists_before_and_after() {
        let a = ResolvedSnapshot::new("a", 1900)
            .with_label("Victorian")
            .with_specs(vec![BuildingSpec::new("x", "Mill").unwrap()]);
        let b = ResolvedSnapshot::new("b", 1950)
            .with_specs(vec![BuildingSpec::new("x", "Mill").unwrap().with_stories(4)]);
        let text = render_human_summary(&compute_diff(&a, &b));
        assert!(text.contains("**From**: Victorian (1900, 1 specs)"));
        assert!(text.contains("  - height.stories: null -> 4"));
    }
}
