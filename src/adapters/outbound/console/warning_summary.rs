use crate::policy_check::domain::{Warning, WarningKind};
use owo_colors::OwoColorize;

/// Renders warnings grouped by kind, one section per kind that has entries
///
/// Section order follows [`WarningKind::ALL`]; within a section warnings keep
/// their incoming order, which is already sorted by package.
pub fn render_warning_summary(warnings: &[Warning], colored: bool) -> String {
    let mut out = String::new();

    for kind in WarningKind::ALL {
        let section: Vec<&Warning> = warnings.iter().filter(|w| w.kind() == kind).collect();
        if section.is_empty() {
            continue;
        }

        let heading = format!("{} ({})", kind.title(), section.len());
        if colored {
            out.push_str(&format!("⚠️  {}\n", heading.yellow().bold()));
        } else {
            out.push_str(&format!("⚠️  {}\n", heading));
        }

        for warning in section {
            let package = if colored {
                warning.package().cyan().to_string()
            } else {
                warning.package().to_string()
            };
            out.push_str(&format!("   - {}: {}\n", package, warning.message()));
        }
        out.push('\n');
    }

    out
}

/// One-line description of the count per kind, e.g. `2 install scripts, 1 licenses`
pub fn summarize_counts(warnings: &[Warning]) -> String {
    WarningKind::ALL
        .iter()
        .filter_map(|kind| {
            let count = warnings.iter().filter(|w| w.kind() == *kind).count();
            (count > 0).then(|| format!("{} {}", count, kind.title().to_lowercase()))
        })
        .collect::<Vec<_>>()
        .join(", ")
}
