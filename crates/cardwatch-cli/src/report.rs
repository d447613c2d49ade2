//! Plain-text rendering of the owner-grouped violation report.

use cardwatch_core::{AuditConfig, OwnerReport};

/// Render one section per owner, one heading per non-empty kind and one line
/// per violation.
pub fn render_report(report: &OwnerReport<'_>, config: &AuditConfig) -> String {
    if report.is_empty() {
        return "No violations found.\n".to_string();
    }

    let mut out = String::new();
    for (owner, bundle) in report.iter() {
        out.push_str(&format!("{} ({})\n", owner, bundle.total()));
        for (kind, violations) in bundle.by_kind() {
            out.push_str(&format!("  {}:\n", kind.title()));
            for violation in violations {
                out.push_str(&format!(
                    "  - {} ({}): {}\n",
                    violation.card.name,
                    config.story_url(violation.card.id),
                    violation.message
                ));
            }
        }
        out.push('\n');
    }
    out
}
