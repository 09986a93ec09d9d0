//! Diagnostic report for presentation layers.

use serde::{Deserialize, Serialize};

use canvas_model::{Diagnostic, Severity};

use crate::error::PolicyResult;

/// Counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
}

/// The findings of one validation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub diagnostics: Vec<Diagnostic>,
    pub summary: ReportSummary,
}

impl DiagnosticReport {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        let count = |severity: Severity| diagnostics.iter().filter(|d| d.severity == severity).count();
        let summary = ReportSummary {
            total: diagnostics.len(),
            errors: count(Severity::Error),
            warnings: count(Severity::Warning),
            info: count(Severity::Info),
        };
        Self {
            diagnostics,
            summary,
        }
    }

    /// Whether any finding should block export.
    pub fn has_blocking_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.blocks())
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Findings scoped to one node.
    pub fn for_node(&self, node_id: &str) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.node_id.as_deref() == Some(node_id))
            .collect()
    }

    /// Findings scoped to one field of one node.
    pub fn for_field(&self, node_id: &str, field: &str) -> Vec<&Diagnostic> {
        self.for_node(node_id)
            .into_iter()
            .filter(|d| d.field.as_deref() == Some(field))
            .collect()
    }

    /// Errors first, then warnings, then info. Order within a severity is
    /// preserved.
    pub fn sorted(&self) -> Vec<&Diagnostic> {
        let mut sorted: Vec<&Diagnostic> = self.diagnostics.iter().collect();
        sorted.sort_by_key(|d| d.severity);
        sorted
    }

    pub fn to_json(&self) -> PolicyResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Human-readable report.
    pub fn render(&self) -> String {
        let mut report = String::new();

        let status = if self.has_blocking_errors() {
            "FAILED"
        } else {
            "PASSED"
        };
        report.push_str(&format!("Validation: {}\n", status));
        report.push_str(&format!(
            "Summary: {} errors, {} warnings, {} info\n",
            self.summary.errors, self.summary.warnings, self.summary.info
        ));

        if self.diagnostics.is_empty() {
            return report;
        }

        report.push('\n');
        for diagnostic in self.sorted() {
            let scope = match (&diagnostic.node_id, &diagnostic.field) {
                (Some(node), Some(field)) => format!(" [{}.{}]", node, field),
                (Some(node), None) => format!(" [{}]", node),
                _ => String::new(),
            };
            report.push_str(&format!(
                "  {:<7} {}{}: {}\n",
                diagnostic.severity.as_str(),
                diagnostic.code,
                scope,
                diagnostic.message
            ));
            if let Some(remediation) = &diagnostic.remediation {
                report.push_str(&format!("          hint: {}\n", remediation));
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_model::codes;

    fn sample() -> DiagnosticReport {
        DiagnosticReport::new(vec![
            Diagnostic::info(codes::AUTO_SUBNET_MODE, "auto").for_node("vpc"),
            Diagnostic::warning(codes::OPEN_FIREWALL, "open")
                .for_node("fw")
                .on_field("source_ranges"),
            Diagnostic::error(codes::REQUIRED_FIELD, "name").for_node("vpc").on_field("name"),
            Diagnostic::warning(codes::MISSING_VPC, "subnet"),
        ])
    }

    #[test]
    fn test_summary_counts() {
        let report = sample();
        assert_eq!(
            report.summary,
            ReportSummary {
                total: 4,
                errors: 1,
                warnings: 2,
                info: 1
            }
        );
        assert!(report.has_blocking_errors());
    }

    #[test]
    fn test_sorted_is_stable_by_severity() {
        let report = sample();
        let order: Vec<_> = report.sorted().iter().map(|d| d.code.as_str()).collect();
        assert_eq!(
            order,
            vec![
                codes::REQUIRED_FIELD,
                codes::OPEN_FIREWALL,
                codes::MISSING_VPC,
                codes::AUTO_SUBNET_MODE
            ]
        );
    }

    #[test]
    fn test_node_and_field_lookup() {
        let report = sample();
        assert_eq!(report.for_node("vpc").len(), 2);
        assert_eq!(report.for_field("fw", "source_ranges").len(), 1);
        assert!(report.for_node("missing").is_empty());
    }

    #[test]
    fn test_render() {
        let rendered = sample().render();
        assert!(rendered.starts_with("Validation: FAILED\n"));
        assert!(rendered.contains("error   REQUIRED_FIELD [vpc.name]: name"));

        let clean = DiagnosticReport::new(Vec::new());
        assert!(clean.render().contains("PASSED"));
        assert!(clean.is_clean());
    }
}
