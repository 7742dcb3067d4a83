//! Change Set Formatter Contract: the stable ordering and aggregate counts
//! handed to the report renderer.
//!
//! Changes are sorted by (package, binary type name, member identity key,
//! change kind), lexicographic on names, so repeated runs over identical
//! inputs render byte-identically regardless of parse concurrency.
//! Grouping beyond that order is the renderer's business; the bundled
//! text/JSON writers group by severity on top of the stable order.

use serde::Serialize;
use serde_json::Value;

use crate::classify::{ClassifiedChange, Severity};
use crate::model::{package_of, Artifact, ParseDiagnostic};

/// Aggregate change counts per severity.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeveritySummary {
    pub binary_breaking: usize,
    pub source_breaking: usize,
    pub behavioral: usize,
    pub additions: usize,
    pub deprecations: usize,
    pub informational: usize,
    pub total: usize,
}

impl SeveritySummary {
    fn record(&mut self, severity: Severity) {
        match severity {
            Severity::BinaryBreaking => self.binary_breaking += 1,
            Severity::SourceBreaking => self.source_breaking += 1,
            Severity::Behavioral => self.behavioral += 1,
            Severity::Addition => self.additions += 1,
            Severity::DeprecationOnly => self.deprecations += 1,
            Severity::Informational => self.informational += 1,
        }
        self.total += 1;
    }
}

/// Packages that appeared, disappeared, or contain changed types.
#[derive(Debug, Clone, Serialize)]
pub struct PackageSummary {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<String>,
}

/// The ordered, classified output of one comparison run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub old_label: String,
    pub new_label: String,
    pub old_fingerprint: String,
    pub new_fingerprint: String,
    pub summary: SeveritySummary,
    pub packages: PackageSummary,
    pub changes: Vec<ClassifiedChange>,
    pub old_skipped: Vec<ParseDiagnostic>,
    pub new_skipped: Vec<ParseDiagnostic>,
}

impl Report {
    /// Order the classified changes and compute the aggregates.
    pub fn build(old: &Artifact, new: &Artifact, mut changes: Vec<ClassifiedChange>) -> Report {
        changes.sort_by(|a, b| {
            let key = |c: &ClassifiedChange| {
                (
                    package_of(&c.change.type_name).to_string(),
                    c.change.type_name.clone(),
                    c.change
                        .member
                        .as_ref()
                        .map(|m| format!("{}{}", m.name, m.descriptor))
                        .unwrap_or_default(),
                    c.change.kind,
                )
            };
            key(a).cmp(&key(b))
        });

        let mut summary = SeveritySummary::default();
        for c in &changes {
            summary.record(c.severity);
        }

        let old_packages = old.packages();
        let new_packages = new.packages();
        let mut changed_packages: Vec<String> = changes
            .iter()
            .map(|c| package_of(&c.change.type_name).to_string())
            .filter(|p| old_packages.contains(p) && new_packages.contains(p))
            .collect();
        changed_packages.sort();
        changed_packages.dedup();

        Report {
            old_label: old.label.clone(),
            new_label: new.label.clone(),
            old_fingerprint: old.fingerprint.clone(),
            new_fingerprint: new.fingerprint.clone(),
            summary,
            packages: PackageSummary {
                added: new_packages.difference(&old_packages).cloned().collect(),
                removed: old_packages.difference(&new_packages).cloned().collect(),
                changed: changed_packages,
            },
            changes,
            old_skipped: old.diagnostics.clone(),
            new_skipped: new.diagnostics.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Whether the run found binary- or source-breaking changes.
    pub fn has_breaking(&self) -> bool {
        self.summary.binary_breaking > 0 || self.summary.source_breaking > 0
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Format as human-readable text, grouped by severity in descending
    /// order of impact.
    pub fn to_text(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "{} -> {}: {} change(s): {} binary-breaking, {} source-breaking, {} behavioral, \
             {} addition(s), {} deprecation(s), {} informational",
            self.old_label,
            self.new_label,
            self.summary.total,
            self.summary.binary_breaking,
            self.summary.source_breaking,
            self.summary.behavioral,
            self.summary.additions,
            self.summary.deprecations,
            self.summary.informational,
        ));

        if self.changes.is_empty() {
            lines.push("no API differences".to_string());
        }

        for severity in [
            Severity::BinaryBreaking,
            Severity::SourceBreaking,
            Severity::Behavioral,
            Severity::Addition,
            Severity::DeprecationOnly,
            Severity::Informational,
        ] {
            let group: Vec<&ClassifiedChange> = self
                .changes
                .iter()
                .filter(|c| c.severity == severity)
                .collect();
            if group.is_empty() {
                continue;
            }
            lines.push(String::new());
            lines.push(format!("{}:", severity.label()));
            for c in group {
                lines.push(format!("  {}", render_change_line(c)));
            }
        }

        if !self.old_skipped.is_empty() || !self.new_skipped.is_empty() {
            lines.push(String::new());
            lines.push(format!(
                "warning: skipped {} malformed class(es) in '{}', {} in '{}'",
                self.old_skipped.len(),
                self.old_label,
                self.new_skipped.len(),
                self.new_label,
            ));
        }

        lines.join("\n")
    }
}

fn display_type(binary_name: &str) -> String {
    binary_name.replace('/', ".")
}

fn render_change_line(c: &ClassifiedChange) -> String {
    use crate::diff::ChangeKind;
    let symbol = match c.change.kind {
        ChangeKind::TypeAdded | ChangeKind::MemberAdded => '+',
        ChangeKind::TypeRemoved | ChangeKind::MemberRemoved => '-',
        ChangeKind::TypeModified | ChangeKind::MemberModified => '~',
    };
    let subject = match &c.change.member {
        Some(m) => format!(
            "{}#{}{}",
            display_type(&c.change.type_name),
            m.name,
            m.descriptor
        ),
        None => display_type(&c.change.type_name),
    };
    let attributes = if c.change.diffs.is_empty() {
        String::new()
    } else {
        let labels: Vec<&str> = c.change.diffs.iter().map(|d| d.label()).collect();
        format!(" [{}]", labels.join(", "))
    };
    format!("{} {}{}: {}", symbol, subject, attributes, c.reason)
}
