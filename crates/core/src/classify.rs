//! Classifier: a pure function from detected changes to compatibility
//! severities.
//!
//! A modification carrying several attribute diffs is classified per
//! attribute and takes the most severe result, so a member that is both
//! deprecated and narrowed reports the narrowing.

use std::fmt;

use serde::Serialize;

use crate::descriptor::FieldType;
use crate::diff::{AttributeDiff, Change, ChangeKind, ChangeSet};
use crate::model::Artifact;

/// Compatibility impact of one change, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    /// No runtime- or compile-visible effect (annotation churn).
    Informational,
    /// Deprecation state changed and nothing else did.
    DeprecationOnly,
    /// New surface; existing consumers are unaffected.
    Addition,
    /// Linkage and source both survive, observable behavior may differ.
    Behavioral,
    /// Existing consumers recompile against the new version and fail.
    SourceBreaking,
    /// Existing compiled consumers fail to link or run.
    BinaryBreaking,
}

impl Severity {
    pub fn is_breaking(self) -> bool {
        matches!(self, Severity::SourceBreaking | Severity::BinaryBreaking)
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Informational => "INFORMATIONAL",
            Severity::DeprecationOnly => "DEPRECATION",
            Severity::Addition => "ADDITION",
            Severity::Behavioral => "BEHAVIORAL",
            Severity::SourceBreaking => "SOURCE_BREAKING",
            Severity::BinaryBreaking => "BINARY_BREAKING",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Severity plus a human-readable justification.
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub severity: Severity,
    pub reason: String,
}

/// A change annotated with its classification.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedChange {
    #[serde(flatten)]
    pub change: Change,
    pub severity: Severity,
    pub reason: String,
}

/// Read-only context the rule table needs beyond the change itself.
pub struct ClassifyContext<'a> {
    pub old: &'a Artifact,
    pub new: &'a Artifact,
}

/// Classify every change in a set.
pub fn classify_changes(
    set: ChangeSet,
    old: &Artifact,
    new: &Artifact,
) -> Vec<ClassifiedChange> {
    let ctx = ClassifyContext { old, new };
    set.changes
        .into_iter()
        .map(|change| {
            let Classification { severity, reason } = classify_change(&change, &ctx);
            ClassifiedChange {
                change,
                severity,
                reason,
            }
        })
        .collect()
}

/// Classify one change. Total over well-formed artifacts.
pub fn classify_change(change: &Change, ctx: &ClassifyContext<'_>) -> Classification {
    match change.kind {
        ChangeKind::TypeRemoved => Classification {
            severity: Severity::BinaryBreaking,
            reason: "removing a public or protected type breaks linkage for every consumer"
                .to_string(),
        },
        ChangeKind::TypeAdded => Classification {
            severity: Severity::Addition,
            reason: "a new type is invisible to existing consumers".to_string(),
        },
        ChangeKind::MemberRemoved => Classification {
            severity: Severity::BinaryBreaking,
            reason: "removing a public or protected member breaks linkage at first use"
                .to_string(),
        },
        ChangeKind::MemberAdded => Classification {
            severity: Severity::Addition,
            reason: "a new member does not affect existing call sites".to_string(),
        },
        ChangeKind::TypeModified | ChangeKind::MemberModified => {
            // Most-severe-wins across the attribute diffs.
            change
                .diffs
                .iter()
                .map(|diff| classify_attribute(diff, change, ctx))
                .max_by_key(|c| c.severity)
                .unwrap_or(Classification {
                    severity: Severity::Informational,
                    reason: "no attribute-level differences".to_string(),
                })
        }
    }
}

fn classify_attribute(
    diff: &AttributeDiff,
    change: &Change,
    ctx: &ClassifyContext<'_>,
) -> Classification {
    match diff {
        AttributeDiff::TypeKind { before, after } => Classification {
            severity: Severity::BinaryBreaking,
            reason: format!(
                "changing a {} into a {} invalidates every existing use",
                before.label(),
                after.label()
            ),
        },
        AttributeDiff::Visibility { before, after } => {
            if after > before {
                Classification {
                    severity: Severity::Addition,
                    reason: format!(
                        "loosening visibility {} -> {} widens the surface",
                        before.label(),
                        after.label()
                    ),
                }
            } else {
                Classification {
                    severity: Severity::SourceBreaking,
                    reason: format!(
                        "tightening visibility {} -> {} rejects existing references at compile time",
                        before.label(),
                        after.label()
                    ),
                }
            }
        }
        AttributeDiff::Final { before: false, after: true } => Classification {
            severity: Severity::BinaryBreaking,
            reason: "newly final: existing subclasses and overrides fail verification"
                .to_string(),
        },
        AttributeDiff::Final { .. } => Classification {
            severity: Severity::Addition,
            reason: "no longer final: extension becomes possible".to_string(),
        },
        AttributeDiff::Abstract { before: false, after: true } => Classification {
            severity: Severity::BinaryBreaking,
            reason: "newly abstract: existing instantiations or calls fail".to_string(),
        },
        AttributeDiff::Abstract { .. } => Classification {
            severity: Severity::Addition,
            reason: "no longer abstract".to_string(),
        },
        AttributeDiff::Static { .. } => Classification {
            severity: Severity::BinaryBreaking,
            reason: "static flag changed: call sites link with the wrong invocation kind"
                .to_string(),
        },
        AttributeDiff::Superclass { before, after } => {
            classify_superclass(change, before.as_deref(), after.as_deref(), ctx)
        }
        AttributeDiff::Interfaces { removed, .. } => {
            if removed.is_empty() {
                Classification {
                    severity: Severity::Addition,
                    reason: "implementing additional interfaces widens assignability"
                        .to_string(),
                }
            } else {
                Classification {
                    severity: Severity::BinaryBreaking,
                    reason: format!(
                        "no longer implements {}: existing assignments and calls break",
                        removed.join(", ")
                    ),
                }
            }
        }
        AttributeDiff::GenericSignature { .. } => Classification {
            severity: Severity::SourceBreaking,
            reason: "generic signature changed with identical erasure: binaries link, \
                     sources may no longer compile"
                .to_string(),
        },
        AttributeDiff::Throws { added, .. } => classify_throws(added, ctx),
        AttributeDiff::ReturnType { before, after } => {
            classify_return(before.as_ref(), after.as_ref(), ctx)
        }
        AttributeDiff::FieldType { before, after } => Classification {
            severity: Severity::BinaryBreaking,
            reason: format!(
                "field type changed {} -> {}: existing access fails linkage",
                before, after
            ),
        },
        AttributeDiff::Deprecation { before: None, after: Some(_) } => Classification {
            severity: Severity::DeprecationOnly,
            reason: "newly deprecated".to_string(),
        },
        AttributeDiff::Deprecation { .. } => Classification {
            severity: Severity::Informational,
            reason: "deprecation state relaxed or annotated differently".to_string(),
        },
        AttributeDiff::Annotations { .. } => Classification {
            severity: Severity::Informational,
            reason: "annotation change with no runtime-visible effect".to_string(),
        },
        AttributeDiff::DefaultValue { before: true, after: false } => Classification {
            severity: Severity::SourceBreaking,
            reason: "annotation member lost its default: usages must now supply a value"
                .to_string(),
        },
        AttributeDiff::DefaultValue { .. } => Classification {
            severity: Severity::Addition,
            reason: "annotation member gained a default".to_string(),
        },
    }
}

fn classify_superclass(
    change: &Change,
    before: Option<&str>,
    after: Option<&str>,
    ctx: &ClassifyContext<'_>,
) -> Classification {
    if let (Some(old_super), Some(_)) = (before, after) {
        // An inserted intermediate class keeps the old superclass an
        // ancestor; linkage against inherited members survives.
        if ctx.new.is_subtype_of(&change.type_name, old_super) {
            return Classification {
                severity: Severity::Behavioral,
                reason: format!(
                    "superclass changed but {} remains an ancestor; inherited behavior may differ",
                    old_super
                ),
            };
        }
    }
    Classification {
        severity: Severity::BinaryBreaking,
        reason: "former superclass is no longer an ancestor: inherited members and casts break"
            .to_string(),
    }
}

const UNCHECKED_ROOTS: [&str; 2] = ["java/lang/RuntimeException", "java/lang/Error"];

fn is_unchecked(artifact: &Artifact, exception: &str) -> bool {
    UNCHECKED_ROOTS
        .iter()
        .any(|root| artifact.is_subtype_of(exception, root))
}

fn classify_throws(added: &[String], ctx: &ClassifyContext<'_>) -> Classification {
    // An exception that cannot be proven unchecked within the artifact is
    // treated as checked, resolving toward the severe side.
    let checked: Vec<&String> = added
        .iter()
        .filter(|e| !is_unchecked(ctx.new, e))
        .collect();
    if checked.is_empty() {
        Classification {
            severity: Severity::Addition,
            reason: "throws clause narrowed or gained only unchecked exceptions".to_string(),
        }
    } else {
        Classification {
            severity: Severity::SourceBreaking,
            reason: format!(
                "throws clause gained checked exception(s) {}: callers must now handle them",
                checked
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

fn classify_return(
    before: Option<&FieldType>,
    after: Option<&FieldType>,
    ctx: &ClassifyContext<'_>,
) -> Classification {
    if let (Some(old_ty), Some(new_ty)) = (before, after) {
        if let (Some(old_name), Some(new_name)) = (old_ty.object_name(), new_ty.object_name()) {
            if old_name != new_name && ctx.new.is_subtype_of(new_name, old_name) {
                return Classification {
                    severity: Severity::Behavioral,
                    reason: format!(
                        "return type narrowed covariantly {} -> {}; callers keep linking",
                        old_name, new_name
                    ),
                };
            }
        }
    }
    Classification {
        severity: Severity::BinaryBreaking,
        reason: "return type changed non-covariantly: the member's descriptor no longer links"
            .to_string(),
    }
}
