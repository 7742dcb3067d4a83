//! apidiff-core: API-surface extraction and compatibility diff engine.
//!
//! Compares two versions of a compiled JVM library, class files in, ordered
//! change report out:
//!
//! 1. [`classfile`] parses each class buffer into a [`model::TypeDeclaration`].
//! 2. [`builder`] joins one version's declarations into a frozen
//!    [`model::Artifact`], resolving inheritance.
//! 3. [`diff`] aligns two artifacts by identity into a change set.
//! 4. [`classify`] assigns each change a compatibility [`classify::Severity`].
//! 5. [`report`] orders and aggregates the result for rendering.
//!
//! # Public API
//!
//! Key entry points are re-exported at the crate root:
//!
//! - [`build_artifact`] / [`build_artifact_pair`] -- buffers to artifacts
//! - [`diff_artifacts`] -- two artifacts to a change set
//! - [`classify_changes`] -- change set to classified changes
//! - [`Report::build`] -- classified changes to the ordered report

pub mod builder;
pub mod classfile;
pub mod classify;
pub mod descriptor;
pub mod diff;
pub mod error;
pub mod model;
pub mod report;
pub mod signature;

#[cfg(test)]
pub(crate) mod classbuilder;

// ── Convenience re-exports: key types ────────────────────────────────

pub use classify::{ClassifiedChange, Severity};
pub use error::{ModelError, ParseError};
pub use model::{Artifact, Member, TypeDeclaration};
pub use report::Report;

// ── Convenience re-exports: pipeline entry points ────────────────────

pub use builder::{build_artifact, build_artifact_pair};
pub use classfile::parse_class;
pub use classify::classify_changes;
pub use diff::diff_artifacts;
