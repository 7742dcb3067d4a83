//! The canonical in-memory API model.
//!
//! One [`Artifact`] is built per compared version and never mutated after
//! construction. Types are keyed by binary name; members are identified by
//! (name, structural descriptor).

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::descriptor::Descriptor;
use crate::signature::{ClassSignature, MethodSignature, TypeSig};

/// The declaration kind of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

impl TypeKind {
    pub fn label(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Record => "record",
            TypeKind::Annotation => "annotation",
        }
    }
}

/// The declaration kind of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum MemberKind {
    Field,
    Constructor,
    Method,
}

impl MemberKind {
    pub fn label(self) -> &'static str {
        match self {
            MemberKind::Field => "field",
            MemberKind::Constructor => "constructor",
            MemberKind::Method => "method",
        }
    }
}

/// API-relevant visibility. Package-private and private declarations never
/// enter the model, so only these two levels exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Visibility {
    Protected,
    Public,
}

impl Visibility {
    pub fn label(self) -> &'static str {
        match self {
            Visibility::Protected => "protected",
            Visibility::Public => "public",
        }
    }
}

/// The modifier subset that affects API compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Modifiers {
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_final: bool,
    pub is_abstract: bool,
}

/// Deprecation state, including the `@Deprecated` element values when the
/// annotation carries them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deprecation {
    pub since: Option<String>,
    pub for_removal: bool,
}

/// Structural generic signature of a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MemberSignature {
    Field(TypeSig),
    Method(MethodSignature),
}

/// A method, constructor, or field declared directly on a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    pub descriptor: Descriptor,
    pub modifiers: Modifiers,
    /// Binary names of declared thrown exceptions (methods only).
    pub throws: BTreeSet<String>,
    pub signature: Option<MemberSignature>,
    /// Binary names of runtime-visible annotation types.
    pub annotations: BTreeSet<String>,
    pub deprecation: Option<Deprecation>,
    /// Whether an annotation member declares a default value.
    pub has_default: bool,
}

/// The member identity key: (name, structural descriptor).
pub type MemberKey = (String, Descriptor);

impl Member {
    pub fn key(&self) -> MemberKey {
        (self.name.clone(), self.descriptor.clone())
    }

    /// Display form of the identity key, e.g. `of(I)Ljava/util/List;`.
    pub fn display_key(&self) -> String {
        format!("{}{}", self.name, self.descriptor)
    }
}

/// One class, interface, enum, record, or annotation type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDeclaration {
    /// Binary name, e.g. `com/example/Outer$Inner`.
    pub binary_name: String,
    pub kind: TypeKind,
    pub modifiers: Modifiers,
    /// Superclass binary name; `None` only for `java/lang/Object`.
    pub superclass: Option<String>,
    /// Implemented (or extended, for interfaces) interface binary names,
    /// in declaration order.
    pub interfaces: Vec<String>,
    pub signature: Option<ClassSignature>,
    pub annotations: BTreeSet<String>,
    pub deprecation: Option<Deprecation>,
    /// Declared public/protected members, in declaration order.
    pub members: Vec<Member>,
}

impl TypeDeclaration {
    /// The package part of the binary name (`com/example` for
    /// `com/example/Foo`), empty for the default package.
    pub fn package(&self) -> &str {
        package_of(&self.binary_name)
    }

    pub fn member(&self, name: &str, descriptor: &Descriptor) -> Option<&Member> {
        self.members
            .iter()
            .find(|m| m.name == name && &m.descriptor == descriptor)
    }
}

/// The package part of a binary name; empty for the default package.
pub fn package_of(binary_name: &str) -> &str {
    match binary_name.rfind('/') {
        Some(idx) => &binary_name[..idx],
        None => "",
    }
}

/// A recoverable per-class parse failure recorded during artifact build.
#[derive(Debug, Clone, Serialize)]
pub struct ParseDiagnostic {
    /// Index of the offending buffer in the input set.
    pub buffer_index: usize,
    pub message: String,
}

/// One versioned, parsed snapshot of a library's public API surface.
/// Immutable once built; comparisons read two frozen artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    pub label: String,
    /// SHA-256 over the sorted per-buffer digests of the inputs.
    pub fingerprint: String,
    pub types: BTreeMap<String, TypeDeclaration>,
    /// Classes skipped due to recoverable parse errors.
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl Artifact {
    pub fn get(&self, binary_name: &str) -> Option<&TypeDeclaration> {
        self.types.get(binary_name)
    }

    /// All packages that contain at least one type.
    pub fn packages(&self) -> BTreeSet<String> {
        self.types
            .values()
            .map(|t| t.package().to_string())
            .collect()
    }
}
