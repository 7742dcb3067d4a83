//! Diff Engine: aligns two frozen artifacts by identity and produces an
//! unordered change set.
//!
//! Symmetry is built in rather than tested in: additions and removals come
//! from one `missing_from` primitive applied in both directions, and the
//! leftover-pairing step walks both sides in sorted order, so comparing
//! (old, new) and (new, old) yields the same changes with roles exchanged.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::{json, Value};

use crate::descriptor::{Descriptor, FieldType};
use crate::model::{
    Artifact, Deprecation, Member, MemberKey, MemberKind, TypeDeclaration, TypeKind, Visibility,
};

/// The kind of one detected difference. The declaration order doubles as
/// the tie-break ordering inside a report group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ChangeKind {
    TypeAdded,
    TypeRemoved,
    TypeModified,
    MemberAdded,
    MemberRemoved,
    MemberModified,
}

impl ChangeKind {
    pub fn label(self) -> &'static str {
        match self {
            ChangeKind::TypeAdded => "type added",
            ChangeKind::TypeRemoved => "type removed",
            ChangeKind::TypeModified => "type modified",
            ChangeKind::MemberAdded => "member added",
            ChangeKind::MemberRemoved => "member removed",
            ChangeKind::MemberModified => "member modified",
        }
    }
}

/// Identity of the member a change is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberRef {
    pub name: String,
    pub descriptor: String,
    pub kind: MemberKind,
}

impl MemberRef {
    fn of(member: &Member) -> MemberRef {
        MemberRef {
            name: member.name.clone(),
            descriptor: member.descriptor.to_string(),
            kind: member.kind,
        }
    }
}

/// One attribute-level difference carried by a Modified change.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "attribute", rename_all = "snake_case")]
pub enum AttributeDiff {
    TypeKind {
        before: TypeKind,
        after: TypeKind,
    },
    Visibility {
        before: Visibility,
        after: Visibility,
    },
    Final {
        before: bool,
        after: bool,
    },
    Abstract {
        before: bool,
        after: bool,
    },
    Static {
        before: bool,
        after: bool,
    },
    Superclass {
        before: Option<String>,
        after: Option<String>,
    },
    Interfaces {
        added: Vec<String>,
        removed: Vec<String>,
    },
    GenericSignature {
        before: Option<Value>,
        after: Option<Value>,
    },
    Throws {
        added: Vec<String>,
        removed: Vec<String>,
    },
    ReturnType {
        before: Option<FieldType>,
        after: Option<FieldType>,
    },
    FieldType {
        before: FieldType,
        after: FieldType,
    },
    Deprecation {
        before: Option<Deprecation>,
        after: Option<Deprecation>,
    },
    Annotations {
        added: Vec<String>,
        removed: Vec<String>,
    },
    DefaultValue {
        before: bool,
        after: bool,
    },
}

impl AttributeDiff {
    pub fn label(&self) -> &'static str {
        match self {
            AttributeDiff::TypeKind { .. } => "kind",
            AttributeDiff::Visibility { .. } => "visibility",
            AttributeDiff::Final { .. } => "final",
            AttributeDiff::Abstract { .. } => "abstract",
            AttributeDiff::Static { .. } => "static",
            AttributeDiff::Superclass { .. } => "superclass",
            AttributeDiff::Interfaces { .. } => "interfaces",
            AttributeDiff::GenericSignature { .. } => "generic signature",
            AttributeDiff::Throws { .. } => "thrown exceptions",
            AttributeDiff::ReturnType { .. } => "return type",
            AttributeDiff::FieldType { .. } => "field type",
            AttributeDiff::Deprecation { .. } => "deprecation",
            AttributeDiff::Annotations { .. } => "annotations",
            AttributeDiff::DefaultValue { .. } => "default value",
        }
    }
}

/// One detected structural difference between the two artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct Change {
    pub kind: ChangeKind,
    /// Binary name of the subject type.
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<MemberRef>,
    /// Attribute-level details; empty for Added/Removed changes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diffs: Vec<AttributeDiff>,
    /// Declaration summary on the old side; absent for Added.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    /// Declaration summary on the new side; absent for Removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
}

/// The unordered output of one comparison run.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeSet {
    pub changes: Vec<Change>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

fn type_state(decl: &TypeDeclaration) -> Value {
    json!({
        "kind": decl.kind,
        "modifiers": decl.modifiers,
        "superclass": decl.superclass,
        "interfaces": decl.interfaces,
        "deprecated": decl.deprecation.is_some(),
        "members": decl.members.len(),
    })
}

fn member_state(member: &Member) -> Value {
    json!({
        "kind": member.kind,
        "modifiers": member.modifiers,
        "throws": member.throws,
        "deprecated": member.deprecation.is_some(),
    })
}

/// Keys of `a` that `b` lacks, in key order. The single alignment
/// primitive; both diff directions go through it.
fn missing_from<'a, K: Ord, V>(a: &'a BTreeMap<K, V>, b: &BTreeMap<K, V>) -> Vec<&'a K> {
    a.keys().filter(|k| !b.contains_key(*k)).collect()
}

/// Compare two artifacts. The result is unordered; [`crate::report`]
/// applies the stable output ordering.
pub fn diff_artifacts(old: &Artifact, new: &Artifact) -> ChangeSet {
    let mut changes = Vec::new();

    for name in missing_from(&old.types, &new.types) {
        let decl = &old.types[name];
        changes.push(Change {
            kind: ChangeKind::TypeRemoved,
            type_name: name.clone(),
            member: None,
            diffs: Vec::new(),
            before: Some(type_state(decl)),
            after: None,
        });
    }
    for name in missing_from(&new.types, &old.types) {
        let decl = &new.types[name];
        changes.push(Change {
            kind: ChangeKind::TypeAdded,
            type_name: name.clone(),
            member: None,
            diffs: Vec::new(),
            before: None,
            after: Some(type_state(decl)),
        });
    }
    for (name, new_decl) in &new.types {
        if let Some(old_decl) = old.types.get(name) {
            diff_type_pair(old_decl, new_decl, &mut changes);
        }
    }

    ChangeSet { changes }
}

fn diff_type_pair(old: &TypeDeclaration, new: &TypeDeclaration, changes: &mut Vec<Change>) {
    let old_members: BTreeMap<MemberKey, &Member> =
        old.members.iter().map(|m| (m.key(), m)).collect();
    let new_members: BTreeMap<MemberKey, &Member> =
        new.members.iter().map(|m| (m.key(), m)).collect();

    let removed_keys = missing_from(&old_members, &new_members);
    let added_keys = missing_from(&new_members, &old_members);

    let mut removed: Vec<&Member> = removed_keys.iter().map(|k| old_members[*k]).collect();
    let mut added: Vec<&Member> = added_keys.iter().map(|k| new_members[*k]).collect();

    // Fuse removed/added entries that differ only in return (or field)
    // type into a single modification, so type changes on one member stay
    // one change. Both sides are in key order, so the pairing is the same
    // regardless of comparison direction.
    let mut fused: Vec<(&Member, &Member)> = Vec::new();
    removed.retain(|old_m| {
        let slot = added.iter().position(|new_m| fusable(old_m, new_m));
        match slot {
            Some(i) => {
                fused.push((*old_m, added.remove(i)));
                false
            }
            None => true,
        }
    });

    for member in removed {
        changes.push(Change {
            kind: ChangeKind::MemberRemoved,
            type_name: old.binary_name.clone(),
            member: Some(MemberRef::of(member)),
            diffs: Vec::new(),
            before: Some(member_state(member)),
            after: None,
        });
    }
    for member in added {
        changes.push(Change {
            kind: ChangeKind::MemberAdded,
            type_name: new.binary_name.clone(),
            member: Some(MemberRef::of(member)),
            diffs: Vec::new(),
            before: None,
            after: Some(member_state(member)),
        });
    }
    for (old_m, new_m) in fused {
        let mut diffs = type_change_diff(old_m, new_m);
        diffs.extend(member_attribute_diffs(old_m, new_m));
        changes.push(Change {
            kind: ChangeKind::MemberModified,
            // Identity is taken from the old side; the new descriptor is
            // visible through the return/field type diff.
            type_name: old.binary_name.clone(),
            member: Some(MemberRef::of(old_m)),
            diffs,
            before: Some(member_state(old_m)),
            after: Some(member_state(new_m)),
        });
    }

    for (key, old_m) in &old_members {
        if let Some(new_m) = new_members.get(key) {
            let diffs = member_attribute_diffs(old_m, new_m);
            if !diffs.is_empty() {
                changes.push(Change {
                    kind: ChangeKind::MemberModified,
                    type_name: old.binary_name.clone(),
                    member: Some(MemberRef::of(old_m)),
                    diffs,
                    before: Some(member_state(old_m)),
                    after: Some(member_state(new_m)),
                });
            }
        }
    }

    let type_diffs = type_attribute_diffs(old, new);
    if !type_diffs.is_empty() {
        changes.push(Change {
            kind: ChangeKind::TypeModified,
            type_name: old.binary_name.clone(),
            member: None,
            diffs: type_diffs,
            before: Some(type_state(old)),
            after: Some(type_state(new)),
        });
    }
}

/// Whether a removed/added pair is really one member with a changed
/// return (or field) type: same kind, same name, and for methods the same
/// parameter list. Constructors always encode a void return, so they can
/// never reach here with equal parameters.
fn fusable(old_m: &Member, new_m: &Member) -> bool {
    if old_m.kind != new_m.kind || old_m.name != new_m.name {
        return false;
    }
    match (&old_m.descriptor, &new_m.descriptor) {
        (Descriptor::Field(_), Descriptor::Field(_)) => true,
        (Descriptor::Method(a), Descriptor::Method(b)) => a.params == b.params,
        _ => false,
    }
}

/// The return-type or field-type diff for a fused pair.
fn type_change_diff(old_m: &Member, new_m: &Member) -> Vec<AttributeDiff> {
    match (&old_m.descriptor, &new_m.descriptor) {
        (Descriptor::Field(a), Descriptor::Field(b)) => vec![AttributeDiff::FieldType {
            before: a.clone(),
            after: b.clone(),
        }],
        (Descriptor::Method(a), Descriptor::Method(b)) => vec![AttributeDiff::ReturnType {
            before: a.ret.clone(),
            after: b.ret.clone(),
        }],
        _ => Vec::new(),
    }
}

fn set_diff(before: &BTreeSet<String>, after: &BTreeSet<String>) -> (Vec<String>, Vec<String>) {
    let added = after.difference(before).cloned().collect();
    let removed = before.difference(after).cloned().collect();
    (added, removed)
}

fn member_attribute_diffs(old_m: &Member, new_m: &Member) -> Vec<AttributeDiff> {
    let mut diffs = Vec::new();

    let om = old_m.modifiers;
    let nm = new_m.modifiers;
    if om.visibility != nm.visibility {
        diffs.push(AttributeDiff::Visibility {
            before: om.visibility,
            after: nm.visibility,
        });
    }
    if om.is_final != nm.is_final {
        diffs.push(AttributeDiff::Final {
            before: om.is_final,
            after: nm.is_final,
        });
    }
    if om.is_abstract != nm.is_abstract {
        diffs.push(AttributeDiff::Abstract {
            before: om.is_abstract,
            after: nm.is_abstract,
        });
    }
    if om.is_static != nm.is_static {
        diffs.push(AttributeDiff::Static {
            before: om.is_static,
            after: nm.is_static,
        });
    }
    if old_m.throws != new_m.throws {
        let (added, removed) = set_diff(&old_m.throws, &new_m.throws);
        diffs.push(AttributeDiff::Throws { added, removed });
    }
    if old_m.signature != new_m.signature {
        diffs.push(AttributeDiff::GenericSignature {
            before: old_m
                .signature
                .as_ref()
                .and_then(|s| serde_json::to_value(s).ok()),
            after: new_m
                .signature
                .as_ref()
                .and_then(|s| serde_json::to_value(s).ok()),
        });
    }
    if old_m.annotations != new_m.annotations {
        let (added, removed) = set_diff(&old_m.annotations, &new_m.annotations);
        diffs.push(AttributeDiff::Annotations { added, removed });
    }
    if old_m.deprecation != new_m.deprecation {
        diffs.push(AttributeDiff::Deprecation {
            before: old_m.deprecation.clone(),
            after: new_m.deprecation.clone(),
        });
    }
    if old_m.has_default != new_m.has_default {
        diffs.push(AttributeDiff::DefaultValue {
            before: old_m.has_default,
            after: new_m.has_default,
        });
    }

    diffs
}

fn type_attribute_diffs(old: &TypeDeclaration, new: &TypeDeclaration) -> Vec<AttributeDiff> {
    let mut diffs = Vec::new();

    if old.kind != new.kind {
        diffs.push(AttributeDiff::TypeKind {
            before: old.kind,
            after: new.kind,
        });
    }
    let om = old.modifiers;
    let nm = new.modifiers;
    if om.visibility != nm.visibility {
        diffs.push(AttributeDiff::Visibility {
            before: om.visibility,
            after: nm.visibility,
        });
    }
    if om.is_final != nm.is_final {
        diffs.push(AttributeDiff::Final {
            before: om.is_final,
            after: nm.is_final,
        });
    }
    if om.is_abstract != nm.is_abstract {
        diffs.push(AttributeDiff::Abstract {
            before: om.is_abstract,
            after: nm.is_abstract,
        });
    }
    if om.is_static != nm.is_static {
        diffs.push(AttributeDiff::Static {
            before: om.is_static,
            after: nm.is_static,
        });
    }
    if old.superclass != new.superclass {
        diffs.push(AttributeDiff::Superclass {
            before: old.superclass.clone(),
            after: new.superclass.clone(),
        });
    }
    // Interface order is not part of the contract; compare as sets.
    let old_ifaces: BTreeSet<String> = old.interfaces.iter().cloned().collect();
    let new_ifaces: BTreeSet<String> = new.interfaces.iter().cloned().collect();
    if old_ifaces != new_ifaces {
        let (added, removed) = set_diff(&old_ifaces, &new_ifaces);
        diffs.push(AttributeDiff::Interfaces { added, removed });
    }
    if old.signature != new.signature {
        diffs.push(AttributeDiff::GenericSignature {
            before: old
                .signature
                .as_ref()
                .and_then(|s| serde_json::to_value(s).ok()),
            after: new
                .signature
                .as_ref()
                .and_then(|s| serde_json::to_value(s).ok()),
        });
    }
    if old.annotations != new.annotations {
        let (added, removed) = set_diff(&old.annotations, &new.annotations);
        diffs.push(AttributeDiff::Annotations { added, removed });
    }
    if old.deprecation != new.deprecation {
        diffs.push(AttributeDiff::Deprecation {
            before: old.deprecation.clone(),
            after: new.deprecation.clone(),
        });
    }

    diffs
}
