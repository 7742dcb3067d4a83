//! API Model Builder: from raw class buffers to a frozen [`Artifact`],
//! plus the inheritance queries derived from it.
//!
//! Parsing is embarrassingly parallel; each buffer is parsed independently
//! and results are joined into the artifact map in input order. Recoverable
//! parse failures become diagnostics; duplicate binary names and
//! inheritance cycles abort the artifact.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use rayon::prelude::*;
use sha2::{Digest, Sha256};

use crate::classfile::parse_class;
use crate::error::ModelError;
use crate::model::{Artifact, Member, MemberKey, MemberKind, ParseDiagnostic, TypeDeclaration};

/// Build one artifact from its class buffers.
pub fn build_artifact(label: &str, buffers: &[Vec<u8>]) -> Result<Artifact, ModelError> {
    let parsed: Vec<_> = buffers
        .par_iter()
        .map(|buf| {
            let digest = format!("{:x}", Sha256::digest(buf));
            (digest, parse_class(buf))
        })
        .collect();

    let mut digests = Vec::with_capacity(parsed.len());
    let mut types: BTreeMap<String, TypeDeclaration> = BTreeMap::new();
    let mut diagnostics = Vec::new();

    for (index, (digest, result)) in parsed.into_iter().enumerate() {
        digests.push(digest);
        match result {
            Ok(Some(decl)) => {
                if types.contains_key(&decl.binary_name) {
                    return Err(ModelError::DuplicateType {
                        label: label.to_string(),
                        binary_name: decl.binary_name,
                    });
                }
                types.insert(decl.binary_name.clone(), decl);
            }
            Ok(None) => {}
            Err(err) => diagnostics.push(ParseDiagnostic {
                buffer_index: index,
                message: err.to_string(),
            }),
        }
    }

    // Input order must not leak into the fingerprint.
    digests.sort();
    let mut hasher = Sha256::new();
    for d in &digests {
        hasher.update(d.as_bytes());
    }
    let fingerprint = format!("{:x}", hasher.finalize());

    detect_cycles(label, &types)?;

    Ok(Artifact {
        label: label.to_string(),
        fingerprint,
        types,
        diagnostics,
    })
}

/// Build both artifacts of a comparison concurrently. They share no state,
/// so this is the only join point in the pipeline.
pub fn build_artifact_pair(
    old: (&str, &[Vec<u8>]),
    new: (&str, &[Vec<u8>]),
) -> (Result<Artifact, ModelError>, Result<Artifact, ModelError>) {
    rayon::join(
        || build_artifact(old.0, old.1),
        || build_artifact(new.0, new.1),
    )
}

fn internal_edges<'a>(
    types: &'a BTreeMap<String, TypeDeclaration>,
    name: &str,
) -> Vec<&'a str> {
    let Some(decl) = types.get(name) else {
        return Vec::new();
    };
    decl.superclass
        .iter()
        .chain(decl.interfaces.iter())
        .filter(|target| types.contains_key(*target))
        .map(String::as_str)
        .collect()
}

/// Depth-first search with tricoloring over the superclass/interface graph.
/// External references terminate the walk; a gray re-entry is a cycle.
fn detect_cycles(
    label: &str,
    types: &BTreeMap<String, TypeDeclaration>,
) -> Result<(), ModelError> {
    const WHITE: u8 = 0;
    const GRAY: u8 = 1;
    const BLACK: u8 = 2;

    let mut color: HashMap<&str, u8> = types.keys().map(|k| (k.as_str(), WHITE)).collect();

    for start in types.keys() {
        if color[start.as_str()] != WHITE {
            continue;
        }
        color.insert(start.as_str(), GRAY);
        let mut stack: Vec<(&str, Vec<&str>, usize)> =
            vec![(start.as_str(), internal_edges(types, start), 0)];

        loop {
            let next = match stack.last_mut() {
                None => break,
                Some(top) => {
                    if top.2 < top.1.len() {
                        let n = top.1[top.2];
                        top.2 += 1;
                        Some(n)
                    } else {
                        None
                    }
                }
            };
            match next {
                Some(target) => match color.get(target).copied() {
                    Some(WHITE) => {
                        color.insert(target, GRAY);
                        stack.push((target, internal_edges(types, target), 0));
                    }
                    Some(GRAY) => {
                        return Err(ModelError::InheritanceCycle {
                            label: label.to_string(),
                            binary_name: target.to_string(),
                        });
                    }
                    _ => {}
                },
                None => {
                    if let Some((done, _, _)) = stack.pop() {
                        color.insert(done, BLACK);
                    }
                }
            }
        }
    }
    Ok(())
}

/// A member visible on a type after inheritance resolution.
#[derive(Debug, Clone, Copy)]
pub struct InheritedMember<'a> {
    pub declared_in: &'a str,
    pub member: &'a Member,
}

impl Artifact {
    /// The member set a type exposes to consumers: its own declarations
    /// plus inherited, non-overridden members from ancestors. Ancestors are
    /// visited superclass chain first, then interfaces breadth-first; a
    /// closer declaration shadows a farther one with the same identity key.
    ///
    /// Returns `None` for a binary name not in this artifact. Build-time
    /// cycle detection guarantees termination.
    pub fn effective_api(&self, binary_name: &str) -> Option<Vec<InheritedMember<'_>>> {
        let start = self.types.get(binary_name)?;

        let mut claimed: BTreeMap<MemberKey, InheritedMember<'_>> = BTreeMap::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(&start.binary_name);
        visited.insert(&start.binary_name);

        while let Some(current) = queue.pop_front() {
            let Some(decl) = self.types.get(current) else {
                continue;
            };
            let is_self = current == binary_name;
            for member in &decl.members {
                // Constructors are not inherited.
                if !is_self && member.kind == MemberKind::Constructor {
                    continue;
                }
                claimed
                    .entry(member.key())
                    .or_insert(InheritedMember {
                        declared_in: current,
                        member,
                    });
            }
            if let Some(sup) = &decl.superclass {
                if visited.insert(sup) {
                    queue.push_back(sup);
                }
            }
            for iface in &decl.interfaces {
                if visited.insert(iface) {
                    queue.push_back(iface);
                }
            }
        }

        Some(claimed.into_values().collect())
    }

    /// Whether `sub` can reach `sup` through superclass/interface edges
    /// within this artifact (reflexive). External ancestors terminate the
    /// walk as opaque identities.
    pub fn is_subtype_of(&self, sub: &str, sup: &str) -> bool {
        if sub == sup {
            return true;
        }
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(sub);
        while let Some(current) = queue.pop_front() {
            let Some(decl) = self.types.get(current) else {
                continue;
            };
            for target in decl.superclass.iter().chain(decl.interfaces.iter()) {
                if target == sup {
                    return true;
                }
                if visited.insert(target) {
                    queue.push_back(target);
                }
            }
        }
        false
    }
}
