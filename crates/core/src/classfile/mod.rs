//! Class-file reader: one binary buffer in, one [`TypeDeclaration`] out.
//!
//! The reader performs full structural validation of the container format
//! (magic, constant pool, tables, attribute lengths) but extracts only what
//! the API model needs: public/protected declarations, their descriptors,
//! generic signatures, thrown exceptions, annotations, and deprecation.
//! Synthetic and bridge members never enter the model.

mod cursor;
mod pool;

use std::collections::{BTreeSet, HashSet};

use crate::descriptor::{parse_field_descriptor, parse_method_descriptor, Descriptor};
use crate::error::ParseError;
use crate::model::{
    Deprecation, Member, MemberKind, MemberSignature, Modifiers, TypeDeclaration, TypeKind,
    Visibility,
};
use crate::signature::{parse_class_signature, parse_field_signature, parse_method_signature};

use cursor::Cursor;
use pool::ConstantPool;

const MAGIC: u32 = 0xCAFE_BABE;

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_PROTECTED: u16 = 0x0004;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_FINAL: u16 = 0x0010;
pub const ACC_BRIDGE: u16 = 0x0040;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_SYNTHETIC: u16 = 0x1000;
pub const ACC_ANNOTATION: u16 = 0x2000;
pub const ACC_ENUM: u16 = 0x4000;
pub const ACC_MODULE: u16 = 0x8000;

const DEPRECATED_ANNOTATION: &str = "java/lang/Deprecated";

/// One runtime-visible annotation, reduced to what the model records.
struct AnnotationInfo {
    type_name: String,
    since: Option<String>,
    for_removal: bool,
}

/// Raw field or method row before visibility filtering and signature
/// resolution (class-level type parameters are only known after the class
/// attribute table, which follows the member tables).
struct RawMember {
    access: u16,
    name: String,
    descriptor: String,
    signature: Option<String>,
    exceptions: Vec<String>,
    deprecated_attr: bool,
    annotations: Vec<AnnotationInfo>,
    has_default: bool,
}

#[derive(Default)]
struct ClassAttributes {
    signature: Option<String>,
    deprecated_attr: bool,
    annotations: Vec<AnnotationInfo>,
    /// Access flags from this class's own InnerClasses entry, if nested.
    nested_access: Option<u16>,
}

/// Parse one class-file buffer.
///
/// Returns `Ok(None)` for declarations that cannot be part of an observable
/// API surface: module descriptors, synthetic types, and types that are
/// neither public nor protected.
pub fn parse_class(bytes: &[u8]) -> Result<Option<TypeDeclaration>, ParseError> {
    let mut cur = Cursor::new(bytes);

    let magic = cur.u32()?;
    if magic != MAGIC {
        return Err(ParseError::BadMagic { found: magic });
    }
    let _minor = cur.u16()?;
    let _major = cur.u16()?;

    let pool = ConstantPool::parse(&mut cur)?;

    let access = cur.u16()?;
    let this_class = cur.u16()?;
    let super_class = cur.u16()?;
    let binary_name = pool.class_name(this_class)?.to_string();
    let superclass = if super_class == 0 {
        None
    } else {
        Some(pool.class_name(super_class)?.to_string())
    };

    let interface_count = cur.u16()?;
    let mut interfaces = Vec::with_capacity(interface_count as usize);
    for _ in 0..interface_count {
        let idx = cur.u16()?;
        interfaces.push(pool.class_name(idx)?.to_string());
    }

    let raw_fields = parse_member_table(&mut cur, &pool)?;
    let raw_methods = parse_member_table(&mut cur, &pool)?;
    let class_attrs = parse_class_attributes(&mut cur, &pool, this_class)?;

    if access & (ACC_MODULE | ACC_SYNTHETIC) != 0 {
        return Ok(None);
    }

    // Nested types carry their source-level modifiers in InnerClasses;
    // the top-level access flags are widened by the compiler.
    let effective_access = class_attrs.nested_access.unwrap_or(access);
    let Some(visibility) = visibility_of(effective_access) else {
        return Ok(None);
    };

    let kind = if access & ACC_ANNOTATION != 0 {
        TypeKind::Annotation
    } else if access & ACC_INTERFACE != 0 {
        TypeKind::Interface
    } else if access & ACC_ENUM != 0 {
        TypeKind::Enum
    } else if superclass.as_deref() == Some("java/lang/Record") {
        TypeKind::Record
    } else {
        TypeKind::Class
    };

    let (signature, class_params) = match &class_attrs.signature {
        Some(text) => {
            let (sig, names) = parse_class_signature(text)?;
            (Some(sig), names)
        }
        None => (None, Vec::new()),
    };

    let mut members = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    for raw in raw_fields {
        if let Some(member) = build_member(raw, MemberTable::Fields, &class_params)? {
            record_member(&binary_name, &mut seen, &member)?;
            members.push(member);
        }
    }
    for raw in raw_methods {
        if let Some(member) = build_member(raw, MemberTable::Methods, &class_params)? {
            record_member(&binary_name, &mut seen, &member)?;
            members.push(member);
        }
    }

    Ok(Some(TypeDeclaration {
        binary_name,
        kind,
        modifiers: Modifiers {
            visibility,
            is_static: effective_access & ACC_STATIC != 0,
            is_final: effective_access & ACC_FINAL != 0,
            is_abstract: effective_access & ACC_ABSTRACT != 0,
        },
        superclass,
        interfaces,
        signature,
        annotations: annotation_set(&class_attrs.annotations),
        deprecation: deprecation_of(class_attrs.deprecated_attr, &class_attrs.annotations),
        members,
    }))
}

fn visibility_of(access: u16) -> Option<Visibility> {
    if access & ACC_PUBLIC != 0 {
        Some(Visibility::Public)
    } else if access & ACC_PROTECTED != 0 && access & ACC_PRIVATE == 0 {
        Some(Visibility::Protected)
    } else {
        None
    }
}

fn record_member(
    class: &str,
    seen: &mut HashSet<(String, String)>,
    member: &Member,
) -> Result<(), ParseError> {
    let key = (member.name.clone(), member.descriptor.to_string());
    if !seen.insert(key) {
        return Err(ParseError::DuplicateMember {
            class: class.to_string(),
            name: member.name.clone(),
            descriptor: member.descriptor.to_string(),
        });
    }
    Ok(())
}

enum MemberTable {
    Fields,
    Methods,
}

fn build_member(
    raw: RawMember,
    table: MemberTable,
    class_params: &[String],
) -> Result<Option<Member>, ParseError> {
    let Some(visibility) = visibility_of(raw.access) else {
        return Ok(None);
    };
    if raw.access & ACC_SYNTHETIC != 0 {
        return Ok(None);
    }

    let (kind, descriptor, signature) = match table {
        MemberTable::Fields => {
            let ty = parse_field_descriptor(&raw.descriptor)?;
            let sig = match &raw.signature {
                Some(text) => Some(MemberSignature::Field(parse_field_signature(
                    text,
                    class_params,
                )?)),
                None => None,
            };
            (MemberKind::Field, Descriptor::Field(ty), sig)
        }
        MemberTable::Methods => {
            // ACC_BRIDGE shares its bit with ACC_VOLATILE, so the check
            // only applies to the method table.
            if raw.access & ACC_BRIDGE != 0 {
                return Ok(None);
            }
            if raw.name == "<clinit>" {
                return Ok(None);
            }
            let desc = parse_method_descriptor(&raw.descriptor)?;
            let sig = match &raw.signature {
                Some(text) => Some(MemberSignature::Method(parse_method_signature(
                    text,
                    class_params,
                )?)),
                None => None,
            };
            let kind = if raw.name == "<init>" {
                MemberKind::Constructor
            } else {
                MemberKind::Method
            };
            (kind, Descriptor::Method(desc), sig)
        }
    };

    Ok(Some(Member {
        name: raw.name,
        kind,
        descriptor,
        modifiers: Modifiers {
            visibility,
            is_static: raw.access & ACC_STATIC != 0,
            is_final: raw.access & ACC_FINAL != 0,
            is_abstract: raw.access & ACC_ABSTRACT != 0,
        },
        throws: raw.exceptions.into_iter().collect(),
        signature,
        annotations: annotation_set(&raw.annotations),
        deprecation: deprecation_of(raw.deprecated_attr, &raw.annotations),
        has_default: raw.has_default,
    }))
}

fn annotation_set(annotations: &[AnnotationInfo]) -> BTreeSet<String> {
    annotations
        .iter()
        .filter(|a| a.type_name != DEPRECATED_ANNOTATION)
        .map(|a| a.type_name.clone())
        .collect()
}

fn deprecation_of(attr: bool, annotations: &[AnnotationInfo]) -> Option<Deprecation> {
    let ann = annotations
        .iter()
        .find(|a| a.type_name == DEPRECATED_ANNOTATION);
    if !attr && ann.is_none() {
        return None;
    }
    Some(Deprecation {
        since: ann.and_then(|a| a.since.clone()),
        for_removal: ann.is_some_and(|a| a.for_removal),
    })
}

fn parse_member_table(
    cur: &mut Cursor<'_>,
    pool: &ConstantPool,
) -> Result<Vec<RawMember>, ParseError> {
    let count = cur.u16()?;
    let mut members = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let access = cur.u16()?;
        let name = pool.utf8(cur.u16()?)?.to_string();
        let descriptor = pool.utf8(cur.u16()?)?.to_string();

        let mut member = RawMember {
            access,
            name,
            descriptor,
            signature: None,
            exceptions: Vec::new(),
            deprecated_attr: false,
            annotations: Vec::new(),
            has_default: false,
        };

        let attr_count = cur.u16()?;
        for _ in 0..attr_count {
            let attr_name = pool.utf8(cur.u16()?)?.to_string();
            let len = cur.u32()? as usize;
            let body = cur.bytes(len)?;
            let mut body_cur = Cursor::new(body);
            match attr_name.as_str() {
                "Signature" => {
                    member.signature = Some(pool.utf8(body_cur.u16()?)?.to_string());
                }
                "Exceptions" => {
                    let n = body_cur.u16()?;
                    for _ in 0..n {
                        let idx = body_cur.u16()?;
                        member.exceptions.push(pool.class_name(idx)?.to_string());
                    }
                }
                "Deprecated" => {
                    member.deprecated_attr = true;
                }
                "RuntimeVisibleAnnotations" => {
                    member.annotations = parse_annotations(&mut body_cur, pool)?;
                }
                "AnnotationDefault" => {
                    member.has_default = true;
                }
                _ => {}
            }
        }
        members.push(member);
    }
    Ok(members)
}

fn parse_class_attributes(
    cur: &mut Cursor<'_>,
    pool: &ConstantPool,
    this_class: u16,
) -> Result<ClassAttributes, ParseError> {
    let mut attrs = ClassAttributes::default();
    let count = cur.u16()?;
    for _ in 0..count {
        let attr_name = pool.utf8(cur.u16()?)?.to_string();
        let len = cur.u32()? as usize;
        let body = cur.bytes(len)?;
        let mut body_cur = Cursor::new(body);
        match attr_name.as_str() {
            "Signature" => {
                attrs.signature = Some(pool.utf8(body_cur.u16()?)?.to_string());
            }
            "Deprecated" => {
                attrs.deprecated_attr = true;
            }
            "RuntimeVisibleAnnotations" => {
                attrs.annotations = parse_annotations(&mut body_cur, pool)?;
            }
            "InnerClasses" => {
                let n = body_cur.u16()?;
                for _ in 0..n {
                    let inner_info = body_cur.u16()?;
                    let _outer_info = body_cur.u16()?;
                    let _inner_name = body_cur.u16()?;
                    let flags = body_cur.u16()?;
                    if inner_info == this_class {
                        attrs.nested_access = Some(flags);
                    }
                }
            }
            _ => {}
        }
    }
    Ok(attrs)
}

fn parse_annotations(
    cur: &mut Cursor<'_>,
    pool: &ConstantPool,
) -> Result<Vec<AnnotationInfo>, ParseError> {
    let count = cur.u16()?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        out.push(parse_annotation(cur, pool)?);
    }
    Ok(out)
}

fn parse_annotation(
    cur: &mut Cursor<'_>,
    pool: &ConstantPool,
) -> Result<AnnotationInfo, ParseError> {
    let type_desc = pool.utf8(cur.u16()?)?.to_string();
    let type_name = type_desc
        .strip_prefix('L')
        .and_then(|s| s.strip_suffix(';'))
        .ok_or_else(|| ParseError::BadDescriptor {
            text: type_desc.clone(),
            reason: "annotation type is not an object type".to_string(),
        })?
        .to_string();

    let mut info = AnnotationInfo {
        type_name,
        since: None,
        for_removal: false,
    };

    let pairs = cur.u16()?;
    for _ in 0..pairs {
        let name = pool.utf8(cur.u16()?)?.to_string();
        let value = parse_element_value(cur, pool)?;
        if info.type_name == DEPRECATED_ANNOTATION {
            match (name.as_str(), value) {
                ("since", Some(('s', idx))) => {
                    info.since = Some(pool.utf8(idx)?.to_string());
                }
                ("forRemoval", Some(('Z', idx))) => {
                    info.for_removal = pool.integer(idx)? != 0;
                }
                _ => {}
            }
        }
    }
    Ok(info)
}

/// Consume one element_value, returning (tag, pool index) for single-constant
/// values and `None` for compound ones.
fn parse_element_value(
    cur: &mut Cursor<'_>,
    pool: &ConstantPool,
) -> Result<Option<(char, u16)>, ParseError> {
    let tag = cur.u8()? as char;
    match tag {
        'B' | 'C' | 'D' | 'F' | 'I' | 'J' | 'S' | 'Z' | 's' => {
            let idx = cur.u16()?;
            Ok(Some((tag, idx)))
        }
        'e' => {
            cur.skip(4)?;
            Ok(None)
        }
        'c' => {
            cur.skip(2)?;
            Ok(None)
        }
        '@' => {
            parse_annotation(cur, pool)?;
            Ok(None)
        }
        '[' => {
            let n = cur.u16()?;
            for _ in 0..n {
                parse_element_value(cur, pool)?;
            }
            Ok(None)
        }
        other => Err(ParseError::BadDescriptor {
            text: other.to_string(),
            reason: "unknown element_value tag".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classbuilder::{AnnotationSpec, ClassBuilder, MemberSpec};
    use crate::descriptor::{BaseType, FieldType};

    #[test]
    fn rejects_bad_magic() {
        let bytes = [0u8; 16];
        assert!(matches!(
            parse_class(&bytes),
            Err(ParseError::BadMagic { found: 0 })
        ));
    }

    #[test]
    fn rejects_truncated_buffer() {
        let full = ClassBuilder::new("com/example/Foo").build();
        // Every prefix must fail structural validation, whatever table the
        // cut lands in.
        for len in [8, full.len() / 2, full.len() - 1] {
            assert!(parse_class(&full[..len]).is_err(), "prefix of {} bytes", len);
        }
    }

    #[test]
    fn parses_minimal_public_class() {
        let bytes = ClassBuilder::new("com/example/Foo").build();
        let decl = parse_class(&bytes).unwrap().expect("public class kept");
        assert_eq!(decl.binary_name, "com/example/Foo");
        assert_eq!(decl.kind, TypeKind::Class);
        assert_eq!(decl.superclass.as_deref(), Some("java/lang/Object"));
        assert_eq!(decl.modifiers.visibility, Visibility::Public);
        assert!(decl.members.is_empty());
    }

    #[test]
    fn package_private_class_excluded() {
        let bytes = ClassBuilder::new("com/example/Hidden")
            .access(0x0020)
            .build();
        assert!(parse_class(&bytes).unwrap().is_none());
    }

    #[test]
    fn module_info_excluded() {
        let bytes = ClassBuilder::new("module-info")
            .access(ACC_MODULE)
            .superclass(None)
            .build();
        assert!(parse_class(&bytes).unwrap().is_none());
    }

    #[test]
    fn nested_protected_visibility_comes_from_inner_classes() {
        let bytes = ClassBuilder::new("com/example/Outer$Inner")
            .access(ACC_PUBLIC | 0x0020)
            .inner_flags(ACC_PROTECTED | ACC_STATIC)
            .build();
        let decl = parse_class(&bytes).unwrap().expect("protected nested kept");
        assert_eq!(decl.modifiers.visibility, Visibility::Protected);
        assert!(decl.modifiers.is_static);
    }

    #[test]
    fn nested_private_excluded_via_inner_classes() {
        let bytes = ClassBuilder::new("com/example/Outer$Secret")
            .access(ACC_PUBLIC | 0x0020)
            .inner_flags(ACC_PRIVATE)
            .build();
        assert!(parse_class(&bytes).unwrap().is_none());
    }

    #[test]
    fn interface_enum_annotation_kinds_detected() {
        let iface = ClassBuilder::new("com/example/I")
            .access(ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT)
            .build();
        assert_eq!(parse_class(&iface).unwrap().unwrap().kind, TypeKind::Interface);

        let en = ClassBuilder::new("com/example/E")
            .access(ACC_PUBLIC | ACC_ENUM | 0x0020)
            .superclass(Some("java/lang/Enum"))
            .build();
        assert_eq!(parse_class(&en).unwrap().unwrap().kind, TypeKind::Enum);

        let ann = ClassBuilder::new("com/example/A")
            .access(ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT | ACC_ANNOTATION)
            .build();
        assert_eq!(parse_class(&ann).unwrap().unwrap().kind, TypeKind::Annotation);

        let rec = ClassBuilder::new("com/example/R")
            .access(ACC_PUBLIC | ACC_FINAL | 0x0020)
            .superclass(Some("java/lang/Record"))
            .build();
        assert_eq!(parse_class(&rec).unwrap().unwrap().kind, TypeKind::Record);
    }

    #[test]
    fn private_and_package_members_excluded() {
        let bytes = ClassBuilder::new("com/example/Foo")
            .field(MemberSpec::new("secret", "I", ACC_PRIVATE))
            .field(MemberSpec::new("local", "I", 0))
            .field(MemberSpec::new("open", "I", ACC_PUBLIC))
            .method(MemberSpec::new("helper", "()V", ACC_PRIVATE))
            .method(MemberSpec::new("api", "()V", ACC_PUBLIC))
            .build();
        let decl = parse_class(&bytes).unwrap().unwrap();
        let names: Vec<&str> = decl.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["open", "api"]);
    }

    #[test]
    fn synthetic_and_bridge_members_excluded() {
        let bytes = ClassBuilder::new("com/example/Foo")
            .method(MemberSpec::new(
                "compareTo",
                "(Ljava/lang/Object;)I",
                ACC_PUBLIC | ACC_BRIDGE,
            ))
            .method(MemberSpec::new("lambda$0", "()V", ACC_PUBLIC | ACC_SYNTHETIC))
            .method(MemberSpec::new("real", "()V", ACC_PUBLIC))
            .build();
        let decl = parse_class(&bytes).unwrap().unwrap();
        let names: Vec<&str> = decl.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["real"]);
    }

    #[test]
    fn volatile_field_is_not_mistaken_for_bridge() {
        // ACC_VOLATILE and ACC_BRIDGE share 0x0040.
        let bytes = ClassBuilder::new("com/example/Foo")
            .field(MemberSpec::new("cache", "I", ACC_PUBLIC | 0x0040))
            .build();
        let decl = parse_class(&bytes).unwrap().unwrap();
        assert_eq!(decl.members.len(), 1);
    }

    #[test]
    fn constructor_and_static_initializer_kinds() {
        let bytes = ClassBuilder::new("com/example/Foo")
            .method(MemberSpec::new("<init>", "()V", ACC_PUBLIC))
            .method(MemberSpec::new("<clinit>", "()V", ACC_STATIC | ACC_PUBLIC))
            .build();
        let decl = parse_class(&bytes).unwrap().unwrap();
        assert_eq!(decl.members.len(), 1);
        assert_eq!(decl.members[0].kind, MemberKind::Constructor);
    }

    #[test]
    fn descriptor_parsed_structurally() {
        let bytes = ClassBuilder::new("com/example/Foo")
            .method(MemberSpec::new(
                "lookup",
                "(Ljava/lang/String;)Ljava/util/List;",
                ACC_PUBLIC,
            ))
            .build();
        let decl = parse_class(&bytes).unwrap().unwrap();
        let Descriptor::Method(desc) = &decl.members[0].descriptor else {
            panic!("expected method descriptor");
        };
        assert_eq!(
            desc.params,
            vec![FieldType::Object("java/lang/String".to_string())]
        );
        assert_eq!(
            desc.ret,
            Some(FieldType::Object("java/util/List".to_string()))
        );
    }

    #[test]
    fn exceptions_attribute_collected() {
        let bytes = ClassBuilder::new("com/example/Foo")
            .method(
                MemberSpec::new("read", "()I", ACC_PUBLIC).throws("java/io/IOException"),
            )
            .build();
        let decl = parse_class(&bytes).unwrap().unwrap();
        assert!(decl.members[0].throws.contains("java/io/IOException"));
    }

    #[test]
    fn deprecation_via_attribute() {
        let bytes = ClassBuilder::new("com/example/Foo")
            .method(MemberSpec::new("old", "()V", ACC_PUBLIC).deprecated_attr())
            .build();
        let decl = parse_class(&bytes).unwrap().unwrap();
        let dep = decl.members[0].deprecation.as_ref().unwrap();
        assert_eq!(dep.since, None);
        assert!(!dep.for_removal);
    }

    #[test]
    fn deprecation_via_annotation_with_elements() {
        let bytes = ClassBuilder::new("com/example/Foo")
            .method(
                MemberSpec::new("old", "()V", ACC_PUBLIC)
                    .annotation(AnnotationSpec::deprecated(Some("2.1"), true)),
            )
            .build();
        let decl = parse_class(&bytes).unwrap().unwrap();
        let dep = decl.members[0].deprecation.as_ref().unwrap();
        assert_eq!(dep.since.as_deref(), Some("2.1"));
        assert!(dep.for_removal);
        // Deprecated is modeled as state, not as a plain annotation.
        assert!(decl.members[0].annotations.is_empty());
    }

    #[test]
    fn marker_annotations_collected() {
        let bytes = ClassBuilder::new("com/example/Foo")
            .method(
                MemberSpec::new("run", "()V", ACC_PUBLIC)
                    .annotation(AnnotationSpec::marker("Lcom/example/Experimental;")),
            )
            .build();
        let decl = parse_class(&bytes).unwrap().unwrap();
        assert!(decl.members[0]
            .annotations
            .contains("com/example/Experimental"));
    }

    #[test]
    fn annotation_default_presence_recorded() {
        let bytes = ClassBuilder::new("com/example/Opts")
            .access(ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT | ACC_ANNOTATION)
            .method(
                MemberSpec::new("value", "()Ljava/lang/String;", ACC_PUBLIC | ACC_ABSTRACT)
                    .with_default(),
            )
            .build();
        let decl = parse_class(&bytes).unwrap().unwrap();
        assert!(decl.members[0].has_default);
    }

    #[test]
    fn generic_signatures_resolved_against_class_scope() {
        let bytes = ClassBuilder::new("com/example/Box")
            .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
            .method(MemberSpec::new("get", "()Ljava/lang/Object;", ACC_PUBLIC).signature("()TT;"))
            .build();
        let decl = parse_class(&bytes).unwrap().unwrap();
        assert!(decl.signature.is_some());
        let Some(MemberSignature::Method(sig)) = &decl.members[0].signature else {
            panic!("expected method signature");
        };
        use crate::signature::{TypeSig, VarRef};
        assert_eq!(sig.ret, Some(TypeSig::Var(VarRef::Class(0))));
    }

    #[test]
    fn duplicate_member_rejected() {
        let bytes = ClassBuilder::new("com/example/Foo")
            .field(MemberSpec::new("x", "I", ACC_PUBLIC))
            .field(MemberSpec::new("x", "I", ACC_PUBLIC))
            .build();
        assert!(matches!(
            parse_class(&bytes),
            Err(ParseError::DuplicateMember { .. })
        ));
    }

    #[test]
    fn field_descriptor_is_field_type() {
        let bytes = ClassBuilder::new("com/example/Foo")
            .field(MemberSpec::new("count", "I", ACC_PUBLIC | ACC_STATIC | ACC_FINAL))
            .build();
        let decl = parse_class(&bytes).unwrap().unwrap();
        let m = &decl.members[0];
        assert_eq!(m.kind, MemberKind::Field);
        assert_eq!(
            m.descriptor,
            Descriptor::Field(FieldType::Base(BaseType::Int))
        );
        assert!(m.modifiers.is_static);
        assert!(m.modifiers.is_final);
    }
}
