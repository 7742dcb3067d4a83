//! Structural field and method descriptors.
//!
//! Descriptors are parsed into trees and compared by value, never as
//! display strings. The member identity key (name, descriptor) is built
//! on these trees, so member alignment during diffing is a pure set
//! difference over structural types.

use std::fmt;

use serde::Serializer;

use crate::error::ParseError;

/// A primitive type as encoded in a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    fn from_char(c: char) -> Option<BaseType> {
        Some(match c {
            'B' => BaseType::Byte,
            'C' => BaseType::Char,
            'D' => BaseType::Double,
            'F' => BaseType::Float,
            'I' => BaseType::Int,
            'J' => BaseType::Long,
            'S' => BaseType::Short,
            'Z' => BaseType::Boolean,
            _ => return None,
        })
    }

    fn as_char(self) -> char {
        match self {
            BaseType::Byte => 'B',
            BaseType::Char => 'C',
            BaseType::Double => 'D',
            BaseType::Float => 'F',
            BaseType::Int => 'I',
            BaseType::Long => 'J',
            BaseType::Short => 'S',
            BaseType::Boolean => 'Z',
        }
    }
}

/// The type of a field, parameter, or return value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldType {
    Base(BaseType),
    /// A reference type, by binary name (e.g. `java/lang/String`).
    Object(String),
    Array(Box<FieldType>),
}

impl FieldType {
    /// Binary name of the type if it is a plain reference type.
    pub fn object_name(&self) -> Option<&str> {
        match self {
            FieldType::Object(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Base(b) => write!(f, "{}", b.as_char()),
            FieldType::Object(name) => write!(f, "L{};", name),
            FieldType::Array(elem) => write!(f, "[{}", elem),
        }
    }
}

impl serde::Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A method's parameter and return types. `ret` is `None` for void.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MethodDescriptor {
    pub params: Vec<FieldType>,
    pub ret: Option<FieldType>,
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for p in &self.params {
            write!(f, "{}", p)?;
        }
        write!(f, ")")?;
        match &self.ret {
            Some(t) => write!(f, "{}", t),
            None => write!(f, "V"),
        }
    }
}

impl serde::Serialize for MethodDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Either kind of descriptor; the structural half of a member identity key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Descriptor {
    Field(FieldType),
    Method(MethodDescriptor),
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Field(t) => write!(f, "{}", t),
            Descriptor::Method(m) => write!(f, "{}", m),
        }
    }
}

impl serde::Serialize for Descriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn bad(text: &str, reason: impl Into<String>) -> ParseError {
    ParseError::BadDescriptor {
        text: text.to_string(),
        reason: reason.into(),
    }
}

/// Parse one field type starting at `pos`, advancing `pos` past it.
fn parse_field_type(text: &str, chars: &[char], pos: &mut usize) -> Result<FieldType, ParseError> {
    let Some(&c) = chars.get(*pos) else {
        return Err(bad(text, "unexpected end of descriptor"));
    };
    *pos += 1;

    if let Some(base) = BaseType::from_char(c) {
        return Ok(FieldType::Base(base));
    }
    match c {
        '[' => {
            let elem = parse_field_type(text, chars, pos)?;
            Ok(FieldType::Array(Box::new(elem)))
        }
        'L' => {
            let start = *pos;
            while *pos < chars.len() && chars[*pos] != ';' {
                *pos += 1;
            }
            if *pos >= chars.len() {
                return Err(bad(text, "unterminated object type"));
            }
            let name: String = chars[start..*pos].iter().collect();
            *pos += 1;
            if name.is_empty() {
                return Err(bad(text, "empty object type name"));
            }
            Ok(FieldType::Object(name))
        }
        other => Err(bad(text, format!("unexpected character '{}'", other))),
    }
}

/// Parse a field descriptor such as `Ljava/lang/String;` or `[I`.
pub fn parse_field_descriptor(text: &str) -> Result<FieldType, ParseError> {
    let chars: Vec<char> = text.chars().collect();
    let mut pos = 0;
    let ty = parse_field_type(text, &chars, &mut pos)?;
    if pos != chars.len() {
        return Err(bad(text, "trailing characters"));
    }
    Ok(ty)
}

/// Parse a method descriptor such as `(ILjava/lang/String;)V`.
pub fn parse_method_descriptor(text: &str) -> Result<MethodDescriptor, ParseError> {
    let chars: Vec<char> = text.chars().collect();
    let mut pos = 0;
    if chars.first() != Some(&'(') {
        return Err(bad(text, "expected '('"));
    }
    pos += 1;
    let mut params = Vec::new();
    while chars.get(pos).is_some_and(|&c| c != ')') {
        params.push(parse_field_type(text, &chars, &mut pos)?);
    }
    if chars.get(pos) != Some(&')') {
        return Err(bad(text, "unterminated parameter list"));
    }
    pos += 1;
    let ret = if chars.get(pos) == Some(&'V') {
        pos += 1;
        None
    } else {
        Some(parse_field_type(text, &chars, &mut pos)?)
    };
    if pos != chars.len() {
        return Err(bad(text, "trailing characters"));
    }
    Ok(MethodDescriptor { params, ret })
}
