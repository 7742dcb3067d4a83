//! Structural generic signatures.
//!
//! Signature attributes are parsed into trees, not compared as strings.
//! Type variables are resolved against the declaring scope at parse time
//! and canonicalized to (scope, index) references, so renaming a type
//! parameter alone produces a structurally identical signature. Variables
//! declared by an enclosing class stay free and compare by name.

use serde::Serialize;

use crate::error::ParseError;

/// A canonicalized type-variable reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum VarRef {
    /// Index into the declaring class's type-parameter list.
    Class(u16),
    /// Index into the declaring method's type-parameter list.
    Method(u16),
    /// Declared by an enclosing scope not visible here; compared by name.
    Free(String),
}

/// One type argument inside `<...>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeArg {
    /// The unbounded wildcard `*`.
    Any,
    /// `+` upper-bounded wildcard.
    Extends(Box<TypeSig>),
    /// `-` lower-bounded wildcard.
    Super(Box<TypeSig>),
    Exact(Box<TypeSig>),
}

/// A parameterized reference type, with the `.Inner<...>` suffix chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassTypeSig {
    /// Binary name of the outermost class in the chain.
    pub name: String,
    pub args: Vec<TypeArg>,
    /// Inner-class suffixes: simple name plus its own type arguments.
    pub inner: Vec<(String, Vec<TypeArg>)>,
}

/// Any type position inside a signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeSig {
    /// Primitive, encoded by its descriptor character.
    Base(char),
    Class(ClassTypeSig),
    Var(VarRef),
    Array(Box<TypeSig>),
}

/// A declared type parameter: bounds only, name erased by canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeParam {
    pub class_bound: Option<TypeSig>,
    pub iface_bounds: Vec<TypeSig>,
}

/// Parsed `Signature` attribute of a class declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassSignature {
    pub type_params: Vec<TypeParam>,
    pub superclass: ClassTypeSig,
    pub interfaces: Vec<ClassTypeSig>,
}

/// Parsed `Signature` attribute of a method declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSignature {
    pub type_params: Vec<TypeParam>,
    pub params: Vec<TypeSig>,
    /// `None` for void.
    pub ret: Option<TypeSig>,
    pub throws: Vec<TypeSig>,
}

/// Pre-scan the names declared in a leading `<...>` type-parameter list.
///
/// Names must be known before any bound is parsed because bounds may
/// reference parameters declared later in the same list.
fn scan_param_names(chars: &[char]) -> Vec<String> {
    let mut names = Vec::new();
    if chars.first() != Some(&'<') {
        return names;
    }
    let mut pos = 1;
    let mut depth = 1;
    let mut at_name = true;
    while pos < chars.len() && depth > 0 {
        if at_name && depth == 1 {
            let start = pos;
            while pos < chars.len() && chars[pos] != ':' {
                pos += 1;
            }
            names.push(chars[start..pos].iter().collect());
            at_name = false;
            continue;
        }
        match chars[pos] {
            '<' => depth += 1,
            '>' => depth -= 1,
            // A bound's terminating ';' at depth 1; a following character
            // other than ':' (next bound) or '>' (list end) starts a name.
            ';' if depth == 1 => {
                if chars.get(pos + 1).is_some_and(|&n| n != ':' && n != '>') {
                    at_name = true;
                }
            }
            _ => {}
        }
        pos += 1;
    }
    names
}

struct SigParser<'a> {
    text: &'a str,
    chars: Vec<char>,
    pos: usize,
    class_params: &'a [String],
    method_params: Vec<String>,
}

impl<'a> SigParser<'a> {
    fn new(text: &'a str, class_params: &'a [String]) -> Self {
        SigParser {
            text,
            chars: text.chars().collect(),
            pos: 0,
            class_params,
            method_params: Vec::new(),
        }
    }

    fn err(&self, reason: impl Into<String>) -> ParseError {
        ParseError::BadSignature {
            text: self.text.to_string(),
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn next(&mut self) -> Result<char, ParseError> {
        let c = self.peek().ok_or_else(|| self.err("unexpected end"))?;
        self.pos += 1;
        Ok(c)
    }

    fn expect(&mut self, want: char) -> Result<(), ParseError> {
        let got = self.next()?;
        if got != want {
            return Err(self.err(format!("expected '{}', found '{}'", want, got)));
        }
        Ok(())
    }

    fn identifier(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| !matches!(c, '.' | ';' | '[' | '/' | '<' | '>' | ':'))
        {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.err("empty identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn resolve_var(&self, name: &str) -> VarRef {
        if let Some(i) = self.method_params.iter().position(|p| p == name) {
            return VarRef::Method(i as u16);
        }
        if let Some(i) = self.class_params.iter().position(|p| p == name) {
            return VarRef::Class(i as u16);
        }
        VarRef::Free(name.to_string())
    }

    /// `<` TypeParameter+ `>`. Names were pre-registered by
    /// [`scan_param_names`]; this consumes the list and parses bounds.
    fn type_params(&mut self) -> Result<Vec<TypeParam>, ParseError> {
        if self.peek() != Some('<') {
            return Ok(Vec::new());
        }
        self.pos += 1;
        let mut params = Vec::new();
        loop {
            self.identifier()?;
            self.expect(':')?;
            let class_bound = match self.peek() {
                Some(':') | Some('>') => None,
                _ => Some(self.type_sig()?),
            };
            let mut iface_bounds = Vec::new();
            while self.peek() == Some(':') {
                self.pos += 1;
                iface_bounds.push(self.type_sig()?);
            }
            params.push(TypeParam {
                class_bound,
                iface_bounds,
            });
            match self.peek() {
                Some('>') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => continue,
                None => return Err(self.err("unterminated type parameter list")),
            }
        }
        Ok(params)
    }

    fn type_args(&mut self) -> Result<Vec<TypeArg>, ParseError> {
        if self.peek() != Some('<') {
            return Ok(Vec::new());
        }
        self.pos += 1;
        let mut args = Vec::new();
        while self.peek() != Some('>') {
            let arg = match self.peek() {
                Some('*') => {
                    self.pos += 1;
                    TypeArg::Any
                }
                Some('+') => {
                    self.pos += 1;
                    TypeArg::Extends(Box::new(self.type_sig()?))
                }
                Some('-') => {
                    self.pos += 1;
                    TypeArg::Super(Box::new(self.type_sig()?))
                }
                Some(_) => TypeArg::Exact(Box::new(self.type_sig()?)),
                None => return Err(self.err("unterminated type arguments")),
            };
            args.push(arg);
        }
        self.pos += 1;
        Ok(args)
    }

    fn class_type_sig(&mut self) -> Result<ClassTypeSig, ParseError> {
        self.expect('L')?;
        let mut name = String::new();
        loop {
            let seg = self.identifier()?;
            if !name.is_empty() {
                name.push('/');
            }
            name.push_str(&seg);
            if self.peek() == Some('/') {
                self.pos += 1;
                continue;
            }
            break;
        }
        let args = self.type_args()?;
        let mut inner = Vec::new();
        while self.peek() == Some('.') {
            self.pos += 1;
            let seg = self.identifier()?;
            let seg_args = self.type_args()?;
            inner.push((seg, seg_args));
        }
        self.expect(';')?;
        Ok(ClassTypeSig { name, args, inner })
    }

    fn type_sig(&mut self) -> Result<TypeSig, ParseError> {
        match self.peek() {
            Some('L') => Ok(TypeSig::Class(self.class_type_sig()?)),
            Some('T') => {
                self.pos += 1;
                let name = self.identifier()?;
                self.expect(';')?;
                Ok(TypeSig::Var(self.resolve_var(&name)))
            }
            Some('[') => {
                self.pos += 1;
                Ok(TypeSig::Array(Box::new(self.type_sig()?)))
            }
            Some(c) if "BCDFIJSZ".contains(c) => {
                self.pos += 1;
                Ok(TypeSig::Base(c))
            }
            Some(c) => Err(self.err(format!("unexpected character '{}'", c))),
            None => Err(self.err("unexpected end")),
        }
    }

    fn finish(&self) -> Result<(), ParseError> {
        if self.pos != self.chars.len() {
            return Err(self.err("trailing characters"));
        }
        Ok(())
    }
}

/// Parse a class `Signature` attribute. Returns the structural signature
/// plus the declared type-parameter names, which callers feed back in when
/// parsing member signatures of the same class.
pub fn parse_class_signature(text: &str) -> Result<(ClassSignature, Vec<String>), ParseError> {
    let chars: Vec<char> = text.chars().collect();
    let names = scan_param_names(&chars);

    let mut p = SigParser::new(text, &names);
    let type_params = p.type_params()?;
    let superclass = p.class_type_sig()?;
    let mut interfaces = Vec::new();
    while p.peek().is_some() {
        interfaces.push(p.class_type_sig()?);
    }
    p.finish()?;
    Ok((
        ClassSignature {
            type_params,
            superclass,
            interfaces,
        },
        names,
    ))
}

/// Parse a method `Signature` attribute against the declaring class's
/// type-parameter names. The method's own parameters shadow the class's.
pub fn parse_method_signature(
    text: &str,
    class_params: &[String],
) -> Result<MethodSignature, ParseError> {
    let chars: Vec<char> = text.chars().collect();
    let method_names = scan_param_names(&chars);

    let mut p = SigParser::new(text, class_params);
    p.method_params = method_names;
    let type_params = p.type_params()?;
    p.expect('(')?;
    let mut params = Vec::new();
    while p.peek().is_some_and(|c| c != ')') {
        params.push(p.type_sig()?);
    }
    p.expect(')')?;
    let ret = if p.peek() == Some('V') {
        p.pos += 1;
        None
    } else {
        Some(p.type_sig()?)
    };
    let mut throws = Vec::new();
    while p.peek() == Some('^') {
        p.pos += 1;
        throws.push(p.type_sig()?);
    }
    p.finish()?;
    Ok(MethodSignature {
        type_params,
        params,
        ret,
        throws,
    })
}

/// Parse a field `Signature` attribute against the declaring class's
/// type-parameter names.
pub fn parse_field_signature(
    text: &str,
    class_params: &[String],
) -> Result<TypeSig, ParseError> {
    let mut p = SigParser::new(text, class_params);
    let sig = p.type_sig()?;
    p.finish()?;
    Ok(sig)
}
