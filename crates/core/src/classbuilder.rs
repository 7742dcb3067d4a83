//! Test-only synthesizer of minimal class-file buffers.
//!
//! Produces structurally valid class files with exactly the tables and
//! attributes the reader consumes, so tests can exercise the pipeline
//! without fixture files on disk.

use std::collections::HashMap;

const ACC_PUBLIC: u16 = 0x0001;

pub struct PoolBuilder {
    entries: Vec<Vec<u8>>,
    utf8_cache: HashMap<String, u16>,
    class_cache: HashMap<String, u16>,
}

impl PoolBuilder {
    pub fn new() -> Self {
        PoolBuilder {
            entries: Vec::new(),
            utf8_cache: HashMap::new(),
            class_cache: HashMap::new(),
        }
    }

    pub fn utf8(&mut self, text: &str) -> u16 {
        if let Some(&idx) = self.utf8_cache.get(text) {
            return idx;
        }
        let mut entry = vec![1u8];
        entry.extend_from_slice(&(text.len() as u16).to_be_bytes());
        entry.extend_from_slice(text.as_bytes());
        self.entries.push(entry);
        let idx = self.entries.len() as u16;
        self.utf8_cache.insert(text.to_string(), idx);
        idx
    }

    pub fn class(&mut self, name: &str) -> u16 {
        if let Some(&idx) = self.class_cache.get(name) {
            return idx;
        }
        let name_idx = self.utf8(name);
        let mut entry = vec![7u8];
        entry.extend_from_slice(&name_idx.to_be_bytes());
        self.entries.push(entry);
        let idx = self.entries.len() as u16;
        self.class_cache.insert(name.to_string(), idx);
        idx
    }

    pub fn integer(&mut self, value: i32) -> u16 {
        let mut entry = vec![3u8];
        entry.extend_from_slice(&value.to_be_bytes());
        self.entries.push(entry);
        self.entries.len() as u16
    }

    fn emit(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&((self.entries.len() + 1) as u16).to_be_bytes());
        for e in &self.entries {
            out.extend_from_slice(e);
        }
    }
}

/// One annotation element value the builder can express.
pub enum ElemSpec {
    Str(String),
    Bool(bool),
}

pub struct AnnotationSpec {
    pub type_desc: String,
    pub pairs: Vec<(String, ElemSpec)>,
}

impl AnnotationSpec {
    pub fn marker(type_desc: &str) -> Self {
        AnnotationSpec {
            type_desc: type_desc.to_string(),
            pairs: Vec::new(),
        }
    }

    pub fn deprecated(since: Option<&str>, for_removal: bool) -> Self {
        let mut pairs = Vec::new();
        if let Some(s) = since {
            pairs.push(("since".to_string(), ElemSpec::Str(s.to_string())));
        }
        if for_removal {
            pairs.push(("forRemoval".to_string(), ElemSpec::Bool(true)));
        }
        AnnotationSpec {
            type_desc: "Ljava/lang/Deprecated;".to_string(),
            pairs,
        }
    }

    fn emit(&self, pool: &mut PoolBuilder, out: &mut Vec<u8>) {
        out.extend_from_slice(&pool.utf8(&self.type_desc).to_be_bytes());
        out.extend_from_slice(&(self.pairs.len() as u16).to_be_bytes());
        for (name, value) in &self.pairs {
            out.extend_from_slice(&pool.utf8(name).to_be_bytes());
            match value {
                ElemSpec::Str(s) => {
                    out.push(b's');
                    out.extend_from_slice(&pool.utf8(s).to_be_bytes());
                }
                ElemSpec::Bool(b) => {
                    out.push(b'Z');
                    let idx = pool.integer(if *b { 1 } else { 0 });
                    out.extend_from_slice(&idx.to_be_bytes());
                }
            }
        }
    }
}

pub struct MemberSpec {
    pub name: String,
    pub descriptor: String,
    pub access: u16,
    pub signature: Option<String>,
    pub exceptions: Vec<String>,
    pub deprecated_attr: bool,
    pub annotations: Vec<AnnotationSpec>,
    pub has_default: bool,
}

impl MemberSpec {
    pub fn new(name: &str, descriptor: &str, access: u16) -> Self {
        MemberSpec {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            access,
            signature: None,
            exceptions: Vec::new(),
            deprecated_attr: false,
            annotations: Vec::new(),
            has_default: false,
        }
    }

    pub fn signature(mut self, sig: &str) -> Self {
        self.signature = Some(sig.to_string());
        self
    }

    pub fn throws(mut self, exception: &str) -> Self {
        self.exceptions.push(exception.to_string());
        self
    }

    pub fn deprecated_attr(mut self) -> Self {
        self.deprecated_attr = true;
        self
    }

    pub fn annotation(mut self, spec: AnnotationSpec) -> Self {
        self.annotations.push(spec);
        self
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    fn emit(&self, pool: &mut PoolBuilder, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.access.to_be_bytes());
        out.extend_from_slice(&pool.utf8(&self.name).to_be_bytes());
        out.extend_from_slice(&pool.utf8(&self.descriptor).to_be_bytes());

        let mut attrs: Vec<(u16, Vec<u8>)> = Vec::new();
        if let Some(sig) = &self.signature {
            let sig_idx = pool.utf8(sig);
            let name_idx = pool.utf8("Signature");
            attrs.push((name_idx, sig_idx.to_be_bytes().to_vec()));
        }
        if !self.exceptions.is_empty() {
            let mut body = Vec::new();
            body.extend_from_slice(&(self.exceptions.len() as u16).to_be_bytes());
            for e in &self.exceptions {
                let idx = pool.class(e);
                body.extend_from_slice(&idx.to_be_bytes());
            }
            let name_idx = pool.utf8("Exceptions");
            attrs.push((name_idx, body));
        }
        if self.deprecated_attr {
            let name_idx = pool.utf8("Deprecated");
            attrs.push((name_idx, Vec::new()));
        }
        if !self.annotations.is_empty() {
            let mut body = Vec::new();
            body.extend_from_slice(&(self.annotations.len() as u16).to_be_bytes());
            for a in &self.annotations {
                a.emit(pool, &mut body);
            }
            let name_idx = pool.utf8("RuntimeVisibleAnnotations");
            attrs.push((name_idx, body));
        }
        if self.has_default {
            // Minimal default: the string "".
            let mut body = Vec::new();
            body.push(b's');
            let idx = pool.utf8("");
            body.extend_from_slice(&idx.to_be_bytes());
            let name_idx = pool.utf8("AnnotationDefault");
            attrs.push((name_idx, body));
        }

        out.extend_from_slice(&(attrs.len() as u16).to_be_bytes());
        for (name_idx, body) in attrs {
            out.extend_from_slice(&name_idx.to_be_bytes());
            out.extend_from_slice(&(body.len() as u32).to_be_bytes());
            out.extend_from_slice(&body);
        }
    }
}

pub struct ClassBuilder {
    pub name: String,
    pub access: u16,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub signature: Option<String>,
    pub deprecated_attr: bool,
    pub annotations: Vec<AnnotationSpec>,
    /// InnerClasses self-entry access flags, for nested-type visibility.
    pub inner_flags: Option<u16>,
    pub fields: Vec<MemberSpec>,
    pub methods: Vec<MemberSpec>,
}

impl ClassBuilder {
    pub fn new(name: &str) -> Self {
        ClassBuilder {
            name: name.to_string(),
            access: ACC_PUBLIC | 0x0020,
            superclass: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            signature: None,
            deprecated_attr: false,
            annotations: Vec::new(),
            inner_flags: None,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn access(mut self, access: u16) -> Self {
        self.access = access;
        self
    }

    pub fn superclass(mut self, name: Option<&str>) -> Self {
        self.superclass = name.map(str::to_string);
        self
    }

    pub fn interface(mut self, name: &str) -> Self {
        self.interfaces.push(name.to_string());
        self
    }

    pub fn signature(mut self, sig: &str) -> Self {
        self.signature = Some(sig.to_string());
        self
    }

    pub fn deprecated_attr(mut self) -> Self {
        self.deprecated_attr = true;
        self
    }

    pub fn annotation(mut self, spec: AnnotationSpec) -> Self {
        self.annotations.push(spec);
        self
    }

    pub fn inner_flags(mut self, flags: u16) -> Self {
        self.inner_flags = Some(flags);
        self
    }

    pub fn field(mut self, spec: MemberSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn method(mut self, spec: MemberSpec) -> Self {
        self.methods.push(spec);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut pool = PoolBuilder::new();

        let this_idx = pool.class(&self.name);
        let super_idx = self.superclass.as_deref().map(|s| pool.class(s));
        let iface_idxs: Vec<u16> = self.interfaces.iter().map(|i| pool.class(i)).collect();

        let mut fields_bytes = Vec::new();
        fields_bytes.extend_from_slice(&(self.fields.len() as u16).to_be_bytes());
        for f in &self.fields {
            f.emit(&mut pool, &mut fields_bytes);
        }
        let mut methods_bytes = Vec::new();
        methods_bytes.extend_from_slice(&(self.methods.len() as u16).to_be_bytes());
        for m in &self.methods {
            m.emit(&mut pool, &mut methods_bytes);
        }

        let mut attrs: Vec<(u16, Vec<u8>)> = Vec::new();
        if let Some(sig) = &self.signature {
            let sig_idx = pool.utf8(sig);
            let name_idx = pool.utf8("Signature");
            attrs.push((name_idx, sig_idx.to_be_bytes().to_vec()));
        }
        if self.deprecated_attr {
            let name_idx = pool.utf8("Deprecated");
            attrs.push((name_idx, Vec::new()));
        }
        if !self.annotations.is_empty() {
            let mut body = Vec::new();
            body.extend_from_slice(&(self.annotations.len() as u16).to_be_bytes());
            for a in &self.annotations {
                a.emit(&mut pool, &mut body);
            }
            let name_idx = pool.utf8("RuntimeVisibleAnnotations");
            attrs.push((name_idx, body));
        }
        if let Some(flags) = self.inner_flags {
            let mut body = Vec::new();
            body.extend_from_slice(&1u16.to_be_bytes());
            body.extend_from_slice(&this_idx.to_be_bytes());
            body.extend_from_slice(&0u16.to_be_bytes());
            body.extend_from_slice(&0u16.to_be_bytes());
            body.extend_from_slice(&flags.to_be_bytes());
            let name_idx = pool.utf8("InnerClasses");
            attrs.push((name_idx, body));
        }

        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFEBABEu32.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes()); // minor
        out.extend_from_slice(&61u16.to_be_bytes()); // major (Java 17)
        pool.emit(&mut out);
        out.extend_from_slice(&self.access.to_be_bytes());
        out.extend_from_slice(&this_idx.to_be_bytes());
        out.extend_from_slice(&super_idx.unwrap_or(0).to_be_bytes());
        out.extend_from_slice(&(iface_idxs.len() as u16).to_be_bytes());
        for idx in iface_idxs {
            out.extend_from_slice(&idx.to_be_bytes());
        }
        out.extend_from_slice(&fields_bytes);
        out.extend_from_slice(&methods_bytes);
        out.extend_from_slice(&(attrs.len() as u16).to_be_bytes());
        for (name_idx, body) in attrs {
            out.extend_from_slice(&name_idx.to_be_bytes());
            out.extend_from_slice(&(body.len() as u32).to_be_bytes());
            out.extend_from_slice(&body);
        }
        out
    }
}
