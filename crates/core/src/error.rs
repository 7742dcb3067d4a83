/// Errors raised while parsing a single class-file buffer.
///
/// Parse errors are recoverable at the artifact level: the offending class
/// is skipped and recorded as a diagnostic, and the build continues with
/// the remaining buffers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The buffer does not start with the class-file magic number.
    #[error("bad magic number {found:#010x}, expected 0xcafebabe")]
    BadMagic { found: u32 },

    /// The buffer ended before a declared table or attribute was complete.
    #[error("truncated class file at byte {offset}")]
    Truncated { offset: usize },

    /// A constant-pool index points outside the pool.
    #[error("constant pool index {index} out of range (pool size {size})")]
    BadPoolIndex { index: u16, size: u16 },

    /// A constant-pool entry has a different tag than the reference requires.
    #[error("constant pool index {index} holds {found}, expected {expected}")]
    WrongPoolTag {
        index: u16,
        found: &'static str,
        expected: &'static str,
    },

    /// An unrecognized constant-pool tag byte.
    #[error("unknown constant pool tag {tag} at index {index}")]
    UnknownPoolTag { tag: u8, index: u16 },

    /// A constant-pool Utf8 entry is not valid (modified) UTF-8.
    #[error("invalid UTF-8 in constant pool entry {index}")]
    BadUtf8 { index: u16 },

    /// A field or method descriptor failed structural validation.
    #[error("malformed descriptor '{text}': {reason}")]
    BadDescriptor { text: String, reason: String },

    /// A generic signature attribute failed structural validation.
    #[error("malformed signature '{text}': {reason}")]
    BadSignature { text: String, reason: String },

    /// Two members of the same class share a (name, descriptor) identity.
    #[error("duplicate member '{name}{descriptor}' in class '{class}'")]
    DuplicateMember {
        class: String,
        name: String,
        descriptor: String,
    },
}

/// Fatal model-construction errors. Unlike [`ParseError`], these abort the
/// whole artifact before any diffing happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Two class buffers in one artifact declared the same binary name.
    #[error("duplicate type '{binary_name}' in artifact '{label}'")]
    DuplicateType { label: String, binary_name: String },

    /// The superclass/interface graph contains a cycle, which is illegal
    /// on the source platform and would make inheritance resolution loop.
    #[error("inheritance cycle through type '{binary_name}' in artifact '{label}'")]
    InheritanceCycle { label: String, binary_name: String },
}
