//! Shared test fixtures: a minimal class-file emitter so CLI tests can lay
//! real `.class` files on disk without fixture binaries in the repo.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const ACC_PUBLIC: u16 = 0x0001;

struct Pool {
    entries: Vec<Vec<u8>>,
    utf8: HashMap<String, u16>,
    classes: HashMap<String, u16>,
}

impl Pool {
    fn new() -> Self {
        Pool {
            entries: Vec::new(),
            utf8: HashMap::new(),
            classes: HashMap::new(),
        }
    }

    fn utf8(&mut self, text: &str) -> u16 {
        if let Some(&idx) = self.utf8.get(text) {
            return idx;
        }
        let mut entry = vec![1u8];
        entry.extend_from_slice(&(text.len() as u16).to_be_bytes());
        entry.extend_from_slice(text.as_bytes());
        self.entries.push(entry);
        let idx = self.entries.len() as u16;
        self.utf8.insert(text.to_string(), idx);
        idx
    }

    fn class(&mut self, name: &str) -> u16 {
        if let Some(&idx) = self.classes.get(name) {
            return idx;
        }
        let name_idx = self.utf8(name);
        let mut entry = vec![7u8];
        entry.extend_from_slice(&name_idx.to_be_bytes());
        self.entries.push(entry);
        let idx = self.entries.len() as u16;
        self.classes.insert(name.to_string(), idx);
        idx
    }
}

/// Emit a public class with the given public methods as (name, descriptor).
pub fn class_file(name: &str, methods: &[(&str, &str)]) -> Vec<u8> {
    let mut pool = Pool::new();
    let this_idx = pool.class(name);
    let super_idx = pool.class("java/lang/Object");

    let mut method_bytes = Vec::new();
    method_bytes.extend_from_slice(&(methods.len() as u16).to_be_bytes());
    for (method_name, descriptor) in methods {
        method_bytes.extend_from_slice(&ACC_PUBLIC.to_be_bytes());
        method_bytes.extend_from_slice(&pool.utf8(method_name).to_be_bytes());
        method_bytes.extend_from_slice(&pool.utf8(descriptor).to_be_bytes());
        method_bytes.extend_from_slice(&0u16.to_be_bytes());
    }

    let mut out = Vec::new();
    out.extend_from_slice(&0xCAFEBABEu32.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&61u16.to_be_bytes());
    out.extend_from_slice(&((pool.entries.len() + 1) as u16).to_be_bytes());
    for entry in &pool.entries {
        out.extend_from_slice(entry);
    }
    out.extend_from_slice(&(ACC_PUBLIC | 0x0020).to_be_bytes());
    out.extend_from_slice(&this_idx.to_be_bytes());
    out.extend_from_slice(&super_idx.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes()); // interfaces
    out.extend_from_slice(&0u16.to_be_bytes()); // fields
    out.extend_from_slice(&method_bytes);
    out.extend_from_slice(&0u16.to_be_bytes()); // class attributes
    out
}

/// Write a class under `root`, mirroring the package as directories.
pub fn write_class(root: &Path, name: &str, methods: &[(&str, &str)]) {
    let rel: String = format!("{}.class", name);
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, class_file(name, methods)).unwrap();
}
