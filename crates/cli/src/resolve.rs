//! Artifact resolution: turn a CLI path argument into the raw class
//! buffers the core consumes. A path is either one `.class` file or a
//! directory scanned recursively; files are loaded in sorted path order so
//! artifact fingerprints never depend on directory iteration order.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors raised before any parsing starts. Always fatal for the run.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("cannot read '{path}': {source}")]
    Unreadable {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("no class files found under '{path}'")]
    NoClasses { path: String },
}

fn unreadable(path: &Path, source: io::Error) -> ResolutionError {
    ResolutionError::Unreadable {
        path: path.display().to_string(),
        source,
    }
}

/// Default version label for an artifact path: its file name.
pub fn default_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Load all class buffers reachable from `path`.
pub fn load_class_buffers(path: &Path) -> Result<Vec<Vec<u8>>, ResolutionError> {
    let meta = fs::metadata(path).map_err(|e| unreadable(path, e))?;

    let files = if meta.is_dir() {
        let mut found = Vec::new();
        collect_class_files(path, &mut found).map_err(|e| unreadable(path, e))?;
        found.sort();
        found
    } else {
        vec![path.to_path_buf()]
    };

    if files.is_empty() {
        return Err(ResolutionError::NoClasses {
            path: path.display().to_string(),
        });
    }

    let mut buffers = Vec::with_capacity(files.len());
    for file in &files {
        buffers.push(fs::read(file).map_err(|e| unreadable(file, e))?);
    }
    Ok(buffers)
}

fn collect_class_files(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_class_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "class") {
            out.push(path);
        }
    }
    Ok(())
}
