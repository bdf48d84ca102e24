//! Virtual filesystem for in-memory compilation
//!
//! Holds the main report source plus shared template modules such as the
//! theme. Nothing here touches the real filesystem.

use std::collections::HashMap;

use typst::foundations::Bytes;
use typst::syntax::{FileId, Source, VirtualPath};

use crate::compiler::errors::RenderError;

const MAIN_PATH: &str = "/main.typ";

/// A virtual filesystem for in-memory compilation
#[derive(Debug, Default)]
pub struct VirtualFilesystem {
    files: HashMap<FileId, Bytes>,
}

impl VirtualFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount the main source file and return its id
    pub fn mount_main(&mut self, content: String) -> FileId {
        let id = file_id(MAIN_PATH);
        self.files.insert(id, Bytes::from(content.into_bytes()));
        id
    }

    /// Mount an additional file, such as a module imported by the main source
    pub fn mount_file(&mut self, path: &str, content: Bytes) -> Result<FileId, RenderError> {
        validate_path(path)?;

        let id = file_id(&normalize_path(path));
        self.files.insert(id, content);
        Ok(id)
    }

    /// Get a source file by ID (for .typ files)
    pub fn get_source(&self, id: FileId) -> Option<Source> {
        let text = std::str::from_utf8(self.files.get(&id)?).ok()?;
        Some(Source::new(id, text.to_string()))
    }

    /// Get a binary file by ID
    pub fn get_file(&self, id: FileId) -> Option<&Bytes> {
        self.files.get(&id)
    }
}

fn file_id(path: &str) -> FileId {
    // No packages in the virtual filesystem
    FileId::new(None, VirtualPath::new(path))
}

fn validate_path(path: &str) -> Result<(), RenderError> {
    if path.contains("..") {
        return Err(RenderError::PathSecurityViolation(
            "Path traversal with '..' is not allowed".to_string(),
        ));
    }
    if path.contains(':') || path.starts_with('\\') {
        return Err(RenderError::PathSecurityViolation(
            "Absolute filesystem paths are not allowed".to_string(),
        ));
    }
    Ok(())
}

/// Root the path at `/` and collapse repeated separators
fn normalize_path(path: &str) -> String {
    let joined = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{joined}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_main() {
        let mut fs = VirtualFilesystem::new();
        let id = fs.mount_main("Hello, World!".to_string());

        let source = fs.get_source(id).unwrap();
        assert!(source.text().contains("Hello"));
    }

    #[test]
    fn test_path_traversal_blocked() {
        let mut fs = VirtualFilesystem::new();
        let result = fs.mount_file("../../../etc/passwd", Bytes::from_static(&[]));

        assert!(matches!(result, Err(RenderError::PathSecurityViolation(_))));
    }

    #[test]
    fn test_windows_paths_blocked() {
        let mut fs = VirtualFilesystem::new();
        assert!(fs.mount_file("C:\\fonts\\x.ttf", Bytes::from_static(&[])).is_err());
    }

    #[test]
    fn test_mount_module_is_normalized() {
        let mut fs = VirtualFilesystem::new();
        let content = Bytes::from_static(b"#let brand = blue");
        let id = fs.mount_file("theme//lexiai.typ", content.clone()).unwrap();

        assert_eq!(id, file_id("/theme/lexiai.typ"));
        assert_eq!(fs.get_file(id), Some(&content));
        assert!(fs.get_source(id).unwrap().text().contains("brand"));
    }
}
