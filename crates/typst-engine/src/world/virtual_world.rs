//! VirtualWorld implementation of the Typst World trait
//!
//! This module provides an in-memory implementation of the Typst World trait,
//! allowing documents to be compiled without touching the filesystem.

use std::collections::HashMap;

use chrono::{Datelike, Timelike, Utc};
use typst::diag::{FileError, FileResult};
use typst::foundations::{Array, Bytes, Datetime, Dict, Value};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, World};

use super::fonts::{global_font_cache, FontCache};
use super::virtual_fs::VirtualFilesystem;
use crate::compiler::errors::RenderError;

/// A virtual world for in-memory Typst compilation
pub struct VirtualWorld {
    filesystem: VirtualFilesystem,
    main: FileId,
    font_cache: &'static FontCache,
    /// System inputs (accessible via sys.inputs in Typst)
    inputs: Dict,
    /// Captured once so every `datetime.today()` call in a render agrees
    time: chrono::DateTime<Utc>,
    library: LazyHash<Library>,
}

impl VirtualWorld {
    /// Create a world around `source`, with `modules` mounted alongside it
    pub fn new(
        source: String,
        inputs: HashMap<String, serde_json::Value>,
        modules: HashMap<String, Bytes>,
    ) -> Result<Self, RenderError> {
        let mut filesystem = VirtualFilesystem::new();
        let main = filesystem.mount_main(source);

        for (path, content) in modules {
            filesystem.mount_file(&path, content)?;
        }

        let inputs_dict = Self::convert_inputs(inputs)?;
        let library = Library::builder().with_inputs(inputs_dict.clone()).build();

        Ok(Self {
            filesystem,
            main,
            font_cache: global_font_cache(),
            inputs: inputs_dict,
            time: Utc::now(),
            library: LazyHash::new(library),
        })
    }

    fn convert_inputs(inputs: HashMap<String, serde_json::Value>) -> Result<Dict, RenderError> {
        let mut dict = Dict::new();

        for (key, value) in inputs {
            let typst_value = Self::json_to_typst_value(&value)?;
            dict.insert(key.into(), typst_value);
        }

        Ok(dict)
    }

    /// Convert a JSON value to a Typst Value
    fn json_to_typst_value(json: &serde_json::Value) -> Result<Value, RenderError> {
        match json {
            serde_json::Value::Null => Ok(Value::None),
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::Float(f))
                } else {
                    Err(RenderError::InvalidInput(format!("Invalid number: {}", n)))
                }
            }
            serde_json::Value::String(s) => Ok(Value::Str(s.as_str().into())),
            serde_json::Value::Array(arr) => {
                let items: Vec<Value> = arr
                    .iter()
                    .map(Self::json_to_typst_value)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Array(Array::from(items.as_slice())))
            }
            serde_json::Value::Object(obj) => {
                let mut dict = Dict::new();
                for (k, v) in obj {
                    dict.insert(k.as_str().into(), Self::json_to_typst_value(v)?);
                }
                Ok(Value::Dict(dict))
            }
        }
    }

    pub fn inputs(&self) -> &Dict {
        &self.inputs
    }
}

impl World for VirtualWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        self.font_cache.book()
    }

    fn main(&self) -> FileId {
        self.main
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        self.filesystem
            .get_source(id)
            .ok_or_else(|| FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        self.filesystem
            .get_file(id)
            .cloned()
            .ok_or_else(|| FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.font_cache.font(index)
    }

    fn today(&self, offset: Option<i64>) -> Option<Datetime> {
        let adjusted = self.time + chrono::Duration::hours(offset.unwrap_or(0));

        Datetime::from_ymd_hms(
            adjusted.year(),
            adjusted.month() as u8,
            adjusted.day() as u8,
            adjusted.hour() as u8,
            adjusted.minute() as u8,
            adjusted.second() as u8,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_world_creation() {
        let world =
            VirtualWorld::new("Hello, World!".to_string(), HashMap::new(), HashMap::new()).unwrap();

        assert!(world.source(world.main()).is_ok());
    }

    #[test]
    fn test_modules_are_reachable() {
        let mut modules = HashMap::new();
        modules.insert(
            "theme.typ".to_string(),
            Bytes::from_static(b"#let brand = blue"),
        );
        let world = VirtualWorld::new("test".to_string(), HashMap::new(), modules).unwrap();

        let id = FileId::new(None, typst::syntax::VirtualPath::new("/theme.typ"));
        assert!(world.source(id).is_ok());
    }

    #[test]
    fn test_nested_analysis_inputs() {
        let mut inputs = HashMap::new();
        inputs.insert(
            "risks".to_string(),
            serde_json::json!([{"simplified": "Late fee", "riskLevel": "high"}]),
        );
        inputs.insert("file_size".to_string(), serde_json::json!(2048));

        let world = VirtualWorld::new("test".to_string(), inputs, HashMap::new()).unwrap();

        assert!(world.inputs().contains("risks"));
        assert!(world.inputs().contains("file_size"));
    }

    #[test]
    fn test_today_function() {
        let world = VirtualWorld::new("test".to_string(), HashMap::new(), HashMap::new()).unwrap();
        assert!(world.today(None).is_some());
    }
}
