//! Reading tool descriptors, input documents and location documents.
//!
//! The format is chosen by file extension: `.json` is JSON, `.yaml`, `.yml`
//! and `.cwl` are YAML.

use crate::error::TranspileError;
use crate::location::FileLocations;
use crate::tree::{CommandLineTool, COMMAND_LINE_TOOL_CLASS};
use crate::value::{classify_inputs, InputMap};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// An error related to reading a document.
#[derive(Error, Debug)]
pub enum LoadError {
    /// An error occurring in [`serde_json`].
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A document cannot be read from a directory.
    #[error("a document cannot be read from directory `{0}`")]
    InvalidDir(PathBuf),

    /// An I/O error.
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document did not contain a map at the root.
    #[error("`{0}` did not contain a map from strings to values at the root")]
    NonMapRoot(PathBuf),

    /// Neither JSON nor YAML could be chosen from the provided path.
    #[error(
        "unsupported file extension `{0}`: the supported formats are JSON (`.json`) or YAML \
         (`.yaml`, `.yml` and `.cwl`)"
    )]
    UnsupportedFileExt(String),

    /// An error occurring in [`serde_yaml_ng`].
    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),

    /// A value was read but could not be classified.
    #[error(transparent)]
    Transpile(#[from] TranspileError),
}

pub type Result<T> = std::result::Result<T, LoadError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("yaml") | Some("yml") | Some("cwl") => Ok(Format::Yaml),
            ext => Err(LoadError::UnsupportedFileExt(ext.unwrap_or("").to_owned())),
        }
    }

    fn parse<T: DeserializeOwned>(self, content: &str) -> Result<T> {
        match self {
            Format::Json => Ok(serde_json::from_str(content)?),
            Format::Yaml => Ok(serde_yaml_ng::from_str(content)?),
        }
    }
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if path.is_dir() {
        return Err(LoadError::InvalidDir(path.to_path_buf()));
    }
    let format = Format::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    format.parse(&content)
}

fn read_map(path: &Path) -> Result<serde_json::Map<String, JsonValue>> {
    match read_document::<JsonValue>(path)? {
        JsonValue::Object(object) => Ok(object),
        _ => Err(LoadError::NonMapRoot(path.to_path_buf())),
    }
}

/// Read a CommandLineTool descriptor.
pub fn read_tool<P: AsRef<Path>>(path: P) -> Result<CommandLineTool> {
    let path = path.as_ref();
    let tool: CommandLineTool = read_document(path)?;
    if tool.class != COMMAND_LINE_TOOL_CLASS {
        tracing::warn!(
            path = %path.display(),
            class = %tool.class,
            "document does not declare class {}",
            COMMAND_LINE_TOOL_CLASS
        );
    }
    Ok(tool)
}

/// Read and classify a runtime input document.
pub fn read_inputs<P: AsRef<Path>>(path: P) -> Result<InputMap> {
    let raw: IndexMap<String, JsonValue> = read_map(path.as_ref())?.into_iter().collect();
    Ok(classify_inputs(raw)?)
}

/// Read a file locations document.
pub fn read_locations<P: AsRef<Path>>(path: P) -> Result<FileLocations> {
    let object = read_map(path.as_ref())?;
    Ok(serde_json::from_value(JsonValue::Object(object))?)
}
