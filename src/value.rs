//! Runtime input values
//!
//! A job's input document maps each input identifier to an opaque value.
//! Each value is classified into exactly one [`InputEntry`] by trying a fixed
//! sequence of decodes, boolean, then integer, then string, then `File`
//! object, and keeping the first that succeeds. The order decides ambiguous
//! cases (`3` is an integer, never the string `"3"`) and must not change.

use crate::error::{TranspileError, TranspileResult};
use crate::types::TypeKind;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

/// The `class` a file object must declare.
pub const FILE_CLASS: &str = "File";

/// A CWL `File` object as supplied in a job's input document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CwlFile {
    #[serde(default)]
    pub class: String,
    pub location: Option<String>,
    pub path: Option<String>,
    pub basename: Option<String>,
    pub dirname: Option<String>,
    pub nameroot: Option<String>,
    pub nameext: Option<String>,
    pub checksum: Option<String>,
    pub size: Option<u64>,
    #[serde(default)]
    pub secondary_files: Vec<CwlFile>,
    pub format: Option<String>,
    pub contents: Option<String>,
}

/// A classified runtime input value.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEntry {
    Bool(bool),
    Int(i64),
    String(String),
    File(CwlFile),
}

/// Runtime inputs keyed by identifier, in document order.
pub type InputMap = IndexMap<String, InputEntry>;

impl InputEntry {
    /// The type tag this value carries.
    pub fn kind(&self) -> TypeKind {
        match self {
            InputEntry::Bool(_) => TypeKind::Boolean,
            InputEntry::Int(_) => TypeKind::Int,
            InputEntry::String(_) => TypeKind::String,
            InputEntry::File(_) => TypeKind::File,
        }
    }

    pub fn as_file(&self) -> Option<&CwlFile> {
        match self {
            InputEntry::File(file) => Some(file),
            _ => None,
        }
    }

    /// Classify an opaque value.
    ///
    /// Fails when no decode succeeds, or when an object decodes as a file
    /// but its `class` is not `File`.
    pub fn classify(value: &JsonValue) -> TranspileResult<Self> {
        for (kind, attempt) in DECODE_ORDER {
            match attempt(value) {
                Some(Ok(entry)) => {
                    tracing::trace!(kind = %kind, "classified input value");
                    return Ok(entry);
                }
                Some(Err(error)) => return Err(error),
                None => continue,
            }
        }
        Err(TranspileError::classification(format!(
            "{} is not a boolean, integer, string or File",
            value
        )))
    }
}

/// One decode attempt: `None` means "not this kind, try the next one";
/// `Some(Err(_))` stops classification.
type DecodeAttempt = fn(&JsonValue) -> Option<TranspileResult<InputEntry>>;

const DECODE_ORDER: [(TypeKind, DecodeAttempt); 4] = [
    (TypeKind::Boolean, decode_bool),
    (TypeKind::Int, decode_int),
    (TypeKind::String, decode_string),
    (TypeKind::File, decode_file),
];

fn decode_bool(value: &JsonValue) -> Option<TranspileResult<InputEntry>> {
    bool::deserialize(value).ok().map(|b| Ok(InputEntry::Bool(b)))
}

fn decode_int(value: &JsonValue) -> Option<TranspileResult<InputEntry>> {
    i64::deserialize(value).ok().map(|i| Ok(InputEntry::Int(i)))
}

fn decode_string(value: &JsonValue) -> Option<TranspileResult<InputEntry>> {
    match value {
        JsonValue::String(s) => Some(Ok(InputEntry::String(s.clone()))),
        // Scalars that failed the integer decode keep their textual form.
        JsonValue::Number(n) => Some(Ok(InputEntry::String(n.to_string()))),
        _ => None,
    }
}

fn decode_file(value: &JsonValue) -> Option<TranspileResult<InputEntry>> {
    if !value.is_object() {
        return None;
    }
    let file = CwlFile::deserialize(value).ok()?;
    if file.class != FILE_CLASS {
        return Some(Err(TranspileError::classification(format!(
            "`{}` was received instead of `{}`",
            file.class, FILE_CLASS
        ))));
    }
    Some(Ok(InputEntry::File(file)))
}

impl<'de> Deserialize<'de> for InputEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = JsonValue::deserialize(deserializer)?;
        InputEntry::classify(&value).map_err(serde::de::Error::custom)
    }
}

/// Classify every value of a decoded input document.
pub fn classify_inputs(raw: IndexMap<String, JsonValue>) -> TranspileResult<InputMap> {
    let mut inputs = InputMap::with_capacity(raw.len());
    for (name, value) in raw {
        let entry = InputEntry::classify(&value).map_err(|e| match e {
            TranspileError::Classification { message } => {
                TranspileError::classification(format!("input `{}`: {}", name, message))
            }
            other => other,
        })?;
        inputs.insert(name, entry);
    }
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_classification_order() {
        assert_eq!(InputEntry::classify(&json!(true)).unwrap(), InputEntry::Bool(true));
        assert_eq!(InputEntry::classify(&json!(3)).unwrap(), InputEntry::Int(3));
        assert_eq!(
            InputEntry::classify(&json!("3")).unwrap(),
            InputEntry::String("3".to_string())
        );
        assert_eq!(
            InputEntry::classify(&json!("hi")).unwrap(),
            InputEntry::String("hi".to_string())
        );
    }

    #[test]
    fn test_yaml_integer_is_int() {
        let value: JsonValue = serde_yaml_ng::from_str("3").unwrap();
        assert_eq!(InputEntry::classify(&value).unwrap().kind(), TypeKind::Int);
    }

    #[test]
    fn test_float_keeps_text() {
        assert_eq!(
            InputEntry::classify(&json!(2.5)).unwrap(),
            InputEntry::String("2.5".to_string())
        );
    }

    #[test]
    fn test_file_object() {
        let entry = InputEntry::classify(&json!({
            "class": "File",
            "path": "/data/reads.fq",
            "size": 1024,
            "secondaryFiles": [{"class": "File", "path": "/data/reads.fq.idx"}]
        }))
        .unwrap();
        assert_eq!(entry.kind(), TypeKind::File);
        let file = entry.as_file().unwrap();
        assert_eq!(file.path.as_deref(), Some("/data/reads.fq"));
        assert_eq!(file.size, Some(1024));
        assert_eq!(file.secondary_files.len(), 1);
    }

    #[test]
    fn test_wrong_discriminator_is_hard_error() {
        let error = InputEntry::classify(&json!({"class": "Directory", "path": "/data"}))
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Classification);
        assert!(error.to_string().contains("Directory"));

        let error = InputEntry::classify(&json!({"path": "/data/x"})).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Classification);
    }

    #[test]
    fn test_unclassifiable_values() {
        assert!(InputEntry::classify(&json!(null)).is_err());
        assert!(InputEntry::classify(&json!([1, 2])).is_err());
        assert!(InputEntry::classify(&json!({"class": "File", "size": "big"})).is_err());
    }

    #[test]
    fn test_classify_inputs_keeps_order_and_names_failures() {
        let mut raw = IndexMap::new();
        raw.insert("b".to_string(), json!("x"));
        raw.insert("a".to_string(), json!(1));
        let inputs = classify_inputs(raw).unwrap();
        let keys: Vec<_> = inputs.keys().cloned().collect();
        assert_eq!(keys, vec!["b".to_string(), "a".to_string()]);

        let mut raw = IndexMap::new();
        raw.insert("bad".to_string(), json!([]));
        let error = classify_inputs(raw).unwrap_err();
        assert!(error.to_string().contains("input `bad`"));
    }

    #[test]
    fn test_deserialize_input_map() {
        let inputs: InputMap = serde_yaml_ng::from_str("msg: hi\ncount: 2\nflag: false\n").unwrap();
        assert_eq!(inputs["msg"], InputEntry::String("hi".to_string()));
        assert_eq!(inputs["count"], InputEntry::Int(2));
        assert_eq!(inputs["flag"], InputEntry::Bool(false));
    }
}
