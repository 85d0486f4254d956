//! Document model for CWL CommandLineTool descriptors
//!
//! The model is plain data decoded from JSON or YAML. Optional fields stay
//! `Option` so an absent field is distinguishable from a present-but-empty
//! one. Nothing here evaluates expressions or checks values against types;
//! that happens in [`crate::core`] and [`crate::runtime`].

use crate::types::TypeList;
use serde::Deserialize;

pub mod binding;
pub mod de;
pub mod expression;
pub mod requirements;

pub use binding::{Argument, CommandLineBinding, CommandOutputBinding, Glob};
pub use expression::Expression;
pub use requirements::{DockerRequirement, Requirement, ResourceRequirement};

/// The only `class` a CommandLineTool document may declare.
pub const COMMAND_LINE_TOOL_CLASS: &str = "CommandLineTool";

/// A CWL CommandLineTool.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandLineTool {
    #[serde(default)]
    pub class: String,
    pub id: Option<String>,
    pub label: Option<String>,
    #[serde(default, deserialize_with = "de::opt_one_or_many")]
    pub doc: Option<Vec<String>>,
    pub cwl_version: Option<String>,
    #[serde(default, deserialize_with = "de::opt_one_or_many")]
    pub intent: Option<Vec<String>>,
    #[serde(default, deserialize_with = "de::parameter_list")]
    pub inputs: Option<Vec<InputParameter>>,
    #[serde(default, deserialize_with = "de::parameter_list")]
    pub outputs: Option<Vec<OutputParameter>>,
    #[serde(default, deserialize_with = "de::class_list")]
    pub requirements: Option<Vec<Requirement>>,
    /// Advisory entries, never validated
    #[serde(default, deserialize_with = "de::hint_list")]
    pub hints: Option<Vec<serde_json::Value>>,
    #[serde(default, deserialize_with = "de::opt_one_or_many")]
    pub base_command: Option<Vec<String>>,
    pub arguments: Option<Vec<Argument>>,
    pub stdin: Option<Expression>,
    pub stdout: Option<Expression>,
    pub stderr: Option<Expression>,
}

impl CommandLineTool {
    pub fn inputs(&self) -> &[InputParameter] {
        self.inputs.as_deref().unwrap_or_default()
    }

    pub fn outputs(&self) -> &[OutputParameter] {
        self.outputs.as_deref().unwrap_or_default()
    }

    pub fn requirements(&self) -> &[Requirement] {
        self.requirements.as_deref().unwrap_or_default()
    }

    pub fn base_command(&self) -> &[String] {
        self.base_command.as_deref().unwrap_or_default()
    }

    pub fn arguments(&self) -> &[Argument] {
        self.arguments.as_deref().unwrap_or_default()
    }
}

/// A declared tool input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputParameter {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub types: TypeList,
    pub label: Option<String>,
    #[serde(default, deserialize_with = "de::opt_one_or_many")]
    pub secondary_files: Option<Vec<SecondaryFile>>,
    pub streamable: Option<bool>,
    #[serde(default, deserialize_with = "de::opt_one_or_many")]
    pub doc: Option<Vec<String>>,
    pub format: Option<Format>,
    pub load_contents: Option<bool>,
    pub load_listing: Option<LoadListing>,
    pub default: Option<serde_json::Value>,
    pub input_binding: Option<CommandLineBinding>,
}

/// A declared tool output.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputParameter {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub types: TypeList,
    pub label: Option<String>,
    #[serde(default, deserialize_with = "de::opt_one_or_many")]
    pub secondary_files: Option<Vec<SecondaryFile>>,
    pub streamable: Option<bool>,
    #[serde(default, deserialize_with = "de::opt_one_or_many")]
    pub doc: Option<Vec<String>>,
    pub format: Option<Format>,
    pub output_binding: Option<CommandOutputBinding>,
}

/// A secondary file pattern, such as `.bai` or `^.fai`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "SecondaryFileRepr")]
pub struct SecondaryFile {
    pub pattern: Expression,
    pub required: Option<Expression>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SecondaryFileRepr {
    Pattern(String),
    Schema {
        pattern: Expression,
        required: Option<Expression>,
    },
}

impl From<SecondaryFileRepr> for SecondaryFile {
    fn from(repr: SecondaryFileRepr) -> Self {
        match repr {
            // A trailing `?` marks the secondary file as optional.
            SecondaryFileRepr::Pattern(text) => match text.strip_suffix('?') {
                Some(pattern) => SecondaryFile {
                    pattern: Expression::from_text(pattern.to_string()),
                    required: Some(Expression::Bool(false)),
                },
                None => SecondaryFile {
                    pattern: Expression::from_text(text),
                    required: None,
                },
            },
            SecondaryFileRepr::Schema { pattern, required } => SecondaryFile { pattern, required },
        }
    }
}

/// The `format` of a parameter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "FormatRepr")]
pub enum Format {
    String(String),
    Strings(Vec<String>),
    Expression(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FormatRepr {
    One(String),
    Many(Vec<String>),
}

impl From<FormatRepr> for Format {
    fn from(repr: FormatRepr) -> Self {
        match repr {
            FormatRepr::One(text) if de::is_expression(&text) => Format::Expression(text),
            FormatRepr::One(text) => Format::String(text),
            FormatRepr::Many(formats) => Format::Strings(formats),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadListing {
    ShallowListing,
    DeepListing,
    NoListing,
}
