//! CWL requirements
//!
//! The set of requirement classes is closed: a document naming any other
//! class fails to decode. Hints are not modeled here; they stay as raw
//! values on the tool.

use crate::tree::de;
use crate::tree::expression::Expression;
use crate::tree::LoadListing;
use crate::types::SchemaDef;
use serde::Deserialize;

/// One entry of a tool's `requirements` list, discriminated by `class`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "class")]
pub enum Requirement {
    #[serde(rename = "DockerRequirement")]
    Docker(DockerRequirement),
    #[serde(rename = "SoftwareRequirement")]
    Software(SoftwareRequirement),
    #[serde(rename = "LoadListingRequirement")]
    LoadListing(LoadListingRequirement),
    #[serde(rename = "InitialWorkDirRequirement")]
    InitialWorkDir(InitialWorkDirRequirement),
    #[serde(rename = "InlineJavascriptRequirement")]
    InlineJavascript(InlineJavascriptRequirement),
    #[serde(rename = "SchemaDefRequirement")]
    SchemaDef(SchemaDefRequirement),
    #[serde(rename = "EnvVarRequirement")]
    EnvVar(EnvVarRequirement),
    #[serde(rename = "ShellCommandRequirement")]
    ShellCommand(ShellCommandRequirement),
    #[serde(rename = "WorkReuse")]
    WorkReuse(WorkReuse),
    #[serde(rename = "NetworkAccess")]
    NetworkAccess(NetworkAccess),
    #[serde(rename = "InplaceUpdateRequirement")]
    InplaceUpdate(InplaceUpdateRequirement),
    #[serde(rename = "ToolTimeLimit")]
    ToolTimeLimit(ToolTimeLimit),
    #[serde(rename = "ResourceRequirement")]
    Resource(ResourceRequirement),
}

impl Requirement {
    /// The CWL class name of this requirement.
    pub fn class(&self) -> &'static str {
        match self {
            Requirement::Docker(_) => "DockerRequirement",
            Requirement::Software(_) => "SoftwareRequirement",
            Requirement::LoadListing(_) => "LoadListingRequirement",
            Requirement::InitialWorkDir(_) => "InitialWorkDirRequirement",
            Requirement::InlineJavascript(_) => "InlineJavascriptRequirement",
            Requirement::SchemaDef(_) => "SchemaDefRequirement",
            Requirement::EnvVar(_) => "EnvVarRequirement",
            Requirement::ShellCommand(_) => "ShellCommandRequirement",
            Requirement::WorkReuse(_) => "WorkReuse",
            Requirement::NetworkAccess(_) => "NetworkAccess",
            Requirement::InplaceUpdate(_) => "InplaceUpdateRequirement",
            Requirement::ToolTimeLimit(_) => "ToolTimeLimit",
            Requirement::Resource(_) => "ResourceRequirement",
        }
    }
}

/// Container image the tool runs in.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockerRequirement {
    pub docker_pull: Option<String>,
    pub docker_load: Option<String>,
    pub docker_file: Option<String>,
    pub docker_import: Option<String>,
    pub docker_image_id: Option<String>,
    pub docker_output_directory: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SoftwarePackage {
    pub package: String,
    #[serde(default, deserialize_with = "de::one_or_many")]
    pub version: Vec<String>,
    #[serde(default, deserialize_with = "de::one_or_many")]
    pub specs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SoftwareRequirement {
    #[serde(default)]
    pub packages: Vec<SoftwarePackage>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadListingRequirement {
    pub load_listing: Option<LoadListing>,
}

/// A file or directory to stage into the working directory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dirent {
    pub entry: Expression,
    pub entry_name: Option<Expression>,
    pub writable: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WorkDirEntry {
    Dirent(Dirent),
    Expression(Expression),
    /// A literal `File` or `Directory` object
    Object(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WorkDirListing {
    Expression(Expression),
    Entries(Vec<WorkDirEntry>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InitialWorkDirRequirement {
    pub listing: WorkDirListing,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineJavascriptRequirement {
    #[serde(default)]
    pub expression_lib: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SchemaDefRequirement {
    #[serde(default)]
    pub types: Vec<SchemaDef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentDef {
    pub env_name: String,
    pub env_value: Expression,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVarRequirement {
    #[serde(default, deserialize_with = "de::env_def_list")]
    pub env_def: Vec<EnvironmentDef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShellCommandRequirement {}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkReuse {
    pub enable_reuse: Expression,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAccess {
    pub network_access: Expression,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InplaceUpdateRequirement {
    pub inplace_update: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolTimeLimit {
    pub time_limit: Expression,
}

/// Resource minimums and maximums; sizes are in mebibytes.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequirement {
    pub cores_min: Option<Expression>,
    pub cores_max: Option<Expression>,
    pub ram_min: Option<Expression>,
    pub ram_max: Option<Expression>,
    pub tmpdir_min: Option<Expression>,
    pub tmpdir_max: Option<Expression>,
    pub outdir_min: Option<Expression>,
    pub outdir_max: Option<Expression>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docker_requirement() {
        let req: Requirement =
            serde_json::from_str(r#"{"class": "DockerRequirement", "dockerPull": "alpine"}"#)
                .unwrap();
        match req {
            Requirement::Docker(docker) => {
                assert_eq!(docker.docker_pull.as_deref(), Some("alpine"));
                assert_eq!(docker.docker_output_directory, None);
            }
            other => panic!("Expected DockerRequirement, got {:?}", other),
        }
    }

    #[test]
    fn test_resource_requirement_expressions() {
        let req: Requirement = serde_json::from_str(
            r#"{"class": "ResourceRequirement", "outdirMin": 2.3, "ramMin": "$(inputs.ram)"}"#,
        )
        .unwrap();
        match req {
            Requirement::Resource(resource) => {
                assert_eq!(resource.outdir_min, Some(Expression::Float(2.3)));
                assert!(matches!(resource.ram_min, Some(Expression::Code(_))));
                assert_eq!(resource.cores_min, None);
            }
            other => panic!("Expected ResourceRequirement, got {:?}", other),
        }
    }

    #[test]
    fn test_env_var_map_form() {
        let req: Requirement = serde_json::from_str(
            r#"{"class": "EnvVarRequirement", "envDef": {"HOME": "/tmp", "DEPTH": 3}}"#,
        )
        .unwrap();
        match req {
            Requirement::EnvVar(env) => {
                assert_eq!(env.env_def.len(), 2);
                assert_eq!(env.env_def[0].env_name, "HOME");
                assert_eq!(env.env_def[1].env_value, Expression::Int(3));
            }
            other => panic!("Expected EnvVarRequirement, got {:?}", other),
        }
    }

    #[test]
    fn test_initial_workdir_listing() {
        let req: Requirement = serde_json::from_str(
            r#"{"class": "InitialWorkDirRequirement", "listing": [{"entry": "$(inputs.f)", "writable": true}]}"#,
        )
        .unwrap();
        assert_eq!(req.class(), "InitialWorkDirRequirement");
    }

    #[test]
    fn test_unknown_class_rejected() {
        assert!(serde_json::from_str::<Requirement>(r#"{"class": "CUDARequirement"}"#).is_err());
    }

    #[test]
    fn test_marker_requirement() {
        let req: Requirement =
            serde_json::from_str(r#"{"class": "ShellCommandRequirement"}"#).unwrap();
        assert_eq!(req, Requirement::ShellCommand(ShellCommandRequirement {}));
    }
}
