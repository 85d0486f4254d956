//! Argo Workflow manifest model
//!
//! A serializable subset of the `argoproj.io/v1alpha1` Workflow resource and
//! the Kubernetes core types it embeds. Field names follow the Kubernetes
//! camelCase convention so the manifest can be written straight to YAML.

use crate::error::{TranspileError, TranspileResult};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const API_VERSION: &str = "argoproj.io/v1alpha1";
pub const WORKFLOW_KIND: &str = "Workflow";
/// Resource name for persistent storage requests.
pub const RESOURCE_STORAGE: &str = "storage";

/// An Argo Workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: WorkflowSpec,
}

impl Workflow {
    pub fn new(name: impl Into<String>, spec: WorkflowSpec) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: WORKFLOW_KIND.to_string(),
            metadata: ObjectMeta { name: name.into() },
            spec,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSpec {
    pub entrypoint: String,
    #[serde(default)]
    pub arguments: Arguments,
    #[serde(default)]
    pub templates: Vec<Template>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volume_claim_templates: Vec<PersistentVolumeClaim>,
}

/// Values supplied to the entrypoint template.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Arguments {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    #[serde(default)]
    pub inputs: Inputs,
    #[serde(default)]
    pub outputs: Outputs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<Container>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Inputs {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Parameter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

/// A named file placed at `path`, backed by exactly one external store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpArtifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3Artifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hdfs: Option<HdfsArtifact>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HttpArtifact {
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<Header>,
}

/// Reference to a key of a Kubernetes secret.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SecretKeySelector {
    pub name: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Artifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_secret: Option<SecretKeySelector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key_secret: Option<SecretKeySelector>,
    #[serde(default, rename = "roleARN", skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
    #[serde(default, rename = "useSDKCreds", skip_serializing_if = "Option::is_none")]
    pub use_sdk_creds: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HdfsArtifact {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<String>,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hdfs_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volume_mounts: Vec<VolumeMount>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    pub name: String,
    pub mount_path: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersistentVolumeClaim {
    pub metadata: ObjectMeta,
    pub spec: PersistentVolumeClaimSpec,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistentVolumeClaimSpec {
    pub access_modes: Vec<AccessMode>,
    pub resources: VolumeResourceRequirements,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessMode {
    ReadWriteOnce,
    ReadOnlyMany,
    ReadWriteMany,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VolumeResourceRequirements {
    #[serde(default)]
    pub requests: IndexMap<String, Quantity>,
}

static QUANTITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:Ki|Mi|Gi|Ti|Pi|Ei|[numkMGTPE]|[eE][+-]?[0-9]+)?$")
        .expect("quantity pattern is valid")
});

/// A Kubernetes resource quantity such as `512Mi` or `4Gi`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Quantity(String);

impl Quantity {
    /// Parse a quantity: an unsigned decimal magnitude followed by an optional
    /// binary (`Ki`..`Ei`), decimal (`n`..`E`) or exponent suffix. A leading
    /// `-` is rejected.
    pub fn parse(text: &str) -> TranspileResult<Self> {
        let text = text.trim();
        if !QUANTITY_PATTERN.is_match(text) {
            return Err(TranspileError::validation(format!(
                "`{}` is not a valid resource quantity",
                text
            )));
        }
        Ok(Quantity(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Quantity {
    type Error = TranspileError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Quantity::parse(&text)
    }
}

impl From<Quantity> for String {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_parse() {
        for text in ["2Mi", "4Gi", "1024", "1.5G", "500m", "1e3", ".5Ki"] {
            assert_eq!(Quantity::parse(text).unwrap().as_str(), text);
        }
        assert_eq!(Quantity::parse("+2Mi").unwrap().as_str(), "+2Mi");
        for text in ["", "Mi", "4 Gi", "4GB", "$(inputs.size)", "2.3.1Mi", "-5Mi", "-5"] {
            assert!(Quantity::parse(text).is_err(), "{} should be rejected", text);
        }
    }

    #[test]
    fn test_workflow_serialization() {
        let mut template = Template {
            name: "echo".to_string(),
            ..Default::default()
        };
        template.container = Some(Container {
            image: "alpine".to_string(),
            command: vec!["echo".to_string()],
            ..Default::default()
        });
        let spec = WorkflowSpec {
            entrypoint: "echo".to_string(),
            templates: vec![template],
            ..Default::default()
        };
        let workflow = Workflow::new("echo", spec);

        let json = serde_json::to_value(&workflow).unwrap();
        assert_eq!(json["apiVersion"], "argoproj.io/v1alpha1");
        assert_eq!(json["kind"], "Workflow");
        assert_eq!(json["spec"]["templates"][0]["container"]["image"], "alpine");
        assert!(json["spec"].get("volumeClaimTemplates").is_none());
        assert!(json["spec"]["templates"][0]["container"].get("workingDir").is_none());
    }

    #[test]
    fn test_s3_field_names() {
        let s3 = S3Artifact {
            bucket: Some("data".to_string()),
            key: Some("reads.fq".to_string()),
            role_arn: Some("arn:aws:iam::1:role/x".to_string()),
            access_key_secret: Some(SecretKeySelector {
                name: "creds".to_string(),
                key: "id".to_string(),
            }),
            ..Default::default()
        };
        let json = serde_json::to_value(&s3).unwrap();
        assert_eq!(json["roleARN"], "arn:aws:iam::1:role/x");
        assert_eq!(json["accessKeySecret"]["name"], "creds");
        assert!(json.get("endpoint").is_none());
    }

    #[test]
    fn test_volume_claim_serialization() {
        let mut requests = IndexMap::new();
        requests.insert(RESOURCE_STORAGE.to_string(), Quantity::parse("3Mi").unwrap());
        let claim = PersistentVolumeClaim {
            metadata: ObjectMeta {
                name: "argovolume".to_string(),
            },
            spec: PersistentVolumeClaimSpec {
                access_modes: vec![AccessMode::ReadWriteMany],
                resources: VolumeResourceRequirements { requests },
            },
        };
        let json = serde_json::to_value(&claim).unwrap();
        assert_eq!(json["spec"]["accessModes"][0], "ReadWriteMany");
        assert_eq!(json["spec"]["resources"]["requests"]["storage"], "3Mi");
    }
}
