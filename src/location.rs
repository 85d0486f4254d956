//! External storage locations for file inputs and outputs.
//!
//! A locations document has two identifier-keyed maps, `inputs` and
//! `outputs`. Every entry names its store with `type` and must carry the
//! payload for that store; a `type` without its payload fails to decode.

use crate::error::TranspileError;
use crate::manifest::{Artifact, HdfsArtifact, HttpArtifact, S3Artifact};
use indexmap::IndexMap;
use serde::Deserialize;

/// Locations for a single transpilation run.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FileLocations {
    #[serde(default)]
    pub inputs: IndexMap<String, FileLocation>,
    #[serde(default)]
    pub outputs: IndexMap<String, FileLocation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Http,
    S3,
    Hdfs,
}

/// The store backing a location, holding only the payload for its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactSource {
    Http(HttpArtifact),
    S3(S3Artifact),
    Hdfs(HdfsArtifact),
}

impl ArtifactSource {
    pub fn kind(&self) -> LocationKind {
        match self {
            ArtifactSource::Http(_) => LocationKind::Http,
            ArtifactSource::S3(_) => LocationKind::S3,
            ArtifactSource::Hdfs(_) => LocationKind::Hdfs,
        }
    }
}

/// One entry of a locations document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawFileLocation")]
pub struct FileLocation {
    pub name: String,
    pub source: ArtifactSource,
}

impl FileLocation {
    /// Build an artifact placed at `path` and backed by this location.
    pub fn to_artifact(&self, name: impl Into<String>, path: impl Into<String>) -> Artifact {
        let mut artifact = Artifact {
            name: name.into(),
            path: path.into(),
            ..Default::default()
        };
        match &self.source {
            ArtifactSource::Http(http) => artifact.http = Some(http.clone()),
            ArtifactSource::S3(s3) => artifact.s3 = Some(s3.clone()),
            ArtifactSource::Hdfs(hdfs) => artifact.hdfs = Some(hdfs.clone()),
        }
        artifact
    }
}

#[derive(Deserialize)]
struct RawFileLocation {
    name: String,
    #[serde(rename = "type")]
    kind: LocationKind,
    http: Option<HttpArtifact>,
    s3: Option<S3Artifact>,
    hdfs: Option<HdfsArtifact>,
}

impl TryFrom<RawFileLocation> for FileLocation {
    type Error = TranspileError;

    fn try_from(raw: RawFileLocation) -> Result<Self, Self::Error> {
        let source = match raw.kind {
            LocationKind::Http => {
                let http = raw
                    .http
                    .ok_or_else(|| TranspileError::validation("http data not provided"))?;
                url::Url::parse(&http.url).map_err(|e| {
                    TranspileError::validation(format!(
                        "location `{}` has an invalid url `{}`: {}",
                        raw.name, http.url, e
                    ))
                })?;
                ArtifactSource::Http(http)
            }
            LocationKind::S3 => ArtifactSource::S3(
                raw.s3
                    .ok_or_else(|| TranspileError::validation("s3 data not provided"))?,
            ),
            LocationKind::Hdfs => ArtifactSource::Hdfs(
                raw.hdfs
                    .ok_or_else(|| TranspileError::validation("hdfs data not provided"))?,
            ),
        };
        Ok(FileLocation {
            name: raw.name,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_locations() {
        let locations: FileLocations = serde_json::from_str(
            r#"{
                "inputs": {
                    "reads": {"name": "reads", "type": "s3", "s3": {"bucket": "lab", "key": "reads.fq"}},
                    "ref": {"name": "ref", "type": "http", "http": {"url": "https://example.org/ref.fa"}}
                },
                "outputs": {
                    "sorted": {"name": "sorted", "type": "hdfs", "hdfs": {"addresses": ["nn:8020"], "path": "/out/sorted"}}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(locations.inputs["reads"].source.kind(), LocationKind::S3);
        assert_eq!(locations.inputs["ref"].source.kind(), LocationKind::Http);
        assert_eq!(locations.outputs["sorted"].source.kind(), LocationKind::Hdfs);
    }

    #[test]
    fn test_missing_payload_rejected() {
        let result =
            serde_json::from_str::<FileLocation>(r#"{"name": "x", "type": "s3", "http": {"url": "https://a"}}"#);
        let error = result.unwrap_err().to_string();
        assert!(error.contains("s3 data not provided"), "{}", error);
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(serde_json::from_str::<FileLocation>(r#"{"name": "x", "type": "git"}"#).is_err());
    }

    #[test]
    fn test_invalid_http_url_rejected() {
        let result = serde_json::from_str::<FileLocation>(
            r#"{"name": "x", "type": "http", "http": {"url": "not a url"}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_to_artifact_forwards_only_matching_payload() {
        let location: FileLocation = serde_json::from_str(
            r#"{"name": "reads", "type": "s3", "s3": {"bucket": "lab"}, "http": {"url": "https://ignored"}}"#,
        )
        .unwrap();
        let artifact = location.to_artifact("reads", "/data/reads.fq");
        assert_eq!(artifact.path, "/data/reads.fq");
        assert_eq!(artifact.s3.unwrap().bucket.as_deref(), Some("lab"));
        assert!(artifact.http.is_none());
        assert!(artifact.hdfs.is_none());
    }
}
