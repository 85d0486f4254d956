//! Requirement resolver.
//!
//! Each lookup scans the whole requirement list and the latest occurrence of
//! a class wins. Duplicates are logged, never rejected.

use crate::error::{LookupTarget, TranspileError, TranspileResult};
use crate::tree::{DockerRequirement, Requirement, ResourceRequirement};

/// Find the `DockerRequirement`; the last one declared wins.
pub fn find_docker_requirement(requirements: &[Requirement]) -> TranspileResult<&DockerRequirement> {
    let mut found = None;
    for requirement in requirements {
        if let Requirement::Docker(docker) = requirement {
            tracing::info!(class = requirement.class(), "requirement found");
            found = Some(docker);
        }
    }
    found.ok_or_else(|| TranspileError::not_found(LookupTarget::Requirement, "DockerRequirement"))
}

/// Find the `ResourceRequirement`; the last one declared wins.
pub fn find_resource_requirement(
    requirements: &[Requirement],
) -> TranspileResult<&ResourceRequirement> {
    let mut found = None;
    for requirement in requirements {
        if let Requirement::Resource(resource) = requirement {
            tracing::info!(class = requirement.class(), "requirement found");
            found = Some(resource);
        }
    }
    found.ok_or_else(|| TranspileError::not_found(LookupTarget::Requirement, "ResourceRequirement"))
}
