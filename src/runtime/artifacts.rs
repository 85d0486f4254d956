//! Artifact mapping between file parameters and external storage.

use crate::core::FlatOutput;
use crate::error::{LookupTarget, TranspileError, TranspileResult};
use crate::location::FileLocations;
use crate::manifest::Artifact;
use crate::tree::Glob;
use crate::types::TypeKind;
use crate::value::{InputEntry, InputMap};

/// Build input artifacts for every file in the runtime inputs.
///
/// Artifacts follow the order of the input document, and each is named after
/// its location entry.
pub fn emit_input_artifacts(
    inputs: &InputMap,
    locations: &FileLocations,
) -> TranspileResult<Vec<Artifact>> {
    let mut artifacts = Vec::new();
    for (id, entry) in inputs {
        let InputEntry::File(file) = entry else {
            continue;
        };
        let location = locations
            .inputs
            .get(id)
            .ok_or_else(|| TranspileError::not_found(LookupTarget::Location, id.as_str()))?;
        let path = file.path.as_deref().ok_or_else(|| {
            TranspileError::validation(format!("file information for input `{}` has no path", id))
        })?;
        artifacts.push(location.to_artifact(location.name.as_str(), path));
    }
    Ok(artifacts)
}

/// Evaluate an output glob to a path. Only a single literal pattern is supported.
pub fn evaluate_glob(glob: Option<&Glob>) -> TranspileResult<&str> {
    match glob {
        Some(Glob::String(pattern)) => {
            glob::Pattern::new(pattern).map_err(|e| {
                TranspileError::validation(format!("invalid glob `{}`: {}", pattern, e))
            })?;
            Ok(pattern.as_str())
        }
        Some(Glob::Strings(_)) => Err(TranspileError::unsupported("glob lists")),
        Some(Glob::Expression(_)) => Err(TranspileError::unsupported("glob expressions")),
        None => Err(TranspileError::validation("output binding has no glob")),
    }
}

/// Build the artifact for a file output, named after the output.
pub fn emit_output_artifact(
    output: &FlatOutput<'_>,
    locations: &FileLocations,
) -> TranspileResult<Artifact> {
    if output.kind != TypeKind::File {
        return Err(TranspileError::unsupported(format!("{} outputs", output.kind)));
    }
    let binding = output.binding().ok_or_else(|| {
        TranspileError::validation(format!("output `{}` has no outputBinding", output.id))
    })?;
    let path = evaluate_glob(binding.glob.as_ref())?;
    let location = locations
        .outputs
        .get(output.id)
        .ok_or_else(|| TranspileError::not_found(LookupTarget::Location, output.id))?;
    Ok(location.to_artifact(output.id, path))
}

/// Build artifacts for every output. Only file outputs are supported.
pub fn emit_outputs(
    outputs: &[FlatOutput<'_>],
    locations: &FileLocations,
) -> TranspileResult<Vec<Artifact>> {
    outputs
        .iter()
        .map(|output| emit_output_artifact(output, locations))
        .collect()
}
