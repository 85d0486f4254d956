//! Storage provisioning for file outputs.

use crate::core::FlatOutput;
use crate::error::{TranspileError, TranspileResult};
use crate::manifest::{
    AccessMode, Container, ObjectMeta, PersistentVolumeClaim, PersistentVolumeClaimSpec, Quantity,
    VolumeMount, VolumeResourceRequirements, RESOURCE_STORAGE,
};
use crate::runtime::config::TranspilerConfig;
use crate::tree::{Expression, ResourceRequirement};
use crate::types::TypeKind;

/// A tool needs a volume claim as soon as one output is a file.
pub fn needs_volume_claim(outputs: &[FlatOutput<'_>]) -> bool {
    outputs.iter().any(|output| output.kind == TypeKind::File)
}

/// Convert an `outdirMin` expression to a storage quantity.
///
/// Numbers are mebibytes, with fractions rounded up, and must be positive.
/// Raw text must already be a quantity. An absent expression falls back to
/// `default_mib`.
pub fn expression_to_quantity(
    expression: Option<&Expression>,
    default_mib: u64,
) -> TranspileResult<Quantity> {
    let text = match expression {
        None => format!("{}Mi", default_mib),
        Some(Expression::Raw(raw)) => raw.clone(),
        Some(Expression::Int(mib)) => format!("{}Mi", positive_mebibytes(*mib as f64)?),
        Some(Expression::Float(mib)) => format!("{}Mi", positive_mebibytes(*mib)?),
        Some(Expression::Code(_)) => return Err(TranspileError::unsupported("outdirMin expressions")),
        Some(Expression::Bool(_)) => {
            return Err(TranspileError::validation("outdirMin must be a number or quantity"))
        }
    };
    Quantity::parse(&text)
}

/// Round a mebibyte count up, rejecting values no claim can request.
fn positive_mebibytes(mib: f64) -> TranspileResult<u64> {
    let rounded = mib.ceil();
    // u64::MAX as f64 rounds up past the range, so the bound is exclusive.
    if !rounded.is_finite() || rounded <= 0.0 || rounded >= u64::MAX as f64 {
        return Err(TranspileError::validation(format!(
            "outdirMin must be a positive number of mebibytes, got {}",
            mib
        )));
    }
    Ok(rounded as u64)
}

/// Build the storage claim for a tool's outputs.
pub fn emit_volume_claim(
    resource: &ResourceRequirement,
    config: &TranspilerConfig,
) -> TranspileResult<PersistentVolumeClaim> {
    let quantity = expression_to_quantity(
        resource.outdir_min.as_ref(),
        config.default_outdir_min_mebibytes,
    )?;

    let mut resources = VolumeResourceRequirements::default();
    resources.requests.insert(RESOURCE_STORAGE.to_string(), quantity);

    Ok(PersistentVolumeClaim {
        metadata: ObjectMeta {
            name: config.volume_claim_name.clone(),
        },
        spec: PersistentVolumeClaimSpec {
            access_modes: vec![AccessMode::ReadWriteMany],
            resources,
        },
    })
}

/// Mount the claim into the container, at its working directory if set.
pub fn attach_volume(container: &mut Container, volume_name: &str, default_path: &str) {
    let mount_path = container
        .working_dir
        .as_deref()
        .filter(|dir| !dir.is_empty())
        .unwrap_or(default_path)
        .to_string();
    container.volume_mounts = vec![VolumeMount {
        name: volume_name.to_string(),
        mount_path,
    }];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn quantity(expression: Expression) -> TranspileResult<Quantity> {
        expression_to_quantity(Some(&expression), 1024)
    }

    #[test]
    fn test_numbers_are_mebibytes() {
        assert_eq!(quantity(Expression::Int(2)).unwrap().as_str(), "2Mi");
        assert_eq!(quantity(Expression::Float(2.3)).unwrap().as_str(), "3Mi");
        assert_eq!(quantity(Expression::Float(4.0)).unwrap().as_str(), "4Mi");
    }

    #[test]
    fn test_out_of_range_numbers_rejected() {
        for mib in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -5.0, 0.0, -0.5, 1e300] {
            let error = quantity(Expression::Float(mib)).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Validation, "{}", mib);
        }
        for mib in [-5, 0] {
            let error = quantity(Expression::Int(mib)).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Validation, "{}", mib);
        }
        assert_eq!(quantity(Expression::Float(0.2)).unwrap().as_str(), "1Mi");
    }

    #[test]
    fn test_yaml_special_numbers_rejected() {
        for text in ["outdirMin: .nan", "outdirMin: .inf", "outdirMin: -5"] {
            let resource: ResourceRequirement =
                serde_yaml_ng::from_str(&format!("class: ResourceRequirement\n{}\n", text)).unwrap();
            let error = emit_volume_claim(&resource, &TranspilerConfig::default()).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Validation, "{}", text);
        }
    }

    #[test]
    fn test_raw_quantity_passes_through() {
        assert_eq!(quantity(Expression::Raw("4Gi".to_string())).unwrap().as_str(), "4Gi");
        let error = quantity(Expression::Raw("lots".to_string())).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);
        let error = quantity(Expression::Raw("-5Mi".to_string())).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_absent_and_unsupported_expressions() {
        assert_eq!(expression_to_quantity(None, 1024).unwrap().as_str(), "1024Mi");
        assert!(quantity(Expression::Code("$(inputs.size)".to_string()))
            .unwrap_err()
            .is_unsupported());
        assert_eq!(
            quantity(Expression::Bool(true)).unwrap_err().kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_emit_volume_claim() {
        let resource = ResourceRequirement {
            outdir_min: Some(Expression::Int(512)),
            ..Default::default()
        };
        let claim = emit_volume_claim(&resource, &TranspilerConfig::default()).unwrap();
        assert_eq!(claim.metadata.name, "argovolume");
        assert_eq!(claim.spec.access_modes, vec![AccessMode::ReadWriteMany]);
        assert_eq!(claim.spec.resources.requests["storage"].as_str(), "512Mi");
    }

    #[test]
    fn test_attach_volume_prefers_working_dir() {
        let mut container = Container::default();
        attach_volume(&mut container, "argovolume", "/mnt/pvol");
        assert_eq!(container.volume_mounts[0].mount_path, "/mnt/pvol");

        let mut container = Container {
            working_dir: Some("/work".to_string()),
            ..Default::default()
        };
        attach_volume(&mut container, "argovolume", "/mnt/pvol");
        assert_eq!(container.volume_mounts.len(), 1);
        assert_eq!(container.volume_mounts[0].name, "argovolume");
        assert_eq!(container.volume_mounts[0].mount_path, "/work");
    }
}
