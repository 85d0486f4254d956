//! Flatten declared output parameters.

use crate::error::{TranspileError, TranspileResult};
use crate::tree::{CommandOutputBinding, OutputParameter};
use crate::types::TypeKind;

/// A declared output with its single resolved type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatOutput<'a> {
    pub id: &'a str,
    pub kind: TypeKind,
    pub parameter: &'a OutputParameter,
}

impl<'a> FlatOutput<'a> {
    pub fn binding(&self) -> Option<&'a CommandOutputBinding> {
        self.parameter.output_binding.as_ref()
    }
}

/// Flatten one declared output.
///
/// Outputs must declare exactly one type variant, and only strings,
/// integers and files are accepted.
pub fn flatten_output(parameter: &OutputParameter) -> TranspileResult<FlatOutput<'_>> {
    let id = parameter
        .id
        .as_deref()
        .ok_or_else(|| TranspileError::validation("output parameter has no id"))?;

    if parameter.types.len() != 1 {
        return Err(TranspileError::type_mismatch(
            id,
            format!(
                "only single output types are supported, got {} variants",
                parameter.types.len()
            ),
        ));
    }

    let kind = parameter.types.kinds()[0];
    match kind {
        TypeKind::String | TypeKind::Int | TypeKind::File => Ok(FlatOutput {
            id,
            kind,
            parameter,
        }),
        other => Err(TranspileError::type_mismatch(
            id,
            format!("{} is not a supported output type", other),
        )),
    }
}

/// Flatten every declared output, in declaration order.
pub fn flatten_outputs(parameters: &[OutputParameter]) -> TranspileResult<Vec<FlatOutput<'_>>> {
    parameters.iter().map(flatten_output).collect()
}
