//! Flatten declared input parameters against their runtime values.

use crate::error::{LookupTarget, TranspileError, TranspileResult};
use crate::tree::{CommandLineBinding, InputParameter};
use crate::types::TypeKind;
use crate::value::{CwlFile, InputEntry, InputMap};

/// A declared input unified with its resolved runtime value.
///
/// Borrows from the tool and the input map, so it lives only as long as one
/// transpilation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatInput<'a> {
    pub id: &'a str,
    pub entry: &'a InputEntry,
    pub parameter: &'a InputParameter,
}

impl<'a> FlatInput<'a> {
    pub fn kind(&self) -> TypeKind {
        self.entry.kind()
    }

    pub fn binding(&self) -> Option<&'a CommandLineBinding> {
        self.parameter.input_binding.as_ref()
    }

    pub fn file(&self) -> Option<&'a CwlFile> {
        self.entry.as_file()
    }

    /// The literal value as a workflow parameter string; `None` for files.
    pub fn literal(&self) -> Option<String> {
        match self.entry {
            InputEntry::Bool(value) => Some(value.to_string()),
            InputEntry::Int(value) => Some(value.to_string()),
            InputEntry::String(value) => Some(value.clone()),
            InputEntry::File(_) => None,
        }
    }

    pub fn doc(&self) -> Option<&'a [String]> {
        self.parameter.doc.as_deref()
    }
}

/// Flatten one declared input.
pub fn flatten_input<'a>(
    parameter: &'a InputParameter,
    inputs: &'a InputMap,
) -> TranspileResult<FlatInput<'a>> {
    let id = parameter
        .id
        .as_deref()
        .ok_or_else(|| TranspileError::validation("input parameter has no id"))?;

    let entry = inputs
        .get(id)
        .ok_or_else(|| TranspileError::not_found(LookupTarget::Input, id))?;

    if !parameter.types.accepts(entry.kind()) {
        let declared: Vec<String> = parameter.types.kinds().iter().map(|k| k.to_string()).collect();
        return Err(TranspileError::type_mismatch(
            id,
            format!(
                "expected one of [{}] but got {}",
                declared.join(", "),
                entry.kind()
            ),
        ));
    }

    Ok(FlatInput {
        id,
        entry,
        parameter,
    })
}

/// Flatten every declared input, in declaration order.
///
/// Every declared input must have a supplied value.
pub fn flatten_inputs<'a>(
    parameters: &'a [InputParameter],
    inputs: &'a InputMap,
) -> TranspileResult<Vec<FlatInput<'a>>> {
    parameters
        .iter()
        .map(|parameter| flatten_input(parameter, inputs))
        .collect()
}

/// Keep the bindings that become workflow input parameters.
///
/// Files become artifacts. Booleans are flags baked into the command line.
/// Records, arrays and enums cannot be exposed as scalar parameters.
pub fn filter_params<'a>(bindings: &[FlatInput<'a>]) -> Vec<FlatInput<'a>> {
    bindings
        .iter()
        .filter(|binding| binding.kind().is_parameter())
        .copied()
        .collect()
}
