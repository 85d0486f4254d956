//! Transpilation runtime
//!
//! [`transpile`] turns one CommandLineTool, its classified runtime inputs and
//! its file locations into a single-template Argo Workflow. It is a pure
//! synchronous transformation: on any failure nothing is returned but the
//! error.

pub mod artifacts;
pub mod config;
pub mod container;
pub mod requirements;
pub mod volume;

pub use artifacts::{emit_input_artifacts, emit_output_artifact, emit_outputs, evaluate_glob};
pub use config::{load_config, ConfigError, TranspilerConfig};
pub use container::{
    build_args, build_command, emit_command_line, emit_docker_requirement, evaluate_argument,
};
pub use requirements::{find_docker_requirement, find_resource_requirement};
pub use volume::{attach_volume, emit_volume_claim, expression_to_quantity, needs_volume_claim};

use crate::core::{filter_params, flatten_inputs, flatten_outputs, FlatInput};
use crate::error::{TranspileError, TranspileResult};
use crate::location::FileLocations;
use crate::manifest::{Arguments, Container, Inputs, Outputs, Parameter, Template, Workflow, WorkflowSpec};
use crate::tree::CommandLineTool;
use crate::value::InputMap;

/// Transpile a tool with the default configuration.
pub fn transpile(
    tool: &CommandLineTool,
    inputs: &InputMap,
    locations: &FileLocations,
) -> TranspileResult<Workflow> {
    transpile_with_config(tool, inputs, locations, &TranspilerConfig::default())
}

/// Transpile a tool.
///
/// The tool's `id` names the workflow, its only template and the entrypoint.
/// A `DockerRequirement` is always required; a `ResourceRequirement` is
/// required once any output is a file.
pub fn transpile_with_config(
    tool: &CommandLineTool,
    inputs: &InputMap,
    locations: &FileLocations,
    config: &TranspilerConfig,
) -> TranspileResult<Workflow> {
    let id = tool
        .id
        .as_deref()
        .ok_or_else(|| TranspileError::validation("CommandLineTool has no id"))?;

    let mut container = Container::default();
    let docker = find_docker_requirement(tool.requirements())?;
    emit_docker_requirement(&mut container, docker)?;

    let bindings = flatten_inputs(tool.inputs(), inputs)?;
    let params = filter_params(&bindings);

    let outputs = flatten_outputs(tool.outputs())?;

    let mut spec = WorkflowSpec::default();
    if needs_volume_claim(&outputs) {
        tracing::info!(tool = id, "file outputs need a persistent volume claim");
        let resource = find_resource_requirement(tool.requirements())?;
        spec.volume_claim_templates = vec![emit_volume_claim(resource, config)?];
        attach_volume(&mut container, &config.volume_claim_name, &config.volume_mount_path);
    }

    emit_command_line(&mut container, tool.base_command(), tool.arguments(), &bindings)?;

    spec.arguments = Arguments {
        parameters: emit_arguments(&params)?,
        artifacts: Vec::new(),
    };

    let template = Template {
        name: id.to_string(),
        inputs: Inputs {
            parameters: params.iter().map(|p| Parameter::named(p.id)).collect(),
            artifacts: emit_input_artifacts(inputs, locations)?,
        },
        outputs: Outputs {
            artifacts: emit_outputs(&outputs, locations)?,
        },
        container: Some(container),
    };

    spec.entrypoint = template.name.clone();
    spec.templates = vec![template];
    Ok(Workflow::new(id, spec))
}

/// Workflow-level argument values for the scalar parameters.
fn emit_arguments(params: &[FlatInput<'_>]) -> TranspileResult<Vec<Parameter>> {
    params
        .iter()
        .map(|param| {
            let value = param.literal().ok_or_else(|| {
                TranspileError::unsupported(format!("{} workflow arguments", param.kind()))
            })?;
            Ok(Parameter::with_value(param.id, value))
        })
        .collect()
}
