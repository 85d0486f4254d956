//! Container emission: image, command and argument vectors
//!
//! Every emitter here works on a staged copy of the container and only
//! writes it back once every check has passed, so a failed emission leaves
//! the caller's container untouched.

use crate::core::FlatInput;
use crate::error::{TranspileError, TranspileResult};
use crate::manifest::Container;
use crate::tree::{Argument, CommandLineBinding, DockerRequirement};
use crate::value::InputEntry;

/// Apply a `DockerRequirement` to a container.
///
/// `dockerPull` is required. `dockerOutputDirectory` is taken as the
/// container working directory. `dockerLoad` is ignored.
pub fn emit_docker_requirement(
    container: &mut Container,
    docker: &DockerRequirement,
) -> TranspileResult<()> {
    let mut staged = container.clone();

    let image = docker
        .docker_pull
        .as_deref()
        .ok_or_else(|| TranspileError::validation("dockerPull is a required field"))?;
    staged.image = image.to_string();

    if docker.docker_file.is_some() {
        return Err(TranspileError::unsupported("dockerFile"));
    }
    if docker.docker_image_id.is_some() {
        return Err(TranspileError::unsupported("dockerImageId"));
    }
    if docker.docker_import.is_some() {
        return Err(TranspileError::unsupported("dockerImport"));
    }

    if let Some(dir) = &docker.docker_output_directory {
        tracing::warn!(
            working_dir = %dir,
            "treating dockerOutputDirectory as the container working directory"
        );
        staged.working_dir = Some(dir.clone());
    }

    *container = staged;
    Ok(())
}

/// Evaluate a tool argument. Only literal strings are supported.
pub fn evaluate_argument(argument: &Argument) -> TranspileResult<&str> {
    match argument {
        Argument::String(text) => Ok(text.as_str()),
        Argument::Expression(_) => Err(TranspileError::unsupported("expression arguments")),
        Argument::Binding(_) => Err(TranspileError::unsupported("binding arguments")),
    }
}

/// Build the command vector from `baseCommand` and the literal arguments.
///
/// Without a base command the first argument becomes the command and the
/// remaining arguments follow it.
pub fn build_command(base_command: &[String], arguments: &[Argument]) -> TranspileResult<Vec<String>> {
    let (mut command, rest) = match (base_command.is_empty(), arguments.split_first()) {
        (false, _) => (base_command.to_vec(), arguments),
        (true, Some((first, rest))) => (vec![evaluate_argument(first)?.to_string()], rest),
        (true, None) => {
            return Err(TranspileError::validation(
                "a tool needs a baseCommand or at least one argument",
            ))
        }
    };
    for argument in rest {
        command.push(evaluate_argument(argument)?.to_string());
    }
    Ok(command)
}

/// Placeholder referencing a workflow input parameter.
pub fn parameter_placeholder(id: &str) -> String {
    format!("{{{{inputs.parameters.{}}}}}", id)
}

/// Build the argument vector from the complete (unfiltered) binding list.
///
/// Bindings are stably sorted by position, where an absent position sorts
/// as `0`. Scalars become parameter placeholders; files become their
/// literal path and are skipped when they have no `inputBinding`.
pub fn build_args(bindings: &[FlatInput<'_>]) -> TranspileResult<Vec<String>> {
    for binding in bindings {
        if let Some(position) = binding.binding().and_then(|b| b.position) {
            if position < 0 {
                return Err(TranspileError::validation(format!(
                    "input `{}` has negative position {}",
                    binding.id, position
                )));
            }
        }
    }

    let mut sorted = bindings.to_vec();
    sorted.sort_by_key(|b| b.binding().map(CommandLineBinding::sort_position).unwrap_or(0));

    let mut args = Vec::new();
    for flat in sorted {
        let rule = flat.binding();
        let prefix = rule.and_then(|r| r.prefix.as_deref());
        let separate = rule.map(CommandLineBinding::is_separate).unwrap_or(true);

        let value = match flat.entry {
            InputEntry::File(file) => {
                if rule.is_none() {
                    continue;
                }
                file.path.clone().ok_or_else(|| {
                    TranspileError::validation(format!(
                        "file information for input `{}` has no path",
                        flat.id
                    ))
                })?
            }
            // Flags: the prefix alone when true, nothing otherwise.
            InputEntry::Bool(value) => {
                if let (true, Some(prefix)) = (*value, prefix) {
                    args.push(prefix.to_string());
                }
                continue;
            }
            InputEntry::Int(_) | InputEntry::String(_) => parameter_placeholder(flat.id),
        };

        match prefix {
            Some(prefix) if separate => {
                args.push(prefix.to_string());
                args.push(value);
            }
            Some(prefix) => args.push(format!("{}{}", prefix, value)),
            None => args.push(value),
        }
    }
    Ok(args)
}

/// Set a container's command and argument vectors.
pub fn emit_command_line(
    container: &mut Container,
    base_command: &[String],
    arguments: &[Argument],
    bindings: &[FlatInput<'_>],
) -> TranspileResult<()> {
    let command = build_command(base_command, arguments)?;
    let args = build_args(bindings)?;
    tracing::debug!(?command, ?args, "synthesized command line");

    container.command = command;
    container.args = args;
    Ok(())
}
