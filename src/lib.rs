//! # cwl2argo
//!
//! Transpiles a CWL `CommandLineTool`, together with a job's input values and
//! the external locations of its files, into an Argo Workflow manifest.
//!
//! The pipeline is: decode the document model ([`tree`]), classify runtime
//! inputs ([`value`]), flatten declared parameters against those values
//! ([`core`]), then emit the container, storage and artifacts
//! ([`runtime`]) into a [`manifest::Workflow`].

pub mod core;
pub mod error;
pub mod loader;
pub mod location;
pub mod manifest;
pub mod runtime;
pub mod tree;
pub mod types;
pub mod value;

pub use error::{ErrorKind, LookupTarget, TranspileError, TranspileResult};
pub use location::{FileLocation, FileLocations};
pub use manifest::Workflow;
pub use runtime::{transpile, transpile_with_config, TranspilerConfig};
pub use tree::CommandLineTool;
pub use types::{CwlType, TypeKind, TypeList};
pub use value::{InputEntry, InputMap};
