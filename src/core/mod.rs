//! Binding flattener: unify declared parameters with resolved values.

pub mod inputs;
pub mod outputs;

pub use inputs::{filter_params, flatten_input, flatten_inputs, FlatInput};
pub use outputs::{flatten_output, flatten_outputs, FlatOutput};
