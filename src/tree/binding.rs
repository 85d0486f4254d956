//! Command-line binding rules, output bindings and tool arguments.

use crate::tree::de::is_expression;
use crate::tree::expression::Expression;
use crate::tree::LoadListing;
use serde::Deserialize;

/// How a value becomes part of the synthesized command line.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandLineBinding {
    pub load_contents: Option<bool>,
    pub position: Option<i64>,
    pub prefix: Option<String>,
    /// Emit the prefix as its own token; `true` when unset
    pub separate: Option<bool>,
    pub item_separator: Option<String>,
    pub value_from: Option<Expression>,
    pub shell_quote: Option<bool>,
}

impl CommandLineBinding {
    /// Sort key on the command line. An absent position sorts as `0`.
    pub fn sort_position(&self) -> i64 {
        self.position.unwrap_or(0)
    }

    pub fn is_separate(&self) -> bool {
        self.separate.unwrap_or(true)
    }
}

/// The `glob` of an output binding.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "GlobRepr")]
pub enum Glob {
    String(String),
    Strings(Vec<String>),
    Expression(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GlobRepr {
    One(String),
    Many(Vec<String>),
}

impl From<GlobRepr> for Glob {
    fn from(repr: GlobRepr) -> Self {
        match repr {
            GlobRepr::One(text) if is_expression(&text) => Glob::Expression(text),
            GlobRepr::One(text) => Glob::String(text),
            GlobRepr::Many(patterns) => Glob::Strings(patterns),
        }
    }
}

/// How an output value is collected after the tool runs.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutputBinding {
    pub load_contents: Option<bool>,
    pub load_listing: Option<LoadListing>,
    pub glob: Option<Glob>,
    pub output_eval: Option<Expression>,
}

/// One entry of a tool's `arguments` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ArgumentRepr")]
pub enum Argument {
    String(String),
    Expression(String),
    Binding(CommandLineBinding),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ArgumentRepr {
    Text(String),
    Binding(CommandLineBinding),
}

impl From<ArgumentRepr> for Argument {
    fn from(repr: ArgumentRepr) -> Self {
        match repr {
            ArgumentRepr::Text(text) if is_expression(&text) => Argument::Expression(text),
            ArgumentRepr::Text(text) => Argument::String(text),
            ArgumentRepr::Binding(binding) => Argument::Binding(binding),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_defaults() {
        let binding: CommandLineBinding = serde_json::from_str(r#"{"prefix": "-o"}"#).unwrap();
        assert_eq!(binding.sort_position(), 0);
        assert!(binding.is_separate());

        let binding: CommandLineBinding =
            serde_json::from_str(r#"{"position": 3, "separate": false}"#).unwrap();
        assert_eq!(binding.sort_position(), 3);
        assert!(!binding.is_separate());
    }

    #[test]
    fn test_glob_forms() {
        assert_eq!(
            serde_json::from_str::<Glob>(r#""out.txt""#).unwrap(),
            Glob::String("out.txt".to_string())
        );
        assert_eq!(
            serde_json::from_str::<Glob>(r#"["a", "b"]"#).unwrap(),
            Glob::Strings(vec!["a".to_string(), "b".to_string()])
        );
        assert!(matches!(
            serde_json::from_str::<Glob>(r#""$(inputs.name)""#).unwrap(),
            Glob::Expression(_)
        ));
    }

    #[test]
    fn test_argument_forms() {
        let args: Vec<Argument> =
            serde_json::from_str(r#"["-c", "$(runtime.cores)", {"prefix": "-x", "valueFrom": "y"}]"#)
                .unwrap();
        assert_eq!(args[0], Argument::String("-c".to_string()));
        assert!(matches!(args[1], Argument::Expression(_)));
        assert!(matches!(args[2], Argument::Binding(_)));
    }
}
