//! CWL expression fields.
//!
//! Fields such as `outdirMin` or `valueFrom` may hold a scalar literal, a
//! plain string, or a parameter reference / JavaScript body. Only the first
//! two are ever evaluated by the transpiler.

use crate::tree::de::is_expression;
use serde::Deserialize;
use std::fmt;

/// A CWL expression field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ExpressionRepr")]
pub enum Expression {
    /// Plain text with no expression syntax
    Raw(String),
    /// A `$(...)` parameter reference or `${...}` body, left unevaluated
    Code(String),
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl Expression {
    /// The literal text, if this is a raw string.
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Expression::Raw(text) => Some(text),
            _ => None,
        }
    }

    /// Classify a string by whether it holds expression syntax.
    pub fn from_text(text: String) -> Self {
        if is_expression(&text) {
            Expression::Code(text)
        } else {
            Expression::Raw(text)
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Raw(text) | Expression::Code(text) => f.write_str(text),
            Expression::Bool(value) => write!(f, "{}", value),
            Expression::Int(value) => write!(f, "{}", value),
            Expression::Float(value) => write!(f, "{}", value),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExpressionRepr {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<ExpressionRepr> for Expression {
    fn from(repr: ExpressionRepr) -> Self {
        match repr {
            ExpressionRepr::Bool(value) => Expression::Bool(value),
            ExpressionRepr::Int(value) => Expression::Int(value),
            ExpressionRepr::Float(value) => Expression::Float(value),
            ExpressionRepr::Text(text) => Expression::from_text(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_kinds() {
        assert_eq!(
            serde_json::from_str::<Expression>("true").unwrap(),
            Expression::Bool(true)
        );
        assert_eq!(
            serde_json::from_str::<Expression>("2").unwrap(),
            Expression::Int(2)
        );
        assert_eq!(
            serde_json::from_str::<Expression>("2.3").unwrap(),
            Expression::Float(2.3)
        );
    }

    #[test]
    fn test_text_kinds() {
        assert_eq!(
            serde_json::from_str::<Expression>(r#""4Gi""#).unwrap(),
            Expression::Raw("4Gi".to_string())
        );
        assert_eq!(
            serde_json::from_str::<Expression>(r#""$(inputs.size)""#).unwrap(),
            Expression::Code("$(inputs.size)".to_string())
        );
    }

    #[test]
    fn test_yaml_scalars() {
        let expr: Expression = serde_yaml_ng::from_str("1024").unwrap();
        assert_eq!(expr, Expression::Int(1024));
        let expr: Expression = serde_yaml_ng::from_str("hello").unwrap();
        assert_eq!(expr.as_raw(), Some("hello"));
    }
}
