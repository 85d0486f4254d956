//! Deserialization helpers for CWL's shorthand document forms.
//!
//! CWL lets many fields be written either as a single item or a list, and
//! lets identifier-keyed lists be written as maps. These helpers normalize
//! both spellings into plain vectors.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Map as JsonMap, Value as JsonValue};

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    // Tried first: derived structs also accept sequences.
    Many(Vec<T>),
    One(T),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

/// Accept either `item` or `[item, ...]`.
pub fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(OneOrMany::deserialize(deserializer)?.into())
}

/// Like [`one_or_many`] but keeps an explicit `null` or absent field as `None`.
pub fn opt_one_or_many<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<OneOrMany<T>>::deserialize(deserializer)?.map(Vec::from))
}

/// Normalize a list that may also be written as a map keyed by `key`.
///
/// In map form, an object value gets `key` inserted and a `null` value
/// becomes an object holding only the key. Any other value is wrapped as
/// `{key: <map key>, shorthand: <value>}`, or rejected without a shorthand
/// field. An absent or `null` list stays `None`.
fn keyed_list<'de, D, T>(
    deserializer: D,
    key: &'static str,
    shorthand: Option<&'static str>,
) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<JsonValue>::deserialize(deserializer)?;
    let items = match raw {
        None | Some(JsonValue::Null) => return Ok(None),
        Some(JsonValue::Array(items)) => items,
        Some(JsonValue::Object(map)) => {
            let mut items = Vec::with_capacity(map.len());
            for (name, value) in map {
                let mut fields = match (value, shorthand) {
                    (JsonValue::Object(fields), _) => fields,
                    (JsonValue::Null, _) => JsonMap::new(),
                    (other, Some(field)) => {
                        let mut fields = JsonMap::new();
                        fields.insert(field.to_string(), other);
                        fields
                    }
                    (other, None) => {
                        return Err(D::Error::custom(format!(
                            "expected an object for `{}`, found {}",
                            name, other
                        )))
                    }
                };
                fields.insert(key.to_string(), JsonValue::String(name));
                items.push(JsonValue::Object(fields));
            }
            items
        }
        Some(other) => {
            return Err(D::Error::custom(format!(
                "expected a list or a map, found {}",
                other
            )))
        }
    };

    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(D::Error::custom))
        .collect::<Result<Vec<T>, D::Error>>()
        .map(Some)
}

/// Parameters keyed by `id`; a bare value is the parameter's type.
pub fn parameter_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    keyed_list(deserializer, "id", Some("type"))
}

/// Record fields keyed by `name`; a bare value is the field's type.
pub fn field_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(keyed_list(deserializer, "name", Some("type"))?.unwrap_or_default())
}

/// Requirements keyed by `class`.
pub fn class_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    keyed_list(deserializer, "class", None)
}

/// Hints keyed by `class`; a bare value is kept as-is under `value`.
pub fn hint_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    keyed_list(deserializer, "class", Some("value"))
}

/// Environment definitions keyed by `envName`; a bare value is the `envValue`.
pub fn env_def_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(keyed_list(deserializer, "envName", Some("envValue"))?.unwrap_or_default())
}

/// Whether a CWL string contains a parameter reference or expression body.
pub fn is_expression(text: &str) -> bool {
    text.contains("$(") || text.contains("${")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Param {
        id: String,
        #[serde(rename = "type")]
        ty: String,
    }

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "parameter_list")]
        params: Option<Vec<Param>>,
        #[serde(default, deserialize_with = "class_list")]
        requirements: Option<Vec<JsonValue>>,
        #[serde(default, deserialize_with = "hint_list")]
        hints: Option<Vec<JsonValue>>,
        #[serde(default, deserialize_with = "one_or_many")]
        words: Vec<String>,
        #[serde(default, deserialize_with = "opt_one_or_many")]
        doc: Option<Vec<String>>,
    }

    #[test]
    fn test_map_form_with_shorthand() {
        let holder: Holder =
            serde_json::from_str(r#"{"params": {"a": "string", "b": {"type": "int"}}}"#).unwrap();
        assert_eq!(
            holder.params,
            Some(vec![
                Param { id: "a".into(), ty: "string".into() },
                Param { id: "b".into(), ty: "int".into() },
            ])
        );
    }

    #[test]
    fn test_list_form() {
        let holder: Holder =
            serde_json::from_str(r#"{"params": [{"id": "x", "type": "File"}]}"#).unwrap();
        let params = holder.params.unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].id, "x");
    }

    #[test]
    fn test_one_or_many() {
        let holder: Holder = serde_json::from_str(r#"{"words": "echo"}"#).unwrap();
        assert_eq!(holder.words, vec!["echo".to_string()]);
        let holder: Holder = serde_json::from_str(r#"{"words": ["a", "b"]}"#).unwrap();
        assert_eq!(holder.words, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_absent_is_distinct_from_empty() {
        let holder: Holder = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(holder.doc, None);
        assert_eq!(holder.params, None);
        assert_eq!(holder.requirements, None);
        let holder: Holder =
            serde_json::from_str(r#"{"doc": [], "params": [], "requirements": {}}"#).unwrap();
        assert_eq!(holder.doc, Some(Vec::new()));
        assert_eq!(holder.params, Some(Vec::new()));
        assert_eq!(holder.requirements, Some(Vec::new()));
    }

    #[test]
    fn test_scalar_map_values_need_a_shorthand() {
        let error = serde_json::from_str::<Holder>(r#"{"requirements": {"Foo": "bar"}}"#)
            .unwrap_err();
        assert!(error.to_string().contains("expected an object for `Foo`"));

        let holder: Holder =
            serde_json::from_str(r#"{"requirements": {"Foo": null}}"#).unwrap();
        assert_eq!(holder.requirements, Some(vec![serde_json::json!({"class": "Foo"})]));
    }

    #[test]
    fn test_scalar_hints_are_kept_raw() {
        let holder: Holder =
            serde_json::from_str(r#"{"hints": {"Foo": "bar", "Baz": {"x": 1}, "Qux": [1, 2]}}"#)
                .unwrap();
        assert_eq!(
            holder.hints,
            Some(vec![
                serde_json::json!({"class": "Foo", "value": "bar"}),
                serde_json::json!({"class": "Baz", "x": 1}),
                serde_json::json!({"class": "Qux", "value": [1, 2]}),
            ])
        );
    }

    #[test]
    fn test_is_expression() {
        assert!(is_expression("$(inputs.x)"));
        assert!(is_expression("${ return 1; }"));
        assert!(!is_expression("4Gi"));
    }
}
