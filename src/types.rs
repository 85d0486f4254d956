//! CWL type system
//!
//! A CWL parameter accepts one or more type variants. Each variant is a
//! closed tag, and only the record, enum and array tags carry a sub-schema.
//! The same [`TypeKind`] tag space classifies concrete runtime values, which
//! is what lets the binding flattener check a value against a declaration.
//!
//! Shorthands accepted when decoding:
//! 1. `T?` adds a `null` variant to `T`
//! 2. `T[]` is an array whose items are `T`
//! 3. a list of types is a union of all its variants

use crate::tree::binding::CommandLineBinding;
use crate::tree::de;
use crate::tree::{Format, LoadListing, SecondaryFile};
use serde::Deserialize;
use std::fmt;

/// The tag of a type variant, with no embedded schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    File,
    Directory,
    Stdin,
    String,
    Record,
    RecordField,
    Enum,
    Array,
}

impl TypeKind {
    /// Whether bindings of this kind can be exposed as scalar workflow parameters.
    ///
    /// Booleans are not: they are flags, resolved into `args` when the
    /// manifest is built and never referenced through a placeholder.
    pub fn is_parameter(&self) -> bool {
        !matches!(
            self,
            TypeKind::Boolean
                | TypeKind::File
                | TypeKind::RecordField
                | TypeKind::Array
                | TypeKind::Enum
        )
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeKind::Null => "null",
            TypeKind::Boolean => "boolean",
            TypeKind::Int => "int",
            TypeKind::Long => "long",
            TypeKind::Float => "float",
            TypeKind::Double => "double",
            TypeKind::File => "File",
            TypeKind::Directory => "Directory",
            TypeKind::Stdin => "stdin",
            TypeKind::String => "string",
            TypeKind::Record => "record",
            TypeKind::RecordField => "record field",
            TypeKind::Enum => "enum",
            TypeKind::Array => "array",
        };
        f.write_str(name)
    }
}

/// One accepted type variant of a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum CwlType {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    File,
    Directory,
    Stdin,
    String,
    Record(RecordSchema),
    RecordField,
    Enum(EnumSchema),
    Array(ArraySchema),
}

impl CwlType {
    /// Get the tag of this variant.
    pub fn kind(&self) -> TypeKind {
        match self {
            CwlType::Null => TypeKind::Null,
            CwlType::Boolean => TypeKind::Boolean,
            CwlType::Int => TypeKind::Int,
            CwlType::Long => TypeKind::Long,
            CwlType::Float => TypeKind::Float,
            CwlType::Double => TypeKind::Double,
            CwlType::File => TypeKind::File,
            CwlType::Directory => TypeKind::Directory,
            CwlType::Stdin => TypeKind::Stdin,
            CwlType::String => TypeKind::String,
            CwlType::Record(_) => TypeKind::Record,
            CwlType::RecordField => TypeKind::RecordField,
            CwlType::Enum(_) => TypeKind::Enum,
            CwlType::Array(_) => TypeKind::Array,
        }
    }

    fn from_name(name: &str) -> Result<Vec<CwlType>, String> {
        if let Some(inner) = name.strip_suffix('?') {
            let mut types = vec![CwlType::Null];
            types.extend(CwlType::from_name(inner)?);
            return Ok(types);
        }
        if let Some(inner) = name.strip_suffix("[]") {
            let items = TypeList(CwlType::from_name(inner)?);
            return Ok(vec![CwlType::Array(ArraySchema::of(items))]);
        }

        let ty = match name {
            "null" => CwlType::Null,
            "boolean" => CwlType::Boolean,
            "int" => CwlType::Int,
            "long" => CwlType::Long,
            "float" => CwlType::Float,
            "double" => CwlType::Double,
            "File" => CwlType::File,
            "Directory" => CwlType::Directory,
            "stdin" => CwlType::Stdin,
            "string" => CwlType::String,
            other => return Err(format!("unknown CWL type `{}`", other)),
        };
        Ok(vec![ty])
    }
}

/// The accepted variants of a parameter.
///
/// A single variant is a scalar; more than one is a union. The cardinality
/// lives in the list length, not in a separate flag.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(try_from = "TypeRepr")]
pub struct TypeList(pub Vec<CwlType>);

impl TypeList {
    pub fn iter(&self) -> std::slice::Iter<'_, CwlType> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any variant has the given tag.
    pub fn accepts(&self, kind: TypeKind) -> bool {
        self.0.iter().any(|ty| ty.kind() == kind)
    }

    /// Tags of all variants, in declaration order.
    pub fn kinds(&self) -> Vec<TypeKind> {
        self.0.iter().map(CwlType::kind).collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TypeRepr {
    Name(String),
    List(Vec<TypeRepr>),
    Schema(SchemaDef),
}

impl TypeRepr {
    fn flatten_into(self, types: &mut Vec<CwlType>) -> Result<(), String> {
        match self {
            TypeRepr::Name(name) => types.extend(CwlType::from_name(&name)?),
            TypeRepr::Schema(SchemaDef::Array(schema)) => types.push(CwlType::Array(schema)),
            TypeRepr::Schema(SchemaDef::Record(schema)) => types.push(CwlType::Record(schema)),
            TypeRepr::Schema(SchemaDef::Enum(schema)) => types.push(CwlType::Enum(schema)),
            TypeRepr::List(items) => {
                for item in items {
                    item.flatten_into(types)?;
                }
            }
        }
        Ok(())
    }
}

impl TryFrom<TypeRepr> for TypeList {
    type Error = String;

    fn try_from(repr: TypeRepr) -> Result<Self, Self::Error> {
        let mut types = Vec::new();
        repr.flatten_into(&mut types)?;
        if types.is_empty() {
            return Err("a type declaration needs at least one variant".to_string());
        }
        Ok(TypeList(types))
    }
}

/// A named schema, as written inline or under `SchemaDefRequirement`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SchemaDef {
    Array(ArraySchema),
    Record(RecordSchema),
    Enum(EnumSchema),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArraySchema {
    pub items: TypeList,
    pub label: Option<String>,
    #[serde(default, deserialize_with = "de::opt_one_or_many")]
    pub doc: Option<Vec<String>>,
    pub name: Option<String>,
    pub input_binding: Option<CommandLineBinding>,
}

impl ArraySchema {
    /// An anonymous array of the given item types.
    pub fn of(items: TypeList) -> Self {
        Self {
            items,
            label: None,
            doc: None,
            name: None,
            input_binding: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumSchema {
    pub symbols: Vec<String>,
    pub label: Option<String>,
    #[serde(default, deserialize_with = "de::opt_one_or_many")]
    pub doc: Option<Vec<String>>,
    pub name: Option<String>,
    pub input_binding: Option<CommandLineBinding>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSchema {
    #[serde(default, deserialize_with = "de::field_list")]
    pub fields: Vec<RecordField>,
    pub label: Option<String>,
    #[serde(default, deserialize_with = "de::opt_one_or_many")]
    pub doc: Option<Vec<String>>,
    pub name: Option<String>,
    pub input_binding: Option<CommandLineBinding>,
}

/// One field of a record schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordField {
    pub name: String,
    #[serde(rename = "type")]
    pub types: TypeList,
    #[serde(default, deserialize_with = "de::opt_one_or_many")]
    pub doc: Option<Vec<String>>,
    pub label: Option<String>,
    #[serde(default, deserialize_with = "de::opt_one_or_many")]
    pub secondary_files: Option<Vec<SecondaryFile>>,
    pub streamable: Option<bool>,
    pub format: Option<Format>,
    pub load_contents: Option<bool>,
    pub load_listing: Option<LoadListing>,
    pub input_binding: Option<CommandLineBinding>,
}
