//! The untyped tree produced by the external evaluator.
//!
//! Only string-keyed mappings, sequences and JSON scalars exist. Mappings are
//! kept in a `BTreeMap` so nothing downstream can depend on the evaluator's
//! key order.

use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Key holding a package header.
pub const PACKAGE_KEY: &str = "#";

/// Prefix marking a documentation annotation for the field named by the rest
/// of the key.
pub const ANNOTATION_PREFIX: char = '#';

pub type Mapping = BTreeMap<String, Tree>;

#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    Scalar(Scalar),
    Sequence(Vec<Tree>),
    Mapping(Mapping),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Tree {
    pub fn from_json(input: &str) -> serde_json::Result<Tree> {
        serde_json::from_str::<Value>(input).map(Tree::from)
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Tree::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Tree::Scalar(Scalar::Null))
    }

    /// Short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Tree::Scalar(Scalar::Null) => "null",
            Tree::Scalar(Scalar::Bool(_)) => "boolean",
            Tree::Scalar(Scalar::Number(_)) => "number",
            Tree::Scalar(Scalar::String(_)) => "string",
            Tree::Sequence(_) => "array",
            Tree::Mapping(_) => "object",
        }
    }
}

impl From<Value> for Tree {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Tree::Scalar(Scalar::Null),
            Value::Bool(b) => Tree::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Tree::Scalar(Scalar::Number(n)),
            Value::String(s) => Tree::Scalar(Scalar::String(s)),
            Value::Array(items) => Tree::Sequence(items.into_iter().map(Tree::from).collect()),
            Value::Object(map) => {
                Tree::Mapping(map.into_iter().map(|(k, v)| (k, Tree::from(v))).collect())
            }
        }
    }
}

impl From<&Tree> for Value {
    fn from(tree: &Tree) -> Self {
        match tree {
            Tree::Scalar(Scalar::Null) => Value::Null,
            Tree::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
            Tree::Scalar(Scalar::Number(n)) => Value::Number(n.clone()),
            Tree::Scalar(Scalar::String(s)) => Value::String(s.clone()),
            Tree::Sequence(items) => Value::Array(items.iter().map(Value::from).collect()),
            Tree::Mapping(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// What a single mapping says about one logical field name.
#[derive(Debug, Default, Clone, Copy)]
pub struct Entry<'a> {
    /// Payload of the `#name` key.
    pub annotation: Option<&'a Tree>,
    /// Value of the plain `name` key.
    pub children: Option<&'a Tree>,
}

/// A mapping split into its package header and per-field entries.
#[derive(Debug, Default)]
pub struct Partition<'a> {
    pub header: Option<&'a Tree>,
    pub entries: BTreeMap<&'a str, Entry<'a>>,
}

impl<'a> Partition<'a> {
    /// Single pass over `map`. This is the only place that looks at the
    /// annotation prefix.
    pub fn of(map: &'a Mapping) -> Self {
        let mut partition = Partition::default();
        for (key, value) in map {
            if key == PACKAGE_KEY {
                partition.header = Some(value);
            } else if let Some(name) = key.strip_prefix(ANNOTATION_PREFIX) {
                partition.entries.entry(name).or_default().annotation = Some(value);
            } else {
                partition.entries.entry(key.as_str()).or_default().children = Some(value);
            }
        }
        partition
    }
}
