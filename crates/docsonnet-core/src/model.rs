//! Document model: what the extractor produces and the renderer consumes.
//!
//! The serialized shape matches what docsonnet tooling exchanges: fields are
//! keyed by name and externally tagged by kind, names are not repeated inside
//! the field body.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A documented package: its own API plus nested sub-packages keyed by their
/// declared names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub import: String,
    pub help: String,

    #[serde(default, skip_serializing_if = "Fields::is_empty")]
    pub api: Fields,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sub: BTreeMap<String, Package>,
}

impl Package {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(input: &str) -> serde_json::Result<Package> {
        serde_json::from_str(input)
    }
}

/// One documentable shape. Exactly one variant is ever present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Function(Function),
    Object(Object),
    Value(Value),
}

impl Field {
    pub fn name(&self) -> &str {
        match self {
            Field::Function(f) => &f.name,
            Field::Object(o) => &o.name,
            Field::Value(v) => &v.name,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Field::Function(_))
    }

    fn set_name(&mut self, name: &str) {
        let slot = match self {
            Field::Function(f) => &mut f.name,
            Field::Object(o) => &mut o.name,
            Field::Value(v) => &mut v.name,
        };
        *slot = name.to_string();
    }
}

/// Fields keyed by name. Order carries no meaning here; the renderer sorts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<String, Field>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `field` under its own name, returning the field it replaced.
    pub fn insert(&mut self, field: Field) -> Option<Field> {
        self.0.insert(field.name().to_string(), field)
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.0.values()
    }
}

impl FromIterator<Field> for Fields {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for field in iter {
            fields.insert(field);
        }
        fields
    }
}

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Names are not part of the field body; take them from the keys.
        let mut map = BTreeMap::<String, Field>::deserialize(deserializer)?;
        for (name, field) in map.iter_mut() {
            field.set_name(name);
        }
        Ok(Fields(map))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Function {
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub help: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Argument>,
}

/// A key-value container. Its children are fields in their own right.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Object {
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub help: String,

    #[serde(default)]
    pub fields: Fields,
}

/// Anything that is neither a function nor an object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Value {
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub help: String,

    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grafana() -> Package {
        let datasource = Object {
            name: "datasource".into(),
            help: "ds-util makes creating datasources easy".into(),
            fields: [Field::Function(Function {
                name: "new".into(),
                help: "new creates a new datasource".into(),
                args: vec![Argument {
                    ty: "string".into(),
                    name: "name".into(),
                    default: None,
                }],
            })]
            .into_iter()
            .collect(),
        };

        Package {
            name: "grafana".into(),
            import: "grafana.libsonnet".into(),
            help: "grafana.libsonnet is the offical Jsonnet library for Grafana".into(),
            api: [
                Field::Function(Function {
                    name: "new".into(),
                    help: "new returns Grafana resources with sane defaults".into(),
                    args: vec![],
                }),
                Field::Object(datasource),
                Field::Value(Value {
                    name: "port".into(),
                    help: String::new(),
                    ty: "number".into(),
                    default: Some(json!(3000)),
                }),
            ]
            .into_iter()
            .collect(),
            sub: BTreeMap::new(),
        }
    }

    #[test]
    fn remarshal_is_stable() {
        let pkg = grafana();
        let first = pkg.to_json().unwrap();
        let back = Package::from_json(&first).unwrap();
        assert_eq!(back, pkg);
        assert_eq!(back.to_json().unwrap(), first);
    }

    #[test]
    fn names_come_from_keys() {
        let pkg = Package::from_json(
            r#"{"name": "x", "import": "", "help": "",
                "api": {"thing": {"object": {"help": "h", "fields": {"inner": {"value": {"type": "string"}}}}}}}"#,
        )
        .unwrap();
        let Some(Field::Object(obj)) = pkg.api.get("thing") else {
            panic!("expected object");
        };
        assert_eq!(obj.name, "thing");
        assert_eq!(obj.fields.get("inner").unwrap().name(), "inner");
    }

    #[test]
    fn field_without_kind_is_rejected() {
        let res = Package::from_json(r#"{"name": "x", "import": "", "help": "", "api": {"f": {}}}"#);
        assert!(res.is_err());
    }

    #[test]
    fn field_with_two_kinds_is_rejected() {
        let res = serde_json::from_str::<Field>(
            r#"{"function": {"help": ""}, "object": {"help": "", "fields": {}}}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn field_serializes_externally_tagged() {
        let field = Field::Function(Function {
            name: "f".into(),
            help: "h".into(),
            args: vec![],
        });
        assert_eq!(
            serde_json::to_value(&field).unwrap(),
            json!({"function": {"help": "h"}})
        );
    }
}
