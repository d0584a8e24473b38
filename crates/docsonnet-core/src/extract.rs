//! Model extraction: reconcile annotations with the data they describe.
//!
//! Every mapping is split once into per-name entries (see `tree::Partition`).
//! An entry can carry an annotation (`#name`), the plain value (`name`) or
//! both. Annotations decide a field's shape; plain mappings supply an object's
//! children and surface documented descendants of undocumented data.

use crate::error::{Error, Result};
use crate::model::{Argument, Field, Fields, Function, Object, Package, Value};
use crate::tree::{Mapping, Partition, Scalar, Tree, PACKAGE_KEY};
use std::collections::btree_map::Entry as MapEntry;
use std::collections::BTreeMap;
use tracing::debug;

const MARKERS: [&str; 3] = ["function", "object", "value"];

/// Extract the root package from an evaluated tree.
pub fn extract(tree: &Tree) -> Result<Package> {
    match tree {
        Tree::Mapping(map) => package(map, ""),
        other => Err(Error::MalformedTree {
            path: display(""),
            reason: format!("expected an object at the root, found {}", other.kind()),
        }),
    }
}

/// Sub-packages collected while walking one package, keyed by declared name.
/// Remembers where each was found so a collision can name both places.
#[derive(Default)]
struct SubPackages(BTreeMap<String, (String, Package)>);

impl SubPackages {
    fn register(&mut self, pkg: Package, path: String) -> Result<()> {
        match self.0.entry(pkg.name.clone()) {
            MapEntry::Occupied(existing) => Err(Error::DuplicatePackage {
                name: pkg.name,
                first: existing.get().0.clone(),
                second: path,
            }),
            MapEntry::Vacant(slot) => {
                slot.insert((path, pkg));
                Ok(())
            }
        }
    }

    fn into_packages(self) -> BTreeMap<String, Package> {
        self.0
            .into_iter()
            .map(|(name, (_, pkg))| (name, pkg))
            .collect()
    }
}

fn package(map: &Mapping, path: &str) -> Result<Package> {
    let partition = Partition::of(map);
    let header = partition.header.ok_or_else(|| Error::MalformedTree {
        path: display(path),
        reason: format!("missing package declaration `{}`", PACKAGE_KEY),
    })?;

    let header = header.as_mapping().ok_or_else(|| Error::MalformedTree {
        path: display(path),
        reason: format!(
            "package declaration must be an object, found {}",
            header.kind()
        ),
    })?;
    let name = header_string(header, "name", path)?;
    let import = header_string(header, "import", path)?;
    let help = header_string(header, "help", path)?;

    debug!(package = %name, path = %display(path), "extracting package");

    let here = if path.is_empty() { name.clone() } else { path.to_string() };
    let mut subs = SubPackages::default();
    let api = fields(&partition, &here, &mut subs)?;

    Ok(Package {
        name,
        import,
        help,
        api,
        sub: subs.into_packages(),
    })
}

fn header_string(header: &Mapping, key: &str, path: &str) -> Result<String> {
    match header.get(key) {
        Some(Tree::Scalar(Scalar::String(s))) => Ok(s.clone()),
        Some(other) => Err(Error::MalformedTree {
            path: display(path),
            reason: format!(
                "package declaration field `{}` must be a string, found {}",
                key,
                other.kind()
            ),
        }),
        None => Err(Error::MalformedTree {
            path: display(path),
            reason: format!("package declaration lacks `{}`", key),
        }),
    }
}

/// Turn every entry of a partitioned mapping into at most one field.
fn fields(partition: &Partition<'_>, path: &str, subs: &mut SubPackages) -> Result<Fields> {
    let mut out = Fields::new();

    for (&name, entry) in &partition.entries {
        let field_path = join(path, name);

        // A nested package is never a field, whatever key leads to it.
        let children = match entry.children {
            Some(Tree::Mapping(map)) if map.contains_key(PACKAGE_KEY) => {
                let pkg = package(map, &field_path)?;
                subs.register(pkg, field_path.clone())?;
                None
            }
            other => other,
        };

        let field = match (entry.annotation, children) {
            (Some(annotation), children) => {
                Some(annotated(name, annotation, children, &field_path, subs)?)
            }
            (None, Some(Tree::Mapping(map))) => pass_through(name, map, &field_path, subs)?,
            (None, _) => None,
        };

        if let Some(field) = field {
            out.insert(field);
        }
    }

    Ok(out)
}

/// Undocumented nested data: keep it only as a container for documented
/// descendants.
fn pass_through(
    name: &str,
    map: &Mapping,
    path: &str,
    subs: &mut SubPackages,
) -> Result<Option<Field>> {
    let nested = fields(&Partition::of(map), path, subs)?;
    if nested.is_empty() {
        debug!(path = %path, "dropping undocumented field");
        return Ok(None);
    }

    Ok(Some(Field::Object(Object {
        name: name.to_string(),
        help: String::new(),
        fields: nested,
    })))
}

fn annotated(
    name: &str,
    annotation: &Tree,
    children: Option<&Tree>,
    path: &str,
    subs: &mut SubPackages,
) -> Result<Field> {
    let payload = expect_mapping(annotation, path)?;

    let present: Vec<&str> = MARKERS
        .iter()
        .copied()
        .filter(|m| payload.contains_key(*m))
        .collect();

    let marker = match present.as_slice() {
        [one] => *one,
        [] => {
            return Err(Error::MalformedField {
                path: path.to_string(),
                reason: "annotation has none of `function`, `object`, `value`".to_string(),
            })
        }
        many => {
            return Err(Error::MalformedField {
                path: path.to_string(),
                reason: format!("annotation has more than one kind: {}", many.join(", ")),
            })
        }
    };

    let body = expect_mapping(&payload[marker], path)?;

    if marker == "object" {
        let fields = match children {
            Some(Tree::Mapping(map)) => fields(&Partition::of(map), path, subs)?,
            Some(other) => {
                return Err(Error::AmbiguousInput {
                    path: path.to_string(),
                    expected: "object",
                    found: other.kind(),
                })
            }
            None => Fields::new(),
        };

        return Ok(Field::Object(Object {
            name: name.to_string(),
            help: optional_string(body, "help", path)?.unwrap_or_default(),
            fields,
        }));
    }

    // Functions and values take their shape from the annotation alone. Nested
    // data is still walked so packages and errors below it are not lost.
    if let Some(Tree::Mapping(map)) = children {
        let shadowed = fields(&Partition::of(map), path, subs)?;
        if !shadowed.is_empty() {
            debug!(path = %path, count = shadowed.len(), "annotated {} shadows nested fields", marker);
        }
    }

    match marker {
        "function" => function(name, body, path).map(Field::Function),
        _ => value(name, body, path).map(Field::Value),
    }
}

fn function(name: &str, body: &Mapping, path: &str) -> Result<Function> {
    let args = match body.get("args") {
        None | Some(Tree::Scalar(Scalar::Null)) => Vec::new(),
        Some(Tree::Sequence(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| argument(item, &format!("{}.args[{}]", path, i)))
            .collect::<Result<Vec<_>>>()?,
        Some(other) => {
            return Err(Error::AmbiguousInput {
                path: path.to_string(),
                expected: "array of arguments",
                found: other.kind(),
            })
        }
    };

    Ok(Function {
        name: name.to_string(),
        help: optional_string(body, "help", path)?.unwrap_or_default(),
        args,
    })
}

fn argument(item: &Tree, path: &str) -> Result<Argument> {
    let arg = expect_mapping(item, path)?;
    let name = optional_string(arg, "name", path)?.ok_or_else(|| Error::MalformedField {
        path: path.to_string(),
        reason: "argument lacks `name`".to_string(),
    })?;

    Ok(Argument {
        ty: optional_string(arg, "type", path)?.unwrap_or_else(|| "any".to_string()),
        name,
        default: default_of(arg),
    })
}

fn value(name: &str, body: &Mapping, path: &str) -> Result<Value> {
    let ty = optional_string(body, "type", path)?.ok_or_else(|| Error::MalformedField {
        path: path.to_string(),
        reason: "value lacks `type`".to_string(),
    })?;

    Ok(Value {
        name: name.to_string(),
        help: optional_string(body, "help", path)?.unwrap_or_default(),
        ty,
        default: default_of(body),
    })
}

/// `null` means "no default", anything else is kept verbatim.
fn default_of(body: &Mapping) -> Option<serde_json::Value> {
    body.get("default")
        .filter(|d| !d.is_null())
        .map(serde_json::Value::from)
}

fn expect_mapping<'a>(tree: &'a Tree, path: &str) -> Result<&'a Mapping> {
    tree.as_mapping().ok_or_else(|| Error::AmbiguousInput {
        path: path.to_string(),
        expected: "object",
        found: tree.kind(),
    })
}

fn optional_string(map: &Mapping, key: &str, path: &str) -> Result<Option<String>> {
    match map.get(key) {
        None | Some(Tree::Scalar(Scalar::Null)) => Ok(None),
        Some(Tree::Scalar(Scalar::String(s))) => Ok(Some(s.clone())),
        Some(other) => Err(Error::AmbiguousInput {
            path: format!("{}.{}", path, key),
            expected: "string",
            found: other.kind(),
        }),
    }
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

fn display(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}
