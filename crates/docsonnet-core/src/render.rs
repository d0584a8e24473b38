//! Markdown renderer: one document per package, deterministic output.
//!
//! Fields are ordered at every level the same way: constructors (`new*`)
//! first, then functions, then everything else, alphabetically within each
//! group. Index links are allocated by one `Slugger` per document, walking
//! fields in that same order so each link matches its heading.

use crate::markdown::{self, ListItem};
use crate::model::{Argument, Field, Fields, Package};
use crate::slug::Slugger;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// File name of the root package's document.
pub const ROOT_DOCUMENT: &str = "README.md";

/// Heading level of the package's own fields; nested objects go deeper.
const FIELD_LEVEL: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Prepended to every permalink in the front matter.
    pub url_prefix: String,
}

/// Render `pkg` and all of its sub-packages. Keys are relative file paths.
pub fn render(pkg: &Package, opts: &RenderOptions) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    render_package(pkg, &[], opts, &mut out);
    out
}

/// `chain` holds the names from the root's first sub-package down to `pkg`;
/// it is empty for the root itself.
fn render_package(
    pkg: &Package,
    chain: &[&str],
    opts: &RenderOptions,
    out: &mut BTreeMap<String, String>,
) {
    let root = chain.is_empty();
    let link = permalink(&opts.url_prefix, chain);
    let mut blocks = vec![
        markdown::frontmatter(&[("permalink", link.as_str())]),
        markdown::headline(1, &format!("package {}", pkg.name)),
    ];

    if !pkg.import.is_empty() {
        blocks.push(markdown::code_block(
            "jsonnet",
            &format!("local {} = import \"{}\"", pkg.name, pkg.import),
        ));
    }
    blocks.push(pkg.help.clone());

    if !pkg.sub.is_empty() {
        let mut subs: Vec<&Package> = pkg.sub.values().collect();
        subs.sort_by(|a, b| a.name.cmp(&b.name));

        let items: Vec<ListItem> = subs
            .iter()
            .map(|s| {
                // Relative to the directory holding this document.
                let target = if root {
                    format!("{}.md", s.name)
                } else {
                    format!("{}/{}.md", pkg.name, s.name)
                };
                ListItem::Item(markdown::link(&s.name, &target))
            })
            .collect();

        blocks.push(markdown::headline(2, "Subpackages"));
        blocks.push(markdown::list(&items));
    }

    if !pkg.api.is_empty() {
        let mut slugger = Slugger::new();
        blocks.push(markdown::headline(2, "Index"));
        blocks.push(markdown::list(&index(&pkg.api, "", &mut slugger)));

        blocks.push(markdown::headline(2, "Fields"));
        render_fields(&pkg.api, "", FIELD_LEVEL, &mut blocks);
    }

    let key = if root {
        ROOT_DOCUMENT.to_string()
    } else {
        format!("{}.md", chain.join("/"))
    };
    debug!(package = %pkg.name, file = %key, "rendered package");
    out.insert(key, markdown::document(&blocks));

    for sub in pkg.sub.values() {
        let mut next = chain.to_vec();
        next.push(&sub.name);
        render_package(sub, &next, opts, out);
    }
}

fn permalink(prefix: &str, chain: &[&str]) -> String {
    let segments: Vec<&str> = prefix
        .split('/')
        .chain(chain.iter().copied())
        .filter(|s| !s.is_empty())
        .collect();

    if segments.is_empty() {
        return "/".to_string();
    }
    format!("/{}/", segments.join("/"))
}

/// Heading text of a field, also the input to its anchor.
fn title(field: &Field, path: &str) -> String {
    match field {
        Field::Function(f) => format!("fn {}{}", path, f.name),
        Field::Object(o) => format!("obj {}{}", path, o.name),
        Field::Value(v) => format!("{} {}{}", v.ty, path, v.name),
    }
}

fn index(api: &Fields, path: &str, slugger: &mut Slugger) -> Vec<ListItem> {
    let mut items = Vec::new();
    for field in sort_fields(api) {
        let anchor = format!("#{}", slugger.slug(&title(field, path)));
        let label = match field {
            Field::Function(f) => format!("fn {}{}({})", path, f.name, params(&f.args)),
            _ => title(field, path),
        };
        items.push(ListItem::Item(markdown::link(&markdown::code(&label), &anchor)));

        if let Field::Object(obj) = field {
            let nested = format!("{}{}.", path, obj.name);
            items.push(ListItem::Nested(index(&obj.fields, &nested, slugger)));
        }
    }
    items
}

fn render_fields(api: &Fields, path: &str, level: usize, blocks: &mut Vec<String>) {
    for field in sort_fields(api) {
        blocks.push(markdown::headline(level, &title(field, path)));
        match field {
            Field::Function(f) => {
                blocks.push(markdown::code_block(
                    "ts",
                    &format!("{}({})", f.name, params(&f.args)),
                ));
                blocks.push(f.help.clone());
            }
            Field::Object(obj) => {
                blocks.push(obj.help.clone());
                let nested = format!("{}{}.", path, obj.name);
                render_fields(&obj.fields, &nested, level + 1, blocks);
            }
            Field::Value(v) => {
                if let Some(default) = &v.default {
                    blocks.push(format!(
                        "{} {}",
                        markdown::italic("Default value:"),
                        markdown::code(&default_text(default))
                    ));
                }
                blocks.push(v.help.clone());
            }
        }
    }
}

/// Fields in display order. Total and stable: names are unique.
fn sort_fields(api: &Fields) -> Vec<&Field> {
    let mut fields: Vec<&Field> = api.iter().collect();
    fields.sort_by(|a, b| field_order(a, b));
    fields
}

fn field_order(a: &Field, b: &Field) -> Ordering {
    is_constructor(b)
        .cmp(&is_constructor(a))
        .then_with(|| b.is_function().cmp(&a.is_function()))
        .then_with(|| a.name().cmp(b.name()))
}

fn is_constructor(field: &Field) -> bool {
    field.name().to_lowercase().starts_with("new")
}

fn params(args: &[Argument]) -> String {
    args.iter()
        .map(|arg| match &arg.default {
            Some(default) => format!("{}={}", arg.name, default),
            None => arg.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn default_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
