use docsonnet_core::{extract, render, Field, Package, RenderOptions, Tree};

fn tree(json: &str) -> Tree {
    Tree::from_json(json).unwrap()
}

const LIB: &str = r##"{
    "#": {"name": "lib", "import": "lib.libsonnet", "help": "H"},
    "#new": {"function": {"help": "creates a new instance", "args": [{"name": "x", "type": "string"}]}}
}"##;

const K8S: &str = r##"{
    "#": {"name": "k", "import": "k.libsonnet", "help": "Kubernetes helpers"},
    "#newDeployment": {"function": {"help": "a deployment", "args": [
        {"name": "name", "type": "string"},
        {"name": "replicas", "type": "number", "default": 1}
    ]}},
    "#metadata": {"object": {"help": "object metadata"}},
    "metadata": {
        "#withName": {"function": {"help": "sets the name", "args": [{"name": "name", "type": "string"}]}},
        "labels": {"#withLabels": {"function": {"help": "sets labels"}}}
    },
    "#apiVersion": {"value": {"help": "api group", "type": "string", "default": "apps/v1"}},
    "hidden": {"a": 1},
    "core": {
        "#": {"name": "core", "import": "", "help": "core group"},
        "#pod": {"object": {"help": "pods"}},
        "pod": {"#new": {"function": {"help": "a pod"}}}
    }
}"##;

#[test]
fn minimal_library_document() {
    let pkg = extract(&tree(LIB)).unwrap();
    let docs = render(&pkg, &RenderOptions::default());

    assert_eq!(docs.len(), 1);
    let doc = &docs["README.md"];
    assert!(doc.contains("# package lib\n"));
    assert!(doc.contains("```jsonnet\nlocal lib = import \"lib.libsonnet\"\n```"));
    assert!(doc.contains("## Fields\n\n### fn new\n\n```ts\nnew(x)\n```\n\ncreates a new instance\n"));
    assert!(doc.contains("* [`fn new(x)`](#fn-new)"));
}

#[test]
fn merge_precedence_keeps_sibling_children() {
    let pkg = extract(&tree(
        r##"{"#": {"name": "l", "import": "", "help": ""},
             "#x": {"object": {"help": "x"}},
             "x": {"#y": {"value": {"type": "string"}}}}"##,
    ))
    .unwrap();

    match pkg.api.get("x") {
        Some(Field::Object(x)) => assert!(x.fields.contains("y")),
        other => panic!("expected object, got {:?}", other),
    }
}

#[test]
fn model_survives_remarshal() {
    let pkg = extract(&tree(K8S)).unwrap();
    let json = pkg.to_json().unwrap();
    let back = Package::from_json(&json).unwrap();
    assert_eq!(back, pkg);
    assert_eq!(back.to_json().unwrap(), json);
}

#[test]
fn full_library_layout() {
    let pkg = extract(&tree(K8S)).unwrap();
    assert!(!pkg.api.contains("hidden"));
    assert!(!pkg.api.contains("core"));
    assert!(pkg.sub.contains_key("core"));

    let docs = render(
        &pkg,
        &RenderOptions {
            url_prefix: "k".into(),
        },
    );
    let keys: Vec<&str> = docs.keys().map(String::as_str).collect();
    assert_eq!(keys, ["README.md", "core.md"]);

    let root = &docs["README.md"];
    let expected_index = "\
* [`fn newDeployment(name, replicas=1)`](#fn-newdeployment)
* [`string apiVersion`](#string-apiversion)
* [`obj metadata`](#obj-metadata)
  * [`fn metadata.withName(name)`](#fn-metadatawithname)
  * [`obj metadata.labels`](#obj-metadatalabels)
    * [`fn metadata.labels.withLabels()`](#fn-metadatalabelswithlabels)";
    assert!(root.contains(expected_index), "{root}");
    assert!(root.contains("## Subpackages\n\n* [core](core.md)"));
    assert!(root.contains("### string apiVersion\n\n*Default value:* `apps/v1`\n\napi group"));
    assert!(root.contains("#### fn metadata.withName\n\n```ts\nwithName(name)\n```\n\nsets the name"));
    assert!(root.contains("#### obj metadata.labels\n\n##### fn metadata.labels.withLabels"));

    let core = &docs["core.md"];
    assert!(core.starts_with("---\npermalink: /k/core/\n---\n\n# package core\n\ncore group\n"));
    assert!(!core.contains("```jsonnet"));
    assert!(core.contains("### obj pod\n\npods\n\n#### fn pod.new"));
}
