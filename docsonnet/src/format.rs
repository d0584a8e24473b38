//! Output formats, dispatched through a small trait.

use anyhow::{anyhow, Result};
use docsonnet_core::{Package, RenderOptions};
use std::collections::BTreeMap;

/// Name of the single document written by the JSON format.
pub const MODEL_FILE: &str = "model.json";

/// Turns a package into named documents.
pub trait Format {
    fn render(&self, pkg: &Package, opts: &RenderOptions) -> Result<BTreeMap<String, String>>;
}

pub struct Markdown;

impl Format for Markdown {
    fn render(&self, pkg: &Package, opts: &RenderOptions) -> Result<BTreeMap<String, String>> {
        Ok(docsonnet_core::render(pkg, opts))
    }
}

/// The extracted model itself, for custom rendering pipelines.
pub struct Json;

impl Format for Json {
    fn render(&self, pkg: &Package, _opts: &RenderOptions) -> Result<BTreeMap<String, String>> {
        let mut json = pkg.to_json()?;
        json.push('\n');
        Ok(BTreeMap::from([(MODEL_FILE.to_string(), json)]))
    }
}

/// Create a format for the given name.
pub fn create_format(name: &str) -> Result<Box<dyn Format>> {
    match name {
        "markdown" | "md" => Ok(Box::new(Markdown)),
        "json" => Ok(Box::new(Json)),
        _ => Err(anyhow!("unknown format: {}. Use markdown or json", name)),
    }
}
