//! docsonnet: render documentation for docsonnet-annotated Jsonnet libraries.
//!
//! Takes the library as already-evaluated JSON (e.g. `jsonnet main.libsonnet`)
//! and writes one markdown document per package:
//!
//! - `docsonnet lib.json -o docs`
//! - `jsonnet main.libsonnet | docsonnet -o docs --url-prefix lib`

mod format;

use anyhow::{Context, Result};
use clap::Parser;
use docsonnet_core::{RenderOptions, Tree};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "docsonnet",
    about = "Generate markdown documentation from evaluated docsonnet libraries"
)]
struct Cli {
    /// Evaluated library as JSON. Reads stdin when omitted or `-`.
    input: Option<PathBuf>,

    /// Directory to write the documents to
    #[arg(short = 'o', long, default_value = "docs")]
    output: PathBuf,

    /// Prefix for the permalinks in each document's front matter
    #[arg(short = 'u', long, default_value = "")]
    url_prefix: String,

    /// Output format: markdown (default), json
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,

    /// Print documents to stdout instead of writing files
    #[arg(long)]
    stdout: bool,

    /// More log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let input = read_input(cli.input.as_deref())?;
    let tree = Tree::from_json(&input).context("input is not valid JSON")?;
    let pkg = docsonnet_core::extract(&tree).context("failed to extract documentation model")?;
    debug!(package = %pkg.name, subpackages = pkg.sub.len(), "extracted model");

    let format = format::create_format(&cli.format)?;
    let opts = RenderOptions {
        url_prefix: cli.url_prefix.clone(),
    };
    let docs = format.render(&pkg, &opts)?;

    if cli.stdout {
        for (name, content) in &docs {
            if docs.len() > 1 {
                println!("<!-- {} -->", name);
            }
            print!("{}", content);
        }
        return Ok(());
    }

    write_documents(&cli.output, &docs)?;
    info!(
        "rendered {} documents for package '{}' to '{}'",
        docs.len(),
        pkg.name,
        cli.output.display()
    );
    Ok(())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Read the evaluated library from `path`, or stdin for `None` / `-`.
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => {
            fs::read_to_string(p).with_context(|| format!("failed to read {}", p.display()))
        }
        _ => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

fn write_documents<'a, I>(output_dir: &Path, docs: I) -> Result<()>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    for (name, content) in docs {
        let path = output_dir.join(name);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create directory: {}", dir.display()))?;
        }
        fs::write(&path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!(file = %path.display(), "wrote document");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn writes_nested_documents() {
        let dir = TempDir::new().unwrap();
        let docs = BTreeMap::from([
            ("README.md".to_string(), "root\n".to_string()),
            ("a/b.md".to_string(), "nested\n".to_string()),
        ]);

        write_documents(dir.path(), &docs).unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("README.md")).unwrap(), "root\n");
        assert_eq!(fs::read_to_string(dir.path().join("a/b.md")).unwrap(), "nested\n");
    }

    #[test]
    fn reads_input_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lib.json");
        fs::write(&path, "{}").unwrap();
        assert_eq!(read_input(Some(path.as_path())).unwrap(), "{}");
    }

    #[test]
    fn missing_input_file() {
        let err = read_input(Some(Path::new("/nonexistent/lib.json"))).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
