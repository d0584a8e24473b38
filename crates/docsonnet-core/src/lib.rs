//! docsonnet-core: turn an evaluated docsonnet tree into markdown documents.
//!
//! - `tree`: the untyped input handed over by the evaluator
//! - `extract`: reconciles annotations with nested data into a `model::Package`
//! - `model`: the typed document model
//! - `slug`: unique heading anchors
//! - `render`: deterministic markdown output, one document per package

pub mod error;
pub mod extract;
pub mod markdown;
pub mod model;
pub mod render;
pub mod slug;
pub mod tree;

pub use error::{Error, Result};
pub use extract::extract;
pub use model::*;
pub use render::{render, RenderOptions};
pub use tree::Tree;
