//! Heading anchors that stay unique for the lifetime of one allocator.
//!
//! Follows GitHub's heading anchors closely enough that links into rendered
//! documents resolve: whitespace becomes `-`, punctuation is dropped,
//! everything is lower-cased, and repeats get a `-N` suffix.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

// General/supplemental punctuation blocks plus ASCII symbols. Never `-` or `_`.
static RE_SPECIALS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r##"[\x{2000}-\x{206F}\x{2E00}-\x{2E7F}'!"#$%&()*+,./:;<=>?@\[\\\]^`{|}~’]"##)
        .unwrap()
});

#[derive(Debug, Default)]
pub struct Slugger {
    occurrences: HashMap<String, usize>,
    issued: HashSet<String>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the anchor for `text`. The first occurrence of a base slug is
    /// returned as is, later ones as `base-1`, `base-2`, ... skipping any
    /// suffixed form that was already handed out for another base.
    pub fn slug(&mut self, text: &str) -> String {
        let base = normalize(text);
        let mut n = self.occurrences.get(&base).copied().unwrap_or(0);
        let mut slug = suffixed(&base, n);
        while self.issued.contains(&slug) {
            n += 1;
            slug = suffixed(&base, n);
        }
        self.occurrences.insert(base, n + 1);
        self.issued.insert(slug.clone());
        slug
    }
}

fn suffixed(base: &str, n: usize) -> String {
    if n == 0 {
        base.to_string()
    } else {
        format!("{}-{}", base, n)
    }
}

fn normalize(text: &str) -> String {
    let dashed = RE_WHITESPACE.replace_all(text, "-");
    RE_SPECIALS.replace_all(&dashed, "").to_lowercase()
}
