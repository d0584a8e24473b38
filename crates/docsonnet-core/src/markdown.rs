//! Small markdown building blocks. Each returns one block or inline string.

/// Maximum heading depth markdown knows about.
const MAX_LEVEL: usize = 6;

pub fn headline(level: usize, text: &str) -> String {
    format!("{} {}", "#".repeat(level.clamp(1, MAX_LEVEL)), text)
}

pub fn code(text: &str) -> String {
    format!("`{}`", text)
}

pub fn italic(text: &str) -> String {
    format!("*{}*", text)
}

pub fn link(desc: &str, href: &str) -> String {
    format!("[{}]({})", desc, href)
}

pub fn code_block(lang: &str, snippet: &str) -> String {
    format!("```{}\n{}\n```", lang, snippet)
}

/// YAML front matter with plain `key: value` lines.
pub fn frontmatter(entries: &[(&str, &str)]) -> String {
    let mut out = String::from("---\n");
    for (key, value) in entries {
        out.push_str(&format!("{}: {}\n", key, value));
    }
    out.push_str("---");
    out
}

/// Bullet list entry; `Nested` lists are indented under the preceding item.
#[derive(Debug, Clone, PartialEq)]
pub enum ListItem {
    Item(String),
    Nested(Vec<ListItem>),
}

pub fn list(items: &[ListItem]) -> String {
    let mut lines: Vec<String> = Vec::new();
    for item in items {
        match item {
            ListItem::Item(text) => lines.push(format!("* {}", text)),
            ListItem::Nested(children) if children.is_empty() => {}
            ListItem::Nested(children) => {
                for line in list(children).lines() {
                    lines.push(format!("  {}", line));
                }
            }
        }
    }
    lines.join("\n")
}

/// Join blocks with one blank line between them. Empty blocks are skipped.
pub fn document(blocks: &[String]) -> String {
    let mut out = blocks
        .iter()
        .map(|b| b.trim_end())
        .filter(|b| !b.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    out.push('\n');
    out
}
