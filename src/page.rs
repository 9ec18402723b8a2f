//! Site page transforms: partials, year, article listing, and code blocks.
//!
//! Pages mark placeholders with attributes instead of server-side includes:
//!
//! ```html
//! <div data-include="header"></div>
//! <main>
//!   <section id="articles-list" aria-busy="true"></section>
//!   <pre><code class="language-rust">fn main() {}</code></pre>
//! </main>
//! <div data-include="footer"></div>
//! ```
//!
//! A [`Page`] is parsed once with `scraper`, edited in place, and serialized
//! back with [`Page::to_html`]. Filling an element replaces all of its
//! content, nested markup included. Markup inside comments is never matched.

use anyhow::{anyhow, Context, Result};
use ego_tree::{NodeId, NodeRef, Tree};
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::render::{code_block, escape_html};

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector '{}': {:?}", css, e))
}

/// Append deep copies of `src`'s children under `dst`.
fn copy_children(tree: &mut Tree<Node>, dst: NodeId, src: NodeRef<'_, Node>) {
    for child in src.children() {
        let id = match tree.get_mut(dst) {
            Some(mut parent) => parent.append(child.value().clone()).id(),
            None => return,
        };
        copy_children(tree, id, child);
    }
}

/// A parsed HTML page.
pub struct Page {
    doc: Html,
}

impl Page {
    pub fn parse(html: &str) -> Self {
        Self {
            doc: Html::parse_document(html),
        }
    }

    pub fn to_html(&self) -> String {
        self.doc.html()
    }

    /// Fill every `data-include` element with its named partial.
    ///
    /// Unknown names are left untouched. Returns the number filled.
    pub fn inject_partials(&mut self, partials: &HashMap<String, String>) -> Result<usize> {
        let sel = selector("[data-include]")?;
        let targets: Vec<(NodeId, String)> = self
            .doc
            .select(&sel)
            .map(|el| {
                let name = el.value().attr("data-include").unwrap_or_default();
                (el.id(), name.trim().to_string())
            })
            .collect();

        let mut filled = 0;
        for (id, name) in targets {
            match partials.get(&name) {
                Some(content) => {
                    self.replace_children(id, &Html::parse_fragment(content));
                    filled += 1;
                }
                None => warn!(name = %name, "no partial for data-include placeholder"),
            }
        }
        Ok(filled)
    }

    /// Write `year` into the first `id="year"` element.
    pub fn stamp_year(&mut self, year: i32) -> Result<bool> {
        let sel = selector("#year")?;
        let target = self.doc.select(&sel).next().map(|el| el.id());
        match target {
            Some(id) => {
                self.replace_children(id, &Html::parse_fragment(&year.to_string()));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Fill `id="articles-list"` with `listing` and mark it no longer busy.
    ///
    /// Returns false when the page has no listing container.
    pub fn inject_listing(&mut self, listing: &str) -> Result<bool> {
        let sel = selector("#articles-list")?;
        let target = self.doc.select(&sel).next().map(|el| el.id());
        let id = match target {
            Some(id) => id,
            None => return Ok(false),
        };
        self.replace_children(id, &Html::parse_fragment(listing));
        self.set_attr(id, "aria-busy", "false")?;
        Ok(true)
    }

    /// Replace each `<pre><code>` block with the dedented copy-button
    /// rendering. Blocks already wrapped in `.code-block` are skipped.
    pub fn enhance_code_blocks(&mut self) -> Result<usize> {
        let sel = selector("pre")?;
        let blocks: Vec<(NodeId, String)> = self
            .doc
            .select(&sel)
            .filter(|pre| {
                !pre.parent()
                    .and_then(ElementRef::wrap)
                    .map(|p| p.value().classes().any(|c| c == "code-block"))
                    .unwrap_or(false)
            })
            .filter_map(|pre| {
                let code = pre
                    .children()
                    .filter_map(ElementRef::wrap)
                    .find(|c| c.value().name() == "code")?;
                let lang = code
                    .value()
                    .classes()
                    .find_map(|c| c.strip_prefix("language-"));
                let text: String = code.text().collect();
                Some((pre.id(), code_block(lang, &text)))
            })
            .collect();

        let count = blocks.len();
        for (id, html) in blocks {
            self.replace_node(id, &Html::parse_fragment(&html));
        }
        if count > 0 {
            debug!(count, "wrapped code blocks");
        }
        Ok(count)
    }

    fn replace_children(&mut self, target: NodeId, fragment: &Html) {
        if let Some(mut node) = self.doc.tree.get_mut(target) {
            while let Some(mut child) = node.first_child() {
                child.detach();
            }
        }
        copy_children(&mut self.doc.tree, target, *fragment.root_element());
    }

    fn replace_node(&mut self, target: NodeId, fragment: &Html) {
        for child in fragment.root_element().children() {
            let id = match self.doc.tree.get_mut(target) {
                Some(mut node) => node.insert_before(child.value().clone()).id(),
                None => return,
            };
            copy_children(&mut self.doc.tree, id, child);
        }
        if let Some(mut node) = self.doc.tree.get_mut(target) {
            node.detach();
        }
    }

    /// Set one attribute, keeping the element's others and its children.
    fn set_attr(&mut self, target: NodeId, name: &str, value: &str) -> Result<()> {
        let tag = {
            let el = self
                .doc
                .tree
                .get(target)
                .and_then(|n| n.value().as_element())
                .context("attribute target is not an element")?;
            let mut tag = format!("<{}", el.name());
            for (k, v) in el.attrs().filter(|(k, _)| *k != name) {
                tag.push_str(&format!(" {}=\"{}\"", k, escape_html(v)));
            }
            tag.push_str(&format!(" {}=\"{}\"></{}>", name, escape_html(value), el.name()));
            tag
        };

        let fragment = Html::parse_fragment(&tag);
        let element = fragment
            .root_element()
            .children()
            .find_map(|c| c.value().as_element().cloned())
            .with_context(|| format!("failed to rebuild start tag: {}", tag))?;
        if let Some(mut node) = self.doc.tree.get_mut(target) {
            *node.value() = Node::Element(element);
        }
        Ok(())
    }
}

/// Read every `<name>.html` in `dir` into a name → markup map.
pub fn load_partials(dir: &Path) -> Result<HashMap<String, String>> {
    let mut partials = HashMap::new();
    if !dir.exists() {
        warn!(dir = %dir.display(), "partials directory not found");
        return Ok(partials);
    }

    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read partials directory: {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("html") {
            continue;
        }
        if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read partial: {}", path.display()))?;
            partials.insert(name.to_string(), content);
        }
    }
    Ok(partials)
}
