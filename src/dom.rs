//! In-memory HTML document: the surface the renderer writes to.
//!
//! The page template is kept as a `scraper::Html` tree. Patch targets are
//! matched with `scraper::Selector`, edits are made directly on the
//! `ego_tree` nodes underneath, and html5ever serializes the tree back out.
//! Whatever the renderer does not touch (comments, SVG, `<noscript>` blocks,
//! inline scripts) is written back as it was parsed.

use crate::error::{FrontError, Result};
use crate::surface::Surface;
use crate::view::{Display, MetaKey, Patch};
use ego_tree::NodeId;
use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::{LocalName, QualName, ns};
use html_escape::encode_double_quoted_attribute as attr_escape;
use scraper::node::Text;
use scraper::{Html, Node, Selector, StrTendril};
use tracing::{debug, warn};

const JSON_LD_SELECTOR: &str = r#"script[type="application/ld+json"]"#;

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| FrontError::Template(format!("bad selector {selector:?}: {e}")))
}

/// A mutable HTML document.
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse a full HTML document. html5ever always yields `<html>`, `<head>`
    /// and `<body>`, so the head-level operations below never lack a target.
    pub fn parse(html: &str) -> Self {
        Document {
            html: Html::parse_document(html),
        }
    }

    /// Serialize back to HTML.
    ///
    /// Parsing runs with scripting enabled, so `<noscript>` bodies are raw
    /// text; serializing with the same setting writes them back unescaped.
    pub fn to_html(&self) -> Result<String> {
        let opts = SerializeOpts {
            scripting_enabled: true,
            traversal_scope: TraversalScope::IncludeNode,
            create_missing_parent: false,
        };
        let mut buf = Vec::new();
        serialize(&mut buf, &self.html, opts)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Ids of the attached elements matching `selector`, in document order.
    ///
    /// Detached nodes stay in the arena, so matching starts from `<html>`
    /// rather than from `Html::select`, which scans every node.
    fn select_ids(&self, selector: &str) -> Vec<NodeId> {
        match parse_selector(selector) {
            Ok(sel) => self.html.root_element().select(&sel).map(|el| el.id()).collect(),
            Err(e) => {
                warn!(error = %e, "Skipping patch");
                Vec::new()
            }
        }
    }

    fn first_id(&self, selector: &str) -> Option<NodeId> {
        self.select_ids(selector).into_iter().next()
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(mut node) = self.html.tree.get_mut(id) {
            node.detach();
        }
    }

    fn clear_children(&mut self, id: NodeId) {
        let children: Vec<NodeId> = match self.html.tree.get(id) {
            Some(node) => node.children().map(|c| c.id()).collect(),
            None => return,
        };
        for child in children {
            self.detach(child);
        }
    }

    fn set_text(&mut self, id: NodeId, text: &str) {
        self.clear_children(id);
        if let Some(mut node) = self.html.tree.get_mut(id) {
            node.append(Node::Text(Text {
                text: StrTendril::from_slice(text),
            }));
        }
    }

    fn set_inner_html(&mut self, id: NodeId, markup: &str) {
        self.clear_children(id);
        for child in self.adopt_fragment(markup) {
            if let Some(mut node) = self.html.tree.get_mut(id) {
                node.append_id(child);
            }
        }
    }

    fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.html.tree.get(id)?.value().as_element()?.attr(name)
    }

    fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(mut node) = self.html.tree.get_mut(id) {
            if let Node::Element(el) = node.value() {
                el.attrs.insert(
                    QualName::new(None, ns!(), LocalName::from(name)),
                    StrTendril::from_slice(value),
                );
            }
        }
    }

    /// Parse `markup` as a body fragment and move it into this tree.
    ///
    /// Returns the fragment's top-level nodes, still unattached, in order.
    fn adopt_fragment(&mut self, markup: &str) -> Vec<NodeId> {
        let fragment = Html::parse_fragment(markup);
        let root = self.html.tree.extend_tree(fragment.tree).id();
        let Some(container) = self
            .html
            .tree
            .get(root)
            .and_then(|r| r.children().find(|c| c.value().is_element()))
        else {
            return Vec::new();
        };
        container.children().map(|c| c.id()).collect()
    }

    /// Insert into head before its first `<style>`, else append.
    fn insert_into_head(&mut self, markup: &str) {
        let Some(head) = self.first_id("head") else {
            warn!("Document has no head");
            return;
        };
        let anchor = self.first_id("head > style");
        for id in self.adopt_fragment(markup) {
            let target = self.html.tree.get_mut(anchor.unwrap_or(head));
            match (target, anchor) {
                (Some(mut style), Some(_)) => {
                    style.insert_id_before(id);
                }
                (Some(mut head), None) => {
                    head.append_id(id);
                }
                (None, _) => {}
            }
        }
    }

    /// Create or update `<meta {key}="{name}" content="...">`.
    pub fn upsert_meta(&mut self, key: MetaKey, name: &str, content: &str) {
        let selector = format!(r#"meta[{}="{}"]"#, key.attr(), name);
        match self.first_id(&selector) {
            Some(id) => self.set_attr(id, "content", content),
            None => self.insert_into_head(&format!(
                r#"<meta {}="{}" content="{}">"#,
                key.attr(),
                attr_escape(name),
                attr_escape(content)
            )),
        }
    }

    /// Create or update `<link rel="{rel}" href="...">`.
    pub fn upsert_link(&mut self, rel: &str, href: &str) {
        let selector = format!(r#"link[rel="{rel}"]"#);
        match self.first_id(&selector) {
            Some(id) => self.set_attr(id, "href", href),
            None => self.insert_into_head(&format!(
                r#"<link rel="{}" href="{}">"#,
                attr_escape(rel),
                attr_escape(href)
            )),
        }
    }

    pub fn set_title(&mut self, title: &str) {
        match self.first_id("head title") {
            Some(id) => self.set_text(id, title),
            None => {
                self.insert_into_head("<title></title>");
                if let Some(id) = self.first_id("head title") {
                    self.set_text(id, title);
                }
            }
        }
    }

    /// Drop every JSON-LD block and append a fresh one to head.
    pub fn replace_json_ld(&mut self, value: &serde_json::Value) {
        for id in self.select_ids(JSON_LD_SELECTOR) {
            self.detach(id);
        }
        let Some(head) = self.first_id("head") else {
            warn!("Document has no head; JSON-LD dropped");
            return;
        };
        // `<` only occurs inside JSON strings, where < is equivalent.
        let body = value.to_string().replace('<', "\\u003c");
        for id in self.adopt_fragment(&format!(r#"<script type="application/ld+json">{body}</script>"#)) {
            if let Some(mut node) = self.html.tree.get_mut(head) {
                node.append_id(id);
            }
        }
    }

    fn set_display(&mut self, selector: &str, display: Display) {
        let Some(id) = self.first_id(selector) else {
            debug!(selector, "Display target missing");
            return;
        };
        let style = set_style_property(self.attr(id, "style").unwrap_or(""), "display", display.as_css());
        self.set_attr(id, "style", &style);
    }
}

impl Surface for Document {
    fn apply(&mut self, patch: &Patch) {
        match patch {
            Patch::Text { target, text } => match self.first_id(target) {
                Some(id) => self.set_text(id, text),
                None => debug!(%target, "Text target missing"),
            },
            Patch::Html { target, html } => match self.first_id(target) {
                Some(id) => self.set_inner_html(id, html),
                None => debug!(%target, "Html target missing"),
            },
            Patch::Attr { target, name, value } => match self.first_id(target) {
                Some(id) => self.set_attr(id, name, value),
                None => debug!(%target, "Attr target missing"),
            },
            Patch::Display { target, display } => self.set_display(target, *display),
            Patch::Remove { target } => match self.first_id(target) {
                Some(id) => self.detach(id),
                None => debug!(%target, "Remove target missing"),
            },
            Patch::Title(title) => self.set_title(title),
            Patch::Meta { key, name, content } => self.upsert_meta(*key, name, content),
            Patch::Link { rel, href } => self.upsert_link(rel, href),
            Patch::JsonLd(value) => self.replace_json_ld(value),
        }
    }
}

/// Rewrite one property of an inline `style` attribute.
fn set_style_property(style: &str, property: &str, value: &str) -> String {
    let mut decls: Vec<String> = style
        .split(';')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .filter(|d| {
            d.split_once(':')
                .is_none_or(|(name, _)| !name.trim().eq_ignore_ascii_case(property))
        })
        .map(str::to_string)
        .collect();
    decls.push(format!("{property}: {value}"));
    decls.join("; ")
}

#[cfg(test)]
impl Document {
    pub fn select_all(&self, selector: &str) -> Vec<scraper::ElementRef<'_>> {
        let sel = Selector::parse(selector).unwrap();
        let found = self.html.root_element().select(&sel).collect();
        found
    }

    pub fn select_first(&self, selector: &str) -> Option<scraper::ElementRef<'_>> {
        self.select_all(selector).into_iter().next()
    }

    pub fn text_of(&self, selector: &str) -> Option<String> {
        self.select_first(selector).map(|el| el.text().collect())
    }

    pub fn title(&self) -> Option<String> {
        self.text_of("head title")
    }
}

#[cfg(test)]
pub fn has_class(el: &scraper::ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}
