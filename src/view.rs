//! Declarative view model produced by the renderer.
//!
//! A [`PageView`] is an ordered list of [`Patch`]es. Each patch names its
//! target with a CSS selector and says what should be there; a
//! [`Surface`](crate::surface::Surface) decides how to make it so.

use serde_json::Value;

/// CSS `display` values the renderer toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    None,
    Block,
    Flex,
}

impl Display {
    pub fn as_css(self) -> &'static str {
        match self {
            Display::None => "none",
            Display::Block => "block",
            Display::Flex => "flex",
        }
    }
}

/// How a head `<meta>` tag is keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKey {
    Name,
    Property,
}

impl MetaKey {
    pub fn attr(self) -> &'static str {
        match self {
            MetaKey::Name => "name",
            MetaKey::Property => "property",
        }
    }
}

/// One change to apply to the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// Replace the text content of the first match.
    Text { target: String, text: String },
    /// Replace the children of the first match with parsed HTML.
    Html { target: String, html: String },
    /// Set an attribute on the first match.
    Attr { target: String, name: String, value: String },
    /// Set the CSS display of the first match.
    Display { target: String, display: Display },
    /// Remove the first match from the document.
    Remove { target: String },
    /// Set the document title.
    Title(String),
    /// Create or update a `<meta>` tag in head.
    Meta { key: MetaKey, name: String, content: String },
    /// Create or update a `<link rel=...>` tag in head.
    Link { rel: String, href: String },
    /// Replace any JSON-LD script block with this object.
    JsonLd(Value),
}

impl Patch {
    pub fn text(target: &str, text: impl Into<String>) -> Self {
        Patch::Text {
            target: target.to_string(),
            text: text.into(),
        }
    }

    pub fn html(target: &str, html: impl Into<String>) -> Self {
        Patch::Html {
            target: target.to_string(),
            html: html.into(),
        }
    }

    pub fn attr(target: &str, name: &str, value: impl Into<String>) -> Self {
        Patch::Attr {
            target: target.to_string(),
            name: name.to_string(),
            value: value.into(),
        }
    }

    pub fn display(target: &str, display: Display) -> Self {
        Patch::Display {
            target: target.to_string(),
            display,
        }
    }

    pub fn remove(target: &str) -> Self {
        Patch::Remove {
            target: target.to_string(),
        }
    }

    pub fn meta(key: MetaKey, name: &str, content: impl Into<String>) -> Self {
        Patch::Meta {
            key,
            name: name.to_string(),
            content: content.into(),
        }
    }
}

/// The full set of changes for one render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageView {
    pub patches: Vec<Patch>,
}

impl PageView {
    pub fn push(&mut self, patch: Patch) {
        self.patches.push(patch);
    }

    pub fn extend(&mut self, patches: impl IntoIterator<Item = Patch>) {
        self.patches.extend(patches);
    }
}

