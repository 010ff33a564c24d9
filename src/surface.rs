//! The port between the renderer and whatever displays the page.
//!
//! [`Document`](crate::dom::Document) is the HTML adapter; `RecordingSurface`
//! keeps the patches it receives so tests can assert on them directly.

use crate::view::{PageView, Patch};

/// Something a [`PageView`] can be applied to.
pub trait Surface {
    /// Apply a single patch. Missing targets are skipped.
    fn apply(&mut self, patch: &Patch);

    /// Apply every patch of `view` in order.
    fn apply_view(&mut self, view: &PageView) {
        for patch in &view.patches {
            self.apply(patch);
        }
    }
}

/// A surface that only records what it was asked to do.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub applied: Vec<Patch>,
}

#[cfg(test)]
impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text written to `target`, latest write wins.
    pub fn text_for(&self, target: &str) -> Option<&str> {
        self.applied.iter().rev().find_map(|p| match p {
            Patch::Text { target: t, text } if t == target => Some(text.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
impl Surface for RecordingSurface {
    fn apply(&mut self, patch: &Patch) {
        self.applied.push(patch.clone());
    }
}
