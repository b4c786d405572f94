//! Scripted page interactions, read from a RON list of steps.
//!
//! Steps address elements with a target string:
//! - `"name"` or `"#name"`: the element with that id;
//! - `".class"`: the first element carrying the class, in document order;
//! - `".class@N"`: the N-th (0-based) such element.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use enhancer_core::{Document, Key, NodeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    /// Viewport intersection report for an observed element.
    Intersect {
        target: String,
        #[serde(default = "default_true")]
        visible: bool,
    },
    Input { target: String, value: String },
    Key { target: String, key: String },
    Click { target: String },
    /// Scrolls the nearest scroll container of the target.
    Scroll { target: String, top: u32 },
    /// Host layout reports the rendered width of the target.
    Measure { target: String, width: u32 },
    Resize { width: u32 },
    /// Pointer down at `from`, move to `to`, release.
    Drag { target: String, from: i64, to: i64 },
    /// Page script removes the target from the document.
    Remove { target: String },
    /// Advances the clock by this many milliseconds, firing due timers on the way.
    Advance(u64),
}

fn default_true() -> bool {
    true
}

impl Step {
    pub fn key(&self) -> Option<Key> {
        let Step::Key { key, .. } = self else {
            return None;
        };
        Some(match key.as_str() {
            "Enter" | "enter" => Key::Enter,
            "Escape" | "escape" | "Esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scenario {
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_ron(text: &str) -> anyhow::Result<Self> {
        ron::from_str(text).context("invalid scenario")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::from_ron(&text).with_context(|| format!("parsing {}", path.display()))
    }
}

/// Resolves a step target against the live document.
pub fn resolve(doc: &Document, target: &str) -> anyhow::Result<NodeId> {
    let found = match target.strip_prefix('.') {
        Some(selector) => {
            let (class, nth) = match selector.split_once('@') {
                Some((class, nth)) => (
                    class,
                    nth.parse::<usize>()
                        .with_context(|| format!("bad index in target '{target}'"))?,
                ),
                None => (selector, 0),
            };
            doc.select(doc.root(), |doc, node| doc.has_class(node, class))
                .get(nth)
                .copied()
        }
        None => doc.element_by_id(target.trim_start_matches('#')),
    };
    match found {
        Some(node) => Ok(node),
        None => bail!("no element matches '{target}'"),
    }
}
