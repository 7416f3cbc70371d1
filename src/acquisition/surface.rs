use async_trait::async_trait;
use log::info;
use std::fmt::Debug;

use crate::errors::AcquisitionError;

// @module: UI surface abstraction driven by the acquisition state machine

/// A handle to one rendered node, snapshotted at query time.
///
/// Fields are captured when the surface answers a query; re-query to
/// refresh them. `visible` means the node is present in the layout tree and
/// occupies non-zero area; `occluded_by` names a covering node when one was
/// detected and is diagnostic only - an occluded-but-present element is
/// still clickable.
#[derive(Debug, Clone, PartialEq)]
pub struct UiNode {
    /// Surface-assigned node handle, stable for the surface's lifetime
    pub id: u64,

    /// Lowercase tag name
    pub tag: String,

    /// Native role, when the surface exposes one
    pub role: Option<String>,

    /// Trimmed text content of the node's subtree
    pub text: String,

    /// Present in the layout tree with non-zero area and not hidden
    pub visible: bool,

    /// Tag of a node covering this one, if any was detected
    pub occluded_by: Option<String>,
}

impl UiNode {
    /// True when the node's native role is button-like
    pub fn is_button(&self) -> bool {
        if self.role.as_deref() == Some("button") {
            return true;
        }
        matches!(self.tag.as_str(), "button" | "yt-button-shape")
    }
}

/// Phases of one simulated input interaction.
///
/// Surfaces must dispatch the full press/release/activate sequence for
/// every click rather than a single synthetic activation - some host
/// handlers only react to complete event sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPhase {
    Press,
    Release,
    Activate,
}

/// The pollable capability the acquisition state machine drives.
///
/// Implementable over any UI-automation or headless-browser binding; the
/// crate ships a saved-page implementation ([`super::DomSnapshotSurface`])
/// and a scripted one for tests. All queries return nodes in document
/// order. Selectors are a minimal CSS subset: tag, `#id`, `.class`,
/// descendant combination, and comma-separated alternatives.
#[async_trait]
pub trait TranscriptSurface: Send + Sync + Debug {
    /// All nodes matching a selector
    async fn query(&self, selector: &str) -> Result<Vec<UiNode>, AcquisitionError>;

    /// Nodes matching a selector within the given node's subtree
    async fn query_within(
        &self,
        node: &UiNode,
        selector: &str,
    ) -> Result<Vec<UiNode>, AcquisitionError>;

    /// Leaf nodes whose text contains `needle` case-insensitively.
    ///
    /// Searches the full subtree, including nested embedded trees (shadow
    /// roots and the like) where the surface has access to them.
    async fn find_by_text(&self, needle: &str) -> Result<Vec<UiNode>, AcquisitionError>;

    /// The node's parent, if it has one
    async fn parent(&self, node: &UiNode) -> Result<Option<UiNode>, AcquisitionError>;

    /// The closest enclosing ancestor that can be activated (button-like),
    /// including the node itself
    async fn actionable_ancestor(
        &self,
        node: &UiNode,
    ) -> Result<Option<UiNode>, AcquisitionError>;

    /// Click a node, dispatching the full [`InputPhase`] sequence
    async fn click(&self, node: &UiNode) -> Result<(), AcquisitionError>;

    /// Click empty surface area, dismissing any open menu or popup
    async fn click_elsewhere(&self) -> Result<(), AcquisitionError>;
}

/// Observer for human-readable progress notifications.
///
/// This is a side channel: notifications are emitted on every state
/// transition and never gate control flow.
pub trait ProgressSink: Send + Sync {
    fn notify(&self, message: &str);
}

/// Default sink that routes progress to the application log
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn notify(&self, message: &str) {
        info!("{}", message);
    }
}
