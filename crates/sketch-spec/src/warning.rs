use serde::{Deserialize, Serialize};

/// Diagnostic emitted by the layout/surface classifier for containers that
/// carry visual styling without reading as an input field or a card.
///
/// Never part of the persisted spec; purely a side-channel for callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualUsageWarning {
    /// Root-relative tree location, e.g. `nodes[0].children[1]`.
    pub path: String,
    /// Offending attributes, e.g. `background="#F9FAFB"`, `borderRadius=12`.
    pub properties: Vec<String>,
    pub reason: String,
}
