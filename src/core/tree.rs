//! Layout tree data model
//!
//! A snapshot of the window manager's container hierarchy, fetched fresh on
//! every request. Serialization follows i3's IPC field names so a tree
//! returned to a client looks exactly like what `i3-msg -t get_tree` prints.

use serde::Serialize;

/// Kind of a layout tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// The single tree root.
    Root,
    /// A physical output (monitor).
    Output,
    /// A workspace; establishes the workspace context for its subtree.
    Workspace,
    /// A tiled/stacked container, with or without a window.
    Con,
    /// A floating container.
    FloatingCon,
}

/// X11 window properties as reported by the window manager.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WindowProperties {
    pub class: Option<String>,
    pub instance: Option<String>,
}

/// One node of the layout tree.
///
/// Only nodes with a non-zero `window` id are actual windows; everything else
/// is structure (outputs, workspaces, split containers) and only contributes
/// workspace context to searches.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutNode {
    /// Container id, the handle i3 commands accept as `[con_id=...]`.
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub name: Option<String>,
    /// X11 window id; `None` (or zero) for structural nodes.
    pub window: Option<i64>,
    pub window_properties: Option<WindowProperties>,
    pub focused: bool,
    /// Tiled/stacked children, in layout order.
    pub nodes: Vec<LayoutNode>,
    /// Floating children, in layout order.
    pub floating_nodes: Vec<LayoutNode>,
}

impl LayoutNode {
    /// Whether this node is a window rather than structure.
    pub fn is_window(&self) -> bool {
        matches!(self.window, Some(id) if id != 0)
    }
}

/// The layout tree as one owned snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct LayoutTree {
    pub root: LayoutNode,
}

/// A workspace as reported by the window manager, passed through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workspace {
    pub name: String,
    pub num: i32,
    pub visible: bool,
    pub focused: bool,
}

/// Window manager version, used by the startup liveness probe.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub major: i32,
    pub minor: i32,
    pub patch: i32,
    pub human_readable: String,
}
