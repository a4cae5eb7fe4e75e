//! Window search over the layout tree
//!
//! Pure functions: the gateway produces a tree snapshot, the matcher borrows
//! it for one search and emits descriptors for every window that satisfies
//! the criteria.

use serde::Serialize;

use super::tree::{LayoutNode, NodeKind};

/// Search criteria for [`find_windows`].
///
/// Every field is an optional case-insensitive substring filter; a window
/// matches when all present filters match. No filters means every window.
#[derive(Debug, Clone, Default)]
pub struct MatchCriteria {
    /// Match against the window title.
    pub name: Option<String>,
    /// Match against the window class.
    pub class: Option<String>,
    /// Match against the window instance.
    pub instance: Option<String>,
}

/// A matched window, with the con_id usable in `[con_id=...]` commands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowDescriptor {
    pub con_id: i64,
    pub name: String,
    pub class: String,
    pub instance: String,
    /// Name of the nearest enclosing workspace; empty if there is none.
    pub workspace: String,
    pub focused: bool,
}

/// Search the tree for windows matching `criteria`.
///
/// Pre-order depth-first traversal, tiled children before floating children,
/// each collection in layout order. The output order is exactly the traversal
/// order, so repeated searches over the same snapshot are deterministic.
pub fn find_windows(root: &LayoutNode, criteria: &MatchCriteria) -> Vec<WindowDescriptor> {
    let mut results = Vec::new();
    walk(root, "", criteria, &mut results);
    results
}

fn walk(node: &LayoutNode, workspace: &str, criteria: &MatchCriteria, results: &mut Vec<WindowDescriptor>) {
    // Entering a workspace node switches the context for this subtree only;
    // sibling subtrees keep the caller's context.
    let workspace = if node.kind == NodeKind::Workspace {
        node.name.as_deref().unwrap_or("")
    } else {
        workspace
    };

    if node.is_window() && matches(node, criteria) {
        let props = node.window_properties.as_ref();
        results.push(WindowDescriptor {
            con_id: node.id,
            name: node.name.clone().unwrap_or_default(),
            class: props.and_then(|p| p.class.clone()).unwrap_or_default(),
            instance: props.and_then(|p| p.instance.clone()).unwrap_or_default(),
            workspace: workspace.to_string(),
            focused: node.focused,
        });
    }

    for child in &node.nodes {
        walk(child, workspace, criteria, results);
    }
    for child in &node.floating_nodes {
        walk(child, workspace, criteria, results);
    }
}

fn matches(node: &LayoutNode, criteria: &MatchCriteria) -> bool {
    let props = node.window_properties.as_ref();
    let name = node.name.as_deref().unwrap_or("");
    let class = props.and_then(|p| p.class.as_deref()).unwrap_or("");
    let instance = props.and_then(|p| p.instance.as_deref()).unwrap_or("");

    criteria.name.as_deref().is_none_or(|f| contains_ignore_case(name, f))
        && criteria.class.as_deref().is_none_or(|f| contains_ignore_case(class, f))
        && criteria.instance.as_deref().is_none_or(|f| contains_ignore_case(instance, f))
}

/// Case-insensitive substring containment. An empty needle matches anything.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
