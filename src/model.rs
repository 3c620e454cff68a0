//! Data types mirrored from the window manager's IPC replies.
//!
//! Only the fields the navigation logic needs are deserialized.  The full
//! `GET_TREE` reply is additionally kept as a raw [`serde_json::Value`] so
//! arbitrary attributes of a node can be looked up by name (see
//! [`Tree::raw_node`] and [`attribute`]).

use serde::Deserialize;
use serde_json::Value;

/// Node type of an output in the layout tree.
pub const OUTPUT_TYPE: &str = "output";
/// Node type of a workspace in the layout tree.
pub const WORKSPACE_TYPE: &str = "workspace";

/// Position and size of a node or output, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// A container in the layout tree (root, output, workspace, con, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct Node {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub node_type: String,
    /// Workspace number.  Only workspaces carry one; named-only workspaces
    /// report `-1`.
    #[serde(default)]
    pub num: Option<i64>,
    #[serde(default)]
    pub rect: Rect,
    /// `"horizontal"`, `"vertical"` or `"none"`.
    #[serde(default)]
    pub orientation: Option<String>,
    #[serde(default)]
    pub focused: bool,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub floating_nodes: Vec<Node>,
}

impl Node {
    /// The node name, or `""` for unnamed containers.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Tiling and floating children, tiling first.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().chain(self.floating_nodes.iter())
    }

    /// The focused node in this subtree, if any.
    pub fn find_focused(&self) -> Option<&Node> {
        if self.focused {
            return Some(self);
        }
        self.children().find_map(Node::find_focused)
    }

    /// Chain of nodes from `self` down to the node with `id` (inclusive on
    /// both ends), or `None` if `id` is not in this subtree.
    pub fn path_to(&self, id: i64) -> Option<Vec<&Node>> {
        if self.id == id {
            return Some(vec![self]);
        }
        self.children().find_map(|child| {
            child.path_to(id).map(|mut path| {
                path.insert(0, self);
                path
            })
        })
    }

    /// All user-visible workspaces below this node, in tree order.
    ///
    /// Internal workspaces (names starting with `__`, e.g. the scratchpad)
    /// are skipped.  The search does not descend into workspaces.
    pub fn workspaces(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        collect_workspaces(self, &mut out);
        out
    }
}

fn collect_workspaces<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
    if node.node_type == WORKSPACE_TYPE {
        if !node.name().starts_with("__") {
            out.push(node);
        }
        return;
    }
    for child in &node.nodes {
        collect_workspaces(child, out);
    }
}

/// A parsed `GET_TREE` reply.
#[derive(Debug, Clone)]
pub struct Tree {
    root: Node,
    raw: Value,
}

impl Tree {
    /// Build a tree from the raw JSON reply.
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        let root = Node::deserialize(&raw)?;
        Ok(Self { root, raw })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The focused container, if the window manager reports one.
    pub fn find_focused(&self) -> Option<&Node> {
        self.root.find_focused()
    }

    /// The direct parent of the node with `id`.
    pub fn parent_of(&self, id: i64) -> Option<&Node> {
        let path = self.root.path_to(id)?;
        path.len().checked_sub(2).map(|i| path[i])
    }

    /// The nearest ancestor of type `workspace` of the node with `id`
    /// (or the node itself if it is a workspace).
    pub fn workspace_of(&self, id: i64) -> Option<&Node> {
        self.root
            .path_to(id)?
            .into_iter()
            .rev()
            .find(|n| n.node_type == WORKSPACE_TYPE)
    }

    /// The raw JSON object of the node with `id`.
    pub fn raw_node(&self, id: i64) -> Option<&Value> {
        find_raw(&self.raw, id)
    }
}

fn find_raw(value: &Value, id: i64) -> Option<&Value> {
    if value.get("id").and_then(Value::as_i64) == Some(id) {
        return Some(value);
    }
    ["nodes", "floating_nodes"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_array))
        .flatten()
        .find_map(|child| find_raw(child, id))
}

/// Look up `path` in a JSON object.  Dots descend into nested objects, so
/// `"rect.x"` yields the `x` member of `rect`.
pub fn attribute<'a>(object: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(object, |value, key| value.as_object()?.get(key))
}

/// Render a JSON value for insertion into a command line.
///
/// Strings are inserted without quotes, `null` becomes the empty string and
/// everything else is rendered as compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// One entry of a `GET_OUTPUTS` reply (the RandR view of an output).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputInfo {
    /// RandR output name (e.g. `"DP-1"`).  Matches the name of the
    /// corresponding `output` node in the tree.
    pub name: String,
    pub active: bool,
    #[serde(default)]
    pub primary: bool,
}

/// Result of one command in a `RUN_COMMAND` reply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandOutcome {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}
