//! Snapshot of the output and workspace layout.
//!
//! [`Layout`] is built once per invocation from a `GET_TREE` and a
//! `GET_OUTPUTS` reply.  It orders outputs left to right and workspaces by
//! `(x, num)`, and answers the lookups the navigation commands need:
//!
//! * which workspace number is next/previous to the focused one, optionally
//!   skipping to the first *free* number (gaps in the numbering are allowed
//!   and are filled first),
//! * which output holds the focus, in both the tree and the RandR view.
//!
//! The gap scan itself lives in the free functions
//! [`next_workspace_number`] and [`previous_workspace_number`] so it can be
//! exercised without a tree.

use crate::config::Config;
use crate::model::{Node, OutputInfo, Tree, OUTPUT_TYPE};

/// Errors from layout lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("no workspaces found")]
    NoWorkspaces,
    #[error("no focused container")]
    NoFocusedContainer,
    #[error("focused container is not on a listed workspace")]
    NoFocusedWorkspace,
    #[error("no output holds the focused container")]
    NoFocusedOutput,
}

/// A workspace reduced to what the numbering logic needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Tree node id.
    pub id: i64,
    pub num: i64,
    /// Horizontal position of the workspace (that of its output).
    pub x: i32,
}

impl Workspace {
    fn from_node(node: &Node) -> Self {
        Self {
            id: node.id,
            num: node.num.unwrap_or(-1),
            x: node.rect.x,
        }
    }
}

/// Horizontal side of a container within its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Ordered view of outputs and workspaces at one point in time.
#[derive(Debug, Clone)]
pub struct Layout {
    tree: Tree,
    /// Ids of the tree's output nodes, sorted by `rect.x`.
    outputs: Vec<i64>,
    /// Active RandR outputs, primary first when configured.
    randr_outputs: Vec<OutputInfo>,
    /// Workspaces sorted by `(x, num)`.
    workspaces: Vec<Workspace>,
}

impl Layout {
    /// Build a snapshot from the raw replies.
    pub fn new(tree: Tree, randr_outputs: Vec<OutputInfo>, config: &Config) -> Self {
        let mut outputs: Vec<&Node> = tree
            .root()
            .nodes
            .iter()
            .filter(|n| n.node_type == OUTPUT_TYPE && !config.is_ignored_output(n.name()))
            .collect();
        outputs.sort_by_key(|n| n.rect.x);
        let outputs = outputs.into_iter().map(|n| n.id).collect();

        let mut randr_outputs: Vec<OutputInfo> =
            randr_outputs.into_iter().filter(|o| o.active).collect();
        if config.primary_first {
            // Stable: non-primary outputs keep the reported order.
            randr_outputs.sort_by_key(|o| !o.primary);
        }

        let mut workspaces: Vec<Workspace> = tree
            .root()
            .workspaces()
            .into_iter()
            .map(Workspace::from_node)
            .collect();
        workspaces.sort_by_key(|w| (w.x, w.num));

        Self {
            tree,
            outputs,
            randr_outputs,
            workspaces,
        }
    }

    //  Accessors

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Workspaces in `(x, num)` order.
    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    /// Active RandR outputs in numbering order.
    pub fn randr_outputs(&self) -> &[OutputInfo] {
        &self.randr_outputs
    }

    /// Tree output nodes, left to right.
    pub fn outputs(&self) -> impl Iterator<Item = &Node> {
        self.outputs.iter().filter_map(move |id| {
            self.tree.root().nodes.iter().find(|n| n.id == *id)
        })
    }

    //  Focus

    /// The focused container.
    pub fn focused(&self) -> Result<&Node, LayoutError> {
        self.tree.find_focused().ok_or(LayoutError::NoFocusedContainer)
    }

    /// Index into [`workspaces`](Self::workspaces) of the workspace holding
    /// the focused container.
    pub fn focused_workspace_index(&self) -> Result<usize, LayoutError> {
        let focused = self.focused()?;
        let workspace = self
            .tree
            .workspace_of(focused.id)
            .ok_or(LayoutError::NoFocusedWorkspace)?;
        self.workspaces
            .iter()
            .position(|w| w.id == workspace.id)
            .ok_or(LayoutError::NoFocusedWorkspace)
    }

    /// The tree output that holds the focused container.
    pub fn focused_output(&self) -> Result<&Node, LayoutError> {
        self.outputs()
            .find(|o| o.find_focused().is_some())
            .ok_or(LayoutError::NoFocusedOutput)
    }

    /// Position of the focused output among the RandR outputs.
    ///
    /// This is the "monitor number" X11 tools such as `dmenu -m` expect.
    /// Falls back to `0` when the focused output has no RandR counterpart.
    pub fn focused_output_idx(&self) -> Result<usize, LayoutError> {
        let focused = self.focused_output()?;
        Ok(self
            .randr_outputs
            .iter()
            .position(|o| o.name == focused.name())
            .unwrap_or(0))
    }

    /// Whether the focused container is the outermost child on `side` of a
    /// horizontally split parent, i.e. a `move` towards `side` would leave
    /// the siblings.
    pub fn focused_at_horizontal_edge(&self, side: Side) -> Result<bool, LayoutError> {
        let focused = self.focused()?;
        let Some(parent) = self.tree.parent_of(focused.id) else {
            return Ok(false);
        };
        if parent.orientation.as_deref() != Some("horizontal") {
            return Ok(false);
        }
        let edge = match side {
            Side::Left => parent.nodes.first(),
            Side::Right => parent.nodes.last(),
        };
        Ok(edge.map(|n| n.id) == Some(focused.id))
    }

    //  Workspace numbering

    /// Next larger workspace number, starting from the focused workspace.
    /// See [`next_workspace_number`].
    pub fn find_next_workspace(&self, find_new: bool) -> Result<i64, LayoutError> {
        let idx = self.focused_workspace_index()?;
        next_workspace_number(&self.workspaces, idx, find_new)
    }

    /// Next smaller workspace number, starting from the focused workspace.
    /// See [`previous_workspace_number`].
    pub fn find_previous_workspace(&self, find_new: bool) -> Result<i64, LayoutError> {
        let idx = self.focused_workspace_index()?;
        previous_workspace_number(&self.workspaces, idx, find_new)
    }
}

/// Scan forward from `idx`.
///
/// Without `find_new` this is simply the current number plus one, whether
/// or not that workspace exists.  With `find_new` the first gap after `idx`
/// is returned, or the first free number past the last workspace if there
/// is none.  A gap only counts if its number is larger than the current one
/// and not taken by a workspace on another output.
pub fn next_workspace_number(
    workspaces: &[Workspace],
    mut idx: usize,
    find_new: bool,
) -> Result<i64, LayoutError> {
    let idx_max = workspaces.len().checked_sub(1).ok_or(LayoutError::NoWorkspaces)?;
    idx = idx.min(idx_max);
    let current = workspaces[idx].num;
    if !find_new {
        return Ok(current + 1);
    }

    while idx < idx_max {
        let candidate = workspaces[idx].num + 1;
        if workspaces[idx + 1].num > candidate
            && candidate > current
            && !is_used(workspaces, candidate)
        {
            return Ok(candidate);
        }
        idx += 1;
    }
    Ok(first_free_above(workspaces, workspaces[idx_max].num.max(current)))
}

/// Scan backward from `idx`.
///
/// Without `find_new` this is the current number minus one, or the last
/// workspace's number when the current one is 1.  With `find_new` the first
/// free gap before `idx` is returned, then the number below the first
/// workspace; a candidate must be at least 1, below the current number and
/// unused.  Failing that the search wraps to the first free number past the
/// highest workspace.
pub fn previous_workspace_number(
    workspaces: &[Workspace],
    mut idx: usize,
    find_new: bool,
) -> Result<i64, LayoutError> {
    let idx_max = workspaces.len().checked_sub(1).ok_or(LayoutError::NoWorkspaces)?;
    idx = idx.min(idx_max);
    let current = workspaces[idx].num;

    if !find_new {
        return Ok(if current > 1 {
            current - 1
        } else {
            workspaces[idx_max].num
        });
    }

    let free_below = |candidate: i64| {
        candidate >= 1 && candidate < current && !is_used(workspaces, candidate)
    };
    while idx > 0 {
        let candidate = workspaces[idx].num - 1;
        if workspaces[idx - 1].num < candidate && free_below(candidate) {
            return Ok(candidate);
        }
        idx -= 1;
    }
    if free_below(workspaces[idx].num - 1) {
        return Ok(workspaces[idx].num - 1);
    }
    let highest = workspaces.iter().map(|w| w.num).max().unwrap_or(current);
    Ok(first_free_above(workspaces, highest))
}

fn is_used(workspaces: &[Workspace], num: i64) -> bool {
    workspaces.iter().any(|w| w.num == num)
}

/// Smallest number above `floor` no workspace uses.
fn first_free_above(workspaces: &[Workspace], floor: i64) -> i64 {
    let mut num = floor + 1;
    while is_used(workspaces, num) {
        num += 1;
    }
    num
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn ws(nums: &[i64]) -> Vec<Workspace> {
        nums.iter()
            .map(|&num| Workspace {
                id: 100 + num,
                num,
                x: 0,
            })
            .collect()
    }

    //  Gap scan

    #[test]
    fn next_without_gaps_is_current_plus_one() {
        let w = ws(&[1, 2, 3, 4]);
        for idx in 0..w.len() {
            assert_eq!(next_workspace_number(&w, idx, false), Ok(w[idx].num + 1));
        }
    }

    #[test]
    fn previous_without_gaps_is_current_minus_one() {
        let w = ws(&[1, 2, 3, 4]);
        for idx in 1..w.len() {
            assert_eq!(previous_workspace_number(&w, idx, false), Ok(w[idx].num - 1));
        }
    }

    #[test]
    fn next_ignores_gaps_unless_new_requested() {
        let w = ws(&[1, 2, 5]);
        assert_eq!(next_workspace_number(&w, 1, false), Ok(3));
        assert_eq!(next_workspace_number(&w, 0, false), Ok(2));
    }

    #[test]
    fn next_new_fills_first_gap_after_current() {
        let w = ws(&[1, 2, 5, 6, 9]);
        assert_eq!(next_workspace_number(&w, 0, true), Ok(3));
        assert_eq!(next_workspace_number(&w, 2, true), Ok(7));
        assert_eq!(next_workspace_number(&w, 4, true), Ok(10));
    }

    #[test]
    fn next_new_without_gap_goes_past_last() {
        let w = ws(&[1, 2, 3]);
        assert_eq!(next_workspace_number(&w, 0, true), Ok(4));
    }

    #[test]
    fn previous_new_fills_first_gap_before_current() {
        let w = ws(&[1, 4, 5, 8]);
        assert_eq!(previous_workspace_number(&w, 3, true), Ok(7));
        assert_eq!(previous_workspace_number(&w, 2, true), Ok(3));
    }

    #[test]
    fn previous_new_without_gap_uses_space_below_first() {
        let w = ws(&[3, 4, 5]);
        assert_eq!(previous_workspace_number(&w, 2, true), Ok(2));
    }

    #[test]
    fn previous_from_one_wraps_to_last() {
        let w = ws(&[1, 2, 3]);
        assert_eq!(previous_workspace_number(&w, 0, false), Ok(3));
        assert_eq!(previous_workspace_number(&w, 0, true), Ok(4));
        assert_eq!(previous_workspace_number(&w, 2, true), Ok(4));
    }

    #[test]
    fn single_workspace() {
        let w = ws(&[1]);
        assert_eq!(next_workspace_number(&w, 0, false), Ok(2));
        assert_eq!(next_workspace_number(&w, 0, true), Ok(2));
        assert_eq!(previous_workspace_number(&w, 0, false), Ok(1));
        assert_eq!(previous_workspace_number(&w, 0, true), Ok(2));
    }

    #[test]
    fn empty_sequence_is_an_error() {
        assert_eq!(next_workspace_number(&[], 0, true), Err(LayoutError::NoWorkspaces));
        assert_eq!(
            previous_workspace_number(&[], 0, false),
            Err(LayoutError::NoWorkspaces)
        );
    }

    #[test]
    fn new_numbers_are_free_and_beyond_current() {
        let sequences: &[&[i64]] = &[
            &[1],
            &[1, 2, 3],
            &[1, 3],
            &[2, 3, 7, 8, 10],
            &[1, 2, 4, 5, 6, 9],
        ];
        for nums in sequences {
            let w = ws(nums);
            for idx in 0..w.len() {
                let next = next_workspace_number(&w, idx, true).unwrap();
                assert!(!nums.contains(&next), "{:?} next from {}: {}", nums, idx, next);
                assert!(next > w[idx].num);

                let prev = previous_workspace_number(&w, idx, true).unwrap();
                assert!(!nums.contains(&prev), "{:?} prev from {}: {}", nums, idx, prev);
            }
        }
    }

    /// Workspaces from `(x, num)` pairs, sorted the way [`Layout`] sorts them.
    fn ws_at(pairs: &[(i32, i64)]) -> Vec<Workspace> {
        let mut w: Vec<Workspace> = pairs
            .iter()
            .map(|&(x, num)| Workspace {
                id: 100 + num,
                num,
                x,
            })
            .collect();
        w.sort_by_key(|w| (w.x, w.num));
        w
    }

    #[test]
    fn new_number_skips_gaps_taken_on_other_outputs() {
        // Left output holds 1 and 4, right output 2 and 5: [1, 4, 2, 5].
        let w = ws_at(&[(0, 1), (0, 4), (1920, 2), (1920, 5)]);
        assert_eq!(next_workspace_number(&w, 0, true), Ok(3));
        assert_eq!(next_workspace_number(&w, 1, true), Ok(6));
        assert_eq!(previous_workspace_number(&w, 1, true), Ok(3));
        assert_eq!(previous_workspace_number(&w, 2, true), Ok(6));
    }

    #[test]
    fn new_numbers_are_free_across_outputs() {
        let layouts: &[&[(i32, i64)]] = &[
            &[(0, 1), (0, 4), (1920, 2), (1920, 5)],
            &[(0, 3), (0, 7), (1920, 1), (1920, 2), (1920, 4)],
            &[(0, 5), (1920, 1), (3840, 3)],
            &[(0, 2), (0, 3), (1920, 1), (1920, 6)],
        ];
        for pairs in layouts {
            let w = ws_at(pairs);
            let nums: Vec<i64> = w.iter().map(|w| w.num).collect();
            for idx in 0..w.len() {
                let next = next_workspace_number(&w, idx, true).unwrap();
                assert!(!nums.contains(&next), "{:?} next from {}: {}", nums, idx, next);
                assert!(next > w[idx].num, "{:?} next from {}: {}", nums, idx, next);

                let prev = previous_workspace_number(&w, idx, true).unwrap();
                assert!(!nums.contains(&prev), "{:?} prev from {}: {}", nums, idx, prev);
                assert!(prev >= 1);
            }
        }
    }

    //  Snapshot

    fn workspace(id: i64, num: i64, x: i32, nodes: Value) -> Value {
        json!({
            "id": id, "type": "workspace", "name": num.to_string(), "num": num,
            "orientation": "horizontal",
            "rect": { "x": x, "y": 0, "width": 1920, "height": 1080 },
            "nodes": nodes
        })
    }

    fn output(id: i64, name: &str, x: i32, workspaces: Vec<Value>) -> Value {
        json!({
            "id": id, "type": "output", "name": name,
            "rect": { "x": x, "y": 0, "width": 1920, "height": 1080 },
            "nodes": [ { "id": id + 1, "type": "con", "name": "content", "nodes": workspaces } ]
        })
    }

    fn con(id: i64, focused: bool) -> Value {
        json!({ "id": id, "type": "con", "focused": focused })
    }

    fn randr(name: &str, primary: bool, active: bool) -> OutputInfo {
        OutputInfo {
            name: name.into(),
            active,
            primary,
        }
    }

    /// Two outputs listed right one first: HDMI-1 at x=1920 with workspaces
    /// 2 and 5, DP-1 at x=0 with workspaces 4 and 1.  Focus is on a window in
    /// workspace 2.
    fn dual_head() -> Layout {
        let tree = Tree::from_value(json!({
            "id": 1, "type": "root", "name": "root",
            "nodes": [
                { "id": 2, "type": "output", "name": "__i3", "nodes": [] },
                output(40, "HDMI-1", 1920, vec![
                    workspace(50, 2, 1920, json!([con(51, false), con(52, true)])),
                    workspace(53, 5, 1920, json!([])),
                ]),
                output(10, "DP-1", 0, vec![
                    workspace(20, 4, 0, json!([])),
                    workspace(21, 1, 0, json!([con(22, false)])),
                ]),
            ]
        }))
        .unwrap();
        let randr_outputs = vec![
            randr("DP-1", false, true),
            randr("VGA-1", false, false),
            randr("HDMI-1", true, true),
        ];
        Layout::new(tree, randr_outputs, &Config::default())
    }

    #[test]
    fn outputs_sorted_left_to_right_without_stash() {
        let layout = dual_head();
        let names: Vec<&str> = layout.outputs().map(|o| o.name()).collect();
        assert_eq!(names, vec!["DP-1", "HDMI-1"]);
    }

    #[test]
    fn randr_outputs_active_and_primary_first() {
        let layout = dual_head();
        let names: Vec<&str> = layout.randr_outputs().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["HDMI-1", "DP-1"]);
    }

    #[test]
    fn randr_order_kept_without_primary_first() {
        let tree = dual_head().tree().clone();
        let config = Config {
            primary_first: false,
            ..Config::default()
        };
        let layout = Layout::new(
            tree,
            vec![randr("DP-1", false, true), randr("HDMI-1", true, true)],
            &config,
        );
        let names: Vec<&str> = layout.randr_outputs().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["DP-1", "HDMI-1"]);
    }

    #[test]
    fn workspaces_sorted_by_position_then_number() {
        let layout = dual_head();
        let nums: Vec<i64> = layout.workspaces().iter().map(|w| w.num).collect();
        assert_eq!(nums, vec![1, 4, 2, 5]);
    }

    #[test]
    fn focused_lookups() {
        let layout = dual_head();
        assert_eq!(layout.focused().unwrap().id, 52);
        assert_eq!(layout.focused_workspace_index(), Ok(2));
        assert_eq!(layout.focused_output().unwrap().name(), "HDMI-1");
        assert_eq!(layout.focused_output_idx(), Ok(0));
    }

    #[test]
    fn numbering_across_outputs() {
        let layout = dual_head();
        assert_eq!(layout.find_next_workspace(false), Ok(3));
        assert_eq!(layout.find_next_workspace(true), Ok(3));
        assert_eq!(layout.find_previous_workspace(false), Ok(1));
        // 1 -> 4 is a gap in (x, num) order, but 3 is not below the current
        // workspace 2, so the search wraps past the highest number.
        assert_eq!(layout.find_previous_workspace(true), Ok(6));
    }

    #[test]
    fn focused_at_edges_of_horizontal_split() {
        let layout = dual_head();
        assert_eq!(layout.focused_at_horizontal_edge(Side::Right), Ok(true));
        assert_eq!(layout.focused_at_horizontal_edge(Side::Left), Ok(false));
    }

    #[test]
    fn no_focus_reports_errors() {
        let tree = Tree::from_value(json!({
            "id": 1, "type": "root",
            "nodes": [ output(10, "DP-1", 0, vec![workspace(20, 1, 0, json!([con(21, false)]))]) ]
        }))
        .unwrap();
        let layout = Layout::new(tree, vec![randr("DP-1", true, true)], &Config::default());
        assert_eq!(layout.find_next_workspace(false), Err(LayoutError::NoFocusedContainer));
        assert_eq!(layout.focused_output_idx(), Err(LayoutError::NoFocusedOutput));
        assert_eq!(
            layout.focused_at_horizontal_edge(Side::Left),
            Err(LayoutError::NoFocusedContainer)
        );
    }

    #[test]
    fn focus_on_scratchpad_has_no_workspace() {
        let tree = Tree::from_value(json!({
            "id": 1, "type": "root",
            "nodes": [
                { "id": 2, "type": "output", "name": "__i3", "nodes": [
                    { "id": 3, "type": "con", "name": "content", "nodes": [
                        { "id": 4, "type": "workspace", "name": "__i3_scratch", "num": -1,
                          "floating_nodes": [ { "id": 5, "type": "floating_con", "focused": true } ] }
                    ]}
                ]},
                output(10, "DP-1", 0, vec![workspace(20, 1, 0, json!([]))])
            ]
        }))
        .unwrap();
        let layout = Layout::new(tree, vec![], &Config::default());
        assert_eq!(layout.focused_workspace_index(), Err(LayoutError::NoFocusedWorkspace));
        assert_eq!(layout.focused_output_idx(), Err(LayoutError::NoFocusedOutput));
    }

    #[test]
    fn unknown_randr_name_falls_back_to_zero() {
        let tree = Tree::from_value(json!({
            "id": 1, "type": "root",
            "nodes": [ output(10, "eDP-1", 0, vec![workspace(20, 1, 0, json!([con(21, true)]))]) ]
        }))
        .unwrap();
        let layout = Layout::new(
            tree,
            vec![randr("DP-1", true, true), randr("DP-2", false, true)],
            &Config::default(),
        );
        assert_eq!(layout.focused_output_idx(), Ok(0));
    }
}
