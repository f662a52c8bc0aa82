//! A* search machinery: heuristics, search nodes and the frontier.
//!
//! The [`Planner`](crate::Planner) drives these pieces; they are public so
//! that observers and custom heuristics can inspect the search.

use crate::{Action, GoapError, Goal, Result, State};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;
use std::rc::Rc;

/// Estimates the remaining cost from a state to a goal.
pub trait Heuristic: Send + Sync {
    fn estimate(&self, state: &State, goal: &Goal) -> f64;
}

/// Counts the goal attributes that do not hold yet.
///
/// This is not a proven lower bound: an action costing 1 that fixes two goal
/// attributes at once makes it overestimate. Plans found with it are usually
/// but not always cost-optimal. Use [`ZeroHeuristic`] when optimality matters
/// more than search effort.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsatisfiedConditionCount;

impl Heuristic for UnsatisfiedConditionCount {
    fn estimate(&self, state: &State, goal: &Goal) -> f64 {
        goal.unsatisfied_count(state) as f64
    }
}

/// Always estimates zero, turning A* into uniform-cost (Dijkstra) search.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    fn estimate(&self, _state: &State, _goal: &Goal) -> f64 {
        0.0
    }
}

/// Index of a node inside a [`SearchTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A point in the search tree.
///
/// The root has neither parent nor action. Every other node records the
/// node it was expanded from and the action that led here.
#[derive(Debug, Clone)]
pub struct SearchNode<'a> {
    state: Rc<State>,
    parent: Option<NodeId>,
    action: Option<&'a Action>,
    g: f64,
    h: f64,
    depth: usize,
}

impl<'a> SearchNode<'a> {
    pub fn state(&self) -> &State {
        &self.state
    }

    pub(crate) fn shared_state(&self) -> &Rc<State> {
        &self.state
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn action(&self) -> Option<&'a Action> {
        self.action
    }

    /// Accumulated path cost from the root.
    pub fn g(&self) -> f64 {
        self.g
    }

    /// Heuristic estimate of the remaining cost.
    pub fn h(&self) -> f64 {
        self.h
    }

    pub fn f(&self) -> f64 {
        self.g + self.h
    }

    /// Number of actions between the root and this node.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl fmt::Display for SearchNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SearchNode(action={}, g={:.2}, h={:.2}, f={:.2})",
            self.action.map_or("None", |a| a.name()),
            self.g,
            self.h,
            self.f()
        )
    }
}

/// Arena holding every node created during one search.
///
/// Children always live at a higher index than their parent, which keeps
/// parent chains acyclic.
#[derive(Debug)]
pub struct SearchTree<'a> {
    nodes: Vec<SearchNode<'a>>,
}

impl<'a> SearchTree<'a> {
    /// Creates a tree holding only the root node for `state`.
    pub fn new(state: Rc<State>, h: f64) -> Self {
        Self {
            nodes: vec![SearchNode {
                state,
                parent: None,
                action: None,
                g: 0.0,
                h,
                depth: 0,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn get(&self, id: NodeId) -> Result<&SearchNode<'a>> {
        self.nodes.get(id.0).ok_or_else(|| {
            GoapError::CorruptedSearchTree(format!("node {} does not exist", id.0))
        })
    }

    /// Adds the node reached from `parent` by performing `action`.
    ///
    /// `state` must be the result of applying `action` to the parent's state.
    pub fn push_child(
        &mut self,
        parent: NodeId,
        action: &'a Action,
        state: Rc<State>,
        h: f64,
    ) -> Result<NodeId> {
        let (g, depth) = {
            let parent_node = self.get(parent)?;
            (parent_node.g + action.cost(), parent_node.depth + 1)
        };

        let id = NodeId(self.nodes.len());
        self.nodes.push(SearchNode {
            state,
            parent: Some(parent),
            action: Some(action),
            g,
            h,
            depth,
        });
        Ok(id)
    }

    /// Walks parent links from `id` back to the root, yielding each node's
    /// action together with the state it produced, in root-to-`id` order.
    pub fn path_with_states(&self, id: NodeId) -> Result<Vec<(&'a Action, &State)>> {
        let mut path = Vec::new();
        let mut current = self.get(id)?;
        let mut current_id = id;

        while let Some(parent_id) = current.parent {
            if parent_id >= current_id {
                return Err(GoapError::CorruptedSearchTree(format!(
                    "node {} points forward to parent {}",
                    current_id.0, parent_id.0
                )));
            }
            let action = current.action.ok_or_else(|| {
                GoapError::CorruptedSearchTree(format!(
                    "node {} has a parent but no action",
                    current_id.0
                ))
            })?;
            path.push((action, current.state()));

            current_id = parent_id;
            current = self.get(parent_id)?;
        }

        path.reverse();
        Ok(path)
    }

    /// The actions leading from the root to `id`, in execution order.
    pub fn path(&self, id: NodeId) -> Result<Vec<&'a Action>> {
        Ok(self
            .path_with_states(id)?
            .into_iter()
            .map(|(action, _)| action)
            .collect())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    f: f64,
    sequence: u64,
    node: NodeId,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lower f first, then first inserted.
        self.f
            .total_cmp(&other.f)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

/// Min-priority queue of nodes keyed by f-score.
///
/// Nodes with equal f-scores come out in insertion order, so a search over
/// the same inputs always pops nodes in the same sequence.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<Reverse<FrontierEntry>>,
    next_sequence: u64,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: NodeId, f: f64) {
        self.heap.push(Reverse(FrontierEntry {
            f,
            sequence: self.next_sequence,
            node,
        }));
        self.next_sequence += 1;
    }

    pub fn pop(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|Reverse(entry)| entry.node)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
