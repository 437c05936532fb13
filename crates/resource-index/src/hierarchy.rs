//! The collection hierarchy: an arena of nodes linked into a DAG.
//!
//! The hierarchy is wired once at startup. Nodes may have several parents
//! (e.g. an `offsets` axis shared by a `levels` and an `accumulations`
//! branch), so every traversal carries a visited set.

use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

use crate::collection::VariableCollection;
use crate::error::{IndexError, IndexResult};
use crate::node::{Node, NodeId};
use crate::variable::CollectionId;

/// Arena of [`Node`]s rooted at one top node.
#[derive(Debug)]
pub struct Hierarchy<P> {
    nodes: Vec<Node<P>>,
    by_collection: HashMap<CollectionId, NodeId>,
    root: NodeId,
}

impl<P> Hierarchy<P> {
    /// Create a hierarchy whose root node owns `root`.
    pub fn new(root: VariableCollection) -> Self {
        let id = NodeId(0);
        let mut by_collection = HashMap::new();
        by_collection.insert(root.id().clone(), id);
        Self {
            nodes: vec![Node::new(id, root)],
            by_collection,
            root: id,
        }
    }

    /// Add a detached node. It becomes part of the hierarchy once linked
    /// below a reachable node with [`append_child`](Self::append_child).
    pub fn add_node(&mut self, collection: VariableCollection) -> IndexResult<NodeId> {
        if self.by_collection.contains_key(collection.id()) {
            return Err(IndexError::DuplicateCollection(collection.id().clone()));
        }
        let id = NodeId(self.nodes.len());
        self.by_collection.insert(collection.id().clone(), id);
        self.nodes.push(Node::new(id, collection));
        Ok(id)
    }

    /// Link `child` below `parent` in both directions.
    ///
    /// Linking an existing edge again is a no-op. Fails if either node is
    /// unknown or if the edge would close a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> IndexResult<()> {
        self.check(parent)?;
        self.check(child)?;
        if parent == child || self.descendants(child).contains(&parent) {
            return Err(IndexError::CycleDetected {
                parent: self.nodes[parent.0].collection().id().clone(),
                child: self.nodes[child.0].collection().id().clone(),
            });
        }
        if self.nodes[parent.0].children.contains(&child) {
            return Ok(());
        }
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parents.push(parent);
        debug!(
            parent = %self.nodes[parent.0].collection().id(),
            child = %self.nodes[child.0].collection().id(),
            "Linked hierarchy nodes"
        );
        Ok(())
    }

    /// Link several children below `parent`, in order.
    pub fn append_children<I>(&mut self, parent: NodeId, children: I) -> IndexResult<()>
    where
        I: IntoIterator<Item = NodeId>,
    {
        for child in children {
            self.append_child(parent, child)?;
        }
        Ok(())
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<P>> {
        self.nodes.get(id.0)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<P>> {
        self.nodes.get_mut(id.0)
    }

    /// All nodes, including detached ones, in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<P>> {
        self.nodes.iter()
    }

    /// Node owning the collection with `id`, searched breadth-first from
    /// the root. Detached nodes are never returned.
    pub fn node_by_collection(&self, id: &CollectionId) -> Option<NodeId> {
        let candidate = *self.by_collection.get(id)?;
        if candidate == self.root {
            return Some(candidate);
        }
        self.descendants(self.root)
            .into_iter()
            .find(|n| *n == candidate)
    }

    /// Nodes below `id`, breadth-first, each listed once.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.walk(id, |n| &n.children)
    }

    /// Nodes above `id`, breadth-first, each listed once.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        self.walk(id, |n| &n.parents)
    }

    /// Collections reachable from the root, depth-first pre-order, each
    /// listed once.
    pub fn collections(&self) -> Vec<&VariableCollection> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let node = &self.nodes[id.0];
            result.push(node.collection());
            stack.extend(node.children.iter().rev().copied());
        }
        result
    }

    /// Mutable collection of a reachable node; detached nodes are skipped
    /// like in [`node_by_collection`](Self::node_by_collection).
    pub(crate) fn collection_mut(&mut self, id: &CollectionId) -> Option<&mut VariableCollection> {
        let node = self.node_by_collection(id)?;
        self.nodes.get_mut(node.0).map(Node::collection_mut)
    }

    fn walk<F>(&self, start: NodeId, next: F) -> Vec<NodeId>
    where
        F: Fn(&Node<P>) -> &Vec<NodeId>,
    {
        let Some(node) = self.nodes.get(start.0) else {
            return Vec::new();
        };
        let mut seen: HashSet<NodeId> = HashSet::from([start]);
        let mut queue: VecDeque<NodeId> = next(node).iter().copied().collect();
        let mut result = Vec::new();
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            result.push(id);
            queue.extend(next(&self.nodes[id.0]).iter().copied());
        }
        result
    }

    fn check(&self, id: NodeId) -> IndexResult<()> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(IndexError::UnknownNode(id.0))
        }
    }
}
