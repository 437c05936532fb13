//! The resource index: placement, availability tracking and queries.
//!
//! ## Placement
//!
//! A resource is stored at the node of the deepest collection it defines.
//! The search starts at the shallowest node whose collection is one of the
//! resource's collections and walks down, striking matched variables from a
//! working set. Every node on the way must match at least one remaining
//! variable; the node where the working set empties is the target.
//!
//! ## Availability
//!
//! For every node the index keeps the variables of that node's collection
//! which define at least one indexed resource. Additions update the map
//! incrementally. Removals re-scan the owning node and its descendants for
//! each variable that may have lost its last resource.

use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::iter;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::collection::VariableCollection;
use crate::error::PlacementError;
use crate::events::{ListenerId, Listeners, ResourceEvent};
use crate::hierarchy::Hierarchy;
use crate::node::{Node, NodeId};
use crate::resource::{Resource, ResourceKey};
use crate::variable::{CollectionId, Variable};

/// How a downward search treats nodes that match none of the remaining
/// variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descent {
    /// Every visited node must match one of the remaining variables.
    Contiguous,
    /// Nodes that match nothing are passed through.
    Bubble,
}

/// Outcome of an [`append`](ResourceIndex::append) or
/// [`remove`](ResourceIndex::remove) batch.
#[derive(Debug)]
pub struct BatchReport<P> {
    /// Resources that were newly inserted, or actually removed.
    pub applied: Vec<Arc<Resource<P>>>,
    /// Resources whose defining variables could not be placed.
    pub rejected: Vec<(ResourceKey, PlacementError)>,
}

impl<P> Default for BatchReport<P> {
    fn default() -> Self {
        Self {
            applied: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

impl<P> BatchReport<P> {
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

/// In-memory index of resources over a collection hierarchy.
///
/// Single writer: `append` and `remove` take `&mut self`, queries take
/// `&self`. Wrap the index in a lock to share it between threads.
#[derive(Debug)]
pub struct ResourceIndex<P> {
    hierarchy: Hierarchy<P>,
    availability: HashMap<NodeId, HashSet<Variable>>,
    time_collections: Vec<CollectionId>,
    listeners: Listeners<P>,
}

impl<P> ResourceIndex<P> {
    pub fn new(hierarchy: Hierarchy<P>) -> Self {
        Self {
            hierarchy,
            availability: HashMap::new(),
            time_collections: Vec::new(),
            listeners: Listeners::default(),
        }
    }

    /// Collections whose variables must be passed, exactly, to
    /// [`times_by_variables_no_bubble`](Self::times_by_variables_no_bubble).
    pub fn with_time_collections<I, C>(mut self, collections: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CollectionId>,
    {
        self.time_collections = collections.into_iter().map(Into::into).collect();
        self
    }

    pub fn time_collections(&self) -> &[CollectionId] {
        &self.time_collections
    }

    pub fn hierarchy(&self) -> &Hierarchy<P> {
        &self.hierarchy
    }

    pub fn root(&self) -> NodeId {
        self.hierarchy.root()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<P>> {
        self.hierarchy.node(id)
    }

    /// Register a change listener.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ResourceEvent<P>) + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // ------------------------------------------------------------------
    // Collections
    // ------------------------------------------------------------------

    /// All collections of the hierarchy, root first.
    pub fn variable_collections(&self) -> Vec<&VariableCollection> {
        self.hierarchy.collections()
    }

    pub fn collection(&self, id: &CollectionId) -> Option<&VariableCollection> {
        self.node_by_collection(id)
            .and_then(|n| self.hierarchy.node(n))
            .map(Node::collection)
    }

    /// Mutable access to a collection, e.g. to register new runs.
    ///
    /// Removing a variable that still defines indexed resources leaves those
    /// resources indexed and removable by key, but no new resource can be
    /// placed with it.
    pub fn collection_mut(&mut self, id: &CollectionId) -> Option<&mut VariableCollection> {
        self.hierarchy.collection_mut(id)
    }

    pub fn node_by_collection(&self, id: &CollectionId) -> Option<NodeId> {
        self.hierarchy.node_by_collection(id)
    }

    pub fn node_by_collection_id(&self, id: &str) -> Option<NodeId> {
        self.node_by_collection(&CollectionId::new(id))
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Index a batch of resources.
    ///
    /// Resources that cannot be placed are skipped and reported. A resource
    /// whose key is already indexed replaces the stored payload without
    /// counting as added. One [`ResourceEvent::Added`] is emitted after the
    /// whole batch if anything was added.
    pub fn append<I>(&mut self, resources: I) -> BatchReport<P>
    where
        I: IntoIterator<Item = Resource<P>>,
    {
        let mut report = BatchReport::default();
        for resource in resources {
            let resource = Arc::new(resource);
            let target = match self.placement(resource.key().variables()) {
                Ok(target) => target,
                Err(e) => {
                    warn!(
                        resource = %resource.key(),
                        reason = e.code(),
                        error = %e,
                        "Skipping resource that cannot be placed"
                    );
                    report.rejected.push((resource.key().clone(), e));
                    continue;
                }
            };
            let Some(node) = self.hierarchy.node_mut(target) else {
                continue;
            };
            if node.append(resource.clone()) > 0 {
                debug!(node = %node.collection().id(), resource = %resource.key(), "Indexed resource");
                self.mark_available(resource.key());
                report.applied.push(resource);
            } else {
                debug!(resource = %resource.key(), "Replaced payload of indexed resource");
            }
        }

        debug!(
            added = report.applied_count(),
            rejected = report.rejected_count(),
            "Appended resource batch"
        );
        if !report.applied.is_empty() {
            self.listeners
                .emit(&ResourceEvent::Added(report.applied.clone()));
        }
        report
    }

    /// Remove a batch of resources by key.
    ///
    /// Emits one [`ResourceEvent::Removed`] with the resources that were
    /// actually indexed.
    pub fn remove<I>(&mut self, keys: I) -> BatchReport<P>
    where
        I: IntoIterator<Item = ResourceKey>,
    {
        let mut report = BatchReport::default();
        let mut touched: HashMap<NodeId, Vec<Arc<Resource<P>>>> = HashMap::new();
        for key in keys {
            let target = match self.locate(key.variables()) {
                Ok(target) => target,
                Err(e) => {
                    warn!(resource = %key, reason = e.code(), error = %e, "Cannot locate resource to remove");
                    report.rejected.push((key, e));
                    continue;
                }
            };
            let removed = self
                .hierarchy
                .node_mut(target)
                .and_then(|node| node.remove(&key));
            match removed {
                Some(resource) => {
                    touched.entry(target).or_default().push(resource.clone());
                    report.applied.push(resource);
                }
                None => debug!(resource = %key, "Resource to remove was not indexed"),
            }
        }

        if !touched.is_empty() {
            self.prune_availability(&touched);
        }
        debug!(
            removed = report.applied_count(),
            rejected = report.rejected_count(),
            "Removed resource batch"
        );
        if !report.applied.is_empty() {
            self.listeners
                .emit(&ResourceEvent::Removed(report.applied.clone()));
        }
        report
    }

    fn mark_available(&mut self, key: &ResourceKey) {
        for variable in key.variables() {
            let owner = variable
                .collection()
                .and_then(|c| self.hierarchy.node_by_collection(c));
            if let Some(owner) = owner {
                self.availability
                    .entry(owner)
                    .or_default()
                    .insert(variable.clone());
            }
        }
    }

    fn prune_availability(&mut self, touched: &HashMap<NodeId, Vec<Arc<Resource<P>>>>) {
        let mut candidates: BTreeSet<Variable> = BTreeSet::new();
        for (node_id, removed) in touched {
            let Some(node) = self.hierarchy.node(*node_id) else {
                continue;
            };
            for resource in removed {
                for variable in resource.key().variables() {
                    if !node.has_resources_with(variable) {
                        candidates.insert(variable.clone());
                    }
                }
            }
        }

        for variable in candidates {
            let Some(owner) = variable
                .collection()
                .and_then(|c| self.hierarchy.node_by_collection(c))
            else {
                continue;
            };
            let still_used = iter::once(owner)
                .chain(self.hierarchy.descendants(owner))
                .filter_map(|n| self.hierarchy.node(n))
                .any(|n| n.has_resources_with(&variable));
            if still_used {
                continue;
            }
            if let Some(available) = self.availability.get_mut(&owner) {
                available.remove(&variable);
                if available.is_empty() {
                    self.availability.remove(&owner);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Placement
    // ------------------------------------------------------------------

    /// Node at which a resource with these defining variables is stored.
    ///
    /// Every variable must still be a member of its collection.
    pub fn placement(&self, variables: &[Variable]) -> Result<NodeId, PlacementError> {
        self.check_axes(variables)?;
        for variable in variables {
            let Some(collection) = variable.collection() else {
                continue;
            };
            if !self.collection(collection).is_some_and(|c| c.contains(variable)) {
                return Err(PlacementError::ForeignVariable {
                    collection: collection.clone(),
                    id: variable.id().clone(),
                });
            }
        }
        self.locate(variables)
    }

    /// Node at which a resource with these defining variables is, or would
    /// be, stored. Variables since removed from their collection still
    /// resolve through their owning collection.
    fn locate(&self, variables: &[Variable]) -> Result<NodeId, PlacementError> {
        let axes = self.check_axes(variables)?;
        let root = self.hierarchy.root();
        let start = iter::once(root)
            .chain(self.hierarchy.descendants(root))
            .find(|n| {
                self.hierarchy
                    .node(*n)
                    .is_some_and(|node| axes.contains(node.collection().id()))
            })
            .ok_or(PlacementError::Unreachable)?;

        self.search(start, variables, Descent::Contiguous)
            .ok_or(PlacementError::Unreachable)
    }

    fn check_axes<'a>(
        &self,
        variables: &'a [Variable],
    ) -> Result<HashSet<&'a CollectionId>, PlacementError> {
        if variables.is_empty() {
            return Err(PlacementError::EmptyDefinition);
        }
        let mut axes = HashSet::new();
        for variable in variables {
            let collection = variable
                .collection()
                .ok_or_else(|| PlacementError::UnownedVariable(variable.id().clone()))?;
            if self.node_by_collection(collection).is_none() {
                return Err(PlacementError::UnknownCollection(collection.clone()));
            }
            if !axes.insert(collection) {
                return Err(PlacementError::DuplicateAxis(collection.clone()));
            }
        }
        Ok(axes)
    }

    /// First node, searching down from `start`, at which all `variables`
    /// are matched along one path. A variable matches the node of its
    /// owning collection.
    pub fn search(&self, start: NodeId, variables: &[Variable], mode: Descent) -> Option<NodeId> {
        let remaining: Vec<usize> = (0..variables.len()).collect();
        let mut seen = HashSet::new();
        self.descend(start, variables, remaining, mode, &mut seen)
    }

    /// Depth-first search below `node` for the first node at which all
    /// `remaining` variables have been matched along the path.
    ///
    /// A node reached again with the same remaining variables has already
    /// failed, so each `(node, remaining)` state is expanded once.
    fn descend(
        &self,
        node: NodeId,
        variables: &[Variable],
        mut remaining: Vec<usize>,
        mode: Descent,
        seen: &mut HashSet<(NodeId, Vec<usize>)>,
    ) -> Option<NodeId> {
        if !seen.insert((node, remaining.clone())) {
            return None;
        }
        let current = self.hierarchy.node(node)?;
        let axis = current.collection().id();
        let before = remaining.len();
        remaining.retain(|i| variables[*i].collection() != Some(axis));
        if remaining.is_empty() {
            return Some(node);
        }
        if mode == Descent::Contiguous && remaining.len() == before {
            return None;
        }
        current
            .children()
            .iter()
            .find_map(|child| self.descend(*child, variables, remaining.clone(), mode, seen))
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Shallowest node at which all `variables` are matched along a single
    /// path from the root, passing through axes that match nothing. With no
    /// variables this is the root.
    pub fn top_most_node_with_all_variables(&self, variables: &[Variable]) -> Option<NodeId> {
        self.search(self.root(), variables, Descent::Bubble)
    }

    /// Variables of `collection` that define at least one resource which is
    /// also defined by all of `restrict_to`.
    ///
    /// Resources are pooled from the collection's node, its descendants and
    /// its ancestors. The result keeps the collection's order.
    pub fn available_variables(
        &self,
        collection: &CollectionId,
        restrict_to: &[Variable],
    ) -> Vec<Variable> {
        let Some(node_id) = self.node_by_collection(collection) else {
            return Vec::new();
        };
        let Some(node) = self.hierarchy.node(node_id) else {
            return Vec::new();
        };

        let mut found: HashSet<Variable> = HashSet::new();
        let reachable = iter::once(node_id)
            .chain(self.hierarchy.descendants(node_id))
            .chain(self.hierarchy.ancestors(node_id));
        for n in reachable.filter_map(|n| self.hierarchy.node(n)) {
            for resource in n.resources_by_variables(restrict_to) {
                if let Some(variable) = resource.variable_of(collection) {
                    found.insert(variable.clone());
                }
            }
        }

        node.collection()
            .variables()
            .filter(|v| found.contains(*v))
            .cloned()
            .collect()
    }

    /// Sorted, distinct timestamps of resources defined by all `variables`,
    /// stored at the node found by
    /// [`top_most_node_with_all_variables`](Self::top_most_node_with_all_variables).
    pub fn times_by_variables(&self, variables: &[Variable]) -> Vec<DateTime<Utc>> {
        match self.top_most_node_with_all_variables(variables) {
            Some(node) => self.collect_times([node], variables),
            None => Vec::new(),
        }
    }

    /// Sorted, distinct timestamps of resources defined by all `variables`,
    /// collected from the target node and everything below it.
    ///
    /// `variables` must contain exactly one variable of each configured time
    /// collection and nothing else; otherwise the result is empty. The
    /// target node is searched without passing through unmatched axes.
    pub fn times_by_variables_no_bubble(&self, variables: &[Variable]) -> Vec<DateTime<Utc>> {
        if !self.covers_time_collections(variables) {
            return Vec::new();
        }
        let Some(node) = self.search(self.root(), variables, Descent::Contiguous) else {
            return Vec::new();
        };
        let nodes: Vec<NodeId> = iter::once(node)
            .chain(self.hierarchy.descendants(node))
            .collect();
        self.collect_times(nodes, variables)
    }

    fn covers_time_collections(&self, variables: &[Variable]) -> bool {
        if variables.len() != self.time_collections.len() {
            return false;
        }
        let mut covered = HashSet::new();
        variables.iter().all(|v| {
            v.collection()
                .is_some_and(|c| self.time_collections.contains(c) && covered.insert(c))
        })
    }

    fn collect_times<I>(&self, nodes: I, variables: &[Variable]) -> Vec<DateTime<Utc>>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let mut times = BTreeSet::new();
        for node in nodes.into_iter().filter_map(|n| self.hierarchy.node(n)) {
            times.extend(
                node.resources_by_variables(variables)
                    .iter()
                    .filter_map(|r| r.datetime()),
            );
        }
        times.into_iter().collect()
    }

    /// Per node, the variables of its collection that currently define at
    /// least one indexed resource. Nodes without any are absent.
    pub fn available_variables_map(&self) -> &HashMap<NodeId, HashSet<Variable>> {
        &self.availability
    }

    /// Available variables of one node, in collection order.
    pub fn available_at(&self, node: NodeId) -> Vec<Variable> {
        let (Some(available), Some(node)) = (self.availability.get(&node), self.hierarchy.node(node))
        else {
            return Vec::new();
        };
        node.collection()
            .variables()
            .filter(|v| available.contains(*v))
            .cloned()
            .collect()
    }

    pub fn available_count(&self, node: NodeId) -> usize {
        self.availability.get(&node).map_or(0, HashSet::len)
    }

    /// Look up an indexed resource by key.
    pub fn get(&self, key: &ResourceKey) -> Option<&Arc<Resource<P>>> {
        let target = self.locate(key.variables()).ok()?;
        self.hierarchy.node(target)?.get(key)
    }

    pub fn contains(&self, key: &ResourceKey) -> bool {
        self.get(key).is_some()
    }

    /// Number of indexed resources.
    pub fn len(&self) -> usize {
        let root = self.root();
        iter::once(root)
            .chain(self.hierarchy.descendants(root))
            .filter_map(|n| self.hierarchy.node(n))
            .map(Node::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// root(a) -> b -> c
    fn chain() -> ResourceIndex<u32> {
        let mut h = Hierarchy::new(
            VariableCollection::new("a").with_variables([Variable::new("a1"), Variable::new("a2")]),
        );
        let b = h
            .add_node(VariableCollection::new("b").with_variables([Variable::new("b1")]))
            .unwrap();
        let c = h
            .add_node(VariableCollection::new("c").with_variables([Variable::new("c1"), Variable::new("c2")]))
            .unwrap();
        h.append_child(h.root(), b).unwrap();
        h.append_child(b, c).unwrap();
        ResourceIndex::new(h)
    }

    fn var(index: &ResourceIndex<u32>, collection: &str, id: &str) -> Variable {
        index
            .collection(&collection.into())
            .and_then(|c| c.get_by_id(&id.into()))
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_placement_targets_deepest_axis() {
        let index = chain();
        let (a1, b1, c1) = (var(&index, "a", "a1"), var(&index, "b", "b1"), var(&index, "c", "c1"));
        let c = index.node_by_collection_id("c").unwrap();
        let b = index.node_by_collection_id("b").unwrap();

        assert_eq!(index.placement(&[a1.clone(), b1.clone(), c1.clone()]), Ok(c));
        assert_eq!(index.placement(&[a1.clone(), b1.clone()]), Ok(b));
        assert_eq!(index.placement(&[b1.clone(), c1.clone()]), Ok(c));
        assert_eq!(index.placement(&[a1, c1]), Err(PlacementError::Unreachable));
    }

    #[test]
    fn test_placement_rejects_inconsistent_definitions() {
        let index = chain();
        let a1 = var(&index, "a", "a1");
        let a2 = var(&index, "a", "a2");

        assert_eq!(index.placement(&[]), Err(PlacementError::EmptyDefinition));
        assert_eq!(
            index.placement(&[Variable::new("x")]),
            Err(PlacementError::UnownedVariable("x".into()))
        );
        assert_eq!(
            index.placement(&[a1.clone(), a2]),
            Err(PlacementError::DuplicateAxis("a".into()))
        );

        let stray = VariableCollection::new("z").with_variables([Variable::new("z1")]);
        let z1 = stray.get_by_id(&"z1".into()).cloned().unwrap();
        assert_eq!(
            index.placement(&[a1, z1]),
            Err(PlacementError::UnknownCollection("z".into()))
        );

        let lookalike = VariableCollection::new("b").with_variables([Variable::new("b9")]);
        let b9 = lookalike.get_by_id(&"b9".into()).cloned().unwrap();
        assert_eq!(
            index.placement(&[b9]),
            Err(PlacementError::ForeignVariable {
                collection: "b".into(),
                id: "b9".into()
            })
        );
    }

    #[test]
    fn test_append_twice_notifies_once() {
        let mut index = chain();
        let events = Rc::new(RefCell::new(Vec::new()));
        {
            let events = events.clone();
            index.subscribe(move |e| events.borrow_mut().push(e.resources().len()));
        }
        let vars = vec![var(&index, "a", "a1"), var(&index, "b", "b1")];

        let first = index.append([Resource::new(vars.clone(), 1)]);
        let second = index.append([Resource::new(vars.clone(), 2)]);

        assert_eq!(first.applied_count(), 1);
        assert_eq!(second.applied_count(), 0);
        assert_eq!(*events.borrow(), vec![1]);
        assert_eq!(index.len(), 1);
        let key = Resource::new(vars, 0).key().clone();
        assert_eq!(*index.get(&key).unwrap().payload(), 2);
    }

    #[test]
    fn test_rejected_resources_do_not_abort_batch() {
        let mut index = chain();
        let good = Resource::new(vec![var(&index, "a", "a1")], 1);
        let bad = Resource::new(vec![var(&index, "a", "a1"), var(&index, "c", "c1")], 2);

        let report = index.append([bad, good]);
        assert_eq!(report.applied_count(), 1);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].1, PlacementError::Unreachable);
    }

    #[test]
    fn test_bubble_versus_contiguous_search() {
        let index = chain().with_time_collections(["b"]);
        let a1 = var(&index, "a", "a1");
        let c1 = var(&index, "c", "c1");
        let c = index.node_by_collection_id("c").unwrap();

        assert_eq!(index.top_most_node_with_all_variables(&[a1.clone(), c1.clone()]), Some(c));
        assert_eq!(
            index.search(index.root(), &[a1.clone(), c1.clone()], Descent::Contiguous),
            None
        );
        assert!(index.times_by_variables_no_bubble(&[a1, c1]).is_empty());
        assert_eq!(index.top_most_node_with_all_variables(&[]), Some(index.root()));
    }

    /// top -> {l0, r0} -> j0 -> {l1, r1} -> j1 -> ... -> j{depth - 1}
    fn stacked_diamonds(depth: usize) -> ResourceIndex<u32> {
        let single = |id: String| {
            VariableCollection::new(id.as_str()).with_variables([Variable::new(id.clone())])
        };
        let mut h = Hierarchy::new(single("top".to_string()));
        let mut join = h.root();
        for level in 0..depth {
            let left = h.add_node(single(format!("l{level}"))).unwrap();
            let right = h.add_node(single(format!("r{level}"))).unwrap();
            let next = h.add_node(single(format!("j{level}"))).unwrap();
            h.append_child(join, left).unwrap();
            h.append_child(join, right).unwrap();
            h.append_child(left, next).unwrap();
            h.append_child(right, next).unwrap();
            join = next;
        }
        ResourceIndex::new(h)
    }

    #[test]
    fn test_search_expands_shared_nodes_once() {
        let depth = 40;
        let index = stacked_diamonds(depth);
        let last = format!("j{}", depth - 1);
        let bottom = var(&index, &last, &last);
        let top = var(&index, "top", "top");

        let stray = VariableCollection::new("z").with_variables([Variable::new("z1")]);
        let z1 = stray.get_by_id(&"z1".into()).cloned().unwrap();
        assert_eq!(index.top_most_node_with_all_variables(&[z1.clone()]), None);
        assert_eq!(
            index.top_most_node_with_all_variables(&[top.clone(), bottom.clone(), z1]),
            None
        );
        assert_eq!(
            index.top_most_node_with_all_variables(&[top, bottom]),
            index.node_by_collection_id(&last)
        );
    }

    #[test]
    fn test_resources_stay_removable_after_variable_removed() {
        let mut index = chain();
        let a1 = var(&index, "a", "a1");
        let key = Resource::new(vec![a1.clone()], 0).key().clone();
        index.append([Resource::new(vec![a1.clone()], 7)]);

        index
            .collection_mut(&"a".into())
            .unwrap()
            .remove_by_id(&"a1".into());
        assert!(matches!(
            index.placement(&[a1.clone()]),
            Err(PlacementError::ForeignVariable { .. })
        ));
        assert_eq!(index.append([Resource::new(vec![a1], 8)]).rejected_count(), 1);
        assert_eq!(*index.get(&key).unwrap().payload(), 7);

        let report = index.remove([key]);
        assert_eq!(report.applied_count(), 1);
        assert!(report.rejected.is_empty());
        assert!(index.is_empty());
        assert!(index.available_variables_map().is_empty());
    }

    #[test]
    fn test_remove_unknown_is_quiet() {
        let mut index = chain();
        let key = Resource::new(vec![var(&index, "a", "a2")], 0).key().clone();
        let calls = Rc::new(RefCell::new(0));
        {
            let calls = calls.clone();
            index.subscribe(move |_| *calls.borrow_mut() += 1);
        }
        let report = index.remove([key]);
        assert_eq!(report.applied_count(), 0);
        assert!(report.rejected.is_empty());
        assert_eq!(*calls.borrow(), 0);
    }
}
