//! A single vertex of the collection hierarchy.

use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::collection::VariableCollection;
use crate::resource::{Resource, ResourceKey};
use crate::variable::Variable;

/// Index of a node inside its [`Hierarchy`](crate::Hierarchy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hierarchy vertex owning one collection.
///
/// Stores the resources whose deepest defining collection is this node's
/// collection, plus a per-variable index over every defining variable of
/// those resources. Parent and child links are node ids, so a node can be
/// shared by several parents.
#[derive(Debug)]
pub struct Node<P> {
    id: NodeId,
    collection: VariableCollection,
    pub(crate) parents: Vec<NodeId>,
    pub(crate) children: Vec<NodeId>,
    resources: IndexMap<ResourceKey, Arc<Resource<P>>>,
    by_variable: HashMap<Variable, HashSet<ResourceKey>>,
}

impl<P> Node<P> {
    pub(crate) fn new(id: NodeId, collection: VariableCollection) -> Self {
        Self {
            id,
            collection,
            parents: Vec::new(),
            children: Vec::new(),
            resources: IndexMap::new(),
            by_variable: HashMap::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn collection(&self) -> &VariableCollection {
        &self.collection
    }

    pub(crate) fn collection_mut(&mut self) -> &mut VariableCollection {
        &mut self.collection
    }

    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Resources stored at this node.
    pub fn resources(&self) -> impl Iterator<Item = &Arc<Resource<P>>> {
        self.resources.values()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn get(&self, key: &ResourceKey) -> Option<&Arc<Resource<P>>> {
        self.resources.get(key)
    }

    /// Store a resource. Returns 1 if it was new, 0 if a resource with the
    /// same key was already present (its payload is replaced).
    pub fn append(&mut self, resource: Arc<Resource<P>>) -> usize {
        let key = resource.key().clone();
        if let Some(existing) = self.resources.get_mut(&key) {
            *existing = resource;
            return 0;
        }
        for variable in key.variables() {
            self.by_variable
                .entry(variable.clone())
                .or_default()
                .insert(key.clone());
        }
        self.resources.insert(key, resource);
        1
    }

    /// Drop the resource with `key`, returning it if it was stored here.
    pub fn remove(&mut self, key: &ResourceKey) -> Option<Arc<Resource<P>>> {
        let removed = self.resources.swap_remove(key)?;
        for variable in key.variables() {
            if let Some(bucket) = self.by_variable.get_mut(variable) {
                bucket.remove(key);
                if bucket.is_empty() {
                    self.by_variable.remove(variable);
                }
            }
        }
        Some(removed)
    }

    /// Resources defined by all passed variables; all resources when none
    /// are passed.
    pub fn resources_by_variables(&self, variables: &[Variable]) -> Vec<Arc<Resource<P>>> {
        if variables.is_empty() {
            return self.resources.values().cloned().collect();
        }
        let mut buckets = Vec::with_capacity(variables.len());
        for variable in variables {
            match self.by_variable.get(variable) {
                Some(bucket) => buckets.push(bucket),
                None => return Vec::new(),
            }
        }
        buckets.sort_by_key(|b| b.len());
        let Some((smallest, rest)) = buckets.split_first() else {
            return Vec::new();
        };
        smallest
            .iter()
            .filter(|key| rest.iter().all(|b| b.contains(*key)))
            .filter_map(|key| self.resources.get(key).cloned())
            .collect()
    }

    /// True if at least one stored resource is defined by `variable`.
    pub fn has_resources_with(&self, variable: &Variable) -> bool {
        self.by_variable.contains_key(variable)
    }
}
