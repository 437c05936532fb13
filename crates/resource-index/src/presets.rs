//! Ready-made hierarchy for numerical weather prediction output.
//!
//! ```text
//! models -> runs -> regions -> fields -> levels --------> offsets
//!                                     \-> accumulations -/
//! ```

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::collection::VariableCollection;
use crate::error::IndexResult;
use crate::hierarchy::Hierarchy;
use crate::index::ResourceIndex;
use crate::node::NodeId;
use crate::variable::{CollectionId, Variable, VariableId};

/// Axes of the NWP hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NwpAxis {
    Models,
    Runs,
    Regions,
    Fields,
    Levels,
    Accumulations,
    Offsets,
}

impl NwpAxis {
    pub fn all() -> &'static [NwpAxis] {
        &[
            NwpAxis::Models,
            NwpAxis::Runs,
            NwpAxis::Regions,
            NwpAxis::Fields,
            NwpAxis::Levels,
            NwpAxis::Accumulations,
            NwpAxis::Offsets,
        ]
    }

    pub fn collection_id(&self) -> &'static str {
        match self {
            NwpAxis::Models => "models",
            NwpAxis::Runs => "runs",
            NwpAxis::Regions => "regions",
            NwpAxis::Fields => "fields",
            NwpAxis::Levels => "levels",
            NwpAxis::Accumulations => "accumulations",
            NwpAxis::Offsets => "offsets",
        }
    }
}

impl fmt::Display for NwpAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.collection_id())
    }
}

impl From<NwpAxis> for CollectionId {
    fn from(axis: NwpAxis) -> Self {
        CollectionId::new(axis.collection_id())
    }
}

/// Build the empty NWP hierarchy.
pub fn nwp_hierarchy<P>() -> IndexResult<Hierarchy<P>> {
    let mut h = Hierarchy::new(VariableCollection::new(NwpAxis::Models.collection_id()));
    let runs = h.add_node(VariableCollection::new(NwpAxis::Runs.collection_id()))?;
    let regions = h.add_node(VariableCollection::new(NwpAxis::Regions.collection_id()))?;
    let fields = h.add_node(VariableCollection::new(NwpAxis::Fields.collection_id()))?;
    let levels = h.add_node(VariableCollection::new(NwpAxis::Levels.collection_id()))?;
    let accumulations =
        h.add_node(VariableCollection::new(NwpAxis::Accumulations.collection_id()))?;
    let offsets = h.add_node(VariableCollection::new(NwpAxis::Offsets.collection_id()))?;
    h.append_child(h.root(), runs)?;
    h.append_child(runs, regions)?;
    h.append_child(regions, fields)?;
    h.append_children(fields, [levels, accumulations])?;
    h.append_child(levels, offsets)?;
    h.append_child(accumulations, offsets)?;
    Ok(h)
}

/// A [`ResourceIndex`] over the NWP hierarchy with per-axis helpers.
#[derive(Debug)]
pub struct NwpResources<P> {
    index: ResourceIndex<P>,
}

impl<P> NwpResources<P> {
    pub fn new() -> IndexResult<Self> {
        Ok(Self {
            index: ResourceIndex::new(nwp_hierarchy()?),
        })
    }

    /// Configure the axes used by
    /// [`times_by_variables_no_bubble`](ResourceIndex::times_by_variables_no_bubble).
    pub fn with_time_axes(self, axes: &[NwpAxis]) -> Self {
        Self {
            index: self.index.with_time_collections(axes.iter().copied()),
        }
    }

    /// Register a variable on an axis.
    pub fn add_variable(&mut self, axis: NwpAxis, variable: Variable) -> &mut Self {
        if let Some(collection) = self.index.collection_mut(&axis.into()) {
            collection.append([variable]);
        }
        self
    }

    pub fn axis(&self, axis: NwpAxis) -> Option<&VariableCollection> {
        self.index.collection(&axis.into())
    }

    pub fn axis_node(&self, axis: NwpAxis) -> Option<NodeId> {
        self.index.node_by_collection(&axis.into())
    }

    /// The registered variable of `axis` with `id`.
    pub fn variable(&self, axis: NwpAxis, id: impl Into<VariableId>) -> Option<Variable> {
        self.axis(axis)?.get_by_id(&id.into()).cloned()
    }

    pub fn into_inner(self) -> ResourceIndex<P> {
        self.index
    }
}

impl<P> Deref for NwpResources<P> {
    type Target = ResourceIndex<P>;

    fn deref(&self) -> &Self::Target {
        &self.index
    }
}

impl<P> DerefMut for NwpResources<P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nwp_layout() {
        let nwp: NwpResources<()> = NwpResources::new().unwrap();
        let ids: Vec<&str> = nwp
            .variable_collections()
            .iter()
            .map(|c| c.id().as_str())
            .collect();
        assert_eq!(
            ids,
            vec!["models", "runs", "regions", "fields", "levels", "offsets", "accumulations"]
        );

        let offsets = nwp.axis_node(NwpAxis::Offsets).unwrap();
        assert_eq!(nwp.node(offsets).unwrap().parents().len(), 2);
        assert_eq!(nwp.axis_node(NwpAxis::Models), Some(nwp.root()));
    }

    #[test]
    fn test_add_variable() {
        let mut nwp: NwpResources<()> = NwpResources::new().unwrap();
        nwp.add_variable(NwpAxis::Models, Variable::new("ICON").with_label("de", "ICON-EU"))
            .add_variable(NwpAxis::Levels, Variable::new("850hPa"));

        let icon = nwp.variable(NwpAxis::Models, "ICON").unwrap();
        assert_eq!(icon.name(), "ICON-EU");
        assert!(nwp.variable(NwpAxis::Levels, "500hPa").is_none());
        assert_eq!(nwp.axis(NwpAxis::Levels).unwrap().len(), 1);
    }
}
