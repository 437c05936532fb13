//! Variable collections: the set of values along one attribute axis.

use indexmap::IndexMap;

use crate::labels::Labels;
use crate::variable::{CollectionId, Variable, VariableId};

/// Ordered, id-unique set of variables, e.g. all models or all levels.
///
/// A collection does not know which node holds it; that association belongs
/// to the [`Hierarchy`](crate::Hierarchy).
#[derive(Debug, Clone)]
pub struct VariableCollection {
    id: CollectionId,
    labels: Labels,
    variables: IndexMap<VariableId, Variable>,
}

impl VariableCollection {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: CollectionId::new(id),
            labels: Labels::default(),
            variables: IndexMap::new(),
        }
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Builder-style [`append`](Self::append).
    pub fn with_variables<I>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = Variable>,
    {
        self.append(variables);
        self
    }

    pub fn id(&self) -> &CollectionId {
        &self.id
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Add variables, taking ownership of them.
    ///
    /// A variable whose id is already present replaces the existing entry in
    /// place, so display order is kept.
    pub fn append<I>(&mut self, variables: I)
    where
        I: IntoIterator<Item = Variable>,
    {
        for mut variable in variables {
            variable.set_collection(self.id.clone());
            self.variables.insert(variable.id().clone(), variable);
        }
    }

    /// Remove a variable by id, returning it if it was present.
    pub fn remove_by_id(&mut self, id: &VariableId) -> Option<Variable> {
        self.variables.shift_remove(id)
    }

    /// True if `variable` is owned by this collection and still present.
    pub fn contains(&self, variable: &Variable) -> bool {
        variable.collection() == Some(&self.id) && self.variables.contains_key(variable.id())
    }

    pub fn get_by_id(&self, id: &VariableId) -> Option<&Variable> {
        self.variables.get(id)
    }

    /// Variables in display order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn models() -> VariableCollection {
        VariableCollection::new("models")
            .with_variables([Variable::new("ECMWF"), Variable::new("GFS")])
    }

    #[test]
    fn test_append_stamps_owner() {
        let models = models();
        let ec = models.get_by_id(&"ECMWF".into()).unwrap();
        assert_eq!(ec.collection(), Some(&CollectionId::new("models")));
        assert!(models.contains(ec));
    }

    #[test]
    fn test_append_replaces_by_id() {
        let mut models = models();
        models.append([Variable::new("ECMWF").with_label("en", "IFS")]);

        assert_eq!(models.len(), 2);
        let ids: Vec<String> = models.variables().map(|v| v.id().to_string()).collect();
        assert_eq!(ids, vec!["ECMWF", "GFS"]);
        assert_eq!(models.get_by_id(&"ECMWF".into()).unwrap().name(), "IFS");
    }

    #[test]
    fn test_contains_requires_ownership() {
        let models = models();
        assert!(!models.contains(&Variable::new("GFS")));

        let other = VariableCollection::new("runs").with_variables([Variable::new("GFS")]);
        let foreign = other.get_by_id(&"GFS".into()).unwrap();
        assert!(!models.contains(foreign));
    }

    #[test]
    fn test_missing_lookup() {
        let mut models = models();
        assert!(models.get_by_id(&"ICON".into()).is_none());
        assert!(models.remove_by_id(&"GFS".into()).is_some());
        assert!(models.remove_by_id(&"GFS".into()).is_none());
        assert_eq!(models.len(), 1);
    }
}
