//! Indexed resources and their identity.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::variable::{CollectionId, Variable};

/// Identity of a resource: its sorted, deduplicated defining variables and
/// its optional timestamp.
///
/// Two resources with the same key are the same entry of the index; appending
/// the second one replaces the payload of the first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceKey {
    variables: Vec<Variable>,
    datetime: Option<DateTime<Utc>>,
}

impl ResourceKey {
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        self.datetime
    }

    fn contains(&self, variable: &Variable) -> bool {
        self.variables.binary_search(variable).is_ok()
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.variables.iter().map(|v| v.to_string()).collect();
        write!(f, "[{}]", parts.join(", "))?;
        if let Some(dt) = self.datetime {
            write!(f, "@{}", dt.to_rfc3339())?;
        }
        Ok(())
    }
}

/// An opaque payload tagged with the variables that define it.
#[derive(Debug, Clone)]
pub struct Resource<P> {
    variables: Vec<Variable>,
    payload: P,
    key: ResourceKey,
}

impl<P> Resource<P> {
    pub fn new(variables: Vec<Variable>, payload: P) -> Self {
        let mut key = variables.clone();
        key.sort();
        key.dedup();
        Self {
            variables,
            payload,
            key: ResourceKey {
                variables: key,
                datetime: None,
            },
        }
    }

    pub fn with_datetime(mut self, datetime: DateTime<Utc>) -> Self {
        self.key.datetime = Some(datetime);
        self
    }

    /// Defining variables in the order they were given.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        self.key.datetime
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    /// True if every passed variable is one of the defining variables.
    pub fn is_defined_by<'a, I>(&self, variables: I) -> bool
    where
        I: IntoIterator<Item = &'a Variable>,
    {
        variables.into_iter().all(|v| self.key.contains(v))
    }

    /// True if one of the defining variables belongs to `collection`.
    pub fn is_defined_by_variable_of(&self, collection: &CollectionId) -> bool {
        self.variable_of(collection).is_some()
    }

    /// The defining variable of `collection`, if any.
    pub fn variable_of(&self, collection: &CollectionId) -> Option<&Variable> {
        self.variables
            .iter()
            .find(|v| v.collection() == Some(collection))
    }
}
