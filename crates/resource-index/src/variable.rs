//! Attribute values (variables) and the identifiers of their axes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::labels::Labels;

/// Unique identifier for a variable collection (one hierarchy axis).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CollectionId(pub String);

impl CollectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CollectionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Identity of a variable inside its collection.
///
/// Model names and fields are usually text, forecast offsets integers, and
/// model runs are identified by their initialisation time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableId {
    Index(i64),
    Time(DateTime<Utc>),
    Name(String),
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableId::Index(i) => write!(f, "{}", i),
            VariableId::Time(t) => write!(f, "{}", t.to_rfc3339()),
            VariableId::Name(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for VariableId {
    fn from(s: &str) -> Self {
        VariableId::Name(s.to_string())
    }
}

impl From<String> for VariableId {
    fn from(s: String) -> Self {
        VariableId::Name(s)
    }
}

impl From<i64> for VariableId {
    fn from(i: i64) -> Self {
        VariableId::Index(i)
    }
}

impl From<i32> for VariableId {
    fn from(i: i32) -> Self {
        VariableId::Index(i as i64)
    }
}

impl From<DateTime<Utc>> for VariableId {
    fn from(t: DateTime<Utc>) -> Self {
        VariableId::Time(t)
    }
}

/// A single attribute value, e.g. the model "GFS" or the level "500hPa".
///
/// Identity is the pair (owning collection, id); labels do not take part in
/// comparisons. A variable gets its owner when appended to a
/// [`VariableCollection`](crate::VariableCollection); until then it matches
/// no node of the hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    id: VariableId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    collection: Option<CollectionId>,
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    labels: Labels,
}

impl Variable {
    /// Create an unowned variable.
    pub fn new(id: impl Into<VariableId>) -> Self {
        Self {
            id: id.into(),
            collection: None,
            labels: Labels::default(),
        }
    }

    /// Variable identified by a point in time, typically a model run.
    pub fn time(datetime: DateTime<Utc>) -> Self {
        Self::new(VariableId::Time(datetime))
    }

    pub fn with_label(mut self, lang: impl Into<String>, name: impl Into<String>) -> Self {
        self.labels.insert(lang, name);
        self
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn id(&self) -> &VariableId {
        &self.id
    }

    /// Owning collection, if the variable was appended to one.
    pub fn collection(&self) -> Option<&CollectionId> {
        self.collection.as_ref()
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Labels are the only mutable part of a variable.
    pub fn labels_mut(&mut self) -> &mut Labels {
        &mut self.labels
    }

    /// Display name, falling back to the id when no label is set.
    pub fn name(&self) -> String {
        match self.labels.name() {
            "" => self.id.to_string(),
            name => name.to_string(),
        }
    }

    /// The timestamp of time-identified variables.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        match self.id {
            VariableId::Time(t) => Some(t),
            _ => None,
        }
    }

    pub(crate) fn set_collection(&mut self, collection: CollectionId) {
        self.collection = Some(collection);
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.collection == other.collection && self.id == other.id
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.collection.hash(state);
        self.id.hash(state);
    }
}

impl PartialOrd for Variable {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Variable {
    fn cmp(&self, other: &Self) -> Ordering {
        self.collection
            .cmp(&other.collection)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.collection {
            Some(c) => write!(f, "{}:{}", c, self.id),
            None => write!(f, "?:{}", self.id),
        }
    }
}
