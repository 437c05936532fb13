//! JSON answers of the inspector subcommands.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use resource_index::{CollectionId, ResourceIndex, Variable, VariableId};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::layout::Layout;

/// `COLLECTION=ID` as typed on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub collection: String,
    pub value: String,
}

impl FromStr for Selector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((collection, value)) if !collection.is_empty() && !value.is_empty() => Ok(Self {
                collection: collection.to_string(),
                value: value.to_string(),
            }),
            _ => Err(format!("expected COLLECTION=ID, got '{}'", s)),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.collection, self.value)
    }
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub resources: usize,
    pub time_collecting: Vec<String>,
    pub collections: Vec<CollectionSummary>,
}

#[derive(Debug, Serialize)]
pub struct CollectionSummary {
    pub id: String,
    pub name: String,
    pub node: Option<usize>,
    pub variables: usize,
    /// Resources stored at this collection's node.
    pub stored: usize,
    pub available: Vec<VariableOut>,
}

#[derive(Debug, Serialize)]
pub struct VariableOut {
    pub id: VariableId,
    pub name: String,
}

impl From<&Variable> for VariableOut {
    fn from(variable: &Variable) -> Self {
        Self {
            id: variable.id().clone(),
            name: variable.name(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NodeOut {
    pub node: usize,
    pub collection: String,
}

pub fn summary<P>(index: &ResourceIndex<P>) -> Summary {
    let collections = index
        .variable_collections()
        .into_iter()
        .map(|collection| {
            let node = index.node_by_collection(collection.id());
            CollectionSummary {
                id: collection.id().to_string(),
                name: collection.labels().name().to_string(),
                node: node.map(|n| n.index()),
                variables: collection.len(),
                stored: node.and_then(|n| index.node(n)).map_or(0, |n| n.len()),
                available: node
                    .map(|n| index.available_at(n))
                    .unwrap_or_default()
                    .iter()
                    .map(VariableOut::from)
                    .collect(),
            }
        })
        .collect();
    Summary {
        resources: index.len(),
        time_collecting: index.time_collections().iter().map(|c| c.to_string()).collect(),
        collections,
    }
}

/// Resolve command-line selectors to variables of the index.
pub fn resolve_selectors<P>(
    index: &ResourceIndex<P>,
    layout: &Layout,
    selectors: &[Selector],
) -> Result<Vec<Variable>> {
    selectors
        .iter()
        .map(|s| {
            layout
                .resolve(index, &CollectionId::new(s.collection.as_str()), &s.value)
                .with_context(|| format!("Unknown variable {}", s))
        })
        .collect()
}

pub fn available<P>(
    index: &ResourceIndex<P>,
    layout: &Layout,
    collection: &str,
    selectors: &[Selector],
) -> Result<Vec<VariableOut>> {
    let id = CollectionId::new(collection);
    anyhow::ensure!(
        index.collection(&id).is_some(),
        "Unknown collection: {}",
        collection
    );
    let restrict_to = resolve_selectors(index, layout, selectors)?;
    Ok(index
        .available_variables(&id, &restrict_to)
        .iter()
        .map(VariableOut::from)
        .collect())
}

pub fn times<P>(
    index: &ResourceIndex<P>,
    layout: &Layout,
    selectors: &[Selector],
    no_bubble: bool,
) -> Result<Vec<DateTime<Utc>>> {
    let variables = resolve_selectors(index, layout, selectors)?;
    Ok(if no_bubble {
        index.times_by_variables_no_bubble(&variables)
    } else {
        index.times_by_variables(&variables)
    })
}

pub fn node<P>(
    index: &ResourceIndex<P>,
    layout: &Layout,
    selectors: &[Selector],
) -> Result<Option<NodeOut>> {
    let variables = resolve_selectors(index, layout, selectors)?;
    Ok(index
        .top_most_node_with_all_variables(&variables)
        .and_then(|id| index.node(id))
        .map(|n| NodeOut {
            node: n.id().index(),
            collection: n.collection().id().to_string(),
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{parse_layout, tests::LAYOUT};
    use crate::scan::scan_directory;
    use std::path::PathBuf;
    use test_utils::image_tree;

    fn indexed() -> (Layout, ResourceIndex<PathBuf>) {
        let dir = image_tree(&[
            "ECMWF/2019110300/wind_000.png",
            "ECMWF/2019110300/wind_003.png",
            "GFS/2019110312/wind_gusts_024.png",
        ]);
        let (layout, mut index) = Layout::build(&parse_layout(LAYOUT).unwrap()).unwrap();
        let report = scan_directory(dir.path(), &layout, &index).unwrap();
        index.append(report.resources);
        (layout, index)
    }

    fn sel(s: &str) -> Selector {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_selector() {
        assert_eq!(
            sel("models=GFS"),
            Selector {
                collection: "models".to_string(),
                value: "GFS".to_string()
            }
        );
        assert!("models".parse::<Selector>().is_err());
        assert!("=GFS".parse::<Selector>().is_err());
    }

    #[test]
    fn test_summary() {
        let (_, index) = indexed();
        let report = summary(&index);
        assert_eq!(report.resources, 3);
        assert_eq!(report.collections.len(), 4);

        let models = &report.collections[0];
        assert_eq!(models.name, "Models");
        assert_eq!(models.node, Some(0));
        assert_eq!(models.available.len(), 2);
        assert_eq!(models.available[0].name, "ECMWF IFS");

        let offsets = &report.collections[3];
        assert_eq!(offsets.stored, 3);
        assert_eq!(offsets.available.len(), 3);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["collections"][3]["available"][0]["id"], 0);
    }

    #[test]
    fn test_queries() {
        let (layout, index) = indexed();

        let fields = available(&index, &layout, "fields", &[sel("models=GFS")]).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].id, VariableId::Name("wind_gusts".to_string()));
        assert!(available(&index, &layout, "levels", &[]).is_err());
        assert!(available(&index, &layout, "fields", &[sel("models=ICON")]).is_err());

        let series = times(
            &index,
            &layout,
            &[sel("models=ECMWF"), sel("runs=2019110300"), sel("fields=wind")],
            true,
        )
        .unwrap();
        assert_eq!(series.len(), 2);

        let top = node(&index, &layout, &[sel("fields=wind")]).unwrap().unwrap();
        assert_eq!(top.collection, "fields");
        assert!(node(&index, &layout, &[]).unwrap().is_some());
    }
}
