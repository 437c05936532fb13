//! Layout configuration for the inspector.
//!
//! A layout file describes the collections of the hierarchy, their variables,
//! the edges between them and how image file names map onto variables.
//!
//! Supports environment variable substitution using ${VAR} syntax.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use resource_index::{
    CollectionId, Hierarchy, Labels, ResourceIndex, Variable, VariableCollection, VariableId,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::pattern::FilePattern;

// ============================================================================
// Layout file (layout.yaml)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Id of the root collection.
    pub root: String,
    pub collections: Vec<CollectionConfig>,
    #[serde(default)]
    pub edges: Vec<EdgeConfig>,
    /// Collections that select one time series; see `times --no-bubble`.
    #[serde(default)]
    pub time_collecting: Vec<String>,
    /// File name template relative to the data directory, e.g.
    /// `{models}/{runs}/{fields}_{offsets}.png`.
    pub file_pattern: String,
    #[serde(default)]
    pub valid_time: Option<ValidTimeConfig>,
    /// Language fallback order for all labels.
    #[serde(default)]
    pub lang_priority: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    pub id: String,
    #[serde(default)]
    pub names: IndexMap<String, String>,
    /// chrono format of time ids in file names. RFC 3339 when absent.
    #[serde(default)]
    pub time_format: Option<String>,
    #[serde(default)]
    pub variables: Vec<VariableConfig>,
    /// Integer ids appended after `variables`.
    #[serde(default)]
    pub range: Option<RangeConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableConfig {
    pub id: VariableId,
    #[serde(default)]
    pub names: IndexMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeConfig {
    pub start: i64,
    pub end: i64,
    #[serde(default = "default_step")]
    pub step: i64,
}

fn default_step() -> i64 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeConfig {
    pub parent: String,
    pub children: Vec<String>,
}

/// Valid time of a file: the run's time plus the offset in hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidTimeConfig {
    pub run: String,
    #[serde(default)]
    pub offset: Option<String>,
}

impl CollectionConfig {
    fn to_collection(&self, lang_priority: &[String]) -> VariableCollection {
        let mut variables: Vec<Variable> = self
            .variables
            .iter()
            .map(|v| Variable::new(v.id.clone()).with_labels(labels(&v.names, lang_priority)))
            .collect();
        if let Some(range) = &self.range {
            variables.extend(
                (range.start..=range.end)
                    .step_by(range.step as usize)
                    .map(Variable::new),
            );
        }
        VariableCollection::new(self.id.as_str())
            .with_labels(labels(&self.names, lang_priority))
            .with_variables(variables)
    }
}

fn labels(names: &IndexMap<String, String>, lang_priority: &[String]) -> Labels {
    let mut labels = Labels::new().with_priority(lang_priority.iter().cloned());
    for (lang, name) in names {
        labels.insert(lang.as_str(), name.as_str());
    }
    labels
}

// ============================================================================
// Loading
// ============================================================================

/// Load and validate a layout YAML file.
pub fn load_layout<P: AsRef<Path>>(path: P) -> Result<LayoutConfig> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read layout from {:?}", path.as_ref()))?;
    parse_layout(&content).with_context(|| format!("Invalid layout in {:?}", path.as_ref()))
}

/// Parse and validate layout YAML.
pub fn parse_layout(content: &str) -> Result<LayoutConfig> {
    let expanded = expand_env_vars(content)?;
    let config: LayoutConfig =
        serde_yaml::from_str(&expanded).context("Failed to parse layout YAML")?;
    validate_layout(&config)?;
    Ok(config)
}

/// Expand environment variables in a string.
/// Supports ${VAR} and ${VAR:-default} syntax
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::new();
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();

            let mut var_expr = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(c) => var_expr.push(c),
                    None => anyhow::bail!("Unclosed variable substitution: ${{{}", var_expr),
                }
            }
            result.push_str(&resolve_var_expr(&var_expr)?);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match std::env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim()).with_context(|| format!("Environment variable {} not set", expr))
    }
}

fn validate_layout(config: &LayoutConfig) -> Result<()> {
    anyhow::ensure!(!config.collections.is_empty(), "Layout has no collections");

    let mut ids = HashSet::new();
    for collection in &config.collections {
        anyhow::ensure!(!collection.id.is_empty(), "Collection id cannot be empty");
        anyhow::ensure!(
            ids.insert(collection.id.as_str()),
            "Duplicate collection: {}",
            collection.id
        );
        if let Some(range) = &collection.range {
            anyhow::ensure!(
                range.step > 0,
                "Range step of collection {} must be greater than 0",
                collection.id
            );
        }
    }

    let known = |id: &str, what: &str| -> Result<()> {
        anyhow::ensure!(ids.contains(id), "Unknown collection in {}: {}", what, id);
        Ok(())
    };
    known(&config.root, "root")?;
    for edge in &config.edges {
        known(&edge.parent, "edges")?;
        for child in &edge.children {
            known(child, "edges")?;
        }
    }
    for id in &config.time_collecting {
        known(id, "time_collecting")?;
    }
    if let Some(valid_time) = &config.valid_time {
        known(&valid_time.run, "valid_time")?;
        if let Some(offset) = &valid_time.offset {
            known(offset, "valid_time")?;
        }
    }
    for placeholder in FilePattern::parse(&config.file_pattern)?.placeholders() {
        known(placeholder.as_str(), "file_pattern")?;
    }

    Ok(())
}

// ============================================================================
// Runtime layout
// ============================================================================

/// Compiled layout: file name template plus the rules to turn captured
/// strings into variables.
#[derive(Debug, Clone)]
pub struct Layout {
    pattern: FilePattern,
    time_formats: HashMap<CollectionId, String>,
    valid_time: Option<(CollectionId, Option<CollectionId>)>,
}

impl Layout {
    /// Compile the layout and build the empty index it describes.
    pub fn build(config: &LayoutConfig) -> Result<(Layout, ResourceIndex<PathBuf>)> {
        let pattern = FilePattern::parse(&config.file_pattern)?;

        let mut collections: IndexMap<&str, VariableCollection> = config
            .collections
            .iter()
            .map(|c| (c.id.as_str(), c.to_collection(&config.lang_priority)))
            .collect();
        let root = collections
            .shift_remove(config.root.as_str())
            .with_context(|| format!("Unknown root collection: {}", config.root))?;

        let mut hierarchy = Hierarchy::new(root);
        let mut nodes = HashMap::new();
        nodes.insert(config.root.as_str(), hierarchy.root());
        for (id, collection) in collections {
            nodes.insert(id, hierarchy.add_node(collection)?);
        }
        for edge in &config.edges {
            let parent = nodes
                .get(edge.parent.as_str())
                .copied()
                .with_context(|| format!("Unknown collection: {}", edge.parent))?;
            for child in &edge.children {
                let child_node = nodes
                    .get(child.as_str())
                    .copied()
                    .with_context(|| format!("Unknown collection: {}", child))?;
                hierarchy
                    .append_child(parent, child_node)
                    .with_context(|| format!("Invalid edge {} -> {}", edge.parent, child))?;
            }
        }
        for id in nodes.keys() {
            if hierarchy.node_by_collection(&CollectionId::new(*id)).is_none() {
                warn!(collection = %id, "Collection is not reachable from the root");
            }
        }

        let index = ResourceIndex::new(hierarchy)
            .with_time_collections(config.time_collecting.iter().map(String::as_str));
        let layout = Layout {
            pattern,
            time_formats: config
                .collections
                .iter()
                .filter_map(|c| {
                    c.time_format
                        .as_ref()
                        .map(|f| (CollectionId::new(c.id.as_str()), f.clone()))
                })
                .collect(),
            valid_time: config.valid_time.as_ref().map(|v| {
                (
                    CollectionId::new(v.run.as_str()),
                    v.offset.as_deref().map(CollectionId::new),
                )
            }),
        };
        debug!(
            collections = config.collections.len(),
            pattern = %config.file_pattern,
            "Built layout"
        );
        Ok((layout, index))
    }

    pub fn pattern(&self) -> &FilePattern {
        &self.pattern
    }

    /// Variable of `collection` whose id renders as `value`.
    pub fn resolve<P>(
        &self,
        index: &ResourceIndex<P>,
        collection: &CollectionId,
        value: &str,
    ) -> Option<Variable> {
        index
            .collection(collection)?
            .variables()
            .find(|v| self.matches(collection, v, value))
            .cloned()
    }

    fn matches(&self, collection: &CollectionId, variable: &Variable, value: &str) -> bool {
        match variable.id() {
            VariableId::Name(name) => name == value,
            VariableId::Index(i) => value.parse::<i64>().is_ok_and(|v| v == *i),
            VariableId::Time(t) => match self.time_formats.get(collection) {
                Some(format) => t.format(format).to_string() == value,
                None => DateTime::parse_from_rfc3339(value).is_ok_and(|v| v == *t),
            },
        }
    }

    /// Valid time of a resource defined by `variables`, if the layout
    /// configures one and the run variable is present.
    pub fn valid_time(&self, variables: &[Variable]) -> Option<DateTime<Utc>> {
        let (run_collection, offset_collection) = self.valid_time.as_ref()?;
        let of = |c: &CollectionId| variables.iter().find(|v| v.collection() == Some(c));
        let run = of(run_collection)?.datetime()?;
        let Some(offset_collection) = offset_collection else {
            return Some(run);
        };
        match of(offset_collection)?.id() {
            VariableId::Index(hours) => {
                run.checked_add_signed(Duration::try_hours(*hours)?)
            }
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) const LAYOUT: &str = r#"
root: models
lang_priority: [en]
collections:
  - id: models
    names: { en: Models, de: Modelle }
    variables:
      - id: ECMWF
        names: { en: ECMWF IFS }
      - id: GFS
  - id: runs
    time_format: "%Y%m%d%H"
    variables:
      - id: "2019-11-03T00:00:00Z"
      - id: "2019-11-03T12:00:00Z"
  - id: fields
    variables:
      - id: wind
      - id: wind_gusts
  - id: offsets
    range: { start: 0, end: 24, step: 3 }
edges:
  - parent: models
    children: [runs]
  - parent: runs
    children: [fields]
  - parent: fields
    children: [offsets]
time_collecting: [models, runs, fields]
file_pattern: "{models}/{runs}/{fields}_{offsets}.png"
valid_time:
  run: runs
  offset: offsets
"#;

    #[test]
    fn test_expand_env_vars_simple() {
        std::env::set_var("INSPECTOR_TEST_VAR", "test_value");
        let result = expand_env_vars("prefix_${INSPECTOR_TEST_VAR}_suffix").unwrap();
        assert_eq!(result, "prefix_test_value_suffix");
    }

    #[test]
    fn test_expand_env_vars_with_default() {
        std::env::remove_var("INSPECTOR_NONEXISTENT_VAR");
        let result = expand_env_vars("value_${INSPECTOR_NONEXISTENT_VAR:-default}_end").unwrap();
        assert_eq!(result, "value_default_end");
    }

    #[test]
    fn test_expand_env_vars_missing_required() {
        std::env::remove_var("INSPECTOR_REQUIRED_VAR");
        assert!(expand_env_vars("${INSPECTOR_REQUIRED_VAR}").is_err());
        assert!(expand_env_vars("${UNCLOSED").is_err());
    }

    #[test]
    fn test_build_layout() {
        let config = parse_layout(LAYOUT).unwrap();
        let (_, index) = Layout::build(&config).unwrap();

        let ids: Vec<&str> = index
            .variable_collections()
            .iter()
            .map(|c| c.id().as_str())
            .collect();
        assert_eq!(ids, vec!["models", "runs", "fields", "offsets"]);
        assert_eq!(index.collection(&"offsets".into()).unwrap().len(), 9);
        assert_eq!(index.time_collections().len(), 3);

        let models = index.collection(&"models".into()).unwrap();
        assert_eq!(models.labels().name_by_lang(Some("fr")), "Models");
        let ecmwf = models.get_by_id(&"ECMWF".into()).unwrap();
        assert_eq!(ecmwf.name(), "ECMWF IFS");
    }

    #[test]
    fn test_resolve_and_valid_time() {
        let config = parse_layout(LAYOUT).unwrap();
        let (layout, index) = Layout::build(&config).unwrap();

        let run = layout.resolve(&index, &"runs".into(), "2019110312").unwrap();
        let run_time = Utc.with_ymd_and_hms(2019, 11, 3, 12, 0, 0).unwrap();
        assert_eq!(run.datetime(), Some(run_time));
        let offset = layout.resolve(&index, &"offsets".into(), "006").unwrap();
        assert_eq!(offset.id(), &VariableId::Index(6));
        assert!(layout.resolve(&index, &"offsets".into(), "007").is_none());
        assert!(layout.resolve(&index, &"fields".into(), "temperature").is_none());

        assert_eq!(
            layout.valid_time(&[run.clone(), offset]),
            Some(run_time + Duration::hours(6))
        );
        assert_eq!(layout.valid_time(&[run]), None);
    }

    #[test]
    fn test_valid_time_out_of_range_offset() {
        let config = parse_layout(LAYOUT).unwrap();
        let (layout, mut index) = Layout::build(&config).unwrap();
        let beyond_calendar: i64 = 24 * 365 * 300_000;
        index
            .collection_mut(&"offsets".into())
            .unwrap()
            .append([Variable::new(i64::MAX), Variable::new(beyond_calendar)]);

        let run = layout.resolve(&index, &"runs".into(), "2019110300").unwrap();
        let offsets = index.collection(&"offsets".into()).unwrap();
        for hours in [i64::MAX, beyond_calendar] {
            let offset = offsets.get_by_id(&VariableId::Index(hours)).cloned().unwrap();
            assert_eq!(layout.valid_time(&[run.clone(), offset]), None);
        }
    }

    #[test]
    fn test_example_layout_builds() {
        let config = parse_layout(include_str!("../layout.example.yaml")).unwrap();
        let (layout, index) = Layout::build(&config).unwrap();
        assert_eq!(index.collection(&"offsets".into()).unwrap().len(), 81);
        assert_eq!(layout.pattern().placeholders().count(), 6);
        assert!(layout.resolve(&index, &"levels".into(), "500hPa").is_some());
    }

    #[test]
    fn test_invalid_layouts() {
        let unknown_root = LAYOUT.replace("root: models", "root: regions");
        assert!(parse_layout(&unknown_root).is_err());

        let unknown_placeholder = LAYOUT.replace("{fields}_{offsets}", "{fields}_{levels}");
        assert!(parse_layout(&unknown_placeholder).is_err());

        let cycle = LAYOUT.replace("children: [offsets]", "children: [offsets, models]");
        let config = parse_layout(&cycle).unwrap();
        let err = Layout::build(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("cycle"));
    }
}
