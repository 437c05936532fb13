//! Hierarchical index of weather-model resources.
//!
//! Resources (images, grids, any payload) are tagged with one variable per
//! attribute axis: model, run, region, field, level, accumulation, offset.
//! Axes are [`VariableCollection`]s wired into a DAG of [`Node`]s; the
//! [`ResourceIndex`] stores each resource at the node of its deepest axis and
//! answers questions such as "which runs exist for ECMWF" or "which valid
//! times exist for wind at 500 hPa".
//!
//! # Example
//!
//! ```
//! use resource_index::{Hierarchy, Resource, ResourceIndex, Variable, VariableCollection};
//!
//! let models = VariableCollection::new("models").with_variables([Variable::new("GFS")]);
//! let fields = VariableCollection::new("fields").with_variables([Variable::new("wind")]);
//! let gfs = models.get_by_id(&"GFS".into()).cloned().unwrap();
//! let wind = fields.get_by_id(&"wind".into()).cloned().unwrap();
//!
//! let mut hierarchy = Hierarchy::new(models);
//! let fields_node = hierarchy.add_node(fields).unwrap();
//! hierarchy.append_child(hierarchy.root(), fields_node).unwrap();
//!
//! let mut index = ResourceIndex::new(hierarchy);
//! index.append([Resource::new(vec![gfs.clone(), wind], "gfs/wind.png")]);
//!
//! let available = index.available_variables(&"fields".into(), &[gfs]);
//! assert_eq!(available.len(), 1);
//! ```

pub mod collection;
pub mod error;
pub mod events;
pub mod hierarchy;
pub mod image;
pub mod index;
pub mod labels;
pub mod node;
pub mod presets;
pub mod resource;
pub mod variable;

pub use collection::VariableCollection;
pub use error::{IndexError, IndexResult, PlacementError};
pub use events::{ListenerId, ResourceEvent, ResourceListener};
pub use hierarchy::Hierarchy;
pub use image::{Image, ImageSpec};
pub use index::{BatchReport, Descent, ResourceIndex};
pub use labels::Labels;
pub use node::{Node, NodeId};
pub use presets::{nwp_hierarchy, NwpAxis, NwpResources};
pub use resource::{Resource, ResourceKey};
pub use variable::{CollectionId, Variable, VariableId};
