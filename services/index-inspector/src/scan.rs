//! Directory scan: turns image files into index resources.

use anyhow::{Context, Result};
use resource_index::{Resource, ResourceIndex};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::layout::Layout;

/// Resources found under a data directory.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub resources: Vec<Resource<PathBuf>>,
    /// Files whose names did not resolve to known variables.
    pub skipped: usize,
}

/// Walk `root` and build one resource per file whose relative path matches
/// the layout's file pattern and whose captured values all resolve.
pub fn scan_directory<P>(root: &Path, layout: &Layout, index: &ResourceIndex<P>) -> Result<ScanReport> {
    let mut report = ScanReport::default();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {:?}", root))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        match resource_for(&name, entry.path(), layout, index) {
            Some(resource) => report.resources.push(resource),
            None => report.skipped += 1,
        }
    }
    debug!(
        root = %root.display(),
        found = report.resources.len(),
        skipped = report.skipped,
        "Scanned data directory"
    );
    Ok(report)
}

fn resource_for<P>(
    name: &str,
    path: &Path,
    layout: &Layout,
    index: &ResourceIndex<P>,
) -> Option<Resource<PathBuf>> {
    let Some(captures) = layout.pattern().captures(name) else {
        debug!(file = %name, pattern = %layout.pattern(), "File does not match pattern");
        return None;
    };

    let mut variables = Vec::with_capacity(captures.len());
    for (collection, value) in captures {
        match layout.resolve(index, collection, value) {
            Some(variable) => variables.push(variable),
            None => {
                debug!(file = %name, collection = %collection, value = %value, "Unknown variable in file name");
                return None;
            }
        }
    }

    let resource = Resource::new(variables, path.to_path_buf());
    Some(match layout.valid_time(resource.variables()) {
        Some(datetime) => resource.with_datetime(datetime),
        None => resource,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{parse_layout, tests::LAYOUT};
    use chrono::{Duration, TimeZone, Utc};
    use test_utils::image_tree;

    #[test]
    fn test_scan_directory() {
        let dir = image_tree(&[
            "ECMWF/2019110300/wind_000.png",
            "ECMWF/2019110300/wind_003.png",
            "ECMWF/2019110300/wind_gusts_006.png",
            "GFS/2019110312/wind_024.png",
            "GFS/2019110312/wind_027.png",
            "ICON/2019110300/wind_000.png",
            "README.md",
        ]);
        let (layout, mut index) = Layout::build(&parse_layout(LAYOUT).unwrap()).unwrap();

        let report = scan_directory(dir.path(), &layout, &index).unwrap();
        assert_eq!(report.resources.len(), 4);
        assert_eq!(report.skipped, 3);

        let gusts = &report.resources[2];
        assert!(gusts.payload().ends_with("wind_gusts_006.png"));
        assert_eq!(
            gusts.datetime(),
            Some(Utc.with_ymd_and_hms(2019, 11, 3, 6, 0, 0).unwrap())
        );

        let appended = index.append(report.resources);
        assert_eq!(appended.applied_count(), 4);
        let offsets = index.node_by_collection_id("offsets").unwrap();
        assert_eq!(index.node(offsets).unwrap().len(), 4);

        let selection = [
            layout.resolve(&index, &"models".into(), "GFS").unwrap(),
            layout.resolve(&index, &"runs".into(), "2019110312").unwrap(),
            layout.resolve(&index, &"fields".into(), "wind").unwrap(),
        ];
        assert_eq!(
            index.times_by_variables_no_bubble(&selection),
            vec![Utc.with_ymd_and_hms(2019, 11, 3, 12, 0, 0).unwrap() + Duration::hours(24)]
        );
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let (layout, index) = Layout::build(&parse_layout(LAYOUT).unwrap()).unwrap();
        assert!(scan_directory(&missing, &layout, &index).is_err());
    }
}
