//! Common test fixtures for resource-index tests.
//!
//! Two worlds are provided: a compact four-axis index (models, runs, fields,
//! offsets) and the full NWP layout filled with images.

/// Fixed timestamps used by the fixtures.
pub mod time {
    use chrono::{DateTime, TimeZone, Utc};

    /// Shorthand for a whole-hour UTC timestamp.
    pub fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    /// Runs of the four-axis scenario.
    pub fn scenario_runs() -> [DateTime<Utc>; 3] {
        [utc(2019, 10, 25, 0), utc(2019, 10, 25, 12), utc(2019, 10, 26, 0)]
    }

    /// Run of the NWP fixture.
    pub fn nwp_run() -> DateTime<Utc> {
        utc(2019, 11, 3, 0)
    }
}

/// models -> runs -> fields -> offsets, filled with every combination.
pub mod scenario {
    use chrono::{DateTime, Duration, Utc};
    use resource_index::{
        Hierarchy, NodeId, Resource, ResourceIndex, ResourceKey, Variable, VariableCollection,
    };

    use crate::generators::{cross_product, offset_series};

    pub const MODELS: [&str; 2] = ["ECMWF", "GFS"];
    pub const FIELDS: [&str; 3] = ["wind", "geopotential", "precipitation"];
    /// 0 to 24 hours in steps of 3.
    pub const OFFSET_END: i64 = 24;
    pub const OFFSET_STEP: i64 = 3;
    /// 2 models x 3 runs x 3 fields x 9 offsets.
    pub const RESOURCE_COUNT: usize = 162;

    /// Scenario index with the node of every axis at hand.
    pub struct Scenario {
        pub index: ResourceIndex<String>,
        pub models: NodeId,
        pub runs: NodeId,
        pub fields: NodeId,
        pub offsets: NodeId,
    }

    impl Scenario {
        /// Hierarchy and variables, no resources.
        pub fn empty() -> Self {
            let models = VariableCollection::new("models")
                .with_variables(MODELS.iter().map(|m| Variable::new(*m)));
            let runs = VariableCollection::new("runs").with_variables(
                crate::time::scenario_runs()
                    .into_iter()
                    .map(Variable::time),
            );
            let fields = VariableCollection::new("fields")
                .with_variables(FIELDS.iter().map(|f| Variable::new(*f)));
            let offsets = VariableCollection::new("offsets")
                .with_variables(offset_series(0, OFFSET_END, OFFSET_STEP).into_iter().map(Variable::new));

            let mut hierarchy = Hierarchy::new(models);
            let runs = hierarchy.add_node(runs).unwrap();
            let fields = hierarchy.add_node(fields).unwrap();
            let offsets = hierarchy.add_node(offsets).unwrap();
            let models = hierarchy.root();
            hierarchy.append_child(models, runs).unwrap();
            hierarchy.append_child(runs, fields).unwrap();
            hierarchy.append_child(fields, offsets).unwrap();

            Self {
                index: ResourceIndex::new(hierarchy),
                models,
                runs,
                fields,
                offsets,
            }
        }

        /// All 162 resources indexed.
        pub fn filled() -> Self {
            let mut scenario = Self::empty();
            let resources = scenario.resources();
            scenario.index.append(resources);
            scenario
        }

        /// Every model/run/field/offset combination, valid time set to
        /// run + offset hours and the payload to a relative image path.
        pub fn resources(&self) -> Vec<Resource<String>> {
            let axes: Vec<Vec<Variable>> = [self.models, self.runs, self.fields, self.offsets]
                .iter()
                .map(|n| {
                    self.index
                        .node(*n)
                        .unwrap()
                        .collection()
                        .variables()
                        .cloned()
                        .collect()
                })
                .collect();
            cross_product(&axes)
                .into_iter()
                .map(|vars| {
                    let run = vars[1].datetime().unwrap();
                    let offset = offset_hours(&vars[3]);
                    let path = format!(
                        "{}/{}/{}/{:03}.png",
                        vars[0].id(),
                        run.format("%Y%m%d%H"),
                        vars[2].id(),
                        offset
                    );
                    Resource::new(vars, path).with_datetime(run + Duration::hours(offset))
                })
                .collect()
        }

        /// Keys of indexed resources matching `predicate`.
        pub fn keys_where<F>(&self, predicate: F) -> Vec<ResourceKey>
        where
            F: Fn(&Resource<String>) -> bool,
        {
            self.resources()
                .into_iter()
                .filter(|r| predicate(r))
                .map(|r| r.key().clone())
                .collect()
        }

        pub fn model(&self, id: &str) -> Variable {
            self.variable(self.models, id)
        }

        pub fn run(&self, run: DateTime<Utc>) -> Variable {
            self.variable(self.runs, run)
        }

        pub fn field(&self, id: &str) -> Variable {
            self.variable(self.fields, id)
        }

        pub fn offset(&self, hours: i64) -> Variable {
            self.variable(self.offsets, hours)
        }

        fn variable(&self, node: NodeId, id: impl Into<resource_index::VariableId>) -> Variable {
            self.index
                .node(node)
                .and_then(|n| n.collection().get_by_id(&id.into()))
                .cloned()
                .unwrap()
        }
    }

    /// Offset in hours of an offsets variable.
    pub fn offset_hours(variable: &Variable) -> i64 {
        match variable.id() {
            resource_index::VariableId::Index(h) => *h,
            other => panic!("not an offset: {other}"),
        }
    }

    /// Offset in hours of the resource's offsets variable.
    pub fn resource_offset(resource: &Resource<String>) -> i64 {
        resource
            .variable_of(&"offsets".into())
            .map(offset_hours)
            .unwrap()
    }
}

/// The NWP layout filled with images for one run.
///
/// | model | field         | level / accumulation | offsets       | images |
/// |-------|---------------|----------------------|---------------|--------|
/// | ECMWF | wind          | 850hPa               | 0..=72 by 3   | 25     |
/// | ECMWF | wind          | 500hPa               | 0..=72 by 3   | 25     |
/// | ECMWF | geopotential  | 500hPa               | 0..=72 by 6   | 13     |
/// | ECMWF | precipitation | 6h                   | 6..=72 by 6   | 12     |
/// | GFS   | wind          | 500hPa               | 0..=96 by 3   | 33     |
///
/// Images are defined without an offset variable; their valid time is
/// run + offset.
pub mod nwp {
    use chrono::Duration;
    use resource_index::{Image, ImageSpec, NwpAxis, NwpResources, Variable};

    use crate::generators::offset_series;

    pub const IMAGE_COUNT: usize = 25 + 25 + 13 + 12 + 33;

    /// NWP index with all axes populated and no images.
    pub fn nwp_axes() -> NwpResources<Image> {
        let mut nwp = NwpResources::new().unwrap();
        nwp.add_variable(NwpAxis::Models, Variable::new("ECMWF").with_label("en", "ECMWF IFS"))
            .add_variable(NwpAxis::Models, Variable::new("GFS"))
            .add_variable(NwpAxis::Runs, Variable::time(crate::time::nwp_run()))
            .add_variable(NwpAxis::Regions, Variable::new("europe").with_label("de", "Europa"))
            .add_variable(NwpAxis::Fields, Variable::new("wind"))
            .add_variable(NwpAxis::Fields, Variable::new("geopotential"))
            .add_variable(NwpAxis::Fields, Variable::new("precipitation"))
            .add_variable(NwpAxis::Levels, Variable::new("850hPa"))
            .add_variable(NwpAxis::Levels, Variable::new("500hPa"))
            .add_variable(NwpAxis::Accumulations, Variable::new("6h"));
        for hours in offset_series(0, 96, 3) {
            nwp.add_variable(NwpAxis::Offsets, Variable::new(hours));
        }
        nwp
    }

    /// NWP index with the images of the table above.
    pub fn nwp_with_images() -> NwpResources<Image> {
        let mut nwp = nwp_axes();
        let series: [(&str, &str, NwpAxis, &str, i64, i64, i64); 5] = [
            ("ECMWF", "wind", NwpAxis::Levels, "850hPa", 0, 72, 3),
            ("ECMWF", "wind", NwpAxis::Levels, "500hPa", 0, 72, 3),
            ("ECMWF", "geopotential", NwpAxis::Levels, "500hPa", 0, 72, 6),
            ("ECMWF", "precipitation", NwpAxis::Accumulations, "6h", 6, 72, 6),
            ("GFS", "wind", NwpAxis::Levels, "500hPa", 0, 96, 3),
        ];
        let run = crate::time::nwp_run();
        for (model, field, vertical_axis, vertical, start, end, step) in series {
            let variables = vec![
                nwp.variable(NwpAxis::Models, model).unwrap(),
                nwp.variable(NwpAxis::Runs, run).unwrap(),
                nwp.variable(NwpAxis::Regions, "europe").unwrap(),
                nwp.variable(NwpAxis::Fields, field).unwrap(),
                nwp.variable(vertical_axis, vertical).unwrap(),
            ];
            for hours in offset_series(start, end, step) {
                let url = format!("{model}/{field}/{vertical}/{hours:03}.png").to_lowercase();
                let spec = ImageSpec::new(variables.clone(), url).with_run(run, Duration::hours(hours));
                nwp.append_image(spec);
            }
        }
        nwp
    }
}
