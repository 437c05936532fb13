//! End-to-end tests on the models -> runs -> fields -> offsets scenario.

use std::cell::RefCell;
use std::rc::Rc;

use resource_index::{Resource, ResourceEvent};
use test_utils::scenario::{self, resource_offset, Scenario};
use test_utils::time::scenario_runs;
use test_utils::{assert_node_collection, assert_variable_ids};

/// Scenario filled one resource per batch, counting change events.
fn filled_with_counter() -> (Scenario, Rc<RefCell<Vec<(bool, usize)>>>) {
    let mut scenario = Scenario::empty();
    let events = Rc::new(RefCell::new(Vec::new()));
    {
        let events = events.clone();
        scenario.index.subscribe(move |e: &ResourceEvent<String>| {
            events.borrow_mut().push((e.is_added(), e.resources().len()))
        });
    }
    for resource in scenario.resources() {
        scenario.index.append([resource]);
    }
    (scenario, events)
}

fn is_ecmwf(resource: &Resource<String>) -> bool {
    resource
        .variable_of(&"models".into())
        .is_some_and(|m| m.id().to_string() == "ECMWF")
}

// ============================================================================
// Placement and availability
// ============================================================================

#[test]
fn test_all_resources_land_at_offsets() {
    let s = Scenario::filled();
    assert_eq!(s.index.len(), scenario::RESOURCE_COUNT);
    assert_eq!(s.index.node(s.offsets).unwrap().len(), scenario::RESOURCE_COUNT);
    for node in [s.models, s.runs, s.fields] {
        assert!(s.index.node(node).unwrap().is_empty());
    }
}

#[test]
fn test_availability_after_fill() {
    let s = Scenario::filled();
    assert_eq!(s.index.available_variables_map().len(), 4);
    assert_eq!(s.index.available_count(s.models), 2);
    assert_eq!(s.index.available_count(s.runs), 3);
    assert_eq!(s.index.available_count(s.fields), 3);
    assert_eq!(s.index.available_count(s.offsets), 9);
    assert_variable_ids!(s.index.available_at(s.models), ["ECMWF", "GFS"]);
    assert_variable_ids!(
        s.index.available_at(s.offsets),
        [0, 3, 6, 9, 12, 15, 18, 21, 24]
    );
}

#[test]
fn test_available_variables_restricted() {
    let s = Scenario::filled();
    let gfs = s.model("GFS");
    let runs = s.index.available_variables(&"runs".into(), &[gfs.clone()]);
    assert_eq!(runs.len(), 3);

    let fields = s
        .index
        .available_variables(&"fields".into(), &[gfs, s.offset(24)]);
    assert_variable_ids!(fields, ["wind", "geopotential", "precipitation"]);

    assert!(s
        .index
        .available_variables(&"levels".into(), &[])
        .is_empty());
}

// ============================================================================
// Removal
// ============================================================================

#[test]
fn test_partial_removals_update_availability() {
    let (mut s, events) = filled_with_counter();
    assert_eq!(events.borrow().len(), scenario::RESOURCE_COUNT);

    let offset0 = s.offset(0);
    let offsets_node = s.offsets;
    let at_offset0 = |s: &Scenario| {
        s.index
            .node(offsets_node)
            .unwrap()
            .resources_by_variables(&[offset0.clone()])
            .len()
    };
    assert_eq!(at_offset0(&s), 18);

    let ecmwf_twelve = s.keys_where(|r| is_ecmwf(r) && resource_offset(r) % 12 == 0);
    let report = s.index.remove(ecmwf_twelve);
    assert_eq!(report.applied_count(), 27);
    assert_eq!(s.index.len(), 135);
    assert_eq!(s.index.available_count(s.offsets), 9);
    assert_eq!(s.index.available_count(s.models), 2);
    assert_eq!(events.borrow().len(), 163);
    assert_eq!(events.borrow().last(), Some(&(false, 27)));
    assert_eq!(at_offset0(&s), 9);

    let ecmwf_offsets = s
        .index
        .available_variables(&"offsets".into(), &[s.model("ECMWF")]);
    assert_variable_ids!(ecmwf_offsets, [3, 6, 9, 15, 18, 21]);
    assert_variable_ids!(
        s.index.available_variables(&"models".into(), &[s.offset(0)]),
        ["GFS"]
    );

    let all_twelve = s.keys_where(|r| resource_offset(r) % 12 == 0);
    assert_eq!(all_twelve.len(), 54);
    let report = s.index.remove(all_twelve);
    assert_eq!(report.applied_count(), 27);
    assert_eq!(s.index.len(), 108);
    assert_eq!(s.index.available_count(s.offsets), 6);
    assert_eq!(events.borrow().len(), 164);
    assert_eq!(at_offset0(&s), 0);
}

#[test]
fn test_remove_everything_empties_availability() {
    let mut s = Scenario::filled();
    let keys = s.keys_where(|_| true);
    let report = s.index.remove(keys);

    assert_eq!(report.applied_count(), scenario::RESOURCE_COUNT);
    assert!(s.index.is_empty());
    assert!(s.index.available_variables_map().is_empty());
    assert!(s
        .index
        .available_variables(&"models".into(), &[])
        .is_empty());
    assert_node_collection!(s.index, s.index.top_most_node_with_all_variables(&[]), "models");
}

#[test]
fn test_reappend_replaces_payload() {
    let mut s = Scenario::filled();
    let mut resource = s.resources().remove(0);
    let key = resource.key().clone();
    let datetime = resource.datetime().unwrap();
    resource = Resource::new(resource.variables().to_vec(), "replacement.png".to_string())
        .with_datetime(datetime);

    let report = s.index.append([resource]);
    assert_eq!(report.applied_count(), 0);
    assert_eq!(s.index.len(), scenario::RESOURCE_COUNT);
    assert_eq!(s.index.get(&key).unwrap().payload(), "replacement.png");
}

// ============================================================================
// Times
// ============================================================================

#[test]
fn test_times_by_offset() {
    let s = Scenario::filled();
    let times = s.index.times_by_variables(&[s.offset(3)]);
    let expected: Vec<_> = scenario_runs()
        .into_iter()
        .map(|run| run + chrono::Duration::hours(3))
        .collect();
    assert_eq!(times, expected);
}

#[test]
fn test_times_by_field_only_is_empty() {
    let s = Scenario::filled();
    assert!(s.index.times_by_variables(&[s.field("wind")]).is_empty());
}

#[test]
fn test_times_no_bubble_collects_descendants() {
    let s = Scenario::filled();
    let run = scenario_runs()[0];
    let (gfs, run_var, wind) = (s.model("GFS"), s.run(run), s.field("wind"));
    let index = s.index.with_time_collections(["models", "runs", "fields"]);

    let times = index.times_by_variables_no_bubble(&[gfs.clone(), run_var.clone(), wind]);
    assert_eq!(times.len(), 9);
    assert_eq!(times.first(), Some(&run));
    assert_eq!(times.last(), Some(&(run + chrono::Duration::hours(24))));

    assert!(index
        .times_by_variables_no_bubble(&[gfs, run_var])
        .is_empty());
}
