use std::cell::Cell;

use skope_catalog::domain::{Dataset, VariableId, YearRange};
use skope_catalog::filter::FilterCriteria;
use skope_catalog::seed::builtin_catalog;
use skope_catalog::store::{CatalogSource, CatalogStore, StaticCatalog};

#[derive(Debug)]
struct CountingSource {
    datasets: Vec<Dataset>,
    calls: Cell<usize>,
}

impl CountingSource {
    fn builtin() -> Self {
        Self {
            datasets: builtin_catalog().unwrap(),
            calls: Cell::new(0),
        }
    }
}

impl CatalogSource for CountingSource {
    fn datasets(&self) -> Vec<Dataset> {
        self.calls.set(self.calls.get() + 1);
        self.datasets.clone()
    }
}

fn store() -> CatalogStore<StaticCatalog> {
    let mut store = CatalogStore::with_fallback_span(
        StaticCatalog::builtin().unwrap(),
        YearRange::new(1, 2026),
    );
    store.load();
    store
}

fn filtered_ids<S: CatalogSource>(store: &CatalogStore<S>) -> Vec<String> {
    store
        .filtered_datasets()
        .iter()
        .map(|dataset| dataset.id.to_string())
        .collect()
}

fn wide_open() -> FilterCriteria {
    FilterCriteria::default().with_years(YearRange::new(-10_000, 10_000))
}

#[test]
fn year_overlap_includes_partial_intersection() {
    let mut store = store();
    store.set_filter_criteria(wide_open().with_years(YearRange::new(1929, 1978)));
    assert_eq!(filtered_ids(&store), vec!["lbda", "paleocar"]);

    store.set_filter_criteria(wide_open().with_years(YearRange::new(2018, 2020)));
    assert!(filtered_ids(&store).is_empty());

    store.set_filter_criteria(wide_open().with_years(YearRange::new(2009, 2009)));
    assert_eq!(filtered_ids(&store), vec!["lbda", "srtm"]);
}

#[test]
fn inverted_year_range_yields_nothing() {
    let mut store = store();
    store.set_filter_criteria(wide_open().with_years(YearRange::new(2000, 1990)));
    assert!(store.filtered_datasets().is_empty());
}

#[test]
fn empty_criteria_returns_whole_catalog_in_order() {
    let mut store = store();
    store.set_filter_criteria(wide_open());
    let all = store.all().iter().collect::<Vec<_>>();
    assert_eq!(store.filtered_datasets(), all);
    assert_eq!(filtered_ids(&store), filtered_ids(&store));
}

#[test]
fn default_criteria_cover_builtin_catalog() {
    let store = store();
    assert_eq!(store.filter_criteria(), &FilterCriteria::default());
    assert_eq!(filtered_ids(&store), vec!["lbda", "srtm", "paleocar"]);
}

#[test]
fn query_is_case_insensitive_substring() {
    let mut store = store();
    store.set_filter_criteria(wide_open().with_query("drought"));
    assert_eq!(filtered_ids(&store), vec!["lbda"]);

    store.set_filter_criteria(wide_open().with_query("DROUGHT"));
    assert_eq!(filtered_ids(&store), vec!["lbda"]);

    store.set_filter_criteria(wide_open().with_query("zzz-nomatch"));
    assert!(filtered_ids(&store).is_empty());
}

#[test]
fn query_matches_description_too() {
    let mut store = store();
    store.set_filter_criteria(wide_open().with_query("tree-ring"));
    assert_eq!(filtered_ids(&store), vec!["paleocar"]);
}

#[test]
fn variable_class_filter_uses_any_match() {
    let mut store = store();
    store.set_filter_criteria(wide_open().with_classes(vec!["Elevation".parse().unwrap()]));
    assert_eq!(filtered_ids(&store), vec!["srtm"]);

    store.set_filter_criteria(wide_open().with_classes(vec![
        "Elevation".parse().unwrap(),
        "Precipitation".parse().unwrap(),
    ]));
    assert_eq!(filtered_ids(&store), vec!["lbda", "srtm", "paleocar"]);
}

#[test]
fn filters_combine_with_and() {
    let mut store = store();
    let criteria = wide_open()
        .with_query("usa")
        .with_classes(vec!["Temperature".parse().unwrap()])
        .with_years(YearRange::new(1500, 1600));
    store.set_filter_criteria(criteria);
    assert_eq!(filtered_ids(&store), vec!["paleocar"]);
}

#[test]
fn load_fetches_source_once() {
    let mut store = CatalogStore::new(CountingSource::builtin());
    assert!(store.all().is_empty());

    store.load();
    store.load();
    assert_eq!(store.source().calls.get(), 1);
    assert_eq!(store.all().len(), 3);
    assert!(!store.loading());
}

#[test]
fn load_dataset_is_idempotent() {
    let mut store = CatalogStore::new(CountingSource::builtin());

    store.load_dataset("paleocar".parse().unwrap());
    let first = store.selected_dataset().cloned();
    store.load_dataset("paleocar".parse().unwrap());

    assert_eq!(store.source().calls.get(), 1);
    assert_eq!(store.selected_dataset().cloned(), first);
    assert_eq!(store.selected_dataset().unwrap().id.as_str(), "paleocar");
}

#[test]
fn load_dataset_switches_without_reloading() {
    let mut store = CatalogStore::new(CountingSource::builtin());
    store.load_dataset("lbda".parse().unwrap());
    store.load_dataset("srtm".parse().unwrap());
    assert_eq!(store.source().calls.get(), 1);
    assert_eq!(store.selected_dataset().unwrap().id.as_str(), "srtm");
}

#[test]
fn unknown_dataset_reads_like_no_selection() {
    let mut store = store();
    store.select_dataset("lbda".parse().unwrap());
    store.select_dataset("does-not-exist".parse().unwrap());
    assert!(store.selected_dataset().is_none());
    assert_eq!(store.selected_dataset_time_zero(), 0);
    assert_eq!(store.selected_dataset_timespan(), YearRange::new(1, 2026));
}

#[test]
fn derived_values_without_selection_use_fallback() {
    let store = store();
    assert_eq!(store.selected_dataset_time_zero(), 0);
    assert_eq!(store.selected_dataset_timespan(), YearRange::new(1, 2026));
}

#[test]
fn default_fallback_reaches_current_year() {
    let store = CatalogStore::new(StaticCatalog::builtin().unwrap());
    let span = store.selected_dataset_timespan();
    assert_eq!(span, YearRange::through_current_year());
    assert_eq!(span.start, 1);
}

#[test]
fn derived_values_follow_selection() {
    let mut store = store();

    store.select_dataset("paleocar".parse().unwrap());
    assert_eq!(store.selected_dataset_time_zero(), 1);
    assert_eq!(store.selected_dataset_timespan(), YearRange::new(1, 2000));

    store.select_dataset("srtm".parse().unwrap());
    assert_eq!(store.selected_dataset_time_zero(), 0);
    assert_eq!(store.selected_dataset_timespan(), YearRange::new(2009, 2009));
}

#[test]
fn select_variable_marks_only_that_variable_visible() {
    let mut store = store();
    store.select_dataset("paleocar".parse().unwrap());

    let id: VariableId = "paleocar_precipitation".parse().unwrap();
    store.select_variable(id.clone());

    let dataset = store.selected_dataset().unwrap();
    let visible = dataset
        .variables
        .iter()
        .map(|variable| (variable.id.as_str(), variable.visible))
        .collect::<Vec<_>>();
    assert_eq!(
        visible,
        vec![
            ("paleocar_temperature", false),
            ("paleocar_precipitation", true),
            ("paleocar_crop_niche", false),
        ]
    );
    assert_eq!(store.selected_variable().unwrap().id, id);
}

#[test]
fn selecting_second_variable_keeps_first_visible() {
    let mut store = store();
    store.select_dataset("paleocar".parse().unwrap());
    store.select_variable("paleocar_temperature".parse().unwrap());
    store.select_variable("paleocar_crop_niche".parse().unwrap());

    let dataset = store.selected_dataset().unwrap();
    assert!(dataset.variables[0].visible);
    assert!(!dataset.variables[1].visible);
    assert!(dataset.variables[2].visible);
    assert_eq!(
        store.selected_variable().unwrap().id.as_str(),
        "paleocar_crop_niche"
    );
}

#[test]
fn select_variable_without_dataset_changes_nothing() {
    let mut store = store();
    let before = store.state().clone();
    store.select_variable("srtm_elevation".parse().unwrap());
    assert_eq!(store.state(), &before);
    assert!(store.selected_variable().is_none());
}

#[test]
fn select_unknown_variable_changes_nothing() {
    let mut store = store();
    store.select_dataset("srtm".parse().unwrap());
    let before = store.state().clone();
    store.select_variable("lbda_precitation".parse().unwrap());
    assert_eq!(store.state(), &before);
}

#[test]
fn load_and_select_variable_loads_first() {
    let mut store = CatalogStore::new(CountingSource::builtin());
    store.load_and_select_variable("srtm_elevation".parse().unwrap());
    assert_eq!(store.source().calls.get(), 1);
    assert!(store.selected_variable().is_none());

    store.load_dataset("srtm".parse().unwrap());
    store.load_and_select_variable("srtm_elevation".parse().unwrap());
    assert_eq!(store.source().calls.get(), 1);
    assert_eq!(
        store.selected_variable().unwrap().id.as_str(),
        "srtm_elevation"
    );
    assert!(store.selected_variable().unwrap().visible);
}

#[test]
fn filter_criteria_replace_wholesale() {
    let mut store = store();
    store.set_filter_criteria(wide_open().with_query("srtm"));
    store.set_filter_criteria(FilterCriteria {
        year_start: 1,
        year_end: 2019,
        ..FilterCriteria::default()
    });
    assert!(store.filter_criteria().query.is_empty());
    assert_eq!(filtered_ids(&store).len(), 3);
}

#[test]
fn unreadable_year_only_drops_that_dataset() {
    let mut datasets = builtin_catalog().unwrap();
    let mut broken: Dataset = serde_json::from_value(serde_json::json!({
        "id": "undated",
        "title": "Undated Survey",
        "timespan": { "period": { "gte": "n/a", "lte": "2000" } },
        "variables": [{ "id": "undated_elevation", "class": "Elevation" }],
    }))
    .unwrap();
    broken.description = "surveyed elevation".to_string();
    datasets.push(broken);

    let mut store = CatalogStore::with_fallback_span(
        StaticCatalog::new(datasets),
        YearRange::new(1, 2026),
    );
    store.load();
    assert_eq!(store.all().len(), 4);
    assert_eq!(filtered_ids(&store), vec!["lbda", "srtm", "paleocar"]);

    store.select_dataset("undated".parse().unwrap());
    assert_eq!(store.selected_dataset().unwrap().id.as_str(), "undated");
    assert_eq!(store.selected_dataset_timespan(), YearRange::new(1, 2026));
}

#[test]
fn clear_selection_falls_back_to_defaults() {
    let mut store = store();
    store.load_dataset("paleocar".parse().unwrap());
    store.select_variable("paleocar_temperature".parse().unwrap());

    store.clear_selection();
    assert!(store.selected_dataset().is_none());
    assert!(store.selected_variable().is_none());
    assert_eq!(store.selected_dataset_time_zero(), 0);
    assert_eq!(store.selected_dataset_timespan(), YearRange::new(1, 2026));

    store.load_dataset("paleocar".parse().unwrap());
    assert_eq!(
        store.selected_variable().unwrap().id.as_str(),
        "paleocar_temperature"
    );
}
