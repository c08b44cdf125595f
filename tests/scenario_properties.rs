use std::collections::BTreeSet;

use ocean_dash::data::{METRIC_CAR, METRIC_CO2, POPULATIONS, default_catalog};
use ocean_dash::domain::Scenario;
use ocean_dash::error::ScenarioError;
use ocean_dash::scenario::ScenarioAggregator;
use proptest::prelude::*;

fn aggregator() -> ScenarioAggregator {
    ScenarioAggregator::new(default_catalog().unwrap())
}

fn action_names() -> Vec<String> {
    default_catalog().unwrap().actions().iter().map(|a| a.name.clone()).collect()
}

/// Any subset of the built-in actions.
fn arb_selection() -> impl Strategy<Value = BTreeSet<String>> {
    let names = action_names();
    prop::collection::vec(any::<bool>(), names.len()).prop_map(move |mask| {
        names
            .iter()
            .zip(mask)
            .filter(|(_, keep)| *keep)
            .map(|(n, _)| n.clone())
            .collect()
    })
}

fn arb_population() -> impl Strategy<Value = u64> {
    prop::sample::select(POPULATIONS.to_vec())
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

// ── Totals scale linearly with population ────────────────────────────────

proptest! {
    #[test]
    fn totals_scale_with_population(selected in arb_selection(), population in arb_population()) {
        let agg = aggregator();
        let one = agg.aggregate(&Scenario { selected: selected.clone(), population: 1 }).unwrap();
        let many = agg.aggregate(&Scenario { selected, population }).unwrap();
        for ((k1, v1), (k2, v2)) in one.totals.iter().zip(&many.totals) {
            prop_assert_eq!(k1, k2);
            prop_assert!(close(v1 * population as f64, *v2), "{k1}: {v1} × {population} vs {v2}");
        }
    }

    #[test]
    fn disjoint_selections_add_up(selected in arb_selection(), population in arb_population()) {
        let agg = aggregator();
        let (left, right): (BTreeSet<String>, BTreeSet<String>) =
            selected.iter().cloned().partition(|n| n.len() % 2 == 0);
        let whole = agg.aggregate(&Scenario { selected, population }).unwrap();
        let l = agg.aggregate(&Scenario { selected: left, population }).unwrap();
        let r = agg.aggregate(&Scenario { selected: right, population }).unwrap();
        for (key, total) in &whole.totals {
            let parts = l.get(key).unwrap() + r.get(key).unwrap();
            prop_assert!(close(*total, parts), "{key}: {total} vs {parts}");
        }
    }

    #[test]
    fn contributions_sum_to_totals(selected in arb_selection(), population in arb_population()) {
        let agg = aggregator();
        let scenario = Scenario { selected, population };
        let totals = agg.aggregate(&scenario).unwrap();
        let rows = agg.contributions(&scenario).unwrap();
        prop_assert_eq!(rows.len(), scenario.selected.len());
        for (key, total) in &totals.totals {
            let sum: f64 = rows
                .iter()
                .flat_map(|r| r.values.iter())
                .filter(|(k, _)| k == key)
                .map(|(_, v)| *v)
                .sum();
            prop_assert!(close(*total, sum), "{key}: {total} vs {sum}");
        }
    }

    #[test]
    fn totals_are_never_negative(selected in arb_selection(), population in arb_population()) {
        let totals = aggregator().aggregate(&Scenario { selected, population }).unwrap();
        prop_assert!(totals.totals.iter().all(|(_, v)| *v >= 0.0));
    }
}

#[test]
fn empty_selection_gives_zero_for_every_metric() {
    let agg = aggregator();
    let totals = agg.aggregate(&Scenario::new(Vec::<String>::new(), 100_000_000)).unwrap();
    assert_eq!(totals.totals.len(), agg.catalog().metrics().len());
    assert!(totals.totals.iter().all(|(_, v)| *v == 0.0));
}

#[test]
fn bicycle_for_a_hundred_people() {
    let totals = aggregator().aggregate(&Scenario::new(["bicycle 30 min"], 100)).unwrap();
    assert!((totals.get(METRIC_CO2).unwrap() - 30.0).abs() < 1e-9);
    assert!((totals.get(METRIC_CAR).unwrap() - 200.0).abs() < 1e-9);
}

#[test]
fn unknown_action_is_reported_by_name() {
    let err = aggregator().aggregate(&Scenario::new(["surfing"], 1)).unwrap_err();
    assert!(matches!(err, ScenarioError::UnknownAction(ref name) if name == "surfing"));
}
