//! Scenario aggregation: selected actions × population -> totals per metric.

use crate::domain::{ActionCatalog, ActionContribution, ActionEffect, Scenario, ScenarioTotals};
use crate::error::ScenarioError;

/// Aggregates scenarios over an injected, pre-validated action catalog.
#[derive(Debug, Clone)]
pub struct ScenarioAggregator {
    catalog: ActionCatalog,
}

impl ScenarioAggregator {
    pub fn new(catalog: ActionCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ActionCatalog {
        &self.catalog
    }

    /// Sum `effect × population` over the selected actions, per metric.
    ///
    /// The result always has every catalog metric; an empty selection (or a
    /// population of zero) gives zeros.
    pub fn aggregate(&self, scenario: &Scenario) -> Result<ScenarioTotals, ScenarioError> {
        let actions = self.resolve(scenario)?;
        let population = scenario.population as f64;

        let totals = self
            .catalog
            .metrics()
            .iter()
            .map(|m| {
                let sum: f64 = actions.iter().map(|a| a.effect(&m.key) * population).sum();
                (m.key.clone(), sum)
            })
            .collect();

        Ok(ScenarioTotals {
            population: scenario.population,
            totals,
        })
    }

    /// Per-action effects at the scenario's population, in catalog order.
    pub fn contributions(&self, scenario: &Scenario) -> Result<Vec<ActionContribution>, ScenarioError> {
        let actions = self.resolve(scenario)?;
        let population = scenario.population as f64;

        Ok(actions
            .into_iter()
            .map(|a| ActionContribution {
                action: a.name.clone(),
                values: self
                    .catalog
                    .metrics()
                    .iter()
                    .map(|m| (m.key.clone(), a.effect(&m.key) * population))
                    .collect(),
            })
            .collect())
    }

    /// Look up every selected name, keeping catalog order.
    fn resolve(&self, scenario: &Scenario) -> Result<Vec<&ActionEffect>, ScenarioError> {
        if let Some(unknown) = scenario.selected.iter().find(|n| self.catalog.action(n).is_none()) {
            return Err(ScenarioError::UnknownAction(unknown.clone()));
        }
        Ok(self
            .catalog
            .actions()
            .iter()
            .filter(|a| scenario.selected.contains(&a.name))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MetricDisplay, MetricSpec};

    fn aggregator() -> ScenarioAggregator {
        let metrics = ["co2", "trees"]
            .iter()
            .map(|k| MetricSpec {
                key: k.to_string(),
                label: k.to_string(),
                unit: String::new(),
                display: MetricDisplay::Decimal { places: 2 },
            })
            .collect();
        let actions = vec![
            ActionEffect::new("bicycle 30 min", &[("co2", 0.3), ("trees", 1.0)]),
            ActionEffect::new("recycling", &[("co2", 0.2), ("trees", 0.5)]),
        ];
        ScenarioAggregator::new(ActionCatalog::new(metrics, actions).unwrap())
    }

    #[test]
    fn bicycle_for_a_hundred_people() {
        let totals = aggregator()
            .aggregate(&Scenario::new(["bicycle 30 min"], 100))
            .unwrap();
        assert!((totals.get("co2").unwrap() - 30.0).abs() < 1e-9);
        assert!((totals.get("trees").unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn empty_selection_is_all_zero() {
        let totals = aggregator()
            .aggregate(&Scenario::new(Vec::<String>::new(), 1_000_000))
            .unwrap();
        assert_eq!(totals.keys().collect::<Vec<_>>(), vec!["co2", "trees"]);
        assert!(totals.totals.iter().all(|(_, v)| *v == 0.0));
    }

    #[test]
    fn zero_population_is_all_zero() {
        let totals = aggregator()
            .aggregate(&Scenario::new(["recycling"], 0))
            .unwrap();
        assert!(totals.totals.iter().all(|(_, v)| *v == 0.0));
    }

    #[test]
    fn unknown_action_is_rejected() {
        let err = aggregator()
            .aggregate(&Scenario::new(["bicycle 30 min", "surfing"], 1))
            .unwrap_err();
        assert_eq!(err, ScenarioError::UnknownAction("surfing".to_string()));
    }

    #[test]
    fn contributions_sum_to_totals() {
        let agg = aggregator();
        let scenario = Scenario::new(["recycling", "bicycle 30 min"], 10);
        let totals = agg.aggregate(&scenario).unwrap();
        let rows = agg.contributions(&scenario).unwrap();
        assert_eq!(rows[0].action, "bicycle 30 min");
        for (key, total) in &totals.totals {
            let sum: f64 = rows
                .iter()
                .flat_map(|r| r.values.iter())
                .filter(|(k, _)| k == key)
                .map(|(_, v)| v)
                .sum();
            assert!((sum - total).abs() < 1e-9);
        }
    }
}
