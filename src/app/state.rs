//! Dashboard interaction state.
//!
//! The whole UI state is one value. Every key press maps to an `Interaction`
//! and `DashboardState::apply` returns the next state; nothing here touches
//! the terminal, so the state machine is testable on its own.

use std::collections::BTreeSet;

use crate::app::pipeline::Dashboard;
use crate::data::{TREND_CORAL, TREND_PH};
use crate::domain::{Navigation, Scenario, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Navigate(Navigation),
    /// Move the main-menu cursor by `n` entries (wrapping).
    MenuMove(i32),
    /// Open the view under the main-menu cursor.
    MenuOpen,
    /// Move the current view's year slider by `n` years (clamped).
    YearStep(i32),
    /// Move the action-list cursor by `n` entries (clamped).
    ActionMove(i32),
    ToggleAction,
    ClearActions,
    /// Move through the population options by `n` entries (clamped).
    PopulationStep(i32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardState {
    pub view: View,
    pub menu_cursor: usize,
    pub bleach_year: i32,
    pub climate_year: i32,
    pub action_cursor: usize,
    pub selected: BTreeSet<String>,
    pub population_index: usize,
}

impl DashboardState {
    pub fn new(dash: &Dashboard) -> Self {
        let year = dash.data.default_year;
        Self {
            view: View::Main,
            menu_cursor: 0,
            bleach_year: clamp_year(dash, TREND_CORAL, year),
            climate_year: clamp_year(dash, TREND_PH, year),
            action_cursor: 0,
            selected: BTreeSet::new(),
            population_index: 0,
        }
    }

    /// Start with both sliders on `year` (clamped into each curve's range).
    pub fn with_year(mut self, dash: &Dashboard, year: i32) -> Self {
        self.bleach_year = clamp_year(dash, TREND_CORAL, year);
        self.climate_year = clamp_year(dash, TREND_PH, year);
        self
    }

    /// Next state after one interaction. Interactions that do not apply to
    /// the current view leave the state unchanged.
    pub fn apply(mut self, interaction: Interaction, dash: &Dashboard) -> Self {
        match (self.view, interaction) {
            (_, Interaction::Navigate(nav)) => {
                self.view = self.view.navigate(nav);
            }
            (View::Main, Interaction::MenuMove(n)) => {
                let len = View::MENU.len() as i64;
                self.menu_cursor = (self.menu_cursor as i64 + i64::from(n)).rem_euclid(len) as usize;
            }
            (View::Main, Interaction::MenuOpen) => {
                let target = View::MENU[self.menu_cursor.min(View::MENU.len() - 1)];
                self.view = self.view.navigate(Navigation::Open(target));
            }
            (View::Bleach, Interaction::YearStep(n)) => {
                self.bleach_year = clamp_year(dash, TREND_CORAL, self.bleach_year.saturating_add(n));
            }
            (View::Climate, Interaction::YearStep(n)) => {
                self.climate_year = clamp_year(dash, TREND_PH, self.climate_year.saturating_add(n));
            }
            (View::Actions, Interaction::ActionMove(n)) => {
                let max = dash.data.catalog.actions().len().saturating_sub(1);
                self.action_cursor = step_index(self.action_cursor, n, max);
            }
            (View::Actions, Interaction::ToggleAction) => {
                if let Some(action) = dash.data.catalog.actions().get(self.action_cursor) {
                    if !self.selected.remove(&action.name) {
                        self.selected.insert(action.name.clone());
                    }
                }
            }
            (View::Actions, Interaction::ClearActions) => {
                self.selected.clear();
            }
            (View::Actions, Interaction::PopulationStep(n)) => {
                let max = dash.data.populations.len().saturating_sub(1);
                self.population_index = step_index(self.population_index, n, max);
            }
            _ => {}
        }
        self
    }

    pub fn population(&self, dash: &Dashboard) -> u64 {
        dash.data
            .populations
            .get(self.population_index)
            .copied()
            .unwrap_or(0)
    }

    pub fn scenario(&self, dash: &Dashboard) -> Scenario {
        Scenario {
            selected: self.selected.clone(),
            population: self.population(dash),
        }
    }
}

fn clamp_year(dash: &Dashboard, key: &str, year: i32) -> i32 {
    match dash.curve(key) {
        Ok(curve) => curve.range.clamp(year),
        Err(_) => year,
    }
}

fn step_index(cur: usize, n: i32, max: usize) -> usize {
    let next = cur as i64 + i64::from(n);
    next.clamp(0, max as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::build_dashboard;
    use crate::data::DashboardData;
    use crate::trend::Extrapolation;

    fn dash() -> Dashboard {
        build_dashboard(DashboardData::builtin().unwrap(), Extrapolation::Reject).unwrap()
    }

    #[test]
    fn initial_state() {
        let d = dash();
        let s = DashboardState::new(&d);
        assert_eq!(s.view, View::Main);
        assert_eq!(s.bleach_year, 2000);
        assert_eq!(s.climate_year, 2000);
        assert_eq!(s.population(&d), 1);
        assert!(s.selected.is_empty());
    }

    #[test]
    fn menu_wraps_and_opens() {
        let d = dash();
        let s = DashboardState::new(&d)
            .apply(Interaction::MenuMove(-1), &d)
            .apply(Interaction::MenuOpen, &d);
        assert_eq!(s.view, View::Actions);
        let s = s.apply(Interaction::Navigate(Navigation::Back), &d);
        assert_eq!(s.view, View::Main);
    }

    #[test]
    fn year_slider_is_clamped_and_view_local() {
        let d = dash();
        let s = DashboardState::new(&d)
            .apply(Interaction::Navigate(Navigation::Open(View::Bleach)), &d)
            .apply(Interaction::YearStep(100), &d);
        assert_eq!(s.bleach_year, 2024);
        assert_eq!(s.climate_year, 2000);
        let s = s.apply(Interaction::YearStep(-1000), &d);
        assert_eq!(s.bleach_year, 1980);
    }

    #[test]
    fn year_step_ignored_on_main() {
        let d = dash();
        let s0 = DashboardState::new(&d);
        let s1 = s0.clone().apply(Interaction::YearStep(5), &d);
        assert_eq!(s0, s1);
    }

    #[test]
    fn toggling_actions_builds_scenario() {
        let d = dash();
        let s = DashboardState::new(&d)
            .apply(Interaction::Navigate(Navigation::Open(View::Actions)), &d)
            .apply(Interaction::ToggleAction, &d)
            .apply(Interaction::PopulationStep(1), &d);
        let scenario = s.scenario(&d);
        assert_eq!(scenario.population, 100);
        assert!(scenario.selected.contains("bicycle 30 min"));

        let totals = d.aggregate(&scenario).unwrap();
        assert!((totals.get("co2").unwrap() - 30.0).abs() < 1e-9);

        let s = s.apply(Interaction::ToggleAction, &d);
        assert!(s.selected.is_empty());
    }

    #[test]
    fn population_index_is_clamped() {
        let d = dash();
        let s = DashboardState::new(&d)
            .apply(Interaction::Navigate(Navigation::Open(View::Actions)), &d)
            .apply(Interaction::PopulationStep(99), &d);
        assert_eq!(s.population(&d), 100_000_000);
        let s = s.apply(Interaction::PopulationStep(-99), &d);
        assert_eq!(s.population(&d), 1);
    }
}
