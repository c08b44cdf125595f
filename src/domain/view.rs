//! The dashboard's view selector.

use serde::{Deserialize, Serialize};

/// Which of the four screens is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Main,
    Bleach,
    Climate,
    Actions,
}

/// Explicit user navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Open(View),
    Back,
}

impl View {
    /// Screens reachable from the main menu, in menu order.
    pub const MENU: [View; 3] = [View::Bleach, View::Climate, View::Actions];

    /// Next view after a navigation.
    ///
    /// Sub-pages only offer a way back, so `Open` is ignored outside `Main`.
    pub fn navigate(self, nav: Navigation) -> View {
        match (self, nav) {
            (_, Navigation::Back) => View::Main,
            (View::Main, Navigation::Open(target)) => target,
            (current, Navigation::Open(_)) => current,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Main => "Ocean Environment Dashboard",
            View::Bleach => "Coral Bleaching 1980-2024",
            View::Climate => "Problems Caused by Climate Change",
            View::Actions => "Effects of Environmental Actions",
        }
    }

    pub fn menu_label(&self) -> &'static str {
        match self {
            View::Main => "Main menu",
            View::Bleach => "Coral bleaching",
            View::Climate => "Climate change problems",
            View::Actions => "Environmental actions",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_main() {
        assert_eq!(View::default(), View::Main);
    }

    #[test]
    fn open_from_main_and_back() {
        for target in View::MENU {
            let v = View::Main.navigate(Navigation::Open(target));
            assert_eq!(v, target);
            assert_eq!(v.navigate(Navigation::Back), View::Main);
        }
    }

    #[test]
    fn open_ignored_on_sub_pages() {
        assert_eq!(View::Bleach.navigate(Navigation::Open(View::Actions)), View::Bleach);
        assert_eq!(View::Main.navigate(Navigation::Back), View::Main);
    }
}
