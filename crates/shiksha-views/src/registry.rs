// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::views;
use anyhow::Result;
use shiksha_model::{DashboardSnapshot, NavigationState, StateSlice};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewName {
    DirectorMessage,
    Highlights,
    Calendar,
    Trends,
    TechnicalDevelopments,
    Kpis,
    TopStates,
}

impl ViewName {
    pub const ALL: [Self; 7] = [
        Self::DirectorMessage,
        Self::Highlights,
        Self::Calendar,
        Self::Trends,
        Self::TechnicalDevelopments,
        Self::Kpis,
        Self::TopStates,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DirectorMessage => "director-message",
            Self::Highlights => "highlights",
            Self::Calendar => "calendar",
            Self::Trends => "trends",
            Self::TechnicalDevelopments => "technical-developments",
            Self::Kpis => "kpis",
            Self::TopStates => "top-states",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.as_str() == value)
    }
}

impl std::fmt::Display for ViewName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type RenderFn = fn(&DashboardSnapshot, &NavigationState) -> Result<String>;

/// A registered view: its name, the state slices it reads, and its pure
/// render function. Renders never mutate state, so rendering the same
/// state twice yields the same output.
#[derive(Clone, Copy)]
pub struct ViewSpec {
    pub name: ViewName,
    pub deps: &'static [StateSlice],
    pub render: RenderFn,
}

pub struct ViewRegistry {
    specs: Vec<ViewSpec>,
}

impl ViewRegistry {
    pub fn new(specs: Vec<ViewSpec>) -> Self {
        Self { specs }
    }

    /// All seven dashboard views with their slice dependencies.
    pub fn standard() -> Self {
        use StateSlice::{Data, Language, MonthIndex, Period};
        Self {
            specs: vec![
                ViewSpec {
                    name: ViewName::DirectorMessage,
                    deps: &[Data, Language],
                    render: views::render_director_message,
                },
                ViewSpec {
                    name: ViewName::Highlights,
                    deps: &[Data, MonthIndex, Language],
                    render: views::render_highlights,
                },
                ViewSpec {
                    name: ViewName::Calendar,
                    deps: &[Data, MonthIndex, Period],
                    render: views::render_calendar,
                },
                ViewSpec {
                    name: ViewName::Trends,
                    deps: &[Data, Period],
                    render: views::render_trends,
                },
                ViewSpec {
                    name: ViewName::TechnicalDevelopments,
                    deps: &[Data],
                    render: views::render_technical_developments,
                },
                ViewSpec {
                    name: ViewName::Kpis,
                    deps: &[Data],
                    render: views::render_kpis,
                },
                ViewSpec {
                    name: ViewName::TopStates,
                    deps: &[Data],
                    render: views::render_top_states,
                },
            ],
        }
    }

    pub fn specs(&self) -> &[ViewSpec] {
        &self.specs
    }

    pub fn get(&self, name: ViewName) -> Option<&ViewSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    /// Views whose dependencies intersect the changed slices, in
    /// registration order.
    pub fn views_for_change(&self, changed: &[StateSlice]) -> Vec<ViewName> {
        self.specs
            .iter()
            .filter(|spec| spec.deps.iter().any(|dep| changed.contains(dep)))
            .map(|spec| spec.name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{ViewName, ViewRegistry};
    use shiksha_model::StateSlice;

    #[test]
    fn standard_registry_covers_every_view() {
        let registry = ViewRegistry::standard();
        for name in ViewName::ALL {
            assert!(registry.get(name).is_some(), "missing {name}");
        }
        assert_eq!(registry.specs().len(), ViewName::ALL.len());
    }

    #[test]
    fn month_change_touches_month_dependent_views_only() {
        let registry = ViewRegistry::standard();
        let affected = registry.views_for_change(&[StateSlice::MonthIndex]);
        assert_eq!(affected, vec![ViewName::Highlights, ViewName::Calendar]);
    }

    #[test]
    fn data_change_touches_every_view() {
        let registry = ViewRegistry::standard();
        let affected = registry.views_for_change(&[StateSlice::Data]);
        assert_eq!(affected.len(), ViewName::ALL.len());
    }

    #[test]
    fn no_change_touches_nothing() {
        let registry = ViewRegistry::standard();
        assert!(registry.views_for_change(&[]).is_empty());
    }

    #[test]
    fn view_names_round_trip() {
        for name in ViewName::ALL {
            assert_eq!(ViewName::parse(name.as_str()), Some(name));
        }
        assert_eq!(ViewName::parse("bogus"), None);
    }
}
