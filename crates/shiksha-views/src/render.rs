// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{ViewName, ViewRegistry};
use shiksha_model::{DashboardSnapshot, NavigationState, StateSlice};
use tracing::error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOutput {
    pub name: ViewName,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ViewRenderError {
    #[error("no view registered as {0:?}")]
    UnknownView(ViewName),
    #[error("view {name} failed to render: {source}")]
    Render {
        name: ViewName,
        source: anyhow::Error,
    },
}

/// Outcome of a render pass. Failures are per view; every view that did
/// not fail has an entry in `outputs`.
#[derive(Debug, Default)]
pub struct RenderReport {
    pub outputs: Vec<ViewOutput>,
    pub failures: Vec<ViewRenderError>,
}

impl RenderReport {
    pub fn output(&self, name: ViewName) -> Option<&ViewOutput> {
        self.outputs.iter().find(|output| output.name == name)
    }
}

/// Drives view rendering over a registry. One failing view never takes
/// down the pass; its error is logged and reported while every other
/// view still renders.
pub struct RenderCoordinator {
    registry: ViewRegistry,
}

impl RenderCoordinator {
    pub fn new(registry: ViewRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    pub fn render_one(
        &self,
        name: ViewName,
        snapshot: &DashboardSnapshot,
        nav: &NavigationState,
    ) -> Result<ViewOutput, ViewRenderError> {
        let spec = self
            .registry
            .get(name)
            .ok_or(ViewRenderError::UnknownView(name))?;
        match (spec.render)(snapshot, nav) {
            Ok(body) => Ok(ViewOutput { name, body }),
            Err(source) => {
                error!(view = %name, %source, "view failed to render");
                Err(ViewRenderError::Render { name, source })
            }
        }
    }

    pub fn render_all(&self, snapshot: &DashboardSnapshot, nav: &NavigationState) -> RenderReport {
        self.render_views(
            self.registry.specs().iter().map(|spec| spec.name),
            snapshot,
            nav,
        )
    }

    /// Re-render only the views affected by the changed slices.
    pub fn render_changed(
        &self,
        changed: &[StateSlice],
        snapshot: &DashboardSnapshot,
        nav: &NavigationState,
    ) -> RenderReport {
        self.render_views(
            self.registry.views_for_change(changed).into_iter(),
            snapshot,
            nav,
        )
    }

    fn render_views(
        &self,
        names: impl Iterator<Item = ViewName>,
        snapshot: &DashboardSnapshot,
        nav: &NavigationState,
    ) -> RenderReport {
        let mut report = RenderReport::default();
        for name in names {
            match self.render_one(name, snapshot, nav) {
                Ok(output) => report.outputs.push(output),
                Err(failure) => report.failures.push(failure),
            }
        }
        report
    }
}
