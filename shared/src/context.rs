use std::collections::HashSet;

use crate::filter::{Facet, FilterState};
use crate::location::Location;
use crate::registry::{BuildReport, MapSurface, MarkerRegistry, RegistryError};

/// Result of pushing the current filter state onto the markers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub attached: usize,
    pub detached: usize,
    pub visible: usize,
}

impl ApplyReport {
    pub fn changed(&self) -> bool {
        self.attached > 0 || self.detached > 0
    }
}

/// State for one map instance: its locations, markers and filters.
pub struct MapContext<S: MapSurface> {
    locations: Vec<Location>,
    registry: MarkerRegistry<S>,
    filters: FilterState,
}

impl<S: MapSurface> MapContext<S> {
    /// Build every marker on `surface`. Markers start detached; call
    /// [`MapContext::apply`] once filters are seeded.
    pub fn build(surface: S, locations: Vec<Location>) -> Result<(Self, BuildReport), RegistryError> {
        let mut registry = MarkerRegistry::new(surface);
        let report = registry.build(&locations)?;

        // Later duplicates never got a marker, so drop them from filtering too.
        let mut seen = HashSet::new();
        let locations = locations
            .into_iter()
            .filter(|l| seen.insert(l.slug.clone()))
            .collect();

        Ok((
            Self {
                locations,
                registry,
                filters: FilterState::new(),
            },
            report,
        ))
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn registry(&self) -> &MarkerRegistry<S> {
        &self.registry
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Set facet values without re-applying, e.g. from checkboxes already
    /// checked when the page loaded.
    pub fn seed<'v>(&mut self, facet: Facet, values: impl IntoIterator<Item = &'v str>) {
        for value in values {
            self.filters.toggle(facet, value, true);
        }
    }

    /// Recompute visibility for every location and attach/detach the markers
    /// whose state differs.
    pub fn apply(&mut self) -> ApplyReport {
        let mut report = ApplyReport::default();
        for (slug, visible) in self.filters.recompute(&self.locations) {
            if visible {
                report.visible += 1;
            }
            // Every location was registered by `build`.
            if let Ok(true) = self.registry.set_visible(slug, visible) {
                if visible {
                    report.attached += 1;
                } else {
                    report.detached += 1;
                }
            }
        }
        report
    }

    /// Apply one checkbox change and update the markers in the same turn.
    pub fn toggle(&mut self, facet: Facet, value: &str, active: bool) -> ApplyReport {
        self.filters.toggle(facet, value, active);
        self.apply()
    }

    pub fn visible_slugs(&self) -> Vec<String> {
        self.registry.attached_slugs().map(str::to_string).collect()
    }
}
