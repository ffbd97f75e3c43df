use std::collections::HashMap;

use crate::location::Location;
use crate::popup::PopupContent;

/// A map that can hold markers. Implementations own whatever the rendered pin is.
pub trait MapSurface {
    type Marker;

    /// Build a detached marker for `location`.
    fn create_marker(&mut self, location: &Location, popup: &PopupContent) -> Self::Marker;
    fn attach(&mut self, marker: &Self::Marker);
    fn detach(&mut self, marker: &Self::Marker);
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("markers have already been built")]
    AlreadyBuilt,
    #[error("no marker for location {0:?}")]
    UnknownSlug(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub built: usize,
    /// Slugs seen more than once; only the first occurrence got a marker.
    pub duplicates: Vec<String>,
}

struct MarkerEntry<M> {
    marker: M,
    attached: bool,
}

/// One marker per location slug, built once and then only attached or detached.
pub struct MarkerRegistry<S: MapSurface> {
    surface: S,
    entries: HashMap<String, MarkerEntry<S::Marker>>,
    order: Vec<String>,
    built: bool,
}

impl<S: MapSurface> MarkerRegistry<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            entries: HashMap::new(),
            order: Vec::new(),
            built: false,
        }
    }

    pub fn build(&mut self, locations: &[Location]) -> Result<BuildReport, RegistryError> {
        if self.built {
            return Err(RegistryError::AlreadyBuilt);
        }
        self.built = true;

        let mut report = BuildReport::default();
        for location in locations {
            if self.entries.contains_key(&location.slug) {
                report.duplicates.push(location.slug.clone());
                continue;
            }
            let popup = PopupContent::from_location(location);
            let marker = self.surface.create_marker(location, &popup);
            self.entries.insert(
                location.slug.clone(),
                MarkerEntry {
                    marker,
                    attached: false,
                },
            );
            self.order.push(location.slug.clone());
            report.built += 1;
        }
        Ok(report)
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Attach or detach the marker for `slug`. Returns whether anything changed.
    pub fn set_visible(&mut self, slug: &str, visible: bool) -> Result<bool, RegistryError> {
        let entry = self
            .entries
            .get_mut(slug)
            .ok_or_else(|| RegistryError::UnknownSlug(slug.to_string()))?;
        if entry.attached == visible {
            return Ok(false);
        }
        if visible {
            self.surface.attach(&entry.marker);
        } else {
            self.surface.detach(&entry.marker);
        }
        entry.attached = visible;
        Ok(true)
    }

    pub fn is_attached(&self, slug: &str) -> Option<bool> {
        self.entries.get(slug).map(|e| e.attached)
    }

    pub fn marker(&self, slug: &str) -> Option<&S::Marker> {
        self.entries.get(slug).map(|e| &e.marker)
    }

    /// Slugs in build order.
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn attached_slugs(&self) -> impl Iterator<Item = &str> {
        self.slugs()
            .filter(|slug| self.entries.get(*slug).is_some_and(|e| e.attached))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum SurfaceOp {
        Create(String),
        Attach(String),
        Detach(String),
    }

    /// Surface that records every call; markers are just their slug.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub ops: Vec<SurfaceOp>,
        pub popups: Vec<PopupContent>,
    }

    impl RecordingSurface {
        pub fn count(&self, op: fn(&SurfaceOp) -> bool) -> usize {
            self.ops.iter().filter(|o| op(o)).count()
        }
    }

    impl MapSurface for RecordingSurface {
        type Marker = String;

        fn create_marker(&mut self, location: &Location, popup: &PopupContent) -> String {
            self.ops.push(SurfaceOp::Create(location.slug.clone()));
            self.popups.push(popup.clone());
            location.slug.clone()
        }

        fn attach(&mut self, marker: &String) {
            self.ops.push(SurfaceOp::Attach(marker.clone()));
        }

        fn detach(&mut self, marker: &String) {
            self.ops.push(SurfaceOp::Detach(marker.clone()));
        }
    }
}
