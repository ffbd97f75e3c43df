use std::collections::{BTreeMap, HashSet};

use crate::location::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Standard,
    Tag,
}

/// Active values per facet. An empty set places no constraint on its facet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    standards: HashSet<String>,
    tags: HashSet<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    fn set_mut(&mut self, facet: Facet) -> &mut HashSet<String> {
        match facet {
            Facet::Standard => &mut self.standards,
            Facet::Tag => &mut self.tags,
        }
    }

    pub fn active(&self, facet: Facet) -> &HashSet<String> {
        match facet {
            Facet::Standard => &self.standards,
            Facet::Tag => &self.tags,
        }
    }

    /// Add or remove a facet value. Returns whether the set changed.
    pub fn toggle(&mut self, facet: Facet, value: &str, active: bool) -> bool {
        let set = self.set_mut(facet);
        if active {
            set.insert(value.to_string())
        } else {
            set.remove(value)
        }
    }

    pub fn toggle_standard(&mut self, value: &str, active: bool) -> bool {
        self.toggle(Facet::Standard, value, active)
    }

    pub fn toggle_tag(&mut self, value: &str, active: bool) -> bool {
        self.toggle(Facet::Tag, value, active)
    }

    /// Standards match exactly; any shared tag passes the tag facet.
    /// Both facets must pass.
    pub fn passes(&self, location: &Location) -> bool {
        let standard_passes =
            self.standards.is_empty() || self.standards.contains(&location.standard);
        let tags_pass =
            self.tags.is_empty() || location.tags.iter().any(|t| self.tags.contains(t));
        standard_passes && tags_pass
    }

    pub fn recompute<'a>(&self, locations: &'a [Location]) -> BTreeMap<&'a str, bool> {
        locations
            .iter()
            .map(|l| (l.slug.as_str(), self.passes(l)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::sample;

    fn scenario() -> Vec<Location> {
        vec![
            sample("a", "gold", &["beef"]),
            sample("b", "silver", &["wine"]),
        ]
    }

    fn visible(filter: &FilterState, locations: &[Location]) -> Vec<String> {
        filter
            .recompute(locations)
            .into_iter()
            .filter(|(_, v)| *v)
            .map(|(slug, _)| slug.to_string())
            .collect()
    }

    #[test]
    fn empty_filters_show_everything() {
        let locations = vec![
            sample("a", "gold", &[]),
            sample("b", "bronze", &["beef", "wine"]),
            sample("c", "", &[]),
        ];
        let filter = FilterState::new();
        assert!(filter.active(Facet::Standard).is_empty());
        assert!(filter.active(Facet::Tag).is_empty());
        assert!(filter.recompute(&locations).values().all(|v| *v));
    }

    #[test]
    fn non_matching_standard_hides_and_removal_restores() {
        let locations = vec![sample("a", "silver", &["beef"])];
        let mut filter = FilterState::new();

        filter.toggle_standard("gold", true);
        assert!(!filter.recompute(&locations)["a"]);

        filter.toggle_standard("gold", false);
        assert!(filter.recompute(&locations)["a"]);
    }

    #[test]
    fn tags_or_within_and_across_facets() {
        let locations = vec![sample("farm", "silver", &["beef", "wine"])];
        let mut filter = FilterState::new();

        filter.toggle_tag("wine", true);
        assert!(filter.passes(&locations[0]));
        filter.toggle_tag("honey", true);
        assert!(filter.passes(&locations[0]));

        filter.toggle_standard("gold", true);
        assert!(!filter.passes(&locations[0]));
    }

    #[test]
    fn location_without_tags_fails_active_tag_facet() {
        let loc = sample("a", "gold", &[]);
        let mut filter = FilterState::new();
        filter.toggle_tag("beef", true);
        assert!(!filter.passes(&loc));
    }

    #[test]
    fn gold_wine_scenario() {
        let locations = scenario();
        let mut filter = FilterState::new();
        assert_eq!(visible(&filter, &locations), vec!["a", "b"]);

        filter.toggle_standard("gold", true);
        assert_eq!(visible(&filter, &locations), vec!["a"]);

        filter.toggle_tag("wine", true);
        assert!(visible(&filter, &locations).is_empty());

        filter.toggle_standard("gold", false);
        assert_eq!(visible(&filter, &locations), vec!["b"]);
    }

    #[test]
    fn toggle_reports_changes() {
        let mut filter = FilterState::new();
        assert!(filter.toggle_tag("beef", true));
        assert!(!filter.toggle_tag("beef", true));
        assert!(filter.toggle_tag("beef", false));
        assert!(!filter.toggle_tag("beef", false));
        assert!(filter.active(Facet::Tag).is_empty());
    }
}
