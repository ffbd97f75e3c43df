use crate::catalog;
use crate::location::Location;

pub const POPUP_IMAGE_DIR: &str = "/public/images";
pub const DETAIL_PAGE_PREFIX: &str = "/locations";

/// A tag as shown in a popup. Only tags with a known icon make it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagIcon {
    pub tag: String,
    pub label: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeChip {
    pub value: String,
    pub label: String,
}

/// Structured popup payload for one location, fixed at marker construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupContent {
    pub standard: String,
    pub image: Option<String>,
    pub tags: Vec<TagIcon>,
    pub badges: Vec<BadgeChip>,
    pub name: String,
    pub description: String,
    pub detail_href: String,
}

/// Image path for a location's popup. The file may not exist; a missing image
/// leaves an empty background, nothing more.
pub fn popup_image_path(slug: &str) -> String {
    format!("{POPUP_IMAGE_DIR}/{slug}-popup.jpg")
}

pub fn detail_href(slug: &str) -> String {
    format!("{DETAIL_PAGE_PREFIX}/{slug}")
}

impl PopupContent {
    pub fn from_location(location: &Location) -> Self {
        let tags = location
            .tags
            .iter()
            .filter_map(|tag| {
                let icon = catalog::tag_icon(tag)?;
                Some(TagIcon {
                    tag: tag.clone(),
                    label: catalog::tag_label(tag).unwrap_or_default(),
                    icon,
                })
            })
            .collect();

        // Uncatalogued badges still show, labelled with their raw value.
        let badges = location
            .badges
            .iter()
            .map(|badge| BadgeChip {
                value: badge.clone(),
                label: catalog::badge_label(badge)
                    .map(str::to_string)
                    .unwrap_or_else(|| badge.clone()),
            })
            .collect();

        Self {
            standard: location.standard.clone(),
            image: location.image.then(|| popup_image_path(&location.slug)),
            tags,
            badges,
            name: location.name.clone(),
            description: location.description.clone(),
            detail_href: detail_href(&location.slug),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::sample;

    #[test]
    fn unknown_tags_render_nothing() {
        let loc = sample("acre", "gold", &["beef", "kombucha", "wine"]);
        let popup = PopupContent::from_location(&loc);
        let tags: Vec<_> = popup.tags.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(tags, vec!["beef", "wine"]);
        assert_eq!(popup.tags[0].label, "Beef");
        assert_eq!(popup.tags[1].icon, "/public/images/icons/wine.svg");
    }

    #[test]
    fn image_follows_slug_convention() {
        let mut loc = sample("acre-farm", "silver", &[]);
        assert_eq!(PopupContent::from_location(&loc).image, None);
        loc.image = true;
        assert_eq!(
            PopupContent::from_location(&loc).image.as_deref(),
            Some("/public/images/acre-farm-popup.jpg")
        );
    }

    #[test]
    fn carries_text_link_and_badges() {
        let mut loc = sample("acre-farm", "bronze", &[]);
        loc.description = "Pasture raised".into();
        loc.badges = vec!["roc".into(), "local".into()];
        let popup = PopupContent::from_location(&loc);
        assert_eq!(popup.standard, "bronze");
        assert_eq!(popup.name, "ACRE-FARM");
        assert_eq!(popup.description, "Pasture raised");
        assert_eq!(popup.detail_href, "/locations/acre-farm");
        assert_eq!(popup.badges[0].label, "Regenerative Organic Certified");
        assert_eq!(popup.badges[1].label, "local");
    }
}
